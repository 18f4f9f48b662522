#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Database row types for the rideway platform.
//!
//! These types represent the shapes of data as stored in and retrieved
//! from the relational store. They are distinct from the API request and
//! response types in `rideway_server_models`; handlers convert between
//! the two at the edge.

use rideway_ride_models::{
    DriverStatus, PaymentMode, PaymentStatus, RideStatus, VehicleType,
};
use serde::{Deserialize, Serialize};

/// A driver account row. The password hash is intentionally absent;
/// credential lookups go through [`StoredCredentials`] so profile
/// queries can never leak it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    /// Primary key.
    pub id: i64,
    /// Display name.
    pub full_name: String,
    /// Unique email address.
    pub email: String,
    /// Unique phone number.
    pub phone: String,
    /// Unique driving licence number.
    pub license_no: String,
    /// Availability status.
    pub status: DriverStatus,
    /// Running mean of the ratings this driver has received, `None`
    /// until their first rated ride.
    pub avg_rating: Option<f64>,
    /// Date the driver joined, RFC 3339.
    pub join_date: String,
}

/// Password-verification view of an account, used only by login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    /// Primary key in the matching account table.
    pub id: i64,
    /// Display name, echoed in the login response.
    pub full_name: String,
    /// Email the account was found by.
    pub email: String,
    /// Bcrypt hash of the account password.
    pub password_hash: String,
    /// Present when the account is a driver; its presence is how the
    /// account's role is inferred.
    pub license_no: Option<String>,
}

/// A vehicle row. Each vehicle has exactly one owning driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Primary key.
    pub id: i64,
    /// Owning driver.
    pub driver_id: i64,
    /// Free-text model name.
    pub model: String,
    /// Seating capacity, always positive.
    pub capacity: i32,
    /// Vehicle category.
    pub vehicle_type: VehicleType,
    /// Creation timestamp, RFC 3339.
    pub created_at: String,
}

/// A route row: a reusable (start, end) pair with estimates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Primary key.
    pub id: i64,
    /// Free-text start address.
    pub start_point: String,
    /// Free-text end address.
    pub end_point: String,
    /// Estimated driving distance in kilometres.
    pub distance_km: f64,
    /// Estimated driving time in minutes.
    pub duration_min: i64,
}

/// A ride row, the central fact table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ride {
    /// Primary key.
    pub id: i64,
    /// Requesting passenger.
    pub passenger_id: i64,
    /// Assigned driver.
    pub driver_id: i64,
    /// Route being travelled.
    pub route_id: i64,
    /// Assigned vehicle, if one was resolved.
    pub vehicle_id: Option<i64>,
    /// Applied promotion, if any.
    pub promo_id: Option<i64>,
    /// Fare in currency units, non-negative.
    pub fare: f64,
    /// Lifecycle status.
    pub status: RideStatus,
    /// Creation timestamp, RFC 3339.
    pub created_at: String,
    /// Last status-change timestamp, RFC 3339.
    pub updated_at: String,
}

/// A ride joined with its route, driver, vehicle, and passenger names
/// for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideDetail {
    /// Ride primary key.
    pub id: i64,
    /// Requesting passenger's display name.
    pub passenger_name: String,
    /// Assigned driver's display name.
    pub driver_name: String,
    /// Assigned vehicle's model, if a vehicle was resolved.
    pub vehicle_model: Option<String>,
    /// Route start address.
    pub start_point: String,
    /// Route end address.
    pub end_point: String,
    /// Fare in currency units.
    pub fare: f64,
    /// Lifecycle status.
    pub status: RideStatus,
    /// Creation timestamp, RFC 3339.
    pub created_at: String,
}

/// A freshly created ride joined with its route, driver, and vehicle,
/// as returned by ride creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedRide {
    /// Ride primary key.
    pub id: i64,
    /// Requesting passenger.
    pub passenger_id: i64,
    /// Assigned driver.
    pub driver_id: i64,
    /// Assigned vehicle, if one was resolved.
    pub vehicle_id: Option<i64>,
    /// Fare in currency units.
    pub fare: f64,
    /// Lifecycle status.
    pub status: RideStatus,
    /// Creation timestamp, RFC 3339.
    pub created_at: String,
    /// Route start address.
    pub start_point: String,
    /// Route end address.
    pub end_point: String,
    /// Route distance in kilometres.
    pub distance_km: f64,
    /// Route duration estimate in minutes.
    pub duration_min: i64,
    /// Assigned driver's display name.
    pub driver_name: String,
    /// Assigned vehicle's model, if a vehicle was resolved.
    pub vehicle_model: Option<String>,
}

/// A payment row. At most one payment exists per ride.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Primary key.
    pub id: i64,
    /// Ride this payment settles.
    pub ride_id: i64,
    /// Amount in currency units, non-negative.
    pub amount: f64,
    /// Payment instrument.
    pub mode: PaymentMode,
    /// Settlement status.
    pub status: PaymentStatus,
    /// Timestamp the payment was recorded, RFC 3339.
    pub paid_at: String,
}

/// A passenger's payment joined with its ride's creation date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentHistoryEntry {
    /// Payment primary key.
    pub payment_id: i64,
    /// Amount in currency units.
    pub amount: f64,
    /// Payment instrument.
    pub mode: PaymentMode,
    /// Settlement status.
    pub status: PaymentStatus,
    /// Creation timestamp of the paid ride, RFC 3339.
    pub ride_created_at: String,
}

/// A feedback row. At most one exists per ride, enforced by the rating
/// operation's pre-check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    /// Primary key.
    pub id: i64,
    /// Rated ride.
    pub ride_id: i64,
    /// Passenger who gave the rating.
    pub passenger_id: i64,
    /// Driver who received the rating.
    pub driver_id: i64,
    /// Star rating in [0, 5].
    pub rating: f64,
    /// Optional free-text comment.
    pub comment: Option<String>,
    /// Creation timestamp, RFC 3339.
    pub created_at: String,
}

/// One row of a passenger's ride history, joined for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideHistoryEntry {
    /// Ride primary key.
    pub id: i64,
    /// Fare in currency units.
    pub fare: f64,
    /// Lifecycle status.
    pub status: RideStatus,
    /// Creation timestamp, RFC 3339.
    pub date: String,
    /// Assigned driver's display name.
    pub driver_name: String,
    /// Assigned vehicle's model.
    pub vehicle_model: String,
    /// Route start address.
    pub start_point: String,
    /// Route end address.
    pub end_point: String,
}
