#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Report row types for the admin analytics surface.
//!
//! Each struct is one row of one report query in `rideway_analytics`.
//! They serialize camelCase for the admin dashboard.

use rideway_ride_models::PaymentMode;
use serde::{Deserialize, Serialize};

/// One Active driver's summary: ride volume, received rating, fleet
/// size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverSummary {
    /// Driver id.
    pub driver_id: i64,
    /// Driver display name.
    pub full_name: String,
    /// When the driver joined (RFC 3339).
    pub join_date: String,
    /// Distinct rides assigned to this driver, any status.
    pub total_rides: i64,
    /// Mean received rating, `None` until first feedback.
    pub avg_rating: Option<f64>,
    /// Distinct vehicles registered by this driver.
    pub vehicle_count: i64,
}

/// One passenger's activity: ride count, spend, recency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassengerActivity {
    /// Passenger id.
    pub passenger_id: i64,
    /// Passenger display name.
    pub full_name: String,
    /// Passenger email.
    pub email: String,
    /// Distinct rides taken, any status.
    pub total_rides: i64,
    /// Sum of fares across all rides, `None` with no rides.
    pub total_spent: Option<f64>,
    /// Timestamp of the newest ride, `None` with no rides.
    pub last_ride_date: Option<String>,
}

/// Ride volume and revenue for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRideStats {
    /// Calendar date (`YYYY-MM-DD`).
    pub ride_date: String,
    /// All rides created that day.
    pub total_rides: i64,
    /// Rides that day now Completed.
    pub completed_rides: i64,
    /// Rides that day now Cancelled.
    pub cancelled_rides: i64,
    /// Sum of fares for the day.
    pub total_revenue: f64,
    /// Mean fare for the day.
    pub average_fare: f64,
}

/// One route ranked by completed-ride usage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularRoute {
    /// Route id.
    pub route_id: i64,
    /// Route start address.
    pub start_point: String,
    /// Route end address.
    pub end_point: String,
    /// Completed rides on this route.
    pub usage_count: i64,
    /// Mean fare across those rides.
    pub average_fare: f64,
    /// Timestamp of the most recent completed ride.
    pub last_used: String,
}

/// Transaction volume and value for one payment mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentModeAnalysis {
    /// Payment mode.
    pub mode: PaymentMode,
    /// All payments in this mode.
    pub total_transactions: i64,
    /// Payments in this mode with status Successful.
    pub successful_transactions: i64,
    /// Payments in this mode with status Failed.
    pub failed_transactions: i64,
    /// Sum of amounts across all payments in this mode.
    pub total_amount: f64,
    /// Mean amount.
    pub average_amount: f64,
}

/// One driver's performance across all statuses, with accident counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverPerformance {
    /// Driver id.
    pub driver_id: i64,
    /// Driver display name.
    pub full_name: String,
    /// Distinct rides assigned to this driver.
    pub total_rides: i64,
    /// Mean received rating, `None` until first feedback.
    pub avg_rating: Option<f64>,
    /// Distinct accidents on this driver's rides.
    pub accident_count: i64,
    /// Of those, accidents with Critical severity.
    pub critical_accidents: i64,
}

/// Accident counts for one route that has at least one accident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentAnalysis {
    /// Route id.
    pub route_id: i64,
    /// Route start address.
    pub start_point: String,
    /// Route end address.
    pub end_point: String,
    /// Accidents on rides along this route.
    pub total_accidents: i64,
    /// Of those, Critical ones.
    pub critical_accidents: i64,
    /// Of those, with an Open insurance claim.
    pub open_claims: i64,
}

/// A driver passing the recent-window volume and rating bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighPerformer {
    /// Driver id.
    pub driver_id: i64,
    /// Driver display name.
    pub full_name: String,
    /// Rated completed rides inside the window.
    pub total_rides: i64,
    /// Mean rating over those rides.
    pub avg_rating: f64,
}

/// Estimated versus actual duration on a route under one traffic
/// severity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficImpact {
    /// Route id.
    pub route_id: i64,
    /// Route start address.
    pub start_point: String,
    /// Route end address.
    pub end_point: String,
    /// Route's estimated duration in minutes.
    pub estimated_duration: i64,
    /// Mean observed ride duration in minutes, creation to completion.
    pub actual_avg_duration: f64,
    /// Traffic report severity (`Low`, `Medium`, `High`).
    pub severity: String,
}
