#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the Rideway server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the database row types to allow independent evolution of the API
//! contract: the wire format is camelCase while the row types stay
//! snake_case.

use rideway_database_models::{
    CreatedRide, Driver, PaymentHistoryEntry, Ride, RideDetail, RideHistoryEntry, Vehicle,
};
use rideway_ride_models::{
    AccountRole, DriverStatus, PaymentMode, PaymentStatus, RideStatus, VehicleType,
};
use serde::{Deserialize, Serialize};

// ---------- auth ----------

/// Body for `POST /api/auth/register`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Display name.
    pub full_name: String,
    /// Login email, unique across passengers and drivers.
    pub email: String,
    /// Plaintext password, hashed before storage.
    pub password: String,
    /// Contact phone number.
    pub phone: String,
    /// Either `passenger` or `driver`.
    pub user_type: String,
    /// Driving licence number, required when registering a driver.
    pub license_no: Option<String>,
}

/// Body for `POST /api/auth/login`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Login email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Response for `POST /api/auth/register`: just the signed token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Signed JWT for the new account.
    pub token: String,
}

/// The account summary embedded in a login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginUser {
    /// Account ID within its role's table.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Which table the account lives in.
    #[serde(rename = "type")]
    pub role: AccountRole,
}

/// Response for `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Signed JWT.
    pub token: String,
    /// The authenticated account.
    pub user: LoginUser,
}

// ---------- passengers ----------

/// Body for `PUT /api/passengers/profile`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateRequest {
    /// New display name.
    pub name: String,
    /// New contact phone number.
    pub phone: String,
}

/// Body for `POST /api/passengers/rides/request`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RideRequest {
    /// Pickup address.
    pub start_point: String,
    /// Destination address.
    pub end_point: String,
    /// Requested vehicle type; defaults to `Car` when omitted.
    pub vehicle_type: Option<String>,
}

/// Body for `POST /api/passengers/rides/{ride_id}/rate`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateRequest {
    /// Star rating, 1.0 through 5.0.
    pub rating: f64,
    /// Optional free-text comment.
    pub feedback: Option<String>,
}

/// A newly matched ride as returned to the requesting passenger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRide {
    /// Ride ID.
    pub id: i64,
    /// Computed fare.
    pub fare: f64,
    /// Lifecycle state, `Requested` for a fresh match.
    pub status: RideStatus,
    /// Matched driver's display name.
    pub driver_name: String,
    /// Matched vehicle's model, if one is assigned.
    pub vehicle_model: Option<String>,
    /// Pickup address.
    pub start_point: String,
    /// Destination address.
    pub end_point: String,
}

impl From<CreatedRide> for ApiRide {
    fn from(ride: CreatedRide) -> Self {
        Self {
            id: ride.id,
            fare: ride.fare,
            status: ride.status,
            driver_name: ride.driver_name,
            vehicle_model: ride.vehicle_model,
            start_point: ride.start_point,
            end_point: ride.end_point,
        }
    }
}

/// One entry of a passenger's ride history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRideHistoryEntry {
    /// Ride ID.
    pub id: i64,
    /// Fare charged.
    pub fare: f64,
    /// Final or current lifecycle state.
    pub status: RideStatus,
    /// When the ride was created (RFC 3339).
    pub date: String,
    /// Driver's display name.
    pub driver_name: String,
    /// Vehicle model.
    pub vehicle_model: String,
    /// Pickup address.
    pub start_point: String,
    /// Destination address.
    pub end_point: String,
}

impl From<RideHistoryEntry> for ApiRideHistoryEntry {
    fn from(entry: RideHistoryEntry) -> Self {
        Self {
            id: entry.id,
            fare: entry.fare,
            status: entry.status,
            date: entry.date,
            driver_name: entry.driver_name,
            vehicle_model: entry.vehicle_model,
            start_point: entry.start_point,
            end_point: entry.end_point,
        }
    }
}

// ---------- rides ----------

/// An address with map coordinates, as exchanged with ride clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RideLocation {
    /// Street address or landmark name.
    pub address: String,
    /// Latitude; zero when not known.
    #[serde(default)]
    pub lat: f64,
    /// Longitude; zero when not known.
    #[serde(default)]
    pub lng: f64,
}

/// Body for `POST /api/rides`, the trusted-client booking endpoint.
///
/// The client supplies the route measurements and fare it has already
/// quoted; the server persists them as-is.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustedRideRequest {
    /// Passenger the ride is booked for.
    pub passenger_id: i64,
    /// Preferred driver; any non-integer value is treated as no hint.
    #[serde(default)]
    pub driver_id: Option<serde_json::Value>,
    /// Pickup location.
    pub pickup: RideLocation,
    /// Destination location.
    pub destination: RideLocation,
    /// Route distance in kilometres.
    pub distance: f64,
    /// Estimated duration in minutes.
    pub duration: i64,
    /// Quoted fare.
    pub fare: f64,
    /// Requested vehicle type; unknown values fall back to `Car`.
    pub vehicle_type: Option<String>,
}

/// Body for `PUT /api/rides/{ride_id}/status`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateRequest {
    /// Target lifecycle state.
    pub status: String,
}

/// A booked ride as returned by the trusted-client endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTrustedRide {
    /// Ride ID.
    pub id: i64,
    /// Passenger the ride belongs to.
    pub passenger_id: i64,
    /// Assigned driver.
    pub driver_id: i64,
    /// Assigned vehicle, if any.
    pub vehicle_id: Option<i64>,
    /// Persisted fare.
    pub fare: f64,
    /// Lifecycle state, lowercased for this endpoint's clients.
    pub status: String,
    /// When the ride was created (RFC 3339).
    pub created_at: String,
    /// Pickup location.
    pub pickup: RideLocation,
    /// Destination location.
    pub destination: RideLocation,
    /// Route distance in kilometres.
    pub distance: f64,
    /// Estimated duration in minutes.
    pub duration: i64,
}

impl From<CreatedRide> for ApiTrustedRide {
    fn from(ride: CreatedRide) -> Self {
        Self {
            id: ride.id,
            passenger_id: ride.passenger_id,
            driver_id: ride.driver_id,
            vehicle_id: ride.vehicle_id,
            fare: ride.fare,
            status: ride.status.as_ref().to_lowercase(),
            created_at: ride.created_at,
            // Coordinates are not persisted, so the echo carries zeros.
            pickup: RideLocation {
                address: ride.start_point,
                lat: 0.0,
                lng: 0.0,
            },
            destination: RideLocation {
                address: ride.end_point,
                lat: 0.0,
                lng: 0.0,
            },
            distance: ride.distance_km,
            duration: ride.duration_min,
        }
    }
}

/// A ride row as returned by the active-rides listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiActiveRide {
    /// Ride ID.
    pub id: i64,
    /// Passenger the ride belongs to.
    pub passenger_id: i64,
    /// Assigned driver.
    pub driver_id: i64,
    /// Route being travelled.
    pub route_id: i64,
    /// Assigned vehicle, if any.
    pub vehicle_id: Option<i64>,
    /// Promotion applied, if any.
    pub promo_id: Option<i64>,
    /// Fare charged.
    pub fare: f64,
    /// Lifecycle state.
    pub status: RideStatus,
    /// When the ride was created (RFC 3339).
    pub created_at: String,
    /// When the ride last changed state (RFC 3339).
    pub updated_at: String,
}

impl From<Ride> for ApiActiveRide {
    fn from(ride: Ride) -> Self {
        Self {
            id: ride.id,
            passenger_id: ride.passenger_id,
            driver_id: ride.driver_id,
            route_id: ride.route_id,
            vehicle_id: ride.vehicle_id,
            promo_id: ride.promo_id,
            fare: ride.fare,
            status: ride.status,
            created_at: ride.created_at,
            updated_at: ride.updated_at,
        }
    }
}

/// The joined detail view of a single ride.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRideDetail {
    /// Ride ID.
    pub id: i64,
    /// Passenger's display name.
    pub passenger_name: String,
    /// Driver's display name.
    pub driver_name: String,
    /// Vehicle model, if a vehicle is assigned.
    pub vehicle_model: Option<String>,
    /// Pickup address.
    pub start_point: String,
    /// Destination address.
    pub end_point: String,
    /// Fare charged.
    pub fare: f64,
    /// Lifecycle state.
    pub status: RideStatus,
    /// When the ride was created (RFC 3339).
    pub created_at: String,
}

impl From<RideDetail> for ApiRideDetail {
    fn from(detail: RideDetail) -> Self {
        Self {
            id: detail.id,
            passenger_name: detail.passenger_name,
            driver_name: detail.driver_name,
            vehicle_model: detail.vehicle_model,
            start_point: detail.start_point,
            end_point: detail.end_point,
            fare: detail.fare,
            status: detail.status,
            created_at: detail.created_at,
        }
    }
}

// ---------- drivers ----------

/// Body for `POST /api/drivers/register`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverRegisterRequest {
    /// Display name.
    pub full_name: String,
    /// Driving licence number.
    pub license_no: String,
    /// Contact phone number.
    pub phone: String,
    /// Login email.
    pub email: String,
    /// Plaintext password, hashed before storage.
    pub password: String,
}

/// Body for `PUT /api/drivers/status`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverStatusRequest {
    /// Target availability: `Active`, `Inactive` or `Suspended`.
    pub status: String,
}

/// Body for `POST /api/drivers/vehicles`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRequest {
    /// Vehicle model name.
    pub model: String,
    /// Seating capacity, must be positive.
    pub capacity: i32,
    /// Vehicle class.
    #[serde(rename = "type")]
    pub vehicle_type: String,
}

/// A driver profile as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDriver {
    /// Driver ID.
    pub id: i64,
    /// Display name.
    pub full_name: String,
    /// Login email.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
    /// Driving licence number.
    pub license_no: String,
    /// Availability status.
    pub status: DriverStatus,
    /// Average rating across rated rides, if any.
    pub avg_rating: Option<f64>,
    /// When the driver joined (RFC 3339).
    pub join_date: String,
}

impl From<Driver> for ApiDriver {
    fn from(driver: Driver) -> Self {
        Self {
            id: driver.id,
            full_name: driver.full_name,
            email: driver.email,
            phone: driver.phone,
            license_no: driver.license_no,
            status: driver.status,
            avg_rating: driver.avg_rating,
            join_date: driver.join_date,
        }
    }
}

/// A vehicle as returned by the driver's vehicle listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiVehicle {
    /// Vehicle ID.
    pub id: i64,
    /// Owning driver.
    pub driver_id: i64,
    /// Model name.
    pub model: String,
    /// Seating capacity.
    pub capacity: i32,
    /// Vehicle class.
    #[serde(rename = "type")]
    pub vehicle_type: VehicleType,
    /// When the vehicle was registered (RFC 3339).
    pub created_at: String,
}

impl From<Vehicle> for ApiVehicle {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            driver_id: vehicle.driver_id,
            model: vehicle.model,
            capacity: vehicle.capacity,
            vehicle_type: vehicle.vehicle_type,
            created_at: vehicle.created_at,
        }
    }
}

// ---------- payments ----------

/// Body for `POST /api/payments`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    /// Ride being paid for.
    pub ride_id: i64,
    /// Amount charged.
    pub amount: f64,
    /// Payment channel: `Cash`, `Card`, `UPI` or `Wallet`.
    pub mode: String,
}

/// One entry of a passenger's payment history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPaymentHistoryEntry {
    /// Payment ID.
    pub payment_id: i64,
    /// Amount charged.
    pub amount: f64,
    /// Payment channel.
    pub mode: PaymentMode,
    /// Settlement status.
    pub status: PaymentStatus,
    /// When the paid ride was created (RFC 3339).
    pub ride_created_at: String,
}

impl From<PaymentHistoryEntry> for ApiPaymentHistoryEntry {
    fn from(entry: PaymentHistoryEntry) -> Self {
        Self {
            payment_id: entry.payment_id,
            amount: entry.amount,
            mode: entry.mode,
            status: entry.status,
            ride_created_at: entry.ride_created_at,
        }
    }
}

// ---------- health ----------

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}
