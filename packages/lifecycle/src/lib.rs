#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Ride lifecycle: creation, status transitions, cancellation, rating.
//!
//! A ride moves along `Requested -> Accepted -> Ongoing -> Completed`,
//! with `Cancelled` reachable from any non-terminal state. Transition
//! legality lives in [`RideStatus::can_transition_to`] and every mutating
//! operation here consults it; status writes are conditional on the
//! expected current status so concurrent updates lose cleanly instead of
//! clobbering each other.
//!
//! Creation is a single entry point with two trust levels (see
//! [`CreateRide`]): passenger requests get route dedup, driver matching,
//! and server-side fare computation; trusted callers supply route facts
//! and fare themselves and get fallback driver/vehicle resolution.

use moosicbox_json_utils::database::ToValue as _;
use rideway_database_models::{CreatedRide, Feedback, Ride, RideDetail, RideHistoryEntry, Route};
use rideway_ride_models::{
    AccountRole, DriverStatus, FarePolicy, RideStatus, RouteEstimator, VehicleType,
};
use switchy_database::{Database, DatabaseError, DatabaseValue};
use thiserror::Error;

/// Identity of the auto-created driver used when a trusted caller names
/// no usable driver and the driver table is empty.
pub const PLACEHOLDER_DRIVER_EMAIL: &str = "driver@system.com";

const PLACEHOLDER_DRIVER_NAME: &str = "System Driver";
const PLACEHOLDER_DRIVER_PHONE: &str = "0000000000";
const PLACEHOLDER_DRIVER_LICENSE: &str = "SYS-LIC-001";
const DEFAULT_VEHICLE_MODEL: &str = "Default Vehicle";
const DEFAULT_VEHICLE_CAPACITY: i32 = 4;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Unknown ride id, or a ride the caller does not own. The two are
    /// deliberately indistinguishable.
    #[error("Ride not found")]
    RideNotFound,

    /// No Active driver owns a vehicle of the requested type.
    #[error("No drivers available")]
    NoDriversAvailable,

    /// The requested status change is not an edge of the state graph.
    #[error("Cannot change ride status from {from} to {to}")]
    InvalidTransition { from: RideStatus, to: RideStatus },

    /// The ride is already Completed or Cancelled.
    #[error("Cannot cancel a {} ride", .status.as_ref().to_lowercase())]
    AlreadyTerminal { status: RideStatus },

    #[error("Can only rate completed rides")]
    NotCompleted,

    #[error("You have already rated this ride")]
    AlreadyRated,

    /// Another request changed the ride between the check and the write.
    #[error("Ride was modified concurrently")]
    Conflict,

    #[error("Data conversion error: {message}")]
    Conversion { message: String },
}

/// The two entry paths for creating a ride.
///
/// Both resolve a route, a driver, and a vehicle, insert the ride inside
/// one transaction, and return the joined [`CreatedRide`]. They differ in
/// how much of the caller's input is trusted.
#[derive(Debug, Clone)]
pub enum CreateRide {
    /// An end-user request: the route is looked up by exact (start, end)
    /// pair or created from the estimator's figures, the driver must be
    /// Active with a vehicle of the requested type, the fare is computed
    /// here, and the ride starts out `Requested`.
    PassengerRequest {
        passenger_id: i64,
        start_point: String,
        end_point: String,
        vehicle_type: VehicleType,
    },

    /// A trusted internal caller: route facts and fare are taken as
    /// given, a fresh route row is always created, an unusable driver id
    /// falls back to any existing driver (or a placeholder one), and the
    /// ride starts out `Accepted`.
    Trusted {
        passenger_id: i64,
        driver_id: Option<i64>,
        start_point: String,
        end_point: String,
        distance_km: f64,
        duration_min: i64,
        fare: f64,
        vehicle_type: VehicleType,
    },
}

// ---------- creation ----------

/// Creates a ride through either trust path, atomically.
///
/// # Errors
///
/// * [`LifecycleError::NoDriversAvailable`] on the passenger path if no
///   Active driver owns a vehicle of the requested type.
/// * [`LifecycleError::Database`] if a query fails or a constraint is
///   violated (unknown passenger, negative fare).
pub async fn create_ride(
    db: &dyn Database,
    estimator: &dyn RouteEstimator,
    policy: FarePolicy,
    order: CreateRide,
) -> Result<CreatedRide, LifecycleError> {
    let txn = db.begin_transaction().await?;

    let ride_id = match order {
        CreateRide::PassengerRequest {
            passenger_id,
            start_point,
            end_point,
            vehicle_type,
        } => {
            let route =
                lookup_or_create_route(txn.as_ref(), estimator, &start_point, &end_point).await?;
            let (driver_id, vehicle_id) = match_active_driver(txn.as_ref(), vehicle_type).await?;
            let fare = policy.fare(route.distance_km);

            insert_ride(
                txn.as_ref(),
                passenger_id,
                driver_id,
                route.id,
                vehicle_id,
                fare,
                RideStatus::Requested,
            )
            .await?
        }
        CreateRide::Trusted {
            passenger_id,
            driver_id,
            start_point,
            end_point,
            distance_km,
            duration_min,
            fare,
            vehicle_type,
        } => {
            let route_id = insert_route(
                txn.as_ref(),
                &start_point,
                &end_point,
                distance_km,
                duration_min,
            )
            .await?;
            let driver_id = resolve_trusted_driver(txn.as_ref(), driver_id).await?;
            let vehicle_id = first_or_default_vehicle(txn.as_ref(), driver_id, vehicle_type).await?;

            insert_ride(
                txn.as_ref(),
                passenger_id,
                driver_id,
                route_id,
                vehicle_id,
                fare,
                RideStatus::Accepted,
            )
            .await?
        }
    };

    let created = fetch_created_ride(txn.as_ref(), ride_id).await?;

    txn.commit().await?;

    Ok(created)
}

/// Finds a route by exact (start, end) pair, creating one from the
/// estimator's figures if absent. Lookup-or-create keeps the passenger
/// path idempotent per pair.
async fn lookup_or_create_route(
    db: &dyn Database,
    estimator: &dyn RouteEstimator,
    start_point: &str,
    end_point: &str,
) -> Result<Route, LifecycleError> {
    let rows = db
        .query_raw_params(
            "SELECT id, start_point, end_point, distance_km, duration_min
             FROM routes
             WHERE start_point = $1 AND end_point = $2",
            &[
                DatabaseValue::String(start_point.to_string()),
                DatabaseValue::String(end_point.to_string()),
            ],
        )
        .await?;

    if let Some(row) = rows.first() {
        return Ok(Route {
            id: row.to_value("id").map_err(|e| LifecycleError::Conversion {
                message: format!("Failed to parse route id: {e}"),
            })?,
            start_point: row.to_value("start_point").unwrap_or_default(),
            end_point: row.to_value("end_point").unwrap_or_default(),
            distance_km: row.to_value("distance_km").unwrap_or_default(),
            duration_min: row.to_value("duration_min").unwrap_or_default(),
        });
    }

    let estimate = estimator.estimate(start_point, end_point);
    let id = insert_route(
        db,
        start_point,
        end_point,
        estimate.distance_km,
        estimate.duration_min,
    )
    .await?;

    Ok(Route {
        id,
        start_point: start_point.to_string(),
        end_point: end_point.to_string(),
        distance_km: estimate.distance_km,
        duration_min: estimate.duration_min,
    })
}

async fn insert_route(
    db: &dyn Database,
    start_point: &str,
    end_point: &str,
    distance_km: f64,
    duration_min: i64,
) -> Result<i64, LifecycleError> {
    let rows = db
        .query_raw_params(
            "INSERT INTO routes (start_point, end_point, distance_km, duration_min)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
            &[
                DatabaseValue::String(start_point.to_string()),
                DatabaseValue::String(end_point.to_string()),
                DatabaseValue::Real64(distance_km),
                DatabaseValue::Int64(duration_min),
            ],
        )
        .await?;

    parse_returned_id(rows.first(), "route")
}

/// Picks the first Active driver owning a vehicle of the requested type.
/// No ranking or proximity; the lowest ids win.
async fn match_active_driver(
    db: &dyn Database,
    vehicle_type: VehicleType,
) -> Result<(i64, i64), LifecycleError> {
    let rows = db
        .query_raw_params(
            "SELECT d.id AS driver_id, v.id AS vehicle_id
             FROM drivers d
             JOIN vehicles v ON v.driver_id = d.id
             WHERE d.status = $1 AND v.vehicle_type = $2
             ORDER BY d.id, v.id
             LIMIT 1",
            &[
                DatabaseValue::String(DriverStatus::Active.as_ref().to_string()),
                DatabaseValue::String(vehicle_type.as_ref().to_string()),
            ],
        )
        .await?;

    let Some(row) = rows.first() else {
        return Err(LifecycleError::NoDriversAvailable);
    };

    let driver_id: i64 = row
        .to_value("driver_id")
        .map_err(|e| LifecycleError::Conversion {
            message: format!("Failed to parse matched driver id: {e}"),
        })?;
    let vehicle_id: i64 = row
        .to_value("vehicle_id")
        .map_err(|e| LifecycleError::Conversion {
            message: format!("Failed to parse matched vehicle id: {e}"),
        })?;

    Ok((driver_id, vehicle_id))
}

/// Resolves the driver for a trusted creation: the caller's id if it
/// exists, otherwise any existing driver, otherwise a freshly created
/// placeholder driver.
async fn resolve_trusted_driver(
    db: &dyn Database,
    driver_id: Option<i64>,
) -> Result<i64, LifecycleError> {
    if let Some(id) = driver_id {
        let rows = db
            .query_raw_params(
                "SELECT id FROM drivers WHERE id = $1",
                &[DatabaseValue::Int64(id)],
            )
            .await?;
        if !rows.is_empty() {
            return Ok(id);
        }

        log::debug!("driver {id} not found, falling back to any available driver");
    }

    let rows = db
        .query_raw_params("SELECT id FROM drivers ORDER BY id LIMIT 1", &[])
        .await?;
    if let Some(row) = rows.first() {
        return row.to_value("id").map_err(|e| LifecycleError::Conversion {
            message: format!("Failed to parse fallback driver id: {e}"),
        });
    }

    log::debug!("no drivers exist, creating a placeholder driver");

    let password_hash =
        bcrypt::hash("hashedpass", bcrypt::DEFAULT_COST).map_err(|e| LifecycleError::Conversion {
            message: format!("Failed to hash placeholder driver password: {e}"),
        })?;

    let rows = db
        .query_raw_params(
            "INSERT INTO drivers (full_name, email, password, phone, license_no, status, join_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id",
            &[
                DatabaseValue::String(PLACEHOLDER_DRIVER_NAME.to_string()),
                DatabaseValue::String(PLACEHOLDER_DRIVER_EMAIL.to_string()),
                DatabaseValue::String(password_hash),
                DatabaseValue::String(PLACEHOLDER_DRIVER_PHONE.to_string()),
                DatabaseValue::String(PLACEHOLDER_DRIVER_LICENSE.to_string()),
                DatabaseValue::String(DriverStatus::Active.as_ref().to_string()),
                DatabaseValue::String(now_rfc3339()),
            ],
        )
        .await?;

    parse_returned_id(rows.first(), "placeholder driver")
}

/// Returns the driver's first vehicle, creating a default one when the
/// driver has none. Only a Bike request maps the default to a Bike;
/// everything else gets a Car.
async fn first_or_default_vehicle(
    db: &dyn Database,
    driver_id: i64,
    requested: VehicleType,
) -> Result<i64, LifecycleError> {
    let rows = db
        .query_raw_params(
            "SELECT id FROM vehicles WHERE driver_id = $1 ORDER BY id LIMIT 1",
            &[DatabaseValue::Int64(driver_id)],
        )
        .await?;

    if let Some(row) = rows.first() {
        return row.to_value("id").map_err(|e| LifecycleError::Conversion {
            message: format!("Failed to parse vehicle id: {e}"),
        });
    }

    let vehicle_type = if requested == VehicleType::Bike {
        VehicleType::Bike
    } else {
        VehicleType::Car
    };

    let rows = db
        .query_raw_params(
            "INSERT INTO vehicles (driver_id, model, capacity, vehicle_type, created_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
            &[
                DatabaseValue::Int64(driver_id),
                DatabaseValue::String(DEFAULT_VEHICLE_MODEL.to_string()),
                DatabaseValue::Int32(DEFAULT_VEHICLE_CAPACITY),
                DatabaseValue::String(vehicle_type.as_ref().to_string()),
                DatabaseValue::String(now_rfc3339()),
            ],
        )
        .await?;

    parse_returned_id(rows.first(), "default vehicle")
}

async fn insert_ride(
    db: &dyn Database,
    passenger_id: i64,
    driver_id: i64,
    route_id: i64,
    vehicle_id: i64,
    fare: f64,
    status: RideStatus,
) -> Result<i64, LifecycleError> {
    let now = now_rfc3339();

    let rows = db
        .query_raw_params(
            "INSERT INTO rides
                 (passenger_id, driver_id, route_id, vehicle_id, fare, status,
                  created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING id",
            &[
                DatabaseValue::Int64(passenger_id),
                DatabaseValue::Int64(driver_id),
                DatabaseValue::Int64(route_id),
                DatabaseValue::Int64(vehicle_id),
                DatabaseValue::Real64(fare),
                DatabaseValue::String(status.as_ref().to_string()),
                DatabaseValue::String(now.clone()),
                DatabaseValue::String(now),
            ],
        )
        .await?;

    parse_returned_id(rows.first(), "ride")
}

async fn fetch_created_ride(
    db: &dyn Database,
    ride_id: i64,
) -> Result<CreatedRide, LifecycleError> {
    let rows = db
        .query_raw_params(
            "SELECT r.id, r.passenger_id, r.driver_id, r.vehicle_id, r.fare, r.status,
                    r.created_at,
                    rt.start_point, rt.end_point, rt.distance_km, rt.duration_min,
                    d.full_name AS driver_name,
                    v.model AS vehicle_model
             FROM rides r
             JOIN routes rt ON rt.id = r.route_id
             JOIN drivers d ON d.id = r.driver_id
             LEFT JOIN vehicles v ON v.id = r.vehicle_id
             WHERE r.id = $1",
            &[DatabaseValue::Int64(ride_id)],
        )
        .await?;

    let row = rows.first().ok_or_else(|| LifecycleError::Conversion {
        message: format!("Created ride {ride_id} could not be read back"),
    })?;

    Ok(CreatedRide {
        id: ride_id,
        passenger_id: row
            .to_value("passenger_id")
            .map_err(|e| LifecycleError::Conversion {
                message: format!("Failed to parse passenger id: {e}"),
            })?,
        driver_id: row
            .to_value("driver_id")
            .map_err(|e| LifecycleError::Conversion {
                message: format!("Failed to parse driver id: {e}"),
            })?,
        vehicle_id: row.to_value("vehicle_id").unwrap_or(None),
        fare: row.to_value("fare").unwrap_or_default(),
        status: parse_status(&row.to_value::<String>("status").unwrap_or_default())?,
        created_at: row.to_value("created_at").unwrap_or_default(),
        start_point: row.to_value("start_point").unwrap_or_default(),
        end_point: row.to_value("end_point").unwrap_or_default(),
        distance_km: row.to_value("distance_km").unwrap_or_default(),
        duration_min: row.to_value("duration_min").unwrap_or_default(),
        driver_name: row.to_value("driver_name").unwrap_or_default(),
        vehicle_model: row.to_value("vehicle_model").unwrap_or(None),
    })
}

// ---------- transitions ----------

/// Moves a ride along one edge of the state graph.
///
/// Ownership depends on the direction: progress transitions (Accepted,
/// Ongoing, Completed) belong to the assigned driver; Cancelled belongs
/// to the owning passenger. The write is conditional on the status the
/// caller saw, so a concurrent change surfaces as a conflict instead of
/// a lost update.
///
/// # Errors
///
/// * [`LifecycleError::RideNotFound`] if the ride is unknown or owned by
///   someone else.
/// * [`LifecycleError::InvalidTransition`] if the edge is not legal.
/// * [`LifecycleError::Conflict`] if the row changed under the caller.
pub async fn update_status(
    db: &dyn Database,
    ride_id: i64,
    caller_id: i64,
    caller_role: AccountRole,
    new_status: RideStatus,
) -> Result<RideStatus, LifecycleError> {
    let ride = load_ride(db, ride_id).await?.ok_or(LifecycleError::RideNotFound)?;

    let owns = match new_status {
        RideStatus::Cancelled => {
            caller_role == AccountRole::Passenger && caller_id == ride.passenger_id
        }
        _ => caller_role == AccountRole::Driver && caller_id == ride.driver_id,
    };
    if !owns {
        return Err(LifecycleError::RideNotFound);
    }

    if !ride.status.can_transition_to(new_status) {
        return Err(LifecycleError::InvalidTransition {
            from: ride.status,
            to: new_status,
        });
    }

    write_status(db, ride_id, ride.status, new_status).await?;

    Ok(new_status)
}

/// Cancels a passenger's own ride.
///
/// # Errors
///
/// * [`LifecycleError::RideNotFound`] if the ride is unknown or belongs
///   to another passenger.
/// * [`LifecycleError::AlreadyTerminal`] if the ride is Completed or
///   Cancelled.
/// * [`LifecycleError::Conflict`] if the row changed under the caller.
pub async fn cancel_ride(
    db: &dyn Database,
    ride_id: i64,
    passenger_id: i64,
) -> Result<(), LifecycleError> {
    let ride = load_owned_ride(db, ride_id, passenger_id)
        .await?
        .ok_or(LifecycleError::RideNotFound)?;

    if ride.status.is_terminal() {
        return Err(LifecycleError::AlreadyTerminal {
            status: ride.status,
        });
    }

    write_status(db, ride_id, ride.status, RideStatus::Cancelled).await
}

async fn write_status(
    db: &dyn Database,
    ride_id: i64,
    expected: RideStatus,
    new_status: RideStatus,
) -> Result<(), LifecycleError> {
    let affected = db
        .exec_raw_params(
            "UPDATE rides SET status = $1, updated_at = $2 WHERE id = $3 AND status = $4",
            &[
                DatabaseValue::String(new_status.as_ref().to_string()),
                DatabaseValue::String(now_rfc3339()),
                DatabaseValue::Int64(ride_id),
                DatabaseValue::String(expected.as_ref().to_string()),
            ],
        )
        .await?;

    if affected == 0 {
        return Err(LifecycleError::Conflict);
    }

    Ok(())
}

// ---------- rating ----------

/// Records a passenger's rating for their completed ride and refreshes
/// both running averages: the driver's received mean and the passenger's
/// given mean. Insert and recomputes run in one transaction.
///
/// The rating range is left to the table's check constraint.
///
/// # Errors
///
/// * [`LifecycleError::RideNotFound`] if the ride is unknown or belongs
///   to another passenger.
/// * [`LifecycleError::NotCompleted`] if the ride is not Completed.
/// * [`LifecycleError::AlreadyRated`] if feedback already exists.
pub async fn rate_ride(
    db: &dyn Database,
    ride_id: i64,
    passenger_id: i64,
    rating: f64,
    comment: Option<&str>,
) -> Result<Feedback, LifecycleError> {
    let ride = load_owned_ride(db, ride_id, passenger_id)
        .await?
        .ok_or(LifecycleError::RideNotFound)?;

    if ride.status != RideStatus::Completed {
        return Err(LifecycleError::NotCompleted);
    }

    let existing = db
        .query_raw_params(
            "SELECT id FROM feedback WHERE ride_id = $1",
            &[DatabaseValue::Int64(ride_id)],
        )
        .await?;
    if !existing.is_empty() {
        return Err(LifecycleError::AlreadyRated);
    }

    let created_at = now_rfc3339();
    let txn = db.begin_transaction().await?;

    let rows = txn
        .query_raw_params(
            "INSERT INTO feedback (ride_id, passenger_id, driver_id, rating, comment, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
            &[
                DatabaseValue::Int64(ride_id),
                DatabaseValue::Int64(passenger_id),
                DatabaseValue::Int64(ride.driver_id),
                DatabaseValue::Real64(rating),
                comment.map_or(DatabaseValue::Null, |c| DatabaseValue::String(c.to_string())),
                DatabaseValue::String(created_at.clone()),
            ],
        )
        .await?;
    let feedback_id = parse_returned_id(rows.first(), "feedback")?;

    txn.exec_raw_params(
        "UPDATE drivers
         SET avg_rating = (SELECT AVG(rating) FROM feedback WHERE driver_id = $1)
         WHERE id = $2",
        &[
            DatabaseValue::Int64(ride.driver_id),
            DatabaseValue::Int64(ride.driver_id),
        ],
    )
    .await?;

    txn.exec_raw_params(
        "UPDATE passengers
         SET avg_rating_given = (SELECT AVG(rating) FROM feedback WHERE passenger_id = $1)
         WHERE id = $2",
        &[
            DatabaseValue::Int64(passenger_id),
            DatabaseValue::Int64(passenger_id),
        ],
    )
    .await?;

    txn.commit().await?;

    Ok(Feedback {
        id: feedback_id,
        ride_id,
        passenger_id,
        driver_id: ride.driver_id,
        rating,
        comment: comment.map(ToString::to_string),
        created_at,
    })
}

// ---------- listings ----------

/// A passenger's rides, newest first, joined for display.
///
/// # Errors
///
/// * [`LifecycleError::Database`] if the query fails.
/// * [`LifecycleError::Conversion`] if a row cannot be parsed.
pub async fn ride_history(
    db: &dyn Database,
    passenger_id: i64,
) -> Result<Vec<RideHistoryEntry>, LifecycleError> {
    let rows = db
        .query_raw_params(
            "SELECT r.id, r.fare, r.status, r.created_at AS date,
                    d.full_name AS driver_name,
                    v.model AS vehicle_model,
                    ro.start_point, ro.end_point
             FROM rides r
             JOIN drivers d ON d.id = r.driver_id
             JOIN vehicles v ON v.id = r.vehicle_id
             JOIN routes ro ON ro.id = r.route_id
             WHERE r.passenger_id = $1
             ORDER BY r.created_at DESC",
            &[DatabaseValue::Int64(passenger_id)],
        )
        .await?;

    rows.iter()
        .map(|row| {
            Ok(RideHistoryEntry {
                id: row.to_value("id").map_err(|e| LifecycleError::Conversion {
                    message: format!("Failed to parse ride id: {e}"),
                })?,
                fare: row.to_value("fare").unwrap_or_default(),
                status: parse_status(&row.to_value::<String>("status").unwrap_or_default())?,
                date: row.to_value("date").unwrap_or_default(),
                driver_name: row.to_value("driver_name").unwrap_or_default(),
                vehicle_model: row.to_value("vehicle_model").unwrap_or_default(),
                start_point: row.to_value("start_point").unwrap_or_default(),
                end_point: row.to_value("end_point").unwrap_or_default(),
            })
        })
        .collect()
}

/// All rides still in flight: Requested, Accepted, or Ongoing. Completed
/// and Cancelled rides are settled and excluded.
///
/// # Errors
///
/// * [`LifecycleError::Database`] if the query fails.
/// * [`LifecycleError::Conversion`] if a row cannot be parsed.
pub async fn active_rides(db: &dyn Database) -> Result<Vec<Ride>, LifecycleError> {
    let rows = db
        .query_raw_params(
            "SELECT id, passenger_id, driver_id, route_id, vehicle_id, promo_id,
                    fare, status, created_at, updated_at
             FROM rides
             WHERE status IN ($1, $2, $3)
             ORDER BY id",
            &[
                DatabaseValue::String(RideStatus::Requested.as_ref().to_string()),
                DatabaseValue::String(RideStatus::Accepted.as_ref().to_string()),
                DatabaseValue::String(RideStatus::Ongoing.as_ref().to_string()),
            ],
        )
        .await?;

    rows.iter().map(parse_ride).collect()
}

/// One ride joined with passenger, driver, vehicle, and route for
/// display.
///
/// # Errors
///
/// * [`LifecycleError::RideNotFound`] if the ride is unknown.
/// * [`LifecycleError::Database`] if the query fails.
pub async fn ride_detail(db: &dyn Database, ride_id: i64) -> Result<RideDetail, LifecycleError> {
    let rows = db
        .query_raw_params(
            "SELECT r.id, p.full_name AS passenger_name, d.full_name AS driver_name,
                    v.model AS vehicle_model,
                    rt.start_point, rt.end_point,
                    r.fare, r.status, r.created_at
             FROM rides r
             JOIN passengers p ON p.id = r.passenger_id
             JOIN drivers d ON d.id = r.driver_id
             JOIN vehicles v ON v.id = r.vehicle_id
             JOIN routes rt ON rt.id = r.route_id
             WHERE r.id = $1",
            &[DatabaseValue::Int64(ride_id)],
        )
        .await?;

    let Some(row) = rows.first() else {
        return Err(LifecycleError::RideNotFound);
    };

    Ok(RideDetail {
        id: ride_id,
        passenger_name: row.to_value("passenger_name").unwrap_or_default(),
        driver_name: row.to_value("driver_name").unwrap_or_default(),
        vehicle_model: row.to_value("vehicle_model").unwrap_or(None),
        start_point: row.to_value("start_point").unwrap_or_default(),
        end_point: row.to_value("end_point").unwrap_or_default(),
        fare: row.to_value("fare").unwrap_or_default(),
        status: parse_status(&row.to_value::<String>("status").unwrap_or_default())?,
        created_at: row.to_value("created_at").unwrap_or_default(),
    })
}

// ---------- internals ----------

async fn load_ride(db: &dyn Database, ride_id: i64) -> Result<Option<Ride>, LifecycleError> {
    let rows = db
        .query_raw_params(
            "SELECT id, passenger_id, driver_id, route_id, vehicle_id, promo_id,
                    fare, status, created_at, updated_at
             FROM rides
             WHERE id = $1",
            &[DatabaseValue::Int64(ride_id)],
        )
        .await?;

    rows.first().map(parse_ride).transpose()
}

async fn load_owned_ride(
    db: &dyn Database,
    ride_id: i64,
    passenger_id: i64,
) -> Result<Option<Ride>, LifecycleError> {
    let rows = db
        .query_raw_params(
            "SELECT id, passenger_id, driver_id, route_id, vehicle_id, promo_id,
                    fare, status, created_at, updated_at
             FROM rides
             WHERE id = $1 AND passenger_id = $2",
            &[
                DatabaseValue::Int64(ride_id),
                DatabaseValue::Int64(passenger_id),
            ],
        )
        .await?;

    rows.first().map(parse_ride).transpose()
}

fn parse_ride(row: &switchy_database::Row) -> Result<Ride, LifecycleError> {
    Ok(Ride {
        id: row.to_value("id").map_err(|e| LifecycleError::Conversion {
            message: format!("Failed to parse ride id: {e}"),
        })?,
        passenger_id: row
            .to_value("passenger_id")
            .map_err(|e| LifecycleError::Conversion {
                message: format!("Failed to parse passenger id: {e}"),
            })?,
        driver_id: row
            .to_value("driver_id")
            .map_err(|e| LifecycleError::Conversion {
                message: format!("Failed to parse driver id: {e}"),
            })?,
        route_id: row
            .to_value("route_id")
            .map_err(|e| LifecycleError::Conversion {
                message: format!("Failed to parse route id: {e}"),
            })?,
        vehicle_id: row.to_value("vehicle_id").unwrap_or(None),
        promo_id: row.to_value("promo_id").unwrap_or(None),
        fare: row.to_value("fare").unwrap_or_default(),
        status: parse_status(&row.to_value::<String>("status").unwrap_or_default())?,
        created_at: row.to_value("created_at").unwrap_or_default(),
        updated_at: row.to_value("updated_at").unwrap_or_default(),
    })
}

fn parse_status(value: &str) -> Result<RideStatus, LifecycleError> {
    value
        .parse::<RideStatus>()
        .map_err(|e| LifecycleError::Conversion {
            message: format!("Unknown ride status '{value}': {e}"),
        })
}

fn parse_returned_id(
    row: Option<&switchy_database::Row>,
    entity: &str,
) -> Result<i64, LifecycleError> {
    let row = row.ok_or_else(|| LifecycleError::Conversion {
        message: format!("Failed to get {entity} id from insert"),
    })?;

    row.to_value("id").map_err(|e| LifecycleError::Conversion {
        message: format!("Failed to parse {entity} id: {e}"),
    })
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
