#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! `SQLite` store lifecycle for the rideway platform.
//!
//! Owns opening the database file and creating the schema; every table
//! the platform uses is defined here. Domain packages (`accounts`,
//! `lifecycle`, `payments`, `analytics`) run their own queries against
//! the [`Database`] handle this package hands out.
//!
//! Uses `switchy_database` for all database operations.

use std::path::Path;

use moosicbox_json_utils::database::ToValue as _;
use switchy_database::Database;
use switchy_database_connection::init_sqlite_rusqlite;
use thiserror::Error;

/// Default path for the platform database.
pub const DEFAULT_DB_PATH: &str = "data/rideway.db";

/// Errors from store lifecycle operations.
#[derive(Debug, Error)]
pub enum DbError {
    /// A database query or command failed.
    #[error("Database error: {0}")]
    Database(#[from] switchy_database::DatabaseError),

    /// Opening the database file failed.
    #[error("Database connection error: {message}")]
    Connect {
        /// Description of what went wrong.
        message: String,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Data conversion error.
    #[error("Data conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

/// Opens (or creates) the rideway `SQLite` database and ensures the
/// schema exists.
///
/// # Errors
///
/// Returns [`DbError`] if the database cannot be opened or schema
/// creation fails.
pub async fn open_db(path: &Path) -> Result<Box<dyn Database>, DbError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db = init_sqlite_rusqlite(Some(path)).map_err(|e| DbError::Connect {
        message: e.to_string(),
    })?;

    ensure_schema(db.as_ref()).await?;

    log::debug!("opened database at {}", path.display());

    Ok(db)
}

/// Verifies the store answers a trivial query.
///
/// # Errors
///
/// Returns [`DbError`] if the store is unreachable or returns garbage.
pub async fn health_check(db: &dyn Database) -> Result<(), DbError> {
    let rows = db.query_raw_params("SELECT 1 AS test", &[]).await?;

    let row = rows.first().ok_or_else(|| DbError::Conversion {
        message: "health query returned no rows".to_string(),
    })?;

    let value: i64 = row.to_value("test").map_err(|e| DbError::Conversion {
        message: format!("Failed to parse health query result: {e}"),
    })?;

    if value == 1 {
        Ok(())
    } else {
        Err(DbError::Conversion {
            message: format!("health query returned {value}"),
        })
    }
}

/// Creates all tables and indexes if they don't already exist.
async fn ensure_schema(db: &dyn Database) -> Result<(), DbError> {
    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS passengers (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            full_name        TEXT NOT NULL,
            phone            TEXT NOT NULL UNIQUE,
            email            TEXT NOT NULL UNIQUE,
            password         TEXT NOT NULL,
            avg_rating_given REAL CHECK (avg_rating_given BETWEEN 0 AND 5)
        )",
    )
    .await?;

    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS drivers (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            full_name  TEXT NOT NULL,
            license_no TEXT NOT NULL UNIQUE,
            phone      TEXT NOT NULL UNIQUE,
            email      TEXT NOT NULL UNIQUE,
            password   TEXT NOT NULL,
            status     TEXT NOT NULL DEFAULT 'Active'
                       CHECK (status IN ('Active', 'Inactive', 'Suspended')),
            join_date  TEXT NOT NULL,
            avg_rating REAL CHECK (avg_rating BETWEEN 0 AND 5)
        )",
    )
    .await?;

    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS vehicles (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            driver_id    INTEGER NOT NULL REFERENCES drivers(id),
            model        TEXT NOT NULL,
            capacity     INTEGER NOT NULL CHECK (capacity > 0),
            vehicle_type TEXT NOT NULL
                         CHECK (vehicle_type IN ('Car', 'Bike', 'Auto', 'SUV', 'Luxury')),
            created_at   TEXT NOT NULL
        )",
    )
    .await?;

    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS routes (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            start_point  TEXT NOT NULL,
            end_point    TEXT NOT NULL,
            distance_km  REAL NOT NULL CHECK (distance_km > 0),
            duration_min INTEGER NOT NULL CHECK (duration_min > 0)
        )",
    )
    .await?;

    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS promos (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            code             TEXT NOT NULL UNIQUE,
            description      TEXT,
            expiry_date      TEXT NOT NULL,
            discount_percent REAL CHECK (discount_percent BETWEEN 0 AND 100),
            min_fare         REAL,
            created_at       TEXT NOT NULL
        )",
    )
    .await?;

    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS rides (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            passenger_id INTEGER NOT NULL REFERENCES passengers(id),
            driver_id    INTEGER NOT NULL REFERENCES drivers(id),
            route_id     INTEGER NOT NULL REFERENCES routes(id),
            vehicle_id   INTEGER REFERENCES vehicles(id),
            promo_id     INTEGER REFERENCES promos(id),
            fare         REAL NOT NULL CHECK (fare >= 0),
            status       TEXT NOT NULL DEFAULT 'Requested'
                         CHECK (status IN
                             ('Requested', 'Accepted', 'Ongoing', 'Completed', 'Cancelled')),
            created_at   TEXT NOT NULL,
            updated_at   TEXT NOT NULL
        )",
    )
    .await?;

    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS payments (
            id      INTEGER PRIMARY KEY AUTOINCREMENT,
            ride_id INTEGER NOT NULL UNIQUE REFERENCES rides(id),
            amount  REAL NOT NULL CHECK (amount >= 0),
            mode    TEXT NOT NULL CHECK (mode IN ('Cash', 'Card', 'UPI', 'Wallet')),
            status  TEXT NOT NULL DEFAULT 'Pending'
                    CHECK (status IN ('Pending', 'Successful', 'Failed', 'Refunded')),
            paid_at TEXT NOT NULL
        )",
    )
    .await?;

    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS feedback (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            ride_id      INTEGER NOT NULL REFERENCES rides(id),
            passenger_id INTEGER NOT NULL REFERENCES passengers(id),
            driver_id    INTEGER NOT NULL REFERENCES drivers(id),
            rating       REAL NOT NULL CHECK (rating BETWEEN 0 AND 5),
            comment      TEXT,
            created_at   TEXT NOT NULL
        )",
    )
    .await?;

    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS accidents (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            ride_id      INTEGER NOT NULL REFERENCES rides(id),
            occurred_at  TEXT NOT NULL,
            description  TEXT NOT NULL,
            claim_status TEXT NOT NULL DEFAULT 'Open'
                         CHECK (claim_status IN ('Open', 'InProgress', 'Closed')),
            severity     TEXT NOT NULL DEFAULT 'Minor'
                         CHECK (severity IN ('Minor', 'Major', 'Critical'))
        )",
    )
    .await?;

    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS traffic_reports (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            route_id    INTEGER NOT NULL REFERENCES routes(id),
            reported_at TEXT NOT NULL,
            severity    TEXT NOT NULL DEFAULT 'Low'
                        CHECK (severity IN ('Low', 'Medium', 'High'))
        )",
    )
    .await?;

    db.exec_raw(
        "CREATE INDEX IF NOT EXISTS idx_rides_passenger
         ON rides (passenger_id, created_at)",
    )
    .await?;

    db.exec_raw("CREATE INDEX IF NOT EXISTS idx_rides_driver ON rides (driver_id)")
        .await?;

    db.exec_raw("CREATE INDEX IF NOT EXISTS idx_rides_status ON rides (status)")
        .await?;

    db.exec_raw("CREATE INDEX IF NOT EXISTS idx_vehicles_driver ON vehicles (driver_id)")
        .await?;

    db.exec_raw(
        "CREATE INDEX IF NOT EXISTS idx_routes_endpoints
         ON routes (start_point, end_point)",
    )
    .await?;

    db.exec_raw("CREATE INDEX IF NOT EXISTS idx_feedback_ride ON feedback (ride_id)")
        .await?;

    db.exec_raw("CREATE INDEX IF NOT EXISTS idx_feedback_driver ON feedback (driver_id)")
        .await?;

    db.exec_raw(
        "CREATE INDEX IF NOT EXISTS idx_feedback_passenger
         ON feedback (passenger_id)",
    )
    .await?;

    db.exec_raw("CREATE INDEX IF NOT EXISTS idx_accidents_ride ON accidents (ride_id)")
        .await?;

    db.exec_raw(
        "CREATE INDEX IF NOT EXISTS idx_traffic_reports_route
         ON traffic_reports (route_id)",
    )
    .await?;

    // Enable foreign key enforcement (SQLite has it off by default)
    db.exec_raw("PRAGMA foreign_keys = ON").await?;

    Ok(())
}
