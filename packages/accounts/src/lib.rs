#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Account management for passengers and drivers.
//!
//! Registration, login, and profile reads share one credential space: an
//! email may exist in either the passenger or the driver table, never both.
//! The role is derived at login from which table matched.

use moosicbox_json_utils::database::ToValue as _;
use rideway_auth::{AuthError, AuthUser, TokenCodec};
use rideway_database_models::{Driver, StoredCredentials, Vehicle};
use rideway_ride_models::{AccountRole, DriverStatus, VehicleType};
use serde::{Deserialize, Serialize};
use switchy_database::{Database, DatabaseError, DatabaseValue};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccountsError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The email is already registered, in either table.
    #[error("User already exists")]
    EmailTaken,

    /// Unknown email or wrong password. Deliberately indistinguishable.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("{message}")]
    Validation { message: String },

    #[error("Data conversion error: {message}")]
    Conversion { message: String },
}

/// Details submitted when creating an account.
#[derive(Debug, Clone)]
pub struct Registration {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub role: AccountRole,
    /// Required when `role` is [`AccountRole::Driver`].
    pub license_no: Option<String>,
}

/// A freshly created account and its session token.
#[derive(Debug, Clone)]
pub struct RegisteredAccount {
    pub id: i64,
    pub token: String,
}

/// A successful login: the token plus the identity echoed back to the
/// client.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: AccountRole,
}

/// The caller's own account as returned by `GET /api/auth/me`.
///
/// `rating` is the averaged feedback score: ratings received for drivers,
/// ratings given for passengers. `status` is only present for drivers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DriverStatus>,
    #[serde(rename = "type")]
    pub role: AccountRole,
}

/// A passenger profile as exposed on the profile endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassengerProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub rating: Option<f64>,
}

// ---------- registration and login ----------

/// Creates an account in the table matching the requested role and returns
/// a session token for it.
///
/// # Errors
///
/// * [`AccountsError::EmailTaken`] if the email exists in either table.
/// * [`AccountsError::Validation`] if a driver registers without a license
///   number.
/// * [`AccountsError::Database`] if a query fails.
pub async fn register(
    db: &dyn Database,
    codec: &TokenCodec,
    registration: &Registration,
) -> Result<RegisteredAccount, AccountsError> {
    if email_exists(db, &registration.email).await? {
        return Err(AccountsError::EmailTaken);
    }

    let password_hash = rideway_auth::hash_password(&registration.password)?;

    let id = match registration.role {
        AccountRole::Passenger => insert_passenger(db, registration, &password_hash).await?,
        AccountRole::Driver => {
            let Some(license_no) = registration.license_no.as_deref() else {
                return Err(AccountsError::Validation {
                    message: "License number is required for drivers".to_string(),
                });
            };

            insert_driver(
                db,
                &registration.full_name,
                &registration.email,
                &registration.phone,
                license_no,
                &password_hash,
            )
            .await?
        }
    };

    let token = codec.issue(id, registration.role)?;

    Ok(RegisteredAccount { id, token })
}

/// Checks credentials against both account tables and issues a token.
///
/// The role comes from which table held the email: rows with a license
/// number are drivers.
///
/// # Errors
///
/// * [`AccountsError::InvalidCredentials`] if the email is unknown or the
///   password does not match.
/// * [`AccountsError::Database`] if a query fails.
pub async fn login(
    db: &dyn Database,
    codec: &TokenCodec,
    email: &str,
    password: &str,
) -> Result<LoginOutcome, AccountsError> {
    let rows = db
        .query_raw_params(
            "SELECT id, full_name, email, password, NULL AS license_no
             FROM passengers WHERE email = $1
             UNION
             SELECT id, full_name, email, password, license_no
             FROM drivers WHERE email = $2",
            &[
                DatabaseValue::String(email.to_string()),
                DatabaseValue::String(email.to_string()),
            ],
        )
        .await?;

    let Some(row) = rows.first() else {
        return Err(AccountsError::InvalidCredentials);
    };

    let credentials = StoredCredentials {
        id: row.to_value("id").map_err(|e| AccountsError::Conversion {
            message: format!("Failed to parse account id: {e}"),
        })?,
        full_name: row.to_value("full_name").unwrap_or_default(),
        email: row.to_value("email").unwrap_or_default(),
        password_hash: row.to_value("password").unwrap_or_default(),
        license_no: row.to_value("license_no").unwrap_or(None),
    };

    if !rideway_auth::verify_password(password, &credentials.password_hash)? {
        return Err(AccountsError::InvalidCredentials);
    }

    let role = if credentials.license_no.is_some() {
        AccountRole::Driver
    } else {
        AccountRole::Passenger
    };
    let token = codec.issue(credentials.id, role)?;

    Ok(LoginOutcome {
        token,
        id: credentials.id,
        name: credentials.full_name,
        email: credentials.email,
        role,
    })
}

/// Loads the authenticated caller's own profile from the table matching
/// their role.
///
/// # Errors
///
/// * [`AccountsError::NotFound`] if the account row no longer exists.
/// * [`AccountsError::Database`] if a query fails.
pub async fn get_me(db: &dyn Database, user: AuthUser) -> Result<AccountProfile, AccountsError> {
    let sql = match user.role {
        AccountRole::Passenger => {
            "SELECT id, full_name AS name, email, phone, avg_rating_given AS rating
             FROM passengers WHERE id = $1"
        }
        AccountRole::Driver => {
            "SELECT id, full_name AS name, email, phone, avg_rating AS rating, status
             FROM drivers WHERE id = $1"
        }
    };

    let rows = db
        .query_raw_params(sql, &[DatabaseValue::Int64(user.id)])
        .await?;

    let Some(row) = rows.first() else {
        return Err(AccountsError::NotFound { entity: "User" });
    };

    let status = match user.role {
        AccountRole::Passenger => None,
        AccountRole::Driver => Some(parse_driver_status(row)?),
    };

    Ok(AccountProfile {
        id: user.id,
        name: row.to_value("name").unwrap_or_default(),
        email: row.to_value("email").unwrap_or_default(),
        phone: row.to_value("phone").unwrap_or_default(),
        rating: row.to_value("rating").unwrap_or(None),
        status,
        role: user.role,
    })
}

// ---------- passenger profiles ----------

/// # Errors
///
/// * [`AccountsError::NotFound`] if no passenger has this id.
/// * [`AccountsError::Database`] if a query fails.
pub async fn get_passenger_profile(
    db: &dyn Database,
    passenger_id: i64,
) -> Result<PassengerProfile, AccountsError> {
    let rows = db
        .query_raw_params(
            "SELECT id, full_name AS name, email, phone, avg_rating_given AS rating
             FROM passengers WHERE id = $1",
            &[DatabaseValue::Int64(passenger_id)],
        )
        .await?;

    let Some(row) = rows.first() else {
        return Err(AccountsError::NotFound { entity: "Passenger" });
    };

    Ok(PassengerProfile {
        id: passenger_id,
        name: row.to_value("name").unwrap_or_default(),
        email: row.to_value("email").unwrap_or_default(),
        phone: row.to_value("phone").unwrap_or_default(),
        rating: row.to_value("rating").unwrap_or(None),
    })
}

/// Updates the mutable passenger fields and returns the refreshed profile.
/// Email is immutable since it identifies the account.
///
/// # Errors
///
/// * [`AccountsError::NotFound`] if no passenger has this id.
/// * [`AccountsError::Database`] if a query fails.
pub async fn update_passenger_profile(
    db: &dyn Database,
    passenger_id: i64,
    name: &str,
    phone: &str,
) -> Result<PassengerProfile, AccountsError> {
    let affected = db
        .exec_raw_params(
            "UPDATE passengers SET full_name = $1, phone = $2 WHERE id = $3",
            &[
                DatabaseValue::String(name.to_string()),
                DatabaseValue::String(phone.to_string()),
                DatabaseValue::Int64(passenger_id),
            ],
        )
        .await?;

    if affected == 0 {
        return Err(AccountsError::NotFound { entity: "Passenger" });
    }

    get_passenger_profile(db, passenger_id).await
}

// ---------- drivers ----------

/// Registers a driver without issuing a session token. The driver signs in
/// through the regular login afterwards.
///
/// # Errors
///
/// * [`AccountsError::EmailTaken`] if the email exists in either table.
/// * [`AccountsError::Database`] if a query fails.
pub async fn register_driver(
    db: &dyn Database,
    full_name: &str,
    email: &str,
    phone: &str,
    license_no: &str,
    password: &str,
) -> Result<i64, AccountsError> {
    if email_exists(db, email).await? {
        return Err(AccountsError::EmailTaken);
    }

    let password_hash = rideway_auth::hash_password(password)?;

    insert_driver(db, full_name, email, phone, license_no, &password_hash).await
}

/// Loads a driver's public profile. The password hash is never part of it.
///
/// # Errors
///
/// * [`AccountsError::NotFound`] if no driver has this id.
/// * [`AccountsError::Database`] if a query fails.
pub async fn get_driver_profile(db: &dyn Database, driver_id: i64) -> Result<Driver, AccountsError> {
    let rows = db
        .query_raw_params(
            "SELECT id, full_name, email, phone, license_no, status, avg_rating, join_date
             FROM drivers WHERE id = $1",
            &[DatabaseValue::Int64(driver_id)],
        )
        .await?;

    let Some(row) = rows.first() else {
        return Err(AccountsError::NotFound { entity: "Driver" });
    };

    Ok(Driver {
        id: driver_id,
        full_name: row.to_value("full_name").unwrap_or_default(),
        email: row.to_value("email").unwrap_or_default(),
        phone: row.to_value("phone").unwrap_or_default(),
        license_no: row.to_value("license_no").unwrap_or_default(),
        status: parse_driver_status(row)?,
        avg_rating: row.to_value("avg_rating").unwrap_or(None),
        join_date: row.to_value("join_date").unwrap_or_default(),
    })
}

/// Sets a driver's availability status.
///
/// # Errors
///
/// * [`AccountsError::NotFound`] if no driver has this id.
/// * [`AccountsError::Database`] if a query fails.
pub async fn update_driver_status(
    db: &dyn Database,
    driver_id: i64,
    status: DriverStatus,
) -> Result<(), AccountsError> {
    let affected = db
        .exec_raw_params(
            "UPDATE drivers SET status = $1 WHERE id = $2",
            &[
                DatabaseValue::String(status.as_ref().to_string()),
                DatabaseValue::Int64(driver_id),
            ],
        )
        .await?;

    if affected == 0 {
        return Err(AccountsError::NotFound { entity: "Driver" });
    }

    Ok(())
}

// ---------- vehicles ----------

/// Adds a vehicle to a driver's fleet and returns its id.
///
/// # Errors
///
/// * [`AccountsError::Validation`] if the capacity is not positive.
/// * [`AccountsError::Database`] if a query fails.
pub async fn add_vehicle(
    db: &dyn Database,
    driver_id: i64,
    model: &str,
    capacity: i32,
    vehicle_type: VehicleType,
) -> Result<i64, AccountsError> {
    if capacity <= 0 {
        return Err(AccountsError::Validation {
            message: "Capacity must be a positive number".to_string(),
        });
    }

    let rows = db
        .query_raw_params(
            "INSERT INTO vehicles (driver_id, model, capacity, vehicle_type, created_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
            &[
                DatabaseValue::Int64(driver_id),
                DatabaseValue::String(model.to_string()),
                DatabaseValue::Int32(capacity),
                DatabaseValue::String(vehicle_type.as_ref().to_string()),
                DatabaseValue::String(chrono::Utc::now().to_rfc3339()),
            ],
        )
        .await?;

    parse_returned_id(rows.first(), "vehicle")
}

/// Lists every vehicle registered to a driver.
///
/// # Errors
///
/// * [`AccountsError::Database`] if a query fails.
/// * [`AccountsError::Conversion`] if a row cannot be parsed.
pub async fn driver_vehicles(
    db: &dyn Database,
    driver_id: i64,
) -> Result<Vec<Vehicle>, AccountsError> {
    let rows = db
        .query_raw_params(
            "SELECT id, driver_id, model, capacity, vehicle_type, created_at
             FROM vehicles WHERE driver_id = $1",
            &[DatabaseValue::Int64(driver_id)],
        )
        .await?;

    rows.iter()
        .map(|row| {
            let vehicle_type: String =
                row.to_value("vehicle_type")
                    .map_err(|e| AccountsError::Conversion {
                        message: format!("Failed to parse vehicle type: {e}"),
                    })?;

            Ok(Vehicle {
                id: row.to_value("id").map_err(|e| AccountsError::Conversion {
                    message: format!("Failed to parse vehicle id: {e}"),
                })?,
                driver_id,
                model: row.to_value("model").unwrap_or_default(),
                capacity: row.to_value("capacity").unwrap_or_default(),
                vehicle_type: vehicle_type
                    .parse::<VehicleType>()
                    .map_err(|e| AccountsError::Conversion {
                        message: format!("Unknown vehicle type '{vehicle_type}': {e}"),
                    })?,
                created_at: row.to_value("created_at").unwrap_or_default(),
            })
        })
        .collect()
}

// ---------- internals ----------

async fn email_exists(db: &dyn Database, email: &str) -> Result<bool, AccountsError> {
    let rows = db
        .query_raw_params(
            "SELECT email FROM passengers WHERE email = $1
             UNION
             SELECT email FROM drivers WHERE email = $2",
            &[
                DatabaseValue::String(email.to_string()),
                DatabaseValue::String(email.to_string()),
            ],
        )
        .await?;

    Ok(!rows.is_empty())
}

async fn insert_passenger(
    db: &dyn Database,
    registration: &Registration,
    password_hash: &str,
) -> Result<i64, AccountsError> {
    let rows = db
        .query_raw_params(
            "INSERT INTO passengers (full_name, email, password, phone)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
            &[
                DatabaseValue::String(registration.full_name.clone()),
                DatabaseValue::String(registration.email.clone()),
                DatabaseValue::String(password_hash.to_string()),
                DatabaseValue::String(registration.phone.clone()),
            ],
        )
        .await?;

    parse_returned_id(rows.first(), "passenger")
}

async fn insert_driver(
    db: &dyn Database,
    full_name: &str,
    email: &str,
    phone: &str,
    license_no: &str,
    password_hash: &str,
) -> Result<i64, AccountsError> {
    let rows = db
        .query_raw_params(
            "INSERT INTO drivers (full_name, email, password, phone, license_no, status, join_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id",
            &[
                DatabaseValue::String(full_name.to_string()),
                DatabaseValue::String(email.to_string()),
                DatabaseValue::String(password_hash.to_string()),
                DatabaseValue::String(phone.to_string()),
                DatabaseValue::String(license_no.to_string()),
                DatabaseValue::String(DriverStatus::Active.as_ref().to_string()),
                DatabaseValue::String(chrono::Utc::now().to_rfc3339()),
            ],
        )
        .await?;

    parse_returned_id(rows.first(), "driver")
}

fn parse_returned_id(
    row: Option<&switchy_database::Row>,
    entity: &str,
) -> Result<i64, AccountsError> {
    let row = row.ok_or_else(|| AccountsError::Conversion {
        message: format!("Failed to get {entity} id from insert"),
    })?;

    row.to_value("id").map_err(|e| AccountsError::Conversion {
        message: format!("Failed to parse {entity} id: {e}"),
    })
}

fn parse_driver_status(row: &switchy_database::Row) -> Result<DriverStatus, AccountsError> {
    let status: String = row
        .to_value("status")
        .map_err(|e| AccountsError::Conversion {
            message: format!("Failed to parse driver status: {e}"),
        })?;

    status
        .parse::<DriverStatus>()
        .map_err(|e| AccountsError::Conversion {
            message: format!("Unknown driver status '{status}': {e}"),
        })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use switchy_database::Database;

    use super::*;

    async fn test_db(name: &str) -> (PathBuf, Box<dyn Database>) {
        let tmp = std::env::temp_dir().join(name);
        let _ = std::fs::remove_dir_all(&tmp);

        let db = rideway_database::open_db(&tmp.join("rideway.db"))
            .await
            .unwrap();

        (tmp, db)
    }

    fn passenger_registration(email: &str) -> Registration {
        Registration {
            full_name: "Amit Sharma".to_string(),
            email: email.to_string(),
            password: "password123".to_string(),
            phone: "9876543210".to_string(),
            role: AccountRole::Passenger,
            license_no: None,
        }
    }

    fn driver_registration(email: &str, license_no: &str) -> Registration {
        Registration {
            full_name: "Rahul Verma".to_string(),
            email: email.to_string(),
            password: "password123".to_string(),
            phone: "9123456780".to_string(),
            role: AccountRole::Driver,
            license_no: Some(license_no.to_string()),
        }
    }

    #[tokio::test]
    async fn register_issues_a_token_for_the_new_account() {
        let (tmp, db) = test_db("rideway_accounts_test_register").await;
        let codec = TokenCodec::new("accounts-test");

        let account = register(
            db.as_ref(),
            &codec,
            &passenger_registration("amit@example.com"),
        )
        .await
        .unwrap();

        let user = codec.verify(&account.token).unwrap();
        assert_eq!(user.id, account.id);
        assert_eq!(user.role, AccountRole::Passenger);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email_across_tables() {
        let (tmp, db) = test_db("rideway_accounts_test_duplicate").await;
        let codec = TokenCodec::new("accounts-test");

        register(
            db.as_ref(),
            &codec,
            &passenger_registration("taken@example.com"),
        )
        .await
        .unwrap();

        let result = register(
            db.as_ref(),
            &codec,
            &driver_registration("taken@example.com", "DL-01-1234"),
        )
        .await;
        assert!(matches!(result, Err(AccountsError::EmailTaken)));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn register_requires_license_for_drivers() {
        let (tmp, db) = test_db("rideway_accounts_test_license").await;
        let codec = TokenCodec::new("accounts-test");

        let mut registration = driver_registration("rahul@example.com", "unused");
        registration.license_no = None;

        let result = register(db.as_ref(), &codec, &registration).await;
        assert!(matches!(result, Err(AccountsError::Validation { .. })));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn login_derives_role_from_matching_table() {
        let (tmp, db) = test_db("rideway_accounts_test_login").await;
        let codec = TokenCodec::new("accounts-test");

        register(
            db.as_ref(),
            &codec,
            &driver_registration("rahul@example.com", "DL-01-1234"),
        )
        .await
        .unwrap();

        let outcome = login(db.as_ref(), &codec, "rahul@example.com", "password123")
            .await
            .unwrap();
        assert_eq!(outcome.role, AccountRole::Driver);
        assert_eq!(outcome.name, "Rahul Verma");
        assert_eq!(outcome.email, "rahul@example.com");
        assert_eq!(codec.verify(&outcome.token).unwrap().id, outcome.id);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn login_rejects_wrong_password_and_unknown_email() {
        let (tmp, db) = test_db("rideway_accounts_test_bad_login").await;
        let codec = TokenCodec::new("accounts-test");

        register(
            db.as_ref(),
            &codec,
            &passenger_registration("amit@example.com"),
        )
        .await
        .unwrap();

        let wrong_password = login(db.as_ref(), &codec, "amit@example.com", "password124").await;
        assert!(matches!(
            wrong_password,
            Err(AccountsError::InvalidCredentials)
        ));

        let unknown = login(db.as_ref(), &codec, "nobody@example.com", "password123").await;
        assert!(matches!(unknown, Err(AccountsError::InvalidCredentials)));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn get_me_includes_status_only_for_drivers() {
        let (tmp, db) = test_db("rideway_accounts_test_me").await;
        let codec = TokenCodec::new("accounts-test");

        let passenger = register(
            db.as_ref(),
            &codec,
            &passenger_registration("amit@example.com"),
        )
        .await
        .unwrap();
        let driver = register(
            db.as_ref(),
            &codec,
            &driver_registration("rahul@example.com", "DL-01-1234"),
        )
        .await
        .unwrap();

        let me = get_me(
            db.as_ref(),
            AuthUser {
                id: passenger.id,
                role: AccountRole::Passenger,
            },
        )
        .await
        .unwrap();
        assert_eq!(me.status, None);
        assert_eq!(me.role, AccountRole::Passenger);
        assert_eq!(me.rating, None);

        let me = get_me(
            db.as_ref(),
            AuthUser {
                id: driver.id,
                role: AccountRole::Driver,
            },
        )
        .await
        .unwrap();
        assert_eq!(me.status, Some(DriverStatus::Active));
        assert_eq!(me.role, AccountRole::Driver);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn update_passenger_profile_persists_and_returns_refreshed_row() {
        let (tmp, db) = test_db("rideway_accounts_test_profile").await;
        let codec = TokenCodec::new("accounts-test");

        let account = register(
            db.as_ref(),
            &codec,
            &passenger_registration("amit@example.com"),
        )
        .await
        .unwrap();

        let updated =
            update_passenger_profile(db.as_ref(), account.id, "Amit S. Sharma", "9000000000")
                .await
                .unwrap();
        assert_eq!(updated.name, "Amit S. Sharma");
        assert_eq!(updated.phone, "9000000000");
        assert_eq!(updated.email, "amit@example.com");

        let reloaded = get_passenger_profile(db.as_ref(), account.id).await.unwrap();
        assert_eq!(reloaded, updated);

        let missing = update_passenger_profile(db.as_ref(), 9999, "X", "1").await;
        assert!(matches!(
            missing,
            Err(AccountsError::NotFound { entity: "Passenger" })
        ));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn register_driver_creates_an_active_driver() {
        let (tmp, db) = test_db("rideway_accounts_test_driver_register").await;

        let id = register_driver(
            db.as_ref(),
            "Suresh Kumar",
            "suresh@example.com",
            "9988776655",
            "DL-05-2020",
            "password123",
        )
        .await
        .unwrap();

        let profile = get_driver_profile(db.as_ref(), id).await.unwrap();
        assert_eq!(profile.full_name, "Suresh Kumar");
        assert_eq!(profile.status, DriverStatus::Active);
        assert_eq!(profile.license_no, "DL-05-2020");
        assert_eq!(profile.avg_rating, None);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn update_driver_status_checks_existence() {
        let (tmp, db) = test_db("rideway_accounts_test_status").await;

        let id = register_driver(
            db.as_ref(),
            "Suresh Kumar",
            "suresh@example.com",
            "9988776655",
            "DL-05-2020",
            "password123",
        )
        .await
        .unwrap();

        update_driver_status(db.as_ref(), id, DriverStatus::Inactive)
            .await
            .unwrap();
        let profile = get_driver_profile(db.as_ref(), id).await.unwrap();
        assert_eq!(profile.status, DriverStatus::Inactive);

        let missing = update_driver_status(db.as_ref(), 9999, DriverStatus::Active).await;
        assert!(matches!(
            missing,
            Err(AccountsError::NotFound { entity: "Driver" })
        ));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn add_vehicle_validates_capacity_and_lists_back() {
        let (tmp, db) = test_db("rideway_accounts_test_vehicles").await;

        let driver_id = register_driver(
            db.as_ref(),
            "Suresh Kumar",
            "suresh@example.com",
            "9988776655",
            "DL-05-2020",
            "password123",
        )
        .await
        .unwrap();

        let invalid = add_vehicle(db.as_ref(), driver_id, "Maruti Swift", 0, VehicleType::Car).await;
        assert!(matches!(invalid, Err(AccountsError::Validation { .. })));

        let car = add_vehicle(db.as_ref(), driver_id, "Maruti Swift", 4, VehicleType::Car)
            .await
            .unwrap();
        let suv = add_vehicle(db.as_ref(), driver_id, "Toyota Fortuner", 7, VehicleType::Suv)
            .await
            .unwrap();

        let vehicles = driver_vehicles(db.as_ref(), driver_id).await.unwrap();
        assert_eq!(vehicles.len(), 2);
        assert!(vehicles
            .iter()
            .any(|v| v.id == car && v.vehicle_type == VehicleType::Car && v.capacity == 4));
        assert!(vehicles
            .iter()
            .any(|v| v.id == suv && v.vehicle_type == VehicleType::Suv && v.capacity == 7));

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
