#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Payment recording and refunds.
//!
//! There is no gateway behind this. Recording a payment inserts the row
//! directly as `Successful`; the simulation boundary is deliberate and
//! callers own any real charging step. The one hard rule is the refund
//! guard: only a `Successful` payment can flip to `Refunded`, and the
//! flip is conditional on the status the caller saw.
//!
//! The `payments.ride_id` unique constraint is the only double-payment
//! barrier. A second payment for the same ride surfaces as a database
//! error, not a domain error.

use moosicbox_json_utils::database::ToValue as _;
use rideway_database_models::{Payment, PaymentHistoryEntry};
use rideway_ride_models::{PaymentMode, PaymentStatus};
use switchy_database::{Database, DatabaseError, DatabaseValue};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaymentsError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Payment not found")]
    NotFound,

    /// The payment is Pending, Failed, or already Refunded.
    #[error("Only successful payments can be refunded")]
    RefundNotAllowed,

    /// Another request changed the payment between the check and the
    /// write.
    #[error("Payment was modified concurrently")]
    Conflict,

    #[error("Data conversion error: {message}")]
    Conversion { message: String },
}

/// Records a payment for a ride, forced to `Successful`.
///
/// Nothing checks the amount against the ride's fare. A ride that
/// already has a payment trips the unique constraint and comes back as
/// [`PaymentsError::Database`].
///
/// # Errors
///
/// * [`PaymentsError::Database`] if the insert fails, including the
///   unknown-ride and duplicate-ride cases.
pub async fn record_payment(
    db: &dyn Database,
    ride_id: i64,
    amount: f64,
    mode: PaymentMode,
) -> Result<Payment, PaymentsError> {
    let paid_at = chrono::Utc::now().to_rfc3339();

    let rows = db
        .query_raw_params(
            "INSERT INTO payments (ride_id, amount, mode, status, paid_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
            &[
                DatabaseValue::Int64(ride_id),
                DatabaseValue::Real64(amount),
                DatabaseValue::String(mode.as_ref().to_string()),
                DatabaseValue::String(PaymentStatus::Successful.as_ref().to_string()),
                DatabaseValue::String(paid_at.clone()),
            ],
        )
        .await?;

    let row = rows.first().ok_or_else(|| PaymentsError::Conversion {
        message: "Failed to get payment id from insert".to_string(),
    })?;
    let id = row.to_value("id").map_err(|e| PaymentsError::Conversion {
        message: format!("Failed to parse payment id: {e}"),
    })?;

    Ok(Payment {
        id,
        ride_id,
        amount,
        mode,
        status: PaymentStatus::Successful,
        paid_at,
    })
}

/// Flips a `Successful` payment to `Refunded`.
///
/// # Errors
///
/// * [`PaymentsError::NotFound`] if the payment id is unknown.
/// * [`PaymentsError::RefundNotAllowed`] if the payment is not
///   `Successful`, including a payment already refunded.
/// * [`PaymentsError::Conflict`] if the row changed under the caller.
pub async fn refund(db: &dyn Database, payment_id: i64) -> Result<Payment, PaymentsError> {
    let mut payment = load_payment(db, payment_id)
        .await?
        .ok_or(PaymentsError::NotFound)?;

    if !payment.status.refundable() {
        return Err(PaymentsError::RefundNotAllowed);
    }

    let affected = db
        .exec_raw_params(
            "UPDATE payments SET status = $1 WHERE id = $2 AND status = $3",
            &[
                DatabaseValue::String(PaymentStatus::Refunded.as_ref().to_string()),
                DatabaseValue::Int64(payment_id),
                DatabaseValue::String(PaymentStatus::Successful.as_ref().to_string()),
            ],
        )
        .await?;

    if affected == 0 {
        return Err(PaymentsError::Conflict);
    }

    payment.status = PaymentStatus::Refunded;

    Ok(payment)
}

/// A passenger's payments joined through their rides.
///
/// # Errors
///
/// * [`PaymentsError::Database`] if the query fails.
/// * [`PaymentsError::Conversion`] if a row cannot be parsed.
pub async fn payment_history(
    db: &dyn Database,
    passenger_id: i64,
) -> Result<Vec<PaymentHistoryEntry>, PaymentsError> {
    let rows = db
        .query_raw_params(
            "SELECT p.id AS payment_id, p.amount, p.mode, p.status,
                    r.created_at AS ride_created_at
             FROM payments p
             JOIN rides r ON r.id = p.ride_id
             WHERE r.passenger_id = $1
             ORDER BY p.id",
            &[DatabaseValue::Int64(passenger_id)],
        )
        .await?;

    rows.iter()
        .map(|row| {
            Ok(PaymentHistoryEntry {
                payment_id: row
                    .to_value("payment_id")
                    .map_err(|e| PaymentsError::Conversion {
                        message: format!("Failed to parse payment id: {e}"),
                    })?,
                amount: row.to_value("amount").unwrap_or_default(),
                mode: parse_mode(&row.to_value::<String>("mode").unwrap_or_default())?,
                status: parse_status(&row.to_value::<String>("status").unwrap_or_default())?,
                ride_created_at: row.to_value("ride_created_at").unwrap_or_default(),
            })
        })
        .collect()
}

async fn load_payment(
    db: &dyn Database,
    payment_id: i64,
) -> Result<Option<Payment>, PaymentsError> {
    let rows = db
        .query_raw_params(
            "SELECT id, ride_id, amount, mode, status, paid_at
             FROM payments
             WHERE id = $1",
            &[DatabaseValue::Int64(payment_id)],
        )
        .await?;

    rows.first()
        .map(|row| {
            Ok(Payment {
                id: row.to_value("id").map_err(|e| PaymentsError::Conversion {
                    message: format!("Failed to parse payment id: {e}"),
                })?,
                ride_id: row
                    .to_value("ride_id")
                    .map_err(|e| PaymentsError::Conversion {
                        message: format!("Failed to parse ride id: {e}"),
                    })?,
                amount: row.to_value("amount").unwrap_or_default(),
                mode: parse_mode(&row.to_value::<String>("mode").unwrap_or_default())?,
                status: parse_status(&row.to_value::<String>("status").unwrap_or_default())?,
                paid_at: row.to_value("paid_at").unwrap_or_default(),
            })
        })
        .transpose()
}

fn parse_mode(value: &str) -> Result<PaymentMode, PaymentsError> {
    value
        .parse::<PaymentMode>()
        .map_err(|e| PaymentsError::Conversion {
            message: format!("Unknown payment mode '{value}': {e}"),
        })
}

fn parse_status(value: &str) -> Result<PaymentStatus, PaymentsError> {
    value
        .parse::<PaymentStatus>()
        .map_err(|e| PaymentsError::Conversion {
            message: format!("Unknown payment status '{value}': {e}"),
        })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    async fn test_db(name: &str) -> (PathBuf, Box<dyn Database>) {
        let tmp = std::env::temp_dir().join(name);
        let _ = std::fs::remove_dir_all(&tmp);

        let db = rideway_database::open_db(&tmp.join("rideway.db"))
            .await
            .unwrap();

        (tmp, db)
    }

    async fn seed_ride(db: &dyn Database, passenger_email: &str) -> (i64, i64) {
        let rows = db
            .query_raw_params(
                "INSERT INTO passengers (full_name, email, password, phone)
                 VALUES ('Amit Sharma', $1, 'x', $2)
                 RETURNING id",
                &[
                    DatabaseValue::String(passenger_email.to_string()),
                    DatabaseValue::String(format!("p-{passenger_email}")),
                ],
            )
            .await
            .unwrap();
        let passenger_id: i64 = rows.first().unwrap().to_value("id").unwrap();

        let rows = db
            .query_raw_params(
                "INSERT INTO drivers
                     (full_name, email, password, phone, license_no, status, join_date)
                 VALUES ('Rahul Verma', $1, 'x', $2, $3, 'Active', $4)
                 RETURNING id",
                &[
                    DatabaseValue::String(format!("d-{passenger_email}")),
                    DatabaseValue::String(format!("ph-{passenger_email}")),
                    DatabaseValue::String(format!("LIC-{passenger_email}")),
                    DatabaseValue::String(chrono::Utc::now().to_rfc3339()),
                ],
            )
            .await
            .unwrap();
        let driver_id: i64 = rows.first().unwrap().to_value("id").unwrap();

        let rows = db
            .query_raw_params(
                "INSERT INTO routes (start_point, end_point, distance_km, duration_min)
                 VALUES ('Connaught Place', 'Nehru Place', 10.0, 20)
                 RETURNING id",
                &[],
            )
            .await
            .unwrap();
        let route_id: i64 = rows.first().unwrap().to_value("id").unwrap();

        let now = chrono::Utc::now().to_rfc3339();
        let rows = db
            .query_raw_params(
                "INSERT INTO rides
                     (passenger_id, driver_id, route_id, fare, status, created_at, updated_at)
                 VALUES ($1, $2, $3, 150.0, 'Completed', $4, $5)
                 RETURNING id",
                &[
                    DatabaseValue::Int64(passenger_id),
                    DatabaseValue::Int64(driver_id),
                    DatabaseValue::Int64(route_id),
                    DatabaseValue::String(now.clone()),
                    DatabaseValue::String(now),
                ],
            )
            .await
            .unwrap();
        let ride_id: i64 = rows.first().unwrap().to_value("id").unwrap();

        (passenger_id, ride_id)
    }

    #[tokio::test]
    async fn recording_a_payment_marks_it_successful() {
        let (tmp, db) = test_db("rideway_payments_test_record").await;
        let (passenger_id, ride_id) = seed_ride(db.as_ref(), "amit@example.com").await;

        let payment = record_payment(db.as_ref(), ride_id, 150.0, PaymentMode::Card)
            .await
            .unwrap();

        assert_eq!(payment.ride_id, ride_id);
        assert_eq!(payment.mode, PaymentMode::Card);
        assert_eq!(payment.status, PaymentStatus::Successful);
        assert!((payment.amount - 150.0).abs() < f64::EPSILON);

        let history = payment_history(db.as_ref(), passenger_id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].payment_id, payment.id);
        assert_eq!(history[0].status, PaymentStatus::Successful);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn a_second_payment_for_the_same_ride_is_rejected_by_the_store() {
        let (tmp, db) = test_db("rideway_payments_test_duplicate").await;
        let (_, ride_id) = seed_ride(db.as_ref(), "amit@example.com").await;

        record_payment(db.as_ref(), ride_id, 150.0, PaymentMode::Card)
            .await
            .unwrap();

        let second = record_payment(db.as_ref(), ride_id, 150.0, PaymentMode::Cash).await;
        assert!(matches!(second, Err(PaymentsError::Database(_))));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn refund_flips_successful_to_refunded_exactly_once() {
        let (tmp, db) = test_db("rideway_payments_test_refund").await;
        let (_, ride_id) = seed_ride(db.as_ref(), "amit@example.com").await;

        let payment = record_payment(db.as_ref(), ride_id, 150.0, PaymentMode::Card)
            .await
            .unwrap();

        let refunded = refund(db.as_ref(), payment.id).await.unwrap();
        assert_eq!(refunded.status, PaymentStatus::Refunded);

        let again = refund(db.as_ref(), payment.id).await;
        assert!(matches!(again, Err(PaymentsError::RefundNotAllowed)));

        let missing = refund(db.as_ref(), 4242).await;
        assert!(matches!(missing, Err(PaymentsError::NotFound)));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn pending_payments_cannot_be_refunded() {
        let (tmp, db) = test_db("rideway_payments_test_pending").await;
        let (_, ride_id) = seed_ride(db.as_ref(), "amit@example.com").await;

        let rows = db
            .query_raw_params(
                "INSERT INTO payments (ride_id, amount, mode, status, paid_at)
                 VALUES ($1, 150.0, 'Cash', 'Pending', $2)
                 RETURNING id",
                &[
                    DatabaseValue::Int64(ride_id),
                    DatabaseValue::String(chrono::Utc::now().to_rfc3339()),
                ],
            )
            .await
            .unwrap();
        let payment_id: i64 = rows.first().unwrap().to_value("id").unwrap();

        let result = refund(db.as_ref(), payment_id).await;
        assert!(matches!(result, Err(PaymentsError::RefundNotAllowed)));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn history_is_scoped_to_the_passenger() {
        let (tmp, db) = test_db("rideway_payments_test_history").await;
        let (passenger_id, ride_id) = seed_ride(db.as_ref(), "amit@example.com").await;
        let (other_id, other_ride_id) = seed_ride(db.as_ref(), "priya@example.com").await;

        record_payment(db.as_ref(), ride_id, 150.0, PaymentMode::Card)
            .await
            .unwrap();
        record_payment(db.as_ref(), other_ride_id, 90.0, PaymentMode::Upi)
            .await
            .unwrap();

        let history = payment_history(db.as_ref(), passenger_id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert!((history[0].amount - 150.0).abs() < f64::EPSILON);

        let other_history = payment_history(db.as_ref(), other_id).await.unwrap();
        assert_eq!(other_history.len(), 1);
        assert_eq!(other_history[0].mode, PaymentMode::Upi);

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
