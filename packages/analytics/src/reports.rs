//! The report queries behind the admin dashboard.
//!
//! These mirror classic reporting views: grouped aggregates over the
//! rides fact table joined out to drivers, passengers, routes, payments,
//! feedback, accidents, and traffic reports. All timestamps are RFC 3339
//! text, so day bucketing and duration math go through `DATE()` and
//! `julianday()`.

use moosicbox_json_utils::database::ToValue as _;
use rideway_analytics_models::{
    DailyRideStats, DriverPerformance, DriverSummary, HighPerformer, IncidentAnalysis,
    PassengerActivity, PaymentModeAnalysis, PopularRoute, TrafficImpact,
};
use rideway_ride_models::{DriverStatus, PaymentMode, PaymentStatus, RideStatus};
use switchy_database::{Database, DatabaseValue};

use crate::AnalyticsError;

/// Look-back window for the high-performer report, in days.
pub const HIGH_PERFORMER_WINDOW_DAYS: i64 = 30;
/// Minimum rated completed rides inside the window.
pub const HIGH_PERFORMER_MIN_RIDES: i64 = 20;
/// Minimum mean rating over those rides.
pub const HIGH_PERFORMER_MIN_RATING: f64 = 4.5;

/// Per-driver ride volume, received rating, and fleet size for Active
/// drivers, best rated first.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the database query fails.
pub async fn active_drivers_summary(
    db: &dyn Database,
) -> Result<Vec<DriverSummary>, AnalyticsError> {
    let rows = db
        .query_raw_params(
            "SELECT d.id AS driver_id, d.full_name, d.join_date,
                    COUNT(DISTINCT r.id) AS total_rides,
                    AVG(f.rating) AS avg_rating,
                    COUNT(DISTINCT v.id) AS vehicle_count
             FROM drivers d
             LEFT JOIN rides r ON r.driver_id = d.id
             LEFT JOIN feedback f ON f.ride_id = r.id
             LEFT JOIN vehicles v ON v.driver_id = d.id
             WHERE d.status = $1
             GROUP BY d.id, d.full_name, d.join_date
             ORDER BY avg_rating DESC",
            &[DatabaseValue::String(
                DriverStatus::Active.as_ref().to_string(),
            )],
        )
        .await?;

    rows.iter()
        .map(|row| {
            Ok(DriverSummary {
                driver_id: required_id(row, "driver_id")?,
                full_name: row.to_value("full_name").unwrap_or_default(),
                join_date: row.to_value("join_date").unwrap_or_default(),
                total_rides: row.to_value("total_rides").unwrap_or_default(),
                avg_rating: row.to_value("avg_rating").unwrap_or(None),
                vehicle_count: row.to_value("vehicle_count").unwrap_or_default(),
            })
        })
        .collect()
}

/// Per-passenger ride count, lifetime spend, and most recent ride,
/// busiest first.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the database query fails.
pub async fn passenger_activity(
    db: &dyn Database,
) -> Result<Vec<PassengerActivity>, AnalyticsError> {
    let rows = db
        .query_raw_params(
            "SELECT p.id AS passenger_id, p.full_name, p.email,
                    COUNT(DISTINCT r.id) AS total_rides,
                    SUM(r.fare) AS total_spent,
                    MAX(r.created_at) AS last_ride_date
             FROM passengers p
             LEFT JOIN rides r ON r.passenger_id = p.id
             GROUP BY p.id, p.full_name, p.email
             ORDER BY total_rides DESC",
            &[],
        )
        .await?;

    rows.iter()
        .map(|row| {
            Ok(PassengerActivity {
                passenger_id: required_id(row, "passenger_id")?,
                full_name: row.to_value("full_name").unwrap_or_default(),
                email: row.to_value("email").unwrap_or_default(),
                total_rides: row.to_value("total_rides").unwrap_or_default(),
                total_spent: row.to_value("total_spent").unwrap_or(None),
                last_ride_date: row.to_value("last_ride_date").unwrap_or(None),
            })
        })
        .collect()
}

/// Ride volume, completion/cancellation split, and revenue per calendar
/// day, newest day first.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the database query fails.
pub async fn daily_ride_stats(db: &dyn Database) -> Result<Vec<DailyRideStats>, AnalyticsError> {
    let rows = db
        .query_raw_params(
            "SELECT DATE(created_at) AS ride_date,
                    COUNT(id) AS total_rides,
                    SUM(CASE WHEN status = $1 THEN 1 ELSE 0 END) AS completed_rides,
                    SUM(CASE WHEN status = $2 THEN 1 ELSE 0 END) AS cancelled_rides,
                    SUM(fare) AS total_revenue,
                    AVG(fare) AS average_fare
             FROM rides
             GROUP BY DATE(created_at)
             ORDER BY ride_date DESC",
            &[
                DatabaseValue::String(RideStatus::Completed.as_ref().to_string()),
                DatabaseValue::String(RideStatus::Cancelled.as_ref().to_string()),
            ],
        )
        .await?;

    rows.iter()
        .map(|row| {
            Ok(DailyRideStats {
                ride_date: row.to_value("ride_date").unwrap_or_default(),
                total_rides: row.to_value("total_rides").unwrap_or_default(),
                completed_rides: row.to_value("completed_rides").unwrap_or_default(),
                cancelled_rides: row.to_value("cancelled_rides").unwrap_or_default(),
                total_revenue: row.to_value("total_revenue").unwrap_or_default(),
                average_fare: row.to_value("average_fare").unwrap_or_default(),
            })
        })
        .collect()
}

/// Routes ranked by completed-ride usage.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the database query fails.
pub async fn popular_routes(db: &dyn Database) -> Result<Vec<PopularRoute>, AnalyticsError> {
    let rows = db
        .query_raw_params(
            "SELECT rt.id AS route_id, rt.start_point, rt.end_point,
                    COUNT(r.id) AS usage_count,
                    AVG(r.fare) AS average_fare,
                    MAX(r.created_at) AS last_used
             FROM routes rt
             JOIN rides r ON r.route_id = rt.id
             WHERE r.status = $1
             GROUP BY rt.id, rt.start_point, rt.end_point
             ORDER BY usage_count DESC",
            &[DatabaseValue::String(
                RideStatus::Completed.as_ref().to_string(),
            )],
        )
        .await?;

    rows.iter()
        .map(|row| {
            Ok(PopularRoute {
                route_id: required_id(row, "route_id")?,
                start_point: row.to_value("start_point").unwrap_or_default(),
                end_point: row.to_value("end_point").unwrap_or_default(),
                usage_count: row.to_value("usage_count").unwrap_or_default(),
                average_fare: row.to_value("average_fare").unwrap_or_default(),
                last_used: row.to_value("last_used").unwrap_or_default(),
            })
        })
        .collect()
}

/// Transaction counts and value per payment mode, highest volume first.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the database query fails or a stored
/// mode is unknown.
pub async fn payment_mode_analysis(
    db: &dyn Database,
) -> Result<Vec<PaymentModeAnalysis>, AnalyticsError> {
    let rows = db
        .query_raw_params(
            "SELECT mode,
                    COUNT(id) AS total_transactions,
                    SUM(CASE WHEN status = $1 THEN 1 ELSE 0 END) AS successful_transactions,
                    SUM(CASE WHEN status = $2 THEN 1 ELSE 0 END) AS failed_transactions,
                    SUM(amount) AS total_amount,
                    AVG(amount) AS average_amount
             FROM payments
             GROUP BY mode
             ORDER BY total_transactions DESC",
            &[
                DatabaseValue::String(PaymentStatus::Successful.as_ref().to_string()),
                DatabaseValue::String(PaymentStatus::Failed.as_ref().to_string()),
            ],
        )
        .await?;

    rows.iter()
        .map(|row| {
            let mode: String = row.to_value("mode").unwrap_or_default();
            Ok(PaymentModeAnalysis {
                mode: mode
                    .parse::<PaymentMode>()
                    .map_err(|e| AnalyticsError::Conversion {
                        message: format!("Unknown payment mode '{mode}': {e}"),
                    })?,
                total_transactions: row.to_value("total_transactions").unwrap_or_default(),
                successful_transactions: row.to_value("successful_transactions").unwrap_or_default(),
                failed_transactions: row.to_value("failed_transactions").unwrap_or_default(),
                total_amount: row.to_value("total_amount").unwrap_or_default(),
                average_amount: row.to_value("average_amount").unwrap_or_default(),
            })
        })
        .collect()
}

/// Per-driver ride volume, rating, and accident counts across all
/// drivers regardless of status, best rated first.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the database query fails.
pub async fn driver_performance(
    db: &dyn Database,
) -> Result<Vec<DriverPerformance>, AnalyticsError> {
    let rows = db
        .query_raw_params(
            "SELECT d.id AS driver_id, d.full_name,
                    COUNT(DISTINCT r.id) AS total_rides,
                    AVG(f.rating) AS avg_rating,
                    COUNT(DISTINCT a.id) AS accident_count,
                    COUNT(DISTINCT CASE WHEN a.severity = $1 THEN a.id END) AS critical_accidents
             FROM drivers d
             LEFT JOIN rides r ON r.driver_id = d.id
             LEFT JOIN feedback f ON f.ride_id = r.id
             LEFT JOIN accidents a ON a.ride_id = r.id
             GROUP BY d.id, d.full_name
             ORDER BY avg_rating DESC",
            &[DatabaseValue::String("Critical".to_string())],
        )
        .await?;

    rows.iter()
        .map(|row| {
            Ok(DriverPerformance {
                driver_id: required_id(row, "driver_id")?,
                full_name: row.to_value("full_name").unwrap_or_default(),
                total_rides: row.to_value("total_rides").unwrap_or_default(),
                avg_rating: row.to_value("avg_rating").unwrap_or(None),
                accident_count: row.to_value("accident_count").unwrap_or_default(),
                critical_accidents: row.to_value("critical_accidents").unwrap_or_default(),
            })
        })
        .collect()
}

/// Accident totals per route, restricted to routes with at least one
/// accident, worst first.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the database query fails.
pub async fn incident_analysis(db: &dyn Database) -> Result<Vec<IncidentAnalysis>, AnalyticsError> {
    let rows = db
        .query_raw_params(
            "SELECT rt.id AS route_id, rt.start_point, rt.end_point,
                    COUNT(a.id) AS total_accidents,
                    COUNT(DISTINCT CASE WHEN a.severity = $1 THEN a.id END) AS critical_accidents,
                    COUNT(DISTINCT CASE WHEN a.claim_status = $2 THEN a.id END) AS open_claims
             FROM routes rt
             LEFT JOIN rides r ON r.route_id = rt.id
             LEFT JOIN accidents a ON a.ride_id = r.id
             GROUP BY rt.id, rt.start_point, rt.end_point
             HAVING COUNT(a.id) > 0
             ORDER BY total_accidents DESC",
            &[
                DatabaseValue::String("Critical".to_string()),
                DatabaseValue::String("Open".to_string()),
            ],
        )
        .await?;

    rows.iter()
        .map(|row| {
            Ok(IncidentAnalysis {
                route_id: required_id(row, "route_id")?,
                start_point: row.to_value("start_point").unwrap_or_default(),
                end_point: row.to_value("end_point").unwrap_or_default(),
                total_accidents: row.to_value("total_accidents").unwrap_or_default(),
                critical_accidents: row.to_value("critical_accidents").unwrap_or_default(),
                open_claims: row.to_value("open_claims").unwrap_or_default(),
            })
        })
        .collect()
}

/// Drivers clearing [`HIGH_PERFORMER_MIN_RIDES`] rated completed rides
/// and [`HIGH_PERFORMER_MIN_RATING`] mean rating inside the last
/// [`HIGH_PERFORMER_WINDOW_DAYS`] days.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the database query fails.
pub async fn high_performing_drivers(
    db: &dyn Database,
) -> Result<Vec<HighPerformer>, AnalyticsError> {
    let rows = db
        .query_raw_params(
            "SELECT d.id AS driver_id, d.full_name,
                    COUNT(r.id) AS total_rides,
                    AVG(f.rating) AS avg_rating
             FROM drivers d
             JOIN rides r ON r.driver_id = d.id
             JOIN feedback f ON f.ride_id = r.id
             WHERE r.status = $1
               AND julianday(r.created_at) >= julianday('now') - $2
             GROUP BY d.id, d.full_name
             HAVING COUNT(r.id) >= $3 AND AVG(f.rating) >= $4
             ORDER BY avg_rating DESC",
            &[
                DatabaseValue::String(RideStatus::Completed.as_ref().to_string()),
                DatabaseValue::Int64(HIGH_PERFORMER_WINDOW_DAYS),
                DatabaseValue::Int64(HIGH_PERFORMER_MIN_RIDES),
                DatabaseValue::Real64(HIGH_PERFORMER_MIN_RATING),
            ],
        )
        .await?;

    rows.iter()
        .map(|row| {
            Ok(HighPerformer {
                driver_id: required_id(row, "driver_id")?,
                full_name: row.to_value("full_name").unwrap_or_default(),
                total_rides: row.to_value("total_rides").unwrap_or_default(),
                avg_rating: row.to_value("avg_rating").unwrap_or_default(),
            })
        })
        .collect()
}

/// Estimated versus observed ride duration on routes with a traffic
/// report filed during a completed ride, grouped by report severity.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the database query fails.
pub async fn traffic_impact(db: &dyn Database) -> Result<Vec<TrafficImpact>, AnalyticsError> {
    let rows = db
        .query_raw_params(
            "SELECT rt.id AS route_id, rt.start_point, rt.end_point,
                    rt.duration_min AS estimated_duration,
                    AVG((julianday(r.updated_at) - julianday(r.created_at)) * 1440.0)
                        AS actual_avg_duration,
                    tr.severity
             FROM routes rt
             JOIN rides r ON r.route_id = rt.id
             JOIN traffic_reports tr ON tr.route_id = rt.id
             WHERE r.status = $1
               AND tr.reported_at BETWEEN r.created_at AND r.updated_at
             GROUP BY rt.id, rt.start_point, rt.end_point, rt.duration_min, tr.severity
             ORDER BY rt.id, tr.severity",
            &[DatabaseValue::String(
                RideStatus::Completed.as_ref().to_string(),
            )],
        )
        .await?;

    rows.iter()
        .map(|row| {
            Ok(TrafficImpact {
                route_id: required_id(row, "route_id")?,
                start_point: row.to_value("start_point").unwrap_or_default(),
                end_point: row.to_value("end_point").unwrap_or_default(),
                estimated_duration: row.to_value("estimated_duration").unwrap_or_default(),
                actual_avg_duration: row.to_value("actual_avg_duration").unwrap_or_default(),
                severity: row.to_value("severity").unwrap_or_default(),
            })
        })
        .collect()
}

fn required_id(row: &switchy_database::Row, column: &str) -> Result<i64, AnalyticsError> {
    row.to_value(column).map_err(|e| AnalyticsError::Conversion {
        message: format!("Failed to parse {column}: {e}"),
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

    async fn returned_id(db: &dyn Database, sql: &str, params: &[DatabaseValue]) -> i64 {
        let rows = db.query_raw_params(sql, params).await.unwrap();
        rows.first().unwrap().to_value("id").unwrap()
    }

    struct World {
        amit: i64,
        priya: i64,
        rahul: i64,
        suresh: i64,
        route_cp: i64,
        route_saket: i64,
    }

    /// Two passengers, two drivers (one Inactive), two routes, four
    /// rides across statuses on two calendar days, payments in three
    /// modes, two feedback rows, two accidents, one traffic report.
    #[allow(clippy::too_many_lines)]
    async fn seed_world(db: &dyn Database) -> World {
        let amit = returned_id(
            db,
            "INSERT INTO passengers (full_name, email, password, phone)
             VALUES ('Amit Sharma', 'amit@example.com', 'x', '9800000001')
             RETURNING id",
            &[],
        )
        .await;
        let priya = returned_id(
            db,
            "INSERT INTO passengers (full_name, email, password, phone)
             VALUES ('Priya Patel', 'priya@example.com', 'x', '9800000002')
             RETURNING id",
            &[],
        )
        .await;

        let rahul = returned_id(
            db,
            "INSERT INTO drivers (full_name, email, password, phone, license_no, status, join_date)
             VALUES ('Rahul Verma', 'rahul@example.com', 'x', '9800000003', 'DL-01', 'Active',
                     '2026-01-05T08:00:00+00:00')
             RETURNING id",
            &[],
        )
        .await;
        let suresh = returned_id(
            db,
            "INSERT INTO drivers (full_name, email, password, phone, license_no, status, join_date)
             VALUES ('Suresh Kumar', 'suresh@example.com', 'x', '9800000004', 'DL-02', 'Inactive',
                     '2026-02-10T08:00:00+00:00')
             RETURNING id",
            &[],
        )
        .await;

        for (driver, model) in [(rahul, "Maruti Swift"), (rahul, "Honda City"), (suresh, "Tata Nexon")] {
            db.exec_raw_params(
                "INSERT INTO vehicles (driver_id, model, capacity, vehicle_type, created_at)
                 VALUES ($1, $2, 4, 'Car', '2026-03-01T08:00:00+00:00')",
                &[
                    DatabaseValue::Int64(driver),
                    DatabaseValue::String(model.to_string()),
                ],
            )
            .await
            .unwrap();
        }

        let route_cp = returned_id(
            db,
            "INSERT INTO routes (start_point, end_point, distance_km, duration_min)
             VALUES ('Connaught Place', 'Nehru Place', 10.0, 20)
             RETURNING id",
            &[],
        )
        .await;
        let route_saket = returned_id(
            db,
            "INSERT INTO routes (start_point, end_point, distance_km, duration_min)
             VALUES ('Saket', 'Gurgaon', 7.5, 25)
             RETURNING id",
            &[],
        )
        .await;

        let seed_ride = |passenger: i64,
                         driver: i64,
                         route: i64,
                         fare: f64,
                         status: &'static str,
                         created: &'static str,
                         updated: &'static str| {
            let sql = "INSERT INTO rides
                           (passenger_id, driver_id, route_id, fare, status,
                            created_at, updated_at)
                       VALUES ($1, $2, $3, $4, $5, $6, $7)
                       RETURNING id";
            async move {
                returned_id(
                    db,
                    sql,
                    &[
                        DatabaseValue::Int64(passenger),
                        DatabaseValue::Int64(driver),
                        DatabaseValue::Int64(route),
                        DatabaseValue::Real64(fare),
                        DatabaseValue::String(status.to_string()),
                        DatabaseValue::String(created.to_string()),
                        DatabaseValue::String(updated.to_string()),
                    ],
                )
                .await
            }
        };

        let ride_completed = seed_ride(
            amit,
            rahul,
            route_cp,
            150.0,
            "Completed",
            "2026-08-20T09:00:00+00:00",
            "2026-08-20T09:30:00+00:00",
        )
        .await;
        let _ride_cancelled = seed_ride(
            amit,
            rahul,
            route_cp,
            150.0,
            "Cancelled",
            "2026-08-20T11:00:00+00:00",
            "2026-08-20T11:05:00+00:00",
        )
        .await;
        let ride_other_completed = seed_ride(
            priya,
            suresh,
            route_saket,
            125.0,
            "Completed",
            "2026-08-21T10:00:00+00:00",
            "2026-08-21T10:40:00+00:00",
        )
        .await;
        let ride_ongoing = seed_ride(
            priya,
            rahul,
            route_cp,
            150.0,
            "Ongoing",
            "2026-08-21T12:00:00+00:00",
            "2026-08-21T12:10:00+00:00",
        )
        .await;

        for (ride, amount, mode, status) in [
            (ride_completed, 150.0, "Card", "Successful"),
            (ride_other_completed, 125.0, "Cash", "Failed"),
            (ride_ongoing, 150.0, "UPI", "Successful"),
        ] {
            db.exec_raw_params(
                "INSERT INTO payments (ride_id, amount, mode, status, paid_at)
                 VALUES ($1, $2, $3, $4, '2026-08-21T13:00:00+00:00')",
                &[
                    DatabaseValue::Int64(ride),
                    DatabaseValue::Real64(amount),
                    DatabaseValue::String(mode.to_string()),
                    DatabaseValue::String(status.to_string()),
                ],
            )
            .await
            .unwrap();
        }

        for (ride, passenger, driver, rating) in [
            (ride_completed, amit, rahul, 5.0),
            (ride_other_completed, priya, suresh, 4.0),
        ] {
            db.exec_raw_params(
                "INSERT INTO feedback (ride_id, passenger_id, driver_id, rating, created_at)
                 VALUES ($1, $2, $3, $4, '2026-08-21T14:00:00+00:00')",
                &[
                    DatabaseValue::Int64(ride),
                    DatabaseValue::Int64(passenger),
                    DatabaseValue::Int64(driver),
                    DatabaseValue::Real64(rating),
                ],
            )
            .await
            .unwrap();
        }

        for (ride, severity, claim) in [
            (ride_completed, "Critical", "Open"),
            (ride_other_completed, "Minor", "Closed"),
        ] {
            db.exec_raw_params(
                "INSERT INTO accidents (ride_id, occurred_at, description, claim_status, severity)
                 VALUES ($1, '2026-08-20T09:15:00+00:00', 'collision', $2, $3)",
                &[
                    DatabaseValue::Int64(ride),
                    DatabaseValue::String(claim.to_string()),
                    DatabaseValue::String(severity.to_string()),
                ],
            )
            .await
            .unwrap();
        }

        db.exec_raw_params(
            "INSERT INTO traffic_reports (route_id, reported_at, severity)
             VALUES ($1, '2026-08-20T09:10:00+00:00', 'High')",
            &[DatabaseValue::Int64(route_cp)],
        )
        .await
        .unwrap();

        World {
            amit,
            priya,
            rahul,
            suresh,
            route_cp,
            route_saket,
        }
    }

    #[tokio::test]
    async fn summary_lists_only_active_drivers() {
        let (tmp, db) = test_db("rideway_analytics_test_summary").await;
        let world = seed_world(db.as_ref()).await;

        let summary = active_drivers_summary(db.as_ref()).await.unwrap();
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].driver_id, world.rahul);
        assert_eq!(summary[0].total_rides, 3);
        assert_eq!(summary[0].vehicle_count, 2);
        assert!((summary[0].avg_rating.unwrap() - 5.0).abs() < 1e-9);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn passenger_activity_aggregates_rides_and_spend() {
        let (tmp, db) = test_db("rideway_analytics_test_activity").await;
        let world = seed_world(db.as_ref()).await;

        let activity = passenger_activity(db.as_ref()).await.unwrap();
        assert_eq!(activity.len(), 2);

        let amit = activity
            .iter()
            .find(|a| a.passenger_id == world.amit)
            .unwrap();
        assert_eq!(amit.total_rides, 2);
        assert!((amit.total_spent.unwrap() - 300.0).abs() < 1e-9);
        assert_eq!(
            amit.last_ride_date.as_deref(),
            Some("2026-08-20T11:00:00+00:00")
        );

        let priya = activity
            .iter()
            .find(|a| a.passenger_id == world.priya)
            .unwrap();
        assert_eq!(priya.total_rides, 2);
        assert!((priya.total_spent.unwrap() - 275.0).abs() < 1e-9);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn daily_stats_bucket_rides_by_calendar_day() {
        let (tmp, db) = test_db("rideway_analytics_test_daily").await;
        seed_world(db.as_ref()).await;

        let stats = daily_ride_stats(db.as_ref()).await.unwrap();
        assert_eq!(stats.len(), 2);

        // Newest day first.
        assert_eq!(stats[0].ride_date, "2026-08-21");
        assert_eq!(stats[0].total_rides, 2);
        assert_eq!(stats[0].completed_rides, 1);
        assert_eq!(stats[0].cancelled_rides, 0);
        assert!((stats[0].total_revenue - 275.0).abs() < 1e-9);
        assert!((stats[0].average_fare - 137.5).abs() < 1e-9);

        assert_eq!(stats[1].ride_date, "2026-08-20");
        assert_eq!(stats[1].total_rides, 2);
        assert_eq!(stats[1].completed_rides, 1);
        assert_eq!(stats[1].cancelled_rides, 1);
        assert!((stats[1].total_revenue - 300.0).abs() < 1e-9);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn popular_routes_count_only_completed_rides() {
        let (tmp, db) = test_db("rideway_analytics_test_routes").await;
        let world = seed_world(db.as_ref()).await;

        let routes = popular_routes(db.as_ref()).await.unwrap();
        assert_eq!(routes.len(), 2);

        // Route CP has three rides but only one Completed.
        let cp = routes
            .iter()
            .find(|r| r.route_id == world.route_cp)
            .unwrap();
        assert_eq!(cp.usage_count, 1);
        assert!((cp.average_fare - 150.0).abs() < 1e-9);
        assert_eq!(cp.last_used, "2026-08-20T09:00:00+00:00");

        let saket = routes
            .iter()
            .find(|r| r.route_id == world.route_saket)
            .unwrap();
        assert_eq!(saket.usage_count, 1);
        assert!((saket.average_fare - 125.0).abs() < 1e-9);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn payment_mode_analysis_splits_outcomes() {
        let (tmp, db) = test_db("rideway_analytics_test_payments").await;
        seed_world(db.as_ref()).await;

        let analysis = payment_mode_analysis(db.as_ref()).await.unwrap();
        assert_eq!(analysis.len(), 3);

        let card = analysis
            .iter()
            .find(|a| a.mode == PaymentMode::Card)
            .unwrap();
        assert_eq!(card.total_transactions, 1);
        assert_eq!(card.successful_transactions, 1);
        assert_eq!(card.failed_transactions, 0);
        assert!((card.total_amount - 150.0).abs() < 1e-9);

        let cash = analysis
            .iter()
            .find(|a| a.mode == PaymentMode::Cash)
            .unwrap();
        assert_eq!(cash.successful_transactions, 0);
        assert_eq!(cash.failed_transactions, 1);

        let upi = analysis
            .iter()
            .find(|a| a.mode == PaymentMode::Upi)
            .unwrap();
        assert_eq!(upi.successful_transactions, 1);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn driver_performance_includes_accident_counts() {
        let (tmp, db) = test_db("rideway_analytics_test_performance").await;
        let world = seed_world(db.as_ref()).await;

        let performance = driver_performance(db.as_ref()).await.unwrap();
        assert_eq!(performance.len(), 2);

        let rahul = performance
            .iter()
            .find(|p| p.driver_id == world.rahul)
            .unwrap();
        assert_eq!(rahul.total_rides, 3);
        assert_eq!(rahul.accident_count, 1);
        assert_eq!(rahul.critical_accidents, 1);
        assert!((rahul.avg_rating.unwrap() - 5.0).abs() < 1e-9);

        let suresh = performance
            .iter()
            .find(|p| p.driver_id == world.suresh)
            .unwrap();
        assert_eq!(suresh.total_rides, 1);
        assert_eq!(suresh.accident_count, 1);
        assert_eq!(suresh.critical_accidents, 0);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn incident_analysis_counts_claims_per_route() {
        let (tmp, db) = test_db("rideway_analytics_test_incidents").await;
        let world = seed_world(db.as_ref()).await;

        let incidents = incident_analysis(db.as_ref()).await.unwrap();
        assert_eq!(incidents.len(), 2);

        let cp = incidents
            .iter()
            .find(|i| i.route_id == world.route_cp)
            .unwrap();
        assert_eq!(cp.total_accidents, 1);
        assert_eq!(cp.critical_accidents, 1);
        assert_eq!(cp.open_claims, 1);

        let saket = incidents
            .iter()
            .find(|i| i.route_id == world.route_saket)
            .unwrap();
        assert_eq!(saket.total_accidents, 1);
        assert_eq!(saket.critical_accidents, 0);
        assert_eq!(saket.open_claims, 0);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn incident_analysis_skips_accident_free_routes() {
        let (tmp, db) = test_db("rideway_analytics_test_no_incidents").await;

        db.exec_raw(
            "INSERT INTO routes (start_point, end_point, distance_km, duration_min)
             VALUES ('Dwarka', 'Rohini', 18.0, 45)",
        )
        .await
        .unwrap();

        let incidents = incident_analysis(db.as_ref()).await.unwrap();
        assert!(incidents.is_empty());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn high_performers_require_recent_volume_and_rating() {
        let (tmp, db) = test_db("rideway_analytics_test_performers").await;

        let passenger = returned_id(
            db.as_ref(),
            "INSERT INTO passengers (full_name, email, password, phone)
             VALUES ('Amit Sharma', 'amit@example.com', 'x', '9800000001')
             RETURNING id",
            &[],
        )
        .await;
        let busy = returned_id(
            db.as_ref(),
            "INSERT INTO drivers (full_name, email, password, phone, license_no, status, join_date)
             VALUES ('Rahul Verma', 'rahul@example.com', 'x', '9800000003', 'DL-01', 'Active',
                     '2026-01-05T08:00:00+00:00')
             RETURNING id",
            &[],
        )
        .await;
        let quiet = returned_id(
            db.as_ref(),
            "INSERT INTO drivers (full_name, email, password, phone, license_no, status, join_date)
             VALUES ('Suresh Kumar', 'suresh@example.com', 'x', '9800000004', 'DL-02', 'Active',
                     '2026-02-10T08:00:00+00:00')
             RETURNING id",
            &[],
        )
        .await;
        let route = returned_id(
            db.as_ref(),
            "INSERT INTO routes (start_point, end_point, distance_km, duration_min)
             VALUES ('Connaught Place', 'Nehru Place', 10.0, 20)
             RETURNING id",
            &[],
        )
        .await;

        let now = chrono::Utc::now().to_rfc3339();
        for (driver, rides) in [(busy, 20), (quiet, 5)] {
            for _ in 0..rides {
                let ride = returned_id(
                    db.as_ref(),
                    "INSERT INTO rides
                         (passenger_id, driver_id, route_id, fare, status,
                          created_at, updated_at)
                     VALUES ($1, $2, $3, 150.0, 'Completed', $4, $5)
                     RETURNING id",
                    &[
                        DatabaseValue::Int64(passenger),
                        DatabaseValue::Int64(driver),
                        DatabaseValue::Int64(route),
                        DatabaseValue::String(now.clone()),
                        DatabaseValue::String(now.clone()),
                    ],
                )
                .await;
                db.exec_raw_params(
                    "INSERT INTO feedback (ride_id, passenger_id, driver_id, rating, created_at)
                     VALUES ($1, $2, $3, 5.0, $4)",
                    &[
                        DatabaseValue::Int64(ride),
                        DatabaseValue::Int64(passenger),
                        DatabaseValue::Int64(driver),
                        DatabaseValue::String(now.clone()),
                    ],
                )
                .await
                .unwrap();
            }
        }

        let performers = high_performing_drivers(db.as_ref()).await.unwrap();
        assert_eq!(performers.len(), 1);
        assert_eq!(performers[0].driver_id, busy);
        assert_eq!(performers[0].total_rides, 20);
        assert!((performers[0].avg_rating - 5.0).abs() < 1e-9);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn traffic_impact_compares_estimate_to_actual() {
        let (tmp, db) = test_db("rideway_analytics_test_traffic").await;
        let world = seed_world(db.as_ref()).await;

        let impact = traffic_impact(db.as_ref()).await.unwrap();

        // Only route CP has a traffic report inside a completed ride's
        // window; the Saket route has no report at all.
        assert_eq!(impact.len(), 1);
        assert_eq!(impact[0].route_id, world.route_cp);
        assert_eq!(impact[0].estimated_duration, 20);
        assert!((impact[0].actual_avg_duration - 30.0).abs() < 1e-6);
        assert_eq!(impact[0].severity, "High");

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
