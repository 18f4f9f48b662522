//! Demo data loader for the Rideway platform.
//!
//! Seeds a small deterministic world: the demo passenger and driver
//! accounts the frontend ships with (password `password123`), a few
//! more of each, vehicles across every category, routes between Indian
//! landmarks, rides in every lifecycle status, and the payments,
//! feedback, accidents, and traffic reports the admin dashboards read.

use chrono::{Duration, Utc};
use moosicbox_json_utils::database::ToValue as _;
use rideway_ride_models::{DriverStatus, PaymentMode, PaymentStatus, RideStatus, VehicleType};
use switchy_database::{Database, DatabaseValue};

/// Password shared by every seeded account.
const SEED_PASSWORD: &str = "password123";

struct SeedDriver<'a> {
    full_name: &'a str,
    license_no: &'a str,
    phone: &'a str,
    email: &'a str,
    status: DriverStatus,
    joined_days_ago: i64,
}

struct SeedRide {
    passenger_id: i64,
    driver_id: i64,
    route_id: i64,
    vehicle_id: i64,
    fare: f64,
    status: RideStatus,
    days_ago: i64,
}

/// Loads the demo data set in one transaction, skipping entirely if the
/// demo passenger already exists.
///
/// # Errors
///
/// Returns an error if any insert fails or the transaction cannot be
/// committed.
#[allow(clippy::too_many_lines)]
pub async fn run(db: &dyn Database) -> Result<(), Box<dyn std::error::Error>> {
    let rows = db
        .query_raw_params(
            "SELECT id FROM passengers WHERE email = $1",
            &[DatabaseValue::String("passenger@demo.com".to_string())],
        )
        .await?;
    if !rows.is_empty() {
        log::info!("Database already seeded, nothing to do");
        return Ok(());
    }

    log::info!("Seeding demo data...");

    let password = rideway_auth::hash_password(SEED_PASSWORD)?;

    let txn = db.begin_transaction().await?;

    let demo_passenger = insert_passenger(
        txn.as_ref(),
        "Demo Passenger",
        "+91 98765 43211",
        "passenger@demo.com",
        &password,
    )
    .await?;
    let priya = insert_passenger(
        txn.as_ref(),
        "Priya Patel",
        "+91 98211 22334",
        "priya.patel@example.com",
        &password,
    )
    .await?;
    let ananya = insert_passenger(
        txn.as_ref(),
        "Ananya Iyer",
        "+91 98322 44556",
        "ananya.iyer@example.com",
        &password,
    )
    .await?;
    let vikram = insert_passenger(
        txn.as_ref(),
        "Vikram Malhotra",
        "+91 98433 66778",
        "vikram.malhotra@example.com",
        &password,
    )
    .await?;

    let demo_driver = insert_driver(
        txn.as_ref(),
        &SeedDriver {
            full_name: "Demo Driver",
            license_no: "DL-01-12345678",
            phone: "+91 98765 43212",
            email: "driver@demo.com",
            status: DriverStatus::Active,
            joined_days_ago: 730,
        },
        &password,
    )
    .await?;
    let rajesh = insert_driver(
        txn.as_ref(),
        &SeedDriver {
            full_name: "Rajesh Kumar",
            license_no: "DL-07-44312299",
            phone: "+91 97100 11223",
            email: "rajesh.kumar@example.com",
            status: DriverStatus::Active,
            joined_days_ago: 365,
        },
        &password,
    )
    .await?;
    let suresh = insert_driver(
        txn.as_ref(),
        &SeedDriver {
            full_name: "Suresh Nair",
            license_no: "DL-09-88221134",
            phone: "+91 97211 33445",
            email: "suresh.nair@example.com",
            status: DriverStatus::Active,
            joined_days_ago: 540,
        },
        &password,
    )
    .await?;
    let kavya = insert_driver(
        txn.as_ref(),
        &SeedDriver {
            full_name: "Kavya Menon",
            license_no: "DL-03-55992218",
            phone: "+91 97322 55667",
            email: "kavya.menon@example.com",
            status: DriverStatus::Inactive,
            joined_days_ago: 200,
        },
        &password,
    )
    .await?;

    let swift = insert_vehicle(
        txn.as_ref(),
        demo_driver,
        "Maruti Suzuki Swift",
        4,
        VehicleType::Car,
    )
    .await?;
    let activa =
        insert_vehicle(txn.as_ref(), rajesh, "Honda Activa", 1, VehicleType::Bike).await?;
    let bajaj = insert_vehicle(txn.as_ref(), rajesh, "Bajaj RE", 3, VehicleType::Auto).await?;
    let xuv = insert_vehicle(txn.as_ref(), suresh, "Mahindra XUV700", 6, VehicleType::Suv).await?;
    insert_vehicle(
        txn.as_ref(),
        kavya,
        "Toyota Fortuner",
        6,
        VehicleType::Luxury,
    )
    .await?;

    let routes = [
        insert_route(txn.as_ref(), "Connaught Place", "Nehru Place", 12.4, 32).await?,
        insert_route(txn.as_ref(), "Saket", "Hauz Khas", 6.8, 22).await?,
        insert_route(txn.as_ref(), "Dwarka", "Karol Bagh", 18.5, 48).await?,
        insert_route(txn.as_ref(), "Bandra West", "Andheri East", 9.6, 35).await?,
        insert_route(txn.as_ref(), "Koramangala", "Indiranagar", 7.2, 28).await?,
    ];

    let rides = [
        SeedRide {
            passenger_id: demo_passenger,
            driver_id: demo_driver,
            route_id: routes[0],
            vehicle_id: swift,
            fare: 199.0,
            status: RideStatus::Completed,
            days_ago: 1,
        },
        SeedRide {
            passenger_id: priya,
            driver_id: demo_driver,
            route_id: routes[1],
            vehicle_id: swift,
            fare: 131.6,
            status: RideStatus::Completed,
            days_ago: 2,
        },
        SeedRide {
            passenger_id: ananya,
            driver_id: suresh,
            route_id: routes[2],
            vehicle_id: xuv,
            fare: 272.0,
            status: RideStatus::Completed,
            days_ago: 4,
        },
        SeedRide {
            passenger_id: vikram,
            driver_id: rajesh,
            route_id: routes[4],
            vehicle_id: activa,
            fare: 136.4,
            status: RideStatus::Completed,
            days_ago: 6,
        },
        SeedRide {
            passenger_id: demo_passenger,
            driver_id: rajesh,
            route_id: routes[1],
            vehicle_id: bajaj,
            fare: 118.0,
            status: RideStatus::Cancelled,
            days_ago: 2,
        },
        SeedRide {
            passenger_id: priya,
            driver_id: suresh,
            route_id: routes[3],
            vehicle_id: xuv,
            fare: 165.2,
            status: RideStatus::Ongoing,
            days_ago: 0,
        },
        SeedRide {
            passenger_id: demo_passenger,
            driver_id: suresh,
            route_id: routes[0],
            vehicle_id: xuv,
            fare: 199.0,
            status: RideStatus::Accepted,
            days_ago: 0,
        },
        SeedRide {
            passenger_id: ananya,
            driver_id: demo_driver,
            route_id: routes[4],
            vehicle_id: swift,
            fare: 136.4,
            status: RideStatus::Requested,
            days_ago: 0,
        },
        SeedRide {
            passenger_id: vikram,
            driver_id: demo_driver,
            route_id: routes[2],
            vehicle_id: swift,
            fare: 272.0,
            status: RideStatus::Completed,
            days_ago: 12,
        },
        SeedRide {
            passenger_id: demo_passenger,
            driver_id: demo_driver,
            route_id: routes[3],
            vehicle_id: swift,
            fare: 165.2,
            status: RideStatus::Completed,
            days_ago: 20,
        },
    ];
    let mut ride_ids = Vec::with_capacity(rides.len());
    for ride in &rides {
        ride_ids.push(insert_ride(txn.as_ref(), ride).await?);
    }

    insert_payment(
        txn.as_ref(),
        ride_ids[0],
        199.0,
        PaymentMode::Upi,
        PaymentStatus::Successful,
        1,
    )
    .await?;
    insert_payment(
        txn.as_ref(),
        ride_ids[1],
        131.6,
        PaymentMode::Card,
        PaymentStatus::Successful,
        2,
    )
    .await?;
    insert_payment(
        txn.as_ref(),
        ride_ids[2],
        272.0,
        PaymentMode::Cash,
        PaymentStatus::Successful,
        4,
    )
    .await?;
    insert_payment(
        txn.as_ref(),
        ride_ids[3],
        136.4,
        PaymentMode::Wallet,
        PaymentStatus::Successful,
        6,
    )
    .await?;
    insert_payment(
        txn.as_ref(),
        ride_ids[8],
        272.0,
        PaymentMode::Card,
        PaymentStatus::Refunded,
        12,
    )
    .await?;
    insert_payment(
        txn.as_ref(),
        ride_ids[9],
        165.2,
        PaymentMode::Upi,
        PaymentStatus::Failed,
        20,
    )
    .await?;

    insert_feedback(
        txn.as_ref(),
        ride_ids[0],
        demo_passenger,
        demo_driver,
        4.5,
        Some("Great ride!"),
        1,
    )
    .await?;
    insert_feedback(
        txn.as_ref(),
        ride_ids[1],
        priya,
        demo_driver,
        5.0,
        Some("Very professional driver"),
        2,
    )
    .await?;
    insert_feedback(
        txn.as_ref(),
        ride_ids[2],
        ananya,
        suresh,
        4.0,
        Some("Clean vehicle"),
        4,
    )
    .await?;
    insert_feedback(
        txn.as_ref(),
        ride_ids[3],
        vikram,
        rajesh,
        4.8,
        Some("Smooth journey"),
        6,
    )
    .await?;
    insert_feedback(txn.as_ref(), ride_ids[8], vikram, demo_driver, 3.5, None, 12).await?;

    insert_accident(
        txn.as_ref(),
        ride_ids[2],
        "Minor scratch on vehicle door",
        "Minor",
        "Closed",
        4,
    )
    .await?;
    insert_accident(
        txn.as_ref(),
        ride_ids[8],
        "Driver was speeding",
        "Major",
        "Open",
        12,
    )
    .await?;

    insert_traffic_report(txn.as_ref(), routes[0], "High", 2).await?;
    insert_traffic_report(txn.as_ref(), routes[2], "Medium", 5).await?;
    insert_traffic_report(txn.as_ref(), routes[0], "Low", 30).await?;

    // Rating columns are denormalized from feedback on every rating
    // write, so the raw inserts above need one recompute pass.
    txn.as_ref()
        .exec_raw(
            "UPDATE drivers
             SET avg_rating =
                 (SELECT AVG(rating) FROM feedback WHERE feedback.driver_id = drivers.id)
             WHERE id IN (SELECT DISTINCT driver_id FROM feedback)",
        )
        .await?;
    txn.as_ref()
        .exec_raw(
            "UPDATE passengers
             SET avg_rating_given =
                 (SELECT AVG(rating) FROM feedback WHERE feedback.passenger_id = passengers.id)
             WHERE id IN (SELECT DISTINCT passenger_id FROM feedback)",
        )
        .await?;

    txn.commit().await?;

    log::info!(
        "Seeded 4 passengers, 4 drivers, 5 vehicles, 5 routes, and 10 rides with payments, feedback, and incident reports"
    );
    log::info!("Demo accounts: passenger@demo.com and driver@demo.com (password {SEED_PASSWORD})");

    Ok(())
}

async fn insert_passenger(
    db: &dyn Database,
    full_name: &str,
    phone: &str,
    email: &str,
    password: &str,
) -> Result<i64, Box<dyn std::error::Error>> {
    let rows = db
        .query_raw_params(
            "INSERT INTO passengers (full_name, phone, email, password)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
            &[
                DatabaseValue::String(full_name.to_string()),
                DatabaseValue::String(phone.to_string()),
                DatabaseValue::String(email.to_string()),
                DatabaseValue::String(password.to_string()),
            ],
        )
        .await?;
    returned_id(&rows)
}

async fn insert_driver(
    db: &dyn Database,
    driver: &SeedDriver<'_>,
    password: &str,
) -> Result<i64, Box<dyn std::error::Error>> {
    let rows = db
        .query_raw_params(
            "INSERT INTO drivers (full_name, license_no, phone, email, password, status, join_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id",
            &[
                DatabaseValue::String(driver.full_name.to_string()),
                DatabaseValue::String(driver.license_no.to_string()),
                DatabaseValue::String(driver.phone.to_string()),
                DatabaseValue::String(driver.email.to_string()),
                DatabaseValue::String(password.to_string()),
                DatabaseValue::String(driver.status.as_ref().to_string()),
                DatabaseValue::String(days_ago(driver.joined_days_ago)),
            ],
        )
        .await?;
    returned_id(&rows)
}

async fn insert_vehicle(
    db: &dyn Database,
    driver_id: i64,
    model: &str,
    capacity: i32,
    vehicle_type: VehicleType,
) -> Result<i64, Box<dyn std::error::Error>> {
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
                DatabaseValue::String(Utc::now().to_rfc3339()),
            ],
        )
        .await?;
    returned_id(&rows)
}

async fn insert_route(
    db: &dyn Database,
    start_point: &str,
    end_point: &str,
    distance_km: f64,
    duration_min: i64,
) -> Result<i64, Box<dyn std::error::Error>> {
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
    returned_id(&rows)
}

async fn insert_ride(
    db: &dyn Database,
    ride: &SeedRide,
) -> Result<i64, Box<dyn std::error::Error>> {
    let created_at = days_ago(ride.days_ago);
    let rows = db
        .query_raw_params(
            "INSERT INTO rides
                 (passenger_id, driver_id, route_id, vehicle_id, fare, status,
                  created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING id",
            &[
                DatabaseValue::Int64(ride.passenger_id),
                DatabaseValue::Int64(ride.driver_id),
                DatabaseValue::Int64(ride.route_id),
                DatabaseValue::Int64(ride.vehicle_id),
                DatabaseValue::Real64(ride.fare),
                DatabaseValue::String(ride.status.as_ref().to_string()),
                DatabaseValue::String(created_at.clone()),
                DatabaseValue::String(created_at),
            ],
        )
        .await?;
    returned_id(&rows)
}

async fn insert_payment(
    db: &dyn Database,
    ride_id: i64,
    amount: f64,
    mode: PaymentMode,
    status: PaymentStatus,
    days: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    db.exec_raw_params(
        "INSERT INTO payments (ride_id, amount, mode, status, paid_at)
         VALUES ($1, $2, $3, $4, $5)",
        &[
            DatabaseValue::Int64(ride_id),
            DatabaseValue::Real64(amount),
            DatabaseValue::String(mode.as_ref().to_string()),
            DatabaseValue::String(status.as_ref().to_string()),
            DatabaseValue::String(days_ago(days)),
        ],
    )
    .await?;
    Ok(())
}

async fn insert_feedback(
    db: &dyn Database,
    ride_id: i64,
    passenger_id: i64,
    driver_id: i64,
    rating: f64,
    comment: Option<&str>,
    days: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    db.exec_raw_params(
        "INSERT INTO feedback (ride_id, passenger_id, driver_id, rating, comment, created_at)
         VALUES ($1, $2, $3, $4, $5, $6)",
        &[
            DatabaseValue::Int64(ride_id),
            DatabaseValue::Int64(passenger_id),
            DatabaseValue::Int64(driver_id),
            DatabaseValue::Real64(rating),
            comment.map_or(DatabaseValue::Null, |c| {
                DatabaseValue::String(c.to_string())
            }),
            DatabaseValue::String(days_ago(days)),
        ],
    )
    .await?;
    Ok(())
}

async fn insert_accident(
    db: &dyn Database,
    ride_id: i64,
    description: &str,
    severity: &str,
    claim_status: &str,
    days: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    db.exec_raw_params(
        "INSERT INTO accidents (ride_id, occurred_at, description, claim_status, severity)
         VALUES ($1, $2, $3, $4, $5)",
        &[
            DatabaseValue::Int64(ride_id),
            DatabaseValue::String(days_ago(days)),
            DatabaseValue::String(description.to_string()),
            DatabaseValue::String(claim_status.to_string()),
            DatabaseValue::String(severity.to_string()),
        ],
    )
    .await?;
    Ok(())
}

async fn insert_traffic_report(
    db: &dyn Database,
    route_id: i64,
    severity: &str,
    hours: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    db.exec_raw_params(
        "INSERT INTO traffic_reports (route_id, reported_at, severity)
         VALUES ($1, $2, $3)",
        &[
            DatabaseValue::Int64(route_id),
            DatabaseValue::String(hours_ago(hours)),
            DatabaseValue::String(severity.to_string()),
        ],
    )
    .await?;
    Ok(())
}

fn returned_id(rows: &[switchy_database::Row]) -> Result<i64, Box<dyn std::error::Error>> {
    let row = rows.first().ok_or("insert returned no rows")?;
    Ok(row
        .to_value("id")
        .map_err(|e| format!("Failed to parse inserted id: {e}"))?)
}

fn days_ago(days: i64) -> String {
    (Utc::now() - Duration::days(days)).to_rfc3339()
}

fn hours_ago(hours: i64) -> String {
    (Utc::now() - Duration::hours(hours)).to_rfc3339()
}
