#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the Rideway platform.
//!
//! Serves the REST API consumed by the rider and driver clients: account
//! registration and login, ride booking and lifecycle updates, payments
//! and refunds, feedback, and the admin reporting surface. All state
//! lives in a `SQLite` database, `data/rideway.db` by default.

mod handlers;

use actix_cors::Cors;
use actix_web::{App, HttpServer, Scope, middleware, web};
use rideway_auth::TokenCodec;
use rideway_ride_models::{FarePolicy, FixedRouteEstimator, RouteEstimator};
use std::path::Path;
use std::sync::Arc;
use switchy_database::Database;

/// Environment variable overriding the database file path.
pub const DB_PATH_ENV_VAR: &str = "RIDEWAY_DB_PATH";

/// Shared application state.
pub struct AppState {
    /// `SQLite` database connection.
    pub db: Arc<dyn Database>,
    /// Route measurement source for passenger-requested rides.
    pub estimator: Arc<dyn RouteEstimator>,
    /// Fare computation parameters.
    pub fare_policy: FarePolicy,
}

/// Builds the `/api` routing tree.
///
/// Literal ride segments (`/rides/active`, `/rides/traffic-impact`) are
/// registered before the dynamic `/rides/{ride_id}` route so they are
/// never captured by it.
#[must_use]
pub fn api_scope() -> Scope {
    web::scope("/api")
        .route("/health", web::get().to(handlers::health))
        .route("/test-db", web::get().to(handlers::test_db))
        .service(
            web::scope("/auth")
                .route("/register", web::post().to(handlers::register))
                .route("/login", web::post().to(handlers::login))
                .route("/me", web::get().to(handlers::me)),
        )
        .service(
            web::scope("/passengers")
                .route("/profile", web::get().to(handlers::passenger_profile))
                .route("/profile", web::put().to(handlers::update_passenger_profile))
                .route("/rides", web::get().to(handlers::ride_history))
                .route("/rides/request", web::post().to(handlers::request_ride))
                .route("/rides/{ride_id}/cancel", web::put().to(handlers::cancel_ride))
                .route("/rides/{ride_id}/rate", web::post().to(handlers::rate_ride)),
        )
        .service(
            web::scope("/drivers")
                .route("/register", web::post().to(handlers::register_driver))
                .route("/status", web::put().to(handlers::update_driver_status))
                .route("/vehicles", web::post().to(handlers::add_vehicle))
                .route("/vehicles", web::get().to(handlers::driver_vehicles))
                .route(
                    "/high-performing",
                    web::get().to(handlers::high_performing_drivers),
                )
                .route("/profile", web::get().to(handlers::driver_profile)),
        )
        .service(
            web::scope("/rides")
                .route("", web::post().to(handlers::create_ride))
                .route("/active", web::get().to(handlers::active_rides))
                .route("/traffic-impact", web::get().to(handlers::traffic_impact))
                .route("/{ride_id}", web::get().to(handlers::ride_detail))
                .route("/{ride_id}/status", web::put().to(handlers::update_ride_status)),
        )
        .service(
            web::scope("/admin")
                .route(
                    "/drivers/summary",
                    web::get().to(handlers::admin_drivers_summary),
                )
                .route(
                    "/passengers/activity",
                    web::get().to(handlers::admin_passenger_activity),
                )
                .route("/rides/stats", web::get().to(handlers::admin_ride_stats))
                .route(
                    "/routes/popular",
                    web::get().to(handlers::admin_popular_routes),
                )
                .route(
                    "/payments/analysis",
                    web::get().to(handlers::admin_payment_analysis),
                )
                .route(
                    "/drivers/performance",
                    web::get().to(handlers::admin_driver_performance),
                )
                .route(
                    "/incidents/analysis",
                    web::get().to(handlers::admin_incident_analysis),
                ),
        )
        .service(
            web::scope("/payments")
                .route("", web::post().to(handlers::process_payment))
                .route("/history", web::get().to(handlers::payment_history))
                .route(
                    "/{payment_id}/refund",
                    web::put().to(handlers::refund_payment),
                ),
        )
}

/// Starts the Rideway API server.
///
/// Opens (or creates) the `SQLite` database, then starts the Actix-Web
/// HTTP server. This is a regular async function; the caller is
/// responsible for providing the async runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind
/// or encounters a runtime error.
///
/// # Panics
///
/// Panics if the database cannot be opened or the schema cannot be
/// created.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let db_path = std::env::var(DB_PATH_ENV_VAR)
        .unwrap_or_else(|_| rideway_database::DEFAULT_DB_PATH.to_string());
    log::info!("Opening database at {db_path}...");
    let db = rideway_database::open_db(Path::new(&db_path))
        .await
        .expect("Failed to open database");

    let state = web::Data::new(AppState {
        db: Arc::from(db),
        estimator: Arc::new(FixedRouteEstimator),
        fare_policy: FarePolicy::DEFAULT,
    });
    let codec = web::Data::new(TokenCodec::from_env());

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .app_data(codec.clone())
            .service(api_scope())
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
