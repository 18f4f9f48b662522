//! HTTP handler functions for the Rideway API.
//!
//! Handlers stay thin: parse and gate the request, call into the domain
//! crate, map the domain error onto an HTTP status. Error bodies are
//! always `{"error": message}`; dependency failures are logged and
//! surfaced as a generic 500.

use actix_web::{HttpResponse, web};
use rideway_accounts::{AccountsError, Registration};
use rideway_analytics::{AnalyticsError, reports};
use rideway_auth::{AuthUser, TokenCodec};
use rideway_lifecycle::{CreateRide, LifecycleError};
use rideway_payments::PaymentsError;
use rideway_ride_models::{AccountRole, DriverStatus, PaymentMode, RideStatus, VehicleType};
use rideway_server_models::{
    ApiActiveRide, ApiDriver, ApiHealth, ApiPaymentHistoryEntry, ApiRide, ApiRideDetail,
    ApiRideHistoryEntry, ApiTrustedRide, ApiVehicle, DriverRegisterRequest, DriverStatusRequest,
    LoginRequest, LoginResponse, LoginUser, PaymentRequest, ProfileUpdateRequest, RateRequest,
    RegisterRequest, RideRequest, StatusUpdateRequest, TokenResponse, TrustedRideRequest,
    VehicleRequest,
};

use crate::AppState;

// ---------- health ----------

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/test-db`
///
/// Round-trips a trivial query to prove the store is reachable.
pub async fn test_db(state: web::Data<AppState>) -> HttpResponse {
    match rideway_database::health_check(state.db.as_ref()).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Database connection successful",
            "data": [{ "test": 1 }],
        })),
        Err(e) => {
            log::error!("Failed to reach database: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "message": "Database connection failed",
            }))
        }
    }
}

// ---------- auth ----------

/// `POST /api/auth/register`
///
/// Registers a passenger or driver account and returns a signed token.
pub async fn register(
    state: web::Data<AppState>,
    codec: web::Data<TokenCodec>,
    body: web::Json<RegisterRequest>,
) -> HttpResponse {
    let body = body.into_inner();
    let Ok(role) = body.user_type.parse::<AccountRole>() else {
        return HttpResponse::BadRequest()
            .json(serde_json::json!({ "error": "Invalid user type" }));
    };

    let registration = Registration {
        full_name: body.full_name,
        email: body.email,
        password: body.password,
        phone: body.phone,
        role,
        license_no: body.license_no,
    };

    match rideway_accounts::register(state.db.as_ref(), codec.get_ref(), &registration).await {
        Ok(account) => HttpResponse::Ok().json(TokenResponse {
            token: account.token,
        }),
        Err(e) => accounts_error_response("register account", &e),
    }
}

/// `POST /api/auth/login`
pub async fn login(
    state: web::Data<AppState>,
    codec: web::Data<TokenCodec>,
    body: web::Json<LoginRequest>,
) -> HttpResponse {
    match rideway_accounts::login(state.db.as_ref(), codec.get_ref(), &body.email, &body.password)
        .await
    {
        Ok(outcome) => HttpResponse::Ok().json(LoginResponse {
            token: outcome.token,
            user: LoginUser {
                id: outcome.id,
                name: outcome.name,
                email: outcome.email,
                role: outcome.role,
            },
        }),
        Err(e) => accounts_error_response("log in", &e),
    }
}

/// `GET /api/auth/me`
pub async fn me(state: web::Data<AppState>, user: AuthUser) -> HttpResponse {
    match rideway_accounts::get_me(state.db.as_ref(), user).await {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(e) => accounts_error_response("load current account", &e),
    }
}

// ---------- passengers ----------

/// `GET /api/passengers/profile`
pub async fn passenger_profile(state: web::Data<AppState>, user: AuthUser) -> HttpResponse {
    if let Some(denied) = require_role(user, AccountRole::Passenger) {
        return denied;
    }

    match rideway_accounts::get_passenger_profile(state.db.as_ref(), user.id).await {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(e) => accounts_error_response("load passenger profile", &e),
    }
}

/// `PUT /api/passengers/profile`
///
/// Updates name and phone and returns the refreshed profile. Email is
/// immutable.
pub async fn update_passenger_profile(
    state: web::Data<AppState>,
    user: AuthUser,
    body: web::Json<ProfileUpdateRequest>,
) -> HttpResponse {
    if let Some(denied) = require_role(user, AccountRole::Passenger) {
        return denied;
    }

    match rideway_accounts::update_passenger_profile(
        state.db.as_ref(),
        user.id,
        &body.name,
        &body.phone,
    )
    .await
    {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(e) => accounts_error_response("update passenger profile", &e),
    }
}

/// `GET /api/passengers/rides`
pub async fn ride_history(state: web::Data<AppState>, user: AuthUser) -> HttpResponse {
    if let Some(denied) = require_role(user, AccountRole::Passenger) {
        return denied;
    }

    match rideway_lifecycle::ride_history(state.db.as_ref(), user.id).await {
        Ok(entries) => {
            let rides: Vec<ApiRideHistoryEntry> =
                entries.into_iter().map(ApiRideHistoryEntry::from).collect();
            HttpResponse::Ok().json(rides)
        }
        Err(e) => lifecycle_error_response("load ride history", &e),
    }
}

/// `POST /api/passengers/rides/request`
///
/// Books a ride for the caller: resolves the route, matches the first
/// Active driver with a vehicle of the requested type, computes the
/// fare, and creates the ride in `Requested`.
pub async fn request_ride(
    state: web::Data<AppState>,
    user: AuthUser,
    body: web::Json<RideRequest>,
) -> HttpResponse {
    if let Some(denied) = require_role(user, AccountRole::Passenger) {
        return denied;
    }

    let body = body.into_inner();
    let vehicle_type = match body.vehicle_type.as_deref() {
        None => VehicleType::Car,
        Some(raw) => match raw.parse::<VehicleType>() {
            Ok(parsed) => parsed,
            Err(_) => {
                return HttpResponse::BadRequest()
                    .json(serde_json::json!({ "error": "Invalid vehicle type" }));
            }
        },
    };

    let order = CreateRide::PassengerRequest {
        passenger_id: user.id,
        start_point: body.start_point,
        end_point: body.end_point,
        vehicle_type,
    };

    match rideway_lifecycle::create_ride(
        state.db.as_ref(),
        state.estimator.as_ref(),
        state.fare_policy,
        order,
    )
    .await
    {
        Ok(ride) => HttpResponse::Created().json(ApiRide::from(ride)),
        Err(e) => lifecycle_error_response("request ride", &e),
    }
}

/// `PUT /api/passengers/rides/{ride_id}/cancel`
pub async fn cancel_ride(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<i64>,
) -> HttpResponse {
    if let Some(denied) = require_role(user, AccountRole::Passenger) {
        return denied;
    }

    match rideway_lifecycle::cancel_ride(state.db.as_ref(), path.into_inner(), user.id).await {
        Ok(()) => {
            HttpResponse::Ok().json(serde_json::json!({ "message": "Ride cancelled successfully" }))
        }
        Err(e) => lifecycle_error_response("cancel ride", &e),
    }
}

/// `POST /api/passengers/rides/{ride_id}/rate`
pub async fn rate_ride(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<i64>,
    body: web::Json<RateRequest>,
) -> HttpResponse {
    if let Some(denied) = require_role(user, AccountRole::Passenger) {
        return denied;
    }

    match rideway_lifecycle::rate_ride(
        state.db.as_ref(),
        path.into_inner(),
        user.id,
        body.rating,
        body.feedback.as_deref(),
    )
    .await
    {
        Ok(_) => {
            HttpResponse::Ok().json(serde_json::json!({ "message": "Thank you for your feedback!" }))
        }
        Err(e) => lifecycle_error_response("rate ride", &e),
    }
}

// ---------- drivers ----------

/// `POST /api/drivers/register`
///
/// Fleet-onboarding alias for driver registration; returns the new
/// driver id instead of a session token.
pub async fn register_driver(
    state: web::Data<AppState>,
    body: web::Json<DriverRegisterRequest>,
) -> HttpResponse {
    match rideway_accounts::register_driver(
        state.db.as_ref(),
        &body.full_name,
        &body.email,
        &body.phone,
        &body.license_no,
        &body.password,
    )
    .await
    {
        Ok(driver_id) => HttpResponse::Created().json(serde_json::json!({
            "message": "Driver registered successfully",
            "driverId": driver_id,
        })),
        Err(e) => accounts_error_response("register driver", &e),
    }
}

/// `PUT /api/drivers/status`
pub async fn update_driver_status(
    state: web::Data<AppState>,
    user: AuthUser,
    body: web::Json<DriverStatusRequest>,
) -> HttpResponse {
    if let Some(denied) = require_role(user, AccountRole::Driver) {
        return denied;
    }

    let Ok(status) = body.status.parse::<DriverStatus>() else {
        return HttpResponse::BadRequest().json(serde_json::json!({ "error": "Invalid status" }));
    };

    match rideway_accounts::update_driver_status(state.db.as_ref(), user.id, status).await {
        Ok(()) => {
            HttpResponse::Ok().json(serde_json::json!({ "message": "Driver status updated" }))
        }
        Err(e) => accounts_error_response("update driver status", &e),
    }
}

/// `POST /api/drivers/vehicles`
pub async fn add_vehicle(
    state: web::Data<AppState>,
    user: AuthUser,
    body: web::Json<VehicleRequest>,
) -> HttpResponse {
    if let Some(denied) = require_role(user, AccountRole::Driver) {
        return denied;
    }

    let Ok(vehicle_type) = body.vehicle_type.parse::<VehicleType>() else {
        return HttpResponse::BadRequest()
            .json(serde_json::json!({ "error": "Invalid vehicle type" }));
    };

    match rideway_accounts::add_vehicle(
        state.db.as_ref(),
        user.id,
        &body.model,
        body.capacity,
        vehicle_type,
    )
    .await
    {
        Ok(vehicle_id) => HttpResponse::Created().json(serde_json::json!({
            "message": "Vehicle added successfully",
            "vehicleId": vehicle_id,
        })),
        Err(e) => accounts_error_response("add vehicle", &e),
    }
}

/// `GET /api/drivers/vehicles`
pub async fn driver_vehicles(state: web::Data<AppState>, user: AuthUser) -> HttpResponse {
    if let Some(denied) = require_role(user, AccountRole::Driver) {
        return denied;
    }

    match rideway_accounts::driver_vehicles(state.db.as_ref(), user.id).await {
        Ok(vehicles) => {
            let vehicles: Vec<ApiVehicle> = vehicles.into_iter().map(ApiVehicle::from).collect();
            HttpResponse::Ok().json(vehicles)
        }
        Err(e) => accounts_error_response("list vehicles", &e),
    }
}

/// `GET /api/drivers/high-performing`
///
/// Drivers with at least 20 completed rides and an average rating of
/// 4.5 or better over the last 30 days.
pub async fn high_performing_drivers(state: web::Data<AppState>, _user: AuthUser) -> HttpResponse {
    match reports::high_performing_drivers(state.db.as_ref()).await {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(e) => analytics_error_response("list high-performing drivers", &e),
    }
}

/// `GET /api/drivers/profile`
pub async fn driver_profile(state: web::Data<AppState>, user: AuthUser) -> HttpResponse {
    if let Some(denied) = require_role(user, AccountRole::Driver) {
        return denied;
    }

    match rideway_accounts::get_driver_profile(state.db.as_ref(), user.id).await {
        Ok(driver) => HttpResponse::Ok().json(ApiDriver::from(driver)),
        Err(e) => accounts_error_response("load driver profile", &e),
    }
}

// ---------- rides ----------

/// `POST /api/rides`
///
/// Trusted-client booking: the caller supplies route measurements and a
/// precomputed fare, and the ride starts out `Accepted`.
pub async fn create_ride(
    state: web::Data<AppState>,
    _user: AuthUser,
    body: web::Json<TrustedRideRequest>,
) -> HttpResponse {
    let body = body.into_inner();
    // Driver hints arrive as numbers or numeric strings; anything else
    // means no preference.
    let driver_id = body.driver_id.as_ref().and_then(|value| {
        value
            .as_i64()
            .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
    });
    let vehicle_type = body
        .vehicle_type
        .as_deref()
        .and_then(|raw| raw.parse::<VehicleType>().ok())
        .unwrap_or(VehicleType::Car);

    let order = CreateRide::Trusted {
        passenger_id: body.passenger_id,
        driver_id,
        start_point: body.pickup.address,
        end_point: body.destination.address,
        distance_km: body.distance,
        duration_min: body.duration,
        fare: body.fare,
        vehicle_type,
    };

    match rideway_lifecycle::create_ride(
        state.db.as_ref(),
        state.estimator.as_ref(),
        state.fare_policy,
        order,
    )
    .await
    {
        Ok(ride) => HttpResponse::Created().json(ApiTrustedRide::from(ride)),
        Err(e) => lifecycle_error_response("book ride", &e),
    }
}

/// `GET /api/rides/active`
pub async fn active_rides(state: web::Data<AppState>, _user: AuthUser) -> HttpResponse {
    match rideway_lifecycle::active_rides(state.db.as_ref()).await {
        Ok(rides) => {
            let rides: Vec<ApiActiveRide> = rides.into_iter().map(ApiActiveRide::from).collect();
            HttpResponse::Ok().json(rides)
        }
        Err(e) => lifecycle_error_response("list active rides", &e),
    }
}

/// `GET /api/rides/traffic-impact`
///
/// Compares actual ride durations against route estimates on routes
/// with traffic reports.
pub async fn traffic_impact(state: web::Data<AppState>, _user: AuthUser) -> HttpResponse {
    match reports::traffic_impact(state.db.as_ref()).await {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(e) => analytics_error_response("build traffic impact report", &e),
    }
}

/// `GET /api/rides/{ride_id}`
pub async fn ride_detail(
    state: web::Data<AppState>,
    _user: AuthUser,
    path: web::Path<i64>,
) -> HttpResponse {
    match rideway_lifecycle::ride_detail(state.db.as_ref(), path.into_inner()).await {
        Ok(detail) => HttpResponse::Ok().json(ApiRideDetail::from(detail)),
        Err(e) => lifecycle_error_response("load ride detail", &e),
    }
}

/// `PUT /api/rides/{ride_id}/status`
///
/// Guarded transition: the target status must be reachable from the
/// current one, and the caller must be the assigned driver (forward
/// transitions) or the owning passenger (cancellation).
pub async fn update_ride_status(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<i64>,
    body: web::Json<StatusUpdateRequest>,
) -> HttpResponse {
    let Ok(new_status) = body.status.parse::<RideStatus>() else {
        return HttpResponse::BadRequest().json(serde_json::json!({ "error": "Invalid status" }));
    };

    match rideway_lifecycle::update_status(
        state.db.as_ref(),
        path.into_inner(),
        user.id,
        user.role,
        new_status,
    )
    .await
    {
        Ok(status) => HttpResponse::Ok().json(serde_json::json!({
            "message": format!("Ride status updated to {status}"),
        })),
        Err(e) => lifecycle_error_response("update ride status", &e),
    }
}

// ---------- admin ----------

/// `GET /api/admin/drivers/summary`
pub async fn admin_drivers_summary(state: web::Data<AppState>, _user: AuthUser) -> HttpResponse {
    match reports::active_drivers_summary(state.db.as_ref()).await {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(e) => analytics_error_response("build drivers summary", &e),
    }
}

/// `GET /api/admin/passengers/activity`
pub async fn admin_passenger_activity(
    state: web::Data<AppState>,
    _user: AuthUser,
) -> HttpResponse {
    match reports::passenger_activity(state.db.as_ref()).await {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(e) => analytics_error_response("build passenger activity report", &e),
    }
}

/// `GET /api/admin/rides/stats`
pub async fn admin_ride_stats(state: web::Data<AppState>, _user: AuthUser) -> HttpResponse {
    match reports::daily_ride_stats(state.db.as_ref()).await {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(e) => analytics_error_response("build daily ride stats", &e),
    }
}

/// `GET /api/admin/routes/popular`
pub async fn admin_popular_routes(state: web::Data<AppState>, _user: AuthUser) -> HttpResponse {
    match reports::popular_routes(state.db.as_ref()).await {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(e) => analytics_error_response("build popular routes report", &e),
    }
}

/// `GET /api/admin/payments/analysis`
pub async fn admin_payment_analysis(state: web::Data<AppState>, _user: AuthUser) -> HttpResponse {
    match reports::payment_mode_analysis(state.db.as_ref()).await {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(e) => analytics_error_response("build payment analysis", &e),
    }
}

/// `GET /api/admin/drivers/performance`
pub async fn admin_driver_performance(
    state: web::Data<AppState>,
    _user: AuthUser,
) -> HttpResponse {
    match reports::driver_performance(state.db.as_ref()).await {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(e) => analytics_error_response("build driver performance report", &e),
    }
}

/// `GET /api/admin/incidents/analysis`
pub async fn admin_incident_analysis(state: web::Data<AppState>, _user: AuthUser) -> HttpResponse {
    match reports::incident_analysis(state.db.as_ref()).await {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(e) => analytics_error_response("build incident analysis", &e),
    }
}

// ---------- payments ----------

/// `POST /api/payments`
pub async fn process_payment(
    state: web::Data<AppState>,
    _user: AuthUser,
    body: web::Json<PaymentRequest>,
) -> HttpResponse {
    let Ok(mode) = body.mode.parse::<PaymentMode>() else {
        return HttpResponse::BadRequest()
            .json(serde_json::json!({ "error": "Invalid payment mode" }));
    };

    match rideway_payments::record_payment(state.db.as_ref(), body.ride_id, body.amount, mode)
        .await
    {
        Ok(payment) => HttpResponse::Created().json(serde_json::json!({
            "message": "Payment processed successfully",
            "paymentId": payment.id,
        })),
        Err(e) => payments_error_response("process payment", &e),
    }
}

/// `GET /api/payments/history`
pub async fn payment_history(state: web::Data<AppState>, user: AuthUser) -> HttpResponse {
    match rideway_payments::payment_history(state.db.as_ref(), user.id).await {
        Ok(entries) => {
            let entries: Vec<ApiPaymentHistoryEntry> = entries
                .into_iter()
                .map(ApiPaymentHistoryEntry::from)
                .collect();
            HttpResponse::Ok().json(entries)
        }
        Err(e) => payments_error_response("load payment history", &e),
    }
}

/// `PUT /api/payments/{payment_id}/refund`
pub async fn refund_payment(
    state: web::Data<AppState>,
    _user: AuthUser,
    path: web::Path<i64>,
) -> HttpResponse {
    match rideway_payments::refund(state.db.as_ref(), path.into_inner()).await {
        Ok(_) => HttpResponse::Ok()
            .json(serde_json::json!({ "message": "Payment refunded successfully" })),
        Err(e) => payments_error_response("refund payment", &e),
    }
}

// ---------- error mapping ----------

/// Returns a 403 response when the caller's role does not match.
fn require_role(user: AuthUser, required: AccountRole) -> Option<HttpResponse> {
    if user.role == required {
        None
    } else {
        Some(HttpResponse::Forbidden().json(serde_json::json!({ "error": "Access denied" })))
    }
}

fn accounts_error_response(context: &str, e: &AccountsError) -> HttpResponse {
    match e {
        AccountsError::EmailTaken
        | AccountsError::InvalidCredentials
        | AccountsError::Validation { .. } => {
            HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
        }
        AccountsError::NotFound { .. } => {
            HttpResponse::NotFound().json(serde_json::json!({ "error": e.to_string() }))
        }
        AccountsError::Database(_) | AccountsError::Auth(_) | AccountsError::Conversion { .. } => {
            server_error(context, e)
        }
    }
}

fn lifecycle_error_response(context: &str, e: &LifecycleError) -> HttpResponse {
    match e {
        LifecycleError::RideNotFound | LifecycleError::NoDriversAvailable => {
            HttpResponse::NotFound().json(serde_json::json!({ "error": e.to_string() }))
        }
        LifecycleError::InvalidTransition { .. } | LifecycleError::Conflict => {
            HttpResponse::Conflict().json(serde_json::json!({ "error": e.to_string() }))
        }
        LifecycleError::AlreadyTerminal { .. }
        | LifecycleError::NotCompleted
        | LifecycleError::AlreadyRated => {
            HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
        }
        LifecycleError::Database(_) | LifecycleError::Conversion { .. } => server_error(context, e),
    }
}

fn payments_error_response(context: &str, e: &PaymentsError) -> HttpResponse {
    match e {
        PaymentsError::NotFound => {
            HttpResponse::NotFound().json(serde_json::json!({ "error": e.to_string() }))
        }
        PaymentsError::RefundNotAllowed => {
            HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
        }
        PaymentsError::Conflict => {
            HttpResponse::Conflict().json(serde_json::json!({ "error": e.to_string() }))
        }
        PaymentsError::Database(_) | PaymentsError::Conversion { .. } => server_error(context, e),
    }
}

fn analytics_error_response(context: &str, e: &AnalyticsError) -> HttpResponse {
    server_error(context, e)
}

fn server_error(context: &str, e: &dyn std::fmt::Display) -> HttpResponse {
    log::error!("Failed to {context}: {e}");
    HttpResponse::InternalServerError().json(serde_json::json!({ "error": "Server error" }))
}
