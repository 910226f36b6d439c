use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::handlers::{admin, auth, customer, driver};
use crate::middleware::auth::{auth_middleware, require_admin, require_customer, require_driver};
use crate::middleware::rate_limit::{create_principal_governor, create_public_governor};
use crate::utils::jwt::PrincipalRole;
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    let customer_governor = create_principal_governor(PrincipalRole::Customer);
    let driver_governor = create_principal_governor(PrincipalRole::Driver);
    let public_governor = create_public_governor();

    // Public routes (IP-based rate limiting)
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .layer(public_governor);

    // Customer routes (requires auth + customer role)
    let customer_routes = Router::new()
        .route("/", post(customer::create_booking))
        .route("/", get(customer::my_bookings))
        .route("/estimate", post(customer::estimate))
        .route("/active-drivers", get(customer::active_drivers))
        .layer(customer_governor)
        .layer(middleware::from_fn(require_customer))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Driver routes (requires auth + driver role)
    let driver_routes = Router::new()
        .route("/requests", get(driver::my_requests))
        .route("/active", get(driver::active_bookings))
        .route("/history", get(driver::booking_history))
        .route("/status", put(driver::set_status))
        .route("/bookings/{id}/confirm", post(driver::confirm_booking))
        .route("/bookings/{id}/decline", post(driver::decline_booking))
        .route("/bookings/{id}/start", post(driver::start_trip))
        .route("/bookings/{id}/complete", post(driver::complete_trip))
        .route("/bookings/{id}/cancel", post(driver::cancel_trip))
        .layer(driver_governor)
        .layer(middleware::from_fn(require_driver))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Admin routes (requires auth + admin role, no per-principal limiter)
    let admin_routes = Router::new()
        .route("/bookings", get(admin::list_bookings))
        .route("/bookings/{id}/assign-driver", post(admin::assign_driver))
        .route("/bookings/{id}/unassign-driver", post(admin::unassign_driver))
        .route("/drivers/available", get(admin::available_drivers))
        .route("/drivers", get(admin::list_drivers))
        .route("/customers", get(admin::list_customers))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/bookings", customer_routes)
        .nest("/api/driver", driver_routes)
        .nest("/api/admin", admin_routes)
        .with_state(state)
}
