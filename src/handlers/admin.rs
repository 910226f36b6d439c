use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::booking::{self, BookingStatus};
use crate::entities::driver::{self, DriverStatus};
use crate::entities::customer;
use crate::error::{AppError, AppResult};
use crate::utils::jwt::Claims;
use crate::AppState;

// ============ Booking Management ============

#[derive(Debug, Serialize)]
pub struct BookingSummary {
    pub id: Uuid,
    pub customer_username: String,
    pub driver_username: Option<String>,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub pickup_time: DateTime<Utc>,
    pub status: BookingStatus,
    pub fare: f64,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BookingSort {
    #[default]
    Newest,
    Oldest,
    PickupLatest,
    PickupEarliest,
}

#[derive(Debug, Deserialize, Default)]
pub struct BookingsQuery {
    #[serde(default)]
    pub sort: BookingSort,
}

/// List every booking with customer and driver usernames, for the
/// management view.
pub async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<BookingsQuery>,
) -> AppResult<Json<Vec<BookingSummary>>> {
    let mut finder = booking::Entity::find();
    finder = match query.sort {
        BookingSort::Newest => finder.order_by_desc(booking::Column::CreatedAt),
        BookingSort::Oldest => finder.order_by_asc(booking::Column::CreatedAt),
        BookingSort::PickupLatest => finder.order_by_desc(booking::Column::PickupTime),
        BookingSort::PickupEarliest => finder.order_by_asc(booking::Column::PickupTime),
    };
    let bookings = finder.all(&state.db).await?;

    let customers = customer::Entity::find().all(&state.db).await?;
    let drivers = driver::Entity::find().all(&state.db).await?;

    let responses: Vec<BookingSummary> = bookings
        .into_iter()
        .map(|b| {
            let customer_username = customers
                .iter()
                .find(|c| c.id == b.customer_id)
                .map(|c| c.username.clone())
                .unwrap_or_default();
            let driver_username = b
                .driver_id
                .and_then(|did| drivers.iter().find(|d| d.id == did))
                .map(|d| d.username.clone());

            BookingSummary {
                id: b.id,
                customer_username,
                driver_username,
                pickup_location: b.pickup_location,
                dropoff_location: b.dropoff_location,
                pickup_time: b.pickup_time.with_timezone(&Utc),
                status: b.status,
                fare: b.fare,
                cancellation_reason: b.cancellation_reason,
                created_at: b.created_at.with_timezone(&Utc),
            }
        })
        .collect();

    Ok(Json(responses))
}

// ============ Driver Assignment ============

#[derive(Debug, Serialize)]
pub struct AvailableDriverResponse {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub car_model: String,
    pub status: DriverStatus,
}

/// Drivers with an assigned booking they have not yet answered. These are
/// the only drivers blocked from new assignments: a driver mid-trip
/// (`confirmed`/`on_the_way`) becomes offerable again, matching the
/// long-standing assignment contract.
async fn assigned_driver_ids(state: &AppState) -> AppResult<Vec<Uuid>> {
    let assigned = booking::Entity::find()
        .filter(booking::Column::Status.eq(BookingStatus::Assigned))
        .all(&state.db)
        .await?;

    Ok(assigned.into_iter().filter_map(|b| b.driver_id).collect())
}

/// List drivers eligible for assignment, ordered by username.
pub async fn available_drivers(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<AvailableDriverResponse>>> {
    let blocked = assigned_driver_ids(&state).await?;

    let drivers = driver::Entity::find()
        .order_by_asc(driver::Column::Username)
        .all(&state.db)
        .await?;

    let responses: Vec<AvailableDriverResponse> = drivers
        .into_iter()
        .filter(|d| !blocked.contains(&d.id))
        .map(|d| AvailableDriverResponse {
            id: d.id,
            username: d.username,
            full_name: d.full_name,
            car_model: d.car_model,
            status: d.status,
        })
        .collect();

    Ok(Json(responses))
}

#[derive(Debug, Deserialize)]
pub struct AssignDriverRequest {
    pub driver_id: Uuid,
}

/// Assign a driver to a pending booking: sets the driver, records the acting
/// admin and moves the booking to `assigned`.
pub async fn assign_driver(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(booking_id): Path<Uuid>,
    Json(payload): Json<AssignDriverRequest>,
) -> AppResult<Json<booking::Model>> {
    let found = booking::Entity::find_by_id(booking_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    if !found.status.can_transition_to(BookingStatus::Assigned) {
        return Err(AppError::InvalidTransition {
            from: found.status,
            to: BookingStatus::Assigned,
        });
    }

    driver::Entity::find_by_id(payload.driver_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Driver not found".to_string()))?;

    // At most one `assigned` booking per driver
    let blocked = assigned_driver_ids(&state).await?;
    if blocked.contains(&payload.driver_id) {
        return Err(AppError::Conflict(
            "Driver already has an assigned booking".to_string(),
        ));
    }

    let mut active: booking::ActiveModel = found.into();
    active.driver_id = Set(Some(payload.driver_id));
    active.admin_id = Set(Some(claims.sub));
    active.status = Set(BookingStatus::Assigned);

    let updated = active.update(&state.db).await?;

    tracing::info!(
        booking_id = %booking_id,
        driver_id = %payload.driver_id,
        admin_id = %claims.sub,
        "driver assigned"
    );

    Ok(Json(updated))
}

/// Release an assigned booking back to the pending pool, clearing both the
/// driver and the assigning admin.
pub async fn unassign_driver(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> AppResult<Json<booking::Model>> {
    let found = booking::Entity::find_by_id(booking_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    if !found.status.can_transition_to(BookingStatus::Pending) {
        return Err(AppError::InvalidTransition {
            from: found.status,
            to: BookingStatus::Pending,
        });
    }

    let mut active: booking::ActiveModel = found.into();
    active.driver_id = Set(None);
    active.admin_id = Set(None);
    active.status = Set(BookingStatus::Pending);

    let updated = active.update(&state.db).await?;

    tracing::info!(booking_id = %booking_id, "driver unassigned");

    Ok(Json(updated))
}

// ============ Principal Listings ============

#[derive(Debug, Serialize)]
pub struct DriverResponse {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub car_model: String,
    pub license_plate: String,
    pub status: DriverStatus,
    pub created_at: DateTime<Utc>,
}

/// List all drivers (admin)
pub async fn list_drivers(State(state): State<AppState>) -> AppResult<Json<Vec<DriverResponse>>> {
    let drivers = driver::Entity::find()
        .order_by_asc(driver::Column::Username)
        .all(&state.db)
        .await?;

    let responses: Vec<DriverResponse> = drivers
        .into_iter()
        .map(|d| DriverResponse {
            id: d.id,
            username: d.username,
            full_name: d.full_name,
            email: d.email,
            phone: d.phone,
            car_model: d.car_model,
            license_plate: d.license_plate,
            status: d.status,
            created_at: d.created_at.with_timezone(&Utc),
        })
        .collect();

    Ok(Json(responses))
}

#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// List all customers (admin)
pub async fn list_customers(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CustomerResponse>>> {
    let customers = customer::Entity::find()
        .order_by_asc(customer::Column::Username)
        .all(&state.db)
        .await?;

    let responses: Vec<CustomerResponse> = customers
        .into_iter()
        .map(|c| CustomerResponse {
            id: c.id,
            username: c.username,
            email: c.email,
            phone: c.phone,
            address: c.address,
            created_at: c.created_at.with_timezone(&Utc),
        })
        .collect();

    Ok(Json(responses))
}
