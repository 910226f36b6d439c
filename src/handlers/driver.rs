use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::booking::{self, BookingStatus};
use crate::entities::driver::{self, DriverStatus};
use crate::entities::{admin, customer};
use crate::error::{AppError, AppResult};
use crate::utils::jwt::Claims;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct TripRequestResponse {
    pub booking_id: Uuid,
    pub customer_username: String,
    pub assigned_by: Option<String>,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub pickup_time: DateTime<Utc>,
    pub status: BookingStatus,
    pub fare: f64,
    pub cancellation_reason: Option<String>,
}

fn trip_response(
    b: booking::Model,
    customers: &[customer::Model],
    admins: &[admin::Model],
) -> TripRequestResponse {
    let customer_username = customers
        .iter()
        .find(|c| c.id == b.customer_id)
        .map(|c| c.username.clone())
        .unwrap_or_default();
    let assigned_by = b
        .admin_id
        .and_then(|aid| admins.iter().find(|a| a.id == aid))
        .map(|a| a.username.clone());

    TripRequestResponse {
        booking_id: b.id,
        customer_username,
        assigned_by,
        pickup_location: b.pickup_location,
        dropoff_location: b.dropoff_location,
        pickup_time: b.pickup_time.with_timezone(&Utc),
        status: b.status,
        fare: b.fare,
        cancellation_reason: b.cancellation_reason,
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequestSort {
    #[default]
    Latest,
    Earliest,
    Status,
}

#[derive(Debug, Deserialize, Default)]
pub struct RequestsQuery {
    #[serde(default)]
    pub sort: RequestSort,
}

/// List every booking assigned to the logged-in driver, in any status.
pub async fn my_requests(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<RequestsQuery>,
) -> AppResult<Json<Vec<TripRequestResponse>>> {
    let bookings = booking::Entity::find()
        .filter(booking::Column::DriverId.eq(claims.sub))
        .all(&state.db)
        .await?;

    let customers = customer::Entity::find().all(&state.db).await?;
    let admins = admin::Entity::find().all(&state.db).await?;

    let mut responses: Vec<TripRequestResponse> = bookings
        .into_iter()
        .map(|b| trip_response(b, &customers, &admins))
        .collect();

    match query.sort {
        RequestSort::Latest => responses.sort_by(|a, b| b.pickup_time.cmp(&a.pickup_time)),
        RequestSort::Earliest => responses.sort_by(|a, b| a.pickup_time.cmp(&b.pickup_time)),
        RequestSort::Status => responses.sort_by(|a, b| {
            a.status
                .as_str()
                .cmp(b.status.as_str())
                .then(b.pickup_time.cmp(&a.pickup_time))
        }),
    }

    Ok(Json(responses))
}

/// List the driver's in-progress trips: `on_the_way` first, then by pickup
/// time.
pub async fn active_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<Vec<TripRequestResponse>>> {
    let bookings = booking::Entity::find()
        .filter(booking::Column::DriverId.eq(claims.sub))
        .filter(
            booking::Column::Status
                .is_in([BookingStatus::Confirmed, BookingStatus::OnTheWay]),
        )
        .all(&state.db)
        .await?;

    let customers = customer::Entity::find().all(&state.db).await?;
    let admins = admin::Entity::find().all(&state.db).await?;

    let mut responses: Vec<TripRequestResponse> = bookings
        .into_iter()
        .map(|b| trip_response(b, &customers, &admins))
        .collect();

    responses.sort_by(|a, b| {
        let rank = |s: BookingStatus| if s == BookingStatus::OnTheWay { 0 } else { 1 };
        rank(a.status)
            .cmp(&rank(b.status))
            .then(a.pickup_time.cmp(&b.pickup_time))
    });

    Ok(Json(responses))
}

#[derive(Debug, Deserialize, Default)]
pub struct HistoryQuery {
    pub status: Option<BookingStatus>,
}

/// List the driver's finished trips (`completed` / `incomplete`), optionally
/// narrowed to one of the two.
pub async fn booking_history(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<Vec<TripRequestResponse>>> {
    if let Some(status) = query.status {
        if !matches!(status, BookingStatus::Completed | BookingStatus::Incomplete) {
            return Err(AppError::BadRequest(
                "History filter must be 'completed' or 'incomplete'".to_string(),
            ));
        }
    }

    let statuses = match query.status {
        Some(status) => vec![status],
        None => vec![BookingStatus::Completed, BookingStatus::Incomplete],
    };

    let bookings = booking::Entity::find()
        .filter(booking::Column::DriverId.eq(claims.sub))
        .filter(booking::Column::Status.is_in(statuses))
        .all(&state.db)
        .await?;

    let customers = customer::Entity::find().all(&state.db).await?;
    let admins = admin::Entity::find().all(&state.db).await?;

    let mut responses: Vec<TripRequestResponse> = bookings
        .into_iter()
        .map(|b| trip_response(b, &customers, &admins))
        .collect();
    responses.sort_by(|a, b| b.pickup_time.cmp(&a.pickup_time));

    Ok(Json(responses))
}

/// Accept an assigned trip.
pub async fn confirm_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(booking_id): Path<Uuid>,
) -> AppResult<Json<booking::Model>> {
    let updated =
        apply_transition(&state, &claims, booking_id, BookingStatus::Confirmed, None).await?;
    Ok(Json(updated))
}

/// Turn down an assigned trip.
pub async fn decline_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(booking_id): Path<Uuid>,
) -> AppResult<Json<booking::Model>> {
    let updated =
        apply_transition(&state, &claims, booking_id, BookingStatus::Declined, None).await?;
    Ok(Json(updated))
}

/// Start a confirmed trip.
pub async fn start_trip(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(booking_id): Path<Uuid>,
) -> AppResult<Json<booking::Model>> {
    let updated =
        apply_transition(&state, &claims, booking_id, BookingStatus::OnTheWay, None).await?;
    Ok(Json(updated))
}

/// Complete a trip that is on the way.
pub async fn complete_trip(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(booking_id): Path<Uuid>,
) -> AppResult<Json<booking::Model>> {
    let updated =
        apply_transition(&state, &claims, booking_id, BookingStatus::Completed, None).await?;
    Ok(Json(updated))
}

#[derive(Debug, Deserialize)]
pub struct CancelTripRequest {
    pub reason: String,
}

/// Abort a trip that is on the way. A non-empty reason is mandatory and is
/// recorded on the booking.
pub async fn cancel_trip(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(booking_id): Path<Uuid>,
    Json(payload): Json<CancelTripRequest>,
) -> AppResult<Json<booking::Model>> {
    let reason = payload.reason.trim();
    if reason.is_empty() {
        return Err(AppError::BadRequest(
            "A cancellation reason is required".to_string(),
        ));
    }

    let updated = apply_transition(
        &state,
        &claims,
        booking_id,
        BookingStatus::Incomplete,
        Some(reason.to_string()),
    )
    .await?;
    Ok(Json(updated))
}

/// Shared driver-side transition: the actor must be the assigned driver and
/// the status change must be in the lifecycle table. Both checks happen
/// before the single-row update, so a disallowed attempt never touches the
/// database.
async fn apply_transition(
    state: &AppState,
    claims: &Claims,
    booking_id: Uuid,
    to: BookingStatus,
    cancellation_reason: Option<String>,
) -> AppResult<booking::Model> {
    let found = booking::Entity::find_by_id(booking_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    if found.driver_id != Some(claims.sub) {
        return Err(AppError::Forbidden(
            "You are not assigned to this booking".to_string(),
        ));
    }

    if !found.status.can_transition_to(to) {
        return Err(AppError::InvalidTransition {
            from: found.status,
            to,
        });
    }

    let from = found.status;
    let mut active: booking::ActiveModel = found.into();
    active.status = Set(to);
    if let Some(reason) = cancellation_reason {
        active.cancellation_reason = Set(Some(reason));
    }

    let updated = active.update(&state.db).await?;

    tracing::info!(
        booking_id = %booking_id,
        driver_id = %claims.sub,
        from = from.as_str(),
        to = to.as_str(),
        "booking transition"
    );

    Ok(updated)
}

#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: DriverStatus,
}

/// Set the driver's own availability flag.
pub async fn set_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SetStatusRequest>,
) -> AppResult<Json<driver::Model>> {
    let found = driver::Entity::find_by_id(claims.sub)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Driver not found".to_string()))?;

    let mut active: driver::ActiveModel = found.into();
    active.status = Set(payload.status);
    let updated = active.update(&state.db).await?;

    Ok(Json(updated))
}
