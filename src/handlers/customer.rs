use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Timelike, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::booking::{self, BookingStatus};
use crate::entities::driver::{self, DriverStatus};
use crate::error::{AppError, AppResult};
use crate::utils::fare::{estimate_fare, FareEstimate};
use crate::utils::jwt::Claims;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct EstimateRequest {
    pub pickup_lat: f64,
    pub pickup_lng: f64,
    pub dropoff_lat: f64,
    pub dropoff_lng: f64,
}

/// Quote a fare for a trip between two coordinates, priced at the current
/// hour. Pure calculation, nothing is stored.
pub async fn estimate(Json(payload): Json<EstimateRequest>) -> AppResult<Json<FareEstimate>> {
    let quote = estimate_fare(
        payload.pickup_lat,
        payload.pickup_lng,
        payload.dropoff_lat,
        payload.dropoff_lng,
        Utc::now().hour(),
    );
    Ok(Json(quote))
}

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub pickup_location: String,
    pub dropoff_location: String,
    pub pickup_lat: f64,
    pub pickup_lng: f64,
    pub dropoff_lat: f64,
    pub dropoff_lng: f64,
    pub pickup_time: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub pickup_time: DateTime<Utc>,
    pub status: BookingStatus,
    pub fare: f64,
    pub driver_username: Option<String>,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl BookingResponse {
    fn from_model(model: booking::Model, driver_username: Option<String>) -> Self {
        Self {
            id: model.id,
            pickup_location: model.pickup_location,
            dropoff_location: model.dropoff_location,
            pickup_time: model.pickup_time.with_timezone(&Utc),
            status: model.status,
            fare: model.fare,
            driver_username,
            cancellation_reason: model.cancellation_reason,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

/// Create a booking. The fare is computed server-side from the supplied
/// coordinates at the current hour; the booking starts `pending` with no
/// driver or admin attached.
pub async fn create_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateBookingRequest>,
) -> AppResult<Json<BookingResponse>> {
    if payload.pickup_location.trim().is_empty() || payload.dropoff_location.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Pickup and dropoff locations are required".to_string(),
        ));
    }

    if payload.pickup_time < Utc::now() {
        return Err(AppError::BadRequest(
            "Pickup time cannot be in the past".to_string(),
        ));
    }

    let quote = estimate_fare(
        payload.pickup_lat,
        payload.pickup_lng,
        payload.dropoff_lat,
        payload.dropoff_lng,
        Utc::now().hour(),
    );

    let new_booking = booking::ActiveModel {
        id: Set(Uuid::new_v4()),
        customer_id: Set(claims.sub),
        driver_id: Set(None),
        admin_id: Set(None),
        pickup_location: Set(payload.pickup_location.clone()),
        dropoff_location: Set(payload.dropoff_location.clone()),
        pickup_time: Set(payload.pickup_time.into()),
        status: Set(BookingStatus::Pending),
        fare: Set(quote.fare),
        cancellation_reason: Set(None),
        ..Default::default()
    };

    let created = new_booking.insert(&state.db).await?;

    tracing::info!(booking_id = %created.id, customer_id = %claims.sub, "booking created");

    Ok(Json(BookingResponse::from_model(created, None)))
}

/// List the customer's own bookings, newest first, with the assigned
/// driver's username when present.
pub async fn my_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<Vec<BookingResponse>>> {
    let bookings = booking::Entity::find()
        .filter(booking::Column::CustomerId.eq(claims.sub))
        .order_by_desc(booking::Column::CreatedAt)
        .all(&state.db)
        .await?;

    let drivers = driver::Entity::find().all(&state.db).await?;

    let responses: Vec<BookingResponse> = bookings
        .into_iter()
        .map(|b| {
            let driver_username = b
                .driver_id
                .and_then(|did| drivers.iter().find(|d| d.id == did))
                .map(|d| d.username.clone());
            BookingResponse::from_model(b, driver_username)
        })
        .collect();

    Ok(Json(responses))
}

#[derive(Debug, Serialize)]
pub struct ActiveDriverResponse {
    pub driver_id: Uuid,
    pub full_name: String,
    pub car_model: String,
    pub license_plate: String,
    pub phone: String,
    pub email: String,
    pub driver_status: DriverStatus,
    pub booking_id: Uuid,
    pub booking_status: BookingStatus,
    pub pickup_location: String,
    pub dropoff_location: String,
}

/// Show the drivers currently serving this customer: one entry per booking
/// in `confirmed` or `on_the_way` status, latest pickup first.
pub async fn active_drivers(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<Vec<ActiveDriverResponse>>> {
    let bookings = booking::Entity::find()
        .filter(booking::Column::CustomerId.eq(claims.sub))
        .filter(
            booking::Column::Status
                .is_in([BookingStatus::Confirmed, BookingStatus::OnTheWay]),
        )
        .order_by_desc(booking::Column::PickupTime)
        .all(&state.db)
        .await?;

    let drivers = driver::Entity::find().all(&state.db).await?;

    let responses: Vec<ActiveDriverResponse> = bookings
        .into_iter()
        .filter_map(|b| {
            let driver = drivers.iter().find(|d| Some(d.id) == b.driver_id)?;
            Some(ActiveDriverResponse {
                driver_id: driver.id,
                full_name: driver.full_name.clone(),
                car_model: driver.car_model.clone(),
                license_plate: driver.license_plate.clone(),
                phone: driver.phone.clone(),
                email: driver.email.clone(),
                driver_status: driver.status,
                booking_id: b.id,
                booking_status: b.status,
                pickup_location: b.pickup_location,
                dropoff_location: b.dropoff_location,
            })
        })
        .collect();

    Ok(Json(responses))
}
