use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, Json};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::driver::DriverStatus;
use crate::entities::{admin, customer, driver};
use crate::error::{AppError, AppResult};
use crate::utils::jwt::{create_token, PrincipalRole};
use crate::utils::validate::{is_valid_email, is_valid_phone, password_strength, PasswordStrength};
use crate::AppState;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RegisterRole {
    Customer,
    Driver,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub role: RegisterRole,
    pub username: String,
    pub password: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    // Driver-only fields
    pub car_model: Option<String>,
    pub license_plate: Option<String>,
    pub driver_license: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub principal: PrincipalInfo,
}

#[derive(Debug, Serialize)]
pub struct PrincipalInfo {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: PrincipalRole,
}

/// Register a new customer or driver account. Admin accounts are created
/// only by the startup seed.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<AuthResponse>> {
    validate_registration(&payload)?;
    check_duplicates(&state, &payload).await?;

    let password_hash = hash_password(&payload.password)?;
    let id = Uuid::new_v4();

    let (role, username, email) = match payload.role {
        RegisterRole::Customer => {
            let new_customer = customer::ActiveModel {
                id: Set(id),
                username: Set(payload.username.clone()),
                password_hash: Set(password_hash),
                email: Set(payload.email.clone()),
                phone: Set(payload.phone.clone()),
                address: Set(payload.address.clone()),
                ..Default::default()
            };
            let created = new_customer.insert(&state.db).await?;
            (PrincipalRole::Customer, created.username, created.email)
        }
        RegisterRole::Driver => {
            let car_model = required_driver_field(payload.car_model.as_deref(), "car model")?;
            let license_plate =
                required_driver_field(payload.license_plate.as_deref(), "license plate")?;
            let driver_license =
                required_driver_field(payload.driver_license.as_deref(), "driver license")?;

            let new_driver = driver::ActiveModel {
                id: Set(id),
                username: Set(payload.username.clone()),
                password_hash: Set(password_hash),
                full_name: Set(payload.username.clone()),
                email: Set(payload.email.clone()),
                phone: Set(payload.phone.clone()),
                car_model: Set(car_model),
                license_plate: Set(license_plate),
                driver_license: Set(driver_license),
                status: Set(DriverStatus::Available),
                ..Default::default()
            };
            let created = new_driver.insert(&state.db).await?;
            (PrincipalRole::Driver, created.username, created.email)
        }
    };

    let token = create_token(
        id,
        &username,
        &email,
        role,
        &state.config.jwt_secret,
        state.config.jwt_expiration_hours,
    )?;

    Ok(Json(AuthResponse {
        token,
        principal: PrincipalInfo {
            id,
            username,
            email,
            role,
        },
    }))
}

/// Login with username and password. The three principal tables are checked
/// in order: customers, drivers, admins.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let invalid = || AppError::Unauthorized("Invalid username or password".to_string());

    if let Some(found) = customer::Entity::find()
        .filter(customer::Column::Username.eq(&payload.username))
        .one(&state.db)
        .await?
    {
        verify_password(&payload.password, &found.password_hash).map_err(|_| invalid())?;
        return issue_token(&state, found.id, &found.username, &found.email, PrincipalRole::Customer);
    }

    if let Some(found) = driver::Entity::find()
        .filter(driver::Column::Username.eq(&payload.username))
        .one(&state.db)
        .await?
    {
        verify_password(&payload.password, &found.password_hash).map_err(|_| invalid())?;
        return issue_token(&state, found.id, &found.username, &found.email, PrincipalRole::Driver);
    }

    if let Some(found) = admin::Entity::find()
        .filter(admin::Column::Username.eq(&payload.username))
        .one(&state.db)
        .await?
    {
        verify_password(&payload.password, &found.password_hash).map_err(|_| invalid())?;

        let id = found.id;
        let username = found.username.clone();
        let email = found.email.clone();

        let mut active: admin::ActiveModel = found.into();
        active.last_login = Set(Some(Utc::now().into()));
        active.update(&state.db).await?;

        return issue_token(&state, id, &username, &email, PrincipalRole::Admin);
    }

    Err(invalid())
}

fn issue_token(
    state: &AppState,
    id: Uuid,
    username: &str,
    email: &str,
    role: PrincipalRole,
) -> AppResult<Json<AuthResponse>> {
    let token = create_token(
        id,
        username,
        email,
        role,
        &state.config.jwt_secret,
        state.config.jwt_expiration_hours,
    )?;

    Ok(Json(AuthResponse {
        token,
        principal: PrincipalInfo {
            id,
            username: username.to_string(),
            email: email.to_string(),
            role,
        },
    }))
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

fn verify_password(password: &str, hash: &str) -> AppResult<()> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Failed to parse password hash: {}", e)))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::Unauthorized("Invalid username or password".to_string()))
}

fn validate_registration(payload: &RegisterRequest) -> AppResult<()> {
    if payload.username.len() < 5 || payload.password.len() < 5 || payload.email.len() < 5 {
        return Err(AppError::BadRequest(
            "Username, password and email must be at least 5 characters".to_string(),
        ));
    }

    if password_strength(&payload.password) == PasswordStrength::Weak {
        return Err(AppError::BadRequest(
            "Password is too weak: use at least 8 characters mixing case, digits and symbols"
                .to_string(),
        ));
    }

    if !is_valid_email(&payload.email) {
        return Err(AppError::BadRequest(
            "Please enter a valid email address".to_string(),
        ));
    }

    if !is_valid_phone(&payload.phone) {
        return Err(AppError::BadRequest(
            "Phone number must be in the format (868) XXX-XXXX".to_string(),
        ));
    }

    Ok(())
}

fn required_driver_field(value: Option<&str>, name: &str) -> AppResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.to_string()),
        _ => Err(AppError::BadRequest(format!(
            "Driver registration requires a {}",
            name
        ))),
    }
}

/// Email, phone and username must be unique across customers, drivers and
/// admins alike, since login resolves usernames against all three tables.
async fn check_duplicates(state: &AppState, payload: &RegisterRequest) -> AppResult<()> {
    let customers = customer::Entity::find()
        .filter(
            Condition::any()
                .add(customer::Column::Email.eq(&payload.email))
                .add(customer::Column::Phone.eq(&payload.phone))
                .add(customer::Column::Username.eq(&payload.username)),
        )
        .all(&state.db)
        .await?;

    for existing in &customers {
        check_duplicate_fields(
            payload,
            &existing.email,
            &existing.phone,
            &existing.username,
        )?;
    }

    let drivers = driver::Entity::find()
        .filter(
            Condition::any()
                .add(driver::Column::Email.eq(&payload.email))
                .add(driver::Column::Phone.eq(&payload.phone))
                .add(driver::Column::Username.eq(&payload.username)),
        )
        .all(&state.db)
        .await?;

    for existing in &drivers {
        check_duplicate_fields(
            payload,
            &existing.email,
            &existing.phone,
            &existing.username,
        )?;
    }

    let admins = admin::Entity::find()
        .filter(
            Condition::any()
                .add(admin::Column::Email.eq(&payload.email))
                .add(admin::Column::Username.eq(&payload.username)),
        )
        .all(&state.db)
        .await?;

    for existing in &admins {
        check_duplicate_fields(payload, &existing.email, "", &existing.username)?;
    }

    Ok(())
}

fn check_duplicate_fields(
    payload: &RegisterRequest,
    email: &str,
    phone: &str,
    username: &str,
) -> AppResult<()> {
    if email == payload.email {
        return Err(AppError::Conflict(
            "This email is already registered".to_string(),
        ));
    }
    if !phone.is_empty() && phone == payload.phone {
        return Err(AppError::Conflict(
            "This phone number is already registered".to_string(),
        ));
    }
    if username == payload.username {
        return Err(AppError::Conflict(
            "This username is already taken".to_string(),
        ));
    }
    Ok(())
}
