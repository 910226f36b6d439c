use std::net::SocketAddr;

use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use sea_orm_migration::MigratorTrait;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use taxi_booking_backend::{
    config::Config,
    db,
    entities::admin,
    handlers::auth::hash_password,
    routes, AppState,
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taxi_booking_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    tracing::info!("Starting server at {}", config.server_addr());

    // Connect to database
    let db = db::connect(&config)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Connected to database");

    // Run migrations
    migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    tracing::info!("Migrations complete");

    // Seed admin account if not exists
    seed_admin(&db).await;

    // Create app state
    let state = AppState {
        db,
        config: config.clone(),
    };

    // Create router with middleware
    let app = routes::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any));

    // Start server with socket address for the IP-based rate limiter
    let addr: SocketAddr = config.server_addr().parse().expect("Invalid address");
    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Failed to start server");
}

/// Seed the admin account if it doesn't exist. Admins have no registration
/// path; this is the only way one is created.
async fn seed_admin(db: &sea_orm::DatabaseConnection) {
    let admin_username = "admin";

    let existing = admin::Entity::find()
        .filter(admin::Column::Username.eq(admin_username))
        .one(db)
        .await
        .expect("Failed to check for admin");

    if existing.is_none() {
        let password_hash =
            hash_password("admin123").expect("Failed to hash admin password");

        let seeded = admin::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(admin_username.to_string()),
            password_hash: Set(password_hash),
            email: Set("admin@taxibooking.tt".to_string()),
            full_name: Set("Administrator".to_string()),
            access_level: Set("standard".to_string()),
            last_login: Set(None),
        };

        seeded.insert(db).await.expect("Failed to create admin");
        tracing::info!("Admin account created: {}", admin_username);
    }
}
