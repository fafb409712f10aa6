//! Kozijn Comfort window configurator
//!
//! Backend for the single-page configurator where shoppers design window
//! frames and doors and send them in as a quote request.
//!
//! ## Features
//!
//! - **Catalog**: Product archetypes and color swatches
//! - **Configurator**: Stage, confirm and re-edit configured products
//! - **Cart**: Per-shopper cart kept in a cookie session
//! - **Orders**: Business notification and customer confirmation by email

mod cart;
mod catalog;
mod config;
mod email;
mod handlers;
mod mailer;
mod models;
mod order;
mod session;
mod store;
mod validation;

use axum::{
    http::{header, Method},
    middleware, Router,
};
use handlers::AppState;
use mailer::{LogMailer, Mailer, Outbox, SmtpMailer};
use std::sync::Arc;
use store::ShopperStore;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kozijn_configurator=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = config::Config::from_env()?;
    tracing::info!("Starting Kozijn Comfort configurator");
    tracing::info!("Environment: {:?}", config.environment);

    // Mail transport
    let mailer: Arc<dyn Mailer> = match &config.smtp {
        Some(smtp) => Arc::new(SmtpMailer::new(smtp)?),
        None => {
            tracing::warn!("SMTP_HOST not set, order emails will only be logged");
            Arc::new(LogMailer)
        }
    };
    tracing::info!("Business notifications go to {}", config.mail_to);

    let outbox = Arc::new(Outbox::new(
        config.outbox_max_attempts,
        config.outbox_capacity,
    ));
    mailer::spawn_retry_loop(
        outbox.clone(),
        mailer.clone(),
        config.outbox_retry_interval,
    );

    // Create application state
    let state = AppState {
        shoppers: Arc::new(ShopperStore::new(config.session_expiry_hours)),
        mailer,
        outbox,
        orders: Arc::new(config.order_settings()),
        is_production: config.is_production(),
        smtp_configured: config.smtp.is_some(),
    };

    // Build CORS layer
    let cors = if config.is_production() {
        CorsLayer::new()
            .allow_origin(
                config
                    .cors_origins
                    .iter()
                    .filter_map(|o| o.parse().ok())
                    .collect::<Vec<_>>(),
            )
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true)
    } else {
        CorsLayer::permissive()
    };

    // Build main router
    let app = Router::new()
        .nest("/api", handlers::api_router())
        .nest_service("/", ServeDir::new(&config.frontend_dir))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            handlers::middleware::security_headers,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(config.max_body_size))
        .layer(cors)
        .with_state(state);

    // Start server
    let addr = config.server_addr();
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Frontend served from: {}", config.frontend_dir);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
