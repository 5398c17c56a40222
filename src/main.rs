mod config;
mod handlers;
mod models;
mod services;
mod state;

use axum::{
    response::Redirect,
    routing::{get, post},
    Router,
};
use dotenvy::dotenv;
use log::{error, info, warn};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use config::Config;
use services::{AdvisoryClient, GeminiClient};
use state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    env_logger::init();

    let config = Config::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;
    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; insight and recommendation panels will show fallbacks");
    }

    let gemini = GeminiClient::new(
        config.gemini_base_url.clone(),
        config.gemini_api_key.clone(),
        config.advisory_timeout,
    )?;
    let advisory = AdvisoryClient::new(
        Arc::new(gemini),
        config.gemini_model.clone(),
        config.advisory_timeout,
    );

    let app = create_router(AppState::new(&config, advisory));

    let addr = format!("0.0.0.0:{}", config.port);
    info!("Vintner & Spirit POS starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::permanent("/dashboard") }))
        .route("/dashboard", get(handlers::dashboard))
        .route("/inventory", get(handlers::inventory::inventory_list))
        .route("/history", get(handlers::history::sales_history))

        // Point of sale
        .route("/pos", get(handlers::pos::pos_screen))
        .route("/pos/cart/:id/add", post(handlers::pos::add_to_cart))
        .route("/pos/cart/:id/remove", post(handlers::pos::remove_from_cart))
        .route("/pos/cart/:id/quantity", post(handlers::pos::update_quantity))
        .route("/pos/checkout", post(handlers::pos::checkout))
        .route("/pos/recommend", post(handlers::pos::recommend))

        // API routes
        .route("/api/products", get(handlers::api::list_products))
        .route("/api/sales", get(handlers::api::list_sales))
        .route("/api/stats", get(handlers::api::stats))
        .route("/api/cart", get(handlers::api::get_cart))
        .route(
            "/api/cart/:id",
            post(handlers::api::add_to_cart)
                .patch(handlers::api::update_quantity)
                .delete(handlers::api::remove_from_cart),
        )
        .route("/api/checkout", post(handlers::api::checkout))
        .route("/api/insights", get(handlers::api::insights))
        .route("/api/recommendation", post(handlers::api::recommendation))

        // Static files
        .nest_service("/static", ServeDir::new("static"))

        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
