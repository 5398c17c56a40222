use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    models::{AIInsight, DashboardStats, LineItem, Product, Sale},
    services::{Cart, CheckoutError},
    state::AppState,
};

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl ToString) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

#[derive(Serialize)]
pub struct CartResponse {
    pub items: Vec<LineItem>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().to_vec(),
            subtotal: cart.subtotal(),
            tax: cart.tax(),
            total: cart.total(),
        }
    }
}

#[derive(Deserialize)]
pub struct QuantityRequest {
    pub delta: i64,
}

#[derive(Deserialize)]
pub struct RecommendationRequest {
    pub query: String,
}

#[derive(Serialize)]
pub struct RecommendationResponse {
    pub recommendation: String,
    /// False when a newer query was issued while this one was in flight.
    pub current: bool,
}

pub async fn list_products(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(state.session.lock().await.products_snapshot())
}

pub async fn list_sales(State(state): State<AppState>) -> Json<Vec<Sale>> {
    Json(state.session.lock().await.ledger().sales().to_vec())
}

pub async fn stats(State(state): State<AppState>) -> Json<DashboardStats> {
    Json(state.session.lock().await.stats())
}

pub async fn get_cart(State(state): State<AppState>) -> Json<CartResponse> {
    Json(CartResponse::from(state.session.lock().await.cart()))
}

pub async fn add_to_cart(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<CartResponse>, ApiError> {
    let mut session = state.session.lock().await;
    session
        .add_to_cart(&product_id)
        .map_err(|e| api_error(StatusCode::NOT_FOUND, e))?;
    Ok(Json(CartResponse::from(session.cart())))
}

pub async fn remove_from_cart(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Json<CartResponse> {
    let mut session = state.session.lock().await;
    session.remove_from_cart(&product_id);
    Json(CartResponse::from(session.cart()))
}

pub async fn update_quantity(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Json(request): Json<QuantityRequest>,
) -> Json<CartResponse> {
    let mut session = state.session.lock().await;
    session.update_quantity(&product_id, request.delta);
    Json(CartResponse::from(session.cart()))
}

pub async fn checkout(State(state): State<AppState>) -> Result<Json<Sale>, ApiError> {
    state
        .session
        .lock()
        .await
        .checkout()
        .map(Json)
        .map_err(|e| {
            let status = match e {
                CheckoutError::EmptyCart => StatusCode::BAD_REQUEST,
                CheckoutError::UnknownProduct(_) | CheckoutError::InsufficientStock { .. } => {
                    StatusCode::CONFLICT
                }
            };
            api_error(status, e)
        })
}

pub async fn insights(State(state): State<AppState>) -> Json<Vec<AIInsight>> {
    Json(state.refresh_insights().await)
}

pub async fn recommendation(
    State(state): State<AppState>,
    Json(request): Json<RecommendationRequest>,
) -> Result<Json<RecommendationResponse>, ApiError> {
    let (recommendation, current) = state
        .recommend(&request.query)
        .await
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "query must not be blank"))?;

    Ok(Json(RecommendationResponse {
        recommendation,
        current,
    }))
}
