use askama::Template;
use axum::{extract::State, http::StatusCode, response::Html};

use crate::{handlers::render, models::ProductDisplay, state::AppState};

#[derive(Template)]
#[template(path = "inventory.html")]
struct InventoryTemplate {
    active: &'static str,
    products: Vec<ProductDisplay>,
}

// Handler to display the inventory table
pub async fn inventory_list(State(state): State<AppState>) -> Result<Html<String>, StatusCode> {
    let products = state
        .session
        .lock()
        .await
        .catalog()
        .products()
        .iter()
        .map(ProductDisplay::from)
        .collect();

    render(InventoryTemplate {
        active: "inventory",
        products,
    })
}
