use askama::Template;
use axum::{
    extract::{Form, Path, Query, State},
    http::StatusCode,
    response::{Html, Redirect},
};
use log::warn;
use serde::Deserialize;

use crate::{
    handlers::render,
    models::{format_money, Category, LineItemDisplay, ProductDisplay},
    state::AppState,
};

const ALL_CATEGORIES: &str = "All";

pub struct CategoryLink {
    pub label: String,
    pub href: String,
    pub active: bool,
}

#[derive(Template)]
#[template(path = "pos.html")]
struct PosTemplate {
    active: &'static str,
    search: String,
    category: String,
    categories: Vec<CategoryLink>,
    products: Vec<ProductDisplay>,
    cart_items: Vec<LineItemDisplay>,
    cart_empty: bool,
    unit_count: u64,
    subtotal: String,
    tax: String,
    total: String,
    recommendation: Option<String>,
    notice: Option<String>,
    notice_is_error: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct PosQuery {
    #[serde(default)]
    search: String,
    #[serde(default)]
    category: String,
    notice: Option<String>,
    #[serde(default)]
    error: bool,
}

/// Where to send the browser after a cart action, so filters survive the round trip.
#[derive(Debug, Default, Deserialize)]
pub struct ReturnForm {
    #[serde(default)]
    search: String,
    #[serde(default)]
    category: String,
}

#[derive(Debug, Deserialize)]
pub struct QuantityForm {
    delta: i64,
    #[serde(default)]
    search: String,
    #[serde(default)]
    category: String,
}

#[derive(Debug, Deserialize)]
pub struct RecommendForm {
    #[serde(default)]
    query: String,
    #[serde(default)]
    search: String,
    #[serde(default)]
    category: String,
}

fn parse_category(raw: &str) -> Option<Category> {
    if raw.is_empty() || raw == ALL_CATEGORIES {
        return None;
    }
    raw.parse().ok()
}

pub(crate) fn pos_url(search: &str, category: &str, notice: Option<(&str, bool)>) -> String {
    let mut params = Vec::new();
    if !search.is_empty() {
        params.push(format!("search={}", urlencoding::encode(search)));
    }
    if parse_category(category).is_some() {
        params.push(format!("category={}", urlencoding::encode(category)));
    }
    if let Some((message, is_error)) = notice {
        params.push(format!("notice={}", urlencoding::encode(message)));
        if is_error {
            params.push("error=true".to_string());
        }
    }

    if params.is_empty() {
        "/pos".to_string()
    } else {
        format!("/pos?{}", params.join("&"))
    }
}

fn category_links(search: &str, selected: Option<Category>) -> Vec<CategoryLink> {
    let all = CategoryLink {
        label: ALL_CATEGORIES.to_string(),
        href: pos_url(search, "", None),
        active: selected.is_none(),
    };
    std::iter::once(all)
        .chain(Category::ALL.into_iter().map(|c| CategoryLink {
            label: c.to_string(),
            href: pos_url(search, c.as_str(), None),
            active: selected == Some(c),
        }))
        .collect()
}

pub async fn pos_screen(
    State(state): State<AppState>,
    Query(query): Query<PosQuery>,
) -> Result<Html<String>, StatusCode> {
    let selected = parse_category(&query.category);
    let recommendation = state.recommendation.get().await;

    let template = {
        let session = state.session.lock().await;
        let cart = session.cart();
        PosTemplate {
            active: "pos",
            categories: category_links(&query.search, selected),
            products: session
                .catalog()
                .search(&query.search, selected)
                .into_iter()
                .map(ProductDisplay::from)
                .collect(),
            cart_items: cart.items().iter().map(LineItemDisplay::from).collect(),
            cart_empty: cart.is_empty(),
            unit_count: cart.unit_count(),
            subtotal: format_money(cart.subtotal()),
            tax: format_money(cart.tax()),
            total: format_money(cart.total()),
            recommendation,
            notice: query.notice.filter(|n| !n.is_empty()),
            notice_is_error: query.error,
            search: query.search,
            category: selected.map(|c| c.to_string()).unwrap_or_default(),
        }
    };

    render(template)
}

pub async fn add_to_cart(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Form(back): Form<ReturnForm>,
) -> Result<Redirect, StatusCode> {
    state
        .session
        .lock()
        .await
        .add_to_cart(&product_id)
        .map_err(|e| {
            warn!("Add to cart failed: {}", e);
            StatusCode::NOT_FOUND
        })?;

    Ok(Redirect::to(&pos_url(&back.search, &back.category, None)))
}

pub async fn remove_from_cart(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Form(back): Form<ReturnForm>,
) -> Redirect {
    state.session.lock().await.remove_from_cart(&product_id);
    Redirect::to(&pos_url(&back.search, &back.category, None))
}

pub async fn update_quantity(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Form(form): Form<QuantityForm>,
) -> Redirect {
    state.session.lock().await.update_quantity(&product_id, form.delta);
    Redirect::to(&pos_url(&form.search, &form.category, None))
}

pub async fn checkout(State(state): State<AppState>, Form(back): Form<ReturnForm>) -> Redirect {
    let result = state.session.lock().await.checkout();

    let (message, is_error) = match result {
        Ok(sale) => (
            format!(
                "Transaction completed successfully! Order #{}",
                sale.id().to_uppercase()
            ),
            false,
        ),
        Err(e) => {
            warn!("Checkout rejected: {}", e);
            (e.to_string(), true)
        }
    };
    let url = pos_url(&back.search, &back.category, Some((message.as_str(), is_error)));
    Redirect::to(&url)
}

pub async fn recommend(State(state): State<AppState>, Form(form): Form<RecommendForm>) -> Redirect {
    state.recommend(&form.query).await;
    Redirect::to(&pos_url(&form.search, &form.category, None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::*;
    use axum::http::StatusCode;

    #[test]
    fn pos_url_keeps_filters_and_notice() {
        assert_eq!(pos_url("", "", None), "/pos");
        assert_eq!(pos_url("", "All", None), "/pos");
        assert_eq!(pos_url("grey goose", "Vodka", None), "/pos?search=grey%20goose&category=Vodka");
        assert_eq!(
            pos_url("", "", Some(("Cart is empty", true))),
            "/pos?notice=Cart%20is%20empty&error=true"
        );
    }

    #[tokio::test]
    async fn screen_filters_products() {
        let app = crate::create_router(app_state(true));
        let (status, _, body) = send(app, get("/pos?search=lagavulin")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Lagavulin 16 Year Old"));
        assert!(!body.contains("Hendricks Gin"));
    }

    #[tokio::test]
    async fn add_and_checkout_flow() {
        let state = app_state(true);

        let (status, headers, _) = send(
            crate::create_router(state.clone()),
            post_form("/pos/cart/1/add", "search=&category="),
        )
        .await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(headers["location"], "/pos");

        send(crate::create_router(state.clone()), post_form("/pos/cart/1/add", "")).await;
        send(crate::create_router(state.clone()), post_form("/pos/cart/2/add", "")).await;
        send(
            crate::create_router(state.clone()),
            post_form("/pos/cart/2/quantity", "delta=-5"),
        )
        .await;

        {
            let session = state.session.lock().await;
            assert_eq!(session.cart().get("1").map(|i| i.quantity), Some(2));
            assert_eq!(session.cart().get("2").map(|i| i.quantity), Some(1));
        }

        let (_, _, body) = send(crate::create_router(state.clone()), get("/pos")).await;
        assert!(body.contains("$206.48"));
        assert!(body.contains("$223.00"));

        let (status, headers, _) =
            send(crate::create_router(state.clone()), post_form("/pos/checkout", "")).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        let location = headers["location"].to_str().unwrap().to_string();
        assert!(location.starts_with("/pos?notice=Transaction%20completed%20successfully"));

        let session = state.session.lock().await;
        assert!(session.cart().is_empty());
        assert_eq!(session.ledger().len(), 1);
        assert_eq!(session.catalog().get("1").unwrap().stock, 10);
    }

    #[tokio::test]
    async fn empty_checkout_reports_error() {
        let state = app_state(true);
        let (_, headers, _) =
            send(crate::create_router(state.clone()), post_form("/pos/checkout", "")).await;

        assert_eq!(headers["location"], "/pos?notice=Cart%20is%20empty&error=true");
        assert!(state.session.lock().await.ledger().is_empty());
    }

    #[tokio::test]
    async fn unknown_product_is_not_found() {
        let app = crate::create_router(app_state(true));
        let (status, _, _) = send(app, post_form("/pos/cart/404/add", "")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn recommendation_is_shown_after_submit() {
        let state = app_state(true);
        send(
            crate::create_router(state.clone()),
            post_form("/pos/recommend", "query=smoky+scotch"),
        )
        .await;

        let (_, _, body) = send(crate::create_router(state), get("/pos")).await;
        assert!(body.contains("Try the Lagavulin 16."));
    }

    #[tokio::test]
    async fn blank_recommendation_query_is_ignored() {
        let state = app_state(true);
        send(
            crate::create_router(state.clone()),
            post_form("/pos/recommend", "query=++"),
        )
        .await;

        assert_eq!(state.recommendation.get().await, None);
    }
}
