pub mod api;
pub mod history;
pub mod inventory;
pub mod pos;

use askama::Template;
use axum::{extract::State, http::StatusCode, response::Html};
use log::error;

use crate::{
    models::{format_money, InsightDisplay, WEEKLY_SALES},
    state::AppState,
};

pub(crate) fn render<T: Template>(template: T) -> Result<Html<String>, StatusCode> {
    template.render().map(Html).map_err(|e| {
        error!("Failed to render template: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

pub struct ChartBar {
    pub name: &'static str,
    pub sales: u32,
    pub height_pct: u32,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    active: &'static str,
    total_revenue: String,
    total_orders: usize,
    product_count: usize,
    low_stock_count: usize,
    top_category: String,
    chart: Vec<ChartBar>,
    insights: Vec<InsightDisplay>,
}

fn weekly_chart() -> Vec<ChartBar> {
    let peak = WEEKLY_SALES.iter().map(|p| p.sales).max().unwrap_or(0).max(1);
    WEEKLY_SALES
        .iter()
        .map(|point| ChartBar {
            name: point.name,
            sales: point.sales,
            height_pct: point.sales * 100 / peak,
        })
        .collect()
}

pub async fn dashboard(State(state): State<AppState>) -> Result<Html<String>, StatusCode> {
    let stats = state.session.lock().await.stats();
    let insights = state.refresh_insights().await;

    let template = DashboardTemplate {
        active: "dashboard",
        total_revenue: format_money(stats.total_revenue),
        total_orders: stats.total_orders,
        product_count: stats.product_count,
        low_stock_count: stats.low_stock_count,
        top_category: stats
            .top_category
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string()),
        chart: weekly_chart(),
        insights: insights.iter().map(InsightDisplay::from).collect(),
    };

    render(template)
}
