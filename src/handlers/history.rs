use askama::Template;
use axum::{extract::State, http::StatusCode, response::Html};

use crate::{handlers::render, models::SaleDisplay, state::AppState};

#[derive(Template)]
#[template(path = "history.html")]
struct HistoryTemplate {
    active: &'static str,
    sales: Vec<SaleDisplay>,
}

pub async fn sales_history(State(state): State<AppState>) -> Result<Html<String>, StatusCode> {
    let sales = state
        .session
        .lock()
        .await
        .ledger()
        .sales()
        .iter()
        .map(SaleDisplay::from)
        .collect();

    render(HistoryTemplate {
        active: "history",
        sales,
    })
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn empty_history_says_so() {
        let app = crate::create_router(app_state(true));
        let (status, _, body) = send(app, get("/history")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("No sales recorded today."));
    }

    #[tokio::test]
    async fn sales_are_listed_newest_first() {
        let state = app_state(true);
        let (older, newer) = {
            let mut session = state.session.lock().await;
            session.add_to_cart("5").unwrap();
            let older = session.checkout().unwrap().id().to_uppercase();
            session.add_to_cart("2").unwrap();
            let newer = session.checkout().unwrap().id().to_uppercase();
            (older, newer)
        };

        let (_, _, body) = send(crate::create_router(state), get("/history")).await;

        let newer_at = body.find(&format!("Order #{}", newer)).unwrap();
        let older_at = body.find(&format!("Order #{}", older)).unwrap();
        assert!(newer_at < older_at);
        assert!(body.contains("$43.19"));
    }
}
