use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::models::AIInsight;
use crate::services::{AdvisoryClient, Catalog, LatestResult, Session};

/// Shared handler state. The session sits behind one lock so cart edits and
/// checkouts are applied one at a time.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<Session>>,
    pub advisory: AdvisoryClient,
    pub insights: Arc<LatestResult<Vec<AIInsight>>>,
    pub recommendation: Arc<LatestResult<String>>,
}

impl AppState {
    pub fn new(config: &Config, advisory: AdvisoryClient) -> Self {
        let session = Session::new(
            Catalog::seeded(),
            config.checkout_policy,
            config.low_stock_threshold,
        );
        Self {
            session: Arc::new(Mutex::new(session)),
            advisory,
            insights: Arc::new(LatestResult::new()),
            recommendation: Arc::new(LatestResult::new()),
        }
    }

    /// Asks for fresh insights on the current shelf and keeps them if no newer
    /// request was issued meanwhile. Returns whatever is newest afterwards.
    pub async fn refresh_insights(&self) -> Vec<AIInsight> {
        let ticket = self.insights.begin();
        let products = self.session.lock().await.products_snapshot();
        let insights = self.advisory.get_inventory_insights(&products).await;

        if self.insights.settle(ticket, insights.clone()).await {
            insights
        } else {
            self.insights.get().await.unwrap_or(insights)
        }
    }

    /// Same as `refresh_insights` for a customer query. Blank queries are ignored.
    pub async fn recommend(&self, query: &str) -> Option<(String, bool)> {
        if query.trim().is_empty() {
            return None;
        }
        let ticket = self.recommendation.begin();
        let products = self.session.lock().await.products_snapshot();
        let text = self.advisory.get_smart_recommendation(query, &products).await;
        let current = self.recommendation.settle(ticket, text.clone()).await;
        Some((text, current))
    }
}
