use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightType {
    Recommendation,
    Alert,
    Opportunity,
}

impl InsightType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightType::Recommendation => "recommendation",
            InsightType::Alert => "alert",
            InsightType::Opportunity => "opportunity",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AIInsight {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: InsightType,
}

// Template-friendly insight struct
#[derive(Debug, Serialize)]
pub struct InsightDisplay {
    pub title: String,
    pub description: String,
    pub kind: String,
}

impl From<&AIInsight> for InsightDisplay {
    fn from(insight: &AIInsight) -> Self {
        Self {
            title: insight.title.clone(),
            description: insight.description.clone(),
            kind: insight.kind.as_str().to_string(),
        }
    }
}
