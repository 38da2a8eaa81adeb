use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A `user_insights` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInsight {
    pub id: Uuid,
    pub user_id: Uuid,
    pub insight_type: String,
    pub title: String,
    pub description: String,
    /// Opaque payload backing the insight.
    pub data_points: Option<Value>,
    pub date_generated: NaiveDate,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserInsightInsert {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub user_id: Uuid,
    pub insight_type: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_points: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_generated: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserInsightUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insight_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_points: Option<Option<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_generated: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Option<DateTime<Utc>>>,
}

/// A `daily_tips` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTip {
    pub id: Uuid,
    pub user_id: Uuid,
    pub tip_content: String,
    pub tip_category: Option<String>,
    pub date_shown: NaiveDate,
    pub is_personalized: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTipInsert {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub user_id: Uuid,
    pub tip_content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tip_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_shown: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_personalized: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DailyTipUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tip_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tip_category: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_shown: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_personalized: Option<Option<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Option<DateTime<Utc>>>,
}
