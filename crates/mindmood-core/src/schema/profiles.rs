use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A `user_profiles` row. `id` is the auth user's id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub plan_type: Option<String>,
    pub subscription_status: Option<String>,
    pub onboarding_completed: Option<bool>,
    /// Opaque assessment payload.
    pub assessment_results: Option<Value>,
    pub personalized_plan: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Insert payload for `user_profiles`. The id is required: profiles are keyed
/// by the auth user and never server-generated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfileInsert {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub onboarding_completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment_results: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personalized_plan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserProfileInsert {
    /// Minimal profile for a freshly registered user.
    pub fn new(id: Uuid, email: Option<String>) -> Self {
        Self {
            id,
            email,
            full_name: None,
            avatar_url: None,
            plan_type: None,
            subscription_status: None,
            onboarding_completed: None,
            assessment_results: None,
            personalized_plan: None,
            created_at: None,
            updated_at: None,
        }
    }
}

/// Partial update for `user_profiles`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_type: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_status: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub onboarding_completed: Option<Option<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment_results: Option<Option<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personalized_plan: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Option<DateTime<Utc>>>,
}
