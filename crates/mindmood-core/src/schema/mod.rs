//! Record shapes for the backend's tables.
//!
//! Each table has three shapes:
//! - `Row`: a full row as returned by a read
//! - `Insert`: payload for creating a row; server-assigned fields are optional
//! - `Update`: partial patch; only fields that are set are sent
//!
//! Update payloads use `Option<Option<T>>` for nullable columns:
//! `None` leaves the column untouched, `Some(None)` writes `null`.
//!
//! This module only declares shapes. Reads and writes go through
//! [`crate::supabase::SupabaseClient::from`].

mod conversations;
mod insights;
mod mood;
mod preferences;
mod profiles;

pub use conversations::{
    AiConversation, AiConversationInsert, AiConversationUpdate, AiMessage, AiMessageInsert,
    AiMessageUpdate,
};
pub use insights::{
    DailyTip, DailyTipInsert, DailyTipUpdate, UserInsight, UserInsightInsert, UserInsightUpdate,
};
pub use mood::{MoodEntry, MoodEntryInsert, MoodEntryUpdate};
pub use preferences::{UserPreferences, UserPreferencesInsert, UserPreferencesUpdate};
pub use profiles::{UserProfile, UserProfileInsert, UserProfileUpdate};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// A declared table and its three record shapes.
pub trait Table {
    /// Table name in the `public` schema.
    const NAME: &'static str;
    type Row: DeserializeOwned + Send;
    type Insert: Serialize + Sync;
    type Update: Serialize + Sync;
}

/// `user_profiles`: one row per account.
#[derive(Debug, Clone, Copy)]
pub struct UserProfiles;

impl Table for UserProfiles {
    const NAME: &'static str = "user_profiles";
    type Row = UserProfile;
    type Insert = UserProfileInsert;
    type Update = UserProfileUpdate;
}

/// `mood_entries`: mood and energy check-ins.
#[derive(Debug, Clone, Copy)]
pub struct MoodEntries;

impl Table for MoodEntries {
    const NAME: &'static str = "mood_entries";
    type Row = MoodEntry;
    type Insert = MoodEntryInsert;
    type Update = MoodEntryUpdate;
}

/// `ai_conversations`: conversation threads.
#[derive(Debug, Clone, Copy)]
pub struct AiConversations;

impl Table for AiConversations {
    const NAME: &'static str = "ai_conversations";
    type Row = AiConversation;
    type Insert = AiConversationInsert;
    type Update = AiConversationUpdate;
}

/// `ai_messages`: messages within a conversation thread.
#[derive(Debug, Clone, Copy)]
pub struct AiMessages;

impl Table for AiMessages {
    const NAME: &'static str = "ai_messages";
    type Row = AiMessage;
    type Insert = AiMessageInsert;
    type Update = AiMessageUpdate;
}

/// `user_insights`: generated insights.
#[derive(Debug, Clone, Copy)]
pub struct UserInsights;

impl Table for UserInsights {
    const NAME: &'static str = "user_insights";
    type Row = UserInsight;
    type Insert = UserInsightInsert;
    type Update = UserInsightUpdate;
}

/// `daily_tips`: tips shown to a user.
#[derive(Debug, Clone, Copy)]
pub struct DailyTips;

impl Table for DailyTips {
    const NAME: &'static str = "daily_tips";
    type Row = DailyTip;
    type Insert = DailyTipInsert;
    type Update = DailyTipUpdate;
}

/// `user_preferences`: per-user settings.
#[derive(Debug, Clone, Copy)]
pub struct UserPreferencesTable;

impl Table for UserPreferencesTable {
    const NAME: &'static str = "user_preferences";
    type Row = UserPreferences;
    type Insert = UserPreferencesInsert;
    type Update = UserPreferencesUpdate;
}

/// Names of every declared table.
pub const TABLE_NAMES: &[&str] = &[
    UserProfiles::NAME,
    MoodEntries::NAME,
    AiConversations::NAME,
    AiMessages::NAME,
    UserInsights::NAME,
    DailyTips::NAME,
    UserPreferencesTable::NAME,
];
