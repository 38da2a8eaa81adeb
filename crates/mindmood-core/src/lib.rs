//! Core MindMood library (config, logging, validation, backend client, record shapes).

pub mod config;
pub mod logging;
pub mod schema;
pub mod supabase;
pub mod validation;
