// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Osiris Store
//!
//! Local state for the Osiris client.
//!
//! This crate provides:
//!
//! - **TokenStore**: The bearer token between runs (`~/.osiris_token`)
//! - **ScheduleCache**: The timetable of the current ISO week
//! - **SettingsStore**: User preferences with persistence
//! - **Persistence**: Atomic, owner-only file I/O helpers
//!
//! ## Usage
//!
//! ```ignore
//! use osiris_store::{SettingsStore, TokenStore};
//!
//! let settings = SettingsStore::load_default().await?.get().clone();
//! let token = TokenStore::default_location().load().await?;
//! ```

pub mod error;
pub mod persistence;
pub mod schedule_cache;
pub mod settings_store;
pub mod token_store;

pub use error::StoreError;
pub use persistence::{
    default_cache_dir, default_config_dir, default_schedule_cache_path, default_settings_path,
    default_token_path, load_json, load_json_or_default, save_json, save_text,
};
pub use schedule_cache::{CachedSchedule, ScheduleCache};
pub use settings_store::{Settings, SettingsStore};
pub use token_store::TokenStore;

#[cfg(test)]
mod persistence_tests;
