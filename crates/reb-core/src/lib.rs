//! Core of the real-estate listings bot: domain types, the listing form state machine,
//! media-group batching, moderation and the ports the adapters implement.
//!
//! Telegram and PostgreSQL live in adapter crates behind `MessagingPort` and `ListingStore`.

pub mod activity;
pub mod collector;
pub mod config;
pub mod conversation;
pub mod domain;
pub mod draft;
pub mod errors;
pub mod formatting;
pub mod i18n;
pub mod listing;
pub mod locations;
pub mod logging;
pub mod messaging;
pub mod ports;
pub mod review;
pub mod security;

pub use errors::{Error, Result};
