//! Vault Picks API
//!
//! Recommends five-digit numbers for the Gold Vault event by querying one or
//! two LLM backends, merging their candidates into an exact-size deduplicated
//! set, and recording every recommendation for later analysis.

pub mod api;
pub mod config;
pub mod core;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
