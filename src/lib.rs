//! WeCare Library
//!
//! Food product analysis: local quality scoring, allergen and diet checks
//! through an AI collaborator, and a fallback when the collaborator fails.

pub mod ai;
pub mod analyzer;
pub mod build_info;
pub mod config;
pub mod loader;
pub mod models;
pub mod scoring;
