//! # Shellbbs - a multi-user forum BBS served over SSH
//!
//! Shellbbs is a small bulletin board: clients connect over SSH with a
//! password, and get a full-screen text UI for browsing forums, topics and
//! posts, with moderator and admin screens gated by role.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use shellbbs::bbs::BbsServer;
//! use shellbbs::config::Config;
//! use shellbbs::storage::Store;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     let store = Arc::new(Store::new(&config.storage.data_dir).await?);
//!     store.ensure_seed().await?;
//!     BbsServer::run(config, store).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`bbs`] - SSH acceptor, channel sessions, input decoding and roles
//! - [`tui`] - the per-session navigation controller and its screens
//! - [`storage`] - users and board data persisted as JSON files
//! - [`config`] - TOML configuration
//! - [`validation`] - username, password and form field checks

pub mod bbs;
pub mod config;
pub mod logutil;
pub mod storage;
pub mod tui;
pub mod validation;
