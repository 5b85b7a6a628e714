//! Terminal UI: the per-session navigation controller, its message and
//! command types, and one state machine per screen.

pub mod admin;
pub mod controller;
pub mod form;
pub mod forum_management;
pub mod forums;
pub mod message;
pub mod posts;
pub mod settings;
pub mod theme;
pub mod topics;
pub mod user_management;

pub use controller::{Controller, ScreenKind};
pub use message::{Command, Key, Msg};
