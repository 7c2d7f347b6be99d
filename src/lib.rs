//! toolshed: interactive menu-driven manager for optional developer tools
//!
//! The registry declares what can be managed, the probe reports what is
//! installed, the dispatcher performs actions through the OS package
//! manager or a vendor installer, and the menu session ties it together.

pub mod commands;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod menu;
pub mod models;
pub mod platform;
pub mod probe;
pub mod registry;
pub mod report;
pub mod runner;

pub use error::ToolshedError;
