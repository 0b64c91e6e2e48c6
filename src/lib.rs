//! Places TUI - search a places API by name prefix, one page at a time
//!
//! This library exposes the app's modules for the binary and for testing.

pub mod action;
pub mod api;
pub mod components;
pub mod config;
pub mod effect;
pub mod reducer;
pub mod shortcut;
pub mod state;
