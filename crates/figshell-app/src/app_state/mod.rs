//! Top-level application state.
//!
//! Implements `winit::application::ApplicationHandler` to drive the main
//! event loop. Owns the window and every tab in it.

mod core;
mod event_handler;
mod init;
mod polling;
mod shutdown;
mod surfaces;

pub use core::ShellApp;
