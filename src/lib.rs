// src/lib.rs
//! Tumble
//!
//! An interactive 2D physics playground built on wgpu, winit, and the
//! rapier2d physics engine.

pub mod app;
pub mod gfx;
pub mod interact;
pub mod physics;
pub mod playground;
pub mod scene;
pub mod ui;

pub mod prelude;

// Re-export main types for convenience
pub use app::PlaygroundApp;
pub use playground::Playground;

/// Creates a default playground application instance
pub fn default() -> PlaygroundApp {
    PlaygroundApp::new().expect("Failed to create playground application")
}
