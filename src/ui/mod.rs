//! # User Interface Module
//!
//! Dear ImGui-based control surface for the playground. The [`UiManager`]
//! owns the ImGui context, winit platform glue, and wgpu renderer; the
//! [`panel`] module provides the playground control window.
//!
//! ## Input Handling
//!
//! Window events are offered to the UI first. When ImGui wants the mouse
//! or keyboard (a slider drag, a text field), the event stops there and
//! the interaction controller never sees it, so clicking a UI button can
//! never also spawn or delete a body underneath it.
//!
//! [`UiManager`]: manager::UiManager

pub mod manager;
pub mod panel;

// Re-export main types
pub use manager::UiManager;
pub use panel::{playground_panel, PanelState};
