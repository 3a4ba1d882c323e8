//! # Interaction Module
//!
//! The tool-mode state machine and the pointer-driven interaction
//! controller that turn input events into scene mutations.

pub mod controller;

pub use controller::{
    AppearanceScope, InteractionController, ShapeConfig, ShapeKind, ToolMode,
};
