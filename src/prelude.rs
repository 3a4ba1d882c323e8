//! # Tumble Prelude
//!
//! Convenient imports for typical playground applications.
//!
//! ## Usage
//!
//! ```no_run
//! use tumble::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     tumble::default().run()
//! }
//! ```

pub use crate::app::PlaygroundApp;
pub use crate::gfx::paint::{RenderOptions, ShadingMode};
pub use crate::interact::{AppearanceScope, ShapeConfig, ShapeKind, ToolMode};
pub use crate::physics::{DragConstraint, PhysicsWorld};
pub use crate::playground::Playground;
pub use crate::scene::body::{Appearance, Color, Geometry};
pub use crate::scene::factory::ShapeFactory;
pub use crate::scene::registry::SceneRegistry;
pub use crate::scene::selection::SelectionSet;
