//! # Graphics Module
//!
//! All rendering for the playground: the wgpu render engine, the CPU-side
//! frame painter, and the tessellation helpers they share.
//!
//! ## Architecture Overview
//!
//! Rendering is immediate-mode: each accepted frame the painter walks the
//! scene registry in draw order and produces one triangle batch
//! ([`paint::build_frame`]), which the [`RenderEngine`] uploads and draws
//! in a single alpha-blended pass. There is no retained GPU scene state —
//! body positions come from the physics engine every frame, so the latest
//! simulation state is always what gets painted.
//!
//! ## Key Features
//!
//! - **Pseudo-3D shading** - per-vertex gradients faking directional light
//! - **Drop shadows** - layered silhouettes approximating a blur
//! - **Spring visualization** - the wavy drag line and endpoint dots
//! - **Pixel-ratio aware sizing** - physical backing store, logical coords
//!
//! [`RenderEngine`]: render_engine::RenderEngine

pub mod paint;
pub mod render_engine;
pub mod tessellate;
pub mod vertex;

// Re-export commonly used types
pub use paint::{RenderOptions, ShadingMode};
pub use render_engine::RenderEngine;
