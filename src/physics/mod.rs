//! # Physics Module
//!
//! Narrow adapter over the external rapier2d physics engine. Nothing
//! outside this module touches rapier types other than the opaque
//! [`RigidBodyHandle`]s the adapter hands out; all playground math stays
//! in cgmath vectors and pixel units.
//!
//! ## Key Components
//!
//! - [`world`] - the world registry: body creation/removal, stepping,
//!   point queries, force and impulse application
//! - [`runner`] - fixed-timestep accumulator driving the stepping cadence
//! - [`drag`] - the pointer-bound drag constraint (elastic grapple)
//!
//! [`RigidBodyHandle`]: rapier2d::prelude::RigidBodyHandle

pub mod drag;
pub mod runner;
pub mod world;

pub use drag::DragConstraint;
pub use runner::FixedRunner;
pub use world::PhysicsWorld;

/// Simulation timestep in seconds. Stepping is fixed-rate and independent
/// of the render cadence.
pub const FIXED_DT: f32 = 1.0 / 60.0;
