//! Pointer-bound drag constraint.
//!
//! An elastic coupling between the pointer and a grappled body: while the
//! button is held over a dynamic body, every fixed step pulls the body
//! toward the pointer with a spring-damper force, so dragging feels springy
//! rather than snapping rigidly to the cursor.
//!
//! The constraint tracks the pointer in logical pixels and owns the device
//! pixel ratio used to convert incoming physical cursor positions, so
//! hit-testing stays aligned with the scaled canvas.

use cgmath::Vector2;
use rapier2d::prelude::RigidBodyHandle;

use super::world::PhysicsWorld;

/// Pull acceleration per pixel of stretch (1/s^2). Together with the
/// damping factor this reproduces the soft constraint feel of the original
/// stiffness/damping 0.1 coupling, scaled by body mass so large and small
/// bodies drag alike.
const SPRING_STIFFNESS: f32 = 40.0;

/// Velocity kill factor (1/s). Below critical damping on purpose; a little
/// oscillation is the point.
const SPRING_DAMPING: f32 = 6.0;

/// Coefficient for the extra spring nudge applied per pointer-move event.
const MOVE_NUDGE: f32 = 1.5;

pub struct DragConstraint {
    pointer: Vector2<f32>,
    pixel_ratio: f32,
    grabbed: Option<RigidBodyHandle>,
    button_down: bool,
    attached: bool,
}

impl DragConstraint {
    pub fn new() -> Self {
        Self {
            pointer: Vector2::new(0.0, 0.0),
            pixel_ratio: 1.0,
            grabbed: None,
            button_down: false,
            attached: false,
        }
    }

    /// Updates the device pixel ratio. Must be called whenever the canvas
    /// is rescaled so pointer conversion stays correct.
    pub fn set_pixel_ratio(&mut self, ratio: f32) {
        if ratio > 0.0 {
            self.pixel_ratio = ratio;
        }
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    /// Feeds a cursor position in physical (backing-store) pixels.
    pub fn set_pointer_physical(&mut self, x: f64, y: f64) {
        self.pointer = Vector2::new(x as f32 / self.pixel_ratio, y as f32 / self.pixel_ratio);
    }

    /// Current pointer position in logical pixels.
    pub fn pointer(&self) -> Vector2<f32> {
        self.pointer
    }

    /// Attaches the constraint to the world. A cleared world detaches it,
    /// so scene reset re-attaches explicitly.
    pub fn attach(&mut self) {
        self.attached = true;
    }

    pub fn detach(&mut self) {
        self.attached = false;
        self.grabbed = None;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Button pressed: grapples `hit` if the constraint is attached.
    pub fn begin(&mut self, hit: Option<RigidBodyHandle>) {
        self.button_down = true;
        if self.attached {
            self.grabbed = hit;
        }
    }

    /// Button released or the cursor left the window.
    pub fn release(&mut self) {
        self.button_down = false;
        self.grabbed = None;
    }

    /// Drops the grapple if it points at `handle`. Called when a body is
    /// removed while a drag is in flight.
    pub fn forget(&mut self, handle: RigidBodyHandle) {
        if self.grabbed == Some(handle) {
            self.grabbed = None;
        }
    }

    pub fn grabbed(&self) -> Option<RigidBodyHandle> {
        self.grabbed
    }

    pub fn is_dragging(&self) -> bool {
        self.attached && self.button_down && self.grabbed.is_some()
    }

    /// Spring-damper pull toward the pointer, applied once per fixed step
    /// while dragging.
    pub fn apply_spring(&self, world: &mut PhysicsWorld) {
        if !self.is_dragging() {
            return;
        }
        let Some(handle) = self.grabbed else { return };
        let Some(position) = world.position(handle) else { return };

        let mass = world.mass(handle);
        let stretch = self.pointer - position;
        let velocity = world.velocity(handle);
        let force = (stretch * SPRING_STIFFNESS - velocity * SPRING_DAMPING) * mass;
        world.apply_force_at(handle, force, position);
    }

    /// The per-move-event spring nudge: force proportional to the vector
    /// from the body to the pointer, applied at the body position.
    pub fn nudge(&self, world: &mut PhysicsWorld) {
        if !self.is_dragging() {
            return;
        }
        let Some(handle) = self.grabbed else { return };
        let Some(position) = world.position(handle) else { return };

        let force = (self.pointer - position) * MOVE_NUDGE * world.mass(handle);
        world.apply_force_at(handle, force, position);
    }
}

impl Default for DragConstraint {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::body::Geometry;

    fn world_with_ball(at: Vector2<f32>) -> (PhysicsWorld, RigidBodyHandle) {
        let mut world = PhysicsWorld::new();
        world.set_gravity(0.0);
        let handle = world.insert_body(at, &Geometry::Circle { radius: 30.0 }, false, 0.6, 0.1, 0.001);
        (world, handle)
    }

    #[test]
    fn test_grapple_lifecycle() {
        let (_, handle) = world_with_ball(Vector2::new(0.0, 0.0));
        let mut drag = DragConstraint::new();

        // Detached constraints never grapple.
        drag.begin(Some(handle));
        assert!(!drag.is_dragging());
        drag.release();

        drag.attach();
        drag.begin(Some(handle));
        assert!(drag.is_dragging());
        drag.release();
        assert!(drag.grabbed().is_none());
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_forget_drops_only_matching_grapple() {
        let (mut world, handle) = world_with_ball(Vector2::new(0.0, 0.0));
        let other = world.insert_body(
            Vector2::new(200.0, 0.0),
            &Geometry::Circle { radius: 30.0 },
            false,
            0.6,
            0.1,
            0.001,
        );

        let mut drag = DragConstraint::new();
        drag.attach();
        drag.begin(Some(handle));
        drag.forget(other);
        assert_eq!(drag.grabbed(), Some(handle));
        drag.forget(handle);
        assert_eq!(drag.grabbed(), None);
    }

    #[test]
    fn test_spring_pulls_body_toward_pointer() {
        let (mut world, handle) = world_with_ball(Vector2::new(100.0, 100.0));
        let mut drag = DragConstraint::new();
        drag.attach();
        drag.set_pointer_physical(300.0, 100.0);
        drag.begin(Some(handle));

        for _ in 0..30 {
            drag.apply_spring(&mut world);
            world.step();
        }

        let pos = world.position(handle).unwrap();
        assert!(pos.x > 120.0, "body should move toward pointer, x = {}", pos.x);
        assert!((pos.y - 100.0).abs() < 30.0);
    }

    #[test]
    fn test_pixel_ratio_scales_pointer() {
        let mut drag = DragConstraint::new();
        drag.set_pixel_ratio(2.0);
        drag.set_pointer_physical(200.0, 100.0);
        assert_eq!(drag.pointer(), Vector2::new(100.0, 50.0));

        // Zero and negative ratios are rejected, not applied.
        drag.set_pixel_ratio(0.0);
        assert_eq!(drag.pixel_ratio(), 2.0);
    }
}
