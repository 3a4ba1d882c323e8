//! # Scene Registry
//!
//! Tracks every body in the playground — the four static boundary walls
//! plus all dynamic shapes — in insertion order, which doubles as the
//! renderer's back-to-front draw order. The registry owns the mapping from
//! engine handles to geometry/appearance descriptors and drives all
//! world-mutating operations: spawn, remove, clear, reset, and wall
//! repositioning on viewport resize.

use cgmath::Vector2;
use log::info;
use rapier2d::prelude::RigidBodyHandle;

use super::body::{Appearance, Color, Geometry};
use super::factory::{BodySpec, ShapeFactory};
use super::selection::SelectionSet;
use crate::physics::{DragConstraint, PhysicsWorld};

/// Number of dynamic bodies a reset regenerates.
pub const RESET_BODY_COUNT: usize = 15;

/// Wall slab thickness; walls are centered half a thickness outside the
/// viewport so only their inner face is reachable.
pub const WALL_THICKNESS: f32 = 60.0;
const WALL_MARGIN: f32 = WALL_THICKNESS * 0.5;
const WALL_FRICTION: f32 = 0.3;
const WALL_COLOR: Color = Color::new(0x2c, 0x3e, 0x50);

/// One registered body: the engine handle plus everything the engine does
/// not store for us.
#[derive(Debug, Clone)]
pub struct SceneBody {
    pub handle: RigidBodyHandle,
    pub geometry: Geometry,
    pub appearance: Appearance,
    pub is_static: bool,
}

pub struct SceneRegistry {
    bodies: Vec<SceneBody>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self { bodies: Vec::new() }
    }

    /// Creates the four boundary walls for a viewport of the given logical
    /// size: bottom, left, right, top. Called exactly once; resize moves
    /// these same bodies instead of recreating them.
    pub fn install_walls(&mut self, world: &mut PhysicsWorld, width: f32, height: f32) {
        let walls = [
            // bottom
            (Vector2::new(width * 0.5, height + WALL_MARGIN), width, WALL_THICKNESS),
            // left
            (Vector2::new(-WALL_MARGIN, height * 0.5), WALL_THICKNESS, height),
            // right
            (Vector2::new(width + WALL_MARGIN, height * 0.5), WALL_THICKNESS, height),
            // top
            (Vector2::new(width * 0.5, -WALL_MARGIN), width, WALL_THICKNESS),
        ];

        for (position, w, h) in walls {
            let geometry = Geometry::RoundedRect {
                width: w,
                height: h,
                corner_radius: 0.0,
            };
            let handle = world.insert_body(position, &geometry, true, 0.0, WALL_FRICTION, 0.001);
            self.bodies.push(SceneBody {
                handle,
                geometry,
                appearance: Appearance::filled(WALL_COLOR),
                is_static: true,
            });
        }
    }

    /// Registers one body spec with the world and the registry.
    pub fn spawn(&mut self, world: &mut PhysicsWorld, spec: BodySpec) -> RigidBodyHandle {
        let handle = world.insert_body(
            spec.position,
            &spec.geometry,
            spec.is_static,
            spec.restitution,
            spec.friction,
            spec.density,
        );
        self.bodies.push(SceneBody {
            handle,
            geometry: spec.geometry,
            appearance: spec.appearance,
            is_static: spec.is_static,
        });
        handle
    }

    /// Registers a spec at a specific draw-order index. Used by the
    /// radius-edit flow so a rebuilt body keeps its predecessor's place.
    pub fn spawn_at(
        &mut self,
        world: &mut PhysicsWorld,
        index: usize,
        spec: BodySpec,
    ) -> RigidBodyHandle {
        let handle = world.insert_body(
            spec.position,
            &spec.geometry,
            spec.is_static,
            spec.restitution,
            spec.friction,
            spec.density,
        );
        let index = index.min(self.bodies.len());
        self.bodies.insert(
            index,
            SceneBody {
                handle,
                geometry: spec.geometry,
                appearance: spec.appearance,
                is_static: spec.is_static,
            },
        );
        handle
    }

    pub fn spawn_batch(&mut self, world: &mut PhysicsWorld, specs: Vec<BodySpec>) {
        for spec in specs {
            self.spawn(world, spec);
        }
    }

    /// Removes a dynamic body from the registry and the world. Static
    /// bodies are never removed. Selection cleanup is the caller's job —
    /// the radius-edit flow relies on that ordering.
    pub fn remove(&mut self, world: &mut PhysicsWorld, handle: RigidBodyHandle) {
        let Some(index) = self.index_of(handle) else { return };
        if self.bodies[index].is_static {
            return;
        }
        self.bodies.remove(index);
        world.remove_body(handle);
    }

    /// Removes every dynamic body. Clearing the world detaches the drag
    /// constraint and empties the selection set as a consequence.
    pub fn clear_dynamic(
        &mut self,
        world: &mut PhysicsWorld,
        selection: &mut SelectionSet,
        drag: &mut DragConstraint,
    ) {
        for body in self.bodies.iter().filter(|b| !b.is_static) {
            world.remove_body(body.handle);
        }
        self.bodies.retain(|b| b.is_static);
        selection.drop_all();
        drag.detach();
    }

    /// Full scene reset: clears all dynamic bodies, regenerates
    /// [`RESET_BODY_COUNT`] randomized ones, and re-attaches the drag
    /// constraint that the clear detached. Walls persist untouched.
    pub fn reset(
        &mut self,
        world: &mut PhysicsWorld,
        factory: &mut ShapeFactory,
        selection: &mut SelectionSet,
        drag: &mut DragConstraint,
        width: f32,
        height: f32,
    ) {
        self.clear_dynamic(world, selection, drag);
        let specs: Vec<BodySpec> = (0..RESET_BODY_COUNT)
            .map(|_| factory.random_spec(width, height))
            .collect();
        self.spawn_batch(world, specs);
        drag.attach();
        info!(
            "scene reset: {} dynamic bodies regenerated",
            RESET_BODY_COUNT
        );
    }

    /// Moves each wall to hug the screen edge it borders at the new
    /// viewport size. Each wall is classified by its position relative to
    /// the viewport it was placed for (below it = bottom, x < 0 = left,
    /// beyond its width = right, else top), then moved to the matching
    /// edge of the new viewport. Wall identity is preserved; only
    /// positions change.
    pub fn reposition_walls(
        &mut self,
        world: &mut PhysicsWorld,
        old: (f32, f32),
        new: (f32, f32),
    ) {
        let walls: Vec<RigidBodyHandle> = self
            .bodies
            .iter()
            .filter(|b| b.is_static)
            .map(|b| b.handle)
            .collect();

        let (width, height) = new;
        for handle in walls {
            let Some(position) = world.position(handle) else { continue };
            let target = if position.y > old.1 {
                Vector2::new(width * 0.5, height + WALL_MARGIN)
            } else if position.x < 0.0 {
                Vector2::new(-WALL_MARGIN, height * 0.5)
            } else if position.x > old.0 {
                Vector2::new(width + WALL_MARGIN, height * 0.5)
            } else {
                Vector2::new(width * 0.5, -WALL_MARGIN)
            };
            world.set_position(handle, target);
        }
    }

    /// First dynamic body under `point`, resolving the engine's unordered
    /// hit list against registry insertion order.
    pub fn first_dynamic_at(
        &self,
        world: &PhysicsWorld,
        point: Vector2<f32>,
    ) -> Option<RigidBodyHandle> {
        let hits = world.bodies_at_point(point);
        if hits.is_empty() {
            return None;
        }
        self.bodies
            .iter()
            .find(|b| !b.is_static && hits.contains(&b.handle))
            .map(|b| b.handle)
    }

    pub fn get(&self, handle: RigidBodyHandle) -> Option<&SceneBody> {
        self.bodies.iter().find(|b| b.handle == handle)
    }

    pub fn get_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut SceneBody> {
        self.bodies.iter_mut().find(|b| b.handle == handle)
    }

    pub fn index_of(&self, handle: RigidBodyHandle) -> Option<usize> {
        self.bodies.iter().position(|b| b.handle == handle)
    }

    /// All bodies in draw order (walls first, then dynamic insertions).
    pub fn iter(&self) -> impl Iterator<Item = &SceneBody> {
        self.bodies.iter()
    }

    pub fn dynamic_bodies(&self) -> impl Iterator<Item = &SceneBody> {
        self.bodies.iter().filter(|b| !b.is_static)
    }

    pub fn dynamic_bodies_mut(&mut self) -> impl Iterator<Item = &mut SceneBody> {
        self.bodies.iter_mut().filter(|b| !b.is_static)
    }

    pub fn static_bodies(&self) -> impl Iterator<Item = &SceneBody> {
        self.bodies.iter().filter(|b| b.is_static)
    }

    pub fn dynamic_count(&self) -> usize {
        self.bodies.iter().filter(|b| !b.is_static).count()
    }

    pub fn static_count(&self) -> usize {
        self.bodies.iter().filter(|b| b.is_static).count()
    }
}

impl Default for SceneRegistry {
    fn default() -> Self {
        Self::new()
    }
}
