//! Wraps all rapier2d boilerplate — pipeline, islands, broad/narrow phase,
//! body and collider sets, query pipeline — into a single world struct with
//! the narrow surface the playground needs: insert/remove bodies built from
//! geometry descriptors, step at a fixed rate, point-containment queries,
//! and force/impulse application.

use cgmath::Vector2;
use rapier2d::na;
use rapier2d::parry::query::PointQuery;
use rapier2d::prelude::*;

use super::FIXED_DT;
use crate::scene::body::Geometry;

/// Downward pixel-space acceleration corresponding to a gravity setting
/// of 1.0 on the UI slider.
pub const GRAVITY_PIXELS: f32 = 960.0;

fn to_na(v: Vector2<f32>) -> na::Vector2<f32> {
    na::Vector2::new(v.x, v.y)
}

fn from_na(v: &na::Vector2<f32>) -> Vector2<f32> {
    Vector2::new(v.x, v.y)
}

/// The simulated world. One instance per playground.
pub struct PhysicsWorld {
    gravity: na::Vector2<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
}

impl PhysicsWorld {
    /// Creates an empty world with default gravity (slider value 1.0).
    pub fn new() -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = FIXED_DT;

        Self {
            gravity: na::Vector2::new(0.0, GRAVITY_PIXELS),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Sets world gravity from the UI slider magnitude (1.0 = default).
    pub fn set_gravity(&mut self, magnitude: f32) {
        self.gravity.y = magnitude * GRAVITY_PIXELS;
        // Wake everything so a gravity change is visible immediately even
        // for bodies the engine has put to sleep.
        for (_, body) in self.bodies.iter_mut() {
            body.wake_up(true);
        }
    }

    pub fn gravity_magnitude(&self) -> f32 {
        self.gravity.y / GRAVITY_PIXELS
    }

    /// Creates a rigid body + collider pair from a geometry descriptor and
    /// returns the body handle, the playground-wide body identity.
    pub fn insert_body(
        &mut self,
        position: Vector2<f32>,
        geometry: &Geometry,
        is_static: bool,
        restitution: f32,
        friction: f32,
        density: f32,
    ) -> RigidBodyHandle {
        let builder = if is_static {
            RigidBodyBuilder::fixed()
        } else {
            RigidBodyBuilder::dynamic()
        };
        let body = builder
            .translation(vector![position.x, position.y])
            .build();
        let handle = self.bodies.insert(body);

        let collider = collider_for(geometry)
            .restitution(restitution)
            .friction(friction)
            .density(density)
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);

        handle
    }

    /// Removes a body and its colliders from the simulation.
    pub fn remove_body(&mut self, handle: RigidBodyHandle) {
        self.bodies.remove(
            handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    pub fn contains(&self, handle: RigidBodyHandle) -> bool {
        self.bodies.contains(handle)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Advances the simulation by exactly one fixed timestep.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );

        // Applied forces act for exactly one step, matching the per-tick
        // force accumulator the interaction layer expects.
        for (_, body) in self.bodies.iter_mut() {
            body.reset_forces(false);
        }
    }

    /// All dynamic bodies whose collision shape contains `point`.
    ///
    /// A plain scan over the collider set — the playground never holds
    /// more than a few dozen bodies. Order is collider-set internal;
    /// callers that care resolve ties against their own iteration order.
    pub fn bodies_at_point(&self, point: Vector2<f32>) -> Vec<RigidBodyHandle> {
        let point = point![point.x, point.y];
        let mut hits = Vec::new();
        for (_, collider) in self.colliders.iter() {
            let Some(handle) = collider.parent() else { continue };
            let Some(body) = self.bodies.get(handle) else { continue };
            if body.is_fixed() || hits.contains(&handle) {
                continue;
            }
            if collider.shape().contains_point(collider.position(), &point) {
                hits.push(handle);
            }
        }
        hits
    }

    pub fn position(&self, handle: RigidBodyHandle) -> Option<Vector2<f32>> {
        self.bodies.get(handle).map(|body| from_na(body.translation()))
    }

    pub fn rotation(&self, handle: RigidBodyHandle) -> f32 {
        self.bodies
            .get(handle)
            .map(|body| body.rotation().angle())
            .unwrap_or(0.0)
    }

    /// Teleports a body, waking it. Used for wall repositioning on resize.
    pub fn set_position(&mut self, handle: RigidBodyHandle, position: Vector2<f32>) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.set_translation(to_na(position), true);
        }
    }

    pub fn velocity(&self, handle: RigidBodyHandle) -> Vector2<f32> {
        self.bodies
            .get(handle)
            .map(|body| from_na(body.linvel()))
            .unwrap_or(Vector2::new(0.0, 0.0))
    }

    pub fn mass(&self, handle: RigidBodyHandle) -> f32 {
        self.bodies.get(handle).map(|body| body.mass()).unwrap_or(0.0)
    }

    /// Accumulates a force at a world-space point; cleared after the next
    /// step.
    pub fn apply_force_at(
        &mut self,
        handle: RigidBodyHandle,
        force: Vector2<f32>,
        point: Vector2<f32>,
    ) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.add_force_at_point(to_na(force), point![point.x, point.y], true);
        }
    }

    /// Applies an instantaneous impulse at a world-space point.
    pub fn apply_impulse_at(
        &mut self,
        handle: RigidBodyHandle,
        impulse: Vector2<f32>,
        point: Vector2<f32>,
    ) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.apply_impulse_at_point(to_na(impulse), point![point.x, point.y], true);
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

fn collider_for(geometry: &Geometry) -> ColliderBuilder {
    match *geometry {
        Geometry::Circle { radius } => ColliderBuilder::ball(radius),
        Geometry::Polygon { sides, radius } => {
            let points: Vec<Point<Real>> = Geometry::Polygon { sides, radius }
                .local_outline()
                .into_iter()
                .map(|v| point![v.x, v.y])
                .collect();
            // A regular polygon always has a hull; the ball fallback keeps
            // a degenerate input from crashing the frame.
            ColliderBuilder::convex_hull(&points).unwrap_or_else(|| ColliderBuilder::ball(radius))
        }
        Geometry::RoundedRect {
            width,
            height,
            corner_radius,
        } => {
            let hw = width * 0.5;
            let hh = height * 0.5;
            if corner_radius <= f32::EPSILON {
                ColliderBuilder::cuboid(hw, hh)
            } else {
                let cr = corner_radius.min(hw.min(hh) - f32::EPSILON);
                ColliderBuilder::round_cuboid(hw - cr, hh - cr, cr)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_point_query() {
        let mut world = PhysicsWorld::new();
        let handle = world.insert_body(
            Vector2::new(100.0, 100.0),
            &Geometry::Circle { radius: 50.0 },
            false,
            0.6,
            0.1,
            0.001,
        );

        let hits = world.bodies_at_point(Vector2::new(110.0, 110.0));
        assert_eq!(hits, vec![handle]);

        assert!(world.bodies_at_point(Vector2::new(300.0, 300.0)).is_empty());
    }

    #[test]
    fn test_point_query_excludes_static() {
        let mut world = PhysicsWorld::new();
        world.insert_body(
            Vector2::new(0.0, 0.0),
            &Geometry::RoundedRect {
                width: 200.0,
                height: 200.0,
                corner_radius: 0.0,
            },
            true,
            0.0,
            0.3,
            0.001,
        );

        assert!(world.bodies_at_point(Vector2::new(0.0, 0.0)).is_empty());
    }

    #[test]
    fn test_gravity_pulls_bodies_down() {
        let mut world = PhysicsWorld::new();
        let handle = world.insert_body(
            Vector2::new(0.0, 0.0),
            &Geometry::Circle { radius: 10.0 },
            false,
            0.6,
            0.1,
            0.001,
        );

        for _ in 0..30 {
            world.step();
        }
        let pos = world.position(handle).unwrap();
        assert!(pos.y > 0.0, "body should have fallen, y = {}", pos.y);
    }

    #[test]
    fn test_static_bodies_do_not_move() {
        let mut world = PhysicsWorld::new();
        let handle = world.insert_body(
            Vector2::new(400.0, 630.0),
            &Geometry::RoundedRect {
                width: 800.0,
                height: 60.0,
                corner_radius: 0.0,
            },
            true,
            0.0,
            0.3,
            0.001,
        );

        for _ in 0..30 {
            world.step();
        }
        let pos = world.position(handle).unwrap();
        assert_eq!(pos, Vector2::new(400.0, 630.0));
    }

    #[test]
    fn test_remove_body() {
        let mut world = PhysicsWorld::new();
        let handle = world.insert_body(
            Vector2::new(0.0, 0.0),
            &Geometry::Circle { radius: 10.0 },
            false,
            0.6,
            0.1,
            0.001,
        );
        assert!(world.contains(handle));

        world.remove_body(handle);
        assert!(!world.contains(handle));
        assert!(world.bodies_at_point(Vector2::new(0.0, 0.0)).is_empty());
    }

    #[test]
    fn test_gravity_setter_round_trips() {
        let mut world = PhysicsWorld::new();
        world.set_gravity(2.5);
        assert!((world.gravity_magnitude() - 2.5).abs() < 1e-6);
    }
}
