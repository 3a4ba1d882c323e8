//! # Playground State
//!
//! The explicit application-state struct: physics world, scene registry,
//! selection set, interaction controller, drag constraint, and the live
//! UI configuration, owned by one instance and passed by reference to the
//! renderer and the UI. No ambient globals — multiple independent
//! playgrounds can coexist and tests drive one deterministically.

use log::info;

use crate::gfx::paint::RenderOptions;
use crate::interact::{AppearanceScope, InteractionController, ShapeConfig, ToolMode};
use crate::physics::{DragConstraint, FixedRunner, PhysicsWorld};
use crate::scene::body::Color;
use crate::scene::factory::ShapeFactory;
use crate::scene::registry::{SceneRegistry, RESET_BODY_COUNT};
use crate::scene::selection::SelectionSet;

pub struct Playground {
    pub world: PhysicsWorld,
    pub registry: SceneRegistry,
    pub selection: SelectionSet,
    pub drag: DragConstraint,
    pub shape_config: ShapeConfig,
    pub options: RenderOptions,
    controller: InteractionController,
    runner: FixedRunner,
    viewport: (f32, f32),
}

impl Playground {
    /// Builds a playground for a viewport of the given logical size:
    /// four boundary walls, the initial random scene, and an attached
    /// drag constraint.
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_controller(InteractionController::new(ShapeFactory::new()), width, height)
    }

    /// Deterministic playground for tests.
    pub fn with_seed(seed: u64, width: f32, height: f32) -> Self {
        Self::with_controller(InteractionController::with_seed(seed), width, height)
    }

    fn with_controller(mut controller: InteractionController, width: f32, height: f32) -> Self {
        let mut world = PhysicsWorld::new();
        let mut registry = SceneRegistry::new();
        registry.install_walls(&mut world, width, height);

        for _ in 0..RESET_BODY_COUNT {
            let spec = controller.factory_mut().random_spec(width, height);
            registry.spawn(&mut world, spec);
        }

        let mut drag = DragConstraint::new();
        drag.attach();

        info!(
            "playground created: {}x{} with {} dynamic bodies",
            width, height, RESET_BODY_COUNT
        );

        Self {
            world,
            registry,
            selection: SelectionSet::new(),
            drag,
            shape_config: ShapeConfig::default(),
            options: RenderOptions::default(),
            controller,
            runner: FixedRunner::new(),
            viewport: (width, height),
        }
    }

    pub fn viewport(&self) -> (f32, f32) {
        self.viewport
    }

    /// Applies a debounced viewport resize: walls move to hug the new
    /// screen edges, keeping their identity.
    pub fn resize(&mut self, width: f32, height: f32) {
        let old = self.viewport;
        self.viewport = (width, height);
        self.registry
            .reposition_walls(&mut self.world, old, (width, height));
    }

    // ---- pointer / keyboard entry points -------------------------------

    /// Cursor moved, in physical pixels. Applies the drag-spring nudge
    /// when a body is grappled.
    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        self.drag.set_pointer_physical(x, y);
        self.controller.pointer_move(&mut self.world, &self.drag);
    }

    /// Primary button pressed at the current pointer position.
    pub fn pointer_pressed(&mut self) {
        let position = self.drag.pointer();
        self.controller.pointer_down(
            position,
            &self.shape_config,
            &mut self.world,
            &mut self.registry,
            &mut self.selection,
            &mut self.drag,
        );
    }

    /// Primary button released, or the cursor left the window.
    pub fn pointer_released(&mut self) {
        self.controller.pointer_up(&mut self.drag);
    }

    // ---- tool / UI entry points ----------------------------------------

    pub fn tool_mode(&self) -> ToolMode {
        self.controller.mode()
    }

    pub fn set_tool(&mut self, mode: ToolMode) {
        self.controller
            .set_mode(mode, &mut self.registry, &mut self.selection);
    }

    pub fn gravity(&self) -> f32 {
        self.world.gravity_magnitude()
    }

    pub fn set_gravity(&mut self, magnitude: f32) {
        self.world.set_gravity(magnitude);
    }

    /// Rebuilds every selected circle with the given radius; see the
    /// interaction controller for the replacement semantics.
    pub fn set_selected_radius(&mut self, radius: f32) {
        self.controller.set_selected_radius(
            radius,
            &mut self.world,
            &mut self.registry,
            &mut self.selection,
            &mut self.drag,
        );
    }

    /// Fill/opacity override for all dynamic bodies or the selection.
    pub fn apply_appearance(
        &mut self,
        color: Option<Color>,
        opacity: Option<f32>,
        scope: AppearanceScope,
    ) {
        self.controller
            .apply_appearance(color, opacity, scope, &mut self.registry, &self.selection);
    }

    /// Full scene reset, bound to the `R` key and the UI reset button.
    pub fn reset(&mut self) {
        let (width, height) = self.viewport;
        self.registry.reset(
            &mut self.world,
            self.controller.factory_mut(),
            &mut self.selection,
            &mut self.drag,
            width,
            height,
        );
    }

    // ---- simulation ----------------------------------------------------

    /// Advances the simulation by however many fixed steps `elapsed`
    /// seconds are worth. The drag spring pulls once per step so drag
    /// strength is independent of event cadence.
    pub fn step_simulation(&mut self, elapsed: f32) {
        for _ in 0..self.runner.accumulate(elapsed) {
            self.drag.apply_spring(&mut self.world);
            self.world.step();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector2;

    #[test]
    fn test_initial_scene_counts() {
        let playground = Playground::with_seed(1, 800.0, 600.0);
        assert_eq!(playground.registry.static_count(), 4);
        assert_eq!(playground.registry.dynamic_count(), RESET_BODY_COUNT);
        assert!(playground.drag.is_attached());
        assert!(playground.selection.is_empty());
    }

    #[test]
    fn test_reset_regenerates_scene() {
        let mut playground = Playground::with_seed(1, 800.0, 600.0);
        let before: Vec<_> = playground
            .registry
            .dynamic_bodies()
            .map(|b| b.handle)
            .collect();

        playground.reset();

        assert_eq!(playground.registry.dynamic_count(), RESET_BODY_COUNT);
        assert_eq!(playground.registry.static_count(), 4);
        for handle in before {
            assert!(!playground.world.contains(handle));
        }
        assert!(playground.drag.is_attached());
    }

    #[test]
    fn test_step_simulation_moves_bodies() {
        let mut playground = Playground::with_seed(2, 800.0, 600.0);
        let handle = playground
            .registry
            .dynamic_bodies()
            .next()
            .unwrap()
            .handle;
        let before = playground.world.position(handle).unwrap();

        playground.step_simulation(0.5);

        let after = playground.world.position(handle).unwrap();
        assert_ne!(before, after);
    }

    #[test]
    fn test_resize_moves_walls_to_new_edges() {
        let mut playground = Playground::with_seed(3, 800.0, 600.0);
        playground.resize(1024.0, 768.0);

        let bottom = playground
            .registry
            .static_bodies()
            .next()
            .unwrap()
            .handle;
        assert_eq!(
            playground.world.position(bottom).unwrap(),
            Vector2::new(512.0, 798.0)
        );
    }

    #[test]
    fn test_gravity_round_trip() {
        let mut playground = Playground::with_seed(4, 800.0, 600.0);
        playground.set_gravity(0.5);
        assert!((playground.gravity() - 0.5).abs() < 1e-6);
    }
}
