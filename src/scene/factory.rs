//! # Shape Factory
//!
//! Builds body specs — geometry plus material plus appearance — for
//! everything the playground can spawn. Creation is side-effect free:
//! a spec only becomes a simulated body once the scene registry spawns it,
//! which keeps creation and placement independently testable.

use cgmath::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::body::{Appearance, Color, Geometry};

/// Material constants shared by every dynamic body.
pub const RESTITUTION: f32 = 0.6;
pub const FRICTION: f32 = 0.1;
pub const DENSITY: f32 = 0.001;

/// Smallest accepted radius / extent. Inputs below this are clamped, not
/// rejected, so a bad slider value can never produce a degenerate collider.
pub const MIN_EXTENT: f32 = 4.0;

/// Regular polygons are limited to this side range.
pub const MIN_SIDES: u32 = 3;
pub const MAX_SIDES: u32 = 8;

/// Fixed fill palette used when no explicit color is requested.
pub const PALETTE: [Color; 8] = [
    Color::new(0xe7, 0x4c, 0x3c),
    Color::new(0x34, 0x98, 0xdb),
    Color::new(0x2e, 0xcc, 0x71),
    Color::new(0xf1, 0xc4, 0x0f),
    Color::new(0x9b, 0x59, 0xb6),
    Color::new(0x1a, 0xbc, 0x9c),
    Color::new(0xe6, 0x7e, 0x22),
    Color::new(0x34, 0x49, 0x5e),
];

/// Everything needed to spawn one body: where, what shape, what material,
/// and how it should be painted.
#[derive(Debug, Clone)]
pub struct BodySpec {
    pub position: Vector2<f32>,
    pub geometry: Geometry,
    pub appearance: Appearance,
    pub is_static: bool,
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
}

/// Builds body specs, picking palette colors and random scene parameters
/// from an internally owned RNG.
pub struct ShapeFactory {
    rng: StdRng,
}

impl ShapeFactory {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic factory for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Builds a dynamic body spec at `position`.
    ///
    /// Geometry parameters are clamped into their valid ranges (sides to
    /// `[3, 8]`, extents to at least [`MIN_EXTENT`]). When `color` is
    /// `None` one is drawn uniformly from [`PALETTE`].
    pub fn create(
        &mut self,
        position: Vector2<f32>,
        geometry: Geometry,
        color: Option<Color>,
    ) -> BodySpec {
        let geometry = clamp_geometry(geometry);
        let fill = color.unwrap_or_else(|| self.pick_color());
        BodySpec {
            position,
            geometry,
            appearance: Appearance::filled(fill),
            is_static: false,
            restitution: RESTITUTION,
            friction: FRICTION,
            density: DENSITY,
        }
    }

    /// Random body used by the initial fill and by scene reset: radius in
    /// [30, 90), a coin flip between a circle and a 3-5 sided polygon,
    /// position uniform over the viewport.
    pub fn random_spec(&mut self, width: f32, height: f32) -> BodySpec {
        let radius = self.rng.random_range(30.0..90.0);
        let position = Vector2::new(
            self.rng.random_range(0.0..width.max(1.0)),
            self.rng.random_range(0.0..height.max(1.0)),
        );
        let geometry = if self.rng.random::<bool>() {
            Geometry::Circle { radius }
        } else {
            Geometry::Polygon {
                sides: self.rng.random_range(MIN_SIDES..=5),
                radius,
            }
        };
        self.create(position, geometry, None)
    }

    /// Uniform palette pick.
    pub fn pick_color(&mut self) -> Color {
        PALETTE[self.rng.random_range(0..PALETTE.len())]
    }

    /// Random unit-ish jitter vector with components in [-0.5, 0.5),
    /// used for the click feedback impulse.
    pub fn jitter(&mut self) -> Vector2<f32> {
        Vector2::new(
            self.rng.random::<f32>() - 0.5,
            self.rng.random::<f32>() - 0.5,
        )
    }
}

impl Default for ShapeFactory {
    fn default() -> Self {
        Self::new()
    }
}

fn clamp_geometry(geometry: Geometry) -> Geometry {
    match geometry {
        Geometry::Circle { radius } => Geometry::Circle {
            radius: radius.max(MIN_EXTENT),
        },
        Geometry::Polygon { sides, radius } => Geometry::Polygon {
            sides: sides.clamp(MIN_SIDES, MAX_SIDES),
            radius: radius.max(MIN_EXTENT),
        },
        Geometry::RoundedRect {
            width,
            height,
            corner_radius,
        } => {
            let width = width.max(MIN_EXTENT);
            let height = height.max(MIN_EXTENT);
            Geometry::RoundedRect {
                width,
                height,
                corner_radius: corner_radius.clamp(0.0, 0.5 * width.min(height)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_constants() {
        let mut factory = ShapeFactory::with_seed(7);
        let spec = factory.create(
            Vector2::new(10.0, 20.0),
            Geometry::Circle { radius: 50.0 },
            None,
        );

        assert_eq!(spec.restitution, RESTITUTION);
        assert_eq!(spec.friction, FRICTION);
        assert_eq!(spec.density, DENSITY);
        assert!(spec.appearance.opacity > 0.0 && spec.appearance.opacity <= 1.0);
        assert!(!spec.is_static);
    }

    #[test]
    fn test_sides_clamped() {
        let mut factory = ShapeFactory::with_seed(7);

        let spec = factory.create(
            Vector2::new(0.0, 0.0),
            Geometry::Polygon { sides: 2, radius: 30.0 },
            None,
        );
        assert_eq!(spec.geometry, Geometry::Polygon { sides: 3, radius: 30.0 });

        let spec = factory.create(
            Vector2::new(0.0, 0.0),
            Geometry::Polygon { sides: 12, radius: 30.0 },
            None,
        );
        assert_eq!(spec.geometry, Geometry::Polygon { sides: 8, radius: 30.0 });
    }

    #[test]
    fn test_degenerate_extents_clamped() {
        let mut factory = ShapeFactory::with_seed(7);

        let spec = factory.create(
            Vector2::new(0.0, 0.0),
            Geometry::Circle { radius: -10.0 },
            None,
        );
        assert_eq!(spec.geometry, Geometry::Circle { radius: MIN_EXTENT });

        // Corner radius can never exceed half the shorter extent.
        let spec = factory.create(
            Vector2::new(0.0, 0.0),
            Geometry::RoundedRect {
                width: 40.0,
                height: 20.0,
                corner_radius: 50.0,
            },
            None,
        );
        assert_eq!(
            spec.geometry,
            Geometry::RoundedRect {
                width: 40.0,
                height: 20.0,
                corner_radius: 10.0,
            }
        );
    }

    #[test]
    fn test_explicit_color_wins() {
        let mut factory = ShapeFactory::with_seed(7);
        let red = Color::new(255, 0, 0);
        let spec = factory.create(
            Vector2::new(0.0, 0.0),
            Geometry::Circle { radius: 20.0 },
            Some(red),
        );
        assert_eq!(spec.appearance.fill, red);
    }

    #[test]
    fn test_random_specs_stay_in_range() {
        let mut factory = ShapeFactory::with_seed(42);
        for _ in 0..100 {
            let spec = factory.random_spec(800.0, 600.0);
            match spec.geometry {
                Geometry::Circle { radius } => {
                    assert!((30.0..90.0).contains(&radius));
                }
                Geometry::Polygon { sides, radius } => {
                    assert!((3..=5).contains(&sides));
                    assert!((30.0..90.0).contains(&radius));
                }
                Geometry::RoundedRect { .. } => panic!("random fill never emits rects"),
            }
            assert!((0.0..800.0).contains(&spec.position.x));
            assert!((0.0..600.0).contains(&spec.position.y));
            assert!(PALETTE.contains(&spec.appearance.fill));
        }
    }
}
