//! # Body Descriptors
//!
//! Geometry, appearance, and color types shared by the factory, the scene
//! registry, and the renderer. The physics engine holds the authoritative
//! position for every body; these descriptors hold everything else.

use cgmath::Vector2;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

/// Segment count used when a circle outline is flattened for drawing.
/// Hit-testing goes through the engine's exact ball shape, so this only
/// affects render quality.
pub const CIRCLE_SEGMENTS: usize = 48;

/// Segments per rounded-rectangle corner arc.
const CORNER_SEGMENTS: usize = 6;

/// An 8-bit RGB color.
///
/// Appearance colors are stored in 8-bit channels because the pseudo-3D
/// gradient derivation is defined there: highlight/shadow variants add or
/// subtract a fixed per-channel offset with saturating clamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses a `#rrggbb` hex string. Returns `None` for anything else.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#')?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self { r, g, b })
    }

    /// Lightened variant: adds `offset` to each channel, clamped to 255.
    pub fn lighten(self, offset: u8) -> Self {
        Self {
            r: self.r.saturating_add(offset),
            g: self.g.saturating_add(offset),
            b: self.b.saturating_add(offset),
        }
    }

    /// Darkened variant: subtracts `offset` from each channel, clamped to 0.
    pub fn darken(self, offset: u8) -> Self {
        Self {
            r: self.r.saturating_sub(offset),
            g: self.g.saturating_sub(offset),
            b: self.b.saturating_sub(offset),
        }
    }

    /// Channels as normalized floats, for GPU vertex colors.
    pub fn channels_f32(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }

    /// RGBA vertex color with the given alpha.
    pub fn with_alpha(self, alpha: f32) -> [f32; 4] {
        let [r, g, b] = self.channels_f32();
        [r, g, b, alpha]
    }

    /// Channel-wise linear interpolation toward `other`.
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Color {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
        }
    }
}

/// Geometry of a playground body.
///
/// Each variant carries its own parameters; consumers match exhaustively,
/// so adding a shape kind is a compile-enforced change everywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    Circle {
        radius: f32,
    },
    /// Regular polygon with `sides` in `[3, 8]`.
    Polygon {
        sides: u32,
        radius: f32,
    },
    /// Rectangle with optionally rounded corners (ellipse stand-in).
    RoundedRect {
        width: f32,
        height: f32,
        corner_radius: f32,
    },
}

impl Geometry {
    /// True for bodies whose radius can be edited by the radius tool.
    pub fn is_circular(&self) -> bool {
        matches!(self, Geometry::Circle { .. })
    }

    /// Radius of the smallest circle containing the shape, used for
    /// gradient extents and shadow expansion.
    pub fn bounding_radius(&self) -> f32 {
        match *self {
            Geometry::Circle { radius } => radius,
            Geometry::Polygon { radius, .. } => radius,
            Geometry::RoundedRect { width, height, .. } => 0.5 * (width * width + height * height).sqrt(),
        }
    }

    /// Body-local outline centered on the origin.
    ///
    /// The renderer transforms this by the engine's current position and
    /// rotation each frame; the engine's colliders are built from the same
    /// parameters so the two stay in agreement.
    pub fn local_outline(&self) -> Vec<Vector2<f32>> {
        match *self {
            Geometry::Circle { radius } => ring(radius, CIRCLE_SEGMENTS, -FRAC_PI_2),
            Geometry::Polygon { sides, radius } => {
                ring(radius, sides.max(3) as usize, -FRAC_PI_2)
            }
            Geometry::RoundedRect {
                width,
                height,
                corner_radius,
            } => rounded_rect_outline(width, height, corner_radius),
        }
    }
}

fn ring(radius: f32, segments: usize, phase: f32) -> Vec<Vector2<f32>> {
    (0..segments)
        .map(|i| {
            let angle = phase + TAU * i as f32 / segments as f32;
            Vector2::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

fn rounded_rect_outline(width: f32, height: f32, corner_radius: f32) -> Vec<Vector2<f32>> {
    let hw = width * 0.5;
    let hh = height * 0.5;
    let cr = corner_radius.clamp(0.0, hw.min(hh));

    if cr <= f32::EPSILON {
        return vec![
            Vector2::new(-hw, -hh),
            Vector2::new(hw, -hh),
            Vector2::new(hw, hh),
            Vector2::new(-hw, hh),
        ];
    }

    // Corner arc centers, walked counter-clockwise in y-down screen space
    // starting from the top-left corner.
    let corners = [
        (Vector2::new(-hw + cr, -hh + cr), PI),
        (Vector2::new(hw - cr, -hh + cr), 1.5 * PI),
        (Vector2::new(hw - cr, hh - cr), 0.0),
        (Vector2::new(-hw + cr, hh - cr), FRAC_PI_2),
    ];

    let mut outline = Vec::with_capacity(4 * (CORNER_SEGMENTS + 1));
    for (center, start_angle) in corners {
        for i in 0..=CORNER_SEGMENTS {
            let angle = start_angle + FRAC_PI_2 * i as f32 / CORNER_SEGMENTS as f32;
            outline.push(center + Vector2::new(cr * angle.cos(), cr * angle.sin()));
        }
    }
    outline
}

/// Stroke drawn along a body outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub alpha: f32,
    pub width: f32,
}

/// Paintable state of a body, mutable independent of physics state.
///
/// `stroke` carries the selection marker when set; `None` lets the renderer
/// pick the default edge treatment for the active shading mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Appearance {
    pub fill: Color,
    pub opacity: f32,
    pub stroke: Option<Stroke>,
    pub visible: bool,
}

impl Appearance {
    pub fn filled(fill: Color) -> Self {
        Self {
            fill,
            opacity: 1.0,
            stroke: None,
            visible: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Color::from_hex("#2c3e50"), Some(Color::new(0x2c, 0x3e, 0x50)));
        assert_eq!(Color::from_hex("#FFFFFF"), Some(Color::new(255, 255, 255)));
        assert_eq!(Color::from_hex("2c3e50"), None);
        assert_eq!(Color::from_hex("#2c3e5"), None);
        assert_eq!(Color::from_hex("#zzzzzz"), None);
    }

    #[test]
    fn test_highlight_shadow_derivation() {
        // The documented gradient endpoints for mid-gray with offset 40.
        let base = Color::from_hex("#808080").unwrap();
        assert_eq!(base.lighten(40), Color::new(168, 168, 168));
        assert_eq!(base.darken(40), Color::new(88, 88, 88));

        // Clamping at both ends of the channel range.
        assert_eq!(Color::new(250, 10, 128).lighten(40), Color::new(255, 50, 168));
        assert_eq!(Color::new(250, 10, 128).darken(40), Color::new(210, 0, 88));
    }

    #[test]
    fn test_polygon_outline_vertex_count() {
        let outline = Geometry::Polygon { sides: 6, radius: 40.0 }.local_outline();
        assert_eq!(outline.len(), 6);

        // Every vertex sits on the circumscribed circle.
        for v in &outline {
            let len = (v.x * v.x + v.y * v.y).sqrt();
            assert!((len - 40.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_rounded_rect_outline_stays_in_bounds() {
        let outline = Geometry::RoundedRect {
            width: 120.0,
            height: 80.0,
            corner_radius: 20.0,
        }
        .local_outline();

        assert!(outline.len() >= 8);
        for v in &outline {
            assert!(v.x.abs() <= 60.0 + 1e-3);
            assert!(v.y.abs() <= 40.0 + 1e-3);
        }
    }

    #[test]
    fn test_bounding_radius() {
        assert_eq!(Geometry::Circle { radius: 25.0 }.bounding_radius(), 25.0);
        let rect = Geometry::RoundedRect {
            width: 60.0,
            height: 80.0,
            corner_radius: 0.0,
        };
        assert!((rect.bounding_radius() - 50.0).abs() < 1e-4);
    }
}
