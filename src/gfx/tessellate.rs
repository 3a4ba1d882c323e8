//! # Tessellation Helpers
//!
//! Turns outlines and strokes into triangles. Everything the playground
//! draws — body fills, drop shadows, outline strokes, the drag spring —
//! lands in one [`FrameGeometry`] batch per frame and is issued as a
//! single draw call.

use cgmath::{InnerSpace, Vector2};
use std::f32::consts::TAU;

use super::vertex::Vertex2D;

/// Number of interpolated segments in the drag-spring polyline.
pub const SPRING_SEGMENTS: usize = 12;

/// Sideways amplitude of the spring wave, in logical pixels.
const SPRING_AMPLITUDE: f32 = 5.0;

/// CPU-side triangle batch for one frame.
#[derive(Debug, Default)]
pub struct FrameGeometry {
    pub vertices: Vec<Vertex2D>,
    pub indices: Vec<u32>,
}

impl FrameGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Fills a convex outline as a triangle fan, coloring each vertex through
/// `color_at`. Outlines with fewer than 3 points are skipped.
pub fn fill_convex(
    geo: &mut FrameGeometry,
    outline: &[Vector2<f32>],
    color_at: impl Fn(Vector2<f32>) -> [f32; 4],
) {
    if outline.len() < 3 {
        return;
    }
    let base = geo.vertices.len() as u32;
    for point in outline {
        geo.vertices.push(Vertex2D {
            position: [point.x, point.y],
            color: color_at(*point),
        });
    }
    for i in 1..outline.len() as u32 - 1 {
        geo.indices.extend_from_slice(&[base, base + i, base + i + 1]);
    }
}

/// Solid disc, used for the spring endpoint dots.
pub fn fill_circle(
    geo: &mut FrameGeometry,
    center: Vector2<f32>,
    radius: f32,
    segments: usize,
    color: [f32; 4],
) {
    let outline: Vec<Vector2<f32>> = (0..segments.max(3))
        .map(|i| {
            let angle = TAU * i as f32 / segments.max(3) as f32;
            center + Vector2::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect();
    fill_convex(geo, &outline, |_| color);
}

/// Strokes an open polyline with flat butt joints: one quad per segment.
pub fn stroke_polyline(
    geo: &mut FrameGeometry,
    points: &[Vector2<f32>],
    width: f32,
    color: [f32; 4],
) {
    let half = width * 0.5;
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let along = b - a;
        if along.magnitude2() <= f32::EPSILON {
            continue;
        }
        let normal = Vector2::new(-along.y, along.x).normalize() * half;

        let base = geo.vertices.len() as u32;
        for position in [a - normal, a + normal, b + normal, b - normal] {
            geo.vertices.push(Vertex2D {
                position: [position.x, position.y],
                color,
            });
        }
        geo.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
}

/// Strokes a closed outline.
pub fn stroke_loop(
    geo: &mut FrameGeometry,
    outline: &[Vector2<f32>],
    width: f32,
    color: [f32; 4],
) {
    if outline.len() < 2 {
        return;
    }
    let mut closed = Vec::with_capacity(outline.len() + 1);
    closed.extend_from_slice(outline);
    closed.push(outline[0]);
    stroke_polyline(geo, &closed, width, color);
}

/// Wavy spring path from the pointer to the grappled body: a fixed number
/// of interpolated segments, each pushed sideways by a sinusoid of its
/// position along the line. Both endpoints are exact.
pub fn spring_path(from: Vector2<f32>, to: Vector2<f32>) -> Vec<Vector2<f32>> {
    let span = to - from;
    if span.magnitude2() <= f32::EPSILON {
        return vec![from, to];
    }
    let perp = Vector2::new(-span.y, span.x).normalize();
    let step = span / SPRING_SEGMENTS as f32;

    let mut points = Vec::with_capacity(SPRING_SEGMENTS + 1);
    points.push(from);
    for i in 1..=SPRING_SEGMENTS {
        let t = i as f32 / SPRING_SEGMENTS as f32;
        let offset = (t * TAU).sin() * SPRING_AMPLITUDE;
        points.push(from + step * i as f32 + perp * offset);
    }
    points
}
