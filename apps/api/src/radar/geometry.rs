//! Radar geometry: pure trigonometry shared by drawing and tests.
//!
//! Spoke `i` of `N` sits at `i·2π/N − π/2`: spoke 0 points to 12 o'clock and the
//! rest follow clockwise (screen y grows downward). Values map linearly from
//! `[0, 100]` onto `[0, radius]`.

use std::f64::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};

/// Number of concentric grid rings (20/40/60/80/100).
pub const GRID_RINGS: usize = 5;
/// Full-scale value, drawn on the outer ring.
pub const MAX_VALUE: f64 = 100.0;
/// Room left between the outer ring and the edge of the square for labels.
const LABEL_MARGIN: f64 = 60.0;
/// Distance of axis labels beyond the outer ring.
const LABEL_OFFSET: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadarGeometry {
    pub center: Point,
    pub radius: f64,
}

impl RadarGeometry {
    /// Geometry of a `size`×`size` radar square.
    pub fn new(size: u32) -> Self {
        let half = size as f64 / 2.0;
        Self {
            center: Point { x: half, y: half },
            // small squares keep at least half of the room for the grid
            radius: (half - LABEL_MARGIN).max(half / 2.0),
        }
    }

    /// Angle of spoke `index` out of `count`, in radians.
    pub fn spoke_angle(index: usize, count: usize) -> f64 {
        if count == 0 {
            return -FRAC_PI_2;
        }
        index as f64 * 2.0 * PI / count as f64 - FRAC_PI_2
    }

    /// The point `distance` pixels from the center along spoke `index`.
    pub fn along_spoke(&self, index: usize, count: usize, distance: f64) -> Point {
        let angle = Self::spoke_angle(index, count);
        Point {
            x: self.center.x + distance * angle.cos(),
            y: self.center.y + distance * angle.sin(),
        }
    }

    pub fn spoke_end(&self, index: usize, count: usize) -> Point {
        self.along_spoke(index, count, self.radius)
    }

    /// Position of `value` (0–100) on spoke `index`.
    pub fn value_point(&self, index: usize, count: usize, value: f64) -> Point {
        let distance = sanitize_value(value) / MAX_VALUE * self.radius;
        self.along_spoke(index, count, distance)
    }

    pub fn label_anchor(&self, index: usize, count: usize) -> Point {
        self.along_spoke(index, count, self.radius + LABEL_OFFSET)
    }

    /// Radii of the grid rings, innermost first; the last one is the outer radius.
    pub fn ring_radii(&self) -> Vec<f64> {
        (1..=GRID_RINGS)
            .map(|i| self.radius / GRID_RINGS as f64 * i as f64)
            .collect()
    }

    /// Polygon vertices for one dataset, one per spoke, in spoke order.
    pub fn polygon(&self, values: &[f64]) -> Vec<Point> {
        let count = values.len();
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| self.value_point(i, count, v))
            .collect()
    }
}

/// Clamps a value into `[0, 100]`; non-finite values count as 0.
pub fn sanitize_value(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, MAX_VALUE)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn test_five_spokes_start_at_top_and_go_clockwise() {
        let expected_degrees = [-90.0, -18.0, 54.0, 126.0, 198.0];
        for (i, deg) in expected_degrees.iter().enumerate() {
            let angle = RadarGeometry::spoke_angle(i, 5);
            assert!(
                close(angle.to_degrees(), *deg),
                "spoke {i}: {} vs {deg}",
                angle.to_degrees()
            );
        }
    }

    #[test]
    fn test_spoke_angle_formula_for_other_counts() {
        for n in 3..=8 {
            for i in 0..n {
                let expected = (i as f64 * 360.0 / n as f64 - 90.0).to_radians();
                assert!(close(RadarGeometry::spoke_angle(i, n), expected));
            }
        }
    }

    #[test]
    fn test_default_size_geometry() {
        let geometry = RadarGeometry::new(300);
        assert_eq!(geometry.center, Point { x: 150.0, y: 150.0 });
        assert_eq!(geometry.radius, 90.0);

        let top = geometry.value_point(0, 5, 100.0);
        assert!(close(top.x, 150.0));
        assert!(close(top.y, 60.0));

        let half = geometry.value_point(0, 5, 50.0);
        assert!(close(half.y, 105.0));
    }

    #[test]
    fn test_value_point_matches_formula() {
        let geometry = RadarGeometry::new(400);
        let value = 73.0;
        for i in 0..5 {
            let angle = (i as f64 * 72.0 - 90.0).to_radians();
            let r = value / 100.0 * geometry.radius;
            let p = geometry.value_point(i, 5, value);
            assert!(close(p.x, 200.0 + r * angle.cos()));
            assert!(close(p.y, 200.0 + r * angle.sin()));
        }
    }

    #[test]
    fn test_rings_are_evenly_spaced() {
        let radii = RadarGeometry::new(300).ring_radii();
        assert_eq!(radii, vec![18.0, 36.0, 54.0, 72.0, 90.0]);
    }

    #[test]
    fn test_bad_values_collapse_to_center() {
        let geometry = RadarGeometry::new(300);
        for bad in [f64::NAN, f64::NEG_INFINITY, -40.0] {
            assert_eq!(geometry.value_point(2, 5, bad), geometry.center);
        }
        assert_eq!(
            geometry.value_point(0, 5, 250.0),
            geometry.value_point(0, 5, 100.0)
        );
    }

    #[test]
    fn test_small_sizes_keep_a_positive_radius() {
        let geometry = RadarGeometry::new(100);
        assert!(geometry.radius > 0.0);
        assert_eq!(geometry.radius, 25.0);
    }
}
