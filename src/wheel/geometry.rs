use crate::wheel::error::WheelError;
use crate::wheel::{FULL_TURN, INNER_RADIUS_RATIO, START_OFFSET};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point at `radius` from `center`, `angle` degrees clockwise from 3 o'clock.
    pub fn polar(center: Point, radius: f64, angle: f64) -> Self {
        let rad = angle.to_radians();
        Self::new(center.x + radius * rad.cos(), center.y + radius * rad.sin())
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Screen angle in degrees of `self` as seen from `center`.
    pub fn angle_from(&self, center: Point) -> f64 {
        (self.y - center.y).atan2(self.x - center.x).to_degrees()
    }
}

/// Wraps into `[0, 360)`.
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(FULL_TURN);
    // rem_euclid of a tiny negative value rounds up to exactly 360
    if wrapped >= FULL_TURN { 0.0 } else { wrapped }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentBounds {
    pub start_angle: f64,
    pub end_angle: f64,
}

impl SegmentBounds {
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    pub fn mid_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelGeometry {
    segment_count: usize,
    segment_angle: f64,
}

impl WheelGeometry {
    pub fn new(segment_count: usize) -> Result<Self, WheelError> {
        if segment_count == 0 {
            return Err(WheelError::EmptyRegistry);
        }
        let segment_angle = FULL_TURN / segment_count as f64;
        if !segment_angle.is_finite() {
            return Err(WheelError::NonFiniteSegmentAngle(segment_angle));
        }
        Ok(Self {
            segment_count,
            segment_angle,
        })
    }

    pub fn segment_count(&self) -> usize {
        self.segment_count
    }

    pub fn segment_angle(&self) -> f64 {
        self.segment_angle
    }

    /// Segment 0 starts at 12 o'clock; segments run clockwise.
    pub fn segment_bounds(&self, index: usize) -> SegmentBounds {
        let start_angle = index as f64 * self.segment_angle + START_OFFSET;
        SegmentBounds {
            start_angle,
            end_angle: start_angle + self.segment_angle,
        }
    }

    pub fn slice_region(&self, index: usize, center: Point, outer_radius: f64) -> SliceRegion {
        self.build_slice_region(index, center, outer_radius, outer_radius * INNER_RADIUS_RATIO)
    }

    pub fn build_slice_region(
        &self,
        index: usize,
        center: Point,
        outer_radius: f64,
        inner_radius: f64,
    ) -> SliceRegion {
        SliceRegion {
            index,
            center,
            outer_radius,
            inner_radius,
            bounds: self.segment_bounds(index),
        }
    }

    /// Which segment sits under a pointer placed `pointer_offset` degrees
    /// clockwise from 12 o'clock once the wheel is rotated by `rotation`.
    pub fn angle_to_segment_index(&self, rotation: f64, pointer_offset: f64) -> usize {
        let local = normalize_degrees(pointer_offset - rotation);
        ((local / self.segment_angle).floor() as usize).min(self.segment_count - 1)
    }

    /// Rotation in `[0, 360)` that centers `index` under the pointer.
    pub fn rest_angle(&self, index: usize, pointer_offset: f64) -> f64 {
        normalize_degrees(
            pointer_offset - self.segment_angle * index as f64 - self.segment_angle / 2.0,
        )
    }
}

/// Annular sector covering one segment, in unrotated wheel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceRegion {
    pub index: usize,
    pub center: Point,
    pub outer_radius: f64,
    pub inner_radius: f64,
    pub bounds: SegmentBounds,
}

impl SliceRegion {
    pub fn large_arc(&self) -> bool {
        self.bounds.sweep() > 180.0
    }

    /// SVG path: outer arc, line inward, inner arc back, close.
    pub fn path_data(&self) -> String {
        let (start, end) = (self.bounds.start_angle, self.bounds.end_angle);
        let outer_start = Point::polar(self.center, self.outer_radius, start);
        let outer_end = Point::polar(self.center, self.outer_radius, end);
        let inner_start = Point::polar(self.center, self.inner_radius, end);
        let inner_end = Point::polar(self.center, self.inner_radius, start);
        let large = u8::from(self.large_arc());

        format!(
            "M {:.2},{:.2} A {r:.2},{r:.2} 0 {large},1 {:.2},{:.2} L {:.2},{:.2} A {ri:.2},{ri:.2} 0 {large},0 {:.2},{:.2} Z",
            outer_start.x,
            outer_start.y,
            outer_end.x,
            outer_end.y,
            inner_start.x,
            inner_start.y,
            inner_end.x,
            inner_end.y,
            r = self.outer_radius,
            ri = self.inner_radius,
        )
    }

    /// Hit test against the slice as drawn after rotating the wheel by `rotation`.
    pub fn contains(&self, point: Point, rotation: f64) -> bool {
        let dist = point.distance_to(self.center);
        if dist < self.inner_radius || dist > self.outer_radius {
            return false;
        }
        let local =
            normalize_degrees(point.angle_from(self.center) - rotation - self.bounds.start_angle);
        local < self.bounds.sweep()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_zero_starts_at_top() {
        let geometry = WheelGeometry::new(8).unwrap();
        let bounds = geometry.segment_bounds(0);
        assert_eq!(bounds.start_angle, -90.0);
        assert_eq!(bounds.end_angle, -45.0);
        assert_eq!(geometry.segment_bounds(3).start_angle, 45.0);
    }

    #[test]
    fn test_zero_segments_is_rejected() {
        assert_eq!(WheelGeometry::new(0).unwrap_err(), WheelError::EmptyRegistry);
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(720.0), 0.0);
        assert_eq!(normalize_degrees(-1e-15), 0.0);
    }

    #[test]
    fn test_large_arc_only_above_half_turn() {
        let center = Point::new(0.0, 0.0);
        for (n, expected) in [(1, true), (2, false), (3, false), (8, false)] {
            let geometry = WheelGeometry::new(n).unwrap();
            assert_eq!(geometry.slice_region(0, center, 100.0).large_arc(), expected, "n = {n}");
        }
    }

    #[test]
    fn test_path_data_shape() {
        let geometry = WheelGeometry::new(8).unwrap();
        let slice = geometry.slice_region(0, Point::new(200.0, 200.0), 200.0);
        assert_eq!(slice.inner_radius, 60.0);

        let d = slice.path_data();
        assert!(d.starts_with("M 200.00,0.00 A 200.00,200.00 0 0,1"), "{d}");
        assert!(d.contains(" L "));
        assert!(d.contains("A 60.00,60.00 0 0,0"));
        assert!(d.ends_with('Z'));
    }

    #[test]
    fn test_reverse_lookup_at_rest_angles() {
        for n in 1..=12 {
            let geometry = WheelGeometry::new(n).unwrap();
            for offset in [0.0, 90.0, 180.0, 270.0] {
                for k in 0..n {
                    let rest = geometry.rest_angle(k, offset);
                    assert_eq!(geometry.angle_to_segment_index(rest, offset), k);
                    assert_eq!(geometry.angle_to_segment_index(rest + 3600.0, offset), k);
                }
            }
        }
    }

    #[test]
    fn test_contains_respects_rotation() {
        let geometry = WheelGeometry::new(4).unwrap();
        let center = Point::new(100.0, 100.0);
        let slice = geometry.slice_region(0, center, 100.0);
        // segment 0 spans 12 to 3 o'clock before rotating
        let upper_right = Point::polar(center, 60.0, -45.0);
        assert!(slice.contains(upper_right, 0.0));
        assert!(!slice.contains(upper_right, 90.0));
        assert!(slice.contains(Point::polar(center, 60.0, 45.0), 90.0));
        // center hole and outside the rim
        assert!(!slice.contains(Point::polar(center, 10.0, -45.0), 0.0));
        assert!(!slice.contains(Point::polar(center, 120.0, -45.0), 0.0));
    }
}
