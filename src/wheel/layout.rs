use crate::wheel::geometry::{Point, WheelGeometry};
use crate::wheel::{
    ICON_BASE_SIZE, ICON_ORBIT_RATIO, INNER_RADIUS_RATIO, LABEL_FONT_SIZE, LAYOUT_MARGIN,
    REFERENCE_SIZE, SMALL_LABEL_FONT_SIZE, SMALL_VIEWPORT,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn denormalize(&self, origin: Point) -> Point {
        Point::new(origin.x * self.width, origin.y * self.height)
    }

    pub fn normalize(&self, point: Point) -> Point {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Point::new(0.5, 0.5);
        }
        Point::new(point.x / self.width, point.y / self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Point,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.width / 2.0,
            self.origin.y + self.height / 2.0,
        )
    }
}

/// Where the wheel and its side panel sit inside the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelLayout {
    viewport: Viewport,
    wheel: Rect,
    panel: Rect,
}

impl WheelLayout {
    /// Square wheel footprint next to the panel in landscape, above it in portrait.
    pub fn fit(viewport: Viewport) -> Self {
        let m = LAYOUT_MARGIN;
        let (w, h) = (viewport.width.max(0.0), viewport.height.max(0.0));

        let (wheel, panel) = if w >= h {
            let footprint = (h - 2.0 * m).min(w * 0.6 - 2.0 * m).max(0.0);
            let wheel = Rect::new(m, (h - footprint) / 2.0, footprint, footprint);
            let panel = Rect::new(footprint + 2.0 * m, m, w - footprint - 3.0 * m, h - 2.0 * m);
            (wheel, panel)
        } else {
            let footprint = (w - 2.0 * m).min(h * 0.6 - 2.0 * m).max(0.0);
            let wheel = Rect::new((w - footprint) / 2.0, m, footprint, footprint);
            let panel = Rect::new(m, footprint + 2.0 * m, w - 2.0 * m, h - footprint - 3.0 * m);
            (wheel, panel)
        };

        Self {
            viewport,
            wheel,
            panel,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn wheel_rect(&self) -> Rect {
        self.wheel
    }

    pub fn panel_rect(&self) -> Rect {
        self.panel
    }

    pub fn footprint(&self) -> f64 {
        self.wheel.width
    }

    pub fn center(&self) -> Point {
        self.wheel.center()
    }

    pub fn radius(&self) -> f64 {
        self.footprint() / 2.0
    }

    pub fn inner_radius(&self) -> f64 {
        self.radius() * INNER_RADIUS_RATIO
    }

    /// Overlay elements are authored against a 400px wheel.
    pub fn scale(&self) -> f64 {
        self.footprint() / REFERENCE_SIZE
    }

    pub fn label_font_size(&self) -> f64 {
        if self.footprint() < SMALL_VIEWPORT {
            SMALL_LABEL_FONT_SIZE
        } else {
            LABEL_FONT_SIZE
        }
    }

    pub fn icon_size(&self) -> f64 {
        ICON_BASE_SIZE * self.scale()
    }

    /// Icon center for a segment, relative to the wheel center, before rotation.
    pub fn icon_anchor(&self, geometry: &WheelGeometry, index: usize) -> Point {
        let angle = geometry.segment_bounds(index).mid_angle();
        Point::polar(Point::default(), self.radius() * ICON_ORBIT_RATIO, angle)
    }

    /// Origin of the second celebration burst, under the preview rows.
    pub fn result_anchor(&self) -> Point {
        Point::new(
            self.panel.origin.x + self.panel.width / 2.0,
            self.panel.origin.y + self.panel.height * 0.75,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landscape_puts_panel_beside_wheel() {
        let layout = WheelLayout::fit(Viewport::new(800.0, 432.0));
        assert_eq!(layout.footprint(), 400.0);
        assert_eq!(layout.center(), Point::new(216.0, 216.0));
        assert_eq!(layout.inner_radius(), 60.0);
        assert_eq!(layout.scale(), 1.0);
        assert!(layout.panel_rect().origin.x > layout.wheel_rect().width);
    }

    #[test]
    fn test_portrait_stacks_panel_below() {
        let layout = WheelLayout::fit(Viewport::new(360.0, 800.0));
        assert_eq!(layout.footprint(), 328.0);
        assert!(layout.panel_rect().origin.y > layout.wheel_rect().height);
        assert_eq!(layout.label_font_size(), SMALL_LABEL_FONT_SIZE);
    }

    #[test]
    fn test_icons_scale_with_footprint() {
        let geometry = WheelGeometry::new(4).unwrap();
        let big = WheelLayout::fit(Viewport::new(1400.0, 832.0));
        let small = WheelLayout::fit(Viewport::new(500.0, 232.0));
        assert_eq!(big.scale(), 2.0);
        assert_eq!(small.scale(), 0.5);
        assert_eq!(big.icon_size(), 4.0 * small.icon_size());

        let a = big.icon_anchor(&geometry, 1);
        let b = small.icon_anchor(&geometry, 1);
        assert!((a.x - 4.0 * b.x).abs() < 1e-9);
        assert!((a.y - 4.0 * b.y).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_viewport_does_not_go_negative() {
        let layout = WheelLayout::fit(Viewport::new(10.0, 10.0));
        assert_eq!(layout.footprint(), 0.0);
        assert!(layout.panel_rect().width >= 0.0);
    }
}
