use crate::wheel::category::CategoryRegistry;
use crate::wheel::geometry::{Point, SliceRegion, WheelGeometry};
use crate::wheel::layout::WheelLayout;
use crate::wheel::{TOOLTIP_FALLBACK_WIDTH, TOOLTIP_OFFSET_Y};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Segment(usize),
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Spin,
    Navigate(usize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RegionShape {
    /// A segment slice, rotated with the wheel.
    Slice { slice: SliceRegion, rotation: f64 },
    /// The spin trigger in the middle; never rotated.
    Disc { center: Point, radius: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRegion {
    pub target: HitTarget,
    pub shape: RegionShape,
}

impl HitRegion {
    pub fn contains(&self, point: Point) -> bool {
        match self.shape {
            RegionShape::Slice { slice, rotation } => slice.contains(point, rotation),
            RegionShape::Disc { center, radius } => point.distance_to(center) <= radius,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tooltip {
    pub category: Option<usize>,
    pub position: Point,
    pub width: f64,
}

impl Default for Tooltip {
    fn default() -> Self {
        Self {
            category: None,
            position: Point::default(),
            width: TOOLTIP_FALLBACK_WIDTH,
        }
    }
}

impl Tooltip {
    pub fn is_visible(&self) -> bool {
        self.category.is_some()
    }

    /// Centers the tooltip above the pointer while keeping it on screen.
    pub fn place(&mut self, pointer: Point, viewport_width: f64) {
        let half = self.width / 2.0;
        let x = if pointer.x + half > viewport_width {
            viewport_width - half
        } else if pointer.x - half < 0.0 {
            half
        } else {
            pointer.x
        };
        self.position = Point::new(x, pointer.y - TOOLTIP_OFFSET_Y);
    }

    pub fn hide(&mut self) {
        self.category = None;
    }
}

/// The three rows of the side panel: previous, current, next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewPanel {
    pub prev: usize,
    pub current: usize,
    pub next: usize,
}

impl PreviewPanel {
    pub fn centered_on(registry: &CategoryRegistry, index: usize) -> Self {
        let current = index % registry.len();
        let (prev, next) = registry.neighbors(current);
        Self {
            prev,
            current,
            next,
        }
    }
}

#[derive(Debug, Default)]
pub struct HitRegionManager {
    regions: Vec<HitRegion>,
    tooltip: Tooltip,
}

impl HitRegionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every region with a fresh set aligned to `rotation`.
    pub fn rebuild(&mut self, geometry: &WheelGeometry, layout: &WheelLayout, rotation: f64) {
        self.regions.clear();

        let center = layout.center();
        let radius = layout.radius();
        self.regions.extend((0..geometry.segment_count()).map(|i| HitRegion {
            target: HitTarget::Segment(i),
            shape: RegionShape::Slice {
                slice: geometry.slice_region(i, center, radius),
                rotation,
            },
        }));
        self.regions.push(HitRegion {
            target: HitTarget::Center,
            shape: RegionShape::Disc {
                center,
                radius: layout.inner_radius(),
            },
        });
    }

    pub fn clear(&mut self) {
        self.regions.clear();
        self.tooltip.hide();
    }

    pub fn regions(&self) -> &[HitRegion] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn tooltip(&self) -> &Tooltip {
        &self.tooltip
    }

    pub fn set_tooltip_width(&mut self, width: f64) {
        if width > 0.0 {
            self.tooltip.width = width;
        }
    }

    /// The center trigger sits on top of the slices.
    pub fn hit_test(&self, point: Point) -> Option<HitTarget> {
        self.regions
            .iter()
            .rev()
            .find(|r| r.contains(point))
            .map(|r| r.target)
    }

    pub fn pointer_motion(&mut self, point: Point, viewport_width: f64) -> Option<HitTarget> {
        let target = self.hit_test(point);
        match target {
            Some(HitTarget::Segment(i)) => {
                self.tooltip.category = Some(i);
                self.tooltip.place(point, viewport_width);
            }
            _ => self.tooltip.hide(),
        }
        target
    }

    pub fn pointer_leave(&mut self) {
        self.tooltip.hide();
    }

    pub fn activate(&self, point: Point, secondary: bool) -> Option<Activation> {
        match self.hit_test(point)? {
            HitTarget::Segment(i) if secondary => Some(Activation::Navigate(i)),
            HitTarget::Segment(_) | HitTarget::Center => Some(Activation::Spin),
        }
    }
}
