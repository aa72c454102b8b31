use serde::{Deserialize, Serialize};

pub mod animation;
pub mod category;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod hit_regions;
pub mod layout;
pub mod particles;
pub mod rotation;

pub use animation::{CubicBezier, SpinAnimation};
pub use category::{Category, CategoryRegistry, CategorySlug, NavPath};
pub use controller::{WheelController, WheelEvent};
pub use error::WheelError;
pub use geometry::{Point, SliceRegion, WheelGeometry};
pub use hit_regions::{HitRegion, HitTarget, PreviewPanel, Tooltip};
pub use layout::{Viewport, WheelLayout};
pub use particles::CelebrationEngine;
pub use rotation::{Phase, SpinPlan, WheelState};

pub const FULL_TURN: f64 = 360.0;
pub const START_OFFSET: f64 = -90.0; // segment 0 starts at 12 o'clock
pub const INNER_RADIUS_RATIO: f64 = 0.3; // center hole / wheel radius
pub const REFERENCE_SIZE: f64 = 400.0; // wheel footprint overlays are authored for
pub const LAYOUT_MARGIN: f64 = 16.0;
pub const LABEL_FONT_SIZE: f64 = 13.0;
pub const SMALL_LABEL_FONT_SIZE: f64 = 11.0;
pub const SMALL_VIEWPORT: f64 = 360.0;
pub const ICON_BASE_SIZE: f64 = 40.0;
pub const ICON_ORBIT_RATIO: f64 = 0.65;
pub const TOOLTIP_OFFSET_Y: f64 = 40.0;
pub const TOOLTIP_FALLBACK_WIDTH: f64 = 100.0;
pub const SPIN_EASING: CubicBezier = CubicBezier::new(0.1, 0.7, 0.1, 1.0);
pub const CATEGORY_CYCLES: usize = 3;

/// Environment hints that change how the wheel animates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DeviceSignals {
    pub reduced_motion: bool,
    pub touch: bool,
    pub save_data: bool,
}

impl DeviceSignals {
    /// Flags set in either source win.
    pub fn merge(self, other: DeviceSignals) -> Self {
        Self {
            reduced_motion: self.reduced_motion || other.reduced_motion,
            touch: self.touch || other.touch,
            save_data: self.save_data || other.save_data,
        }
    }

    /// Swap particle bursts for a single flash.
    pub fn low_power(&self) -> bool {
        self.reduced_motion || self.save_data
    }
}
