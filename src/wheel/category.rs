use crate::config::CategoryConfig;
use crate::wheel::FULL_TURN;
use crate::wheel::error::WheelError;
use derive_more::{AsRef, Deref, Display, From, Into};
use palette::Srgb;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Perceived luminance above which a background is treated as bright.
pub const CONTRAST_THRESHOLD: f64 = 0.6;
pub const SHADE_PERCENT: i32 = 20;
pub const DARK_TEXT: Srgb<u8> = Srgb::new(0, 0, 0);
pub const LIGHT_TEXT: Srgb<u8> = Srgb::new(255, 255, 255);

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct CategorySlug(String);

crate::impl_string_newtype!(CategorySlug);

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct NavPath(String);

crate::impl_string_newtype!(NavPath);

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub name: String,
    pub slug: CategorySlug,
    pub path: NavPath,
    pub color: Srgb<u8>,
    pub text_color: Srgb<u8>,
    pub light_shade: Srgb<u8>,
    pub dark_shade: Srgb<u8>,
    pub icon: Option<PathBuf>,
}

impl Category {
    pub fn new(name: impl Into<String>, slug: CategorySlug, path: NavPath, color: Srgb<u8>) -> Self {
        Self {
            name: name.into(),
            slug,
            path,
            color,
            text_color: contrast_text(color),
            light_shade: shade(color, SHADE_PERCENT),
            dark_shade: shade(color, -SHADE_PERCENT),
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: Option<PathBuf>) -> Self {
        self.icon = icon;
        self
    }

    pub fn from_config(cfg: &CategoryConfig) -> Result<Self, WheelError> {
        let color = parse_color(&cfg.color).ok_or_else(|| WheelError::InvalidColor {
            slug: cfg.slug.to_string(),
            value: cfg.color.clone(),
        })?;
        Ok(Self::new(cfg.name.clone(), cfg.slug.clone(), cfg.path.clone(), color)
            .with_icon(cfg.icon.clone()))
    }

    /// Celebration colors: the base color twice, both shades and white.
    pub fn palette(&self) -> Vec<Srgb<u8>> {
        vec![
            self.color,
            self.color,
            self.light_shade,
            self.dark_shade,
            LIGHT_TEXT,
        ]
    }
}

pub fn parse_color(value: &str) -> Option<Srgb<u8>> {
    value.trim().parse::<Srgb<u8>>().ok()
}

/// Weighted towards the channels humans perceive as brighter.
pub fn perceived_luminance(color: Srgb<u8>) -> f64 {
    (0.299 * color.red as f64 + 0.587 * color.green as f64 + 0.114 * color.blue as f64) / 255.0
}

pub fn contrast_text(color: Srgb<u8>) -> Srgb<u8> {
    if perceived_luminance(color) > CONTRAST_THRESHOLD {
        DARK_TEXT
    } else {
        LIGHT_TEXT
    }
}

/// Scales every channel by `(100 + percent) / 100`, truncating and clamping.
pub fn shade(color: Srgb<u8>, percent: i32) -> Srgb<u8> {
    let scale = |c: u8| (c as i32 * (100 + percent) / 100).clamp(0, 255) as u8;
    Srgb::new(scale(color.red), scale(color.green), scale(color.blue))
}

#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    categories: Vec<Category>,
}

impl CategoryRegistry {
    pub fn new(categories: Vec<Category>) -> Result<Self, WheelError> {
        if categories.is_empty() {
            return Err(WheelError::EmptyRegistry);
        }

        let angle = FULL_TURN / categories.len() as f64;
        if !angle.is_finite() || angle <= 0.0 {
            return Err(WheelError::NonFiniteSegmentAngle(angle));
        }

        let mut seen = HashSet::new();
        for category in &categories {
            if !seen.insert(category.slug.clone()) {
                return Err(WheelError::DuplicateSlug(category.slug.to_string()));
            }
        }

        Ok(Self { categories })
    }

    pub fn from_config(configs: &[CategoryConfig]) -> Result<Self, WheelError> {
        let categories = configs
            .iter()
            .map(Category::from_config)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(categories)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Category> {
        self.categories.get(index)
    }

    pub fn by_slug(&self, slug: &str) -> Option<(usize, &Category)> {
        self.categories
            .iter()
            .enumerate()
            .find(|(_, c)| c.slug.as_str() == slug)
    }

    pub fn segment_angle(&self) -> f64 {
        FULL_TURN / self.len() as f64
    }

    pub fn neighbors(&self, index: usize) -> (usize, usize) {
        let n = self.len();
        ((index + n - 1) % n, (index + 1) % n)
    }
}
