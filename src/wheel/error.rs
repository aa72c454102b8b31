use thiserror::Error;

/// Configuration problems that keep the wheel from being built at all.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WheelError {
    #[error("The wheel needs at least one category")]
    EmptyRegistry,
    #[error("Segment angle {0} is not finite")]
    NonFiniteSegmentAngle(f64),
    #[error("Category '{slug}' has an invalid color '{value}'")]
    InvalidColor { slug: String, value: String },
    #[error("Category slug '{0}' is used more than once")]
    DuplicateSlug(String),
    #[error("Invalid {name} range {min}..{max}")]
    InvalidRange {
        name: &'static str,
        min: f64,
        max: f64,
    },
}
