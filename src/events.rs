use crate::wheel::CategorySlug;

/// Requests from the background services to the GTK side.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    Spin,
    Navigate(CategorySlug),
    ConfigReload,
}
