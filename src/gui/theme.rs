use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

pub struct ThemeColors {
    pub rim: Srgba<f64>,
    pub hub: Srgba<f64>,
    pub hub_text: Srgba<f64>,
    pub pointer: Srgba<f64>,
    pub panel: Srgba<f64>,
    pub panel_text: Srgba<f64>,
    pub tooltip: Srgba<f64>,
    pub tooltip_text: Srgba<f64>,
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        Self {
            rim: Self::lookup_color(
                context,
                "theme_fg_color",
                Srgba::new(1.0, 1.0, 1.0, 0.8),
                Some(0.8),
            ),
            hub: Self::lookup_color(
                context,
                "theme_base_color",
                Srgba::new(0.1, 0.1, 0.12, 1.0),
                Some(1.0),
            ),
            hub_text: Self::lookup_color(
                context,
                "theme_text_color",
                Srgba::new(1.0, 1.0, 1.0, 1.0),
                None,
            ),
            pointer: Self::lookup_color(
                context,
                "theme_selected_bg_color",
                Srgba::new(0.95, 0.3, 0.3, 1.0),
                Some(1.0),
            ),
            panel: Self::lookup_color(
                context,
                "theme_fg_color",
                Srgba::new(1.0, 1.0, 1.0, 0.06),
                Some(0.06),
            ),
            panel_text: Self::lookup_color(
                context,
                "theme_fg_color",
                Srgba::new(0.9, 0.9, 0.9, 1.0),
                None,
            ),
            tooltip: Self::lookup_color(
                context,
                "theme_fg_color",
                Srgba::new(0.1, 0.1, 0.1, 0.9),
                Some(0.9),
            ),
            tooltip_text: Self::lookup_color(
                context,
                "theme_bg_color",
                Srgba::new(1.0, 1.0, 1.0, 1.0),
                Some(1.0),
            ),
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                let (r, g, b, a) = (
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                );
                Srgba::new(r, g, b, alpha_override.unwrap_or(a))
            })
            .unwrap_or(fallback)
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.wheel-window {
    background-color: @theme_bg_color;
}
.wheel-drawing-area {
    background: none;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
