use crate::gui::theme::ThemeColors;
use crate::wheel::category::Category;
use crate::wheel::hit_regions::PreviewPanel;
use crate::wheel::layout::Rect;
use crate::wheel::particles::{Burst, Flash};
use crate::wheel::{CategoryRegistry, WheelController};
use cairo::Context;
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;
use palette::{Srgb, Srgba};
use std::f64::consts::PI;
use std::time::Duration;

/// Icons are decoded once at this size and scaled when painted.
pub const ICON_PIXELS: i32 = 128;
pub const TOOLTIP_PADDING: f64 = 12.0;
const TOOLTIP_HEIGHT: f64 = 28.0;
const POINTER_SIZE: f64 = 14.0;
const PANEL_RADIUS: f64 = 12.0;
const ROW_HEIGHT: f64 = 36.0;
const FLASH_STRENGTH: f64 = 0.35;

fn set_source(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

fn solid(color: Srgb<u8>, alpha: f64) -> Srgba<f64> {
    let c = color.into_format::<f64>();
    Srgba::new(c.red, c.green, c.blue, alpha)
}

fn rounded_rect(cr: &Context, rect: Rect, radius: f64) {
    let (x, y, w, h) = (rect.origin.x, rect.origin.y, rect.width, rect.height);
    let r = radius.min(w / 2.0).min(h / 2.0);
    cr.new_sub_path();
    cr.arc(x + w - r, y + r, r, -PI / 2.0, 0.0);
    cr.arc(x + w - r, y + h - r, r, 0.0, PI / 2.0);
    cr.arc(x + r, y + h - r, r, PI / 2.0, PI);
    cr.arc(x + r, y + r, r, PI, 1.5 * PI);
    cr.close_path();
}

pub fn load_icons(registry: &CategoryRegistry) -> Vec<Option<Pixbuf>> {
    registry
        .categories()
        .iter()
        .map(|category| {
            let path = category.icon.as_ref()?;
            match Pixbuf::from_file_at_scale(path, ICON_PIXELS, ICON_PIXELS, true) {
                Ok(pixbuf) => Some(pixbuf),
                Err(e) => {
                    log::warn!(
                        "Failed to load icon {} for '{}': {}",
                        path.display(),
                        category.name,
                        e
                    );
                    None
                }
            }
        })
        .collect()
}

struct WheelRenderer<'a> {
    wheel: &'a WheelController,
    icons: &'a [Option<Pixbuf>],
    colors: &'a ThemeColors,
}

impl<'a> WheelRenderer<'a> {
    fn draw_segments(&self, cr: &Context) -> Result<(), cairo::Error> {
        let layout = self.wheel.layout();
        let (center, r, ri) = (layout.center(), layout.radius(), layout.inner_radius());
        if r <= 0.0 {
            return Ok(());
        }

        cr.save()?;
        cr.translate(center.x, center.y);
        cr.rotate(self.wheel.displayed_rotation().to_radians());

        let geometry = self.wheel.geometry();
        for (i, category) in self.wheel.registry().categories().iter().enumerate() {
            let bounds = geometry.segment_bounds(i);
            let (a0, a1) = (bounds.start_angle.to_radians(), bounds.end_angle.to_radians());

            cr.new_path();
            cr.arc(0.0, 0.0, r, a0, a1);
            cr.arc_negative(0.0, 0.0, ri, a1, a0);
            cr.close_path();
            set_source(cr, solid(category.color, 1.0));
            cr.fill_preserve()?;
            set_source(cr, self.colors.rim);
            cr.set_line_width(1.5);
            cr.stroke()?;

            match self.icons.get(i).and_then(Option::as_ref) {
                Some(pixbuf) => self.draw_icon(cr, i, pixbuf)?,
                None if self.wheel.show_labels() => self.draw_label(cr, i, category)?,
                None => {}
            }
        }
        cr.restore()
    }

    fn draw_icon(&self, cr: &Context, index: usize, pixbuf: &Pixbuf) -> Result<(), cairo::Error> {
        let layout = self.wheel.layout();
        let anchor = layout.icon_anchor(self.wheel.geometry(), index);
        let scale = layout.icon_size() / pixbuf.width().max(1) as f64;
        let (w, h) = (pixbuf.width() as f64 * scale, pixbuf.height() as f64 * scale);

        cr.save()?;
        cr.translate(anchor.x - w / 2.0, anchor.y - h / 2.0);
        cr.scale(scale, scale);
        cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
        cr.paint()?;
        cr.restore()
    }

    /// Label runs outward along the segment's middle.
    fn draw_label(&self, cr: &Context, index: usize, category: &Category) -> Result<(), cairo::Error> {
        let layout = self.wheel.layout();
        let (r, ri) = (layout.radius(), layout.inner_radius());
        let band = (r - ri) * 0.9;
        let mid = self.wheel.geometry().segment_bounds(index).mid_angle();

        cr.save()?;
        cr.rotate(mid.to_radians());
        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        cr.set_font_size(layout.label_font_size());
        if let Ok(ext) = cr.text_extents(&category.name) {
            // shrink names that do not fit the ring
            if ext.width() > band {
                cr.set_font_size(layout.label_font_size() * band / ext.width());
            }
        }
        if let Ok(ext) = cr.text_extents(&category.name) {
            set_source(cr, solid(category.text_color, 1.0));
            cr.move_to(ri + (r - ri - ext.width()) / 2.0, ext.height() / 2.0);
            cr.show_text(&category.name)?;
        }
        cr.restore()
    }

    fn draw_hub(&self, cr: &Context) -> Result<(), cairo::Error> {
        let layout = self.wheel.layout();
        let center = layout.center();
        let radius = layout.inner_radius();

        cr.new_path();
        cr.arc(center.x, center.y, radius, 0.0, 2.0 * PI);
        set_source(cr, self.colors.hub);
        cr.fill_preserve()?;
        set_source(cr, self.colors.rim);
        cr.set_line_width(2.0);
        cr.stroke()?;

        let text = if self.wheel.state().is_spinning() { "…" } else { "SPIN" };
        set_source(cr, self.colors.hub_text);
        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        cr.set_font_size(14.0 * layout.scale().max(0.5));
        if let Ok(ext) = cr.text_extents(text) {
            cr.move_to(center.x - ext.width() / 2.0, center.y + ext.height() / 2.0);
            cr.show_text(text)?;
        }
        Ok(())
    }

    fn draw_pointer(&self, cr: &Context) -> Result<(), cairo::Error> {
        let layout = self.wheel.layout();
        let (center, r) = (layout.center(), layout.radius());
        let size = POINTER_SIZE * layout.scale().max(0.5);

        cr.save()?;
        cr.translate(center.x, center.y);
        cr.rotate((self.wheel.pointer_offset() - 90.0).to_radians());
        cr.new_path();
        cr.move_to(r - size * 0.6, 0.0);
        cr.line_to(r + size, -size * 0.6);
        cr.line_to(r + size, size * 0.6);
        cr.close_path();
        set_source(cr, self.colors.pointer);
        cr.fill()?;
        cr.restore()
    }

    fn draw_panel(&self, cr: &Context, preview: PreviewPanel) -> Result<(), cairo::Error> {
        let panel = self.wheel.layout().panel_rect();
        if panel.width <= 0.0 || panel.height <= 0.0 {
            return Ok(());
        }

        rounded_rect(cr, panel, PANEL_RADIUS);
        set_source(cr, self.colors.panel);
        cr.fill()?;

        let registry = self.wheel.registry();
        let top = panel.origin.y + panel.height * 0.35 - ROW_HEIGHT * 1.5;
        let rows = [(preview.prev, false), (preview.current, true), (preview.next, false)];
        for (row, (index, current)) in rows.into_iter().enumerate() {
            if let Some(category) = registry.get(index) {
                let y = top + row as f64 * ROW_HEIGHT;
                self.draw_row(cr, panel, y, category, current)?;
            }
        }
        Ok(())
    }

    fn draw_row(
        &self,
        cr: &Context,
        panel: Rect,
        y: f64,
        category: &Category,
        current: bool,
    ) -> Result<(), cairo::Error> {
        let alpha = if current { 1.0 } else { 0.5 };
        let x = panel.origin.x + 16.0;

        cr.new_path();
        cr.arc(x + 6.0, y + ROW_HEIGHT / 2.0, 6.0, 0.0, 2.0 * PI);
        set_source(cr, solid(category.color, alpha));
        cr.fill()?;

        let weight = if current {
            cairo::FontWeight::Bold
        } else {
            cairo::FontWeight::Normal
        };
        cr.select_font_face("Sans", cairo::FontSlant::Normal, weight);
        cr.set_font_size(if current { 18.0 } else { 14.0 });
        let (r, g, b, _) = self.colors.panel_text.into_components();
        cr.set_source_rgba(r, g, b, alpha);
        if let Ok(ext) = cr.text_extents(&category.name) {
            cr.move_to(x + 20.0, y + ROW_HEIGHT / 2.0 + ext.height() / 2.0);
            cr.show_text(&category.name)?;
        }
        Ok(())
    }

    fn draw_result(&self, cr: &Context) -> Result<(), cairo::Error> {
        let Some(category) = self.wheel.result() else {
            return Ok(());
        };
        let layout = self.wheel.layout();
        let anchor = layout.result_anchor();

        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Normal);
        cr.set_font_size(14.0);
        set_source(cr, self.colors.panel_text);
        let heading = "You landed on";
        if let Ok(ext) = cr.text_extents(heading) {
            cr.move_to(anchor.x - ext.width() / 2.0, anchor.y - 20.0);
            cr.show_text(heading)?;
        }

        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        cr.set_font_size(22.0);
        set_source(cr, solid(category.color, 1.0));
        if let Ok(ext) = cr.text_extents(&category.name) {
            cr.move_to(anchor.x - ext.width() / 2.0, anchor.y + ext.height() / 2.0);
            cr.show_text(&category.name)?;
        }

        cr.select_font_face("Sans", cairo::FontSlant::Italic, cairo::FontWeight::Normal);
        cr.set_font_size(11.0);
        set_source(cr, self.colors.panel_text);
        let hint = "Shift+click a segment to open it";
        if let Ok(ext) = cr.text_extents(hint) {
            cr.move_to(anchor.x - ext.width() / 2.0, anchor.y + 28.0);
            cr.show_text(hint)?;
        }
        Ok(())
    }

    fn draw_tooltip(&self, cr: &Context) -> Result<(), cairo::Error> {
        let tooltip = self.wheel.tooltip();
        let Some(category) = tooltip.category.and_then(|i| self.wheel.registry().get(i)) else {
            return Ok(());
        };

        let rect = Rect::new(
            tooltip.position.x - tooltip.width / 2.0,
            tooltip.position.y - TOOLTIP_HEIGHT / 2.0,
            tooltip.width,
            TOOLTIP_HEIGHT,
        );
        rounded_rect(cr, rect, 6.0);
        set_source(cr, self.colors.tooltip);
        cr.fill()?;

        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Normal);
        cr.set_font_size(13.0);
        set_source(cr, self.colors.tooltip_text);
        if let Ok(ext) = cr.text_extents(&category.name) {
            cr.move_to(
                tooltip.position.x - ext.width() / 2.0,
                tooltip.position.y + ext.height() / 2.0,
            );
            cr.show_text(&category.name)?;
        }
        Ok(())
    }
}

fn draw_burst(cr: &Context, burst: &Burst) -> Result<(), cairo::Error> {
    let Some(surface) = burst.surface() else {
        return Ok(());
    };

    cr.save()?;
    cr.rectangle(0.0, 0.0, surface.width, surface.height);
    cr.clip();
    for p in burst.particles() {
        set_source(cr, solid(p.color, p.alpha.clamp(0.0, 1.0)));
        cr.rectangle(
            p.position.x - p.size / 2.0,
            p.position.y - p.size / 2.0,
            p.size,
            p.size,
        );
        cr.fill()?;
    }
    cr.restore()
}

fn draw_flash(cr: &Context, flash: &Flash, now: Duration) -> Result<(), cairo::Error> {
    set_source(cr, solid(flash.color, flash.alpha(now) * FLASH_STRENGTH));
    cr.paint()
}

pub fn draw(
    cr: &Context,
    wheel: &WheelController,
    icons: &[Option<Pixbuf>],
    colors: &ThemeColors,
    now: Duration,
) -> Result<(), cairo::Error> {
    let renderer = WheelRenderer {
        wheel,
        icons,
        colors,
    };

    renderer.draw_segments(cr)?;
    renderer.draw_hub(cr)?;
    renderer.draw_pointer(cr)?;
    if let Some(preview) = wheel.preview() {
        renderer.draw_panel(cr, preview)?;
    }
    renderer.draw_result(cr)?;
    renderer.draw_tooltip(cr)?;

    for burst in wheel.celebration().bursts() {
        draw_burst(cr, burst)?;
    }
    for flash in wheel.celebration().flashes() {
        draw_flash(cr, flash, now)?;
    }
    Ok(())
}
