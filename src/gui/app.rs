use crate::config::{self, Config};
use crate::events::AppEvent;
use crate::gui::theme::{self, ThemeColors};
use crate::gui::view::{self, TOOLTIP_PADDING};
use crate::wheel::{CategorySlug, DeviceSignals, NavPath, Point, Viewport, WheelController, WheelEvent};
use gdk_pixbuf::Pixbuf;
use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

pub struct AppModel {
    pub wheel: Rc<RefCell<WheelController>>,
    pub icons: Rc<RefCell<Vec<Option<Pixbuf>>>>,
    pub config: Config,
    pub origin: Instant,
    pub reload_pending: bool,
    pub root: gtk::ApplicationWindow,
    pub drawing_area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    Spin,
    PointerMove(Point),
    PointerLeave,
    Press {
        point: Point,
        secondary: bool,
        touch: bool,
    },
    Release {
        touch: bool,
    },
    Resize(i32, i32),
    Navigate(CategorySlug),
    Settled,
    SignalsChanged,
    ConfigReload,
    Close,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Spin => AppMsg::Spin,
            AppEvent::Navigate(slug) => AppMsg::Navigate(slug),
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

const NAVIGATE_MODIFIERS: gdk::ModifierType = gdk::ModifierType::SHIFT_MASK
    .union(gdk::ModifierType::CONTROL_MASK)
    .union(gdk::ModifierType::META_MASK)
    .union(gdk::ModifierType::SUPER_MASK);

fn is_touch(gesture: &gtk::GestureClick) -> bool {
    gesture
        .current_event_device()
        .is_some_and(|d| d.source() == gdk::InputSource::Touchscreen)
}

/// What the desktop says about animations and input devices.
pub fn detect_signals() -> DeviceSignals {
    let reduced_motion = gtk::Settings::default().is_some_and(|s| !s.is_gtk_enable_animations());
    let touch = gdk::Display::default()
        .and_then(|d| d.default_seat())
        .is_some_and(|seat| seat.capabilities().contains(gdk::SeatCapabilities::TOUCH));
    DeviceSignals {
        reduced_motion,
        touch,
        save_data: false,
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (WheelController, Config, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Fortune Wheel"),
            set_default_size: (800, 432),
            add_css_class: "wheel-window",

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    match key {
                        gdk::Key::Escape => {
                            sender.input(AppMsg::Close);
                            glib::Propagation::Stop
                        }
                        gdk::Key::Return | gdk::Key::KP_Enter | gdk::Key::space => {
                            sender.input(AppMsg::Spin);
                            glib::Propagation::Stop
                        }
                        _ => glib::Propagation::Proceed,
                    }
                }
            },

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,
                set_focusable: true,
                add_css_class: "wheel-drawing-area",

                connect_resize[sender] => move |_, width, height| {
                    sender.input(AppMsg::Resize(width, height));
                },

                add_controller = gtk::EventControllerMotion {
                    connect_motion[sender] => move |_, x, y| {
                        sender.input(AppMsg::PointerMove(Point::new(x, y)));
                    },
                    connect_leave[sender] => move |_| {
                        sender.input(AppMsg::PointerLeave);
                    }
                },

                add_controller = gtk::GestureClick {
                    set_button: gdk::BUTTON_PRIMARY,
                    connect_pressed[sender] => move |gesture, _, x, y| {
                        let secondary = gesture.current_event_state().intersects(NAVIGATE_MODIFIERS);
                        sender.input(AppMsg::Press {
                            point: Point::new(x, y),
                            secondary,
                            touch: is_touch(gesture),
                        });
                    },
                    connect_released[sender] => move |gesture, _, _, _| {
                        sender.input(AppMsg::Release { touch: is_touch(gesture) });
                    }
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (wheel, config, rx) = init;

        theme::load_css();

        let origin = Instant::now();
        let icons = Rc::new(RefCell::new(view::load_icons(wheel.registry())));
        let wheel = Rc::new(RefCell::new(wheel));

        let model = AppModel {
            wheel,
            icons,
            config,
            origin,
            reload_pending: false,
            root: root.clone(),
            drawing_area: gtk::DrawingArea::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();
        model.wheel.borrow_mut().set_signals(detect_signals());
        model.fit_tooltip();

        if let Some(settings) = gtk::Settings::default() {
            let sender = sender.clone();
            settings.connect_gtk_enable_animations_notify(move |_| {
                sender.input(AppMsg::SignalsChanged);
            });
        }

        let wheel_draw = model.wheel.clone();
        let icons_draw = model.icons.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, _, _| {
                let style_context = drawing_area.style_context();
                let colors = ThemeColors::from_context(&style_context);
                let wheel = wheel_draw.borrow();
                if let Err(e) = view::draw(cr, &wheel, &icons_draw.borrow(), &colors, origin.elapsed())
                {
                    log::error!("Drawing error: {}", e);
                }
            });

        // frame clock drives every animation; idle frames cost one check
        let wheel_tick = model.wheel.clone();
        let tick_sender = sender.clone();
        widgets.drawing_area.add_tick_callback(move |drawing_area, _| {
            let events = {
                let mut wheel = wheel_tick.borrow_mut();
                if !wheel.is_animating() {
                    return glib::ControlFlow::Continue;
                }
                wheel.tick(origin.elapsed())
            };

            for event in events {
                match event {
                    WheelEvent::ResultRevealed(_) => {
                        if let Some(category) = wheel_tick.borrow().result() {
                            let text = format!("You landed on {}", category.name);
                            drawing_area.update_property(&[gtk::accessible::Property::Label(&text)]);
                        }
                        tick_sender.input(AppMsg::Settled);
                    }
                    other => log::trace!("{:?}", other),
                }
            }
            drawing_area.queue_draw();
            glib::ControlFlow::Continue
        });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        widgets.drawing_area.grab_focus();

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        let now = self.origin.elapsed();
        match msg {
            AppMsg::Spin => {
                if self.wheel.borrow_mut().spin(now) {
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::PointerMove(point) => {
                let target = self.wheel.borrow_mut().pointer_motion(point);
                self.drawing_area
                    .set_cursor_from_name(target.map(|_| "pointer"));
                self.drawing_area.queue_draw();
            }
            AppMsg::PointerLeave => {
                self.wheel.borrow_mut().pointer_leave();
                self.drawing_area.queue_draw();
            }
            AppMsg::Press {
                point,
                secondary,
                touch,
            } => {
                let event = {
                    let mut wheel = self.wheel.borrow_mut();
                    if touch {
                        wheel.touch_begin(point);
                    }
                    wheel.press(point, secondary, now)
                };
                if let Some(WheelEvent::Navigate { path, .. }) = event {
                    self.open(&path);
                }
                self.drawing_area.queue_draw();
            }
            AppMsg::Release { touch } => {
                if touch {
                    self.wheel.borrow_mut().touch_end();
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::Resize(width, height) => {
                self.wheel
                    .borrow_mut()
                    .resize(Viewport::new(width as f64, height as f64), now);
                self.drawing_area.queue_draw();
            }
            AppMsg::Navigate(slug) => {
                let event = self.wheel.borrow().navigate_to(slug.as_str());
                if let Some(WheelEvent::Navigate { path, .. }) = event {
                    self.open(&path);
                }
            }
            AppMsg::Settled => {
                if self.reload_pending {
                    self.reload();
                }
            }
            AppMsg::SignalsChanged => {
                self.wheel.borrow_mut().set_signals(detect_signals());
            }
            AppMsg::ConfigReload => self.reload(),
            AppMsg::Close => {
                self.wheel.borrow_mut().shutdown();
                self.root.close();
            }
        }
    }
}

impl AppModel {
    fn reload(&mut self) {
        let new_config = match config::load_config() {
            Ok(c) => c,
            Err(e) => {
                log::error!("Failed to reload config: {}", e);
                return;
            }
        };

        let result = self.wheel.borrow_mut().reconfigure(&new_config);
        match result {
            Ok(true) => {
                let icons = view::load_icons(self.wheel.borrow().registry());
                *self.icons.borrow_mut() = icons;
                self.config = new_config;
                self.reload_pending = false;
                self.fit_tooltip();
                self.drawing_area.queue_draw();
                log::info!("Configuration reloaded");
            }
            Ok(false) => {
                log::debug!("Config reload deferred until the spin settles");
                self.reload_pending = true;
            }
            Err(e) => {
                self.reload_pending = false;
                log::error!("Rejected new config, keeping the current wheel: {}", e);
            }
        }
    }

    /// Sizes the tooltip for the longest category name.
    fn fit_tooltip(&self) {
        let widest = self
            .wheel
            .borrow()
            .registry()
            .categories()
            .iter()
            .map(|c| self.drawing_area.create_pango_layout(Some(&c.name)).pixel_size().0)
            .max()
            .unwrap_or(0);
        self.wheel
            .borrow_mut()
            .set_tooltip_width(widest as f64 + 2.0 * TOOLTIP_PADDING);
    }

    fn open(&self, path: &NavPath) {
        match self.config.destination(path) {
            Some(url) => {
                if let Err(e) = std::process::Command::new("xdg-open").arg(&url).spawn() {
                    log::error!("Failed to open {}: {}", url, e);
                }
            }
            None => log::warn!("No base_url configured; not opening {}", path),
        }
    }
}
