use crate::config::{CelebrationConfig, Config, LayoutConfig, SpinConfig};
use crate::wheel::animation::SpinAnimation;
use crate::wheel::category::{Category, CategoryRegistry, NavPath};
use crate::wheel::error::WheelError;
use crate::wheel::geometry::{Point, WheelGeometry};
use crate::wheel::hit_regions::{
    Activation, HitRegion, HitRegionManager, HitTarget, PreviewPanel, Tooltip,
};
use crate::wheel::layout::{Viewport, WheelLayout};
use crate::wheel::particles::{BurstOptions, CelebrationEngine, Launched};
use crate::wheel::rotation::{RotationMachine, SpinPlan, WheelState};
use crate::wheel::{DeviceSignals, SPIN_EASING};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Size assumed until the host reports a real one.
pub const DEFAULT_VIEWPORT: Viewport = Viewport {
    width: 800.0,
    height: 432.0,
};

#[derive(Debug, Clone, PartialEq)]
pub enum WheelEvent {
    SpinStarted(SpinPlan),
    DisplayIndexChanged(usize),
    ResultRevealed(usize),
    RegionsRebuilt(usize),
    BurstLaunched(Launched),
    Navigate { index: usize, path: NavPath },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Task {
    RevealResult,
    SecondaryBurst(usize),
    ResizeSettled,
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    at: Duration,
    task: Task,
}

/// Time-ordered one-shot tasks, drained by `tick`.
#[derive(Debug, Default)]
struct Scheduler {
    tasks: Vec<Scheduled>,
}

impl Scheduler {
    fn schedule(&mut self, at: Duration, task: Task) {
        let pos = self.tasks.partition_point(|s| s.at <= at);
        self.tasks.insert(pos, Scheduled { at, task });
    }

    fn cancel(&mut self, pred: impl Fn(&Task) -> bool) {
        self.tasks.retain(|s| !pred(&s.task));
    }

    fn drain_due(&mut self, now: Duration) -> Vec<Task> {
        let due = self.tasks.partition_point(|s| s.at <= now);
        self.tasks.drain(..due).map(|s| s.task).collect()
    }

    fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn clear(&mut self) {
        self.tasks.clear();
    }
}

/// Owns the wheel state and every engine component; hosts feed it input and
/// frame timestamps and paint what it reports.
pub struct WheelController<R: Rng = StdRng> {
    registry: CategoryRegistry,
    machine: RotationMachine,
    state: WheelState,
    regions: HitRegionManager,
    layout: WheelLayout,
    celebration: CelebrationEngine,
    scheduler: Scheduler,
    animation: Option<SpinAnimation>,
    displayed_rotation: f64,
    preview: Option<PreviewPanel>,
    result: Option<usize>,
    spin_cfg: SpinConfig,
    celebration_cfg: CelebrationConfig,
    layout_cfg: LayoutConfig,
    config_signals: DeviceSignals,
    detected_signals: DeviceSignals,
    rng: R,
}

impl WheelController<StdRng> {
    pub fn new(config: &Config) -> Result<Self, WheelError> {
        Self::with_rng(config, StdRng::from_os_rng())
    }
}

impl<R: Rng> WheelController<R> {
    pub fn with_rng(config: &Config, rng: R) -> Result<Self, WheelError> {
        let registry = CategoryRegistry::from_config(&config.categories)?;
        let geometry = WheelGeometry::new(registry.len())?;
        let machine = RotationMachine::new(geometry, config.spin.tuning())?;

        let mut controller = Self {
            registry,
            machine,
            state: WheelState::default(),
            regions: HitRegionManager::new(),
            layout: WheelLayout::fit(DEFAULT_VIEWPORT),
            celebration: CelebrationEngine::new(),
            scheduler: Scheduler::default(),
            animation: None,
            displayed_rotation: 0.0,
            preview: None,
            result: None,
            spin_cfg: config.spin.clone(),
            celebration_cfg: config.celebration.clone(),
            layout_cfg: config.layout.clone(),
            config_signals: config.signals,
            detected_signals: DeviceSignals::default(),
            rng,
        };
        controller.rebuild_regions();
        controller.refresh_preview();
        log::debug!(
            "Wheel ready with {} categories",
            controller.registry.len()
        );
        Ok(controller)
    }

    /// Host-detected signals; config flags set to true stay on.
    pub fn set_signals(&mut self, detected: DeviceSignals) {
        self.detected_signals = detected;
    }

    pub fn signals(&self) -> DeviceSignals {
        self.config_signals.merge(self.detected_signals)
    }

    pub fn spin(&mut self, now: Duration) -> bool {
        self.start_spin(now).is_some()
    }

    fn start_spin(&mut self, now: Duration) -> Option<SpinPlan> {
        let reduced_motion = self.signals().reduced_motion;
        let plan = self
            .machine
            .request_spin(&mut self.state, &mut self.rng, reduced_motion)?;

        self.regions.clear();
        self.result = None;
        self.scheduler
            .cancel(|t| matches!(t, Task::RevealResult | Task::SecondaryBurst(_)));

        let animation = SpinAnimation::new(
            plan,
            self.state.display_index(),
            self.registry.len(),
            self.spin_cfg.cycles,
            SPIN_EASING,
            now,
        );
        self.scheduler.schedule(
            animation.settle_at(self.spin_cfg.settle_delay()),
            Task::RevealResult,
        );
        self.animation = Some(animation);

        log::info!(
            "Spinning to '{}' over {:?} ({:.2} turns)",
            self.category_name(plan.winning_index),
            plan.duration,
            plan.extra_rotations
        );
        Some(plan)
    }

    /// Advances everything time-driven to `now`.
    pub fn tick(&mut self, now: Duration) -> Vec<WheelEvent> {
        let mut events = Vec::new();

        if let Some(animation) = &self.animation {
            let frame = animation.frame(now);
            self.displayed_rotation = frame.rotation;
            if frame.display_index != self.state.display_index() {
                self.state.set_display_index(frame.display_index);
                self.refresh_preview();
                events.push(WheelEvent::DisplayIndexChanged(frame.display_index));
            }
        }

        for task in self.scheduler.drain_due(now) {
            match task {
                Task::RevealResult => self.reveal(now, &mut events),
                Task::SecondaryBurst(index) => {
                    let origin = self.layout.viewport().normalize(self.layout.result_anchor());
                    let spread = self.celebration_cfg.secondary_spread;
                    let launched = self.launch_burst(index, origin, spread, now);
                    events.push(WheelEvent::BurstLaunched(launched));
                }
                Task::ResizeSettled => {
                    if self.state.is_spinning() {
                        log::debug!("Resize settled mid-spin; regions wait for the result");
                    } else {
                        self.rebuild_regions();
                        events.push(WheelEvent::RegionsRebuilt(self.regions.len()));
                    }
                }
            }
        }

        self.celebration.advance(now);
        events
    }

    fn reveal(&mut self, now: Duration, events: &mut Vec<WheelEvent>) {
        let Some(animation) = self.animation.take() else {
            return;
        };
        let plan = animation.plan;

        self.machine.complete(&mut self.state, &plan);
        self.displayed_rotation = self.state.cumulative_rotation();
        self.result = Some(plan.winning_index);
        self.refresh_preview();
        log::info!("Landed on '{}'", self.category_name(plan.winning_index));
        events.push(WheelEvent::ResultRevealed(plan.winning_index));

        let origin = self.layout.viewport().normalize(self.layout.center());
        let launched = self.launch_burst(
            plan.winning_index,
            origin,
            self.celebration_cfg.spread,
            now,
        );
        events.push(WheelEvent::BurstLaunched(launched));
        if self.celebration_cfg.dual_burst {
            self.scheduler.schedule(
                now + self.celebration_cfg.secondary_delay(),
                Task::SecondaryBurst(plan.winning_index),
            );
        }

        self.rebuild_regions();
        events.push(WheelEvent::RegionsRebuilt(self.regions.len()));
    }

    fn launch_burst(&mut self, index: usize, origin: Point, spread: f64, now: Duration) -> Launched {
        let signals = self.signals();
        let palette = self
            .registry
            .get(index)
            .map(Category::palette)
            .unwrap_or_default();
        let options = BurstOptions {
            origin,
            palette,
            spread,
            duration: self.celebration_cfg.duration(),
            count: self.celebration_cfg.count(signals.touch),
            gravity: self.celebration_cfg.gravity,
        };
        self.celebration.launch(
            &mut self.rng,
            &options,
            self.layout.viewport(),
            now,
            signals.low_power(),
        )
    }

    pub fn pointer_motion(&mut self, point: Point) -> Option<HitTarget> {
        let width = self.layout.viewport().width;
        self.regions.pointer_motion(point, width)
    }

    pub fn pointer_leave(&mut self) {
        self.regions.pointer_leave();
    }

    /// `secondary` is the navigate modifier (Shift, Ctrl or Meta).
    pub fn press(&mut self, point: Point, secondary: bool, now: Duration) -> Option<WheelEvent> {
        match self.regions.activate(point, secondary)? {
            Activation::Spin => self.start_spin(now).map(WheelEvent::SpinStarted),
            Activation::Navigate(index) => self.navigate_index(index),
        }
    }

    pub fn touch_begin(&mut self, point: Point) -> Option<HitTarget> {
        self.pointer_motion(point)
    }

    pub fn touch_end(&mut self) {
        self.regions.pointer_leave();
    }

    pub fn navigate_to(&self, slug: &str) -> Option<WheelEvent> {
        match self.registry.by_slug(slug) {
            Some((index, _)) => self.navigate_index(index),
            None => {
                log::warn!("No category with slug '{}'", slug);
                None
            }
        }
    }

    fn navigate_index(&self, index: usize) -> Option<WheelEvent> {
        let category = self.registry.get(index)?;
        log::info!("Navigating to '{}' ({})", category.name, category.path);
        Some(WheelEvent::Navigate {
            index,
            path: category.path.clone(),
        })
    }

    /// Layout follows at once; hit regions follow once resizing goes quiet.
    pub fn resize(&mut self, viewport: Viewport, now: Duration) {
        if viewport == self.layout.viewport() {
            return;
        }
        self.layout = WheelLayout::fit(viewport);
        self.scheduler.cancel(|t| matches!(t, Task::ResizeSettled));
        self.scheduler
            .schedule(now + self.layout_cfg.resize_debounce(), Task::ResizeSettled);
    }

    /// Applies a new config without losing the wheel position. Returns
    /// false when a spin is in flight; the caller retries later.
    pub fn reconfigure(&mut self, config: &Config) -> Result<bool, WheelError> {
        if self.state.is_spinning() {
            log::warn!("Ignoring reconfigure while spinning");
            return Ok(false);
        }

        let registry = CategoryRegistry::from_config(&config.categories)?;
        let geometry = WheelGeometry::new(registry.len())?;
        let machine = RotationMachine::new(geometry, config.spin.tuning())?;

        self.registry = registry;
        self.machine = machine;
        self.spin_cfg = config.spin.clone();
        self.celebration_cfg = config.celebration.clone();
        self.layout_cfg = config.layout.clone();
        self.config_signals = config.signals;

        let resting = self.machine.resting_index(&self.state);
        self.state.set_display_index(resting);
        if self.result.is_some_and(|i| i >= self.registry.len()) {
            self.result = None;
        }
        self.rebuild_regions();
        self.refresh_preview();
        log::info!("Wheel reconfigured with {} categories", self.registry.len());
        Ok(true)
    }

    pub fn shutdown(&mut self) {
        self.scheduler.clear();
        self.animation = None;
        self.regions.clear();
        self.celebration.clear();
        log::debug!("Wheel torn down");
    }

    fn rebuild_regions(&mut self) {
        self.regions.rebuild(
            self.machine.geometry(),
            &self.layout,
            self.state.cumulative_rotation(),
        );
    }

    fn refresh_preview(&mut self) {
        self.preview = self
            .layout_cfg
            .preview_panel
            .then(|| PreviewPanel::centered_on(&self.registry, self.state.display_index()));
    }

    fn category_name(&self, index: usize) -> &str {
        self.registry.get(index).map_or("?", |c| c.name.as_str())
    }

    pub fn state(&self) -> &WheelState {
        &self.state
    }

    /// Rotation to paint this frame; equals the tracked rotation when idle.
    pub fn displayed_rotation(&self) -> f64 {
        self.displayed_rotation
    }

    pub fn regions(&self) -> &[HitRegion] {
        self.regions.regions()
    }

    pub fn tooltip(&self) -> &Tooltip {
        self.regions.tooltip()
    }

    pub fn set_tooltip_width(&mut self, width: f64) {
        self.regions.set_tooltip_width(width);
    }

    pub fn preview(&self) -> Option<PreviewPanel> {
        self.preview
    }

    pub fn result(&self) -> Option<&Category> {
        self.result.and_then(|i| self.registry.get(i))
    }

    pub fn celebration(&self) -> &CelebrationEngine {
        &self.celebration
    }

    pub fn layout(&self) -> &WheelLayout {
        &self.layout
    }

    pub fn geometry(&self) -> &WheelGeometry {
        self.machine.geometry()
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    pub fn show_labels(&self) -> bool {
        self.layout_cfg.labels
    }

    pub fn pointer_offset(&self) -> f64 {
        self.machine.tuning().pointer_offset
    }

    /// True while the host should keep requesting frames.
    pub fn is_animating(&self) -> bool {
        self.animation.is_some() || !self.scheduler.is_empty() || !self.celebration.is_idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CategoryConfig;
    use crate::wheel::CategorySlug;
    use crate::wheel::rotation::Phase;

    const FRAME: Duration = Duration::from_millis(16);

    fn controller(config: &Config) -> WheelController<StdRng> {
        WheelController::with_rng(config, StdRng::seed_from_u64(11)).unwrap()
    }

    /// Ticks frame by frame from `from` until `until`, collecting events.
    fn run(
        wheel: &mut WheelController<StdRng>,
        from: Duration,
        until: Duration,
    ) -> Vec<WheelEvent> {
        let mut events = Vec::new();
        let mut now = from;
        while now < until {
            now = (now + FRAME).min(until);
            events.extend(wheel.tick(now));
        }
        events
    }

    fn settle_time(wheel: &WheelController<StdRng>) -> Duration {
        let animation = wheel.animation.as_ref().unwrap();
        animation.settle_at(wheel.spin_cfg.settle_delay())
    }

    fn at_pointer(wheel: &WheelController<StdRng>) -> Point {
        let layout = wheel.layout();
        Point::polar(
            layout.center(),
            layout.radius() * 0.6,
            -90.0 + wheel.pointer_offset(),
        )
    }

    #[test]
    fn test_region_counts_idle_spinning_settled() {
        let mut wheel = controller(&Config::default());
        assert_eq!(wheel.regions().len(), 9);

        assert!(wheel.spin(Duration::ZERO));
        assert_eq!(wheel.regions().len(), 0);
        assert_eq!(wheel.state().phase(), Phase::Spinning);

        let settle = settle_time(&wheel);
        let events = run(&mut wheel, Duration::ZERO, settle);
        assert!(events.contains(&WheelEvent::RegionsRebuilt(9)));
        assert_eq!(wheel.regions().len(), 9);
        assert_eq!(wheel.state().phase(), Phase::Idle);
    }

    #[test]
    fn test_second_spin_is_ignored_until_settled() {
        let mut wheel = controller(&Config::default());
        assert!(wheel.spin(Duration::ZERO));
        let target = wheel.animation.unwrap().plan.final_rotation;

        assert!(!wheel.spin(Duration::from_millis(500)));
        assert_eq!(wheel.animation.unwrap().plan.final_rotation, target);

        let settle = settle_time(&wheel);
        let step = Duration::from_millis(250);
        let mut events = Vec::new();
        let mut now = Duration::ZERO;
        while now + step < settle {
            events.extend(run(&mut wheel, now, now + step));
            now += step;
            assert!(!wheel.spin(now));
        }
        let done = settle + Duration::from_millis(400);
        events.extend(run(&mut wheel, now, done));
        assert_eq!(wheel.state().cumulative_rotation(), target);

        let revealed = events
            .iter()
            .filter(|e| matches!(e, WheelEvent::ResultRevealed(_)))
            .count();
        let bursts = events
            .iter()
            .filter(|e| matches!(e, WheelEvent::BurstLaunched(_)))
            .count();
        assert_eq!(revealed, 1);
        // primary plus the delayed secondary
        assert_eq!(bursts, 2);

        assert!(wheel.spin(done + FRAME));
    }

    #[test]
    fn test_result_lands_under_pointer_and_matches_preview() {
        let mut config = Config::default();
        config.spin.pointer = crate::config::PointerPosition::Bottom;
        let mut wheel = controller(&config);

        let mut now = Duration::ZERO;
        for _ in 0..5 {
            assert!(wheel.spin(now));
            let settle = settle_time(&wheel);
            let events = run(&mut wheel, now, settle);

            let winner = events
                .iter()
                .find_map(|e| match e {
                    WheelEvent::ResultRevealed(i) => Some(*i),
                    _ => None,
                })
                .unwrap();
            assert_eq!(wheel.machine.resting_index(wheel.state()), winner);
            assert_eq!(wheel.preview().unwrap().current, winner);
            assert_eq!(wheel.result().unwrap().name, config.categories[winner].name);
            assert_eq!(wheel.displayed_rotation(), wheel.state().cumulative_rotation());
            now = settle + FRAME;
        }
    }

    #[test]
    fn test_preview_cycles_through_every_category() {
        let mut wheel = controller(&Config::default());
        let start = wheel.state().display_index();
        assert!(wheel.spin(Duration::ZERO));
        let winner = wheel.animation.unwrap().plan.winning_index;
        let settle = settle_time(&wheel);

        let mut visits = [0usize; 8];
        visits[start] += 1;
        for event in run(&mut wheel, Duration::ZERO, settle) {
            if let WheelEvent::DisplayIndexChanged(i) = event {
                visits[i] += 1;
            }
        }
        assert!(visits.iter().all(|&v| v >= 3), "{visits:?}");
        assert_eq!(wheel.state().display_index(), winner);
    }

    #[test]
    fn test_celebration_lifecycle() {
        let mut config = Config::default();
        config.celebration.dual_burst = false;
        let mut wheel = controller(&config);
        wheel.set_signals(DeviceSignals {
            touch: true,
            ..DeviceSignals::default()
        });

        assert!(wheel.spin(Duration::ZERO));
        let settle = settle_time(&wheel);
        run(&mut wheel, Duration::ZERO, settle);

        let bursts = wheel.celebration().bursts();
        assert_eq!(bursts.len(), 1);
        assert_eq!(bursts[0].particles().len(), 80);
        assert!(wheel.is_animating());

        let done = settle + Duration::from_millis(1950);
        run(&mut wheel, settle, done);
        assert!(wheel.celebration().is_idle());
        assert!(!wheel.is_animating());
    }

    #[test]
    fn test_dual_burst_fires_second_burst_later() {
        let mut wheel = controller(&Config::default());
        assert!(wheel.spin(Duration::ZERO));
        let settle = settle_time(&wheel);
        let events = run(&mut wheel, Duration::ZERO, settle);
        let launched = |events: &[WheelEvent]| {
            events
                .iter()
                .filter(|e| matches!(e, WheelEvent::BurstLaunched(Launched::Burst(_))))
                .count()
        };
        assert_eq!(launched(&events), 1);
        assert_eq!(wheel.celebration().bursts()[0].particles().len(), 100);

        let events = run(&mut wheel, settle, settle + Duration::from_millis(320));
        assert_eq!(launched(&events), 1);
        assert_eq!(wheel.celebration().bursts().len(), 2);
    }

    #[test]
    fn test_low_power_swaps_bursts_for_flash() {
        let mut config = Config::default();
        config.signals.save_data = true;
        let mut wheel = controller(&config);
        assert!(wheel.spin(Duration::ZERO));
        let settle = settle_time(&wheel);
        let events = run(&mut wheel, Duration::ZERO, settle);

        assert!(events.contains(&WheelEvent::BurstLaunched(Launched::Flash)));
        assert!(wheel.celebration().bursts().is_empty());
        assert_eq!(wheel.celebration().flashes().len(), 1);
    }

    #[test]
    fn test_reduced_motion_spins_faster() {
        let mut wheel = controller(&Config::default());
        wheel.set_signals(DeviceSignals {
            reduced_motion: true,
            ..DeviceSignals::default()
        });
        assert!(wheel.spin(Duration::ZERO));
        let plan = wheel.animation.unwrap().plan;
        assert!(plan.duration <= Duration::from_millis(1500));
        assert!(plan.extra_rotations <= 2.0);
    }

    #[test]
    fn test_press_spins_or_navigates() {
        let mut wheel = controller(&Config::default());
        let center = wheel.layout().center();
        let event = wheel.press(center, true, Duration::ZERO);
        assert!(matches!(event, Some(WheelEvent::SpinStarted(_))));

        // nothing to hit while spinning
        assert_eq!(wheel.press(center, false, Duration::from_millis(10)), None);

        let settle = settle_time(&wheel);
        run(&mut wheel, Duration::ZERO, settle);
        let winner = wheel.state().display_index();
        let probe = at_pointer(&wheel);

        match wheel.press(probe, true, settle + FRAME) {
            Some(WheelEvent::Navigate { index, path }) => {
                assert_eq!(index, winner);
                assert_eq!(path, Config::default().categories[winner].path);
            }
            other => panic!("expected navigation, got {other:?}"),
        }
        assert!(matches!(
            wheel.press(probe, false, settle + FRAME),
            Some(WheelEvent::SpinStarted(_))
        ));
    }

    #[test]
    fn test_hover_and_touch_drive_tooltip() {
        let mut wheel = controller(&Config::default());
        let layout = *wheel.layout();
        let probe = Point::polar(layout.center(), layout.radius() * 0.6, -90.0 + 22.5);

        assert_eq!(wheel.pointer_motion(probe), Some(HitTarget::Segment(0)));
        assert_eq!(wheel.tooltip().category, Some(0));
        wheel.pointer_leave();
        assert!(!wheel.tooltip().is_visible());

        wheel.touch_begin(probe);
        assert!(wheel.tooltip().is_visible());
        wheel.touch_end();
        assert!(!wheel.tooltip().is_visible());
    }

    #[test]
    fn test_navigate_by_slug() {
        let wheel = controller(&Config::default());
        assert_eq!(
            wheel.navigate_to("quiz"),
            Some(WheelEvent::Navigate {
                index: 5,
                path: NavPath::new("/quiz/")
            })
        );
        assert_eq!(wheel.navigate_to("nowhere"), None);
    }

    #[test]
    fn test_resize_rebuilds_after_quiet_period() {
        let mut wheel = controller(&Config::default());
        let ms = Duration::from_millis;

        wheel.resize(Viewport::new(1000.0, 600.0), ms(0));
        wheel.resize(Viewport::new(1200.0, 700.0), ms(50));
        assert!(wheel.tick(ms(120)).is_empty());

        assert_eq!(wheel.tick(ms(150)), vec![WheelEvent::RegionsRebuilt(9)]);
        let center = wheel.layout().center();
        assert_eq!(wheel.pointer_motion(center), Some(HitTarget::Center));
        assert_eq!(wheel.tick(ms(400)), vec![]);
    }

    #[test]
    fn test_resize_mid_spin_waits_for_result() {
        let mut wheel = controller(&Config::default());
        assert!(wheel.spin(Duration::ZERO));
        wheel.resize(Viewport::new(1200.0, 700.0), Duration::from_millis(100));

        let events = run(&mut wheel, Duration::ZERO, Duration::from_millis(400));
        assert!(!events.iter().any(|e| matches!(e, WheelEvent::RegionsRebuilt(_))));
        assert!(wheel.regions().is_empty());

        let settle = settle_time(&wheel);
        run(&mut wheel, Duration::from_millis(400), settle);
        let center = wheel.layout().center();
        assert_eq!(center, WheelLayout::fit(Viewport::new(1200.0, 700.0)).center());
        assert_eq!(wheel.pointer_motion(center), Some(HitTarget::Center));
    }

    #[test]
    fn test_reconfigure_keeps_rotation() {
        let mut wheel = controller(&Config::default());
        assert!(wheel.spin(Duration::ZERO));

        let mut smaller = Config::default();
        smaller.categories.truncate(4);
        assert_eq!(wheel.reconfigure(&smaller), Ok(false));

        let settle = settle_time(&wheel);
        run(&mut wheel, Duration::ZERO, settle);
        let rotation = wheel.state().cumulative_rotation();

        assert_eq!(wheel.reconfigure(&smaller), Ok(true));
        assert_eq!(wheel.state().cumulative_rotation(), rotation);
        assert_eq!(wheel.regions().len(), 5);
        assert_eq!(wheel.registry().len(), 4);
        assert_eq!(
            wheel.state().display_index(),
            wheel.geometry().angle_to_segment_index(rotation, 0.0)
        );
    }

    #[test]
    fn test_bad_reconfigure_keeps_old_wheel() {
        let mut wheel = controller(&Config::default());
        let mut broken = Config::default();
        broken.categories.push(CategoryConfig {
            name: "Quiz again".to_string(),
            slug: CategorySlug::new("quiz"),
            path: NavPath::new("/quiz-2/"),
            color: "#000000".to_string(),
            icon: None,
        });
        assert_eq!(
            wheel.reconfigure(&broken),
            Err(WheelError::DuplicateSlug("quiz".to_string()))
        );
        assert_eq!(wheel.registry().len(), 8);
        assert_eq!(wheel.regions().len(), 9);
    }

    #[test]
    fn test_empty_config_is_fatal() {
        let mut config = Config::default();
        config.categories.clear();
        assert_eq!(
            WheelController::new(&config).err(),
            Some(WheelError::EmptyRegistry)
        );
    }

    #[test]
    fn test_disabled_preview_panel_stays_empty() {
        let mut config = Config::default();
        config.layout.preview_panel = false;
        let mut wheel = controller(&config);
        assert!(wheel.spin(Duration::ZERO));
        let settle = settle_time(&wheel);
        run(&mut wheel, Duration::ZERO, settle);
        assert_eq!(wheel.preview(), None);
        assert!(wheel.result().is_some());
    }

    #[test]
    fn test_shutdown_tears_everything_down() {
        let mut wheel = controller(&Config::default());
        assert!(wheel.spin(Duration::ZERO));
        let settle = settle_time(&wheel);
        run(&mut wheel, Duration::ZERO, settle);
        assert!(!wheel.celebration().is_idle());

        wheel.shutdown();
        assert!(wheel.regions().is_empty());
        assert!(wheel.celebration().is_idle());
        assert!(!wheel.is_animating());
    }
}
