use crate::wheel::CATEGORY_CYCLES;
use crate::wheel::rotation::SpinPlan;
use std::time::Duration;

const NEWTON_ITERATIONS: usize = 8;
const BISECTION_ITERATIONS: usize = 32;
const EPSILON: f64 = 1e-7;

/// CSS-style `cubic-bezier(x1, y1, x2, y2)` timing function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl CubicBezier {
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    fn coefficients(p1: f64, p2: f64) -> (f64, f64, f64) {
        let c = 3.0 * p1;
        let b = 3.0 * (p2 - p1) - c;
        let a = 1.0 - c - b;
        (a, b, c)
    }

    fn sample(p1: f64, p2: f64, t: f64) -> f64 {
        let (a, b, c) = Self::coefficients(p1, p2);
        ((a * t + b) * t + c) * t
    }

    fn slope_x(&self, t: f64) -> f64 {
        let (a, b, c) = Self::coefficients(self.x1, self.x2);
        (3.0 * a * t + 2.0 * b) * t + c
    }

    /// Finds the curve parameter whose x equals `x`.
    fn solve_t(&self, x: f64) -> f64 {
        let mut t = x;
        for _ in 0..NEWTON_ITERATIONS {
            let err = Self::sample(self.x1, self.x2, t) - x;
            if err.abs() < EPSILON {
                return t;
            }
            let d = self.slope_x(t);
            if d.abs() < EPSILON {
                break;
            }
            t -= err / d;
        }

        let (mut lo, mut hi) = (0.0, 1.0);
        t = x;
        for _ in 0..BISECTION_ITERATIONS {
            let value = Self::sample(self.x1, self.x2, t);
            if (value - x).abs() < EPSILON {
                break;
            }
            if value < x {
                lo = t;
            } else {
                hi = t;
            }
            t = (lo + hi) / 2.0;
        }
        t
    }

    pub fn ease(&self, progress: f64) -> f64 {
        if progress <= 0.0 {
            return 0.0;
        }
        if progress >= 1.0 {
            return 1.0;
        }
        Self::sample(self.y1, self.y2, self.solve_t(progress))
    }
}

fn progress(started: Duration, duration: Duration, now: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_sub(started);
    (elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationTransition {
    pub from: f64,
    pub to: f64,
    pub started: Duration,
    pub duration: Duration,
    pub easing: CubicBezier,
}

impl RotationTransition {
    pub fn sample(&self, now: Duration) -> f64 {
        let eased = self.easing.ease(progress(self.started, self.duration, now));
        self.from + (self.to - self.from) * eased
    }

    pub fn is_finished(&self, now: Duration) -> bool {
        now >= self.started + self.duration
    }
}

/// Steps the preview panel through every category `cycles` times over the
/// spin, driven by elapsed time rather than a fixed timer. Never fewer than
/// `CATEGORY_CYCLES` passes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryCycle {
    start_index: usize,
    winning_index: usize,
    segment_count: usize,
    total_ticks: usize,
    interval: Duration,
    started: Duration,
}

impl CategoryCycle {
    pub fn new(
        start_index: usize,
        winning_index: usize,
        segment_count: usize,
        cycles: usize,
        started: Duration,
        duration: Duration,
    ) -> Self {
        let total_ticks = (cycles.max(CATEGORY_CYCLES) * segment_count).max(1);
        Self {
            start_index,
            winning_index,
            segment_count,
            total_ticks,
            interval: duration / total_ticks as u32,
            started,
        }
    }

    pub fn ticks_at(&self, now: Duration) -> usize {
        if self.interval.is_zero() {
            return self.total_ticks;
        }
        let elapsed = now.saturating_sub(self.started);
        ((elapsed.as_nanos() / self.interval.as_nanos()) as usize).min(self.total_ticks)
    }

    pub fn index_at(&self, now: Duration) -> usize {
        let ticks = self.ticks_at(now);
        if ticks >= self.total_ticks {
            self.winning_index
        } else {
            (self.start_index + ticks) % self.segment_count
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationFrame {
    pub rotation: f64,
    pub display_index: usize,
    pub finished: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinAnimation {
    pub plan: SpinPlan,
    pub transition: RotationTransition,
    pub cycle: CategoryCycle,
}

impl SpinAnimation {
    pub fn new(
        plan: SpinPlan,
        display_index: usize,
        segment_count: usize,
        cycles: usize,
        easing: CubicBezier,
        now: Duration,
    ) -> Self {
        Self {
            plan,
            transition: RotationTransition {
                from: plan.start_rotation,
                to: plan.final_rotation,
                started: now,
                duration: plan.duration,
                easing,
            },
            cycle: CategoryCycle::new(
                display_index,
                plan.winning_index,
                segment_count,
                cycles,
                now,
                plan.duration,
            ),
        }
    }

    pub fn settle_at(&self, settle_delay: Duration) -> Duration {
        self.transition.started + self.plan.duration + settle_delay
    }

    pub fn frame(&self, now: Duration) -> AnimationFrame {
        AnimationFrame {
            rotation: self.transition.sample(now),
            display_index: self.cycle.index_at(now),
            finished: self.transition.is_finished(now),
        }
    }
}
