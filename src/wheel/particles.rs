use crate::wheel::geometry::Point;
use crate::wheel::layout::Viewport;
use palette::Srgb;
use rand::Rng;
use std::f64::consts::TAU;
use std::time::Duration;

pub const SIZE_RANGE: (f64, f64) = (6.0, 10.0);
pub const SPEED_RANGE: (f64, f64) = (3.0, 6.0);
pub const LIFETIME_FACTOR: (f64, f64) = (0.7, 1.2);
/// Hard stop for a burst, relative to its duration, in case frames stall.
pub const SAFETY_FACTOR: f64 = 1.3;
/// Spread is expressed relative to this reference value.
pub const SPREAD_REFERENCE: f64 = 50.0;
pub const GRAVITY_STEP: f64 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Point,
    pub velocity: Point,
    pub size: f64,
    pub color: Srgb<u8>,
    pub gravity: f64,
    pub birth: Duration,
    pub lifetime: Duration,
    pub alpha: f64,
}

impl Particle {
    /// Advances one frame. Returns false once the particle has faded out.
    pub fn advance(&mut self, now: Duration) -> bool {
        let age = now.saturating_sub(self.birth).as_secs_f64();
        let lifetime = self.lifetime.as_secs_f64();
        self.alpha = if lifetime > 0.0 {
            1.0 - age / lifetime
        } else {
            0.0
        };
        if self.alpha <= 0.0 {
            return false;
        }

        self.position.x += self.velocity.x;
        self.position.y += self.velocity.y;
        self.velocity.y += self.gravity * GRAVITY_STEP;
        true
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BurstOptions {
    /// Launch point in viewport-relative coordinates (0..1 on both axes).
    pub origin: Point,
    pub palette: Vec<Srgb<u8>>,
    pub spread: f64,
    pub duration: Duration,
    pub count: usize,
    pub gravity: f64,
}

/// Backing drawing surface for one burst, sized to the viewport at launch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BurstId(pub u64);

/// One confetti launch; owns its particles and the surface they draw on.
#[derive(Debug, Clone)]
pub struct Burst {
    id: BurstId,
    particles: Vec<Particle>,
    surface: Option<Surface>,
    deadline: Duration,
}

fn uniform<R: Rng + ?Sized>(rng: &mut R, (min, max): (f64, f64)) -> f64 {
    if min >= max {
        min
    } else {
        rng.random_range(min..max)
    }
}

impl Burst {
    pub fn launch<R: Rng + ?Sized>(
        id: BurstId,
        rng: &mut R,
        options: &BurstOptions,
        viewport: Viewport,
        now: Duration,
    ) -> Self {
        let start = viewport.denormalize(options.origin);
        let spread = options.spread / SPREAD_REFERENCE;
        let duration = options.duration.as_secs_f64();

        let particles = (0..options.count)
            .map(|_| {
                let color = if options.palette.is_empty() {
                    Srgb::new(255, 255, 255)
                } else {
                    options.palette[rng.random_range(0..options.palette.len())]
                };
                let angle = rng.random_range(0.0..TAU);
                let speed = uniform(rng, SPEED_RANGE);
                let lifetime = uniform(
                    rng,
                    (duration * LIFETIME_FACTOR.0, duration * LIFETIME_FACTOR.1),
                );
                Particle {
                    position: start,
                    velocity: Point::new(angle.cos() * speed * spread, angle.sin() * speed * spread),
                    size: uniform(rng, SIZE_RANGE),
                    color,
                    gravity: options.gravity,
                    birth: now,
                    lifetime: Duration::from_secs_f64(lifetime),
                    alpha: 1.0,
                }
            })
            .collect();

        Self {
            id,
            particles,
            surface: Some(Surface {
                width: viewport.width,
                height: viewport.height,
            }),
            deadline: now + options.duration.mul_f64(SAFETY_FACTOR),
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    pub fn is_disposed(&self) -> bool {
        self.surface.is_none()
    }

    pub fn advance(&mut self, now: Duration) {
        if self.is_disposed() {
            return;
        }
        if now >= self.deadline {
            log::debug!("Burst {:?} hit its safety deadline", self.id);
            self.dispose();
            return;
        }

        self.particles.retain_mut(|p| p.advance(now));
        if self.particles.is_empty() {
            self.dispose();
        }
    }

    pub fn dispose(&mut self) {
        self.particles.clear();
        self.surface = None;
    }
}

/// Single full-surface flash used instead of particles on low-power setups.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flash {
    pub color: Srgb<u8>,
    pub started: Duration,
    pub duration: Duration,
}

impl Flash {
    pub fn alpha(&self, now: Duration) -> f64 {
        if self.duration.is_zero() {
            return 0.0;
        }
        let elapsed = now.saturating_sub(self.started).as_secs_f64();
        (1.0 - elapsed / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self, now: Duration) -> bool {
        now >= self.started + self.duration
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Launched {
    Burst(BurstId),
    Flash,
}

#[derive(Debug, Default)]
pub struct CelebrationEngine {
    bursts: Vec<Burst>,
    flashes: Vec<Flash>,
    next_id: u64,
}

impl CelebrationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn launch<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        options: &BurstOptions,
        viewport: Viewport,
        now: Duration,
        low_power: bool,
    ) -> Launched {
        if low_power {
            self.flashes.push(Flash {
                color: options.palette.first().copied().unwrap_or(Srgb::new(255, 255, 255)),
                started: now,
                duration: options.duration / 4,
            });
            return Launched::Flash;
        }

        let id = BurstId(self.next_id);
        self.next_id += 1;
        self.bursts
            .push(Burst::launch(id, rng, options, viewport, now));
        Launched::Burst(id)
    }

    pub fn advance(&mut self, now: Duration) {
        for burst in &mut self.bursts {
            burst.advance(now);
        }
        self.bursts.retain(|b| !b.is_disposed());
        self.flashes.retain(|f| !f.is_finished(now));
    }

    pub fn bursts(&self) -> &[Burst] {
        &self.bursts
    }

    pub fn flashes(&self) -> &[Flash] {
        &self.flashes
    }

    pub fn is_idle(&self) -> bool {
        self.bursts.is_empty() && self.flashes.is_empty()
    }

    pub fn clear(&mut self) {
        for burst in &mut self.bursts {
            burst.dispose();
        }
        self.bursts.clear();
        self.flashes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn options(count: usize, origin: Point) -> BurstOptions {
        BurstOptions {
            origin,
            palette: vec![Srgb::new(248, 113, 113), Srgb::new(255, 255, 255)],
            spread: 70.0,
            duration: Duration::from_millis(1500),
            count,
            gravity: 1.0,
        }
    }

    #[test]
    fn test_burst_starts_at_origin_with_bounded_lifetimes() {
        let mut rng = StdRng::seed_from_u64(1);
        let viewport = Viewport::new(800.0, 600.0);
        let burst = Burst::launch(
            BurstId(0),
            &mut rng,
            &options(80, Point::new(0.5, 0.25)),
            viewport,
            Duration::ZERO,
        );

        assert_eq!(burst.particles().len(), 80);
        for p in burst.particles() {
            assert_eq!(p.position, Point::new(400.0, 150.0));
            assert!(p.lifetime >= Duration::from_millis(1050));
            assert!(p.lifetime <= Duration::from_millis(1800));
            assert!((SIZE_RANGE.0..=SIZE_RANGE.1).contains(&p.size));
        }
        assert_eq!(burst.surface().map(|s| s.width), Some(800.0));
    }

    #[test]
    fn test_burst_is_gone_after_safety_window() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut burst = Burst::launch(
            BurstId(0),
            &mut rng,
            &options(80, Point::new(0.5, 0.5)),
            Viewport::new(1024.0, 768.0),
            Duration::ZERO,
        );

        let mut now = Duration::ZERO;
        while now < Duration::from_millis(1950) {
            now += Duration::from_millis(16);
            burst.advance(now);
        }
        assert!(burst.particles().is_empty());
        assert!(burst.is_disposed());
    }

    #[test]
    fn test_stalled_burst_is_disposed_by_deadline() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut burst = Burst::launch(
            BurstId(0),
            &mut rng,
            &options(80, Point::new(0.5, 0.5)),
            Viewport::new(1024.0, 768.0),
            Duration::ZERO,
        );
        // no frames at all until well past the deadline
        burst.advance(Duration::from_millis(1950));
        assert!(burst.is_disposed());
    }

    #[test]
    fn test_particles_fade_and_fall() {
        let mut p = Particle {
            position: Point::new(0.0, 0.0),
            velocity: Point::new(1.0, 0.0),
            size: 8.0,
            color: Srgb::new(0, 0, 0),
            gravity: 1.0,
            birth: Duration::ZERO,
            lifetime: Duration::from_millis(1000),
            alpha: 1.0,
        };
        assert!(p.advance(Duration::from_millis(250)));
        assert!((p.alpha - 0.75).abs() < 1e-9);
        assert_eq!(p.position, Point::new(1.0, 0.0));
        assert!((p.velocity.y - GRAVITY_STEP).abs() < 1e-12);
        assert!(!p.advance(Duration::from_millis(1000)));
    }

    #[test]
    fn test_two_bursts_are_independent() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut engine = CelebrationEngine::new();
        let viewport = Viewport::new(800.0, 600.0);

        let mut short = options(10, Point::new(0.2, 0.2));
        short.duration = Duration::from_millis(500);
        let first = engine.launch(&mut rng, &short, viewport, Duration::ZERO, false);
        let second = engine.launch(
            &mut rng,
            &options(20, Point::new(0.8, 0.8)),
            viewport,
            Duration::from_millis(300),
            false,
        );
        assert_ne!(first, second);
        assert_eq!(engine.bursts().len(), 2);

        engine.advance(Duration::from_millis(700));
        assert_eq!(engine.bursts().len(), 1);
        assert_eq!(engine.bursts()[0].particles().len(), 20);

        engine.advance(Duration::from_millis(2300));
        assert!(engine.is_idle());
    }

    #[test]
    fn test_low_power_launch_is_a_flash() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut engine = CelebrationEngine::new();
        let launched = engine.launch(
            &mut rng,
            &options(80, Point::new(0.5, 0.5)),
            Viewport::new(800.0, 600.0),
            Duration::ZERO,
            true,
        );
        assert_eq!(launched, Launched::Flash);
        assert!(engine.bursts().is_empty());
        assert_eq!(engine.flashes()[0].alpha(Duration::ZERO), 1.0);

        engine.advance(Duration::from_millis(375));
        assert!(engine.is_idle());
    }
}
