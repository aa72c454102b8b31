use crate::wheel::FULL_TURN;
use crate::wheel::error::WheelError;
use crate::wheel::geometry::WheelGeometry;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Mutable wheel state for one session. Only the controller writes it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WheelState {
    cumulative_rotation: f64,
    spinning: bool,
    display_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Spinning,
}

impl WheelState {
    pub fn cumulative_rotation(&self) -> f64 {
        self.cumulative_rotation
    }

    pub fn is_spinning(&self) -> bool {
        self.spinning
    }

    pub fn phase(&self) -> Phase {
        if self.spinning {
            Phase::Spinning
        } else {
            Phase::Idle
        }
    }

    pub fn display_index(&self) -> usize {
        self.display_index
    }

    pub(crate) fn set_display_index(&mut self, index: usize) {
        self.display_index = index;
    }
}

/// Inclusive `min..=max` range sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct SpinRange {
    pub min: f64,
    pub max: f64,
}

impl SpinRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn validate(&self, name: &'static str) -> Result<(), WheelError> {
        if self.min.is_finite() && self.max.is_finite() && 0.0 <= self.min && self.min <= self.max
        {
            Ok(())
        } else {
            Err(WheelError::InvalidRange {
                name,
                min: self.min,
                max: self.max,
            })
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.min >= self.max {
            self.min
        } else {
            rng.random_range(self.min..=self.max)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct SpinProfile {
    pub duration_ms: SpinRange,
    pub rotations: SpinRange,
}

impl SpinProfile {
    pub fn validate(&self) -> Result<(), WheelError> {
        self.duration_ms.validate("duration_ms")?;
        self.rotations.validate("rotations")?;
        // fewer than one extra turn can land behind the current rotation
        if self.rotations.min < 1.0 {
            return Err(WheelError::InvalidRange {
                name: "rotations",
                min: self.rotations.min,
                max: self.rotations.max,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinTuning {
    pub normal: SpinProfile,
    pub reduced: SpinProfile,
    pub pointer_offset: f64,
}

impl SpinTuning {
    pub fn profile(&self, reduced_motion: bool) -> &SpinProfile {
        if reduced_motion {
            &self.reduced
        } else {
            &self.normal
        }
    }
}

/// Everything the animation needs to know about one spin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinPlan {
    pub winning_index: usize,
    pub duration: Duration,
    pub extra_rotations: f64,
    pub start_rotation: f64,
    pub final_rotation: f64,
}

/// Rounds the provisional target up to a full turn, then backs off so the
/// winner's center lands under the pointer.
pub fn final_rotation(
    current: f64,
    extra_rotations: f64,
    winning_index: usize,
    segment_angle: f64,
    pointer_offset: f64,
) -> f64 {
    let target = current + extra_rotations * FULL_TURN;
    (target / FULL_TURN).ceil() * FULL_TURN
        - segment_angle * winning_index as f64
        - segment_angle / 2.0
        + pointer_offset
}

#[derive(Debug, Clone)]
pub struct RotationMachine {
    geometry: WheelGeometry,
    tuning: SpinTuning,
}

impl RotationMachine {
    pub fn new(geometry: WheelGeometry, tuning: SpinTuning) -> Result<Self, WheelError> {
        tuning.normal.validate()?;
        tuning.reduced.validate()?;
        Ok(Self { geometry, tuning })
    }

    pub fn geometry(&self) -> &WheelGeometry {
        &self.geometry
    }

    pub fn tuning(&self) -> &SpinTuning {
        &self.tuning
    }

    /// Starts a spin unless one is already in flight.
    pub fn request_spin<R: Rng + ?Sized>(
        &self,
        state: &mut WheelState,
        rng: &mut R,
        reduced_motion: bool,
    ) -> Option<SpinPlan> {
        if state.spinning {
            log::debug!("Spin requested while spinning; ignoring");
            return None;
        }

        let profile = self.tuning.profile(reduced_motion);
        let winning_index = rng.random_range(0..self.geometry.segment_count());
        let duration_ms = profile.duration_ms.sample(rng);
        let rotations = profile.rotations.sample(rng);

        let plan = self.plan(
            state.cumulative_rotation,
            winning_index,
            Duration::from_secs_f64(duration_ms / 1000.0),
            rotations,
        );
        state.spinning = true;
        Some(plan)
    }

    pub fn plan(
        &self,
        current: f64,
        winning_index: usize,
        duration: Duration,
        extra_rotations: f64,
    ) -> SpinPlan {
        SpinPlan {
            winning_index,
            duration,
            extra_rotations,
            start_rotation: current,
            final_rotation: final_rotation(
                current,
                extra_rotations,
                winning_index,
                self.geometry.segment_angle(),
                self.tuning.pointer_offset,
            ),
        }
    }

    pub fn complete(&self, state: &mut WheelState, plan: &SpinPlan) {
        state.cumulative_rotation = plan.final_rotation;
        state.spinning = false;
        state.display_index = plan.winning_index;
    }

    /// Segment currently under the pointer, from tracked state only.
    pub fn resting_index(&self, state: &WheelState) -> usize {
        self.geometry
            .angle_to_segment_index(state.cumulative_rotation, self.tuning.pointer_offset)
    }
}
