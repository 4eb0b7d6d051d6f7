//! Distance-sliced trapezoidal velocity profile
//!
//! Speed is a function of traveled distance, not time: the target
//! distance is quantized into fixed-size slices and the speed command
//! ramps linearly through the first eighth of the slices, cruises at
//! max through the middle six eighths, and ramps back down through the
//! last eighth. Scratch state is rebuilt by [`Trapezoid::set`] on every
//! step start and is read-only during execution except for the stall
//! guard.

use libm::{fabsf, roundf};

/// Ticks without quantized progress before the stall guard fires
const STALL_TICK_LIMIT: u32 = 5;

/// One evaluation of the profile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrapezoidOutput {
    pub speed: f32,
    pub done: bool,
}

/// Trapezoid generator scratch state
///
/// Speeds are signed: forward legs are negative, reverse positive.
/// `min_speed` mutates during execution when the stall guard bumps it
/// toward `max_speed`; the bump lives until the next `set`.
#[derive(Debug, Default)]
pub struct Trapezoid {
    target: f32,
    total_slices: f32,
    slice: f32,
    min_speed: f32,
    max_speed: f32,
    accel: f32,
    first_corner: f32,
    second_corner: f32,
    /// Previous step's edge speed, when blending into this step applies
    last_speed: Option<f32>,
    /// Next step's edge speed, when blending out of this step applies
    next_speed: Option<f32>,
    stall_ticks: u32,
    started_at_us: u64,
}

impl Trapezoid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the profile for a new Move/Curve step
    ///
    /// `last_speed`/`next_speed` are `None` when no continuous blend
    /// applies on that edge (continuous mode off, no neighbor, or the
    /// neighbor is a Pause).
    #[allow(clippy::too_many_arguments)]
    pub fn set(
        &mut self,
        target_distance: f32,
        slice_size: f32,
        min_speed: f32,
        max_speed: f32,
        last_speed: Option<f32>,
        next_speed: Option<f32>,
        now_us: u64,
    ) {
        self.target = fabsf(target_distance);
        self.total_slices = self.target / slice_size;
        self.slice = self.target / self.total_slices;
        self.min_speed = min_speed;
        self.max_speed = max_speed;
        self.last_speed = last_speed;
        self.next_speed = next_speed;
        self.first_corner = self.total_slices / 8.0;
        self.second_corner = self.first_corner * 7.0;
        self.accel = (max_speed - min_speed) / (self.first_corner * self.slice);
        self.stall_ticks = 0;
        self.started_at_us = now_us;
    }

    /// Evaluate the profile at the current elapsed distance
    pub fn evaluate(&mut self, cur_dist: f32, now_us: u64) -> TrapezoidOutput {
        if self.total_slices <= 0.0 {
            return self.finish(now_us);
        }

        let cur_slice = fabsf(roundf(fabsf(cur_dist) / self.slice));
        if cur_slice >= self.total_slices {
            return self.finish(now_us);
        }

        let mut speed = 0.0;
        if cur_slice <= self.first_corner {
            speed = self.accel * fabsf(cur_dist) + self.min_speed;
            if let Some(last) = self.last_speed {
                if speed < last {
                    speed = last;
                }
            }
            self.run_stall_guard(cur_dist);
        }
        if cur_slice > self.first_corner && cur_slice < self.second_corner {
            speed = self.max_speed;
        }
        if cur_slice >= self.second_corner {
            speed = self.accel * (self.target - fabsf(cur_dist)) + self.min_speed;
            if let Some(next) = self.next_speed {
                if self.max_speed > next {
                    if speed < next {
                        speed = next;
                    }
                } else if speed > next {
                    speed = next;
                }
            }
        }

        TrapezoidOutput { speed, done: false }
    }

    fn finish(&self, now_us: u64) -> TrapezoidOutput {
        let elapsed_ms = now_us.saturating_sub(self.started_at_us) / 1000;
        crate::log_debug!("motion time = {} ms", elapsed_ms);
        TrapezoidOutput {
            speed: 0.0,
            done: true,
        }
    }

    /// Break static-friction stalls: if quantized progress has not left
    /// the first slice after several ticks, pull the minimum speed 10%
    /// toward max
    fn run_stall_guard(&mut self, cur_dist: f32) {
        if self.stall_ticks < STALL_TICK_LIMIT {
            self.stall_ticks += 1;
            return;
        }
        self.stall_ticks = 0;
        if fabsf(cur_dist) < self.slice {
            self.min_speed += (self.max_speed - self.min_speed) / 10.0;
        }
    }
}
