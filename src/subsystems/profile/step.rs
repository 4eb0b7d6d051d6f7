//! Motion plan steps
//!
//! A plan is an ordered list of steps executed one at a time. Steps are
//! never removed as they complete; the index advances past them, which
//! keeps the whole plan inspectable after the fact.

/// Maximum number of steps in one plan
pub const PLAN_CAPACITY: usize = 16;

/// Direction of travel for Move and Curve steps
///
/// Forward legs carry negative speed magnitudes, reverse legs positive.
/// The drive model's right-side polarity inversion assumes this
/// convention; the two must change together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

/// One atomic motion instruction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepKind {
    /// Drive straight for a distance, holding the start heading
    Move {
        target_distance: f32,
        min_speed: f32,
        max_speed: f32,
    },
    /// Rotate to an absolute heading in [0, 360)
    Turn {
        target_heading: f32,
        turn_speed: f32,
    },
    /// Hold position for a duration
    Pause { duration_ms: u64 },
    /// Drive an arc of fixed curvature for a distance
    Curve {
        target_distance: f32,
        min_speed: f32,
        max_speed: f32,
        curvature: f32,
    },
}

/// A step plus its execution flags
///
/// `started` becomes true exactly once, on the tick the step first
/// becomes active; `done` becomes true exactly once, on the tick the
/// completion criteria are met.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub kind: StepKind,
    pub started: bool,
    pub done: bool,
}

impl Step {
    pub fn new(kind: StepKind) -> Self {
        Self {
            kind,
            started: false,
            done: false,
        }
    }

    /// Speed this step contributes to a neighbor's continuous blend
    ///
    /// Turns and pauses contribute zero; blending across a pause is
    /// suppressed separately by the engine.
    pub fn edge_speed(&self) -> f32 {
        match self.kind {
            StepKind::Move { max_speed, .. } | StepKind::Curve { max_speed, .. } => max_speed,
            StepKind::Turn { .. } | StepKind::Pause { .. } => 0.0,
        }
    }

    pub fn is_pause(&self) -> bool {
        matches!(self.kind, StepKind::Pause { .. })
    }
}
