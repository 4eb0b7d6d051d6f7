//! Vehicle-agnostic libraries
//!
//! Feedback and kinematics building blocks with no dependency on the
//! profile engine or the sequencer.

pub mod curvature_drive;
pub mod pid;
