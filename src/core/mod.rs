//! Core systems
//!
//! Cross-cutting facilities shared by every subsystem.

pub mod logging;
