//! Platform abstraction layer
//!
//! The autonomous core never talks to hardware directly. Sensors and
//! the monotonic clock are consumed through the narrow traits in
//! [`traits`]; hosts provide real implementations, tests use the
//! simulated ones in [`mock`].

pub mod error;
pub mod mock;
pub mod traits;

pub use error::{PlatformError, Result, SensorError, TimerError};
