//! # Beacon Core
//!
//! Runtime-agnostic building blocks of the build beacon: what a poll of the
//! dashboard yields ([`BuildCounts`]), what the light should show
//! ([`DisplayState`]), and the seams to the outside world
//! ([`LightDevice`], [`StatusFetcher`], [`StatusClassifier`]).

pub mod color;
pub mod config;
pub mod counts;
pub mod device;
pub mod error;
pub mod source;
pub mod state;

pub use color::Color;
pub use config::{BeaconConfig, DeviceConfig, DeviceKind, LayoutConfig};
pub use counts::{BuildCounts, BuildCountsBuilder, BuilderResult};
pub use device::LightDevice;
pub use error::{ClassifyError, ConfigError, DeviceError, FetchError, PollError};
pub use source::{StatusClassifier, StatusFetcher};
pub use state::{DisplayState, classify};

pub mod prelude {
    pub use crate::color::{self, Color};
    pub use crate::counts::BuildCounts;
    pub use crate::device::LightDevice;
    pub use crate::error::{ClassifyError, DeviceError, FetchError, PollError};
    pub use crate::source::{StatusClassifier, StatusFetcher};
    pub use crate::state::{DisplayState, classify};
}
