//! Common types and utilities shared across the solar map crates.

pub mod angle;
pub mod coord;
pub mod error;
pub mod frame;
pub mod time;

pub use angle::{Angle, AngleUnit};
pub use coord::SkyCoord;
pub use error::{SolarError, SolarResult};
pub use frame::{CoordinateFrame, FrameKind, Observer};
pub use time::parse_obstime;
