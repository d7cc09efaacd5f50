#![forbid(unsafe_code)]

//! Core types for the guided tour overlay: pixel geometry, the validated
//! step list, configuration, and construction errors.
//!
//! Nothing in this crate touches a document; see `tour-widgets` for the
//! session and overlay logic and `tour-web` for the browser backend.

pub mod config;
pub mod error;
pub mod geometry;
pub mod step;

pub use config::{ClassNames, PlacementConfig, TourConfig};
pub use error::ConfigError;
pub use geometry::{Rect, Size, Viewport};
pub use step::{TourStep, TourSteps};
