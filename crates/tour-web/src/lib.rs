#![forbid(unsafe_code)]

//! Browser backend for the guided tour.
//!
//! [`DomBackend`] implements the overlay capability against the live
//! document: it measures and deep-clones target elements, mounts the
//! wrapper, clone, and bubble into the modal root, and freezes page
//! scrolling while the tour is open. [`TourGuide`] is the JavaScript entry
//! point.
//!
//! Everything except [`DomError`] is only compiled on `wasm32` targets.

pub mod error;

#[cfg(target_arch = "wasm32")]
pub mod dom;
#[cfg(target_arch = "wasm32")]
pub mod logging;
#[cfg(target_arch = "wasm32")]
mod wasm;

pub use error::DomError;

#[cfg(target_arch = "wasm32")]
pub use dom::{ControlSink, DomBackend};
#[cfg(target_arch = "wasm32")]
pub use wasm::TourGuide;
