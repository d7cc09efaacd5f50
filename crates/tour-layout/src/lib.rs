#![forbid(unsafe_code)]

//! Placement engine for the tour bubble.
//!
//! Pure functions only: given a target rectangle, the container extents, and
//! the bubble size, decide where the bubble goes. See [`placement`] for the
//! rules.

pub mod placement;

pub use placement::{BubblePlacement, VerticalSide, compute_bubble_placement, place_bubble};
pub use tour_core::config::PlacementConfig;
pub use tour_core::geometry::{Rect, Size, Viewport};
