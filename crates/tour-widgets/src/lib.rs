#![forbid(unsafe_code)]

//! Tour session, overlay manager, and the driver connecting them.
//!
//! - [`session`]: the `Closed`/`Open(i)` state machine and lifecycle callbacks.
//! - [`overlay`]: mounts one step at a time through an [`OverlayBackend`].
//! - [`driver`]: [`Tour`] re-mounts on every step change and tears down on close.

pub mod driver;
pub mod overlay;
pub mod session;

pub use driver::{Tour, TourUpdate};
pub use overlay::{
    Bubble, BubbleContent, HandlerId, MountOutcome, MountReport, NavControl, OverlayBackend,
    OverlayError, OverlayManager, OverlayTree, SkipReason,
};
pub use session::{TourAdvanceReason, TourEvent, TourSession, TourSessionBuilder, TourState};
