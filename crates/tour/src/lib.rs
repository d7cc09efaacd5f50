#![forbid(unsafe_code)]

//! Guided tour overlay facade.
//!
//! Re-exports the step model, placement engine, session, and overlay
//! manager, and provides a unified [`Error`] with graceful-degradation
//! hints. Browser hosts use the `tour-web` crate on top of this.

pub mod error;

// --- Core re-exports -------------------------------------------------------

pub use tour_core::{
    ClassNames, ConfigError, PlacementConfig, Rect, Size, TourConfig, TourStep, TourSteps,
    Viewport,
};

// --- Layout re-exports -----------------------------------------------------

pub use tour_layout::{BubblePlacement, VerticalSide, compute_bubble_placement, place_bubble};

// --- Widget re-exports -----------------------------------------------------

pub use tour_widgets::overlay::headless::{BackendOp, HeadlessBackend};
pub use tour_widgets::{
    Bubble, BubbleContent, HandlerId, MountOutcome, MountReport, NavControl, OverlayBackend,
    OverlayError, OverlayManager, OverlayTree, SkipReason, Tour, TourAdvanceReason, TourEvent,
    TourSession, TourSessionBuilder, TourState, TourUpdate,
};

pub use error::{DegradationAction, Error, Result};

/// Everything needed to build and drive a tour.
pub mod prelude {
    pub use crate::{
        ClassNames, DegradationAction, Error, MountOutcome, NavControl, OverlayBackend,
        PlacementConfig, Result, Tour, TourConfig, TourEvent, TourStep, TourSteps,
    };
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use super::{HeadlessBackend, Rect, Viewport};

    #[test]
    fn prelude_drives_a_tour() -> Result<()> {
        let steps = TourSteps::from_pairs([("intro", "Welcome"), ("menu", "The menu")])?;
        let backend = HeadlessBackend::new(Viewport::new(1024.0, 1500.0))
            .with_element("intro", Rect::new(200.0, 40.0, 120.0, 30.0))
            .with_element("menu", Rect::new(400.0, 40.0, 120.0, 30.0));
        let mut tour = Tour::from_config(TourConfig::new(steps), backend, |_| {})?;
        tour.open()?;
        tour.dispatch(NavControl::Next)?;
        assert_eq!(tour.current_index(), 1);
        assert_eq!(tour.close().event, Some(TourEvent::Closed { last_index: 1 }));
        Ok(())
    }
}
