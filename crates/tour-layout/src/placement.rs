#![forbid(unsafe_code)]

//! Bubble placement relative to a highlighted target.
//!
//! # Rules
//!
//! Vertical, in priority order:
//!
//! 1. If `target.bottom + bubble_height` crosses
//!    `container_height - reserved_bottom_margin`, the bubble is forced above
//!    the target at `target.top - (bubble_height + overflow_lift)`.
//! 2. Otherwise, if the bubble is taller than the space above the target it
//!    goes below (`target.bottom + margin`), else above
//!    (`target.top - (bubble_height + margin)`).
//!
//! Horizontal: the bubble's left edge follows the target's. On right
//! overflow it is pulled back by half its width, then by `horizontal_step`
//! until it fits or the offset is no longer positive.
//!
//! Both axes are clamped at `0`. A bubble that still does not fit is reported
//! as [`BubblePlacement::clipped`] and left as is.

use serde::{Deserialize, Serialize};
use tour_core::config::PlacementConfig;
use tour_core::geometry::{Rect, Size, Viewport};

/// Which side of the target the bubble ended up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerticalSide {
    /// Below the target (not enough room above).
    Below,
    /// Above the target (default rule).
    Above,
    /// Above the target because placing it lower would overflow the container.
    ForcedAbove,
}

/// Computed bubble position in container coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BubblePlacement {
    /// Top edge, never negative.
    pub top: f64,
    /// Left edge, never negative.
    pub left: f64,
    /// Top edge before clamping at zero.
    pub unclamped_top: f64,
    /// Vertical rule that applied.
    pub vertical: VerticalSide,
    /// Whether right-overflow correction moved the bubble.
    pub horizontal_shifted: bool,
    /// Whether the bubble still extends past the viewport or container.
    pub clipped: bool,
}

impl BubblePlacement {
    /// The bubble rectangle for a given bubble size.
    #[must_use]
    pub fn rect(&self, bubble: Size) -> Rect {
        Rect::new(self.top, self.left, bubble.width, bubble.height)
    }
}

/// Compute where the tour bubble goes for `target`.
///
/// `bubble_height` is expected to already include any padding the caller
/// wants accounted for.
#[must_use]
pub fn compute_bubble_placement(
    target: Rect,
    container_height: f64,
    viewport_width: f64,
    bubble_width: f64,
    bubble_height: f64,
    config: &PlacementConfig,
) -> BubblePlacement {
    let (unclamped_top, vertical) =
        vertical_placement(target, container_height, bubble_height, config);
    let (left, horizontal_shifted) =
        horizontal_placement(target, viewport_width, bubble_width, config);
    let top = unclamped_top.max(0.0);

    let clipped = left + bubble_width > viewport_width
        || unclamped_top < 0.0
        || top + bubble_height > container_height;

    #[cfg(feature = "tracing")]
    {
        tracing::debug!(
            top,
            left,
            unclamped_top,
            ?vertical,
            horizontal_shifted,
            clipped,
            "bubble placement"
        );
    }

    BubblePlacement {
        top,
        left,
        unclamped_top,
        vertical,
        horizontal_shifted,
        clipped,
    }
}

/// [`compute_bubble_placement`] with the width taken from `config`.
#[must_use]
pub fn place_bubble(
    target: Rect,
    viewport: Viewport,
    bubble_height: f64,
    config: &PlacementConfig,
) -> BubblePlacement {
    compute_bubble_placement(
        target,
        viewport.container_height,
        viewport.width,
        config.bubble_width,
        bubble_height,
        config,
    )
}

fn vertical_placement(
    target: Rect,
    container_height: f64,
    bubble_height: f64,
    config: &PlacementConfig,
) -> (f64, VerticalSide) {
    if target.bottom() + bubble_height > container_height - config.reserved_bottom_margin {
        return (
            target.top - (bubble_height + config.overflow_lift),
            VerticalSide::ForcedAbove,
        );
    }

    if bubble_height > target.top {
        (target.bottom() + config.margin, VerticalSide::Below)
    } else {
        (target.top - (bubble_height + config.margin), VerticalSide::Above)
    }
}

fn horizontal_placement(
    target: Rect,
    viewport_width: f64,
    bubble_width: f64,
    config: &PlacementConfig,
) -> (f64, bool) {
    if target.left + bubble_width <= viewport_width {
        return (target.left.max(0.0), false);
    }

    let mut left = target.left - bubble_width / 2.0;
    let step = config.horizontal_step;
    // A non-positive step would never terminate; fall through to the clamp.
    if step > 0.0 && step.is_finite() {
        while left + bubble_width > viewport_width && left > 0.0 {
            left -= step;
        }
    }
    (left.max(0.0), true)
}
