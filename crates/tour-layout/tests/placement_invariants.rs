#![forbid(unsafe_code)]

//! Property-based invariant tests for bubble placement.
//!
//! 1. Left and top are never negative.
//! 2. Without right overflow the bubble's left edge follows the target's.
//! 3. Bottom overflow always forces the bubble above the target.
//! 4. Right-overflow correction only ever moves the bubble left.
//! 5. When the viewport is wider than the bubble, the shifted bubble fits.

use proptest::prelude::*;
use tour_layout::{PlacementConfig, Rect, VerticalSide, compute_bubble_placement};

// ── Helpers ─────────────────────────────────────────────────────────────

fn target_rect() -> impl Strategy<Value = Rect> {
    (0.0f64..3000.0, 0.0f64..2000.0, 1.0f64..800.0, 1.0f64..600.0)
        .prop_map(|(top, left, width, height)| Rect::new(top, left, width, height))
}

proptest! {
    #[test]
    fn coordinates_never_negative(
        target in target_rect(),
        container in 0.0f64..5000.0,
        viewport in 1.0f64..2500.0,
        bubble_w in 50.0f64..600.0,
        bubble_h in 10.0f64..600.0,
    ) {
        let p = compute_bubble_placement(
            target, container, viewport, bubble_w, bubble_h, &PlacementConfig::default(),
        );
        prop_assert!(p.top >= 0.0, "top {} for {:?}", p.top, target);
        prop_assert!(p.left >= 0.0, "left {} for {:?}", p.left, target);
    }

    #[test]
    fn left_follows_target_without_overflow(
        target in target_rect(),
        bubble_w in 50.0f64..600.0,
    ) {
        let viewport = target.left + bubble_w + 1.0;
        let p = compute_bubble_placement(
            target, 10_000.0, viewport, bubble_w, 100.0, &PlacementConfig::default(),
        );
        prop_assert_eq!(p.left, target.left);
        prop_assert!(!p.horizontal_shifted);
    }

    #[test]
    fn bottom_overflow_forces_above(
        target in target_rect(),
        bubble_h in 10.0f64..600.0,
    ) {
        let config = PlacementConfig::default();
        let container = target.bottom() + bubble_h + config.reserved_bottom_margin - 1.0;
        let p = compute_bubble_placement(target, container, 10_000.0, 305.0, bubble_h, &config);
        prop_assert_eq!(p.vertical, VerticalSide::ForcedAbove);
        prop_assert_eq!(p.unclamped_top, target.top - (bubble_h + config.overflow_lift));
    }

    #[test]
    fn shift_only_moves_left(
        target in target_rect(),
        viewport in 1.0f64..2500.0,
        bubble_w in 50.0f64..600.0,
    ) {
        let p = compute_bubble_placement(
            target, 10_000.0, viewport, bubble_w, 100.0, &PlacementConfig::default(),
        );
        prop_assert!(p.left <= target.left);
    }

    #[test]
    fn fitting_shift_is_not_clipped(
        target in target_rect(),
        bubble_w in 50.0f64..600.0,
    ) {
        // Viewport wide enough for the bubble anywhere from 0.
        let viewport = bubble_w + 1.0;
        let p = compute_bubble_placement(
            target, 10_000.0, viewport, bubble_w, 100.0, &PlacementConfig::default(),
        );
        prop_assert!(p.left + bubble_w <= viewport, "left {} width {}", p.left, bubble_w);
    }
}
