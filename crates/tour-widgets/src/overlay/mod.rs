#![forbid(unsafe_code)]

//! Overlay manager: turns the current step into a mounted overlay.
//!
//! # Invariants
//!
//! 1. The previous overlay is fully torn down before the next one mounts.
//! 2. Every handler bound during a mount is unbound before its nodes go away.
//! 3. [`OverlayManager::unmount`] is a no-op when nothing is mounted.
//! 4. A missing target skips the mount; it never fails navigation.
//! 5. A backend failure during mount leaves the modal root empty.
//!
//! Target rectangles are measured on every mount and never cached.

pub mod backend;
pub mod bubble;
pub mod headless;

use thiserror::Error;
use tracing::{debug, debug_span, trace, warn};

use tour_core::config::{ClassNames, PlacementConfig};
use tour_core::geometry::{Rect, Size};
use tour_core::step::{TourStep, TourSteps};
use tour_layout::{BubblePlacement, place_bubble};

pub use backend::{HandlerId, NavControl, OverlayBackend, OverlayTree};
pub use bubble::{Bubble, BubbleContent, CONTROL_ATTR, DotIndicator};

/// Overlay failure, wrapping the backend's error.
#[derive(Debug, Error)]
pub enum OverlayError<E: std::error::Error + 'static> {
    #[error("overlay backend failed: {0}")]
    Backend(#[source] E),
}

/// Why a mount did not produce an overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No live element has the step's id.
    TargetNotFound { id: String },
    /// The element was measured but could not be cloned.
    CloneFailed { id: String },
}

/// Result of a successful [`OverlayManager::mount`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum MountOutcome {
    Mounted(MountReport),
    Skipped(SkipReason),
}

impl MountOutcome {
    pub fn is_mounted(&self) -> bool {
        matches!(self, Self::Mounted(_))
    }
}

/// Geometry of a mounted step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MountReport {
    pub position: usize,
    pub target: Rect,
    pub bubble: Size,
    pub placement: BubblePlacement,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct MountedStep {
    id: String,
    position: usize,
}

/// Owns the modal root (through its backend) and every handler bound in it.
#[derive(Debug)]
pub struct OverlayManager<B: OverlayBackend> {
    backend: B,
    placement: PlacementConfig,
    classes: ClassNames,
    handlers: Vec<(HandlerId, NavControl)>,
    mounted: Option<MountedStep>,
    /// `None` until the modal classes have been applied once.
    open: Option<bool>,
}

impl<B: OverlayBackend> OverlayManager<B> {
    /// Create a manager with default placement and classes.
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, PlacementConfig::default(), ClassNames::default())
    }

    /// Create a manager with explicit configuration.
    pub fn with_config(backend: B, placement: PlacementConfig, classes: ClassNames) -> Self {
        Self {
            backend,
            placement,
            classes,
            handlers: Vec::new(),
            mounted: None,
            open: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn placement_config(&self) -> &PlacementConfig {
        &self.placement
    }

    pub fn classes(&self) -> &ClassNames {
        &self.classes
    }

    /// Whether the modal is currently open.
    pub fn is_open(&self) -> bool {
        self.open == Some(true)
    }

    /// Whether an overlay is currently mounted.
    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// Position of the mounted step.
    pub fn mounted_position(&self) -> Option<usize> {
        self.mounted.as_ref().map(|m| m.position)
    }

    /// Number of handlers currently bound.
    pub fn bound_handlers(&self) -> usize {
        self.handlers.len()
    }

    /// Mount `step`, replacing whatever was mounted before.
    pub fn mount(
        &mut self,
        step: &TourStep,
        steps: &TourSteps,
    ) -> Result<MountOutcome, OverlayError<B::Error>> {
        let _span = debug_span!("tour.mount", step_id = %step.id, position = step.position)
            .entered();

        self.unmount();

        let Some(target) = self.backend.measure_rect(&step.id) else {
            warn!(step_id = %step.id, position = step.position, "tour target not found; skipping step");
            return Ok(MountOutcome::Skipped(SkipReason::TargetNotFound {
                id: step.id.clone(),
            }));
        };
        if !target.is_finite() {
            warn!(step_id = %step.id, ?target, "tour target has non-finite geometry; skipping step");
            return Ok(MountOutcome::Skipped(SkipReason::TargetNotFound {
                id: step.id.clone(),
            }));
        }
        let Some(clone) = self.backend.clone_target_element(&step.id) else {
            warn!(step_id = %step.id, "tour target could not be cloned; skipping step");
            return Ok(MountOutcome::Skipped(SkipReason::CloneFailed {
                id: step.id.clone(),
            }));
        };

        let content = BubbleContent::for_step(step, steps);
        let measured = self.backend.measure_bubble(&content, &self.classes);
        let bubble_size = Size::new(
            self.placement.bubble_width,
            measured.height + self.placement.bubble_height_padding,
        );
        let viewport = self.backend.viewport();
        let placement = place_bubble(target, viewport, bubble_size.height, &self.placement);
        if placement.clipped {
            debug!(
                step_id = %step.id,
                viewport_width = viewport.width,
                container_height = viewport.container_height,
                "bubble does not fully fit; accepting clipping"
            );
        }

        let controls = content.controls();
        let tree = OverlayTree {
            step_id: step.id.clone(),
            position: step.position,
            clone,
            clone_rect: target,
            bubble: Bubble {
                content,
                placement,
                size: bubble_size,
            },
            classes: self.classes.clone(),
        };
        if let Err(err) = self.backend.mount_overlay(tree) {
            // The backend may have written part of the tree before failing.
            self.backend.unmount_overlay();
            return Err(OverlayError::Backend(err));
        }
        self.mounted = Some(MountedStep {
            id: step.id.clone(),
            position: step.position,
        });

        for control in controls {
            match self.backend.bind_control(control) {
                Ok(handler) => {
                    trace!(handler = handler.get(), ?control, "bound tour control");
                    self.handlers.push((handler, control));
                }
                Err(err) => {
                    self.unmount();
                    return Err(OverlayError::Backend(err));
                }
            }
        }

        debug!(top = placement.top, left = placement.left, "tour step mounted");
        Ok(MountOutcome::Mounted(MountReport {
            position: step.position,
            target,
            bubble: bubble_size,
            placement,
        }))
    }

    /// Unbind every handler, then clear the modal root.
    pub fn unmount(&mut self) {
        if self.mounted.is_none() && self.handlers.is_empty() {
            return;
        }
        for (handler, control) in self.handlers.drain(..) {
            trace!(handler = handler.get(), ?control, "unbound tour control");
            self.backend.unbind_control(handler);
        }
        self.backend.unmount_overlay();
        self.mounted = None;
    }

    /// Toggle the modal's open state and the page scroll lock.
    ///
    /// Closing also unmounts. Setting the state it is already in does
    /// nothing; the first call always reaches the backend, so a fresh
    /// manager can mark its modal root closed.
    pub fn set_open(&mut self, open: bool) {
        if self.open == Some(open) {
            return;
        }
        if !open {
            self.unmount();
        }
        self.backend.set_modal_open(open, &self.classes);
        self.open = Some(open);
    }
}
