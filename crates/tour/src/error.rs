#![forbid(unsafe_code)]

//! Tour error model and graceful degradation.
//!
//! Configuration problems are fatal at construction. Everything that can go
//! wrong while a tour is showing maps to a [`DegradationAction`] that keeps
//! the page usable: skip the step, accept a clipped bubble, or close the
//! tour outright.

use std::fmt;

use tour_core::ConfigError;
use tour_widgets::{MountOutcome, OverlayError, SkipReason};

// ── Overlay Faults ──────────────────────────────────────────────────────

/// Runtime problems with a single step's overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayFault {
    /// The step's target element is not in the document.
    TargetNotFound { id: String },
    /// The target exists but could not be cloned.
    CloneFailed { id: String },
    /// The bubble could not be placed fully inside the viewport.
    Clipped { position: usize },
}

// ── Unified Error ───────────────────────────────────────────────────────

/// Top-level error type for tour hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid steps or missing callback.
    Config(ConfigError),
    /// A step could not be shown as intended.
    Overlay(OverlayFault),
    /// The rendering backend failed.
    Backend(String),
}

/// Standard result type for tour APIs.
pub type Result<T> = std::result::Result<T, Error>;

// ── Graceful Degradation ────────────────────────────────────────────────

/// What the host should do when an error occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegradationAction {
    /// The tour was misconfigured; nothing to recover at runtime.
    FixCallSite,
    /// Leave this step without an overlay and keep navigating.
    SkipStep,
    /// Show the bubble partially off-screen.
    AcceptClipping,
    /// Tear the tour down and restore the page.
    CloseTour,
}

impl Error {
    /// Determine the graceful degradation action for this error.
    pub fn degradation(&self) -> DegradationAction {
        match self {
            Self::Config(_) => DegradationAction::FixCallSite,
            Self::Overlay(OverlayFault::TargetNotFound { .. } | OverlayFault::CloneFailed { .. }) => {
                DegradationAction::SkipStep
            }
            Self::Overlay(OverlayFault::Clipped { .. }) => DegradationAction::AcceptClipping,
            Self::Backend(_) => DegradationAction::CloseTour,
        }
    }

    /// Error type label for tracing.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Overlay(_) => "overlay",
            Self::Backend(_) => "backend",
        }
    }

    /// Whether the tour can keep running.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.degradation(),
            DegradationAction::SkipStep | DegradationAction::AcceptClipping
        )
    }

    /// The fault, if any, behind a mount that did not go cleanly.
    pub fn from_outcome(outcome: &MountOutcome) -> Option<Self> {
        match outcome {
            MountOutcome::Skipped(reason) => Some(Self::from(reason.clone())),
            MountOutcome::Mounted(report) if report.placement.clipped => {
                Some(Self::Overlay(OverlayFault::Clipped {
                    position: report.position,
                }))
            }
            MountOutcome::Mounted(_) => None,
        }
    }
}

// ── Display ─────────────────────────────────────────────────────────────

impl fmt::Display for OverlayFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TargetNotFound { id } => write!(f, "tour target '{id}' not found"),
            Self::CloneFailed { id } => write!(f, "tour target '{id}' could not be cloned"),
            Self::Clipped { position } => {
                write!(f, "bubble for step {position} does not fit the viewport")
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid tour: {err}"),
            Self::Overlay(fault) => write!(f, "{fault}"),
            Self::Backend(msg) => write!(f, "backend: {msg}"),
        }
    }
}

impl fmt::Display for DegradationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FixCallSite => write!(f, "fix_call_site"),
            Self::SkipStep => write!(f, "skip_step"),
            Self::AcceptClipping => write!(f, "accept_clipping"),
            Self::CloseTour => write!(f, "close_tour"),
        }
    }
}

// ── std::error::Error ───────────────────────────────────────────────────

impl std::error::Error for OverlayFault {}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Overlay(fault) => Some(fault),
            Self::Backend(_) => None,
        }
    }
}

// ── From conversions ────────────────────────────────────────────────────

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<OverlayFault> for Error {
    fn from(fault: OverlayFault) -> Self {
        Self::Overlay(fault)
    }
}

impl From<SkipReason> for Error {
    fn from(reason: SkipReason) -> Self {
        Self::Overlay(match reason {
            SkipReason::TargetNotFound { id } => OverlayFault::TargetNotFound { id },
            SkipReason::CloneFailed { id } => OverlayFault::CloneFailed { id },
        })
    }
}

impl<E: std::error::Error + 'static> From<OverlayError<E>> for Error {
    fn from(err: OverlayError<E>) -> Self {
        match err {
            OverlayError::Backend(inner) => Self::Backend(inner.to_string()),
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────────
