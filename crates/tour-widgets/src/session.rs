#![forbid(unsafe_code)]

//! Tour session state machine.
//!
//! ```text
//!            open()                 next() / prev() / jump_to()
//!   Closed ─────────▶ Open(0) ───────────────────────────────▶ Open(i)
//!     ▲                                                          │
//!     └──────────────────────── close() ─────────────────────────┘
//! ```
//!
//! # Invariants
//!
//! 1. `open()` always lands on index 0.
//! 2. `next()` at the last index and `prev()` at index 0 are no-ops.
//! 3. `close()` resets the index, so reopening starts over.
//! 4. Every transition on `Closed` other than `open()` is a no-op.
//!
//! Lifecycle callbacks run inside the transition that triggers them, after
//! the state has been updated.

use std::fmt;

use tour_core::error::ConfigError;
use tour_core::step::{TourStep, TourSteps};

/// Session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TourState {
    /// Not showing anything. Initial state and resting state after close.
    #[default]
    Closed,
    /// Showing the step at `index`.
    Open { index: usize },
}

/// Why the current step changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourAdvanceReason {
    ManualNext,
    ManualPrev,
    Jump,
}

/// Emitted by every transition that changed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourEvent {
    Opened {
        index: usize,
    },
    StepChanged {
        from: usize,
        to: usize,
        reason: TourAdvanceReason,
    },
    Closed {
        last_index: usize,
    },
}

type OpenCallback = Box<dyn FnMut(&TourStep)>;
type StepChangeCallback = Box<dyn FnMut(usize, usize)>;
type CloseCallback = Box<dyn FnMut(usize)>;

/// Builder for [`TourSession`].
///
/// `steps` and `on_close` are required; [`build`](Self::build) fails fast
/// without them.
#[derive(Default)]
pub struct TourSessionBuilder {
    steps: Vec<TourStep>,
    on_open: Option<OpenCallback>,
    on_step_change: Option<StepChangeCallback>,
    on_close: Option<CloseCallback>,
}

impl TourSessionBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the step list.
    #[must_use]
    pub fn steps(mut self, steps: impl Into<Vec<TourStep>>) -> Self {
        self.steps = steps.into();
        self
    }

    /// Use an already validated step list.
    #[must_use]
    pub fn validated_steps(mut self, steps: TourSteps) -> Self {
        self.steps = steps.into_vec();
        self
    }

    /// Called with the first step when the tour opens.
    #[must_use]
    pub fn on_open(mut self, f: impl FnMut(&TourStep) + 'static) -> Self {
        self.on_open = Some(Box::new(f));
        self
    }

    /// Called with `(from, to)` whenever the current step changes.
    #[must_use]
    pub fn on_step_change(mut self, f: impl FnMut(usize, usize) + 'static) -> Self {
        self.on_step_change = Some(Box::new(f));
        self
    }

    /// Called with the last shown index when the tour closes. Required.
    #[must_use]
    pub fn on_close(mut self, f: impl FnMut(usize) + 'static) -> Self {
        self.on_close = Some(Box::new(f));
        self
    }

    /// Validate and build the session.
    pub fn build(self) -> Result<TourSession, ConfigError> {
        let steps = TourSteps::new(self.steps)?;
        let on_close = self
            .on_close
            .ok_or(ConfigError::MissingCallback("on_close"))?;
        Ok(TourSession {
            steps,
            state: TourState::Closed,
            on_open: self.on_open,
            on_step_change: self.on_step_change,
            on_close,
        })
    }
}

/// Step index and open/closed state of one tour.
pub struct TourSession {
    steps: TourSteps,
    state: TourState,
    on_open: Option<OpenCallback>,
    on_step_change: Option<StepChangeCallback>,
    on_close: CloseCallback,
}

impl fmt::Debug for TourSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TourSession")
            .field("steps", &self.steps.len())
            .field("state", &self.state)
            .field("on_open", &self.on_open.is_some())
            .field("on_step_change", &self.on_step_change.is_some())
            .finish_non_exhaustive()
    }
}

impl TourSession {
    /// Start building a session.
    #[must_use]
    pub fn builder() -> TourSessionBuilder {
        TourSessionBuilder::new()
    }

    pub fn state(&self) -> TourState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, TourState::Open { .. })
    }

    /// Current index; `0` while closed.
    pub fn current_index(&self) -> usize {
        match self.state {
            TourState::Open { index } => index,
            TourState::Closed => 0,
        }
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn steps(&self) -> &TourSteps {
        &self.steps
    }

    /// The step being shown, if open.
    pub fn current_step(&self) -> Option<&TourStep> {
        match self.state {
            TourState::Open { index } => self.steps.get(index),
            TourState::Closed => None,
        }
    }

    /// `Closed → Open(0)`.
    pub fn open(&mut self) -> Option<TourEvent> {
        if self.is_open() {
            return None;
        }
        self.state = TourState::Open { index: 0 };
        if let Some(on_open) = self.on_open.as_mut() {
            on_open(self.steps.first());
        }
        Some(TourEvent::Opened { index: 0 })
    }

    /// `Open(i) → Open(i+1)`, no-op at the last step.
    pub fn next(&mut self) -> Option<TourEvent> {
        let TourState::Open { index } = self.state else {
            return None;
        };
        if index + 1 >= self.steps.len() {
            return None;
        }
        self.move_to(index, index + 1, TourAdvanceReason::ManualNext)
    }

    /// `Open(i) → Open(i-1)`, no-op at the first step.
    pub fn prev(&mut self) -> Option<TourEvent> {
        let TourState::Open { index } = self.state else {
            return None;
        };
        if index == 0 {
            return None;
        }
        self.move_to(index, index - 1, TourAdvanceReason::ManualPrev)
    }

    /// Jump to `target`, clamped to the last step.
    pub fn jump_to(&mut self, target: usize) -> Option<TourEvent> {
        let TourState::Open { index } = self.state else {
            return None;
        };
        let to = target.min(self.steps.last_index());
        if to == index {
            return None;
        }
        self.move_to(index, to, TourAdvanceReason::Jump)
    }

    /// `Open(i) → Closed`, resetting the index.
    pub fn close(&mut self) -> Option<TourEvent> {
        let TourState::Open { index } = self.state else {
            return None;
        };
        self.state = TourState::Closed;
        (self.on_close)(index);
        Some(TourEvent::Closed { last_index: index })
    }

    fn move_to(&mut self, from: usize, to: usize, reason: TourAdvanceReason) -> Option<TourEvent> {
        self.state = TourState::Open { index: to };
        if let Some(on_step_change) = self.on_step_change.as_mut() {
            on_step_change(from, to);
        }
        Some(TourEvent::StepChanged { from, to, reason })
    }
}
