#![forbid(unsafe_code)]

//! Tour step model and validation.
//!
//! # Invariants
//!
//! 1. A [`TourSteps`] collection is never empty.
//! 2. `steps[i].position == i` for every step.
//! 3. Step ids are non-empty and unique within a tour.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One highlighted element plus its explanatory content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TourStep {
    /// Document id of the element to highlight.
    pub id: String,
    /// Text shown in the bubble.
    pub content: String,
    /// 0-indexed position, equal to the index in the step list.
    pub position: usize,
}

impl TourStep {
    /// Create a step.
    pub fn new(id: impl Into<String>, content: impl Into<String>, position: usize) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            position,
        }
    }

    /// 1-based number shown in the badge.
    #[inline]
    pub const fn badge(&self) -> usize {
        self.position + 1
    }
}

/// A validated, non-empty, densely positioned list of steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TourSteps {
    steps: Vec<TourStep>,
}

impl TourSteps {
    /// Validate and wrap a step list.
    pub fn new(steps: Vec<TourStep>) -> Result<Self, ConfigError> {
        if steps.is_empty() {
            return Err(ConfigError::EmptyTour);
        }

        let mut seen = AHashSet::with_capacity(steps.len());
        for (index, step) in steps.iter().enumerate() {
            if step.position != index {
                return Err(ConfigError::PositionMismatch {
                    index,
                    position: step.position,
                });
            }
            if step.id.trim().is_empty() {
                return Err(ConfigError::EmptyId { index });
            }
            if !seen.insert(step.id.as_str()) {
                return Err(ConfigError::DuplicateId(step.id.clone()));
            }
        }

        Ok(Self { steps })
    }

    /// Build steps from `(id, content)` pairs, assigning positions in order.
    pub fn from_pairs<I, S, T>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        let steps = pairs
            .into_iter()
            .enumerate()
            .map(|(position, (id, content))| TourStep::new(id, content, position))
            .collect();
        Self::new(steps)
    }

    /// Number of steps (always at least one).
    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always `false`; kept for API symmetry with slices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Index of the last step.
    #[inline]
    pub fn last_index(&self) -> usize {
        self.steps.len() - 1
    }

    /// Step at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&TourStep> {
        self.steps.get(index)
    }

    /// The first step.
    #[inline]
    pub fn first(&self) -> &TourStep {
        &self.steps[0]
    }

    /// Iterate steps in order.
    pub fn iter(&self) -> std::slice::Iter<'_, TourStep> {
        self.steps.iter()
    }

    /// Borrow the underlying slice.
    pub fn as_slice(&self) -> &[TourStep] {
        &self.steps
    }

    /// Unwrap into the plain step list.
    pub fn into_vec(self) -> Vec<TourStep> {
        self.steps
    }
}

impl TryFrom<Vec<TourStep>> for TourSteps {
    type Error = ConfigError;

    fn try_from(steps: Vec<TourStep>) -> Result<Self, Self::Error> {
        Self::new(steps)
    }
}

impl<'a> IntoIterator for &'a TourSteps {
    type Item = &'a TourStep;
    type IntoIter = std::slice::Iter<'a, TourStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
