#![forbid(unsafe_code)]

//! Tour configuration.
//!
//! Everything except the step list has a default, so the smallest valid JSON
//! document is:
//!
//! ```json
//! { "steps": [{ "id": "search", "content": "Find things here.", "position": 0 }] }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::step::{TourStep, TourSteps};

/// Constants consumed by the bubble placement engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Gap between target and bubble in the default placements.
    pub margin: f64,
    /// Space kept free at the bottom of the container before the bubble is
    /// forced above the target.
    pub reserved_bottom_margin: f64,
    /// Lift applied when bottom overflow forces the bubble above the target.
    pub overflow_lift: f64,
    /// Amount the bubble is shifted left per iteration on right overflow.
    pub horizontal_step: f64,
    /// Fixed bubble width.
    pub bubble_width: f64,
    /// Added to the measured bubble height.
    pub bubble_height_padding: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            margin: 5.0,
            reserved_bottom_margin: 100.0,
            overflow_lift: 150.0,
            horizontal_step: 100.0,
            bubble_width: 305.0,
            bubble_height_padding: 5.0,
        }
    }
}

impl PlacementConfig {
    /// Set the target/bubble margin.
    #[must_use]
    pub fn margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Set the reserved bottom margin.
    #[must_use]
    pub fn reserved_bottom_margin(mut self, value: f64) -> Self {
        self.reserved_bottom_margin = value;
        self
    }

    /// Set the bottom-overflow lift.
    #[must_use]
    pub fn overflow_lift(mut self, value: f64) -> Self {
        self.overflow_lift = value;
        self
    }

    /// Set the horizontal shift step.
    #[must_use]
    pub fn horizontal_step(mut self, value: f64) -> Self {
        self.horizontal_step = value;
        self
    }

    /// Set the bubble width.
    #[must_use]
    pub fn bubble_width(mut self, value: f64) -> Self {
        self.bubble_width = value;
        self
    }
}

/// CSS class names the overlay writes. Defaults match the stock stylesheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassNames {
    pub modal_open: String,
    pub modal_close: String,
    pub overlay_element: String,
    pub bubble: String,
    pub dot: String,
    pub dot_current: String,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            modal_open: "modal-open".into(),
            modal_close: "modal-close".into(),
            overlay_element: "overlay-element".into(),
            bubble: "tour-guide".into(),
            dot: "tour-highlight".into(),
            dot_current: "highlight".into(),
        }
    }
}

impl ClassNames {
    /// Check that every name is one non-empty class token.
    ///
    /// The DOM rejects blank or whitespace-containing tokens when a class is
    /// added, so they are refused here instead of failing mid-tour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("modal_open", &self.modal_open),
            ("modal_close", &self.modal_close),
            ("overlay_element", &self.overlay_element),
            ("bubble", &self.bubble),
            ("dot", &self.dot),
            ("dot_current", &self.dot_current),
        ];
        for (field, value) in fields {
            if value.is_empty() || value.chars().any(char::is_whitespace) {
                return Err(ConfigError::InvalidClassName {
                    field,
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct RawTourConfig {
    steps: Vec<TourStep>,
    #[serde(default)]
    placement: PlacementConfig,
    #[serde(default)]
    classes: ClassNames,
}

/// Validated tour configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TourConfig {
    pub steps: TourSteps,
    pub placement: PlacementConfig,
    pub classes: ClassNames,
}

impl TourConfig {
    /// Configuration with default placement and classes.
    pub fn new(steps: TourSteps) -> Self {
        Self {
            steps,
            placement: PlacementConfig::default(),
            classes: ClassNames::default(),
        }
    }

    /// Parse and validate a JSON document.
    ///
    /// Accepts either `{"steps": [...], ...}` or a bare array of steps.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let raw = if value.is_array() {
            RawTourConfig {
                steps: serde_json::from_value(value)?,
                placement: PlacementConfig::default(),
                classes: ClassNames::default(),
            }
        } else {
            serde_json::from_value(value)?
        };
        raw.classes.validate()?;
        Ok(Self {
            steps: TourSteps::new(raw.steps)?,
            placement: raw.placement,
            classes: raw.classes,
        })
    }

    /// Override placement constants.
    #[must_use]
    pub fn with_placement(mut self, placement: PlacementConfig) -> Self {
        self.placement = placement;
        self
    }

    /// Override class names. They are validated when the tour is built.
    #[must_use]
    pub fn with_classes(mut self, classes: ClassNames) -> Self {
        self.classes = classes;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn minimal_document_uses_defaults() {
        let config = TourConfig::from_json(
            r#"{"steps":[{"id":"one","content":"hello","position":0}]}"#,
        )
        .expect("valid");
        assert_eq!(config.steps.len(), 1);
        assert_eq!(config.placement, PlacementConfig::default());
        assert_eq!(config.classes, ClassNames::default());
    }

    #[test]
    fn bare_array_accepted() {
        let config = TourConfig::from_json(
            r#"[{"id":"one","content":"a","position":0},{"id":"two","content":"b","position":1}]"#,
        )
        .expect("valid");
        assert_eq!(config.steps.get(1).map(|s| s.id.as_str()), Some("two"));
    }

    #[test]
    fn partial_placement_overrides_merge_with_defaults() {
        let config = TourConfig::from_json(
            r#"{"steps":[{"id":"one","content":"a","position":0}],
                "placement":{"overflow_lift":90},
                "classes":{"bubble":"bubble"}}"#,
        )
        .expect("valid");
        assert_eq!(config.placement.overflow_lift, 90.0);
        assert_eq!(config.placement.margin, 5.0);
        assert_eq!(config.classes.bubble, "bubble");
        assert_eq!(config.classes.dot, "tour-highlight");
    }

    #[test]
    fn empty_steps_is_config_error() {
        assert_eq!(
            TourConfig::from_json(r#"{"steps":[]}"#),
            Err(ConfigError::EmptyTour)
        );
    }

    #[test]
    fn malformed_json_is_config_error() {
        assert!(matches!(
            TourConfig::from_json("{steps"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn blank_or_multi_token_class_is_rejected() {
        let err = TourConfig::from_json(
            r#"{"steps":[{"id":"one","content":"a","position":0}],
                "classes":{"modal_open":"","overlay_element":"two words"}}"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidClassName {
                field: "modal_open",
                value: String::new(),
            }
        );

        let classes = ClassNames {
            overlay_element: "two words".into(),
            ..ClassNames::default()
        };
        assert_eq!(
            classes.validate(),
            Err(ConfigError::InvalidClassName {
                field: "overlay_element",
                value: "two words".into(),
            })
        );
        let classes = ClassNames {
            dot_current: "tab\tseparated".into(),
            ..ClassNames::default()
        };
        assert!(classes.validate().is_err());
        assert_eq!(ClassNames::default().validate(), Ok(()));
    }

    #[test]
    fn builder_overrides() {
        let placement = PlacementConfig::default().margin(8.0).bubble_width(280.0);
        assert_eq!(placement.margin, 8.0);
        assert_eq!(placement.bubble_width, 280.0);
        assert_eq!(placement.horizontal_step, 100.0);
    }
}
