#![forbid(unsafe_code)]

//! Property-based tests for step list validation.
//!
//! Random step lists are checked against a straightforward reference model.
//!
//! 1. `TourSteps::new` accepts exactly the non-empty lists whose positions
//!    equal their indices and whose ids are non-blank and unique.
//! 2. A rejected list reports the first violation in list order.
//! 3. An accepted list keeps every step, in order.

use std::collections::HashSet;

use proptest::prelude::*;
use tour_core::error::ConfigError;
use tour_core::step::{TourStep, TourSteps};

/// Ids from a small pool so duplicates and blanks show up often.
fn id() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => "[a-e]".prop_map(String::from),
        1 => Just(String::new()),
        1 => Just("  ".to_string()),
    ]
}

/// Steps whose position is usually the list index; `Some` overrides it.
fn steps() -> impl Strategy<Value = Vec<TourStep>> {
    proptest::collection::vec((id(), prop::option::weighted(0.15, 0usize..8)), 0..8).prop_map(
        |raw| {
            raw.into_iter()
                .enumerate()
                .map(|(index, (id, position))| {
                    TourStep::new(id, format!("step {index}"), position.unwrap_or(index))
                })
                .collect()
        },
    )
}

fn expected(steps: &[TourStep]) -> Result<(), ConfigError> {
    if steps.is_empty() {
        return Err(ConfigError::EmptyTour);
    }
    let mut seen = HashSet::new();
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
        if !seen.insert(step.id.clone()) {
            return Err(ConfigError::DuplicateId(step.id.clone()));
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn accepts_exactly_dense_unique_lists(steps in steps()) {
        let model = expected(&steps);
        match TourSteps::new(steps.clone()) {
            Ok(validated) => {
                prop_assert_eq!(model, Ok(()));
                prop_assert_eq!(validated.as_slice(), steps.as_slice());
                prop_assert_eq!(validated.last_index(), steps.len() - 1);
            }
            Err(err) => prop_assert_eq!(model, Err(err)),
        }
    }

    #[test]
    fn from_pairs_assigns_dense_positions(ids in proptest::collection::hash_set("[a-z]{1,6}", 1..10)) {
        let ids: Vec<String> = ids.into_iter().collect();
        let validated = TourSteps::from_pairs(ids.iter().map(|id| (id.clone(), "text")))
            .expect("unique non-blank ids");
        for (index, step) in validated.iter().enumerate() {
            prop_assert_eq!(step.position, index);
            prop_assert_eq!(&step.id, &ids[index]);
        }
    }
}
