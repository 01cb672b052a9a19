use super::config::ScoringConfig;
use crate::results::{EventResults, Sex};

pub const FIRST_BOY: &str = "First Boy";
pub const FIRST_GAL: &str = "First Gal";
pub const SECOND: &str = "Second";
pub const THIRD: &str = "Third";
pub const SECOND_BOY: &str = "Second Boy";
pub const SECOND_GAL: &str = "Second Gal";
pub const THIRD_BOY: &str = "Third Boy";
pub const THIRD_GAL: &str = "Third Gal";

/// Slot still open for the current run, in the order they are tried.
struct Slot {
    label: &'static str,
    accepts: fn(Sex) -> bool,
    filled: bool,
}

impl Slot {
    fn new(label: &'static str, accepts: fn(Sex) -> bool) -> Self {
        Self {
            label,
            accepts,
            filled: false,
        }
    }
}

fn is_male(sex: Sex) -> bool {
    sex == Sex::Male
}

fn is_female(sex: Sex) -> bool {
    sex == Sex::Female
}

fn is_specified(sex: Sex) -> bool {
    sex != Sex::Unspecified
}

fn slots(all_positions_shown: bool) -> Vec<Slot> {
    let mut slots = vec![Slot::new(FIRST_BOY, is_male), Slot::new(FIRST_GAL, is_female)];
    if all_positions_shown {
        slots.push(Slot::new(SECOND_BOY, is_male));
        slots.push(Slot::new(SECOND_GAL, is_female));
        slots.push(Slot::new(THIRD_BOY, is_male));
        slots.push(Slot::new(THIRD_GAL, is_female));
    } else {
        slots.push(Slot::new(SECOND, is_specified));
        slots.push(Slot::new(THIRD, is_specified));
    }
    slots
}

/// Label the notable finishers in `extra_info`. The table must already be in
/// finishing order.
pub fn add_placings(table: &mut EventResults, config: &ScoringConfig) {
    let mut slots = slots(config.all_positions_shown);

    for entry in table.entries_mut() {
        if slots.iter().all(|s| s.filled) {
            break;
        }
        if !entry.time.is_finished() {
            continue;
        }
        if entry.first_timer && config.scores_are_descending {
            continue;
        }

        if let Some(slot) = slots
            .iter_mut()
            .find(|s| !s.filled && (s.accepts)(entry.sex))
        {
            entry.extra_info = Some(slot.label.to_string());
            slot.filled = true;
        }
    }
}
