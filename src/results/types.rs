use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Value written to `team_trophy_points` when an entry does not score.
pub const TEAM_TROPHY_NO_SCORE: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishStatus {
    Finished,
    Relay,
    DidNotFinish,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
    #[default]
    Unspecified,
}

/// Clock time at the finish line plus how the athlete got there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceTime {
    pub status: FinishStatus,
    #[serde(default)]
    pub elapsed_secs: Option<u32>,
}

impl RaceTime {
    pub fn finished(elapsed_secs: u32) -> Self {
        Self {
            status: FinishStatus::Finished,
            elapsed_secs: Some(elapsed_secs),
        }
    }

    pub fn relay(elapsed_secs: u32) -> Self {
        Self {
            status: FinishStatus::Relay,
            elapsed_secs: Some(elapsed_secs),
        }
    }

    pub fn did_not_finish() -> Self {
        Self {
            status: FinishStatus::DidNotFinish,
            elapsed_secs: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.status == FinishStatus::Finished
    }

    /// Elapsed value used for ordering. Only finished and relay times count.
    fn sort_value(&self) -> Option<u32> {
        match self.status {
            FinishStatus::Finished | FinishStatus::Relay => self.elapsed_secs,
            FinishStatus::DidNotFinish | FinishStatus::Unknown => None,
        }
    }

    /// Timed entries first by ascending time, untimed entries last.
    pub fn finishing_cmp(&self, other: &Self) -> Ordering {
        match (self.sort_value(), other.sort_value()) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

impl fmt::Display for RaceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.status, self.elapsed_secs) {
            (FinishStatus::DidNotFinish, _) => write!(f, "DNF"),
            (FinishStatus::Relay, None) => write!(f, "Relay"),
            (FinishStatus::Finished | FinishStatus::Relay, Some(secs)) => {
                write!(f, "{}:{:02}", secs / 60, secs % 60)
            }
            _ => write!(f, "-"),
        }
    }
}

/// One athlete's raw finish record, as produced by the results input step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawResult {
    pub race_number: u32,
    pub time: RaceTime,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPoints {
    pub finishing_points: u32,
    pub position_points: Option<u32>,
    pub best_points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsTableEntry {
    pub key: u32,
    pub name: String,
    pub race_number: u32,
    pub sex: Sex,
    /// Empty when the athlete is unaffiliated.
    pub club: String,
    pub time: RaceTime,
    pub handicap_secs: u32,
    pub running_secs: Option<u32>,
    pub speed_order: Option<u32>,
    pub points: EntryPoints,
    pub team_trophy_points: i32,
    pub extra_info: Option<String>,
    pub first_timer: bool,
    pub season_best: bool,
}

impl ResultsTableEntry {
    pub fn has_club(&self) -> bool {
        !self.club.is_empty()
    }
}

/// Working set of entries for one event. Order is only meaningful right
/// after one of the `order_by_*`/`apply_*` calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventResults {
    entries: Vec<ResultsTableEntry>,
}

impl EventResults {
    pub fn new(entries: Vec<ResultsTableEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ResultsTableEntry] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut [ResultsTableEntry] {
        &mut self.entries
    }

    pub fn push(&mut self, entry: ResultsTableEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn order_by_finishing_time(&mut self) {
        self.entries.sort_by(|a, b| a.time.finishing_cmp(&b.time));
    }

    /// Rank finished entries by running time and leave the table in that order.
    pub fn apply_speed_order(&mut self) {
        self.entries.sort_by(|a, b| match (a.running_secs, b.running_secs) {
            (Some(x), Some(y)) if a.time.is_finished() && b.time.is_finished() => x.cmp(&y),
            _ => match (a.time.is_finished(), b.time.is_finished()) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => a.time.finishing_cmp(&b.time),
            },
        });

        let mut order = 0;
        for entry in &mut self.entries {
            if entry.time.is_finished() && entry.running_secs.is_some() {
                order += 1;
                entry.speed_order = Some(order);
            } else {
                entry.speed_order = None;
            }
        }
    }

    /// A single relay time marks the whole event as a relay.
    pub fn is_relay_event(&self) -> bool {
        self.entries
            .iter()
            .any(|e| e.time.status == FinishStatus::Relay)
    }
}

#[cfg(test)]
pub(crate) fn test_entry(key: u32, club: &str, time: RaceTime) -> ResultsTableEntry {
    ResultsTableEntry {
        key,
        name: format!("Athlete {}", key),
        race_number: key,
        sex: Sex::Male,
        club: club.to_string(),
        time,
        handicap_secs: 0,
        running_secs: time.elapsed_secs,
        speed_order: None,
        points: EntryPoints::default(),
        team_trophy_points: 0,
        extra_info: None,
        first_timer: false,
        season_best: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_race_time_display() {
        assert_eq!(RaceTime::finished(754).to_string(), "12:34");
        assert_eq!(RaceTime::finished(59).to_string(), "0:59");
        assert_eq!(RaceTime::did_not_finish().to_string(), "DNF");
        assert_eq!(
            RaceTime {
                status: FinishStatus::Relay,
                elapsed_secs: None
            }
            .to_string(),
            "Relay"
        );
    }

    #[test]
    fn test_order_by_finishing_time_puts_untimed_last() {
        let mut table = EventResults::new(vec![
            test_entry(1, "", RaceTime::did_not_finish()),
            test_entry(2, "", RaceTime::finished(700)),
            test_entry(3, "", RaceTime::relay(650)),
            test_entry(4, "", RaceTime::finished(600)),
        ]);
        table.order_by_finishing_time();
        let keys: Vec<u32> = table.entries().iter().map(|e| e.key).collect();
        assert_eq!(keys, vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_apply_speed_order_uses_running_time() {
        let mut fast_runner = test_entry(1, "", RaceTime::finished(900));
        fast_runner.handicap_secs = 300;
        fast_runner.running_secs = Some(600);
        let mut slow_runner = test_entry(2, "", RaceTime::finished(800));
        slow_runner.running_secs = Some(800);
        let dnf = test_entry(3, "", RaceTime::did_not_finish());

        let mut table = EventResults::new(vec![dnf, slow_runner, fast_runner]);
        table.apply_speed_order();

        let ranked: Vec<(u32, Option<u32>)> = table
            .entries()
            .iter()
            .map(|e| (e.key, e.speed_order))
            .collect();
        assert_eq!(ranked, vec![(1, Some(1)), (2, Some(2)), (3, None)]);
    }

    #[test]
    fn test_relay_detection() {
        let mut table = EventResults::new(vec![test_entry(1, "", RaceTime::finished(600))]);
        assert!(!table.is_relay_event());
        table.push(test_entry(2, "", RaceTime::relay(610)));
        assert!(table.is_relay_event());
    }
}
