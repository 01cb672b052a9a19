use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

use super::config::ScoringConfig;
use crate::results::{EventResults, TEAM_TROPHY_NO_SCORE};
use crate::season::{AthleteTeamTrophyPoints, Season};

/// Point every accepted runner gets in a relay event.
const RELAY_POINTS_VALUE: u32 = 1;
/// Value used to fill empty team places in a relay event.
const RELAY_COMPLETION_VALUE: u32 = 2;

/// One place in a club's Team Trophy team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonTeamTrophyPoints {
    pub points: u32,
    pub name: String,
    /// `None` for a place filled in by [`TeamTrophyEvent::complete`].
    pub athlete_key: Option<u32>,
    pub scored: bool,
    pub date: NaiveDate,
}

/// A club's Team Trophy team for one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamTrophyEvent {
    pub date: NaiveDate,
    pub capacity: u32,
    pub points: Vec<CommonTeamTrophyPoints>,
    /// Competition score from the points table, 0 until ranked.
    #[serde(default)]
    pub score: u32,
}

impl TeamTrophyEvent {
    pub fn new(date: NaiveDate, capacity: u32) -> Self {
        Self {
            date,
            capacity,
            points: Vec::new(),
            score: 0,
        }
    }

    /// Number of real runners in the team.
    pub fn number_of_athletes(&self) -> u32 {
        self.points.iter().filter(|p| p.scored).count() as u32
    }

    pub fn total_athlete_points(&self) -> u32 {
        self.points.iter().map(|p| p.points).sum()
    }

    pub fn is_full(&self) -> bool {
        self.points.len() as u32 >= self.capacity
    }

    /// Returns false, leaving the team unchanged, if it is already full.
    pub fn add_point(&mut self, point: CommonTeamTrophyPoints) -> bool {
        if self.is_full() {
            return false;
        }
        self.points.push(point);
        true
    }

    /// Fill every empty place up to `team_size` with `value`.
    pub fn complete(&mut self, team_size: u32, value: u32) {
        while (self.points.len() as u32) < team_size {
            self.points.push(CommonTeamTrophyPoints {
                points: value,
                name: String::new(),
                athlete_key: None,
                scored: false,
                date: self.date,
            });
        }
    }
}

/// Work out Team Trophy points for every entry and score each season club.
///
/// Returns the finished team for every club, keyed by club name, after it has
/// been appended to the club's season history.
pub fn calculate_team_trophy_points(
    table: &mut EventResults,
    season: &mut Season,
    date: NaiveDate,
    config: &ScoringConfig,
) -> BTreeMap<String, TeamTrophyEvent> {
    let is_relay_event = table.is_relay_event();
    let capacity = config.number_in_team_trophy_team;

    table.order_by_finishing_time();

    let mut events: BTreeMap<String, TeamTrophyEvent> = season
        .clubs
        .iter()
        .map(|club| (club.name.clone(), TeamTrophyEvent::new(date, capacity)))
        .collect();

    // Position counts attempts; next_score is one past the last accepted one.
    let mut competition_position: u32 = 0;
    let mut next_score: u32 = 1;

    for entry in table.entries_mut() {
        let Some(athlete) = season.athlete_mut(entry.key) else {
            warn!(athlete = entry.key, "Can't find athlete in season roster");
            continue;
        };

        let club_event = if entry.has_club() && !entry.first_timer {
            let event = events.get_mut(&entry.club);
            if event.is_none() {
                warn!(club = %entry.club, athlete = entry.key, "No Team Trophy team for club");
            }
            event
        } else {
            None
        };

        let Some(club_event) = club_event else {
            entry.team_trophy_points = TEAM_TROPHY_NO_SCORE;
            athlete.add_team_trophy_event(AthleteTeamTrophyPoints {
                points: TEAM_TROPHY_NO_SCORE,
                date,
            });
            continue;
        };

        competition_position += 1;
        let points_value = if is_relay_event {
            RELAY_POINTS_VALUE
        } else {
            competition_position
        };

        let accepted = club_event.add_point(CommonTeamTrophyPoints {
            points: points_value,
            name: entry.name.clone(),
            athlete_key: Some(entry.key),
            scored: true,
            date,
        });

        if accepted {
            next_score = competition_position + 1;
            entry.team_trophy_points = competition_position as i32;
        } else {
            // The team was full, hand the position back.
            competition_position -= 1;
            entry.team_trophy_points = TEAM_TROPHY_NO_SCORE;
        }

        athlete.add_team_trophy_event(AthleteTeamTrophyPoints {
            points: entry.team_trophy_points,
            date,
        });
    }

    let completion_value = if is_relay_event {
        RELAY_COMPLETION_VALUE
    } else {
        next_score
    };
    for event in events.values_mut() {
        event.complete(capacity, completion_value);
    }

    rank_teams(&mut events, &config.team_trophy_points_table);

    for (club, event) in &events {
        season.add_new_club_points(club, event.clone());
    }

    events
}

/// Assign scores from `points_table`, lowest total first. Teams without a
/// single runner are ranked after every other team and never score.
fn rank_teams(events: &mut BTreeMap<String, TeamTrophyEvent>, points_table: &[u32]) {
    let mut ordered: Vec<&mut TeamTrophyEvent> = events.values_mut().collect();
    ordered.sort_by_key(|e| (e.number_of_athletes() == 0, e.total_athlete_points()));

    let mut last_total: Option<u32> = None;
    let mut tie_score: Option<u32> = None;

    for (index, event) in ordered.into_iter().enumerate() {
        if event.number_of_athletes() == 0 {
            break;
        }

        let total = event.total_athlete_points();
        if last_total == Some(total) {
            if let Some(score) = tie_score {
                event.score = score;
            }
        } else if let Some(&score) = points_table.get(index) {
            event.score = score;
            tie_score = Some(score);
        } else {
            tie_score = None;
        }

        last_total = Some(total);
    }
}
