use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

use super::config::ScoringConfig;
use crate::results::EventResults;
use crate::season::{CommonPoints, Season};

/// Running Mob Trophy totals for one club during one event.
///
/// Only the first `number_in_team` results added are counted. Each counted
/// result is worth the team finishing points, the athlete's position points
/// and, for a season best by anyone other than a first timer, the team
/// season best points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MobTrophyPoints {
    pub club_name: String,
    number_in_team: u32,
    team_finishing_points: u32,
    team_season_best_points: u32,
    results_counted: u32,
    pub finishing_points: u32,
    pub position_points: u32,
    pub best_points: u32,
}

impl MobTrophyPoints {
    pub fn new(
        club_name: impl Into<String>,
        number_in_team: u32,
        team_finishing_points: u32,
        team_season_best_points: u32,
    ) -> Self {
        Self {
            club_name: club_name.into(),
            number_in_team,
            team_finishing_points,
            team_season_best_points,
            results_counted: 0,
            finishing_points: 0,
            position_points: 0,
            best_points: 0,
        }
    }

    pub fn add_new_result(&mut self, position_points: Option<u32>, first_timer: bool, season_best: bool) {
        if self.results_counted >= self.number_in_team {
            return;
        }
        self.results_counted += 1;

        self.finishing_points += self.team_finishing_points;
        self.position_points += position_points.unwrap_or(0);
        if season_best && !first_timer {
            self.best_points += self.team_season_best_points;
        }
    }

    pub fn to_common_points(&self, date: NaiveDate) -> CommonPoints {
        CommonPoints {
            finishing_points: self.finishing_points,
            position_points: self.position_points,
            best_points: self.best_points,
            date,
        }
    }
}

/// One zeroed accumulator per known club.
pub fn setup_mob_trophy_points(
    clubs: &[String],
    config: &ScoringConfig,
) -> BTreeMap<String, MobTrophyPoints> {
    clubs
        .iter()
        .map(|club| {
            (
                club.clone(),
                MobTrophyPoints::new(
                    club.clone(),
                    config.number_in_team,
                    config.team_finishing_points,
                    config.team_season_best_points,
                ),
            )
        })
        .collect()
}

/// Accumulate club points from the table and append one dated record per
/// club to the season. Does nothing unless teams are in use.
pub fn assign_mob_trophy_points(
    table: &mut EventResults,
    season: &mut Season,
    date: NaiveDate,
    mut working: BTreeMap<String, MobTrophyPoints>,
    config: &ScoringConfig,
) {
    if !config.use_teams {
        return;
    }

    table.order_by_finishing_time();

    for entry in table.entries() {
        if !entry.has_club() {
            continue;
        }

        match working.get_mut(&entry.club) {
            Some(club) => club.add_new_result(
                entry.points.position_points,
                entry.first_timer,
                entry.season_best,
            ),
            None => debug!(club = %entry.club, "Club not registered, skipping Mob Trophy result"),
        }
    }

    for club in working.values() {
        season.add_new_mob_trophy_points(&club.club_name, club.to_common_points(date));
    }
}
