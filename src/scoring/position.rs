use chrono::NaiveDate;
use tracing::warn;

use super::config::ScoringConfig;
use crate::results::EventResults;
use crate::season::Season;

/// Award position points in finishing order and record them in the season.
///
/// Only finished entries take part. Entries excluded by
/// [`ScoringConfig::position_score_to_be_counted`] do not use up a position.
pub fn add_position_points(
    table: &mut EventResults,
    season: &mut Season,
    date: NaiveDate,
    config: &ScoringConfig,
) {
    table.order_by_finishing_time();

    if config.scores_are_descending {
        add_position_points_descending(table, season, date, config);
    } else {
        add_position_points_ascending(table, season, date, config);
    }
}

/// Start at the number of scoring positions and count down to zero. Eligible
/// finishers past the last scoring place get 0, which is not recorded.
fn add_position_points_descending(
    table: &mut EventResults,
    season: &mut Season,
    date: NaiveDate,
    config: &ScoringConfig,
) {
    let mut position_point = config.number_of_scoring_positions;

    for entry in table.entries_mut() {
        if !entry.time.is_finished() || !config.position_score_to_be_counted(entry.first_timer) {
            continue;
        }
        if position_point == 0 {
            entry.points.position_points = Some(0);
            continue;
        }

        entry.points.position_points = Some(position_point);
        record(season, entry.key, date, position_point);
        position_point -= 1;
    }
}

fn add_position_points_ascending(
    table: &mut EventResults,
    season: &mut Season,
    date: NaiveDate,
    config: &ScoringConfig,
) {
    let mut position_point = 1;

    for entry in table.entries_mut() {
        if !entry.time.is_finished() || !config.position_score_to_be_counted(entry.first_timer) {
            continue;
        }

        entry.points.position_points = Some(position_point);
        record(season, entry.key, date, position_point);
        position_point += 1;
    }
}

fn record(season: &mut Season, key: u32, date: NaiveDate, points: u32) {
    if !season.update_position_points(key, date, points) {
        warn!(athlete = key, "Position points for athlete not in season roster");
    }
}
