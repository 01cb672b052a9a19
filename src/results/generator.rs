use tracing::warn;

use super::types::{EntryPoints, EventResults, RawResult, ResultsTableEntry};
use crate::scoring::ScoringConfig;
use crate::season::HandicapModel;
use chrono::NaiveDate;

/// Turns raw finish records into table entries using the athlete registry
/// and season history.
pub trait TableGenerator {
    fn generate(
        &self,
        raw_results: &[RawResult],
        model: &HandicapModel,
        date: NaiveDate,
        config: &ScoringConfig,
    ) -> EventResults;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StandardTableGenerator;

impl TableGenerator for StandardTableGenerator {
    fn generate(
        &self,
        raw_results: &[RawResult],
        model: &HandicapModel,
        date: NaiveDate,
        config: &ScoringConfig,
    ) -> EventResults {
        let mut table = EventResults::default();

        for raw in raw_results {
            let Some(athlete) = model
                .athletes
                .get_athlete_key(raw.race_number)
                .and_then(|key| model.athletes.athlete(key))
            else {
                warn!(race_number = raw.race_number, "No athlete registered for race number");
                continue;
            };

            let finished = raw.time.is_finished();
            let running_secs = raw
                .time
                .elapsed_secs
                .map(|secs| secs.saturating_sub(athlete.handicap_secs));

            // A first run of the season has nothing to beat.
            let season_best = finished
                && match (
                    running_secs,
                    model
                        .season
                        .athlete(athlete.key)
                        .and_then(|a| a.best_time_before(date)),
                ) {
                    (Some(running), Some(best)) => running < best,
                    _ => false,
                };

            table.push(ResultsTableEntry {
                key: athlete.key,
                name: athlete.name.clone(),
                race_number: raw.race_number,
                sex: athlete.sex,
                club: athlete.club.clone(),
                time: raw.time,
                handicap_secs: athlete.handicap_secs,
                running_secs,
                speed_order: None,
                points: EntryPoints {
                    finishing_points: if finished { config.finishing_points } else { 0 },
                    position_points: None,
                    best_points: if season_best { config.season_best_points } else { 0 },
                },
                team_trophy_points: 0,
                extra_info: None,
                first_timer: model.athletes.is_first_timer(athlete.key),
                season_best,
            });
        }

        table
    }
}
