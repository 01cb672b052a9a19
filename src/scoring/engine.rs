use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{error, info};

use super::config::{ConfigError, ResultsConfig, ScoringConfig, SeriesConfig};
use super::mob_trophy::{assign_mob_trophy_points, setup_mob_trophy_points};
use super::placings::add_placings;
use super::position::add_position_points;
use super::team_trophy::{calculate_team_trophy_points, TeamTrophyEvent};
use crate::notify::NotificationSink;
use crate::results::{RawResult, TableGenerator};
use crate::season::{EventDetails, HandicapModel, ModelStore};

pub const MSG_START: &str = "Calculate Results";
pub const MSG_INVALID_CONFIG: &str = "Can't calculate results - invalid config";
pub const MSG_CHECK_CONFIG: &str = "Can't calculate results - check config";
pub const MSG_TERMINATED: &str = "Calculate Results - Terminated";
pub const MSG_COMPLETED: &str = "Calculate Results - Completed";

#[derive(Debug, Error)]
pub enum CalculationError {
    #[error("can't calculate results: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Persist(#[from] anyhow::Error),
}

/// What one calculation produced, beyond the state written into the model.
#[derive(Debug, Clone)]
pub struct CalculationSummary {
    pub entries: usize,
    pub is_relay_event: bool,
    pub team_trophy: BTreeMap<String, TeamTrophyEvent>,
}

/// Runs every scoring pass over one event, in order, then persists.
pub struct ResultsCalculator<G> {
    results_config: Option<ResultsConfig>,
    series_config: SeriesConfig,
    generator: G,
}

impl<G: TableGenerator> ResultsCalculator<G> {
    pub fn new(
        results_config: Option<ResultsConfig>,
        series_config: SeriesConfig,
        generator: G,
    ) -> Self {
        Self {
            results_config,
            series_config,
            generator,
        }
    }

    /// Calculate the results for `event`.
    ///
    /// Configuration problems are reported to `sink` and returned before
    /// anything in `model` or `event` is touched.
    pub fn calculate<S, N>(
        &self,
        model: &mut HandicapModel,
        event: &mut EventDetails,
        store: &S,
        sink: &mut N,
    ) -> Result<CalculationSummary, CalculationError>
    where
        S: ModelStore + ?Sized,
        N: NotificationSink + ?Sized,
    {
        info!(event = %event.name, date = %event.date, "Calculate results");
        sink.progress(MSG_START);

        let config = match ScoringConfig::resolve(self.results_config.as_ref(), &self.series_config)
        {
            Ok(config) => config,
            Err(e) => {
                match e {
                    ConfigError::MissingResultsConfig => {
                        error!("Error reading the results config. Results not generated");
                        sink.error(MSG_INVALID_CONFIG);
                    }
                    ConfigError::MissingTeamTrophyPoints => {
                        error!("Can't calculate results, Team Trophy points are invalid");
                        sink.error(MSG_CHECK_CONFIG);
                    }
                }
                sink.progress(MSG_TERMINATED);
                return Err(e.into());
            }
        };

        let date = event.date;
        if model.season.has_results_for(date) {
            info!(%date, "Replacing earlier results for this date");
        }
        model.season.clear_results_for(date);

        let mob_trophy_points = setup_mob_trophy_points(&model.clubs, &config);

        register_all_athletes_for_the_current_season(model, &event.raw_results);

        let mut table = self
            .generator
            .generate(&event.raw_results, model, date, &config);

        table.apply_speed_order();

        add_position_points(&mut table, &mut model.season, date, &config);
        table.order_by_finishing_time();
        add_placings(&mut table, &config);
        assign_mob_trophy_points(
            &mut table,
            &mut model.season,
            date,
            mob_trophy_points,
            &config,
        );
        let team_trophy =
            calculate_team_trophy_points(&mut table, &mut model.season, date, &config);

        model.season.record_event_results(&table, date);

        let summary = CalculationSummary {
            entries: table.len(),
            is_relay_event: table.is_relay_event(),
            team_trophy,
        };
        event.set_results_table(table);

        store.save_all(model, event)?;

        info!(entries = summary.entries, "Calculate results completed");
        sink.progress(MSG_COMPLETED);

        Ok(summary)
    }
}

/// Add a season record for every registered athlete in the raw results who
/// does not have one yet.
fn register_all_athletes_for_the_current_season(model: &mut HandicapModel, raw_results: &[RawResult]) {
    for raw in raw_results {
        let Some(key) = model.athletes.get_athlete_key(raw.race_number) else {
            continue;
        };

        if !model.season.contains_athlete(key) {
            let name = model
                .athletes
                .get_athlete_name(key)
                .unwrap_or_default()
                .to_string();
            let first_timer = model.athletes.is_first_timer(key);
            model.season.add_new_athlete(key, name, first_timer);
        }
    }
}
