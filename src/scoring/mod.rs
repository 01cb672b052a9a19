pub mod config;
pub mod engine;
pub mod mob_trophy;
pub mod placings;
pub mod position;
pub mod team_trophy;
pub mod validation;

pub use config::*;
pub use engine::{CalculationError, CalculationSummary, ResultsCalculator};
pub use team_trophy::{CommonTeamTrophyPoints, TeamTrophyEvent};
pub use validation::validate_results_config;

#[cfg(test)]
pub(crate) fn test_scoring_config() -> ScoringConfig {
    ScoringConfig {
        finishing_points: 4,
        season_best_points: 2,
        scores_are_descending: true,
        number_of_scoring_positions: 10,
        exclude_first_timers: false,
        use_teams: true,
        number_in_team: 5,
        team_finishing_points: 4,
        team_season_best_points: 2,
        number_in_team_trophy_team: 4,
        team_trophy_points_table: vec![10, 8, 6, 4, 2],
        all_positions_shown: false,
    }
}
