use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Results configuration as written in the config file.
///
/// Example YAML:
/// ```yaml
/// results:
///   finishing_points: 4
///   season_best_points: 2
///   scoring_positions: 10
///   team_trophy_team_size: 4
///   team_trophy_points: [10, 8, 6, 4, 2]
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ResultsConfig {
    /// Points for every finisher
    pub finishing_points: u32,

    /// Points for running a season best
    pub season_best_points: u32,

    /// Number of positional scoring places (descending scheme only)
    pub scoring_positions: u32,

    pub team_finishing_points: u32,

    /// Number of runners per club counted for the Mob Trophy
    pub team_size: u32,

    pub team_season_best_points: u32,

    pub use_teams: bool,

    /// Descending: 1st gets `scoring_positions` points and it counts down to 0.
    /// Ascending: 1st gets 1, 2nd gets 2, and the lowest season total wins.
    pub scores_are_descending: bool,

    /// Keep first timers out of position points
    pub exclude_first_timers: bool,

    /// Number of runners per club counted for the Team Trophy
    pub team_trophy_team_size: u32,

    /// Score per Team Trophy standing, best team first. Left out, results
    /// can't be calculated.
    #[serde(default)]
    pub team_trophy_points: Option<Vec<u32>>,
}

impl Default for ResultsConfig {
    fn default() -> Self {
        Self {
            finishing_points: 4,
            season_best_points: 2,
            scoring_positions: 10,
            team_finishing_points: 4,
            team_size: 5,
            team_season_best_points: 2,
            use_teams: true,
            scores_are_descending: true,
            exclude_first_timers: false,
            team_trophy_team_size: 4,
            team_trophy_points: Some(vec![10, 8, 6, 4, 2]),
        }
    }
}

/// Series-wide settings that are not specific to the scoring rules.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SeriesConfig {
    /// Label second and third boy/girl separately instead of overall second/third
    #[serde(default)]
    pub all_positions_shown: bool,

    /// Prefix printed in front of race numbers
    #[serde(default)]
    pub number_prefix: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("results configuration is missing")]
    MissingResultsConfig,

    #[error("team trophy points table is missing or empty")]
    MissingTeamTrophyPoints,
}

/// Scoring rules fixed for the duration of one calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringConfig {
    pub finishing_points: u32,
    pub season_best_points: u32,
    pub scores_are_descending: bool,
    pub number_of_scoring_positions: u32,
    pub exclude_first_timers: bool,
    pub use_teams: bool,
    pub number_in_team: u32,
    pub team_finishing_points: u32,
    pub team_season_best_points: u32,
    pub number_in_team_trophy_team: u32,
    /// Never empty.
    pub team_trophy_points_table: Vec<u32>,
    pub all_positions_shown: bool,
}

impl ScoringConfig {
    pub fn resolve(
        results: Option<&ResultsConfig>,
        series: &SeriesConfig,
    ) -> Result<Self, ConfigError> {
        let results = results.ok_or(ConfigError::MissingResultsConfig)?;
        let table = match &results.team_trophy_points {
            Some(table) if !table.is_empty() => table.clone(),
            _ => return Err(ConfigError::MissingTeamTrophyPoints),
        };

        Ok(Self {
            finishing_points: results.finishing_points,
            season_best_points: results.season_best_points,
            scores_are_descending: results.scores_are_descending,
            number_of_scoring_positions: results.scoring_positions,
            exclude_first_timers: results.exclude_first_timers,
            use_teams: results.use_teams,
            number_in_team: results.team_size,
            team_finishing_points: results.team_finishing_points,
            team_season_best_points: results.team_season_best_points,
            number_in_team_trophy_team: results.team_trophy_team_size,
            team_trophy_points_table: table,
            all_positions_shown: series.all_positions_shown,
        })
    }

    /// Whether an entry may take position points.
    pub fn position_score_to_be_counted(&self, first_timer: bool) -> bool {
        !(self.exclude_first_timers && first_timer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_results_config() {
        let config = ResultsConfig::default();

        assert_eq!(config.finishing_points, 4);
        assert_eq!(config.scoring_positions, 10);
        assert!(config.scores_are_descending);
        assert_eq!(config.team_trophy_points, Some(vec![10, 8, 6, 4, 2]));
    }

    #[test]
    fn test_results_config_serde_roundtrip() {
        let config = ResultsConfig::default();
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: ResultsConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_results_config_parse() {
        let yaml = r#"
scoring_positions: 5
scores_are_descending: true
"#;
        let config: ResultsConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.scoring_positions, 5);
        assert!(config.scores_are_descending);
        // Keys left out keep their default values.
        assert!(config.use_teams);
        assert_eq!(config.finishing_points, 4);
        assert_eq!(config.team_size, 5);
        assert!(config.team_trophy_points.is_none());
    }

    #[test]
    fn test_team_trophy_only_config_keeps_defaults() {
        let yaml = r#"
team_trophy_points: [10, 8]
team_trophy_team_size: 4
"#;
        let config: ResultsConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(
            config,
            ResultsConfig {
                team_trophy_points: Some(vec![10, 8]),
                ..ResultsConfig::default()
            }
        );

        let scoring = ScoringConfig::resolve(Some(&config), &SeriesConfig::default()).unwrap();
        assert!(scoring.scores_are_descending);
        assert!(scoring.use_teams);
        assert_eq!(scoring.number_of_scoring_positions, 10);
        assert_eq!(scoring.finishing_points, 4);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "scoring_postions: 5\n";
        let result: Result<ResultsConfig, _> = serde_saphyr::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_copies_values() {
        let series = SeriesConfig {
            all_positions_shown: true,
            number_prefix: "A".to_string(),
        };
        let config = ScoringConfig::resolve(Some(&ResultsConfig::default()), &series).unwrap();
        assert_eq!(config.number_of_scoring_positions, 10);
        assert_eq!(config.number_in_team, 5);
        assert_eq!(config.number_in_team_trophy_team, 4);
        assert_eq!(config.team_trophy_points_table, vec![10, 8, 6, 4, 2]);
        assert!(config.all_positions_shown);
    }

    #[test]
    fn test_resolve_missing_results() {
        let result = ScoringConfig::resolve(None, &SeriesConfig::default());
        assert_eq!(result, Err(ConfigError::MissingResultsConfig));
    }

    #[test]
    fn test_resolve_missing_or_empty_points_table() {
        let mut results = ResultsConfig {
            team_trophy_points: None,
            ..ResultsConfig::default()
        };
        assert_eq!(
            ScoringConfig::resolve(Some(&results), &SeriesConfig::default()),
            Err(ConfigError::MissingTeamTrophyPoints)
        );

        results.team_trophy_points = Some(vec![]);
        assert_eq!(
            ScoringConfig::resolve(Some(&results), &SeriesConfig::default()),
            Err(ConfigError::MissingTeamTrophyPoints)
        );
    }

    #[test]
    fn test_position_score_to_be_counted() {
        let mut config =
            ScoringConfig::resolve(Some(&ResultsConfig::default()), &SeriesConfig::default())
                .unwrap();
        assert!(config.position_score_to_be_counted(true));
        config.exclude_first_timers = true;
        assert!(!config.position_score_to_be_counted(true));
        assert!(config.position_score_to_be_counted(false));
    }
}
