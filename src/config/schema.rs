use serde::{Deserialize, Serialize};

use crate::scoring::{ResultsConfig, SeriesConfig};

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Left out entirely, results can't be calculated.
    #[serde(default)]
    pub results: Option<ResultsConfig>,
    #[serde(default)]
    pub series: SeriesConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
results:
  finishing_points: 4
  season_best_points: 2
  scoring_positions: 10
  team_finishing_points: 4
  team_size: 5
  team_season_best_points: 2
  use_teams: true
  scores_are_descending: true
  exclude_first_timers: true
  team_trophy_team_size: 4
  team_trophy_points: [10, 8, 6]
series:
  all_positions_shown: true
  number_prefix: "A"
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        let results = config.results.unwrap();
        assert!(results.exclude_first_timers);
        assert_eq!(results.team_trophy_points, Some(vec![10, 8, 6]));
        assert!(config.series.all_positions_shown);
        assert_eq!(config.series.number_prefix, "A");
    }

    #[test]
    fn test_series_only_config_has_no_results() {
        let yaml = r#"
series:
  number_prefix: "B"
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert!(config.results.is_none());
        assert!(!config.series.all_positions_shown);
    }
}
