use super::config::ResultsConfig;

/// Validate the results configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_results_config(config: Option<&ResultsConfig>) -> Result<(), Vec<String>> {
    let Some(config) = config else {
        return Err(vec!["results: section is missing".to_string()]);
    };

    let mut errors = Vec::new();

    match &config.team_trophy_points {
        None => errors.push("results.team_trophy_points: must be set".to_string()),
        Some(points) if points.is_empty() => {
            errors.push("results.team_trophy_points: must not be empty".to_string())
        }
        Some(_) => {}
    }

    if config.team_trophy_team_size == 0 {
        errors.push("results.team_trophy_team_size: must be at least 1".to_string());
    }

    if config.use_teams && config.team_size == 0 {
        errors.push("results.team_size: must be at least 1 when use_teams is set".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        assert!(validate_results_config(Some(&ResultsConfig::default())).is_ok());
    }

    #[test]
    fn test_missing_section() {
        let errors = validate_results_config(None).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("results:"));
    }

    #[test]
    fn test_empty_points_table() {
        let config = ResultsConfig {
            team_trophy_points: Some(vec![]),
            ..ResultsConfig::default()
        };
        let errors = validate_results_config(Some(&config)).unwrap_err();
        assert!(errors[0].contains("results.team_trophy_points"));
    }

    #[test]
    fn test_team_size_only_checked_with_teams() {
        let config = ResultsConfig {
            use_teams: false,
            team_size: 0,
            ..ResultsConfig::default()
        };
        assert!(validate_results_config(Some(&config)).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let config = ResultsConfig {
            team_trophy_points: None,   // Error 1
            team_trophy_team_size: 0,   // Error 2
            use_teams: true,
            team_size: 0,               // Error 3
            ..ResultsConfig::default()
        };
        let errors = validate_results_config(Some(&config)).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
