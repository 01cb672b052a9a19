use super::types::{EventDetails, HandicapModel};
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Persistence seam invoked once, after a calculation has finished.
pub trait ModelStore {
    fn save_all(&self, model: &HandicapModel, event: &EventDetails) -> Result<()>;
}

/// Get the default season file path (~/.config/handicap-results/season.json)
pub fn get_season_path() -> Result<PathBuf> {
    Ok(crate::config::get_config_dir()?.join("season.json"))
}

/// Load the season model from a JSON file
///
/// A missing file yields an empty model so a new season can start from nothing.
pub fn load_model(path: &Path) -> Result<HandicapModel> {
    if !path.exists() {
        return Ok(HandicapModel::default());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open season file at {}", path.display()))?;

    serde_json::from_reader(file)
        .with_context(|| format!("Failed to load season file at {}", path.display()))
}

pub fn load_event(path: &Path) -> Result<EventDetails> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open event file at {}", path.display()))?;

    serde_json::from_reader(file)
        .with_context(|| format!("Failed to parse event file at {}", path.display()))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, value)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;

    file.commit()
        .with_context(|| format!("Failed to save {}", path.display()))?;

    Ok(())
}

/// Writes the season model and the event (with its results table) as pretty JSON.
pub struct JsonModelStore {
    pub season_path: PathBuf,
    pub event_path: PathBuf,
}

impl JsonModelStore {
    pub fn new(season_path: PathBuf, event_path: PathBuf) -> Self {
        Self {
            season_path,
            event_path,
        }
    }
}

impl ModelStore for JsonModelStore {
    fn save_all(&self, model: &HandicapModel, event: &EventDetails) -> Result<()> {
        write_json(&self.season_path, model)?;
        write_json(&self.event_path, event)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{RaceTime, RawResult};
    use chrono::NaiveDate;
    use std::env;

    #[test]
    fn test_load_missing_season_returns_empty() {
        let temp_path = env::temp_dir().join("handicap_results_test_missing_season.json");
        let _ = std::fs::remove_file(&temp_path);

        let model = load_model(&temp_path).unwrap();
        assert!(model.season.athletes.is_empty());
        assert!(model.clubs.is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let season_path = env::temp_dir().join("handicap_results_test_season.json");
        let event_path = env::temp_dir().join("handicap_results_test_event.json");
        let _ = std::fs::remove_file(&season_path);
        let _ = std::fs::remove_file(&event_path);

        let mut model = HandicapModel::default();
        model.clubs.push("Harriers".to_string());
        model.season.add_new_athlete(3, "Runner 3", true);

        let event = EventDetails {
            name: "Park 1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            raw_results: vec![RawResult {
                race_number: 12,
                time: RaceTime::finished(640),
            }],
            results_table: None,
        };

        let store = JsonModelStore::new(season_path.clone(), event_path.clone());
        store.save_all(&model, &event).unwrap();

        assert_eq!(load_model(&season_path).unwrap(), model);
        assert_eq!(load_event(&event_path).unwrap(), event);

        let _ = std::fs::remove_file(&season_path);
        let _ = std::fs::remove_file(&event_path);
    }

    #[test]
    fn test_load_event_reports_bad_json() {
        let path = env::temp_dir().join("handicap_results_test_bad_event.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_event(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse event file"));

        let _ = std::fs::remove_file(&path);
    }
}
