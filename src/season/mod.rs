pub mod storage;
pub mod types;

pub use storage::{get_season_path, load_event, load_model, JsonModelStore, ModelStore};
pub use types::{
    format_race_number, AppearanceTime, AthleteDetails, AthleteRegistry, AthleteSeasonDetails,
    AthleteSeasonPoints, AthleteTeamTrophyPoints, ClubSeasonDetails, CommonPoints, DatedPoints,
    EventDetails, HandicapModel, Season,
};
