pub mod generator;
pub mod types;

pub use generator::{StandardTableGenerator, TableGenerator};
pub use types::{
    EntryPoints, EventResults, FinishStatus, RaceTime, RawResult, ResultsTableEntry, Sex,
    TEAM_TROPHY_NO_SCORE,
};
