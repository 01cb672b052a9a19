use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::results::{EventResults, RaceTime, RawResult, Sex};
use crate::scoring::team_trophy::TeamTrophyEvent;

/// Long-lived athlete record held across seasons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AthleteDetails {
    pub key: u32,
    pub name: String,
    #[serde(default)]
    pub sex: Sex,
    #[serde(default)]
    pub club: String,
    pub race_number: u32,
    #[serde(default)]
    pub handicap_secs: u32,
    #[serde(default = "default_first_timer")]
    pub first_timer: bool,
}

fn default_first_timer() -> bool {
    true
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AthleteRegistry {
    #[serde(default)]
    pub athletes: Vec<AthleteDetails>,
}

impl AthleteRegistry {
    pub fn get_athlete_key(&self, race_number: u32) -> Option<u32> {
        self.athletes
            .iter()
            .find(|a| a.race_number == race_number)
            .map(|a| a.key)
    }

    pub fn athlete(&self, key: u32) -> Option<&AthleteDetails> {
        self.athletes.iter().find(|a| a.key == key)
    }

    pub fn get_athlete_name(&self, key: u32) -> Option<&str> {
        self.athlete(key).map(|a| a.name.as_str())
    }

    /// Unknown athletes are treated as first timers.
    pub fn is_first_timer(&self, key: u32) -> bool {
        self.athlete(key).map_or(true, |a| a.first_timer)
    }

    pub fn next_available_race_number(&self) -> u32 {
        self.athletes
            .iter()
            .map(|a| a.race_number)
            .max()
            .map_or(1, |n| n + 1)
    }
}

/// Race number as printed on the next-runner sheet, e.g. "A000042".
pub fn format_race_number(prefix: &str, number: u32) -> String {
    format!("{}{:06}", prefix, number)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatedPoints {
    pub points: u32,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AthleteSeasonPoints {
    #[serde(default)]
    pub finishing_points: Vec<DatedPoints>,
    #[serde(default)]
    pub position_points: Vec<DatedPoints>,
    #[serde(default)]
    pub best_points: Vec<DatedPoints>,
}

fn upsert(points: &mut Vec<DatedPoints>, date: NaiveDate, value: u32) {
    match points.iter_mut().find(|p| p.date == date) {
        Some(existing) => existing.points = value,
        None => points.push(DatedPoints {
            points: value,
            date,
        }),
    }
}

fn sum(points: &[DatedPoints]) -> u32 {
    points.iter().map(|p| p.points).sum()
}

impl AthleteSeasonPoints {
    pub fn finishing_total(&self) -> u32 {
        sum(&self.finishing_points)
    }

    pub fn position_total(&self) -> u32 {
        sum(&self.position_points)
    }

    pub fn best_total(&self) -> u32 {
        sum(&self.best_points)
    }

    pub fn total(&self) -> u32 {
        self.finishing_total() + self.position_total() + self.best_total()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppearanceTime {
    pub time: RaceTime,
    /// Clock time less the handicap on the day.
    #[serde(default)]
    pub running_secs: Option<u32>,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AthleteTeamTrophyPoints {
    pub points: i32,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AthleteSeasonDetails {
    pub key: u32,
    pub name: String,
    #[serde(default)]
    pub first_timer: bool,
    #[serde(default)]
    pub points: AthleteSeasonPoints,
    #[serde(default)]
    pub times: Vec<AppearanceTime>,
    /// Append-only, one record per event.
    #[serde(default)]
    pub team_trophy_points: Vec<AthleteTeamTrophyPoints>,
}

impl AthleteSeasonDetails {
    pub fn new(key: u32, name: impl Into<String>, first_timer: bool) -> Self {
        Self {
            key,
            name: name.into(),
            first_timer,
            points: AthleteSeasonPoints::default(),
            times: Vec::new(),
            team_trophy_points: Vec::new(),
        }
    }

    pub fn number_of_appearances(&self) -> usize {
        self.times.len()
    }

    /// Fastest finished running time recorded before `date`.
    pub fn best_time_before(&self, date: NaiveDate) -> Option<u32> {
        self.times
            .iter()
            .filter(|t| t.date < date && t.time.is_finished())
            .filter_map(|t| t.running_secs)
            .min()
    }

    pub fn add_team_trophy_event(&mut self, points: AthleteTeamTrophyPoints) {
        self.team_trophy_points.push(points);
    }

    fn record_time(&mut self, time: RaceTime, running_secs: Option<u32>, date: NaiveDate) {
        match self.times.iter_mut().find(|t| t.date == date) {
            Some(existing) => {
                existing.time = time;
                existing.running_secs = running_secs;
            }
            None => self.times.push(AppearanceTime {
                time,
                running_secs,
                date,
            }),
        }
    }
}

/// One club's Mob Trophy contribution for a single event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonPoints {
    pub finishing_points: u32,
    pub position_points: u32,
    pub best_points: u32,
    pub date: NaiveDate,
}

impl CommonPoints {
    pub fn total(&self) -> u32 {
        self.finishing_points + self.position_points + self.best_points
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClubSeasonDetails {
    pub name: String,
    #[serde(default)]
    pub mob_trophy: Vec<CommonPoints>,
    #[serde(default)]
    pub team_trophy: Vec<TeamTrophyEvent>,
}

impl ClubSeasonDetails {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mob_trophy: Vec::new(),
            team_trophy: Vec::new(),
        }
    }

    pub fn mob_trophy_total(&self) -> u32 {
        self.mob_trophy.iter().map(CommonPoints::total).sum()
    }

    pub fn team_trophy_total(&self) -> u32 {
        self.team_trophy.iter().map(|e| e.score).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub athletes: Vec<AthleteSeasonDetails>,
    #[serde(default)]
    pub clubs: Vec<ClubSeasonDetails>,
}

impl Season {
    pub fn athlete(&self, key: u32) -> Option<&AthleteSeasonDetails> {
        self.athletes.iter().find(|a| a.key == key)
    }

    pub fn athlete_mut(&mut self, key: u32) -> Option<&mut AthleteSeasonDetails> {
        self.athletes.iter_mut().find(|a| a.key == key)
    }

    pub fn contains_athlete(&self, key: u32) -> bool {
        self.athlete(key).is_some()
    }

    pub fn add_new_athlete(&mut self, key: u32, name: impl Into<String>, first_timer: bool) {
        if !self.contains_athlete(key) {
            self.athletes
                .push(AthleteSeasonDetails::new(key, name, first_timer));
        }
    }

    pub fn club(&self, name: &str) -> Option<&ClubSeasonDetails> {
        self.clubs.iter().find(|c| c.name == name)
    }

    fn club_entry(&mut self, name: &str) -> &mut ClubSeasonDetails {
        let index = match self.clubs.iter().position(|c| c.name == name) {
            Some(index) => index,
            None => {
                self.clubs.push(ClubSeasonDetails::new(name));
                self.clubs.len() - 1
            }
        };
        &mut self.clubs[index]
    }

    /// Returns false when the athlete is not in the season roster.
    pub fn update_position_points(&mut self, key: u32, date: NaiveDate, points: u32) -> bool {
        match self.athlete_mut(key) {
            Some(athlete) => {
                upsert(&mut athlete.points.position_points, date, points);
                true
            }
            None => false,
        }
    }

    pub fn add_new_mob_trophy_points(&mut self, club: &str, points: CommonPoints) {
        self.club_entry(club).mob_trophy.push(points);
    }

    pub fn add_new_club_points(&mut self, club: &str, event: TeamTrophyEvent) {
        self.club_entry(club).team_trophy.push(event);
    }

    /// Store each athlete's time plus finishing and season-best points for `date`.
    pub fn record_event_results(&mut self, table: &EventResults, date: NaiveDate) {
        for entry in table.entries() {
            if let Some(athlete) = self.athlete_mut(entry.key) {
                athlete.record_time(entry.time, entry.running_secs, date);
                upsert(
                    &mut athlete.points.finishing_points,
                    date,
                    entry.points.finishing_points,
                );
                if entry.points.best_points > 0 {
                    upsert(&mut athlete.points.best_points, date, entry.points.best_points);
                }
            }
        }
    }

    pub fn has_results_for(&self, date: NaiveDate) -> bool {
        self.athletes
            .iter()
            .any(|a| a.times.iter().any(|t| t.date == date))
            || self
                .clubs
                .iter()
                .any(|c| c.mob_trophy.iter().any(|p| p.date == date))
    }

    /// Remove every athlete and club record dated `date`, so the event can be
    /// calculated again without counting it twice.
    pub fn clear_results_for(&mut self, date: NaiveDate) {
        for athlete in &mut self.athletes {
            athlete.times.retain(|t| t.date != date);
            athlete.team_trophy_points.retain(|p| p.date != date);
            let points = &mut athlete.points;
            points.finishing_points.retain(|p| p.date != date);
            points.position_points.retain(|p| p.date != date);
            points.best_points.retain(|p| p.date != date);
        }
        for club in &mut self.clubs {
            club.mob_trophy.retain(|p| p.date != date);
            club.team_trophy.retain(|e| e.date != date);
        }
    }
}

/// One event's input and, once calculated, its finished table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDetails {
    pub name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub raw_results: Vec<RawResult>,
    #[serde(default)]
    pub results_table: Option<EventResults>,
}

impl EventDetails {
    pub fn set_results_table(&mut self, table: EventResults) {
        self.results_table = Some(table);
    }
}

/// Everything a calculation reads from and writes back to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandicapModel {
    #[serde(default)]
    pub athletes: AthleteRegistry,
    /// Clubs known to the series, whether or not they have season history yet.
    #[serde(default)]
    pub clubs: Vec<String>,
    #[serde(default)]
    pub season: Season,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn athlete(key: u32, race_number: u32) -> AthleteDetails {
        AthleteDetails {
            key,
            name: format!("Runner {}", key),
            sex: Sex::Female,
            club: String::new(),
            race_number,
            handicap_secs: 0,
            first_timer: false,
        }
    }

    #[test]
    fn test_registry_lookups() {
        let registry = AthleteRegistry {
            athletes: vec![athlete(1, 101), athlete(2, 250)],
        };
        assert_eq!(registry.get_athlete_key(250), Some(2));
        assert_eq!(registry.get_athlete_key(999), None);
        assert_eq!(registry.get_athlete_name(1), Some("Runner 1"));
        assert!(!registry.is_first_timer(1));
        assert!(registry.is_first_timer(42));
        assert_eq!(registry.next_available_race_number(), 251);
    }

    #[test]
    fn test_next_race_number_empty_registry() {
        assert_eq!(AthleteRegistry::default().next_available_race_number(), 1);
    }

    #[test]
    fn test_format_race_number() {
        assert_eq!(format_race_number("A", 42), "A000042");
        assert_eq!(format_race_number("", 1234567), "1234567");
    }

    #[test]
    fn test_update_position_points_upserts_by_date() {
        let mut season = Season::default();
        season.add_new_athlete(7, "Runner 7", false);

        assert!(season.update_position_points(7, date(1), 10));
        assert!(season.update_position_points(7, date(1), 8));
        assert!(season.update_position_points(7, date(8), 5));
        assert!(!season.update_position_points(99, date(1), 3));

        let points = &season.athlete(7).unwrap().points;
        assert_eq!(points.position_points.len(), 2);
        assert_eq!(points.position_total(), 13);
    }

    #[test]
    fn test_add_new_athlete_ignores_duplicates() {
        let mut season = Season::default();
        season.add_new_athlete(1, "First", true);
        season.add_new_athlete(1, "Second", false);
        assert_eq!(season.athletes.len(), 1);
        assert_eq!(season.athlete(1).unwrap().name, "First");
    }

    #[test]
    fn test_club_history_is_appended() {
        let mut season = Season::default();
        let points = CommonPoints {
            finishing_points: 4,
            position_points: 10,
            best_points: 2,
            date: date(1),
        };
        season.add_new_mob_trophy_points("Harriers", points);
        season.add_new_mob_trophy_points("Harriers", CommonPoints { date: date(8), ..points });

        let club = season.club("Harriers").unwrap();
        assert_eq!(club.mob_trophy.len(), 2);
        assert_eq!(club.mob_trophy_total(), 32);
        assert!(season.has_results_for(date(8)));
        assert!(!season.has_results_for(date(15)));
    }

    #[test]
    fn test_clear_results_for_only_touches_that_date() {
        let mut season = Season::default();
        season.add_new_athlete(1, "Runner 1", false);
        let mut entry = crate::results::types::test_entry(1, "Harriers", RaceTime::finished(600));
        entry.points.finishing_points = 4;
        let table = EventResults::new(vec![entry]);
        for day in [1, 8] {
            season.record_event_results(&table, date(day));
            season.update_position_points(1, date(day), 5);
            season.add_new_mob_trophy_points(
                "Harriers",
                CommonPoints {
                    finishing_points: 4,
                    position_points: 5,
                    best_points: 0,
                    date: date(day),
                },
            );
            season.add_new_club_points("Harriers", TeamTrophyEvent::new(date(day), 1));
            season.athlete_mut(1).unwrap().add_team_trophy_event(AthleteTeamTrophyPoints {
                points: 1,
                date: date(day),
            });
        }

        season.clear_results_for(date(8));

        assert!(season.has_results_for(date(1)));
        assert!(!season.has_results_for(date(8)));
        let athlete = season.athlete(1).unwrap();
        assert_eq!(athlete.number_of_appearances(), 1);
        assert_eq!(athlete.points.total(), 4 + 5);
        assert_eq!(athlete.team_trophy_points.len(), 1);
        let club = season.club("Harriers").unwrap();
        assert_eq!(club.mob_trophy_total(), 9);
        assert_eq!(club.team_trophy.len(), 1);
    }

    #[test]
    fn test_best_time_before_ignores_later_and_unfinished() {
        let mut details = AthleteSeasonDetails::new(1, "Runner", false);
        details.record_time(RaceTime::finished(700), Some(700), date(1));
        details.record_time(RaceTime::did_not_finish(), None, date(8));
        details.record_time(RaceTime::finished(660), Some(600), date(15));

        assert_eq!(details.best_time_before(date(1)), None);
        assert_eq!(details.best_time_before(date(15)), Some(700));
        assert_eq!(details.best_time_before(date(22)), Some(600));
    }
}
