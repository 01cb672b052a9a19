use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::results::{EventResults, TEAM_TROPHY_NO_SCORE};
use crate::season::{AthleteSeasonDetails, Season};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Name column width for the current terminal.
fn name_width(fixed_width: usize) -> usize {
    const DEFAULT_NAME_WIDTH: usize = 24;
    match get_terminal_width() {
        Some(width) if width > fixed_width + 10 => (width - fixed_width).min(DEFAULT_NAME_WIDTH),
        Some(_) => 10,
        None => DEFAULT_NAME_WIDTH,
    }
}

/// Average points per run, up to two decimal places ("0.##").
pub fn format_average_points(total: u32, appearances: usize) -> String {
    if appearances == 0 {
        return "0".to_string();
    }
    let formatted = format!("{:.2}", total as f64 / appearances as f64);
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Format the finished table, one line per entry in its current order.
/// Columns: place, name, club, time, speed order, position points, team points, placing
pub fn format_results_table(table: &EventResults, use_colors: bool) -> String {
    if table.is_empty() {
        return "No results found.".to_string();
    }

    let fixed_width = 4 + 16 + 8 + 4 + 4 + 4 + 12 + 14;
    let width = name_width(fixed_width);

    table
        .entries()
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let place = format!("{:>3}.", idx + 1);
            let name = format!("{:<width$}", truncate_name(&entry.name, width), width = width);
            let club = if entry.has_club() { entry.club.as_str() } else { "-" };
            let speed = entry
                .speed_order
                .map_or_else(|| "-".to_string(), |s| s.to_string());
            let position = entry
                .points
                .position_points
                .map_or_else(|| "-".to_string(), |p| p.to_string());
            let team = if entry.team_trophy_points == TEAM_TROPHY_NO_SCORE {
                "-".to_string()
            } else {
                entry.team_trophy_points.to_string()
            };
            let placing = entry.extra_info.as_deref().unwrap_or("");
            let time = entry.time.to_string();

            if use_colors {
                format!(
                    "{} {} {:<16} {:>7} {:>3} {:>3} {:>3}  {}",
                    place.dimmed(),
                    name.bold(),
                    club.cyan(),
                    time,
                    speed,
                    position.green(),
                    team.yellow(),
                    placing.bold()
                )
            } else {
                format!(
                    "{} {} {:<16} {:>7} {:>3} {:>3} {:>3}  {}",
                    place, name, club, time, speed, position, team, placing
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Season points table ordered by total, best first.
///
/// With descending scores the highest total leads; otherwise the lowest.
pub fn format_points_table(season: &Season, scores_are_descending: bool, use_colors: bool) -> String {
    if season.athletes.is_empty() {
        return "No athletes registered for this season.".to_string();
    }

    let mut rows: Vec<&AthleteSeasonDetails> = season.athletes.iter().collect();
    rows.sort_by(|a, b| {
        let ordering = b.points.total().cmp(&a.points.total());
        let ordering = if scores_are_descending {
            ordering
        } else {
            ordering.reverse()
        };
        ordering.then_with(|| a.name.cmp(&b.name))
    });

    let width = name_width(4 + 6 * 5 + 8);

    rows.iter()
        .enumerate()
        .map(|(idx, athlete)| {
            let points = &athlete.points;
            let name = format!("{:<width$}", truncate_name(&athlete.name, width), width = width);
            let average =
                format_average_points(points.total(), athlete.number_of_appearances());
            let line = format!(
                "{:>5} {:>5} {:>5} {:>5} {:>5} {:>6}",
                points.total(),
                points.finishing_total(),
                points.position_total(),
                points.best_total(),
                athlete.number_of_appearances(),
                average
            );

            if use_colors {
                format!("{} {} {}", format!("{:>3}.", idx + 1).dimmed(), name.bold(), line)
            } else {
                format!("{:>3}. {} {}", idx + 1, name, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Club totals: Mob Trophy points and summed Team Trophy scores.
pub fn format_club_standings(season: &Season, use_colors: bool) -> String {
    if season.clubs.is_empty() {
        return "No club results yet.".to_string();
    }

    let mut clubs: Vec<_> = season.clubs.iter().collect();
    clubs.sort_by(|a, b| {
        b.team_trophy_total()
            .cmp(&a.team_trophy_total())
            .then_with(|| b.mob_trophy_total().cmp(&a.mob_trophy_total()))
            .then_with(|| a.name.cmp(&b.name))
    });

    clubs
        .iter()
        .map(|club| {
            let name = format!("{:<20}", truncate_name(&club.name, 20));
            let mob = club.mob_trophy_total().to_string();
            let team = club.team_trophy_total().to_string();
            if use_colors {
                format!("{}  Mob: {:>5}  Team: {:>5}", name.cyan(), mob.bold(), team.bold())
            } else {
                format!("{}  Mob: {:>5}  Team: {:>5}", name, mob, team)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
