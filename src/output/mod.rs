pub mod formatter;

pub use formatter::{
    format_average_points, format_club_standings, format_points_table, format_results_table,
    should_use_colors,
};
