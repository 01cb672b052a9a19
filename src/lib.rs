pub mod config;
pub mod notify;
pub mod output;
pub mod results;
pub mod scoring;
pub mod season;
