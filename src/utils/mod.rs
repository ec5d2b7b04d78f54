pub mod config;
pub mod embeds;
pub mod formatters;
pub mod fuzzy;
