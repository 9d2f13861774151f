pub mod best;
pub mod catalog;
pub mod challenge;
pub mod config;
pub mod favourite;
pub mod recent;
