pub mod cli;
pub mod config;
pub mod geo;
pub mod logging;
pub mod map;
pub mod persistence;
pub mod round;
pub mod search;
pub mod store;
