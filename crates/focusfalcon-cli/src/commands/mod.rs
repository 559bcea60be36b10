pub mod avatar;
pub mod config;
pub mod focus;
pub mod schedule;
pub mod sites;
pub mod state;
