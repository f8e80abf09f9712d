pub mod config;
pub mod map;
pub mod prefs;
pub mod session;
