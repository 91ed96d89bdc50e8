pub mod client;
pub mod config;
pub mod health;
pub mod humanize;
pub mod poller;
pub mod prefs;
pub mod view;
