pub mod config;
pub mod formatter;
pub mod ip;
pub mod models;
pub mod reconcile;
pub mod report;
pub mod store;
pub mod tracker;
