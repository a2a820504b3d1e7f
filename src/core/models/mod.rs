pub mod profile;
pub mod usage;
