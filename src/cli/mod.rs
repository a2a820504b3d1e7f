pub mod config_cmd;
pub mod output;
pub mod profile_cmd;
pub mod renderer;
pub mod usage_cmd;
