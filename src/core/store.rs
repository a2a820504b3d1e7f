use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::config::AppConfig;
use crate::core::ip;
use crate::core::models::profile::Profile;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read profile store: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse profile store: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// One persisted profile record. Usage figures and deltas are never
/// persisted; they are repopulated by the next update.
#[derive(Debug, Serialize, Deserialize)]
struct ProfileRecord {
    ip_range: String,
    name: String,
    active: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ProfileFile {
    profiles: Vec<ProfileRecord>,
}

pub fn profiles_path() -> PathBuf {
    AppConfig::config_dir().join("profiles.json")
}

/// Load the persisted profile list. A missing file is an empty list;
/// records whose range text does not parse are skipped.
pub fn load() -> Result<Vec<Profile>, StoreError> {
    let path = profiles_path();
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(&path)?;
    let file: ProfileFile = serde_json::from_str(&content)?;
    Ok(from_records(file))
}

/// Write the profile list back out, ranges normalized through the codec.
pub fn save(profiles: &[Profile]) -> Result<PathBuf, StoreError> {
    let file = ProfileFile {
        profiles: profiles
            .iter()
            .map(|p| ProfileRecord {
                ip_range: ip::format_range(p.min_ip, p.max_ip),
                name: p.name.clone(),
                active: p.visible,
            })
            .collect(),
    };

    let path = profiles_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, serde_json::to_string_pretty(&file)?)?;
    Ok(path)
}

fn from_records(file: ProfileFile) -> Vec<Profile> {
    file.profiles
        .into_iter()
        .filter_map(|record| {
            let (min_ip, max_ip) = ip::parse_range(&record.ip_range)?;
            Some(Profile::from_range(
                min_ip,
                max_ip,
                record.name,
                record.active,
            ))
        })
        .collect()
}
