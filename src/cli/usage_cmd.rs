use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::output::{OutputFormat, OutputOptions};
use crate::cli::renderer;
use crate::core::config::AppConfig;
use crate::core::ip::{format_address, format_range};
use crate::core::models::profile::{DeviceOwnership, Profile};
use crate::core::store;
use crate::core::tracker::{self, UpdateOutcome};

/// Flat, serialization-friendly view of one profile for `--json` output.
#[derive(Serialize)]
struct ProfilePayload {
    range: String,
    name: String,
    visible: bool,
    updated: bool,
    device: bool,
    used_bytes: u64,
    limit_bytes: u64,
    used_percent: f64,
    /// Bytes consumed between the last two observations (intuitive sign).
    consumed_since_last: i64,
    /// Seconds between the last two observations.
    elapsed_secs: i64,
}

impl ProfilePayload {
    fn from_profile(profile: &Profile) -> Self {
        Self {
            range: format_range(profile.min_ip, profile.max_ip),
            name: profile.name.clone(),
            visible: profile.visible,
            updated: profile.updated,
            device: profile.device == DeviceOwnership::Owned,
            used_bytes: profile.current_usage.current,
            limit_bytes: profile.current_usage.max,
            used_percent: profile.current_usage.used_percent(),
            consumed_since_last: profile.consumed_since_last(),
            elapsed_secs: profile.elapsed_secs(),
        }
    }
}

pub async fn run(watch_secs: Option<u64>, show_all: bool, opts: &OutputOptions) -> Result<()> {
    let config = AppConfig::load().unwrap_or_default();
    let mut profiles = store::load().context("Failed to load profile store")?;

    match watch_secs {
        None => {
            update_once(&config, &mut profiles, show_all, opts).await?;
        }
        Some(secs) => {
            let interval = std::time::Duration::from_secs(secs.max(1));
            loop {
                if let Err(e) = update_once(&config, &mut profiles, show_all, opts).await {
                    eprintln!("Update failed: {:#}", e);
                }
                tokio::time::sleep(interval).await;
            }
        }
    }

    Ok(())
}

async fn update_once(
    config: &AppConfig,
    profiles: &mut Vec<Profile>,
    show_all: bool,
    opts: &OutputOptions,
) -> Result<()> {
    let outcome = tracker::update(config, profiles).await?;

    // Persist so freshly discovered ranges survive restarts. Usage figures
    // are never stored; they repopulate on the next update.
    if let Err(e) = store::save(profiles) {
        eprintln!("Warning: failed to save profiles: {}", e);
    }

    if opts.verbose {
        report_diagnostics(&outcome);
    }

    render(profiles, &outcome, show_all, opts)
}

fn report_diagnostics(outcome: &UpdateOutcome) {
    eprintln!(
        "Parsed {} quota lines ({} malformed lines skipped)",
        outcome.stats.accepted, outcome.stats.dropped
    );
    match outcome.device_ip {
        Some(ip) => eprintln!("Your IP: {}", format_address(ip)),
        None => eprintln!("Report did not announce a device IP"),
    }
}

fn render(
    profiles: &[Profile],
    outcome: &UpdateOutcome,
    show_all: bool,
    opts: &OutputOptions,
) -> Result<()> {
    match opts.format {
        OutputFormat::Text => {
            let sections: Vec<String> = profiles
                .iter()
                .filter(|p| show_all || p.visible)
                .map(|p| renderer::render_profile(p, opts.use_color))
                .collect();

            if sections.is_empty() {
                println!("No profiles to show. The next report may discover some,");
                println!("or add one with `qm profile add <RANGE> <NAME>`.");
            } else {
                println!("{}", sections.join("\n\n"));
            }
        }
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct Payload {
                device_ip: Option<String>,
                profiles: Vec<ProfilePayload>,
            }
            let payload = Payload {
                device_ip: outcome.device_ip.map(format_address),
                profiles: profiles.iter().map(ProfilePayload::from_profile).collect(),
            };
            let json = if opts.pretty {
                serde_json::to_string_pretty(&payload)?
            } else {
                serde_json::to_string(&payload)?
            };
            println!("{}", json);
        }
    }
    Ok(())
}
