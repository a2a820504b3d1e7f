use anyhow::{Context, Result};

use crate::core::config::AppConfig;
use crate::core::models::profile::{DeviceOwnership, Profile};
use crate::core::reconcile::reconcile;
use crate::core::report::{self, ParseStats};

/// What one successful update pass found. Per-line parse failures are
/// silent and only surface here as counters.
#[derive(Debug, Clone, Copy)]
pub struct UpdateOutcome {
    pub stats: ParseStats,
    pub device_ip: Option<u32>,
}

/// Accept plain HTTP as well as HTTPS: router status pages on the local
/// network are commonly served without TLS.
pub fn validate_report_url(url: &str) -> Result<()> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        anyhow::bail!("Report URL must use http or https, got: {}", url);
    }
    Ok(())
}

/// Fetch the router's usage report and merge it into the profile list.
///
/// Any transport failure aborts before the profiles are touched; the list
/// is only mutated once the full body has been received.
pub async fn update(config: &AppConfig, profiles: &mut Vec<Profile>) -> Result<UpdateOutcome> {
    validate_report_url(&config.router.url)?;

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(config.router.timeout_secs))
        .build()
        .context("Failed to build HTTP client")?;

    let response = client
        .get(&config.router.url)
        .send()
        .await
        .context("Failed to fetch usage report")?;

    if !response.status().is_success() {
        anyhow::bail!("Router returned HTTP {}", response.status().as_u16());
    }

    let body = response
        .text()
        .await
        .context("Failed to read usage report body")?;

    Ok(apply_report(&body, profiles))
}

/// The synchronous half of an update: reset the per-pass flags, run the
/// tokenizer and aggregator over every line, and reconcile the result.
pub fn apply_report(body: &str, profiles: &mut Vec<Profile>) -> UpdateOutcome {
    for profile in profiles.iter_mut() {
        profile.updated = false;
        profile.device = DeviceOwnership::None;
    }

    let report = report::parse(body);
    let outcome = UpdateOutcome {
        stats: report.stats,
        device_ip: report.device_ip,
    };
    reconcile(profiles, &report);
    outcome
}
