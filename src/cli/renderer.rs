use colored::{control, ColoredString, Colorize};

use crate::core::formatter::{
    format_bytes, format_bytes_signed, format_duration, format_rate, format_usage_bar,
};
use crate::core::ip::format_range;
use crate::core::models::profile::{DeviceOwnership, Profile};

const BAR_WIDTH: usize = 12;

/// Render a full profile block as a colored (or plain) string.
///
/// Layout:
/// ```text
///  LAN clients (192.168.1.1-192.168.1.50) [this device]
///   Quota     25% used [█████████░░░]
///             250.0 KB of 1.0 MB
///   Last      +12.3 KB in 5m 2s (41 B/s)
/// ```
pub fn render_profile(profile: &Profile, use_color: bool) -> String {
    control::set_override(use_color);

    let mut lines: Vec<String> = Vec::new();

    let range = format_range(profile.min_ip, profile.max_ip);
    let mut header = if profile.name == range {
        format!(" {}", profile.name)
    } else {
        format!(" {} ({})", profile.name, range)
    };
    if profile.device == DeviceOwnership::Owned {
        header.push_str(&format!(" {}", "[this device]".magenta()));
    }
    lines.push(header.bold().to_string());

    if !profile.updated {
        lines.push(format!("  {}", "no data this pass".dimmed()));
        return lines.join("\n");
    }

    let usage = &profile.current_usage;
    if usage.max > 0 {
        let used_percent = usage.used_percent();
        let percent_str = format!("{}% used", used_percent.round() as u64);
        let bar = format_usage_bar(used_percent, BAR_WIDTH);
        lines.push(format!(
            "  {}     {} {}",
            "Quota".cyan(),
            color_by_remaining(used_percent, &percent_str),
            bar.magenta()
        ));
        lines.push(format!(
            "            {} of {}",
            format_bytes(usage.current),
            format_bytes(usage.max)
        ));
    } else {
        lines.push(format!(
            "  {}     {} (no limit reported)",
            "Quota".cyan(),
            format_bytes(usage.current)
        ));
    }

    // Since-last-check line. Only meaningful once two observations exist;
    // a fresh profile's deltas are zero over a zero interval.
    let elapsed = profile.elapsed_secs();
    if elapsed > 0 {
        let consumed = profile.consumed_since_last();
        lines.push(format!(
            "  {}      {} in {} ({})",
            "Last".cyan(),
            format_bytes_signed(consumed),
            format_duration(elapsed),
            format_rate(consumed, elapsed)
        ));
    }

    lines.join("\n")
}

/// Color the percent string green/yellow/red based on remaining quota.
fn color_by_remaining(used_percent: f64, text: &str) -> ColoredString {
    let remaining = 100.0 - used_percent;
    if remaining >= 25.0 {
        text.green()
    } else if remaining >= 10.0 {
        text.yellow()
    } else {
        text.red()
    }
}
