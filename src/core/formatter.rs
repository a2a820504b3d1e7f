/// Returns a human byte figure with decimal units: "250.0 KB", "1.0 GB".
/// Values under a kilobyte print as plain bytes.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

    if bytes < 1_000 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64;
    let mut unit = "B";
    for next in UNITS {
        if value < 1_000.0 {
            break;
        }
        value /= 1_000.0;
        unit = next;
    }
    format!("{:.1} {}", value, unit)
}

/// Signed variant for consumption-since-last figures: "+12.3 KB", "-4.0 MB".
pub fn format_bytes_signed(bytes: i64) -> String {
    let sign = if bytes < 0 { "-" } else { "+" };
    format!("{}{}", sign, format_bytes(bytes.unsigned_abs()))
}

/// Returns "[████████░░░░]" where █ = remaining quota, ░ = used portion.
/// Width is the number of block characters inside the brackets.
pub fn format_usage_bar(used_percent: f64, width: usize) -> String {
    let used_percent = used_percent.clamp(0.0, 100.0);
    let used_blocks = ((used_percent / 100.0) * width as f64).round() as usize;
    let remaining_blocks = width.saturating_sub(used_blocks);

    let filled: String = "█".repeat(remaining_blocks);
    let empty: String = "░".repeat(used_blocks);

    format!("[{}{}]", filled, empty)
}

/// Returns "Xh Ym", "Ym Zs" or "Zs" for an elapsed-seconds figure.
pub fn format_duration(total_seconds: i64) -> String {
    let total_seconds = total_seconds.max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// Average transfer rate over an interval, e.g. "2.5 KB/s". Zero or
/// negative intervals and negative consumption render as a dash.
pub fn format_rate(consumed_bytes: i64, elapsed_secs: i64) -> String {
    if elapsed_secs <= 0 || consumed_bytes < 0 {
        return "-".to_string();
    }
    let per_sec = (consumed_bytes as f64 / elapsed_secs as f64).round() as u64;
    format!("{}/s", format_bytes(per_sec))
}
