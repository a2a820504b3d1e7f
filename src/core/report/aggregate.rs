use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::core::models::usage::Usage;
use crate::core::report::tokenizer::{parse_line, QuotaKind, ReportLine};

/// Everything extracted from one report pass: the per-range usage table,
/// the caller's own address if announced, and line counters for verbose
/// diagnostics. Discarded after reconciliation.
#[derive(Debug)]
pub struct Report {
    pub usages: HashMap<u64, Usage>,
    pub device_ip: Option<u32>,
    pub stats: ParseStats,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ParseStats {
    /// Quota lines that parsed and landed in the usage table.
    pub accepted: usize,
    /// Lines matching a quota prefix that failed their structural shape.
    pub dropped: usize,
}

/// Accumulates classified lines into per-range usage snapshots. Limit and
/// used lines for the same range may arrive in either order; every snapshot
/// in a pass shares the capture instant taken at construction.
pub struct Aggregator {
    usages: HashMap<u64, Usage>,
    device_ip: Option<u32>,
    stats: ParseStats,
    captured_at: DateTime<Utc>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self {
            usages: HashMap::new(),
            device_ip: None,
            stats: ParseStats::default(),
            captured_at: Utc::now(),
        }
    }

    pub fn push_line(&mut self, line: &str) {
        match parse_line(line) {
            Some(ReportLine::Quota {
                kind,
                min_ip,
                max_ip,
                value,
            }) => {
                let key = crate::core::ip::range_key(min_ip, max_ip);
                let entry = self.usages.entry(key).or_insert(Usage {
                    min_ip,
                    max_ip,
                    current: 0,
                    max: 0,
                    time: self.captured_at,
                });
                match kind {
                    QuotaKind::Limit => entry.max = value,
                    QuotaKind::Used => entry.current = value,
                }
                self.stats.accepted += 1;
            }
            Some(ReportLine::DeviceIp(ip)) => {
                // Only one announcement is expected; the last one wins.
                self.device_ip = Some(ip);
            }
            None => {
                if looks_like_quota_line(line) {
                    self.stats.dropped += 1;
                }
            }
        }
    }

    pub fn into_report(self) -> Report {
        Report {
            usages: self.usages,
            device_ip: self.device_ip,
            stats: self.stats,
        }
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

fn looks_like_quota_line(line: &str) -> bool {
    let head = line.as_bytes();
    let is = |p: &str| head.len() >= p.len() && head[..p.len()].eq_ignore_ascii_case(p.as_bytes());
    is("quotaLimits") || is("quotaUsed") || is("var connectedIp")
}
