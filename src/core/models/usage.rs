use chrono::{DateTime, Utc};

use crate::core::ip;

/// One observed usage snapshot for an address range. Immutable once
/// captured; every report pass builds fresh values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Usage {
    pub min_ip: u32,
    pub max_ip: u32,
    /// Bytes consumed so far in the quota period.
    pub current: u64,
    /// Quota limit in bytes. 0 when the report carried no limit line.
    pub max: u64,
    /// Capture instant of the report pass that produced this snapshot.
    pub time: DateTime<Utc>,
}

impl Usage {
    /// Empty snapshot for a freshly loaded profile, before any report
    /// has been applied.
    pub fn zero(min_ip: u32, max_ip: u32) -> Self {
        Self {
            min_ip,
            max_ip,
            current: 0,
            max: 0,
            time: Utc::now(),
        }
    }

    pub fn range_key(&self) -> u64 {
        ip::range_key(self.min_ip, self.max_ip)
    }

    /// Percentage of the quota consumed, clamped to 0-100. Ranges without
    /// a limit report 0.
    pub fn used_percent(&self) -> f64 {
        if self.max == 0 {
            return 0.0;
        }
        (self.current as f64 / self.max as f64 * 100.0).clamp(0.0, 100.0)
    }
}
