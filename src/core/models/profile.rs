use chrono::Duration;

use crate::core::ip;
use crate::core::models::usage::Usage;

/// Whether a profile's range currently contains the caller's own address.
/// Reset to `None` on every profile at the start of each reconciliation
/// pass, so ownership never goes stale when the device moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceOwnership {
    None,
    Owned,
}

/// A tracked address range with its rolling pair of usage snapshots.
///
/// The `(min_ip, max_ip)` pair is the profile's identity: two profiles are
/// the same iff both bounds match exactly. Partial overlap is never merged.
#[derive(Debug, Clone)]
pub struct Profile {
    pub min_ip: u32,
    pub max_ip: u32,
    pub name: String,
    /// Show this profile in downstream rendering.
    pub visible: bool,
    pub current_usage: Usage,
    pub last_usage: Usage,
    /// Signed byte delta between the two snapshots, computed as
    /// **old minus new**. Negate to get bytes consumed since the previous
    /// check — see [`Profile::consumed_since_last`].
    pub usage_delta: i64,
    /// Elapsed time between the two snapshots, old minus new (so normally
    /// negative). Same sign convention as `usage_delta`.
    pub time_delta: Duration,
    /// True once at least one observation has been applied this pass.
    pub updated: bool,
    pub device: DeviceOwnership,
}

impl Profile {
    /// Profile restored from the persisted store: known range and name,
    /// no usage yet.
    pub fn from_range(min_ip: u32, max_ip: u32, name: String, visible: bool) -> Self {
        let empty = Usage::zero(min_ip, max_ip);
        Self {
            min_ip,
            max_ip,
            name,
            visible,
            current_usage: empty,
            last_usage: empty,
            usage_delta: 0,
            time_delta: Duration::zero(),
            updated: false,
            device: DeviceOwnership::None,
        }
    }

    /// Profile discovered from a report range with no prior match. Both
    /// snapshots start at the observed usage, so the first deltas are zero.
    pub fn from_usage(usage: Usage) -> Self {
        let mut profile = Self::from_range(
            usage.min_ip,
            usage.max_ip,
            ip::format_range(usage.min_ip, usage.max_ip),
            true,
        );
        profile.current_usage = usage;
        profile.apply_usage(usage);
        profile
    }

    pub fn range_key(&self) -> u64 {
        ip::range_key(self.min_ip, self.max_ip)
    }

    pub fn same_range(&self, min_ip: u32, max_ip: u32) -> bool {
        self.min_ip == min_ip && self.max_ip == max_ip
    }

    /// Closed-bounds containment check.
    pub fn contains_ip(&self, ip: u32) -> bool {
        ip >= self.min_ip && ip <= self.max_ip
    }

    /// Roll the snapshots forward: the previous snapshot becomes the
    /// baseline and deltas are recomputed as old minus new.
    pub fn apply_usage(&mut self, usage: Usage) {
        self.last_usage = self.current_usage;
        self.current_usage = usage;

        self.usage_delta = self.last_usage.current as i64 - self.current_usage.current as i64;
        self.time_delta = self.last_usage.time - self.current_usage.time;

        self.updated = true;
    }

    /// Bytes consumed between the last two observations, with the intuitive
    /// sign (positive when usage grew).
    pub fn consumed_since_last(&self) -> i64 {
        -self.usage_delta
    }

    /// Seconds elapsed between the last two observations, positive.
    pub fn elapsed_secs(&self) -> i64 {
        -self.time_delta.num_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn usage_at(current: u64, secs: i64) -> Usage {
        Usage {
            min_ip: 10,
            max_ip: 20,
            current,
            max: 1_000_000,
            time: Utc.timestamp_opt(secs, 0).unwrap(),
        }
    }

    #[test]
    fn fresh_profile_has_zero_deltas() {
        let profile = Profile::from_usage(usage_at(500, 100));
        assert_eq!(profile.usage_delta, 0);
        assert_eq!(profile.time_delta, Duration::zero());
        assert!(profile.updated);
    }

    #[test]
    fn delta_is_old_minus_new() {
        let mut profile = Profile::from_usage(usage_at(250_000, 100));
        profile.apply_usage(usage_at(400_000, 160));

        // Old minus new, not new minus old.
        assert_eq!(profile.usage_delta, 250_000 - 400_000);
        assert_eq!(profile.time_delta, Duration::seconds(-60));

        assert_eq!(profile.consumed_since_last(), 150_000);
        assert_eq!(profile.elapsed_secs(), 60);
    }

    #[test]
    fn apply_usage_rolls_snapshots() {
        let first = usage_at(100, 10);
        let second = usage_at(300, 70);
        let mut profile = Profile::from_usage(first);
        profile.apply_usage(second);

        assert_eq!(profile.last_usage, first);
        assert_eq!(profile.current_usage, second);
    }

    #[test]
    fn loaded_profile_starts_unused() {
        let profile = Profile::from_range(1, 5, "lan".into(), true);
        assert!(!profile.updated);
        assert_eq!(profile.current_usage.current, 0);
        assert_eq!(profile.device, DeviceOwnership::None);
    }

    #[test]
    fn same_range_requires_both_bounds() {
        let profile = Profile::from_range(10, 20, "r".into(), true);
        assert!(profile.same_range(10, 20));
        assert!(!profile.same_range(10, 21));
        assert!(!profile.same_range(11, 20));
        // Matching the max bound alone must not count as identity.
        assert!(!profile.same_range(20, 20));
    }

    #[test]
    fn contains_ip_uses_closed_bounds() {
        let profile = Profile::from_range(10, 20, "r".into(), true);
        assert!(profile.contains_ip(10));
        assert!(profile.contains_ip(20));
        assert!(profile.contains_ip(15));
        assert!(!profile.contains_ip(9));
        assert!(!profile.contains_ip(21));
    }

    #[test]
    fn discovered_profile_is_named_after_its_range() {
        let usage = Usage {
            min_ip: crate::core::ip::parse_address("192.168.1.1"),
            max_ip: crate::core::ip::parse_address("192.168.1.50"),
            current: 1,
            max: 2,
            time: Utc::now(),
        };
        let profile = Profile::from_usage(usage);
        assert_eq!(profile.name, "192.168.1.1-192.168.1.50");
        assert!(profile.visible);
    }
}
