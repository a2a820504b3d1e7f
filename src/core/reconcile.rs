use crate::core::models::profile::{DeviceOwnership, Profile};
use crate::core::models::usage::Usage;
use crate::core::report::Report;

/// Merge one report's usage table into the persistent profile list.
///
/// Two phases, so the list is never mutated while it is being scanned:
/// first every aggregated usage is matched against existing profiles by
/// full range identity (both bounds equal) and applied, with unmatched
/// ranges collected and appended afterwards in range-key order; then
/// device ownership is recomputed from scratch for the whole list.
pub fn reconcile(profiles: &mut Vec<Profile>, report: &Report) {
    let mut discovered: Vec<Usage> = Vec::new();

    for usage in report.usages.values() {
        let matched = profiles
            .iter_mut()
            .find(|p| p.same_range(usage.min_ip, usage.max_ip));
        match matched {
            Some(profile) => profile.apply_usage(*usage),
            None => discovered.push(*usage),
        }
    }

    // HashMap iteration order is arbitrary; keep appended profiles stable.
    discovered.sort_by_key(Usage::range_key);
    profiles.extend(discovered.into_iter().map(Profile::from_usage));

    // Ownership is recomputed every pass so a stale flag cannot survive the
    // device moving to an uncovered address. When ranges overlap, the last
    // containing profile in list order wins.
    for profile in profiles.iter_mut() {
        profile.device = DeviceOwnership::None;
    }
    if let Some(ip) = report.device_ip {
        if let Some(owner) = profiles.iter_mut().rev().find(|p| p.contains_ip(ip)) {
            owner.device = DeviceOwnership::Owned;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ip::{parse_address, range_key};
    use crate::core::report::ParseStats;
    use chrono::Utc;
    use std::collections::HashMap;

    fn usage(min: &str, max: &str, current: u64, limit: u64) -> Usage {
        Usage {
            min_ip: parse_address(min),
            max_ip: parse_address(max),
            current,
            max: limit,
            time: Utc::now(),
        }
    }

    fn report_of(usages: &[Usage], device_ip: Option<&str>) -> Report {
        let mut table = HashMap::new();
        for u in usages {
            table.insert(u.range_key(), *u);
        }
        Report {
            usages: table,
            device_ip: device_ip.map(parse_address),
            stats: ParseStats::default(),
        }
    }

    #[test]
    fn matching_profile_receives_the_usage() {
        let mut profiles = vec![Profile::from_range(
            parse_address("192.168.1.1"),
            parse_address("192.168.1.50"),
            "lan".into(),
            true,
        )];
        let report = report_of(
            &[usage("192.168.1.1", "192.168.1.50", 250_000, 1_000_000)],
            None,
        );

        reconcile(&mut profiles, &report);

        assert_eq!(profiles.len(), 1);
        assert!(profiles[0].updated);
        assert_eq!(profiles[0].current_usage.current, 250_000);
        assert_eq!(profiles[0].current_usage.max, 1_000_000);
    }

    #[test]
    fn match_requires_full_range_identity() {
        // Same max bound but different min bound must not match.
        let mut profiles = vec![Profile::from_range(
            parse_address("192.168.1.10"),
            parse_address("192.168.1.50"),
            "narrow".into(),
            true,
        )];
        let report = report_of(
            &[usage("192.168.1.1", "192.168.1.50", 100, 200)],
            None,
        );

        reconcile(&mut profiles, &report);

        assert_eq!(profiles.len(), 2);
        assert!(!profiles[0].updated);
        assert!(profiles[1].updated);
    }

    #[test]
    fn unseen_ranges_append_in_range_key_order() {
        let mut profiles = Vec::new();
        let report = report_of(
            &[
                usage("10.0.0.20", "10.0.0.29", 1, 10),
                usage("10.0.0.1", "10.0.0.9", 2, 20),
            ],
            None,
        );

        reconcile(&mut profiles, &report);

        let keys: Vec<u64> = profiles.iter().map(Profile::range_key).collect();
        assert_eq!(
            keys,
            vec![
                range_key(parse_address("10.0.0.1"), parse_address("10.0.0.9")),
                range_key(parse_address("10.0.0.20"), parse_address("10.0.0.29")),
            ]
        );
    }

    #[test]
    fn device_ownership_set_on_containing_profile() {
        let mut profiles = vec![
            Profile::from_range(
                parse_address("192.168.1.0"),
                parse_address("192.168.1.255"),
                "lan".into(),
                true,
            ),
            Profile::from_range(
                parse_address("10.0.0.0"),
                parse_address("10.0.0.255"),
                "guest".into(),
                true,
            ),
        ];
        let report = report_of(&[], Some("192.168.1.5"));

        reconcile(&mut profiles, &report);

        assert_eq!(profiles[0].device, DeviceOwnership::Owned);
        assert_eq!(profiles[1].device, DeviceOwnership::None);
    }

    #[test]
    fn last_containing_profile_wins_on_overlap() {
        let mut profiles = vec![
            Profile::from_range(
                parse_address("192.168.1.0"),
                parse_address("192.168.1.255"),
                "wide".into(),
                true,
            ),
            Profile::from_range(
                parse_address("192.168.1.5"),
                parse_address("192.168.1.5"),
                "exact".into(),
                true,
            ),
        ];
        let report = report_of(&[], Some("192.168.1.5"));

        reconcile(&mut profiles, &report);

        assert_eq!(profiles[0].device, DeviceOwnership::None);
        assert_eq!(profiles[1].device, DeviceOwnership::Owned);
    }

    #[test]
    fn stale_ownership_is_cleared_when_device_moves_away() {
        let mut profiles = vec![Profile::from_range(
            parse_address("192.168.1.0"),
            parse_address("192.168.1.255"),
            "lan".into(),
            true,
        )];
        profiles[0].device = DeviceOwnership::Owned;

        // Device now reports an address no profile covers
        let report = report_of(&[], Some("10.0.0.1"));
        reconcile(&mut profiles, &report);
        assert_eq!(profiles[0].device, DeviceOwnership::None);

        // And a pass with no announcement at all also clears it
        profiles[0].device = DeviceOwnership::Owned;
        let report = report_of(&[], None);
        reconcile(&mut profiles, &report);
        assert_eq!(profiles[0].device, DeviceOwnership::None);
    }

    #[test]
    fn second_pass_produces_deltas() {
        let mut profiles = Vec::new();
        let mut first = usage("10.0.0.1", "10.0.0.9", 100, 1_000);
        first.time = chrono::TimeZone::timestamp_opt(&Utc, 1_000, 0).unwrap();
        reconcile(&mut profiles, &report_of(&[first], None));

        let mut second = first;
        second.current = 400;
        second.time = chrono::TimeZone::timestamp_opt(&Utc, 1_060, 0).unwrap();
        reconcile(&mut profiles, &report_of(&[second], None));

        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].usage_delta, -300);
        assert_eq!(profiles[0].consumed_since_last(), 300);
        assert_eq!(profiles[0].elapsed_secs(), 60);
    }
}
