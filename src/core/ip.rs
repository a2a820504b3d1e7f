/// Pack a dotted-quad address into a u32 by shifting in each dot-separated
/// token. This mirrors the router's own loose convention: there is no check
/// on token count or byte range, and an unparsable token contributes 0.
/// `parse_address("10.0.0.1") == 0x0A00_0001`.
pub fn parse_address(text: &str) -> u32 {
    let mut packed: u32 = 0;
    for token in text.split('.') {
        packed = (packed << 8) | token.trim().parse::<u32>().unwrap_or(0);
    }
    packed
}

/// Combine a (min, max) address pair into a single 64-bit mapping key:
/// `(max << 32) | min`. Injective over distinct pairs.
pub fn range_key(min_ip: u32, max_ip: u32) -> u64 {
    (u64::from(max_ip) << 32) | u64::from(min_ip)
}

pub fn format_address(ip: u32) -> String {
    format!(
        "{}.{}.{}.{}",
        (ip >> 24) & 255,
        (ip >> 16) & 255,
        (ip >> 8) & 255,
        ip & 255
    )
}

/// Render a range as stored in the profile file: a single address when the
/// bounds coincide, otherwise `min-max`.
pub fn format_range(min_ip: u32, max_ip: u32) -> String {
    if min_ip == max_ip {
        format_address(min_ip)
    } else {
        format!("{}-{}", format_address(min_ip), format_address(max_ip))
    }
}

/// Parse a textual range descriptor. One dash-separated token is a
/// single-address range, two tokens are min/max; any other count is invalid.
pub fn parse_range(text: &str) -> Option<(u32, u32)> {
    let tokens: Vec<&str> = text.split('-').collect();
    match tokens.as_slice() {
        [single] => {
            let ip = parse_address(single);
            Some((ip, ip))
        }
        [min, max] => Some((parse_address(min), parse_address(max))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_address_big_endian_packing() {
        assert_eq!(parse_address("10.0.0.1"), 0x0A00_0001);
        assert_eq!(parse_address("192.168.1.5"), 0xC0A8_0105);
        assert_eq!(parse_address("0.0.0.0"), 0);
        assert_eq!(parse_address("255.255.255.255"), u32::MAX);
    }

    #[test]
    fn parse_address_does_not_validate() {
        // Fewer than four tokens packs into the low bytes
        assert_eq!(parse_address("1.2"), 0x0102);
        // Garbage tokens contribute 0
        assert_eq!(parse_address("10.x.0.1"), 0x0A00_0001);
    }

    #[test]
    fn range_key_packs_max_high_min_low() {
        let key = range_key(0xC0A8_0101, 0xC0A8_0132);
        assert_eq!(key, 0xC0A8_0132_C0A8_0101);
    }

    #[test]
    fn range_key_is_injective_for_distinct_pairs() {
        let a = range_key(1, 2);
        let b = range_key(2, 1);
        let c = range_key(1, 1);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
    }

    #[test]
    fn format_address_round_trips() {
        for text in ["10.0.0.1", "192.168.1.255", "0.0.0.0"] {
            assert_eq!(format_address(parse_address(text)), text);
        }
    }

    #[test]
    fn format_range_collapses_single_address() {
        let ip = parse_address("192.168.1.5");
        assert_eq!(format_range(ip, ip), "192.168.1.5");
    }

    #[test]
    fn parse_range_single_and_pair() {
        let ip = parse_address("192.168.1.5");
        assert_eq!(parse_range("192.168.1.5"), Some((ip, ip)));

        let min = parse_address("192.168.1.1");
        let max = parse_address("192.168.1.50");
        assert_eq!(parse_range("192.168.1.1-192.168.1.50"), Some((min, max)));
    }

    #[test]
    fn parse_range_rejects_extra_tokens() {
        assert_eq!(parse_range("1.2.3.4-5.6.7.8-9.10.11.12"), None);
    }

    #[test]
    fn range_text_round_trips_through_parse() {
        let min = parse_address("10.0.0.1");
        let max = parse_address("10.0.0.99");
        let text = format_range(min, max);
        assert_eq!(parse_range(&text), Some((min, max)));
    }
}
