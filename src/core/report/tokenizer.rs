use crate::core::ip::parse_address;

/// Which quota figure a report line carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaKind {
    Limit,
    Used,
}

/// One classified line of the router report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReportLine {
    Quota {
        kind: QuotaKind,
        min_ip: u32,
        max_ip: u32,
        value: u64,
    },
    DeviceIp(u32),
}

/// Classify a single raw line. Returns `None` for irrelevant lines and for
/// quota/device lines that fail their expected structural shape — per-line
/// failures are silent and never abort a pass.
pub fn parse_line(line: &str) -> Option<ReportLine> {
    if has_prefix(line, "var connectedIp") {
        return parse_device_line(line).map(ReportLine::DeviceIp);
    }

    let kind = if has_prefix(line, "quotaLimits") {
        QuotaKind::Limit
    } else if has_prefix(line, "quotaUsed") {
        QuotaKind::Used
    } else {
        return None;
    };

    let cleaned = clean_line(line);
    let sections = bracket_sections(&cleaned);
    if sections.len() != 3 {
        return None;
    }

    let fields: Vec<&str> = sections[2].split(',').collect();
    if fields.len() != 3 {
        return None;
    }
    let value = fields[1].parse::<u64>().ok()?;

    let range: Vec<&str> = sections[1].split('-').collect();
    let (min_ip, max_ip) = match range.as_slice() {
        [single] => {
            let ip = parse_address(single);
            (ip, ip)
        }
        [min, max] => (parse_address(min), parse_address(max)),
        _ => return None,
    };

    Some(ReportLine::Quota {
        kind,
        min_ip,
        max_ip,
        value,
    })
}

/// Extract the device address from between the first and last double quote.
/// Both quotes must exist and be distinct.
fn parse_device_line(line: &str) -> Option<u32> {
    let start = line.find('"')?;
    let end = line.rfind('"')?;
    if end <= start {
        return None;
    }
    Some(parse_address(&line[start + 1..end]))
}

/// ASCII case-insensitive prefix check, matching the report's mixed-case
/// variable names.
fn has_prefix(line: &str, prefix: &str) -> bool {
    let line = line.as_bytes();
    let prefix = prefix.as_bytes();
    line.len() >= prefix.len() && line[..prefix.len()].eq_ignore_ascii_case(prefix)
}

/// Strip every character except digits and `.` `-` `,` `[` `]` so the
/// bracket scan only sees structural characters and figures.
fn clean_line(line: &str) -> String {
    line.chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | ',' | '[' | ']'))
        .collect()
}

/// Collect bracket-delimited sections left to right. A `]` closes the most
/// recently seen `[`; nesting is not tracked.
fn bracket_sections(text: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut open: Option<usize> = None;

    for (i, byte) in text.bytes().enumerate() {
        match byte {
            b'[' => open = Some(i + 1),
            b']' => {
                if let Some(start) = open.take() {
                    sections.push(&text[start..i]);
                }
            }
            _ => {}
        }
    }

    sections
}
