use std::collections::HashMap;
use anyhow::{anyhow, Result};

/// Keys understood by `fleetrent add`. Any unambiguous prefix works.
pub const RENTAL_KEYS: &[&str] = &[
    "amount",
    "start",
    "end",
    "status",
    "type",
    "vehicle",
    "driver",
    "phone",
    "destination",
    "name",
];

#[derive(Debug, PartialEq)]
pub struct ParsedInput {
    pub text: String,
    pub fields: HashMap<String, String>,
}

/// Splits `key:value` words from free text. Keys are expanded against
/// `candidates`; unknown or ambiguous keys are returned as errors alongside.
pub fn parse_args(args: &[String], candidates: &[&str]) -> (ParsedInput, Vec<anyhow::Error>) {
    let mut text_parts = Vec::new();
    let mut fields = HashMap::new();
    let mut errors = Vec::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once(':') {
            if !key.is_empty() {
                match expand_key(key, candidates) {
                    Ok(full_key) => {
                        fields.insert(full_key, value.to_string());
                    }
                    Err(e) => errors.push(e),
                }
                continue;
            }
        }
        text_parts.push(arg.as_str());
    }

    let parsed = ParsedInput {
        text: text_parts.join(" "),
        fields,
    };
    (parsed, errors)
}

pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String> {
    let key = key.to_lowercase();
    if candidates.contains(&key.as_str()) {
        return Ok(key);
    }

    let matches: Vec<&str> = candidates
        .iter()
        .filter(|c| c.starts_with(key.as_str()))
        .copied()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(anyhow!("Unknown key: '{}'", key)),
        _ => Err(anyhow!("Ambiguous key: '{}' matches {:?}", key, matches)),
    }
}

/// Whole currency units. Accepts `1500000`, `1.500.000`, `1,500,000`,
/// `1_500_000`, and the `k` / `m` suffixes (`750k`, `1.5m`). Fractions are
/// only accepted together with a suffix.
pub fn parse_amount(input: &str) -> Result<i64> {
    let s = input.trim().to_lowercase();
    let (number, multiplier) = if let Some(n) = s.strip_suffix('k') {
        (n, 1_000.0)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 1_000_000.0)
    } else {
        (s.as_str(), 1.0)
    };

    let invalid = || anyhow!("Invalid amount: '{}'", input);

    if multiplier > 1.0 {
        let value: f64 = number.replace(',', ".").parse().map_err(|_| invalid())?;
        let scaled = (value * multiplier).round();
        // `as` saturates and maps NaN to 0
        if !scaled.is_finite() || scaled < i64::MIN as f64 || scaled >= i64::MAX as f64 {
            return Err(anyhow!("Amount out of range: '{}'", input));
        }
        return Ok(scaled as i64);
    }

    // Separators only group thousands: 1.500.000 is fine, 1.5 or 12,50 is not
    let mut groups = number.split(['.', ',', '_']);
    let head = groups.next().unwrap_or_default();
    if head.trim_start_matches('-').is_empty() {
        return Err(invalid());
    }
    let mut digits = head.to_string();
    for group in groups {
        if group.len() != 3 || !group.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        digits.push_str(group);
    }
    digits.parse().map_err(|_| invalid())
}
