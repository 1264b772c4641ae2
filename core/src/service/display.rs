// Formatting applied at presentation time only; aggregation keeps raw values.

pub fn display_category(category: &str) -> String {
    let mut chars = category.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => "Unknown".to_string(),
    }
}

/// Whole currency units with `.` as the thousands separator: 1500000 -> "1.500.000".
pub fn format_amount(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_category() {
        assert_eq!(display_category("bus"), "Bus");
        assert_eq!(display_category("minibus elf"), "Minibus elf");
        assert_eq!(display_category("SUV"), "SUV");
        assert_eq!(display_category("  "), "Unknown");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0), "0");
        assert_eq!(format_amount(999), "999");
        assert_eq!(format_amount(1000), "1.000");
        assert_eq!(format_amount(1_500_000), "1.500.000");
        assert_eq!(format_amount(-25_000), "-25.000");
    }
}
