//! HTML rendering for stored reports.
//!
//! All model text and client-supplied strings pass through
//! [`html_escape`] before they reach markup.

pub mod financial;
pub mod markdown;
pub mod page;
pub mod sections;

/// `1234567.5` -> `1,234,567.50`, whole numbers keep no decimals
pub(crate) fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        group_thousands(&format!("{:.0}", value))
    } else {
        group_thousands(&format!("{:.2}", value))
    }
}

/// Rounded to whole units with thousands separators
pub(crate) fn format_whole(value: f64) -> String {
    group_thousands(&format!("{:.0}", value))
}

fn group_thousands(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(999.0), "999");
        assert_eq!(format_amount(1000.0), "1,000");
        assert_eq!(format_amount(1234567.5), "1,234,567.50");
        assert_eq!(format_amount(-25000.0), "-25,000");
    }

    #[test]
    fn test_format_whole_rounds() {
        assert_eq!(format_whole(2000.4), "2,000");
        assert_eq!(format_whole(2999.6), "3,000");
    }
}
