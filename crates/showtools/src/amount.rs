//! Donation amounts in cents.
//!
//! An amount is either zero ("no selection") or at least the configured
//! minimum. Anything in between is clamped to zero rather than rejected, so
//! the confirm action simply stays disabled.

use std::fmt;

/// Selected donation in integer cents. Zero means nothing is selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DonationAmount(u64);

impl DonationAmount {
    pub const ZERO: Self = Self(0);

    /// Clamp a cent value: below `min_cents` becomes zero.
    pub fn from_cents(cents: u64, min_cents: u64) -> Self {
        if cents >= min_cents {
            Self(cents)
        } else {
            Self::ZERO
        }
    }

    /// Parse a custom amount typed in dollars (`"3.00"` -> 300 cents).
    ///
    /// Like a browser's `parseFloat`, only the leading numeric part counts,
    /// so `"4.5 bucks"` is $4.50 and `"1e3"` is $1000.00. Empty, non-numeric,
    /// negative, and sub-minimum input all give zero.
    pub fn parse_dollars(input: &str, min_cents: u64) -> Self {
        let Some(dollars) = leading_decimal(input) else {
            return Self::ZERO;
        };
        if !dollars.is_finite() || dollars <= 0.0 {
            return Self::ZERO;
        }
        if dollars < min_cents as f64 / 100.0 {
            return Self::ZERO;
        }
        // Saturating cast: absurdly large input pins at u64::MAX.
        Self::from_cents((dollars * 100.0).round() as u64, min_cents)
    }

    /// Parse a preset's `data-amount` attribute, which holds whole cents.
    /// Only the leading integer counts, as with `parseInt`.
    pub fn parse_preset(attr: &str, min_cents: u64) -> Self {
        let trimmed = attr.trim_start();
        let digits: &str = {
            let end = trimmed
                .char_indices()
                .find(|(_, c)| !c.is_ascii_digit())
                .map(|(i, _)| i)
                .unwrap_or(trimmed.len());
            &trimmed[..end]
        };
        match digits.parse::<u64>() {
            Ok(cents) => Self::from_cents(cents, min_cents),
            Err(_) => Self::ZERO,
        }
    }

    pub fn cents(&self) -> u64 {
        self.0
    }

    pub fn is_selected(&self) -> bool {
        self.0 > 0
    }

    /// Compact label for quick-amount buttons: `$3` or `$3.50`.
    pub fn short_label(&self) -> String {
        if self.0 % 100 == 0 {
            format!("${}", self.0 / 100)
        } else {
            self.to_string()
        }
    }
}

impl fmt::Display for DonationAmount {
    /// Dollars with two decimals: `$3.00`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Longest prefix of `input` (after leading whitespace) that reads as a
/// decimal number: optional sign, digits, optional fraction, optional
/// exponent.
fn leading_decimal(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut has_digits = end > int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start {
            has_digits = true;
            end = frac_end;
        } else if has_digits {
            end = frac_start;
        }
    }
    if !has_digits {
        return None;
    }
    // An exponent only counts when at least one digit follows it.
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }
    s[..end].parse().ok()
}
