//! Count parsing for scraped follower figures.

/// Parse a scraped count such as `"12K"`, `"1.5M"`, or `"1,234"`.
///
/// Commas are dropped and everything except digits, `.`, and the `K`/`M`
/// suffix letters is ignored. A `K`/`k` multiplies by one thousand and an
/// `M`/`m` by one million, rounding to the nearest integer; otherwise the
/// integer part is taken. Anything that leaves no leading number yields `0`.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn parse_count(raw: &str) -> u64 {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | 'K' | 'k' | 'M' | 'm'))
        .collect();

    let multiplier: u64 = if kept.contains(['K', 'k']) {
        1_000
    } else if kept.contains(['M', 'm']) {
        1_000_000
    } else {
        1
    };

    let number = leading_number(&kept);
    if number.is_empty() {
        return 0;
    }

    if multiplier == 1 {
        let integer = number.split('.').next().unwrap_or_default();
        return integer.parse::<u64>().unwrap_or(0);
    }

    let Ok(value) = number.parse::<f64>() else {
        return 0;
    };
    (value * multiplier as f64).round() as u64
}

/// Longest prefix of digits with at most one decimal point.
fn leading_number(s: &str) -> &str {
    let mut seen_dot = false;
    let end = s
        .char_indices()
        .find(|&(_, c)| {
            if c == '.' && !seen_dot {
                seen_dot = true;
                false
            } else {
                !c.is_ascii_digit()
            }
        })
        .map_or(s.len(), |(i, _)| i);
    s[..end].trim_end_matches('.')
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
