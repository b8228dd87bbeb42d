//! Pure operations behind the `/invert`, `/f2c` and `/c2f` routes.

/// Reverse the `char` sequence of `s`. Grapheme clusters are not kept together.
pub fn invert(s: &str) -> String {
    s.chars().rev().collect()
}

pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    (celsius * 9.0 / 5.0) + 32.0
}

pub fn invert_message(phrase: &str) -> String {
    format!("Inverted Phrase: {}", invert(phrase))
}

pub fn f2c_message(fahrenheit: f64) -> String {
    format!(
        "{}°F is {}°C",
        format_2dp(fahrenheit),
        format_2dp(fahrenheit_to_celsius(fahrenheit))
    )
}

pub fn c2f_message(celsius: f64) -> String {
    format!(
        "{}°C is {}°F",
        format_2dp(celsius),
        format_2dp(celsius_to_fahrenheit(celsius))
    )
}

/// Two decimals, rounding half away from zero on the shortest decimal form of
/// `v` (so `1.005` gives `1.01`, unlike `{:.2}` which sees `1.00499...`).
/// The sign is kept for values that round to zero.
pub fn format_2dp(v: f64) -> String {
    // `Display` for f64 never uses exponent notation.
    let shortest = format!("{}", v.abs());
    let (int_part, frac_part) = shortest.split_once('.').unwrap_or((shortest.as_str(), ""));

    let mut digits: Vec<u8> = int_part.bytes().map(|b| b - b'0').collect();
    let mut frac = frac_part.bytes().map(|b| b - b'0');
    digits.push(frac.next().unwrap_or(0));
    digits.push(frac.next().unwrap_or(0));

    if frac.next().is_some_and(|d| d >= 5) {
        let mut carry = true;
        for d in digits.iter_mut().rev() {
            if !carry {
                break;
            }
            *d += 1;
            carry = *d == 10;
            if carry {
                *d = 0;
            }
        }
        if carry {
            digits.insert(0, 1);
        }
    }

    let split = digits.len() - 2;
    let render = |ds: &[u8]| ds.iter().map(|d| char::from(b'0' + d)).collect::<String>();
    let sign = if v.is_sign_negative() { "-" } else { "" };
    format!("{sign}{}.{}", render(&digits[..split]), render(&digits[split..]))
}

/// Why a temperature query parameter was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureInputError {
    Missing,
    NotANumber,
}

/// Parse a temperature query value. Empty or whitespace-only counts as missing;
/// `NaN` and infinities are rejected.
pub fn parse_temperature(raw: Option<&str>) -> Result<f64, TemperatureInputError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(TemperatureInputError::Missing)?;
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(TemperatureInputError::NotANumber),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invert_reverses_chars() {
        assert_eq!(invert("hello"), "olleh");
        assert_eq!(invert(""), "");
        assert_eq!(invert("añb°"), "°bña");
    }

    #[test]
    fn invert_is_an_involution() {
        for s in ["a", "racecar", "Hello, World!", "日本語テキスト", "mixed 123 ✓"] {
            assert_eq!(invert(&invert(s)), s);
        }
    }

    #[test]
    fn conversions_match_reference_points() {
        assert_eq!(fahrenheit_to_celsius(32.0), 0.0);
        assert_eq!(fahrenheit_to_celsius(212.0), 100.0);
        assert_eq!(celsius_to_fahrenheit(100.0), 212.0);
        assert_eq!(celsius_to_fahrenheit(-40.0), -40.0);
    }

    #[test]
    fn conversions_round_trip_within_rounding() {
        for f in [-459.67, -40.0, 0.0, 32.0, 98.6, 451.0, 1234.5678] {
            let back = celsius_to_fahrenheit(fahrenheit_to_celsius(f));
            assert!((back - f).abs() < 0.005, "{f} came back as {back}");
        }
    }

    #[test]
    fn messages_use_two_decimals() {
        assert_eq!(f2c_message(32.0), "32.00°F is 0.00°C");
        assert_eq!(f2c_message(100.0), "100.00°F is 37.78°C");
        assert_eq!(c2f_message(37.0), "37.00°C is 98.60°F");
        assert_eq!(invert_message("abc"), "Inverted Phrase: cba");
    }

    #[test]
    fn two_decimals_round_half_away_from_zero() {
        assert_eq!(format_2dp(212.125), "212.13");
        assert_eq!(format_2dp(1.005), "1.01");
        assert_eq!(format_2dp(2.675), "2.68");
        assert_eq!(format_2dp(-0.125), "-0.13");
        assert_eq!(format_2dp(9.995), "10.00");
        assert_eq!(format_2dp(99.999), "100.00");
        assert_eq!(format_2dp(0.0), "0.00");
        assert_eq!(format_2dp(32.0), "32.00");
        assert_eq!(format_2dp(37.77777777777778), "37.78");
        assert_eq!(format_2dp(-40.0), "-40.00");
        assert_eq!(format_2dp(0.004), "0.00");
    }

    #[test]
    fn boundary_inputs_round_in_both_messages() {
        assert_eq!(f2c_message(212.125), "212.13°F is 100.07°C");
        assert_eq!(c2f_message(1.005), "1.01°C is 33.81°F");
    }

    #[test]
    fn temperature_parsing() {
        assert_eq!(parse_temperature(Some("32")), Ok(32.0));
        assert_eq!(parse_temperature(Some(" -4.5 ")), Ok(-4.5));
        assert_eq!(parse_temperature(None), Err(TemperatureInputError::Missing));
        assert_eq!(parse_temperature(Some("")), Err(TemperatureInputError::Missing));
        assert_eq!(
            parse_temperature(Some("warm")),
            Err(TemperatureInputError::NotANumber)
        );
        assert_eq!(
            parse_temperature(Some("NaN")),
            Err(TemperatureInputError::NotANumber)
        );
        assert_eq!(
            parse_temperature(Some("inf")),
            Err(TemperatureInputError::NotANumber)
        );
    }
}
