//! Parsing and formatting of human-readable distance/duration text.
//!
//! Providers hand back display strings such as `"6.3 km"` or
//! `"1 hour 5 mins"`. Itinerary totals are computed by reading those strings
//! back into numbers, summing, and formatting the result again.

/// Seconds assumed for a duration string with no recognisable unit.
pub const DEFAULT_DURATION_SECS: i64 = 300;

/// Split text into `(number, unit)` pairs, e.g. `"1 hr 5 min"` ->
/// `[(1.0, "hr"), (5.0, "min")]`. Numbers without a following unit word are
/// dropped.
fn quantities(text: &str) -> Vec<(f64, String)> {
    let mut out = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if !c.is_ascii_digit() {
            chars.next();
            continue;
        }

        let mut end = start;
        while let Some(&(i, c)) = chars.peek() {
            if c.is_ascii_digit() || c == '.' || c == ',' {
                end = i + c.len_utf8();
                chars.next();
            } else {
                break;
            }
        }
        let number: String = text[start..end].chars().filter(|c| *c != ',').collect();

        while chars.peek().is_some_and(|(_, c)| c.is_whitespace()) {
            chars.next();
        }

        let mut unit = String::new();
        while let Some(&(_, c)) = chars.peek() {
            if c.is_alphabetic() {
                unit.push(c.to_ascii_lowercase());
                chars.next();
            } else {
                break;
            }
        }

        if let Ok(value) = number.parse::<f64>()
            && !unit.is_empty()
        {
            out.push((value, unit));
        }
    }

    out
}

/// Parse a duration such as `"1 hour 5 mins"` or `"30 min"` into seconds.
///
/// Falls back to [`DEFAULT_DURATION_SECS`] when no hour/minute/second
/// quantity is present.
///
/// ```
/// use campus_nav::domain::parse_duration_secs;
///
/// assert_eq!(parse_duration_secs("30 min"), 1800);
/// assert_eq!(parse_duration_secs("1 hour 5 mins"), 3900);
/// assert_eq!(parse_duration_secs("soon"), 300);
/// ```
pub fn parse_duration_secs(text: &str) -> i64 {
    let mut total = 0.0;
    let mut matched = false;

    for (value, unit) in quantities(text) {
        let factor = match unit.as_str() {
            "d" | "day" | "days" => 86_400.0,
            "h" | "hr" | "hrs" | "hour" | "hours" => 3_600.0,
            "m" | "min" | "mins" | "minute" | "minutes" => 60.0,
            "s" | "sec" | "secs" | "second" | "seconds" => 1.0,
            _ => continue,
        };
        total += value * factor;
        matched = true;
    }

    if matched {
        total.round() as i64
    } else {
        DEFAULT_DURATION_SECS
    }
}

/// Parse a distance such as `"6.3 km"` or `"450 m"` into metres.
///
/// Unrecognised text parses as zero.
///
/// ```
/// use campus_nav::domain::parse_distance_meters;
///
/// assert_eq!(parse_distance_meters("6.3 km"), 6300.0);
/// assert_eq!(parse_distance_meters("450 m"), 450.0);
/// assert_eq!(parse_distance_meters(""), 0.0);
/// ```
pub fn parse_distance_meters(text: &str) -> f64 {
    quantities(text)
        .into_iter()
        .map(|(value, unit)| match unit.as_str() {
            "km" | "kilometer" | "kilometers" | "kilometre" | "kilometres" => value * 1000.0,
            "m" | "meter" | "meters" | "metre" | "metres" => value,
            "mi" | "mile" | "miles" => value * 1609.344,
            "ft" | "feet" => value * 0.3048,
            _ => 0.0,
        })
        .sum()
}

/// Format metres as `"X.Y km"` (one kilometre and above) or `"N m"`.
pub fn format_distance(meters: f64) -> String {
    if meters >= 1000.0 {
        format!("{:.1} km", meters / 1000.0)
    } else {
        format!("{} m", meters.max(0.0).round() as i64)
    }
}

/// Format seconds as `"H hr M min"` or `"M min"`, rounding to the minute.
pub fn format_duration(secs: i64) -> String {
    let minutes = (secs.max(0) + 30) / 60;
    let hours = minutes / 60;
    let minutes = minutes % 60;

    if hours > 0 {
        format!("{hours} hr {minutes} min")
    } else {
        format!("{minutes} min")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations() {
        assert_eq!(parse_duration_secs("2 mins"), 120);
        assert_eq!(parse_duration_secs("1 hr 5 min"), 3900);
        assert_eq!(parse_duration_secs("2 hours"), 7200);
        assert_eq!(parse_duration_secs("45 s"), 45);
        assert_eq!(parse_duration_secs("1 day 1 hour"), 90_000);
    }

    #[test]
    fn duration_fallback() {
        assert_eq!(parse_duration_secs(""), DEFAULT_DURATION_SECS);
        assert_eq!(parse_duration_secs("about a while"), DEFAULT_DURATION_SECS);
        // A bare number carries no unit.
        assert_eq!(parse_duration_secs("12"), DEFAULT_DURATION_SECS);
    }

    #[test]
    fn distances() {
        assert_eq!(parse_distance_meters("0.2 km"), 200.0);
        assert_eq!(parse_distance_meters("1,200 m"), 1200.0);
        assert_eq!(parse_distance_meters("75m"), 75.0);
        assert!((parse_distance_meters("1 mi") - 1609.344).abs() < 1e-9);
        assert_eq!(parse_distance_meters("nowhere"), 0.0);
    }

    #[test]
    fn format_distance_units() {
        assert_eq!(format_distance(0.0), "0 m");
        assert_eq!(format_distance(450.4), "450 m");
        assert_eq!(format_distance(999.0), "999 m");
        assert_eq!(format_distance(1000.0), "1.0 km");
        assert_eq!(format_distance(7000.0), "7.0 km");
        assert_eq!(format_distance(6349.0), "6.3 km");
    }

    #[test]
    fn format_duration_units() {
        assert_eq!(format_duration(0), "0 min");
        assert_eq!(format_duration(29), "0 min");
        assert_eq!(format_duration(90), "2 min");
        assert_eq!(format_duration(48 * 60), "48 min");
        assert_eq!(format_duration(3600), "1 hr 0 min");
        assert_eq!(format_duration(3900), "1 hr 5 min");
        assert_eq!(format_duration(-50), "0 min");
    }

    #[test]
    fn summed_text_round_trip() {
        let total = ["0.2 km", "6.5 km", "300 m"]
            .iter()
            .map(|t| parse_distance_meters(t))
            .sum::<f64>();
        assert_eq!(format_distance(total), "7.0 km");
    }
}
