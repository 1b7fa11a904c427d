use crate::error::CueError;

use std::fmt;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;

// Either plain seconds (`75`, `12.5`) or clock form (`1:15`, `01:02:03.250`).
static TIME_INPUT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:(?:(\d+):)?(\d+):)?(\d+(?:\.\d+)?)$").unwrap());

const SECS_PER_DAY: u64 = 86_400;

/// A cue time rendered as `HH:MM:SS.mmm`.
///
/// Hours wrap at 24, so anything at or past a full day starts again from `00`.
#[derive(Debug, Clone, Copy)]
pub struct Timestamp(pub Duration);

impl fmt::Display for Timestamp {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let total_secs = self.0.as_secs();
        let hours = (total_secs % SECS_PER_DAY) / 3600;
        let minutes = (total_secs % 3600) / 60;
        let seconds = total_secs % 60;
        let millis = self.0.subsec_millis();
        write!(
            fmt,
            "{:02}:{:02}:{:02}.{:03}",
            hours, minutes, seconds, millis
        )
    }
}

pub fn write_ts<W: fmt::Write>(buf: &mut W, timestamp: Duration) -> fmt::Result {
    write!(buf, "{}", Timestamp(timestamp))
}

/// Formats a time given in seconds.
pub fn format(seconds: f64) -> Result<String, CueError> {
    let duration = duration_from_secs(seconds)?;
    Ok(Timestamp(duration).to_string())
}

/// Converts a number of seconds to a millisecond-resolution duration.
pub fn duration_from_secs(seconds: f64) -> Result<Duration, CueError> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(CueError::InvalidInput(format!(
            "time must be a non-negative number of seconds, got {}",
            seconds
        )));
    }
    let millis = (seconds * 1000.0).round();
    if millis >= u64::MAX as f64 {
        return Err(CueError::InvalidInput(format!(
            "time is out of range: {}",
            seconds
        )));
    }
    Ok(Duration::from_millis(millis as u64))
}

/// Parses a time typed by the user into seconds.
pub fn parse_seconds(input: &str) -> Result<f64, CueError> {
    let invalid = || CueError::InvalidInput(format!("'{}' is not a valid time", input));

    let caps = TIME_INPUT_RE.captures(input.trim()).ok_or_else(invalid)?;
    let seconds: f64 = caps[3].parse().map_err(|_| invalid())?;

    let minutes = match caps.get(2) {
        Some(m) => {
            if seconds >= 60.0 {
                return Err(invalid());
            }
            m.as_str().parse::<u64>().map_err(|_| invalid())?
        }
        None => 0,
    };
    let hours = match caps.get(1) {
        Some(h) => {
            if minutes >= 60 {
                return Err(invalid());
            }
            h.as_str().parse::<u64>().map_err(|_| invalid())?
        }
        None => 0,
    };

    let whole = hours
        .checked_mul(3600)
        .and_then(|h| minutes.checked_mul(60).and_then(|m| h.checked_add(m)))
        .ok_or_else(invalid)?;
    Ok(whole as f64 + seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_format_ts {
        ($($name:ident: $value:expr,)*) => {
        $(
            #[test]
            fn $name() {
                let (input, expected) = $value;

                assert_eq!(format(input).expect("Failed to format"), expected);
            }
        )*
        }
    }

    test_format_ts! {
        test_format_ts_0: (0.0, "00:00:00.000"),
        test_format_ts_1: (5.0, "00:00:05.000"),
        test_format_ts_2: (59.0, "00:00:59.000"),
        test_format_ts_3: (60.0, "00:01:00.000"),
        test_format_ts_4: (3661.0, "01:01:01.000"),
        test_format_ts_5: (86_399.0, "23:59:59.000"),
        test_format_ts_6: (86_400.0, "00:00:00.000"),
        test_format_ts_7: (90_061.0, "01:01:01.000"),
        test_format_ts_8: (1.5, "00:00:01.500"),
        test_format_ts_9: (0.1, "00:00:00.100"),
        test_format_ts_10: (59.9994, "00:00:59.999"),
        test_format_ts_11: (7_326.159, "02:02:06.159"),
    }

    macro_rules! test_parse_seconds {
        ($($name:ident: $value:expr,)*) => {
        $(
            #[test]
            fn $name() {
                let (input, expected) = $value;

                assert_eq!(parse_seconds(input), expected);
            }
        )*
        }
    }

    test_parse_seconds! {
        test_parse_seconds_0: ("75", Ok(75.0)),
        test_parse_seconds_1: ("12.5", Ok(12.5)),
        test_parse_seconds_2: ("1:15", Ok(75.0)),
        test_parse_seconds_3: ("01:02:03.250", Ok(3723.25)),
        test_parse_seconds_4: (" 0 ", Ok(0.0)),
        test_parse_seconds_5: ("25:00:00", Ok(90_000.0)),
    }

    #[test]
    fn parse_seconds_rejects_malformed_input() {
        for input in &["", "abc", "-3", "1e3", "NaN", "inf", "1:75", "1:60:00", "1:2:3:4", "1.", ".5",
            "9999999999999999:00:00", "9999999999999999999:00"] {
            match parse_seconds(input) {
                Err(CueError::InvalidInput(_)) => (),
                other => panic!("'{}' should be rejected, got {:?}", input, other),
            }
        }
    }

    #[test]
    fn format_rejects_negative_and_non_finite() {
        for input in &[-1.0, -0.001, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(format(*input), Err(CueError::InvalidInput(_))));
        }
    }

    #[test]
    fn whole_seconds_always_have_zero_millis() {
        let shape = Regex::new(r"^\d{2}:\d{2}:\d{2}\.000$").unwrap();
        for secs in (0..200_000u64).step_by(37) {
            let ts = format(secs as f64).unwrap();
            assert!(shape.is_match(&ts), "{} formatted as {}", secs, ts);
        }
    }

    #[test]
    fn write_ts_appends_to_buffer() {
        let mut buf = String::from("at ");
        write_ts(&mut buf, Duration::from_millis(61_001)).unwrap();
        assert_eq!(buf, "at 00:01:01.001");
    }
}
