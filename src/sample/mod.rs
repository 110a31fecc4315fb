//! Sample model and wire payload parsing.
//!
//! A payload is UTF-8 text with exactly three comma-separated fields:
//!
//! ```text
//! 2024-01-01 10:00:00,42,1
//! ^ timestamp         ^  ^ flag (1 = ON)
//!                     value
//! ```

mod store;

pub use store::{SampleStore, SharedStore};

use chrono::{NaiveDateTime, Timelike};

/// Timestamp layout on the wire.
pub const WIRE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Layout of the stored time label.
pub const LABEL_FORMAT: &str = "%H:%M:%S";

/// One buffered reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    /// Time of day, `HH:MM:SS`. The date part of the wire timestamp is dropped.
    pub label: String,
    pub value: i64,
    /// Status flag. Only `1` means ON; any other integer is accepted and
    /// treated as OFF.
    pub flag: i64,
}

impl Sample {
    pub fn new(label: impl Into<String>, value: i64, flag: i64) -> Self {
        Self {
            label: label.into(),
            value,
            flag,
        }
    }

    pub fn is_on(&self) -> bool {
        self.flag == 1
    }
}

/// Why a payload was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    /// Payload bytes are not valid UTF-8.
    Utf8(String),
    /// Split on `,` did not yield exactly three fields.
    FieldCount(usize),
    /// Timestamp does not match `YYYY-MM-DD HH:MM:SS`.
    Timestamp { input: String, message: String },
    /// Value field is not an integer.
    Value { input: String, message: String },
    /// Flag field is not an integer.
    Flag { input: String, message: String },
}

impl std::fmt::Display for PayloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayloadError::Utf8(msg) => write!(f, "payload is not valid UTF-8: {}", msg),
            PayloadError::FieldCount(n) => write!(f, "expected 3 fields, got {}", n),
            PayloadError::Timestamp { input, message } => {
                write!(f, "bad timestamp '{}': {}", input, message)
            }
            PayloadError::Value { input, message } => {
                write!(f, "bad value '{}': {}", input, message)
            }
            PayloadError::Flag { input, message } => write!(f, "bad flag '{}': {}", input, message),
        }
    }
}

impl std::error::Error for PayloadError {}

/// Parses a raw message payload into a [`Sample`].
pub fn parse_payload(payload: &[u8]) -> Result<Sample, PayloadError> {
    let text = std::str::from_utf8(payload).map_err(|e| PayloadError::Utf8(e.to_string()))?;
    parse_line(text)
}

/// Parses a decoded payload line into a [`Sample`].
///
/// Value and flag tolerate surrounding whitespace (publishers often append a
/// newline); the timestamp must match the wire layout exactly.
pub fn parse_line(text: &str) -> Result<Sample, PayloadError> {
    let fields: Vec<&str> = text.split(',').collect();
    let [time_str, value_str, flag_str] = fields[..] else {
        return Err(PayloadError::FieldCount(fields.len()));
    };

    let label = format_label(time_str)?;

    let value = value_str
        .trim()
        .parse::<i64>()
        .map_err(|e| PayloadError::Value {
            input: value_str.to_string(),
            message: e.to_string(),
        })?;

    let flag = flag_str
        .trim()
        .parse::<i64>()
        .map_err(|e| PayloadError::Flag {
            input: flag_str.to_string(),
            message: e.to_string(),
        })?;

    Ok(Sample { label, value, flag })
}

/// Reformats a wire timestamp to its `HH:MM:SS` label.
///
/// Seconds must be in `0..=59`; chrono would otherwise accept `:60` as a
/// leap second.
fn format_label(input: &str) -> Result<String, PayloadError> {
    let dt = NaiveDateTime::parse_from_str(input, WIRE_TIME_FORMAT).map_err(|e| {
        PayloadError::Timestamp {
            input: input.to_string(),
            message: e.to_string(),
        }
    })?;
    if dt.nanosecond() >= 1_000_000_000 {
        return Err(PayloadError::Timestamp {
            input: input.to_string(),
            message: "second must be in 0..59".to_string(),
        });
    }
    Ok(dt.format(LABEL_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_payload() {
        let sample = parse_payload(b"2024-01-01 10:00:00,42,1").unwrap();
        assert_eq!(sample, Sample::new("10:00:00", 42, 1));
        assert!(sample.is_on());
    }

    #[test]
    fn test_parse_drops_date() {
        let sample = parse_payload(b"1999-12-31 23:59:59,-7,0").unwrap();
        assert_eq!(sample.label, "23:59:59");
        assert_eq!(sample.value, -7);
        assert!(!sample.is_on());
    }

    #[test]
    fn test_parse_trims_numeric_fields() {
        let sample = parse_payload(b"2024-03-05 07:08:09, 512 ,1\n").unwrap();
        assert_eq!(sample, Sample::new("07:08:09", 512, 1));
    }

    #[test]
    fn test_parse_accepts_out_of_range_flag() {
        let sample = parse_payload(b"2024-01-01 10:00:00,42,7").unwrap();
        assert_eq!(sample.flag, 7);
        assert!(!sample.is_on());
    }

    #[test]
    fn test_parse_wrong_field_count() {
        assert_eq!(
            parse_payload(b"2024-01-01 10:00:00,42"),
            Err(PayloadError::FieldCount(2))
        );
        assert_eq!(
            parse_payload(b"2024-01-01 10:00:00,42,1,9"),
            Err(PayloadError::FieldCount(4))
        );
        assert_eq!(parse_payload(b""), Err(PayloadError::FieldCount(1)));
    }

    #[test]
    fn test_parse_bad_value() {
        let err = parse_payload(b"2024-01-01 10:00:00,4.2,1").unwrap_err();
        assert!(matches!(err, PayloadError::Value { ref input, .. } if input == "4.2"));

        let err = parse_payload(b"2024-01-01 10:00:00,,1").unwrap_err();
        assert!(matches!(err, PayloadError::Value { .. }));
    }

    #[test]
    fn test_parse_bad_flag() {
        let err = parse_payload(b"2024-01-01 10:00:00,42,on").unwrap_err();
        assert!(matches!(err, PayloadError::Flag { ref input, .. } if input == "on"));
    }

    #[test]
    fn test_parse_bad_timestamp() {
        for payload in [
            "10:00:00,42,1",
            "2024-01-01T10:00:00,42,1",
            "2024-13-01 10:00:00,42,1",
            "2024-01-01 25:00:00,42,1",
            "2024-01-01 10:00:60,42,1",
            "not a date,42,1",
        ] {
            let err = parse_payload(payload.as_bytes()).unwrap_err();
            assert!(
                matches!(err, PayloadError::Timestamp { .. }),
                "{payload}: {err}"
            );
        }
    }

    #[test]
    fn test_parse_invalid_utf8() {
        let err = parse_payload(&[0xff, 0xfe, b',', b'1', b',', b'1']).unwrap_err();
        assert!(matches!(err, PayloadError::Utf8(_)));
    }

    #[test]
    fn test_error_display_mentions_input() {
        let err = parse_payload(b"2024-01-01 10:00:00,abc,1").unwrap_err();
        assert!(err.to_string().contains("'abc'"));
    }
}
