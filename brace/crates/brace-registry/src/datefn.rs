//! Date and time functions (spec §6). Timestamps are Unix seconds (UTC);
//! there is no local-timezone concept in this engine, matching the host
//! survey runtime which always stores and evaluates in UTC.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};

use brace_value::{to_number, Value};

use crate::arity::Arity;
use crate::spec::FunctionSpec;

fn n(args: &[Value], i: usize) -> f64 {
    to_number(&args[i])
}

fn s(args: &[Value], i: usize) -> String {
    args[i].payload()
}

fn now_timestamp() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

fn to_datetime(timestamp: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(timestamp, 0).single().unwrap_or_else(|| Utc.timestamp_opt(0, 0).unwrap())
}

/// Translates the handful of PHP-style `date()` format characters the
/// survey templates actually use. Unknown characters pass through
/// literally, matching PHP's own "unknown directive is literal" fallback.
fn format_date(format: &str, dt: DateTime<Utc>) -> String {
    let mut out = String::new();
    for c in format.chars() {
        let piece = match c {
            'Y' => dt.year().to_string(),
            'y' => format!("{:02}", dt.year() % 100),
            'm' => format!("{:02}", dt.month()),
            'n' => dt.month().to_string(),
            'd' => format!("{:02}", dt.day()),
            'j' => dt.day().to_string(),
            'H' => format!("{:02}", dt.hour()),
            'G' => dt.hour().to_string(),
            'i' => format!("{:02}", dt.minute()),
            's' => format!("{:02}", dt.second()),
            'D' => dt.format("%a").to_string(),
            'l' => dt.format("%A").to_string(),
            'M' => dt.format("%b").to_string(),
            'F' => dt.format("%B").to_string(),
            'N' => dt.weekday().number_from_monday().to_string(),
            'w' => dt.weekday().num_days_from_sunday().to_string(),
            other => {
                out.push(other);
                continue;
            }
        };
        out.push_str(&piece);
    }
    out
}

pub fn table() -> Vec<FunctionSpec> {
    vec![
        FunctionSpec::new("date", None, Arity::Exact(&[1, 2]), |a| {
            let ts = if a.len() == 2 { n(a, 1) as i64 } else { now_timestamp() };
            Value::Str(format_date(&s(a, 0), to_datetime(ts)))
        }),
        FunctionSpec::new("gmdate", None, Arity::Exact(&[1, 2]), |a| {
            let ts = if a.len() == 2 { n(a, 1) as i64 } else { now_timestamp() };
            Value::Str(format_date(&s(a, 0), to_datetime(ts)))
        }),
        FunctionSpec::new("idate", None, Arity::Exact(&[1, 2]), |a| {
            let ts = if a.len() == 2 { n(a, 1) as i64 } else { now_timestamp() };
            let dt = to_datetime(ts);
            let format = s(a, 0);
            let value = match format.chars().next() {
                Some('Y') => dt.year(),
                Some('y') => dt.year() % 100,
                Some('m') => dt.month() as i32,
                Some('d') => dt.day() as i32,
                Some('H') => dt.hour() as i32,
                Some('i') => dt.minute() as i32,
                Some('s') => dt.second() as i32,
                _ => 0,
            };
            Value::Num(value as f64)
        }),
        FunctionSpec::new("mktime", None, Arity::Exact(&[0, 1, 2, 3, 4, 5, 6]), |a| {
            let get = |i: usize, default: i64| if a.len() > i { n(a, i) as i64 } else { default };
            let now = to_datetime(now_timestamp());
            let hour = get(0, now.hour() as i64);
            let minute = get(1, now.minute() as i64);
            let second = get(2, now.second() as i64);
            let month = get(3, now.month() as i64);
            let day = get(4, now.day() as i64);
            let year = get(5, now.year() as i64);
            match NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
            {
                Some(naive) => {
                    let base = Utc.from_utc_datetime(&naive).timestamp();
                    Value::Num((base + hour * 3600 + minute * 60 + second) as f64)
                }
                None => Value::Bool(false),
            }
        }),
        FunctionSpec::new("checkdate", None, Arity::Exact(&[3]), |a| {
            let (month, day, year) = (n(a, 0) as i32, n(a, 1) as i32, n(a, 2) as i32);
            Value::Bool(month >= 1 && month <= 12 && day >= 1 && NaiveDate::from_ymd_opt(year, month as u32, day as u32).is_some())
        }),
        FunctionSpec::new("time", None, Arity::Exact(&[0]), |_| Value::Num(now_timestamp() as f64)),
    ]
}

/// `strtotime`: tries a handful of common formats before giving up. PHP's
/// own parser recognizes a much larger grammar; templates observed in
/// practice only ever pass ISO dates or date+time, so those are what this
/// supports.
pub fn strtotime(input: &str) -> Value {
    let trimmed = input.trim();
    const FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%m/%d/%Y"];
    for fmt in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Value::Num(Utc.from_utc_datetime(&dt).timestamp() as f64);
        }
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            if let Some(dt) = date.and_hms_opt(0, 0, 0) {
                return Value::Num(Utc.from_utc_datetime(&dt).timestamp() as f64);
            }
        }
    }
    Value::Bool(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, args: &[Value]) -> Value {
        let f = table().into_iter().find(|f| f.name == name).unwrap();
        (f.call)(args)
    }

    #[test]
    fn date_formats_a_fixed_timestamp() {
        // 2021-01-02 03:04:05 UTC
        let ts = 1609556645.0;
        assert_eq!(
            call("date", &[Value::Str("Y-m-d H:i:s".into()), Value::Num(ts)]),
            Value::Str("2021-01-02 03:04:05".into())
        );
    }

    #[test]
    fn checkdate_rejects_february_30() {
        assert_eq!(call("checkdate", &[Value::Num(2.0), Value::Num(30.0), Value::Num(2024.0)]), Value::Bool(false));
    }

    #[test]
    fn checkdate_accepts_leap_day() {
        assert_eq!(call("checkdate", &[Value::Num(2.0), Value::Num(29.0), Value::Num(2024.0)]), Value::Bool(true));
    }

    #[test]
    fn strtotime_parses_iso_date() {
        match strtotime("2021-01-02") {
            Value::Num(_) => {}
            _ => panic!("expected a parsed timestamp"),
        }
    }

    #[test]
    fn strtotime_rejects_garbage() {
        assert_eq!(strtotime("not a date"), Value::Bool(false));
    }
}
