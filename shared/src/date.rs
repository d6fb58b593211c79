//! 时间展示模块
//!
//! 后端时间戳统一解码为 `DateTime<Utc>`，这里只负责展示格式。

use chrono::{DateTime, Utc};

/// 列表与卡片使用的短日期，如 `Mar 01, 2024`
pub fn format_date(ts: &DateTime<Utc>) -> String {
    ts.format("%b %d, %Y").to_string()
}

/// 详情页使用的日期时间，如 `March 01, 2024 at 10:05`
pub fn format_datetime(ts: &DateTime<Utc>) -> String {
    ts.format("%B %d, %Y at %H:%M").to_string()
}

/// 相对时间，用于评论
pub fn format_relative(ts: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let secs = (*now - *ts).num_seconds().max(0);
    match secs {
        0..=59 => "just now".to_string(),
        60..=3599 => plural(secs / 60, "minute"),
        3600..=86_399 => plural(secs / 3600, "hour"),
        86_400..=2_591_999 => plural(secs / 86_400, "day"),
        _ => format_date(ts),
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_formats() {
        let ts = at(2024, 3, 1, 10, 5);
        assert_eq!(format_date(&ts), "Mar 01, 2024");
        assert_eq!(format_datetime(&ts), "March 01, 2024 at 10:05");
    }

    #[test]
    fn test_relative() {
        let now = at(2024, 3, 10, 12, 0);
        assert_eq!(format_relative(&now, &now), "just now");
        assert_eq!(format_relative(&(now - Duration::minutes(1)), &now), "1 minute ago");
        assert_eq!(format_relative(&(now - Duration::hours(5)), &now), "5 hours ago");
        assert_eq!(format_relative(&(now - Duration::days(2)), &now), "2 days ago");
        assert_eq!(format_relative(&at(2023, 1, 2, 0, 0), &now), "Jan 02, 2023");
    }

    #[test]
    fn test_future_timestamp_is_just_now() {
        let now = at(2024, 3, 10, 12, 0);
        assert_eq!(format_relative(&(now + Duration::hours(1)), &now), "just now");
    }
}
