//! 日時文字列の解析

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
];

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// 範囲指定のどちら側か
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundKind {
    Start,
    End,
}

/// メッセージの日時を解析する
///
/// タイムゾーン付きの値は記載されたオフセットでのローカル時刻として扱う。
/// 日付のみの値はその日の0時とする。
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Some(parsed) = DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    {
        return Some(parsed);
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_local());
    }

    if let Some(parsed) = OFFSET_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(raw, format).ok())
    {
        return Some(parsed.naive_local());
    }

    parse_date(raw).map(|date| date.and_time(NaiveTime::MIN))
}

/// 日付のみの文字列を解析する
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

/// 時刻のみの文字列（`HH:MM` または `HH:MM:SS`）を解析する
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

/// ユーザー入力の範囲境界を解析する
///
/// 日付のみが指定された場合、開始側は0:00、終了側はその日の最終時刻とする。
pub fn parse_range_bound(raw: &str, kind: BoundKind) -> Option<NaiveDateTime> {
    if let Some(date) = parse_date(raw) {
        return Some(match kind {
            BoundKind::Start => date.and_time(NaiveTime::MIN),
            BoundKind::End => date.and_time(end_of_day()),
        });
    }
    parse_timestamp(raw)
}

/// 1日の最終時刻（小数秒を含むメッセージも取りこぼさない）
pub fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap_or(NaiveTime::MIN)
}
