use chrono::{Datelike, NaiveDate};

use crate::domain::models::{CalendarClass, EngineError};

/// 指定された年・月の日数を計算する
/// ※ month: 0 (1月) 〜 11 (12月)
pub fn days_in_month(year: i32, month: u32) -> u32 {
    // 1. その月の1日を取得
    // NaiveDate は 1-12 月を期待するため、引数 month(0-11) に +1 する
    let first_day = NaiveDate::from_ymd_opt(year, month + 1, 1)
        .expect("Invalid date provided (month should be 0-11)");

    // 2. 翌月の1日を取得して差分を取る
    // month が 11 (12月) の場合は翌年、それ以外は同じ年の month + 2 月
    let next_month_date = if month == 11 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1).unwrap()
    } else {
        NaiveDate::from_ymd_opt(year, month + 2, 1).unwrap()
    };

    next_month_date
        .signed_duration_since(first_day)
        .num_days() as u32
}

/// 曜日を返す (0=日曜 〜 6=土曜)
/// ※ month: 0-11
pub fn day_of_week(year: i32, month: u32, day: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month + 1, day)
        .expect("Invalid date provided (month should be 0-11, day within month)")
        .weekday()
        .num_days_from_sunday()
}

/// 土日判定 (day_of_week: 0=日曜 〜 6=土曜)
pub fn is_weekend(day_of_week: u32) -> bool {
    day_of_week == 0 || day_of_week == 6
}

/// 曜日から平日/休日の区分を返す
pub fn calendar_class(day_of_week: u32) -> CalendarClass {
    if is_weekend(day_of_week) {
        CalendarClass::Weekend
    } else {
        CalendarClass::Weekday
    }
}

/// 指定日を含むISO週（月曜始まり）の開始日を「その月の日番号」として返す。
///
/// 週が前月にまたがる場合は 0 以下になる。
/// 呼び出し側は 1..=日数 に切り詰めて使うこと（月をまたいだ集計はしない）。
pub fn iso_week_start(year: i32, month: u32, day: u32) -> i64 {
    let dow = day_of_week(year, month, day) as i64;

    // 月曜始まり
    let monday_offset = if dow == 0 { -6 } else { 1 - dow };
    day as i64 + monday_offset
}

/// "M/D" 形式の日付ラベルを (月 1-12, 日) に分解する。
///
/// 年は持たない形式なので、どの月の話かは呼び出し側が照合する。
pub fn parse_date_label(label: &str) -> Result<(u32, u32), EngineError> {
    let invalid = || EngineError::InvalidDateLabel {
        value: label.to_string(),
    };

    let (month_part, day_part) = label.split_once('/').ok_or_else(invalid)?;
    let month: u32 = month_part.trim().parse().map_err(|_| invalid())?;
    let day: u32 = day_part.trim().parse().map_err(|_| invalid())?;

    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return Err(invalid());
    }
    Ok((month, day))
}
