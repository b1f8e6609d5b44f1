// =====================
// ワイヤ形式と変換
// =====================
//
// 外部とやり取りするJSONの形はここに集める。
// "M/D" ラベルと日番号の変換は境界のこの層で済ませ、
// ドメイン側のループには持ち込まない。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::calendar;
use crate::domain::eligibility::IneligibleReason;
use crate::domain::models::{
    Assignment, DayOfMonth, Employee, EngineError, MonthRef, MonthSchedule, ShiftType,
    SpecialDates,
};
use crate::domain::stats::{EmployeeMonthlySummary, SummaryBreakdown};
use crate::domain::validate::{ContinuousWorkWarning, StaffingViolation};

/// 曜日の表示名 (0=日曜 〜 6=土曜)
pub const DAY_NAMES: [&str; 7] = ["日", "月", "火", "水", "木", "金", "土"];

/// 1ヶ月分のシフト表ファイル
///
/// schedule のキーは "M/D"（ゼロ埋めなし・年なし）。
/// 年月の文脈は year / month (0-11) として別に持つ。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleFile {
    pub year: i32,
    pub month: u32,
    pub schedule: BTreeMap<String, BTreeMap<ShiftType, Assignment>>,
}

/// ドメインのシフト表をワイヤ形式へ
pub fn schedule_to_file(month: &MonthRef, schedule: &MonthSchedule) -> ScheduleFile {
    let mut wire = BTreeMap::new();
    for (day, shifts) in schedule.iter_days() {
        wire.insert(month.date_label(day), shifts.clone());
    }
    ScheduleFile {
        year: month.year,
        month: month.month,
        schedule: wire,
    }
}

/// ワイヤ形式のシフト表をドメインへ。
/// 対象月に合わないキーはデータ破損としてエラーにする。
pub fn schedule_from_file(file: &ScheduleFile) -> Result<(MonthRef, MonthSchedule), EngineError> {
    let month = MonthRef::new(file.year, file.month)?;

    let mut schedule = MonthSchedule::new();
    for (label, shifts) in &file.schedule {
        let day = resolve_date_label(label, &month)?;
        for (shift, assignment) in shifts {
            schedule.assign(day, *shift, assignment.employee.clone());
        }
    }
    Ok((month, schedule))
}

/// 月ごとの特別日ファイル
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialDatesFile {
    #[serde(default)]
    pub holidays: Vec<String>,
    #[serde(default)]
    pub closed: Vec<String>,
    #[serde(default)]
    pub adjusted: BTreeMap<String, String>,
}

pub fn special_dates_to_file(month: &MonthRef, special: &SpecialDates) -> SpecialDatesFile {
    SpecialDatesFile {
        holidays: special
            .holidays
            .iter()
            .map(|day| month.date_label(*day))
            .collect(),
        closed: special
            .closed
            .iter()
            .map(|day| month.date_label(*day))
            .collect(),
        adjusted: special
            .adjusted
            .iter()
            .map(|(day, note)| (month.date_label(*day), note.clone()))
            .collect(),
    }
}

pub fn special_dates_from_file(
    month: &MonthRef,
    file: &SpecialDatesFile,
) -> Result<SpecialDates, EngineError> {
    let mut special = SpecialDates::default();

    for label in &file.holidays {
        special
            .holidays
            .insert(resolve_date_label(label, month)?);
    }
    for label in &file.closed {
        special
            .closed
            .insert(resolve_date_label(label, month)?);
    }
    for (label, note) in &file.adjusted {
        special
            .adjusted
            .insert(resolve_date_label(label, month)?, note.clone());
    }
    Ok(special)
}

/// "M/D" を対象月の日番号へ。月違い・範囲外はエラー。
pub fn resolve_date_label(label: &str, month: &MonthRef) -> Result<DayOfMonth, EngineError> {
    let days_in_month = month.days();
    let (m, d) = calendar::parse_date_label(label)?;
    if m != month.month + 1 {
        return Err(EngineError::InvalidDateLabel {
            value: label.to_string(),
        });
    }
    if d > days_in_month {
        return Err(EngineError::DayOutOfRange { day: d });
    }
    Ok(d)
}

/// 人員不足の報告 1件分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationRecord {
    pub date: String,
    pub shift_type: ShiftType,
    pub required_count: u32,
}

pub fn violation_to_record(month: &MonthRef, violation: &StaffingViolation) -> ViolationRecord {
    ViolationRecord {
        date: month.date_label(violation.day),
        shift_type: violation.shift,
        required_count: violation.required,
    }
}

/// 連続勤務警告の報告 1件分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContinuousWarningRecord {
    pub employee_id: String,
    pub start_date: String,
    pub end_date: String,
    pub run_length: u32,
}

pub fn warning_to_record(
    month: &MonthRef,
    warning: &ContinuousWorkWarning,
) -> ContinuousWarningRecord {
    ContinuousWarningRecord {
        employee_id: warning.employee_id.clone(),
        start_date: month.date_label(warning.start_day),
        end_date: month.date_label(warning.end_day),
        run_length: warning.run_length,
    }
}

/// 月次集計の報告 1件分。雇用区分で使う項目が変わる。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRecord {
    pub employee_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub off_days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regular_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holiday_hours: Option<f64>,
}

pub fn summary_to_record(summary: &EmployeeMonthlySummary) -> SummaryRecord {
    let mut record = SummaryRecord {
        employee_id: summary.employee_id.clone(),
        name: summary.name.clone(),
        work_days: None,
        off_days: None,
        shift_count: None,
        regular_hours: None,
        holiday_hours: None,
    };
    match summary.breakdown {
        SummaryBreakdown::Fulltime {
            work_days,
            off_days,
        } => {
            record.work_days = Some(work_days);
            record.off_days = Some(off_days);
        }
        SummaryBreakdown::Parttime {
            shift_count,
            regular_hours,
            holiday_hours,
        } => {
            record.shift_count = Some(shift_count);
            record.regular_hours = Some(regular_hours);
            record.holiday_hours = Some(holiday_hours);
        }
    }
    record
}

/// 手入力チェック用の診断メッセージ
pub fn ineligible_message(
    employee: &Employee,
    month: &MonthRef,
    day: DayOfMonth,
    reason: &IneligibleReason,
) -> String {
    match reason {
        IneligibleReason::FixedDayOff { weekday } => format!(
            "{} は{}曜が固定休です",
            employee.name,
            DAY_NAMES[*weekday as usize % 7]
        ),
        IneligibleReason::UnavailableDate => format!(
            "{} は {} に出勤できません",
            employee.name,
            month.date_label(day)
        ),
        IneligibleReason::SpecialDateRestricted { allowed } => {
            let shifts = allowed
                .iter()
                .map(|shift| shift.label())
                .collect::<Vec<_>>()
                .join("か");
            format!(
                "{} は {} は{}のみ可能です",
                employee.name,
                month.date_label(day),
                shifts
            )
        }
        IneligibleReason::OutsideAvailableDates => {
            format!("{} は指定された日付にしか入れません", employee.name)
        }
        IneligibleReason::ShiftNotPermitted => {
            format!("{} はこの班種に入れません", employee.name)
        }
        IneligibleReason::FulltimeDayOnly => "正社員は日勤のみです".to_string(),
    }
}

/// 週上限に達したときの診断メッセージ
pub fn quota_reached_message(employee: &Employee, cap: u32) -> String {
    format!(
        "{} は今週の夜勤が上限 ({}回) に達しています",
        employee.name, cap
    )
}

#[cfg(test)]
mod dto_tests {
    use super::*;

    fn november() -> MonthRef {
        MonthRef::new(2025, 10).unwrap()
    }

    #[test]
    fn test_schedule_round_trip() {
        let month = november();
        let mut schedule = MonthSchedule::new();
        schedule.assign(3, ShiftType::Day, "A".to_string());
        schedule.assign(3, ShiftType::Night, "C".to_string());
        schedule.assign(8, ShiftType::Short, "E".to_string());

        let file = schedule_to_file(&month, &schedule);
        assert_eq!(file.year, 2025);
        assert_eq!(file.month, 10);
        assert!(file.schedule.contains_key("11/3"));

        let (restored_month, restored) = schedule_from_file(&file).unwrap();
        assert_eq!(restored_month, month);
        assert_eq!(restored, schedule);
    }

    #[test]
    fn test_schedule_file_rejects_foreign_month_key() {
        let file = ScheduleFile {
            year: 2025,
            month: 10,
            schedule: BTreeMap::from([(
                "12/1".to_string(),
                BTreeMap::from([(
                    ShiftType::Day,
                    Assignment {
                        employee: "A".to_string(),
                    },
                )]),
            )]),
        };
        assert!(matches!(
            schedule_from_file(&file),
            Err(EngineError::InvalidDateLabel { .. })
        ));
    }

    #[test]
    fn test_schedule_file_rejects_day_out_of_range() {
        let file = ScheduleFile {
            year: 2025,
            month: 10,
            schedule: BTreeMap::from([(
                "11/31".to_string(),
                BTreeMap::from([(
                    ShiftType::Day,
                    Assignment {
                        employee: "A".to_string(),
                    },
                )]),
            )]),
        };
        assert_eq!(
            schedule_from_file(&file),
            Err(EngineError::DayOutOfRange { day: 31 })
        );
    }

    #[test]
    fn test_special_dates_round_trip() {
        let month = november();
        let file = SpecialDatesFile {
            holidays: vec!["11/3".to_string(), "11/23".to_string()],
            closed: vec!["11/17".to_string()],
            adjusted: BTreeMap::from([("11/24".to_string(), "棚卸しのため短縮".to_string())]),
        };

        let special = special_dates_from_file(&month, &file).unwrap();
        assert!(special.holidays.contains(&3));
        assert!(special.closed.contains(&17));
        assert_eq!(special.adjusted.get(&24).unwrap(), "棚卸しのため短縮");

        let back = special_dates_to_file(&month, &special);
        assert_eq!(back, file);
    }

    #[test]
    fn test_employee_wire_shape() {
        // ワイヤ形式のフィールド名・値表現が崩れていないこと
        let json = r#"{
            "id": "C",
            "name": "パートC",
            "type": "parttime",
            "fixedDaysOff": [],
            "unavailableDates": ["11/16", "11/17"],
            "specialDates": { "11/13": ["night"], "11/14": ["night"] },
            "preferredShifts": ["night"]
        }"#;
        let employee: Employee = serde_json::from_str(json).expect("should deserialize");
        assert_eq!(employee.id, "C");
        assert_eq!(
            employee.special_dates.get("11/13"),
            Some(&vec![ShiftType::Night])
        );
        assert_eq!(employee.max_night_shifts_per_week, None);

        let back = serde_json::to_value(&employee).unwrap();
        assert_eq!(back["type"], "parttime");
        assert_eq!(back["unavailableDates"][0], "11/16");
        // 未設定の任意項目はワイヤ形式に出さない
        assert!(back.get("maxNightShiftsPerWeek").is_none());
        assert!(back.get("availableDates").is_none());
    }
}
