// =====================
// シフト表の検証
// =====================

use std::collections::BTreeSet;

use crate::domain::models::{
    DayOfMonth, Employee, EmployeeId, EngineError, MonthRef, MonthSchedule, ShiftType,
    SpecialDates,
};
use crate::domain::policy::EngineConfig;

/// 人員不足 1件分
#[derive(Debug, Clone, PartialEq)]
pub struct StaffingViolation {
    pub day: DayOfMonth,
    pub shift: ShiftType,
    pub required: u32,
}

/// 連続勤務の警告 1件分
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuousWorkWarning {
    pub employee_id: EmployeeId,
    pub start_day: DayOfMonth,
    pub end_day: DayOfMonth,
    pub run_length: u32,
}

/// 人員要求に対する充足検証。
///
/// 必要人数が設定されている枠が空のままなら1件ずつ報告する。
/// 全日休業日は要求ごと読み飛ばす。
/// 既に入っている割当の資格までは確認しない（手入力は入力時にチェックする前提）。
pub fn validate(
    month: &MonthRef,
    schedule: &MonthSchedule,
    config: &EngineConfig,
    special: &SpecialDates,
) -> Vec<StaffingViolation> {
    let mut violations = Vec::new();

    for day in 1..=month.days() {
        if special.closed.contains(&day) {
            continue;
        }
        let class = month.calendar_class(day);

        for requirement in config.requirements.for_class(class) {
            if requirement.headcount == 0 {
                continue;
            }
            if schedule.assignment(day, requirement.shift).is_none() {
                violations.push(StaffingViolation {
                    day,
                    shift: requirement.shift,
                    required: requirement.headcount,
                });
            }
        }
    }

    violations
}

/// シフト表が名簿に無い従業員IDを参照していないか確認する。
/// 参照切れはデータ破損なので、業務警告ではなくエラーとして返す。
pub fn verify_references(
    schedule: &MonthSchedule,
    roster: &[Employee],
) -> Result<(), EngineError> {
    let known: BTreeSet<&str> = roster.iter().map(|e| e.id.as_str()).collect();

    for (_, shifts) in schedule.iter_days() {
        for assignment in shifts.values() {
            if !known.contains(assignment.employee.as_str()) {
                return Err(EngineError::UnknownEmployee {
                    id: assignment.employee.clone(),
                });
            }
        }
    }
    Ok(())
}

/// 連続勤務が上限を超える区間を従業員ごとに洗い出す。
///
/// 1日でも割当があれば勤務日として数え、空いた日でカウンタを戻す。
/// 月末までカウンタが続いた場合も途中と同じ比較 (> 上限) で判定する。
pub fn find_long_runs(
    month: &MonthRef,
    schedule: &MonthSchedule,
    roster: &[Employee],
    max_continuous_days: u32,
) -> Vec<ContinuousWorkWarning> {
    let days = month.days();
    let mut warnings = Vec::new();

    for employee in roster {
        let mut run_length = 0u32;
        let mut run_start = 0u32;

        for day in 1..=days {
            if schedule.is_working(day, &employee.id) {
                if run_length == 0 {
                    run_start = day;
                }
                run_length += 1;
            } else {
                if run_length > max_continuous_days {
                    warnings.push(ContinuousWorkWarning {
                        employee_id: employee.id.clone(),
                        start_day: run_start,
                        end_day: day - 1,
                        run_length,
                    });
                }
                run_length = 0;
            }
        }

        // 月末までの連続分
        if run_length > max_continuous_days {
            warnings.push(ContinuousWorkWarning {
                employee_id: employee.id.clone(),
                start_day: run_start,
                end_day: days,
                run_length,
            });
        }
    }

    warnings
}

#[cfg(test)]
mod validate_tests {
    use super::*;
    use crate::domain::models::EmploymentType;
    use std::collections::BTreeMap;

    fn employee(id: &str) -> Employee {
        Employee {
            id: id.to_string(),
            name: id.to_string(),
            employment: EmploymentType::Parttime,
            fixed_days_off: vec![],
            unavailable_dates: vec![],
            special_dates: BTreeMap::new(),
            available_dates: None,
            preferred_shifts: vec![ShiftType::Day],
            max_night_shifts_per_week: None,
            special_shift_times: BTreeMap::new(),
        }
    }

    // 2025年9月 (9/1 が月曜)
    fn september() -> MonthRef {
        MonthRef::new(2025, 8).unwrap()
    }

    #[test]
    fn test_validate_reports_unfilled_slots() {
        let month = september();
        let config = EngineConfig::default();
        let mut schedule = MonthSchedule::new();

        // 9/1(月) は日勤だけ埋める
        schedule.assign(1, ShiftType::Day, "A".to_string());

        let violations = validate(&month, &schedule, &config, &SpecialDates::default());

        // 9/1 の夜勤は不足として挙がる
        assert!(violations.contains(&StaffingViolation {
            day: 1,
            shift: ShiftType::Night,
            required: 1,
        }));
        // 9/1 の日勤は挙がらない
        assert!(!violations
            .iter()
            .any(|v| v.day == 1 && v.shift == ShiftType::Day));
        // 休日の短時間枠も数えられている (9/6 は土曜)
        assert!(violations.contains(&StaffingViolation {
            day: 6,
            shift: ShiftType::Short,
            required: 1,
        }));
    }

    #[test]
    fn test_closed_date_is_exempt() {
        let month = september();
        let config = EngineConfig::default();
        let schedule = MonthSchedule::new();
        let mut special = SpecialDates::default();
        special.closed.insert(10);

        let violations = validate(&month, &schedule, &config, &special);
        assert!(!violations.iter().any(|v| v.day == 10));
        // 休業日以外はちゃんと不足になる
        assert!(violations.iter().any(|v| v.day == 11));
    }

    #[test]
    fn test_verify_references() {
        let roster = vec![employee("A")];
        let mut schedule = MonthSchedule::new();
        schedule.assign(1, ShiftType::Day, "A".to_string());
        assert!(verify_references(&schedule, &roster).is_ok());

        schedule.assign(2, ShiftType::Day, "Z".to_string());
        assert_eq!(
            verify_references(&schedule, &roster),
            Err(EngineError::UnknownEmployee {
                id: "Z".to_string()
            })
        );
    }

    #[test]
    fn test_long_run_detected_after_reset() {
        let month = september();
        let roster = vec![employee("A")];
        let mut schedule = MonthSchedule::new();

        // 9/1〜9/6 の6連勤、9/7 は休み
        for day in 1..=6 {
            schedule.assign(day, ShiftType::Day, "A".to_string());
        }

        let warnings = find_long_runs(&month, &schedule, &roster, 5);
        assert_eq!(
            warnings,
            vec![ContinuousWorkWarning {
                employee_id: "A".to_string(),
                start_day: 1,
                end_day: 6,
                run_length: 6,
            }]
        );
    }

    #[test]
    fn test_run_at_threshold_is_not_reported() {
        let month = september();
        let roster = vec![employee("A")];
        let mut schedule = MonthSchedule::new();
        for day in 1..=5 {
            schedule.assign(day, ShiftType::Day, "A".to_string());
        }
        assert!(find_long_runs(&month, &schedule, &roster, 5).is_empty());
    }

    #[test]
    fn test_run_reaching_month_end() {
        let month = september();
        let roster = vec![employee("A")];
        let mut schedule = MonthSchedule::new();

        // 9/24〜9/30 の7連勤で月が終わる
        for day in 24..=30 {
            schedule.assign(day, ShiftType::Day, "A".to_string());
        }

        let warnings = find_long_runs(&month, &schedule, &roster, 5);
        assert_eq!(
            warnings,
            vec![ContinuousWorkWarning {
                employee_id: "A".to_string(),
                start_day: 24,
                end_day: 30,
                run_length: 7,
            }]
        );
    }

    #[test]
    fn test_multiple_runs_for_one_employee() {
        let month = september();
        let roster = vec![employee("A")];
        let mut schedule = MonthSchedule::new();
        for day in 1..=6 {
            schedule.assign(day, ShiftType::Day, "A".to_string());
        }
        for day in 10..=17 {
            schedule.assign(day, ShiftType::Day, "A".to_string());
        }

        let warnings = find_long_runs(&month, &schedule, &roster, 5);
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].run_length, 6);
        assert_eq!(warnings[1].start_day, 10);
        assert_eq!(warnings[1].end_day, 17);
        assert_eq!(warnings[1].run_length, 8);
    }
}
