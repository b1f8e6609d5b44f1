// =====================
// 月次集計
// =====================

use crate::domain::eligibility::EmployeeMonthView;
use crate::domain::models::{
    Employee, EmployeeId, EmploymentType, EngineError, MonthRef, MonthSchedule, SpecialDates,
};
use crate::domain::policy::{resolve_shift_time, EngineConfig};

/// 月次集計の内訳。雇用区分で見る数字が違う。
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryBreakdown {
    /// 正社員: 勤務日数と休日数（固定休と申請休から算出）
    Fulltime { work_days: u32, off_days: u32 },
    /// パート: 班数と時間数。祝日勤務分は別枠で積む。
    Parttime {
        shift_count: u32,
        regular_hours: f64,
        holiday_hours: f64,
    },
}

/// 従業員1人分の月次集計
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeMonthlySummary {
    pub employee_id: EmployeeId,
    pub name: String,
    pub breakdown: SummaryBreakdown,
}

/// 名簿全員の月次集計を名簿順で返す。
///
/// 正社員は勤務予定ベース（固定休・申請休以外は勤務日）で数え、
/// パートは実際のシフト表から班数と時間数を拾う。
pub fn monthly_summary(
    month: &MonthRef,
    schedule: &MonthSchedule,
    roster: &[Employee],
    config: &EngineConfig,
    special: &SpecialDates,
) -> Result<Vec<EmployeeMonthlySummary>, EngineError> {
    roster
        .iter()
        .map(|employee| {
            let breakdown = match employee.employment {
                EmploymentType::Fulltime => fulltime_breakdown(employee, month)?,
                EmploymentType::Parttime => {
                    parttime_breakdown(employee, month, schedule, config, special)
                }
            };
            Ok(EmployeeMonthlySummary {
                employee_id: employee.id.clone(),
                name: employee.name.clone(),
                breakdown,
            })
        })
        .collect()
}

fn fulltime_breakdown(
    employee: &Employee,
    month: &MonthRef,
) -> Result<SummaryBreakdown, EngineError> {
    let view = EmployeeMonthView::resolve(employee, month)?;

    let mut work_days = 0u32;
    let mut off_days = 0u32;
    for day in 1..=month.days() {
        let day_of_week = month.day_of_week(day);
        if employee.fixed_days_off.contains(&day_of_week) || view.is_unavailable(day) {
            off_days += 1;
        } else {
            work_days += 1;
        }
    }
    Ok(SummaryBreakdown::Fulltime {
        work_days,
        off_days,
    })
}

fn parttime_breakdown(
    employee: &Employee,
    month: &MonthRef,
    schedule: &MonthSchedule,
    config: &EngineConfig,
    special: &SpecialDates,
) -> SummaryBreakdown {
    let mut shift_count = 0u32;
    let mut regular_hours = 0.0f64;
    let mut holiday_hours = 0.0f64;

    for (day, shifts) in schedule.iter_days() {
        let class = month.calendar_class(day);
        for (shift, assignment) in shifts {
            if assignment.employee != employee.id {
                continue;
            }
            shift_count += 1;

            // 個人別の上書き -> 区分テーブル の順で時間を引く。
            // 区分に定義のない班種（手入力の変則枠）は時間に積まない。
            let hours = resolve_shift_time(employee, class, *shift, &config.shift_times)
                .map(|time| time.hours)
                .unwrap_or(0.0);

            if special.holidays.contains(&day) {
                holiday_hours += hours;
            } else {
                regular_hours += hours;
            }
        }
    }

    SummaryBreakdown::Parttime {
        shift_count,
        regular_hours,
        holiday_hours,
    }
}
