// =====================
// 割当資格の判定
// =====================

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::calendar;
use crate::domain::models::{
    DayOfMonth, Employee, EmploymentType, EngineError, MonthRef, MonthSchedule, ShiftType,
};

/// 割当できない理由。順に規則を確認し、最初に違反した規則を返す。
#[derive(Debug, Clone, PartialEq)]
pub enum IneligibleReason {
    /// 固定休の曜日
    FixedDayOff { weekday: u32 },
    /// 出勤不可日
    UnavailableDate,
    /// 特定日の班種制限に合わない
    SpecialDateRestricted { allowed: Vec<ShiftType> },
    /// 出勤可能日リストに含まれない
    OutsideAvailableDates,
    /// 勤務できる班種ではない
    ShiftNotPermitted,
    /// 正社員は日勤のみ
    FulltimeDayOnly,
}

/// 従業員1人を対象月向けに解決したビュー。
///
/// "M/D" ラベルはここで日番号の集合に変換しておき、
/// 割当ループの中では文字列を一切扱わない。
#[derive(Debug)]
pub struct EmployeeMonthView<'a> {
    pub employee: &'a Employee,
    unavailable: BTreeSet<DayOfMonth>,
    special: BTreeMap<DayOfMonth, Vec<ShiftType>>,
    available: Option<BTreeSet<DayOfMonth>>,
}

impl<'a> EmployeeMonthView<'a> {
    /// ラベルを解決してビューを作る。形式不正のラベルはエラー。
    pub fn resolve(employee: &'a Employee, month: &MonthRef) -> Result<Self, EngineError> {
        let unavailable = resolve_days(&employee.unavailable_dates, month)?;

        let mut special = BTreeMap::new();
        for (label, shifts) in &employee.special_dates {
            if let Some(day) = resolve_label(label, month)? {
                special.insert(day, shifts.clone());
            }
        }

        // 空リストの出勤可能日指定は「制限なし」とみなす
        let available = match &employee.available_dates {
            Some(labels) if !labels.is_empty() => Some(resolve_days(labels, month)?),
            _ => None,
        };

        Ok(Self {
            employee,
            unavailable,
            special,
            available,
        })
    }

    /// 出勤不可日か（対象月の日番号で判定）
    pub fn is_unavailable(&self, day: DayOfMonth) -> bool {
        self.unavailable.contains(&day)
    }
}

/// ラベル1件を対象月の日番号に解決する。
/// 別の月のラベル、および月の日数を超えるラベルは None（対象外）。
fn resolve_label(label: &str, month: &MonthRef) -> Result<Option<DayOfMonth>, EngineError> {
    let (m, d) = calendar::parse_date_label(label)?;
    if m == month.month + 1 && d <= month.days() {
        Ok(Some(d))
    } else {
        Ok(None)
    }
}

fn resolve_days(labels: &[String], month: &MonthRef) -> Result<BTreeSet<DayOfMonth>, EngineError> {
    let mut days = BTreeSet::new();
    for label in labels {
        if let Some(day) = resolve_label(label, month)? {
            days.insert(day);
        }
    }
    Ok(days)
}

/// 名簿全員を対象月向けに解決する。並び順は名簿のまま。
pub fn resolve_roster<'a>(
    roster: &'a [Employee],
    month: &MonthRef,
) -> Result<Vec<EmployeeMonthView<'a>>, EngineError> {
    roster
        .iter()
        .map(|employee| EmployeeMonthView::resolve(employee, month))
        .collect()
}

/// (日, 班種) への割当可否を判定する。
///
/// 自動割当の候補列挙と、手入力の事前チェックの両方がこの関数を使う。
/// 判定順は診断メッセージの出し方にだけ意味があり、真偽には影響しない。
pub fn check_assignable(
    view: &EmployeeMonthView,
    day: DayOfMonth,
    day_of_week: u32,
    shift: ShiftType,
) -> Result<(), IneligibleReason> {
    let employee = view.employee;

    // 1. 固定休の曜日
    if employee.fixed_days_off.contains(&day_of_week) {
        return Err(IneligibleReason::FixedDayOff {
            weekday: day_of_week,
        });
    }

    // 2. 出勤不可日
    if view.unavailable.contains(&day) {
        return Err(IneligibleReason::UnavailableDate);
    }

    // 3. 特定日の班種制限（空リストは制限なし）
    if let Some(allowed) = view.special.get(&day) {
        if !allowed.is_empty() && !allowed.contains(&shift) {
            return Err(IneligibleReason::SpecialDateRestricted {
                allowed: allowed.clone(),
            });
        }
    }

    // 4. 出勤可能日の明示リスト
    if let Some(available) = &view.available {
        if !available.contains(&day) {
            return Err(IneligibleReason::OutsideAvailableDates);
        }
    }

    // 5. 勤務できる班種か
    if !employee.preferred_shifts.contains(&shift) {
        return Err(IneligibleReason::ShiftNotPermitted);
    }

    // 6. 正社員は日勤のみ
    if employee.employment == EmploymentType::Fulltime && shift != ShiftType::Day {
        return Err(IneligibleReason::FulltimeDayOnly);
    }

    Ok(())
}

pub fn is_assignable(
    view: &EmployeeMonthView,
    day: DayOfMonth,
    day_of_week: u32,
    shift: ShiftType,
) -> bool {
    check_assignable(view, day, day_of_week, shift).is_ok()
}

/// 週上限の判定。上限が設定されていない班種なら常に true。
///
/// 対象日を含むISO週（月曜始まり）を月内に切り詰めて、
/// 同じ班種の既存割当を数える。月をまたいだ集計はしない。
pub fn under_weekly_limit(
    employee: &Employee,
    shift: ShiftType,
    month: &MonthRef,
    day: DayOfMonth,
    schedule: &MonthSchedule,
) -> bool {
    let cap = match employee.weekly_cap(shift) {
        Some(cap) => cap,
        None => return true,
    };

    let week_start = calendar::iso_week_start(month.year, month.month, day);
    let week_end = week_start + 6;

    // 月の範囲 [1, 日数] に切り詰める
    let from = week_start.max(1) as DayOfMonth;
    let to = week_end.min(month.days() as i64) as DayOfMonth;

    let count = (from..=to)
        .filter(|d| {
            schedule
                .assignment(*d, shift)
                .map(|a| a.employee == employee.id)
                .unwrap_or(false)
        })
        .count() as u32;

    count < cap
}

/// 割当候補（資格あり・週上限内）を名簿順で返す。
pub fn eligible_candidates<'a, 'b>(
    views: &'b [EmployeeMonthView<'a>],
    month: &MonthRef,
    day: DayOfMonth,
    day_of_week: u32,
    shift: ShiftType,
    schedule: &MonthSchedule,
) -> Vec<&'b EmployeeMonthView<'a>> {
    views
        .iter()
        .filter(|view| is_assignable(view, day, day_of_week, shift))
        .filter(|view| under_weekly_limit(view.employee, shift, month, day, schedule))
        .collect()
}
