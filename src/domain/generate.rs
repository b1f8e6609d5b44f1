// =====================
// 自動割当エンジン
// =====================

use crate::domain::eligibility::{eligible_candidates, resolve_roster, EmployeeMonthView};
use crate::domain::models::{
    CalendarClass, Employee, EngineError, MonthRef, MonthSchedule, ShiftType, SpecialDates,
};
use crate::domain::policy::{EngineConfig, PriorityTable, SelectionStrategy};

/// 1ヶ月分のシフトを自動生成する。
///
/// 方針表に従う決定的な選択だけで埋める（探索・最適化はしない）。
/// 同じ名簿・同じ月からは必ず同じシフト表ができる。
/// 既存のシフト表とは合成せず、常に全面的に作り直す。
/// 候補がいない枠は空のまま残し、ここではエラーにしない（検証側で報告する）。
pub fn generate(
    month: &MonthRef,
    roster: &[Employee],
    config: &EngineConfig,
    special: &SpecialDates,
) -> Result<MonthSchedule, EngineError> {
    // 1. 名簿を対象月向けに解決する（"M/D" ラベルはここで消化）
    let views = resolve_roster(roster, month)?;

    let mut schedule = MonthSchedule::new();

    // 2. 日ごとに必要な枠を埋めていく
    for day in 1..=month.days() {
        // 全日休業日には枠を作らない
        if special.closed.contains(&day) {
            continue;
        }

        let day_of_week = month.day_of_week(day);
        let class = month.calendar_class(day);

        for requirement in config.requirements.for_class(class) {
            if requirement.headcount == 0 {
                continue;
            }

            // 資格と週上限でふるいにかける。並びは名簿順のまま。
            let candidates = eligible_candidates(
                &views,
                month,
                day,
                day_of_week,
                requirement.shift,
                &schedule,
            );
            if candidates.is_empty() {
                continue;
            }

            let chosen = select(&config.priority, class, requirement.shift, &candidates);
            schedule.assign(day, requirement.shift, chosen.employee.id.clone());
        }
    }

    Ok(schedule)
}

/// 選択方針に従って候補から1人選ぶ。candidates は空でないこと。
fn select<'a, 'b>(
    table: &PriorityTable,
    class: CalendarClass,
    shift: ShiftType,
    candidates: &[&'b EmployeeMonthView<'a>],
) -> &'b EmployeeMonthView<'a> {
    match table.strategy_for(class, shift) {
        SelectionStrategy::FirstEligible => candidates[0],

        SelectionStrategy::NamedPriority(named) => named
            .iter()
            .find_map(|id| candidates.iter().find(|v| &v.employee.id == id))
            .copied()
            .unwrap_or(candidates[0]),

        SelectionStrategy::PreferredShiftFirst { named } => {
            let preferring: Vec<&EmployeeMonthView> = candidates
                .iter()
                .filter(|v| v.employee.preferred_shifts.contains(&shift))
                .copied()
                .collect();
            if preferring.is_empty() {
                return candidates[0];
            }
            named
                .iter()
                .find_map(|id| preferring.iter().find(|v| &v.employee.id == id))
                .copied()
                .unwrap_or(preferring[0])
        }
    }
}
