// =====================
// 運用設定（注入される構成オブジェクト）
// =====================
//
// 班時間・人員要求・選択方針はすべてこのモジュールの構造体として
// エンジン呼び出しごとに渡す。プロセス全体で共有する可変状態は持たない。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::models::{CalendarClass, Employee, EmployeeId, ShiftType};

/// 班の時間帯設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftTime {
    pub start: String,
    pub end: String,
    pub hours: f64,
}

impl ShiftTime {
    fn new(start: &str, end: &str, hours: f64) -> Self {
        Self {
            start: start.to_string(),
            end: end.to_string(),
            hours,
        }
    }
}

/// 区分(平日/休日)ごとの班時間テーブル
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftTimeTable {
    pub weekday: BTreeMap<ShiftType, ShiftTime>,
    pub weekend: BTreeMap<ShiftType, ShiftTime>,
}

impl ShiftTimeTable {
    pub fn for_class(&self, class: CalendarClass) -> &BTreeMap<ShiftType, ShiftTime> {
        match class {
            CalendarClass::Weekday => &self.weekday,
            CalendarClass::Weekend => &self.weekend,
        }
    }
}

impl Default for ShiftTimeTable {
    fn default() -> Self {
        // 平日は日勤・夜勤のみ。短時間班は休日だけ。
        let weekday = BTreeMap::from([
            (ShiftType::Day, ShiftTime::new("10:30", "18:30", 8.0)),
            (ShiftType::Night, ShiftTime::new("18:15", "24:15", 6.0)),
        ]);
        let weekend = BTreeMap::from([
            (ShiftType::Day, ShiftTime::new("09:50", "17:50", 8.0)),
            (ShiftType::Short, ShiftTime::new("12:00", "16:00", 4.0)),
            (ShiftType::Night, ShiftTime::new("16:15", "24:15", 8.0)),
        ]);
        Self { weekday, weekend }
    }
}

/// 班時間を引く。個人別の上書きがあればそちらを優先する。
pub fn resolve_shift_time<'a>(
    employee: &'a Employee,
    class: CalendarClass,
    shift: ShiftType,
    table: &'a ShiftTimeTable,
) -> Option<&'a ShiftTime> {
    employee
        .special_shift_times
        .get(&class)
        .and_then(|shifts| shifts.get(&shift))
        .or_else(|| table.for_class(class).get(&shift))
}

/// 必要人数 1件分
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftRequirement {
    pub shift: ShiftType,
    pub headcount: u32,
}

impl ShiftRequirement {
    pub fn new(shift: ShiftType, headcount: u32) -> Self {
        Self { shift, headcount }
    }
}

/// 区分ごとの人員要求。並び順がそのまま枠を埋める順序になる。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffingRequirements {
    pub weekday: Vec<ShiftRequirement>,
    pub weekend: Vec<ShiftRequirement>,
}

impl StaffingRequirements {
    pub fn for_class(&self, class: CalendarClass) -> &[ShiftRequirement] {
        match class {
            CalendarClass::Weekday => &self.weekday,
            CalendarClass::Weekend => &self.weekend,
        }
    }
}

impl Default for StaffingRequirements {
    fn default() -> Self {
        Self {
            weekday: vec![
                ShiftRequirement::new(ShiftType::Day, 1),
                ShiftRequirement::new(ShiftType::Night, 1),
            ],
            weekend: vec![
                ShiftRequirement::new(ShiftType::Day, 1),
                ShiftRequirement::new(ShiftType::Short, 1),
                ShiftRequirement::new(ShiftType::Night, 1),
            ],
        }
    }
}

/// 候補リストからの選び方
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionStrategy {
    /// 名簿順の先頭
    FirstEligible,
    /// 指名順に探し、誰もいなければ名簿順の先頭
    NamedPriority(Vec<EmployeeId>),
    /// その班種を希望する者に絞り、その中で指名順。
    /// 希望者がいなければ候補全体の先頭に戻す。
    PreferredShiftFirst { named: Vec<EmployeeId> },
}

/// (区分, 班種) に対する選択方針 1件。
/// class が None の規則は両区分に適用される。
#[derive(Debug, Clone, PartialEq)]
pub struct PriorityRule {
    pub class: Option<CalendarClass>,
    pub shift: ShiftType,
    pub strategy: SelectionStrategy,
}

/// 選択方針の一覧。先頭から探して最初に一致した規則を使う。
#[derive(Debug, Clone, PartialEq)]
pub struct PriorityTable {
    pub rules: Vec<PriorityRule>,
}

const FIRST_ELIGIBLE: SelectionStrategy = SelectionStrategy::FirstEligible;

impl PriorityTable {
    pub fn strategy_for(&self, class: CalendarClass, shift: ShiftType) -> &SelectionStrategy {
        self.rules
            .iter()
            .find(|rule| rule.shift == shift && (rule.class.is_none() || rule.class == Some(class)))
            .map(|rule| &rule.strategy)
            .unwrap_or(&FIRST_ELIGIBLE)
    }
}

impl Default for PriorityTable {
    fn default() -> Self {
        Self {
            rules: vec![
                // 休日の短時間班は E を最優先、次いで F
                PriorityRule {
                    class: Some(CalendarClass::Weekend),
                    shift: ShiftType::Short,
                    strategy: SelectionStrategy::NamedPriority(vec![
                        "E".to_string(),
                        "F".to_string(),
                    ]),
                },
                // 夜勤は希望者優先で D -> C -> F の順
                PriorityRule {
                    class: None,
                    shift: ShiftType::Night,
                    strategy: SelectionStrategy::PreferredShiftFirst {
                        named: vec!["D".to_string(), "C".to_string(), "F".to_string()],
                    },
                },
            ],
        }
    }
}

/// エンジンに注入する設定一式
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub shift_times: ShiftTimeTable,
    pub requirements: StaffingRequirements,
    pub priority: PriorityTable,
    /// 連続勤務の上限日数。これを超えた区間が警告になる。
    pub max_continuous_days: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            shift_times: ShiftTimeTable::default(),
            requirements: StaffingRequirements::default(),
            priority: PriorityTable::default(),
            max_continuous_days: 5,
        }
    }
}

#[cfg(test)]
mod policy_tests {
    use super::*;

    #[test]
    fn test_strategy_lookup_honors_class() {
        let table = PriorityTable::default();

        // 休日短時間班には指名規則が当たる
        let strategy = table.strategy_for(CalendarClass::Weekend, ShiftType::Short);
        assert!(matches!(strategy, SelectionStrategy::NamedPriority(_)));

        // 平日に短時間班の規則はないため既定に戻る
        let strategy = table.strategy_for(CalendarClass::Weekday, ShiftType::Short);
        assert!(matches!(strategy, SelectionStrategy::FirstEligible));

        // 夜勤の規則は区分を問わず当たる
        for class in [CalendarClass::Weekday, CalendarClass::Weekend] {
            let strategy = table.strategy_for(class, ShiftType::Night);
            assert!(matches!(
                strategy,
                SelectionStrategy::PreferredShiftFirst { .. }
            ));
        }
    }

    #[test]
    fn test_resolve_shift_time_prefers_override() {
        let table = ShiftTimeTable::default();
        let mut employee = crate::domain::models::Employee {
            id: "D".to_string(),
            name: "D".to_string(),
            employment: crate::domain::models::EmploymentType::Parttime,
            fixed_days_off: vec![],
            unavailable_dates: vec![],
            special_dates: BTreeMap::new(),
            available_dates: None,
            preferred_shifts: vec![ShiftType::Night],
            max_night_shifts_per_week: None,
            special_shift_times: BTreeMap::new(),
        };

        // 上書きが無ければ区分テーブルの値
        let time = resolve_shift_time(&employee, CalendarClass::Weekend, ShiftType::Night, &table)
            .expect("weekend night should exist");
        assert_eq!(time.hours, 8.0);

        // 休日夜勤だけ時間が違う従業員
        employee.special_shift_times.insert(
            CalendarClass::Weekend,
            BTreeMap::from([(ShiftType::Night, ShiftTime::new("16:45", "24:15", 7.5))]),
        );
        let time = resolve_shift_time(&employee, CalendarClass::Weekend, ShiftType::Night, &table)
            .expect("override should resolve");
        assert_eq!(time.hours, 7.5);
        assert_eq!(time.start, "16:45");

        // 平日側は上書きの影響を受けない
        let time = resolve_shift_time(&employee, CalendarClass::Weekday, ShiftType::Night, &table)
            .expect("weekday night should exist");
        assert_eq!(time.hours, 6.0);
    }
}
