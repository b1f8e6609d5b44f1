// =====================
// ドメインモデル定義
// =====================

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::calendar;
use crate::domain::policy::ShiftTime;

// 従業員IDと日番号の型エイリアス
pub type EmployeeId = String;
pub type DayOfMonth = u32;

/// 班種 (シフトの種類)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftType {
    Day,
    Night,
    Short,
}

impl ShiftType {
    /// ワイヤ形式・DB保存で使う識別子
    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftType::Day => "day",
            ShiftType::Night => "night",
            ShiftType::Short => "short",
        }
    }

    /// 表示用の名称
    pub fn label(&self) -> &'static str {
        match self {
            ShiftType::Day => "日勤",
            ShiftType::Night => "夜勤",
            ShiftType::Short => "短時間",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "day" => Some(ShiftType::Day),
            "night" => Some(ShiftType::Night),
            "short" => Some(ShiftType::Short),
            _ => None,
        }
    }
}

/// 平日/休日の区分。適用する班時間と人員要求が変わる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarClass {
    Weekday,
    Weekend,
}

/// 雇用区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmploymentType {
    Fulltime,
    Parttime,
}

impl EmploymentType {
    pub fn label(&self) -> &'static str {
        match self {
            EmploymentType::Fulltime => "正社員",
            EmploymentType::Parttime => "パート",
        }
    }
}

/// 呼び出し側の誤用を表すエラー。
/// 業務上の結果（空き枠・警告など）はこのエラーでは表現しない。
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// 月の指定が範囲外 (0-11)
    InvalidMonth { year: i32, month: u32 },
    /// "M/D" 形式になっていない日付ラベル
    InvalidDateLabel { value: String },
    /// 名簿に存在しない従業員ID
    UnknownEmployee { id: EmployeeId },
    /// その月に存在しない日
    DayOutOfRange { day: DayOfMonth },
}

impl EngineError {
    /// 境界層で表示するメッセージ
    pub fn message(&self) -> String {
        match self {
            EngineError::InvalidMonth { year, month } => {
                format!("月の指定が不正です: {}-{} (month は 0-11)", year, month)
            }
            EngineError::InvalidDateLabel { value } => {
                format!("日付の形式が不正です: '{}' (M/D 形式で指定)", value)
            }
            EngineError::UnknownEmployee { id } => {
                format!("名簿に存在しない従業員IDです: {}", id)
            }
            EngineError::DayOutOfRange { day } => {
                format!("その月に存在しない日です: {}", day)
            }
        }
    }
}

/// 計算対象の年月
/// ※ month: 0 (1月) 〜 11 (12月)。ワイヤ形式と揃えている。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRef {
    pub year: i32,
    pub month: u32,
}

impl MonthRef {
    pub fn new(year: i32, month: u32) -> Result<Self, EngineError> {
        if month > 11 {
            return Err(EngineError::InvalidMonth { year, month });
        }
        Ok(Self { year, month })
    }

    pub fn days(&self) -> u32 {
        calendar::days_in_month(self.year, self.month)
    }

    /// 曜日 (0=日曜 〜 6=土曜)
    pub fn day_of_week(&self, day: DayOfMonth) -> u32 {
        calendar::day_of_week(self.year, self.month, day)
    }

    pub fn calendar_class(&self, day: DayOfMonth) -> CalendarClass {
        calendar::calendar_class(self.day_of_week(day))
    }

    /// "M/D" 形式の日付ラベル（ゼロ埋めなし）
    pub fn date_label(&self, day: DayOfMonth) -> String {
        format!("{}/{}", self.month + 1, day)
    }

    /// "YYYY-M" 形式の月キー（表示・ファイル名用）
    pub fn month_key(&self) -> String {
        format!("{}-{}", self.year, self.month + 1)
    }
}

/// 従業員マスタ。ワイヤ形式(JSON)と同じ形で保持する。
///
/// 日付はすべて "M/D" のラベル文字列。年を持たないため、
/// 対象月との照合はエンジン側の解決処理で行う。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    #[serde(rename = "type")]
    pub employment: EmploymentType,

    /// 固定休の曜日 (0=日曜 〜 6=土曜)
    #[serde(default)]
    pub fixed_days_off: Vec<u32>,

    /// 出勤不可日
    #[serde(default)]
    pub unavailable_dates: Vec<String>,

    /// 特定日に許可する班種の制限。空リストは「制限なし」扱い。
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub special_dates: BTreeMap<String, Vec<ShiftType>>,

    /// 出勤可能日の明示リスト。指定があればこの日付以外には入れない。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_dates: Option<Vec<String>>,

    /// 勤務できる班種
    #[serde(default)]
    pub preferred_shifts: Vec<ShiftType>,

    /// 夜勤の週上限（ISO週あたりの回数）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_night_shifts_per_week: Option<u32>,

    /// 個人別の班時間の上書き (区分 -> 班種 -> 時間)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub special_shift_times: BTreeMap<CalendarClass, BTreeMap<ShiftType, ShiftTime>>,
}

impl Employee {
    /// この班種に週上限が設定されていれば返す
    pub fn weekly_cap(&self, shift: ShiftType) -> Option<u32> {
        match shift {
            ShiftType::Night => self.max_night_shifts_per_week,
            _ => None,
        }
    }
}

/// 1枠分の割当。ワイヤ形式は {"employee": id}
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub employee: EmployeeId,
}

/// 1ヶ月分のシフト表 (日 -> 班種 -> 割当)
///
/// 1つの (日, 班種) 枠を埋めるのは1人だけ。枠は空のままでもよい。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthSchedule {
    days: BTreeMap<DayOfMonth, BTreeMap<ShiftType, Assignment>>,
}

impl MonthSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// 枠を設定する。同じ内容の再設定は冪等。
    pub fn assign(&mut self, day: DayOfMonth, shift: ShiftType, employee: EmployeeId) {
        self.days
            .entry(day)
            .or_default()
            .insert(shift, Assignment { employee });
    }

    /// 枠を空にする。未設定の枠なら何もしない。
    /// その日の枠がすべて無くなったら日のエントリごと削除する。
    pub fn clear(&mut self, day: DayOfMonth, shift: ShiftType) {
        if let Some(shifts) = self.days.get_mut(&day) {
            shifts.remove(&shift);
            if shifts.is_empty() {
                self.days.remove(&day);
            }
        }
    }

    pub fn assignment(&self, day: DayOfMonth, shift: ShiftType) -> Option<&Assignment> {
        self.days.get(&day).and_then(|shifts| shifts.get(&shift))
    }

    /// その日に1枠でも入っているか
    pub fn is_working(&self, day: DayOfMonth, employee_id: &str) -> bool {
        self.days
            .get(&day)
            .map(|shifts| shifts.values().any(|a| a.employee == employee_id))
            .unwrap_or(false)
    }

    pub fn iter_days(
        &self,
    ) -> impl Iterator<Item = (DayOfMonth, &BTreeMap<ShiftType, Assignment>)> {
        self.days.iter().map(|(day, shifts)| (*day, shifts))
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn assignment_count(&self) -> usize {
        self.days.values().map(|shifts| shifts.len()).sum()
    }
}

/// 月ごとの特別日設定（日番号で保持する内部形式）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpecialDates {
    /// 国民の祝日。時間集計の区分にのみ影響し、割当可否には影響しない。
    pub holidays: BTreeSet<DayOfMonth>,
    /// 全日休業日。枠を生成せず、検証でも要求しない。
    pub closed: BTreeSet<DayOfMonth>,
    /// 営業時間調整日 (日 -> 自由記述の説明)
    pub adjusted: BTreeMap<DayOfMonth, String>,
}

#[cfg(test)]
mod month_schedule_tests {
    use super::*;

    #[test]
    fn test_assign_is_idempotent() {
        let mut schedule = MonthSchedule::new();
        schedule.assign(3, ShiftType::Day, "A".to_string());

        let once = schedule.clone();
        schedule.assign(3, ShiftType::Day, "A".to_string());

        // 同じ設定を2回しても結果は変わらない
        assert_eq!(schedule, once);
        assert_eq!(schedule.assignment_count(), 1);
    }

    #[test]
    fn test_clear_unset_slot_is_noop() {
        let mut schedule = MonthSchedule::new();
        schedule.clear(5, ShiftType::Night);
        assert!(schedule.is_empty());
    }

    #[test]
    fn test_clear_removes_empty_day_entry() {
        let mut schedule = MonthSchedule::new();
        schedule.assign(5, ShiftType::Day, "A".to_string());
        schedule.assign(5, ShiftType::Night, "C".to_string());

        schedule.clear(5, ShiftType::Day);
        assert!(schedule.assignment(5, ShiftType::Day).is_none());
        assert!(schedule.assignment(5, ShiftType::Night).is_some());

        // 最後の枠を消したら日のエントリも消える
        schedule.clear(5, ShiftType::Night);
        assert!(schedule.is_empty());
    }

    #[test]
    fn test_is_working_across_shift_types() {
        let mut schedule = MonthSchedule::new();
        schedule.assign(10, ShiftType::Night, "F".to_string());

        assert!(schedule.is_working(10, "F"));
        assert!(!schedule.is_working(10, "A"));
        assert!(!schedule.is_working(11, "F"));
    }
}
