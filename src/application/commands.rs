// =====================
// サービス関数（外部境界）
// =====================
//
// 呼び出し側（CLI・テスト）はこの層だけを使う。
// エンジン本体は純粋関数のまま、永続化との橋渡しをここでやる。

use std::collections::BTreeSet;

use crate::application::dto::{
    self, ContinuousWarningRecord, ScheduleFile, SpecialDatesFile, SummaryRecord, ViolationRecord,
};
use crate::domain::eligibility::{check_assignable, under_weekly_limit, EmployeeMonthView};
use crate::domain::generate::generate;
use crate::domain::models::{Employee, MonthRef, ShiftType};
use crate::domain::policy::EngineConfig;
use crate::domain::stats::monthly_summary;
use crate::domain::validate::{find_long_runs, validate, verify_references};
use crate::AppServices;

// --- Roster ---

/// 名簿を保存する。IDの重複は保存前に弾く。
pub async fn store_roster(services: &AppServices, employees: &[Employee]) -> Result<(), String> {
    let mut seen = BTreeSet::new();
    for employee in employees {
        if !seen.insert(employee.id.as_str()) {
            return Err(format!("従業員IDが重複しています: {}", employee.id));
        }
    }
    services.roster.save_all(employees).await
}

pub async fn fetch_roster(services: &AppServices) -> Result<Vec<Employee>, String> {
    services.roster.load_all().await
}

// --- Special dates ---

pub async fn store_special_dates(
    services: &AppServices,
    year: i32,
    month: u32,
    file: &SpecialDatesFile,
) -> Result<(), String> {
    let month = MonthRef::new(year, month).map_err(|e| e.message())?;
    let special = dto::special_dates_from_file(&month, file).map_err(|e| e.message())?;
    services.special.save_month(&month, &special).await
}

pub async fn fetch_special_dates(
    services: &AppServices,
    year: i32,
    month: u32,
) -> Result<SpecialDatesFile, String> {
    let month = MonthRef::new(year, month).map_err(|e| e.message())?;
    let special = services.special.load_month(&month).await?;
    Ok(dto::special_dates_to_file(&month, &special))
}

// --- Schedule ---

/// 1ヶ月分のシフトを自動生成して保存する。
/// 既存のシフト表は生成結果で全面的に置き換わる。
pub async fn generate_schedule(
    services: &AppServices,
    config: &EngineConfig,
    year: i32,
    month: u32,
) -> Result<ScheduleFile, String> {
    let month = MonthRef::new(year, month).map_err(|e| e.message())?;
    let roster = services.roster.load_all().await?;
    let special = services.special.load_month(&month).await?;

    let schedule = generate(&month, &roster, config, &special).map_err(|e| e.message())?;

    services.schedule.save_month(&month, &schedule).await?;
    Ok(dto::schedule_to_file(&month, &schedule))
}

pub async fn fetch_schedule(
    services: &AppServices,
    year: i32,
    month: u32,
) -> Result<ScheduleFile, String> {
    let month = MonthRef::new(year, month).map_err(|e| e.message())?;
    let schedule = services.schedule.load_month(&month).await?;
    Ok(dto::schedule_to_file(&month, &schedule))
}

/// 人員要求に対する充足検証。
/// 名簿に無いIDへの参照が見つかったらデータ破損としてここで打ち切る。
pub async fn validate_schedule(
    services: &AppServices,
    config: &EngineConfig,
    year: i32,
    month: u32,
) -> Result<Vec<ViolationRecord>, String> {
    let month = MonthRef::new(year, month).map_err(|e| e.message())?;
    let roster = services.roster.load_all().await?;
    let schedule = services.schedule.load_month(&month).await?;
    let special = services.special.load_month(&month).await?;

    verify_references(&schedule, &roster).map_err(|e| e.message())?;

    let violations = validate(&month, &schedule, config, &special);
    Ok(violations
        .iter()
        .map(|violation| dto::violation_to_record(&month, violation))
        .collect())
}

/// 連続勤務チェック。max_continuous_days を超える区間を返す。
pub async fn check_continuous_work(
    services: &AppServices,
    year: i32,
    month: u32,
    max_continuous_days: u32,
) -> Result<Vec<ContinuousWarningRecord>, String> {
    let month = MonthRef::new(year, month).map_err(|e| e.message())?;
    let roster = services.roster.load_all().await?;
    let schedule = services.schedule.load_month(&month).await?;

    let warnings = find_long_runs(&month, &schedule, &roster, max_continuous_days);
    Ok(warnings
        .iter()
        .map(|warning| dto::warning_to_record(&month, warning))
        .collect())
}

/// 月次集計
pub async fn monthly_statistics(
    services: &AppServices,
    config: &EngineConfig,
    year: i32,
    month: u32,
) -> Result<Vec<SummaryRecord>, String> {
    let month = MonthRef::new(year, month).map_err(|e| e.message())?;
    let roster = services.roster.load_all().await?;
    let schedule = services.schedule.load_month(&month).await?;
    let special = services.special.load_month(&month).await?;

    let summaries = monthly_summary(&month, &schedule, &roster, config, &special)
        .map_err(|e| e.message())?;
    Ok(summaries.iter().map(dto::summary_to_record).collect())
}

/// 1枠だけの手入力。employee が None なら枠を空にする。
///
/// 資格と週上限は保存前にチェックするが、引っかかっても保存は止めず、
/// 診断メッセージを添えて返す（判断は操作者に委ねる）。
/// 名簿に無いIDだけは保存せずエラーにする。
pub async fn update_slot(
    services: &AppServices,
    year: i32,
    month: u32,
    date_label: &str,
    shift: ShiftType,
    employee: Option<&str>,
) -> Result<Option<String>, String> {
    let month = MonthRef::new(year, month).map_err(|e| e.message())?;
    let day = dto::resolve_date_label(date_label, &month).map_err(|e| e.message())?;

    let employee_id = match employee {
        Some(id) => id,
        None => {
            // 未設定の枠を消すのも正常系（何も起こらないだけ）
            services.schedule.clear_slot(&month, day, shift).await?;
            return Ok(None);
        }
    };

    let roster = services.roster.load_all().await?;
    let employee = roster
        .iter()
        .find(|e| e.id == employee_id)
        .ok_or_else(|| format!("名簿に存在しない従業員IDです: {}", employee_id))?;

    let schedule = services.schedule.load_month(&month).await?;
    let view = EmployeeMonthView::resolve(employee, &month).map_err(|e| e.message())?;
    let day_of_week = month.day_of_week(day);

    let advisory = match check_assignable(&view, day, day_of_week, shift) {
        Err(reason) => Some(dto::ineligible_message(employee, &month, day, &reason)),
        Ok(()) => {
            if !under_weekly_limit(employee, shift, &month, day, &schedule) {
                employee
                    .weekly_cap(shift)
                    .map(|cap| dto::quota_reached_message(employee, cap))
            } else {
                None
            }
        }
    };

    services
        .schedule
        .set_slot(&month, day, shift, employee_id)
        .await?;
    Ok(advisory)
}
