use sqlx::{FromRow, SqlitePool};

use crate::domain::models::{DayOfMonth, MonthRef, MonthSchedule, ShiftType};

/// 月次シフト表の永続化
pub struct ScheduleRepository {
    pool: SqlitePool,
}

// =====================
// DB読み込み用ヘルパー構造体
// =====================

#[derive(FromRow)]
struct AssignmentRow {
    day: i64,
    shift_type: String,
    employee_id: String,
}

impl ScheduleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 対象月のシフト表を丸ごと保存する。
    /// 既存の行は消してから入れ直すので、自動生成の全面上書きと同じ意味になる。
    pub async fn save_month(
        &self,
        month: &MonthRef,
        schedule: &MonthSchedule,
    ) -> Result<(), String> {
        // 1. トランザクション開始
        let mut tx = self.pool.begin().await.map_err(|e| e.to_string())?;

        // 2. 対象月を全削除
        sqlx::query("DELETE FROM schedule_assignments WHERE year = ?1 AND month = ?2")
            .bind(month.year)
            .bind(month.month as i64)
            .execute(&mut *tx)
            .await
            .map_err(|e| e.to_string())?;

        // 3. 割当を1行ずつ保存
        for (day, shifts) in schedule.iter_days() {
            for (shift, assignment) in shifts {
                sqlx::query(
                    "INSERT INTO schedule_assignments (
                        year, month, day, shift_type, employee_id
                    ) VALUES (?1, ?2, ?3, ?4, ?5)",
                )
                .bind(month.year)
                .bind(month.month as i64)
                .bind(day as i64)
                .bind(shift.as_str())
                .bind(&assignment.employee)
                .execute(&mut *tx)
                .await
                .map_err(|e| e.to_string())?;
            }
        }

        // 4. コミット
        tx.commit().await.map_err(|e| e.to_string())?;
        Ok(())
    }

    /// 対象月のシフト表を読み出す。保存が無ければ空のシフト表を返す。
    pub async fn load_month(&self, month: &MonthRef) -> Result<MonthSchedule, String> {
        let rows: Vec<AssignmentRow> = sqlx::query_as::<sqlx::Sqlite, AssignmentRow>(
            "SELECT day, shift_type, employee_id FROM schedule_assignments
             WHERE year = ?1 AND month = ?2 ORDER BY day ASC",
        )
        .bind(month.year)
        .bind(month.month as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| e.to_string())?;

        let mut schedule = MonthSchedule::new();
        for row in rows {
            // 不明な班種はデータ破損なので握りつぶさない
            let shift = ShiftType::from_str(&row.shift_type)
                .ok_or_else(|| format!("不明な班種です: {}", row.shift_type))?;
            schedule.assign(row.day as DayOfMonth, shift, row.employee_id);
        }
        Ok(schedule)
    }

    /// 1枠だけ設定する（同じ枠があれば置き換え）
    pub async fn set_slot(
        &self,
        month: &MonthRef,
        day: DayOfMonth,
        shift: ShiftType,
        employee_id: &str,
    ) -> Result<(), String> {
        sqlx::query(
            "INSERT INTO schedule_assignments (
                year, month, day, shift_type, employee_id
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT (year, month, day, shift_type)
            DO UPDATE SET employee_id = excluded.employee_id",
        )
        .bind(month.year)
        .bind(month.month as i64)
        .bind(day as i64)
        .bind(shift.as_str())
        .bind(employee_id)
        .execute(&self.pool)
        .await
        .map_err(|e| e.to_string())?;
        Ok(())
    }

    /// 1枠だけ空にする。元々空なら何も起こらない。
    pub async fn clear_slot(
        &self,
        month: &MonthRef,
        day: DayOfMonth,
        shift: ShiftType,
    ) -> Result<(), String> {
        sqlx::query(
            "DELETE FROM schedule_assignments
             WHERE year = ?1 AND month = ?2 AND day = ?3 AND shift_type = ?4",
        )
        .bind(month.year)
        .bind(month.month as i64)
        .bind(day as i64)
        .bind(shift.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| e.to_string())?;
        Ok(())
    }
}
