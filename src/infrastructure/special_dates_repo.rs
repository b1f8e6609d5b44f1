use sqlx::{FromRow, SqlitePool};

use crate::domain::models::{DayOfMonth, MonthRef, SpecialDates};

/// 特別日（祝日・休業日・営業時間調整）の永続化
pub struct SpecialDatesRepository {
    pool: SqlitePool,
}

// =====================
// DB読み込み用ヘルパー構造体
// =====================

#[derive(FromRow)]
struct SpecialDateRow {
    day: i64,
    kind: String,
    note: Option<String>,
}

impl SpecialDatesRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 対象月の特別日を丸ごと保存する（消してから入れ直す）
    pub async fn save_month(&self, month: &MonthRef, special: &SpecialDates) -> Result<(), String> {
        let mut tx = self.pool.begin().await.map_err(|e| e.to_string())?;

        sqlx::query("DELETE FROM special_dates WHERE year = ?1 AND month = ?2")
            .bind(month.year)
            .bind(month.month as i64)
            .execute(&mut *tx)
            .await
            .map_err(|e| e.to_string())?;

        for (day, kind, note) in rows_of(special) {
            sqlx::query(
                "INSERT INTO special_dates (year, month, day, kind, note)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .bind(month.year)
            .bind(month.month as i64)
            .bind(day as i64)
            .bind(kind)
            .bind(note)
            .execute(&mut *tx)
            .await
            .map_err(|e| e.to_string())?;
        }

        tx.commit().await.map_err(|e| e.to_string())?;
        Ok(())
    }

    /// 対象月の特別日を読み出す。保存が無ければ全部空で返す。
    pub async fn load_month(&self, month: &MonthRef) -> Result<SpecialDates, String> {
        let rows: Vec<SpecialDateRow> = sqlx::query_as::<sqlx::Sqlite, SpecialDateRow>(
            "SELECT day, kind, note FROM special_dates
             WHERE year = ?1 AND month = ?2 ORDER BY day ASC",
        )
        .bind(month.year)
        .bind(month.month as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| e.to_string())?;

        let mut special = SpecialDates::default();
        for row in rows {
            let day = row.day as DayOfMonth;
            match row.kind.as_str() {
                "holiday" => {
                    special.holidays.insert(day);
                }
                "closed" => {
                    special.closed.insert(day);
                }
                "adjusted" => {
                    special.adjusted.insert(day, row.note.unwrap_or_default());
                }
                other => return Err(format!("不明な特別日種別です: {}", other)),
            }
        }
        Ok(special)
    }
}

/// 保存用に (日, 種別, 説明) の列へ展開する
fn rows_of(special: &SpecialDates) -> Vec<(DayOfMonth, &'static str, Option<String>)> {
    let mut rows = Vec::new();
    for day in &special.holidays {
        rows.push((*day, "holiday", None));
    }
    for day in &special.closed {
        rows.push((*day, "closed", None));
    }
    for (day, note) in &special.adjusted {
        rows.push((*day, "adjusted", Some(note.clone())));
    }
    rows
}
