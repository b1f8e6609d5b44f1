use sqlx::{FromRow, SqlitePool};

use crate::domain::models::Employee;

/// 従業員名簿の永続化
pub struct RosterRepository {
    pool: SqlitePool,
}

// =====================
// DB読み込み用ヘルパー構造体
// =====================

#[derive(FromRow)]
struct EmployeeRow {
    id: String,
    payload: String,
}

impl RosterRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 名簿全体を置き換えて保存する。
    /// payload にはワイヤ形式(JSON)をそのまま入れ、並び順は sort_order で持つ。
    pub async fn save_all(&self, employees: &[Employee]) -> Result<(), String> {
        // 1. トランザクション開始
        let mut tx = self.pool.begin().await.map_err(|e| e.to_string())?;

        // 2. 全削除してから入れ直す
        sqlx::query("DELETE FROM employees")
            .execute(&mut *tx)
            .await
            .map_err(|e| e.to_string())?;

        for (index, employee) in employees.iter().enumerate() {
            let payload = serde_json::to_string(employee).map_err(|e| e.to_string())?;

            sqlx::query("INSERT INTO employees (id, sort_order, payload) VALUES (?1, ?2, ?3)")
                .bind(&employee.id)
                .bind(index as i64)
                .bind(payload)
                .execute(&mut *tx)
                .await
                .map_err(|e| e.to_string())?;
        }

        // 3. コミット
        tx.commit().await.map_err(|e| e.to_string())?;
        Ok(())
    }

    /// 名簿順 (sort_order) で読み出す。
    /// この並びがそのまま自動割当の候補順になる。
    pub async fn load_all(&self) -> Result<Vec<Employee>, String> {
        let rows: Vec<EmployeeRow> = sqlx::query_as::<sqlx::Sqlite, EmployeeRow>(
            "SELECT id, payload FROM employees ORDER BY sort_order ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| e.to_string())?;

        rows.into_iter()
            .map(|row| {
                serde_json::from_str(&row.payload)
                    .map_err(|e| format!("従業員データの形式が不正です ({}): {}", row.id, e))
            })
            .collect()
    }
}
