use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use std::fs;
use std::path::Path;

pub mod application;
pub mod domain;
pub mod infrastructure;

use infrastructure::roster_repo::RosterRepository;
use infrastructure::schedule_repo::ScheduleRepository;
use infrastructure::special_dates_repo::SpecialDatesRepository;

// 全てのリポジトリを保持するコンテナ
pub struct AppServices {
    pub roster: RosterRepository,
    pub schedule: ScheduleRepository,
    pub special: SpecialDatesRepository,
}

impl AppServices {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            // poolは内部で参照カウントされているのでcloneしても低コスト
            roster: RosterRepository::new(pool.clone()),
            schedule: ScheduleRepository::new(pool.clone()),
            special: SpecialDatesRepository::new(pool),
        }
    }
}

/// DBファイルを開き、無ければ作成してマイグレーションまで済ませる
pub async fn open_database(db_path: &Path) -> Result<SqlitePool, String> {
    // --- ディレクトリ作成（冪等） ---
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
    }

    // --- DB 接続設定 ---
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true);

    // --- DB 接続 ---
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(|e| e.to_string())?;

    // --- テーブル ---
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| e.to_string())?;

    Ok(pool)
}
