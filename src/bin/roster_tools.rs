use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

use shift_roster::application::commands;
use shift_roster::application::dto::{schedule_from_file, SpecialDatesFile, DAY_NAMES};
use shift_roster::domain::models::{Employee, MonthRef, ShiftType};
use shift_roster::domain::policy::{resolve_shift_time, EngineConfig};
use shift_roster::{open_database, AppServices};

// 引数を構造体として定義します
#[derive(Parser)]
#[command(name = "roster_tools")]
#[command(version = "0.1.0")]
#[command(about = "シフト名簿の管理と月次シフトの自動割当・検証をします", long_about = None)]
struct Cli {
    /// DBファイル
    #[arg(long, default_value = "roster.db")]
    db: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 名簿JSONを取り込みます
    ImportRoster {
        /// 名簿ファイル (従業員レコードの配列)
        file: PathBuf,
    },

    /// 名簿をJSONで書き出します
    ExportRoster {
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// 特別日JSONを取り込みます
    ImportSpecial {
        /// 特別日ファイル ({holidays, closed, adjusted})
        file: PathBuf,

        #[arg(short, long)]
        year: i32,

        /// 月 (1-12)
        #[arg(short, long)]
        month: u32,
    },

    /// 1ヶ月分のシフトを自動生成して保存します（既存の表は上書き）
    Generate {
        #[arg(short, long)]
        year: i32,

        /// 月 (1-12)
        #[arg(short, long)]
        month: u32,

        /// 生成結果をJSONで書き出す先
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// 人員要求に対する充足を検証します
    Validate {
        #[arg(short, long)]
        year: i32,

        /// 月 (1-12)
        #[arg(short, long)]
        month: u32,
    },

    /// 連続勤務が上限を超えていないか確認します
    CheckContinuous {
        #[arg(short, long)]
        year: i32,

        /// 月 (1-12)
        #[arg(short, long)]
        month: u32,

        /// 連続勤務の上限日数
        #[arg(long, default_value_t = 5)]
        max_days: u32,
    },

    /// 月次集計を表示します
    Stats {
        #[arg(short, long)]
        year: i32,

        /// 月 (1-12)
        #[arg(short, long)]
        month: u32,
    },

    /// 1枠だけ手で設定します。--employee を省略すると枠を空にします
    SetSlot {
        #[arg(short, long)]
        year: i32,

        /// 月 (1-12)
        #[arg(short, long)]
        month: u32,

        /// 対象日 ("M/D")
        date: String,

        /// 班種 (day | night | short)
        shift: String,

        #[arg(short, long)]
        employee: Option<String>,
    },

    /// シフト表をカレンダー風に表示します
    Show {
        #[arg(short, long)]
        year: i32,

        /// 月 (1-12)
        #[arg(short, long)]
        month: u32,
    },
}

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    let pool = match open_database(&args.db).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("エラー: DB '{}' を開けませんでした: {}", args.db.display(), e);
            std::process::exit(1);
        }
    };
    let services = AppServices::new(pool);
    let config = EngineConfig::default();

    if let Err(e) = run_command(args.command, &services, &config).await {
        eprintln!("エラー: {}", e);
        std::process::exit(1);
    }
}

/// CLIの月指定 (1-12) をAPIの 0-11 に直す
fn to_month_index(month: u32) -> Result<u32, String> {
    if (1..=12).contains(&month) {
        Ok(month - 1)
    } else {
        Err(format!("月は 1-12 で指定してください: {}", month))
    }
}

async fn run_command(
    command: Commands,
    services: &AppServices,
    config: &EngineConfig,
) -> Result<(), String> {
    match command {
        Commands::ImportRoster { file } => {
            let text = fs::read_to_string(&file)
                .map_err(|e| format!("ファイル '{}' を読めませんでした: {}", file.display(), e))?;
            let employees: Vec<Employee> = serde_json::from_str(&text)
                .map_err(|e| format!("名簿ファイルが形式に沿っていません: {}", e))?;

            commands::store_roster(services, &employees).await?;
            println!("名簿を取り込みました ({}人)", employees.len());
            Ok(())
        }

        Commands::ExportRoster { out } => {
            let employees = commands::fetch_roster(services).await?;
            let text = serde_json::to_string_pretty(&employees).map_err(|e| e.to_string())?;
            write_or_print(out, &text)
        }

        Commands::ImportSpecial { file, year, month } => {
            let month = to_month_index(month)?;
            let text = fs::read_to_string(&file)
                .map_err(|e| format!("ファイル '{}' を読めませんでした: {}", file.display(), e))?;
            let special: SpecialDatesFile = serde_json::from_str(&text)
                .map_err(|e| format!("特別日ファイルが形式に沿っていません: {}", e))?;

            commands::store_special_dates(services, year, month, &special).await?;
            println!("特別日を取り込みました");
            Ok(())
        }

        Commands::Generate { year, month, out } => {
            let month = to_month_index(month)?;
            let file = commands::generate_schedule(services, config, year, month).await?;
            println!(
                "{}-{} のシフトを生成しました ({}日分)",
                file.year,
                file.month + 1,
                file.schedule.len()
            );
            if let Some(path) = out {
                let text = serde_json::to_string_pretty(&file).map_err(|e| e.to_string())?;
                write_or_print(Some(path), &text)?;
            }
            Ok(())
        }

        Commands::Validate { year, month } => {
            let month = to_month_index(month)?;
            let violations = commands::validate_schedule(services, config, year, month).await?;
            if violations.is_empty() {
                println!("検証OK: 人員要求はすべて満たされています");
            } else {
                println!("検証NG: {}件の不足があります", violations.len());
                for v in &violations {
                    println!("  {} {} があと{}人足りません", v.date, v.shift_type.label(), v.required_count);
                }
            }
            Ok(())
        }

        Commands::CheckContinuous { year, month, max_days } => {
            let month = to_month_index(month)?;
            let warnings =
                commands::check_continuous_work(services, year, month, max_days).await?;
            if warnings.is_empty() {
                println!("連続勤務チェックOK ({}日以内)", max_days);
            } else {
                for w in &warnings {
                    println!(
                        "  {} が {} から {} まで {}日連続勤務です",
                        w.employee_id, w.start_date, w.end_date, w.run_length
                    );
                }
            }
            Ok(())
        }

        Commands::Stats { year, month } => {
            let month = to_month_index(month)?;
            let summaries = commands::monthly_statistics(services, config, year, month).await?;
            for s in &summaries {
                match (s.work_days, s.shift_count) {
                    (Some(work_days), _) => println!(
                        "  {} ({}): 勤務 {}日 / 休み {}日",
                        s.name,
                        s.employee_id,
                        work_days,
                        s.off_days.unwrap_or(0)
                    ),
                    (_, Some(shift_count)) => println!(
                        "  {} ({}): {}班 / 通常 {}時間 / 祝日 {}時間",
                        s.name,
                        s.employee_id,
                        shift_count,
                        s.regular_hours.unwrap_or(0.0),
                        s.holiday_hours.unwrap_or(0.0)
                    ),
                    _ => {}
                }
            }
            Ok(())
        }

        Commands::SetSlot { year, month, date, shift, employee } => {
            let month = to_month_index(month)?;
            let shift = ShiftType::from_str(&shift)
                .ok_or_else(|| format!("不明な班種です: {} (day | night | short)", shift))?;

            let advisory = commands::update_slot(
                services,
                year,
                month,
                &date,
                shift,
                employee.as_deref(),
            )
            .await?;

            match employee {
                Some(id) => println!("{} の{}を {} に設定しました", date, shift.label(), id),
                None => println!("{} の{}を空にしました", date, shift.label()),
            }
            if let Some(message) = advisory {
                println!("注意: {}", message);
            }
            Ok(())
        }

        Commands::Show { year, month } => {
            let month_index = to_month_index(month)?;
            let file = commands::fetch_schedule(services, year, month_index).await?;
            let (month_ref, schedule) = schedule_from_file(&file).map_err(|e| e.message())?;
            let special = commands::fetch_special_dates(services, year, month_index).await?;
            let roster = commands::fetch_roster(services).await?;

            show_calendar(&month_ref, &schedule, &special, &roster, config);
            Ok(())
        }
    }
}

fn write_or_print(out: Option<PathBuf>, text: &str) -> Result<(), String> {
    match out {
        Some(path) => {
            fs::write(&path, text)
                .map_err(|e| format!("ファイル '{}' に書き込めませんでした: {}", path.display(), e))?;
            println!("{} に書き出しました", path.display());
            Ok(())
        }
        None => {
            println!("{}", text);
            Ok(())
        }
    }
}

/// シフト表を1日1行で表示する
fn show_calendar(
    month: &MonthRef,
    schedule: &shift_roster::domain::models::MonthSchedule,
    special: &SpecialDatesFile,
    roster: &[Employee],
    config: &EngineConfig,
) {
    println!("===== {} のシフト表 =====", month.month_key());

    for day in 1..=month.days() {
        let label = month.date_label(day);
        let day_of_week = month.day_of_week(day);
        let class = month.calendar_class(day);

        let mut line = format!("{:>5} ({})", label, DAY_NAMES[day_of_week as usize]);

        if special.closed.contains(&label) {
            line.push_str(" 全日休業");
            println!("{}", line);
            continue;
        }
        let is_holiday = special.holidays.contains(&label);
        if is_holiday {
            line.push_str(" [祝]");
        }

        if let Some(shifts) = schedule.iter_days().find(|(d, _)| *d == day).map(|(_, s)| s) {
            for (shift, assignment) in shifts {
                let employee = roster.iter().find(|e| e.id == assignment.employee);
                let time = employee.and_then(|e| {
                    resolve_shift_time(e, class, *shift, &config.shift_times)
                });
                match time {
                    Some(time) => line.push_str(&format!(
                        " | {} {} {}-{}({}{})",
                        shift.label(),
                        assignment.employee,
                        time.start,
                        time.end,
                        time.hours,
                        if is_holiday { "*2" } else { "" }
                    )),
                    None => line.push_str(&format!(" | {} {}", shift.label(), assignment.employee)),
                }
            }
        }

        if let Some(note) = special.adjusted.get(&label) {
            line.push_str(&format!(" ※{}", note));
        }
        println!("{}", line);
    }
}
