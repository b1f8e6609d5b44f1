use shift_roster::application::dto::{ContinuousWarningRecord, ScheduleFile, ViolationRecord};

pub fn show_schedule_debug_data(file: &ScheduleFile) {
    println!("\n=======================================================");
    println!(
        "🗓️ [DEBUG] シフト出力結果 {}-{} (計 {} 日分)",
        file.year,
        file.month + 1,
        file.schedule.len()
    );
    println!("=======================================================");

    for (date, shifts) in &file.schedule {
        let line = shifts
            .iter()
            .map(|(shift, assignment)| format!("[{}] {}", shift.label(), assignment.employee))
            .collect::<Vec<_>>()
            .join(" | ");
        println!("   {:<6}: {}", date, line);
    }
    println!("=======================================================\n");
}

pub fn show_violations_debug_data(violations: &[ViolationRecord]) {
    println!("\n=======================================================");
    println!("⚠️ [DEBUG] 人員不足 (計 {} 件)", violations.len());
    println!("=======================================================");
    for violation in violations {
        println!(
            "   {} {} があと{}人不足",
            violation.date,
            violation.shift_type.label(),
            violation.required_count
        );
    }
    println!("=======================================================\n");
}

pub fn show_warnings_debug_data(warnings: &[ContinuousWarningRecord]) {
    println!("\n=======================================================");
    println!("⚠️ [DEBUG] 連続勤務警告 (計 {} 件)", warnings.len());
    println!("=======================================================");
    for warning in warnings {
        println!(
            "   {}: {} 〜 {} ({}日連続)",
            warning.employee_id, warning.start_date, warning.end_date, warning.run_length
        );
    }
    println!("=======================================================\n");
}
