// テスト用の標準データ一式 (2025年11月想定)

use std::collections::BTreeMap;

use shift_roster::application::dto::SpecialDatesFile;
use shift_roster::domain::models::{CalendarClass, Employee, EmploymentType, ShiftType};
use shift_roster::domain::policy::ShiftTime;

fn employee(id: &str, name: &str, employment: EmploymentType) -> Employee {
    Employee {
        id: id.to_string(),
        name: name.to_string(),
        employment,
        fixed_days_off: vec![],
        unavailable_dates: vec![],
        special_dates: BTreeMap::new(),
        available_dates: None,
        preferred_shifts: vec![],
        max_night_shifts_per_week: None,
        special_shift_times: BTreeMap::new(),
    }
}

fn dates(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|label| label.to_string()).collect()
}

/// 6人編成の標準名簿
pub fn standard_roster() -> Vec<Employee> {
    // A: 正社員。水曜・木曜が固定休、11/10週は申請休。
    let mut a = employee("A", "社員A", EmploymentType::Fulltime);
    a.fixed_days_off = vec![3, 4];
    a.unavailable_dates = dates(&["11/10", "11/11", "11/12", "11/13", "11/14"]);
    a.preferred_shifts = vec![ShiftType::Day];

    // B: パート。日曜・月曜が固定休。
    let mut b = employee("B", "パートB", EmploymentType::Parttime);
    b.fixed_days_off = vec![0, 1];
    b.unavailable_dates = dates(&["11/26"]);
    b.preferred_shifts = vec![ShiftType::Day];

    // C: パート。夜勤主体。11/13・11/14 は夜勤のみ。
    let mut c = employee("C", "パートC", EmploymentType::Parttime);
    c.unavailable_dates = dates(&["11/16", "11/17"]);
    c.special_dates = BTreeMap::from([
        ("11/13".to_string(), vec![ShiftType::Night]),
        ("11/14".to_string(), vec![ShiftType::Night]),
    ]);
    c.preferred_shifts = vec![ShiftType::Night];

    // D: パート。決まった土曜だけ夜勤に入る。休日夜勤の時間が個人設定。
    let mut d = employee("D", "パートD", EmploymentType::Parttime);
    d.available_dates = Some(dates(&["11/8", "11/22", "11/29"]));
    d.preferred_shifts = vec![ShiftType::Night];
    d.special_shift_times = BTreeMap::from([(
        CalendarClass::Weekend,
        BTreeMap::from([(
            ShiftType::Night,
            ShiftTime {
                start: "16:45".to_string(),
                end: "24:15".to_string(),
                hours: 7.5,
            },
        )]),
    )]);

    // E: パート。日勤と短時間班。
    let mut e = employee("E", "パートE", EmploymentType::Parttime);
    e.unavailable_dates = dates(&["11/4", "11/14", "11/20", "11/21", "11/23"]);
    e.preferred_shifts = vec![ShiftType::Day, ShiftType::Short];

    // F: パート。夜勤と短時間班。夜勤は週2回まで。
    let mut f = employee("F", "パートF", EmploymentType::Parttime);
    f.unavailable_dates = dates(&["11/1", "11/2", "11/10", "11/11", "11/21", "11/22"]);
    f.preferred_shifts = vec![ShiftType::Night, ShiftType::Short];
    f.max_night_shifts_per_week = Some(2);

    vec![a, b, c, d, e, f]
}

/// 2025年11月の特別日 (祝日2日・全日休業1日・時短1日)
pub fn standard_special_dates() -> SpecialDatesFile {
    SpecialDatesFile {
        holidays: dates(&["11/3", "11/23"]),
        closed: dates(&["11/17"]),
        adjusted: BTreeMap::from([("11/24".to_string(), "棚卸しのため時短営業".to_string())]),
    }
}
