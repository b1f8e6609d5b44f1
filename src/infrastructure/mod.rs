pub mod roster_repo;
pub mod schedule_repo;
pub mod special_dates_repo;
