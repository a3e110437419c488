//! # Daily Report Prefill
//!
//! Builds the starting point for a new daily report sheet: staff roster
//! from the supervisor collection, registered count from the members, and
//! the activities table seeded from plans scheduled on the same day.

use shared::{
    ActivityEntry, DailyReport, Member, ProgramPlan, Supervisor, SystemSettings, UserRole,
    DAILY_ACTIVITY_SLOTS,
};

/// Activities scheduled on a given date, padded with blanks to the fixed
/// slot count
pub fn activities_for_date(plans: &[ProgramPlan], date: &str) -> Vec<ActivityEntry> {
    let mut activities: Vec<ActivityEntry> = plans
        .iter()
        .filter(|p| p.date == date)
        .map(|p| ActivityEntry {
            activity: p.program_name.clone(),
            beneficiaries: p.participants_count,
        })
        .collect();

    pad_activities(&mut activities);
    activities
}

/// Force the activities table to exactly [`DAILY_ACTIVITY_SLOTS`] rows
pub fn pad_activities(activities: &mut Vec<ActivityEntry>) {
    while activities.len() < DAILY_ACTIVITY_SLOTS {
        activities.push(ActivityEntry::default());
    }
    activities.truncate(DAILY_ACTIVITY_SLOTS);
}

/// A blank daily report for `date`, prefilled from current state
pub fn prefill(
    epoch_millis: u64,
    date: &str,
    settings: &SystemSettings,
    supervisors: &[Supervisor],
    members: &[Member],
    plans: &[ProgramPlan],
) -> DailyReport {
    // Everyone but the system administrator belongs on the staff roster
    let staff: Vec<String> = supervisors
        .iter()
        .filter(|s| s.role != Some(UserRole::Admin))
        .map(|s| match s.role {
            Some(role) => format!("{} - {}", s.name, role),
            None => s.name.clone(),
        })
        .collect();

    DailyReport {
        id: DailyReport::generate_id(epoch_millis),
        report_date: date.to_string(),
        day_name: DailyReport::day_name_of(date),
        club_name: settings.club_name.clone(),
        staff_names: staff.join("\n"),
        staff_count: staff.len() as u32,
        daily_attendance: 0,
        registered_count: members.len() as u32,
        activities: activities_for_date(plans, date),
        challenges: String::new(),
        recommendations: String::new(),
        images: Vec::new(),
    }
}
