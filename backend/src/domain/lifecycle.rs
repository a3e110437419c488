//! # Plan Lifecycle
//!
//! Pure status-transition rules for program plans. The reconciler is run
//! once over the loaded collections at startup and incrementally when a
//! report lands; it is deterministic and idempotent for a fixed "today".

use chrono::NaiveDate;
use shared::{PlanStatus, ProgramPlan, ProgramReport};

/// Days past the scheduled date before a reportless plan is written off
pub const EXECUTION_LAPSE_DAYS: i64 = 14;

/// The corrected status for a single plan, or `None` if it already holds
///
/// Rule priority, highest first:
/// 1. A linked report forces `Executed`, regardless of dates.
/// 2. No report and more than [`EXECUTION_LAPSE_DAYS`] past the date
///    parks the plan in `NotExecuted`.
/// 3. A `Pending` plan whose date has arrived moves to `InProgress`.
///
/// A malformed date disables the date rules but never rule 1.
pub fn status_correction(
    today: NaiveDate,
    plan: &ProgramPlan,
    has_report: bool,
) -> Option<PlanStatus> {
    if has_report && plan.status != PlanStatus::Executed {
        return Some(PlanStatus::Executed);
    }

    let plan_date = plan.scheduled_date()?;
    let days_past = (today - plan_date).num_days();

    if days_past > EXECUTION_LAPSE_DAYS && !has_report && plan.status != PlanStatus::NotExecuted {
        return Some(PlanStatus::NotExecuted);
    }

    if today >= plan_date && plan.status == PlanStatus::Pending {
        return Some(PlanStatus::InProgress);
    }

    None
}

/// Outcome of a bulk reconciliation pass
pub struct ReconcileOutcome {
    /// The full collection with corrections applied
    pub plans: Vec<ProgramPlan>,
    /// Only the plans whose status changed; each needs exactly one remote
    /// upsert
    pub changed: Vec<ProgramPlan>,
}

/// Correct the status of every plan against today's date and the linked
/// reports
pub fn reconcile(
    today: NaiveDate,
    plans: Vec<ProgramPlan>,
    reports: &[ProgramReport],
) -> ReconcileOutcome {
    let mut changed = Vec::new();
    let plans = plans
        .into_iter()
        .map(|mut plan| {
            let has_report = reports.iter().any(|r| r.plan_id == plan.id);
            if let Some(status) = status_correction(today, &plan, has_report) {
                plan.status = status;
                changed.push(plan.clone());
            }
            plan
        })
        .collect();

    ReconcileOutcome { plans, changed }
}

/// Status a newly created plan starts in: already-due dates go straight to
/// `InProgress`, future dates wait in `Pending`
pub fn initial_status(today: NaiveDate, date: &str) -> PlanStatus {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(plan_date) if plan_date <= today => PlanStatus::InProgress,
        _ => PlanStatus::Pending,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::seed;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn plan_on(date: &str, status: PlanStatus) -> ProgramPlan {
        let mut plan = seed::plans().remove(1);
        plan.id = format!("plan::{}", date);
        plan.date = date.to_string();
        plan.month_year = ProgramPlan::month_bucket(date);
        plan.status = status;
        plan
    }

    fn report_for(plan_id: &str) -> ProgramReport {
        ProgramReport {
            id: format!("report-for-{}", plan_id),
            report_number: "REP-2024-1234".to_string(),
            plan_id: plan_id.to_string(),
            program_name: "Test".to_string(),
            domain: "Sports".to_string(),
            date: "2024-03-15".to_string(),
            target_audience: "Youth".to_string(),
            participants_count: 10,
            budget: 0.0,
            objectives: String::new(),
            description: String::new(),
            images: Vec::new(),
            executor_name: "Test".to_string(),
            manager_name: "Manager".to_string(),
            executor_signature: None,
            manager_signature: None,
        }
    }

    #[test]
    fn test_report_forces_executed_regardless_of_date() {
        let today = day(2024, 3, 1);

        // Future-dated plan with a report still executes
        let plan = plan_on("2024-06-01", PlanStatus::Pending);
        assert_eq!(
            status_correction(today, &plan, true),
            Some(PlanStatus::Executed)
        );

        // Long-lapsed plan with a report executes rather than lapsing
        let plan = plan_on("2023-01-01", PlanStatus::InProgress);
        assert_eq!(
            status_correction(today, &plan, true),
            Some(PlanStatus::Executed)
        );
    }

    #[test]
    fn test_lapse_rule_boundary() {
        let today = day(2024, 3, 16);

        // Exactly 15 days past: written off
        let plan = plan_on("2024-03-01", PlanStatus::Pending);
        assert_eq!(
            status_correction(today, &plan, false),
            Some(PlanStatus::NotExecuted)
        );

        // Exactly 14 days past: not yet; a pending plan rolls to in-progress
        let plan = plan_on("2024-03-02", PlanStatus::Pending);
        assert_eq!(
            status_correction(today, &plan, false),
            Some(PlanStatus::InProgress)
        );

        // Exactly 14 days past and already in progress: unchanged
        let plan = plan_on("2024-03-02", PlanStatus::InProgress);
        assert_eq!(status_correction(today, &plan, false), None);
    }

    #[test]
    fn test_pending_rolls_over_on_its_date() {
        let today = day(2024, 3, 15);

        let plan = plan_on("2024-03-15", PlanStatus::Pending);
        assert_eq!(
            status_correction(today, &plan, false),
            Some(PlanStatus::InProgress)
        );

        // One day in the future stays pending
        let plan = plan_on("2024-03-16", PlanStatus::Pending);
        assert_eq!(status_correction(today, &plan, false), None);
    }

    #[test]
    fn test_malformed_date_only_responds_to_reports() {
        let today = day(2024, 3, 15);
        let plan = plan_on("someday", PlanStatus::Pending);

        assert_eq!(status_correction(today, &plan, false), None);
        assert_eq!(
            status_correction(today, &plan, true),
            Some(PlanStatus::Executed)
        );
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let today = day(2024, 3, 20);
        let plans = vec![
            plan_on("2024-03-01", PlanStatus::Pending),   // lapses
            plan_on("2024-03-18", PlanStatus::Pending),   // rolls to in-progress
            plan_on("2024-03-25", PlanStatus::Pending),   // stays pending
            plan_on("2024-02-01", PlanStatus::InProgress), // lapses
        ];
        let reports = vec![report_for("plan::2024-02-01")];

        let first = reconcile(today, plans, &reports);
        assert_eq!(first.changed.len(), 3);

        // Re-running against its own output produces no further transitions
        let second = reconcile(today, first.plans.clone(), &reports);
        assert!(second.changed.is_empty());
        assert_eq!(second.plans, first.plans);
    }

    #[test]
    fn test_reconcile_reports_only_changed_plans() {
        let today = day(2024, 3, 20);
        let plans = vec![
            plan_on("2024-03-18", PlanStatus::InProgress), // already correct
            plan_on("2024-03-19", PlanStatus::Pending),    // changes
        ];

        let outcome = reconcile(today, plans, &[]);
        assert_eq!(outcome.changed.len(), 1);
        assert_eq!(outcome.changed[0].id, "plan::2024-03-19");
        assert_eq!(outcome.changed[0].status, PlanStatus::InProgress);
    }

    #[test]
    fn test_initial_status() {
        let today = day(2024, 3, 15);
        assert_eq!(initial_status(today, "2024-03-15"), PlanStatus::InProgress);
        assert_eq!(initial_status(today, "2024-03-01"), PlanStatus::InProgress);
        assert_eq!(initial_status(today, "2024-03-16"), PlanStatus::Pending);
        assert_eq!(initial_status(today, "never"), PlanStatus::Pending);
    }
}
