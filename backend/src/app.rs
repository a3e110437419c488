//! # Application Controller
//!
//! Single owner of the in-memory snapshot and the only layer that issues
//! remote writes. Startup loads every collection concurrently, bootstraps
//! the first admin account, reconciles plan statuses, and restores the
//! durable session; afterwards every mutation commits locally first and
//! mirrors to the remote store through the gateway.

use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate};
use std::sync::Arc;
use tracing::{debug, info, warn};

use shared::{
    DailyReport, DistinguishedSupervisor, Member, MemberStatus, PlanStatus, ProgramPlan,
    ProgramReport, Supervisor, SystemSettings, MAX_DAILY_REPORT_IMAGES, MAX_REPORT_IMAGES,
};

use crate::domain::{
    access, daily, lifecycle, seed,
    session_service::{AuthError, SessionService},
    sync::{self, CollectionChange, Record},
};
use crate::storage::{
    LoadSource, PersistenceGateway, RecordStore, SessionStore, SyncOutcome,
};

/// Where each collection came from during the startup load
#[derive(Debug, Clone, Copy)]
pub struct LoadSources {
    pub supervisors: LoadSource,
    pub plans: LoadSource,
    pub members: LoadSource,
    pub reports: LoadSource,
    pub daily_reports: LoadSource,
    pub distinguished: LoadSource,
    pub settings: LoadSource,
}

/// The in-memory snapshot rendered by the views
#[derive(Debug, Clone)]
pub struct AppState {
    pub supervisors: Vec<Supervisor>,
    pub plans: Vec<ProgramPlan>,
    pub members: Vec<Member>,
    pub reports: Vec<ProgramReport>,
    pub daily_reports: Vec<DailyReport>,
    pub distinguished: Vec<DistinguishedSupervisor>,
    pub settings: SystemSettings,
    pub current_user: Option<Supervisor>,
    pub load_sources: LoadSources,
}

/// What a bulk collection replacement turned out to mean
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppliedChange {
    Inserted(String),
    Updated(String),
    Removed(String),
    NoChange,
}

pub struct AppController {
    gateway: Arc<PersistenceGateway>,
    session: SessionService,
    session_store: SessionStore,
    state: AppState,
}

impl AppController {
    /// Load the full application state, never failing: an unreachable
    /// store degrades to the built-in dataset (offline mode)
    pub async fn load(store: Arc<dyn RecordStore>, session_store: SessionStore) -> Self {
        Self::load_at(store, session_store, Local::now().date_naive()).await
    }

    async fn load_at(
        store: Arc<dyn RecordStore>,
        session_store: SessionStore,
        today: NaiveDate,
    ) -> Self {
        let gateway = Arc::new(PersistenceGateway::new(store));

        let (supervisors, plans, members, reports, daily_reports, distinguished, settings) = tokio::join!(
            gateway.fetch_supervisors(),
            gateway.fetch_plans(),
            gateway.fetch_members(),
            gateway.fetch_reports(),
            gateway.fetch_daily_reports(),
            gateway.fetch_distinguished(),
            gateway.fetch_settings(),
        );
        let (settings, settings_source) = settings;

        // First-run bootstrap: an empty remote supervisor collection gets
        // the built-in admin account so someone can log in
        let mut supervisor_records = supervisors.records;
        if supervisor_records.is_empty() {
            if let Some(admin) = seed::default_admin() {
                info!("Supervisor collection empty, seeding default admin");
                gateway.upsert_supervisor(&admin).await;
                supervisor_records = vec![admin];
            }
        }

        // Correct plan statuses once per load and mirror each change back
        let outcome = lifecycle::reconcile(today, plans.records, &reports.records);
        for plan in &outcome.changed {
            gateway.upsert_plan(plan).await;
        }
        if !outcome.changed.is_empty() {
            info!("Reconciled {} plan status(es)", outcome.changed.len());
        }

        // A stored session survives only if the user still exists
        let current_user = session_store.load().and_then(|stored| {
            supervisor_records.iter().find(|s| s.id == stored.id).cloned()
        });

        let state = AppState {
            supervisors: supervisor_records,
            plans: outcome.plans,
            members: members.records,
            reports: reports.records,
            daily_reports: daily_reports.records,
            distinguished: distinguished.records,
            settings,
            current_user,
            load_sources: LoadSources {
                supervisors: supervisors.source,
                plans: plans.source,
                members: members.source,
                reports: reports.source,
                daily_reports: daily_reports.source,
                distinguished: distinguished.source,
                settings: settings_source,
            },
        };

        Self {
            session: SessionService::new(gateway.clone()),
            gateway,
            session_store,
            state,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn current_user(&self) -> Option<&Supervisor> {
        self.state.current_user.as_ref()
    }

    /// Where a navigation request lands for the current session
    pub fn resolve_view(&self, requested: access::View) -> access::View {
        access::resolve(self.state.current_user.as_ref(), requested)
    }

    // --- Session ---

    pub async fn login(&mut self, email: &str, password: &str) -> Result<Supervisor, AuthError> {
        let user = self.session.login(&self.state.supervisors, email, password).await?;
        if let Err(e) = self.session_store.save(&user) {
            warn!("Could not persist session: {:#}", e);
        }
        self.state.current_user = Some(user.clone());
        Ok(user)
    }

    pub fn logout(&mut self) {
        self.state.current_user = None;
        if let Err(e) = self.session_store.clear() {
            warn!("Could not clear session: {:#}", e);
        }
    }

    // --- Supervisors ---

    pub async fn save_supervisor(&mut self, supervisor: Supervisor) -> SyncOutcome {
        let outcome = self.gateway.upsert_supervisor(&supervisor).await;
        self.note_outcome("save_supervisor", outcome);
        commit_upsert(&mut self.state.supervisors, supervisor);
        outcome
    }

    pub async fn remove_supervisor(&mut self, id: &str) -> SyncOutcome {
        let outcome = self.gateway.delete_supervisor(id).await;
        self.state.supervisors.retain(|s| s.id != id);
        outcome
    }

    pub async fn set_supervisors(&mut self, new: Vec<Supervisor>) -> AppliedChange {
        self.update_supervisors(|_| new).await
    }

    pub async fn update_supervisors<F>(&mut self, update: F) -> AppliedChange
    where
        F: FnOnce(&[Supervisor]) -> Vec<Supervisor>,
    {
        let new = update(&self.state.supervisors);
        let change = sync::infer_change(&self.state.supervisors, &new);
        self.state.supervisors = new;
        match change {
            Some(CollectionChange::Insert(s)) => {
                self.gateway.upsert_supervisor(&s).await;
                AppliedChange::Inserted(s.id)
            }
            Some(CollectionChange::Update(s)) => {
                self.gateway.upsert_supervisor(&s).await;
                AppliedChange::Updated(s.id)
            }
            Some(CollectionChange::Remove(id)) => {
                self.gateway.delete_supervisor(&id).await;
                AppliedChange::Removed(id)
            }
            None => AppliedChange::NoChange,
        }
    }

    // --- Plans ---

    /// Save a plan, keeping the month bucket in lockstep with the date
    pub async fn save_plan(&mut self, mut plan: ProgramPlan) -> SyncOutcome {
        plan.month_year = ProgramPlan::month_bucket(&plan.date);
        let outcome = self.gateway.upsert_plan(&plan).await;
        self.note_outcome("save_plan", outcome);
        commit_upsert(&mut self.state.plans, plan);
        outcome
    }

    pub async fn remove_plan(&mut self, id: &str) -> SyncOutcome {
        let outcome = self.gateway.delete_plan(id).await;
        self.state.plans.retain(|p| p.id != id);
        outcome
    }

    pub async fn set_plans(&mut self, new: Vec<ProgramPlan>) -> AppliedChange {
        self.update_plans(|_| new).await
    }

    /// Replace the plan collection through an updater applied to the latest
    /// snapshot (never a stale copy), committing the result locally and
    /// issuing at most one remote operation for the inferred change
    pub async fn update_plans<F>(&mut self, update: F) -> AppliedChange
    where
        F: FnOnce(&[ProgramPlan]) -> Vec<ProgramPlan>,
    {
        let new = update(&self.state.plans);
        let change = sync::infer_change(&self.state.plans, &new);
        self.state.plans = new;
        match change {
            Some(CollectionChange::Insert(p)) => {
                self.gateway.upsert_plan(&p).await;
                AppliedChange::Inserted(p.id)
            }
            Some(CollectionChange::Update(p)) => {
                self.gateway.upsert_plan(&p).await;
                AppliedChange::Updated(p.id)
            }
            Some(CollectionChange::Remove(id)) => {
                self.gateway.delete_plan(&id).await;
                AppliedChange::Removed(id)
            }
            None => AppliedChange::NoChange,
        }
    }

    // --- Reports ---

    /// Save an execution report and synchronously force the linked plan to
    /// `Executed`
    pub async fn save_report(&mut self, mut report: ProgramReport) -> SyncOutcome {
        report.images.truncate(MAX_REPORT_IMAGES);
        let outcome = self.gateway.upsert_report(&report).await;
        self.note_outcome("save_report", outcome);
        let plan_id = report.plan_id.clone();
        commit_upsert(&mut self.state.reports, report);
        self.force_plan_executed(&plan_id).await;
        outcome
    }

    pub async fn remove_report(&mut self, id: &str) -> SyncOutcome {
        let outcome = self.gateway.delete_report(id).await;
        self.state.reports.retain(|r| r.id != id);
        outcome
    }

    pub async fn set_reports(&mut self, new: Vec<ProgramReport>) -> AppliedChange {
        self.update_reports(|_| new).await
    }

    pub async fn update_reports<F>(&mut self, update: F) -> AppliedChange
    where
        F: FnOnce(&[ProgramReport]) -> Vec<ProgramReport>,
    {
        let new = update(&self.state.reports);
        let change = sync::infer_change(&self.state.reports, &new);
        self.state.reports = new;
        match change {
            Some(CollectionChange::Insert(r)) => {
                self.gateway.upsert_report(&r).await;
                self.force_plan_executed(&r.plan_id).await;
                AppliedChange::Inserted(r.id)
            }
            Some(CollectionChange::Update(r)) => {
                self.gateway.upsert_report(&r).await;
                self.force_plan_executed(&r.plan_id).await;
                AppliedChange::Updated(r.id)
            }
            Some(CollectionChange::Remove(id)) => {
                self.gateway.delete_report(&id).await;
                AppliedChange::Removed(id)
            }
            None => AppliedChange::NoChange,
        }
    }

    /// Rule 1 of the lifecycle, applied incrementally when a report lands
    async fn force_plan_executed(&mut self, plan_id: &str) {
        let linked = self
            .state
            .plans
            .iter()
            .find(|p| p.id == plan_id && p.status != PlanStatus::Executed)
            .cloned();
        if let Some(mut plan) = linked {
            plan.status = PlanStatus::Executed;
            self.save_plan(plan).await;
        }
    }

    // --- Members ---

    /// Accept a membership application from the public form.
    ///
    /// Assigns the id, serial number and registration date when absent, and
    /// always starts the member in the pending-approval state.
    pub async fn submit_membership(&mut self, mut member: Member) -> Member {
        let now = Local::now();
        let millis = now.timestamp_millis() as u64;
        if member.id.is_empty() {
            member.id = Member::generate_id(millis);
        }
        if member.membership_number.is_empty() {
            member.membership_number =
                Member::generate_membership_number(now.year(), self.state.members.len());
        }
        if member.registration_date.is_empty() {
            member.registration_date = now.format("%Y-%m-%d").to_string();
        }
        member.status = MemberStatus::Pending;

        let outcome = self.gateway.upsert_member(&member).await;
        self.note_outcome("submit_membership", outcome);
        commit_upsert(&mut self.state.members, member.clone());
        member
    }

    pub async fn approve_member(&mut self, id: &str) -> Result<SyncOutcome> {
        self.set_member_status(id, MemberStatus::Active).await
    }

    pub async fn reject_member(&mut self, id: &str) -> Result<SyncOutcome> {
        self.set_member_status(id, MemberStatus::Rejected).await
    }

    async fn set_member_status(&mut self, id: &str, status: MemberStatus) -> Result<SyncOutcome> {
        let mut member = self
            .state
            .members
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Member not found: {}", id))?;
        member.status = status;
        Ok(self.save_member(member).await)
    }

    pub async fn save_member(&mut self, member: Member) -> SyncOutcome {
        let outcome = self.gateway.upsert_member(&member).await;
        self.note_outcome("save_member", outcome);
        commit_upsert(&mut self.state.members, member);
        outcome
    }

    pub async fn remove_member(&mut self, id: &str) -> SyncOutcome {
        let outcome = self.gateway.delete_member(id).await;
        self.state.members.retain(|m| m.id != id);
        outcome
    }

    pub async fn set_members(&mut self, new: Vec<Member>) -> AppliedChange {
        self.update_members(|_| new).await
    }

    pub async fn update_members<F>(&mut self, update: F) -> AppliedChange
    where
        F: FnOnce(&[Member]) -> Vec<Member>,
    {
        let new = update(&self.state.members);
        let change = sync::infer_change(&self.state.members, &new);
        self.state.members = new;
        match change {
            Some(CollectionChange::Insert(m)) => {
                self.gateway.upsert_member(&m).await;
                AppliedChange::Inserted(m.id)
            }
            Some(CollectionChange::Update(m)) => {
                self.gateway.upsert_member(&m).await;
                AppliedChange::Updated(m.id)
            }
            Some(CollectionChange::Remove(id)) => {
                self.gateway.delete_member(&id).await;
                AppliedChange::Removed(id)
            }
            None => AppliedChange::NoChange,
        }
    }

    // --- Daily reports ---

    /// A blank daily report for today, prefilled from current state
    pub fn prefill_daily_report(&self) -> DailyReport {
        let now = Local::now();
        daily::prefill(
            now.timestamp_millis() as u64,
            &now.format("%Y-%m-%d").to_string(),
            &self.state.settings,
            &self.state.supervisors,
            &self.state.members,
            &self.state.plans,
        )
    }

    pub async fn save_daily_report(&mut self, mut report: DailyReport) -> SyncOutcome {
        if report.day_name.is_empty() {
            report.day_name = DailyReport::day_name_of(&report.report_date);
        }
        daily::pad_activities(&mut report.activities);
        report.images.truncate(MAX_DAILY_REPORT_IMAGES);

        let outcome = self.gateway.upsert_daily_report(&report).await;
        self.note_outcome("save_daily_report", outcome);
        // Newest sheet first
        if let Some(existing) = self.state.daily_reports.iter_mut().find(|r| r.id == report.id) {
            *existing = report;
        } else {
            self.state.daily_reports.insert(0, report);
        }
        outcome
    }

    pub async fn remove_daily_report(&mut self, id: &str) -> SyncOutcome {
        let outcome = self.gateway.delete_daily_report(id).await;
        self.state.daily_reports.retain(|r| r.id != id);
        outcome
    }

    pub async fn set_daily_reports(&mut self, new: Vec<DailyReport>) -> AppliedChange {
        self.update_daily_reports(|_| new).await
    }

    pub async fn update_daily_reports<F>(&mut self, update: F) -> AppliedChange
    where
        F: FnOnce(&[DailyReport]) -> Vec<DailyReport>,
    {
        let new = update(&self.state.daily_reports);
        let change = sync::infer_change(&self.state.daily_reports, &new);
        self.state.daily_reports = new;
        match change {
            Some(CollectionChange::Insert(r)) => {
                self.gateway.upsert_daily_report(&r).await;
                AppliedChange::Inserted(r.id)
            }
            Some(CollectionChange::Update(r)) => {
                self.gateway.upsert_daily_report(&r).await;
                AppliedChange::Updated(r.id)
            }
            Some(CollectionChange::Remove(id)) => {
                self.gateway.delete_daily_report(&id).await;
                AppliedChange::Removed(id)
            }
            None => AppliedChange::NoChange,
        }
    }

    // --- Distinguished supervisors ---

    /// Record a monthly recognition, displacing any earlier award in the
    /// same month bucket both locally and remotely
    pub async fn save_distinguished(&mut self, entry: DistinguishedSupervisor) -> SyncOutcome {
        let displaced: Vec<String> = self
            .state
            .distinguished
            .iter()
            .filter(|d| d.month_year == entry.month_year && d.id != entry.id)
            .map(|d| d.id.clone())
            .collect();
        for id in &displaced {
            self.gateway.delete_distinguished(id).await;
        }
        self.state.distinguished.retain(|d| !displaced.contains(&d.id));

        let outcome = self.gateway.upsert_distinguished(&entry).await;
        self.note_outcome("save_distinguished", outcome);
        commit_upsert(&mut self.state.distinguished, entry);
        outcome
    }

    pub async fn remove_distinguished(&mut self, id: &str) -> SyncOutcome {
        let outcome = self.gateway.delete_distinguished(id).await;
        self.state.distinguished.retain(|d| d.id != id);
        outcome
    }

    pub async fn set_distinguished(&mut self, new: Vec<DistinguishedSupervisor>) -> AppliedChange {
        self.update_distinguished(|_| new).await
    }

    pub async fn update_distinguished<F>(&mut self, update: F) -> AppliedChange
    where
        F: FnOnce(&[DistinguishedSupervisor]) -> Vec<DistinguishedSupervisor>,
    {
        let new = update(&self.state.distinguished);
        let change = sync::infer_change(&self.state.distinguished, &new);
        self.state.distinguished = new;
        match change {
            Some(CollectionChange::Insert(d)) => {
                self.gateway.upsert_distinguished(&d).await;
                AppliedChange::Inserted(d.id)
            }
            Some(CollectionChange::Update(d)) => {
                self.gateway.upsert_distinguished(&d).await;
                AppliedChange::Updated(d.id)
            }
            Some(CollectionChange::Remove(id)) => {
                self.gateway.delete_distinguished(&id).await;
                AppliedChange::Removed(id)
            }
            None => AppliedChange::NoChange,
        }
    }

    // --- Settings ---

    pub async fn save_settings(&mut self, settings: SystemSettings) -> SyncOutcome {
        let outcome = self.gateway.save_settings(&settings).await;
        self.note_outcome("save_settings", outcome);
        self.state.settings = settings;
        outcome
    }

    fn note_outcome(&self, operation: &str, outcome: SyncOutcome) {
        if outcome == SyncOutcome::Dropped {
            debug!("{}: remote write dropped, keeping local change", operation);
        }
    }
}

/// Replace the element with the same id, or append
fn commit_upsert<T: Record>(collection: &mut Vec<T>, item: T) {
    if let Some(existing) = collection
        .iter_mut()
        .find(|existing| existing.record_id() == item.record_id())
    {
        *existing = item;
    } else {
        collection.push(item);
    }
}
