//! In-process lead store.
//!
//! Mirrors the MySQL store's filtering, ordering and transaction rules over
//! plain vectors. Used by the test suites, and handy for poking at the HTTP
//! layer without a database.

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::Mutex;

use super::{FollowupWindow, LeadStore};
use crate::types::{
    status, AdminAccount, AgentCount, CustomerProfile, DateRange, EnquiryLink, LeadFilter,
    LeadKind, LeadPage, LeadRecord, LeadSummary, ListKind, NewNote, NoteEntry, NoteTarget,
    PageRequest, ParentUpdate, ProjectCount, ProjectLeadFilter, ProjectShare, RecentView,
    StatusCount, WishlistItem,
};

const TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Default)]
pub struct EnquiryRow {
    pub enq_id: i64,
    pub project_id: i64,
    pub customer_id: i64,
    pub cust_name: Option<String>,
    pub cust_mobile: Option<String>,
    pub cust_email: Option<String>,
    pub status: Option<String>,
    pub followup_date: Option<NaiveDate>,
    pub followup_time: Option<String>,
    pub date_added: NaiveDateTime,
}

#[derive(Debug, Clone, Default)]
pub struct CustomerRow {
    pub cust_id: i64,
    pub cust_fname: Option<String>,
    pub cust_lname: Option<String>,
    pub cust_mobile: Option<String>,
    pub cust_email: Option<String>,
    pub status: Option<String>,
    pub followup_date: Option<NaiveDate>,
    pub followup_time: Option<String>,
    pub credits: i64,
    pub created_at: NaiveDateTime,
}

impl CustomerRow {
    fn full_name(&self) -> Option<String> {
        match (&self.cust_fname, &self.cust_lname) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct NoteRow {
    nid: i64,
    target: NoteTarget,
    note: String,
    added_by: String,
    status: Option<String>,
    followup_date: Option<NaiveDate>,
    followup_time: Option<String>,
    added_at: NaiveDateTime,
}

#[derive(Debug, Default)]
struct State {
    admins: Vec<(AdminAccount, String)>,
    projects: BTreeMap<i64, String>,
    enquiries: Vec<EnquiryRow>,
    customers: Vec<CustomerRow>,
    notes: Vec<NoteRow>,
    wishlist: Vec<(i64, i64)>,
    views: Vec<(i64, i64, i64)>,
    fail_writes: bool,
    fail_parent_updates: bool,
}

impl State {
    fn customer_row(&self, cust_id: i64) -> Option<&CustomerRow> {
        self.customers.iter().find(|c| c.cust_id == cust_id)
    }

    fn project_name(&self, proj_id: i64) -> Option<String> {
        self.projects.get(&proj_id).cloned()
    }

    fn enquiry_name(&self, e: &EnquiryRow) -> Option<String> {
        non_empty(e.cust_name.as_deref())
            .map(str::to_string)
            .or_else(|| self.customer_row(e.customer_id).and_then(CustomerRow::full_name))
    }

    fn enquiry_mobile(&self, e: &EnquiryRow) -> Option<String> {
        non_empty(e.cust_mobile.as_deref())
            .map(str::to_string)
            .or_else(|| {
                self.customer_row(e.customer_id)
                    .and_then(|c| c.cust_mobile.clone())
            })
    }

    fn last_note(&self, target: NoteTarget) -> Option<String> {
        self.notes
            .iter()
            .filter(|n| n.target == target)
            .max_by_key(|n| (n.added_at, n.nid))
            .map(|n| n.note.clone())
    }

    fn enquiry_summary(&self, e: &EnquiryRow, show_new: bool) -> LeadSummary {
        LeadSummary {
            id: e.enq_id,
            cust_name: self.enquiry_name(e),
            cust_mobile: self.enquiry_mobile(e),
            status: shown_status(e.status.as_deref(), show_new),
            followup_date: e.followup_date.map(|d| d.format("%Y-%m-%d").to_string()),
            followup_time: e.followup_time.clone(),
            date_added: Some(e.date_added.format(TIMESTAMP).to_string()),
            project_name: self.project_name(e.project_id),
            last_note: self.last_note(NoteTarget::Enquiry(e.enq_id)),
            kind: LeadKind::Enquiry,
        }
    }

    fn customer_summary(&self, c: &CustomerRow, show_new: bool) -> LeadSummary {
        LeadSummary {
            id: c.cust_id,
            cust_name: c.full_name(),
            cust_mobile: c.cust_mobile.clone(),
            status: shown_status(c.status.as_deref(), show_new),
            followup_date: c.followup_date.map(|d| d.format("%Y-%m-%d").to_string()),
            followup_time: c.followup_time.clone(),
            date_added: Some(c.created_at.format(TIMESTAMP).to_string()),
            project_name: None,
            last_note: self.last_note(NoteTarget::Customer(c.cust_id)),
            kind: LeadKind::Customer,
        }
    }

    fn enquiry_matches(&self, e: &EnquiryRow, search: Option<&str>) -> bool {
        matches_search(
            search,
            self.enquiry_name(e).as_deref(),
            self.enquiry_mobile(e).as_deref(),
        )
    }

    fn customer_matches(c: &CustomerRow, search: Option<&str>) -> bool {
        matches_search(search, c.full_name().as_deref(), c.cust_mobile.as_deref())
    }

    fn wishlisters(&self, proj_id: i64) -> BTreeSet<i64> {
        self.wishlist
            .iter()
            .filter(|(_, p)| *p == proj_id)
            .map(|(user, _)| *user)
            .collect()
    }

    fn project_count(&self, proj_id: i64, name: &str) -> ProjectCount {
        let enquiry_count = self
            .enquiries
            .iter()
            .filter(|e| e.project_id == proj_id)
            .count() as i64;
        let customer_count = self.wishlisters(proj_id).len() as i64;
        ProjectCount {
            proj_id,
            poj_name: Some(name.to_string()),
            enquiry_count,
            customer_count,
            total_count: enquiry_count + customer_count,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn shown_status(value: Option<&str>, show_new: bool) -> Option<String> {
    if show_new {
        Some(status::display(value).to_string())
    } else {
        value.map(str::to_string)
    }
}

fn is_unset(value: Option<&str>) -> bool {
    non_empty(value).is_none()
}

fn matches_search(search: Option<&str>, name: Option<&str>, mobile: Option<&str>) -> bool {
    let Some(term) = search else {
        return true;
    };
    let term = term.trim().to_lowercase();
    [name, mobile]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&term))
}

fn in_range(at: NaiveDateTime, range: DateRange) -> bool {
    let day = at.date();
    range.from.is_none_or(|from| day >= from) && range.to.is_none_or(|to| day <= to)
}

fn is_excluded(value: Option<&str>, excluded: &[String]) -> bool {
    let value = value.unwrap_or_default();
    excluded.iter().any(|s| s == value)
}

fn apply_parent_update(state: &mut State, note: &NewNote) -> Result<()> {
    let (new_status, date, time) = match note.parent_update() {
        ParentUpdate::Schedule { status, date, time } => (status, Some(date), time),
        ParentUpdate::StatusOnly { status } => (Some(status), None, None),
        ParentUpdate::Unchanged => return Ok(()),
    };
    if state.fail_parent_updates {
        bail!("Simulated parent update failure");
    }
    match note.target {
        NoteTarget::Enquiry(id) => {
            if let Some(e) = state.enquiries.iter_mut().find(|e| e.enq_id == id) {
                e.status = new_status;
                e.followup_date = date;
                e.followup_time = time;
            }
        }
        NoteTarget::Customer(id) => {
            if let Some(c) = state.customers.iter_mut().find(|c| c.cust_id == id) {
                c.status = new_status;
                c.followup_date = date;
                c.followup_time = time;
            }
        }
    }
    Ok(())
}

/// Newest first, then paginate
fn paginate(mut rows: Vec<LeadSummary>, page: PageRequest) -> LeadPage {
    rows.sort_by(|a, b| b.date_added.cmp(&a.date_added));
    let total = rows.len() as u64;
    let rows = rows
        .into_iter()
        .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
        .take(usize::try_from(page.limit).unwrap_or(usize::MAX))
        .collect();
    LeadPage { rows, total }
}

fn date_string(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format("%Y-%m-%d").to_string())
}

/// Lead store over in-memory tables
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an active admin account
    pub async fn add_admin(&self, admin: AdminAccount) {
        self.state.lock().await.admins.push((admin, "active".into()));
    }

    /// Register an admin account with an explicit account status
    pub async fn add_admin_with_status(&self, admin: AdminAccount, account_status: &str) {
        self.state
            .lock()
            .await
            .admins
            .push((admin, account_status.to_string()));
    }

    pub async fn add_project(&self, proj_id: i64, name: &str) {
        self.state.lock().await.projects.insert(proj_id, name.into());
    }

    pub async fn add_enquiry(&self, enquiry: EnquiryRow) {
        self.state.lock().await.enquiries.push(enquiry);
    }

    pub async fn add_customer(&self, customer: CustomerRow) {
        self.state.lock().await.customers.push(customer);
    }

    pub async fn add_wishlist(&self, cust_id: i64, proj_id: i64) {
        self.state.lock().await.wishlist.push((cust_id, proj_id));
    }

    pub async fn add_view(&self, cust_id: i64, proj_id: i64, count: i64) {
        self.state.lock().await.views.push((cust_id, proj_id, count));
    }

    /// Make every following note write fail before anything is stored
    pub async fn fail_writes(&self, fail: bool) {
        self.state.lock().await.fail_writes = fail;
    }

    /// Make the parent update of every following note fail after the note is staged
    pub async fn fail_parent_updates(&self, fail: bool) {
        self.state.lock().await.fail_parent_updates = fail;
    }

    /// Current state of an enquiry row
    pub async fn enquiry_row(&self, enq_id: i64) -> Option<EnquiryRow> {
        let state = self.state.lock().await;
        state.enquiries.iter().find(|e| e.enq_id == enq_id).cloned()
    }

    /// Current state of a customer row
    pub async fn customer_row(&self, cust_id: i64) -> Option<CustomerRow> {
        self.state.lock().await.customer_row(cust_id).cloned()
    }

    pub async fn note_count(&self) -> usize {
        self.state.lock().await.notes.len()
    }
}

#[async_trait]
impl LeadStore for MemoryStore {
    async fn find_admin(&self, email: &str) -> Result<Option<AdminAccount>> {
        let state = self.state.lock().await;
        Ok(state
            .admins
            .iter()
            .find(|(a, account_status)| {
                a.email == email && a.role == "admin" && account_status == "active"
            })
            .map(|(a, _)| a.clone()))
    }

    async fn list_leads(&self, filter: &LeadFilter, page: PageRequest) -> Result<LeadPage> {
        let state = self.state.lock().await;
        let search = filter.search.as_deref();
        let range = filter.range;

        let status_ok = |value: Option<&str>| match filter.kind {
            ListKind::Enquiry | ListKind::Customer => filter
                .status
                .as_deref()
                .is_none_or(|wanted| value == Some(wanted)),
            ListKind::New => is_unset(value),
            ListKind::Booking => value == Some(status::BOOKING_DONE),
        };
        let show_new = filter.kind == ListKind::New;
        let with_enquiries = filter.kind != ListKind::Customer;
        let with_customers = filter.kind != ListKind::Enquiry;

        let mut rows = Vec::new();
        if with_enquiries {
            rows.extend(
                state
                    .enquiries
                    .iter()
                    .filter(|e| status_ok(e.status.as_deref()))
                    .filter(|e| {
                        filter.kind != ListKind::Enquiry
                            || filter.project_id.is_none_or(|p| e.project_id == p)
                    })
                    .filter(|e| in_range(e.date_added, range))
                    .filter(|e| state.enquiry_matches(e, search))
                    .map(|e| state.enquiry_summary(e, show_new)),
            );
        }
        if with_customers {
            rows.extend(
                state
                    .customers
                    .iter()
                    .filter(|c| status_ok(c.status.as_deref()))
                    .filter(|c| in_range(c.created_at, range))
                    .filter(|c| State::customer_matches(c, search))
                    .map(|c| state.customer_summary(c, show_new)),
            );
        }
        Ok(paginate(rows, page))
    }

    async fn enquiry(&self, enq_id: i64) -> Result<Option<LeadRecord>> {
        let state = self.state.lock().await;
        Ok(state
            .enquiries
            .iter()
            .find(|e| e.enq_id == enq_id)
            .map(|e| LeadRecord {
                enq_id: Some(e.enq_id),
                project_id: Some(e.project_id),
                customer_id: e.customer_id,
                cust_name: state.enquiry_name(e),
                cust_mobile: state.enquiry_mobile(e),
                cust_email: non_empty(e.cust_email.as_deref())
                    .map(str::to_string)
                    .or_else(|| {
                        state
                            .customer_row(e.customer_id)
                            .and_then(|c| c.cust_email.clone())
                    }),
                project_name: state.project_name(e.project_id),
                status: e.status.clone(),
                followup_date: date_string(e.followup_date),
                followup_time: e.followup_time.clone(),
                date_added: Some(e.date_added.format(TIMESTAMP).to_string()),
            }))
    }

    async fn customer(&self, cust_id: i64) -> Result<Option<CustomerProfile>> {
        let state = self.state.lock().await;
        Ok(state.customer_row(cust_id).map(profile))
    }

    async fn customer_by_mobile(&self, mobile: &str) -> Result<Option<CustomerProfile>> {
        let state = self.state.lock().await;
        Ok(state
            .customers
            .iter()
            .filter(|c| c.cust_mobile.as_deref() == Some(mobile))
            .min_by_key(|c| c.cust_id)
            .map(profile))
    }

    async fn wishlist(&self, cust_id: i64) -> Result<Vec<WishlistItem>> {
        let state = self.state.lock().await;
        Ok(state
            .wishlist
            .iter()
            .filter(|(user, _)| *user == cust_id)
            .map(|(_, project_id)| WishlistItem {
                project_id: *project_id,
                poj_name: state.project_name(*project_id),
            })
            .collect())
    }

    async fn recently_viewed(&self, cust_id: i64) -> Result<Vec<RecentView>> {
        let state = self.state.lock().await;
        let mut views: Vec<RecentView> = state
            .views
            .iter()
            .filter(|(user, _, _)| *user == cust_id)
            .map(|(_, project_id, count)| RecentView {
                project_id: *project_id,
                poj_name: state.project_name(*project_id),
                count: *count,
            })
            .collect();
        views.sort_by(|a, b| b.count.cmp(&a.count));
        Ok(views)
    }

    async fn notes(&self, target: NoteTarget) -> Result<Vec<NoteEntry>> {
        let state = self.state.lock().await;
        let mut notes: Vec<&NoteRow> = state.notes.iter().filter(|n| n.target == target).collect();
        notes.sort_by(|a, b| (b.added_at, b.nid).cmp(&(a.added_at, a.nid)));
        Ok(notes
            .into_iter()
            .map(|n| NoteEntry {
                nid: n.nid,
                note: n.note.clone(),
                added_by: Some(n.added_by.clone()),
                status: n.status.clone(),
                followup_date: date_string(n.followup_date),
                followup_time: n.followup_time.clone(),
                added_at: Some(n.added_at.format(TIMESTAMP).to_string()),
                kind: n.target.kind(),
            })
            .collect())
    }

    async fn add_note(&self, note: &NewNote) -> Result<i64> {
        let mut state = self.state.lock().await;
        if state.fail_writes {
            bail!("Simulated write failure");
        }

        let nid = state.notes.iter().map(|n| n.nid).max().unwrap_or(0) + 1;
        state.notes.push(NoteRow {
            nid,
            target: note.target,
            note: note.note.clone(),
            added_by: note.added_by.clone(),
            status: note.status.clone(),
            followup_date: note.followup_date,
            followup_time: note.followup_time.clone(),
            added_at: chrono::Local::now().naive_local(),
        });

        // the staged note goes away with a failed parent update
        if let Err(e) = apply_parent_update(&mut state, note) {
            state.notes.retain(|n| n.nid != nid);
            return Err(e);
        }
        Ok(nid)
    }

    async fn enquiry_link(&self, enq_id: i64) -> Result<Option<EnquiryLink>> {
        let state = self.state.lock().await;
        Ok(state
            .enquiries
            .iter()
            .find(|e| e.enq_id == enq_id)
            .map(|e| EnquiryLink {
                enq_id: e.enq_id,
                cust_mobile: e.cust_mobile.clone(),
                customer_id: e.customer_id,
            }))
    }

    async fn update_enquiry_customer(
        &self,
        enq_id: i64,
        cust_name: &str,
        link: Option<i64>,
    ) -> Result<()> {
        let mut state = self.state.lock().await;
        if let Some(e) = state.enquiries.iter_mut().find(|e| e.enq_id == enq_id) {
            e.cust_name = Some(cust_name.to_string());
            if let Some(customer_id) = link {
                e.customer_id = customer_id;
            }
        }
        Ok(())
    }

    async fn followups(&self, window: &FollowupWindow) -> Result<Vec<LeadSummary>> {
        let state = self.state.lock().await;
        let due = |date: Option<NaiveDate>, value: Option<&str>| {
            date.is_some_and(|d| d >= window.from && d <= window.to)
                && !is_excluded(value, &window.exclude_statuses)
        };
        let cap = window
            .limit
            .map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));

        let mut enquiries: Vec<&EnquiryRow> = state
            .enquiries
            .iter()
            .filter(|e| due(e.followup_date, e.status.as_deref()))
            .collect();
        enquiries.sort_by(|a, b| {
            (a.followup_date, &a.followup_time).cmp(&(b.followup_date, &b.followup_time))
        });
        let mut customers: Vec<&CustomerRow> = state
            .customers
            .iter()
            .filter(|c| due(c.followup_date, c.status.as_deref()))
            .collect();
        customers.sort_by(|a, b| {
            (a.followup_date, &a.followup_time).cmp(&(b.followup_date, &b.followup_time))
        });

        let mut leads: Vec<LeadSummary> = enquiries
            .into_iter()
            .take(cap)
            .map(|e| state.enquiry_summary(e, false))
            .collect();
        leads.extend(
            customers
                .into_iter()
                .take(cap)
                .map(|c| state.customer_summary(c, false)),
        );
        Ok(leads)
    }

    async fn count_enquiries(&self) -> Result<u64> {
        Ok(self.state.lock().await.enquiries.len() as u64)
    }

    async fn count_overdue(&self, today: NaiveDate, terminal: &[String]) -> Result<u64> {
        let state = self.state.lock().await;
        let overdue = |date: Option<NaiveDate>, value: Option<&str>| {
            date.is_some_and(|d| d < today) && !is_excluded(value, terminal)
        };
        let count = state
            .enquiries
            .iter()
            .filter(|e| overdue(e.followup_date, e.status.as_deref()))
            .count()
            + state
                .customers
                .iter()
                .filter(|c| overdue(c.followup_date, c.status.as_deref()))
                .count();
        Ok(count as u64)
    }

    async fn count_followups_between(&self, from: NaiveDate, to: NaiveDate) -> Result<u64> {
        let state = self.state.lock().await;
        let due = |date: Option<NaiveDate>| date.is_some_and(|d| d >= from && d <= to);
        let count = state.enquiries.iter().filter(|e| due(e.followup_date)).count()
            + state.customers.iter().filter(|c| due(c.followup_date)).count();
        Ok(count as u64)
    }

    async fn status_counts(&self, range: DateRange) -> Result<Vec<StatusCount>> {
        let state = self.state.lock().await;
        let mut counts: BTreeMap<Option<String>, i64> = BTreeMap::new();
        for e in state.enquiries.iter().filter(|e| in_range(e.date_added, range)) {
            *counts.entry(e.status.clone()).or_default() += 1;
        }
        let mut counts: Vec<StatusCount> = counts
            .into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect();
        counts.sort_by(|a, b| b.count.cmp(&a.count));
        Ok(counts)
    }

    async fn agent_performance(&self, limit: u32) -> Result<Vec<AgentCount>> {
        let state = self.state.lock().await;
        let mut counts: BTreeMap<&str, i64> = BTreeMap::new();
        for n in &state.notes {
            *counts.entry(n.added_by.as_str()).or_default() += 1;
        }
        let mut agents: Vec<AgentCount> = counts
            .into_iter()
            .map(|(added_by, count)| AgentCount {
                added_by: Some(added_by.to_string()),
                count,
            })
            .collect();
        agents.sort_by(|a, b| b.count.cmp(&a.count));
        agents.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(agents)
    }

    async fn project_counts(&self) -> Result<Vec<ProjectCount>> {
        let state = self.state.lock().await;
        let mut projects: Vec<ProjectCount> = state
            .projects
            .iter()
            .map(|(id, name)| state.project_count(*id, name))
            .collect();
        projects.sort_by(|a, b| {
            b.total_count
                .cmp(&a.total_count)
                .then_with(|| a.poj_name.cmp(&b.poj_name))
        });
        Ok(projects)
    }

    async fn project(&self, proj_id: i64) -> Result<Option<ProjectCount>> {
        let state = self.state.lock().await;
        Ok(state
            .projects
            .get(&proj_id)
            .map(|name| state.project_count(proj_id, name)))
    }

    async fn project_leads(
        &self,
        filter: &ProjectLeadFilter,
        page: PageRequest,
    ) -> Result<LeadPage> {
        let state = self.state.lock().await;
        let search = filter.search.as_deref();
        let status_ok = |value: Option<&str>| {
            filter
                .status
                .as_deref()
                .is_none_or(|wanted| value == Some(wanted))
        };

        let rows = match filter.kind {
            LeadKind::Enquiry => state
                .enquiries
                .iter()
                .filter(|e| e.project_id == filter.project_id)
                .filter(|e| status_ok(e.status.as_deref()))
                .filter(|e| state.enquiry_matches(e, search))
                .map(|e| state.enquiry_summary(e, false))
                .collect(),
            LeadKind::Customer => {
                let users = state.wishlisters(filter.project_id);
                state
                    .customers
                    .iter()
                    .filter(|c| users.contains(&c.cust_id))
                    .filter(|c| status_ok(c.status.as_deref()))
                    .filter(|c| State::customer_matches(c, search))
                    .map(|c| state.customer_summary(c, false))
                    .collect()
            }
        };
        Ok(paginate(rows, page))
    }

    async fn project_distribution(
        &self,
        range: DateRange,
        limit: u32,
    ) -> Result<Vec<ProjectShare>> {
        let state = self.state.lock().await;
        let mut counts: BTreeMap<String, i64> = BTreeMap::new();
        for e in state.enquiries.iter().filter(|e| in_range(e.date_added, range)) {
            if let Some(name) = state.project_name(e.project_id) {
                *counts.entry(name).or_default() += 1;
            }
        }
        let mut shares: Vec<ProjectShare> = counts
            .into_iter()
            .map(|(name, count)| ProjectShare {
                poj_name: Some(name),
                count,
            })
            .collect();
        shares.sort_by(|a, b| b.count.cmp(&a.count));
        shares.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(shares)
    }
}

fn profile(c: &CustomerRow) -> CustomerProfile {
    CustomerProfile {
        cust_id: c.cust_id,
        cust_fname: c.cust_fname.clone(),
        cust_lname: c.cust_lname.clone(),
        cust_name: c.full_name(),
        cust_mobile: c.cust_mobile.clone(),
        cust_email: c.cust_email.clone(),
        status: c.status.clone(),
        followup_date: date_string(c.followup_date),
        followup_time: c.followup_time.clone(),
        created_at: Some(c.created_at.format(TIMESTAMP).to_string()),
        credits: c.credits,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, TIMESTAMP).unwrap()
    }

    fn page() -> PageRequest {
        PageRequest::new(None, None, 10, 100)
    }

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store.add_project(1, "Skyline Towers").await;
        store
            .add_customer(CustomerRow {
                cust_id: 5,
                cust_fname: Some("Meera".into()),
                cust_lname: Some("Joshi".into()),
                cust_mobile: Some("9000000005".into()),
                created_at: at("2024-01-03 09:00:00"),
                ..Default::default()
            })
            .await;
        store
            .add_enquiry(EnquiryRow {
                enq_id: 1,
                project_id: 1,
                customer_id: 5,
                cust_name: Some(String::new()),
                date_added: at("2024-01-05 10:00:00"),
                ..Default::default()
            })
            .await;
        store
            .add_enquiry(EnquiryRow {
                enq_id: 2,
                project_id: 1,
                cust_name: Some("Ravi Kumar".into()),
                cust_mobile: Some("9811111111".into()),
                status: Some("Booking done".into()),
                date_added: at("2024-01-04 10:00:00"),
                ..Default::default()
            })
            .await;
        store
    }

    #[tokio::test]
    async fn test_unlinked_name_falls_back_to_customer() {
        let store = seeded().await;
        let lead = store.enquiry(1).await.unwrap().unwrap();
        assert_eq!(lead.cust_name.as_deref(), Some("Meera Joshi"));
        assert_eq!(lead.cust_mobile.as_deref(), Some("9000000005"));
    }

    #[tokio::test]
    async fn test_search_matches_linked_customer_name() {
        let store = seeded().await;
        let filter = LeadFilter {
            kind: ListKind::Enquiry,
            status: None,
            search: Some("MEERA".into()),
            project_id: None,
            range: DateRange::default(),
        };
        let found = store.list_leads(&filter, page()).await.unwrap();
        assert_eq!(found.total, 1);
        assert_eq!(found.rows[0].id, 1);
    }

    #[tokio::test]
    async fn test_new_list_spans_both_tables() {
        let store = seeded().await;
        let filter = LeadFilter {
            kind: ListKind::New,
            status: None,
            search: None,
            project_id: None,
            range: DateRange::default(),
        };
        let found = store.list_leads(&filter, page()).await.unwrap();
        assert_eq!(found.total, 2);
        assert_eq!(found.rows[0].kind, LeadKind::Enquiry);
        assert_eq!(found.rows[1].kind, LeadKind::Customer);
        assert!(found.rows.iter().all(|r| r.status.as_deref() == Some("New")));
    }

    #[tokio::test]
    async fn test_failed_write_stores_nothing() {
        let store = seeded().await;
        store.fail_writes(true).await;
        let note = NewNote {
            target: NoteTarget::Enquiry(1),
            note: "x".into(),
            added_by: "a".into(),
            status: Some("Interested".into()),
            followup_date: None,
            followup_time: None,
        };
        assert!(store.add_note(&note).await.is_err());
        assert_eq!(store.note_count().await, 0);
        assert!(store.enquiry_row(1).await.unwrap().status.is_none());
    }

    #[tokio::test]
    async fn test_failed_parent_update_rolls_back_note() {
        let store = seeded().await;
        store.fail_parent_updates(true).await;
        let note = NewNote {
            target: NoteTarget::Enquiry(1),
            note: "call back".into(),
            added_by: "a".into(),
            status: Some("Follow up".into()),
            followup_date: NaiveDate::from_ymd_opt(2024, 6, 12),
            followup_time: Some("10:00".into()),
        };
        let err = store.add_note(&note).await.unwrap_err();
        assert!(err.to_string().contains("Simulated parent update failure"));
        assert_eq!(store.note_count().await, 0);
        let row = store.enquiry_row(1).await.unwrap();
        assert!(row.status.is_none());
        assert!(row.followup_date.is_none());

        // a note that leaves the parent alone still lands
        let plain = NewNote {
            status: None,
            followup_date: None,
            followup_time: None,
            ..note
        };
        assert_eq!(store.add_note(&plain).await.unwrap(), 1);
        assert_eq!(store.note_count().await, 1);
    }

    #[tokio::test]
    async fn test_project_counts_distinct_wishlisters() {
        let store = seeded().await;
        store.add_project(2, "Aqua Residency").await;
        store.add_wishlist(5, 1).await;
        store.add_wishlist(5, 1).await;
        let projects = store.project_counts().await.unwrap();
        assert_eq!(projects[0].proj_id, 1);
        assert_eq!(projects[0].enquiry_count, 2);
        assert_eq!(projects[0].customer_count, 1);
        assert_eq!(projects[0].total_count, 3);
        assert_eq!(projects[1].total_count, 0);
    }
}
