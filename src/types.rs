use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Status labels the console treats specially. Status is stored as free
/// text, so rows may carry any other value agents pick.
pub mod status {
    pub const INTERESTED: &str = "Interested";
    pub const NOT_INTERESTED: &str = "Not Interested";
    pub const SITE_VISIT_DONE: &str = "Site visit done";
    pub const BOOKING_DONE: &str = "Booking done";
    pub const ALREADY_BOOKED: &str = "Already Booked";
    pub const DEAD_LEAD: &str = "Dead Lead";

    /// Label shown for a lead that has never been worked
    pub const NEW: &str = "New";

    /// Display label for a stored status (NULL and "" read as "New")
    pub fn display(status: Option<&str>) -> &str {
        match status {
            Some(s) if !s.is_empty() => s,
            _ => NEW,
        }
    }
}

/// Which table a lead lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadKind {
    Enquiry,
    Customer,
}

impl std::fmt::Display for LeadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeadKind::Enquiry => write!(f, "enquiry"),
            LeadKind::Customer => write!(f, "customer"),
        }
    }
}

impl std::str::FromStr for LeadKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "enquiry" => Ok(LeadKind::Enquiry),
            "customer" => Ok(LeadKind::Customer),
            _ => anyhow::bail!("Unknown lead type: {}. Use 'enquiry' or 'customer'", s),
        }
    }
}

/// Listing modes of the leads page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// Project enquiries (default)
    Enquiry,
    /// Customer records
    Customer,
    /// Both tables, only leads with no status yet
    New,
    /// Both tables, only leads with a completed booking
    Booking,
}

impl std::str::FromStr for ListKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "enquiry" => Ok(ListKind::Enquiry),
            "customer" => Ok(ListKind::Customer),
            "new" => Ok(ListKind::New),
            "booking" => Ok(ListKind::Booking),
            _ => anyhow::bail!(
                "Unknown list type: {}. Use 'enquiry', 'customer', 'new' or 'booking'",
                s
            ),
        }
    }
}

/// One row of any lead list (leads page, project page, follow-up lists)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadSummary {
    pub id: i64,
    pub cust_name: Option<String>,
    pub cust_mobile: Option<String>,
    pub status: Option<String>,
    pub followup_date: Option<String>,
    pub followup_time: Option<String>,
    pub date_added: Option<String>,
    pub project_name: Option<String>,
    pub last_note: Option<String>,
    #[serde(rename = "type")]
    pub kind: LeadKind,
}

/// A requested page of a list, already normalised
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Normalise raw query values: page below 1 becomes 1, limit is
    /// clamped to `1..=max_limit` and defaults to `default_limit`.
    pub fn new(page: Option<i64>, limit: Option<i64>, default_limit: u64, max_limit: u64) -> Self {
        let page = page.and_then(|p| u64::try_from(p).ok()).unwrap_or(1).max(1);
        let limit = limit
            .and_then(|l| u64::try_from(l).ok())
            .unwrap_or(default_limit)
            .clamp(1, max_limit.max(1));
        Self { page, limit }
    }

    /// Rows to skip before this page; saturates for pages far past the end
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// `ceil(total / limit)`
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit)
    }
}

/// Inclusive calendar-date range on a creation timestamp
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Filters for `GET /api/leads`
#[derive(Debug, Clone, PartialEq)]
pub struct LeadFilter {
    pub kind: ListKind,
    pub status: Option<String>,
    pub search: Option<String>,
    pub project_id: Option<i64>,
    pub range: DateRange,
}

/// Filters for a single project's lead list
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectLeadFilter {
    pub project_id: i64,
    pub kind: LeadKind,
    pub status: Option<String>,
    pub search: Option<String>,
}

/// A page of lead rows plus the size of the whole filtered set
#[derive(Debug, Clone, Default)]
pub struct LeadPage {
    pub rows: Vec<LeadSummary>,
    pub total: u64,
}

/// The `lead` object of the detail bundle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub enq_id: Option<i64>,
    pub project_id: Option<i64>,
    /// 0 when the enquiry is not linked to a customer
    pub customer_id: i64,
    pub cust_name: Option<String>,
    pub cust_mobile: Option<String>,
    pub cust_email: Option<String>,
    pub project_name: Option<String>,
    pub status: Option<String>,
    pub followup_date: Option<String>,
    pub followup_time: Option<String>,
    pub date_added: Option<String>,
}

/// A customer row, or a stand-in built from the lead when none is on file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub cust_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cust_fname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cust_lname: Option<String>,
    pub cust_name: Option<String>,
    pub cust_mobile: Option<String>,
    pub cust_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub followup_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub followup_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    pub credits: i64,
}

impl CustomerProfile {
    /// Whether this is a stored customer rather than a stand-in
    pub fn is_stored(&self) -> bool {
        self.cust_id != 0 && self.created_at.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistItem {
    pub project_id: i64,
    pub poj_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentView {
    pub project_id: i64,
    pub poj_name: Option<String>,
    pub count: i64,
}

/// An entry of a lead's note timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteEntry {
    pub nid: i64,
    pub note: String,
    pub added_by: Option<String>,
    pub status: Option<String>,
    pub followup_date: Option<String>,
    pub followup_time: Option<String>,
    /// `YYYY-MM-DD HH:MM:SS`
    pub added_at: Option<String>,
    #[serde(rename = "type")]
    pub kind: LeadKind,
}

/// Everything the lead detail page shows
#[derive(Debug, Clone, Serialize)]
pub struct LeadDetail {
    pub lead: LeadRecord,
    pub customer: CustomerProfile,
    pub wishlist: Vec<WishlistItem>,
    #[serde(rename = "recentlyViewed")]
    pub recently_viewed: Vec<RecentView>,
    pub notes: Vec<NoteEntry>,
}

/// The parent a note is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteTarget {
    Enquiry(i64),
    Customer(i64),
}

impl NoteTarget {
    pub fn kind(self) -> LeadKind {
        match self {
            NoteTarget::Enquiry(_) => LeadKind::Enquiry,
            NoteTarget::Customer(_) => LeadKind::Customer,
        }
    }

    pub fn id(self) -> i64 {
        match self {
            NoteTarget::Enquiry(id) | NoteTarget::Customer(id) => id,
        }
    }
}

/// A validated note submission
#[derive(Debug, Clone, PartialEq)]
pub struct NewNote {
    pub target: NoteTarget,
    pub note: String,
    pub added_by: String,
    pub status: Option<String>,
    pub followup_date: Option<NaiveDate>,
    pub followup_time: Option<String>,
}

/// What a note does to its parent lead
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentUpdate {
    /// Overwrite status and follow-up with the submitted values
    Schedule {
        status: Option<String>,
        date: NaiveDate,
        time: Option<String>,
    },
    /// Overwrite status and clear the follow-up
    StatusOnly { status: String },
    /// Leave the parent as it is
    Unchanged,
}

impl NewNote {
    /// Decide the parent update: a follow-up date wins, then a bare status.
    pub fn parent_update(&self) -> ParentUpdate {
        if let Some(date) = self.followup_date {
            ParentUpdate::Schedule {
                status: self.status.clone(),
                date,
                time: self.followup_time.clone(),
            }
        } else if let Some(status) = &self.status {
            ParentUpdate::StatusOnly {
                status: status.clone(),
            }
        } else {
            ParentUpdate::Unchanged
        }
    }
}

/// Linking state of an enquiry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnquiryLink {
    pub enq_id: i64,
    pub cust_mobile: Option<String>,
    pub customer_id: i64,
}

/// An admin account allowed to sign in
#[derive(Debug, Clone)]
pub struct AdminAccount {
    pub admin_id: i64,
    pub fname: Option<String>,
    pub lname: Option<String>,
    pub email: String,
    pub role: String,
    /// bcrypt hash
    pub password_hash: String,
}

impl AdminAccount {
    pub fn display_name(&self) -> String {
        format!(
            "{} {}",
            self.fname.as_deref().unwrap_or_default(),
            self.lname.as_deref().unwrap_or_default()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: Option<String>,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentCount {
    pub added_by: Option<String>,
    pub count: i64,
}

/// Lead counts for one project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectCount {
    pub proj_id: i64,
    pub poj_name: Option<String>,
    pub enquiry_count: i64,
    /// Distinct customers who wishlisted the project
    pub customer_count: i64,
    pub total_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectShare {
    pub poj_name: Option<String>,
    pub count: i64,
}

/// One bar of the conversion funnel chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelStage {
    pub name: String,
    pub value: i64,
    pub fill: String,
}
