pub mod memory;
pub mod mysql;
pub mod query;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::types::{
    AdminAccount, AgentCount, CustomerProfile, DateRange, EnquiryLink, LeadFilter, LeadPage,
    LeadRecord, LeadSummary, NewNote, NoteEntry, NoteTarget, PageRequest, ProjectCount,
    ProjectLeadFilter, ProjectShare, RecentView, StatusCount, WishlistItem,
};

pub use self::memory::MemoryStore;
pub use self::mysql::MySqlStore;
pub use self::query::FollowupWindow;

/// Everything the console reads from and writes to the lead database.
///
/// Handlers only see this trait; `MySqlStore` is the production backend and
/// `MemoryStore` backs the tests.
#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Active admin account with this email
    async fn find_admin(&self, email: &str) -> Result<Option<AdminAccount>>;

    /// One page of a lead list plus the filtered total
    async fn list_leads(&self, filter: &LeadFilter, page: PageRequest) -> Result<LeadPage>;

    /// Enquiry with project name and coalesced name/mobile
    async fn enquiry(&self, enq_id: i64) -> Result<Option<LeadRecord>>;

    async fn customer(&self, cust_id: i64) -> Result<Option<CustomerProfile>>;

    /// Lowest-id customer holding this mobile
    async fn customer_by_mobile(&self, mobile: &str) -> Result<Option<CustomerProfile>>;

    async fn wishlist(&self, cust_id: i64) -> Result<Vec<WishlistItem>>;

    /// Viewed projects, most viewed first
    async fn recently_viewed(&self, cust_id: i64) -> Result<Vec<RecentView>>;

    /// Notes attached to one parent, newest first
    async fn notes(&self, target: NoteTarget) -> Result<Vec<NoteEntry>>;

    /// Insert the note and apply its parent update atomically. Returns the note id.
    async fn add_note(&self, note: &NewNote) -> Result<i64>;

    async fn enquiry_link(&self, enq_id: i64) -> Result<Option<EnquiryLink>>;

    /// Rename an enquiry, linking it to `link` when given
    async fn update_enquiry_customer(
        &self,
        enq_id: i64,
        cust_name: &str,
        link: Option<i64>,
    ) -> Result<()>;

    /// Enquiry and customer follow-ups due inside the window
    async fn followups(&self, window: &FollowupWindow) -> Result<Vec<LeadSummary>>;

    async fn count_enquiries(&self) -> Result<u64>;

    /// Leads of both tables whose follow-up date is before `today`
    async fn count_overdue(&self, today: NaiveDate, terminal: &[String]) -> Result<u64>;

    /// Leads of both tables with a follow-up date in `from..=to`
    async fn count_followups_between(&self, from: NaiveDate, to: NaiveDate) -> Result<u64>;

    async fn status_counts(&self, range: DateRange) -> Result<Vec<StatusCount>>;

    /// Note authors across both note tables, busiest first
    async fn agent_performance(&self, limit: u32) -> Result<Vec<AgentCount>>;

    async fn project_counts(&self) -> Result<Vec<ProjectCount>>;

    async fn project(&self, proj_id: i64) -> Result<Option<ProjectCount>>;

    async fn project_leads(&self, filter: &ProjectLeadFilter, page: PageRequest)
        -> Result<LeadPage>;

    async fn project_distribution(&self, range: DateRange, limit: u32)
        -> Result<Vec<ProjectShare>>;
}
