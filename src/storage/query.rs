//! SQL assembly for the lead lists and aggregates.
//!
//! Every builder here is pure: it turns a filter into statement text plus
//! positional parameters, so the MySQL store only has to execute them.

use chrono::NaiveDate;
use mysql_async::Value;

use crate::types::{
    status, DateRange, LeadFilter, LeadKind, ListKind, PageRequest, ProjectLeadFilter,
};

/// Display name of an enquiry: its own name, else the linked customer's
pub const ENQUIRY_NAME: &str =
    "COALESCE(NULLIF(pe.cust_name, ''), CONCAT(c.cust_fname, ' ', c.cust_lname))";
/// Mobile of an enquiry: its own number, else the linked customer's
pub const ENQUIRY_MOBILE: &str = "COALESCE(NULLIF(pe.cust_mobile, ''), c.cust_mobile)";
pub const CUSTOMER_NAME: &str = "CONCAT(c.cust_fname, ' ', c.cust_lname)";

const ENQUIRY_FROM: &str = "FROM project_enquiry pe \
     LEFT JOIN project_details pd ON pe.project_id = pd.proj_id \
     LEFT JOIN customers c ON pe.customer_id = c.cust_id";
const ENQUIRY_COUNT_FROM: &str =
    "FROM project_enquiry pe LEFT JOIN customers c ON pe.customer_id = c.cust_id";
const CUSTOMER_FROM: &str = "FROM customers c";

/// A statement and its positional parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Count statements (summed) and the page statement of a list
#[derive(Debug, Clone)]
pub struct ListQueries {
    pub counts: Vec<SqlQuery>,
    pub rows: SqlQuery,
}

/// AND-joined WHERE conditions with their parameters
#[derive(Debug, Default)]
struct Conditions {
    clauses: Vec<String>,
    params: Vec<Value>,
}

impl Conditions {
    fn push(&mut self, clause: impl Into<String>, params: impl IntoIterator<Item = Value>) {
        self.clauses.push(clause.into());
        self.params.extend(params);
    }

    fn render(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }

    fn status(&mut self, column: &str, scope: StatusScope<'_>) {
        match scope {
            StatusScope::Any => {}
            StatusScope::Exactly(s) => self.push(format!("{column} = ?"), [s.into()]),
            StatusScope::Unset => self.push(format!("({column} IS NULL OR {column} = '')"), []),
        }
    }

    fn search(&mut self, name_expr: &str, mobile_expr: &str, search: Option<&str>) {
        if let Some(term) = search {
            let pattern = like_pattern(term);
            self.push(
                format!("(LOWER({name_expr}) {LIKE} OR LOWER({mobile_expr}) {LIKE})"),
                [pattern.clone().into(), pattern.into()],
            );
        }
    }

    fn range(&mut self, column: &str, range: DateRange) {
        if let Some(from) = range.from {
            self.push(format!("DATE({column}) >= ?"), [date_param(from)]);
        }
        if let Some(to) = range.to {
            self.push(format!("DATE({column}) <= ?"), [date_param(to)]);
        }
    }

    fn exclude_statuses(&mut self, column: &str, statuses: &[String]) {
        if statuses.is_empty() {
            return;
        }
        let marks = vec!["?"; statuses.len()].join(", ");
        // NULL status is a fresh lead, never terminal
        self.push(
            format!("COALESCE({column}, '') NOT IN ({marks})"),
            statuses.iter().map(|s| Value::from(s.as_str())),
        );
    }
}

#[derive(Debug, Clone, Copy)]
enum StatusScope<'a> {
    Any,
    Exactly(&'a str),
    Unset,
}

impl<'a> StatusScope<'a> {
    fn from_filter(status: Option<&'a str>) -> Self {
        status.map_or(StatusScope::Any, StatusScope::Exactly)
    }
}

/// Substring match against a `like_pattern`, with its escape character named
const LIKE: &str = r"LIKE ? ESCAPE '\\'";

/// Case-insensitive substring pattern with LIKE wildcards escaped
pub fn like_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for ch in search.trim().to_lowercase().chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

pub fn date_param(date: NaiveDate) -> Value {
    Value::from(date.format("%Y-%m-%d").to_string())
}

fn status_column(expr: &str, show_new: bool) -> String {
    if show_new {
        format!("COALESCE(NULLIF({expr}, ''), '{}')", status::NEW)
    } else {
        expr.to_string()
    }
}

/// Lead summary columns for an enquiry row (aliases `pe`, `pd`, `c`)
fn enquiry_columns(show_new: bool) -> String {
    format!(
        "pe.enq_id AS id, \
         {ENQUIRY_NAME} AS cust_name, \
         {ENQUIRY_MOBILE} AS cust_mobile, \
         {} AS status, \
         DATE_FORMAT(pe.followup_date, '%Y-%m-%d') AS followup_date, \
         CAST(pe.followup_time AS CHAR) AS followup_time, \
         DATE_FORMAT(pe.date_added, '%Y-%m-%d %H:%i:%s') AS date_added, \
         pd.poj_name AS project_name, \
         (SELECT n.note FROM project_enquiry_notes n WHERE n.enq_id = pe.enq_id \
          ORDER BY n.added_at DESC LIMIT 1) AS last_note, \
         'enquiry' AS type",
        status_column("pe.status", show_new)
    )
}

/// Lead summary columns for a customer row (alias `c`)
fn customer_columns(show_new: bool) -> String {
    format!(
        "c.cust_id AS id, \
         {CUSTOMER_NAME} AS cust_name, \
         c.cust_mobile AS cust_mobile, \
         {} AS status, \
         DATE_FORMAT(c.followup_date, '%Y-%m-%d') AS followup_date, \
         CAST(c.followup_time AS CHAR) AS followup_time, \
         DATE_FORMAT(c.created_at, '%Y-%m-%d %H:%i:%s') AS date_added, \
         NULL AS project_name, \
         (SELECT n.note FROM customer_notes n WHERE n.cust_id = c.cust_id \
          ORDER BY n.added_at DESC LIMIT 1) AS last_note, \
         'customer' AS type",
        status_column("c.status", show_new)
    )
}

fn paged(sql: String, mut params: Vec<Value>, page: PageRequest) -> SqlQuery {
    params.push(page.limit.into());
    params.push(page.offset().into());
    SqlQuery {
        sql: format!("{sql} LIMIT ? OFFSET ?"),
        params,
    }
}

fn enquiry_conditions(
    scope: StatusScope<'_>,
    project_id: Option<i64>,
    search: Option<&str>,
    range: DateRange,
) -> Conditions {
    let mut cond = Conditions::default();
    cond.status("pe.status", scope);
    if let Some(project_id) = project_id {
        cond.push("pe.project_id = ?", [project_id.into()]);
    }
    cond.search(ENQUIRY_NAME, ENQUIRY_MOBILE, search);
    cond.range("pe.date_added", range);
    cond
}

fn customer_conditions(
    scope: StatusScope<'_>,
    search: Option<&str>,
    range: DateRange,
) -> Conditions {
    let mut cond = Conditions::default();
    cond.status("c.status", scope);
    cond.search(CUSTOMER_NAME, "c.cust_mobile", search);
    cond.range("c.created_at", range);
    cond
}

/// Statements for `GET /api/leads`
pub fn lead_list(filter: &LeadFilter, page: PageRequest) -> ListQueries {
    let search = filter.search.as_deref();
    match filter.kind {
        ListKind::Enquiry => {
            let cond = enquiry_conditions(
                StatusScope::from_filter(filter.status.as_deref()),
                filter.project_id,
                search,
                filter.range,
            );
            let where_sql = cond.render();
            ListQueries {
                counts: vec![SqlQuery {
                    sql: format!("SELECT COUNT(*) AS total {ENQUIRY_COUNT_FROM}{where_sql}"),
                    params: cond.params.clone(),
                }],
                rows: paged(
                    format!(
                        "SELECT {} {ENQUIRY_FROM}{where_sql} ORDER BY pe.date_added DESC",
                        enquiry_columns(false)
                    ),
                    cond.params,
                    page,
                ),
            }
        }
        ListKind::Customer => {
            let cond = customer_conditions(
                StatusScope::from_filter(filter.status.as_deref()),
                search,
                filter.range,
            );
            let where_sql = cond.render();
            ListQueries {
                counts: vec![SqlQuery {
                    sql: format!("SELECT COUNT(*) AS total {CUSTOMER_FROM}{where_sql}"),
                    params: cond.params.clone(),
                }],
                rows: paged(
                    format!(
                        "SELECT {} {CUSTOMER_FROM}{where_sql} ORDER BY c.created_at DESC",
                        customer_columns(false)
                    ),
                    cond.params,
                    page,
                ),
            }
        }
        ListKind::New => union_list(StatusScope::Unset, true, search, filter.range, page),
        ListKind::Booking => union_list(
            StatusScope::Exactly(status::BOOKING_DONE),
            false,
            search,
            filter.range,
            page,
        ),
    }
}

/// Enquiries and customers in one list, newest first
fn union_list(
    scope: StatusScope<'_>,
    show_new: bool,
    search: Option<&str>,
    range: DateRange,
    page: PageRequest,
) -> ListQueries {
    let enquiries = enquiry_conditions(scope, None, search, range);
    let customers = customer_conditions(scope, search, range);
    let enquiry_where = enquiries.render();
    let customer_where = customers.render();

    let counts = vec![
        SqlQuery {
            sql: format!("SELECT COUNT(*) AS total {ENQUIRY_COUNT_FROM}{enquiry_where}"),
            params: enquiries.params.clone(),
        },
        SqlQuery {
            sql: format!("SELECT COUNT(*) AS total {CUSTOMER_FROM}{customer_where}"),
            params: customers.params.clone(),
        },
    ];

    let sql = format!(
        "(SELECT {} {ENQUIRY_FROM}{enquiry_where}) \
         UNION ALL \
         (SELECT {} {CUSTOMER_FROM}{customer_where}) \
         ORDER BY date_added DESC",
        enquiry_columns(show_new),
        customer_columns(show_new)
    );
    let mut params = enquiries.params;
    params.extend(customers.params);

    ListQueries {
        counts,
        rows: paged(sql, params, page),
    }
}

/// Statements for one project's enquiries or wishlisting customers
pub fn project_lead_list(filter: &ProjectLeadFilter, page: PageRequest) -> ListQueries {
    let scope = StatusScope::from_filter(filter.status.as_deref());
    let search = filter.search.as_deref();
    match filter.kind {
        LeadKind::Enquiry => {
            let cond =
                enquiry_conditions(scope, Some(filter.project_id), search, DateRange::default());
            let where_sql = cond.render();
            ListQueries {
                counts: vec![SqlQuery {
                    sql: format!("SELECT COUNT(*) AS total {ENQUIRY_COUNT_FROM}{where_sql}"),
                    params: cond.params.clone(),
                }],
                rows: paged(
                    format!(
                        "SELECT {} {ENQUIRY_FROM}{where_sql} ORDER BY pe.date_added DESC",
                        enquiry_columns(false)
                    ),
                    cond.params,
                    page,
                ),
            }
        }
        LeadKind::Customer => {
            let mut cond = Conditions::default();
            cond.push(
                "c.cust_id IN (SELECT pw.user_id FROM project_wishlist pw WHERE pw.project_id = ?)",
                [filter.project_id.into()],
            );
            cond.search(CUSTOMER_NAME, "c.cust_mobile", search);
            cond.status("c.status", scope);
            let where_sql = cond.render();
            ListQueries {
                counts: vec![SqlQuery {
                    sql: format!("SELECT COUNT(*) AS total {CUSTOMER_FROM}{where_sql}"),
                    params: cond.params.clone(),
                }],
                rows: paged(
                    format!(
                        "SELECT {} {CUSTOMER_FROM}{where_sql} ORDER BY c.created_at DESC",
                        customer_columns(false)
                    ),
                    cond.params,
                    page,
                ),
            }
        }
    }
}

/// Follow-ups due inside an inclusive date window
#[derive(Debug, Clone, PartialEq)]
pub struct FollowupWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
    /// Statuses to leave out (empty keeps everything)
    pub exclude_statuses: Vec<String>,
    /// Row cap per table
    pub limit: Option<u32>,
}

/// Enquiry and customer statements for a follow-up window
pub fn followups(window: &FollowupWindow) -> [SqlQuery; 2] {
    let build = |columns: String, from: &str, prefix: &str| {
        let mut cond = Conditions::default();
        cond.push(
            format!("{prefix}.followup_date BETWEEN ? AND ?"),
            [date_param(window.from), date_param(window.to)],
        );
        cond.exclude_statuses(&format!("{prefix}.status"), &window.exclude_statuses);
        let mut sql = format!(
            "SELECT {columns} {from}{} \
             ORDER BY {prefix}.followup_date ASC, {prefix}.followup_time ASC",
            cond.render()
        );
        let mut params = cond.params;
        if let Some(limit) = window.limit {
            sql.push_str(" LIMIT ?");
            params.push(limit.into());
        }
        SqlQuery { sql, params }
    };

    [
        build(enquiry_columns(false), ENQUIRY_FROM, "pe"),
        build(customer_columns(false), CUSTOMER_FROM, "c"),
    ]
}

/// Per-table counts of leads whose follow-up date has passed
pub fn overdue_counts(today: NaiveDate, terminal: &[String]) -> [SqlQuery; 2] {
    ["project_enquiry", "customers"].map(|table| {
        let mut cond = Conditions::default();
        cond.push("followup_date < ?", [date_param(today)]);
        cond.exclude_statuses("status", terminal);
        SqlQuery {
            sql: format!("SELECT COUNT(*) AS total FROM {table}{}", cond.render()),
            params: cond.params,
        }
    })
}

/// Per-table counts of follow-ups due between two dates, inclusive
pub fn followup_counts(from: NaiveDate, to: NaiveDate) -> [SqlQuery; 2] {
    ["project_enquiry", "customers"].map(|table| SqlQuery {
        sql: format!("SELECT COUNT(*) AS total FROM {table} WHERE followup_date BETWEEN ? AND ?"),
        params: vec![date_param(from), date_param(to)],
    })
}

/// Enquiry counts grouped by status
pub fn status_counts(range: DateRange) -> SqlQuery {
    let mut cond = Conditions::default();
    cond.range("date_added", range);
    SqlQuery {
        sql: format!(
            "SELECT status, COUNT(*) AS count FROM project_enquiry{} \
             GROUP BY status ORDER BY count DESC",
            cond.render()
        ),
        params: cond.params,
    }
}

/// Enquiry counts of the busiest projects
pub fn project_distribution(range: DateRange, limit: u32) -> SqlQuery {
    let mut cond = Conditions::default();
    cond.range("pe.date_added", range);
    let mut params = cond.params.clone();
    params.push(limit.into());
    SqlQuery {
        sql: format!(
            "SELECT pd.poj_name AS poj_name, COUNT(*) AS count \
             FROM project_enquiry pe JOIN project_details pd ON pe.project_id = pd.proj_id{} \
             GROUP BY pd.poj_name ORDER BY count DESC LIMIT ?",
            cond.render()
        ),
        params,
    }
}

/// Note authors ranked by notes written across both lead tables
pub fn agent_performance(limit: u32) -> SqlQuery {
    SqlQuery {
        sql: "SELECT added_by, COUNT(*) AS count FROM (\
              SELECT added_by FROM project_enquiry_notes \
              UNION ALL \
              SELECT added_by FROM customer_notes\
              ) AS all_notes GROUP BY added_by ORDER BY count DESC LIMIT ?"
            .to_string(),
        params: vec![limit.into()],
    }
}

/// Per-project enquiry and wishlist counts; one project when `project_id` is set
pub fn project_counts(project_id: Option<i64>) -> SqlQuery {
    let mut cond = Conditions::default();
    if let Some(id) = project_id {
        cond.push("pd.proj_id = ?", [id.into()]);
    }
    SqlQuery {
        sql: format!(
            "SELECT pd.proj_id AS proj_id, pd.poj_name AS poj_name, \
             COALESCE(enq.enquiry_count, 0) AS enquiry_count, \
             COALESCE(cust.customer_count, 0) AS customer_count, \
             COALESCE(enq.enquiry_count, 0) + COALESCE(cust.customer_count, 0) AS total_count \
             FROM project_details pd \
             LEFT JOIN (SELECT project_id, COUNT(*) AS enquiry_count \
                        FROM project_enquiry GROUP BY project_id) enq \
               ON pd.proj_id = enq.project_id \
             LEFT JOIN (SELECT project_id, COUNT(DISTINCT user_id) AS customer_count \
                        FROM project_wishlist GROUP BY project_id) cust \
               ON pd.proj_id = cust.project_id{} \
             ORDER BY total_count DESC, pd.poj_name ASC",
            cond.render()
        ),
        params: cond.params,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(kind: ListKind) -> LeadFilter {
        LeadFilter {
            kind,
            status: None,
            search: None,
            project_id: None,
            range: DateRange::default(),
        }
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_like_pattern_lowercases_and_escapes() {
        assert_eq!(like_pattern("Ravi"), "%ravi%");
        assert_eq!(like_pattern("  98765 "), "%98765%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }

    #[test]
    fn test_enquiry_list_without_filters() {
        let q = lead_list(&filter(ListKind::Enquiry), PageRequest::new(None, None, 10, 100));
        assert_eq!(q.counts.len(), 1);
        assert!(!q.counts[0].sql.contains("WHERE"));
        assert!(q.counts[0].params.is_empty());
        assert!(q.rows.sql.ends_with("ORDER BY pe.date_added DESC LIMIT ? OFFSET ?"));
        assert_eq!(q.rows.params, vec![Value::from(10u64), Value::from(0u64)]);
    }

    #[test]
    fn test_page_two_offsets_by_limit() {
        let q = lead_list(&filter(ListKind::Enquiry), PageRequest::new(Some(2), Some(10), 10, 100));
        assert_eq!(q.rows.params, vec![Value::from(10u64), Value::from(10u64)]);
    }

    #[test]
    fn test_enquiry_search_uses_coalesced_name_and_mobile() {
        let mut f = filter(ListKind::Enquiry);
        f.search = Some("Patil".into());
        let q = lead_list(&f, PageRequest::new(None, None, 10, 100));

        let expected = format!("(LOWER({ENQUIRY_NAME}) {LIKE} OR LOWER({ENQUIRY_MOBILE}) {LIKE})");
        assert!(q.counts[0].sql.contains(&expected));
        assert_eq!(q.rows.sql.matches(r"LIKE ? ESCAPE '\\'").count(), 2);
        assert!(q.rows.sql.contains(&expected));
        assert_eq!(
            q.counts[0].params,
            vec![Value::from("%patil%"), Value::from("%patil%")]
        );
    }

    #[test]
    fn test_enquiry_filters_in_order() {
        let f = LeadFilter {
            kind: ListKind::Enquiry,
            status: Some("Interested".into()),
            search: None,
            project_id: Some(12),
            range: DateRange {
                from: Some(date("2024-01-01")),
                to: Some(date("2024-01-31")),
            },
        };
        let q = lead_list(&f, PageRequest::new(None, None, 10, 100));
        assert!(q.counts[0].sql.contains(
            "WHERE pe.status = ? AND pe.project_id = ? \
             AND DATE(pe.date_added) >= ? AND DATE(pe.date_added) <= ?"
        ));
        assert_eq!(
            q.counts[0].params,
            vec![
                Value::from("Interested"),
                Value::from(12i64),
                Value::from("2024-01-01"),
                Value::from("2024-01-31"),
            ]
        );
        assert_eq!(q.rows.params.len(), 6);
    }

    #[test]
    fn test_customer_list_filters_on_created_at() {
        let mut f = filter(ListKind::Customer);
        f.range.from = Some(date("2024-03-01"));
        f.status = Some("Follow up".into());
        let q = lead_list(&f, PageRequest::new(None, None, 10, 100));
        assert!(q
            .rows
            .sql
            .contains("FROM customers c WHERE c.status = ? AND DATE(c.created_at) >= ?"));
        assert!(q.rows.sql.contains("'customer' AS type"));
    }

    #[test]
    fn test_new_list_unions_unset_statuses() {
        let mut f = filter(ListKind::New);
        f.search = Some("98".into());
        f.status = Some("Interested".into());
        f.project_id = Some(4);
        let q = lead_list(&f, PageRequest::new(None, None, 10, 100));

        assert_eq!(q.counts.len(), 2);
        assert!(q.counts[0].sql.contains("(pe.status IS NULL OR pe.status = '')"));
        assert!(q.counts[1].sql.contains("(c.status IS NULL OR c.status = '')"));
        assert!(q.rows.sql.contains("UNION ALL"));
        assert!(q.rows.sql.contains("COALESCE(NULLIF(pe.status, ''), 'New') AS status"));
        assert!(q.rows.sql.ends_with("ORDER BY date_added DESC LIMIT ? OFFSET ?"));
        // status and project filters do not apply to the union lists
        assert!(!q.rows.sql.contains("pe.project_id = ?"));
        // two search params per half, then limit and offset
        assert_eq!(q.rows.params.len(), 6);
    }

    #[test]
    fn test_booking_list_matches_booking_done() {
        let q = lead_list(&filter(ListKind::Booking), PageRequest::new(None, None, 10, 100));
        assert!(q.rows.sql.contains("pe.status = ?"));
        assert!(q.rows.sql.contains("c.status = ?"));
        assert_eq!(q.counts[0].params, vec![Value::from("Booking done")]);
        assert_eq!(q.counts[1].params, vec![Value::from("Booking done")]);
    }

    #[test]
    fn test_project_customer_list_uses_wishlist() {
        let f = ProjectLeadFilter {
            project_id: 9,
            kind: LeadKind::Customer,
            status: None,
            search: Some("anil".into()),
        };
        let q = project_lead_list(&f, PageRequest::new(None, None, 10, 100));
        assert!(q.counts[0].sql.contains("pw.project_id = ?"));
        assert_eq!(q.counts[0].params[0], Value::from(9i64));
        assert_eq!(q.counts[0].params.len(), 3);
    }

    #[test]
    fn test_followup_window_excludes_statuses() {
        let window = FollowupWindow {
            from: date("2024-06-11"),
            to: date("2024-06-17"),
            exclude_statuses: vec!["Dead Lead".into(), "Booking done".into()],
            limit: Some(50),
        };
        let [enquiries, customers] = followups(&window);
        assert!(enquiries.sql.contains("pe.followup_date BETWEEN ? AND ?"));
        assert!(enquiries.sql.contains("COALESCE(pe.status, '') NOT IN (?, ?)"));
        assert!(customers.sql.contains("COALESCE(c.status, '') NOT IN (?, ?)"));
        assert!(enquiries.sql.ends_with("LIMIT ?"));
        assert_eq!(
            enquiries.params,
            vec![
                Value::from("2024-06-11"),
                Value::from("2024-06-17"),
                Value::from("Dead Lead"),
                Value::from("Booking done"),
                Value::from(50u32),
            ]
        );
    }

    #[test]
    fn test_followup_window_keeps_everything() {
        let today = date("2024-06-10");
        let window = FollowupWindow {
            from: today,
            to: today,
            exclude_statuses: vec![],
            limit: None,
        };
        let [enquiries, _] = followups(&window);
        assert!(!enquiries.sql.contains("NOT IN"));
        assert!(!enquiries.sql.ends_with("LIMIT ?"));
        assert_eq!(enquiries.params.len(), 2);
    }

    #[test]
    fn test_overdue_counts_both_tables() {
        let terminal = vec!["Dead Lead".to_string()];
        let [enq, cust] = overdue_counts(date("2024-06-10"), &terminal);
        assert!(enq
            .sql
            .starts_with("SELECT COUNT(*) AS total FROM project_enquiry WHERE followup_date < ?"));
        assert!(cust.sql.contains("FROM customers"));
        assert_eq!(cust.params.len(), 2);
    }

    #[test]
    fn test_status_counts_with_range() {
        let q = status_counts(DateRange {
            from: Some(date("2024-01-01")),
            to: None,
        });
        assert!(q.sql.contains("WHERE DATE(date_added) >= ? GROUP BY status"));
        assert_eq!(q.params, vec![Value::from("2024-01-01")]);
        assert!(!status_counts(DateRange::default()).sql.contains("WHERE"));
    }

    #[test]
    fn test_project_counts_single() {
        assert!(!project_counts(None).sql.contains("pd.proj_id = ?"));
        let one = project_counts(Some(3));
        assert!(one.sql.contains("WHERE pd.proj_id = ?"));
        assert_eq!(one.params, vec![Value::from(3i64)]);
    }
}
