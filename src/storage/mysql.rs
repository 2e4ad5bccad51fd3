use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use mysql_async::prelude::*;
use mysql_async::{Conn, OptsBuilder, Pool, PoolConstraints, PoolOpts, Row, TxOpts, Value};

use super::query::{self, date_param, FollowupWindow, SqlQuery, ENQUIRY_MOBILE, ENQUIRY_NAME};
use super::LeadStore;
use crate::config::DatabaseConfig;
use crate::types::{
    AdminAccount, AgentCount, CustomerProfile, DateRange, EnquiryLink, LeadFilter, LeadKind,
    LeadPage, LeadRecord, LeadSummary, NewNote, NoteEntry, NoteTarget, PageRequest, ParentUpdate,
    ProjectCount, ProjectLeadFilter, ProjectShare, RecentView, StatusCount, WishlistItem,
};

/// DDL for the admin accounts table, matching the legacy console's layout
pub const ADMIN_TABLE_DDL: &str = r"
CREATE TABLE IF NOT EXISTS admin (
    admin_id INT AUTO_INCREMENT PRIMARY KEY,
    fname VARCHAR(100),
    lname VARCHAR(100),
    email VARCHAR(100) UNIQUE NOT NULL,
    mobile VARCHAR(20),
    password VARCHAR(255) NOT NULL,
    role VARCHAR(20) DEFAULT 'admin',
    status VARCHAR(20) DEFAULT 'active',
    builder_id INT DEFAULT NULL,
    designation VARCHAR(100),
    project_ids TEXT,
    reset_token VARCHAR(255),
    reset_valid_time DATETIME,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    updated_at DATETIME DEFAULT NULL ON UPDATE CURRENT_TIMESTAMP
)";

/// Tables reported by `leaddesk status`
pub const LEAD_TABLES: [&str; 8] = [
    "admin",
    "project_details",
    "project_enquiry",
    "customers",
    "project_enquiry_notes",
    "customer_notes",
    "project_wishlist",
    "recently_viewed",
];

const CUSTOMER_COLUMNS: &str = "c.cust_id AS cust_id, c.cust_fname AS cust_fname, \
     c.cust_lname AS cust_lname, CONCAT(c.cust_fname, ' ', c.cust_lname) AS cust_name, \
     c.cust_mobile AS cust_mobile, c.cust_email AS cust_email, c.status AS status, \
     DATE_FORMAT(c.followup_date, '%Y-%m-%d') AS followup_date, \
     CAST(c.followup_time AS CHAR) AS followup_time, \
     DATE_FORMAT(c.created_at, '%Y-%m-%d %H:%i:%s') AS created_at, \
     COALESCE(c.credits, 0) AS credits";

/// A new admin account, password already hashed
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub fname: String,
    pub lname: String,
    pub email: String,
    pub mobile: Option<String>,
    pub password_hash: String,
}

/// Lead store backed by a MySQL connection pool
#[derive(Clone)]
pub struct MySqlStore {
    pool: Pool,
}

impl MySqlStore {
    /// Build a pool for the configured database. Connections are opened lazily.
    pub fn connect(config: &DatabaseConfig) -> Self {
        Self {
            pool: Pool::new(opts(config, Some(&config.name))),
        }
    }

    /// Pool against the server without selecting a database
    pub fn connect_server(config: &DatabaseConfig) -> Self {
        Self {
            pool: Pool::new(opts(config, None)),
        }
    }

    async fn conn(&self) -> Result<Conn> {
        self.pool
            .get_conn()
            .await
            .context("Failed to get a database connection")
    }

    /// Round-trip a trivial query
    pub async fn ping(&self) -> Result<()> {
        let mut conn = self.conn().await?;
        conn.ping().await.context("Database ping failed")
    }

    /// Close every pooled connection
    pub async fn close(self) -> Result<()> {
        self.pool
            .disconnect()
            .await
            .context("Failed to close the connection pool")
    }

    pub async fn ensure_admin_table(&self) -> Result<()> {
        let mut conn = self.conn().await?;
        conn.query_drop(ADMIN_TABLE_DDL)
            .await
            .context("Failed to create admin table")
    }

    pub async fn admin_exists(&self, email: &str) -> Result<bool> {
        let mut conn = self.conn().await?;
        let found: Option<i64> = conn
            .exec_first("SELECT admin_id FROM admin WHERE email = ?", (email,))
            .await
            .context("Failed to look up admin")?;
        Ok(found.is_some())
    }

    /// Insert an active admin. Returns the new `admin_id`.
    pub async fn create_admin(&self, admin: &NewAdmin) -> Result<u64> {
        let mut conn = self.conn().await?;
        conn.exec_drop(
            "INSERT INTO admin (fname, lname, email, mobile, password, role, status, created_at) \
             VALUES (?, ?, ?, ?, ?, 'admin', 'active', NOW())",
            (
                &admin.fname,
                &admin.lname,
                &admin.email,
                admin.mobile.as_deref(),
                &admin.password_hash,
            ),
        )
        .await
        .with_context(|| format!("Failed to insert admin {}", admin.email))?;
        conn.last_insert_id()
            .ok_or_else(|| anyhow!("Database did not report the new admin id"))
    }

    /// Row counts of the lead tables; `None` for a table that cannot be read
    pub async fn table_counts(&self) -> Result<Vec<(&'static str, Option<u64>)>> {
        let mut conn = self.conn().await?;
        let mut counts = Vec::with_capacity(LEAD_TABLES.len());
        for table in LEAD_TABLES {
            let count: Option<u64> = match conn
                .query_first(format!("SELECT COUNT(*) FROM {table}"))
                .await
            {
                Ok(count) => count,
                Err(e) => {
                    tracing::debug!("Cannot count {}: {}", table, e);
                    None
                }
            };
            counts.push((table, count));
        }
        Ok(counts)
    }

    /// Run a SQL script (may hold many statements) against the configured database
    pub async fn run_script(&self, sql: &str) -> Result<()> {
        let mut conn = self.conn().await?;
        conn.query_drop(sql).await.context("SQL script failed")
    }

    /// Drop and recreate a database. Needs a server-level pool.
    pub async fn recreate_database(&self, name: &str) -> Result<()> {
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            bail!("Refusing to recreate database with unsafe name: {:?}", name);
        }
        let mut conn = self.conn().await?;
        conn.query_drop(format!("DROP DATABASE IF EXISTS `{name}`"))
            .await
            .with_context(|| format!("Failed to drop database {name}"))?;
        conn.query_drop(format!("CREATE DATABASE `{name}`"))
            .await
            .with_context(|| format!("Failed to create database {name}"))
    }

    async fn fetch(&self, q: SqlQuery) -> Result<Vec<Row>> {
        let mut conn = self.conn().await?;
        conn.exec(q.sql.as_str(), q.params)
            .await
            .with_context(|| format!("Query failed: {}", q.sql))
    }

    async fn count(&self, q: SqlQuery) -> Result<u64> {
        let mut conn = self.conn().await?;
        let total: Option<u64> = conn
            .exec_first(q.sql.as_str(), q.params)
            .await
            .with_context(|| format!("Count failed: {}", q.sql))?;
        Ok(total.unwrap_or(0))
    }

    async fn count_all(&self, queries: impl IntoIterator<Item = SqlQuery>) -> Result<u64> {
        let mut total = 0;
        for q in queries {
            total += self.count(q).await?;
        }
        Ok(total)
    }

    async fn page(&self, queries: query::ListQueries) -> Result<LeadPage> {
        let total = self.count_all(queries.counts).await?;
        let rows = self
            .fetch(queries.rows)
            .await?
            .into_iter()
            .map(lead_summary)
            .collect::<Result<Vec<_>>>()?;
        Ok(LeadPage { rows, total })
    }

    async fn customer_where(&self, clause: &str, param: Value) -> Result<Option<CustomerProfile>> {
        let mut conn = self.conn().await?;
        let row: Option<Row> = conn
            .exec_first(
                format!("SELECT {CUSTOMER_COLUMNS} FROM customers c WHERE {clause}"),
                vec![param],
            )
            .await
            .context("Failed to load customer")?;
        row.map(customer_profile).transpose()
    }
}

fn opts(config: &DatabaseConfig, db_name: Option<&str>) -> OptsBuilder {
    let constraints = PoolConstraints::new(config.pool_min, config.pool_max.max(1))
        .unwrap_or_default();
    OptsBuilder::default()
        .ip_or_hostname(config.host.clone())
        .tcp_port(config.port)
        .user(Some(config.user.clone()))
        .pass(config.resolve_password())
        .db_name(db_name.map(str::to_string))
        .pool_opts(PoolOpts::default().with_constraints(constraints))
}

fn column<T: FromValue>(row: &mut Row, name: &str) -> Result<T> {
    match row.take_opt::<T, _>(name) {
        Some(Ok(value)) => Ok(value),
        Some(Err(e)) => Err(anyhow!("Unexpected value in column {}: {:?}", name, e)),
        None => Err(anyhow!("Missing column {}", name)),
    }
}

fn lead_summary(mut row: Row) -> Result<LeadSummary> {
    let kind: String = column(&mut row, "type")?;
    Ok(LeadSummary {
        id: column(&mut row, "id")?,
        cust_name: column(&mut row, "cust_name")?,
        cust_mobile: column(&mut row, "cust_mobile")?,
        status: column(&mut row, "status")?,
        followup_date: column(&mut row, "followup_date")?,
        followup_time: column(&mut row, "followup_time")?,
        date_added: column(&mut row, "date_added")?,
        project_name: column(&mut row, "project_name")?,
        last_note: column(&mut row, "last_note")?,
        kind: kind.parse()?,
    })
}

fn customer_profile(mut row: Row) -> Result<CustomerProfile> {
    Ok(CustomerProfile {
        cust_id: column(&mut row, "cust_id")?,
        cust_fname: column(&mut row, "cust_fname")?,
        cust_lname: column(&mut row, "cust_lname")?,
        cust_name: column(&mut row, "cust_name")?,
        cust_mobile: column(&mut row, "cust_mobile")?,
        cust_email: column(&mut row, "cust_email")?,
        status: column(&mut row, "status")?,
        followup_date: column(&mut row, "followup_date")?,
        followup_time: column(&mut row, "followup_time")?,
        created_at: column(&mut row, "created_at")?,
        credits: column(&mut row, "credits")?,
    })
}

fn note_entry(mut row: Row, kind: LeadKind) -> Result<NoteEntry> {
    Ok(NoteEntry {
        nid: column(&mut row, "nid")?,
        note: column::<Option<String>>(&mut row, "note")?.unwrap_or_default(),
        added_by: column(&mut row, "added_by")?,
        status: column(&mut row, "status")?,
        followup_date: column(&mut row, "followup_date")?,
        followup_time: column(&mut row, "followup_time")?,
        added_at: column(&mut row, "added_at")?,
        kind,
    })
}

fn project_count(mut row: Row) -> Result<ProjectCount> {
    Ok(ProjectCount {
        proj_id: column(&mut row, "proj_id")?,
        poj_name: column(&mut row, "poj_name")?,
        enquiry_count: column(&mut row, "enquiry_count")?,
        customer_count: column(&mut row, "customer_count")?,
        total_count: column(&mut row, "total_count")?,
    })
}

/// Note table, its parent key column, and the parent table
fn note_tables(kind: LeadKind) -> (&'static str, &'static str, &'static str) {
    match kind {
        LeadKind::Enquiry => ("project_enquiry_notes", "enq_id", "project_enquiry"),
        LeadKind::Customer => ("customer_notes", "cust_id", "customers"),
    }
}

/// Insert the note row and apply the parent update on an open transaction
async fn write_note(tx: &mut mysql_async::Transaction<'_>, note: &NewNote) -> Result<i64> {
    let (notes_table, key, parent_table) = note_tables(note.target.kind());
    let parent_id = note.target.id();

    tx.exec_drop(
        format!(
            "INSERT INTO {notes_table} \
             ({key}, note, added_by, status, followup_date, followup_time, added_at) \
             VALUES (?, ?, ?, ?, ?, ?, NOW())"
        ),
        vec![
            Value::from(parent_id),
            Value::from(note.note.as_str()),
            Value::from(note.added_by.as_str()),
            Value::from(note.status.clone()),
            note.followup_date.map_or(Value::NULL, date_param),
            Value::from(note.followup_time.clone()),
        ],
    )
    .await
    .with_context(|| format!("Failed to insert into {notes_table}"))?;
    let nid = tx
        .last_insert_id()
        .and_then(|id| i64::try_from(id).ok())
        .ok_or_else(|| anyhow!("Database did not report the new note id"))?;

    let update = match note.parent_update() {
        ParentUpdate::Schedule { status, date, time } => Some((
            format!(
                "UPDATE {parent_table} SET status = ?, followup_date = ?, followup_time = ? \
                 WHERE {key} = ?"
            ),
            vec![
                Value::from(status),
                date_param(date),
                Value::from(time),
                Value::from(parent_id),
            ],
        )),
        ParentUpdate::StatusOnly { status } => Some((
            format!(
                "UPDATE {parent_table} SET status = ?, followup_date = NULL, followup_time = NULL \
                 WHERE {key} = ?"
            ),
            vec![Value::from(status), Value::from(parent_id)],
        )),
        ParentUpdate::Unchanged => None,
    };

    if let Some((sql, params)) = update {
        tx.exec_drop(sql, params)
            .await
            .with_context(|| format!("Failed to update {parent_table} {parent_id}"))?;
    }

    Ok(nid)
}

#[async_trait]
impl LeadStore for MySqlStore {
    async fn find_admin(&self, email: &str) -> Result<Option<AdminAccount>> {
        let mut conn = self.conn().await?;
        let row: Option<Row> = conn
            .exec_first(
                "SELECT admin_id, fname, lname, email, role, password FROM admin \
                 WHERE email = ? AND role = 'admin' AND status = 'active' LIMIT 1",
                (email,),
            )
            .await
            .context("Failed to look up admin")?;
        row.map(|mut row| -> Result<AdminAccount> {
            Ok(AdminAccount {
                admin_id: column(&mut row, "admin_id")?,
                fname: column(&mut row, "fname")?,
                lname: column(&mut row, "lname")?,
                email: column(&mut row, "email")?,
                role: column(&mut row, "role")?,
                password_hash: column(&mut row, "password")?,
            })
        })
        .transpose()
    }

    async fn list_leads(&self, filter: &LeadFilter, page: PageRequest) -> Result<LeadPage> {
        self.page(query::lead_list(filter, page)).await
    }

    async fn enquiry(&self, enq_id: i64) -> Result<Option<LeadRecord>> {
        let mut conn = self.conn().await?;
        let row: Option<Row> = conn
            .exec_first(
                format!(
                    "SELECT pe.enq_id AS enq_id, pe.project_id AS project_id, \
                     COALESCE(pe.customer_id, 0) AS customer_id, \
                     {ENQUIRY_NAME} AS cust_name, {ENQUIRY_MOBILE} AS cust_mobile, \
                     COALESCE(NULLIF(pe.cust_email, ''), c.cust_email) AS cust_email, \
                     pd.poj_name AS project_name, pe.status AS status, \
                     DATE_FORMAT(pe.followup_date, '%Y-%m-%d') AS followup_date, \
                     CAST(pe.followup_time AS CHAR) AS followup_time, \
                     DATE_FORMAT(pe.date_added, '%Y-%m-%d %H:%i:%s') AS date_added \
                     FROM project_enquiry pe \
                     LEFT JOIN project_details pd ON pe.project_id = pd.proj_id \
                     LEFT JOIN customers c ON pe.customer_id = c.cust_id \
                     WHERE pe.enq_id = ?"
                ),
                (enq_id,),
            )
            .await
            .with_context(|| format!("Failed to load enquiry {enq_id}"))?;

        row.map(|mut row| -> Result<LeadRecord> {
            Ok(LeadRecord {
                enq_id: column(&mut row, "enq_id")?,
                project_id: column(&mut row, "project_id")?,
                customer_id: column(&mut row, "customer_id")?,
                cust_name: column(&mut row, "cust_name")?,
                cust_mobile: column(&mut row, "cust_mobile")?,
                cust_email: column(&mut row, "cust_email")?,
                project_name: column(&mut row, "project_name")?,
                status: column(&mut row, "status")?,
                followup_date: column(&mut row, "followup_date")?,
                followup_time: column(&mut row, "followup_time")?,
                date_added: column(&mut row, "date_added")?,
            })
        })
        .transpose()
    }

    async fn customer(&self, cust_id: i64) -> Result<Option<CustomerProfile>> {
        self.customer_where("c.cust_id = ?", cust_id.into()).await
    }

    async fn customer_by_mobile(&self, mobile: &str) -> Result<Option<CustomerProfile>> {
        self.customer_where("c.cust_mobile = ? ORDER BY c.cust_id ASC LIMIT 1", mobile.into())
            .await
    }

    async fn wishlist(&self, cust_id: i64) -> Result<Vec<WishlistItem>> {
        let mut conn = self.conn().await?;
        conn.exec_map(
            "SELECT pw.project_id, pd.poj_name FROM project_wishlist pw \
             LEFT JOIN project_details pd ON pw.project_id = pd.proj_id \
             WHERE pw.user_id = ?",
            (cust_id,),
            |(project_id, poj_name): (i64, Option<String>)| WishlistItem {
                project_id,
                poj_name,
            },
        )
        .await
        .with_context(|| format!("Failed to load wishlist of customer {cust_id}"))
    }

    async fn recently_viewed(&self, cust_id: i64) -> Result<Vec<RecentView>> {
        let mut conn = self.conn().await?;
        conn.exec_map(
            "SELECT rv.project_id, pd.poj_name, COALESCE(rv.count, 0) FROM recently_viewed rv \
             LEFT JOIN project_details pd ON rv.project_id = pd.proj_id \
             WHERE rv.user_id = ? ORDER BY rv.count DESC",
            (cust_id,),
            |(project_id, poj_name, count): (i64, Option<String>, i64)| RecentView {
                project_id,
                poj_name,
                count,
            },
        )
        .await
        .with_context(|| format!("Failed to load recently viewed of customer {cust_id}"))
    }

    async fn notes(&self, target: NoteTarget) -> Result<Vec<NoteEntry>> {
        let kind = target.kind();
        let (notes_table, key, _) = note_tables(kind);
        let rows = self
            .fetch(SqlQuery {
                sql: format!(
                    "SELECT n.nid AS nid, n.note AS note, n.added_by AS added_by, \
                     n.status AS status, \
                     DATE_FORMAT(n.followup_date, '%Y-%m-%d') AS followup_date, \
                     CAST(n.followup_time AS CHAR) AS followup_time, \
                     DATE_FORMAT(n.added_at, '%Y-%m-%d %H:%i:%s') AS added_at \
                     FROM {notes_table} n WHERE n.{key} = ? ORDER BY n.added_at DESC"
                ),
                params: vec![target.id().into()],
            })
            .await?;
        rows.into_iter().map(|row| note_entry(row, kind)).collect()
    }

    async fn add_note(&self, note: &NewNote) -> Result<i64> {
        let mut conn = self.conn().await?;
        let mut tx = conn
            .start_transaction(TxOpts::default())
            .await
            .context("Failed to start transaction")?;

        match write_note(&mut tx, note).await {
            Ok(nid) => {
                tx.commit().await.context("Failed to commit note")?;
                tracing::debug!(
                    "Added note {} to {} {}",
                    nid,
                    note.target.kind(),
                    note.target.id()
                );
                Ok(nid)
            }
            Err(e) => {
                if let Err(rollback) = tx.rollback().await {
                    tracing::warn!("Rollback failed: {}", rollback);
                }
                Err(e)
            }
        }
    }

    async fn enquiry_link(&self, enq_id: i64) -> Result<Option<EnquiryLink>> {
        let mut conn = self.conn().await?;
        let row: Option<(i64, Option<String>, i64)> = conn
            .exec_first(
                "SELECT enq_id, cust_mobile, COALESCE(customer_id, 0) FROM project_enquiry \
                 WHERE enq_id = ?",
                (enq_id,),
            )
            .await
            .with_context(|| format!("Failed to load enquiry {enq_id}"))?;
        Ok(row.map(|(enq_id, cust_mobile, customer_id)| EnquiryLink {
            enq_id,
            cust_mobile,
            customer_id,
        }))
    }

    async fn update_enquiry_customer(
        &self,
        enq_id: i64,
        cust_name: &str,
        link: Option<i64>,
    ) -> Result<()> {
        let mut conn = self.conn().await?;
        let result = match link {
            Some(customer_id) => {
                conn.exec_drop(
                    "UPDATE project_enquiry SET cust_name = ?, customer_id = ? WHERE enq_id = ?",
                    (cust_name, customer_id, enq_id),
                )
                .await
            }
            None => {
                conn.exec_drop(
                    "UPDATE project_enquiry SET cust_name = ? WHERE enq_id = ?",
                    (cust_name, enq_id),
                )
                .await
            }
        };
        result.with_context(|| format!("Failed to update enquiry {enq_id}"))
    }

    async fn followups(&self, window: &FollowupWindow) -> Result<Vec<LeadSummary>> {
        let mut leads = Vec::new();
        for q in query::followups(window) {
            for row in self.fetch(q).await? {
                leads.push(lead_summary(row)?);
            }
        }
        Ok(leads)
    }

    async fn count_enquiries(&self) -> Result<u64> {
        self.count(SqlQuery {
            sql: "SELECT COUNT(*) FROM project_enquiry".into(),
            params: vec![],
        })
        .await
    }

    async fn count_overdue(&self, today: NaiveDate, terminal: &[String]) -> Result<u64> {
        self.count_all(query::overdue_counts(today, terminal)).await
    }

    async fn count_followups_between(&self, from: NaiveDate, to: NaiveDate) -> Result<u64> {
        self.count_all(query::followup_counts(from, to)).await
    }

    async fn status_counts(&self, range: DateRange) -> Result<Vec<StatusCount>> {
        self.fetch(query::status_counts(range))
            .await?
            .into_iter()
            .map(|mut row| -> Result<StatusCount> {
                Ok(StatusCount {
                    status: column(&mut row, "status")?,
                    count: column(&mut row, "count")?,
                })
            })
            .collect()
    }

    async fn agent_performance(&self, limit: u32) -> Result<Vec<AgentCount>> {
        self.fetch(query::agent_performance(limit))
            .await?
            .into_iter()
            .map(|mut row| -> Result<AgentCount> {
                Ok(AgentCount {
                    added_by: column(&mut row, "added_by")?,
                    count: column(&mut row, "count")?,
                })
            })
            .collect()
    }

    async fn project_counts(&self) -> Result<Vec<ProjectCount>> {
        self.fetch(query::project_counts(None))
            .await?
            .into_iter()
            .map(project_count)
            .collect()
    }

    async fn project(&self, proj_id: i64) -> Result<Option<ProjectCount>> {
        self.fetch(query::project_counts(Some(proj_id)))
            .await?
            .into_iter()
            .next()
            .map(project_count)
            .transpose()
    }

    async fn project_leads(
        &self,
        filter: &ProjectLeadFilter,
        page: PageRequest,
    ) -> Result<LeadPage> {
        self.page(query::project_lead_list(filter, page)).await
    }

    async fn project_distribution(
        &self,
        range: DateRange,
        limit: u32,
    ) -> Result<Vec<ProjectShare>> {
        self.fetch(query::project_distribution(range, limit))
            .await?
            .into_iter()
            .map(|mut row| -> Result<ProjectShare> {
                Ok(ProjectShare {
                    poj_name: column(&mut row, "poj_name")?,
                    count: column(&mut row, "count")?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_tables() {
        assert_eq!(
            note_tables(LeadKind::Enquiry),
            ("project_enquiry_notes", "enq_id", "project_enquiry")
        );
        assert_eq!(
            note_tables(LeadKind::Customer),
            ("customer_notes", "cust_id", "customers")
        );
    }

    #[test]
    fn test_admin_ddl_matches_login_query() {
        for column in ["email", "password", "role", "status", "fname", "lname"] {
            assert!(ADMIN_TABLE_DDL.contains(column), "missing {column}");
        }
    }

    #[test]
    fn test_customer_columns_match_listing_name() {
        let name = format!("{} AS cust_name", super::query::CUSTOMER_NAME);
        assert!(CUSTOMER_COLUMNS.contains(&name));
    }

    #[tokio::test]
    async fn test_recreate_database_rejects_unsafe_names() {
        let store = MySqlStore::connect_server(&DatabaseConfig::default());
        let err = store.recreate_database("crm; DROP TABLE admin").await.unwrap_err();
        assert!(err.to_string().contains("unsafe name"));
        assert!(store.recreate_database("").await.is_err());
    }
}
