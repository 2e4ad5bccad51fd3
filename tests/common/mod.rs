#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use chrono::{NaiveDate, NaiveDateTime};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use leaddesk::auth::SessionKeys;
use leaddesk::config::Config;
use leaddesk::http::{router, AppState};
use leaddesk::leads::Clock;
use leaddesk::storage::memory::{CustomerRow, EnquiryRow};
use leaddesk::storage::MemoryStore;
use leaddesk::types::AdminAccount;

pub const TODAY: &str = "2024-06-10";
pub const ADMIN_EMAIL: &str = "asha@example.com";
pub const ADMIN_PASSWORD: &str = "s3cret";

pub fn date(s: &str) -> NaiveDate {
    s.parse().expect("valid test date")
}

pub fn timestamp(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").expect("valid test timestamp")
}

pub fn admin(admin_id: i64, email: &str, password: &str) -> AdminAccount {
    AdminAccount {
        admin_id,
        fname: Some("Asha".into()),
        lname: Some("Rao".into()),
        email: email.into(),
        role: "admin".into(),
        password_hash: bcrypt::hash(password, 4).expect("failed to hash test password"),
    }
}

/// The binary under test
pub fn leaddesk_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_leaddesk"))
}

/// A router over a seeded in-memory store, pinned to `TODAY`.
pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub state: Arc<AppState>,
    static_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        seed(&store).await;

        let static_dir = TempDir::new().expect("failed to create temp dir");
        std::fs::write(
            static_dir.path().join("index.html"),
            "<!doctype html><div id=\"console\"></div>",
        )
        .expect("failed to write index.html");
        std::fs::write(static_dir.path().join("app.js"), "console.log('leaddesk');")
            .expect("failed to write app.js");

        let mut config = Config::default();
        config.server.static_dir = static_dir.path().display().to_string();

        let mut state = AppState::new(
            store.clone(),
            SessionKeys::new(b"test-secret", 24, "session_token", false),
            config,
        );
        state.clock = Clock::Fixed(date(TODAY));

        Self {
            store,
            state: Arc::new(state),
            static_dir,
        }
    }

    pub fn static_dir(&self) -> &Path {
        self.static_dir.path()
    }

    /// `Cookie` header value carrying a valid session for the seeded admin
    pub fn session(&self) -> String {
        let token = self
            .state
            .sessions
            .issue(&admin(1, ADMIN_EMAIL, ADMIN_PASSWORD))
            .expect("failed to issue token");
        format!("session_token={token}")
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = router(self.state.clone())
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("failed to read body")
            .to_bytes();
        TestResponse {
            status,
            headers,
            body: bytes.to_vec(),
        }
    }

    /// Authenticated GET
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(
            Request::get(uri)
                .header("cookie", self.session())
                .body(Body::empty())
                .expect("valid request"),
        )
        .await
    }

    /// Authenticated JSON POST
    pub async fn post(&self, uri: &str, body: serde_json::Value) -> TestResponse {
        self.send(
            Request::post(uri)
                .header("cookie", self.session())
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .expect("valid request"),
        )
        .await
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!(
                "body is not JSON ({e}): {}",
                String::from_utf8_lossy(&self.body)
            )
        })
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Two customers, four enquiries over two projects, one wishlist entry.
///
/// Follow-ups relative to `TODAY` (2024-06-10):
/// - customer 11 at 09:00 today (Booking done)
/// - enquiry 1 at 11:00 today (no status)
/// - enquiry 2 on 06-12 (Interested)
/// - enquiry 3 on 06-13 (Dead Lead)
/// - enquiry 4 on 06-05, overdue (Follow up)
async fn seed(store: &MemoryStore) {
    store.add_admin(admin(1, ADMIN_EMAIL, ADMIN_PASSWORD)).await;
    store
        .add_admin_with_status(admin(2, "retired@example.com", ADMIN_PASSWORD), "inactive")
        .await;

    store.add_project(1, "Skyline Towers").await;
    store.add_project(2, "Aqua Residency").await;
    store.add_project(3, "Empty Plaza").await;

    store
        .add_customer(CustomerRow {
            cust_id: 10,
            cust_fname: Some("Ravi".into()),
            cust_lname: Some("Kumar".into()),
            cust_mobile: Some("9000000001".into()),
            cust_email: Some("ravi@example.com".into()),
            credits: 3,
            created_at: timestamp("2024-05-01 09:00:00"),
            ..Default::default()
        })
        .await;
    store
        .add_customer(CustomerRow {
            cust_id: 11,
            cust_fname: Some("Meera".into()),
            cust_lname: Some("Shah".into()),
            cust_mobile: Some("9000000002".into()),
            status: Some("Booking done".into()),
            followup_date: Some(date("2024-06-10")),
            followup_time: Some("09:00".into()),
            created_at: timestamp("2024-05-02 09:00:00"),
            ..Default::default()
        })
        .await;

    let enquiries = [
        (1, 1, 0, "Sunil", "9000000001", None, "2024-06-10", Some("11:00")),
        (2, 1, 10, "Ravi", "9000000001", Some("Interested"), "2024-06-12", Some("10:00")),
        (3, 2, 0, "Kiran", "9000000003", Some("Dead Lead"), "2024-06-13", None),
        (4, 2, 0, "Anita", "9000000004", Some("Follow up"), "2024-06-05", None),
    ];
    for (enq_id, project_id, customer_id, name, mobile, status, followup, time) in enquiries {
        store
            .add_enquiry(EnquiryRow {
                enq_id,
                project_id,
                customer_id,
                cust_name: Some(name.into()),
                cust_mobile: Some(mobile.into()),
                status: status.map(String::from),
                followup_date: Some(date(followup)),
                followup_time: time.map(String::from),
                date_added: timestamp(&format!("2024-06-0{enq_id} 10:00:00")),
                ..Default::default()
            })
            .await;
    }

    store.add_wishlist(10, 2).await;
    store.add_view(10, 1, 4).await;
}
