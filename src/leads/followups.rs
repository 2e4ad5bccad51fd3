use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};
use std::collections::BTreeMap;

use crate::config::FollowupConfig;
use crate::storage::{FollowupWindow, LeadStore};
use crate::types::LeadSummary;

/// Follow-ups grouped by `YYYY-MM-DD`, dates ascending
pub type FollowupsByDate = BTreeMap<String, Vec<LeadSummary>>;

fn excluded(config: &FollowupConfig, exclude_terminal: bool) -> Vec<String> {
    if exclude_terminal {
        config.terminal_statuses.clone()
    } else {
        vec![]
    }
}

/// Both tables' follow-ups due on `today`, earliest time first
pub async fn due_today(
    store: &dyn LeadStore,
    config: &FollowupConfig,
    today: NaiveDate,
) -> Result<Vec<LeadSummary>> {
    let window = FollowupWindow {
        from: today,
        to: today,
        exclude_statuses: excluded(config, config.today_excludes_terminal),
        limit: None,
    };
    let mut leads = store.followups(&window).await?;
    sort_by_time(&mut leads);
    Ok(leads)
}

/// Follow-ups after today and within the configured window
pub async fn upcoming(
    store: &dyn LeadStore,
    config: &FollowupConfig,
    today: NaiveDate,
) -> Result<FollowupsByDate> {
    if config.upcoming_window_days == 0 {
        return Ok(FollowupsByDate::new());
    }
    let from = today.succ_opt().context("Date out of range")?;
    let to = today
        .checked_add_days(Days::new(u64::from(config.upcoming_window_days)))
        .context("Date out of range")?;
    let window = FollowupWindow {
        from,
        to,
        exclude_statuses: excluded(config, config.upcoming_excludes_terminal),
        limit: Some(config.upcoming_limit),
    };
    Ok(group_by_date(store.followups(&window).await?))
}

/// Ascending by time string; leads without a time go last
pub fn sort_by_time(leads: &mut [LeadSummary]) {
    leads.sort_by(|a, b| match (&a.followup_time, &b.followup_time) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

pub fn group_by_date(leads: Vec<LeadSummary>) -> FollowupsByDate {
    let mut groups = FollowupsByDate::new();
    for lead in leads {
        let Some(date) = lead.followup_date.clone() else {
            continue;
        };
        groups.entry(date).or_default().push(lead);
    }
    for group in groups.values_mut() {
        sort_by_time(group);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::{CustomerRow, EnquiryRow};
    use crate::storage::MemoryStore;
    use crate::types::LeadKind;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn lead(id: i64, day: &str, time: Option<&str>) -> LeadSummary {
        LeadSummary {
            id,
            cust_name: None,
            cust_mobile: None,
            status: None,
            followup_date: Some(day.into()),
            followup_time: time.map(String::from),
            date_added: None,
            project_name: None,
            last_note: None,
            kind: LeadKind::Enquiry,
        }
    }

    fn enquiry(enq_id: i64, day: &str, time: Option<&str>, status: Option<&str>) -> EnquiryRow {
        EnquiryRow {
            enq_id,
            followup_date: Some(date(day)),
            followup_time: time.map(String::from),
            status: status.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_sort_puts_missing_times_last() {
        let mut leads = vec![
            lead(1, "2024-06-10", None),
            lead(2, "2024-06-10", Some("15:00:00")),
            lead(3, "2024-06-10", Some("09:30:00")),
        ];
        sort_by_time(&mut leads);
        let ids: Vec<i64> = leads.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_group_by_date_orders_dates_and_times() {
        let groups = group_by_date(vec![
            lead(1, "2024-06-12", Some("10:00:00")),
            lead(2, "2024-06-11", None),
            lead(3, "2024-06-12", Some("08:00:00")),
        ]);
        let dates: Vec<&String> = groups.keys().collect();
        assert_eq!(dates, vec!["2024-06-11", "2024-06-12"]);
        let ids: Vec<i64> = groups["2024-06-12"].iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[tokio::test]
    async fn test_today_keeps_terminal_by_default() {
        let store = MemoryStore::new();
        store.add_enquiry(enquiry(1, "2024-06-10", Some("11:00:00"), Some("Dead Lead"))).await;
        store.add_enquiry(enquiry(2, "2024-06-10", None, None)).await;
        store.add_enquiry(enquiry(3, "2024-06-11", None, None)).await;
        store
            .add_customer(CustomerRow {
                cust_id: 7,
                followup_date: Some(date("2024-06-10")),
                followup_time: Some("09:00:00".into()),
                ..Default::default()
            })
            .await;

        let config = FollowupConfig::default();
        let today = due_today(&store, &config, date("2024-06-10")).await.unwrap();
        let ids: Vec<(LeadKind, i64)> = today.iter().map(|l| (l.kind, l.id)).collect();
        assert_eq!(
            ids,
            vec![
                (LeadKind::Customer, 7),
                (LeadKind::Enquiry, 1),
                (LeadKind::Enquiry, 2)
            ]
        );

        let strict = FollowupConfig {
            today_excludes_terminal: true,
            ..Default::default()
        };
        let today = due_today(&store, &strict, date("2024-06-10")).await.unwrap();
        assert_eq!(today.len(), 2);
    }

    #[tokio::test]
    async fn test_upcoming_window_and_exclusions() {
        let store = MemoryStore::new();
        store.add_enquiry(enquiry(1, "2024-06-10", None, None)).await;
        store.add_enquiry(enquiry(2, "2024-06-11", None, Some("Interested"))).await;
        store.add_enquiry(enquiry(3, "2024-06-17", None, None)).await;
        store.add_enquiry(enquiry(4, "2024-06-18", None, None)).await;
        store.add_enquiry(enquiry(5, "2024-06-12", None, Some("Booking done"))).await;
        store.add_enquiry(enquiry(6, "2024-06-12", None, Some("Duplicate Lead"))).await;
        store
            .add_customer(CustomerRow {
                cust_id: 8,
                followup_date: Some(date("2024-06-12")),
                status: Some("Not Interested".into()),
                ..Default::default()
            })
            .await;

        let upcoming = upcoming(&store, &FollowupConfig::default(), date("2024-06-10"))
            .await
            .unwrap();
        let dates: Vec<&str> = upcoming.keys().map(String::as_str).collect();
        assert_eq!(dates, vec!["2024-06-11", "2024-06-12", "2024-06-17"]);
        let on_12th: Vec<i64> = upcoming["2024-06-12"].iter().map(|l| l.id).collect();
        assert_eq!(on_12th, vec![6]);
    }

    #[tokio::test]
    async fn test_upcoming_limit_per_table() {
        let store = MemoryStore::new();
        for id in 1..=4 {
            store.add_enquiry(enquiry(id, "2024-06-11", None, None)).await;
        }
        let config = FollowupConfig {
            upcoming_limit: 2,
            ..Default::default()
        };
        let upcoming = upcoming(&store, &config, date("2024-06-10")).await.unwrap();
        assert_eq!(upcoming["2024-06-11"].len(), 2);
    }
}
