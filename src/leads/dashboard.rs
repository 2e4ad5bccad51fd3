use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};
use serde::Serialize;

use super::followups;
use crate::config::Config;
use crate::storage::LeadStore;
use crate::types::{AgentCount, DateRange, LeadSummary, StatusCount};

/// Days after today counted as "this week"
const WEEK_DAYS: u64 = 7;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_leads: u64,
    pub today_followups: u64,
    pub overdue_followups: u64,
    pub this_week_followups: u64,
}

/// Body of `GET /api/dashboard/stats`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub summary: Summary,
    pub today_followups_list: Vec<LeadSummary>,
    pub status_counts: Vec<StatusCount>,
    pub agent_performance: Vec<AgentCount>,
}

pub async fn stats(
    store: &dyn LeadStore,
    config: &Config,
    today: NaiveDate,
) -> Result<DashboardStats> {
    let today_list = followups::due_today(store, &config.followups, today).await?;
    let week_end = today
        .checked_add_days(Days::new(WEEK_DAYS))
        .context("Date out of range")?;

    let summary = Summary {
        total_leads: store.count_enquiries().await?,
        today_followups: today_list.len() as u64,
        overdue_followups: store
            .count_overdue(today, &config.followups.terminal_statuses)
            .await?,
        this_week_followups: store.count_followups_between(today, week_end).await?,
    };

    Ok(DashboardStats {
        summary,
        today_followups_list: today_list,
        status_counts: store.status_counts(DateRange::default()).await?,
        agent_performance: store.agent_performance(config.reports.top_agents).await?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leads::notes::{record, NoteForm};
    use crate::storage::memory::{CustomerRow, EnquiryRow};
    use crate::storage::MemoryStore;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn enquiry(enq_id: i64, day: Option<&str>, status: Option<&str>) -> EnquiryRow {
        EnquiryRow {
            enq_id,
            followup_date: day.map(date),
            status: status.map(String::from),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_summary_counts() {
        let store = MemoryStore::new();
        store.add_enquiry(enquiry(1, Some("2024-06-10"), Some("Interested"))).await;
        store.add_enquiry(enquiry(2, Some("2024-06-01"), Some("Follow up"))).await;
        store.add_enquiry(enquiry(3, Some("2024-06-02"), Some("Dead Lead"))).await;
        store.add_enquiry(enquiry(4, Some("2024-06-17"), None)).await;
        store.add_enquiry(enquiry(5, Some("2024-06-18"), Some("Interested"))).await;
        store.add_enquiry(enquiry(6, None, Some("Interested"))).await;
        store
            .add_customer(CustomerRow {
                cust_id: 1,
                followup_date: Some(date("2024-06-05")),
                ..Default::default()
            })
            .await;

        let stats = stats(&store, &Config::default(), date("2024-06-10")).await.unwrap();
        assert_eq!(stats.summary.total_leads, 6);
        assert_eq!(stats.summary.today_followups, 1);
        assert_eq!(stats.today_followups_list[0].id, 1);
        // enquiry 2 plus the customer with no status; the dead lead is skipped
        assert_eq!(stats.summary.overdue_followups, 2);
        // today through the 17th inclusive
        assert_eq!(stats.summary.this_week_followups, 2);
        assert_eq!(stats.status_counts[0].status.as_deref(), Some("Interested"));
        assert_eq!(stats.status_counts[0].count, 3);
    }

    #[tokio::test]
    async fn test_agent_leaderboard() {
        let store = MemoryStore::new();
        store.add_enquiry(enquiry(1, None, None)).await;
        for (author, times) in [("Asha", 3), ("Vik", 1), ("Ravi", 2)] {
            for _ in 0..times {
                let form: NoteForm = serde_json::from_value(serde_json::json!({
                    "enqid": 1, "note": "call", "addedby": author
                }))
                .unwrap();
                record(&store, &form.validate().unwrap()).await.unwrap();
            }
        }

        let mut config = Config::default();
        config.reports.top_agents = 2;
        let stats = stats(&store, &config, date("2024-06-10")).await.unwrap();
        let agents: Vec<(Option<&str>, i64)> = stats
            .agent_performance
            .iter()
            .map(|a| (a.added_by.as_deref(), a.count))
            .collect();
        assert_eq!(agents, vec![(Some("Asha"), 3), (Some("Ravi"), 2)]);

        let json = serde_json::to_value(&stats).unwrap();
        assert!(json["summary"]["thisWeekFollowups"].is_number());
        assert!(json["todayFollowupsList"].is_array());
    }
}
