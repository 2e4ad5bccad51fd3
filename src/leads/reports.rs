use anyhow::Result;
use serde::Serialize;

use crate::config::ReportsConfig;
use crate::storage::LeadStore;
use crate::types::{status, DateRange, FunnelStage, ProjectShare, StatusCount};

/// Funnel bars: label, chart colour, statuses counted
const FUNNEL: [(&str, &str, &[&str]); 3] = [
    ("Interested", "#83a6ed", &[status::INTERESTED]),
    ("Site Visit", "#8dd1e1", &[status::SITE_VISIT_DONE]),
    (
        "Booking",
        "#82ca9d",
        &[status::BOOKING_DONE, status::ALREADY_BOOKED],
    ),
];

/// Body of `GET /api/reports`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub status_data: Vec<StatusCount>,
    pub project_data: Vec<ProjectShare>,
    pub funnel_data: Vec<FunnelStage>,
}

pub async fn build(
    store: &dyn LeadStore,
    config: &ReportsConfig,
    range: DateRange,
) -> Result<Report> {
    let status_data = store.status_counts(range).await?;
    let project_data = store
        .project_distribution(range, config.top_projects)
        .await?;
    let funnel_data = funnel(&status_data);
    Ok(Report {
        status_data,
        project_data,
        funnel_data,
    })
}

/// Conversion funnel from current status counts
pub fn funnel(counts: &[StatusCount]) -> Vec<FunnelStage> {
    let total: i64 = counts.iter().map(|c| c.count).sum();
    let count_of = |statuses: &[&str]| -> i64 {
        counts
            .iter()
            .filter(|c| c.status.as_deref().is_some_and(|s| statuses.contains(&s)))
            .map(|c| c.count)
            .sum()
    };

    let mut stages = vec![FunnelStage {
        name: "Total Leads".into(),
        value: total,
        fill: "#8884d8".into(),
    }];
    stages.extend(FUNNEL.iter().map(|(name, fill, statuses)| FunnelStage {
        name: (*name).to_string(),
        value: count_of(*statuses),
        fill: (*fill).to_string(),
    }));
    stages
}
