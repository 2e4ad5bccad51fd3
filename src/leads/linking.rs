use anyhow::Result;
use serde::Serialize;

use crate::storage::LeadStore;

/// Outcome of renaming an enquiry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkOutcome {
    pub message: String,
    /// Customer the enquiry points at after the update, 0 when unlinked
    #[serde(rename = "customerId")]
    pub customer_id: i64,
}

/// Set an enquiry's customer name. An unlinked enquiry whose mobile belongs
/// to a customer gets linked to that customer as well; an existing link is
/// never replaced. `None` when the enquiry does not exist.
pub async fn rename_enquiry(
    store: &dyn LeadStore,
    enq_id: i64,
    cust_name: &str,
) -> Result<Option<LinkOutcome>> {
    let Some(link) = store.enquiry_link(enq_id).await? else {
        return Ok(None);
    };

    let new_link = if link.customer_id == 0 {
        match link.cust_mobile.as_deref().filter(|m| !m.is_empty()) {
            Some(mobile) => store.customer_by_mobile(mobile).await?.map(|c| c.cust_id),
            None => None,
        }
    } else {
        None
    };

    store
        .update_enquiry_customer(enq_id, cust_name, new_link)
        .await?;

    let outcome = match new_link {
        Some(customer_id) => {
            tracing::info!("Linked enquiry {} to customer {}", enq_id, customer_id);
            LinkOutcome {
                message: format!(
                    "Linked to existing customer (ID: {customer_id}) and updated name"
                ),
                customer_id,
            }
        }
        None => LinkOutcome {
            message: "Customer name updated".into(),
            customer_id: link.customer_id,
        },
    };
    Ok(Some(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::{CustomerRow, EnquiryRow};
    use crate::storage::MemoryStore;

    async fn store_with_customers() -> MemoryStore {
        let store = MemoryStore::new();
        for cust_id in [8, 3] {
            store
                .add_customer(CustomerRow {
                    cust_id,
                    cust_mobile: Some("9822000000".into()),
                    ..Default::default()
                })
                .await;
        }
        store
    }

    #[tokio::test]
    async fn test_links_lowest_matching_customer() {
        let store = store_with_customers().await;
        store
            .add_enquiry(EnquiryRow {
                enq_id: 1,
                cust_mobile: Some("9822000000".into()),
                ..Default::default()
            })
            .await;

        let outcome = rename_enquiry(&store, 1, "Sunil Rao").await.unwrap().unwrap();
        assert_eq!(outcome.customer_id, 3);
        assert!(outcome.message.contains("ID: 3"));

        let row = store.enquiry_row(1).await.unwrap();
        assert_eq!(row.customer_id, 3);
        assert_eq!(row.cust_name.as_deref(), Some("Sunil Rao"));
    }

    #[tokio::test]
    async fn test_existing_link_is_kept() {
        let store = store_with_customers().await;
        store
            .add_enquiry(EnquiryRow {
                enq_id: 2,
                customer_id: 8,
                cust_mobile: Some("9822000000".into()),
                ..Default::default()
            })
            .await;

        let outcome = rename_enquiry(&store, 2, "Sunil").await.unwrap().unwrap();
        assert_eq!(outcome.customer_id, 8);
        assert_eq!(outcome.message, "Customer name updated");
        assert_eq!(store.enquiry_row(2).await.unwrap().customer_id, 8);
    }

    #[tokio::test]
    async fn test_no_mobile_only_renames() {
        let store = store_with_customers().await;
        store
            .add_enquiry(EnquiryRow {
                enq_id: 4,
                ..Default::default()
            })
            .await;

        let outcome = rename_enquiry(&store, 4, "Walk-in").await.unwrap().unwrap();
        assert_eq!(outcome.customer_id, 0);
        let row = store.enquiry_row(4).await.unwrap();
        assert_eq!(row.cust_name.as_deref(), Some("Walk-in"));
        assert_eq!(row.customer_id, 0);
    }

    #[tokio::test]
    async fn test_missing_enquiry() {
        let store = MemoryStore::new();
        assert!(rename_enquiry(&store, 99, "x").await.unwrap().is_none());
    }
}
