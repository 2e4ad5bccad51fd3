use anyhow::Result;

use crate::storage::LeadStore;
use crate::types::{CustomerProfile, LeadDetail, LeadKind, LeadRecord, NoteTarget};

/// Project label shown for a lead opened from the customers table
pub const DIRECT_CUSTOMER: &str = "Direct Customer";

/// Assemble the detail bundle of one lead; `None` when the lead does not exist
pub async fn lead_detail(
    store: &dyn LeadStore,
    id: i64,
    kind: LeadKind,
) -> Result<Option<LeadDetail>> {
    let (lead, stored) = match kind {
        LeadKind::Customer => match store.customer(id).await? {
            Some(customer) => (customer_as_lead(&customer), Some(customer)),
            None => return Ok(None),
        },
        LeadKind::Enquiry => match store.enquiry(id).await? {
            Some(lead) => (lead, None),
            None => return Ok(None),
        },
    };

    let customer = match stored {
        Some(customer) => Some(customer),
        None => resolve_customer(store, &lead).await?,
    };
    // a linked id whose customer row is gone still scopes the customer data
    let customer_id = customer.as_ref().map_or(lead.customer_id, |c| c.cust_id);
    let customer = customer.unwrap_or_else(|| fallback_customer(&lead));

    let (wishlist, recently_viewed, customer_notes) = if customer_id != 0 {
        (
            store.wishlist(customer_id).await?,
            store.recently_viewed(customer_id).await?,
            store.notes(NoteTarget::Customer(customer_id)).await?,
        )
    } else {
        (vec![], vec![], vec![])
    };

    let mut notes = match lead.enq_id {
        Some(enq_id) => store.notes(NoteTarget::Enquiry(enq_id)).await?,
        None => vec![],
    };
    notes.extend(customer_notes);
    // timestamps are zero-padded, so string order is time order
    notes.sort_by(|a, b| b.added_at.cmp(&a.added_at));

    Ok(Some(LeadDetail {
        lead,
        customer,
        wishlist,
        recently_viewed,
        notes,
    }))
}

/// Linked customer if the enquiry has one, else the customer owning its mobile
async fn resolve_customer(
    store: &dyn LeadStore,
    lead: &LeadRecord,
) -> Result<Option<CustomerProfile>> {
    if lead.customer_id != 0 {
        return store.customer(lead.customer_id).await;
    }
    match lead.cust_mobile.as_deref().filter(|m| !m.is_empty()) {
        Some(mobile) => store.customer_by_mobile(mobile).await,
        None => Ok(None),
    }
}

fn customer_as_lead(customer: &CustomerProfile) -> LeadRecord {
    LeadRecord {
        enq_id: None,
        project_id: None,
        customer_id: customer.cust_id,
        cust_name: customer.cust_name.clone(),
        cust_mobile: customer.cust_mobile.clone(),
        cust_email: customer.cust_email.clone(),
        project_name: Some(DIRECT_CUSTOMER.to_string()),
        status: customer.status.clone(),
        followup_date: customer.followup_date.clone(),
        followup_time: customer.followup_time.clone(),
        date_added: customer.created_at.clone(),
    }
}

/// Stand-in customer built from the lead itself
fn fallback_customer(lead: &LeadRecord) -> CustomerProfile {
    CustomerProfile {
        cust_id: lead.customer_id,
        cust_name: lead.cust_name.clone(),
        cust_mobile: lead.cust_mobile.clone(),
        cust_email: lead.cust_email.clone(),
        credits: 0,
        ..Default::default()
    }
}
