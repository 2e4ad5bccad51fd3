use anyhow::Result;
use serde::Deserialize;

use super::{optional_id, parse_date, present, IdValue, Invalid};
use crate::storage::LeadStore;
use crate::types::{NewNote, NoteTarget};

/// Body of `POST /api/notes`, as the console's note form sends it
#[derive(Debug, Default, Deserialize)]
pub struct NoteForm {
    pub enqid: Option<IdValue>,
    pub custid: Option<IdValue>,
    pub note: Option<String>,
    pub addedby: Option<String>,
    pub status: Option<String>,
    pub followupdate: Option<String>,
    pub followuptime: Option<String>,
}

impl NoteForm {
    /// Check the submission and pick the parent. An enquiry id wins over a
    /// customer id when both are sent.
    pub fn validate(self) -> Result<NewNote, Invalid> {
        let (Some(note), Some(added_by)) = (present(self.note), present(self.addedby)) else {
            return Err(Invalid("Note and Added By are required".into()));
        };

        let enquiry = optional_id(self.enqid.as_ref(), "enqid")?;
        let customer = optional_id(self.custid.as_ref(), "custid")?;
        let target = match (enquiry, customer) {
            (Some(id), _) => NoteTarget::Enquiry(id),
            (None, Some(id)) => NoteTarget::Customer(id),
            (None, None) => return Err(Invalid("Either enqid or custid is required".into())),
        };

        Ok(NewNote {
            target,
            note,
            added_by,
            status: present(self.status),
            followup_date: parse_date("followupdate", self.followupdate.as_deref())?,
            followup_time: present(self.followuptime),
        })
    }
}

/// Store a validated note together with its parent update
pub async fn record(store: &dyn LeadStore, note: &NewNote) -> Result<i64> {
    let nid = store.add_note(note).await?;
    tracing::info!(
        "{} added note {} on {} {} ({:?})",
        note.added_by,
        nid,
        note.target.kind(),
        note.target.id(),
        note.parent_update()
    );
    Ok(nid)
}
