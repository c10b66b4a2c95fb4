use crate::models::{ApplicationDraft, ApplicationRecord, RecordId, Status};
use crate::{Error, Result};

/// The session's job applications, in the order they were added.
///
/// Records only ever get appended, and the status is the only field that
/// changes afterwards. Nothing is deleted, so a `RecordId` stays valid for
/// the whole session.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<ApplicationRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a draft and append it
    pub fn add_record(&mut self, draft: ApplicationDraft) -> Result<RecordId> {
        let record = draft.validate()?;
        let id = RecordId(self.records.len());

        tracing::info!(
            "Added application {} ({} / {}, {})",
            id,
            record.company,
            record.position,
            record.status
        );

        self.records.push(record);
        Ok(id)
    }

    /// Overwrite the status of an existing record
    pub fn amend_status(&mut self, id: RecordId, new_status: Status) -> Result<()> {
        let len = self.records.len();
        let record = self
            .records
            .get_mut(id.index())
            .ok_or(Error::NotFound { id: id.index(), len })?;

        tracing::debug!("Application {}: {} -> {}", id, record.status, new_status);
        record.status = new_status;
        Ok(())
    }

    pub fn list_all(&self) -> &[ApplicationRecord] {
        &self.records
    }

    pub fn get(&self, id: RecordId) -> Option<&ApplicationRecord> {
        self.records.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
