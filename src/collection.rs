use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, info, o, warn, Logger};

use crate::checklist::{self, ChecklistField};
use crate::errors::TrackerError;
use crate::record::{ProductionRecord, RecordId};
use crate::status::Status;
use crate::store::Store;

/// The committed records, newest first, mirrored into a [`Store`]
/// after every change.
///
/// Operations on IDs that are not present do nothing. Persistence
/// failures are logged and otherwise ignored; the in-memory records stay
/// authoritative for the rest of the session.
pub struct Collection {
    records: Vec<ProductionRecord>,
    store: Arc<dyn Store>,
    logger: Logger,
}

impl Collection {
    /// Creates a collection from whatever the store holds. An absent,
    /// unreadable or corrupt snapshot yields an empty collection.
    pub fn open(store: Arc<dyn Store>, logger: &Logger) -> Self {
        let logger = logger.new(o!("component" => "collection"));

        let mut collection = Collection {
            records: vec![],
            store,
            logger,
        };

        match collection.store.load() {
            Ok(Some(snapshot)) => collection.restore(&snapshot),
            Ok(None) => debug!(collection.logger, "No snapshot found, starting empty"),
            Err(e) => warn!(collection.logger, "Could not read snapshot, starting empty"; "error" => %e),
        }

        collection
    }

    /// Serializes every record, in order, as a JSON array.
    pub fn snapshot(&self) -> Result<String, TrackerError> {
        Ok(serde_json::to_string(&self.records)?)
    }

    /// Replaces the records with those in `snapshot`. Falls back to an
    /// empty collection if the snapshot cannot be decoded.
    pub fn restore(&mut self, snapshot: &str) {
        self.records = match decode(snapshot) {
            Ok(records) => records,
            Err(e) => {
                warn!(self.logger, "Discarding unreadable snapshot"; "error" => %e);
                vec![]
            }
        };

        info!(self.logger, "Restored {} projects", self.records.len());
    }

    /// Inserts `record` at the front. A record already present under the
    /// same ID is replaced.
    pub fn add(&mut self, record: ProductionRecord) {
        debug!(self.logger, "Adding project"; "id" => %record.id);

        if let Some(index) = self.position(&record.id) {
            warn!(self.logger, "Replacing project with duplicate ID"; "id" => %record.id);
            self.records.remove(index);
        }

        self.records.insert(0, record);
        self.persist();
    }

    /// Deletes the record with `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: &RecordId) -> bool {
        match self.position(id) {
            Some(index) => {
                debug!(self.logger, "Removing project"; "id" => %id);
                self.records.remove(index);
                self.persist();
                true
            }
            None => false,
        }
    }

    /// Applies `mutator` to the record with `id` in place. The ID and
    /// creation time survive whatever the mutator does to them. Returns
    /// whether a record was found.
    pub fn update<F>(&mut self, id: &RecordId, mutator: F) -> bool
    where F: FnOnce(&mut ProductionRecord) {
        let index = match self.position(id) {
            Some(index) => index,
            None => return false,
        };

        let record = &mut self.records[index];
        let created_at = record.created_at;

        mutator(record);

        record.id = id.clone();
        record.created_at = created_at;

        debug!(self.logger, "Updated project"; "id" => %id, "status" => %record.status);
        self.persist();

        true
    }

    /// Moves the record with `id` to the next status and returns it.
    pub fn advance(&mut self, id: &RecordId) -> Option<Status> {
        let mut status = None;

        self.update(id, |record| {
            *record = record.clone().advance();
            status = Some(record.status);
        });

        status
    }

    /// Sets the status directly, in either direction.
    pub fn set_status(&mut self, id: &RecordId, status: Status) -> bool {
        self.update(id, |record| record.status = status)
    }

    /// Toggles `value` in one checklist of the record with `id`. Returns
    /// whether the value is now selected, or `None` if there is no such
    /// record.
    pub fn toggle(&mut self, id: &RecordId, field: ChecklistField, value: &str) -> Option<bool> {
        let mut selected = None;

        self.update(id, |record| {
            selected = Some(checklist::toggle_in_place(record, field, value));
        });

        selected
    }

    pub fn get(&self, id: &RecordId) -> Option<&ProductionRecord> {
        self.records.iter().find(|r| r.id == *id)
    }

    /// All records, newest first.
    pub fn records(&self) -> &[ProductionRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProductionRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn position(&self, id: &RecordId) -> Option<usize> {
        self.records.iter().position(|r| r.id == *id)
    }

    fn persist(&self) {
        let result = self.snapshot().and_then(|snapshot| self.store.save(&snapshot));

        if let Err(e) = result {
            warn!(self.logger, "Could not save snapshot"; "error" => %e, "count" => self.records.len());
        }
    }
}

/// Decodes a snapshot. Later entries repeating an earlier ID are dropped.
fn decode(snapshot: &str) -> Result<Vec<ProductionRecord>, TrackerError> {
    if snapshot.trim().is_empty() {
        return Ok(vec![]);
    }

    let records: Vec<ProductionRecord> = serde_json::from_str(snapshot)?;
    let mut seen = HashSet::new();

    Ok(records
        .into_iter()
        .filter(|r| seen.insert(r.id.clone()))
        .collect())
}
