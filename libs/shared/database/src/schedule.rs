use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::debug;

use shared_models::schedule::{Schedule, SlotTime};

use crate::id::DocumentId;
use crate::store::{Document, DocumentStore, StoreResult};

/// Access to a date → time → entry map stored under one field of a document.
///
/// Every method returns `None`/`false` when the owning document does not exist.
pub struct ScheduleRepository<'a> {
    store: &'a dyn DocumentStore,
    collection: &'static str,
    field: &'static str,
}

impl<'a> ScheduleRepository<'a> {
    pub fn new(store: &'a dyn DocumentStore, collection: &'static str, field: &'static str) -> Self {
        Self { store, collection, field }
    }

    pub async fn load<T: DeserializeOwned>(&self, id: &DocumentId) -> StoreResult<Option<Schedule<T>>> {
        let document = match self.store.find_by_id(self.collection, id).await? {
            Some(document) => document,
            None => return Ok(None),
        };

        match document.get(self.field) {
            Some(Value::Null) | None => Ok(Some(Schedule::new())),
            Some(raw) => Ok(Some(serde_json::from_value(raw.clone())?)),
        }
    }

    /// Adds or replaces whole days, keeping the days not mentioned.
    pub async fn merge_days<T: Serialize>(&self, id: &DocumentId, days: &Schedule<T>) -> StoreResult<bool> {
        let document = match self.store.find_by_id(self.collection, id).await? {
            Some(document) => document,
            None => return Ok(false),
        };

        let mut merged = match document.get(self.field) {
            Some(Value::Object(existing)) => existing.clone(),
            _ => Document::new(),
        };
        for (date, entries) in days {
            merged.insert(date.to_string(), serde_json::to_value(entries)?);
        }
        debug!("Merging {} day(s) into {}.{} of {}", days.len(), self.collection, self.field, id);

        let mut fields = Document::new();
        fields.insert(self.field.to_string(), Value::Object(merged));
        self.store.update_fields(self.collection, id, fields).await
    }

    /// Writes one entry, leaving the other entries of that date untouched.
    pub async fn set_entry<T: Serialize>(
        &self,
        id: &DocumentId,
        date: NaiveDate,
        time: SlotTime,
        entry: &T,
    ) -> StoreResult<bool> {
        let date_key = date.to_string();
        let time_key = time.to_string();
        let value = serde_json::to_value(entry)?;

        self.store
            .set_path(self.collection, id, &[self.field, date_key.as_str(), time_key.as_str()], value)
            .await
    }

    /// Removes the whole date when `time` is `None`, otherwise only that entry.
    pub async fn remove_entry(&self, id: &DocumentId, date: NaiveDate, time: Option<SlotTime>) -> StoreResult<bool> {
        let date_key = date.to_string();
        match time {
            Some(time) => {
                let time_key = time.to_string();
                self.store
                    .unset_path(self.collection, id, &[self.field, date_key.as_str(), time_key.as_str()])
                    .await
            }
            None => {
                self.store
                    .unset_path(self.collection, id, &[self.field, date_key.as_str()])
                    .await
            }
        }
    }
}
