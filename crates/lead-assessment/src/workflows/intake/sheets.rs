use async_trait::async_trait;
use google_sheets4::api::{Scope, ValueRange};
use google_sheets4::Sheets;
use serde_json::Value;
use tracing::debug;

use super::domain::SubmissionRecord;
use super::store::{StoreError, SubmissionStore};

/// Appends submissions to a Google Sheet with `valueInputOption=RAW`.
pub struct GoogleSheetsStore<C>
where
    C: google_sheets4::common::Connector + Send + Sync + 'static,
{
    hub: Sheets<C>,
    spreadsheet_id: String,
    range: String,
}

impl<C> GoogleSheetsStore<C>
where
    C: google_sheets4::common::Connector + Send + Sync + 'static,
{
    pub fn new(hub: Sheets<C>, spreadsheet_id: impl Into<String>, range: impl Into<String>) -> Self {
        Self {
            hub,
            spreadsheet_id: spreadsheet_id.into(),
            range: range.into(),
        }
    }

    fn map_error<E: std::fmt::Display>(err: E) -> StoreError {
        StoreError::Unavailable(err.to_string())
    }
}

impl<C> std::fmt::Debug for GoogleSheetsStore<C>
where
    C: google_sheets4::common::Connector + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleSheetsStore")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("range", &self.range)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<C> SubmissionStore for GoogleSheetsStore<C>
where
    C: google_sheets4::common::Connector + Send + Sync + 'static,
{
    async fn append(&self, record: &SubmissionRecord) -> Result<(), StoreError> {
        let request = ValueRange {
            values: Some(vec![record.row().into_iter().map(Value::String).collect()]),
            ..ValueRange::default()
        };

        let (_, response) = self
            .hub
            .spreadsheets()
            .values_append(request, &self.spreadsheet_id, &self.range)
            .value_input_option("RAW")
            .add_scope(Scope::Spreadsheet)
            .doit()
            .await
            .map_err(GoogleSheetsStore::<C>::map_error)?;

        debug!(
            updated_range = response
                .updates
                .as_ref()
                .and_then(|updates| updates.updated_range.as_deref())
                .unwrap_or_default(),
            "appended submission row to sheet"
        );
        Ok(())
    }
}
