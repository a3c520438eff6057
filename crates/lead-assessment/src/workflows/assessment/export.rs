use std::io::Cursor;

use async_trait::async_trait;
use google_drive3::{api::File, api::Scope, DriveHub};
use tracing::info;

use super::report::render::render_report_html;
use super::report::AssessmentReport;

const GOOGLE_DOC_MIME: &str = "application/vnd.google-apps.document";
const MISSING_DOCUMENT_ID: &str = "drive returned no file id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    pub document_id: String,
    pub title: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("document export failed: {0}")]
    Backend(String),
}

/// Destination for finished reports rendered as documents.
#[async_trait]
pub trait DocumentExporter: Send + Sync + std::fmt::Debug {
    async fn create_document(&self, title: &str, html_body: &str) -> Result<String, ExportError>;
}

/// Render the report to HTML and hand it to the exporter.
pub async fn export_report(
    exporter: &dyn DocumentExporter,
    report: &AssessmentReport,
) -> Result<ExportedDocument, ExportError> {
    let title = format!(
        "{} ({}, {})",
        report.title(),
        report.child_display_name,
        report.age_group
    );
    let html = render_report_html(report);
    let document_id = exporter.create_document(&title, &html).await?;
    if document_id.trim().is_empty() {
        return Err(ExportError::Backend(MISSING_DOCUMENT_ID.to_string()));
    }
    info!(%document_id, age_group = %report.age_group, "exported assessment report");
    Ok(ExportedDocument { document_id, title })
}

/// Uploads HTML into a Drive folder, converting it to a Google Doc.
pub struct GoogleDocsExporter<C>
where
    C: google_drive3::common::Connector + Send + Sync + 'static,
{
    hub: DriveHub<C>,
    folder_id: String,
}

impl<C> GoogleDocsExporter<C>
where
    C: google_drive3::common::Connector + Send + Sync + 'static,
{
    pub fn new(hub: DriveHub<C>, folder_id: impl Into<String>) -> Self {
        Self {
            hub,
            folder_id: folder_id.into(),
        }
    }

    fn map_error<E: std::fmt::Display>(err: E) -> ExportError {
        ExportError::Backend(err.to_string())
    }
}

impl<C> std::fmt::Debug for GoogleDocsExporter<C>
where
    C: google_drive3::common::Connector + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleDocsExporter")
            .field("folder_id", &self.folder_id)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<C> DocumentExporter for GoogleDocsExporter<C>
where
    C: google_drive3::common::Connector + Send + Sync + 'static,
{
    async fn create_document(&self, title: &str, html_body: &str) -> Result<String, ExportError> {
        let metadata = File {
            name: Some(title.to_string()),
            mime_type: Some(GOOGLE_DOC_MIME.to_string()),
            parents: Some(vec![self.folder_id.clone()]),
            ..File::default()
        };

        let cursor = Cursor::new(html_body.as_bytes().to_vec());
        let (_, file) = self
            .hub
            .files()
            .create(metadata)
            .param("fields", "id")
            .supports_all_drives(true)
            .add_scope(Scope::File)
            .upload(cursor, mime::TEXT_HTML)
            .await
            .map_err(GoogleDocsExporter::<C>::map_error)?;

        file.id
            .ok_or_else(|| ExportError::Backend(MISSING_DOCUMENT_ID.to_string()))
    }
}
