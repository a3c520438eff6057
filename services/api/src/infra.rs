use async_trait::async_trait;
use google_drive3::{hyper_rustls, hyper_util, yup_oauth2};
use lead_assessment::config::{AppConfig, SheetsConfig};
use lead_assessment::error::AppError;
use lead_assessment::workflows::assessment::{DocumentExporter, GoogleDocsExporter};
use lead_assessment::workflows::intake::{
    ConfirmationEmail, ConfirmationMailer, CsvFileStore, GoogleSheetsStore, MailError, SmtpMailer,
    SubmissionStore,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

const GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Development stand-in for SMTP: logs the confirmation instead of sending it.
#[derive(Debug, Default, Clone)]
pub(crate) struct LoggingMailer;

#[async_trait]
impl ConfirmationMailer for LoggingMailer {
    async fn send(&self, email: ConfirmationEmail) -> Result<(), MailError> {
        info!(to = %email.to, subject = %email.subject, "email disabled; confirmation logged only");
        Ok(())
    }
}

pub(crate) async fn submission_store(config: &AppConfig) -> Result<Arc<dyn SubmissionStore>, AppError> {
    if let Some(sheets) = &config.integrations.sheets {
        let hub = sheets_hub(sheets).await?;
        info!(spreadsheet_id = %sheets.spreadsheet_id, range = %sheets.range, "submissions go to Google Sheets");
        return Ok(Arc::new(GoogleSheetsStore::new(
            hub,
            sheets.spreadsheet_id.clone(),
            sheets.range.clone(),
        )));
    }

    match &config.integrations.submissions_csv_path {
        Some(path) => {
            warn!(path = %path.display(), "Google Sheets not configured; submissions go to a local CSV file");
            Ok(Arc::new(CsvFileStore::new(path.clone())))
        }
        None => Err(AppError::Usage(
            "no submission store configured: set SPREADSHEET_ID or SUBMISSIONS_CSV_PATH".to_string(),
        )),
    }
}

pub(crate) fn confirmation_mailer(config: &AppConfig) -> Arc<dyn ConfirmationMailer> {
    match &config.integrations.email {
        Some(email) => {
            info!(smtp_host = %email.smtp_host, smtp_port = email.smtp_port, "confirmation emails enabled");
            Arc::new(SmtpMailer::new(email.clone()))
        }
        None => {
            warn!("EMAIL_USER/EMAIL_PASSWORD not set; confirmation emails are logged only");
            Arc::new(LoggingMailer)
        }
    }
}

pub(crate) async fn document_exporter(
    config: &AppConfig,
) -> Result<Option<Arc<dyn DocumentExporter>>, AppError> {
    let Some(folder_id) = &config.integrations.drive_export_folder_id else {
        return Ok(None);
    };
    let Some(credentials) = &config.integrations.sheets else {
        warn!("DRIVE_EXPORT_FOLDER_ID set without Google service account credentials; export disabled");
        return Ok(None);
    };

    let hub = drive_hub(credentials).await?;
    info!(%folder_id, "report export to Google Docs enabled");
    Ok(Some(Arc::new(GoogleDocsExporter::new(hub, folder_id.clone()))))
}

type HttpsConnector = google_drive3::hyper_rustls::HttpsConnector<
    google_drive3::hyper_util::client::legacy::connect::HttpConnector,
>;

async fn sheets_hub(config: &SheetsConfig) -> Result<google_sheets4::Sheets<HttpsConnector>, AppError> {
    Ok(google_sheets4::Sheets::new(
        https_client()?,
        service_account_auth(config).await?,
    ))
}

async fn drive_hub(config: &SheetsConfig) -> Result<google_drive3::DriveHub<HttpsConnector>, AppError> {
    Ok(google_drive3::DriveHub::new(
        https_client()?,
        service_account_auth(config).await?,
    ))
}

/// Token source for the configured service account; Sheets and Drive share the key.
async fn service_account_auth(
    config: &SheetsConfig,
) -> Result<impl google_drive3::common::GetToken + 'static, AppError> {
    let auth = yup_oauth2::ServiceAccountAuthenticator::builder(service_account_key(config))
        .build()
        .await?;
    Ok(auth)
}

fn service_account_key(config: &SheetsConfig) -> yup_oauth2::ServiceAccountKey {
    yup_oauth2::ServiceAccountKey {
        key_type: Some("service_account".to_string()),
        project_id: None,
        private_key_id: None,
        private_key: config.private_key.clone(),
        client_email: config.client_email.clone(),
        client_id: None,
        auth_uri: None,
        token_uri: GOOGLE_TOKEN_URI.to_string(),
        auth_provider_x509_cert_url: None,
        client_x509_cert_url: None,
    }
}

fn https_client() -> Result<google_drive3::common::Client<HttpsConnector>, AppError> {
    let connector = hyper_rustls::HttpsConnectorBuilder::new()
        .with_native_roots()?
        .https_or_http()
        .enable_http1()
        .build();
    Ok(
        hyper_util::client::legacy::Client::builder(hyper_util::rt::TokioExecutor::new())
            .build(connector),
    )
}
