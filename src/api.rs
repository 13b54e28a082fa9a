//! REST client for the equipment backend.
//!
//! Every operation issues exactly one request. There is no retry, backoff or
//! timeout: a failure is mapped to [`AppError`] and returned to the caller.

use reqwest::header::AUTHORIZATION;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::models::{
    AuthResponse, DatasetSummary, DeleteAck, ErrorBody, LoginRequest, RegisterRequest,
};
use crate::session::Session;
use crate::upload::UploadCandidate;

/// Backend routes, relative to the configured base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Login,
    Register,
    UploadCsv,
    UploadHistory,
    DatasetSummary(u64),
    DeleteDataset(u64),
    DownloadPdf(u64),
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::Login | Endpoint::Register | Endpoint::UploadCsv => Method::POST,
            Endpoint::UploadHistory | Endpoint::DatasetSummary(_) | Endpoint::DownloadPdf(_) => Method::GET,
            Endpoint::DeleteDataset(_) => Method::DELETE,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Endpoint::Login => "/login/".to_string(),
            Endpoint::Register => "/register/".to_string(),
            Endpoint::UploadCsv => "/upload-csv/".to_string(),
            Endpoint::UploadHistory => "/upload-history/".to_string(),
            Endpoint::DatasetSummary(id) => format!("/datasets/{}/summary/", id),
            Endpoint::DeleteDataset(id) => format!("/datasets/{}/delete/", id),
            Endpoint::DownloadPdf(id) => format!("/datasets/{}/download-pdf/", id),
        }
    }

    fn is_auth(&self) -> bool {
        matches!(self, Endpoint::Login | Endpoint::Register)
    }

    fn fallback_message(&self) -> &'static str {
        match self {
            Endpoint::Login | Endpoint::Register => "An error occurred. Please try again.",
            Endpoint::UploadCsv => "Upload failed. Please check your file format and try again.",
            Endpoint::DatasetSummary(_) | Endpoint::DeleteDataset(_) | Endpoint::DownloadPdf(_) => {
                "Dataset not found"
            }
            Endpoint::UploadHistory => "Failed to load upload history",
        }
    }
}

/// Map a non-success response to the error taxonomy.
///
/// The backend's `{"error": "..."}` message is used when present.
pub fn error_for_status(endpoint: Endpoint, status: StatusCode, body: &str) -> AppError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .ok()
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| endpoint.fallback_message().to_string());

    match status {
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::Auth(message),
        s if s.is_client_error() && endpoint.is_auth() => AppError::Auth(message),
        s if s.is_client_error() => AppError::Validation(message),
        s => AppError::Network(format!("{} returned {}", endpoint.path(), s)),
    }
}

/// A downloaded PDF report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfReport {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub fn report_file_name(dataset_id: u64) -> String {
    format!("equipment_report_{}.pdf", dataset_id)
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    pub fn new(config: &AppConfig, session: Session) -> Result<Self, AppError> {
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: config.validated_base_url()?,
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    /// Start a request for `endpoint`, attaching the session token if one
    /// is stored.
    pub fn request(&self, endpoint: Endpoint) -> RequestBuilder {
        let builder = self.http.request(endpoint.method(), self.url(endpoint));
        match self.session.token() {
            Some(token) => builder.header(AUTHORIZATION, format!("Token {}", token)),
            None => builder,
        }
    }

    async fn send(&self, endpoint: Endpoint, builder: RequestBuilder) -> Result<Response, AppError> {
        info!("{} {}", endpoint.method(), endpoint.path());
        let response = builder.send().await.map_err(|e| {
            warn!("{} {} failed: {}", endpoint.method(), endpoint.path(), e);
            AppError::from(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = error_for_status(endpoint, status, &body);
        warn!("{} {} -> {}: {}", endpoint.method(), endpoint.path(), status, err);
        Err(err)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        builder: RequestBuilder,
    ) -> Result<T, AppError> {
        let response = self.send(endpoint, builder).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| AppError::Network(format!("Malformed response from {}: {}", endpoint.path(), e)))
    }

    /// Sign in and store the returned token and user.
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, AppError> {
        let body = LoginRequest { username, password };
        let builder = self.request(Endpoint::Login).json(&body);
        let auth: AuthResponse = self.send_json(Endpoint::Login, builder).await?;
        self.store_auth(&auth)?;
        Ok(auth)
    }

    /// Create an account and store the returned token and user.
    /// A missing email is sent as an empty string.
    pub async fn register(
        &self,
        username: &str,
        email: Option<&str>,
        password: &str,
    ) -> Result<AuthResponse, AppError> {
        let body = RegisterRequest {
            username,
            email: email.unwrap_or(""),
            password,
        };
        let builder = self.request(Endpoint::Register).json(&body);
        let auth: AuthResponse = self.send_json(Endpoint::Register, builder).await?;
        self.store_auth(&auth)?;
        Ok(auth)
    }

    fn store_auth(&self, auth: &AuthResponse) -> Result<(), AppError> {
        if auth.token.is_empty() {
            return Err(AppError::Auth("Server did not issue a token".to_string()));
        }
        self.session.set_session(&auth.token, &auth.user)
    }

    pub fn logout(&self) {
        info!("Logging out");
        self.session.clear_session();
    }

    pub fn upload_request(&self, file: &UploadCandidate) -> Result<RequestBuilder, AppError> {
        let part = reqwest::multipart::Part::bytes(file.content.clone())
            .file_name(file.name.clone())
            .mime_str("text/csv")
            .map_err(|e| AppError::Validation(format!("Invalid upload: {}", e)))?;
        let form = reqwest::multipart::Form::new().part("file", part);
        Ok(self.request(Endpoint::UploadCsv).multipart(form))
    }

    pub async fn upload_csv(&self, file: &UploadCandidate) -> Result<DatasetSummary, AppError> {
        let builder = self.upload_request(file)?;
        self.send_json(Endpoint::UploadCsv, builder).await
    }

    /// Most recent uploads, newest first. The backend caps the count.
    pub async fn upload_history(&self) -> Result<Vec<DatasetSummary>, AppError> {
        let builder = self.request(Endpoint::UploadHistory);
        self.send_json(Endpoint::UploadHistory, builder).await
    }

    pub async fn dataset_summary(&self, id: u64) -> Result<DatasetSummary, AppError> {
        let endpoint = Endpoint::DatasetSummary(id);
        self.send_json(endpoint, self.request(endpoint)).await
    }

    pub async fn delete_dataset(&self, id: u64) -> Result<(), AppError> {
        let endpoint = Endpoint::DeleteDataset(id);
        let response = self.send(endpoint, self.request(endpoint)).await?;
        let ack: DeleteAck = response.json().await.unwrap_or_default();
        info!(
            "Deleted dataset {}: {}",
            id,
            ack.message.as_deref().unwrap_or("ok")
        );
        Ok(())
    }

    pub async fn download_pdf(&self, id: u64) -> Result<PdfReport, AppError> {
        let endpoint = Endpoint::DownloadPdf(id);
        let response = self.send(endpoint, self.request(endpoint)).await?;
        let bytes = response.bytes().await?;
        Ok(PdfReport {
            file_name: report_file_name(id),
            bytes: bytes.to_vec(),
        })
    }

    /// Newest upload with full detail, or `None` if there are none yet.
    pub async fn latest_dataset(&self) -> Result<Option<DatasetSummary>, AppError> {
        let history = self.upload_history().await?;
        match history.first() {
            Some(newest) => self.dataset_summary(newest.id).await.map(Some),
            None => Ok(None),
        }
    }
}
