//! The bill service capability and its HTTP implementation.

use std::fmt::Display;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use billgen_billing::{Bill, BillDescription};
use billgen_core::BillId;

use crate::dto::{AvailabilityDto, BillDto, BillListDto, BillRequestDto, SubmitResponseDto};
use crate::error::ClientError;
use crate::settings::ClientSettings;

/// Path prefix of every bill service endpoint.
pub const API_PREFIX: &str = "/api";

/// Relative download reference for a generated bill.
pub fn download_path(id: BillId) -> String {
    format!("{API_PREFIX}/bills/{id}/download")
}

/// Operations offered by the bill service.
///
/// Each call is a single request/response; retry policy belongs to callers.
#[async_trait]
pub trait BillApi: Send + Sync {
    /// `POST /bills`; returns the server-assigned id.
    async fn submit_bill(&self, request: &BillRequestDto) -> Result<BillId, ClientError>;

    /// `GET /bills/{id}/available`.
    async fn check_availability(&self, id: BillId) -> Result<bool, ClientError>;

    /// `GET /bills/{id}`.
    async fn get_bill(&self, id: BillId) -> Result<Bill, ClientError>;

    /// `GET /bills?user={user}`.
    async fn list_bills(&self, user: &str) -> Result<Vec<BillDescription>, ClientError>;

    /// `GET /bills/{id}/download`; the raw PDF.
    async fn download_bill(&self, id: BillId) -> Result<Vec<u8>, ClientError>;
}

/// `BillApi` over HTTP with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpBillClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBillClient {
    pub fn new(settings: &ClientSettings) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| ClientError::network(format!("failed to build http client: {e}")))?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of the PDF download for `id`.
    pub fn download_url(&self, id: BillId) -> String {
        format!("{}{}", self.base_url, download_path(id))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{API_PREFIX}{path}", self.base_url)
    }

    async fn read_body(&self, req: reqwest::RequestBuilder) -> Result<Vec<u8>, ClientError> {
        let resp = req.send().await.map_err(|e| ClientError::network(e.to_string()))?;
        let status = resp.status();

        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: error_body(status.as_u16(), resp.text().await),
            });
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| ClientError::network(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let body = self.read_body(req).await?;
        serde_json::from_slice(&body).map_err(|e| ClientError::decode(e.to_string()))
    }
}

/// Body of an error response, or a placeholder when it cannot be read.
fn error_body<E: Display>(status: u16, body: Result<String, E>) -> String {
    body.unwrap_or_else(|err| {
        warn!(status, error = %err, "failed to read error response body");
        format!("<unreadable body: {err}>")
    })
}

#[async_trait]
impl BillApi for HttpBillClient {
    async fn submit_bill(&self, request: &BillRequestDto) -> Result<BillId, ClientError> {
        let req = self.http.post(self.url("/bills")).json(request);
        let resp: SubmitResponseDto = self.fetch_json(req).await?;
        debug!(bill_id = %resp.id, "bill submitted");
        Ok(resp.id)
    }

    async fn check_availability(&self, id: BillId) -> Result<bool, ClientError> {
        let req = self.http.get(self.url(&format!("/bills/{id}/available")));
        let resp: AvailabilityDto = self.fetch_json(req).await?;
        Ok(resp.available)
    }

    async fn get_bill(&self, id: BillId) -> Result<Bill, ClientError> {
        let req = self.http.get(self.url(&format!("/bills/{id}")));
        let dto: BillDto = self.fetch_json(req).await?;
        Bill::try_from(dto)
    }

    async fn list_bills(&self, user: &str) -> Result<Vec<BillDescription>, ClientError> {
        let req = self.http.get(self.url("/bills")).query(&[("user", user)]);
        let dto: BillListDto = self.fetch_json(req).await?;
        dto.bills.into_iter().map(BillDescription::try_from).collect()
    }

    async fn download_bill(&self, id: BillId) -> Result<Vec<u8>, ClientError> {
        let req = self.http.get(self.url(&format!("/bills/{id}/download")));
        self.read_body(req).await
    }
}
