//! Scripted `BillApi` fake and fixtures shared by unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use billgen_billing::{Bill, BillDescription, BillRequest, Product, ProductDraft};
use billgen_client::{BillApi, BillRequestDto, ClientError, to_dto};
use billgen_core::BillId;

/// Answers calls from queued results. An exhausted submit queue fails with a
/// network error; an exhausted bill queue reports the bill as still pending.
#[derive(Default)]
pub struct ScriptedApi {
    submits: Mutex<VecDeque<Result<BillId, ClientError>>>,
    bills: Mutex<VecDeque<Result<Bill, ClientError>>>,
    submitted: Mutex<Vec<BillRequestDto>>,
    get_calls: Mutex<Vec<BillId>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit(self, result: Result<BillId, ClientError>) -> Self {
        self.submits.lock().unwrap().push_back(result);
        self
    }

    pub fn bill(self, result: Result<Bill, ClientError>) -> Self {
        self.bills.lock().unwrap().push_back(result);
        self
    }

    pub fn submitted(&self) -> Vec<BillRequestDto> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn get_calls(&self) -> Vec<BillId> {
        self.get_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BillApi for ScriptedApi {
    async fn submit_bill(&self, request: &BillRequestDto) -> Result<BillId, ClientError> {
        self.submitted.lock().unwrap().push(request.clone());
        self.submits
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::network("no scripted submit")))
    }

    async fn check_availability(&self, id: BillId) -> Result<bool, ClientError> {
        self.get_bill(id).await.map(|bill| bill.is_available)
    }

    async fn get_bill(&self, id: BillId) -> Result<Bill, ClientError> {
        self.get_calls.lock().unwrap().push(id);
        let next = self.bills.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(pending_bill(id.get())))
    }

    async fn list_bills(&self, _user: &str) -> Result<Vec<BillDescription>, ClientError> {
        Ok(Vec::new())
    }

    async fn download_bill(&self, _id: BillId) -> Result<Vec<u8>, ClientError> {
        Ok(b"%PDF".to_vec())
    }
}

fn bill(id: u64, is_available: bool, error_message: Option<&str>) -> Bill {
    Bill {
        id: BillId::new(id),
        user: "ana".to_string(),
        title: "March".to_string(),
        created_at: Utc::now(),
        is_available,
        error: error_message.is_some(),
        error_message: error_message.map(str::to_string),
    }
}

pub fn pending_bill(id: u64) -> Bill {
    bill(id, false, None)
}

pub fn ready_bill(id: u64) -> Bill {
    bill(id, true, None)
}

pub fn failed_bill(id: u64, message: &str) -> Bill {
    bill(id, false, Some(message))
}

pub fn sample_request() -> BillRequest {
    let mut request = BillRequest::default();
    request.user = "ana".to_string();
    request.bill.title = "March".to_string();
    request.bill.seller = "Acme".to_string();
    request.bill.purchaser = "Globex".to_string();
    request.bill.taxes = 21.0;
    request.push_product(Product::new(ProductDraft::new("Desk", 120.0, 1.0)).unwrap());
    request
}

pub fn sample_dto() -> BillRequestDto {
    to_dto(&sample_request())
}
