use chrono::{DateTime, Utc};

use billgen_core::BillId;

/// Server-side generation record, as observed by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bill {
    pub id: BillId,
    pub user: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    /// Generation finished and the PDF can be downloaded.
    pub is_available: bool,
    /// Generation failed; `error_message` carries the server's explanation.
    pub error: bool,
    pub error_message: Option<String>,
}

/// Where a bill stands in its generation lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillStatus {
    Pending,
    Available,
    Failed(String),
}

impl Bill {
    /// Classify the record. An error flag wins over availability.
    pub fn status(&self) -> BillStatus {
        if self.error {
            return BillStatus::Failed(self.error_message.clone().unwrap_or_default());
        }
        if self.is_available {
            BillStatus::Available
        } else {
            BillStatus::Pending
        }
    }
}

/// Summary row returned when listing the bills of a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillDescription {
    pub id: BillId,
    pub title: String,
    pub created_at: DateTime<Utc>,
}
