//! `billgen-client` — everything at the boundary with the bill service.
//!
//! - Wire DTOs and the mapping to/from domain types (`dto`)
//! - JSON file import/export of bill requests (`file`)
//! - The `BillApi` capability and its HTTP implementation (`http`)
//! - Environment-driven connection settings (`settings`)

pub mod dto;
pub mod error;
pub mod file;
pub mod http;
pub mod settings;

pub use dto::{BillRequestDto, from_dto, to_dto, validate_bill_request, validate_product};
pub use error::ClientError;
pub use file::FileError;
pub use http::{API_PREFIX, BillApi, HttpBillClient, download_path};
pub use settings::ClientSettings;
