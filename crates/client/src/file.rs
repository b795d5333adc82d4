//! JSON file import/export of bill requests.
//!
//! Export writes exactly the shape import accepts, and every number reads
//! back bit for bit. Import does not require the party fields to be filled
//! in, so half-finished requests can be saved and reloaded. A value of the
//! wrong type is a validation error on that field's path.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use billgen_billing::BillRequest;
use billgen_core::ValidationError;

use crate::dto::{BillRequestDto, from_dto, shape_error, to_dto};

#[derive(Debug, Error)]
pub enum FileError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed bill file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid bill file: {0}")]
    Validation(#[from] ValidationError),
}

/// Parse the contents of a bill file.
pub fn parse_bill_request(json: &str) -> Result<BillRequest, FileError> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    let dto: BillRequestDto =
        serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
            if err.inner().is_data() {
                FileError::Validation(shape_error(err))
            } else {
                FileError::Json(err.into_inner())
            }
        })?;
    deserializer.end()?;
    Ok(from_dto(dto)?)
}

/// Serialize a request in the file format (pretty-printed).
pub fn render_bill_request(request: &BillRequest) -> Result<String, FileError> {
    Ok(serde_json::to_string_pretty(&to_dto(request))?)
}

pub fn read_bill_request(path: impl AsRef<Path>) -> Result<BillRequest, FileError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| FileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let request = parse_bill_request(&raw)?;
    debug!(path = %path.display(), products = request.bill.products.len(), "bill file imported");
    Ok(request)
}

pub fn write_bill_request(path: impl AsRef<Path>, request: &BillRequest) -> Result<(), FileError> {
    let path = path.as_ref();
    let rendered = render_bill_request(request)?;
    std::fs::write(path, rendered).map_err(|source| FileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "bill file exported");
    Ok(())
}
