//! Wire shapes exchanged with the bill service and stored in bill files.
//!
//! Config keys are snake_case on the wire. Optional config fields are merged
//! over `PdfConfig::default()` when decoding, and products without an id get
//! a fresh one.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use billgen_billing::{
    Bill, BillContent, BillDescription, BillRequest, Currency, FontStyle, Language, PaperSize,
    PdfConfig, Product, ProductDraft,
};
use billgen_core::{BillId, ProductId, ValidationError};

use crate::error::ClientError;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    pub name: String,
    pub price: f64,
    pub quantity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PdfConfigDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paper_size: Option<PaperSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landscape: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BillContentDto {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub seller: String,
    #[serde(default)]
    pub purchaser: String,
    #[serde(default)]
    pub products: Vec<ProductDto>,
    #[serde(default)]
    pub taxes: f64,
}

/// Body of `POST /bills` and content of an exported bill file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BillRequestDto {
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub bill: BillContentDto,
    #[serde(default)]
    pub config: PdfConfigDto,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitResponseDto {
    pub id: BillId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityDto {
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillDto {
    pub id: BillId,
    pub user: String,
    pub title: String,
    pub created_at: String,
    pub is_available: bool,
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub error_msg: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillDescriptionDto {
    pub id: BillId,
    pub title: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillListDto {
    pub bills: Vec<BillDescriptionDto>,
}

// -------------------------
// Domain -> wire
// -------------------------

pub fn to_dto(request: &BillRequest) -> BillRequestDto {
    BillRequestDto {
        user: request.user.clone(),
        bill: BillContentDto {
            title: request.bill.title.clone(),
            seller: request.bill.seller.clone(),
            purchaser: request.bill.purchaser.clone(),
            products: request.bill.products.iter().map(ProductDto::from).collect(),
            taxes: request.bill.taxes,
        },
        config: PdfConfigDto::from(&request.config),
    }
}

impl From<&Product> for ProductDto {
    fn from(product: &Product) -> Self {
        Self {
            id: Some(product.id_typed()),
            name: product.name().to_string(),
            price: product.price(),
            quantity: product.quantity(),
            discount: product.discount(),
        }
    }
}

impl From<&PdfConfig> for PdfConfigDto {
    fn from(config: &PdfConfig) -> Self {
        Self {
            currency: Some(config.currency),
            language: Some(config.language),
            font_size: Some(config.font_size),
            font_style: Some(config.font_style),
            paper_size: Some(config.paper_size),
            landscape: Some(config.landscape),
        }
    }
}

impl From<&BillRequest> for BillRequestDto {
    fn from(request: &BillRequest) -> Self {
        to_dto(request)
    }
}

// -------------------------
// Wire -> domain
// -------------------------

/// Map a wire request back to the domain.
///
/// Validates products and config but not the required strings, so drafts
/// survive a round trip. Use [`validate_bill_request`] for submission checks.
pub fn from_dto(dto: BillRequestDto) -> Result<BillRequest, ValidationError> {
    let config = dto.config.into_config().map_err(|e| e.within("config"))?;

    let products = dto
        .bill
        .products
        .into_iter()
        .enumerate()
        .map(|(idx, p)| p.into_product().map_err(|e| e.within(format!("bill.products[{idx}]"))))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(BillRequest {
        user: dto.user,
        bill: BillContent {
            title: dto.bill.title,
            seller: dto.bill.seller,
            purchaser: dto.bill.purchaser,
            products,
            taxes: dto.bill.taxes,
        },
        config,
    })
}

impl ProductDto {
    pub fn into_product(self) -> Result<Product, ValidationError> {
        let draft = ProductDraft {
            name: self.name,
            price: self.price,
            quantity: self.quantity,
            discount: self.discount,
        };
        match self.id {
            Some(id) => Product::with_id(id, draft),
            None => Product::new(draft),
        }
    }
}

impl PdfConfigDto {
    pub fn into_config(self) -> Result<PdfConfig, ValidationError> {
        let defaults = PdfConfig::default();
        let config = PdfConfig {
            currency: self.currency.unwrap_or(defaults.currency),
            language: self.language.unwrap_or(defaults.language),
            font_style: self.font_style.unwrap_or(defaults.font_style),
            font_size: self.font_size.unwrap_or(defaults.font_size),
            paper_size: self.paper_size.unwrap_or(defaults.paper_size),
            landscape: self.landscape.unwrap_or(defaults.landscape),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Decode and validate a single product from arbitrary JSON.
pub fn validate_product(data: Value) -> Result<Product, ValidationError> {
    let dto: ProductDto = serde_path_to_error::deserialize(data).map_err(shape_error)?;
    dto.into_product()
}

/// Decode arbitrary JSON into a bill request ready for submission.
pub fn validate_bill_request(data: Value) -> Result<BillRequest, ValidationError> {
    let dto: BillRequestDto = serde_path_to_error::deserialize(data).map_err(shape_error)?;
    let request = from_dto(dto)?;
    request.validate()?;
    Ok(request)
}

/// Report a JSON type mismatch on the field that caused it (`$` for the
/// document itself).
pub(crate) fn shape_error(err: serde_path_to_error::Error<serde_json::Error>) -> ValidationError {
    let path = err.path().to_string();
    let field = if path == "." { "$".to_string() } else { path };
    ValidationError::new(field, err.into_inner().to_string())
}

impl TryFrom<BillDto> for Bill {
    type Error = ClientError;

    fn try_from(dto: BillDto) -> Result<Self, Self::Error> {
        Ok(Self {
            id: dto.id,
            user: dto.user,
            title: dto.title,
            created_at: parse_timestamp(&dto.created_at)?,
            is_available: dto.is_available,
            error: dto.error,
            error_message: dto.error_msg,
        })
    }
}

impl TryFrom<BillDescriptionDto> for BillDescription {
    type Error = ClientError;

    fn try_from(dto: BillDescriptionDto) -> Result<Self, Self::Error> {
        if dto.title.is_empty() {
            return Err(ClientError::decode(format!("bill {} has an empty title", dto.id)));
        }
        Ok(Self {
            id: dto.id,
            title: dto.title,
            created_at: parse_timestamp(&dto.created_at)?,
        })
    }
}

/// RFC 3339, or a naive ISO-8601 timestamp taken as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ClientError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ClientError::decode(format!("invalid created_at timestamp: {raw:?}")))
}
