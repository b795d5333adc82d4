use billgen_core::{ProductId, ValidationError};

use crate::config::PdfConfig;
use crate::product::Product;

/// Body of a bill: parties, title, ordered line items and tax rate.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BillContent {
    pub title: String,
    pub seller: String,
    pub purchaser: String,
    /// Insertion order is the order lines are printed in.
    pub products: Vec<Product>,
    /// Tax percentage applied to the subtotal.
    pub taxes: f64,
}

/// A client-composed bill request, possibly still a draft.
///
/// `Default` yields the empty form state: blank strings, no products and the
/// default PDF configuration. Call [`BillRequest::validate`] before submitting.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BillRequest {
    /// Owner of the generated bill; used later to list bills.
    pub user: String,
    pub bill: BillContent,
    pub config: PdfConfig,
}

impl BillRequest {
    /// Check everything a submission needs beyond per-product validity.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("user", &self.user)?;
        require_non_empty("bill.title", &self.bill.title)?;
        require_non_empty("bill.seller", &self.bill.seller)?;
        require_non_empty("bill.purchaser", &self.bill.purchaser)?;

        if !(self.bill.taxes >= 0.0) || self.bill.taxes.is_infinite() {
            return Err(ValidationError::new("bill.taxes", "must be >= 0"));
        }

        self.config.validate().map_err(|e| e.within("config"))
    }

    pub fn push_product(&mut self, product: Product) {
        self.bill.products.push(product);
    }

    /// Remove a line by id, keeping the order of the others.
    pub fn remove_product(&mut self, id: ProductId) -> Option<Product> {
        let idx = self
            .bill
            .products
            .iter()
            .position(|p| p.id_typed() == id)?;
        Some(self.bill.products.remove(idx))
    }

    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.bill.products.iter().find(|p| p.id_typed() == id)
    }

    pub fn subtotal(&self) -> f64 {
        self.bill.products.iter().map(Product::line_total).sum()
    }

    pub fn tax_amount(&self) -> f64 {
        self.subtotal() * self.bill.taxes / 100.0
    }

    pub fn total(&self) -> f64 {
        self.subtotal() + self.tax_amount()
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    Ok(())
}
