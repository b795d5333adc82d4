use billgen_core::{Entity, ProductId, ValidationError};

/// Unvalidated product input, as typed in a form or read from a file.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub price: f64,
    /// Fractional amounts (hours, kilos) are allowed.
    pub quantity: f64,
    /// Percentage in `[0, 100]`.
    pub discount: Option<f64>,
}

impl ProductDraft {
    pub fn new(name: impl Into<String>, price: f64, quantity: f64) -> Self {
        Self {
            name: name.into(),
            price,
            quantity,
            discount: None,
        }
    }

    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = Some(discount);
        self
    }
}

/// A bill line item.
///
/// Immutable once built: a line is changed by removing it and adding a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    id: ProductId,
    name: String,
    price: f64,
    quantity: f64,
    discount: Option<f64>,
}

impl Product {
    /// Validate a draft and assign it a fresh id.
    pub fn new(draft: ProductDraft) -> Result<Self, ValidationError> {
        Self::with_id(ProductId::new(), draft)
    }

    /// Validate a draft keeping an existing id (e.g. re-imported lines).
    pub fn with_id(id: ProductId, draft: ProductDraft) -> Result<Self, ValidationError> {
        check_draft(&draft)?;

        Ok(Self {
            id,
            name: draft.name,
            price: draft.price,
            quantity: draft.quantity,
            discount: draft.discount,
        })
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn discount(&self) -> Option<f64> {
        self.discount
    }

    /// `price * quantity`, reduced by the discount percentage if any.
    pub fn line_total(&self) -> f64 {
        let gross = self.price * self.quantity;
        match self.discount {
            Some(discount) => gross * (1.0 - discount / 100.0),
            None => gross,
        }
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn check_draft(draft: &ProductDraft) -> Result<(), ValidationError> {
    if draft.name.trim().is_empty() {
        return Err(ValidationError::new("name", "must not be empty"));
    }

    // Written so that NaN fails too.
    if !(draft.price >= 0.0) || draft.price.is_infinite() {
        return Err(ValidationError::new("price", "must be >= 0"));
    }

    if !(draft.quantity >= 1.0) || draft.quantity.is_infinite() {
        return Err(ValidationError::new("quantity", "must be >= 1"));
    }

    if let Some(discount) = draft.discount {
        if !(0.0..=100.0).contains(&discount) {
            return Err(ValidationError::new("discount", "must be between 0 and 100"));
        }
    }

    Ok(())
}
