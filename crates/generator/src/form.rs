//! Editable bill request plus its generation session.
//!
//! Every edit invalidates a pending or finished generation, since the
//! displayed download would no longer match the form content.

use std::path::Path;

use tracing::{debug, warn};

use billgen_billing::{
    BillRequest, Currency, FontStyle, Language, PaperSize, PdfConfig, Product, ProductDraft,
};
use billgen_client::file::{self, FileError};
use billgen_client::{BillApi, BillRequestDto, to_dto};
use billgen_core::{ProductId, ValidationError};

use crate::notify::{Notification, Notifier};
use crate::poller::{GenerationOutcome, GenerationPoller};
use crate::session::{AttemptToken, PollState};

pub struct BillForm<A: ?Sized, N: ?Sized> {
    request: BillRequest,
    poller: GenerationPoller<A, N>,
}

impl<A, N> BillForm<A, N>
where
    A: BillApi + ?Sized,
    N: Notifier + ?Sized,
{
    /// An empty form with the default PDF configuration.
    pub fn new(poller: GenerationPoller<A, N>) -> Self {
        Self::with_request(poller, BillRequest::default())
    }

    pub fn with_request(poller: GenerationPoller<A, N>, request: BillRequest) -> Self {
        Self { request, poller }
    }

    pub fn request(&self) -> &BillRequest {
        &self.request
    }

    pub fn poller(&self) -> &GenerationPoller<A, N> {
        &self.poller
    }

    pub fn state(&self) -> PollState {
        self.poller.session().state()
    }

    /// Download reference of the last successful generation, if still valid.
    pub fn download(&self) -> Option<String> {
        self.poller.session().download()
    }

    pub fn set_user(&mut self, user: impl Into<String>) {
        self.edit(|r| r.user = user.into());
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.edit(|r| r.bill.title = title.into());
    }

    pub fn set_seller(&mut self, seller: impl Into<String>) {
        self.edit(|r| r.bill.seller = seller.into());
    }

    pub fn set_purchaser(&mut self, purchaser: impl Into<String>) {
        self.edit(|r| r.bill.purchaser = purchaser.into());
    }

    pub fn set_taxes(&mut self, taxes: f64) {
        self.edit(|r| r.bill.taxes = taxes);
    }

    /// Validate and append a line item; returns its id.
    pub fn add_product(&mut self, draft: ProductDraft) -> Result<ProductId, ValidationError> {
        let product = Product::new(draft).inspect_err(|err| self.report(err))?;
        let id = product.id_typed();
        self.edit(|r| r.push_product(product));
        Ok(id)
    }

    pub fn remove_product(&mut self, id: ProductId) -> Option<Product> {
        let removed = self.request.remove_product(id)?;
        self.invalidate();
        Some(removed)
    }

    pub fn set_config(&mut self, config: PdfConfig) -> Result<(), ValidationError> {
        config
            .validate()
            .map_err(|e| e.within("config"))
            .inspect_err(|err| self.report(err))?;
        self.edit(|r| r.config = config);
        Ok(())
    }

    pub fn set_currency(&mut self, currency: Currency) {
        self.edit(|r| r.config.currency = currency);
    }

    pub fn set_language(&mut self, language: Language) {
        self.edit(|r| r.config.language = language);
    }

    pub fn set_font_style(&mut self, font_style: FontStyle) {
        self.edit(|r| r.config.font_style = font_style);
    }

    pub fn set_font_size(&mut self, font_size: f64) -> Result<(), ValidationError> {
        let config = PdfConfig {
            font_size,
            ..self.request.config.clone()
        };
        self.set_config(config)
    }

    pub fn set_paper_size(&mut self, paper_size: PaperSize) {
        self.edit(|r| r.config.paper_size = paper_size);
    }

    pub fn set_landscape(&mut self, landscape: bool) {
        self.edit(|r| r.config.landscape = landscape);
    }

    /// Replace the whole request (e.g. after an import).
    pub fn replace(&mut self, request: BillRequest) {
        self.edit(|r| *r = request);
    }

    /// Back to an empty request.
    pub fn reset(&mut self) {
        self.replace(BillRequest::default());
    }

    /// Load a request from bill-file JSON. On failure the form is untouched.
    pub fn import_json(&mut self, json: &str) -> Result<(), FileError> {
        let request = file::parse_bill_request(json).inspect_err(|err| self.report(err))?;
        self.replace(request);
        Ok(())
    }

    pub fn import_file(&mut self, path: impl AsRef<Path>) -> Result<(), FileError> {
        let request = file::read_bill_request(path).inspect_err(|err| self.report(err))?;
        self.replace(request);
        Ok(())
    }

    pub fn export_json(&self) -> Result<String, FileError> {
        file::render_bill_request(&self.request)
    }

    pub fn export_file(&self, path: impl AsRef<Path>) -> Result<(), FileError> {
        file::write_bill_request(path, &self.request).inspect_err(|err| self.report(err))
    }

    /// Validate the request and start a generation attempt.
    ///
    /// The attempt is registered immediately (state `Submitting`); the
    /// returned task performs the network work when run.
    pub fn start_generation(&self) -> Result<GenerationTask<A, N>, ValidationError> {
        self.request.validate().inspect_err(|err| self.report(err))?;

        let token = self.poller.session().begin();
        debug!(attempt = %token, "generation attempt started");

        Ok(GenerationTask {
            poller: self.poller.clone(),
            token,
            request: to_dto(&self.request),
        })
    }

    fn edit(&mut self, apply: impl FnOnce(&mut BillRequest)) {
        apply(&mut self.request);
        self.invalidate();
    }

    fn invalidate(&self) {
        if self.poller.session().invalidate() {
            debug!("bill request changed; generation result discarded");
        }
    }

    fn report(&self, err: &dyn std::fmt::Display) {
        warn!(error = %err, "bill form rejected input");
        self.poller.notifier().notify(Notification::error(err.to_string()));
    }
}

/// One generation attempt, detached from the form so edits can happen while
/// it runs.
pub struct GenerationTask<A: ?Sized, N: ?Sized> {
    poller: GenerationPoller<A, N>,
    token: AttemptToken,
    request: BillRequestDto,
}

impl<A, N> GenerationTask<A, N>
where
    A: BillApi + ?Sized,
    N: Notifier + ?Sized,
{
    pub fn token(&self) -> AttemptToken {
        self.token
    }

    pub fn request(&self) -> &BillRequestDto {
        &self.request
    }

    pub async fn run(self) -> GenerationOutcome {
        self.poller.run(self.token, self.request).await
    }
}
