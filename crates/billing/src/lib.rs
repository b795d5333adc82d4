//! Bill domain: line items, PDF formatting options, bill requests and the
//! server-side bill records the client observes.
//!
//! Pure domain logic (no IO, no HTTP). Values that exist here have passed
//! their constructor checks; drafts are validated explicitly before submission.

pub mod bill;
pub mod config;
pub mod product;
pub mod request;

pub use bill::{Bill, BillDescription, BillStatus};
pub use config::{Currency, FontStyle, Language, PaperSize, PdfConfig};
pub use product::{Product, ProductDraft};
pub use request::{BillContent, BillRequest};
