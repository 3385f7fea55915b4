//! Invoicing domain module.
//!
//! Business rules for customer invoices (totals, tax, status lifecycle),
//! implemented purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod invoice;

pub use invoice::{
    compute_totals, Invoice, InvoiceId, InvoiceItem, InvoicePatch, InvoiceStatus, InvoiceTotals,
    NewInvoice,
};
