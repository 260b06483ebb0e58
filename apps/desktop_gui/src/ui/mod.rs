//! UI layer for desktop GUI: the invoice form window and its notifications.

pub mod app;

pub use app::InvoiceFormApp;
