// lib/src/history/mod.rs

pub mod attachment;
pub mod visit_history;
pub mod visit_service;

pub use attachment::{encode_data_url, mime_type_for, read_attachment};
pub use visit_history::{HistoryView, VisitHistoryRepository};
pub use visit_service::VisitService;
