//! CSV ingestion: read raw rows, clean them, load them.

pub mod cleaning;
pub mod frame;
pub mod loader;

pub use cleaning::{prepare_data_for_loading, CleanRow, CleaningReport, RowRejection};
pub use frame::RawTable;
pub use loader::{load_data, load_table, LoadSummary};
