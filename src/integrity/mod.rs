//! Referential integrity between the file, problem and progress stores.
//!
//! The stores are plain key-value collections with no foreign keys. Every
//! mutation that could orphan a problem or a progress record goes through
//! [`FileCatalog`].

mod cascade;
pub mod catalog;
pub mod sync;

pub use catalog::{CascadeReport, FileCatalog};
pub use sync::SyncReport;
