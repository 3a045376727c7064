//! Quote keeper core: quote store, selection, persistence, import/export and
//! local/remote reconciliation. Shared by the backend and tests.
pub mod app;
pub mod config;
pub mod merge;
pub mod persistence;
pub mod select;
pub mod storage;
pub mod store;
pub mod sync;
pub mod transfer;
pub mod types;
