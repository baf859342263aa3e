//! Integration test suite modules

mod persistence;
mod receipts_api;
mod stores_api;
