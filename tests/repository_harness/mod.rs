//! Shared test harness for repository backend testing
//!
//! Provides entity builders and the `repository_contract_tests!` macro that
//! validates a department/seller repository pair against the full contract.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod repository_harness;
//! use repository_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod contract_tests;

use chrono::NaiveDate;
use registry::core::entity::{Department, Seller};
use std::sync::Arc;

/// Route `tracing` output through the test writer (RUST_LOG to enable)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// A seller of `department` with predictable fields derived from `name`
pub fn seller_in(name: &str, department: &Department) -> Seller {
    Seller::new(
        name,
        format!("{}@example.com", name.to_lowercase()),
        date(1990, 1, 1),
        2000.0,
        Some(Arc::new(department.clone())),
    )
}
