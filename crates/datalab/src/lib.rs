//! `datalab` - Data-analysis coursework tasks
//!
//! Independent tasks sharing only configuration, logging and error handling:
//! seeded anomaly flagging, synthetic sales data, fake employee SQL with a
//! salary report, and fixed-width binning.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod anomaly;
pub mod binning;
pub mod chart;
pub mod cli;
pub mod config;
pub mod employees;
pub mod error;
pub mod logging;
pub mod sales;
pub mod stats;
pub mod storage;

pub use anomaly::{analyze, flag_anomalies, AnomalyReport, FlaggerParams, Reading};
pub use binning::{BinCount, Bins};
pub use config::Config;
pub use employees::{Employee, SalarySummary};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use sales::SaleRecord;
pub use storage::EmployeeStore;
