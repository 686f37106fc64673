//! Crop AI Common Library
//!
//! CLIと将来のフロントエンドで共有される型とパーサー（I/Oなし）

pub mod types;
pub mod error;
pub mod parser;

pub use types::{CropType, Diagnosis, HealthStatus, Season};
pub use error::{Error, Result};
pub use parser::{extract_error_message, parse_diagnosis, parse_health};
