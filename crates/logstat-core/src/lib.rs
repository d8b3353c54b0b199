pub mod access_log;
pub mod analysis;
pub mod error;
pub mod report;

pub use error::{Error, Result};
