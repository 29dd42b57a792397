pub mod config;
pub mod error;
pub mod pipeline;
pub mod routes;
pub mod state;
pub mod types;

pub use error::{ImportError, ParseError};
pub use pipeline::import::{ImportFile, Importer};
pub use types::activity::{Activity, ActivityRecord, DecodeWarning, FileFormat};
