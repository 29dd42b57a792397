mod fit;
mod gpx;
mod tcx;
mod xml;

pub use fit::{FitDecoder, FitHeader, FIT_EPOCH_OFFSET};

use crate::error::ParseError;
use crate::types::activity::{FileFormat, ParseResult};

pub trait Parser: Sync {
    fn parse(&self, bytes: &[u8]) -> Result<ParseResult, ParseError>;
}

/// Parser registered for `format`, or `None` when nothing can read it.
pub fn parser_for(format: FileFormat) -> Option<&'static dyn Parser> {
    match format {
        FileFormat::Gpx => Some(&gpx::GpxParser),
        FileFormat::Fit => Some(&fit::FitParser),
        FileFormat::Tcx => Some(&tcx::TcxParser),
        FileFormat::Unknown => None,
    }
}
