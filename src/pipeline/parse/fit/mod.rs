mod crc;
mod decoder;
mod header;

pub use decoder::{FitDecoder, FIT_EPOCH_OFFSET};
pub use header::FitHeader;

use crate::error::ParseError;
use crate::pipeline::parse::Parser;
use crate::types::activity::{DecodeWarning, FileFormat, ParseResult};

pub struct FitParser;

impl Parser for FitParser {
    fn parse(&self, bytes: &[u8]) -> Result<ParseResult, ParseError> {
        let mut decoder = FitDecoder::new();
        let mut pos = 0;

        // A file may hold several FIT files back to back.
        loop {
            let header = match FitHeader::parse(&bytes[pos..]) {
                Ok(header) => header,
                Err(e) if pos == 0 => return Err(e),
                Err(e) => {
                    tracing::debug!("Ignoring trailing bytes at offset {}: {}", pos, e);
                    break;
                }
            };
            if let Some(warning) = header.verify(&bytes[pos..]) {
                decoder.warn(warning);
            }

            let data_start = pos + header.header_size;
            let data_end = data_start + header.data_size;
            decoder.reset_definitions();
            if !decoder.decode_data(&bytes[data_start..data_end.min(bytes.len())], data_start) {
                break;
            }

            let Some(trailer) = bytes.get(data_end..data_end + 2) else {
                decoder.warn(DecodeWarning::Truncated { offset: bytes.len() });
                break;
            };
            let expected = u16::from_le_bytes([trailer[0], trailer[1]]);
            let actual = crc::checksum(&bytes[pos..data_end]);
            if expected != actual {
                decoder.warn(DecodeWarning::ChecksumMismatch { expected, actual });
            }

            pos = data_end + 2;
            if bytes.len() - pos < header::MIN_HEADER_SIZE {
                break;
            }
        }

        let (samples, warnings) = decoder.finish();
        if samples.is_empty() {
            return Err(ParseError::EmptyFile);
        }

        Ok(ParseResult::new(FileFormat::Fit, samples, warnings))
    }
}
