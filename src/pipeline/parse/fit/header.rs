use super::crc;
use crate::error::ParseError;
use crate::types::activity::DecodeWarning;

const SIGNATURE: &[u8; 4] = b".FIT";
pub const MIN_HEADER_SIZE: usize = 12;
const CRC_HEADER_SIZE: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitHeader {
    pub header_size: usize,
    pub protocol_version: u8,
    pub profile_version: u16,
    pub data_size: usize,
    pub header_crc: Option<u16>,
}

impl FitHeader {
    /// Reads the file header at the start of `bytes`.
    pub fn parse(bytes: &[u8]) -> Result<Self, ParseError> {
        let header_size = *bytes
            .first()
            .ok_or_else(|| ParseError::InvalidFit("empty input".to_string()))?
            as usize;

        if header_size < MIN_HEADER_SIZE {
            return Err(ParseError::InvalidFit(format!(
                "header size {} is smaller than {}",
                header_size, MIN_HEADER_SIZE
            )));
        }
        if bytes.len() < header_size {
            return Err(ParseError::InvalidFit(format!(
                "truncated header: need {} bytes, got {}",
                header_size,
                bytes.len()
            )));
        }
        if &bytes[8..12] != SIGNATURE {
            return Err(ParseError::InvalidFit("missing .FIT signature".to_string()));
        }

        let header_crc = if header_size >= CRC_HEADER_SIZE {
            Some(u16::from_le_bytes([bytes[12], bytes[13]]))
        } else {
            None
        };

        Ok(Self {
            header_size,
            protocol_version: bytes[1],
            profile_version: u16::from_le_bytes([bytes[2], bytes[3]]),
            data_size: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]) as usize,
            header_crc,
        })
    }

    /// Checks the optional header CRC; zero means the writer did not compute one.
    pub fn verify(&self, bytes: &[u8]) -> Option<DecodeWarning> {
        let expected = self.header_crc.filter(|&crc| crc != 0)?;
        let actual = crc::checksum(&bytes[..12]);
        (expected != actual).then_some(DecodeWarning::HeaderChecksumMismatch { expected, actual })
    }
}
