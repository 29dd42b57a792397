use chrono::{DateTime, TimeZone, Utc};

use crate::types::activity::{DecodeWarning, RawSample};

/// Seconds between the Unix epoch and the FIT epoch (1989-12-31T00:00:00Z).
pub const FIT_EPOCH_OFFSET: i64 = 631_065_600;

const LOCAL_TYPES: usize = 16;
const RECORD_MESG: u16 = 20;

const NORMAL_DEFINITION: u8 = 0x40;
const DEVELOPER_DATA: u8 = 0x20;
const COMPRESSED_TIMESTAMP: u8 = 0x80;

mod field_num {
    pub const POSITION_LAT: u8 = 0;
    pub const POSITION_LONG: u8 = 1;
    pub const ALTITUDE: u8 = 2;
    pub const HEART_RATE: u8 = 3;
    pub const CADENCE: u8 = 4;
    pub const DISTANCE: u8 = 5;
    pub const POWER: u8 = 7;
    pub const ENHANCED_ALTITUDE: u8 = 78;
    pub const TIMESTAMP: u8 = 253;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FieldDef {
    number: u8,
    size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Definition {
    big_endian: bool,
    global: u16,
    fields: Vec<FieldDef>,
    developer_size: usize,
}

impl Definition {
    fn data_size(&self) -> usize {
        self.fields.iter().map(|f| f.size).sum::<usize>() + self.developer_size
    }
}

/// Running state of a FIT message stream.
///
/// Each definition message replaces the layout registered for its local type;
/// data messages are read against whatever layout is current. Record messages
/// become [`RawSample`]s, everything else only feeds the running timestamp.
#[derive(Debug, Default)]
pub struct FitDecoder {
    definitions: [Option<Definition>; LOCAL_TYPES],
    last_timestamp: Option<u32>,
    record_count: usize,
    samples: Vec<RawSample>,
    warnings: Vec<DecodeWarning>,
}

impl FitDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn samples(&self) -> &[RawSample] {
        &self.samples
    }

    pub fn warnings(&self) -> &[DecodeWarning] {
        &self.warnings
    }

    pub fn finish(self) -> (Vec<RawSample>, Vec<DecodeWarning>) {
        (self.samples, self.warnings)
    }

    /// Forgets all local message layouts, as required at the start of a chained file.
    pub fn reset_definitions(&mut self) {
        self.definitions = Default::default();
    }

    pub fn warn(&mut self, warning: DecodeWarning) {
        tracing::warn!("FIT decode: {:?}", warning);
        self.warnings.push(warning);
    }

    /// Decodes every message in a data section. `base_offset` is the position of
    /// `data` within the file and only feeds diagnostics.
    ///
    /// Returns `false` if decoding stopped before the end of `data`.
    pub fn decode_data(&mut self, data: &[u8], base_offset: usize) -> bool {
        let mut pos = 0;
        while pos < data.len() {
            match self.decode_message(&data[pos..], base_offset + pos) {
                Some(consumed) => pos += consumed,
                None => return false,
            }
        }
        true
    }

    /// Decodes the single message at the start of `bytes` and returns how many
    /// bytes it occupied, or `None` when the stream cannot be followed any further.
    pub fn decode_message(&mut self, bytes: &[u8], offset: usize) -> Option<usize> {
        let &header = bytes.first()?;

        if header & COMPRESSED_TIMESTAMP != 0 {
            let local_type = (header >> 5) & 0x03;
            let time_offset = (header & 0x1F) as u32;
            let timestamp = self.last_timestamp.map(|last| {
                let base = last & !0x1F;
                if time_offset >= last & 0x1F {
                    base.wrapping_add(time_offset)
                } else {
                    base.wrapping_add(time_offset + 0x20)
                }
            });
            if timestamp.is_some() {
                self.last_timestamp = timestamp;
            }
            return self.decode_data_message(local_type, &bytes[1..], offset, timestamp);
        }

        let local_type = header & 0x0F;
        if header & NORMAL_DEFINITION != 0 {
            let developer = header & DEVELOPER_DATA != 0;
            self.decode_definition(local_type, developer, &bytes[1..], offset)
        } else {
            self.decode_data_message(local_type, &bytes[1..], offset, None)
        }
    }

    fn decode_definition(
        &mut self,
        local_type: u8,
        developer: bool,
        body: &[u8],
        offset: usize,
    ) -> Option<usize> {
        let Some(fixed) = body.get(..5) else {
            self.warn(DecodeWarning::Truncated { offset });
            return None;
        };
        let big_endian = fixed[1] == 1;
        let global = if big_endian {
            u16::from_be_bytes([fixed[2], fixed[3]])
        } else {
            u16::from_le_bytes([fixed[2], fixed[3]])
        };
        let field_count = fixed[4] as usize;

        let mut cursor = 5;
        let Some(raw_fields) = body.get(cursor..cursor + field_count * 3) else {
            self.warn(DecodeWarning::Truncated { offset });
            return None;
        };
        let fields = raw_fields
            .chunks_exact(3)
            .map(|f| FieldDef {
                number: f[0],
                size: f[1] as usize,
            })
            .collect();
        cursor += field_count * 3;

        let mut developer_size = 0;
        if developer {
            let Some(&dev_count) = body.get(cursor) else {
                self.warn(DecodeWarning::Truncated { offset });
                return None;
            };
            cursor += 1;
            let dev_count = dev_count as usize;
            let Some(raw_dev) = body.get(cursor..cursor + dev_count * 3) else {
                self.warn(DecodeWarning::Truncated { offset });
                return None;
            };
            developer_size = raw_dev.chunks_exact(3).map(|f| f[1] as usize).sum();
            cursor += dev_count * 3;
        }

        self.definitions[local_type as usize] = Some(Definition {
            big_endian,
            global,
            fields,
            developer_size,
        });
        Some(1 + cursor)
    }

    fn decode_data_message(
        &mut self,
        local_type: u8,
        body: &[u8],
        offset: usize,
        compressed_timestamp: Option<u32>,
    ) -> Option<usize> {
        let Some(definition) = self.definitions[local_type as usize].clone() else {
            self.warn(DecodeWarning::UndefinedLocalType { local_type, offset });
            return None;
        };
        let size = definition.data_size();
        let Some(payload) = body.get(..size) else {
            self.warn(DecodeWarning::Truncated { offset });
            return None;
        };

        if definition.global == RECORD_MESG {
            self.read_record(&definition, payload, compressed_timestamp);
        } else {
            tracing::debug!(
                "Skipping FIT message {} ({} bytes) at offset {}",
                definition.global,
                size,
                offset
            );
            if let Some(timestamp) = find_timestamp(&definition, payload) {
                self.last_timestamp = Some(timestamp);
            }
        }

        Some(1 + size)
    }

    fn read_record(
        &mut self,
        definition: &Definition,
        payload: &[u8],
        compressed_timestamp: Option<u32>,
    ) {
        let index = self.record_count;
        self.record_count += 1;

        let mut timestamp = compressed_timestamp;
        let mut fields = RecordFields::default();

        let mut pos = 0;
        for field in &definition.fields {
            let raw = &payload[pos..pos + field.size];
            pos += field.size;
            let be = definition.big_endian;

            match field.number {
                field_num::TIMESTAMP => {
                    if let Some(value) = read_uint(raw, be) {
                        timestamp = Some(value as u32);
                        self.last_timestamp = timestamp;
                    }
                }
                field_num::POSITION_LAT => {
                    fields.lat = read_sint32(raw, be).map(semicircles_to_degrees)
                }
                field_num::POSITION_LONG => {
                    fields.lon = read_sint32(raw, be).map(semicircles_to_degrees)
                }
                field_num::ALTITUDE => fields.altitude = read_uint(raw, be).map(scaled_altitude),
                field_num::ENHANCED_ALTITUDE => {
                    fields.enhanced_altitude = read_uint(raw, be).map(scaled_altitude)
                }
                field_num::HEART_RATE => fields.hr = read_uint(raw, be).map(|v| v as u16),
                field_num::CADENCE => fields.cad = read_uint(raw, be).map(|v| v as u16),
                field_num::POWER => fields.pwr = read_uint(raw, be).map(|v| v as u16),
                field_num::DISTANCE => {
                    fields.distance = read_uint(raw, be).map(|v| v as f64 / 100.0)
                }
                _ => {}
            }
        }

        match timestamp.and_then(fit_time) {
            Some(time) => self.samples.push(RawSample {
                time,
                lat: fields.lat,
                lon: fields.lon,
                alt: fields.enhanced_altitude.or(fields.altitude),
                hr: fields.hr,
                cad: fields.cad,
                pwr: fields.pwr,
                distance: fields.distance,
            }),
            None => self.warn(DecodeWarning::MissingTimestamp { index }),
        }
    }
}

#[derive(Debug, Default)]
struct RecordFields {
    lat: Option<f64>,
    lon: Option<f64>,
    altitude: Option<f64>,
    enhanced_altitude: Option<f64>,
    hr: Option<u16>,
    cad: Option<u16>,
    pwr: Option<u16>,
    distance: Option<f64>,
}

fn find_timestamp(definition: &Definition, payload: &[u8]) -> Option<u32> {
    let mut pos = 0;
    for field in &definition.fields {
        let raw = &payload[pos..pos + field.size];
        pos += field.size;
        if field.number == field_num::TIMESTAMP {
            return read_uint(raw, definition.big_endian).map(|v| v as u32);
        }
    }
    None
}

/// Unsigned field value; an all-ones value is FIT's "invalid" marker.
fn read_uint(raw: &[u8], big_endian: bool) -> Option<u64> {
    if raw.is_empty() || raw.len() > 8 || raw.iter().all(|&b| b == 0xFF) {
        return None;
    }
    let fold = |acc: u64, &b: &u8| (acc << 8) | b as u64;
    let value = if big_endian {
        raw.iter().fold(0, fold)
    } else {
        raw.iter().rev().fold(0, fold)
    };
    Some(value)
}

fn read_sint32(raw: &[u8], big_endian: bool) -> Option<i32> {
    let bytes: [u8; 4] = raw.try_into().ok()?;
    let value = if big_endian {
        i32::from_be_bytes(bytes)
    } else {
        i32::from_le_bytes(bytes)
    };
    (value != i32::MAX).then_some(value)
}

fn semicircles_to_degrees(semicircles: i32) -> f64 {
    (semicircles as f64) * (180.0 / 2_147_483_648.0)
}

fn scaled_altitude(raw: u64) -> f64 {
    raw as f64 / 5.0 - 500.0
}

fn fit_time(timestamp: u32) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(FIT_EPOCH_OFFSET + timestamp as i64, 0).single()
}
