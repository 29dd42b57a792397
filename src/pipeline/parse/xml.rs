use chrono::{DateTime, NaiveDateTime, Utc};
use quick_xml::events::BytesStart;

use crate::types::activity::RawSample;

/// Track point being collected between its start and end tags.
#[derive(Debug, Default)]
pub struct PendingPoint {
    pub time: Option<DateTime<Utc>>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub alt: Option<f64>,
    pub hr: Option<u16>,
    pub cad: Option<u16>,
    pub pwr: Option<u16>,
    pub distance: Option<f64>,
}

impl PendingPoint {
    /// The finished sample, or `None` when the point never got a timestamp.
    pub fn finish(self) -> Option<RawSample> {
        let time = self.time?;
        Some(RawSample {
            time,
            lat: self.lat,
            lon: self.lon,
            alt: self.alt,
            hr: self.hr,
            cad: self.cad,
            pwr: self.pwr,
            distance: self.distance,
        })
    }
}

/// Reads an XML timestamp. Zone-less values are taken as UTC.
pub fn parse_time(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(time) = DateTime::parse_from_rfc3339(text) {
        return Some(time.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Whole-number channel values; devices sometimes write "142.0".
pub fn parse_channel(text: &str) -> Option<u16> {
    let value: f64 = text.trim().parse().ok()?;
    if value.is_finite() && value >= 0.0 && value <= u16::MAX as f64 {
        Some(value.round() as u16)
    } else {
        None
    }
}

pub fn parse_float(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}
