use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// One normalized sample on an activity's timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Elapsed seconds since the first sample.
    pub t: f64,
    /// Cumulative distance in meters.
    pub d: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hr: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pwr: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cad: Option<u16>,
}

/// A decoded point as it appears in the source file, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSample {
    pub time: DateTime<Utc>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub alt: Option<f64>,
    pub hr: Option<u16>,
    pub cad: Option<u16>,
    pub pwr: Option<u16>,
    /// Cumulative distance when the source encodes it directly.
    pub distance: Option<f64>,
}

impl RawSample {
    pub fn at(time: DateTime<Utc>) -> Self {
        Self {
            time,
            lat: None,
            lon: None,
            alt: None,
            hr: None,
            cad: None,
            pwr: None,
            distance: None,
        }
    }

    pub fn position(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Gpx,
    Fit,
    Tcx,
    Unknown,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "gpx" => Some(FileFormat::Gpx),
            "fit" => Some(FileFormat::Fit),
            "tcx" => Some(FileFormat::Tcx),
            _ => None,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, FileFormat::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileFormat::Gpx => "gpx",
            FileFormat::Fit => "fit",
            FileFormat::Tcx => "tcx",
            FileFormat::Unknown => "unknown",
        }
    }
}

/// Non-fatal anomaly met while decoding or normalizing a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecodeWarning {
    /// Point number `index` (in document order) had no usable timestamp.
    MissingTimestamp { index: usize },
    /// Trailing FIT checksum did not match the bytes read.
    ChecksumMismatch { expected: u16, actual: u16 },
    HeaderChecksumMismatch { expected: u16, actual: u16 },
    /// The byte stream ended before `offset` could be decoded completely.
    Truncated { offset: usize },
    /// A data message referenced a local type with no prior definition.
    UndefinedLocalType { local_type: u8, offset: usize },
    /// Sample `index` went back in time and was clamped to its predecessor.
    NonMonotonicTime { index: usize },
}

/// Output of a format parser. Consumed once by the normalizer.
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub format: FileFormat,
    pub samples: Vec<RawSample>,
    pub start_time: Option<DateTime<Utc>>,
    pub warnings: Vec<DecodeWarning>,
}

impl ParseResult {
    pub fn new(format: FileFormat, samples: Vec<RawSample>, warnings: Vec<DecodeWarning>) -> Self {
        let start_time = samples.first().map(|s| s.time);
        Self {
            format,
            samples,
            start_time,
            warnings,
        }
    }
}

/// Records ready to be wrapped into an [`Activity`].
#[derive(Debug, Clone)]
pub struct NormalizedTrack {
    pub records: Vec<ActivityRecord>,
    pub start_time: Option<DateTime<Utc>>,
    pub warnings: Vec<DecodeWarning>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub name: String,
    pub format: FileFormat,
    pub color: String,
    pub start_time: Option<DateTime<Utc>>,
    offset: f64,
    records: Vec<ActivityRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<DecodeWarning>,
}

impl Activity {
    pub(crate) fn new(
        id: String,
        name: String,
        format: FileFormat,
        color: String,
        track: NormalizedTrack,
    ) -> Self {
        Self {
            id,
            name,
            format,
            color,
            start_time: track.start_time,
            offset: 0.0,
            records: track.records,
            warnings: track.warnings,
        }
    }

    pub fn records(&self) -> &[ActivityRecord] {
        &self.records
    }

    pub fn warnings(&self) -> &[DecodeWarning] {
        &self.warnings
    }

    pub fn is_degraded(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Signed shift, in seconds, of this activity's timeline against the others.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn set_offset(&mut self, offset: f64) {
        self.offset = offset;
    }

    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// Position of elapsed time `t` on the shared comparison timeline.
    pub fn aligned_time(&self, t: f64) -> f64 {
        t + self.offset
    }

    /// Wall-clock time of elapsed time `t`, when the source carried one.
    /// `None` when there is no start time or the result is out of range.
    pub fn wall_clock(&self, t: f64) -> Option<DateTime<Utc>> {
        let start = self.start_time?;
        let millis = (t * 1000.0).round();
        if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
            return None;
        }
        let delta = Duration::try_milliseconds(millis as i64)?;
        start.checked_add_signed(delta)
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn duration(&self) -> f64 {
        self.records.last().map(|r| r.t).unwrap_or(0.0)
    }

    pub fn distance(&self) -> f64 {
        self.records.last().map(|r| r.d).unwrap_or(0.0)
    }
}
