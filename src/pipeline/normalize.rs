use crate::error::ParseError;
use crate::types::activity::{
    ActivityRecord, DecodeWarning, NormalizedTrack, ParseResult, RawSample,
};

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Turns raw samples into records on a relative timeline with cumulative distance.
pub fn normalize(parsed: ParseResult) -> Result<NormalizedTrack, ParseError> {
    let ParseResult {
        samples,
        start_time,
        mut warnings,
        ..
    } = parsed;

    let Some(start) = start_time.or_else(|| samples.first().map(|s| s.time)) else {
        return Err(ParseError::EmptyFile);
    };

    let mut distance = DistanceAccumulator::default();
    let mut records = Vec::with_capacity(samples.len());
    let mut last_t = 0.0_f64;

    for (idx, sample) in samples.iter().enumerate() {
        let mut t = (sample.time - start).num_milliseconds() as f64 / 1000.0;
        if t < last_t {
            tracing::warn!("Sample {} goes back in time by {:.3}s, clamping", idx, last_t - t);
            warnings.push(DecodeWarning::NonMonotonicTime { index: idx });
            t = last_t;
        }
        last_t = t;

        records.push(ActivityRecord {
            t,
            d: distance.advance(sample),
            lat: sample.lat,
            lon: sample.lon,
            hr: sample.hr,
            pwr: sample.pwr,
            alt: sample.alt,
            cad: sample.cad,
        });
    }

    if records.is_empty() {
        return Err(ParseError::EmptyFile);
    }

    Ok(NormalizedTrack {
        records,
        start_time: Some(start),
        warnings,
    })
}

/// Cumulative distance carried across samples.
///
/// A source-encoded distance is trusted relative to the first one seen (and
/// never allowed to go backwards);
/// otherwise the great-circle step from the last known position is added.
/// Samples without a position hold the current value.
#[derive(Debug, Default)]
pub struct DistanceAccumulator {
    total: f64,
    /// First source distance seen; source values are measured from here.
    baseline: Option<f64>,
    last_position: Option<(f64, f64)>,
}

impl DistanceAccumulator {
    pub fn advance(&mut self, sample: &RawSample) -> f64 {
        let position = sample.position();

        if let Some(source) = sample.distance {
            let baseline = *self.baseline.get_or_insert(source);
            self.total = self.total.max(source - baseline);
        } else if let (Some(prev), Some(curr)) = (self.last_position, position) {
            self.total += haversine_distance(prev.0, prev.1, curr.0, curr.1);
        }

        if position.is_some() {
            self.last_position = position;
        }
        self.total
    }

    pub fn total(&self) -> f64 {
        self.total
    }
}

/// Great-circle distance in meters.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}
