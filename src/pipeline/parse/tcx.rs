use crate::error::ParseError;
use crate::pipeline::parse::xml::{self, PendingPoint};
use crate::pipeline::parse::Parser;
use crate::types::activity::{DecodeWarning, FileFormat, ParseResult};
use quick_xml::events::Event;
use quick_xml::Reader;

pub struct TcxParser;

impl Parser for TcxParser {
    fn parse(&self, bytes: &[u8]) -> Result<ParseResult, ParseError> {
        let mut reader = Reader::from_reader(bytes);
        reader.trim_text(true);

        let mut samples = Vec::new();
        let mut warnings = Vec::new();
        let mut point_index = 0usize;
        let mut current_point: Option<PendingPoint> = None;
        // Element names opened inside the current Trackpoint.
        let mut path: Vec<String> = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    let name = xml::local_name(&e);
                    if name == "Trackpoint" {
                        current_point = Some(PendingPoint::default());
                        path.clear();
                    } else if current_point.is_some() {
                        path.push(name);
                    }
                }
                Ok(Event::Empty(e)) => {
                    if xml::local_name(&e) == "Trackpoint" {
                        tracing::warn!("TCX trackpoint {} has no timestamp, skipping", point_index);
                        warnings.push(DecodeWarning::MissingTimestamp { index: point_index });
                        point_index += 1;
                    }
                }
                Ok(Event::Text(e)) => {
                    if let Some(point) = current_point.as_mut() {
                        let text = e
                            .unescape()
                            .map_err(|e| ParseError::InvalidTcx(e.to_string()))?;
                        let element = path.last().map(String::as_str).unwrap_or("");
                        let parent = path
                            .len()
                            .checked_sub(2)
                            .and_then(|idx| path.get(idx))
                            .map(String::as_str)
                            .unwrap_or("");

                        match (parent, element) {
                            (_, "Time") => point.time = xml::parse_time(&text),
                            ("Position", "LatitudeDegrees") => point.lat = xml::parse_float(&text),
                            ("Position", "LongitudeDegrees") => point.lon = xml::parse_float(&text),
                            (_, "AltitudeMeters") => point.alt = xml::parse_float(&text),
                            ("", "DistanceMeters") => point.distance = xml::parse_float(&text),
                            ("HeartRateBpm", "Value") => point.hr = xml::parse_channel(&text),
                            (_, "Cadence") | (_, "RunCadence") => {
                                point.cad = xml::parse_channel(&text)
                            }
                            (_, "Watts") => point.pwr = xml::parse_channel(&text),
                            _ => {}
                        }
                    }
                }
                Ok(Event::End(e)) => {
                    if e.local_name().as_ref() == b"Trackpoint" {
                        if let Some(point) = current_point.take() {
                            match point.finish() {
                                Some(sample) => samples.push(sample),
                                None => {
                                    tracing::warn!(
                                        "TCX trackpoint {} has no timestamp, skipping",
                                        point_index
                                    );
                                    warnings.push(DecodeWarning::MissingTimestamp {
                                        index: point_index,
                                    });
                                }
                            }
                            point_index += 1;
                        }
                        path.clear();
                    } else if current_point.is_some() {
                        path.pop();
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(ParseError::InvalidTcx(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        if samples.is_empty() {
            return Err(ParseError::EmptyFile);
        }

        Ok(ParseResult::new(FileFormat::Tcx, samples, warnings))
    }
}
