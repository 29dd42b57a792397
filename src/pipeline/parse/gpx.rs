use crate::error::ParseError;
use crate::pipeline::parse::xml::{self, PendingPoint};
use crate::pipeline::parse::Parser;
use crate::types::activity::{DecodeWarning, FileFormat, ParseResult};
use quick_xml::events::Event;
use quick_xml::Reader;

pub struct GpxParser;

impl Parser for GpxParser {
    fn parse(&self, bytes: &[u8]) -> Result<ParseResult, ParseError> {
        let mut reader = Reader::from_reader(bytes);
        reader.trim_text(true);

        let mut samples = Vec::new();
        let mut warnings = Vec::new();
        let mut point_index = 0usize;
        let mut current_point: Option<PendingPoint> = None;
        let mut current_element = String::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    let name = xml::local_name(&e);
                    if name == "trkpt" {
                        let mut point = PendingPoint::default();
                        for attr in e.attributes() {
                            let attr = attr.map_err(|e| ParseError::InvalidGpx(e.to_string()))?;
                            let value = attr
                                .unescape_value()
                                .map_err(|e| ParseError::InvalidGpx(e.to_string()))?;
                            match attr.key.local_name().as_ref() {
                                b"lat" => point.lat = xml::parse_float(&value),
                                b"lon" => point.lon = xml::parse_float(&value),
                                _ => {}
                            }
                        }
                        current_point = Some(point);
                    } else if current_point.is_some() {
                        current_element = name;
                    }
                }
                Ok(Event::Empty(e)) => {
                    // A self-closing trkpt cannot carry a <time> child.
                    if xml::local_name(&e) == "trkpt" {
                        tracing::warn!("GPX point {} has no timestamp, skipping", point_index);
                        warnings.push(DecodeWarning::MissingTimestamp { index: point_index });
                        point_index += 1;
                    }
                }
                Ok(Event::Text(e)) => {
                    if let Some(point) = current_point.as_mut() {
                        let text = e
                            .unescape()
                            .map_err(|e| ParseError::InvalidGpx(e.to_string()))?;

                        match current_element.as_str() {
                            "ele" => point.alt = xml::parse_float(&text),
                            "time" => point.time = xml::parse_time(&text),
                            "hr" | "heartrate" => point.hr = xml::parse_channel(&text),
                            "cad" | "cadence" => point.cad = xml::parse_channel(&text),
                            "power" | "watts" | "PowerInW" => point.pwr = xml::parse_channel(&text),
                            _ => {}
                        }
                    }
                }
                Ok(Event::End(e)) => {
                    if e.local_name().as_ref() == b"trkpt" {
                        if let Some(point) = current_point.take() {
                            match point.finish() {
                                Some(sample) => samples.push(sample),
                                None => {
                                    tracing::warn!(
                                        "GPX point {} has no timestamp, skipping",
                                        point_index
                                    );
                                    warnings.push(DecodeWarning::MissingTimestamp {
                                        index: point_index,
                                    });
                                }
                            }
                            point_index += 1;
                        }
                    }
                    current_element.clear();
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(ParseError::InvalidGpx(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        if samples.is_empty() {
            return Err(ParseError::EmptyFile);
        }

        Ok(ParseResult::new(FileFormat::Gpx, samples, warnings))
    }
}
