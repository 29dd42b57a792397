#![allow(dead_code)]

use axum::Router;
use ridesync_rs::{config::Config, routes, state::AppState};

pub const FIT_EPOCH_OFFSET: i64 = 631_065_600;

pub fn app() -> Router {
    let config = Config::from_env();
    let state = AppState::new(config);
    Router::new()
        .merge(routes::health::router())
        .merge(routes::upload::router())
        .merge(routes::activities::router())
        .with_state(state)
}

pub fn multipart_body(
    file_name: &str,
    content_type: &str,
    file_body: &str,
    boundary: &str,
) -> String {
    format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n{file_body}\r\n--{boundary}--\r\n"
    )
}

pub fn sample_gpx() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns:gpxtpx="http://www.garmin.com/xmlschemas/TrackPointExtension/v1">
  <trk><name>Test Ride</name><trkseg>
    <trkpt lat="52.5200" lon="13.4050"><ele>34.0</ele><time>2026-01-01T12:00:00Z</time><extensions><gpxtpx:TrackPointExtension><gpxtpx:hr>140</gpxtpx:hr><gpxtpx:cad>85</gpxtpx:cad></gpxtpx:TrackPointExtension><power>210</power></extensions></trkpt>
    <trkpt lat="52.5205" lon="13.4060"><ele>39.0</ele><time>2026-01-01T12:00:10Z</time><extensions><gpxtpx:TrackPointExtension><gpxtpx:hr>145</gpxtpx:hr></gpxtpx:TrackPointExtension></extensions></trkpt>
    <trkpt lat="52.5215" lon="13.4075"><ele>41.5</ele><time>2026-01-01T12:00:20Z</time></trkpt>
  </trkseg></trk>
</gpx>"#
}

pub fn sample_tcx() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<TrainingCenterDatabase xmlns="http://www.garmin.com/xmlschemas/TrainingCenterDatabase/v2" xmlns:ns3="http://www.garmin.com/xmlschemas/ActivityExtension/v2">
  <Activities><Activity Sport="Biking"><Id>2026-01-01T12:00:00Z</Id>
    <Lap StartTime="2026-01-01T12:00:00Z"><DistanceMeters>250.0</DistanceMeters><Track>
      <Trackpoint>
        <Time>2026-01-01T12:00:00Z</Time>
        <Position><LatitudeDegrees>52.5200</LatitudeDegrees><LongitudeDegrees>13.4050</LongitudeDegrees></Position>
        <AltitudeMeters>34.0</AltitudeMeters>
        <DistanceMeters>0.0</DistanceMeters>
        <HeartRateBpm><Value>120</Value></HeartRateBpm>
        <Cadence>80</Cadence>
        <Extensions><ns3:TPX><ns3:Speed>5.0</ns3:Speed><ns3:Watts>180</ns3:Watts></ns3:TPX></Extensions>
      </Trackpoint>
      <Trackpoint>
        <Time>2026-01-01T12:00:05Z</Time>
        <Position><LatitudeDegrees>52.5204</LatitudeDegrees><LongitudeDegrees>13.4052</LongitudeDegrees></Position>
        <AltitudeMeters>35.0</AltitudeMeters>
        <DistanceMeters>47.5</DistanceMeters>
        <HeartRateBpm><Value>124</Value></HeartRateBpm>
      </Trackpoint>
      <Trackpoint>
        <Time>2026-01-01T12:00:10Z</Time>
        <DistanceMeters>95.0</DistanceMeters>
      </Trackpoint>
    </Track></Lap>
  </Activity></Activities>
</TrainingCenterDatabase>"#
}

/// FIT CRC-16.
pub fn fit_crc(bytes: &[u8]) -> u16 {
    const TABLE: [u16; 16] = [
        0x0000, 0xCC01, 0xD801, 0x1400, 0xF001, 0x3C00, 0x2800, 0xE401, 0xA001, 0x6C00, 0x7800,
        0xB401, 0x5000, 0x9C01, 0x8801, 0x4400,
    ];
    bytes.iter().fold(0u16, |mut crc, &byte| {
        let tmp = TABLE[(crc & 0xF) as usize];
        crc = (crc >> 4) & 0x0FFF;
        crc = crc ^ tmp ^ TABLE[(byte & 0xF) as usize];
        let tmp = TABLE[(crc & 0xF) as usize];
        crc = (crc >> 4) & 0x0FFF;
        crc ^ tmp ^ TABLE[((byte >> 4) & 0xF) as usize]
    })
}

/// Wraps a data section in a 14-byte header and trailing CRC.
pub fn fit_file(data: &[u8]) -> Vec<u8> {
    let mut bytes = vec![14, 0x20];
    bytes.extend_from_slice(&2132u16.to_le_bytes());
    bytes.extend_from_slice(&(data.len() as u32).to_le_bytes());
    bytes.extend_from_slice(b".FIT");
    let header_crc = fit_crc(&bytes);
    bytes.extend_from_slice(&header_crc.to_le_bytes());
    bytes.extend_from_slice(data);
    let crc = fit_crc(&bytes);
    bytes.extend_from_slice(&crc.to_le_bytes());
    bytes
}

pub fn degrees_to_semicircles(degrees: f64) -> i32 {
    (degrees * (2_147_483_648.0 / 180.0)).round() as i32
}

/// Definition for local type 0 as a record message with
/// timestamp, position_lat, position_long and heart_rate.
pub fn record_definition() -> Vec<u8> {
    vec![
        0x40, 0, 0, 20, 0, 4, // header, reserved, little endian, global 20, 4 fields
        253, 4, 0x86, // timestamp
        0, 4, 0x85, // position_lat
        1, 4, 0x85, // position_long
        3, 1, 0x02, // heart_rate
    ]
}

pub fn record_message(timestamp: u32, lat: f64, lon: f64, hr: u8) -> Vec<u8> {
    let mut bytes = vec![0x00];
    bytes.extend_from_slice(&timestamp.to_le_bytes());
    bytes.extend_from_slice(&degrees_to_semicircles(lat).to_le_bytes());
    bytes.extend_from_slice(&degrees_to_semicircles(lon).to_le_bytes());
    bytes.push(hr);
    bytes
}

/// A two-record ride, preceded by a file_id message that must be skipped.
pub fn sample_fit_data() -> Vec<u8> {
    let mut data = vec![
        0x41, 0, 0, 0, 0, 2, // local type 1, global 0 (file_id), 2 fields
        0, 1, 0x00, // type
        4, 4, 0x86, // time_created
        0x01, 4, // file_id data: type = activity
    ];
    data.extend_from_slice(&1_000_000_000u32.to_le_bytes());
    data.extend(record_definition());
    data.extend(record_message(1_000_000_000, 52.52, 13.405, 140));
    data.extend(record_message(1_000_000_005, 52.5205, 13.406, 143));
    data
}

pub fn sample_fit() -> Vec<u8> {
    fit_file(&sample_fit_data())
}
