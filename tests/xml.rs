mod common;

use ridesync_rs::pipeline::parse::parser_for;
use ridesync_rs::{DecodeWarning, FileFormat, ImportError, ImportFile, Importer, ParseError};

fn import(name: &str, body: &str) -> Result<ridesync_rs::Activity, ImportError> {
    Importer::default().import_file(&ImportFile::new(name, None, body.as_bytes()))
}

#[test]
fn gpx_points_ten_seconds_apart() {
    let activity = import("ride.gpx", common::sample_gpx()).expect("activity");
    let records = activity.records();

    let t: Vec<f64> = records.iter().map(|r| r.t).collect();
    assert_eq!(t, vec![0.0, 10.0, 20.0]);
    assert_eq!(records[0].d, 0.0);
    assert!(records.windows(2).all(|w| w[0].d <= w[1].d));
    assert!(records[2].d > records[1].d);

    assert_eq!(records[0].alt, Some(34.0));
    assert_eq!(records[0].hr, Some(140));
    assert_eq!(records[0].cad, Some(85));
    assert_eq!(records[0].pwr, Some(210));
    assert_eq!(records[1].pwr, None);
    assert_eq!(records[2].hr, None);
}

#[test]
fn gpx_points_without_time_are_skipped() {
    let gpx = r#"<gpx><trk><trkseg>
        <trkpt lat="1.0" lon="1.0"><time>2026-01-01T00:00:00Z</time></trkpt>
        <trkpt lat="1.0" lon="1.001"><ele>5</ele></trkpt>
        <trkpt lat="1.0" lon="1.002"/>
        <trkpt lat="1.0" lon="1.003"><time>2026-01-01T00:00:30Z</time></trkpt>
    </trkseg></trk></gpx>"#;

    let activity = import("walk.gpx", gpx).expect("activity");
    assert_eq!(activity.records().len(), 2);
    assert_eq!(activity.records()[1].t, 30.0);
    assert_eq!(
        activity.warnings(),
        &[
            DecodeWarning::MissingTimestamp { index: 1 },
            DecodeWarning::MissingTimestamp { index: 2 },
        ]
    );
}

#[test]
fn gpx_without_timed_points_is_a_parse_failure() {
    let gpx = r#"<gpx><trk><trkseg><trkpt lat="1.0" lon="1.0"><ele>5</ele></trkpt></trkseg></trk></gpx>"#;
    assert!(matches!(
        import("route.gpx", gpx),
        Err(ImportError::ParseFailure(ParseError::EmptyFile))
    ));
}

#[test]
fn malformed_gpx_is_a_parse_failure() {
    assert!(matches!(
        import("bad.gpx", "<gpx><trk></trkseg></gpx>"),
        Err(ImportError::ParseFailure(ParseError::InvalidGpx(_)))
    ));
}

#[test]
fn gpx_out_of_order_time_is_clamped() {
    let gpx = r#"<gpx><trk><trkseg>
        <trkpt lat="1.0" lon="1.0"><time>2026-01-01T00:00:10Z</time></trkpt>
        <trkpt lat="1.0" lon="1.001"><time>2026-01-01T00:00:05Z</time></trkpt>
        <trkpt lat="1.0" lon="1.002"><time>2026-01-01T00:00:20Z</time></trkpt>
    </trkseg></trk></gpx>"#;

    let activity = import("odd.gpx", gpx).expect("activity");
    let t: Vec<f64> = activity.records().iter().map(|r| r.t).collect();
    assert_eq!(t, vec![0.0, 0.0, 10.0]);
    assert_eq!(activity.warnings(), &[DecodeWarning::NonMonotonicTime { index: 1 }]);
}

#[test]
fn tcx_trackpoints_use_source_distance() {
    let activity = import("ride.tcx", common::sample_tcx()).expect("activity");
    let records = activity.records();

    assert_eq!(records.len(), 3);
    let t: Vec<f64> = records.iter().map(|r| r.t).collect();
    assert_eq!(t, vec![0.0, 5.0, 10.0]);
    let d: Vec<f64> = records.iter().map(|r| r.d).collect();
    assert_eq!(d, vec![0.0, 47.5, 95.0]);

    assert_eq!(records[0].hr, Some(120));
    assert_eq!(records[0].cad, Some(80));
    assert_eq!(records[0].pwr, Some(180));
    assert_eq!(records[0].lat, Some(52.52));
    assert_eq!(records[1].alt, Some(35.0));
    assert_eq!(records[2].lat, None);
    assert_eq!(records[2].hr, None);
}

#[test]
fn tcx_source_distance_starts_from_zero() {
    let tcx = r#"<TrainingCenterDatabase><Activities><Activity><Lap><Track>
        <Trackpoint><Time>2026-01-01T00:00:00Z</Time><DistanceMeters>1500.0</DistanceMeters></Trackpoint>
        <Trackpoint><Time>2026-01-01T00:00:10Z</Time><DistanceMeters>1530.0</DistanceMeters></Trackpoint>
    </Track></Lap></Activity></Activities></TrainingCenterDatabase>"#;

    let activity = import("second-lap.tcx", tcx).expect("activity");
    let d: Vec<f64> = activity.records().iter().map(|r| r.d).collect();
    assert_eq!(d, vec![0.0, 30.0]);
}

#[test]
fn tcx_without_source_distance_falls_back_to_positions() {
    let tcx = r#"<TrainingCenterDatabase><Activities><Activity><Lap><Track>
        <Trackpoint><Time>2026-01-01T00:00:00Z</Time>
          <Position><LatitudeDegrees>0.0</LatitudeDegrees><LongitudeDegrees>0.0</LongitudeDegrees></Position></Trackpoint>
        <Trackpoint><Time>2026-01-01T00:00:01Z</Time></Trackpoint>
        <Trackpoint><Time>2026-01-01T00:00:02Z</Time>
          <Position><LatitudeDegrees>0.001</LatitudeDegrees><LongitudeDegrees>0.0</LongitudeDegrees></Position></Trackpoint>
    </Track></Lap></Activity></Activities></TrainingCenterDatabase>"#;

    let activity = import("run.tcx", tcx).expect("activity");
    let d: Vec<f64> = activity.records().iter().map(|r| r.d).collect();
    assert_eq!(d[0], 0.0);
    assert_eq!(d[1], 0.0);
    assert!((d[2] - 111.19).abs() < 0.1, "d = {}", d[2]);
}

#[test]
fn tcx_without_trackpoints_is_a_parse_failure() {
    let tcx = "<TrainingCenterDatabase><Activities/></TrainingCenterDatabase>";
    assert!(matches!(
        import("empty.tcx", tcx),
        Err(ImportError::ParseFailure(ParseError::EmptyFile))
    ));
}

#[test]
fn xml_parsing_is_deterministic() {
    for (format, body) in [
        (FileFormat::Gpx, common::sample_gpx()),
        (FileFormat::Tcx, common::sample_tcx()),
    ] {
        let parser = parser_for(format).expect("parser");
        let first = parser.parse(body.as_bytes()).expect("first");
        let second = parser.parse(body.as_bytes()).expect("second");
        assert_eq!(first.samples, second.samples);
    }
}
