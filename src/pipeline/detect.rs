use std::path::Path;

use crate::types::activity::FileFormat;

/// Classifies an upload from its file name, falling back to the declared media type.
///
/// The extension wins when it names a supported format. A media type that only
/// says "xml" is not enough to pick between GPX and TCX, so it stays unknown.
pub fn detect(file_name: &str, media_type: Option<&str>) -> FileFormat {
    if let Some(format) = extension(file_name).and_then(FileFormat::from_extension) {
        return format;
    }

    let Some(media_type) = media_type else {
        return FileFormat::Unknown;
    };
    let media_type = media_type.to_lowercase();

    if media_type.contains("gpx") {
        FileFormat::Gpx
    } else if media_type.contains("fit") || media_type.contains("octet-stream") {
        FileFormat::Fit
    } else if media_type.contains("tcx") {
        FileFormat::Tcx
    } else {
        FileFormat::Unknown
    }
}

fn extension(file_name: &str) -> Option<&str> {
    Path::new(file_name).extension().and_then(|ext| ext.to_str())
}
