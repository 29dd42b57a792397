use std::path::Path;

use uuid::Uuid;

use crate::types::activity::{Activity, FileFormat, NormalizedTrack};
use crate::types::palette::Palette;

/// Wraps normalized tracks into activities, handing out ids and colors.
#[derive(Debug, Default)]
pub struct ActivityAssembler {
    palette: Palette,
}

impl ActivityAssembler {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn assemble(
        &self,
        file_name: &str,
        format: FileFormat,
        track: NormalizedTrack,
    ) -> Activity {
        Activity::new(
            Uuid::new_v4().to_string(),
            display_name(file_name),
            format,
            self.palette.next_color(),
            track,
        )
    }
}

/// File name without its directory and extension.
pub fn display_name(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .unwrap_or(file_name)
        .to_string()
}
