use rayon::prelude::*;

use crate::error::ImportError;
use crate::pipeline::assemble::ActivityAssembler;
use crate::pipeline::{detect, normalize, parse};
use crate::types::activity::Activity;
use crate::types::palette::Palette;

/// An uploaded file as handed over by the UI layer.
#[derive(Debug, Clone)]
pub struct ImportFile {
    pub name: String,
    pub media_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImportFile {
    pub fn new(
        name: impl Into<String>,
        media_type: Option<&str>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.map(str::to_string),
            bytes: bytes.into(),
        }
    }
}

/// Entry point of the ingestion pipeline.
#[derive(Debug, Default)]
pub struct Importer {
    assembler: ActivityAssembler,
}

impl Importer {
    pub fn new(palette: Palette) -> Self {
        Self {
            assembler: ActivityAssembler::new(palette),
        }
    }

    pub fn assembler(&self) -> &ActivityAssembler {
        &self.assembler
    }

    pub fn import_file(&self, file: &ImportFile) -> Result<Activity, ImportError> {
        let format = detect::detect(&file.name, file.media_type.as_deref());
        let parser = parse::parser_for(format)
            .ok_or_else(|| ImportError::UnsupportedFormat(file.name.clone()))?;

        tracing::info!("Parsing {} file: {}", format.as_str(), file.name);

        let parsed = parser.parse(&file.bytes)?;
        let track = normalize::normalize(parsed)?;
        let activity = self.assembler.assemble(&file.name, format, track);

        tracing::info!(
            "Imported {} as {} ({} records, {:.0} m, {:.0} s, {} warnings)",
            file.name,
            activity.id,
            activity.records().len(),
            activity.distance(),
            activity.duration(),
            activity.warnings().len()
        );

        Ok(activity)
    }

    /// Imports independent files in parallel; results keep the input order.
    pub fn import_files(&self, files: &[ImportFile]) -> Vec<Result<Activity, ImportError>> {
        files.par_iter().map(|file| self.import_file(file)).collect()
    }
}
