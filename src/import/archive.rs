//! Workbook archive reader
//!
//! Returns the text of the embedded workbook definition, whether the input is
//! a bare `.twb` file or a `.twbx` zip bundle containing one.

use super::ImportError;
use crate::events::{ConversionEvent, EventKind, EventSink, Stage};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

/// Extension of a bare workbook definition.
pub const DEFINITION_EXTENSION: &str = ".twb";

/// Extension of a packaged workbook bundle.
pub const BUNDLE_EXTENSION: &str = ".twbx";

/// How the workbook is stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkbookKind {
    Definition,
    Bundle,
}

impl WorkbookKind {
    /// Classify a path by its (case-insensitive) extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy().to_lowercase();
        if name.ends_with(BUNDLE_EXTENSION) {
            Some(WorkbookKind::Bundle)
        } else if name.ends_with(DEFINITION_EXTENSION) {
            Some(WorkbookKind::Definition)
        } else {
            None
        }
    }
}

/// Read the workbook definition text from `path`.
///
/// For bundles, each entry of `preferred_members` is tried first (exact
/// member name), then the first member whose name ends in `.twb`.
///
/// # Errors
///
/// - [`ImportError::InputNotFound`] if `path` is not a file
/// - [`ImportError::UnsupportedInput`] for other extensions
/// - [`ImportError::ArchiveMemberNotFound`] if a bundle holds no definition
/// - [`ImportError::Archive`] / [`ImportError::Decode`] for unreadable content
pub fn read_workbook(
    path: &Path,
    preferred_members: &[String],
    events: &dyn EventSink,
) -> Result<String, ImportError> {
    if !path.is_file() {
        return Err(ImportError::InputNotFound(path.to_path_buf()));
    }

    match WorkbookKind::from_path(path) {
        Some(WorkbookKind::Bundle) => read_bundle(path, preferred_members, events),
        Some(WorkbookKind::Definition) => {
            let bytes = std::fs::read(path)
                .map_err(|e| ImportError::IoError(format!("{}: {}", path.display(), e)))?;
            String::from_utf8(bytes)
                .map_err(|e| ImportError::Decode(format!("{}: {}", path.display(), e)))
        }
        None => Err(ImportError::UnsupportedInput(path.to_path_buf())),
    }
}

fn read_bundle(
    path: &Path,
    preferred_members: &[String],
    events: &dyn EventSink,
) -> Result<String, ImportError> {
    let file = File::open(path)
        .map_err(|e| ImportError::IoError(format!("{}: {}", path.display(), e)))?;
    let mut archive = ZipArchive::new(file)
        .map_err(|e| ImportError::Archive(format!("Failed to open {}: {}", path.display(), e)))?;

    for name in preferred_members {
        let Ok(entry) = archive.by_name(name) else {
            continue;
        };
        let text = read_entry(entry, name)?;
        events.record(ConversionEvent::info(
            Stage::Archive,
            EventKind::MemberSelected,
            format!("Extracted workbook from preferred path: {}", name),
        ));
        return Ok(text);
    }

    // archive order, not name order
    for idx in 0..archive.len() {
        let entry = archive
            .by_index(idx)
            .map_err(|e| ImportError::Archive(format!("Failed to read entry {}: {}", idx, e)))?;
        let member = entry.name().to_string();
        if !member.to_lowercase().ends_with(DEFINITION_EXTENSION) {
            continue;
        }

        let text = read_entry(entry, &member)?;
        events.record(ConversionEvent::info(
            Stage::Archive,
            EventKind::MemberSelected,
            format!("Extracted workbook from archive path: {}", member),
        ));
        return Ok(text);
    }

    Err(ImportError::ArchiveMemberNotFound(path.to_path_buf()))
}

fn read_entry(mut entry: impl Read, name: &str) -> Result<String, ImportError> {
    let mut bytes = Vec::new();
    entry
        .read_to_end(&mut bytes)
        .map_err(|e| ImportError::Archive(format!("Failed to read entry {}: {}", name, e)))?;

    String::from_utf8(bytes).map_err(|e| ImportError::Decode(format!("{}: {}", name, e)))
}
