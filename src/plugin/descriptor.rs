use std::ffi::OsString;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{InstallError, InstallResult};

const DESCRIPTOR_EXTENSION: &str = "plist";

// GNUstep bundles ship `<name>Info.plist`, Mac bundles `<name>-Info.plist`.
static INFO_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?Info$").expect("valid info suffix regex"));

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PluginName(String);

impl PluginName {
    /// Derives the plugin name from a descriptor file name such as
    /// `Widget-Info.plist`.
    pub fn from_descriptor(file_name: &str) -> InstallResult<Self> {
        let invalid = || InstallError::InvalidDescriptorName {
            file: file_name.to_string(),
        };

        let stem = Path::new(file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(invalid)?;

        let name = INFO_SUFFIX_RE.replace(stem, "");
        if name.is_empty() {
            return Err(invalid());
        }

        Ok(Self(name.into_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PluginName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Finds the single descriptor in `dir` and returns the plugin name it encodes.
pub fn discover(dir: &Path) -> InstallResult<PluginName> {
    let read_err = |source: std::io::Error| InstallError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut candidates: Vec<OsString> = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(DESCRIPTOR_EXTENSION) {
            continue;
        }
        if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            continue;
        }
        candidates.push(entry.file_name());
    }

    candidates.sort();
    tracing::debug!(?candidates, dir = %dir.display(), "descriptor scan");

    if candidates.len() > 1 {
        return Err(InstallError::AmbiguousDescriptor {
            candidates: candidates
                .iter()
                .map(|c| c.to_string_lossy().into_owned())
                .collect(),
        });
    }

    let Some(only) = candidates.pop() else {
        return Err(InstallError::NoDescriptor);
    };
    let file_name = only
        .into_string()
        .map_err(|raw| InstallError::InvalidDescriptorName {
            file: raw.to_string_lossy().into_owned(),
        })?;
    PluginName::from_descriptor(&file_name)
}
