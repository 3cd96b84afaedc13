use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Failures that abort an install run. Every variant maps to exit status 1.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("Unable to read Info.plist for this plugin\nCannot determine plugin name")]
    NoDescriptor,

    #[error("Found more than one plugin descriptor: {}", .candidates.join(", "))]
    AmbiguousDescriptor { candidates: Vec<String> },

    #[error("Cannot derive a plugin name from descriptor {file}")]
    InvalidDescriptorName { file: String },

    #[error("Unable to list {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unable to run build command `{command}`: {source}")]
    BuildSpawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("Build command `{command}` failed ({status})")]
    BuildFailed { command: String, status: ExitStatus },

    #[error("Build finished but produced no {}", .path.display())]
    MissingBuildOutput { path: PathBuf },

    #[error("Required plugin directory {} does not exist", .path.display())]
    MissingPluginDir { path: PathBuf },

    #[error("Remove failed\n{source} - {}", .path.display())]
    RemoveFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Copy failed\n{source} - {}", .path.display())]
    CopyFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type InstallResult<T> = Result<T, InstallError>;
