use std::path::{Path, PathBuf};

use crate::error::{InstallError, InstallResult};
use crate::model::config::AppConfig;
use crate::plugin::builder::{BuildStatus, PluginBuilder};
use crate::plugin::descriptor::{self, PluginName};
use crate::plugin::kind::PluginType;
use crate::plugin::tree;

/// Outcome of one install run.
#[derive(Debug)]
pub struct InstallReport {
    pub name: PluginName,
    pub build: BuildStatus,
    pub replaced_previous: bool,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub files_copied: usize,
    /// Set when the local build output could not be deleted after copying.
    pub cleanup_error: Option<std::io::Error>,
}

#[derive(Debug)]
pub struct PluginInstaller {
    plugins_dir: PathBuf,
    builder: PluginBuilder,
}

impl PluginInstaller {
    pub fn new(plugins_dir: PathBuf, builder: PluginBuilder) -> Self {
        Self {
            plugins_dir,
            builder,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.plugins_dir(),
            PluginBuilder::new(&config.install.build_command),
        )
    }

    /// Directory that holds every installed plugin of `plugin_type`.
    pub fn type_dir(&self, plugin_type: PluginType) -> PathBuf {
        self.plugins_dir.join(plugin_type.dir_name())
    }

    /// Discovers, builds and installs the plugin whose sources live in `work_dir`.
    pub fn install(&self, work_dir: &Path, plugin_type: PluginType) -> InstallResult<InstallReport> {
        let name = descriptor::discover(work_dir)?;
        println!("Plugin is {name}");

        let build = self.builder.ensure_built(work_dir, &name)?;

        let type_dir = self.type_dir(plugin_type);
        if !type_dir.is_dir() {
            return Err(InstallError::MissingPluginDir { path: type_dir });
        }

        let destination = type_dir.join(name.as_str());
        let replaced_previous = tree::exists_no_follow(&destination);
        if replaced_previous {
            println!("Detected previous copy of {name} - Removing");
            tracing::info!(path = %destination.display(), "removing previous install");
            tree::remove_tree_checked(&destination)?;
        }

        println!("Installing {name} into {}", type_dir.display());
        let source = work_dir.join(name.as_str());
        let files_copied = tree::copy_tree(&source, &destination)?;
        tracing::info!(
            plugin = %name,
            %plugin_type,
            files = files_copied,
            destination = %destination.display(),
            "plugin installed"
        );

        let cleanup_error = match tree::remove_tree(&source) {
            Ok(()) => None,
            Err(err) => {
                tracing::warn!(path = %source.display(), "failed to remove build output: {err}");
                Some(err)
            }
        };

        Ok(InstallReport {
            name,
            build,
            replaced_previous,
            source,
            destination,
            files_copied,
            cleanup_error,
        })
    }
}
