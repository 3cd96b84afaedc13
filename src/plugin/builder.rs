use std::path::Path;
use std::process::Command;

use crate::error::{InstallError, InstallResult};
use crate::plugin::descriptor::PluginName;
use crate::plugin::tree;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildStatus {
    /// Build output was already present.
    UpToDate,
    Built,
}

#[derive(Debug, Clone)]
pub struct PluginBuilder {
    program: String,
    args: Vec<String>,
}

impl PluginBuilder {
    pub fn new(command: &[String]) -> Self {
        let (program, args) = match command.split_first() {
            Some((program, args)) => (program.clone(), args.to_vec()),
            None => ("make".to_string(), Vec::new()),
        };
        Self { program, args }
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn needs_build(work_dir: &Path, name: &PluginName) -> bool {
        !tree::exists_no_follow(&work_dir.join(name.as_str()))
    }

    /// Runs the build command in `work_dir` unless the plugin's output is
    /// already there. A failing build is an error.
    pub fn ensure_built(&self, work_dir: &Path, name: &PluginName) -> InstallResult<BuildStatus> {
        if !Self::needs_build(work_dir, name) {
            tracing::info!(plugin = %name, "build output present, skipping build");
            return Ok(BuildStatus::UpToDate);
        }

        println!("Build required ...");
        let command = self.command_line();
        tracing::info!(plugin = %name, %command, "running build");

        let status = Command::new(&self.program)
            .args(&self.args)
            .current_dir(work_dir)
            .status()
            .map_err(|source| InstallError::BuildSpawn {
                command: command.clone(),
                source,
            })?;

        if !status.success() {
            return Err(InstallError::BuildFailed { command, status });
        }

        let output = work_dir.join(name.as_str());
        if !tree::exists_no_follow(&output) {
            return Err(InstallError::MissingBuildOutput { path: output });
        }

        Ok(BuildStatus::Built)
    }
}
