use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub install: InstallConfig,
}

#[derive(Debug, Deserialize)]
pub struct InstallConfig {
    pub plugins_dir: String,
    pub build_command: Vec<String>,
}

impl AppConfig {
    /// Load configuration with layering: defaults → user config.
    pub fn load() -> Result<Self> {
        let user_path = directories::ProjectDirs::from("", "", "install-plugin")
            .map(|d| d.config_dir().join("config.toml"));
        Self::load_from(user_path.as_deref())
    }

    pub fn load_from(user_path: Option<&Path>) -> Result<Self> {
        let defaults = include_str!("../../config/default.toml");
        let mut config: AppConfig = toml::from_str(defaults).context("invalid default config")?;

        if let Some(config_path) = user_path
            && config_path.exists()
        {
            let user_str = fs::read_to_string(config_path)
                .with_context(|| format!("reading {}", config_path.display()))?;
            config = toml::from_str(&user_str)
                .with_context(|| format!("parsing {}", config_path.display()))?;
        }

        if config.install.build_command.is_empty() {
            bail!("install.build_command must name a program");
        }

        // Expand ~ in plugins_dir
        if config.install.plugins_dir.starts_with('~') {
            let home = dirs_home().ok_or_else(|| anyhow!("cannot determine home directory"))?;
            config.install.plugins_dir =
                config
                    .install
                    .plugins_dir
                    .replacen('~', &home.to_string_lossy(), 1);
        }

        Ok(config)
    }

    pub fn plugins_dir(&self) -> PathBuf {
        PathBuf::from(&self.install.plugins_dir)
    }
}

fn dirs_home() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_home_plugins() {
        let config = AppConfig::load_from(None).unwrap();
        assert_eq!(config.install.build_command, vec!["make".to_string()]);
        assert!(config.plugins_dir().ends_with("adun/Plugins"));
        assert!(!config.install.plugins_dir.starts_with('~'));
    }

    #[test]
    fn user_file_replaces_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[install]\nplugins_dir = \"/opt/adun/Plugins\"\nbuild_command = [\"gmake\", \"-j2\"]\n",
        )
        .unwrap();

        let config = AppConfig::load_from(Some(&path)).unwrap();
        assert_eq!(config.plugins_dir(), PathBuf::from("/opt/adun/Plugins"));
        assert_eq!(config.install.build_command, vec!["gmake", "-j2"]);
    }

    #[test]
    fn empty_build_command_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[install]\nplugins_dir = \"/tmp\"\nbuild_command = []\n").unwrap();

        let err = AppConfig::load_from(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("build_command"));
    }

    #[test]
    fn missing_user_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.install.build_command, vec!["make".to_string()]);
    }
}
