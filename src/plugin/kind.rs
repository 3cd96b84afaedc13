use clap::ValueEnum;

/// Installation category. Each one is a subdirectory of the plugins root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum PluginType {
    #[value(name = "Controllers")]
    Controllers,
    #[value(name = "Analysis")]
    Analysis,
    #[value(name = "Configurations")]
    Configurations,
}

impl PluginType {
    pub fn dir_name(self) -> &'static str {
        match self {
            PluginType::Controllers => "Controllers",
            PluginType::Analysis => "Analysis",
            PluginType::Configurations => "Configurations",
        }
    }
}

impl std::fmt::Display for PluginType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}
