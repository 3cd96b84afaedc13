use clap::Parser;

use crate::plugin::PluginType;

/// Builds the plugin in the current directory and installs it into
/// `~/adun/Plugins/<TYPE>`, replacing any previous copy.
#[derive(Debug, Parser)]
#[command(name = "install-plugin", version)]
#[command(after_help = "Note: must be run in the plugin source directory.")]
pub struct Cli {
    /// Plugin type
    #[arg(short = 't', long = "type", value_enum, value_name = "TYPE")]
    pub plugin_type: PluginType,
}
