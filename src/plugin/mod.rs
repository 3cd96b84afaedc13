pub mod builder;
pub mod descriptor;
pub mod installer;
pub mod kind;
pub mod tree;

pub use installer::PluginInstaller;
pub use kind::PluginType;
