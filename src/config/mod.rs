pub mod policy;

pub use policy::*;

use std::path::{Path, PathBuf};

/// Project config directory name, resolved under the working directory.
pub const CONFIG_DIR: &str = ".dlp-guard";

/// Default config file path for a project root: `<root>/.dlp-guard/config.yml`
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_DIR).join("config.yml")
}
