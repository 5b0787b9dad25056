use std::path::{Path, PathBuf};

/// Well-known bus name owned by the mock; clients of the real daemon expect it verbatim.
pub const BUS_NAME: &str = "com.meego.msyncd";
pub const OBJECT_PATH: &str = "/synchronizer";
pub const INTERFACE_NAME: &str = "com.meego.msyncd";

pub const SYSTEM_BUS_ENV: &str = "MOCKSYNC_SYSTEM_BUS";

pub const CONFIG_FILE: &str = "config.yaml";
pub const PROFILES_DIR: &str = "profiles";

pub fn mocksync_root(home: &Path) -> PathBuf {
    home.join(".mocksync")
}

pub fn config_path(home: &Path) -> PathBuf {
    mocksync_root(home).join(CONFIG_FILE)
}

pub fn default_profiles_dir(home: &Path) -> PathBuf {
    mocksync_root(home).join(PROFILES_DIR)
}
