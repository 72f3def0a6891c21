use crate::host::{self, HostInfo};
use crate::profile::{self, DirLister, FsLister, MatchPolicy};
use anyhow::{bail, Context, Result};
use log::info;
use std::ffi::OsStr;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

pub const CHROME_DIR: &str = "chrome";
pub const USER_CHROME: &str = "userChrome.css";
pub const DEFAULT_CONTENTS: &str = "<!-- Firefox userChrome.css -->\n<!-- line 2 -->\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub path: PathBuf,
    pub exists: bool,
    /// Set only when this run created the file.
    pub contents: Option<String>,
}

impl ConfigFile {
    pub fn created(&self) -> bool {
        self.contents.is_some()
    }
}

pub fn ensure_config_file(dir: &Path, filename: &str, default_contents: &str) -> Result<ConfigFile> {
    if Path::new(filename).file_name() != Some(OsStr::new(filename)) {
        bail!("'{}' is not a plain file name", filename);
    }
    let path = dir.join(filename);
    if path.is_file() {
        info!("[userchrome] found {}", path.display());
        return Ok(found(path));
    }
    // symlink_metadata also sees dangling links, which exists() reports as absent.
    if fs::symlink_metadata(&path).is_ok() {
        bail!("{} exists but is not a regular file", path.display());
    }

    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(file) => file,
        // Someone else created it between the check and the open.
        Err(err) if err.kind() == ErrorKind::AlreadyExists && path.is_file() => {
            return Ok(found(path))
        }
        Err(err) => {
            return Err(err).with_context(|| format!("failed to create {}", path.display()))
        }
    };
    file.write_all(default_contents.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("[userchrome] created {}", path.display());

    Ok(ConfigFile {
        path,
        exists: true,
        contents: Some(default_contents.to_string()),
    })
}

fn found(path: PathBuf) -> ConfigFile {
    ConfigFile {
        path,
        exists: true,
        contents: None,
    }
}

/// `ensure` subcommand: detect, resolve, then make sure the stylesheet exists.
pub fn run(base_override: Option<&Path>, policy: MatchPolicy, filename: &str) -> Result<()> {
    let host = host::detect().context("failed to detect host environment")?;
    info!(
        "[userchrome] {} on {} ({})",
        host.os_family, host.host_name, host.os_caption
    );

    let file = ensure_for_host(&host, base_override, &FsLister, policy, filename)?;
    if file.created() {
        println!("Created {}", file.path.display());
    } else {
        println!("Found {}", file.path.display());
    }
    Ok(())
}

pub fn ensure_for_host(
    host: &HostInfo,
    base_override: Option<&Path>,
    lister: &dyn DirLister,
    policy: MatchPolicy,
    filename: &str,
) -> Result<ConfigFile> {
    let location = profile::resolve_profile(host, base_override, lister, policy)?;
    let chrome_dir = location.profile_dir()?.join(CHROME_DIR);
    ensure_config_file(&chrome_dir, filename, &default_contents(filename))
}

fn default_contents(filename: &str) -> String {
    if filename == USER_CHROME {
        DEFAULT_CONTENTS.to_string()
    } else {
        format!("<!-- Firefox {} -->\n<!-- line 2 -->\n", filename)
    }
}
