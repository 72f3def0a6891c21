//! Locating the default Firefox profile directory.
//!
//! The base directory and the naming convention of the default profile differ
//! per platform. Scanning is split into a pure matcher ([`match_profile_dir`])
//! and a [`DirLister`] so it can run against a fake directory tree.

use crate::error::Error;
use crate::host::{HostInfo, OsFamily};
use log::{debug, info, warn};
use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const WINDOWS_PATTERN: &str = r"^.+\.default$";
pub const UNIX_PATTERN: &str = r"^.+\.default(-\d+)?$";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// First matching child wins; other profiles are ignored.
    #[default]
    Lenient,
    /// Every child must match; any other directory aborts the scan.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileLayout {
    pub base_directory: PathBuf,
    pub naming_pattern: &'static str,
}

impl ProfileLayout {
    pub fn for_host(host: &HostInfo) -> Result<Self, Error> {
        let home = &host.home_directory;
        let layout = match &host.os_family {
            OsFamily::Windows => {
                let app_data = host
                    .app_data
                    .clone()
                    .ok_or(Error::Configuration { var: "APPDATA" })?;
                ProfileLayout {
                    base_directory: app_data.join("Mozilla").join("Firefox").join("Profiles"),
                    naming_pattern: WINDOWS_PATTERN,
                }
            }
            OsFamily::MacOs => ProfileLayout {
                base_directory: home
                    .join("Library")
                    .join("Application Support")
                    .join("Firefox"),
                naming_pattern: UNIX_PATTERN,
            },
            OsFamily::Linux | OsFamily::Unknown(_) => ProfileLayout {
                base_directory: home.join(".mozilla").join("firefox"),
                naming_pattern: UNIX_PATTERN,
            },
        };
        Ok(layout)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileLocation {
    pub base_directory: PathBuf,
    pub naming_pattern: String,
    pub resolved_profile_directory: Option<PathBuf>,
}

impl ProfileLocation {
    pub fn profile_dir(&self) -> Result<&Path, Error> {
        self.resolved_profile_directory
            .as_deref()
            .ok_or_else(|| Error::NoProfileMatch {
                base: self.base_directory.clone(),
                pattern: self.naming_pattern.clone(),
            })
    }
}

pub trait DirLister {
    /// Names of the immediate child directories of `dir`. Names that are not
    /// valid UTF-8 are included lossily, with U+FFFD in place of the bad bytes.
    fn list_dirs(&self, dir: &Path) -> io::Result<Vec<String>>;
}

pub struct FsLister;

impl DirLister for FsLister {
    fn list_dirs(&self, dir: &Path) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }
}

/// Picks the default profile from `children`, in order.
///
/// Under [`MatchPolicy::Strict`] the first non-matching name is returned as
/// the `Err`; the caller turns it into [`Error::ProfileMismatch`]. A name
/// carrying U+FFFD never matches, since it cannot be joined back into the
/// real path.
pub fn match_profile_dir<'a, S: AsRef<str>>(
    children: &'a [S],
    pattern: &Regex,
    policy: MatchPolicy,
) -> Result<Option<&'a str>, &'a str> {
    let mut found = None;
    for name in children.iter().map(|s| s.as_ref()) {
        if !name.contains(char::REPLACEMENT_CHARACTER) && pattern.is_match(name) {
            debug!("[userchrome] {} matches", name);
            found = found.or(Some(name));
            if policy == MatchPolicy::Lenient {
                break;
            }
        } else {
            debug!("[userchrome] {} does not match", name);
            if policy == MatchPolicy::Strict {
                return Err(name);
            }
        }
    }
    Ok(found)
}

pub fn resolve_profile(
    host: &HostInfo,
    base_override: Option<&Path>,
    lister: &dyn DirLister,
    policy: MatchPolicy,
) -> anyhow::Result<ProfileLocation> {
    let mut layout = ProfileLayout::for_host(host)?;
    if let Some(base) = base_override {
        layout.base_directory = base.to_path_buf();
    }
    info!(
        "[userchrome] scanning {} for `{}`",
        layout.base_directory.display(),
        layout.naming_pattern
    );
    if policy == MatchPolicy::Strict {
        warn!("[userchrome] strict matching: any non-default profile directory is fatal");
    }

    let children = lister
        .list_dirs(&layout.base_directory)
        .map_err(|source| Error::PathNotFound {
            path: layout.base_directory.clone(),
            source,
        })?;
    let pattern = Regex::new(layout.naming_pattern)?;

    let matched = match_profile_dir(&children, &pattern, policy).map_err(|name| {
        Error::ProfileMismatch {
            name: name.to_string(),
            base: layout.base_directory.clone(),
            pattern: layout.naming_pattern.to_string(),
        }
    })?;
    let resolved_profile_directory = matched.map(|name| layout.base_directory.join(name));
    if let Some(dir) = &resolved_profile_directory {
        info!("[userchrome] default profile: {}", dir.display());
    }

    Ok(ProfileLocation {
        base_directory: layout.base_directory,
        naming_pattern: layout.naming_pattern.to_string(),
        resolved_profile_directory,
    })
}

/// `locate` subcommand: report the resolved location without writing anything.
pub fn run(base_override: Option<&Path>, policy: MatchPolicy) -> anyhow::Result<()> {
    let host = crate::host::detect()?;
    let location = resolve_profile(&host, base_override, &FsLister, policy)?;
    println!("base: {}", location.base_directory.display());
    println!("pattern: {}", location.naming_pattern);
    println!("profile: {}", location.profile_dir()?.display());
    Ok(())
}
