use crate::error::Error;
use crate::paths;
use log::{debug, warn};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    Windows,
    #[serde(rename = "macos")]
    MacOs,
    Linux,
    Unknown(String),
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OsFamily::Windows => f.write_str("Windows"),
            OsFamily::MacOs => f.write_str("macOS"),
            OsFamily::Linux => f.write_str("Linux"),
            OsFamily::Unknown(raw) => write!(f, "unknown ({})", raw),
        }
    }
}

/// Maps a raw platform identifier (`std::env::consts::OS`, `sys.platform`,
/// `uname -s`) onto an OS family.
pub fn classify(raw: &str) -> OsFamily {
    match raw.trim().to_ascii_lowercase().as_str() {
        "windows" | "win32" | "win64" => OsFamily::Windows,
        "macos" | "darwin" | "mac" => OsFamily::MacOs,
        "linux" => OsFamily::Linux,
        _ => OsFamily::Unknown(raw.to_string()),
    }
}

/// Facts about the running host, captured once per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostInfo {
    pub os_family: OsFamily,
    pub platform: String,
    pub host_name: String,
    pub os_caption: String,
    pub home_directory: PathBuf,
    /// `%APPDATA%`, only looked up on Windows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_data: Option<PathBuf>,
}

impl HostInfo {
    pub fn is_windows(&self) -> bool {
        self.os_family == OsFamily::Windows
    }

    pub fn is_macos(&self) -> bool {
        self.os_family == OsFamily::MacOs
    }

    pub fn is_linux(&self) -> bool {
        self.os_family == OsFamily::Linux
    }
}

pub struct SystemNames {
    pub host_name: String,
    pub os_caption: String,
}

impl SystemNames {
    pub fn current() -> Self {
        let host_name = whoami::fallible::hostname().unwrap_or_else(|_| whoami::devicename());
        SystemNames {
            host_name,
            os_caption: whoami::distro(),
        }
    }
}

pub fn detect() -> Result<HostInfo, Error> {
    let lookup = |key: &str| std::env::var(key).ok();
    detect_with(std::env::consts::OS, &lookup, SystemNames::current())
}

pub fn detect_with(
    platform: &str,
    lookup: &dyn Fn(&str) -> Option<String>,
    names: SystemNames,
) -> Result<HostInfo, Error> {
    let os_family = classify(platform);
    if let OsFamily::Unknown(raw) = &os_family {
        warn!(
            "[userchrome] unrecognized platform '{}'; paths will follow the Linux layout",
            raw
        );
    }
    let home_directory = paths::home_dir(&os_family, lookup)?;
    let app_data = match os_family {
        OsFamily::Windows => lookup("APPDATA")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from),
        _ => None,
    };
    debug!(
        "[userchrome] host {} is {} ({}), home {}",
        names.host_name,
        os_family,
        names.os_caption,
        home_directory.display()
    );
    Ok(HostInfo {
        os_family,
        platform: platform.to_string(),
        host_name: names.host_name,
        os_caption: names.os_caption,
        home_directory,
        app_data,
    })
}

/// `host` subcommand: print the detected facts.
pub fn run(json: bool) -> anyhow::Result<()> {
    let info = detect()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }
    println!("hostOS: {}", info.os_family);
    println!("hostOSCaption: {}", info.os_caption);
    println!("COMPUTERNAME: {}", info.host_name);
    println!("HOME: {}", info.home_directory.display());
    if let Some(app_data) = &info.app_data {
        println!("APPDATA: {}", app_data.display());
    }
    println!("IsWindows: {}", info.is_windows());
    println!("IsMacOS: {}", info.is_macos());
    println!("IsLinux: {}", info.is_linux());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> SystemNames {
        SystemNames {
            host_name: "box".into(),
            os_caption: "Test OS 1.0".into(),
        }
    }

    #[test]
    fn classify_known_identifiers() {
        assert_eq!(classify("windows"), OsFamily::Windows);
        assert_eq!(classify("win32"), OsFamily::Windows);
        assert_eq!(classify("darwin"), OsFamily::MacOs);
        assert_eq!(classify("macos"), OsFamily::MacOs);
        assert_eq!(classify("Linux"), OsFamily::Linux);
    }

    #[test]
    fn classify_keeps_unknown_platforms_distinct() {
        assert_eq!(classify("freebsd"), OsFamily::Unknown("freebsd".into()));
        assert_ne!(classify("openbsd"), OsFamily::Linux);
        assert_eq!(classify(" FreeBSD"), OsFamily::Unknown(" FreeBSD".into()));
        assert_eq!(classify(" Darwin\n"), OsFamily::MacOs);
    }

    #[test]
    fn detect_linux_host() {
        let lookup = |k: &str| (k == "HOME").then(|| "/home/me".to_string());
        let info = detect_with("linux", &lookup, names()).expect("detect");
        assert!(info.is_linux());
        assert!(!info.is_windows() && !info.is_macos());
        assert_eq!(info.home_directory, PathBuf::from("/home/me"));
        assert_eq!(info.host_name, "box");
        assert_eq!(info.os_caption, "Test OS 1.0");
        assert_eq!(info.app_data, None);
    }

    #[test]
    fn detect_windows_captures_appdata() {
        let lookup = |k: &str| match k {
            "USERPROFILE" => Some(r"C:\Users\me".to_string()),
            "APPDATA" => Some(r"C:\Users\me\AppData\Roaming".to_string()),
            _ => None,
        };
        let info = detect_with("windows", &lookup, names()).expect("detect");
        assert!(info.is_windows());
        assert_eq!(
            info.app_data,
            Some(PathBuf::from(r"C:\Users\me\AppData\Roaming"))
        );
    }

    #[test]
    fn detect_fails_without_home() {
        let lookup = |k: &str| (k == "USERPROFILE").then(|| "/ignored".to_string());
        let err = detect_with("darwin", &lookup, names()).unwrap_err();
        assert!(matches!(err, Error::Configuration { var: "HOME" }));
    }

    #[test]
    fn unknown_platform_still_detects() {
        let lookup = |k: &str| (k == "HOME").then(|| "/home/me".to_string());
        let info = detect_with("freebsd", &lookup, names()).expect("detect");
        assert_eq!(info.os_family, OsFamily::Unknown("freebsd".into()));
        assert!(!info.is_linux());
    }

    #[test]
    fn serializes_to_json() {
        let lookup = |k: &str| (k == "HOME").then(|| "/home/me".to_string());
        let info = detect_with("darwin", &lookup, names()).expect("detect");
        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["os_family"], "macos");
        assert_eq!(value["home_directory"], "/home/me");
        assert!(value.get("app_data").is_none());
    }
}
