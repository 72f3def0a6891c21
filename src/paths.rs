use crate::error::Error;
use crate::host::OsFamily;
use std::path::PathBuf;

pub fn home_var(family: &OsFamily) -> &'static str {
    match family {
        OsFamily::Windows => "USERPROFILE",
        _ => "HOME",
    }
}

/// Reads a required directory from the environment; empty values count as unset.
pub fn required_dir(
    var: &'static str,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<PathBuf, Error> {
    lookup(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .ok_or(Error::Configuration { var })
}

pub fn home_dir(
    family: &OsFamily,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<PathBuf, Error> {
    required_dir(home_var(family), lookup)
}
