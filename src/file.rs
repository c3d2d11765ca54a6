// src/file.rs

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use crate::config::consts::{BACKUP_PREFIX, ELIGIBLE_CSV_PREFIX};

/// `elegibles_<payMonth>.csv`
pub fn eligible_csv_filename(pay_month: &str) -> String {
    format!("{ELIGIBLE_CSV_PREFIX}{}.csv", pay_month.trim())
}

/// `copia_pena_<YYYY-MM-DD>.json`
pub fn backup_filename(date: &str) -> String {
    format!("{BACKUP_PREFIX}{date}.json")
}

/// Write `contents` to the user's `-o` target. Empty target → `default_filename` in the
/// working directory; a directory target keeps the default file name.
/// Returns the final path written to.
pub fn write_export(user_o: &str, default_filename: &str, contents: &str) -> io::Result<PathBuf> {
    let path = resolve_out_path(user_o, default_filename)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    fs::write(&path, contents)?;
    Ok(path)
}

pub fn resolve_out_path(user_o: &str, default_filename: &str) -> io::Result<PathBuf> {
    let user_o = user_o.trim();
    if user_o.is_empty() {
        return Ok(PathBuf::from(default_filename));
    }
    let p = PathBuf::from(normalize_separators(user_o));
    if looks_like_dir_hint(&p) || p.is_dir() {
        ensure_directory(&p)?;
        Ok(p.join(default_filename))
    } else {
        Ok(p)
    }
}

/// Write to a sibling temp file, then rename over `path`.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let mut f = fs::File::create(&tmp)?;
    f.write_all(bytes)?;
    f.sync_all()?;
    drop(f);
    fs::rename(&tmp, path)
}

pub fn normalize_separators(p: &str) -> String {
    let sep = std::path::MAIN_SEPARATOR;
    p.chars().map(|c| if c=='/'||c=='\\' { sep } else { c }).collect()
}

pub fn ensure_directory(dir: &Path) -> io::Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("Path exists but is not a directory: {}", dir.display()),
        ));
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

pub fn looks_like_dir_hint(p: &Path) -> bool {
    let s = p.to_string_lossy();
    s.ends_with('/') || s.ends_with('\\')
}
