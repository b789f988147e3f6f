use crate::error::{QueryError, Result};
use crate::operations::ResultSet;

use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes `nation_name|revenue` lines sorted by nation name. The file is
/// written next to `path` and renamed into place, so `path` is either absent
/// or complete.
pub fn write_results(path: &Path, results: &ResultSet) -> Result<()> {
    write_atomically(path, |out| {
        for (nation, revenue) in results.sorted_by_name() {
            writeln!(out, "{}|{}", nation, revenue)?;
        }
        Ok(())
    })?;
    log::info!("Wrote {} nations to {}", results.len(), path.display());
    Ok(())
}

/// Serializes `value` as JSON to `path`.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    write_atomically(path, |out| {
        out.write_all(json.as_bytes())?;
        out.write_all(b"\n")
    })?;
    log::info!("Wrote query stats to {}", path.display());
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

fn write_atomically<F>(path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| QueryError::io(parent, e))?;
    }
    let staging = staging_path(path);
    let written = File::create(&staging).and_then(|file| {
        let mut out = BufWriter::new(file);
        fill(&mut out)?;
        out.into_inner().map_err(|e| e.into_error())?.sync_all()
    });
    if let Err(e) = written {
        let _ = fs::remove_file(&staging);
        return Err(QueryError::io(staging, e));
    }
    fs::rename(&staging, path).map_err(|e| {
        let _ = fs::remove_file(&staging);
        QueryError::io(path, e)
    })
}
