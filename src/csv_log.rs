use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-mode CSV sink. The header is written only when the file is created
/// or currently empty, so repeated runs against the same path accumulate rows
/// under a single header.
pub struct CsvLogger {
    path: PathBuf,
}

impl CsvLogger {
    pub fn open<S: AsRef<str>>(path: &str, fieldnames: &[S]) -> Result<CsvLogger, String> {
        let path = PathBuf::from(path);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
            }
        }
        let needs_header = !path.exists()
            || std::fs::metadata(&path)
                .map(|meta| meta.len() == 0)
                .map_err(|e| e.to_string())?;
        if needs_header {
            let header = fieldnames
                .iter()
                .map(|name| name.as_ref())
                .collect::<Vec<_>>()
                .join(",");
            append_line(&path, &header)?;
        }
        Ok(CsvLogger { path })
    }

    /// Appends one row. Best-effort: a failed write mid-solve is dropped
    /// rather than aborting the search.
    pub fn log(&self, values: &[String]) {
        let _ = append_line(&self.path, &values.join(","));
    }
}

fn append_line(path: &Path, line: &str) -> Result<(), String> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| e.to_string())?;
    writeln!(file, "{}", line).map_err(|e| e.to_string())
}
