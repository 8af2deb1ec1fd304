// store.rs — Store: scheme-dispatching path accessor.
//
// Local paths go straight to std::fs. Object-storage paths go through the
// aws CLI (`aws s3 ls` / `aws s3 cp <uri> -`) via the CommandRunner seam,
// matching how the rest of the pipeline talks to AWS.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use rr_exec::CommandRunner;

use crate::error::StorageError;

/// URI scheme marker for object-storage paths.
pub const OBJECT_SCHEME: &str = "s3://";

/// One entry in a directory or object-prefix listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEntry {
    /// File name or object key (relative to the listed location).
    pub name: String,

    /// Size in bytes. Zero for prefixes/directories.
    pub size: u64,
}

/// Stderr fragments that mark a backend/credential failure rather than a
/// missing object. Anything else on a failed object operation is treated as
/// "not found".
const FATAL_BACKEND_MARKERS: &[&str] = &[
    "AccessDenied",
    "InvalidAccessKeyId",
    "SignatureDoesNotMatch",
    "ExpiredToken",
    "Unable to locate credentials",
    "Could not connect",
    "CredentialsError",
];

/// Uniform path accessor over local filesystem and object storage.
pub struct Store<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> Store<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    /// Whether `path` exists and has content (size > 0).
    pub fn exists_and_nonempty(&self, path: &str) -> Result<bool, StorageError> {
        Ok(self.size(path)? > 0)
    }

    /// Size of `path` in bytes; 0 when it does not exist.
    pub fn size(&self, path: &str) -> Result<u64, StorageError> {
        if is_object_path(path) {
            self.object_size(path)
        } else {
            local_size(path)
        }
    }

    /// Read `path` as UTF-8 text; `None` when it does not exist.
    pub fn read(&self, path: &str) -> Result<Option<String>, StorageError> {
        if is_object_path(path) {
            self.object_read(path)
        } else {
            local_read(path)
        }
    }

    /// List the entries under a directory or object prefix.
    pub fn list(&self, dir: &str) -> Result<Vec<StorageEntry>, StorageError> {
        if is_object_path(dir) {
            self.object_list(dir)
        } else {
            local_list(dir)
        }
    }

    fn object_size(&self, path: &str) -> Result<u64, StorageError> {
        let out = self.runner.run("aws", &["s3", "ls", path])?;
        if !out.success() {
            check_backend_failure(path, &out.stderr)?;
            tracing::debug!("object not found: {}", path);
            return Ok(0);
        }
        // `aws s3 ls <key>` prefix-matches; take the entry whose key equals
        // the requested object name.
        let wanted = path.rsplit('/').next().unwrap_or(path);
        let total = out
            .stdout
            .lines()
            .filter_map(parse_ls_line)
            .filter(|e| e.name == wanted)
            .map(|e| e.size)
            .next()
            .unwrap_or(0);
        Ok(total)
    }

    fn object_read(&self, path: &str) -> Result<Option<String>, StorageError> {
        // `aws s3 cp <uri> -` streams the object to stdout — no temp file.
        let out = self.runner.run("aws", &["s3", "cp", path, "-"])?;
        if !out.success() {
            check_backend_failure(path, &out.stderr)?;
            tracing::debug!("object not readable: {}", path);
            return Ok(None);
        }
        Ok(Some(out.stdout))
    }

    fn object_list(&self, dir: &str) -> Result<Vec<StorageEntry>, StorageError> {
        let prefix = format!("{}/", dir.trim_end_matches('/'));
        let out = self.runner.run("aws", &["s3", "ls", &prefix])?;
        if !out.success() {
            check_backend_failure(dir, &out.stderr)?;
            return Ok(Vec::new());
        }
        Ok(out.stdout.lines().filter_map(parse_ls_line).collect())
    }
}

fn is_object_path(path: &str) -> bool {
    path.starts_with(OBJECT_SCHEME)
}

/// Error out when stderr indicates a backend/credential failure.
fn check_backend_failure(path: &str, stderr: &str) -> Result<(), StorageError> {
    if FATAL_BACKEND_MARKERS.iter().any(|m| stderr.contains(m)) {
        return Err(StorageError::Backend {
            path: path.to_string(),
            detail: stderr.trim().to_string(),
        });
    }
    Ok(())
}

/// Parse one line of `aws s3 ls` output.
///
/// File lines look like `2024-03-01 12:34:56      1234 key`; prefix lines
/// look like `                           PRE subdir/`.
fn parse_ls_line(line: &str) -> Option<StorageEntry> {
    let mut fields = line.split_whitespace();
    let first = fields.next()?;
    if first == "PRE" {
        return Some(StorageEntry {
            name: fields.next()?.to_string(),
            size: 0,
        });
    }
    let _time = fields.next()?;
    let size = fields.next()?.parse().ok()?;
    let name = fields.next()?.to_string();
    Some(StorageEntry { name, size })
}

fn local_size(path: &str) -> Result<u64, StorageError> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => Ok(meta.len()),
        // Directories and other non-file entries have no content size here.
        Ok(_) => Ok(0),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(0),
        Err(source) => Err(StorageError::Io {
            path: path.to_string(),
            source,
        }),
    }
}

fn local_read(path: &str) -> Result<Option<String>, StorageError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StorageError::Io {
            path: path.to_string(),
            source,
        }),
    }
}

fn local_list(dir: &str) -> Result<Vec<StorageEntry>, StorageError> {
    let mut entries = Vec::new();
    let read_dir = match fs::read_dir(Path::new(dir)) {
        Ok(rd) => rd,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(entries),
        Err(source) => {
            return Err(StorageError::Io {
                path: dir.to_string(),
                source,
            })
        }
    };
    for entry in read_dir {
        let entry = entry.map_err(|source| StorageError::Io {
            path: dir.to_string(),
            source,
        })?;
        let meta = entry.metadata().map_err(|source| StorageError::Io {
            path: dir.to_string(),
            source,
        })?;
        entries.push(StorageEntry {
            name: entry.file_name().to_string_lossy().to_string(),
            size: if meta.is_file() { meta.len() } else { 0 },
        });
    }
    Ok(entries)
}
