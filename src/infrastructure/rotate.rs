//! Size-rotated log file writer.
//!
//! `RotatingFile` appends to a single file and, when a record would push it
//! past the size limit, renames the file to a time-stamped backup and starts a
//! fresh one. Old backups are pruned by count and by age. The file is opened
//! lazily on the first write, so constructing a file-backed logger never
//! touches the filesystem.

use chrono::{Local, Utc};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

use crate::application::ports::LogWriter;
use crate::domain::config::FileConfig;

const DEFAULT_MAX_MEGABYTES: u64 = 100;
const BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.3f";

#[derive(Debug, Default)]
struct Open {
    file: Option<File>,
    written: u64,
}

/// Appending file writer with size-triggered rotation.
#[derive(Debug)]
pub struct RotatingFile {
    path: PathBuf,
    max_bytes: u64,
    max_age_days: u32,
    max_backups: usize,
    local_time: bool,
    open: Mutex<Open>,
}

impl RotatingFile {
    /// Create a writer for the configured file. Nothing is opened until the
    /// first write.
    pub fn new(config: &FileConfig) -> Self {
        let megabytes = if config.max_size == 0 {
            DEFAULT_MAX_MEGABYTES
        } else {
            config.max_size
        };
        RotatingFile {
            path: PathBuf::from(&config.filename),
            max_bytes: megabytes.saturating_mul(1024 * 1024),
            max_age_days: config.max_age,
            max_backups: config.max_backups as usize,
            local_time: config.local_time,
            open: Mutex::new(Open::default()),
        }
    }

    /// The path of the live log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[cfg(test)]
    fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    fn ensure_open(&self, open: &mut Open) -> io::Result<()> {
        if open.file.is_some() {
            return Ok(());
        }
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        open.written = file.metadata()?.len();
        open.file = Some(file);
        Ok(())
    }

    fn rotate(&self, open: &mut Open) -> io::Result<()> {
        open.file = None;
        open.written = 0;
        fs::rename(&self.path, self.backup_path())?;
        self.prune_backups();
        self.ensure_open(open)
    }

    /// Backup name: `app.log` becomes `app-2023-01-12T14-35-44.854.log`.
    fn backup_path(&self) -> PathBuf {
        let timestamp = if self.local_time {
            Local::now().format(BACKUP_TIME_FORMAT).to_string()
        } else {
            Utc::now().format(BACKUP_TIME_FORMAT).to_string()
        };
        let (stem, ext) = split_name(&self.path);
        self.path
            .with_file_name(format!("{}-{}{}", stem, timestamp, ext))
    }

    /// Remove backups beyond the configured count and older than the
    /// configured age. Errors are swallowed: pruning must never fail a write.
    fn prune_backups(&self) {
        if self.max_backups == 0 && self.max_age_days == 0 {
            return;
        }
        let Some(dir) = self.path.parent() else {
            return;
        };
        let (stem, ext) = split_name(&self.path);
        let marker = format!("{}-", stem);

        let Ok(entries) = fs::read_dir(if dir.as_os_str().is_empty() {
            Path::new(".")
        } else {
            dir
        }) else {
            return;
        };

        let mut backups: Vec<(SystemTime, PathBuf)> = entries
            .flatten()
            .filter_map(|entry| {
                let path = entry.path();
                let name = path.file_name()?.to_str()?;
                if !name.starts_with(&marker) || !name.ends_with(&ext) || path == self.path {
                    return None;
                }
                let modified = entry.metadata().ok()?.modified().ok()?;
                Some((modified, path))
            })
            .collect();

        // newest first
        backups.sort_by(|a, b| b.0.cmp(&a.0));

        let cutoff = (self.max_age_days > 0).then(|| {
            SystemTime::now() - Duration::from_secs(u64::from(self.max_age_days) * 24 * 60 * 60)
        });
        for (index, (modified, path)) in backups.iter().enumerate() {
            let too_many = self.max_backups > 0 && index >= self.max_backups;
            let too_old = cutoff.is_some_and(|c| *modified < c);
            if too_many || too_old {
                let _ = fs::remove_file(path);
            }
        }
    }
}

impl LogWriter for RotatingFile {
    fn write(&self, buf: &[u8]) -> io::Result<()> {
        let mut open = self.open.lock().unwrap_or_else(|e| e.into_inner());
        self.ensure_open(&mut open)?;
        if open.written > 0 && open.written + buf.len() as u64 > self.max_bytes {
            self.rotate(&mut open)?;
        }
        if let Some(file) = open.file.as_mut() {
            file.write_all(buf)?;
            open.written += buf.len() as u64;
        }
        Ok(())
    }

    fn close(&self) -> io::Result<()> {
        let mut open = self.open.lock().unwrap_or_else(|e| e.into_inner());
        open.written = 0;
        if let Some(mut file) = open.file.take() {
            file.flush()?;
        }
        Ok(())
    }
}

/// File name split into stem and dot-prefixed extension (`("app", ".log")`).
fn split_name(path: &Path) -> (String, String) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    (stem, ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_config(path: &Path) -> FileConfig {
        FileConfig {
            filename: path.to_string_lossy().into_owned(),
            ..Default::default()
        }
    }

    #[test]
    fn test_lazy_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let writer = RotatingFile::new(&file_config(&path));
        assert!(!path.exists());

        writer.write(b"hello\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n");
    }

    #[test]
    fn test_append_across_close() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let writer = RotatingFile::new(&file_config(&path));

        writer.write(b"one\n").unwrap();
        writer.close().unwrap();
        writer.write(b"two\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn test_rotation_on_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let writer = RotatingFile::new(&file_config(&path)).with_max_bytes(10);

        writer.write(b"0123456789").unwrap();
        writer.write(b"next").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "next");
        let backups: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .flatten()
            .filter(|e| e.path() != path)
            .collect();
        assert_eq!(backups.len(), 1);
        let name = backups[0].file_name();
        let name = name.to_string_lossy();
        assert!(name.starts_with("app-") && name.ends_with(".log"), "{}", name);
        assert_eq!(fs::read(backups[0].path()).unwrap(), b"0123456789");
    }

    #[test]
    fn test_prune_keeps_newest_backups() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let mut config = file_config(&path);
        config.max_backups = 1;
        let writer = RotatingFile::new(&config).with_max_bytes(4);

        for chunk in [b"aaaa", b"bbbb", b"cccc", b"dddd"] {
            writer.write(chunk).unwrap();
            // distinct timestamps for distinct backup names
            std::thread::sleep(Duration::from_millis(5));
        }

        let backups: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .flatten()
            .filter(|e| e.path() != path)
            .collect();
        assert_eq!(backups.len(), 1);
        assert_eq!(fs::read(backups[0].path()).unwrap(), b"cccc");
    }

    #[test]
    fn test_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deep/app.log");
        let writer = RotatingFile::new(&file_config(&path));
        writer.write(b"hi\n").unwrap();
        assert!(path.exists());
    }
}
