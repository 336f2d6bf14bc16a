//! Output sinks for the rendered report.

use log::debug;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Writes everything it receives to two writers, e.g. the console and a report file.
pub struct TeeWriter<A, B> {
    first: A,
    second: B,
}

impl<A: Write, B: Write> TeeWriter<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    pub fn into_inner(self) -> (A, B) {
        (self.first, self.second)
    }
}

impl<A: Write, B: Write> Write for TeeWriter<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.first.write_all(buf)?;
        self.second.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.first.flush()?;
        self.second.flush()
    }
}

/// A report file that is created on the first write, so a run that aborts
/// before rendering leaves nothing behind.
pub struct LazyFile {
    path: PathBuf,
    file: Option<File>,
}

impl LazyFile {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            file: None,
        }
    }

    pub fn is_created(&self) -> bool {
        self.file.is_some()
    }

    fn file(&mut self) -> io::Result<&mut File> {
        if self.file.is_none() {
            debug!("Creating report file {}", self.path.display());
            let file = File::create(&self.path).map_err(|e| {
                io::Error::new(e.kind(), format!("Can't create {}: {e}", self.path.display()))
            })?;
            self.file = Some(file);
        }
        self.file
            .as_mut()
            .ok_or_else(|| io::Error::other("report file missing"))
    }
}

impl Write for LazyFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_sinks_receive_everything() {
        let mut tee = TeeWriter::new(Vec::new(), Vec::new());

        write!(tee, "Partition {}:", 1).unwrap();
        tee.write_all(b"\n").unwrap();
        tee.flush().unwrap();

        let (a, b) = tee.into_inner();
        assert_eq!(a, b"Partition 1:\n");
        assert_eq!(a, b);
    }

    #[test]
    fn report_file_appears_on_first_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        let mut file = LazyFile::new(&path);

        file.flush().unwrap();
        assert!(!file.is_created());
        assert!(!path.exists());

        writeln!(file, "Partition 1:").unwrap();
        file.flush().unwrap();

        assert!(file.is_created());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Partition 1:\n");
    }

    #[test]
    fn unused_report_file_is_never_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");

        let mut tee = TeeWriter::new(Vec::new(), LazyFile::new(&path));
        tee.flush().unwrap();
        drop(tee);

        assert!(!path.exists());
    }
}
