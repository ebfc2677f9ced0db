//! Run-log input sources.
//!
//! A log is read either from a file or from piped stdin. Both are wrapped
//! in a [`LineSource`] that yields lines in batches, so the host can push
//! one update per batch while a long log is still loading.

use crate::model::error::InputError;
use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Batched line reader over any buffered reader.
#[derive(Debug)]
pub struct LineSource<R> {
    reader: R,
    complete: bool,
    lines_read: usize,
}

impl<R: BufRead> LineSource<R> {
    /// Wrap a buffered reader.
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader,
            complete: false,
            lines_read: 0,
        }
    }

    /// Read up to `max` lines. Returns an empty batch once EOF was reached.
    ///
    /// Line terminators (`\n`, `\r\n`) are stripped. A final line without a
    /// terminator is still returned.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` if the underlying read fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use runlog::source::LineSource;
    ///
    /// let mut source = LineSource::from_reader(&b"SR a|0\nER b|1"[..]);
    /// assert_eq!(source.next_batch(10).unwrap(), vec!["SR a|0", "ER b|1"]);
    /// assert!(source.is_complete());
    /// ```
    pub fn next_batch(&mut self, max: usize) -> Result<Vec<String>, InputError> {
        let mut batch = Vec::new();
        while batch.len() < max.max(1) && !self.complete {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                self.complete = true;
                break;
            }
            let trimmed = line.trim_end_matches(['\n', '\r']).len();
            line.truncate(trimmed);
            batch.push(line);
        }
        self.lines_read += batch.len();
        Ok(batch)
    }

    /// True once EOF has been reached.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Total lines handed out so far.
    pub fn lines_read(&self) -> usize {
        self.lines_read
    }
}

/// Where the log comes from.
pub enum InputSource {
    /// A log file on disk.
    File {
        /// Path it was opened from.
        path: PathBuf,
        /// Reader over the file.
        source: LineSource<BufReader<File>>,
    },
    /// Piped stdin.
    Stdin(LineSource<BufReader<Box<dyn Read + Send>>>),
}

impl std::fmt::Debug for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputSource::File { path, .. } => f.debug_tuple("File").field(path).finish(),
            InputSource::Stdin(_) => f.write_str("Stdin"),
        }
    }
}

impl InputSource {
    /// Open a log file.
    ///
    /// # Errors
    ///
    /// Returns `InputError::FileNotFound` if the file does not exist, and
    /// `InputError::Io` for other failures.
    pub fn open_file(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(InputError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let file = File::open(path)?;
        debug!(path = %path.display(), "opened log file");
        Ok(InputSource::File {
            path: path.to_path_buf(),
            source: LineSource::from_reader(BufReader::new(file)),
        })
    }

    /// Read from stdin.
    ///
    /// # Errors
    ///
    /// Returns `InputError::NoInput` when stdin is an interactive terminal,
    /// so the program does not hang waiting for typed input.
    pub fn stdin() -> Result<Self, InputError> {
        if io::stdin().is_terminal() {
            return Err(InputError::NoInput);
        }
        let reader: Box<dyn Read + Send> = Box::new(io::stdin());
        Ok(InputSource::Stdin(LineSource::from_reader(BufReader::new(
            reader,
        ))))
    }

    /// Read the next batch of at most `max` lines.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` on read failures.
    pub fn next_batch(&mut self, max: usize) -> Result<Vec<String>, InputError> {
        match self {
            InputSource::File { source, .. } => source.next_batch(max),
            InputSource::Stdin(source) => source.next_batch(max),
        }
    }

    /// True once the source hit EOF.
    pub fn is_complete(&self) -> bool {
        match self {
            InputSource::File { source, .. } => source.is_complete(),
            InputSource::Stdin(source) => source.is_complete(),
        }
    }
}

/// Pick the input source: the file if one was given, otherwise piped stdin.
///
/// # Errors
///
/// Returns `InputError::FileNotFound` for a missing file and
/// `InputError::NoInput` when no file is given and stdin is a terminal.
pub fn detect_input_source(file: Option<PathBuf>) -> Result<InputSource, InputError> {
    match file {
        Some(path) => InputSource::open_file(path),
        None => InputSource::stdin(),
    }
}
