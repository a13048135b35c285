//! # Environment file codec
//!
//! Reads and writes the flat `KEY=VALUE` file that holds the database
//! credential blocks next to the rest of the application's settings.
//!
//! The file is kept as an ordered list of lines. Comments, blank lines and
//! every assignment that is not being written are carried through untouched,
//! byte for byte. Writing a key replaces the first line carrying it (dropping
//! any later duplicates of that key) or appends a new line when it is absent.
//!
//! # Atomic Writes
//!
//! Every write is a locked read-modify-write:
//! 1. Take an exclusive advisory lock on the sidecar `<file>.lock`
//! 2. Re-read the current document under the lock
//! 3. Write the updated document to a temporary sibling and fsync it
//! 4. Rename it over the target (atomic on POSIX systems)

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use super::keys::{self, CredentialField, KeyPrefix};
use crate::models::{CredentialInput, CredentialSet, EnvFileError};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    /// A `KEY=VALUE` line; `text` is the raw line as it appears in the file.
    Assignment { key: String, text: String },
    /// Comments, blank lines and anything that does not parse as an assignment.
    Other(String),
}

/// In-memory form of an environment file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvDocument {
    lines: Vec<Line>,
    trailing_newline: bool,
    /// Lines end in `\r\n`; written lines follow suit.
    crlf: bool,
}

impl EnvDocument {
    /// Parses file text into line-level structure. Never fails.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let trailing_newline = text.ends_with('\n');
        let crlf = text
            .split_once('\n')
            .is_some_and(|(first, _)| first.ends_with('\r'));
        let body = text.strip_suffix('\n').unwrap_or(text);
        let lines = if text.is_empty() {
            Vec::new()
        } else {
            body.split('\n').map(parse_line).collect()
        };

        Self {
            lines,
            trailing_newline,
            crlf,
        }
    }

    /// Renders the document back to file text.
    #[must_use]
    pub fn render(&self) -> String {
        let mut output = self
            .lines
            .iter()
            .map(|line| match line {
                Line::Assignment { text, .. } | Line::Other(text) => text.as_str(),
            })
            .collect::<Vec<_>>()
            .join("\n");
        if self.trailing_newline && !self.lines.is_empty() {
            output.push('\n');
        }
        output
    }

    /// Returns `true` when the document has no lines at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Decoded value of `key`, from the first line that carries it.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.lines.iter().find_map(|line| match line {
            Line::Assignment { key: existing, text } if existing == key => {
                Some(decode_value(assignment_value(text)))
            }
            _ => None,
        })
    }

    /// Every key with its decoded value. The first occurrence of a key wins.
    #[must_use]
    pub fn values(&self) -> HashMap<String, String> {
        let mut values = HashMap::new();
        for line in &self.lines {
            if let Line::Assignment { key, text } = line {
                values
                    .entry(key.clone())
                    .or_insert_with(|| decode_value(assignment_value(text)));
            }
        }
        values
    }

    /// Number of lines carrying `key`.
    #[must_use]
    pub fn occurrences(&self, key: &str) -> usize {
        self.lines
            .iter()
            .filter(
                |line| matches!(line, Line::Assignment { key: existing, .. } if existing == key),
            )
            .count()
    }

    /// Sets `key` to `value`.
    ///
    /// Replaces the first line carrying the key and removes any later
    /// duplicates of it, or appends a new line when the key is absent. Lines
    /// for other keys are left exactly as they were. Written lines use the
    /// document's line terminator.
    pub fn upsert(&mut self, key: &str, value: &str) {
        let terminator = if self.crlf { "\r" } else { "" };
        let text = format!("{key}={}{terminator}", encode_value(value));
        let mut replaced = false;
        self.lines.retain_mut(|line| match line {
            Line::Assignment {
                key: existing,
                text: existing_text,
            } if existing.as_str() == key => {
                if replaced {
                    return false;
                }
                existing_text.clone_from(&text);
                replaced = true;
                true
            }
            _ => true,
        });

        if !replaced {
            if self.crlf && !self.trailing_newline {
                if let Some(Line::Assignment { text: last, .. } | Line::Other(last)) =
                    self.lines.last_mut()
                {
                    last.push('\r');
                }
            }
            self.lines.push(Line::Assignment {
                key: key.to_string(),
                text,
            });
            self.trailing_newline = true;
        }
    }

    /// Writes all six keys of one credential family.
    pub fn upsert_credentials(&mut self, prefix: KeyPrefix, credentials: &CredentialSet) {
        for field in CredentialField::ALL {
            self.upsert(&prefix.key(field), field.value(credentials));
        }
    }

    /// Reads the credential family stored under `prefix`.
    #[must_use]
    pub fn credentials(&self, prefix: KeyPrefix) -> CredentialSet {
        keys::credentials_from_values(&self.values(), prefix)
    }
}

fn parse_line(raw: &str) -> Line {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Line::Other(raw.to_string());
    }

    match strip_export(trimmed).split_once('=') {
        Some((key, _)) if is_valid_key(key.trim()) => Line::Assignment {
            key: key.trim().to_string(),
            text: raw.to_string(),
        },
        _ => Line::Other(raw.to_string()),
    }
}

fn strip_export(line: &str) -> &str {
    line.strip_prefix("export ").map_or(line, str::trim_start)
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

/// Raw value portion of an assignment line, everything after the first `=`.
fn assignment_value(text: &str) -> &str {
    strip_export(text.trim())
        .split_once('=')
        .map_or("", |(_, value)| value)
}

/// Decodes a raw value.
///
/// Double-quoted values have `\"`, `\\`, `\n` and `\r` unescaped; single-quoted
/// values are taken literally; anything else is taken as-is after trimming.
/// A quote without its closing partner is treated as an unquoted value.
pub(crate) fn decode_value(raw: &str) -> String {
    let value = raw.trim();
    if let Some(inner) = value.strip_prefix('"') {
        if let Some(decoded) = decode_double_quoted(inner) {
            return decoded;
        }
    } else if let Some(inner) = value.strip_prefix('\'') {
        if let Some((literal, _)) = inner.split_once('\'') {
            return literal.to_string();
        }
    }
    value.to_string()
}

fn decode_double_quoted(inner: &str) -> Option<String> {
    let mut decoded = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => return Some(decoded),
            '\\' => match chars.next() {
                Some('"') => decoded.push('"'),
                Some('\\') => decoded.push('\\'),
                Some('n') => decoded.push('\n'),
                Some('r') => decoded.push('\r'),
                Some(other) => {
                    decoded.push('\\');
                    decoded.push(other);
                }
                None => return None,
            },
            _ => decoded.push(c),
        }
    }
    None
}

/// Encodes a value for writing, quoting it only when it needs quoting.
pub(crate) fn encode_value(value: &str) -> String {
    let needs_quotes = value
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '=' | '#' | '"' | '\''));
    if !needs_quotes {
        return value.to_string();
    }

    let mut encoded = String::with_capacity(value.len() + 2);
    encoded.push('"');
    for c in value.chars() {
        match c {
            '\\' => encoded.push_str("\\\\"),
            '"' => encoded.push_str("\\\""),
            '\n' => encoded.push_str("\\n"),
            '\r' => encoded.push_str("\\r"),
            _ => encoded.push(c),
        }
    }
    encoded.push('"');
    encoded
}

/// Handle on an environment file at an explicit path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvFile {
    path: PathBuf,
}

impl EnvFile {
    /// Handle on the file at `path`; nothing is read until it is used.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path as given, before any symlink is followed.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the document, degrading to an empty one.
    ///
    /// A missing, unreadable or non-UTF-8 file reads as empty rather than
    /// failing.
    #[must_use]
    pub fn load(&self) -> EnvDocument {
        match fs::read(&self.path) {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(text) => EnvDocument::parse(&text),
                Err(_) => {
                    warn!(
                        path = %self.path.display(),
                        "environment file is not valid UTF-8, treating as empty"
                    );
                    EnvDocument::default()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(
                    path = %self.path.display(),
                    "environment file not found, treating as empty"
                );
                EnvDocument::default()
            }
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "failed to read environment file, treating as empty"
                );
                EnvDocument::default()
            }
        }
    }

    /// Every key in the file with its decoded value.
    #[must_use]
    pub fn read_all(&self) -> HashMap<String, String> {
        self.load().values()
    }

    /// Upserts the six keys of one credential family.
    ///
    /// The port is written as given when the caller supplied it (even empty)
    /// and defaults to `3306` only when absent.
    ///
    /// # Errors
    /// Returns an [`EnvFileError`] when the file cannot be locked, read or
    /// replaced. Credential content never causes a failure.
    pub fn write_credential_block(
        &self,
        prefix: KeyPrefix,
        input: CredentialInput,
    ) -> Result<(), EnvFileError> {
        let credentials = input.into_credentials();
        self.update(|document| document.upsert_credentials(prefix, &credentials))?;
        info!(path = %self.path.display(), prefix = %prefix, "wrote credential block");
        Ok(())
    }

    /// Applies `apply` to the current document and persists the result.
    ///
    /// The whole read-modify-write runs under the sidecar lock, so concurrent
    /// writers serialize instead of losing each other's updates.
    ///
    /// # Errors
    /// Returns an [`EnvFileError`] on any filesystem failure; the target file
    /// is left unchanged in that case.
    pub fn update<T>(
        &self,
        apply: impl FnOnce(&mut EnvDocument) -> T,
    ) -> Result<T, EnvFileError> {
        let target = self.write_target()?;
        ensure_parent(&target)?;
        let _lock = lock(&target)?;

        let mut document = load_for_write(&target)?;
        let output = apply(&mut document);
        persist(&target, &document)?;

        Ok(output)
    }

    /// The file a write actually replaces.
    ///
    /// A symlinked environment file is followed to its final target, so the
    /// rename updates the shared file and leaves the link in place.
    fn write_target(&self) -> Result<PathBuf, EnvFileError> {
        let is_link = fs::symlink_metadata(&self.path)
            .is_ok_and(|metadata| metadata.file_type().is_symlink());
        if !is_link {
            return Ok(self.path.clone());
        }

        let mut target = self.path.clone();
        for _ in 0..MAX_SYMLINK_HOPS {
            match fs::symlink_metadata(&target) {
                Ok(metadata) if metadata.file_type().is_symlink() => {
                    let link = fs::read_link(&target).map_err(|source| EnvFileError::Read {
                        path: target.clone(),
                        source,
                    })?;
                    target = parent_dir(&target).join(link);
                }
                // Final target, or a dangling link that the write will create.
                _ => return Ok(target),
            }
        }

        Err(EnvFileError::Read {
            path: self.path.clone(),
            source: io::Error::other("too many levels of symbolic links"),
        })
    }
}

const MAX_SYMLINK_HOPS: usize = 40;

fn lock_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}

fn parent_dir(path: &Path) -> &Path {
    path.parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

fn ensure_parent(path: &Path) -> Result<(), EnvFileError> {
    let parent = parent_dir(path);
    if parent.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(parent).map_err(|source| EnvFileError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn lock(path: &Path) -> Result<File, EnvFileError> {
    let lock_path = lock_path(path);
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_path)
        .map_err(|source| EnvFileError::Lock {
            path: lock_path.clone(),
            source,
        })?;
    file.lock().map_err(|source| EnvFileError::Lock {
        path: lock_path,
        source,
    })?;
    Ok(file)
}

/// Reads the document for a write. Unlike [`EnvFile::load`], anything but
/// a missing file is an error, so an unreadable file is never clobbered.
fn load_for_write(path: &Path) -> Result<EnvDocument, EnvFileError> {
    match fs::read(path) {
        Ok(bytes) => String::from_utf8(bytes)
            .map(|text| EnvDocument::parse(&text))
            .map_err(|err| EnvFileError::Read {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::InvalidData, err),
            }),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(EnvDocument::default()),
        Err(source) => Err(EnvFileError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn persist(path: &Path, document: &EnvDocument) -> Result<(), EnvFileError> {
    let write_error = |source| EnvFileError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut temp = NamedTempFile::new_in(parent_dir(path)).map_err(write_error)?;
    temp.write_all(document.render().as_bytes())
        .map_err(write_error)?;
    temp.as_file().sync_all().map_err(write_error)?;

    // Keep the existing mode; a fresh file keeps the private temp-file mode.
    if let Ok(metadata) = fs::metadata(path) {
        temp.as_file()
            .set_permissions(metadata.permissions())
            .map_err(write_error)?;
    }

    temp.persist(path).map_err(|err| EnvFileError::Persist {
        path: path.to_path_buf(),
        source: err.error,
    })?;
    debug!(path = %path.display(), "persisted environment file");
    Ok(())
}
