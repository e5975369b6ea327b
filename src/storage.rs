use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use uuid::Uuid;

const MAX_NAME_ATTEMPTS: usize = 8;
/// Longest employee code kept in a filename, so names stay under the 255-byte limit.
const MAX_CODE_BYTES: usize = 64;

/// How the uniqueness token of a generated filename is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingScheme {
    /// `passport_<code>_<YYYYmmddHHMMSS>.pdf`
    Timestamp,
    /// `passport_declaration_<code>_<8 hex>.pdf`
    RandomHex,
}

impl NamingScheme {
    /// Build a filename for the given employee code.
    ///
    /// `attempt` is zero for the first try; later attempts only matter for the
    /// timestamp scheme, which switches to microsecond precision.
    pub fn file_name(&self, employee_code: &str, attempt: usize) -> String {
        let code = sanitize_employee_code(employee_code);
        match self {
            Self::Timestamp => {
                let now = Local::now();
                let token = if attempt == 0 {
                    now.format("%Y%m%d%H%M%S").to_string()
                } else {
                    now.format("%Y%m%d%H%M%S%6f").to_string()
                };
                format!("passport_{}_{}.pdf", code, token)
            }
            Self::RandomHex => {
                let hex = Uuid::new_v4().simple().to_string();
                format!("passport_declaration_{}_{}.pdf", code, &hex[..8])
            }
        }
    }
}

fn sanitize_employee_code(code: &str) -> String {
    let mut sanitized = sanitize_filename::sanitize(code.trim()).replace(' ', "_");
    if sanitized.len() > MAX_CODE_BYTES {
        let mut end = MAX_CODE_BYTES;
        while !sanitized.is_char_boundary(end) {
            end -= 1;
        }
        sanitized.truncate(end);
    }
    if sanitized.is_empty() {
        "unknown".to_string()
    } else {
        sanitized
    }
}

/// A rendered document that has been written to the output directory.
#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub filename: String,
    pub path: PathBuf,
}

/// Filesystem store for generated PDFs.
///
/// The directory is only ever appended to: files are created with
/// create-new semantics and never rewritten.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `bytes` under a fresh name for `employee_code`.
    pub fn persist(
        &self,
        bytes: &[u8],
        employee_code: &str,
        scheme: NamingScheme,
    ) -> io::Result<StoredDocument> {
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let filename = scheme.file_name(employee_code, attempt);
            let path = self.root.join(&filename);

            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => file,
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    log::debug!("File {} already exists, generating another name", filename);
                    continue;
                }
                Err(e) => return Err(e),
            };

            if let Err(e) = file.write_all(bytes).and_then(|_| file.sync_all()) {
                drop(file);
                let _ = fs::remove_file(&path);
                return Err(e);
            }

            return Ok(StoredDocument { filename, path });
        }

        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!(
                "could not find a free filename for employee code '{}' after {} attempts",
                employee_code, MAX_NAME_ATTEMPTS
            ),
        ))
    }

    /// Resolve `filename` inside the store, or `None` if it does not name an existing file.
    pub fn locate(&self, filename: &str) -> Option<PathBuf> {
        if filename.is_empty() || sanitize_filename::sanitize(filename) != filename || filename.starts_with('.') {
            return None;
        }

        let path = self.root.join(filename);
        if path.is_file() {
            Some(path)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_timestamp_scheme_format() {
        let name = NamingScheme::Timestamp.file_name("E123", 0);
        assert!(name.starts_with("passport_E123_"));
        assert!(name.ends_with(".pdf"));
        let token = name
            .trim_start_matches("passport_E123_")
            .trim_end_matches(".pdf");
        assert_eq!(token.len(), 14);
        assert!(token.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_random_hex_scheme_format() {
        let name = NamingScheme::RandomHex.file_name("E123", 0);
        let token = name
            .trim_start_matches("passport_declaration_E123_")
            .trim_end_matches(".pdf");
        assert_eq!(token.len(), 8);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_employee_code_is_sanitized() {
        let name = NamingScheme::RandomHex.file_name("../etc/passwd", 0);
        assert!(!name.contains('/'));
        assert!(name.starts_with("passport_declaration_"));

        let fallback = NamingScheme::Timestamp.file_name("   ", 0);
        assert!(fallback.starts_with("passport_unknown_"));
    }

    #[test]
    fn test_long_employee_code_is_capped() {
        let code = "E".repeat(240);
        for scheme in [NamingScheme::Timestamp, NamingScheme::RandomHex] {
            let name = scheme.file_name(&code, 1);
            assert!(name.len() < 255);
            assert!(name.contains(&"E".repeat(MAX_CODE_BYTES)));
            assert!(!name.contains(&"E".repeat(MAX_CODE_BYTES + 1)));
        }

        let wide = NamingScheme::RandomHex.file_name(&"é".repeat(200), 0);
        assert!(wide.len() < 255);
        assert!(wide.contains(&"é".repeat(MAX_CODE_BYTES / 2)));

        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        let stored = store.persist(b"%PDF", &code, NamingScheme::Timestamp).unwrap();
        assert_eq!(store.locate(&stored.filename), Some(stored.path));
    }

    #[test]
    fn test_persist_same_code_twice_gives_distinct_files() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("out")).unwrap();

        let first = store.persist(b"%PDF-1", "E123", NamingScheme::Timestamp).unwrap();
        let second = store.persist(b"%PDF-2", "E123", NamingScheme::Timestamp).unwrap();

        assert_ne!(first.filename, second.filename);
        assert_eq!(fs::read(&first.path).unwrap(), b"%PDF-1");
        assert_eq!(fs::read(&second.path).unwrap(), b"%PDF-2");
    }

    #[test]
    fn test_locate() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        let stored = store.persist(b"%PDF", "E1", NamingScheme::RandomHex).unwrap();

        assert_eq!(store.locate(&stored.filename), Some(stored.path.clone()));
        assert_eq!(store.locate("missing.pdf"), None);
        assert_eq!(store.locate("../secret.pdf"), None);
        assert_eq!(store.locate(""), None);
    }
}
