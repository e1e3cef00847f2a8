//! Uploaded documents and their text normalization.

use crate::error::{Result, StoreError};
use serde_json::{Map, Value};
use std::path::Path;

/// File extensions accepted for upload, lowercase.
pub const ACCEPTED_EXTENSIONS: [&str; 2] = [".json", ".txt"];

/// Whether `name` ends in `.json` or `.txt`, ignoring case.
pub fn is_accepted_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    ACCEPTED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

fn upload_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// A named file supplied for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFile {
    pub name: String,
    pub content: Vec<u8>,
}

impl DocumentFile {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Read a file from disk. The upload name is the path's file name.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = upload_name(path);
        let content = std::fs::read(path).map_err(|source| StoreError::Io {
            name: name.clone(),
            source,
        })?;
        Ok(Self { name, content })
    }

    /// Read a batch of files in order, checking each name's extension before
    /// touching the disk. The first unsupported name or unreadable file
    /// aborts the batch.
    pub fn read_all<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Self>> {
        paths
            .iter()
            .map(|path| {
                let name = upload_name(path.as_ref());
                if !is_accepted_name(&name) {
                    return Err(StoreError::UnsupportedFile { name });
                }
                Self::read(path)
            })
            .collect()
    }

    /// The last `/`-separated component of the name.
    pub fn basename(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// Whether the name ends in `.json` or `.txt`, ignoring case.
    pub fn has_accepted_extension(&self) -> bool {
        is_accepted_name(self.basename())
    }

    /// The content as UTF-8 text.
    pub fn text(&self) -> Result<&str> {
        std::str::from_utf8(&self.content).map_err(|_| StoreError::InvalidUtf8 {
            name: self.basename().to_string(),
        })
    }
}

/// Normalize document text for storage.
///
/// Content that parses as JSON is re-serialized in a canonical form: keys
/// sorted at every level, two-space indentation, non-ASCII left unescaped.
/// Anything else is returned unchanged.
pub fn canonicalize(content: &str) -> String {
    match serde_json::from_str::<Value>(content) {
        Ok(value) => serde_json::to_string_pretty(&sort_keys(value))
            .unwrap_or_else(|_| content.to_string()),
        Err(_) => content.to_string(),
    }
}

// Rebuilt maps are filled in sorted order so the output does not depend on
// which map representation serde_json was compiled with.
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut pairs: Vec<(String, Value)> = map.into_iter().collect();
            pairs.sort_by(|a, b| a.0.cmp(&b.0));
            let mut sorted = Map::new();
            for (key, value) in pairs {
                sorted.insert(key, sort_keys(value));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_accepted_extensions() {
        assert!(DocumentFile::new("a.json", "").has_accepted_extension());
        assert!(DocumentFile::new("NOTES.TXT", "").has_accepted_extension());
        assert!(DocumentFile::new("dir/report.Json", "").has_accepted_extension());
        assert!(!DocumentFile::new("image.png", "").has_accepted_extension());
        assert!(!DocumentFile::new("json", "").has_accepted_extension());
        assert!(!DocumentFile::new("a.txt/b.pdf", "").has_accepted_extension());
    }

    #[test]
    fn test_basename() {
        assert_eq!(DocumentFile::new("/tmp/upload/a.txt", "").basename(), "a.txt");
        assert_eq!(DocumentFile::new("a.txt", "").basename(), "a.txt");
    }

    #[test]
    fn test_canonicalize_sorts_keys() {
        let text = canonicalize(r#"{"b": [2, 3], "a": 1}"#);
        assert_eq!(text, "{\n  \"a\": 1,\n  \"b\": [\n    2,\n    3\n  ]\n}");
    }

    #[test]
    fn test_canonicalize_nested_and_unicode() {
        let text = canonicalize(r#"{"z": {"y": "ñandú", "x": null}}"#);
        assert_eq!(
            text,
            "{\n  \"z\": {\n    \"x\": null,\n    \"y\": \"ñandú\"\n  }\n}"
        );
    }

    #[test]
    fn test_canonicalize_is_stable() {
        let once = canonicalize(r#"{"k": [1, {"q": true, "p": false}]}"#);
        assert_eq!(canonicalize(&once), once);
    }

    #[test]
    fn test_plain_text_unchanged() {
        let raw = "cats are mammals\n{not json";
        assert_eq!(canonicalize(raw), raw);
    }

    #[test]
    fn test_json_scalar() {
        assert_eq!(canonicalize(" 42 "), "42");
    }

    #[test]
    fn test_invalid_utf8() {
        let file = DocumentFile::new("bad.txt", vec![0xff, 0xfe]);
        assert!(matches!(file.text(), Err(StoreError::InvalidUtf8 { .. })));
    }

    #[test]
    fn test_read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"hello").unwrap();

        let doc = DocumentFile::read(&path).unwrap();
        assert_eq!(doc.name, "note.txt");
        assert_eq!(doc.text().unwrap(), "hello");
    }

    #[test]
    fn test_read_all_checks_extension_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        let ok = dir.path().join("ok.txt");
        std::fs::write(&ok, "fine").unwrap();
        // Never created: the extension check must fire before any read.
        let slides = dir.path().join("slides.pdf");

        let err = DocumentFile::read_all(&[slides.clone(), ok.clone()]).unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedFile { ref name } if name == "slides.pdf"));

        let err = DocumentFile::read_all(&[ok.clone(), slides]).unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedFile { .. }));

        let files = DocumentFile::read_all(&[ok]).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "ok.txt");
    }

    #[test]
    fn test_read_all_reports_missing_supported_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = DocumentFile::read_all(&[dir.path().join("gone.json")]).unwrap_err();
        assert!(matches!(err, StoreError::Io { ref name, .. } if name == "gone.json"));
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = DocumentFile::read(dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, StoreError::Io { ref name, .. } if name == "missing.txt"));
    }
}
