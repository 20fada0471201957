//! Document and bookmark persistence.
//!
//! Each document lives under `<root>/<id>/`: the extracted text and metadata
//! in `document.json`, the read position next to it in `bookmark.toml`.
//! Deleting the directory removes both, so bookmark deletion cascades.

use crate::bookmarks::{PositionStore, ReadPosition, now_unix_ms, supersedes};
use crate::error::ReaderError;
use crate::ingest;
use anyhow::Context;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

pub const DEFAULT_LIBRARY_DIR: &str = ".cache/library";
const DOCUMENT_FILE: &str = "document.json";
const BOOKMARK_FILE: &str = "bookmark.toml";

/// An ingested document. Never mutated after it is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub author: String,
    pub text: String,
    #[serde(default)]
    pub source_path: Option<String>,
    #[serde(default)]
    pub added_at_ms: u64,
}

/// What the document list shows for each entry.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSummary {
    pub id: String,
    pub title: String,
    pub author: String,
    pub word_count: usize,
    pub added_at_ms: u64,
    pub percentage: Option<f64>,
}

impl DocumentSummary {
    fn from_document(document: &Document, position: Option<&ReadPosition>) -> Self {
        Self {
            id: document.id.clone(),
            title: document.title.clone(),
            author: document.author.clone(),
            word_count: crate::tokenizer::tokenize(&document.text).len(),
            added_at_ms: document.added_at_ms,
            percentage: position.map(|position| position.percentage),
        }
    }
}

pub trait DocumentStore {
    fn get(&self, id: &str) -> Result<Option<Document>, ReaderError>;
    fn put(&self, document: &Document) -> Result<(), ReaderError>;
    /// Removes the document and its read position.
    fn delete(&self, id: &str) -> Result<(), ReaderError>;
    /// Most recently added first.
    fn list(&self) -> Result<Vec<DocumentSummary>, ReaderError>;
}

/// Stable id for a source file: hex SHA-256 of its absolute path.
pub fn document_id_for(path: &Path) -> String {
    let absolute = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let mut hasher = Sha256::new();
    hasher.update(absolute.as_os_str().to_string_lossy().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Extract a file and store it as a document, keyed by its path.
pub fn import_document<S: DocumentStore + ?Sized>(
    store: &S,
    path: &Path,
) -> Result<Document, ReaderError> {
    let extracted = ingest::extract(path)?;
    let document = Document {
        id: document_id_for(path),
        title: extracted.title,
        author: extracted.author,
        text: extracted.text,
        source_path: Some(path.to_string_lossy().to_string()),
        added_at_ms: now_unix_ms(),
    };
    store.put(&document)?;
    info!(id = %document.id, title = %document.title, "Imported document");
    Ok(document)
}

/// Filesystem-backed library.
#[derive(Debug, Clone)]
pub struct FileLibrary {
    root: PathBuf,
    /// Held across every check-then-write so concurrent saves for one
    /// document cannot reorder.
    write_lock: Arc<Mutex<()>>,
}

impl FileLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_dir(&self, id: &str) -> PathBuf {
        self.root.join(id)
    }

    fn read_document(&self, id: &str) -> anyhow::Result<Option<Document>> {
        let path = self.document_dir(id).join(DOCUMENT_FILE);
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to read {}", path.display()));
            }
        };
        let document = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Some(document))
    }

    fn read_position(&self, id: &str) -> anyhow::Result<Option<ReadPosition>> {
        let path = self.document_dir(id).join(BOOKMARK_FILE);
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to read {}", path.display()));
            }
        };
        let position = toml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Some(position))
    }
}

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Write through a sibling temp file so readers never see a partial file.
fn write_atomically(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let tmp = path.with_extension(format!(
        "{}.{}.tmp",
        std::process::id(),
        TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    fs::write(&tmp, contents).with_context(|| format!("Failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("Failed to move {} into place", path.display()))?;
    Ok(())
}

impl DocumentStore for FileLibrary {
    fn get(&self, id: &str) -> Result<Option<Document>, ReaderError> {
        self.read_document(id)
            .map_err(|err| ReaderError::persistence("get document", err))
    }

    fn put(&self, document: &Document) -> Result<(), ReaderError> {
        let _guard = self.write_lock.lock().map_err(|_| poisoned("put document"))?;
        let path = self.document_dir(&document.id).join(DOCUMENT_FILE);
        serde_json::to_string(document)
            .context("Failed to serialize document")
            .and_then(|json| write_atomically(&path, &json))
            .map_err(|err| ReaderError::persistence("put document", err))?;
        debug!(id = %document.id, path = %path.display(), "Stored document");
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<(), ReaderError> {
        let _guard = self.write_lock.lock().map_err(|_| poisoned("delete document"))?;
        let dir = self.document_dir(id);
        match fs::remove_dir_all(&dir) {
            Ok(()) => {
                info!(id, "Deleted document and its bookmark");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(ReaderError::persistence(
                "delete document",
                anyhow::Error::new(err).context(format!("Failed to remove {}", dir.display())),
            )),
        }
    }

    fn list(&self) -> Result<Vec<DocumentSummary>, ReaderError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(ReaderError::persistence("list documents", err)),
        };

        let mut summaries = Vec::new();
        for entry in entries.flatten() {
            let Some(id) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            match self.read_document(&id) {
                Ok(Some(document)) => {
                    let position = self.read_position(&id).unwrap_or_else(|err| {
                        warn!(id, "Ignoring unreadable bookmark: {err:#}");
                        None
                    });
                    summaries.push(DocumentSummary::from_document(&document, position.as_ref()));
                }
                Ok(None) => {}
                Err(err) => warn!(id, "Skipping unreadable document: {err:#}"),
            }
        }
        summaries.sort_by(|a, b| b.added_at_ms.cmp(&a.added_at_ms));
        Ok(summaries)
    }
}

impl PositionStore for FileLibrary {
    fn get_position(&self, document_id: &str) -> Result<Option<ReadPosition>, ReaderError> {
        self.read_position(document_id)
            .map_err(|err| ReaderError::persistence("get", err))
    }

    fn save_position(&self, position: &ReadPosition) -> Result<(), ReaderError> {
        let _guard = self.write_lock.lock().map_err(|_| poisoned("save"))?;
        let dir = self.document_dir(&position.document_id);
        if !dir.join(DOCUMENT_FILE).exists() {
            // The document was deleted while this write was in flight.
            debug!(id = %position.document_id, "Dropping position for missing document");
            return Ok(());
        }
        let stored = self
            .read_position(&position.document_id)
            .unwrap_or_default();
        if !supersedes(position, stored.as_ref()) {
            debug!(id = %position.document_id, "Ignoring stale position write");
            return Ok(());
        }
        toml::to_string(position)
            .context("Failed to serialize bookmark")
            .and_then(|contents| write_atomically(&dir.join(BOOKMARK_FILE), &contents))
            .map_err(|err| ReaderError::persistence("save", err))
    }
}

/// In-process library, used by tests and when no cache directory is wanted.
#[derive(Debug, Default)]
pub struct MemoryLibrary {
    documents: Mutex<HashMap<String, Document>>,
    positions: Mutex<HashMap<String, ReadPosition>>,
}

impl MemoryLibrary {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(operation: &'static str) -> ReaderError {
    ReaderError::persistence(operation, anyhow::anyhow!("library lock poisoned"))
}

impl DocumentStore for MemoryLibrary {
    fn get(&self, id: &str) -> Result<Option<Document>, ReaderError> {
        let documents = self.documents.lock().map_err(|_| poisoned("get document"))?;
        Ok(documents.get(id).cloned())
    }

    fn put(&self, document: &Document) -> Result<(), ReaderError> {
        let mut documents = self.documents.lock().map_err(|_| poisoned("put document"))?;
        documents.insert(document.id.clone(), document.clone());
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<(), ReaderError> {
        self.documents
            .lock()
            .map_err(|_| poisoned("delete document"))?
            .remove(id);
        self.positions
            .lock()
            .map_err(|_| poisoned("delete document"))?
            .remove(id);
        Ok(())
    }

    fn list(&self) -> Result<Vec<DocumentSummary>, ReaderError> {
        let documents = self.documents.lock().map_err(|_| poisoned("list documents"))?;
        let positions = self.positions.lock().map_err(|_| poisoned("list documents"))?;
        let mut summaries: Vec<DocumentSummary> = documents
            .values()
            .map(|document| DocumentSummary::from_document(document, positions.get(&document.id)))
            .collect();
        summaries.sort_by(|a, b| b.added_at_ms.cmp(&a.added_at_ms));
        Ok(summaries)
    }
}

impl PositionStore for MemoryLibrary {
    fn get_position(&self, document_id: &str) -> Result<Option<ReadPosition>, ReaderError> {
        let positions = self.positions.lock().map_err(|_| poisoned("get"))?;
        Ok(positions.get(document_id).cloned())
    }

    fn save_position(&self, position: &ReadPosition) -> Result<(), ReaderError> {
        let mut positions = self.positions.lock().map_err(|_| poisoned("save"))?;
        if supersedes(position, positions.get(&position.document_id)) {
            positions.insert(position.document_id.clone(), position.clone());
        }
        Ok(())
    }
}

static GLOBAL_LIBRARY: OnceCell<FileLibrary> = OnceCell::new();

/// Set the root of the process-wide library. Only the first call has effect.
pub fn init_global(root: impl Into<PathBuf>) -> &'static FileLibrary {
    let root = root.into();
    let library = GLOBAL_LIBRARY.get_or_init(|| {
        info!(root = %root.display(), "Initialized document library");
        FileLibrary::new(root.clone())
    });
    if library.root() != root {
        warn!(
            requested = %root.display(),
            active = %library.root().display(),
            "Document library already initialized; keeping existing root"
        );
    }
    library
}

/// Process-wide library handle, created on first use.
pub fn global() -> &'static FileLibrary {
    GLOBAL_LIBRARY.get_or_init(|| FileLibrary::new(DEFAULT_LIBRARY_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unique_temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "rsvp-library-{name}-{}-{}",
            std::process::id(),
            now_unix_ms()
        ))
    }

    fn document(id: &str, added_at_ms: u64) -> Document {
        Document {
            id: id.to_string(),
            title: format!("Title {id}"),
            author: "Anon".to_string(),
            text: "one two three four".to_string(),
            source_path: None,
            added_at_ms,
        }
    }

    fn position(id: &str, percentage: f64, updated_at_ms: u64) -> ReadPosition {
        ReadPosition {
            document_id: id.to_string(),
            percentage,
            updated_at_ms,
        }
    }

    #[test]
    fn file_library_round_trips_documents_and_positions() {
        let root = unique_temp_dir("roundtrip");
        let library = FileLibrary::new(&root);

        library.put(&document("a", 1)).expect("put");
        library.save_position(&position("a", 42.5, 10)).expect("save");

        assert_eq!(library.get("a").expect("get"), Some(document("a", 1)));
        assert_eq!(
            library.get_position("a").expect("get position"),
            Some(position("a", 42.5, 10))
        );
        assert_eq!(library.get("missing").expect("get"), None);
        assert_eq!(library.get_position("missing").expect("get"), None);

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn file_library_delete_cascades_to_bookmark() {
        let root = unique_temp_dir("cascade");
        let library = FileLibrary::new(&root);
        library.put(&document("a", 1)).expect("put");
        library.save_position(&position("a", 10.0, 1)).expect("save");

        library.delete("a").expect("delete");

        assert_eq!(library.get("a").expect("get"), None);
        assert_eq!(library.get_position("a").expect("get position"), None);
        library.delete("a").expect("deleting twice is fine");

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn concurrent_saves_keep_the_newest_position() {
        let root = unique_temp_dir("concurrent");
        let library = Arc::new(FileLibrary::new(&root));
        library.put(&document("a", 1)).expect("put");

        for round in 0..100u64 {
            let base = round * 10;
            let handles: Vec<_> = [(base + 1, 10.0), (base + 2, 20.0)]
                .into_iter()
                .map(|(updated_at_ms, percentage)| {
                    let library = Arc::clone(&library);
                    std::thread::spawn(move || {
                        library.save_position(&position("a", percentage, updated_at_ms))
                    })
                })
                .collect();
            for handle in handles {
                handle.join().expect("writer thread").expect("save succeeds");
            }
            let stored = library.get_position("a").expect("get").expect("stored");
            assert_eq!(stored.updated_at_ms, base + 2, "round {round}");
        }

        let leftovers = fs::read_dir(root.join("a"))
            .expect("document dir")
            .flatten()
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "tmp"))
            .count();
        assert_eq!(leftovers, 0);
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn file_library_ignores_stale_and_orphaned_positions() {
        let root = unique_temp_dir("stale");
        let library = FileLibrary::new(&root);
        library.put(&document("a", 1)).expect("put");
        library.save_position(&position("a", 60.0, 20)).expect("save");
        library.save_position(&position("a", 10.0, 5)).expect("stale save");
        library.save_position(&position("ghost", 10.0, 5)).expect("orphan save");

        assert_eq!(
            library.get_position("a").expect("get").map(|p| p.percentage),
            Some(60.0)
        );
        assert_eq!(library.get_position("ghost").expect("get"), None);

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn file_library_lists_newest_first_with_progress() {
        let root = unique_temp_dir("list");
        let library = FileLibrary::new(&root);
        assert!(library.list().expect("list of missing root").is_empty());

        library.put(&document("old", 1)).expect("put");
        library.put(&document("new", 2)).expect("put");
        library.save_position(&position("old", 50.0, 1)).expect("save");

        let list = library.list().expect("list");
        let ids: Vec<&str> = list.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old"]);
        assert_eq!(list[0].percentage, None);
        assert_eq!(list[1].percentage, Some(50.0));
        assert_eq!(list[1].word_count, 4);

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn memory_library_is_last_write_wins() {
        let library = MemoryLibrary::new();
        library.save_position(&position("a", 10.0, 5)).expect("save");
        library.save_position(&position("a", 20.0, 5)).expect("same-time save");
        library.save_position(&position("a", 5.0, 4)).expect("older save");

        assert_eq!(
            library.get_position("a").expect("get").map(|p| p.percentage),
            Some(20.0)
        );
    }

    #[test]
    fn memory_library_delete_cascades() {
        let library = MemoryLibrary::new();
        library.put(&document("a", 1)).expect("put");
        library.save_position(&position("a", 10.0, 1)).expect("save");
        library.delete("a").expect("delete");
        assert!(library.list().expect("list").is_empty());
        assert_eq!(library.get_position("a").expect("get"), None);
    }

    #[test]
    fn import_stores_extracted_text() {
        let dir = unique_temp_dir("import");
        fs::create_dir_all(&dir).expect("mkdir");
        let source = dir.join("story.txt");
        fs::write(&source, "Once upon a time.").expect("write source");
        let library = MemoryLibrary::new();

        let document = import_document(&library, &source).expect("import");

        assert_eq!(document.title, "story");
        assert_eq!(document.id, document_id_for(&source));
        assert_eq!(library.get(&document.id).expect("get"), Some(document));

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn import_of_unsupported_file_is_ingestion_failure() {
        let library = MemoryLibrary::new();
        let err = import_document(&library, Path::new("scan.pdf")).expect_err("pdf");
        assert!(matches!(err, ReaderError::Ingestion(_)));
        assert!(library.list().expect("list").is_empty());
    }

    #[test]
    fn document_ids_are_stable_hex_digests() {
        let first = document_id_for(Path::new("/tmp/some/book.epub"));
        let second = document_id_for(Path::new("/tmp/some/book.epub"));
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
