use rand::Rng;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug)]
pub enum AttachmentError {
    SourceMissing(PathBuf),
    Io(std::io::Error),
}

impl std::fmt::Display for AttachmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            AttachmentError::SourceMissing(path) => {
                write!(f, "File not found: {}", path.display())
            }
            AttachmentError::Io(e) => write!(f, "Attachment I/O error: {}", e),
        }
    }
}

impl std::error::Error for AttachmentError {}

impl From<std::io::Error> for AttachmentError {
    fn from(e: std::io::Error) -> Self {
        AttachmentError::Io(e)
    }
}

/// Broad file category, used to label attachments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Text,
    Audio,
    Video,
    Pdf,
    Spreadsheet,
    Document,
    Presentation,
    Other,
}

impl FileKind {
    pub fn of(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "png" | "jpg" | "jpeg" | "gif" | "bmp" | "webp" | "svg" | "tiff" => FileKind::Image,
            "txt" | "md" | "csv" | "log" | "json" | "xml" | "html" | "htm" => FileKind::Text,
            "mp3" | "wav" | "flac" | "ogg" | "m4a" | "aac" => FileKind::Audio,
            "mp4" | "mkv" | "mov" | "avi" | "webm" => FileKind::Video,
            "pdf" => FileKind::Pdf,
            "xls" | "xlsx" | "ods" => FileKind::Spreadsheet,
            "doc" | "docx" | "odt" | "rtf" => FileKind::Document,
            "ppt" | "pptx" | "odp" => FileKind::Presentation,
            _ => FileKind::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FileKind::Image => "image",
            FileKind::Text => "text",
            FileKind::Audio => "audio",
            FileKind::Video => "video",
            FileKind::Pdf => "pdf",
            FileKind::Spreadsheet => "spreadsheet",
            FileKind::Document => "document",
            FileKind::Presentation => "presentation",
            FileKind::Other => "file",
        }
    }
}

/// Keeps copies of attached files under `<data_dir>/attachments`
#[derive(Debug, Clone)]
pub struct AttachmentManager {
    attachments_dir: PathBuf,
}

impl AttachmentManager {
    pub fn new(attachments_dir: impl Into<PathBuf>) -> Result<Self, AttachmentError> {
        let attachments_dir = attachments_dir.into();
        fs::create_dir_all(&attachments_dir)?;
        Ok(Self { attachments_dir })
    }

    pub fn attachments_dir(&self) -> &Path {
        &self.attachments_dir
    }

    /// Copies `source` into the attachments directory under a collision-free
    /// name (`report_1a2b3c4d.pdf`) and returns the new path
    pub fn add_attachment(&self, source: &Path) -> Result<PathBuf, AttachmentError> {
        if !source.is_file() {
            return Err(AttachmentError::SourceMissing(source.to_path_buf()));
        }

        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attachment".to_string());

        let mut rng = rand::thread_rng();
        let dest = loop {
            let suffix: u32 = rng.gen_range(0..=u32::MAX);
            let mut name = format!("{}_{:08x}", stem, suffix);
            if let Some(ext) = source.extension() {
                name.push('.');
                name.push_str(&ext.to_string_lossy());
            }
            let candidate = self.attachments_dir.join(name);
            if !candidate.exists() {
                break candidate;
            }
        };

        fs::copy(source, &dest)?;
        info!("Attached {} as {}", source.display(), dest.display());
        Ok(dest)
    }

    /// Deletes an attachment file, returns whether something was removed
    pub fn remove_attachment(&self, path: &Path) -> bool {
        if !path.exists() {
            return false;
        }

        match fs::remove_file(path) {
            Ok(()) => true,
            Err(e) => {
                warn!("Error removing attachment {}: {}", path.display(), e);
                false
            }
        }
    }

    /// Removes every given file, returns how many were actually deleted
    pub fn clean_unused_attachments<'a, I>(&self, unused: I) -> usize
    where
        I: IntoIterator<Item = &'a PathBuf>,
    {
        unused
            .into_iter()
            .filter(|path| self.remove_attachment(path))
            .count()
    }

    /// Files in the attachments directory that no path in `referenced` points at
    pub fn orphaned_files(&self, referenced: &[PathBuf]) -> Result<Vec<PathBuf>, AttachmentError> {
        let mut orphans = Vec::new();
        for entry in fs::read_dir(&self.attachments_dir)? {
            let path = entry?.path();
            if path.is_file() && !referenced.iter().any(|r| same_file(r, &path)) {
                orphans.push(path);
            }
        }
        orphans.sort();
        Ok(orphans)
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, AttachmentManager, PathBuf) {
        let dir = TempDir::new().unwrap();
        let manager = AttachmentManager::new(dir.path().join("attachments")).unwrap();
        let source = dir.path().join("notes.txt");
        fs::write(&source, "remember the milk").unwrap();
        (dir, manager, source)
    }

    #[test]
    fn copies_with_unique_names() {
        let (_dir, manager, source) = setup();

        let first = manager.add_attachment(&source).unwrap();
        let second = manager.add_attachment(&source).unwrap();

        assert_ne!(first, second);
        assert!(first.starts_with(manager.attachments_dir()));
        let name = first.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("notes_"));
        assert!(name.ends_with(".txt"));
        assert_eq!(fs::read_to_string(&first).unwrap(), "remember the milk");
        assert!(source.exists());
    }

    #[test]
    fn missing_source_is_reported() {
        let (dir, manager, _source) = setup();
        let result = manager.add_attachment(&dir.path().join("nope.pdf"));
        assert!(matches!(result, Err(AttachmentError::SourceMissing(_))));
    }

    #[test]
    fn cleanup_counts_only_removed_files() {
        let (dir, manager, source) = setup();
        let copy = manager.add_attachment(&source).unwrap();
        let gone = dir.path().join("already-gone.txt");

        assert_eq!(manager.clean_unused_attachments(&[copy.clone(), gone]), 1);
        assert!(!copy.exists());
        assert!(!manager.remove_attachment(&copy));
    }

    #[test]
    fn finds_orphaned_files() {
        let (_dir, manager, source) = setup();
        let kept = manager.add_attachment(&source).unwrap();
        let orphan = manager.add_attachment(&source).unwrap();

        let orphans = manager.orphaned_files(&[kept]).unwrap();
        assert_eq!(orphans, vec![orphan]);
    }

    #[test]
    fn classifies_by_extension() {
        assert_eq!(FileKind::of(Path::new("a/photo.JPG")), FileKind::Image);
        assert_eq!(FileKind::of(Path::new("budget.xlsx")), FileKind::Spreadsheet);
        assert_eq!(FileKind::of(Path::new("paper.pdf")), FileKind::Pdf);
        assert_eq!(FileKind::of(Path::new("Makefile")), FileKind::Other);
    }
}
