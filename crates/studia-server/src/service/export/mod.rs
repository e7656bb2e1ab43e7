//! PDF export service: rendering, storage, and retention.

mod layout;

use jiff::Timestamp;
use studia_opendal::{FileStore, StorageError};
use studia_rig::{QuizQuestion, StudyMaterial};

use crate::TRACING_TARGET_EXPORT;
use layout::{FontFace, PdfBuilder};

/// Storage prefix for export artifacts.
const EXPORT_PREFIX: &str = "exports/";

/// Public download path prefix.
const DOWNLOAD_PREFIX: &str = "/api/export/download/";

/// Artifacts older than this are removed by the cleanup sweep.
const RETENTION_SECS: i64 = 24 * 60 * 60;

/// Maximum artifacts reported by the history listing.
const HISTORY_LIMIT: usize = 10;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors that can occur while rendering or managing export artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// PDF rendering failed.
    #[error("render failed: {0}")]
    Render(#[from] lopdf::Error),

    /// Storage operation failed.
    #[error("storage failed: {0}")]
    Storage(#[from] StorageError),

    /// The requested filename is not a plain file name.
    #[error("invalid filename: {0}")]
    InvalidFilename(String),
}

/// A rendered artifact, addressed by its public download path.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    /// Artifact filename.
    pub filename: String,
    /// Relative download path; the filesystem location is never exposed.
    pub download_url: String,
}

/// A stored artifact with its metadata.
#[derive(Debug, Clone)]
pub struct StoredExport {
    /// Artifact filename.
    pub filename: String,
    /// Size in bytes.
    pub size: u64,
    /// When the artifact was written.
    pub created_at: Option<Timestamp>,
}

/// Rejects filenames with path traversal sequences.
///
/// Download and delete endpoints accept a client-supplied filename; anything
/// containing `..`, `/`, or `\` never reaches storage.
pub fn validate_filename(filename: &str) -> ExportResult<()> {
    if filename.is_empty()
        || filename.contains("..")
        || filename.contains('/')
        || filename.contains('\\')
    {
        return Err(ExportError::InvalidFilename(filename.to_string()));
    }
    Ok(())
}

/// Renders study-material records into PDF artifacts and manages the export
/// directory.
///
/// Cheap to clone; all clones share the same file store.
#[derive(Debug, Clone)]
pub struct ExportService {
    store: FileStore,
}

impl ExportService {
    /// Creates an export service over the given file store.
    pub fn new(store: FileStore) -> Self {
        Self { store }
    }

    /// Renders a study-material record to a stored PDF artifact.
    ///
    /// The filename embeds the creation timestamp, so repeated exports of
    /// the same analysis produce distinct artifacts.
    pub async fn render(
        &self,
        material: &StudyMaterial,
        title: &str,
    ) -> ExportResult<ExportArtifact> {
        let bytes = render_study_material(material, title)?;
        let filename = format!("study-material-{}.pdf", Timestamp::now().as_millisecond());

        self.store
            .write(&format!("{EXPORT_PREFIX}{filename}"), bytes)
            .await?;

        tracing::debug!(
            target: TRACING_TARGET_EXPORT,
            filename = %filename,
            "export artifact written"
        );

        Ok(ExportArtifact {
            download_url: format!("{DOWNLOAD_PREFIX}{filename}"),
            filename,
        })
    }

    /// Reads an artifact for download.
    pub async fn read(&self, filename: &str) -> ExportResult<Vec<u8>> {
        validate_filename(filename)?;
        Ok(self.store.read(&format!("{EXPORT_PREFIX}{filename}")).await?)
    }

    /// Deletes an artifact.
    pub async fn delete(&self, filename: &str) -> ExportResult<()> {
        validate_filename(filename)?;
        let key = format!("{EXPORT_PREFIX}{filename}");

        if !self.store.exists(&key).await? {
            return Err(ExportError::Storage(StorageError::not_found(key)));
        }

        Ok(self.store.delete(&key).await?)
    }

    /// Lists the most recent stored artifacts, newest first.
    pub async fn list_recent(&self) -> ExportResult<Vec<StoredExport>> {
        let keys = self.store.list(EXPORT_PREFIX).await?;

        let mut entries = Vec::new();
        for key in keys {
            let Some(filename) = key.strip_prefix(EXPORT_PREFIX) else {
                continue;
            };
            if !filename.ends_with(".pdf") {
                continue;
            }
            let meta = self.store.stat(&key).await?;
            entries.push(StoredExport {
                filename: filename.to_string(),
                size: meta.size,
                created_at: meta.last_modified,
            });
        }

        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries.truncate(HISTORY_LIMIT);
        Ok(entries)
    }

    /// Removes artifacts older than the retention window.
    ///
    /// Idempotent; safe to invoke repeatedly or on a schedule. Returns the
    /// number of removed artifacts.
    pub async fn cleanup_expired(&self) -> ExportResult<usize> {
        self.cleanup_expired_at(Timestamp::now()).await
    }

    /// Retention sweep against an explicit "now", used by tests to probe
    /// the boundary without manipulating file mtimes.
    pub async fn cleanup_expired_at(&self, now: Timestamp) -> ExportResult<usize> {
        let keys = self.store.list(EXPORT_PREFIX).await?;

        let mut removed = 0;
        for key in keys {
            let meta = match self.store.stat(&key).await {
                Ok(meta) => meta,
                // Raced with a concurrent delete; nothing left to remove.
                Err(err) if err.is_not_found() => continue,
                Err(err) => return Err(err.into()),
            };

            let Some(modified) = meta.last_modified else {
                continue;
            };

            if now.as_second() - modified.as_second() > RETENTION_SECS {
                self.store.delete(&key).await?;
                removed += 1;
                tracing::info!(
                    target: TRACING_TARGET_EXPORT,
                    key = %key,
                    "expired export artifact removed"
                );
            }
        }

        Ok(removed)
    }
}

/// Download path for a stored artifact.
pub fn download_url_of(filename: &str) -> String {
    format!("{DOWNLOAD_PREFIX}{filename}")
}

/// Lays out one study-material record as a multi-page document.
fn render_study_material(material: &StudyMaterial, title: &str) -> Result<Vec<u8>, lopdf::Error> {
    let mut pdf = PdfBuilder::new();

    pdf.line(FontFace::Bold, 20.0, 0.0, title);
    pdf.rule();
    pdf.gap(10.0);

    if !material.summary.is_empty() {
        section(&mut pdf, "Summary", &material.summary);
    }
    if !material.explanation.is_empty() {
        section(&mut pdf, "Explanation", &material.explanation);
    }
    if !material.key_topics.is_empty() {
        section(&mut pdf, "Key Topics", &material.key_topics.join(", "));
    }

    if !material.quiz_questions.is_empty() {
        heading(&mut pdf, "Quiz Questions");
        for (index, question) in material.quiz_questions.iter().enumerate() {
            quiz_question(&mut pdf, index, question);
        }
        pdf.gap(10.0);
    }

    if !material.flashcards.is_empty() {
        heading(&mut pdf, "Flashcards");
        for (index, card) in material.flashcards.iter().enumerate() {
            pdf.line(FontFace::Bold, 11.0, 0.0, &format!("Card {}:", index + 1));
            pdf.line(FontFace::Bold, 11.0, 6.0, "Front:");
            pdf.paragraph(FontFace::Regular, 11.0, 12.0, &card.front);
            pdf.line(FontFace::Bold, 11.0, 6.0, "Back:");
            pdf.paragraph(FontFace::Regular, 11.0, 12.0, &card.back);
            pdf.gap(8.0);
        }
    }

    pdf.finish()
}

fn heading(pdf: &mut PdfBuilder, text: &str) {
    pdf.line(FontFace::Bold, 14.0, 0.0, text);
    pdf.gap(4.0);
}

fn section(pdf: &mut PdfBuilder, title: &str, content: &str) {
    heading(pdf, title);
    pdf.paragraph(FontFace::Regular, 11.0, 0.0, content);
    pdf.gap(10.0);
}

fn quiz_question(pdf: &mut PdfBuilder, index: usize, question: &QuizQuestion) {
    pdf.paragraph(
        FontFace::Regular,
        11.0,
        0.0,
        &format!("{}. {}", index + 1, question.question()),
    );

    match question {
        QuizQuestion::MultipleChoice {
            options,
            correct_index,
            ..
        } => {
            for (option_index, option) in options.iter().enumerate() {
                let letter = option_letter(option_index);
                pdf.paragraph(FontFace::Regular, 11.0, 12.0, &format!("{letter}. {option}"));
            }
            if *correct_index < options.len() {
                pdf.line(
                    FontFace::Bold,
                    11.0,
                    12.0,
                    &format!("Answer: {}", option_letter(*correct_index)),
                );
            }
        }
        QuizQuestion::ShortAnswer { answer, .. } => {
            pdf.line(FontFace::Bold, 11.0, 12.0, "Answer:");
            pdf.paragraph(FontFace::Regular, 11.0, 18.0, answer);
        }
    }

    pdf.gap(6.0);
}

/// Letters options A, B, C, ... past 26 it wraps with a numeric suffix.
fn option_letter(index: usize) -> String {
    let letter = (b'A' + (index % 26) as u8) as char;
    if index < 26 {
        letter.to_string()
    } else {
        format!("{letter}{}", index / 26)
    }
}

#[cfg(test)]
mod tests {
    use studia_rig::{Flashcard, QuizQuestion};

    use super::*;

    fn material() -> StudyMaterial {
        StudyMaterial {
            summary: "Short summary.".to_string(),
            explanation: "Longer explanation of the material.".to_string(),
            quiz_questions: vec![
                QuizQuestion::MultipleChoice {
                    question: "Powerhouse of the cell?".to_string(),
                    options: vec![
                        "Nucleus".to_string(),
                        "Mitochondria".to_string(),
                        "Ribosome".to_string(),
                    ],
                    correct_index: 1,
                },
                QuizQuestion::ShortAnswer {
                    question: "Unit of life?".to_string(),
                    answer: "The cell".to_string(),
                },
            ],
            flashcards: vec![Flashcard {
                front: "ATP".to_string(),
                back: "Energy currency of the cell".to_string(),
            }],
            key_topics: vec!["cells".to_string(), "energy".to_string()],
            mind_map: None,
            extracted_text: None,
        }
    }

    fn temp_service() -> (tempfile::TempDir, ExportService) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(studia_opendal::StorageConfig::new(
            dir.path().to_string_lossy(),
        ))
        .expect("store");
        (dir, ExportService::new(store))
    }

    #[test]
    fn traversal_filenames_are_rejected() {
        assert!(validate_filename("../etc/passwd").is_err());
        assert!(validate_filename("a/b.pdf").is_err());
        assert!(validate_filename("a\\b.pdf").is_err());
        assert!(validate_filename("").is_err());
        assert!(validate_filename("study-material-1.pdf").is_ok());
    }

    #[test]
    fn option_letters_follow_the_alphabet() {
        assert_eq!(option_letter(0), "A");
        assert_eq!(option_letter(2), "C");
        assert_eq!(option_letter(25), "Z");
    }

    #[test]
    fn rendered_material_is_a_valid_document() {
        let bytes = render_study_material(&material(), "Biology Notes").expect("render");
        let doc = lopdf::Document::load_mem(&bytes).expect("load");
        assert!(!doc.get_pages().is_empty());
    }

    #[test]
    fn oversized_material_paginates() {
        let mut big = material();
        big.explanation = "word ".repeat(4000);
        let bytes = render_study_material(&big, "Long Notes").expect("render");
        let doc = lopdf::Document::load_mem(&bytes).expect("load");
        assert!(doc.get_pages().len() > 1);
    }

    #[tokio::test]
    async fn render_stores_artifact_under_exports() {
        let (_dir, service) = temp_service();

        let artifact = service.render(&material(), "Notes").await.expect("render");
        assert!(artifact.download_url.starts_with(DOWNLOAD_PREFIX));

        let bytes = service.read(&artifact.filename).await.expect("read");
        assert!(!bytes.is_empty());
    }

    #[tokio::test]
    async fn cleanup_respects_retention_boundary() {
        let (_dir, service) = temp_service();

        let artifact = service.render(&material(), "Notes").await.expect("render");

        // Young artifact survives a sweep at the current time.
        let removed = service
            .cleanup_expired_at(Timestamp::now())
            .await
            .expect("cleanup");
        assert_eq!(removed, 0);
        assert!(service.read(&artifact.filename).await.is_ok());

        // The same artifact is removed once the clock passes retention.
        let later = Timestamp::now() + jiff::Span::new().hours(25);
        let removed = service.cleanup_expired_at(later).await.expect("cleanup");
        assert_eq!(removed, 1);
        assert!(service.read(&artifact.filename).await.is_err());

        // Repeated sweeps are idempotent.
        let removed = service.cleanup_expired_at(later).await.expect("cleanup");
        assert_eq!(removed, 0);
    }

    #[tokio::test]
    async fn list_recent_reports_stored_artifacts() {
        let (_dir, service) = temp_service();

        service.render(&material(), "One").await.expect("render");
        // Filenames embed a millisecond timestamp; space the writes out so
        // the second render gets its own name.
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        service.render(&material(), "Two").await.expect("render");

        let entries = service.list_recent().await.expect("list");
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.filename.ends_with(".pdf")));
    }
}
