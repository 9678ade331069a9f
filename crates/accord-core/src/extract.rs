use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::warn;

/// Upload extensions the API accepts; anything else is silently skipped
/// before the extractor is ever called.
pub const ALLOWED_EXTENSIONS: &[&str] = &["txt", "pdf", "png", "jpg", "jpeg", "doc", "docx"];

pub fn is_allowed(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Extracts plain text from uploaded evidence files.
///
/// OCR and PDF rasterization are delegated to external binaries
/// (`tesseract`, `pdftoppm`) invoked per call; nothing is kept resident.
/// `extract` is infallible by contract: a file that cannot be processed
/// yields an explicit failure header instead of an error, so one bad
/// upload never aborts the rest of the request.
pub struct Extractor {
    ocr_cmd: String,
    pdf_render_cmd: String,
}

impl Extractor {
    pub fn new(ocr_cmd: impl Into<String>, pdf_render_cmd: impl Into<String>) -> Self {
        Self {
            ocr_cmd: ocr_cmd.into(),
            pdf_render_cmd: pdf_render_cmd.into(),
        }
    }

    /// Extract text from one uploaded file. Always returns a text block:
    /// `--- Evidence from {name} ---\n{text}` on success, or
    /// `--- Could not extract text from {name} ---` on any failure.
    pub async fn extract(&self, data: &[u8], file_name: &str) -> String {
        match self.extract_inner(data, file_name).await {
            Ok(text) => format!("--- Evidence from {file_name} ---\n{text}"),
            Err(e) => {
                warn!("error extracting text from {file_name}: {e:#}");
                format!("--- Could not extract text from {file_name} ---")
            }
        }
    }

    async fn extract_inner(&self, data: &[u8], file_name: &str) -> Result<String> {
        let lower = file_name.to_lowercase();

        if lower.ends_with(".png") || lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
            self.extract_image(data).await
        } else if lower.ends_with(".pdf") {
            self.extract_pdf(data).await
        } else if lower.ends_with(".docx") {
            extract_docx(data)
        } else if lower.ends_with(".txt") {
            String::from_utf8(data.to_vec()).context("text file is not valid UTF-8")
        } else {
            // Allow-listed but unparseable kinds (.doc) get an empty body
            // under the normal header.
            Ok(String::new())
        }
    }

    /// Decode the upload as an image and OCR it.
    async fn extract_image(&self, data: &[u8]) -> Result<String> {
        let img = image::load_from_memory(data).context("failed to decode image")?;
        let dir = tempfile::tempdir().context("failed to create temp dir")?;
        let png_path = dir.path().join("evidence.png");
        img.save_with_format(&png_path, image::ImageFormat::Png)
            .context("failed to write temp image")?;
        self.ocr_file(&png_path).await
    }

    /// Rasterize every page of the PDF to an image and OCR each one.
    /// Per-page texts are separated by a blank line.
    async fn extract_pdf(&self, data: &[u8]) -> Result<String> {
        let doc = lopdf::Document::load_mem(data).context("failed to open PDF")?;
        let page_count = doc.get_pages().len() as u32;

        let dir = tempfile::tempdir().context("failed to create temp dir")?;
        let pdf_path = dir.path().join("evidence.pdf");
        std::fs::write(&pdf_path, data).context("failed to write temp PDF")?;

        let mut text = String::new();
        for page in 1..=page_count {
            let png_path = self.render_pdf_page(dir.path(), &pdf_path, page).await?;
            text.push_str(&self.ocr_file(&png_path).await?);
            text.push_str("\n\n");
        }
        Ok(text)
    }

    /// Render a single PDF page to PNG via the configured renderer
    /// (`pdftoppm -png -f N -l N -singlefile`).
    async fn render_pdf_page(&self, dir: &Path, pdf_path: &Path, page: u32) -> Result<PathBuf> {
        let prefix = dir.join(format!("page-{page}"));
        let out = tokio::process::Command::new(&self.pdf_render_cmd)
            .arg("-png")
            .args(["-f", &page.to_string(), "-l", &page.to_string()])
            .arg("-singlefile")
            .arg(pdf_path)
            .arg(&prefix)
            .output()
            .await
            .with_context(|| format!("failed to run {}", self.pdf_render_cmd))?;
        if !out.status.success() {
            bail!(
                "{} exited with {}: {}",
                self.pdf_render_cmd,
                out.status,
                String::from_utf8_lossy(&out.stderr).trim()
            );
        }
        Ok(prefix.with_extension("png"))
    }

    /// OCR an image file to plain text on stdout.
    async fn ocr_file(&self, path: &Path) -> Result<String> {
        let out = tokio::process::Command::new(&self.ocr_cmd)
            .arg(path)
            .arg("stdout")
            .output()
            .await
            .with_context(|| format!("failed to run {}", self.ocr_cmd))?;
        if !out.status.success() {
            bail!(
                "{} exited with {}: {}",
                self.ocr_cmd,
                out.status,
                String::from_utf8_lossy(&out.stderr).trim()
            );
        }
        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    }
}

/// Parse `word/document.xml` out of the DOCX zip and concatenate each
/// paragraph's text runs, one paragraph per line.
fn extract_docx(data: &[u8]) -> Result<String> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(data)).context("failed to open DOCX archive")?;
    let mut xml = Vec::new();
    archive
        .by_name("word/document.xml")
        .context("DOCX has no word/document.xml")?
        .read_to_end(&mut xml)
        .context("failed to read document.xml")?;

    let mut reader = Reader::from_reader(xml.as_slice());
    let mut buf = Vec::new();
    let mut text = String::new();
    let mut in_run_text = false;
    loop {
        match reader
            .read_event_into(&mut buf)
            .context("malformed document.xml")?
        {
            Event::Start(e) if e.local_name().as_ref() == b"t" => in_run_text = true,
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_run_text = false,
                b"p" => text.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_run_text => {
                text.push_str(&t.unescape().context("bad text run")?);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(text)
}
