//! Normalization of fetched downloads for downstream indexing.
//!
//! PDFs pass through unchanged; HTML is stripped to plain text. Other
//! file types are deliberately skipped.

use std::path::Path;

use scraper::Html;
use serde::Serialize;
use tracing::{debug, warn};

use citegraph_core::Result;

/// Elements whose text content never survives normalization.
const STRIPPED_ELEMENTS: &[&str] = &["script", "style", "nav", "header", "footer"];

/// Counts from one normalization pass.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct NormalizeReport {
    /// PDFs copied unchanged.
    pub copied: usize,
    /// HTML files reduced to text.
    pub converted: usize,
    /// Files of unsupported types, skipped.
    pub skipped: usize,
}

/// Normalize every file in `raw_dir` into `clean_dir`.
///
/// `.pdf` files are copied as-is; `.html`/`.htm` files are written as
/// `<stem>.txt` with markup and boilerplate removed. Anything else is
/// silently skipped. Idempotent: existing outputs are overwritten.
pub fn normalize_dir(raw_dir: &Path, clean_dir: &Path) -> Result<NormalizeReport> {
    std::fs::create_dir_all(clean_dir)?;

    let mut report = NormalizeReport::default();
    for entry in std::fs::read_dir(raw_dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            report.skipped += 1;
            continue;
        };

        match ext.as_str() {
            "pdf" => {
                let file_name = path.file_name().unwrap_or_default();
                std::fs::copy(&path, clean_dir.join(file_name))?;
                report.copied += 1;
            }
            "html" | "htm" => {
                let html = match std::fs::read_to_string(&path) {
                    Ok(content) => content,
                    Err(e) => {
                        warn!("Skipping undecodable HTML {}: {}", path.display(), e);
                        report.skipped += 1;
                        continue;
                    }
                };
                let text = html_to_text(&html);
                debug!("Extracted {} chars from {}", text.len(), path.display());
                std::fs::write(clean_dir.join(format!("{}.txt", stem)), text)?;
                report.converted += 1;
            }
            _ => {
                report.skipped += 1;
            }
        }
    }
    Ok(report)
}

/// Reduce an HTML document to a plain-text stream.
///
/// Text inside script, style, nav, header, and footer elements is dropped;
/// remaining text nodes are trimmed and joined with newlines, preserving
/// paragraph-like breaks.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut lines = Vec::new();
    for node in document.tree.root().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let stripped = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map(|element| STRIPPED_ELEMENTS.contains(&element.name()))
                .unwrap_or(false)
        });
        if stripped {
            continue;
        }
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            lines.push(trimmed.to_string());
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html>
<head><title>Report</title><style>body { color: red; }</style></head>
<body>
<nav>Home | About | Contact</nav>
<script>console.log("tracking");</script>
<h1>Findings</h1>
<p>First paragraph of the body.</p>
<p>Second paragraph.</p>
<footer>Copyright 2026</footer>
</body>
</html>"#;

    #[test]
    fn test_html_to_text_strips_boilerplate() {
        let text = html_to_text(PAGE);
        assert!(text.contains("Findings"));
        assert!(text.contains("First paragraph of the body."));
        assert!(text.contains("Second paragraph."));
        assert!(!text.contains("tracking"));
        assert!(!text.contains("Home | About"));
        assert!(!text.contains("Copyright"));
        assert!(!text.contains("color: red"));
    }

    #[test]
    fn test_html_to_text_preserves_paragraph_breaks() {
        let text = html_to_text(PAGE);
        let lines: Vec<&str> = text.lines().collect();
        let first = lines
            .iter()
            .position(|l| l.contains("First paragraph"))
            .unwrap();
        let second = lines
            .iter()
            .position(|l| l.contains("Second paragraph"))
            .unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_normalize_dir_handles_mixed_files() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("raw");
        let clean = dir.path().join("clean");
        std::fs::create_dir(&raw).unwrap();

        std::fs::write(raw.join("report.pdf"), b"%PDF-1.5 fake").unwrap();
        std::fs::write(raw.join("page.html"), PAGE).unwrap();
        std::fs::write(raw.join("data.csv"), b"a,b,c").unwrap();

        let report = normalize_dir(&raw, &clean).unwrap();
        assert_eq!(report.copied, 1);
        assert_eq!(report.converted, 1);
        assert_eq!(report.skipped, 1);

        assert_eq!(
            std::fs::read(clean.join("report.pdf")).unwrap(),
            b"%PDF-1.5 fake"
        );
        let text = std::fs::read_to_string(clean.join("page.txt")).unwrap();
        assert!(text.contains("First paragraph"));
        assert!(!text.contains("console.log"));
        assert!(!clean.join("data.csv").exists());
        assert!(!clean.join("data.txt").exists());
    }

    #[test]
    fn test_normalize_dir_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("raw");
        let clean = dir.path().join("clean");
        std::fs::create_dir(&raw).unwrap();
        std::fs::write(raw.join("page.htm"), PAGE).unwrap();

        normalize_dir(&raw, &clean).unwrap();
        let report = normalize_dir(&raw, &clean).unwrap();
        assert_eq!(report.converted, 1);
        assert_eq!(std::fs::read_dir(&clean).unwrap().count(), 1);
    }
}
