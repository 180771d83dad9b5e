//! CiteGraph PDF — hyperlink extraction from PDF link annotations.
//!
//! Walks each page's `/Annots` array and emits one entry per annotation
//! carrying an explicit `/URI` action. Links to internal document
//! locations (GoTo actions) are skipped.

use std::path::Path;

use lopdf::{Document, Object};
use tracing::debug;

use citegraph_core::{Error, Result};

/// A hyperlink found in a PDF, tagged with its 1-based page number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub page: u32,
    pub uri: String,
}

/// Extract all URI link annotations from a PDF, in page order.
///
/// An unreadable or unparseable file yields [`Error::DocumentRead`];
/// callers are expected to skip the file and continue their batch.
pub fn extract_links(path: &Path) -> Result<Vec<PageLink>> {
    let doc = Document::load(path)
        .map_err(|e| Error::DocumentRead(format!("{}: {}", path.display(), e)))?;

    let mut links = Vec::new();
    // get_pages returns a BTreeMap keyed by 1-based page number, so
    // iteration is already in page order.
    for (page_num, page_id) in doc.get_pages() {
        let page = match doc.get_dictionary(page_id) {
            Ok(dict) => dict,
            Err(_) => continue,
        };
        let annots = match page.get(b"Annots").ok().and_then(|obj| resolve(&doc, obj)) {
            Some(Object::Array(items)) => items,
            _ => continue,
        };
        for annot in annots {
            let Some(Object::Dictionary(dict)) = resolve(&doc, annot) else {
                continue;
            };
            if !name_is(dict.get(b"Subtype").ok(), b"Link") {
                continue;
            }
            let Some(Object::Dictionary(action)) =
                dict.get(b"A").ok().and_then(|obj| resolve(&doc, obj))
            else {
                continue;
            };
            if !name_is(action.get(b"S").ok(), b"URI") {
                continue;
            }
            if let Ok(Object::String(bytes, _)) = action.get(b"URI") {
                let uri = String::from_utf8_lossy(bytes).into_owned();
                if !uri.is_empty() {
                    links.push(PageLink {
                        page: page_num,
                        uri,
                    });
                }
            }
        }
    }

    debug!(
        "Extracted {} links from {}",
        links.len(),
        path.display()
    );
    Ok(links)
}

/// Follow a single level of indirection (references cannot be nested).
fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

fn name_is(obj: Option<&Object>, expected: &[u8]) -> bool {
    matches!(obj, Some(Object::Name(name)) if name.as_slice() == expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Stream};
    use std::path::PathBuf;

    /// Build a PDF where each entry of `pages` is the list of (uri, internal)
    /// annotations for that page; `internal` annotations carry a GoTo action
    /// instead of a URI.
    fn build_pdf(dir: &Path, pages: &[Vec<(&str, bool)>]) -> PathBuf {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut kids = Vec::new();
        for annotations in pages {
            let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
            let mut annot_refs = Vec::new();
            for (uri, internal) in annotations {
                let action = if *internal {
                    dictionary! { "S" => "GoTo", "D" => Object::string_literal("page-2") }
                } else {
                    dictionary! { "S" => "URI", "URI" => Object::string_literal(*uri) }
                };
                let annot_id = doc.add_object(dictionary! {
                    "Type" => "Annot",
                    "Subtype" => "Link",
                    "Rect" => vec![0.into(), 0.into(), 100.into(), 20.into()],
                    "A" => action,
                });
                annot_refs.push(Object::Reference(annot_id));
            }
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Annots" => annot_refs,
            });
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let path = dir.join("test.pdf");
        doc.save(&path).unwrap();
        path
    }

    #[test]
    fn test_extracts_uri_links_in_page_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = build_pdf(
            dir.path(),
            &[
                vec![("https://example.com/a", false)],
                vec![],
                vec![("https://example.com/b", false)],
            ],
        );

        let links = extract_links(&path).unwrap();
        assert_eq!(
            links,
            vec![
                PageLink {
                    page: 1,
                    uri: "https://example.com/a".to_string()
                },
                PageLink {
                    page: 3,
                    uri: "https://example.com/b".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_skips_internal_goto_links() {
        let dir = tempfile::tempdir().unwrap();
        let path = build_pdf(
            dir.path(),
            &[vec![("https://example.com/a", false), ("", true)]],
        );

        let links = extract_links(&path).unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].uri, "https://example.com/a");
    }

    #[test]
    fn test_same_url_on_same_page_emits_both_annotations() {
        let dir = tempfile::tempdir().unwrap();
        let path = build_pdf(
            dir.path(),
            &[vec![
                ("https://example.com/a", false),
                ("https://example.com/a", false),
            ]],
        );

        let links = extract_links(&path).unwrap();
        assert_eq!(links.len(), 2);
        assert!(links.iter().all(|l| l.page == 1));
    }

    #[test]
    fn test_unreadable_file_is_document_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"not a pdf at all").unwrap();

        match extract_links(&path) {
            Err(Error::DocumentRead(_)) => {}
            other => panic!("expected DocumentRead error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_document_read_error() {
        let result = extract_links(Path::new("/nonexistent/missing.pdf"));
        assert!(matches!(result, Err(Error::DocumentRead(_))));
    }

    #[test]
    fn test_pdf_without_annotations_yields_no_links() {
        let dir = tempfile::tempdir().unwrap();
        let path = build_pdf(dir.path(), &[vec![], vec![]]);
        assert!(extract_links(&path).unwrap().is_empty());
    }
}
