//! Plain-text rendering of results and documents for the terminal.

use crate::model::scoring::RankedResult;
use crate::store::{DocumentStore, InMemoryStore};

const SEPARATOR_WIDTH: usize = 60;
/// characters of document text shown in a document view
pub const DOCUMENT_PREVIEW_CHARS: usize = 200;

/// One line per result, in rank order
pub fn format_hits(result: &RankedResult) -> Vec<String> {
    match result {
        RankedResult::Ids(ids) => ids.iter().map(|id| format!("Doc {id}")).collect(),
        RankedResult::Scored(hits) => hits
            .iter()
            .map(|hit| format!("Doc {} — score: {:.4}", hit.doc_id, hit.score))
            .collect(),
    }
}

/// Result lines followed by a short preview of each document
pub fn format_hits_with_preview(result: &RankedResult, store: &InMemoryStore, max_chars: usize) -> Vec<String> {
    format_hits(result)
        .into_iter()
        .zip(result.ids())
        .map(|(line, id)| match store.preview(id, max_chars) {
            Some(preview) => format!("{line} | {}", single_line(&preview)),
            None => line,
        })
        .collect()
}

/// Framed view of one document, `None` for an unknown id.
///
/// Documents with fields show one `[key]: value` line per non-empty field,
/// plain documents show their text. Values are cut to [`DOCUMENT_PREVIEW_CHARS`].
pub fn format_document<D>(store: &D, id: usize) -> Option<Vec<String>>
where
    D: DocumentStore + ?Sized,
{
    let text = store.get_document_text(id)?;
    let separator = "=".repeat(SEPARATOR_WIDTH);
    let mut lines = vec![separator.clone(), format!("Document {id}"), separator.clone()];
    match store.get_document_fields(id).filter(|fields| !fields.is_empty()) {
        Some(fields) => lines.extend(
            fields
                .iter()
                .filter(|(_, value)| !value.trim().is_empty())
                .map(|(key, value)| format!("[{key}]: {}", clip(value))),
        ),
        None => lines.push(clip(text)),
    }
    lines.push(separator);
    Some(lines)
}

fn clip(text: &str) -> String {
    let mut body = single_line(text);
    if let Some((cut, _)) = body.char_indices().nth(DOCUMENT_PREVIEW_CHARS) {
        body.truncate(cut);
        body.push_str("...");
    }
    body
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::scoring::Hit;

    #[test]
    fn id_only_lines() {
        assert_eq!(format_hits(&RankedResult::Ids(vec![3, 7])), vec!["Doc 3", "Doc 7"]);
    }

    #[test]
    fn scored_lines_have_four_decimals() {
        let result = RankedResult::Scored(vec![Hit::new(2, 0.123456), Hit::new(0, 1.0)]);
        assert_eq!(
            format_hits(&result),
            vec!["Doc 2 — score: 0.1235", "Doc 0 — score: 1.0000"]
        );
    }

    #[test]
    fn preview_is_appended() {
        let store: InMemoryStore = ["first\ndocument text", "second"].into_iter().collect();
        let lines = format_hits_with_preview(&RankedResult::Ids(vec![0, 1]), &store, 8);
        assert_eq!(lines, vec!["Doc 0 | first do...", "Doc 1 | second"]);
    }

    #[test]
    fn document_view_is_framed() {
        let store: InMemoryStore = ["  What   is\n diabetes?  "].into_iter().collect();
        let lines = format_document(&store, 0).unwrap();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "=".repeat(60));
        assert_eq!(lines[1], "Document 0");
        assert_eq!(lines[3], "What is diabetes?");
        assert!(format_document(&store, 1).is_none());
    }

    #[test]
    fn record_fields_are_listed() {
        let raw = r#"[{"question": "What is diabetes?", "answer": "A   chronic\n disease.", "source": ""}]"#;
        let store = InMemoryStore::from_json_str(raw, "answer").unwrap();
        let lines = format_document(&store, 0).unwrap();
        assert_eq!(
            &lines[3..],
            &[
                "[question]: What is diabetes?".to_string(),
                "[answer]: A chronic disease.".to_string(),
                "=".repeat(60),
            ]
        );
    }

    #[test]
    fn long_documents_are_cut() {
        let store: InMemoryStore = ["a".repeat(500)].into_iter().collect();
        let lines = format_document(&store, 0).unwrap();
        assert_eq!(lines[3].len(), DOCUMENT_PREVIEW_CHARS + 3);
    }
}
