//! Document text lookup by dense id.
//!
//! Ids are positions in ingestion order, the same positions the models use
//! as document ids after fitting on [`DocumentStore::texts`].
//! Documents loaded from structured sources (JSON objects, CSV rows) also keep
//! every string field of their record for display.

use std::{fs, io, path::Path};

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{Error, Result};

/// Read-only access to corpus texts.
pub trait DocumentStore {
    /// Number of documents
    fn len(&self) -> usize;

    /// Text of document `id`, `None` when out of range
    fn get_document_text(&self, id: usize) -> Option<&str>;

    /// Named string fields of document `id` in source order.
    /// Stores of plain texts have none.
    fn get_document_fields(&self, _id: usize) -> Option<&IndexMap<String, String>> {
        None
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every text in id order
    fn texts(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new((0..self.len()).map(move |id| self.get_document_text(id).unwrap_or_default()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Record {
    text: String,
    fields: IndexMap<String, String>,
}

impl From<String> for Record {
    fn from(text: String) -> Self {
        Self {
            text,
            fields: IndexMap::new(),
        }
    }
}

/// Documents held in memory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryStore {
    documents: Vec<Record>,
}

impl InMemoryStore {
    pub fn new(documents: Vec<String>) -> Self {
        Self {
            documents: documents.into_iter().map(Record::from).collect(),
        }
    }

    /// Append a document and return its id
    pub fn push(&mut self, text: impl Into<String>) -> usize {
        self.documents.push(Record::from(text.into()));
        self.documents.len() - 1
    }

    /// One document per regular file directly inside `dir`, ordered by file name.
    /// Unreadable files still take an id, with empty text.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut files: Vec<_> = fs::read_dir(dir)
            .map_err(|e| Error::io(dir, e))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        files.sort();

        let documents = files
            .iter()
            .map(|path| match fs::read_to_string(path) {
                Ok(text) => Record::from(text),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "unreadable corpus file, stored as empty");
                    Record::default()
                }
            })
            .collect::<Vec<_>>();
        tracing::info!(dir = %dir.display(), documents = documents.len(), "loaded corpus directory");
        Ok(Self { documents })
    }

    /// JSON array of strings or of objects carrying the text in `text_field`.
    ///
    /// Field lookup falls back to the capitalized name (`answer` -> `Answer`).
    /// Items without a string text become empty documents.
    /// String members of objects are kept as the document's fields.
    pub fn from_json(path: impl AsRef<Path>, text_field: &str) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let store = Self::from_json_str(&raw, text_field)?;
        tracing::info!(path = %path.display(), documents = store.len(), "loaded json corpus");
        Ok(store)
    }

    pub fn from_json_str(raw: &str, text_field: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)?;
        let Value::Array(items) = value else {
            return Err(Error::Corpus("json corpus must be an array".to_string()));
        };
        let capitalized = capitalize(text_field);
        let documents = items
            .iter()
            .map(|item| match item {
                Value::String(text) => Record::from(text.clone()),
                Value::Object(members) => {
                    let fields: IndexMap<String, String> = members
                        .iter()
                        .filter_map(|(key, value)| value.as_str().map(|text| (key.clone(), text.to_string())))
                        .collect();
                    let text = fields
                        .get(text_field)
                        .or_else(|| fields.get(&capitalized))
                        .cloned()
                        .unwrap_or_default();
                    Record { text, fields }
                }
                _ => Record::default(),
            })
            .collect();
        Ok(Self { documents })
    }

    /// CSV file with a header row, one document per record.
    ///
    /// The text comes from the `text_field` column, or its capitalized name
    /// (`answer` -> `Answer`). Every column is kept as a field.
    pub fn from_csv(path: impl AsRef<Path>, text_field: &str) -> Result<Self> {
        let path = path.as_ref();
        let file = fs::File::open(path).map_err(|e| Error::io(path, e))?;
        let store = Self::from_csv_reader(file, text_field)
            .map_err(|err| match err {
                Error::Corpus(msg) => Error::Corpus(format!("{}: {msg}", path.display())),
                other => other,
            })?;
        tracing::info!(path = %path.display(), documents = store.len(), "loaded csv corpus");
        Ok(store)
    }

    pub fn from_csv_reader<R: io::Read>(reader: R, text_field: &str) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(reader);
        let headers = reader.headers()?.clone();
        let capitalized = capitalize(text_field);
        let Some(text_column) = headers
            .iter()
            .position(|name| name == text_field)
            .or_else(|| headers.iter().position(|name| name == capitalized))
        else {
            return Err(Error::Corpus(format!("csv corpus has no `{text_field}` column")));
        };

        let mut documents = Vec::new();
        for row in reader.records() {
            let row = row?;
            let fields: IndexMap<String, String> = headers
                .iter()
                .zip(row.iter())
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect();
            documents.push(Record {
                text: row.get(text_column).unwrap_or_default().to_string(),
                fields,
            });
        }
        Ok(Self { documents })
    }

    /// Concatenate several sources, ids continue across them.
    /// Directories load with [`InMemoryStore::from_dir`], `.csv` files with
    /// [`InMemoryStore::from_csv`] and any other file as JSON.
    pub fn from_sources<P>(paths: &[P], text_field: &str) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let mut store = Self::default();
        for path in paths {
            let path = path.as_ref();
            let is_csv = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            let part = if path.is_dir() {
                Self::from_dir(path)?
            } else if is_csv {
                Self::from_csv(path, text_field)?
            } else {
                Self::from_json(path, text_field)?
            };
            store.documents.extend(part.documents);
        }
        Ok(store)
    }

    /// Text of `id` cut to `max_chars` characters, "..." appended when cut
    pub fn preview(&self, id: usize, max_chars: usize) -> Option<String> {
        let text = self.get_document_text(id)?;
        match text.char_indices().nth(max_chars) {
            Some((cut, _)) => Some(format!("{}...", &text[..cut])),
            None => Some(text.to_string()),
        }
    }
}

impl DocumentStore for InMemoryStore {
    fn len(&self) -> usize {
        self.documents.len()
    }

    fn get_document_text(&self, id: usize) -> Option<&str> {
        self.documents.get(id).map(|record| record.text.as_str())
    }

    fn get_document_fields(&self, id: usize) -> Option<&IndexMap<String, String>> {
        self.documents.get(id).map(|record| &record.fields)
    }
}

impl<S: Into<String>> FromIterator<S> for InMemoryStore {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

fn capitalize(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
