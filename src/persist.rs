//! Model files.
//!
//! A model file is a CBOR envelope `{ version, kind, model }`.
//! Loading decodes the envelope generically first, walks the migration table
//! up to [`CURRENT_VERSION`], and only then decodes the typed model.

use std::{collections::BTreeMap, fs, path::Path};

use serde::{Deserialize, Serialize};
use serde_cbor::Value;

use crate::error::{Error, Result};
use crate::model::{bm25::Bm25Model, boolean::BooleanModel, tfidf::TfIdfModel, Model, ModelKind, RetrievalModel};

/// Envelope version written by this build
pub const CURRENT_VERSION: u32 = 2;

type Migration = fn(&mut BTreeMap<Value, Value>) -> Result<()>;

/// (from version, step to from + 1)
const MIGRATIONS: &[(u32, Migration)] = &[(1, v1_to_v2)];

#[derive(Serialize, Deserialize)]
struct Envelope {
    version: u32,
    kind: ModelKind,
    model: Value,
}

/// Encode a model into envelope bytes
pub fn to_bytes(model: &Model) -> Result<Vec<u8>> {
    let state = match model {
        Model::Boolean(m) => serde_cbor::value::to_value(m)?,
        Model::TfIdf(m) => serde_cbor::value::to_value(m)?,
        Model::Bm25(m) => serde_cbor::value::to_value(m)?,
    };
    let envelope = Envelope {
        version: CURRENT_VERSION,
        kind: model.kind(),
        model: state,
    };
    Ok(serde_cbor::to_vec(&envelope)?)
}

/// Decode envelope bytes of any supported version
pub fn from_bytes(bytes: &[u8]) -> Result<Model> {
    let Value::Map(mut fields) = serde_cbor::from_slice::<Value>(bytes)? else {
        return Err(Error::Migration("model file is not a CBOR map".to_string()));
    };

    let mut version = read_version(&fields)?;
    if version > CURRENT_VERSION {
        return Err(Error::UnsupportedVersion {
            found: version,
            supported: CURRENT_VERSION,
        });
    }
    while version < CURRENT_VERSION {
        let Some((_, step)) = MIGRATIONS.iter().find(|(from, _)| *from == version) else {
            return Err(Error::Migration(format!("no migration from version {version}")));
        };
        step(&mut fields)?;
        version += 1;
        fields.insert(key("version"), Value::Integer(version as i128));
        tracing::debug!(version, "model envelope migrated");
    }

    let envelope: Envelope = serde_cbor::value::from_value(Value::Map(fields))?;
    let model = match envelope.kind {
        ModelKind::Boolean => {
            let boolean: BooleanModel = serde_cbor::value::from_value(envelope.model)?;
            boolean.validate()?;
            Model::Boolean(boolean)
        }
        ModelKind::TfIdf => {
            let tfidf: TfIdfModel = serde_cbor::value::from_value(envelope.model)?;
            tfidf.validate()?;
            Model::TfIdf(tfidf)
        }
        ModelKind::Bm25 => {
            let bm25: Bm25Model = serde_cbor::value::from_value(envelope.model)?;
            bm25.validate()?;
            Model::Bm25(bm25)
        }
    };
    Ok(model)
}

/// Write `model` to `path`
pub fn save(model: &Model, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let bytes = to_bytes(model)?;
    fs::write(path, &bytes).map_err(|e| Error::io(path, e))?;
    tracing::info!(path = %path.display(), kind = %model.kind(), bytes = bytes.len(), "model saved");
    Ok(())
}

/// Read a model written by [`save`] or by an older version of it
pub fn load(path: impl AsRef<Path>) -> Result<Model> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    let model = from_bytes(&bytes)?;
    tracing::info!(
        path = %path.display(),
        kind = %model.kind(),
        documents = model.num_documents(),
        "model loaded"
    );
    Ok(model)
}

fn key(name: &str) -> Value {
    Value::Text(name.to_string())
}

fn read_version(fields: &BTreeMap<Value, Value>) -> Result<u32> {
    match fields.get(&key("version")) {
        Some(Value::Integer(v)) => {
            u32::try_from(*v).map_err(|_| Error::Migration(format!("invalid envelope version {v}")))
        }
        Some(_) => Err(Error::Migration("envelope version is not an integer".to_string())),
        None => Err(Error::Migration("envelope has no version".to_string())),
    }
}

/// v1 tagged the model with `type`, and called the boolean model `binary`
fn v1_to_v2(fields: &mut BTreeMap<Value, Value>) -> Result<()> {
    let tag = fields
        .remove(&key("type"))
        .ok_or_else(|| Error::Migration("v1 envelope has no type field".to_string()))?;
    let kind = match tag {
        Value::Text(name) if name == "binary" => key("boolean"),
        Value::Text(name) => Value::Text(name),
        _ => return Err(Error::Migration("v1 type field is not a string".to_string())),
    };
    fields.insert(key("kind"), kind);
    Ok(())
}
