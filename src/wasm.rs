//! WebAssembly bindings for recycle bin artifact analysis.
//!
//! Each exported function accepts raw file bytes as `&[u8]` (via wasm-bindgen)
//! and returns a JSON string. These are thin wrappers over the same pure
//! decoders the CLI uses; `$RR` companion directories cannot be listed from
//! the browser, so `$I` results always have an empty `directory_files`.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::recyclebin::artifact::{Artifact, ArtifactKind, ArtifactRow};

fn to_js_err(e: crate::RbinError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_json<T: Serialize>(val: &T) -> Result<String, JsValue> {
    serde_json::to_string(val).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[derive(Serialize)]
struct Detection {
    kind: Option<ArtifactKind>,
    error: Option<String>,
}

#[derive(Serialize)]
struct Decoded {
    artifact: Artifact,
    rows: Vec<ArtifactRow>,
}

/// Identify the artifact family of `data`.
///
/// Returns a JSON object `{"kind": "$I" | "INFO2" | null, "error": string | null}`.
/// Never fails; unknown or empty input is described in `error`.
#[wasm_bindgen]
pub fn detect_artifact(data: &[u8]) -> String {
    let detection = match ArtifactKind::detect(data) {
        Ok(kind) => Detection {
            kind: Some(kind),
            error: None,
        },
        Err(e) => Detection {
            kind: None,
            error: Some(e.to_string()),
        },
    };
    serde_json::to_string(&detection).unwrap_or_else(|_| "{}".to_string())
}

/// Decode a `$I` or `INFO2` file.
///
/// Returns a JSON object with the decoded `artifact` (tagged by `type`) and
/// its flattened `rows`. Returns an error string if the bytes are not a
/// recognised or well-formed artifact.
#[wasm_bindgen]
pub fn decode_artifact(data: &[u8], source_name: &str) -> Result<String, JsValue> {
    let artifact = Artifact::decode(data, source_name).map_err(to_js_err)?;
    let rows = artifact.rows();
    to_json(&Decoded { artifact, rows })
}
