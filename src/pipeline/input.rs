//! Request input: read a card request from a file or stdin and parse it.
//!
//! Tool-call arguments produced by language models are not always clean
//! JSON objects. Two shapes are tolerated:
//!
//! - the JSON wrapped in Markdown fences (```` ```json … ``` ````), and
//! - the object delivered as a JSON *string* containing the JSON text.
//!
//! Anything else that fails to parse is an [`CardError::InvalidRequest`].

use crate::deck::CardRequest;
use crate::error::CardError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::Read;
use std::path::PathBuf;
use tracing::debug;

/// Input argument meaning "read from stdin".
pub const STDIN_INPUT: &str = "-";

static RE_CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```(?:json)?\s*([\s\S]*?)\s*```").unwrap());

/// Remove Markdown code fences around JSON and trim the result.
pub fn strip_code_fences(input: &str) -> String {
    RE_CODE_FENCE.replace_all(input, "$1").trim().to_string()
}

/// Parse request text into a [`CardRequest`].
pub fn parse_request(text: &str) -> Result<CardRequest, CardError> {
    let cleaned = strip_code_fences(text);
    let value: serde_json::Value =
        serde_json::from_str(&cleaned).map_err(|e| invalid("invalid JSON", e))?;

    let value = match value {
        serde_json::Value::String(inner) => {
            debug!("Request arrived as a JSON string, parsing its contents");
            serde_json::from_str(&strip_code_fences(&inner))
                .map_err(|e| invalid("invalid JSON in string arguments", e))?
        }
        other => other,
    };

    serde_json::from_value(value).map_err(|e| invalid("malformed card request", e))
}

/// Read and parse a request from a file path, or stdin for `-`.
pub fn load_request(input: &str) -> Result<CardRequest, CardError> {
    let text = if input == STDIN_INPUT {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| CardError::InvalidRequest {
                reason: format!("failed to read stdin: {e}"),
            })?;
        buf
    } else {
        read_local(input)?
    };

    debug!("Loaded request ({} bytes)", text.len());
    parse_request(&text)
}

fn read_local(path_str: &str) -> Result<String, CardError> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(CardError::InputNotFound { path });
    }

    match std::fs::read(&path) {
        Ok(bytes) => String::from_utf8(bytes).map_err(|_| CardError::InvalidRequest {
            reason: format!("'{}' is not UTF-8 text", path.display()),
        }),
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(CardError::PermissionDenied { path })
        }
        Err(_) => Err(CardError::InputNotFound { path }),
    }
}

fn invalid(what: &str, e: serde_json::Error) -> CardError {
    CardError::InvalidRequest {
        reason: format!("{what}: {e}"),
    }
}
