//! Recovery of a JSON object from free-text model output.
//!
//! Generative models wrap the requested JSON in markdown fences, add prose
//! around it, and leave trailing commas behind. Recovery runs as a fixed
//! sequence of stages, each usable on its own:
//!
//! 1. [`strip_code_fence`] - keep only the body of the first fenced block
//!    that contains an object.
//! 2. [`find_object_start`] - locate the first `{`.
//! 3. [`balanced_object`] - walk forward tracking brace depth (ignoring
//!    braces inside string literals) to the matching `}`.
//! 4. [`normalize_trailing_commas`] - drop commas directly before `}` / `]`.
//! 5. Structural parse with `serde_json`.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;

/// Matches a fenced block with an optional language tag and captures its body.
static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```[A-Za-z0-9_-]*[ \t]*\r?\n?([\s\S]*?)```").expect("valid regex"));

/// Why a response could not be turned into structured data.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("no JSON object found in response")]
    NoObject,

    #[error("JSON object starting at byte {start} is never closed")]
    Unbalanced { start: usize },

    #[error("JSON parse failed after normalization: {0}")]
    Parse(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// Stage 1: return the body of the first fenced code block containing a
/// `{`, or the trimmed input unchanged when there is none.
pub fn strip_code_fence(text: &str) -> &str {
    FENCE_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|body| body.as_str().trim())
        .find(|body| body.contains('{'))
        .unwrap_or_else(|| text.trim())
}

/// Stage 2: byte offset of the first `{`.
pub fn find_object_start(text: &str) -> Option<usize> {
    text.find('{')
}

/// Stage 3: the slice from `start` through its balanced closing brace.
///
/// `start` must point at a `{`. Braces inside string literals (including
/// escaped quotes) do not affect the depth count.
pub fn balanced_object(text: &str, start: usize) -> Result<&str, ExtractError> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    let end = start + offset + ch.len_utf8();
                    return Ok(&text[start..end]);
                }
            }
            _ => {}
        }
    }

    Err(ExtractError::Unbalanced { start })
}

/// Stage 4: remove every comma whose next non-whitespace character is a
/// closing `}` or `]`. Commas inside string literals are left alone.
pub fn normalize_trailing_commas(json: &str) -> String {
    let chars: Vec<char> = json.chars().collect();
    let mut out = String::with_capacity(json.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &ch) in chars.iter().enumerate() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            out.push(ch);
            continue;
        }

        match ch {
            '"' => {
                in_string = true;
                out.push(ch);
            }
            ',' => {
                let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
                if !matches!(next, Some('}') | Some(']')) {
                    out.push(ch);
                }
            }
            _ => out.push(ch),
        }
    }

    out
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Run stages 1-4 and return the cleaned JSON text.
pub fn extract_json_text(raw: &str) -> Result<String, ExtractError> {
    let body = strip_code_fence(raw);
    let start = find_object_start(body).ok_or(ExtractError::NoObject)?;
    let object = balanced_object(body, start)?;
    Ok(normalize_trailing_commas(object))
}

/// Recover an untyped JSON value from model output.
pub fn recover_json(raw: &str) -> Result<serde_json::Value, ExtractError> {
    let text = extract_json_text(raw)?;
    Ok(serde_json::from_str(&text)?)
}

/// Recover and deserialize a typed value from model output.
pub fn recover_as<T: DeserializeOwned>(raw: &str) -> Result<T, ExtractError> {
    let text = extract_json_text(raw)?;
    Ok(serde_json::from_str(&text)?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
