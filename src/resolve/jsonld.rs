//! Molfile extraction from a substance page's JSON-LD block.

use regex::Regex;
use serde_json::Value;

use super::error::ResolveError;

#[derive(Debug, Clone)]
pub struct MolfilePage {
    script: Regex,
}

impl MolfilePage {
    pub fn new() -> Result<Self, ResolveError> {
        Ok(Self {
            script: Regex::new(r#"(?s)<script type="application/ld\+json">(.*?)</script>"#)?,
        })
    }

    /// The molfile carried by the first JSON-LD block of `html`.
    pub fn molfile(&self, html: &str) -> Result<String, ResolveError> {
        let block = self
            .script
            .captures(html)
            .and_then(|c| c.get(1))
            .ok_or(ResolveError::MissingJsonLd)?;
        let data: Value = parse_lenient(block.as_str()).map_err(ResolveError::JsonLd)?;
        let representation = data.get("hasRepresentation").ok_or(ResolveError::NoMolfile)?;
        if representation.get("name").and_then(Value::as_str) != Some("molfile") {
            return Err(ResolveError::NoMolfile);
        }
        representation
            .get("value")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(ResolveError::NoMolfile)
    }
}

/// Parse JSON that may carry raw control characters inside strings.
///
/// Molfiles are embedded with literal newlines, which strict JSON forbids.
pub fn parse_lenient(text: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(&escape_control_chars(text))
}

fn escape_control_chars(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;
    for c in text.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            } else if u32::from(c) < 0x20 {
                out.push_str(&format!("\\u{:04x}", u32::from(c)));
                continue;
            }
        } else if c == '"' {
            in_string = true;
        }
        out.push(c);
    }
    out
}
