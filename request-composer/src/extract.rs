//! JSON extraction from free-form model replies.
//!
//! Models routinely wrap JSON in markdown fences or pad it with commentary.
//! Extraction is a small pure pipeline (no UI, no network): fence stripping,
//! then a first-`{`/last-`}` window, then a parse attempt. No repair or
//! re-prompting happens here; an unparseable reply stays verbatim.

use serde_json::Value;

use crate::api_types::GeneratedBody;

/// Remove markdown code fences and BOM wrappers around a reply.
pub fn strip_code_fences(s: &str) -> String {
    s.replace("```json", "")
        .replace("```", "")
        .replace('\u{feff}', "")
        .trim()
        .to_string()
}

/// Locate the first plausible JSON object in a reply.
///
/// Deliberately tolerant: accepts `{...}` anywhere in the string after
/// fence stripping. Returns `None` when no object-shaped window exists.
pub fn extract_json_object(s: &str) -> Option<String> {
    let clean = strip_code_fences(s);
    let start = clean.find('{')?;
    let end = clean.rfind('}')?;
    if end < start {
        return None;
    }
    let candidate = &clean[start..=end];
    // Quick plausibility check before handing it to the parser.
    candidate.contains(':').then(|| candidate.to_string())
}

/// Outcome of presenting one raw model reply.
#[derive(Clone, Debug)]
pub struct Presented {
    /// Displayable body.
    pub body: GeneratedBody,
    /// Set when the reply fell back to raw text.
    pub note: Option<String>,
}

/// Turn a raw model reply into a displayable body.
///
/// A located, parseable object becomes [`GeneratedBody::Json`]. Anything
/// else keeps the reply verbatim as [`GeneratedBody::Raw`] with a note
/// explaining why.
pub fn present(raw: &str) -> Presented {
    match extract_json_object(raw) {
        Some(candidate) => match serde_json::from_str::<Value>(&candidate) {
            Ok(value) => Presented {
                body: GeneratedBody::Json(value),
                note: None,
            },
            Err(e) => Presented {
                body: GeneratedBody::Raw(raw.to_string()),
                note: Some(format!("reply looked like JSON but did not parse: {e}")),
            },
        },
        None => Presented {
            body: GeneratedBody::Raw(raw.to_string()),
            note: Some("no JSON object found in the reply".to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_object_is_extracted_exactly() {
        let raw = "```json\n{\"a\":1}\n```";
        assert_eq!(extract_json_object(raw).as_deref(), Some(r#"{"a":1}"#));
    }

    #[test]
    fn surrounding_commentary_is_dropped() {
        let raw = "Sure! Here is the request body you asked for:\n{\"name\": \"Fido\"}\nLet me know if you need more.";
        assert_eq!(
            extract_json_object(raw).as_deref(),
            Some(r#"{"name": "Fido"}"#)
        );
    }

    #[test]
    fn reply_without_an_object_yields_none() {
        assert!(extract_json_object("I could not find a matching operation.").is_none());
        assert!(extract_json_object("}{").is_none());
    }

    #[test]
    fn presented_json_keeps_the_stub_content_unmodified() {
        let p = present("```json\n{\"name\":\"Fido\",\"status\":\"available\"}\n```");
        assert!(p.note.is_none());
        match p.body {
            GeneratedBody::Json(v) => {
                assert_eq!(
                    serde_json::to_string(&v).unwrap(),
                    r#"{"name":"Fido","status":"available"}"#
                );
            }
            GeneratedBody::Raw(_) => panic!("expected parsed JSON"),
        }
    }

    #[test]
    fn non_json_reply_stays_verbatim_with_a_note() {
        let raw = "The spec has no such operation.";
        let p = present(raw);
        assert_eq!(p.note.as_deref(), Some("no JSON object found in the reply"));
        match p.body {
            GeneratedBody::Raw(text) => assert_eq!(text, raw),
            GeneratedBody::Json(_) => panic!("expected raw fallback"),
        }
    }

    #[test]
    fn object_window_that_fails_parsing_falls_back_with_a_parse_note() {
        let raw = "{this: is not json}";
        let p = present(raw);
        assert!(p.note.unwrap().starts_with("reply looked like JSON"));
        assert!(matches!(p.body, GeneratedBody::Raw(_)));
    }
}
