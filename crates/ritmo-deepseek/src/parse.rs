// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tolerant parsing of model output.
//!
//! Models asked for "JSON only" still wrap answers in Markdown fences or
//! prose often enough that strict parsing would throw away usable
//! responses. The strategy: parse as-is, then with fences stripped, then
//! the first balanced `{...}` object, and finally give up with an empty
//! object so callers fall through to their defaults.

use serde_json::Value;

/// Parses model output into a JSON value, never failing.
pub fn parse_model_json(s: &str) -> Value {
    if s.is_empty() {
        return Value::Object(Default::default());
    }
    if let Ok(v) = serde_json::from_str::<Value>(s) {
        return v;
    }
    let unfenced = strip_fences(s);
    if unfenced.trim() != s.trim() {
        if let Ok(v) = serde_json::from_str::<Value>(&unfenced) {
            return v;
        }
    }
    if let Some(extracted) = extract_first_json_object(&unfenced) {
        if let Ok(v) = serde_json::from_str::<Value>(extracted) {
            return v;
        }
    }
    Value::Object(Default::default())
}

/// Clamps a JSON number field to `[lo, hi]`, defaulting when absent or
/// not a finite number.
pub fn clamp_score(v: &Value, lo: u8, hi: u8, default: u8) -> u8 {
    match v.as_f64() {
        Some(n) if n.is_finite() => {
            let n = n.round();
            if n < lo as f64 {
                lo
            } else if n > hi as f64 {
                hi
            } else {
                n as u8
            }
        }
        _ => default,
    }
}

/// Extracts a string field truncated to `max` characters.
pub fn string_field(v: &Value, key: &str, max: usize) -> String {
    v.get(key)
        .and_then(Value::as_str)
        .map(|s| s.chars().take(max).collect())
        .unwrap_or_default()
}

fn strip_fences(s: &str) -> String {
    let mut t = s.trim();
    if let Some(rest) = t.strip_prefix("```") {
        t = rest
            .strip_prefix("json")
            .or_else(|| rest.strip_prefix("JSON"))
            .unwrap_or(rest)
            .trim_start();
        t = t.strip_suffix("```").unwrap_or(t);
    }
    t.replace("```", "")
}

/// Finds the first balanced `{...}` span, tracking strings and escapes
/// so braces inside string values do not confuse the depth count.
fn extract_first_json_object(s: &str) -> Option<&str> {
    let start = s.find('{')?;
    let bytes = s.as_bytes();
    let mut depth = 0usize;
    let mut in_str = false;
    let mut esc = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_str {
            if esc {
                esc = false;
            } else if b == b'\\' {
                esc = true;
            } else if b == b'"' {
                in_str = false;
            }
            continue;
        }
        match b {
            b'"' => in_str = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_json_parses() {
        let v = parse_model_json(r#"{"score":85,"rationale":"bien"}"#);
        assert_eq!(v["score"], 85);
    }

    #[test]
    fn fenced_json_parses() {
        let v = parse_model_json("```json\n{\"score\": 40}\n```");
        assert_eq!(v["score"], 40);
    }

    #[test]
    fn json_buried_in_prose_is_extracted() {
        let v = parse_model_json("Claro, aquí tienes: {\"code\":\"tech_debt\"} espero que sirva");
        assert_eq!(v["code"], "tech_debt");
    }

    #[test]
    fn braces_inside_strings_do_not_break_extraction() {
        let v = parse_model_json(r#"nota: {"advice":"usa {} con cuidado","score":70} fin"#);
        assert_eq!(v["score"], 70);
        assert_eq!(v["advice"], "usa {} con cuidado");
    }

    #[test]
    fn garbage_yields_empty_object() {
        let v = parse_model_json("no tengo una respuesta estructurada");
        assert!(v.as_object().is_some_and(|m| m.is_empty()));
        let v = parse_model_json("");
        assert!(v.as_object().is_some_and(|m| m.is_empty()));
    }

    #[test]
    fn clamp_score_bounds_and_default() {
        assert_eq!(clamp_score(&serde_json::json!(150), 0, 100, 60), 100);
        assert_eq!(clamp_score(&serde_json::json!(-5), 0, 100, 60), 0);
        assert_eq!(clamp_score(&serde_json::json!(87.6), 0, 100, 60), 88);
        assert_eq!(clamp_score(&Value::Null, 0, 100, 60), 60);
        assert_eq!(clamp_score(&serde_json::json!("alto"), 0, 100, 60), 60);
    }

    #[test]
    fn string_field_truncates() {
        let v = serde_json::json!({"rationale": "x".repeat(300)});
        assert_eq!(string_field(&v, "rationale", 200).len(), 200);
        assert_eq!(string_field(&v, "missing", 200), "");
    }
}
