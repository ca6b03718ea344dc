//! Lenient conversion of stored rows and raw API payloads into [`Idea`].
//!
//! Nothing here fails: unknown categories become `None`, out-of-range status
//! codes become [`IdeaStatus::Pending`] and list columns always decode to a
//! (possibly empty) `Vec`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::models::{wire_date, Id, Idea, IdeaRow, IdeaStatus, TipoIdea, TipoPost};

const LIST_DELIMITERS: [char; 3] = [',', '|', '\n'];

/// Decode a TEXT list column: JSON array literal first, then comma / pipe /
/// newline separated values.
pub fn decode_list(input: Option<&str>) -> Vec<String> {
    let raw = input.unwrap_or_default().trim();
    if raw.is_empty() {
        return Vec::new();
    }

    if raw.starts_with('[') && raw.ends_with(']') {
        if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(raw) {
            return clean(items.iter().map(element_string));
        }
    }

    clean(raw.split(LIST_DELIMITERS).map(str::to_string))
}

/// Same rules for a list that arrives as JSON: arrays are taken element-wise,
/// strings go through [`decode_list`], `null` is empty.
pub fn decode_list_value(value: &Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => clean(items.iter().map(element_string)),
        Value::String(s) => decode_list(Some(s.as_str())),
        other => decode_list(Some(other.to_string().as_str())),
    }
}

fn decode_list_column(value: Option<&Value>) -> Vec<String> {
    value.map(decode_list_value).unwrap_or_default()
}

/// Encoding used for every new write of a list column.
pub fn encode_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| String::from("[]"))
}

pub fn normalize_status(code: Option<i64>) -> IdeaStatus {
    code.and_then(IdeaStatus::from_code).unwrap_or_default()
}

/// Numeric coercion of a loosely typed status: numbers and numeric strings
/// count when they are exactly 1..=4.
pub fn normalize_status_value(value: &Value) -> IdeaStatus {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|n| n.fract() == 0.0)
        .and_then(|n| IdeaStatus::from_code(n as i64))
        .unwrap_or_default()
}

pub fn normalize_tipo_idea(value: Option<&str>) -> Option<TipoIdea> {
    value.and_then(TipoIdea::parse)
}

pub fn normalize_tipo_post(value: Option<&str>) -> Option<TipoPost> {
    value.and_then(TipoPost::parse)
}

impl From<IdeaRow> for Idea {
    fn from(row: IdeaRow) -> Self {
        Idea {
            id: row.id,
            fecha: row.fecha,
            tipo_idea: normalize_tipo_idea(row.tipo_idea.as_deref()),
            tipo_post: normalize_tipo_post(row.tipo_post.as_deref()),
            status: normalize_status(row.status.map(i64::from)),
            redes_sociales: decode_list_column(row.redes_sociales.as_ref()),
            images_prompt: decode_list_column(row.images_prompt.as_ref()),
            nicho: row.nicho,
            body: row.body,
            guion: row.guion,
            idea: row.idea,
            web_app_prompt: row.web_app_prompt,
            db_structure: row.db_structure,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// An idea as received over HTTP, before normalisation. Categorical, status
/// and list fields are kept as raw JSON so a sloppy server cannot break
/// decoding of the whole list.
#[derive(Debug, Clone, Deserialize)]
pub struct RawIdea {
    pub id: Id,
    #[serde(with = "wire_date")]
    pub fecha: NaiveDate,
    pub nicho: String,
    pub body: String,
    #[serde(default)]
    pub tipo_idea: Value,
    #[serde(default)]
    pub tipo_post: Value,
    #[serde(default)]
    pub guion: Option<String>,
    pub idea: String,
    #[serde(default)]
    pub status: Value,
    #[serde(default)]
    pub web_app_prompt: Option<String>,
    #[serde(default)]
    pub db_structure: Option<String>,
    #[serde(default)]
    pub redes_sociales: Value,
    #[serde(default)]
    pub images_prompt: Value,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<RawIdea> for Idea {
    fn from(raw: RawIdea) -> Self {
        Idea {
            id: raw.id,
            fecha: raw.fecha,
            tipo_idea: normalize_tipo_idea(raw.tipo_idea.as_str()),
            tipo_post: normalize_tipo_post(raw.tipo_post.as_str()),
            status: normalize_status_value(&raw.status),
            redes_sociales: decode_list_value(&raw.redes_sociales),
            images_prompt: decode_list_value(&raw.images_prompt),
            nicho: raw.nicho,
            body: raw.body,
            guion: raw.guion,
            idea: raw.idea,
            web_app_prompt: raw.web_app_prompt,
            db_structure: raw.db_structure,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
        }
    }
}

fn element_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn clean(items: impl Iterator<Item = String>) -> Vec<String> {
    items
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row() -> IdeaRow {
        IdeaRow {
            id: 1,
            fecha: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            nicho: "travel".into(),
            body: "body".into(),
            tipo_idea: None,
            tipo_post: None,
            guion: None,
            idea: "idea".into(),
            status: None,
            web_app_prompt: None,
            db_structure: None,
            redes_sociales: None,
            images_prompt: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn valid_status_codes_are_kept() {
        for status in IdeaStatus::ALL {
            let code = i64::from(status.code());
            assert_eq!(normalize_status(Some(code)), status);
            assert_eq!(normalize_status_value(&json!(code)), status);
        }
    }

    #[test]
    fn anything_else_is_pending() {
        for code in [0, 5, -1, 42, i64::MAX] {
            assert_eq!(normalize_status(Some(code)), IdeaStatus::Pending);
        }
        assert_eq!(normalize_status(None), IdeaStatus::Pending);
        for v in [json!(null), json!("abc"), json!(2.5), json!([]), json!({}), json!(""), json!(true)] {
            assert_eq!(normalize_status_value(&v), IdeaStatus::Pending, "{v}");
        }
    }

    #[test]
    fn numeric_strings_coerce() {
        assert_eq!(normalize_status_value(&json!(" 3 ")), IdeaStatus::Posting);
        assert_eq!(normalize_status_value(&json!("4.0")), IdeaStatus::Rejected);
        assert_eq!(normalize_status_value(&json!(2.0)), IdeaStatus::Progress);
    }

    #[test]
    fn categories_only_pass_exact_literals() {
        assert_eq!(normalize_tipo_idea(Some("web_app")), Some(TipoIdea::WebApp));
        assert_eq!(normalize_tipo_idea(Some("workflow_n8n")), Some(TipoIdea::WorkflowN8n));
        for junk in ["", "webapp", "WEB_APP", " web_app", "video"] {
            assert_eq!(normalize_tipo_idea(Some(junk)), None);
        }
        assert_eq!(normalize_tipo_post(Some("imagen")), Some(TipoPost::Imagen));
        assert_eq!(normalize_tipo_post(Some("image")), None);
        assert_eq!(normalize_tipo_post(None), None);
    }

    #[test]
    fn json_array_text_preserves_order() {
        let items = vec!["TikTok".to_string(), "Instagram".into(), "YouTube".into()];
        assert_eq!(decode_list(Some(encode_list(&items).as_str())), items);
    }

    #[test]
    fn delimited_text() {
        assert_eq!(decode_list(Some("A, B ,C")), ["A", "B", "C"]);
        assert_eq!(decode_list(Some("Instagram|TikTok")), ["Instagram", "TikTok"]);
        assert_eq!(decode_list(Some("one\ntwo,,three|")), ["one", "two", "three"]);
    }

    #[test]
    fn empty_inputs() {
        assert!(decode_list(None).is_empty());
        assert!(decode_list(Some("")).is_empty());
        assert!(decode_list(Some("  \n ")).is_empty());
        assert!(decode_list(Some("[]")).is_empty());
    }

    #[test]
    fn json_elements_are_stringified_trimmed_and_filtered() {
        assert_eq!(decode_list(Some(r#"[" a ", "", 3, true]"#)), ["a", "3", "true"]);
    }

    #[test]
    fn broken_or_non_array_json_falls_back_to_splitting() {
        assert_eq!(decode_list(Some("[Instagram, TikTok]")), ["[Instagram", "TikTok]"]);
        assert_eq!(decode_list(Some(r#"["a","b""#)), [r#"["a""#, r#""b""#]);
    }

    #[test]
    fn value_decoding() {
        assert!(decode_list_value(&json!(null)).is_empty());
        assert_eq!(decode_list_value(&json!(["x", " y "])), ["x", "y"]);
        assert_eq!(decode_list_value(&json!("x|y")), ["x", "y"]);
    }

    #[test]
    fn row_maps_leniently() {
        let mut r = row();
        r.tipo_idea = Some("workflow_n8n".into());
        r.tipo_post = Some("reel".into());
        r.status = Some(9);
        r.redes_sociales = Some("Instagram|TikTok".into());
        r.images_prompt = Some(r#"["sunset over dunes"]"#.into());
        let idea = Idea::from(r);
        assert_eq!(idea.tipo_idea, Some(TipoIdea::WorkflowN8n));
        assert_eq!(idea.tipo_post, None);
        assert_eq!(idea.status, IdeaStatus::Pending);
        assert_eq!(idea.redes_sociales, ["Instagram", "TikTok"]);
        assert_eq!(idea.images_prompt, ["sunset over dunes"]);
    }

    #[test]
    fn array_columns_map_element_wise() {
        let mut r = row();
        r.redes_sociales = Some(json!(["Instagram", " TikTok ", ""]));
        r.images_prompt = Some(json!(null));
        let idea = Idea::from(r);
        assert_eq!(idea.redes_sociales, ["Instagram", "TikTok"]);
        assert!(idea.images_prompt.is_empty());
    }

    #[test]
    fn raw_payload_maps_leniently() {
        let raw: RawIdea = serde_json::from_value(json!({
            "id": 5,
            "fecha": "2024-02-29T00:00:00.000Z",
            "nicho": "pets",
            "body": "b",
            "idea": "i",
            "tipo_idea": 3,
            "tipo_post": "video",
            "status": "2",
            "redes_sociales": null,
            "images_prompt": "a, b"
        }))
        .unwrap();
        let idea = Idea::from(raw);
        assert_eq!(idea.fecha, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(idea.tipo_idea, None);
        assert_eq!(idea.tipo_post, Some(TipoPost::Video));
        assert_eq!(idea.status, IdeaStatus::Progress);
        assert!(idea.redes_sociales.is_empty());
        assert_eq!(idea.images_prompt, ["a", "b"]);
        assert!(idea.created_at.is_none());
    }

    #[test]
    fn absent_lists_map_to_empty() {
        let idea = Idea::from(row());
        assert!(idea.redes_sociales.is_empty());
        assert!(idea.images_prompt.is_empty());
    }
}
