use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;

pub type Id = i64;

/// Idea category: a web application concept or an automation workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum TipoIdea {
    #[serde(rename = "web_app")]
    WebApp,
    #[serde(rename = "workflow_n8n")]
    WorkflowN8n,
}

impl TipoIdea {
    pub fn as_str(self) -> &'static str {
        match self {
            TipoIdea::WebApp => "web_app",
            TipoIdea::WorkflowN8n => "workflow_n8n",
        }
    }

    /// Exact-literal match; anything else is "unset".
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "web_app" => Some(TipoIdea::WebApp),
            "workflow_n8n" => Some(TipoIdea::WorkflowN8n),
            _ => None,
        }
    }
}

/// Content format of the post an idea turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum TipoPost {
    #[serde(rename = "video")]
    Video,
    #[serde(rename = "imagen")]
    Imagen,
}

impl TipoPost {
    pub fn as_str(self) -> &'static str {
        match self {
            TipoPost::Video => "video",
            TipoPost::Imagen => "imagen",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "video" => Some(TipoPost::Video),
            "imagen" => Some(TipoPost::Imagen),
            _ => None,
        }
    }
}

/// Triage state. Travels as the integer code 1..=4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum IdeaStatus {
    #[default]
    Pending,
    Progress,
    Posting,
    Rejected,
}

impl IdeaStatus {
    pub const ALL: [IdeaStatus; 4] = [
        IdeaStatus::Pending,
        IdeaStatus::Progress,
        IdeaStatus::Posting,
        IdeaStatus::Rejected,
    ];

    pub fn code(self) -> u8 {
        match self {
            IdeaStatus::Pending => 1,
            IdeaStatus::Progress => 2,
            IdeaStatus::Posting => 3,
            IdeaStatus::Rejected => 4,
        }
    }

    /// Strict conversion used on writes.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(IdeaStatus::Pending),
            2 => Some(IdeaStatus::Progress),
            3 => Some(IdeaStatus::Posting),
            4 => Some(IdeaStatus::Rejected),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            IdeaStatus::Pending => "Pending",
            IdeaStatus::Progress => "Progress",
            IdeaStatus::Posting => "Posting",
            IdeaStatus::Rejected => "Rejected",
        }
    }

    pub fn badge_variant(self) -> &'static str {
        match self {
            IdeaStatus::Pending => "pending",
            IdeaStatus::Progress => "progress",
            IdeaStatus::Posting => "posting",
            IdeaStatus::Rejected => "rejected",
        }
    }
}

impl Serialize for IdeaStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for IdeaStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = i64::deserialize(deserializer)?;
        IdeaStatus::from_code(code).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid status {code}: must be 1, 2, 3 or 4"))
        })
    }
}

/// Canonical record as served by the API and consumed by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Idea {
    pub id: Id,
    #[schema(value_type = String, format = Date, example = "2024-05-01")]
    pub fecha: NaiveDate,
    pub nicho: String,
    pub body: String,
    pub tipo_idea: Option<TipoIdea>,
    pub tipo_post: Option<TipoPost>,
    pub guion: Option<String>,
    pub idea: String,
    #[schema(value_type = u8, minimum = 1, maximum = 4)]
    pub status: IdeaStatus,
    pub web_app_prompt: Option<String>,
    pub db_structure: Option<String>,
    pub redes_sociales: Vec<String>,
    pub images_prompt: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// One row of `ideas_social_content` exactly as stored. List columns are read
/// as JSON: a string (JSON array literal or legacy delimited text) or an
/// array when the column is `text[]`/`jsonb`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct IdeaRow {
    pub id: Id,
    pub fecha: NaiveDate,
    pub nicho: String,
    pub body: String,
    pub tipo_idea: Option<String>,
    pub tipo_post: Option<String>,
    pub guion: Option<String>,
    pub idea: String,
    pub status: Option<i32>,
    pub web_app_prompt: Option<String>,
    pub db_structure: Option<String>,
    #[serde(default)]
    pub redes_sociales: Option<serde_json::Value>,
    #[serde(default)]
    pub images_prompt: Option<serde_json::Value>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewIdea {
    #[serde(with = "wire_date")]
    #[schema(value_type = String, format = Date, example = "2024-05-01")]
    pub fecha: NaiveDate,
    pub nicho: String,
    pub body: String,
    #[serde(default)]
    pub tipo_idea: Option<TipoIdea>,
    #[serde(default)]
    pub tipo_post: Option<TipoPost>,
    #[serde(default)]
    pub guion: Option<String>,
    pub idea: String,
    #[serde(default)]
    #[schema(value_type = Option<u8>, minimum = 1, maximum = 4)]
    pub status: Option<IdeaStatus>,
    #[serde(default)]
    pub web_app_prompt: Option<String>,
    #[serde(default)]
    pub db_structure: Option<String>,
    #[serde(default)]
    pub redes_sociales: Vec<String>,
    #[serde(default)]
    pub images_prompt: Vec<String>,
}

/// Partial update. Absent fields stay untouched; for nullable columns an
/// explicit `null` clears the value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateIdea {
    #[serde(default, with = "wire_date::option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, format = Date)]
    pub fecha: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nicho: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, deserialize_with = "explicit_null", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<TipoIdea>)]
    pub tipo_idea: Option<Option<TipoIdea>>,
    #[serde(default, deserialize_with = "explicit_null", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<TipoPost>)]
    pub tipo_post: Option<Option<TipoPost>>,
    #[serde(default, deserialize_with = "explicit_null", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub guion: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idea: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<u8>, minimum = 1, maximum = 4)]
    pub status: Option<IdeaStatus>,
    #[serde(default, deserialize_with = "explicit_null", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub web_app_prompt: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit_null", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub db_structure: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redes_sociales: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images_prompt: Option<Vec<String>>,
}

/// Body of `PATCH /ideas/{id}/status`. Kept loose so the handler can reject
/// bad values with its own message.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusUpdate {
    #[serde(default)]
    #[schema(value_type = u8, minimum = 1, maximum = 4)]
    pub status: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
}

// `Some(None)` for an explicit null, `None` (via `default`) when the key is absent.
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// `fecha` on writes: `YYYY-MM-DD`, or a full RFC 3339 timestamp whose date
/// part is kept. Always written back as `YYYY-MM-DD`.
pub mod wire_date {
    use chrono::{DateTime, NaiveDate};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn parse(value: &str) -> Option<NaiveDate> {
        let value = value.trim();
        NaiveDate::parse_from_str(value, FORMAT)
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
    }

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date '{raw}'")))
    }

    pub mod option {
        use chrono::NaiveDate;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
            match date {
                Some(d) => super::serialize(d, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                None => Ok(None),
                Some(raw) if raw.trim().is_empty() => Ok(None),
                Some(raw) => super::parse(&raw)
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{raw}'"))),
            }
        }
    }
}
