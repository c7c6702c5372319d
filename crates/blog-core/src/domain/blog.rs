use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Current time at the precision the store keeps (microseconds).
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Opaque post identifier, rendered as a hyphenated UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlogId(Uuid);

impl BlogId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for BlogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for BlogId {
    type Err = DomainError;

    /// Only the 36-character hyphenated form is accepted; braced, URN and
    /// unhyphenated spellings are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 36 {
            return Err(DomainError::BadInput("invalid id".to_string()));
        }
        Uuid::try_parse(s)
            .map(Self)
            .map_err(|_| DomainError::BadInput("invalid id".to_string()))
    }
}

/// Post entity - a blog post as persisted in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub id: BlogId,
    pub title: String,
    pub content: String,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Blog {
    /// Create a new post from caller input.
    ///
    /// The id and both timestamps are always assigned here; whatever the
    /// caller sent for them never reaches the draft.
    pub fn from_draft(draft: BlogDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: BlogId::generate(),
            title: draft.title,
            content: draft.content,
            category: Some(draft.category).filter(|c| !c.is_empty()),
            tags: draft.tags,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Caller-supplied post fields, used as the body of both create and update.
///
/// Missing or `null` string fields decode as empty, which the update path
/// reads as "not supplied". `tags` keeps the distinction between absent and
/// `[]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogDraft {
    #[serde(deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub content: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub category: String,
    pub tags: Option<Vec<String>>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_round_trips_display() {
        let id = BlogId::generate();
        let parsed: BlogId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_parse_id_rejects_garbage() {
        let err = "not-an-id".parse::<BlogId>().unwrap_err();
        assert!(matches!(err, DomainError::BadInput(_)));

        let err = "".parse::<BlogId>().unwrap_err();
        assert!(matches!(err, DomainError::BadInput(_)));
    }

    #[test]
    fn test_parse_id_accepts_only_hyphenated_form() {
        let id = "3f1e6f0a-5a47-4c42-9a8b-0c8d0b0b1f11";
        assert_eq!(id.parse::<BlogId>().unwrap().to_string(), id);

        for variant in [
            " 3f1e6f0a-5a47-4c42-9a8b-0c8d0b0b1f11 ",
            "{3f1e6f0a-5a47-4c42-9a8b-0c8d0b0b1f11}",
            "urn:uuid:3f1e6f0a-5a47-4c42-9a8b-0c8d0b0b1f11",
            "3f1e6f0a5a474c429a8b0c8d0b0b1f11",
        ] {
            let err = variant.parse::<BlogId>().unwrap_err();
            assert!(matches!(err, DomainError::BadInput(_)), "{variant}");
        }
    }

    #[test]
    fn test_draft_ignores_caller_id_and_timestamps() {
        let body = r#"{
            "id": "3f1e6f0a-5a47-4c42-9a8b-0c8d0b0b1f11",
            "title": "Hi",
            "content": "World",
            "createdAt": "2001-01-01T00:00:00Z"
        }"#;
        let draft: BlogDraft = serde_json::from_str(body).unwrap();
        let now = timestamp_now();
        let blog = Blog::from_draft(draft, now);

        assert_ne!(blog.id.to_string(), "3f1e6f0a-5a47-4c42-9a8b-0c8d0b0b1f11");
        assert_eq!(blog.created_at, now);
        assert_eq!(blog.updated_at, now);
        assert_eq!(blog.category, None);
        assert_eq!(blog.tags, None);
    }

    #[test]
    fn test_draft_keeps_empty_tags_distinct_from_absent() {
        let with_empty: BlogDraft = serde_json::from_str(r#"{"tags": []}"#).unwrap();
        assert_eq!(with_empty.tags, Some(vec![]));

        let absent: BlogDraft = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.tags, None);
    }

    #[test]
    fn test_draft_reads_null_as_not_supplied() {
        let body = r#"{"title": null, "content": "World", "category": null, "tags": null}"#;
        let draft: BlogDraft = serde_json::from_str(body).unwrap();

        assert_eq!(draft.title, "");
        assert_eq!(draft.content, "World");
        assert_eq!(draft.category, "");
        assert_eq!(draft.tags, None);
    }

    #[test]
    fn test_blog_serializes_camel_case() {
        let blog = Blog::from_draft(
            BlogDraft {
                title: "Hi".into(),
                content: "World".into(),
                ..Default::default()
            },
            timestamp_now(),
        );
        let value = serde_json::to_value(&blog).unwrap();

        assert_eq!(value["id"], blog.id.to_string());
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
        assert!(value.get("created_at").is_none());
    }
}
