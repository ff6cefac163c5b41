//! Shared wire-protocol DTOs for the client/gateway boundary.
//!
//! DESIGN
//! ======
//! Records ultimately come from the club backend, which has shipped several
//! shapes for the same field over time (numeric ids next to string ids,
//! cohorts as numbers or numeric strings, Korean award labels). Decoding is
//! deliberately lenient: odd values degrade to `None`/defaults instead of
//! failing the whole payload.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Uniform gateway reply envelope, mirroring the server side.
#[derive(Clone, Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Whether the request succeeded.
    #[serde(default)]
    pub success: bool,
    /// Payload, present on success (and sometimes on partial failures).
    #[serde(default)]
    pub data: Option<T>,
    /// Machine-oriented error slug, present on failure.
    #[serde(default)]
    pub error: Option<String>,
    /// Human-oriented detail, on either outcome.
    #[serde(default)]
    pub message: Option<String>,
}

/// Membership role. Unknown wire values decode as `Member`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    Member,
    Admin,
}

impl Role {
    fn from_wire(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("ADMIN") {
            Self::Admin
        } else {
            Self::Member
        }
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(value.as_str().map(Self::from_wire).unwrap_or_default())
    }
}

/// Account approval state. Unknown wire values decode as `Pending`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    fn from_wire(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("APPROVED") {
            Self::Approved
        } else if raw.eq_ignore_ascii_case("REJECTED") {
            Self::Rejected
        } else {
            Self::Pending
        }
    }
}

impl<'de> Deserialize<'de> for ApprovalStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(value.as_str().map(Self::from_wire).unwrap_or_default())
    }
}

/// Contest award tier for a project.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AwardTier {
    Grand,
    Excellence,
    Merit,
    Encouragement,
}

impl AwardTier {
    /// Decode an award label. Canonical names match case-insensitively; the
    /// legacy Korean labels from the old site are accepted as aliases.
    /// Anything else is `None`.
    pub fn from_wire(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("GRAND") || raw == "대상" {
            Some(Self::Grand)
        } else if raw.eq_ignore_ascii_case("EXCELLENCE") || raw == "최우수상" {
            Some(Self::Excellence)
        } else if raw.eq_ignore_ascii_case("MERIT") || raw == "우수상" {
            Some(Self::Merit)
        } else if raw.eq_ignore_ascii_case("ENCOURAGEMENT") || raw == "장려상" {
            Some(Self::Encouragement)
        } else {
            None
        }
    }
}

/// The current user's profile, cached in the session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Unique member identifier.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Contact email, if known.
    #[serde(default)]
    pub email: Option<String>,
    /// Membership role.
    #[serde(default)]
    pub role: Role,
    /// Club generation (e.g. 13 for the 13th cohort).
    #[serde(default, deserialize_with = "deserialize_lenient_u32")]
    pub cohort: Option<u32>,
    /// Account approval state.
    #[serde(default)]
    pub status: ApprovalStatus,
}

/// Successful login payload: bearer token plus the signed-in profile.
#[derive(Clone, Debug, Deserialize)]
pub struct LoginPayload {
    pub token: String,
    pub user: UserProfile,
}

/// Body for `POST /api/auth/register`.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cohort: Option<u32>,
}

/// An external link on a member profile (GitHub, blog, LinkedIn, ...).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberLink {
    /// Display label, if the backend sent one.
    pub label: Option<String>,
    pub url: String,
}

/// A member directory entry.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Unique member identifier.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Contact email, if published.
    #[serde(default)]
    pub email: Option<String>,
    /// School or affiliation.
    #[serde(default)]
    pub school: Option<String>,
    /// Club generation.
    #[serde(default, deserialize_with = "deserialize_lenient_u32")]
    pub cohort: Option<u32>,
    /// Membership role.
    #[serde(default)]
    pub role: Role,
    /// Account approval state.
    #[serde(default)]
    pub status: ApprovalStatus,
    /// Avatar URL under the current field name.
    #[serde(default)]
    pub profile_image: Option<String>,
    // Pre-rename records carry the avatar under "image". Kept as a separate
    // field because a serde alias would reject rows that send both.
    #[serde(default)]
    image: Option<String>,
    /// External links, in backend order.
    #[serde(default, deserialize_with = "deserialize_links")]
    pub links: Vec<MemberLink>,
}

impl Member {
    /// Avatar URL, preferring `profileImage` over the legacy `image` field.
    pub fn avatar_url(&self) -> Option<&str> {
        self.profile_image.as_deref().or(self.image.as_deref())
    }
}

/// A club project as listed on the projects page.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique project identifier.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Project title.
    #[serde(default)]
    pub title: String,
    /// Free-form category label.
    #[serde(default)]
    pub category: Option<String>,
    /// Longer description.
    #[serde(default)]
    pub description: Option<String>,
    /// Cohorts that worked on the project.
    #[serde(default, deserialize_with = "deserialize_cohorts")]
    pub cohorts: Vec<u32>,
    /// Contest award, if the project won one.
    #[serde(default, deserialize_with = "deserialize_award")]
    pub award: Option<AwardTier>,
    /// Thumbnail image URL.
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    /// Presentation file URL.
    #[serde(default)]
    pub presentation_url: Option<String>,
    /// Participating member names.
    #[serde(default)]
    pub members: Vec<String>,
    /// ISO 8601 start date.
    #[serde(default)]
    pub start_date: Option<String>,
    /// ISO 8601 end date.
    #[serde(default)]
    pub end_date: Option<String>,
    /// Storage key of the presentation file, used for deletes.
    #[serde(default)]
    pub file_key: Option<String>,
}

/// A file attached to a study session or assignment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachedFile {
    /// Display name; defaults to empty when the backend omits it.
    #[serde(default)]
    pub name: String,
    pub url: String,
}

/// A weekly study-session record.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    /// Unique session identifier.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Session title.
    #[serde(default)]
    pub title: String,
    /// Longer description.
    #[serde(default)]
    pub description: Option<String>,
    /// Week number within the semester.
    #[serde(default, deserialize_with = "deserialize_lenient_u32")]
    pub week: Option<u32>,
    /// Attached material files.
    #[serde(default)]
    pub files: Vec<AttachedFile>,
}

/// A weekly assignment record.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    /// Unique assignment identifier.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Assignment title.
    #[serde(default)]
    pub title: String,
    /// Longer description.
    #[serde(default)]
    pub description: Option<String>,
    /// Week number within the semester.
    #[serde(default, deserialize_with = "deserialize_lenient_u32")]
    pub week: Option<u32>,
    /// ISO 8601 due date.
    #[serde(default)]
    pub due_date: Option<String>,
    /// Where solutions are submitted, if the backend publishes one.
    #[serde(default)]
    pub submission_url: Option<String>,
    /// Attached handout files.
    #[serde(default)]
    pub files: Vec<AttachedFile>,
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

/// Cohorts and weeks have shipped as numbers and as numeric strings.
/// Anything else decodes as `None`.
fn parse_lenient_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn deserialize_lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_lenient_u32))
}

fn deserialize_cohorts<'de, D>(deserializer: D) -> Result<Vec<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Array(items)) = value else {
        return Ok(Vec::new());
    };
    Ok(items.iter().filter_map(parse_lenient_u32).collect())
}

fn deserialize_award<'de, D>(deserializer: D) -> Result<Option<AwardTier>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(Value::as_str)
        .and_then(AwardTier::from_wire))
}

fn deserialize_links<'de, D>(deserializer: D) -> Result<Vec<MemberLink>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Array(items)) = value else {
        return Ok(Vec::new());
    };
    Ok(items.iter().filter_map(link_from_value).collect())
}

// Links have shipped both as bare URL strings and as objects with a label
// under varying key names.
fn link_from_value(value: &Value) -> Option<MemberLink> {
    match value {
        Value::String(url) => Some(MemberLink {
            label: None,
            url: url.clone(),
        }),
        Value::Object(map) => {
            let url = map.get("url").and_then(Value::as_str)?.to_owned();
            let label = ["label", "type", "name"]
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_str))
                .map(str::to_owned);
            Some(MemberLink { label, url })
        }
        _ => None,
    }
}
