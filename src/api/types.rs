//! Registry wire types.
//!
//! The registry is an external service with a loose schema; only `name` is
//! required and everything else falls back to a default.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryPackage {
    pub name: String,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub owner: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub version: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub giturl: Option<String>,
    /// Older registry builds publish the clone URL as `source` or `url`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub download_count: u64,
    #[serde(default, deserialize_with = "string_or_list")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub license: Option<String>,
    #[serde(default, deserialize_with = "string_or_list")]
    pub dependencies: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub homepage: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub repository: Option<String>,
}

fn default_active() -> bool {
    true
}

impl RegistryPackage {
    /// First non-empty clone location: `giturl`, then `source`, then `url`.
    pub fn git_url(&self) -> Option<&str> {
        [&self.giturl, &self.source, &self.url]
            .into_iter()
            .filter_map(|v| v.as_deref())
            .map(str::trim)
            .find(|v| !v.is_empty())
    }

    pub fn version_or_unknown(&self) -> &str {
        self.version
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(crate::core::types::UNKNOWN_VERSION)
    }

    /// Case-insensitive substring match over name, description, owner and tags.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        let hit = |value: &str| value.to_lowercase().contains(&needle);

        hit(&self.name)
            || self.description.as_deref().is_some_and(hit)
            || self.owner.as_deref().is_some_and(hit)
            || self.tags.iter().any(|t| hit(t.as_str()))
    }
}

/// Payload for `POST /api/packages`.
#[derive(Debug, Clone, Serialize)]
pub struct NewPackage {
    pub name: String,
    pub owner: String,
    pub version: String,
    pub giturl: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Partial update for `PUT /api/packages/{name}`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PackageUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub giturl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PackageUpdate {
    pub fn is_empty(&self) -> bool {
        self.owner.is_none()
            && self.version.is_none()
            && self.giturl.is_none()
            && self.description.is_none()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    #[serde(default = "unknown_status")]
    pub status: String,
}

fn unknown_status() -> String {
    "unknown".to_string()
}

/// `GET /api/packages` answers with a bare list or `{"packages": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum PackageListing {
    Bare(Vec<RegistryPackage>),
    Wrapped { packages: Vec<RegistryPackage> },
    Single(RegistryPackage),
}

impl PackageListing {
    pub(crate) fn into_packages(self) -> Vec<RegistryPackage> {
        match self {
            PackageListing::Bare(packages) | PackageListing::Wrapped { packages } => packages,
            PackageListing::Single(package) => vec![package],
        }
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Accepts `"a, b"`, `["a", "b"]` or null.
fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Some(OneOrMany::Many(items)) => items,
        None => Vec::new(),
    })
}
