use serde::{Deserialize, Deserializer, Serialize};

/// Default owner name when the operator does not supply one.
pub const DEFAULT_OWNER: &str = "unknown";

const MS_PER_DAY: f64 = 86_400_000.0;

/// A single issued license key and its binding/expiry state.
///
/// Field aliases accept files written by the older Spanish-named service
/// (`dueño`, `ip`, `expires`, `notas`); saving always uses the camelCase names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct License {
    pub key: String,
    #[serde(alias = "dueño", default = "default_owner")]
    pub owner: String,
    /// Address the license is pinned to (None = not yet bound)
    #[serde(alias = "ip", default)]
    pub bound_ip: Option<String>,
    /// Creation time in epoch milliseconds
    #[serde(default, deserialize_with = "deserialize_epoch_ms")]
    pub created_at: i64,
    /// Expiry in epoch milliseconds (None = never expires)
    #[serde(alias = "expires", default, deserialize_with = "deserialize_opt_epoch_ms")]
    pub expires_at: Option<i64>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(alias = "notas", default)]
    pub notes: String,
}

impl License {
    /// Whether the license is past its expiry at `now_ms`.
    ///
    /// The expiry instant itself is still valid; only strictly later checks fail.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        matches!(self.expires_at, Some(exp) if now_ms > exp)
    }

    /// Short key prefix safe for log output.
    pub fn key_hint(&self) -> &str {
        key_hint(&self.key)
    }
}

/// First eight characters of a key, for logs.
pub fn key_hint(key: &str) -> &str {
    match key.char_indices().nth(8) {
        Some((idx, _)) => &key[..idx],
        None => key,
    }
}

fn default_owner() -> String {
    DEFAULT_OWNER.to_string()
}

fn default_active() -> bool {
    true
}

/// Whole milliseconds from any JSON number. Older files can hold fractional
/// timestamps (`now + days * 86400000` with fractional days).
fn epoch_ms(value: serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|ms| ms as i64)),
        _ => None,
    }
}

fn deserialize_epoch_ms<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(epoch_ms(serde_json::Value::deserialize(deserializer)?).unwrap_or_default())
}

fn deserialize_opt_epoch_ms<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(epoch_ms(serde_json::Value::deserialize(deserializer)?))
}

/// Request body for issuing a license.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLicense {
    #[serde(alias = "dueño", default)]
    pub owner: Option<String>,
    /// Pre-bind the license to this address
    #[serde(alias = "boundIp", default)]
    pub ip: Option<String>,
    /// Validity from now, in days. Accepts a number or a numeric string.
    #[serde(
        alias = "diasValidez",
        alias = "validity_days",
        default,
        deserialize_with = "deserialize_days"
    )]
    pub validity_days: Option<f64>,
    /// Operator-supplied key (generated when absent or empty)
    #[serde(default)]
    pub key: Option<String>,
    /// Body fallback for the admin secret when the header is not sent
    #[serde(alias = "admin_token", default)]
    pub admin_token: Option<String>,
}

impl CreateLicense {
    /// Milliseconds of validity, or None when the license never expires.
    ///
    /// Only finite, strictly positive day counts produce an expiry.
    pub fn validity_ms(&self) -> Option<i64> {
        self.validity_days
            .filter(|days| days.is_finite() && *days > 0.0)
            .map(|days| (days * MS_PER_DAY) as i64)
    }
}

/// Accepts `30`, `1.5`, `"30"` or `null`. Anything unparseable counts as absent.
fn deserialize_days<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

/// Key as submitted for verification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmittedKey {
    /// Absent, `null` or empty
    #[default]
    Missing,
    Text(String),
    /// Any other JSON value. It can never match a stored key.
    NotText,
}

impl SubmittedKey {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(key) => Some(key),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for SubmittedKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Null => Self::Missing,
            serde_json::Value::String(s) if s.is_empty() => Self::Missing,
            serde_json::Value::String(s) => Self::Text(s),
            _ => Self::NotText,
        })
    }
}

/// Request body for verifying a license.
///
/// Field types are lenient: a wrongly typed field never fails the request.
#[derive(Debug, Default, Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub key: SubmittedKey,
    /// Client address to check; falls back to the connection's source address.
    /// Non-string values count as absent.
    #[serde(default, deserialize_with = "deserialize_text")]
    pub ip: Option<String>,
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}
