//! The `User` and `Configuration` records carried in the `Ready` event.
//!
//! Avatar URL formatting is an external collaborator per §6 and is
//! deliberately not implemented here; `avatar_hash` is exposed as-is for
//! callers who want to build the CDN URL themselves (or hand it to a
//! collaborator that does).

use serde::{Deserialize, Serialize};

/// A Discord user, as reported in the `Ready` event's `data.user`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "deserialize_snowflake")]
    pub id: u64,
    pub username: String,
    #[serde(default, deserialize_with = "deserialize_discriminator")]
    pub discriminator: u16,
    #[serde(default, rename = "avatar")]
    pub avatar_hash: Option<String>,
}

fn deserialize_snowflake<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    let raw = serde_json::Value::deserialize(deserializer)?;
    match raw {
        serde_json::Value::String(s) => s.parse().map_err(D::Error::custom),
        serde_json::Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| D::Error::custom("snowflake out of u64 range")),
        other => Err(D::Error::custom(format!(
            "expected string or number snowflake, got {other}"
        ))),
    }
}

fn deserialize_discriminator<'de, D>(deserializer: D) -> std::result::Result<u16, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    let raw = serde_json::Value::deserialize(deserializer)?;
    match raw {
        serde_json::Value::String(s) => s.parse().map_err(D::Error::custom),
        serde_json::Value::Number(n) => n
            .as_u64()
            .map(|v| v as u16)
            .ok_or_else(|| D::Error::custom("discriminator out of range")),
        serde_json::Value::Null => Ok(0),
        other => Err(D::Error::custom(format!(
            "expected string or number discriminator, got {other}"
        ))),
    }
}

/// The `data.config` object of the `Ready` event: environment details
/// about the Discord client we connected to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub cdn_host: String,
    pub api_endpoint: String,
    pub environment: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_accepts_string_snowflake() {
        let json = serde_json::json!({
            "id": "81",
            "username": "nelly",
            "discriminator": "1337",
            "avatar": null
        });

        let user: User = serde_json::from_value(json).unwrap();
        assert_eq!(user.id, 81);
        assert_eq!(user.discriminator, 1337);
    }

    #[test]
    fn user_accepts_numeric_snowflake_and_missing_discriminator() {
        let json = serde_json::json!({
            "id": 81,
            "username": "nelly"
        });

        let user: User = serde_json::from_value(json).unwrap();
        assert_eq!(user.id, 81);
        assert_eq!(user.discriminator, 0);
        assert_eq!(user.avatar_hash, None);
    }

    #[test]
    fn configuration_deserializes_ready_payload() {
        let json = serde_json::json!({
            "cdn_host": "cdn.discordapp.com",
            "api_endpoint": "//discordapp.com/api",
            "environment": "production"
        });

        let config: Configuration = serde_json::from_value(json).unwrap();
        assert_eq!(config.cdn_host, "cdn.discordapp.com");
    }
}
