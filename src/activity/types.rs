use serde::{Deserialize, Serialize};

use crate::error::DiscordIpcError;

/// Field-length budgets, measured in UTF-8 bytes after trimming.
pub const STATE_LIMIT: usize = 128;
pub const DETAILS_LIMIT: usize = 128;
pub const PARTY_ID_LIMIT: usize = 128;
pub const SECRET_LIMIT: usize = 128;
pub const LARGE_IMAGE_LIMIT: usize = 32;
pub const LARGE_TEXT_LIMIT: usize = 128;

/// Rich Presence Activity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Activity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamps: Option<ActivityTimestamps>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub assets: Option<ActivityAssets>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub party: Option<ActivityParty>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub secrets: Option<ActivitySecrets>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub buttons: Option<Vec<ActivityButton>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<bool>,
}

/// Activity timestamps
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ActivityTimestamps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<i64>,
}

/// Activity assets (images)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ActivityAssets {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large_image: Option<String>,

    /// Server-assigned numeric id for `large_image`, adopted by
    /// [`Activity::merge`] when the server echoes a parseable `u64` back in
    /// the image key's slot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large_image_id: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub large_text: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub small_image: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub small_image_id: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub small_text: Option<String>,
}

/// Activity party information
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ActivityParty {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<[u32; 2]>, // [current, max]
}

/// Activity secrets for join/spectate
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ActivitySecrets {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub spectate: Option<String>,

    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub match_secret: Option<String>,
}

/// Activity button
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityButton {
    pub label: String,
    pub url: String,
}

impl Default for Activity {
    fn default() -> Self {
        Self {
            state: None,
            details: None,
            timestamps: None,
            assets: None,
            party: None,
            secrets: None,
            buttons: None,
            instance: None,
        }
    }
}

fn check_len(field: &'static str, value: &str, limit: usize) -> Result<(), DiscordIpcError> {
    let trimmed = value.trim();
    if trimmed.len() > limit {
        Err(DiscordIpcError::string_out_of_range(
            field,
            limit,
            trimmed.len(),
        ))
    } else {
        Ok(())
    }
}

impl Activity {
    /// Validate every field-length and party-size invariant.
    ///
    /// A presence with `secrets` but no `party` is legal but produces a
    /// warning (`Ok(Some(warning))`) rather than an error, since Discord
    /// won't surface join/spectate without a party to attach them to. A
    /// presence with `party.max < party.size` is rejected outright.
    pub fn validate(&self) -> Result<Option<&'static str>, DiscordIpcError> {
        self.validate_lengths()?;

        if let Some(party) = &self.party {
            if let Some([size, max]) = party.size {
                if max < size {
                    return Err(DiscordIpcError::InvalidActivity(format!(
                        "party max ({max}) must be >= party size ({size})"
                    )));
                }
            }
        }

        let mut warning = None;
        if self.secrets.is_some() && self.party.is_none() {
            warning = Some(
                "activity has secrets but no party; join/spectate will not surface in the UI",
            );
        }

        Ok(warning)
    }

    fn validate_lengths(&self) -> Result<(), DiscordIpcError> {
        if let Some(state) = &self.state {
            check_len("state", state, STATE_LIMIT)?;
        }
        if let Some(details) = &self.details {
            check_len("details", details, DETAILS_LIMIT)?;
        }
        if let Some(assets) = &self.assets {
            if let Some(large_image) = &assets.large_image {
                check_len("assets.large_image", large_image, LARGE_IMAGE_LIMIT)?;
            }
            if let Some(large_text) = &assets.large_text {
                check_len("assets.large_text", large_text, LARGE_TEXT_LIMIT)?;
            }
            if let Some(small_image) = &assets.small_image {
                check_len("assets.small_image", small_image, LARGE_IMAGE_LIMIT)?;
            }
            if let Some(small_text) = &assets.small_text {
                check_len("assets.small_text", small_text, LARGE_TEXT_LIMIT)?;
            }
        }
        if let Some(party) = &self.party {
            if let Some(id) = &party.id {
                check_len("party.id", id, PARTY_ID_LIMIT)?;
            }
        }
        if let Some(secrets) = &self.secrets {
            if let Some(join) = &secrets.join {
                check_len("secrets.join", join, SECRET_LIMIT)?;
            }
            if let Some(spectate) = &secrets.spectate {
                check_len("secrets.spectate", spectate, SECRET_LIMIT)?;
            }
            if let Some(match_secret) = &secrets.match_secret {
                check_len("secrets.match", match_secret, SECRET_LIMIT)?;
            }
        }
        Ok(())
    }

    /// Merge a server-echoed `other` into `self`:
    /// - scalar fields (`state`, `details`, `instance`) are replaced;
    /// - `party`, `secrets`, `timestamps`, `buttons` are replaced wholesale;
    /// - for `assets`, a server-assigned numeric image id is adopted into
    ///   `*_image_id` without touching the original key; a non-numeric
    ///   incoming key replaces the key outright and clears any stored id.
    pub fn merge(&mut self, other: Activity) {
        self.state = other.state;
        self.details = other.details;
        self.instance = other.instance;
        self.party = other.party;
        self.secrets = other.secrets;
        self.timestamps = other.timestamps;
        self.buttons = other.buttons;

        match (self.assets.take(), other.assets) {
            (Some(mut existing), Some(incoming)) => {
                merge_asset_slot(
                    &mut existing.large_image,
                    &mut existing.large_image_id,
                    incoming.large_image,
                );
                merge_asset_slot(
                    &mut existing.small_image,
                    &mut existing.small_image_id,
                    incoming.small_image,
                );
                existing.large_text = incoming.large_text.or(existing.large_text);
                existing.small_text = incoming.small_text.or(existing.small_text);
                self.assets = Some(existing);
            }
            (None, Some(incoming)) => self.assets = Some(incoming),
            (existing, None) => self.assets = existing,
        }
    }
}

fn merge_asset_slot(key: &mut Option<String>, id: &mut Option<u64>, incoming: Option<String>) {
    let Some(incoming) = incoming else { return };
    match incoming.parse::<u64>() {
        Ok(numeric_id) => *id = Some(numeric_id),
        Err(_) => {
            *key = Some(incoming);
            *id = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_oversized_state() {
        let activity = Activity {
            state: Some("x".repeat(STATE_LIMIT + 1)),
            ..Default::default()
        };
        assert!(activity.validate().is_err());
    }

    #[test]
    fn validate_rejects_max_less_than_size() {
        let activity = Activity {
            party: Some(ActivityParty {
                id: Some("p".into()),
                size: Some([3, 2]),
            }),
            ..Default::default()
        };
        assert!(activity.validate().is_err());
    }

    #[test]
    fn validate_warns_on_secrets_without_party() {
        let activity = Activity {
            secrets: Some(ActivitySecrets {
                join: Some("j".into()),
                spectate: None,
                match_secret: None,
            }),
            ..Default::default()
        };
        assert!(activity.validate().unwrap().is_some());
    }

    #[test]
    fn validate_is_silent_for_secrets_with_party() {
        let activity = Activity {
            party: Some(ActivityParty {
                id: Some("p".into()),
                size: Some([1, 2]),
            }),
            secrets: Some(ActivitySecrets {
                join: Some("j".into()),
                spectate: None,
                match_secret: None,
            }),
            ..Default::default()
        };
        assert_eq!(activity.validate().unwrap(), None);
    }

    #[test]
    fn merge_adopts_numeric_image_id_without_clearing_key() {
        let mut base = Activity {
            assets: Some(ActivityAssets {
                large_image: Some("cover".into()),
                large_image_id: None,
                large_text: None,
                small_image: None,
                small_image_id: None,
                small_text: None,
            }),
            ..Default::default()
        };

        let echoed = Activity {
            assets: Some(ActivityAssets {
                large_image: Some("123456".into()),
                large_image_id: None,
                large_text: None,
                small_image: None,
                small_image_id: None,
                small_text: None,
            }),
            ..Default::default()
        };

        base.merge(echoed);
        let assets = base.assets.unwrap();
        assert_eq!(assets.large_image.as_deref(), Some("cover"));
        assert_eq!(assets.large_image_id, Some(123456));
    }

    #[test]
    fn merge_replaces_key_when_echo_is_non_numeric() {
        let mut base = Activity {
            assets: Some(ActivityAssets {
                large_image: Some("cover".into()),
                large_image_id: Some(999),
                large_text: None,
                small_image: None,
                small_image_id: None,
                small_text: None,
            }),
            ..Default::default()
        };

        let echoed = Activity {
            assets: Some(ActivityAssets {
                large_image: Some("new_cover".into()),
                large_image_id: None,
                large_text: None,
                small_image: None,
                small_image_id: None,
                small_text: None,
            }),
            ..Default::default()
        };

        base.merge(echoed);
        let assets = base.assets.unwrap();
        assert_eq!(assets.large_image.as_deref(), Some("new_cover"));
        assert_eq!(assets.large_image_id, None);
    }

    #[test]
    fn merge_replaces_party_wholesale() {
        let mut base = Activity {
            party: Some(ActivityParty {
                id: Some("old".into()),
                size: Some([1, 2]),
            }),
            ..Default::default()
        };

        let echoed = Activity {
            party: Some(ActivityParty {
                id: Some("new".into()),
                size: Some([2, 4]),
            }),
            ..Default::default()
        };

        base.merge(echoed);
        assert_eq!(base.party.unwrap().id.as_deref(), Some("new"));
    }

    #[test]
    fn clone_produces_independent_copy() {
        let original = Activity {
            state: Some("playing".into()),
            party: Some(ActivityParty {
                id: Some("p".into()),
                size: Some([1, 4]),
            }),
            ..Default::default()
        };

        let mut cloned = original.clone();
        cloned.state = Some("changed".into());

        assert_eq!(original.state.as_deref(), Some("playing"));
        assert_eq!(cloned.state.as_deref(), Some("changed"));
        assert_eq!(original, original.clone());
    }
}
