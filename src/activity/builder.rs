#[cfg(feature = "secrets")]
use crate::activity::types::ActivitySecrets;
use crate::activity::types::{
    Activity, ActivityAssets, ActivityButton, ActivityParty, ActivityTimestamps,
};
use crate::error::{DiscordIpcError, Result};
use std::time::{SystemTime, UNIX_EPOCH};

/// Builder for creating Discord Rich Presence activities.
///
/// `build()` returns the activity unvalidated; call
/// [`Activity::validate`](crate::activity::Activity::validate) (or let
/// [`DiscordIpcClient::set_presence`](crate::client::DiscordIpcClient::set_presence)
/// do it for you) before sending it.
#[derive(Debug, Default)]
pub struct ActivityBuilder {
    activity: Activity,
}

impl ActivityBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the activity state (what the player is currently doing).
    pub fn state<S: Into<String>>(mut self, state: S) -> Self {
        self.activity.state = Some(state.into());
        self
    }

    /// Set the activity details.
    pub fn details<S: Into<String>>(mut self, details: S) -> Self {
        self.activity.details = Some(details.into());
        self
    }

    /// Set the start timestamp to the current wall-clock time.
    ///
    /// # Errors
    ///
    /// Returns an error if the system time is before the UNIX epoch. This
    /// should never happen on a properly configured system.
    pub fn start_timestamp_now(mut self) -> Result<Self> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH).map_err(|e| {
            DiscordIpcError::SystemTimeError(format!("system time is before UNIX epoch: {e}"))
        })?;

        self.get_timestamps().start = Some(now.as_secs() as i64);
        Ok(self)
    }

    /// Set the start timestamp (seconds since UNIX epoch).
    pub fn start_timestamp(mut self, timestamp: i64) -> Self {
        self.get_timestamps().start = Some(timestamp);
        self
    }

    /// Set the end timestamp (seconds since UNIX epoch).
    pub fn end_timestamp(mut self, timestamp: i64) -> Self {
        self.get_timestamps().end = Some(timestamp);
        self
    }

    /// Clear both timestamps.
    pub fn clear_timestamps(mut self) -> Self {
        self.activity.timestamps = None;
        self
    }

    /// Set the large image asset key.
    pub fn large_image<S: Into<String>>(mut self, key: S) -> Self {
        self.get_assets().large_image = Some(key.into());
        self
    }

    /// Set the large image hover text.
    pub fn large_text<S: Into<String>>(mut self, text: S) -> Self {
        self.get_assets().large_text = Some(text.into());
        self
    }

    /// Set the small image asset key.
    pub fn small_image<S: Into<String>>(mut self, key: S) -> Self {
        self.get_assets().small_image = Some(key.into());
        self
    }

    /// Set the small image hover text.
    pub fn small_text<S: Into<String>>(mut self, text: S) -> Self {
        self.get_assets().small_text = Some(text.into());
        self
    }

    /// Set party id and size. `current_size` may exceed `max_size`; the
    /// party is still built as given, the mismatch is caught later by
    /// [`Activity::validate`](crate::activity::Activity::validate).
    pub fn party<S: Into<String>>(mut self, id: S, current_size: u32, max_size: u32) -> Self {
        self.activity.party = Some(ActivityParty {
            id: Some(id.into()),
            size: Some([current_size, max_size]),
        });
        self
    }

    /// Update just the current party size, leaving id and max untouched.
    /// A no-op if no party has been set yet.
    pub fn party_size(mut self, current_size: u32) -> Self {
        if let Some(party) = &mut self.activity.party {
            let max = party.size.map(|s| s[1]).unwrap_or(current_size);
            party.size = Some([current_size, max]);
        }
        self
    }

    pub fn button<L: Into<String>, U: Into<String>>(mut self, label: L, url: U) -> Self {
        let buttons = self.activity.buttons.get_or_insert_with(Vec::new);
        buttons.push(ActivityButton {
            label: label.into(),
            url: url.into(),
        });
        self
    }

    #[cfg(feature = "secrets")]
    pub fn join_secret<S: Into<String>>(mut self, secret: S) -> Self {
        self.get_secrets().join = Some(secret.into());
        self
    }

    #[cfg(feature = "secrets")]
    pub fn spectate_secret<S: Into<String>>(mut self, secret: S) -> Self {
        self.get_secrets().spectate = Some(secret.into());
        self
    }

    #[cfg(feature = "secrets")]
    pub fn match_secret<S: Into<String>>(mut self, secret: S) -> Self {
        self.get_secrets().match_secret = Some(secret.into());
        self
    }

    /// Set the instance flag.
    pub fn instance(mut self, instance: bool) -> Self {
        self.activity.instance = Some(instance);
        self
    }

    /// Build the activity.
    pub fn build(self) -> Activity {
        self.activity
    }

    /// Build and validate in one step.
    pub fn try_build(self) -> Result<Activity> {
        self.activity.validate()?;
        Ok(self.activity)
    }

    #[cfg(feature = "secrets")]
    fn get_secrets(&mut self) -> &mut ActivitySecrets {
        self.activity
            .secrets
            .get_or_insert_with(ActivitySecrets::default)
    }

    fn get_timestamps(&mut self) -> &mut ActivityTimestamps {
        self.activity
            .timestamps
            .get_or_insert_with(ActivityTimestamps::default)
    }

    fn get_assets(&mut self) -> &mut ActivityAssets {
        self.activity
            .assets
            .get_or_insert_with(ActivityAssets::default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_basic_fields() {
        let activity = ActivityBuilder::new()
            .state("Playing")
            .details("Level 1")
            .large_image("cover")
            .large_text("Cover Art")
            .small_image("icon")
            .small_text("Icon Art")
            .instance(true)
            .button("Join", "https://example.com/join")
            .build();

        let state = activity.state.as_deref();
        let details = activity.details.as_deref();
        let assets = activity.assets.unwrap();
        let buttons = activity.buttons.unwrap();

        assert_eq!(state, Some("Playing"));
        assert_eq!(details, Some("Level 1"));
        assert_eq!(assets.large_image.as_deref(), Some("cover"));
        assert_eq!(assets.small_text.as_deref(), Some("Icon Art"));
        assert!(activity.instance.unwrap());
        assert_eq!(buttons.len(), 1);
        assert_eq!(buttons[0].label, "Join");
    }

    #[test]
    fn builder_sets_party_information() {
        let activity = ActivityBuilder::new().party("group", 2, 5).build();
        let party = activity.party.unwrap();
        assert_eq!(party.id.as_deref(), Some("group"));
        assert_eq!(party.size, Some([2, 5]));
    }

    #[test]
    fn party_size_preserves_max_and_id() {
        let activity = ActivityBuilder::new()
            .party("group", 2, 5)
            .party_size(4)
            .build();
        let party = activity.party.unwrap();
        assert_eq!(party.id.as_deref(), Some("group"));
        assert_eq!(party.size, Some([4, 5]));
    }

    #[test]
    fn start_timestamp_now_sets_current_time() {
        let before = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;
        let activity = ActivityBuilder::new()
            .start_timestamp_now()
            .expect("timestamp should succeed")
            .build();

        let timestamp = activity
            .timestamps
            .and_then(|t| t.start)
            .expect("start timestamp set");

        assert!(timestamp >= before);
        assert!(timestamp - before <= 2);
    }

    #[test]
    fn start_and_end_timestamps_are_applied() {
        let activity = ActivityBuilder::new()
            .start_timestamp(100)
            .end_timestamp(200)
            .build();

        let timestamps = activity.timestamps.unwrap();
        assert_eq!(timestamps.start, Some(100));
        assert_eq!(timestamps.end, Some(200));
    }

    #[test]
    fn try_build_rejects_invalid_party() {
        let result = ActivityBuilder::new().party("group", 5, 2).try_build();
        assert!(result.is_err());
    }

    #[cfg(feature = "secrets")]
    #[test]
    fn secrets_are_applied_when_feature_enabled() {
        let activity = ActivityBuilder::new()
            .join_secret("join")
            .match_secret("match")
            .spectate_secret("spectate")
            .build();

        let secrets = activity.secrets.expect("secrets should exist");
        assert_eq!(secrets.join.as_deref(), Some("join"));
        assert_eq!(secrets.match_secret.as_deref(), Some("match"));
        assert_eq!(secrets.spectate.as_deref(), Some("spectate"));
    }
}
