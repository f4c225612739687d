//! The URI-scheme registrar collaborator (§6): a platform-specific check
//! for whether this application has registered itself to handle Discord's
//! join/spectate launch URIs. Consumed only to gate `subscribe` and
//! secrets on [`crate::activity::Activity`].

/// Reports whether the running application is registered to handle its
/// Discord URI scheme (`discord-<client_id>://`).
pub trait UriSchemeRegistrar: Send + Sync {
    fn is_registered(&self, client_id: &str) -> bool;
}

/// A registrar that always reports registered.
///
/// This is the default used by [`crate::client::DiscordIpcClient::new`]:
/// registration is normally performed once at install time by a mechanism
/// entirely outside this crate (see DESIGN.md), so assuming "already
/// registered" avoids forcing every caller to wire up a real registrar just
/// to call `subscribe`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysRegistered;

impl UriSchemeRegistrar for AlwaysRegistered {
    fn is_registered(&self, _client_id: &str) -> bool {
        true
    }
}

/// A registrar that always reports unregistered, useful for exercising the
/// `InvalidConfiguration` path in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeverRegistered;

impl UriSchemeRegistrar for NeverRegistered {
    fn is_registered(&self, _client_id: &str) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_registered_reports_true_for_any_id() {
        assert!(AlwaysRegistered.is_registered("anything"));
    }

    #[test]
    fn never_registered_reports_false() {
        assert!(!NeverRegistered.is_registered("anything"));
    }
}
