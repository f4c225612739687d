//! The Rich Presence activity model: fields, validation, and the fluent
//! builder used to construct them.

mod builder;
mod types;

pub use builder::ActivityBuilder;
pub use types::{
    Activity, ActivityAssets, ActivityButton, ActivityParty, ActivitySecrets,
    ActivityTimestamps,
};
