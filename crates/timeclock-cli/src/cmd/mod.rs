pub mod config;
pub mod events;
pub mod log_hours;
pub mod member;
pub mod qr;
pub mod serve;

use anyhow::Context;
use std::path::Path;
use timeclock_core::config::Config;
use timeclock_core::member::Member;

/// Load the config from `path`, or from the default location.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    Config::resolve(path).context("failed to load config")
}

/// Reject ids without the configured prefix before touching the network.
pub fn checked_member_id(config: &Config, id: &str) -> anyhow::Result<String> {
    let mut member = Member::new(config.members.id_prefix.clone());
    member.set_member_id(id)?;
    Ok(member.member_id().unwrap_or_default().to_string())
}
