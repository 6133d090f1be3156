use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use timeclock_core::config::Config;
use timeclock_core::memory::MemoryStore;
use timeclock_core::time::LocalTime;
use timeclock_server::AppState;

pub fn run(
    config_path: Option<&Path>,
    port: Option<u16>,
    open: bool,
    demo: bool,
) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    for w in config.validate() {
        tracing::warn!(level = ?w.level, "config: {}", w.message);
    }
    let port = port.unwrap_or(config.server.port);
    let state = if demo {
        demo_state(config)?
    } else {
        AppState::from_config(config).context("failed to set up the kiosk")?
    };

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(timeclock_server::serve(state, port, open))
}

/// Kiosk over an in-memory store with one member signed up for two events.
fn demo_state(config: Config) -> anyhow::Result<AppState> {
    let member_id = format!("{}0001", config.members.id_prefix);
    let store = MemoryStore::new();
    store.add_member(&member_id, "Demo Volunteer");
    store.add_signup(&member_id, "Food Bank", 1, "DEMO-1");
    store.add_signup(&member_id, "Park Cleanup", 2, "DEMO-2");
    tracing::info!(%member_id, "demo mode: using in-memory store");

    let time = LocalTime::system(&config.clock)?;
    Ok(AppState::new(config, Arc::new(store), time))
}
