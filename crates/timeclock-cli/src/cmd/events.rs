use crate::output::{print_json, print_table};
use std::path::Path;
use timeclock_core::ragic::RagicClient;
use timeclock_core::store::AttendanceStore;

pub fn run(config_path: Option<&Path>, member_id: &str, json: bool) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let member_id = super::checked_member_id(&config, member_id)?;
    let store = RagicClient::from_config(&config)?;

    let rt = tokio::runtime::Runtime::new()?;
    let signups = rt.block_on(store.open_signups(&member_id))?;

    if json {
        return print_json(&signups);
    }
    if signups.is_empty() {
        println!("No open signups for {member_id}.");
        return Ok(());
    }
    let rows = signups
        .iter()
        .map(|s| vec![s.event_id.to_string(), s.name.clone(), s.eid.clone()])
        .collect();
    print_table(&["EVENT", "NAME", "EID"], rows);
    Ok(())
}
