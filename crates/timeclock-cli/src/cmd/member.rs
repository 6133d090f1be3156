use crate::output::print_json;
use std::path::Path;
use timeclock_core::ragic::RagicClient;
use timeclock_core::store::AttendanceStore;

pub fn run(config_path: Option<&Path>, member_id: &str, json: bool) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let member_id = super::checked_member_id(&config, member_id)?;
    let store = RagicClient::from_config(&config)?;

    let rt = tokio::runtime::Runtime::new()?;
    let name = rt.block_on(store.member_name(&member_id))?;

    if json {
        print_json(&serde_json::json!({ "member_id": member_id, "name": name }))
    } else {
        println!("{name}");
        Ok(())
    }
}
