use crate::output::print_json;
use std::path::Path;
use timeclock_core::ragic::RagicClient;
use timeclock_core::reconcile::Reconciler;
use timeclock_core::time::LocalTime;

pub fn run(
    config_path: Option<&Path>,
    member_id: &str,
    event_id: i64,
    json: bool,
) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let member_id = super::checked_member_id(&config, member_id)?;
    let store = RagicClient::from_config(&config)?;
    let time = LocalTime::system(&config.clock)?;
    let reconciler = Reconciler::new(&store, &time, config.clock.min_dwell_minutes);

    let rt = tokio::runtime::Runtime::new()?;
    let outcome = rt.block_on(reconciler.log_hours(&member_id, event_id))?;

    if json {
        print_json(&serde_json::json!({
            "message": outcome.message(),
            "outcome": outcome,
        }))?;
    } else {
        println!("{}", outcome.message());
        if let Some(record) = outcome.record() {
            let end = record.end_time.as_deref().unwrap_or("-");
            println!(
                "record {}  {}  {} to {}",
                record.record_id, record.date, record.start_time, end
            );
        }
    }
    Ok(())
}
