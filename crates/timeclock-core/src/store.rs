use crate::error::Result;
use crate::hours::{HoursRecord, NewHoursRecord, Signup};
use async_trait::async_trait;

/// Remote tables the timeclock reads and writes.
///
/// Implementations do not retry; any failed call surfaces as an error.
#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Full name of the member, `MemberNotFound` if there is no such row.
    async fn member_name(&self, member_id: &str) -> Result<String>;

    /// Signups whose timeclock status is "Open", in store order.
    async fn open_signups(&self, member_id: &str) -> Result<Vec<Signup>>;

    /// The member's record for `event_id` on `date`, whatever its state.
    /// When several exist, the one with the lowest record id.
    async fn todays_hours_record(
        &self,
        member_id: &str,
        event_id: i64,
        date: &str,
    ) -> Result<Option<HoursRecord>>;

    async fn create_hours_record(&self, record: &NewHoursRecord) -> Result<HoursRecord>;

    /// Set the end time of an existing record, addressed by its record id.
    async fn close_hours_record(&self, record: &HoursRecord, end_time: &str)
        -> Result<HoursRecord>;
}
