//! Remote field identifiers.
//!
//! Queries and writes address Ragic columns by numeric field id, while read
//! responses key each row by the column's display name. Each [`Field`] carries
//! both so lookups can fall back from one to the other.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub id: u32,
    pub name: &'static str,
}

impl Field {
    const fn new(id: u32, name: &'static str) -> Self {
        Self { id, name }
    }

    /// The `where` clause for an equality filter on this field.
    pub fn eq(self, value: impl std::fmt::Display) -> String {
        format!("{},eq,{}", self.id, value)
    }

    /// Read this field out of a record object, by name first and then by id.
    pub fn get<'a>(
        self,
        row: &'a serde_json::Map<String, serde_json::Value>,
    ) -> Option<&'a serde_json::Value> {
        row.get(self.name).or_else(|| row.get(&self.id.to_string()))
    }
}

/// Members table.
pub mod members {
    use super::Field;

    pub const MEMBERSHIP_ID: Field = Field::new(1003767, "Membership ID");

    /// Only ever read, so addressed by label alone.
    pub const FULL_NAME: &str = "Full Name";
}

/// Attendance (event signup) table.
pub mod attendance {
    use super::Field;

    pub const MEMBERSHIP_ID: Field = Field::new(1003777, "Membership ID");
    pub const FIRST_NAME: Field = Field::new(1003903, "First Name");
    pub const LAST_NAME: Field = Field::new(1003904, "Last Name");
    pub const EID: Field = Field::new(1003807, "EID");
    pub const OPPORTUNITY: Field = Field::new(1003809, "Opportunity");
    pub const TIMECLOCK_STATUS: Field = Field::new(1010008, "Timeclock Status");

    pub const EVENT_ID: &str = "Event ID";

    pub const STATUS_OPEN: &str = "Open";
}

/// Hours detail table.
pub mod hours {
    use super::Field;

    pub const EID: Field = Field::new(1003813, "EID");
    pub const DATE: Field = Field::new(1003908, "Date");
    pub const EVENT_ID: Field = Field::new(1003914, "Event ID");
    pub const EVENT_NAME: Field = Field::new(1003915, "Event Name");
    pub const START_TIME: Field = Field::new(1003910, "Start Time");
    pub const MEMBERSHIP_ID: Field = Field::new(1003916, "Membership ID");
    pub const END_TIME: Field = Field::new(1003911, "End Time");
    pub const STATUS: Field = Field::new(1006691, "Status");
}
