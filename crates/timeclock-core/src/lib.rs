pub mod config;
pub mod error;
pub mod fields;
pub mod hours;
pub mod io;
pub mod member;
pub mod memory;
pub mod ragic;
pub mod reconcile;
pub mod store;
pub mod time;

pub use error::{Result, TimeclockError};
