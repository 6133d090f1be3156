pub mod health;
pub mod kiosk;
