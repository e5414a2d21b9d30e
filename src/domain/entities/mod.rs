pub mod account;
pub mod webhook_status;
