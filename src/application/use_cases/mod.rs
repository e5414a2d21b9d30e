pub mod account;
pub mod dashboard;
pub mod expiration;
pub mod options;
pub mod webhook;
