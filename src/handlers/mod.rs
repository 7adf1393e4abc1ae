pub mod auth;
pub mod bank_accounts;
pub mod contact;
pub mod donations;
pub mod payments;
pub mod posts;
pub mod settings;
pub mod volunteer;
