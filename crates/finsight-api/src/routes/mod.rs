pub mod auth;
pub mod chat;
pub mod clients;
pub mod conversations;
pub mod health;
pub mod reports;
