pub mod auth;

pub use auth::{require_card_owner, Principal};
