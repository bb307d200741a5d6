//! # Orzu-Dil Order Bot
//!
//! A Telegram bot that opens the restaurant's menu web app, turns the order
//! payload it sends back into readable messages, and relays each order to
//! the staff and to the customer.

pub mod bot;
pub mod config;
pub mod delivery_errors;
pub mod fanout;
pub mod localization;
pub mod messenger;
pub mod order;
pub mod rate_limit;
