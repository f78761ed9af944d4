//! Payment confirmation relay.
//!
//! Accepts payment details over HTTP, renders a WhatsApp confirmation message and
//! hands it to a messaging client whose session is supervised by this crate.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
