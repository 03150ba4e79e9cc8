//! Service Layer
//!
//! Orchestrates the domain over the outbound ports.

pub mod handlers;
pub mod image_service;
pub mod responder_service;
pub mod sender_config;

pub use handlers::{advance_read_counter, delete_copy};
pub use image_service::ImageService;
pub use responder_service::ResponderService;
pub use sender_config::{SenderConfigLoader, CONFIG_SECRET_FIELD};
