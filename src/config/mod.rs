// src/config/mod.rs
pub mod ai;
pub mod email;

pub use ai::AiConfig;
pub use email::EmailConfig;
