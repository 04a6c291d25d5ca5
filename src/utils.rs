#![forbid(unsafe_code)]

pub mod config;
pub mod errors;
pub mod template_sources;
pub mod templates;
pub mod web_utils;
