#![forbid(unsafe_code)]

pub mod catalog;
pub mod christmas;
pub mod form;
pub mod hello;
pub mod version;
