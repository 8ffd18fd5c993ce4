//! Dialogue entities: messages and per-participant transcripts

pub mod marshal;
pub mod message;
pub mod transcript;
