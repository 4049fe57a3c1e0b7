//! Core types for the kitty allocator

pub mod agent;
pub mod allocation;
pub mod parameter;
