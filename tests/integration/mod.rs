//! Integration tests for the inspector
//!
//! These tests drive a full session against a console test double: forward
//! sync, replay, session reuse and teardown.

#[path = "../common/mod.rs"]
pub mod common;

pub mod inspector_flow;
pub mod tape_console;
pub mod time_travel;
