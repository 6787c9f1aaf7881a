//! Lojistas CLI - command-line client for the seller search
//!
//! This crate ties the store, the gateway client and the result view together.

pub mod config;
pub mod render;

pub use config::{Command, Config, ExportFormat, SortArg, ViewArgs};
