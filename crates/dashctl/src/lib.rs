#![forbid(unsafe_code)]
// Allow pedantic lints for early-stage API ergonomics.
#![allow(clippy::nursery)]
#![allow(clippy::pedantic)]

//! # dashctl
//!
//! Command-line front end for [`dashkit`].
//!
//! This crate exposes the command implementations so the binary and the
//! integration tests share code.
//!
//! ## Public Modules
//!
//! - [`cli`] - Command-line contract (clap)
//! - [`config`] - Layered runtime configuration
//! - [`records`] - Loading JSON record files
//! - [`table`] - Plain-text table rendering
//! - [`session`] - Line-driven numeric target sessions
//! - [`commands`] - Subcommand implementations

pub mod cli;
pub mod commands;
pub mod config;
pub mod records;
pub mod session;
pub mod table;
