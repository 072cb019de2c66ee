//! tfc: Tokens Factory CLI
//!
//! A command registry and dispatcher for token factory, CAT-20 token and
//! policy registry operations. Commands validate their arguments locally and
//! delegate execution to a pluggable backend.

pub mod backend;
pub mod catalog;
pub mod cli;
pub mod core;
