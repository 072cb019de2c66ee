//! Shared helper functions for CLI commands

use std::io::{self, IsTerminal};

use crate::cli::GlobalOpts;
use crate::core::config::Config;
use crate::core::error::CliResult;

/// Load the config file named by the global options and apply overrides
pub fn load_config(global: &GlobalOpts) -> CliResult<Config> {
    let mut config = Config::load(global.config.as_deref())?;
    config.apply(&global.overrides());
    tracing::debug!(
        source = ?config.source,
        network = %config.network,
        backend = ?config.backend.kind,
        "configuration loaded"
    );
    Ok(config)
}

/// Whether prompts can be shown
pub fn is_interactive() -> bool {
    io::stdin().is_terminal() && io::stderr().is_terminal()
}

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
