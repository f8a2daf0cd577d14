// CLI helpers: color gating, tier rendering, output files

use anyhow::Context;
use colored::{ColoredString, Colorize};
use std::fs;
use std::path::Path;

use crate::engines::shared::models::RiskTier;

/// Disable color when stdout is not a terminal
pub fn init_colors() {
    if !atty::is(atty::Stream::Stdout) {
        colored::control::set_override(false);
    }
}

/// Render a tier label in its severity color
pub fn tier_label(tier: RiskTier) -> ColoredString {
    match tier {
        RiskTier::Low => tier.as_str().green(),
        RiskTier::Medium => tier.as_str().yellow(),
        RiskTier::High | RiskTier::HighSevere => tier.as_str().red(),
        RiskTier::Critical | RiskTier::CriticalCatastrophic => tier.as_str().red().bold(),
    }
}

/// Write contract JSON to a file, with a trailing newline
pub fn write_output_file(path: &Path, content: &str) -> anyhow::Result<()> {
    fs::write(path, format!("{}\n", content))
        .with_context(|| format!("cannot write output file '{}'", path.display()))
}
