//! show-config command

use super::CommandContext;
use anyhow::Result;
use colored::Colorize;
use std::collections::BTreeMap;

pub fn execute(ctx: &CommandContext) -> Result<()> {
    let pairs = ctx.config.display_pairs();

    if ctx.is_json() {
        let map: BTreeMap<_, _> = pairs.into_iter().collect();
        println!("{}", serde_json::to_string_pretty(&map)?);
        return Ok(());
    }

    println!("{}", "Current configuration:".bold());
    println!();
    for (key, value) in pairs {
        println!("  {}: {}", key.cyan(), value);
    }

    if let Err(e) = ctx.config.validate() {
        println!();
        println!("{} {}", "!".yellow(), e);
    }

    Ok(())
}
