//! `chatkeep config`: print the configuration the server would start with.

use std::path::Path;

use anyhow::Result;
use console::style;
use secrecy::ExposeSecret;
use serde_json::json;

use chatkeep_infra::config::EnvConfigSource;
use chatkeep_types::config::ChatConfig;

pub fn show_config(
    config: &ChatConfig,
    source: &EnvConfigSource,
    store_dir: &Path,
    json: bool,
) -> Result<()> {
    let key_length = config.api_key.as_ref().map(|k| k.expose_secret().len());

    if json {
        let value = json!({
            "api_key_set": key_length.is_some(),
            "model": config.model,
            "base_url": config.base_url,
            "context_enabled": config.context_enabled,
            "system_prompt": config.system_prompt,
            "request_timeout_secs": config.request_timeout.as_secs(),
            "temperature": config.temperature,
            "max_tokens": config.max_tokens,
            "store_dir": store_dir.display().to_string(),
            "dotenv": source.dotenv_exists().then(|| source.dotenv_path().display().to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let api_key = match key_length {
        Some(len) => style(format!("set ({len} chars)")).green(),
        None => style("missing".to_string()).red().bold(),
    };
    let context = if config.context_enabled {
        style("enabled").green()
    } else {
        style("disabled").yellow()
    };
    let dotenv = if source.dotenv_exists() {
        style(source.dotenv_path().display().to_string()).cyan()
    } else {
        style("not found".to_string()).dim()
    };

    println!();
    println!("  {}", style("Configuration").bold());
    println!();
    println!("  {:<16} {api_key}", style("API key").dim());
    println!("  {:<16} {}", style("Model").dim(), style(&config.model).cyan());
    println!("  {:<16} {}", style("Base URL").dim(), config.base_url);
    println!("  {:<16} {context}", style("Context").dim());
    println!(
        "  {:<16} {}s",
        style("Timeout").dim(),
        config.request_timeout.as_secs()
    );
    println!("  {:<16} {}", style("Store").dim(), store_dir.display());
    println!("  {:<16} {dotenv}", style(".env").dim());
    println!();
    println!("  {}", style("System prompt").dim());
    println!("  {}", config.system_prompt);
    println!();

    Ok(())
}
