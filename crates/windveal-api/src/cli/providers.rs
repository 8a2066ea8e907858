//! `windveal providers`: show the fallback chain as configured.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use serde::Serialize;

use windveal_infra::llm::ProviderSettings;
use windveal_types::config::AppConfig;
use windveal_types::llm::ProviderConfig;

/// One row of the provider listing.
#[derive(Debug, Serialize)]
pub struct ProviderRow {
    pub priority: usize,
    pub name: String,
    pub kind: String,
    pub model: String,
    pub base_url: String,
    pub api_key_env: String,
    pub key_present: bool,
    pub enabled: bool,
}

/// Build the listing. `has_key` reports whether an env var holds a value.
pub fn provider_rows<F>(providers: &[ProviderConfig], has_key: F) -> Vec<ProviderRow>
where
    F: Fn(&str) -> bool,
{
    providers
        .iter()
        .enumerate()
        .map(|(idx, config)| {
            let settings = ProviderSettings::from_config(config);
            ProviderRow {
                priority: idx + 1,
                kind: config.kind.to_string(),
                key_present: has_key(&settings.api_key_env),
                enabled: config.enabled,
                name: settings.name,
                model: settings.model,
                base_url: settings.base_url,
                api_key_env: settings.api_key_env,
            }
        })
        .collect()
}

/// Print the configured providers.
pub fn list_providers(config: &AppConfig, json: bool) -> Result<()> {
    let rows = provider_rows(&config.providers, |var| {
        std::env::var(var).is_ok_and(|v| !v.trim().is_empty())
    });

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!();
        println!("  No providers configured.");
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Priority"),
            Cell::new("Name"),
            Cell::new("Kind"),
            Cell::new("Model"),
            Cell::new("Key env"),
            Cell::new("Key"),
            Cell::new("Enabled"),
        ]);

    for row in &rows {
        let key_cell = if row.key_present {
            Cell::new("set").fg(Color::Green)
        } else {
            Cell::new("missing").fg(Color::Red)
        };
        let enabled_cell = if row.enabled {
            Cell::new("yes")
        } else {
            Cell::new("no").fg(Color::DarkGrey)
        };
        table.add_row(vec![
            Cell::new(row.priority),
            Cell::new(&row.name).fg(Color::Cyan),
            Cell::new(&row.kind),
            Cell::new(&row.model),
            Cell::new(&row.api_key_env),
            key_cell,
            enabled_cell,
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {}",
        style("Providers are tried top to bottom; the first reply wins.").dim()
    );
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use windveal_types::llm::ProviderKind;

    #[test]
    fn rows_follow_config_order_with_defaults() {
        let mut hf = ProviderConfig::for_kind(ProviderKind::HuggingFace);
        hf.enabled = false;
        let providers = vec![ProviderConfig::for_kind(ProviderKind::OpenAi), hf];

        let rows = provider_rows(&providers, |var| var == "OPENAI_API_KEY");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].priority, 1);
        assert_eq!(rows[0].name, "OpenAI");
        assert_eq!(rows[0].kind, "openai");
        assert_eq!(rows[0].api_key_env, "OPENAI_API_KEY");
        assert!(rows[0].key_present);
        assert_eq!(rows[1].priority, 2);
        assert!(!rows[1].key_present);
        assert!(!rows[1].enabled);
    }
}
