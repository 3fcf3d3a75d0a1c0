//! `marketscout onboard` — First-time setup.

use std::path::Path;
use marketscout_config::AppConfig;

/// The templates shipped with the binary, written out by `onboard`.
pub const DEFAULT_TEMPLATES: &[(&str, &str)] = &[
    ("system_message", include_str!("../../../../templates/system_message.md")),
    ("reasoning", include_str!("../../../../templates/reasoning.md")),
    ("respond", include_str!("../../../../templates/respond.md")),
    ("clarification", include_str!("../../../../templates/clarification.md")),
    ("report_outline", include_str!("../../../../templates/report_outline.md")),
    ("write_report", include_str!("../../../../templates/write_report.md")),
];

/// Write any default template missing from `dir`; returns the names written.
pub fn write_default_templates(dir: &Path) -> std::io::Result<Vec<&'static str>> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();
    for (name, body) in DEFAULT_TEMPLATES {
        let path = dir.join(format!("{name}.md"));
        if !path.exists() {
            std::fs::write(&path, body)?;
            written.push(*name);
        }
    }
    Ok(written)
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    println!("MarketScout — First-Time Setup");
    println!("==============================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("  Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if config_path.exists() {
        println!("  Config already exists at: {}", config_path.display());
        println!("  Edit it manually or delete it and re-run onboard.");
    } else {
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("  Created config.toml at: {}", config_path.display());
    }

    let config = AppConfig::load()?;
    let written = write_default_templates(&config.templates_dir)?;
    if written.is_empty() {
        println!("  Templates present in: {}", config.templates_dir.display());
    } else {
        println!(
            "  Wrote {} template(s) to {}: {}",
            written.len(),
            config.templates_dir.display(),
            written.join(", ")
        );
    }

    println!("\nNext steps:");
    println!("  1. Set OPENAI_API_KEY (or api_key in config.toml)");
    println!("  2. Set TAVILY_API_KEY (or search.api_key in config.toml)");
    println!("  3. Run: marketscout\n");

    Ok(())
}
