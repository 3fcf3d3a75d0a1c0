//! `marketscout doctor` — Diagnose configuration, keys, and templates.

use marketscout_agent::required_templates;
use marketscout_config::AppConfig;
use marketscout_core::template::TemplateStore;

/// Check every template the chat command verifies; returns the failure count.
fn check_templates(config: &AppConfig) -> usize {
    let store = TemplateStore::new(&config.templates_dir);
    let mut failed = 0;
    for name in required_templates(&config.agents) {
        match store.load(&name) {
            Ok(_) => println!("  [ok]   Template {name}"),
            Err(e) => {
                println!("  [fail] {e}");
                failed += 1;
            }
        }
    }
    failed
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("MarketScout Doctor — System Diagnostics");
    println!("=======================================\n");

    let mut issues = 0;

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  [ok]   Config valid");
            config
        }
        Err(e) => {
            println!("  [fail] Config invalid: {e}");
            println!("\n  1 issue(s) found. Fix the config before continuing.");
            return Err("1 issue(s) found".into());
        }
    };

    if config.has_api_key() {
        println!("  [ok]   Model API key configured ({})", config.default_provider);
    } else {
        println!("  [fail] No model API key — set OPENAI_API_KEY or api_key in config.toml");
        issues += 1;
    }

    match marketscout_providers::build_from_config(&config) {
        Ok(_) => println!("  [ok]   Provider '{}' resolvable", config.default_provider),
        Err(e) => {
            println!("  [fail] {e}");
            issues += 1;
        }
    }

    if config.search.api_key.is_some() {
        println!("  [ok]   Search API key configured");
    } else {
        println!("  [fail] No search API key — set TAVILY_API_KEY or search.api_key");
        issues += 1;
    }

    issues += check_templates(&config);

    println!();
    if issues == 0 {
        println!("  All checks passed!");
        return Ok(());
    }

    println!("  {issues} issue(s) found. See above for details.");
    println!("  `marketscout onboard` writes a default config and templates.");
    Err(format!("{issues} issue(s) found").into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::onboard::write_default_templates;

    #[test]
    fn default_templates_pass() {
        let dir = tempfile::tempdir().unwrap();
        write_default_templates(dir.path()).unwrap();
        let config = AppConfig {
            templates_dir: dir.path().to_path_buf(),
            ..AppConfig::default()
        };
        assert_eq!(check_templates(&config), 0);
    }

    #[test]
    fn configured_response_type_without_template_fails() {
        let dir = tempfile::tempdir().unwrap();
        write_default_templates(dir.path()).unwrap();
        let mut config = AppConfig {
            templates_dir: dir.path().to_path_buf(),
            ..AppConfig::default()
        };
        config.agents.response_types.push("summary".into());
        assert_eq!(check_templates(&config), 1);

        std::fs::write(dir.path().join("summary.md"), "Summarise.").unwrap();
        assert_eq!(check_templates(&config), 0);
    }
}
