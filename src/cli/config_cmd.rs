use anyhow::Result;

use crate::cli::output::OutputOptions;
use crate::core::config::AppConfig;

pub fn init(_opts: &OutputOptions) -> Result<()> {
    let path = AppConfig::config_path();
    if path.exists() {
        eprintln!("Config file already exists at {}", path.display());
        eprintln!("Remove it first if you want to regenerate.");
        return Ok(());
    }

    let config = AppConfig::default();
    match config.save() {
        Ok(path) => {
            println!("Generated config at {}", path.display());
            println!("  Report URL: {}", config.router.url);
            println!("  Point it at your router with `qm config set-url <URL>`.");
        }
        Err(e) => {
            eprintln!("Failed to generate config: {}", e);
            std::process::exit(1);
        }
    }
    Ok(())
}

pub fn check(_opts: &OutputOptions) -> Result<()> {
    let path = AppConfig::config_path();
    if !path.exists() {
        eprintln!("No config file found at {}", path.display());
        eprintln!("Run `qm config init` to create one.");
        return Ok(());
    }

    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    let issues = config.validate();
    if issues.is_empty() {
        println!("Config is valid: {}", path.display());
        println!("  Report URL: {}", config.router.url);
        println!("  Timeout: {}s", config.router.timeout_secs);
    } else {
        eprintln!("Config issues found in {}:", path.display());
        for issue in &issues {
            eprintln!("  - {}", issue);
        }
        std::process::exit(1);
    }
    Ok(())
}

pub fn set_url(url: &str, _opts: &OutputOptions) -> Result<()> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        eprintln!("Report URL must start with http:// or https://");
        std::process::exit(1);
    }

    let mut config = AppConfig::load()?;
    config.router.url = url.to_string();
    config.save()?;
    println!("Report URL set to {}", url);
    Ok(())
}

pub fn set_timeout(secs: u64, _opts: &OutputOptions) -> Result<()> {
    if secs == 0 {
        eprintln!("Timeout must be at least 1 second");
        std::process::exit(1);
    }

    let mut config = AppConfig::load()?;
    config.router.timeout_secs = secs;
    config.save()?;
    println!("Fetch timeout set to {}s", secs);
    Ok(())
}
