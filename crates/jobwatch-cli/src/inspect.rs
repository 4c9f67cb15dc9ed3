//! Read-only `sites` listing and the `baseline` maintenance commands.

use anyhow::Context;
use jobwatch_core::{select_enabled_sites, AppConfig, SiteConfig, SitesFile, SourceConfig};
use jobwatch_store::{BaselineStore, JsonFileStore};

use crate::setup::load_sites_file;

pub(crate) fn list_sites(config: &AppConfig) -> anyhow::Result<()> {
    let sites_file = load_sites_file(config)?;
    let enabled: Vec<&str> = select_enabled_sites(&sites_file.sites, config.enabled_sites.as_deref())
        .into_iter()
        .map(|s| s.name.as_str())
        .collect();

    for site in &sites_file.sites {
        let marker = if enabled.contains(&site.name.as_str()) { "*" } else { " " };
        let source = match &site.source {
            SourceConfig::Html { .. } => "html".to_owned(),
            SourceConfig::Greenhouse { board, .. } => format!("greenhouse:{board}"),
        };
        let categories = if site.category_keywords.is_empty() {
            format!("{} default categories", sites_file.default_category_keywords.len())
        } else {
            format!("{} own categories", site.category_keywords.len())
        };
        println!(
            "{marker} {:<24} {source:<24} {categories:<22} {}",
            site.name, site.url
        );
    }
    println!("{} of {} site(s) enabled", enabled.len(), sites_file.sites.len());
    Ok(())
}

/// Finds `name` among the configured sites, ignoring case.
fn find_site<'a>(sites_file: &'a SitesFile, name: &str) -> anyhow::Result<&'a SiteConfig> {
    let wanted = name.trim().to_lowercase();
    sites_file
        .sites
        .iter()
        .find(|s| s.name.to_lowercase() == wanted)
        .ok_or_else(|| anyhow::anyhow!("site '{name}' is not in the sites file"))
}

pub(crate) async fn show_baseline(config: &AppConfig, name: &str) -> anyhow::Result<()> {
    let sites_file = load_sites_file(config)?;
    let site = find_site(&sites_file, name)?;
    let store = JsonFileStore::new(config.baseline_dir.clone());

    let titles = store
        .load(&site.name)
        .await
        .with_context(|| format!("failed to read baseline for {}", site.name))?;

    println!(
        "{}: {} known title(s) in {}",
        site.name,
        titles.len(),
        store.path_for(&site.name).display()
    );
    for title in &titles {
        println!("  {title}");
    }
    Ok(())
}

/// Deletes a site's baseline so its next run reports every posting as new.
pub(crate) async fn clear_baseline(config: &AppConfig, name: &str) -> anyhow::Result<()> {
    let sites_file = load_sites_file(config)?;
    let site = find_site(&sites_file, name)?;
    let store = JsonFileStore::new(config.baseline_dir.clone());

    let removed = store
        .clear(&site.name)
        .await
        .with_context(|| format!("failed to clear baseline for {}", site.name))?;

    if removed {
        tracing::info!(site = %site.name, "baseline cleared");
        println!("cleared baseline for {}", site.name);
    } else {
        println!("{} has no saved baseline", site.name);
    }
    Ok(())
}
