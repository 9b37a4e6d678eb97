use super::open_gateway;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagecraft_blocks::PageStatus;
use pagecraft_gateway::PageGateway;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only show published pages
    #[arg(long)]
    pub published: bool,
}

pub async fn list(args: ListArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let gateway = open_gateway(&config, cwd).await?;

    let pages: Vec<_> = gateway
        .list_pages()
        .await?
        .into_iter()
        .filter(|page| !args.published || page.status == PageStatus::Published)
        .collect();

    if pages.is_empty() {
        println!("{}", "No pages yet".yellow());
        return Ok(());
    }

    for page in &pages {
        let status = match page.status {
            PageStatus::Published => "published".green(),
            PageStatus::Draft => "draft".yellow(),
        };
        let updated = page
            .updated_at
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();

        println!(
            "  {:<10} {:<28} {:<32} {}",
            status,
            page.slug.as_str().bright_white(),
            page.title,
            updated.dimmed()
        );
    }

    println!();
    println!("{} pages", pages.len());
    Ok(())
}
