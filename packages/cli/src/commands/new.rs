use super::open_gateway;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagecraft_blocks::{PageDocument, Slug};
use pagecraft_gateway::PageGateway;

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Page title
    pub title: String,

    /// URL slug (derived from the title when omitted)
    #[arg(short, long)]
    pub slug: Option<String>,
}

pub async fn new(args: NewArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let gateway = open_gateway(&config, cwd).await?;

    let slug = match &args.slug {
        Some(slug) => Slug::parse(slug)?,
        None => Slug::from_title(&args.title)?,
    };

    let page = PageDocument::blank(slug, args.title);
    let created = gateway.create_page(page.to_input()).await?;

    println!(
        "{} Created draft {} ({})",
        "✓".green(),
        created.slug.as_str().bright_white(),
        created.id.dimmed()
    );
    Ok(())
}
