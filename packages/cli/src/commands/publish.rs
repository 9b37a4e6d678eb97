use super::{find_page, open_gateway};
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagecraft_blocks::PageStatus;
use pagecraft_gateway::PageGateway;

#[derive(Debug, Args)]
pub struct PublishArgs {
    /// Slug of the page
    pub slug: String,
}

/// Set a page's status to published (`publish = true`) or back to draft
pub async fn publish(args: PublishArgs, publish: bool, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let gateway = open_gateway(&config, cwd).await?;
    let page = find_page(&gateway, &args.slug).await?;

    let status = if publish {
        PageStatus::Published
    } else {
        PageStatus::Draft
    };
    if page.status == status {
        println!("{} {} is already {:?}", "•".dimmed(), args.slug, status);
        return Ok(());
    }

    let mut input = page.to_input();
    input.status = status;
    gateway.update_page(&page.id, input).await?;

    if publish {
        println!("{} Published {}", "✓".green(), args.slug.bright_white());
    } else {
        println!("{} Unpublished {}", "✓".green(), args.slug.bright_white());
    }
    Ok(())
}
