use super::{find_page, open_gateway};
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagecraft_blocks::Registry;
use pagecraft_gateway::{PublicPage, PublicPages};
use pagecraft_renderer::{html, Renderer};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Slug of the page
    pub slug: String,

    /// Render drafts too (builder preview)
    #[arg(long)]
    pub preview: bool,

    /// Write HTML to a file instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

pub async fn render(args: RenderArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let gateway = open_gateway(&config, cwd).await?;
    let registry = Registry::shared();
    let renderer = Renderer::new(registry, config.render_options());

    let response = if args.preview {
        let page = find_page(&gateway, &args.slug).await?;
        PublicPage {
            status: 200,
            page: renderer.render_page(&page),
        }
    } else {
        PublicPages::new(gateway).render(&args.slug, &renderer).await
    };

    if response.status != 200 {
        eprintln!(
            "{} {} answered {}",
            "⚠️".yellow(),
            args.slug,
            response.status.to_string().yellow()
        );
    }

    let output = html::to_html(&response.page, &config.html_options());
    match &args.out {
        Some(path) => {
            fs::write(path, output)?;
            eprintln!("{} Wrote {}", "✓".green(), path.display());
        }
        None => println!("{}", output),
    }

    Ok(())
}
