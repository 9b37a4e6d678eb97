pub mod blocks;
pub mod edit;
pub mod init;
pub mod list;
pub mod new;
pub mod publish;
pub mod render;

pub use blocks::{blocks, BlocksArgs};
pub use edit::{edit, EditArgs};
pub use init::{init, InitArgs};
pub use list::{list, ListArgs};
pub use new::{new, NewArgs};
pub use publish::{publish, PublishArgs};
pub use render::{render, RenderArgs};

use crate::config::Config;
use anyhow::{Context, Result};
use pagecraft_blocks::PageDocument;
use pagecraft_gateway::{FileGateway, PageGateway};

/// Open the page directory named by the project config
pub(crate) async fn open_gateway(config: &Config, cwd: &str) -> Result<FileGateway> {
    let dir = config.get_pages_dir(cwd);
    FileGateway::open(&dir)
        .await
        .with_context(|| format!("cannot open pages directory {}", dir.display()))
}

/// Fetch a page by slug regardless of its status
pub(crate) async fn find_page(gateway: &FileGateway, slug: &str) -> Result<PageDocument> {
    gateway
        .get_page_by_slug(slug)
        .await
        .with_context(|| format!("no page with slug '{}'", slug))
}
