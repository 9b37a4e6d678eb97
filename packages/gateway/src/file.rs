//! Directory of JSON page files, one per page (`<id>.json`).

use crate::error::{GatewayError, GatewayResult};
use crate::gateway::PageGateway;
use async_trait::async_trait;
use chrono::Utc;
use pagecraft_blocks::{PageDocument, PageInput, PageSummary, Slug};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

const EXTENSION: &str = "json";

#[derive(Debug)]
pub struct FileGateway {
    dir: PathBuf,
    /// Serializes writers so slug checks and writes do not interleave
    write_lock: Mutex<()>,
}

impl FileGateway {
    /// Open (creating if needed) a page directory
    pub async fn open(dir: impl Into<PathBuf>) -> GatewayResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn page_path(&self, id: &str) -> GatewayResult<PathBuf> {
        // Ids are file names; refuse anything that could escape the directory
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(GatewayError::NotFound(id.to_string()));
        }
        Ok(self.dir.join(format!("{}.{}", id, EXTENSION)))
    }

    async fn read_page(path: &Path) -> GatewayResult<PageDocument> {
        let contents = fs::read_to_string(path).await?;
        serde_json::from_str(&contents).map_err(|e| GatewayError::Corrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    async fn write_page(&self, page: &PageDocument) -> GatewayResult<()> {
        let path = self.page_path(&page.id)?;
        let tmp = path.with_extension("json.tmp");
        let contents = serde_json::to_string_pretty(page)?;

        // Write then rename so readers never see a partial file
        fs::write(&tmp, contents).await?;
        fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Every readable page in the directory. Corrupt files are skipped.
    async fn load_all(&self) -> GatewayResult<Vec<PageDocument>> {
        let mut pages = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            match Self::read_page(&path).await {
                Ok(page) => pages.push(page),
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable page file"),
            }
        }

        Ok(pages)
    }

    async fn ensure_slug_free(&self, slug: &Slug, own_id: Option<&str>) -> GatewayResult<()> {
        let taken = self
            .load_all()
            .await?
            .into_iter()
            .any(|page| &page.slug == slug && Some(page.id.as_str()) != own_id);

        if taken {
            Err(GatewayError::SlugTaken(slug.clone()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PageGateway for FileGateway {
    async fn get_page_by_slug(&self, slug: &str) -> GatewayResult<PageDocument> {
        let slug = Slug::parse(slug)?;
        self.load_all()
            .await?
            .into_iter()
            .find(|page| page.slug == slug)
            .ok_or_else(|| GatewayError::NotFound(slug.to_string()))
    }

    async fn get_page(&self, id: &str) -> GatewayResult<PageDocument> {
        let path = self.page_path(id)?;
        match Self::read_page(&path).await {
            Err(GatewayError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                Err(GatewayError::NotFound(id.to_string()))
            }
            other => other,
        }
    }

    #[instrument(skip(self, input), fields(slug = %input.slug))]
    async fn create_page(&self, input: PageInput) -> GatewayResult<PageDocument> {
        let _guard = self.write_lock.lock().await;
        self.ensure_slug_free(&input.slug, None).await?;

        let page = PageDocument::from_input(Uuid::new_v4().to_string(), input, Utc::now());
        self.write_page(&page).await?;

        debug!(page_id = %page.id, "Created page file");
        Ok(page)
    }

    #[instrument(skip(self, input), fields(slug = %input.slug))]
    async fn update_page(&self, id: &str, input: PageInput) -> GatewayResult<PageDocument> {
        let _guard = self.write_lock.lock().await;
        let existing = self.get_page(id).await?;
        self.ensure_slug_free(&input.slug, Some(id)).await?;

        let mut page = PageDocument::from_input(id, input, Utc::now());
        page.created_at = existing.created_at.or(page.created_at);
        self.write_page(&page).await?;

        debug!(page_id = %id, "Updated page file");
        Ok(page)
    }

    async fn delete_page(&self, id: &str) -> GatewayResult<()> {
        let _guard = self.write_lock.lock().await;
        let path = self.page_path(id)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(GatewayError::NotFound(id.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_pages(&self) -> GatewayResult<Vec<PageSummary>> {
        let mut summaries: Vec<_> = self
            .load_all()
            .await?
            .iter()
            .map(PageDocument::summary)
            .collect();
        summaries.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(summaries)
    }
}
