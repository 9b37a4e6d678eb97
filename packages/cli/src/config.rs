use pagecraft_renderer::{HtmlOptions, RawMarkupPolicy, RenderOptions, DEFAULT_MAX_DEPTH};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "pagecraft.config.json";

/// Pagecraft configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding one JSON file per page
    #[serde(default = "default_pages_dir")]
    pub pages_dir: String,

    /// Deepest block nesting the renderer will follow
    #[serde(default = "default_max_render_depth")]
    pub max_render_depth: usize,

    /// Undo levels kept while editing
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// How custom code blocks and page CSS/JS reach the HTML output
    #[serde(default)]
    pub raw_markup: RawMarkup,

    #[serde(default = "default_pretty_html")]
    pub pretty_html: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawMarkup {
    #[default]
    Verbatim,
    Escape,
    Omit,
}

impl RawMarkup {
    pub fn policy(self) -> RawMarkupPolicy {
        match self {
            RawMarkup::Verbatim => RawMarkupPolicy::Verbatim,
            RawMarkup::Escape => RawMarkupPolicy::Escape,
            RawMarkup::Omit => RawMarkupPolicy::Omit,
        }
    }
}

fn default_pages_dir() -> String {
    "pages".to_string()
}

fn default_max_render_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_history_limit() -> usize {
    pagecraft_editor::DEFAULT_HISTORY_LIMIT
}

fn default_pretty_html() -> bool {
    true
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Get absolute path to the pages directory
    pub fn get_pages_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.pages_dir)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            max_depth: self.max_render_depth,
        }
    }

    pub fn html_options(&self) -> HtmlOptions {
        let options = HtmlOptions::new(self.raw_markup.policy());
        if self.pretty_html {
            options
        } else {
            options.compact()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pages_dir: default_pages_dir(),
            max_render_depth: default_max_render_depth(),
            history_limit: default_history_limit(),
            raw_markup: RawMarkup::default(),
            pretty_html: default_pretty_html(),
        }
    }
}
