// runtime settings, resolved once at startup and handed to whoever needs them

use std::path::PathBuf;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Explicit key wins, then `OPENAI_KEY`, then `OPENAI_API_KEY`.
    pub fn with_api_key(self, explicit: Option<String>) -> Self {
        self.with_api_key_from(explicit, |name| std::env::var(name).ok())
    }

    // a blank candidate falls through to the next one
    fn with_api_key_from(
        mut self,
        explicit: Option<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let non_blank = |k: &String| !k.trim().is_empty();
        self.api_key = explicit
            .filter(non_blank)
            .or_else(|| lookup("OPENAI_KEY").filter(non_blank))
            .or_else(|| lookup("OPENAI_API_KEY").filter(non_blank));
        self
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        if let Some(model) = model {
            self.model = model;
        }
        self
    }

    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url {
            self.base_url = url.trim_end_matches('/').to_string();
        }
        self
    }
}

// ~/.local/share/gab/gab.db or the platform equivalent
pub fn default_database_url() -> String {
    let dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gab");
    format!("sqlite://{}", dir.join("gab.db").display())
}
