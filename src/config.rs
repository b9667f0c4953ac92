use crate::constants::{
    DEFAULT_BRANCH, DEFAULT_CSV_URL, DEFAULT_MAX_IMAGES, DEFAULT_PHOTOS_FOLDER, DEFAULT_REPO_NAME,
    DEFAULT_REPO_OWNER, DEFAULT_TOPICS,
};
use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Subsection whose gallery is filled from photos tagged with `prefix`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TopicMapping {
    pub subsection: String,
    pub prefix: String,
}

/// Where enrichment data lives. Every field has a default, so a config file
/// only needs the values it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    pub repo_owner: String,
    pub repo_name: String,
    pub branch: String,
    pub photos_folder: String,
    pub max_images: usize,
    pub github_token: Option<String>,
    pub csv_url: String,
    pub topics: Vec<TopicMapping>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            repo_owner: DEFAULT_REPO_OWNER.to_string(),
            repo_name: DEFAULT_REPO_NAME.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            photos_folder: DEFAULT_PHOTOS_FOLDER.to_string(),
            max_images: DEFAULT_MAX_IMAGES,
            github_token: None,
            csv_url: DEFAULT_CSV_URL.to_string(),
            topics: DEFAULT_TOPICS
                .iter()
                .map(|&(subsection, prefix)| TopicMapping {
                    subsection: subsection.to_string(),
                    prefix: prefix.to_string(),
                })
                .collect(),
        }
    }
}

impl SiteSettings {
    fn validate(self) -> Result<Self> {
        if self.max_images == 0 {
            return Err(Error::Config("max_images must be at least 1".to_string()));
        }
        if let Some(topic) = self.topics.iter().find(|t| t.prefix.trim().is_empty()) {
            return Err(Error::Config(format!(
                "topic for subsection '{}' has an empty prefix",
                topic.subsection
            )));
        }
        Ok(self)
    }
}

pub fn parse_settings(content: &str) -> Result<SiteSettings> {
    toml::from_str::<SiteSettings>(content)?.validate()
}

/// Load settings from a TOML file, or defaults when the file does not exist
pub fn load_settings(path: &Path) -> Result<SiteSettings> {
    if !path.exists() {
        log::info!("No config at {}, using defaults", path.display());
        return Ok(SiteSettings::default());
    }
    parse_settings(&fs::read_to_string(path)?)
}
