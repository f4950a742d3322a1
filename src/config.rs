use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use url::Url;

const PROJECT_FILE: &str = "herald.yaml";

fn default_posts_directory() -> PathBuf {
    PathBuf::from("posts")
}

fn default_static_routes() -> Vec<String> {
    vec!["/".to_owned(), "/features".to_owned(), "/blog".to_owned()]
}

#[derive(Deserialize)]
struct Project {
    site_url: Url,
    title: String,
    description: String,

    #[serde(default = "default_posts_directory")]
    posts_directory: PathBuf,

    #[serde(default = "default_static_routes")]
    static_routes: Vec<String>,
}

/// Site-wide metadata injected into the feed and route builders. Read-only
/// for the duration of a build; nothing in the core reaches for ambient
/// globals.
pub struct Site {
    pub url: Url,
    pub title: String,
    pub description: String,
    pub static_routes: Vec<String>,
}

pub struct Config {
    pub site: Site,
    pub posts_source_directory: PathBuf,
}

impl Config {
    /// Loads the configuration from the `herald.yaml` in `dir` or the
    /// nearest parent directory that has one.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let path = dir.join(PROJECT_FILE);
        if path.exists() {
            match Config::from_project_file(&path) {
                Ok(config) => Ok(config),
                Err(e) => Err(anyhow!("Loading configuration: {:?}", e)),
            }
        } else {
            match dir.parent() {
                Some(parent) => Config::from_directory(parent),
                None => Err(anyhow!(
                    "Could not find `{}` in any parent directory",
                    PROJECT_FILE
                )),
            }
        }
    }

    pub fn from_project_file(path: &Path) -> Result<Config> {
        let file = File::open(path)
            .map_err(|e| anyhow!("Opening project file `{}`: {}", path.display(), e))?;
        let project: Project = serde_yaml::from_reader(file)?;
        match path.parent() {
            None => Err(anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )),
            Some(project_root) => Ok(Config {
                posts_source_directory: project_root.join(&project.posts_directory),
                site: Site {
                    url: project.site_url,
                    title: project.title,
                    description: project.description,
                    static_routes: project.static_routes,
                },
            }),
        }
    }
}
