use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

use crate::domain::entities::dataset::DatasetKind;

pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
pub const DEFAULT_LOG_FILTER: &str = "chamados=debug,info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub cache_ttl: Duration,
    pub default_dataset: DatasetKind,
    pub admin: Option<AdminBootstrap>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let db_path = match lookup("CHAMADOS_DB_PATH").filter(|v| !v.trim().is_empty()) {
            Some(path) => PathBuf::from(path),
            None => default_db_path()?,
        };

        let cache_ttl = lookup("CHAMADOS_CACHE_TTL_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_CACHE_TTL_SECS);

        let default_dataset = lookup("CHAMADOS_DEFAULT_DATASET")
            .and_then(|v| DatasetKind::parse(&v))
            .unwrap_or(DatasetKind::Pixeon);

        let admin = match (
            lookup("CHAMADOS_ADMIN_EMAIL"),
            lookup("CHAMADOS_ADMIN_PASSWORD"),
        ) {
            (Some(email), Some(password)) if !email.trim().is_empty() && !password.is_empty() => {
                Some(AdminBootstrap {
                    email: email.trim().to_string(),
                    password,
                })
            }
            _ => None,
        };

        Ok(Self {
            db_path,
            cache_ttl: Duration::from_secs(cache_ttl),
            default_dataset,
            admin,
        })
    }
}

pub fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "chamados", "chamados")
        .ok_or_else(|| anyhow!("unable to resolve data directory"))
}

pub fn default_db_path() -> Result<PathBuf> {
    Ok(project_dirs()?.data_local_dir().join("chamados.sqlite"))
}

pub fn ensure_webview_data_dir(base_data_dir: &Path) -> Result<PathBuf> {
    let webview_data_dir = base_data_dir.join("webview2");
    std::fs::create_dir_all(&webview_data_dir).with_context(|| {
        format!(
            "failed to create webview data dir: {}",
            webview_data_dir.display()
        )
    })?;
    Ok(webview_data_dir)
}

pub fn default_webview_data_dir() -> Result<PathBuf> {
    ensure_webview_data_dir(project_dirs()?.data_local_dir())
}
