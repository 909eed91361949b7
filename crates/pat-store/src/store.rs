//! Where boards live between operations
//!
//! One board per site. Stores give no cross-process locking: the last save
//! wins.

use async_trait::async_trait;
use pat_core::{Board, PatError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Load and save whole boards by site id
#[async_trait]
pub trait BoardStore: Send + Sync {
    /// Fails when nothing has been saved for `site`
    async fn load_board(&self, site: &str) -> Result<Board>;

    async fn save_board(&self, site: &str, board: &Board) -> Result<()>;
}

/// Site ids become file names, so keep them to a single plain component
fn check_site(site: &str) -> Result<()> {
    let valid = !site.is_empty()
        && !site.starts_with('.')
        && site
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.');
    if valid {
        Ok(())
    } else {
        Err(PatError::Store(format!("invalid site id: {:?}", site)))
    }
}

/// One pretty-printed `<site>.json` per site under a root directory
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn board_path(&self, site: &str) -> PathBuf {
        self.root.join(format!("{}.json", site))
    }
}

#[async_trait]
impl BoardStore for JsonFileStore {
    async fn load_board(&self, site: &str) -> Result<Board> {
        check_site(site)?;
        let path = self.board_path(site);
        debug!("Reading board file: {}", path.display());

        let data = match fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PatError::Store(format!("no board saved for site {}", site)));
            }
            Err(e) => return Err(e.into()),
        };
        let board: Board = serde_json::from_slice(&data)?;
        info!(
            "Loaded board for site {} ({} zones, {} events)",
            site,
            board.zones.len(),
            board.timeline.len()
        );
        Ok(board)
    }

    /// Written to a temp file first and renamed over the old board, so a
    /// crash mid-write leaves the previous board intact
    async fn save_board(&self, site: &str, board: &Board) -> Result<()> {
        check_site(site)?;
        fs::create_dir_all(&self.root).await?;

        let data = serde_json::to_vec_pretty(board)?;
        let path = self.board_path(site);
        let tmp = self.root.join(format!(".{}.json.tmp", site));
        debug!("Writing board file: {}", path.display());

        fs::write(&tmp, data).await?;
        fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

/// In-process store, for tests and single-run tools
#[derive(Debug, Default)]
pub struct MemoryStore {
    boards: RwLock<HashMap<String, Board>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `board` for `site`
    pub fn with_board(site: impl Into<String>, board: Board) -> Self {
        let mut boards = HashMap::new();
        boards.insert(site.into(), board);
        Self {
            boards: RwLock::new(boards),
        }
    }

    pub async fn sites(&self) -> Vec<String> {
        let mut sites: Vec<String> = self.boards.read().await.keys().cloned().collect();
        sites.sort();
        sites
    }
}

#[async_trait]
impl BoardStore for MemoryStore {
    async fn load_board(&self, site: &str) -> Result<Board> {
        self.boards
            .read()
            .await
            .get(site)
            .cloned()
            .ok_or_else(|| PatError::Store(format!("no board saved for site {}", site)))
    }

    async fn save_board(&self, site: &str, board: &Board) -> Result<()> {
        self.boards
            .write()
            .await
            .insert(site.to_string(), board.clone());
        Ok(())
    }
}
