//! A site's board kept in memory and saved after every change

use pat_board::{Engine, Stamper, SystemStamper};
use pat_core::{Board, BoardEvent, PatError, Result, SiteConfig};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::fail_open::fail_open_with_retries;
use crate::store::BoardStore;

/// Save attempts before giving up on persisting a change
const SAVE_ATTEMPTS: usize = 3;

/// Serializes operations on one site's board
///
/// The board is loaded from the store on first use and cached. After each
/// successful operation it is saved; a failed save is only logged and the
/// cached board stays authoritative.
pub struct SiteBoard<St: BoardStore, S: Stamper = SystemStamper> {
    site: String,
    engine: Engine<S>,
    store: St,
    board: Mutex<Option<Board>>,
}

impl<St: BoardStore> SiteBoard<St> {
    pub fn from_config(config: &SiteConfig, store: St) -> Self {
        Self::new(config.id.clone(), Engine::new(config.engine()), store)
    }
}

impl<St: BoardStore, S: Stamper> SiteBoard<St, S> {
    pub fn new(site: impl Into<String>, engine: Engine<S>, store: St) -> Self {
        Self {
            site: site.into(),
            engine,
            store,
            board: Mutex::new(None),
        }
    }

    pub fn site(&self) -> &str {
        &self.site
    }

    pub fn engine(&self) -> &Engine<S> {
        &self.engine
    }

    pub fn store(&self) -> &St {
        &self.store
    }

    async fn loaded<'a>(&self, cached: &'a mut Option<Board>) -> Result<&'a mut Board> {
        if cached.is_none() {
            let loaded = self.store.load_board(&self.site).await?;
            info!("Opened board for site {}", self.site);
            *cached = Some(loaded);
        }
        cached
            .as_mut()
            .ok_or_else(|| PatError::Store(format!("board for site {} not loaded", self.site)))
    }

    /// Run one engine operation against the site's board and save it
    ///
    /// Nothing is saved when the operation fails.
    pub async fn apply<F, T>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&Engine<S>, &mut Board) -> Result<T>,
    {
        let mut cached = self.board.lock().await;
        let board = self.loaded(&mut cached).await?;
        let out = op(&self.engine, board)?;

        debug!("Saving board for site {}", self.site);
        let snapshot: &Board = board;
        let site = self.site.as_str();
        let store = &self.store;
        fail_open_with_retries(
            "save_board",
            move || store.save_board(site, snapshot),
            SAVE_ATTEMPTS,
        )
        .await;
        Ok(out)
    }

    pub async fn undo(&self) -> Result<BoardEvent> {
        self.apply(|engine, board| engine.undo(board)).await
    }

    /// Copy of the current board, loading it if needed
    pub async fn snapshot(&self) -> Result<Board> {
        let mut cached = self.board.lock().await;
        Ok(self.loaded(&mut cached).await?.clone())
    }

    /// Start over from a given board and persist it
    pub async fn replace(&self, board: Board) -> Result<()> {
        let mut cached = self.board.lock().await;
        self.store.save_board(&self.site, &board).await?;
        info!("Replaced board for site {}", self.site);
        *cached = Some(board);
        Ok(())
    }

    /// Drop the cached board; the next operation reloads it from the store
    pub async fn invalidate(&self) {
        self.board.lock().await.take();
    }
}
