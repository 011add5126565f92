//! Background library fetches.
//!
//! The event loop is synchronous; fetches run on a small tokio runtime and
//! report back over a channel that the loop drains every tick.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use tokio::runtime::{Builder, Runtime};
use tracing::debug;

use crate::error::LibraryError;
use crate::library::{Folder, LibraryLoader, Track};
use crate::player::LoadTicket;

pub enum FetchMsg {
    Catalog(Result<Vec<Folder>, LibraryError>),
    Tracks(LoadTicket, Result<Vec<Track>, LibraryError>),
}

pub struct Fetcher {
    runtime: Runtime,
    loader: Arc<LibraryLoader>,
    tx: Sender<FetchMsg>,
    rx: Receiver<FetchMsg>,
}

impl Fetcher {
    pub fn new(loader: LibraryLoader) -> std::io::Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("albumdeck-fetch")
            .enable_all()
            .build()?;
        let (tx, rx) = mpsc::channel();
        Ok(Self {
            runtime,
            loader: Arc::new(loader),
            tx,
            rx,
        })
    }

    pub fn list_folders_blocking(&self) -> Result<Vec<Folder>, LibraryError> {
        self.runtime.block_on(self.loader.list_folders())
    }

    pub fn list_tracks_blocking(&self, folder: &Folder) -> Result<Vec<Track>, LibraryError> {
        self.runtime.block_on(self.loader.list_tracks(folder))
    }

    pub fn request_catalog(&self) {
        let loader = self.loader.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = loader.list_folders().await;
            let _ = tx.send(FetchMsg::Catalog(result));
        });
    }

    /// Fetch tracks for the ticket's folder. Completion order across
    /// requests is not guaranteed; the ticket sorts that out.
    pub fn request_tracks(&self, ticket: LoadTicket) {
        debug!(folder = %ticket.folder().id, "fetching tracks");
        let loader = self.loader.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = loader.list_tracks(ticket.folder()).await;
            let _ = tx.send(FetchMsg::Tracks(ticket, result));
        });
    }

    pub fn try_recv(&self) -> Option<FetchMsg> {
        self.rx.try_recv().ok()
    }
}
