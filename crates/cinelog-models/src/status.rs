use serde::{Deserialize, Serialize};

/// Which half of the watchlist a movie belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum WatchStatus {
    /// Still on the list to watch
    Pending,
    /// Already seen
    Watched,
}

impl WatchStatus {
    pub fn of(watched: bool) -> Self {
        if watched {
            WatchStatus::Watched
        } else {
            WatchStatus::Pending
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WatchStatus::Pending => "Pending",
            WatchStatus::Watched => "Watched",
        }
    }
}
