//! Output sinks for published fetch results.

use std::path::PathBuf;

use healthsnap_types::Snapshot;
use tokio::sync::mpsc;

use crate::state::Published;

/// Where the collector sends each published result.
#[derive(Debug)]
pub enum Output {
    /// Write the snapshot and record as pretty JSON.
    ///
    /// The file is overwritten on every fetch.
    File(PathBuf),

    /// Send snapshots through a channel.
    ///
    /// Use `Output::channel()` to create this variant and get the receiver.
    Channel(mpsc::Sender<Snapshot>),
}

impl Output {
    /// Create a file output.
    ///
    /// ```rust
    /// use healthsnap_sdk::Output;
    ///
    /// let output = Output::file("health.json");
    /// ```
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Output::File(path.into())
    }

    /// Create a channel output and return both the output and receiver.
    ///
    /// ```rust
    /// use healthsnap_sdk::Output;
    ///
    /// let (output, mut rx) = Output::channel(4);
    /// ```
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<Snapshot>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Output::Channel(tx), rx)
    }

    pub(crate) async fn emit(&self, published: &Published) -> std::io::Result<()> {
        match self {
            Output::File(path) => {
                let json = serde_json::to_string_pretty(published)?;
                tokio::fs::write(path, json).await?;
            }
            Output::Channel(tx) => {
                // Best effort; a full or closed channel drops the snapshot.
                let _ = tx.try_send(published.snapshot.clone());
            }
        }
        Ok(())
    }
}
