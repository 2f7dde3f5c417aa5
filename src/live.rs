use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{debug, warn};

use crate::model::{self, NodeId, StatusColor};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Polls the live status report off the UI thread. Each due tick spawns a
/// one-shot reader thread; the result comes back over a channel and is
/// picked up on a later frame.
pub struct StatusPoller {
    path: PathBuf,
    interval: Duration,
    pub enabled: bool,
    last_poll: Option<Instant>,
    rx: Option<mpsc::Receiver<Result<HashMap<NodeId, StatusColor>>>>,
}

impl StatusPoller {
    pub fn new(path: PathBuf, interval: Duration) -> Self {
        Self {
            path,
            interval,
            enabled: true,
            last_poll: None,
            rx: None,
        }
    }

    fn due(&self) -> bool {
        match self.last_poll {
            Some(at) => at.elapsed() >= self.interval,
            None => true,
        }
    }

    /// Drive the poll cycle from the frame loop. Returns a fresh status map
    /// when one arrived; on a failed read the previous map stays in effect
    /// and the error is logged once.
    pub fn tick(&mut self) -> Option<HashMap<NodeId, StatusColor>> {
        if let Some(rx) = &self.rx {
            match rx.try_recv() {
                Ok(Ok(statuses)) => {
                    self.rx = None;
                    return Some(statuses);
                }
                Ok(Err(err)) => {
                    self.rx = None;
                    warn!(path = %self.path.display(), %err, "status poll failed");
                }
                Err(mpsc::TryRecvError::Empty) => return None,
                Err(mpsc::TryRecvError::Disconnected) => self.rx = None,
            }
        }

        if !self.enabled || !self.due() {
            return None;
        }

        self.last_poll = Some(Instant::now());
        debug!(path = %self.path.display(), "polling live status");
        let (tx, rx) = mpsc::channel();
        let path = self.path.clone();
        thread::spawn(move || {
            let result = model::read_report(&path).map(|report| model::map_report(&report));
            let _ = tx.send(result);
        });
        self.rx = Some(rx);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_report(name: &str, raw: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("system-atlas-test-live");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, raw).unwrap();
        path
    }

    #[test]
    fn tick_delivers_a_mapped_report() {
        let path = write_report(
            "ok.json",
            r#"{"database": {"status": "online"}, "tables": [],
                "apiStatus": "online", "gameServerOnline": true}"#,
        );
        let mut poller = StatusPoller::new(path, Duration::from_secs(10));

        let mut result = None;
        for _ in 0..200 {
            if let Some(statuses) = poller.tick() {
                result = Some(statuses);
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        let statuses = result.expect("poll completes");
        assert_eq!(
            statuses.get(model::GAME_SERVER_NODE),
            Some(&StatusColor::Green)
        );
    }

    #[test]
    fn failed_read_reports_nothing() {
        let mut poller = StatusPoller::new(
            PathBuf::from("/nonexistent/status.json"),
            Duration::from_secs(10),
        );
        for _ in 0..200 {
            assert_eq!(poller.tick(), None);
            if poller.rx.is_none() && poller.last_poll.is_some() {
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn disabled_poller_never_spawns() {
        let mut poller = StatusPoller::new(PathBuf::from("unused.json"), Duration::from_secs(10));
        poller.enabled = false;
        assert_eq!(poller.tick(), None);
        assert!(poller.rx.is_none());
    }
}
