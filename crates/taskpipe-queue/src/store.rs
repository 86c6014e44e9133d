//! Queue store trait and adapters.

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;
use uuid::Uuid;

use crate::error::QueueError;

/// Shared FIFO queue store.
///
/// Implementations must be safe for concurrent use; the dequeue of a single
/// entry succeeds for exactly one caller.
#[async_trait]
pub trait QueueStore: Send + Sync {
    /// Append an opaque payload to the tail of a queue.
    async fn enqueue(&self, queue: &str, payload: &[u8]) -> Result<(), QueueError>;

    /// Remove and return the oldest payload, or `None` when the queue is
    /// empty. Empty is not an error: callers must be able to distinguish
    /// "nothing to do" from "store unreachable".
    async fn dequeue(&self, queue: &str) -> Result<Option<Vec<u8>>, QueueError>;

    /// Cheap reachability probe, used by readiness checks and fail-fast
    /// startup.
    async fn ping(&self) -> Result<(), QueueError>;
}

/// Name of the dead-letter queue paired with `queue`.
///
/// Undeserializable payloads are parked there instead of being dropped.
pub fn dead_letter_queue(queue: &str) -> String {
    format!("{queue}.dead-letter")
}

fn validate_queue_name(name: &str) -> Result<(), QueueError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if valid {
        Ok(())
    } else {
        Err(QueueError::InvalidQueueName(name.to_string()))
    }
}

/// In-memory queue store for tests and single-process runs.
pub struct MemoryQueueStore {
    queues: RwLock<HashMap<String, VecDeque<Vec<u8>>>>,
}

impl MemoryQueueStore {
    /// Create a new memory store.
    pub fn new() -> Self {
        Self {
            queues: RwLock::new(HashMap::new()),
        }
    }

    /// Number of entries currently in a queue.
    pub async fn len(&self, queue: &str) -> usize {
        let queues = self.queues.read().await;
        queues.get(queue).map_or(0, VecDeque::len)
    }
}

impl Default for MemoryQueueStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QueueStore for MemoryQueueStore {
    async fn enqueue(&self, queue: &str, payload: &[u8]) -> Result<(), QueueError> {
        validate_queue_name(queue)?;
        let mut queues = self.queues.write().await;
        queues
            .entry(queue.to_string())
            .or_default()
            .push_back(payload.to_vec());
        Ok(())
    }

    async fn dequeue(&self, queue: &str) -> Result<Option<Vec<u8>>, QueueError> {
        validate_queue_name(queue)?;
        let mut queues = self.queues.write().await;
        Ok(queues.get_mut(queue).and_then(VecDeque::pop_front))
    }

    async fn ping(&self) -> Result<(), QueueError> {
        Ok(())
    }
}

/// File system based queue store.
///
/// Each queue is a directory under the store root; entries are files named
/// by a zero-padded monotonic sequence so lexicographic order equals FIFO
/// order:
///
/// ```text
/// {root}/
/// └── {queue}/
///     ├── 00000000000000000001.task
///     └── 00000000000000000002.task
/// ```
///
/// Enqueue writes to a hidden temp file and renames it into place, so a
/// partially written entry is never visible to `dequeue`. Dequeue claims an
/// entry by renaming it to a claimant-unique name; the rename succeeds for
/// exactly one consumer.
pub struct FileQueueStore {
    root: PathBuf,
    // Next sequence per queue, seeded from a directory scan on first use.
    // Process-local; concurrent producers over one directory should share a
    // store instance.
    next_seq: Mutex<HashMap<String, u64>>,
}

impl FileQueueStore {
    /// Create a new file-backed store rooted at `root`.
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self, QueueError> {
        let root = root.into();
        fs::create_dir_all(&root)
            .await
            .map_err(|e| QueueError::Unavailable(format!("Failed to create store root: {e}")))?;

        debug!("FileQueueStore initialized at {:?}", root);

        Ok(Self {
            root,
            next_seq: Mutex::new(HashMap::new()),
        })
    }

    fn queue_dir(&self, queue: &str) -> PathBuf {
        self.root.join(queue)
    }

    /// Sorted sequence-named entry files currently in the queue directory.
    async fn entry_files(&self, queue: &str) -> Result<Vec<String>, QueueError> {
        let dir = self.queue_dir(queue);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        let mut entries = fs::read_dir(&dir)
            .await
            .map_err(|e| QueueError::Unavailable(format!("Failed to read queue dir: {e}")))?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| QueueError::Unavailable(format!("Failed to read queue dir: {e}")))?
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.ends_with(".task") {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    async fn reserve_seq(&self, queue: &str) -> Result<u64, QueueError> {
        let mut map = self.next_seq.lock().await;
        let next = match map.get(queue) {
            Some(&n) => n,
            None => {
                let max = self
                    .entry_files(queue)
                    .await?
                    .iter()
                    .filter_map(|name| name.split('.').next()?.parse::<u64>().ok())
                    .max()
                    .unwrap_or(0);
                max + 1
            }
        };
        map.insert(queue.to_string(), next + 1);
        Ok(next)
    }
}

#[async_trait]
impl QueueStore for FileQueueStore {
    async fn enqueue(&self, queue: &str, payload: &[u8]) -> Result<(), QueueError> {
        validate_queue_name(queue)?;

        let dir = self.queue_dir(queue);
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| QueueError::Unavailable(format!("Failed to create queue dir: {e}")))?;

        let seq = self.reserve_seq(queue).await?;
        let tmp = dir.join(format!(".{seq:020}.tmp"));
        let path = dir.join(format!("{seq:020}.task"));

        fs::write(&tmp, payload)
            .await
            .map_err(|e| QueueError::Unavailable(format!("Failed to write entry: {e}")))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| QueueError::Unavailable(format!("Failed to commit entry: {e}")))?;

        debug!(queue = %queue, seq = seq, "Enqueued entry");
        Ok(())
    }

    async fn dequeue(&self, queue: &str) -> Result<Option<Vec<u8>>, QueueError> {
        validate_queue_name(queue)?;

        let dir = self.queue_dir(queue);
        for name in self.entry_files(queue).await? {
            let path = dir.join(&name);
            let claim = dir.join(format!(".{}.claim-{}", name, Uuid::new_v4()));

            // The rename succeeds for exactly one claimant; a loser moves on
            // to the next oldest entry.
            if fs::rename(&path, &claim).await.is_err() {
                continue;
            }

            let payload = fs::read(&claim)
                .await
                .map_err(|e| QueueError::Unavailable(format!("Failed to read entry: {e}")))?;
            fs::remove_file(&claim).await.ok();

            debug!(queue = %queue, entry = %name, "Dequeued entry");
            return Ok(Some(payload));
        }

        Ok(None)
    }

    async fn ping(&self) -> Result<(), QueueError> {
        let probe = self.root.join(".ping");
        fs::write(&probe, b"ping")
            .await
            .map_err(|e| QueueError::Unavailable(format!("Store probe failed: {e}")))?;
        fs::remove_file(&probe)
            .await
            .map_err(|e| QueueError::Unavailable(format!("Store probe failed: {e}")))?;
        Ok(())
    }
}
