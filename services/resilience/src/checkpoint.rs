//! Per-stream checkpoint tracking.

use dashmap::DashMap;

struct StreamCheckpoint {
    last_seq: i64,
    last_checkpoint_seq: i64,
}

pub struct CheckpointManager {
    streams: DashMap<String, StreamCheckpoint>,
    threshold: i64,
}

impl CheckpointManager {
    pub fn new(threshold: i64) -> Self {
        Self {
            streams: DashMap::new(),
            threshold,
        }
    }

    pub fn record(&self, stream: &str, seq: i64) {
        self.streams
            .entry(stream.to_string())
            .and_modify(|c| c.last_seq = seq)
            .or_insert(StreamCheckpoint {
                last_seq: seq,
                last_checkpoint_seq: 0,
            });
    }

    /// True iff `seq - last_checkpoint_seq >= threshold`, computed against
    /// the last *checkpointed* sequence, not the last recorded one.
    pub fn should_checkpoint(&self, stream: &str, seq: i64) -> bool {
        let last_checkpoint_seq = self
            .streams
            .get(stream)
            .map(|c| c.last_checkpoint_seq)
            .unwrap_or(0);
        seq - last_checkpoint_seq >= self.threshold
    }

    pub fn mark_checkpointed(&self, stream: &str, seq: i64) {
        self.streams
            .entry(stream.to_string())
            .and_modify(|c| c.last_checkpoint_seq = seq)
            .or_insert(StreamCheckpoint {
                last_seq: seq,
                last_checkpoint_seq: seq,
            });
    }
}
