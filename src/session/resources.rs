//! Tracking of intermediate buffers with guaranteed release.
//!
//! Handles are released explicitly, by a [`ScopedResource`] guard going out of scope, by the
//! periodic age sweep, or by an emergency sweep when a [`MemoryProbe`] reports high usage.

use std::collections::BTreeMap;

use crate::foundation::core::TimeMs;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    pub sweep_interval_ms: u64,
    /// Blobs older than this are reclaimed by the periodic sweep.
    pub max_blob_age_ms: u64,
    pub memory_check_interval_ms: u64,
    pub memory_warning_bytes: u64,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            sweep_interval_ms: 60_000,
            max_blob_age_ms: 300_000,
            memory_check_interval_ms: 30_000,
            memory_warning_bytes: 50 * 1024 * 1024,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Encoded bytes handed to a host (object URLs, share payloads).
    Blob,
    /// Pixel surface used for an intermediate or export render.
    Surface,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceHandle(u64);

/// Host heap introspection. Hosts without one pass `None` and the memory check is skipped.
pub trait MemoryProbe {
    fn used_bytes(&self) -> u64;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct ResourceStats {
    pub blobs_created: u64,
    pub blobs_released: u64,
    pub surfaces_created: u64,
    pub surfaces_released: u64,
    pub memory_warnings: u64,
    pub active_blobs: usize,
    pub active_surfaces: usize,
    pub active_bytes: u64,
}

#[derive(Clone, Debug)]
struct Tracked {
    kind: ResourceKind,
    bytes: u64,
    purpose: String,
    created_at: TimeMs,
}

/// Explicitly owned registry of live resources.
#[derive(Debug, Default)]
pub struct ResourceTracker {
    config: ResourceConfig,
    next_id: u64,
    live: BTreeMap<ResourceHandle, Tracked>,
    stats: ResourceStats,
    last_sweep: Option<TimeMs>,
    last_memory_check: Option<TimeMs>,
}

impl ResourceTracker {
    pub fn new(config: ResourceConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn acquire(
        &mut self,
        kind: ResourceKind,
        bytes: u64,
        purpose: impl Into<String>,
        now: TimeMs,
    ) -> ResourceHandle {
        let handle = ResourceHandle(self.next_id);
        self.next_id += 1;
        let purpose = purpose.into();
        tracing::trace!(?kind, bytes, purpose = %purpose, "acquire resource");
        self.live.insert(
            handle,
            Tracked {
                kind,
                bytes,
                purpose,
                created_at: now,
            },
        );
        match kind {
            ResourceKind::Blob => self.stats.blobs_created += 1,
            ResourceKind::Surface => self.stats.surfaces_created += 1,
        }
        handle
    }

    /// Acquire a resource that is released when the guard drops.
    pub fn scoped(
        &mut self,
        kind: ResourceKind,
        bytes: u64,
        purpose: impl Into<String>,
        now: TimeMs,
    ) -> ScopedResource<'_> {
        let handle = self.acquire(kind, bytes, purpose, now);
        ScopedResource {
            tracker: self,
            handle,
        }
    }

    /// Returns `false` if the handle was already released.
    pub fn release(&mut self, handle: ResourceHandle) -> bool {
        let Some(r) = self.live.remove(&handle) else {
            return false;
        };
        match r.kind {
            ResourceKind::Blob => self.stats.blobs_released += 1,
            ResourceKind::Surface => self.stats.surfaces_released += 1,
        }
        tracing::trace!(kind = ?r.kind, purpose = %r.purpose, "release resource");
        true
    }

    pub fn is_live(&self, handle: ResourceHandle) -> bool {
        self.live.contains_key(&handle)
    }

    /// Release blobs older than the configured max age. Returns how many were released.
    pub fn sweep(&mut self, now: TimeMs) -> usize {
        self.last_sweep = Some(now);
        let max_age = self.config.max_blob_age_ms;
        let expired: Vec<_> = self
            .live
            .iter()
            .filter(|(_, r)| r.kind == ResourceKind::Blob && now.since(r.created_at) > max_age)
            .map(|(h, _)| *h)
            .collect();
        for h in &expired {
            self.release(*h);
        }
        if !expired.is_empty() {
            tracing::debug!(released = expired.len(), "swept expired blobs");
        }
        expired.len()
    }

    /// Emergency-release every blob when `probe` reports usage above the threshold.
    pub fn check_memory(&mut self, probe: Option<&dyn MemoryProbe>, now: TimeMs) -> usize {
        let Some(probe) = probe else {
            return 0;
        };
        self.last_memory_check = Some(now);
        let used = probe.used_bytes();
        if used <= self.config.memory_warning_bytes {
            return 0;
        }
        self.stats.memory_warnings += 1;
        tracing::warn!(
            used,
            threshold = self.config.memory_warning_bytes,
            "memory usage above threshold, releasing all blobs"
        );
        let blobs: Vec<_> = self
            .live
            .iter()
            .filter(|(_, r)| r.kind == ResourceKind::Blob)
            .map(|(h, _)| *h)
            .collect();
        for h in &blobs {
            self.release(*h);
        }
        blobs.len()
    }

    /// Run the periodic sweep and memory check when their intervals have elapsed.
    pub fn tick(&mut self, now: TimeMs, probe: Option<&dyn MemoryProbe>) -> usize {
        let due = |last: Option<TimeMs>, every: u64| last.is_none_or(|t| now.since(t) >= every);
        let mut released = 0;
        if due(self.last_sweep, self.config.sweep_interval_ms) {
            released += self.sweep(now);
        }
        if probe.is_some() && due(self.last_memory_check, self.config.memory_check_interval_ms) {
            released += self.check_memory(probe, now);
        }
        released
    }

    pub fn stats(&self) -> ResourceStats {
        let mut s = self.stats;
        s.active_blobs = self.count(ResourceKind::Blob);
        s.active_surfaces = self.count(ResourceKind::Surface);
        s.active_bytes = self.live.values().map(|r| r.bytes).sum();
        s
    }

    /// Release everything.
    pub fn teardown(&mut self) {
        let all: Vec<_> = self.live.keys().copied().collect();
        for h in all {
            self.release(h);
        }
        tracing::debug!("resource tracker torn down");
    }

    fn count(&self, kind: ResourceKind) -> usize {
        self.live.values().filter(|r| r.kind == kind).count()
    }
}

/// Guard that releases its handle on drop, on success and error paths alike.
#[derive(Debug)]
pub struct ScopedResource<'a> {
    tracker: &'a mut ResourceTracker,
    handle: ResourceHandle,
}

impl ScopedResource<'_> {
    pub fn handle(&self) -> ResourceHandle {
        self.handle
    }
}

impl Drop for ScopedResource<'_> {
    fn drop(&mut self) {
        self.tracker.release(self.handle);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/resources.rs"]
mod tests;
