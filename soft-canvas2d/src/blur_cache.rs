//! Bounded LRU cache for blurred shadow planes.
//!
//! Entries are addressed by a SHA-256 digest of the unblurred alpha plane
//! together with its size and the blur radius, so repeated draws of the same
//! shape reuse the blur regardless of which context produced them.

use crate::blur::{stack_blur, AlphaPlane};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Default blur cache budget: 16 MiB.
pub const DEFAULT_BLUR_CACHE_MAX_BYTES: usize = 16 * 1024 * 1024;

/// A blur cache shared between contexts.
pub type SharedBlurCache = Arc<Mutex<BlurCache>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlurCacheKey {
    digest: [u8; 32],
    width: u32,
    height: u32,
    radius: u32,
}

impl BlurCacheKey {
    pub fn new(plane: &AlphaPlane, radius: u32) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(plane.width.to_le_bytes());
        hasher.update(plane.height.to_le_bytes());
        hasher.update(&plane.data);
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&hasher.finalize());
        Self {
            digest,
            width: plane.width,
            height: plane.height,
            radius,
        }
    }
}

#[derive(Debug)]
struct BlurCacheEntry {
    plane: Arc<AlphaPlane>,
    size_bytes: usize,
    last_used: u64,
}

#[derive(Debug)]
pub struct BlurCache {
    max_bytes: usize,
    total_bytes: usize,
    clock: u64,
    entries: HashMap<BlurCacheKey, BlurCacheEntry>,
}

impl Default for BlurCache {
    fn default() -> Self {
        Self::new(DEFAULT_BLUR_CACHE_MAX_BYTES)
    }
}

impl BlurCache {
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            total_bytes: 0,
            clock: 0,
            entries: HashMap::new(),
        }
    }

    /// A cache ready to be shared between contexts.
    pub fn shared(max_bytes: usize) -> SharedBlurCache {
        Arc::new(Mutex::new(Self::new(max_bytes)))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.total_bytes = 0;
        self.clock = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    fn next_tick(&mut self) -> u64 {
        self.clock = self.clock.wrapping_add(1);
        self.clock
    }

    /// Blur `plane` by `radius`, reusing a cached result when one exists.
    pub fn blur(&mut self, plane: &AlphaPlane, radius: u32) -> Arc<AlphaPlane> {
        let key = BlurCacheKey::new(plane, radius);
        self.get_or_insert(key, || stack_blur(plane, radius))
    }

    pub fn get_or_insert(
        &mut self,
        key: BlurCacheKey,
        create: impl FnOnce() -> AlphaPlane,
    ) -> Arc<AlphaPlane> {
        if self.entries.contains_key(&key) {
            let tick = self.next_tick();
            if let Some(entry) = self.entries.get_mut(&key) {
                entry.last_used = tick;
                log::trace!(target: "canvas", "blur cache hit radius={}", key.radius);
                return Arc::clone(&entry.plane);
            }
        }

        let plane = create();
        let size_bytes = plane.byte_size();
        let plane = Arc::new(plane);

        // Avoid pinning a single oversize plane in cache.
        if size_bytes > self.max_bytes {
            log::trace!(
                target: "canvas",
                "blur cache skip {}x{} ({} bytes over budget {})",
                key.width,
                key.height,
                size_bytes,
                self.max_bytes
            );
            return plane;
        }

        let tick = self.next_tick();
        self.total_bytes += size_bytes;
        self.entries.insert(
            key,
            BlurCacheEntry {
                plane: Arc::clone(&plane),
                size_bytes,
                last_used: tick,
            },
        );

        self.evict_to_budget();

        plane
    }

    fn evict_to_budget(&mut self) {
        while self.total_bytes > self.max_bytes {
            let lru_key = self
                .entries
                .iter()
                .min_by_key(|(_key, entry)| entry.last_used)
                .map(|(key, _entry)| *key);

            let Some(key) = lru_key else {
                break;
            };

            if let Some(entry) = self.entries.remove(&key) {
                self.total_bytes = self.total_bytes.saturating_sub(entry.size_bytes);
            } else {
                break;
            }
        }
    }
}
