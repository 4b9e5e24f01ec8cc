//! Scroll-position compensation around a backward extension.
//!
//! Prepending history shifts everything below it. The host captures the
//! on-screen offset of one element before the re-render, counts layout passes,
//! and once layout has settled adds the offset delta to its scroll position.

/// Layout passes to wait before the post-render offset can be trusted.
pub const MIN_SETTLE_PASSES: u32 = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct ScrollAnchor<K> {
    key: K,
    pre_offset: f64,
    passes: u32,
}

impl<K> ScrollAnchor<K> {
    /// Record `key`'s offset before the extension re-renders.
    pub fn capture(key: K, pre_offset: f64) -> Self {
        ScrollAnchor {
            key,
            pre_offset,
            passes: 0,
        }
    }

    /// Element whose offset must be re-measured after layout.
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn record_pass(&mut self) {
        self.passes = self.passes.saturating_add(1);
    }

    pub fn is_settled(&self) -> bool {
        self.passes >= MIN_SETTLE_PASSES
    }

    /// Delta to add to the scroll position, once layout has settled.
    pub fn adjustment(&self, post_offset: f64) -> Option<f64> {
        self.is_settled().then(|| post_offset - self.pre_offset)
    }
}
