// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Style registry: idempotent "inject once" bookkeeping for render hosts.
//!
//! Render hosts often need shared assets (keyframes, style sheets) installed once per
//! process or document before the first surface mounts. [`StyleRegistry`] records which ids
//! are installed. The engine itself never touches it.
//!
//! ```
//! use understory_overlay::styles::StyleRegistry;
//!
//! let mut styles = StyleRegistry::new();
//! assert!(styles.ensure("overlay-fade"));
//! assert!(!styles.ensure("overlay-fade"));
//! assert!(styles.contains("overlay-fade"));
//! ```

use alloc::collections::BTreeSet;
use alloc::string::String;

/// Set of installed style ids.
#[derive(Clone, Debug, Default)]
pub struct StyleRegistry {
    installed: BTreeSet<String>,
}

impl StyleRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `id` as installed.
    ///
    /// Returns true the first time an id is seen, meaning the caller should install it now.
    pub fn ensure(&mut self, id: &str) -> bool {
        if self.installed.contains(id) {
            return false;
        }
        tracing::trace!(id, "installing style");
        self.installed.insert(String::from(id))
    }

    /// True if `id` was installed.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.installed.contains(id)
    }

    /// Number of installed ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.installed.len()
    }

    /// True if nothing was installed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.installed.is_empty()
    }
}
