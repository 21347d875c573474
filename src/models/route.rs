//! Route identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a committed route within one optimisation run.
///
/// Constructed routes are numbered `0..k` in construction order. Fragments
/// created by splitting get ids from `k` upwards, so they never collide with
/// a constructed route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteId(pub usize);

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out fresh route ids, strictly increasing.
#[derive(Debug, Clone)]
pub struct RouteIdAllocator {
    next: usize,
}

impl RouteIdAllocator {
    /// Starts allocating right after the `reserved` constructed ids.
    pub fn after(reserved: usize) -> Self {
        Self { next: reserved }
    }

    /// Returns the next unused id.
    pub fn allocate(&mut self) -> RouteId {
        let id = RouteId(self.next);
        self.next += 1;
        id
    }
}
