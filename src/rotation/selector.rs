//! Round-robin cursors, one per domain.

use crate::dns::Name;
use dashmap::DashMap;
use std::net::IpAddr;

/// Hands out the addresses of each domain in turn.
///
/// The cursor read, the pick and the cursor store happen under the map's
/// entry lock, so concurrent callers each get a distinct slot.
#[derive(Debug, Default)]
pub struct RotationSelector {
    cursors: DashMap<Name, usize>,
}

impl RotationSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick the next address for `name` from `addrs` and advance its cursor.
    ///
    /// Returns `None` for an empty list, leaving the cursor alone. A cursor
    /// left over from a longer list is wrapped into range before use.
    pub fn next(&self, name: &Name, addrs: &[IpAddr]) -> Option<IpAddr> {
        if addrs.is_empty() {
            return None;
        }

        let len = addrs.len();
        let mut cursor = match self.cursors.get_mut(name.as_str()) {
            Some(cursor) => cursor,
            None => self.cursors.entry(name.clone()).or_insert(0),
        };
        let index = *cursor % len;
        *cursor = (index + 1) % len;

        Some(addrs[index])
    }

    /// Index the next call for `domain` will start from (0 if never seen).
    pub fn cursor(&self, domain: &str) -> usize {
        self.cursors.get(domain).map(|c| *c).unwrap_or(0)
    }

    /// Number of domains with a cursor.
    pub fn len(&self) -> usize {
        self.cursors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }
}
