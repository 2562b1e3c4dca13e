// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Borrow;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

/// A stable identifier for a diagram object.
///
/// Ids are opaque strings. The only enforced rule is that they are non-empty, because an empty
/// id is how the UI signals "no endpoint" during a connect gesture.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T> {
    value: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into();
        if value.is_empty() {
            return Err(IdError::Empty);
        }
        Ok(Self {
            value,
            _marker: PhantomData,
        })
    }

    /// Wraps a value the crate generated itself, which is never empty.
    pub(crate) fn from_generated(value: String) -> Self {
        debug_assert!(!value.is_empty(), "generated ids are never empty");
        Self {
            value,
            _marker: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }

    /// Numeric value of the id, if it is a plain decimal string.
    pub fn numeric(&self) -> Option<u64> {
        self.value.parse().ok()
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> AsRef<str> for Id<T> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<T> Borrow<str> for Id<T> {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl<T> FromStr for Id<T> {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

impl<T> TryFrom<String> for Id<T> {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    Empty,
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("id must not be empty"),
        }
    }
}

impl std::error::Error for IdError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeIdTag {}
pub type NodeId = Id<NodeIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeIdTag {}
pub type EdgeId = Id<EdgeIdTag>;

/// Issues class node ids.
///
/// Ids are decimal strings, strictly increasing for the allocator's lifetime. Freed ids are
/// never handed out again; [`IdAllocator::observe`] only ever raises the counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocator {
    next: u64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts counting at `next` (clamped to at least 1).
    pub fn starting_at(next: u64) -> Self {
        Self { next: next.max(1) }
    }

    /// Seeds the allocator to `max(numeric ids) + 1`, or 1 when there are none.
    ///
    /// Non-numeric ids are ignored; they can never collide with an allocated id.
    pub fn seeded_from<'a>(ids: impl IntoIterator<Item = &'a NodeId>) -> Self {
        let mut allocator = Self::new();
        for id in ids {
            allocator.observe(id);
        }
        allocator
    }

    pub fn next_id(&mut self) -> NodeId {
        let value = self.next;
        self.next = self.next.saturating_add(1);
        NodeId::from_generated(value.to_string())
    }

    pub fn peek(&self) -> u64 {
        self.next
    }

    /// Makes sure `id` is never issued in the future.
    pub fn observe(&mut self, id: &NodeId) {
        if let Some(value) = id.numeric() {
            self.next = self.next.max(value.saturating_add(1));
        }
    }
}
