// system-tests/src/harness/links.rs
// ============================================================================
// Module: Linked Values
// Description: Named values handed from earlier scenarios to later ones.
// Purpose: Enforce one writer per name and non-empty values.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`LinkStore`] lives for one suite run. Each [`LinkName`] is written at
//! most once; the pipeline guarantees the write precedes every read.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::harness::error::LinkError;

// ============================================================================
// SECTION: Link Names
// ============================================================================

/// Name of a linked value, e.g. `target_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct LinkName(&'static str);

impl LinkName {
    /// Declares a link name.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Returns the name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for LinkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

// ============================================================================
// SECTION: Link Store
// ============================================================================

/// Single-writer store of linked values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkStore {
    /// Written values by name.
    values: BTreeMap<LinkName, String>,
}

impl LinkStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes `value` under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::AlreadySet`] on a second write and
    /// [`LinkError::Empty`] for blank values.
    pub fn set(&mut self, name: LinkName, value: impl Into<String>) -> Result<(), LinkError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(LinkError::Empty(name));
        }
        if self.values.contains_key(&name) {
            return Err(LinkError::AlreadySet(name));
        }
        self.values.insert(name, value);
        Ok(())
    }

    /// Returns the value written under `name`.
    #[must_use]
    pub fn get(&self, name: LinkName) -> Option<&str> {
        self.values.get(&name).map(String::as_str)
    }

    /// Returns true when `name` has been written.
    #[must_use]
    pub fn contains(&self, name: LinkName) -> bool {
        self.values.contains_key(&name)
    }
}
