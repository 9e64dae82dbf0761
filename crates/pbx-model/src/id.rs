//! Document-unique object identifiers
//!
//! Manifest entities cross-reference each other through opaque
//! 24-character uppercase hexadecimal tokens. [`ObjectId`] validates that
//! shape; [`IdGenerator`] mints fresh tokens guaranteed not to collide
//! with anything already present in the document.

use std::collections::HashSet;

use serde::Serialize;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Length in characters of every object identifier.
pub const ID_LEN: usize = 24;

/// An opaque, document-unique identifier token.
///
/// Always exactly [`ID_LEN`] uppercase hexadecimal characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    /// Validate and wrap a raw token.
    pub fn parse(token: &str) -> Result<Self> {
        let well_formed = token.len() == ID_LEN
            && token
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b));
        if well_formed {
            Ok(Self(token.to_string()))
        } else {
            Err(Error::InvalidIdentifier {
                token: token.to_string(),
            })
        }
    }

    /// The raw token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Mints identifiers that are unique against the seeded document.
///
/// Seed the generator with every identifier already present, then each
/// [`next_id`](Self::next_id) call returns a token distinct from the seed
/// set and from every previous grant.
#[derive(Debug, Default)]
pub struct IdGenerator {
    taken: HashSet<ObjectId>,
}

impl IdGenerator {
    /// Generator with an empty collision set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generator pre-seeded with the identifiers of an existing document.
    pub fn seeded(ids: impl IntoIterator<Item = ObjectId>) -> Self {
        Self {
            taken: ids.into_iter().collect(),
        }
    }

    /// Record an identifier as taken without minting it.
    pub fn reserve(&mut self, id: ObjectId) {
        self.taken.insert(id);
    }

    /// Mint a fresh identifier.
    ///
    /// Collisions with the taken set are retried; with 2^96 possible
    /// tokens a retry is already vanishingly rare.
    pub fn next_id(&mut self) -> ObjectId {
        loop {
            let candidate = Self::mint();
            if !self.taken.contains(&candidate) {
                self.taken.insert(candidate.clone());
                return candidate;
            }
            tracing::debug!(%candidate, "identifier collision, reminting");
        }
    }

    /// Number of identifiers known to this generator.
    pub fn taken_count(&self) -> usize {
        self.taken.len()
    }

    fn mint() -> ObjectId {
        let hex = Uuid::new_v4().simple().to_string().to_uppercase();
        ObjectId(hex[..ID_LEN].to_string())
    }
}
