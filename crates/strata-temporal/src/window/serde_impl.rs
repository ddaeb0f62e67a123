//! Serde support for [`WindowMap`].
//!
//! The arena-backed layout is an implementation detail; the wire form is
//! the ordered history itself, a sequence of `(revision, value)` pairs with
//! `null` for unset sentinels. Deserialization rejects input that is not
//! strictly ascending, so a round-trip can never smuggle in a corrupt
//! history.

use serde::de::{self, Deserializer};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use strata_core::Revision;

use super::{Entry, WindowMap};
use crate::deque::LinkedDeque;

impl<V: Serialize> Serialize for WindowMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for entry in self.past().iter().chain(self.future().iter()) {
            seq.serialize_element(&(entry.rev, &entry.value))?;
        }
        seq.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for WindowMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries: Vec<(Revision, Option<V>)> = Vec::deserialize(deserializer)?;

        let mut past = LinkedDeque::with_capacity(entries.len());
        let mut prev: Option<Revision> = None;
        for (rev, value) in entries {
            if prev.map_or(false, |prev| prev >= rev) {
                return Err(de::Error::custom(format!(
                    "history not strictly ascending at revision {rev}"
                )));
            }
            prev = Some(rev);
            past.push_back(Entry { rev, value });
        }

        Ok(WindowMap {
            past,
            future: LinkedDeque::new(),
        })
    }
}
