//! Result indices built up by a module scan

use crate::core::types::{Address, AddressEntry, ClassNameEntry};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::info;

/// Validated slots keyed by scanned address
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressIndex {
    entries: BTreeMap<Address, AddressEntry>,
}

impl AddressIndex {
    pub fn new() -> Self {
        AddressIndex::default()
    }

    /// Insert an entry under its scanned address, returning any entry it replaced
    pub fn insert(&mut self, entry: AddressEntry) -> Option<AddressEntry> {
        self.entries.insert(entry.initial_address, entry)
    }

    pub fn get(&self, address: Address) -> Option<&AddressEntry> {
        self.entries.get(&address)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending address order
    pub fn iter(&self) -> impl Iterator<Item = &AddressEntry> {
        self.entries.values()
    }

    pub fn addresses(&self) -> impl Iterator<Item = Address> + '_ {
        self.entries.keys().copied()
    }

    /// Remove every entry whose `address_value` is shared with another entry.
    ///
    /// All keys in a collision are removed, not only the later ones. Returns
    /// the number of distinct keys removed. Running it again removes nothing.
    pub fn remove_duplicate_address_values(&mut self) -> usize {
        info!("Removing duplicate entries based on address value");

        let mut seen: HashMap<Address, Address> = HashMap::new();
        let mut marked: Vec<Address> = Vec::new();

        for (key, entry) in &self.entries {
            match seen.get(&entry.address_value) {
                Some(first) => {
                    marked.push(*first);
                    marked.push(*key);
                }
                None => {
                    seen.insert(entry.address_value, *key);
                }
            }
        }

        let distinct: BTreeSet<Address> = marked.into_iter().collect();
        for key in &distinct {
            self.entries.remove(key);
        }

        info!(
            removed = distinct.len(),
            "Removed duplicate entries based on address value"
        );
        distinct.len()
    }
}

/// Class name occurrences keyed by resolved name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassNameIndex {
    buckets: BTreeMap<String, Vec<ClassNameEntry>>,
}

impl ClassNameIndex {
    pub fn new() -> Self {
        ClassNameIndex::default()
    }

    /// Append `entry` to the bucket for `name` unless the bucket already holds
    /// an entry at the same address. Returns whether it was appended.
    pub fn record(&mut self, name: &str, entry: ClassNameEntry) -> bool {
        let bucket = self.buckets.entry(name.to_string()).or_default();

        if bucket.iter().any(|existing| existing.address == entry.address) {
            return false;
        }
        bucket.push(entry);
        true
    }

    pub fn bucket(&self, name: &str) -> Option<&[ClassNameEntry]> {
        self.buckets.get(name).map(Vec::as_slice)
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of distinct class names. Names are map keys, so this always
    /// equals `bucket_count`.
    pub fn distinct_bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Total entries across all buckets
    pub fn entry_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Buckets in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ClassNameEntry])> {
        self.buckets
            .iter()
            .map(|(name, bucket)| (name.as_str(), bucket.as_slice()))
    }
}
