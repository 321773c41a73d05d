//! Collections that observe in-place mutation.
//!
//! List and map fields of tracked objects are stored in [`TrackedList`] and [`TrackedMap`].
//! Structural changes made through them (adding, removing or replacing elements) are reported
//! by the owning object as a modification of the field, exactly as if the field had been
//! reassigned. Edits to tracked elements reached through `get_mut` are instead recorded by the
//! elements themselves, which is what lets a strategic merge patch address a single element.
use crate::{
    tracking::{to_value, Element, ListRef, MapRef, Tracked},
    Result,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{
    collections::{BTreeMap, BTreeSet},
    ops::Deref,
};

/// A list that remembers whether it was structurally changed.
#[derive(Clone, Debug)]
pub struct TrackedList<T> {
    items: Vec<T>,
    changed: bool,
}

impl<T> Default for TrackedList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            changed: false,
        }
    }
}

impl<T> TrackedList<T> {
    /// An empty, unchanged list
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether elements were added, removed or replaced since construction
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list has no elements
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append an element
    pub fn push(&mut self, item: T) {
        self.changed = true;
        self.items.push(item);
    }

    /// Insert an element at `index`
    ///
    /// Panics if `index > len`, like [`Vec::insert`].
    pub fn insert(&mut self, index: usize, item: T) {
        self.changed = true;
        self.items.insert(index, item);
    }

    /// Remove and return the element at `index`
    ///
    /// Panics if `index` is out of bounds, like [`Vec::remove`].
    pub fn remove(&mut self, index: usize) -> T {
        self.changed = true;
        self.items.remove(index)
    }

    /// Remove the last element
    pub fn pop(&mut self) -> Option<T> {
        let item = self.items.pop();
        self.changed |= item.is_some();
        item
    }

    /// Remove every element
    pub fn clear(&mut self) {
        self.changed = true;
        self.items.clear();
    }

    /// Keep only the elements matching `keep`
    pub fn retain(&mut self, keep: impl FnMut(&T) -> bool) {
        let before = self.items.len();
        self.items.retain(keep);
        self.changed |= self.items.len() != before;
    }

    /// Replace the element at `index`, returning the previous one
    pub fn set(&mut self, index: usize, item: T) -> Option<T> {
        let slot = self.items.get_mut(index)?;
        self.changed = true;
        Some(std::mem::replace(slot, item))
    }

    /// Replace the whole content
    pub fn assign(&mut self, items: impl IntoIterator<Item = T>) {
        self.changed = true;
        self.items = items.into_iter().collect();
    }

    /// The elements as a slice
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Consume into the underlying vector
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T: Tracked> TrackedList<T> {
    /// Mutable access to a tracked element
    ///
    /// Changes are recorded by the element, not by the list.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    /// Mutable iteration over tracked elements
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    /// The first tracked element matching `pred`
    pub fn find_mut(&mut self, mut pred: impl FnMut(&T) -> bool) -> Option<&mut T> {
        self.items.iter_mut().find(|item| pred(item))
    }

    /// Whether any element has pending modifications
    pub fn any_dirty(&self) -> bool {
        self.items.iter().any(Tracked::is_dirty)
    }

    /// View of the list with tracked elements
    pub fn object_ref(&self) -> ListRef<'_> {
        ListRef {
            changed: self.changed,
            elements: self.items.iter().map(|i| Element::Object(i as &dyn Tracked)).collect(),
        }
    }
}

impl<T: Serialize> TrackedList<T> {
    /// View of the list with plain elements
    pub fn field_ref(&self) -> Result<ListRef<'_>> {
        let elements = self
            .items
            .iter()
            .map(|i| to_value(i).map(Element::Value))
            .collect::<Result<_>>()?;
        Ok(ListRef {
            changed: self.changed,
            elements,
        })
    }
}

impl<T> Deref for TrackedList<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> Extend<T> for TrackedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let before = self.items.len();
        self.items.extend(iter);
        self.changed |= self.items.len() != before;
    }
}

impl<T> From<Vec<T>> for TrackedList<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items, changed: false }
    }
}

impl<T> FromIterator<T> for TrackedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Vec::from_iter(iter).into()
    }
}

impl<T> IntoIterator for TrackedList<T> {
    type IntoIter = std::vec::IntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a TrackedList<T> {
    type IntoIter = std::slice::Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: PartialEq> PartialEq for TrackedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: Eq> Eq for TrackedList<T> {}

impl<T: PartialEq> PartialEq<Vec<T>> for TrackedList<T> {
    fn eq(&self, other: &Vec<T>) -> bool {
        &self.items == other
    }
}

impl<T: Serialize> Serialize for TrackedList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for TrackedList<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // null is accepted as empty, matching how the api server omits empty lists
        Option::<Vec<T>>::deserialize(deserializer).map(|v| v.unwrap_or_default().into())
    }
}

/// Keys of a [`TrackedMap`] changed since construction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MapChanges {
    touched: BTreeSet<String>,
    removed: BTreeSet<String>,
}

impl MapChanges {
    /// Keys that were inserted or overwritten
    pub fn touched(&self) -> impl Iterator<Item = &str> + Clone {
        self.touched.iter().map(String::as_str)
    }

    /// Keys that were removed
    pub fn removed(&self) -> impl Iterator<Item = &str> + Clone {
        self.removed.iter().map(String::as_str)
    }

    /// Whether `key` was inserted or overwritten
    pub fn is_touched(&self, key: &str) -> bool {
        self.touched.contains(key)
    }

    /// Whether no key changed
    pub fn is_empty(&self) -> bool {
        self.touched.is_empty() && self.removed.is_empty()
    }

    fn touch(&mut self, key: &str) {
        self.removed.remove(key);
        self.touched.insert(key.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.touched.remove(key);
        self.removed.insert(key.to_string());
    }
}

/// A string-keyed map that remembers which keys changed.
#[derive(Clone, Debug)]
pub struct TrackedMap<V> {
    entries: BTreeMap<String, V>,
    changes: MapChanges,
}

impl<V> Default for TrackedMap<V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            changes: MapChanges::default(),
        }
    }
}

impl<V> TrackedMap<V> {
    /// An empty, unchanged map
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any key was inserted, overwritten or removed since construction
    pub fn is_changed(&self) -> bool {
        !self.changes.is_empty()
    }

    /// The changed keys
    pub fn changes(&self) -> &MapChanges {
        &self.changes
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or overwrite an entry, returning the previous value
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        self.changes.touch(&key);
        self.entries.insert(key, value)
    }

    /// Remove an entry
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let value = self.entries.remove(key)?;
        self.changes.remove(key);
        Some(value)
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        for key in std::mem::take(&mut self.entries).into_keys() {
            self.changes.remove(&key);
        }
    }

    /// Keep only the entries matching `keep`
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &V) -> bool) {
        let drop: Vec<String> = self
            .entries
            .iter()
            .filter(|(k, v)| !keep(k, v))
            .map(|(k, _)| k.clone())
            .collect();
        for key in drop {
            self.remove(&key);
        }
    }

    /// Replace the whole content
    ///
    /// Every previous key missing from `entries` is recorded as removed.
    pub fn assign<K: Into<String>>(&mut self, entries: impl IntoIterator<Item = (K, V)>) {
        let entries: BTreeMap<String, V> = entries.into_iter().map(|(k, v)| (k.into(), v)).collect();
        for key in self.entries.keys() {
            if !entries.contains_key(key) {
                self.changes.remove(key);
            }
        }
        for key in entries.keys() {
            self.changes.touch(key);
        }
        self.entries = entries;
    }

    /// Consume into the underlying map
    pub fn into_inner(self) -> BTreeMap<String, V> {
        self.entries
    }
}

impl<V: Tracked> TrackedMap<V> {
    /// Mutable access to a tracked value
    ///
    /// Changes are recorded by the value, not by the map.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries.get_mut(key)
    }

    /// Mutable iteration over tracked values
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.entries.values_mut()
    }

    /// Whether any value has pending modifications
    pub fn any_dirty(&self) -> bool {
        self.entries.values().any(Tracked::is_dirty)
    }

    /// View of the map with tracked values
    pub fn object_ref(&self) -> MapRef<'_> {
        MapRef {
            changes: &self.changes,
            entries: self
                .entries
                .iter()
                .map(|(k, v)| (k.as_str(), Element::Object(v as &dyn Tracked)))
                .collect(),
        }
    }
}

impl<V: Serialize> TrackedMap<V> {
    /// View of the map with plain values
    pub fn field_ref(&self) -> Result<MapRef<'_>> {
        let entries = self
            .entries
            .iter()
            .map(|(k, v)| Ok((k.as_str(), Element::Value(to_value(v)?))))
            .collect::<Result<_>>()?;
        Ok(MapRef {
            changes: &self.changes,
            entries,
        })
    }
}

impl<V> Deref for TrackedMap<V> {
    type Target = BTreeMap<String, V>;

    fn deref(&self) -> &Self::Target {
        &self.entries
    }
}

impl<K: Into<String>, V> Extend<(K, V)> for TrackedMap<V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<V> From<BTreeMap<String, V>> for TrackedMap<V> {
    fn from(entries: BTreeMap<String, V>) -> Self {
        Self {
            entries,
            changes: MapChanges::default(),
        }
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for TrackedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(k, v)| (k.into(), v))
            .collect::<BTreeMap<_, _>>()
            .into()
    }
}

impl<'a, V> IntoIterator for &'a TrackedMap<V> {
    type IntoIter = std::collections::btree_map::Iter<'a, String, V>;
    type Item = (&'a String, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<V: PartialEq> PartialEq for TrackedMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<V: Eq> Eq for TrackedMap<V> {}

impl<V: Serialize> Serialize for TrackedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for TrackedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<BTreeMap<String, V>>::deserialize(deserializer).map(|m| m.unwrap_or_default().into())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_structural_changes_are_observed() {
        let mut list: TrackedList<String> = vec!["sh".to_string(), "-c".into()].into();
        assert!(!list.is_changed());
        assert_eq!(list.len(), 2);

        list.retain(|_| true);
        assert!(!list.is_changed(), "retaining everything changes nothing");
        assert_eq!(list.pop().as_deref(), Some("-c"));
        assert!(list.is_changed());
    }

    #[test]
    fn list_set_out_of_bounds_is_noop() {
        let mut list: TrackedList<u16> = vec![80].into();
        assert_eq!(list.set(3, 443), None);
        assert!(!list.is_changed());
        assert_eq!(list.set(0, 443), Some(80));
        assert!(list.is_changed());
        assert_eq!(list, vec![443]);
    }

    #[test]
    fn list_serde_is_transparent() {
        let list: TrackedList<String> = serde_json::from_value(json!(["a", "b"])).unwrap();
        assert!(!list.is_changed());
        assert_eq!(serde_json::to_value(&list).unwrap(), json!(["a", "b"]));
        let empty: TrackedList<String> = serde_json::from_value(json!(null)).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn map_records_touched_and_removed_keys() {
        let mut map: TrackedMap<String> =
            serde_json::from_value(json!({"app": "web", "tier": "frontend"})).unwrap();
        assert!(!map.is_changed());

        map.insert("app", "api".to_string());
        assert!(map.remove("tier").is_some());
        assert!(map.remove("missing").is_none());

        assert_eq!(map.changes().touched().collect::<Vec<_>>(), ["app"]);
        assert_eq!(map.changes().removed().collect::<Vec<_>>(), ["tier"]);

        map.insert("tier", "backend".to_string());
        assert!(map.changes().removed().next().is_none());
        assert!(map.changes().is_touched("tier"));
    }

    #[test]
    fn map_assign_removes_stale_keys() {
        let mut map: TrackedMap<String> = [("a", "1".to_string()), ("b", "2".to_string())]
            .into_iter()
            .collect();
        map.assign([("b", "3".to_string())]);
        assert_eq!(map.changes().removed().collect::<Vec<_>>(), ["a"]);
        assert_eq!(map.changes().touched().collect::<Vec<_>>(), ["b"]);
        assert_eq!(serde_json::to_value(&map).unwrap(), json!({"b": "3"}));
    }
}
