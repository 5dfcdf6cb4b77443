//! The run-wide symbol table
//!
//! Every structure descriptor of a run lives here, addressed by a
//! [`StructureId`]. A name registered once keeps resolving to the same
//! descriptor; lookups ignore case like PHP class names do.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::structure::StructureInfo;

/// Index of a descriptor in the [`SymbolTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StructureId(u32);

impl StructureId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StructureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Default)]
pub struct SymbolTable {
    structures: Vec<Rc<StructureInfo>>,
    by_name: HashMap<String, StructureId>,
}

impl SymbolTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> StructureId {
        #[allow(clippy::cast_possible_truncation)]
        StructureId(self.structures.len() as u32)
    }

    /// Register a descriptor built by `build` unless `name` is already known
    ///
    /// Returns the canonical descriptor for `name`.
    pub fn insert_with(
        &mut self,
        name: &str,
        build: impl FnOnce(StructureId) -> StructureInfo,
    ) -> Rc<StructureInfo> {
        let key = name.trim_start_matches('\\').to_ascii_lowercase();
        if let Some(existing) = self
            .by_name
            .get(&key)
            .and_then(|id| self.structures.get(id.index()))
        {
            return Rc::clone(existing);
        }
        let id = self.next_id();
        let structure = Rc::new(build(id));
        self.structures.push(Rc::clone(&structure));
        self.by_name.insert(key, id);
        tracing::debug!(structure = name, %id, "registered structure");
        structure
    }

    /// Register a descriptor under its own name; an existing one wins
    pub fn add(&mut self, info: StructureInfo) -> StructureId {
        let name = info.name().to_string();
        self.insert_with(&name, move |id| {
            let mut info = info;
            info.set_id(id);
            info
        })
        .id()
    }

    #[must_use]
    pub fn exists(&self, name: &str) -> bool {
        self.id_of(name).is_some()
    }

    #[must_use]
    pub fn id_of(&self, name: &str) -> Option<StructureId> {
        let key = name.trim_start_matches('\\').to_ascii_lowercase();
        self.by_name.get(&key).copied()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Rc<StructureInfo>> {
        self.id_of(name).and_then(|id| self.get_by_id(id))
    }

    #[must_use]
    pub fn get_by_id(&self, id: StructureId) -> Option<Rc<StructureInfo>> {
        self.structures.get(id.index()).cloned()
    }

    /// Descriptors in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Rc<StructureInfo>> {
        self.structures.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.structures.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::entry;

    #[test]
    fn test_one_descriptor_per_name() {
        let mut table = SymbolTable::new();
        let box_entry = entry("<?php namespace App; class Box {}", "App\\Box");
        let first = table.insert_with("App\\Box", |id| StructureInfo::new(id, Rc::clone(&box_entry)));
        let second = table.insert_with("\\app\\box", |_| panic!("must not rebuild"));
        assert!(Rc::ptr_eq(&first, &second));
        assert!(table.exists("APP\\BOX"));
        assert_eq!(table.len(), 1);

        let by_name = table.get("App\\Box").expect("registered");
        let by_id = table.get_by_id(first.id()).expect("registered");
        assert!(Rc::ptr_eq(&by_name, &by_id));
        assert!(Rc::ptr_eq(&first, &by_id));
    }

    #[test]
    fn test_add_keeps_existing() {
        let mut table = SymbolTable::new();
        let a = entry("<?php class A {}", "A");
        let id = table.add(StructureInfo::new(StructureId(99), Rc::clone(&a)));
        assert_eq!(id.index(), 0);
        assert_eq!(table.get("a").map(|s| s.id()), Some(id));
        let again = table.add(StructureInfo::new(StructureId(7), a));
        assert_eq!(again, id);
        assert_eq!(table.iter().count(), 1);
    }
}
