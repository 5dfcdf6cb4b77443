//! Namespace hierarchy of documented structures

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::structure::StructureInfo;

/// One namespace and everything declared below it
#[derive(Debug, Default)]
pub struct NamespaceNode {
    name: String,
    namespaces: BTreeMap<String, NamespaceNode>,
    structures: BTreeMap<String, Rc<StructureInfo>>,
}

impl NamespaceNode {
    fn new(name: String) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    /// Fully qualified namespace name, empty for the global namespace
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Last segment of the namespace name
    #[must_use]
    pub fn basename(&self) -> &str {
        self.name.rsplit('\\').next().unwrap_or_default()
    }

    /// Sub-namespaces in sorted order
    pub fn namespaces(&self) -> impl Iterator<Item = &NamespaceNode> {
        self.namespaces.values()
    }

    /// Structures declared directly in this namespace, sorted by basename
    pub fn structures(&self) -> impl Iterator<Item = &Rc<StructureInfo>> {
        self.structures.values()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty() && self.structures.is_empty()
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a Rc<StructureInfo>>) {
        for namespace in self.namespaces.values() {
            namespace.collect(out);
        }
        out.extend(self.structures.values());
    }
}

#[derive(Debug, Default)]
pub struct StructureTree {
    root: NamespaceNode,
    len: usize,
}

impl StructureTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a structure under its namespace; a repeated name replaces the
    /// earlier entry
    pub fn insert(&mut self, structure: Rc<StructureInfo>) {
        let mut node = &mut self.root;
        let namespace = structure.namespace();
        if !namespace.is_empty() {
            let mut path = String::new();
            for segment in namespace.split('\\') {
                if !path.is_empty() {
                    path.push('\\');
                }
                path.push_str(segment);
                node = node
                    .namespaces
                    .entry(segment.to_string())
                    .or_insert_with(|| NamespaceNode::new(path.clone()));
            }
        }
        if node
            .structures
            .insert(structure.basename().to_string(), structure)
            .is_none()
        {
            self.len += 1;
        }
    }

    /// The global namespace
    #[must_use]
    pub fn root(&self) -> &NamespaceNode {
        &self.root
    }

    #[must_use]
    pub fn namespace(&self, name: &str) -> Option<&NamespaceNode> {
        let name = name.trim_matches('\\');
        if name.is_empty() {
            return Some(&self.root);
        }
        name.split('\\')
            .try_fold(&self.root, |node, segment| node.namespaces.get(segment))
    }

    /// Every structure, depth first with sub-namespaces before the
    /// structures of a namespace
    #[must_use]
    pub fn iter(&self) -> Vec<&Rc<StructureInfo>> {
        let mut out = Vec::with_capacity(self.len);
        self.root.collect(&mut out);
        out
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl FromIterator<Rc<StructureInfo>> for StructureTree {
    fn from_iter<I: IntoIterator<Item = Rc<StructureInfo>>>(iter: I) -> Self {
        let mut tree = StructureTree::new();
        for structure in iter {
            tree.insert(structure);
        }
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::TestProject;

    #[test]
    fn test_namespaces_before_structures() {
        let ctx = TestProject::new()
            .file("src/Top.php", "<?php class Top {}")
            .file("src/Zed.php", "<?php namespace App; class Zed {}")
            .file("src/Alpha.php", "<?php namespace App; class Alpha {}")
            .file("src/Model.php", "<?php namespace App\\Model; class User {}")
            .file("src/Http.php", "<?php namespace App\\Http; class Client {}")
            .context();
        let tree: StructureTree = ctx.documented().into_iter().collect();

        let order: Vec<&str> = tree.iter().iter().map(|s| s.name()).collect();
        assert_eq!(
            order,
            vec!["App\\Http\\Client", "App\\Model\\User", "App\\Alpha", "App\\Zed", "Top"]
        );
        assert_eq!(tree.len(), 5);

        let app = tree.namespace("App").expect("namespace");
        assert_eq!(
            app.namespaces().map(NamespaceNode::name).collect::<Vec<_>>(),
            vec!["App\\Http", "App\\Model"]
        );
        assert_eq!(tree.namespace("\\App\\Model").map(NamespaceNode::basename), Some("Model"));
        assert!(tree.namespace("App\\Missing").is_none());
        assert_eq!(tree.root().structures().count(), 1);
    }
}
