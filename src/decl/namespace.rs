//! Namespace paths and path rendering (spec.md §4.2).
//!
//! Namespaces are not declaration-graph nodes (they never participate in
//! the resolver, have no state, and can't be forward-declared) — they are
//! a separate small arena of path segments that declarations point into
//! through `Parent::Namespace`.

use crate::ids::NsId;

/// One segment of a namespace path, linked to its own parent segment.
#[derive(Debug, Clone)]
struct NsNode {
    name: String,
    parent: Option<NsId>,
}

/// The arena of namespace path segments for one `Library`.
#[derive(Debug, Default)]
pub struct NamespaceArena {
    nodes: Vec<NsNode>,
}

impl NamespaceArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&mut self, name: impl Into<String>) -> NsId {
        self.child(None, name)
    }

    pub fn child(&mut self, parent: Option<NsId>, name: impl Into<String>) -> NsId {
        let id = NsId(self.nodes.len() as u32);
        self.nodes.push(NsNode {
            name: name.into(),
            parent,
        });
        id
    }

    pub fn parent_of(&self, ns: NsId) -> Option<NsId> {
        self.nodes[ns.index()].parent
    }

    pub fn name_of(&self, ns: NsId) -> &str {
        &self.nodes[ns.index()].name
    }

    /// Full `::`-separated path of `ns`, root-first, e.g. `a::b::c`.
    pub fn full_path(&self, ns: NsId) -> String {
        let mut segments = Vec::new();
        let mut cur = Some(ns);
        while let Some(id) = cur {
            segments.push(self.name_of(id).to_string());
            cur = self.parent_of(id);
        }
        segments.reverse();
        segments.join("::")
    }

    /// The deepest namespace both `a` and `b` descend from, if any.
    pub fn common_ancestor(&self, a: NsId, b: NsId) -> Option<NsId> {
        let ancestors_of = |mut ns: Option<NsId>| {
            let mut out = Vec::new();
            while let Some(id) = ns {
                out.push(id);
                ns = self.parent_of(id);
            }
            out
        };
        let a_chain = ancestors_of(Some(a));
        let b_chain = ancestors_of(Some(b));
        a_chain.into_iter().find(|x| b_chain.contains(x))
    }
}
