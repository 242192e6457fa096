//! Multi-file output grouping (spec.md §4.7 "Library Writer").
//!
//! A [`FileSet`] is the DAG of output files an emission run can steer
//! declarations into: each file has a name and an ordered include list,
//! where an include either names another file this same set owns
//! (`Include::Internal`) or an external header (`Include::External`).
//! [`Library::emit_files`](super::library) uses [`FileSet::order`] to
//! decide what order to emit files' boilerplate in, and to decide, for
//! each declaration, which already-open file writer it lands in.

use crate::ids::FileId;

/// One entry in a file's include list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Include {
    /// Another file this same [`FileSet`] owns.
    Internal(FileId),
    /// A header outside this emission run, e.g. a standard library header.
    External(String),
}

/// One output file: a name (used to build its include guard and the
/// `#include` lines that name it from elsewhere) and its includes.
#[derive(Debug, Clone)]
pub struct OutputFile {
    pub name: String,
    pub includes: Vec<Include>,
}

/// The DAG of output files for one multi-file emission run.
#[derive(Debug, Default)]
pub struct FileSet {
    files: Vec<OutputFile>,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>) -> FileId {
        let id = FileId(self.files.len() as u32);
        self.files.push(OutputFile {
            name: name.into(),
            includes: Vec::new(),
        });
        id
    }

    pub fn include_internal(&mut self, file: FileId, included: FileId) {
        self.files[file.index()]
            .includes
            .push(Include::Internal(included));
    }

    pub fn include_external(&mut self, file: FileId, header: impl Into<String>) {
        self.files[file.index()]
            .includes
            .push(Include::External(header.into()));
    }

    pub fn get(&self, file: FileId) -> &OutputFile {
        &self.files[file.index()]
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// A DAG topological order over the files: every file a given file
    /// internally includes comes before it, ties broken by insertion
    /// order (spec.md §4.7 step 1).
    pub fn order(&self) -> Vec<FileId> {
        let mut order = Vec::with_capacity(self.files.len());
        let mut visited = vec![false; self.files.len()];
        for idx in 0..self.files.len() {
            self.visit(idx, &mut visited, &mut order);
        }
        tracing::trace!(file_count = order.len(), "computed file emission order");
        order
    }

    fn visit(&self, idx: usize, visited: &mut [bool], order: &mut Vec<FileId>) {
        if visited[idx] {
            return;
        }
        visited[idx] = true;
        for include in &self.files[idx].includes {
            if let Include::Internal(dep) = include {
                self.visit(dep.index(), visited, order);
            }
        }
        order.push(FileId(idx as u32));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn included_file_orders_before_the_file_that_includes_it() {
        let mut files = FileSet::new();
        let a = files.push("a.h");
        let b = files.push("b.h");
        files.include_internal(b, a);

        assert_eq!(files.order(), vec![a, b]);
    }

    #[test]
    fn unrelated_files_keep_insertion_order() {
        let mut files = FileSet::new();
        let a = files.push("a.h");
        let b = files.push("b.h");

        assert_eq!(files.order(), vec![a, b]);
    }

    #[test]
    fn diamond_of_internal_includes_lists_each_file_once() {
        let mut files = FileSet::new();
        let base = files.push("base.h");
        let left = files.push("left.h");
        let right = files.push("right.h");
        let top = files.push("top.h");
        files.include_internal(left, base);
        files.include_internal(right, base);
        files.include_internal(top, left);
        files.include_internal(top, right);

        let order = files.order();
        assert_eq!(order.len(), 4);
        let pos = |f: FileId| order.iter().position(|&x| x == f).unwrap();
        assert!(pos(base) < pos(left));
        assert!(pos(base) < pos(right));
        assert!(pos(left) < pos(top));
        assert!(pos(right) < pos(top));
    }
}
