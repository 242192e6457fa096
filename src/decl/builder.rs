//! The frontend-facing construction API (spec.md §6 "External Interfaces").
//!
//! A consumer — an IDL frontend, not built in this crate — builds up a
//! [`Library`] by declaring classes, functions, variables, and aliases and
//! linking them together, then later drives [`crate::writer::library`]'s
//! `emit` (defined as a second `impl Library` block in that module) to run
//! the resolver and produce output text.

use crate::expr::ExprArena;
use crate::ids::{DeclId, FileId, NsId};
use crate::options::Options;

use super::{
    AliasDecl, BaseClass, ClassDecl, DeclArena, FunctionDecl, NamespaceArena, Parent, Visibility,
};

/// Everything a `Library::emit` run needs: the declaration graph, the
/// expression intern table, the namespace tree, and the knobs that change
/// emission behavior.
pub struct Library {
    pub(crate) decls: DeclArena,
    pub(crate) exprs: ExprArena,
    pub(crate) namespaces: NamespaceArena,
    pub(crate) options: Options,
}

impl Library {
    pub fn new(options: Options) -> Self {
        Self {
            decls: DeclArena::new(),
            exprs: ExprArena::new(),
            namespaces: NamespaceArena::new(),
            options,
        }
    }

    pub fn decls(&self) -> &DeclArena {
        &self.decls
    }

    pub fn decls_mut(&mut self) -> &mut DeclArena {
        &mut self.decls
    }

    pub fn exprs(&self) -> &ExprArena {
        &self.exprs
    }

    pub fn exprs_mut(&mut self) -> &mut ExprArena {
        &mut self.exprs
    }

    pub fn namespaces(&self) -> &NamespaceArena {
        &self.namespaces
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn declare_namespace(&mut self, parent: Option<NsId>, name: impl Into<String>) -> NsId {
        self.namespaces.child(parent, name)
    }

    pub fn declare_class(
        &mut self,
        name: impl Into<String>,
        parent: Option<Parent>,
        class: ClassDecl,
    ) -> DeclId {
        self.decls.declare_class(name, parent, class)
    }

    pub fn declare_function(
        &mut self,
        name: impl Into<String>,
        parent: Option<Parent>,
        function: FunctionDecl,
    ) -> DeclId {
        self.decls.declare_function(name, parent, function)
    }

    pub fn declare_variable(
        &mut self,
        name: impl Into<String>,
        parent: Option<Parent>,
        variable: super::VariableDecl,
    ) -> DeclId {
        self.decls.declare_variable(name, parent, variable)
    }

    pub fn declare_alias(
        &mut self,
        name: impl Into<String>,
        parent: Option<Parent>,
        alias: AliasDecl,
    ) -> DeclId {
        self.decls.declare_alias(name, parent, alias)
    }

    pub fn add_member(&mut self, parent: DeclId, child: DeclId, visibility: Visibility) {
        self.decls.add_member(parent, child, visibility);
    }

    /// Adds a base class to an already-declared class.
    pub fn add_base(&mut self, class: DeclId, base: BaseClass) {
        if let Some(c) = self.decls.get_mut(class).kind.as_class_mut() {
            c.bases.push(base);
        }
    }

    /// Steers `decl` towards a given output file in a multi-file emission
    /// (spec.md §4.7); ignored by the single-file [`Library::emit`] path.
    pub fn set_preferred_file(&mut self, decl: DeclId, file: FileId) {
        self.decls.set_preferred_file(decl, file);
    }
}
