//! Declaration-to-text rendering for one output stream (spec.md §4.7,
//! §4.2 "Change", §6 "declaration text sketch").
//!
//! [`FileEmitter`] is the concrete [`crate::resolver::EmitSink`] the
//! library writer drives the resolver with: a forward declaration becomes
//! one line, a completed class becomes a header, an opening brace, its
//! base-list and visibility-grouped members, and a closing `};`. Before
//! either, it switches the writer's open namespace to match the
//! declaration's own, closing down to the common ancestor of whatever was
//! open and opening back down to the target.

use std::io;

use crate::class_planner::ClassPlan;
use crate::decl::{NamespaceArena, Visibility};
use crate::ids::{DeclId, NsId};
use crate::resolver::EmitSink;
use crate::sink::Writer;

/// Namespace chain root-first, e.g. `[ts, ts::detail]` for `ts::detail`.
pub(crate) fn namespace_chain(namespaces: &NamespaceArena, ns: Option<NsId>) -> Vec<NsId> {
    let mut out = Vec::new();
    let mut cur = ns;
    while let Some(id) = cur {
        out.push(id);
        cur = namespaces.parent_of(id);
    }
    out.reverse();
    out
}

/// Closes `open` down to its common prefix with `target`'s chain and opens
/// back down to `target`, mutating `open` to match (spec.md §4.2
/// "Change"). Shared between the single-file and multi-file writers so
/// both bracket namespaces identically.
pub(crate) fn switch_namespace(
    writer: &mut dyn Writer,
    namespaces: &NamespaceArena,
    open: &mut Vec<NsId>,
    target: Option<NsId>,
) -> io::Result<()> {
    let target_chain = namespace_chain(namespaces, target);
    let common_len = open
        .iter()
        .zip(target_chain.iter())
        .take_while(|(a, b)| a == b)
        .count();

    while open.len() > common_len {
        open.pop();
        writer.write_line(0, "}")?;
    }
    for ns in &target_chain[common_len..] {
        writer.write_line(0, &format!("namespace {} {{", namespaces.name_of(*ns)))?;
        open.push(*ns);
    }
    Ok(())
}

/// Writes `text` as one or more physical lines at `indent`, splitting on
/// any embedded `\n` (a template header stacked above its declaration,
/// spec.md §6) so every physical line gets the sink's own indentation
/// policy rather than carrying hard-coded whitespace.
pub(crate) fn write_lines(writer: &mut dyn Writer, indent: usize, text: &str) -> io::Result<()> {
    for line in text.split('\n') {
        writer.write_line(indent, line)?;
    }
    Ok(())
}

/// Writes a completed class's header, base list, constraint
/// `static_assert`s, visibility-grouped members, and closing brace
/// (spec.md §4.5, §4.7). Shared between the single-file and multi-file
/// writers.
pub(crate) fn write_class_body(writer: &mut dyn Writer, plan: &ClassPlan) -> io::Result<()> {
    let bases = if plan.bases.is_empty() {
        String::new()
    } else {
        format!(" : {}", plan.bases.join(", "))
    };
    write_lines(writer, 0, &format!("{}{} {{", plan.header, bases))?;

    for constraint in &plan.constraints {
        writer.write_line(1, constraint)?;
    }

    for (visibility, members) in &plan.groups {
        let keyword = match visibility {
            Visibility::Public => "public:",
            Visibility::Protected => "protected:",
            Visibility::Private => "private:",
        };
        writer.write_line(1, keyword)?;
        for member in members {
            write_lines(writer, 2, &member.text)?;
        }
    }

    writer.write_line(0, "};")?;
    writer.blank_line()
}

pub struct FileEmitter<'a> {
    writer: &'a mut dyn Writer,
    namespaces: &'a NamespaceArena,
    open: Vec<NsId>,
}

impl<'a> FileEmitter<'a> {
    pub fn new(writer: &'a mut dyn Writer, namespaces: &'a NamespaceArena) -> Self {
        Self {
            writer,
            namespaces,
            open: Vec::new(),
        }
    }

    /// Closes every namespace still open. Call once after the resolver run
    /// completes, before the file's trailing boilerplate.
    pub fn finish(&mut self) -> io::Result<()> {
        switch_namespace(self.writer, self.namespaces, &mut self.open, None)
    }
}

impl<'a> EmitSink for FileEmitter<'a> {
    fn emit_forward_decl(
        &mut self,
        _decl: DeclId,
        namespace: Option<NsId>,
        text: &str,
    ) -> io::Result<()> {
        switch_namespace(self.writer, self.namespaces, &mut self.open, namespace)?;
        write_lines(self.writer, 0, text)
    }

    fn emit_complete(
        &mut self,
        _decl: DeclId,
        namespace: Option<NsId>,
        plan: &ClassPlan,
    ) -> io::Result<()> {
        switch_namespace(self.writer, self.namespaces, &mut self.open, namespace)?;
        write_class_body(self.writer, plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::StringWriter;

    #[test]
    fn switching_into_and_back_out_of_a_namespace_brackets_the_declaration() {
        let mut namespaces = NamespaceArena::new();
        let ts = namespaces.root("ts");
        let detail = namespaces.child(Some(ts), "detail");

        let mut writer = StringWriter::new(true);
        {
            let mut emitter = FileEmitter::new(&mut writer, &namespaces);
            emitter
                .emit_forward_decl(DeclId(0), Some(detail), "class Foo;")
                .unwrap();
            emitter.finish().unwrap();
        }

        let output = writer.into_string();
        assert_eq!(
            output,
            "namespace ts {\nnamespace detail {\nclass Foo;\n}\n}\n"
        );
    }
}
