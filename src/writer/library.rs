//! Top-level library emission (spec.md §4.7 "Library Writer", §6 "Output
//! file layout").
//!
//! This is the second `impl Library` block for the type
//! [`crate::decl::builder::Library`] defines — construction lives there,
//! driving the resolver to produce output lives here, matching the
//! construction/emission split spec.md §6 describes.

use std::collections::HashMap;

use crate::class_planner::DeclCtx;
use crate::decl::builder::Library;
use crate::error::EmitError;
use crate::ids::{DeclId, FileId};
use crate::passes;
use crate::reference::ReferenceAnalyzer;
use crate::resolver::{Resolver, Target};
use crate::sink::Writer;
use crate::state::State;

use super::file::FileEmitter;
use super::files::{FileSet, Include};
use super::multi::MultiFileSink;

impl Library {
    /// Runs the global passes, the reference analyzer, and the resolver
    /// over `targets`, writing an include-guarded header to `writer`.
    ///
    /// Each target is driven to its kind's `maxState` (spec.md §9: only
    /// `Class` ever reaches `Complete`; everything else's one textual
    /// form is its `Partial` form).
    pub fn emit(
        &mut self,
        targets: &[DeclId],
        guard_name: &str,
        writer: &mut dyn Writer,
    ) -> Result<(), EmitError> {
        passes::run_all(&mut self.decls, &mut self.exprs, &self.namespaces);

        for &target in targets {
            ReferenceAnalyzer::new(&mut self.decls, &self.exprs).analyze(target);
        }

        writer.write_line(0, &format!("#ifndef {guard_name}"))?;
        writer.write_line(0, &format!("#define {guard_name}"))?;
        writer.blank_line()?;

        if let Some(ns) = self.options.wrapping_namespace.clone() {
            writer.write_line(0, &format!("namespace {ns} {{"))?;
            writer.blank_line()?;
        }

        let resolve_targets: Vec<Target> = targets
            .iter()
            .map(|&decl| Target {
                decl,
                state: self.decls.get(decl).kind.max_state(),
            })
            .collect();

        let mut sink = FileEmitter::new(&mut *writer, &self.namespaces);
        let mut resolver = Resolver::new(&mut self.decls, &self.exprs, &self.namespaces, &self.options);
        resolver.run(&resolve_targets, &mut sink)?;
        sink.finish()?;

        if let Some(ns) = &self.options.wrapping_namespace {
            writer.write_line(0, &format!("}} // namespace {ns}"))?;
            writer.blank_line()?;
        }

        writer.write_line(0, &format!("#endif // {guard_name}"))?;
        Ok(())
    }

    /// Runs the same pipeline as [`Library::emit`] but fans output across
    /// several files (spec.md §4.7 "Library Writer", full algorithm):
    /// computes a topological file order from `files`'s internal includes,
    /// stable-sorts `targets` to match it, then drives one resolver pass
    /// whose write callback steers each declaration into the writer for
    /// its preferred file ([`crate::decl::builder::Library::set_preferred_file`]),
    /// defaulting untagged declarations to the first file in that order.
    ///
    /// `guard_names` and `writers` are indexed the same way `files` was
    /// built (`writers[i]`/`guard_names[i]` belong to the file whose id is
    /// `FileId(i)`), not by emission order — this method computes that
    /// order itself.
    pub fn emit_files<'w>(
        &mut self,
        files: &FileSet,
        guard_names: &[&str],
        targets: &[DeclId],
        writers: Vec<&'w mut dyn Writer>,
    ) -> Result<(), EmitError> {
        assert_eq!(files.len(), guard_names.len());
        assert_eq!(files.len(), writers.len());

        passes::run_all(&mut self.decls, &mut self.exprs, &self.namespaces);
        for &target in targets {
            ReferenceAnalyzer::new(&mut self.decls, &self.exprs).analyze(target);
        }

        let order = files.order();
        let position_of_file: HashMap<FileId, usize> = order
            .iter()
            .enumerate()
            .map(|(pos, &fid)| (fid, pos))
            .collect();

        let mut slots: Vec<Option<&mut dyn Writer>> = writers.into_iter().map(Some).collect();
        let mut writers_in_order: Vec<&mut dyn Writer> = Vec::with_capacity(slots.len());
        let mut guards_in_order: Vec<&str> = Vec::with_capacity(slots.len());
        for &fid in &order {
            writers_in_order.push(slots[fid.index()].take().expect("each file visited once"));
            guards_in_order.push(guard_names[fid.index()]);
        }

        for (pos, &fid) in order.iter().enumerate() {
            let w = &mut *writers_in_order[pos];
            w.write_line(0, &format!("#ifndef {}", guards_in_order[pos]))?;
            w.write_line(0, &format!("#define {}", guards_in_order[pos]))?;
            w.blank_line()?;
            for include in &files.get(fid).includes {
                match include {
                    Include::Internal(dep) => {
                        w.write_line(0, &format!("#include \"{}\"", files.get(*dep).name))?;
                    }
                    Include::External(header) => {
                        w.write_line(0, &format!("#include <{header}>"))?;
                    }
                }
            }
            if !files.get(fid).includes.is_empty() {
                w.blank_line()?;
            }
        }

        let mut sorted_targets = targets.to_vec();
        sorted_targets.sort_by_key(|&d| {
            self.decls
                .get(d)
                .common
                .preferred_file
                .and_then(|f| position_of_file.get(&f).copied())
                .unwrap_or(0)
        });
        let resolve_targets: Vec<Target> = sorted_targets
            .iter()
            .map(|&decl| Target {
                decl,
                state: self.decls.get(decl).kind.max_state(),
            })
            .collect();

        let preferred_file_of: HashMap<DeclId, FileId> = self
            .decls
            .iter()
            .filter_map(|(id, d)| d.common.preferred_file.map(|f| (id, f)))
            .collect();
        let max_state_of: HashMap<DeclId, State> = preferred_file_of
            .keys()
            .map(|&id| (id, self.decls.get(id).kind.max_state()))
            .collect();

        let mut sink = MultiFileSink::new(
            writers_in_order,
            &self.namespaces,
            position_of_file,
            preferred_file_of,
            max_state_of,
        );
        let mut resolver =
            Resolver::new(&mut self.decls, &self.exprs, &self.namespaces, &self.options);
        resolver.run(&resolve_targets, &mut sink)?;
        sink.finish_all()?;

        let writers_in_order = sink.into_writers();
        for (pos, guard) in guards_in_order.iter().enumerate() {
            writers_in_order[pos].write_line(0, &format!("#endif // {guard}"))?;
        }
        Ok(())
    }

    /// Renders one declaration's fully qualified path, for callers (e.g.
    /// a frontend's diagnostics) that need it outside of emission.
    pub fn path_of(&self, decl: DeclId) -> String {
        let ctx = DeclCtx {
            decls: &self.decls,
            namespaces: &self.namespaces,
            fully_qualified: self.options.fully_qualified_paths,
        };
        ctx.decls.full_path(decl, ctx.namespaces)
    }
}
