//! The multi-file write callback (spec.md §4.7 steps 4-6).
//!
//! Drives the same resolver run as the single-file [`super::file::FileEmitter`]
//! but fans declarations out across several writers: a cursor walks the
//! file order, advancing past any file whose preferred declarations have
//! all been written, and each file tracks its own open-namespace stack
//! independently (namespaces never span files).

use std::collections::HashMap;
use std::io;

use crate::class_planner::ClassPlan;
use crate::decl::NamespaceArena;
use crate::ids::{DeclId, FileId, NsId};
use crate::resolver::EmitSink;
use crate::sink::Writer;
use crate::state::State;

use super::file::{switch_namespace, write_class_body, write_lines};

/// Drives `writers` (one per file, indexed by that file's position in the
/// emission's file order) as a single [`EmitSink`].
pub struct MultiFileSink<'a> {
    writers: Vec<&'a mut dyn Writer>,
    namespaces: &'a NamespaceArena,
    open: Vec<Vec<NsId>>,
    position_of_file: HashMap<FileId, usize>,
    preferred_file_of: HashMap<DeclId, FileId>,
    max_state_of: HashMap<DeclId, State>,
    remaining: Vec<usize>,
    cursor: usize,
}

impl<'a> MultiFileSink<'a> {
    /// `writers[i]` must be the writer for the file at position `i` in the
    /// emission's file order; `position_of_file` maps each `FileId` to
    /// that same position.
    pub fn new(
        writers: Vec<&'a mut dyn Writer>,
        namespaces: &'a NamespaceArena,
        position_of_file: HashMap<FileId, usize>,
        preferred_file_of: HashMap<DeclId, FileId>,
        max_state_of: HashMap<DeclId, State>,
    ) -> Self {
        let file_count = writers.len();
        let mut remaining = vec![0usize; file_count];
        for &file in preferred_file_of.values() {
            remaining[position_of_file[&file]] += 1;
        }
        Self {
            writers,
            namespaces,
            open: vec![Vec::new(); file_count],
            position_of_file,
            preferred_file_of,
            max_state_of,
            remaining,
            cursor: 0,
        }
    }

    fn advance_cursor(&mut self) {
        while self.cursor + 1 < self.writers.len() && self.remaining[self.cursor] == 0 {
            self.cursor += 1;
        }
    }

    fn note_progress(&mut self, decl: DeclId, reached: State) {
        let Some(&file) = self.preferred_file_of.get(&decl) else {
            return;
        };
        let target = self.max_state_of.get(&decl).copied().unwrap_or(State::Partial);
        if reached < target {
            return;
        }
        let pos = self.position_of_file[&file];
        if self.remaining[pos] > 0 {
            self.remaining[pos] -= 1;
        }
    }

    /// Closes every still-open namespace in every file. Call once after
    /// the resolver run completes, before each file's trailing
    /// boilerplate.
    pub fn finish_all(&mut self) -> io::Result<()> {
        for i in 0..self.writers.len() {
            switch_namespace(self.writers[i], self.namespaces, &mut self.open[i], None)?;
        }
        Ok(())
    }

    /// Hands the per-file writers back, in file-order position, so the
    /// caller can write each file's trailing boilerplate.
    pub fn into_writers(self) -> Vec<&'a mut dyn Writer> {
        self.writers
    }
}

impl<'a> EmitSink for MultiFileSink<'a> {
    fn emit_forward_decl(
        &mut self,
        decl: DeclId,
        namespace: Option<NsId>,
        text: &str,
    ) -> io::Result<()> {
        self.advance_cursor();
        let i = self.cursor;
        switch_namespace(self.writers[i], self.namespaces, &mut self.open[i], namespace)?;
        write_lines(self.writers[i], 0, text)?;
        self.note_progress(decl, State::Partial);
        Ok(())
    }

    fn emit_complete(
        &mut self,
        decl: DeclId,
        namespace: Option<NsId>,
        plan: &ClassPlan,
    ) -> io::Result<()> {
        self.advance_cursor();
        let i = self.cursor;
        switch_namespace(self.writers[i], self.namespaces, &mut self.open[i], namespace)?;
        write_class_body(self.writers[i], plan)?;
        self.note_progress(decl, State::Complete);
        Ok(())
    }
}
