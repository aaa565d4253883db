//! Folds an ordered contribution list into an [`AssemblyState`].
//!
//! The fold is pure: it never touches a template and never fails. Encounter
//! order is the only tie-break — head and shared text are append-only, and a
//! chunk accumulates all of its contributions in declaration order.

use std::collections::BTreeMap;

use super::fragment::{ChunkTarget, FragmentContribution, Slot, Stage};

/// Accumulated edit for one anchor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkEdit {
    /// Contribution texts concatenated in encounter order.
    pub text: String,
    /// True if any contribution to this anchor requested replace.
    pub replace: bool,
}

/// Structured assembly input: per-stage head text, shared text, and per-stage
/// anchor edits. `BTreeMap` keeps chunk iteration deterministic.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AssemblyState {
    pub vert_head: String,
    pub frag_head: String,
    pub shared: String,
    pub vert_chunks: BTreeMap<String, ChunkEdit>,
    pub frag_chunks: BTreeMap<String, ChunkEdit>,
}

impl AssemblyState {
    pub fn head(&self, stage: Stage) -> &str {
        match stage {
            Stage::Vertex => &self.vert_head,
            Stage::Fragment => &self.frag_head,
        }
    }

    pub fn chunks(&self, stage: Stage) -> &BTreeMap<String, ChunkEdit> {
        match stage {
            Stage::Vertex => &self.vert_chunks,
            Stage::Fragment => &self.frag_chunks,
        }
    }

    fn head_mut(&mut self, stage: Stage) -> &mut String {
        match stage {
            Stage::Vertex => &mut self.vert_head,
            Stage::Fragment => &mut self.frag_head,
        }
    }

    fn chunks_mut(&mut self, stage: Stage) -> &mut BTreeMap<String, ChunkEdit> {
        match stage {
            Stage::Vertex => &mut self.vert_chunks,
            Stage::Fragment => &mut self.frag_chunks,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vert_head.is_empty()
            && self.frag_head.is_empty()
            && self.shared.is_empty()
            && self.vert_chunks.is_empty()
            && self.frag_chunks.is_empty()
    }
}

/// Fold `contributions` in order into a fresh [`AssemblyState`].
///
/// Contributions with empty or whitespace-only text are skipped — a no-op,
/// never an error. The replace flag of a chunk is the OR over all of its
/// contributions, so any replace wins regardless of position.
pub fn collect(contributions: &[FragmentContribution]) -> AssemblyState {
    let mut state = AssemblyState::default();

    for c in contributions {
        if c.text.trim().is_empty() {
            continue;
        }

        match c.slot {
            Slot::Shared => append_block(&mut state.shared, &c.text),
            Slot::Stage(stage) => match &c.target {
                ChunkTarget::Head => append_block(state.head_mut(stage), &c.text),
                target => {
                    // anchor_name is Some for Body and Named
                    let Some(anchor) = target.anchor_name(stage) else {
                        continue;
                    };
                    let edit = state.chunks_mut(stage).entry(anchor.to_string()).or_default();
                    append_block(&mut edit.text, &c.text);
                    edit.replace |= c.replace;
                }
            },
        }
    }

    state
}

fn append_block(dst: &mut String, text: &str) {
    if !dst.is_empty() {
        dst.push('\n');
    }
    dst.push_str(text.trim_end());
}
