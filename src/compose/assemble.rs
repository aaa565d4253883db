//! Assembles a base template and an [`AssemblyState`] into final source.
//!
//! Anchors follow the `#include <chunk_name>` convention: the include
//! directive itself is the anchor's original content, kept ahead of appended
//! chunk text unless the edit requests replace. Transformation order per
//! stage is fixed — head, shared, uniform declarations, varying declarations,
//! then chunk substitution — because chunk bodies may reference identifiers
//! introduced by the earlier steps.

use anyhow::{Result, bail};

use super::collect::AssemblyState;
use super::declarations::{Uniforms, Varyings, declare_uniforms, declare_varyings};
use super::fragment::Stage;

/// The host-supplied base program: one source string per stage.
#[derive(Clone, Debug, PartialEq)]
pub struct ShaderTemplate {
    pub vertex_source: String,
    pub fragment_source: String,
}

impl ShaderTemplate {
    /// Fails fast when either stage source is empty — assembly cannot
    /// proceed without a two-stage pair, and the failure would otherwise
    /// surface as a silently useless program.
    pub fn new(
        vertex_source: impl Into<String>,
        fragment_source: impl Into<String>,
    ) -> Result<Self> {
        let vertex_source = vertex_source.into();
        let fragment_source = fragment_source.into();
        if vertex_source.trim().is_empty() {
            bail!("shader template has an empty vertex stage");
        }
        if fragment_source.trim().is_empty() {
            bail!("shader template has an empty fragment stage");
        }
        Ok(Self {
            vertex_source,
            fragment_source,
        })
    }

    pub fn stage_source(&self, stage: Stage) -> &str {
        match stage {
            Stage::Vertex => &self.vertex_source,
            Stage::Fragment => &self.fragment_source,
        }
    }
}

/// The anchor marker for a chunk name as it appears in template source.
pub fn anchor_marker(name: &str) -> String {
    format!("#include <{name}>")
}

/// Final two-string compilation artifact. Derived and never patched —
/// structural changes recompute a fresh program.
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledProgram {
    pub vertex_source: String,
    pub fragment_source: String,
    /// Chunk names that had no matching anchor in their stage's template.
    /// A documented non-error outcome, surfaced here for tooling.
    pub dropped_chunks: Vec<String>,
}

/// Assemble final per-stage source from the template and assembly state.
///
/// Pure and total: identical arguments produce byte-identical output, and no
/// input can fail — unknown chunk names are dropped (recorded on the result
/// and logged at debug level), everything else is plain string work.
pub fn assemble(
    template: &ShaderTemplate,
    state: &AssemblyState,
    uniforms: &Uniforms,
    varyings: &Varyings,
) -> CompiledProgram {
    let mut dropped_chunks = Vec::new();
    let vertex_source = assemble_stage(Stage::Vertex, template, state, uniforms, varyings, &mut dropped_chunks);
    let fragment_source = assemble_stage(Stage::Fragment, template, state, uniforms, varyings, &mut dropped_chunks);
    CompiledProgram {
        vertex_source,
        fragment_source,
        dropped_chunks,
    }
}

fn assemble_stage(
    stage: Stage,
    template: &ShaderTemplate,
    state: &AssemblyState,
    uniforms: &Uniforms,
    varyings: &Varyings,
    dropped_chunks: &mut Vec<String>,
) -> String {
    let mut source = template.stage_source(stage).to_string();

    source = prepend_block(state.head(stage), source);
    source = prepend_block(&state.shared, source);
    source = prepend_block(&declare_uniforms(uniforms), source);
    source = prepend_block(&declare_varyings(varyings), source);

    for (name, edit) in state.chunks(stage) {
        let marker = anchor_marker(name);
        match source.find(&marker) {
            Some(pos) => {
                let replacement = if edit.replace {
                    edit.text.clone()
                } else {
                    format!("{marker}\n{}", edit.text)
                };
                source.replace_range(pos..pos + marker.len(), &replacement);
            }
            None => {
                log::debug!(
                    "chunk `{name}` has no anchor in the {} template, dropped",
                    stage.label()
                );
                dropped_chunks.push(name.clone());
            }
        }
    }

    source
}

fn prepend_block(block: &str, source: String) -> String {
    if block.trim().is_empty() {
        return source;
    }
    format!("{}\n{}", block.trim_end(), source)
}
