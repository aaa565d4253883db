//! Shader-chunk composition engine.
//!
//! This module is organized into several submodules:
//! - `fragment`: contribution model, default-anchor table, tag dispatcher
//! - `collect`: fold of ordered contributions into an `AssemblyState`
//! - `declarations`: uniform/varying declaration synthesis
//! - `assemble`: template + state -> final two-stage source
//! - `signature`: structural signatures and the compiled-program cache
//!
//! The pipeline is two pure phases: [`collect()`] snapshots an ordered
//! contribution list into an [`AssemblyState`], and [`assemble()`] turns that
//! state plus a [`ShaderTemplate`] into a [`CompiledProgram`]. Neither phase
//! mutates its inputs, so recomputation is safe to memoize (see
//! [`ProgramCache`]).

pub mod assemble;
pub mod collect;
pub mod declarations;
pub mod fragment;
pub mod signature;

pub use assemble::{CompiledProgram, ShaderTemplate, anchor_marker, assemble};
pub use collect::{AssemblyState, ChunkEdit, collect};
pub use declarations::{
    UniformInput, UniformValue, Uniforms, VaryingInput, Varyings, declare_uniforms,
    declare_varyings,
};
pub use fragment::{
    ChunkTarget, DEFAULT_FRAG_CHUNK, DEFAULT_VERT_CHUNK, FragmentContribution, FragmentTag, Slot,
    Stage, frag, shared, vert,
};
pub use signature::{ProgramCache, assembly_signature, hash_bytes};
