//! material-forge: declarative GLSL chunk composition over base shader
//! templates.
//!
//! The crate lets a caller assemble a shader program from named fragments of
//! GLSL source — head declarations, anchored chunk insertions, shared
//! snippets — merged into a base two-stage template, and exposes the result
//! as a material object with live-updatable uniform inputs.
//!
//! Modules:
//! - `compose`: the composition engine (fragment model, collector,
//!   declaration synthesis, assembler, signatures/cache)
//! - `material`: boxed uniform cells, the material-type factory, and the
//!   pre-compile hook contract with the host rendering library
//! - `dsl`: serde material documents, the serialized declarative layer
//! - `validation`: GLSL syntax validation via naga
//!
//! The main entry points are:
//! - [`MaterialType::new`] / [`MaterialDoc::into_material_type`]: build a
//!   derived material type
//! - [`ComposedMaterial::on_before_compile`]: the host-invoked hook that
//!   publishes uniform cells and rewrites program source
//! - [`compose::collect()`] + [`compose::assemble()`]: the underlying pure
//!   two-phase pipeline, usable directly

pub mod compose;
pub mod dsl;
pub mod material;
pub mod validation;

pub use compose::{
    AssemblyState, ChunkTarget, CompiledProgram, FragmentContribution, FragmentTag, ProgramCache,
    ShaderTemplate, Slot, Stage, UniformInput, UniformValue, Uniforms, VaryingInput, Varyings,
    assemble, collect, frag, shared, vert,
};
pub use dsl::{MaterialDoc, load_material_doc_from_path, load_material_doc_from_str};
pub use material::{ComposedMaterial, MaterialType, ShaderProgram, UniformCell};
pub use validation::{validate_glsl, validate_glsl_with_context};
