//! Structural signatures and the compiled-program cache.
//!
//! Assembly is recomputed only when the *structure* of a material changes:
//! the template text, the collected chunk edits, or the names/types of its
//! inputs. Uniform values are deliberately excluded from the signature so the
//! per-frame "same shader, new value" path never touches string work.

use std::collections::HashMap;
use std::rc::Rc;

use serde_json::{Value, json};

use super::assemble::{CompiledProgram, ShaderTemplate, assemble};
use super::collect::AssemblyState;
use super::declarations::{Uniforms, Varyings};

/// Seeded FNV-1a quad hash over a byte string. Deterministic across runs and
/// platforms; no cryptographic claims.
pub fn hash_bytes(bytes: &[u8]) -> [u8; 32] {
    fn fnv1a64_with_seed(bytes: &[u8], seed: u64) -> u64 {
        let mut hash = 0xcbf2_9ce4_8422_2325_u64 ^ seed;
        for &b in bytes {
            hash ^= b as u64;
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        }
        hash
    }

    let h0 = fnv1a64_with_seed(bytes, 0x0000_0000_0000_0000);
    let h1 = fnv1a64_with_seed(bytes, 0x9e37_79b9_7f4a_7c15);
    let h2 = fnv1a64_with_seed(bytes, 0xc2b2_ae3d_27d4_eb4f);
    let h3 = fnv1a64_with_seed(bytes, 0x1656_67b1_9e37_79f9);

    let mut out = [0_u8; 32];
    out[0..8].copy_from_slice(&h0.to_le_bytes());
    out[8..16].copy_from_slice(&h1.to_le_bytes());
    out[16..24].copy_from_slice(&h2.to_le_bytes());
    out[24..32].copy_from_slice(&h3.to_le_bytes());
    out
}

fn canonical_chunks(chunks: &std::collections::BTreeMap<String, super::collect::ChunkEdit>) -> Value {
    let entries: Vec<Value> = chunks
        .iter()
        .map(|(name, edit)| {
            json!({
                "name": name,
                "text": edit.text,
                "replace": edit.replace,
            })
        })
        .collect();
    Value::Array(entries)
}

fn canonical_input_names(uniforms: &Uniforms, varyings: &Varyings) -> Value {
    // Types and names only; values are excluded on purpose.
    let uniform_entries: Vec<Value> = uniforms
        .iter()
        .map(|(name, input)| json!({ "name": name, "type": input.glsl_type }))
        .collect();
    let varying_entries: Vec<Value> = varyings
        .iter()
        .map(|(name, input)| json!({ "name": name, "type": input.glsl_type }))
        .collect();
    json!({ "uniforms": uniform_entries, "varyings": varying_entries })
}

/// Signature over everything [`assemble`](super::assemble::assemble) reads.
/// Equal signatures imply byte-identical assembled output.
pub fn assembly_signature(
    template: &ShaderTemplate,
    state: &AssemblyState,
    uniforms: &Uniforms,
    varyings: &Varyings,
) -> [u8; 32] {
    let payload = json!({
        "template": {
            "vert": template.vertex_source,
            "frag": template.fragment_source,
        },
        "vertHead": state.vert_head,
        "fragHead": state.frag_head,
        "shared": state.shared,
        "vertChunks": canonical_chunks(&state.vert_chunks),
        "fragChunks": canonical_chunks(&state.frag_chunks),
        "inputs": canonical_input_names(uniforms, varyings),
    });
    let bytes = serde_json::to_vec(&payload).unwrap_or_default();
    hash_bytes(&bytes)
}

/// Memoizes assembled programs keyed by [`assembly_signature`].
#[derive(Debug, Default)]
pub struct ProgramCache {
    programs: HashMap<[u8; 32], Rc<CompiledProgram>>,
}

impl ProgramCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached program for this structural key, assembling on miss.
    /// Repeated calls with identical structure return the same `Rc`.
    pub fn get_or_assemble(
        &mut self,
        template: &ShaderTemplate,
        state: &AssemblyState,
        uniforms: &Uniforms,
        varyings: &Varyings,
    ) -> Rc<CompiledProgram> {
        let key = assembly_signature(template, state, uniforms, varyings);
        if let Some(hit) = self.programs.get(&key) {
            log::trace!("program cache hit");
            return Rc::clone(hit);
        }

        log::debug!("program cache miss, assembling");
        let program = Rc::new(assemble(template, state, uniforms, varyings));
        self.programs.insert(key, Rc::clone(&program));
        program
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}
