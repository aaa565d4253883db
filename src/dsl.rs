//! Declarative material documents.
//!
//! A [`MaterialDoc`] is the serialized form of the declarative layer: named
//! uniforms and varyings plus an ordered list of fragment entries. Documents
//! lower to [`FragmentContribution`]s through the same key resolution as the
//! tag dispatcher (`"head"`, `"body"`, or a verbatim anchor name), so a JSON
//! file and hand-built tags describe the same material.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::compose::{
    FragmentContribution, ShaderTemplate, UniformInput, UniformValue, Uniforms, VaryingInput,
    Varyings, frag, shared, vert,
};
use crate::material::MaterialType;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialDoc {
    pub name: String,
    #[serde(default)]
    pub uniforms: BTreeMap<String, UniformDoc>,
    #[serde(default)]
    pub varyings: BTreeMap<String, VaryingDoc>,
    #[serde(default)]
    pub fragments: Vec<FragmentDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniformDoc {
    /// Explicit GLSL type token; inferred from the value shape when absent.
    #[serde(rename = "type", default)]
    pub glsl_type: Option<String>,
    pub value: UniformValue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaryingDoc {
    #[serde(rename = "type")]
    pub glsl_type: String,
}

/// One fragment entry. `stage` is `"vert"`, `"frag"`, or `"common"`; `chunk`
/// defaults to `"body"` and is ignored for `"common"` entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FragmentDoc {
    pub stage: String,
    #[serde(default)]
    pub chunk: Option<String>,
    pub code: String,
    #[serde(default)]
    pub replace: bool,
}

pub fn load_material_doc_from_path(path: &Path) -> Result<MaterialDoc> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read material doc {}", path.display()))?;
    load_material_doc_from_str(&text)
        .with_context(|| format!("parse material doc {}", path.display()))
}

pub fn load_material_doc_from_str(text: &str) -> Result<MaterialDoc> {
    let doc: MaterialDoc = serde_json::from_str(text).context("invalid material doc JSON")?;
    Ok(doc)
}

impl MaterialDoc {
    /// Lower fragment entries to ordered contributions. Document order is
    /// preserved; it is the collector's only tie-break.
    pub fn contributions(&self) -> Result<Vec<FragmentContribution>> {
        self.fragments
            .iter()
            .map(|entry| {
                let key = entry.chunk.as_deref().unwrap_or("body");
                let tag = match entry.stage.as_str() {
                    "vert" => vert(key),
                    "frag" => frag(key),
                    "common" => shared(),
                    other => bail!("unknown fragment stage `{other}` in doc `{}`", self.name),
                };
                Ok(if entry.replace {
                    tag.replace(entry.code.as_str())
                } else {
                    tag.text(entry.code.as_str())
                })
            })
            .collect()
    }

    pub fn uniform_inputs(&self) -> Uniforms {
        self.uniforms
            .iter()
            .map(|(name, doc)| {
                let input = match &doc.glsl_type {
                    Some(ty) => UniformInput::typed(ty.clone(), doc.value.clone()),
                    None => UniformInput::new(doc.value.clone()),
                };
                (name.clone(), input)
            })
            .collect()
    }

    pub fn varying_inputs(&self) -> Varyings {
        self.varyings
            .iter()
            .map(|(name, doc)| (name.clone(), VaryingInput::new(doc.glsl_type.clone())))
            .collect()
    }

    /// Build a [`MaterialType`] over `template` from this document.
    pub fn into_material_type(self, template: ShaderTemplate) -> Result<MaterialType> {
        let contributions = self.contributions()?;
        Ok(MaterialType::new(
            template,
            self.uniform_inputs(),
            self.varying_inputs(),
            &contributions,
        ))
    }
}
