//! GLSL validation using the naga library.
//!
//! Assembly is plain string work; nothing guarantees the composed program is
//! syntactically valid GLSL. Tests (and tooling, when it wants to) push the
//! assembled text through naga's GLSL frontend to catch malformed fragments
//! early, the same way generated WGSL is usually validated before reaching a
//! device.

use std::borrow::Cow;

use anyhow::{Context, Result, anyhow};

use crate::compose::Stage;

/// Validate a stage's GLSL source, returning the parsed and validated module.
///
/// A `#version 450` directive is prepended when the source carries none,
/// since composed programs are template bodies and the version line is the
/// host renderer's concern.
pub fn validate_glsl(source: &str, stage: Stage) -> Result<naga::Module> {
    let shader_stage = match stage {
        Stage::Vertex => naga::ShaderStage::Vertex,
        Stage::Fragment => naga::ShaderStage::Fragment,
    };

    let prepared = ensure_version_directive(source);

    let mut frontend = naga::front::glsl::Frontend::default();
    let options = naga::front::glsl::Options {
        stage: shader_stage,
        defines: Default::default(),
    };

    let module = frontend
        .parse(&options, &prepared)
        .map_err(|e| anyhow!("GLSL parse failed: {e:?}\n{}", numbered_source(&prepared)))?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    )
    .validate(&module)
    .map_err(|e| anyhow!("GLSL validation failed: {e:?}\n{}", numbered_source(&prepared)))?;

    Ok(module)
}

/// Validate with context about which material/stage generated the source.
pub fn validate_glsl_with_context(
    source: &str,
    stage: Stage,
    context: &str,
) -> Result<naga::Module> {
    validate_glsl(source, stage).with_context(|| format!("{context} assembled invalid GLSL"))
}

fn ensure_version_directive(source: &str) -> Cow<'_, str> {
    let has_version = source
        .lines()
        .any(|line| line.trim_start().starts_with("#version"));
    if has_version {
        Cow::Borrowed(source)
    } else {
        Cow::Owned(format!("#version 450\n{source}"))
    }
}

fn numbered_source(source: &str) -> String {
    let mut output = String::from("---\n");
    for (line_num, line) in source.lines().enumerate() {
        output.push_str(&format!("{:4} | {}\n", line_num + 1, line));
    }
    output.push_str("---");
    output
}
