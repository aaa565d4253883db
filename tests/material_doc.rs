use std::path::PathBuf;

use material_forge::compose::{ShaderTemplate, Stage, UniformValue};
use material_forge::dsl::load_material_doc_from_path;
use material_forge::material::ShaderProgram;
use material_forge::validation::validate_glsl_with_context;

fn case_path(case_name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("cases")
        .join(case_name)
}

/// Three.js-style template with anchors, as the host renderer would hand it
/// over. Not self-contained GLSL; asserted on textually.
fn physical_like_template() -> ShaderTemplate {
    ShaderTemplate::new(
        concat!(
            "void main() {\n",
            "vec3 transformed = vec3(position);\n",
            "#include <begin_vertex>\n",
            "#include <project_vertex>\n",
            "}",
        ),
        concat!(
            "void main() {\n",
            "#include <myChunk>\n",
            "#include <dithering_fragment>\n",
            "}",
        ),
    )
    .unwrap()
}

/// Self-contained template: once its anchors are replaced the result is
/// plain GLSL, so naga can check the assembled output.
fn standalone_template() -> ShaderTemplate {
    ShaderTemplate::new(
        concat!(
            "layout(location = 0) in vec3 position;\n",
            "void main() {\n",
            "    vec3 transformed = position;\n",
            "#include <project_vertex>\n",
            "    gl_Position = vec4(transformed, 1.0);\n",
            "}",
        ),
        concat!(
            "layout(location = 0) out vec4 outColor;\n",
            "void main() {\n",
            "    vec3 color = vec3(0.0);\n",
            "#include <dithering_fragment>\n",
            "    outColor = vec4(color, 1.0);\n",
            "}",
        ),
    )
    .unwrap()
}

#[test]
fn distortion_doc_builds_a_live_material() {
    let doc = load_material_doc_from_path(&case_path("distortion.json")).unwrap();
    let ty = doc.into_material_type(physical_like_template()).unwrap();
    let material = ty.instantiate();

    let mut program = ShaderProgram::default();
    material.on_before_compile(&mut program);

    // Declarations present exactly once per stage.
    for source in [&program.vertex_source, &program.fragment_source] {
        assert_eq!(source.matches("uniform float time;").count(), 1);
        assert_eq!(
            source.matches("uniform float radiusVariationAmplitude;").count(),
            1
        );
        assert_eq!(source.matches("varying float vNoise;").count(), 1);
        assert!(source.contains("const float DISTORTION_SCALE"));
    }

    // Head function in the vertex stage only, body chunk at the default
    // vertex anchor with the original directive retained.
    assert!(program.vertex_source.contains("float distortion(vec3 p, float freq)"));
    assert!(!program.fragment_source.contains("float distortion(vec3 p"));
    assert!(program.vertex_source.contains("#include <project_vertex>\nfloat updateTime"));

    // Named fragment chunk landed at its anchor.
    assert!(program.fragment_source.contains("#include <myChunk>\ngl_FragColor.rgb += vNoise"));

    // All three uniforms published by identity.
    assert_eq!(program.uniforms.len(), 3);
    assert!(material.cell("time").unwrap().shares_identity(&program.uniforms["time"]));
}

#[test]
fn uniform_writes_are_live_and_never_reassemble() {
    let doc = load_material_doc_from_path(&case_path("distortion.json")).unwrap();
    let ty = doc.into_material_type(physical_like_template()).unwrap();
    let material = ty.instantiate();

    let mut program = ShaderProgram::default();
    material.on_before_compile(&mut program);
    let sources = (program.vertex_source.clone(), program.fragment_source.clone());

    material.set("time", UniformValue::Float(3.0)).unwrap();
    material
        .set("radiusNoiseFrequency", UniformValue::Float(0.7))
        .unwrap();

    assert_eq!(program.uniforms["time"].get(), UniformValue::Float(3.0));
    assert_eq!(
        program.uniforms["radiusNoiseFrequency"].get(),
        UniformValue::Float(0.7)
    );

    // A second hook pass (hot reload) leaves sources byte-identical.
    material.on_before_compile(&mut program);
    assert_eq!(sources.0, program.vertex_source);
    assert_eq!(sources.1, program.fragment_source);
}

#[test]
fn glow_doc_assembles_to_valid_glsl() {
    let doc = load_material_doc_from_path(&case_path("glow.json")).unwrap();
    let ty = doc.into_material_type(standalone_template()).unwrap();
    let compiled = ty.compiled();

    assert!(compiled.dropped_chunks.is_empty());
    assert!(!compiled.vertex_source.contains("#include"));
    assert!(!compiled.fragment_source.contains("#include"));

    validate_glsl_with_context(&compiled.vertex_source, Stage::Vertex, "glow vertex").unwrap();
    validate_glsl_with_context(&compiled.fragment_source, Stage::Fragment, "glow fragment")
        .unwrap();
}
