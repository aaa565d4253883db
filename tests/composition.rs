use material_forge::compose::{
    ShaderTemplate, UniformInput, UniformValue, Uniforms, VaryingInput, Varyings, anchor_marker,
    assemble, collect, frag, vert,
};

use proptest::prelude::*;

fn base_template() -> ShaderTemplate {
    ShaderTemplate::new(
        concat!(
            "void main() {\n",
            "vec3 transformed = vec3(0.0);\n",
            "#include <begin_vertex>\n",
            "#include <project_vertex>\n",
            "gl_Position = vec4(transformed, 1.0);\n",
            "}",
        ),
        concat!(
            "void main() {\n",
            "vec4 color = vec4(1.0);\n",
            "#include <myChunk>\n",
            "#include <dithering_fragment>\n",
            "gl_FragColor = color;\n",
            "}",
        ),
    )
    .unwrap()
}

fn no_inputs() -> (Uniforms, Varyings) {
    (Uniforms::new(), Varyings::new())
}

#[test]
fn vertex_head_contribution_prepends_and_leaves_fragment_alone() {
    let template = base_template();
    let (uniforms, varyings) = no_inputs();

    let state = collect(&[vert("head").text("float f(){return 1.0;}")]);
    let program = assemble(&template, &state, &uniforms, &varyings);

    assert!(program.vertex_source.starts_with("float f(){return 1.0;}\n"));
    assert!(program.vertex_source.contains(&template.vertex_source));
    assert_eq!(program.fragment_source, template.fragment_source);
}

#[test]
fn append_retains_anchor_then_texts_in_order() {
    let template = base_template();
    let (uniforms, varyings) = no_inputs();

    let state = collect(&[frag("myChunk").text("A;"), frag("myChunk").text("B;")]);
    let program = assemble(&template, &state, &uniforms, &varyings);

    assert!(program.fragment_source.contains("#include <myChunk>\nA;\nB;"));
}

#[test]
fn replace_from_first_contribution_drops_anchor() {
    let template = base_template();
    let (uniforms, varyings) = no_inputs();

    let state = collect(&[frag("myChunk").replace("A;"), frag("myChunk").text("B;")]);
    let program = assemble(&template, &state, &uniforms, &varyings);

    assert!(!program.fragment_source.contains("#include <myChunk>"));
    assert!(program.fragment_source.contains("A;\nB;"));
}

#[test]
fn single_float_uniform_declares_once_per_stage() {
    let template = base_template();
    let mut uniforms = Uniforms::new();
    uniforms.insert(
        "time".to_string(),
        UniformInput::new(UniformValue::Float(0.0)),
    );

    let program = assemble(&template, &collect(&[]), &uniforms, &Varyings::new());

    assert_eq!(program.vertex_source.matches("uniform float time;").count(), 1);
    assert_eq!(program.fragment_source.matches("uniform float time;").count(), 1);
}

#[test]
fn declaration_completeness_covers_uniforms_and_varyings() {
    let template = base_template();
    let mut uniforms = Uniforms::new();
    uniforms.insert("time".to_string(), UniformInput::new(UniformValue::Float(0.0)));
    uniforms.insert(
        "tint".to_string(),
        UniformInput::new(UniformValue::Vec3([1.0, 1.0, 1.0])),
    );
    let mut varyings = Varyings::new();
    varyings.insert("vWave".to_string(), VaryingInput::new("float"));

    let program = assemble(&template, &collect(&[]), &uniforms, &varyings);

    for source in [&program.vertex_source, &program.fragment_source] {
        assert_eq!(source.matches("uniform float time;").count(), 1);
        assert_eq!(source.matches("uniform vec3 tint;").count(), 1);
        assert_eq!(source.matches("varying float vWave;").count(), 1);
    }
}

#[test]
fn contribution_without_anchor_is_equivalent_to_omitting_it() {
    let template = base_template();
    let (uniforms, varyings) = no_inputs();

    let with_unknown = assemble(
        &template,
        &collect(&[
            frag("myChunk").text("A;"),
            frag("ghost_chunk").text("X;"),
        ]),
        &uniforms,
        &varyings,
    );
    let without = assemble(
        &template,
        &collect(&[frag("myChunk").text("A;")]),
        &uniforms,
        &varyings,
    );

    assert_eq!(with_unknown.vertex_source, without.vertex_source);
    assert_eq!(with_unknown.fragment_source, without.fragment_source);
    assert_eq!(with_unknown.dropped_chunks, vec!["ghost_chunk".to_string()]);
}

#[test]
fn same_chunk_reorder_changes_only_concatenation_order() {
    let template = base_template();
    let (uniforms, varyings) = no_inputs();

    let ab = assemble(
        &template,
        &collect(&[frag("myChunk").text("A;"), frag("myChunk").text("B;")]),
        &uniforms,
        &varyings,
    );
    let ba = assemble(
        &template,
        &collect(&[frag("myChunk").text("B;"), frag("myChunk").text("A;")]),
        &uniforms,
        &varyings,
    );

    assert!(ab.fragment_source.contains("A;\nB;"));
    assert!(ba.fragment_source.contains("B;\nA;"));
    assert_eq!(ab.vertex_source, ba.vertex_source);
}

fn chunk_name() -> impl Strategy<Value = String> {
    "[a-z][a-z_]{2,10}"
}

fn chunk_text() -> impl Strategy<Value = String> {
    "[A-Za-z0-9][A-Za-z0-9_ ;.+=]{0,30}"
}

proptest! {
    // Contributions addressed at different chunk names are independent:
    // swapping them cannot change the assembled output.
    #[test]
    fn cross_chunk_reordering_is_invisible(
        name_a in chunk_name(),
        name_b in chunk_name(),
        text_a in chunk_text(),
        text_b in chunk_text(),
    ) {
        prop_assume!(name_a != name_b);

        let template = ShaderTemplate::new(
            "void main() {\n#include <project_vertex>\n}",
            format!(
                "void main() {{\n{}\n{}\n}}",
                anchor_marker(&name_a),
                anchor_marker(&name_b)
            ),
        )
        .unwrap();

        let forward = [frag(&name_a).text(text_a.as_str()), frag(&name_b).text(text_b.as_str())];
        let swapped = [frag(&name_b).text(text_b.as_str()), frag(&name_a).text(text_a.as_str())];

        let (uniforms, varyings) = no_inputs();
        let a = assemble(&template, &collect(&forward), &uniforms, &varyings);
        let b = assemble(&template, &collect(&swapped), &uniforms, &varyings);

        prop_assert_eq!(a.vertex_source, b.vertex_source);
        prop_assert_eq!(a.fragment_source, b.fragment_source);
    }

    // Assembly is pure: identical arguments produce byte-identical output.
    #[test]
    fn assembly_is_idempotent(
        name in chunk_name(),
        text in chunk_text(),
        head in chunk_text(),
    ) {
        let template = ShaderTemplate::new(
            "void main() {\n#include <project_vertex>\n}",
            format!("void main() {{\n{}\n}}", anchor_marker(&name)),
        )
        .unwrap();

        let contributions = [
            frag("head").text(head.as_str()),
            frag(&name).text(text.as_str()),
        ];
        let state = collect(&contributions);

        let (uniforms, varyings) = no_inputs();
        let first = assemble(&template, &state, &uniforms, &varyings);
        let second = assemble(&template, &state, &uniforms, &varyings);

        prop_assert_eq!(first, second);
    }

    // Any contribution to a chunk requesting replace removes the anchor's
    // original content, regardless of where it sits in the sequence.
    #[test]
    fn replace_wins_regardless_of_position(
        text_a in chunk_text(),
        text_b in chunk_text(),
        replace_first in any::<bool>(),
    ) {
        let template = base_template();
        let marker = anchor_marker("myChunk");

        let contributions = if replace_first {
            [frag("myChunk").replace(text_a.as_str()), frag("myChunk").text(text_b.as_str())]
        } else {
            [frag("myChunk").text(text_a.as_str()), frag("myChunk").replace(text_b.as_str())]
        };

        let (uniforms, varyings) = no_inputs();
        let program = assemble(&template, &collect(&contributions), &uniforms, &varyings);

        prop_assert!(!program.fragment_source.contains(&marker));
        // The collector trims trailing whitespace off each contribution.
        let merged = format!("{}\n{}", text_a.trim_end(), text_b.trim_end());
        prop_assert!(program.fragment_source.contains(&merged));
    }
}
