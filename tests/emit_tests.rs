//! Emitter Tests
//!
//! Tests for:
//! - RustModuleEmitter: module header, statics per shader, single vs. variant
//!   entries, literal escaping, bytecode rows, HLSL debug comments
//! - JsonEmitter: document layout and order

use std::borrow::Cow;

use shadercross::emit::{Emitter, JsonEmitter, RustModuleEmitter};
use shadercross::ir::{
    DataType, InputLocation, ShaderEntry, ShaderSources, TextureBinding, UniformBlock,
    UniformLocation, UniformsReflection,
};
use shadercross::CompiledShader;

fn textured_sources() -> ShaderSources {
    ShaderSources {
        inputs: Cow::Owned(vec![InputLocation {
            name: "pos".into(),
            location: 0,
            semantic: "TEXCOORD".into(),
            semantic_index: 0,
            data_type: DataType::Float,
            size: 2,
        }]),
        uniforms: UniformsReflection {
            blocks: Cow::Owned(vec![UniformBlock {
                name: "Block".into(),
                binding: 0,
            }]),
            locations: Cow::Owned(vec![UniformLocation {
                name: "_12.scale".into(),
                data_type: DataType::Float,
                size: 4,
                offset: 16,
            }]),
            size: 32,
        },
        textures: Cow::Owned(vec![TextureBinding {
            name: "tex".into(),
            binding: 1,
        }]),
        glsl100es: "#version 100\nvoid main() { gl_FragColor = vec4(\"q\"); }\n".into(),
        glsl300es: "#version 300 es\nvoid main() {}\n".into(),
        hlsl: Some(Cow::Owned((0u8..20).collect())),
    }
}

fn plain_sources(glsl: &'static str) -> ShaderSources {
    ShaderSources {
        glsl100es: glsl.into(),
        glsl300es: glsl.into(),
        ..Default::default()
    }
}

fn shaders() -> Vec<CompiledShader> {
    vec![
        CompiledShader {
            name: "blit.vert".into(),
            symbol: "SHADER_BLIT_VERT".into(),
            entry: ShaderEntry::Single(plain_sources("void main() {}")),
            hlsl_sources: vec!["float4 main() : SV_Position\n{\n\n    return 0;\n}".into()],
        },
        CompiledShader {
            name: "blit.frag".into(),
            symbol: "SHADER_BLIT_FRAG".into(),
            entry: ShaderEntry::Variants(Cow::Owned(vec![
                plain_sources("a"),
                textured_sources(),
            ])),
            hlsl_sources: vec![String::new(), "Texture2D tex;".into()],
        },
    ]
}

// ============================================================================
// Rust Module
// ============================================================================

#[test]
fn rust_module_has_header_and_imports() {
    let out = RustModuleEmitter::default().emit("shaders", &shaders()).unwrap();
    assert!(out.starts_with("// Code generated by shadercross. DO NOT EDIT.\n"));
    assert!(out.contains("pub mod shaders {\n"));
    assert!(out.contains("    use std::borrow::Cow;\n"));
    assert!(out.contains("    use shadercross_ir::{DataType,"));
    assert!(out.ends_with("}\n"));
}

#[test]
fn rust_module_uses_configured_crate_path() {
    let out = RustModuleEmitter::new("engine::gpu::ir")
        .emit("gpu_shaders", &shaders())
        .unwrap();
    assert!(out.contains("pub mod gpu_shaders {"));
    assert!(out.contains("use engine::gpu::ir::{DataType,"));
}

#[test]
fn rust_module_keeps_shader_order_and_entry_kind() {
    let out = RustModuleEmitter::default().emit("shaders", &shaders()).unwrap();

    let vert = out
        .find("pub static SHADER_BLIT_VERT: ShaderEntry = ShaderEntry::Single(ShaderSources {")
        .unwrap();
    let frag = out
        .find("pub static SHADER_BLIT_FRAG: ShaderEntry = ShaderEntry::Variants(Cow::Borrowed(&[")
        .unwrap();
    assert!(vert < frag);
    assert!(out.contains("/// `blit.frag`"));
}

#[test]
fn rust_module_writes_reflection_literals() {
    let out = RustModuleEmitter::default().emit("shaders", &shaders()).unwrap();

    assert!(out.contains("inputs: Cow::Borrowed(&[]),"));
    assert!(out.contains("name: Cow::Borrowed(\"pos\"),"));
    assert!(out.contains("semantic: Cow::Borrowed(\"TEXCOORD\"),"));
    assert!(out.contains("data_type: DataType::Float,"));
    assert!(out.contains("UniformBlock { name: Cow::Borrowed(\"Block\"), binding: 0 },"));
    assert!(out.contains("name: Cow::Borrowed(\"_12.scale\"),"));
    assert!(out.contains("offset: 16,"));
    assert!(out.contains("size: 32,"));
    assert!(out.contains("TextureBinding { name: Cow::Borrowed(\"tex\"), binding: 1 },"));
}

#[test]
fn rust_module_escapes_shader_text() {
    let out = RustModuleEmitter::default().emit("shaders", &shaders()).unwrap();
    assert!(out.contains(
        r##"glsl100es: Cow::Borrowed("#version 100\nvoid main() { gl_FragColor = vec4(\"q\"); }\n"),"##
    ));
}

#[test]
fn rust_module_writes_bytecode_rows() {
    let out = RustModuleEmitter::default().emit("shaders", &shaders()).unwrap();
    assert!(out.contains("hlsl: None,"));
    assert!(out.contains("hlsl: Some(Cow::Borrowed(&["));
    assert!(out.contains(
        "0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f,\n"
    ));
    assert!(out.contains("0x10, 0x11, 0x12, 0x13,\n"));
}

#[test]
fn rust_module_keeps_hlsl_as_comments() {
    let out = RustModuleEmitter::default().emit("shaders", &shaders()).unwrap();
    assert!(out.contains("// HLSL:\n"));
    assert!(out.contains("// float4 main() : SV_Position\n"));
    assert!(out.contains("// Texture2D tex;\n"));
    // Empty HLSL text produces no comment block.
    assert_eq!(out.matches("// HLSL:").count(), 2);
}

#[test]
fn rust_module_braces_balance() {
    let out = RustModuleEmitter::default().emit("shaders", &shaders()).unwrap();
    let code: String = out
        .lines()
        .filter(|line| !line.trim_start().starts_with("//"))
        .collect();
    // String literals in the fixtures contain balanced braces and brackets.
    for (open, close) in [('{', '}'), ('[', ']'), ('(', ')')] {
        assert_eq!(
            code.matches(open).count(),
            code.matches(close).count(),
            "{open}{close}"
        );
    }
}

#[test]
fn empty_shader_list_is_an_empty_module() {
    let out = RustModuleEmitter::default().emit("shaders", &[]).unwrap();
    assert!(out.contains("pub mod shaders {"));
    assert!(!out.contains("pub static"));
}

// ============================================================================
// JSON
// ============================================================================

#[test]
fn json_document_lists_shaders_in_order() {
    let out = JsonEmitter.emit("shaders", &shaders()).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&out).unwrap();

    assert_eq!(doc["module"], "shaders");
    let list = doc["shaders"].as_array().unwrap();
    assert_eq!(list[0]["name"], "blit.vert");
    assert_eq!(list[1]["name"], "blit.frag");

    assert!(list[0]["entry"]["single"].is_object());
    let variants = list[1]["entry"]["variants"].as_array().unwrap();
    assert_eq!(variants.len(), 2);
    assert_eq!(variants[1]["uniforms"]["locations"][0]["offset"], 16);
    assert_eq!(variants[1]["inputs"][0]["data_type"], "float");
    assert!(variants[0]["hlsl"].is_null());
}

#[test]
fn json_document_decodes_back_into_entries() {
    let out = JsonEmitter.emit("shaders", &shaders()).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&out).unwrap();
    let entry: ShaderEntry = serde_json::from_value(doc["shaders"][1]["entry"].clone()).unwrap();
    assert_eq!(entry, shaders()[1].entry);
}
