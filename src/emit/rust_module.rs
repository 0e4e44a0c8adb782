use std::fmt::Write as _;

use shadercross_ir::{
    DataType, InputLocation, ShaderEntry, ShaderSources, TextureBinding, UniformBlock,
    UniformLocation, UniformsReflection,
};

use super::Emitter;
use crate::errors::Result;
use crate::pipeline::CompiledShader;

const INDENT: &str = "    ";
const BYTES_PER_ROW: usize = 16;

/// Emits a Rust module holding one `static` [`ShaderEntry`] per shader.
///
/// ```rust,ignore
/// pub mod shaders {
///     pub static SHADER_BLIT_VERT: ShaderEntry = ShaderEntry::Single(ShaderSources { .. });
///     pub static SHADER_BLIT_FRAG: ShaderEntry = ShaderEntry::Variants(Cow::Borrowed(&[ .. ]));
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RustModuleEmitter {
    ir_crate: String,
}

impl RustModuleEmitter {
    #[must_use]
    pub fn new(ir_crate: impl Into<String>) -> Self {
        Self {
            ir_crate: ir_crate.into(),
        }
    }
}

impl Default for RustModuleEmitter {
    fn default() -> Self {
        Self::new("shadercross_ir")
    }
}

impl Emitter for RustModuleEmitter {
    fn emit(&self, module: &str, shaders: &[CompiledShader]) -> Result<String> {
        let mut w = SourceWriter::default();
        w.line("// Code generated by shadercross. DO NOT EDIT.");
        w.blank();
        w.line("#[allow(unused_imports, clippy::all, clippy::pedantic)]");
        w.open(&format!("pub mod {module} {{"));
        w.line("use std::borrow::Cow;");
        w.blank();
        w.line(&format!(
            "use {}::{{DataType, InputLocation, ShaderEntry, ShaderSources, TextureBinding, \
             UniformBlock, UniformLocation, UniformsReflection}};",
            self.ir_crate
        ));

        for shader in shaders {
            w.blank();
            write_shader(&mut w, shader);
        }

        w.close("}");
        Ok(w.finish())
    }
}

fn write_shader(w: &mut SourceWriter, shader: &CompiledShader) {
    w.line(&format!("/// `{}`", shader.name));
    match &shader.entry {
        ShaderEntry::Single(sources) => {
            w.open(&format!(
                "pub static {}: ShaderEntry = ShaderEntry::Single(ShaderSources {{",
                shader.symbol
            ));
            write_sources_fields(w, sources, hlsl_text(shader, 0));
            w.close("});");
        }
        ShaderEntry::Variants(list) => {
            w.open(&format!(
                "pub static {}: ShaderEntry = ShaderEntry::Variants(Cow::Borrowed(&[",
                shader.symbol
            ));
            for (i, sources) in list.iter().enumerate() {
                w.open("ShaderSources {");
                write_sources_fields(w, sources, hlsl_text(shader, i));
                w.close("},");
            }
            w.close("]));");
        }
    }
}

fn hlsl_text(shader: &CompiledShader, index: usize) -> &str {
    shader.hlsl_sources.get(index).map_or("", String::as_str)
}

fn write_sources_fields(w: &mut SourceWriter, sources: &ShaderSources, hlsl: &str) {
    write_list(w, "inputs", &*sources.inputs, write_input);
    write_uniforms(w, &sources.uniforms);
    write_list(w, "textures", &*sources.textures, write_texture);
    w.line(&format!("glsl100es: Cow::Borrowed({}),", str_literal(&sources.glsl100es)));
    w.line(&format!("glsl300es: Cow::Borrowed({}),", str_literal(&sources.glsl300es)));

    if !hlsl.trim().is_empty() {
        w.line("// HLSL:");
        for line in hlsl.lines() {
            let line = line.trim_end();
            if line.is_empty() {
                w.line("//");
            } else {
                w.line(&format!("// {line}"));
            }
        }
    }
    match &sources.hlsl {
        Some(bytes) => {
            w.open("hlsl: Some(Cow::Borrowed(&[");
            for row in bytes.chunks(BYTES_PER_ROW) {
                let mut text = String::new();
                for b in row {
                    let _ = write!(text, "0x{b:02x}, ");
                }
                w.line(text.trim_end());
            }
            w.close("])),");
        }
        None => w.line("hlsl: None,"),
    }
}

fn write_list<T>(
    w: &mut SourceWriter,
    field: &str,
    items: &[T],
    write_item: fn(&mut SourceWriter, &T),
) {
    if items.is_empty() {
        w.line(&format!("{field}: Cow::Borrowed(&[]),"));
        return;
    }
    w.open(&format!("{field}: Cow::Borrowed(&["));
    for item in items {
        write_item(w, item);
    }
    w.close("]),");
}

fn write_uniforms(w: &mut SourceWriter, uniforms: &UniformsReflection) {
    w.open("uniforms: UniformsReflection {");
    write_list(w, "blocks", &*uniforms.blocks, write_block);
    write_list(w, "locations", &*uniforms.locations, write_location);
    w.line(&format!("size: {},", uniforms.size));
    w.close("},");
}

fn write_input(w: &mut SourceWriter, input: &InputLocation) {
    w.open("InputLocation {");
    w.line(&format!("name: Cow::Borrowed({}),", str_literal(&input.name)));
    w.line(&format!("location: {},", input.location));
    w.line(&format!("semantic: Cow::Borrowed({}),", str_literal(&input.semantic)));
    w.line(&format!("semantic_index: {},", input.semantic_index));
    w.line(&format!("data_type: {},", data_type_path(input.data_type)));
    w.line(&format!("size: {},", input.size));
    w.close("},");
}

fn write_block(w: &mut SourceWriter, block: &UniformBlock) {
    w.line(&format!(
        "UniformBlock {{ name: Cow::Borrowed({}), binding: {} }},",
        str_literal(&block.name),
        block.binding
    ));
}

fn write_location(w: &mut SourceWriter, location: &UniformLocation) {
    w.open("UniformLocation {");
    w.line(&format!("name: Cow::Borrowed({}),", str_literal(&location.name)));
    w.line(&format!("data_type: {},", data_type_path(location.data_type)));
    w.line(&format!("size: {},", location.size));
    w.line(&format!("offset: {},", location.offset));
    w.close("},");
}

fn write_texture(w: &mut SourceWriter, texture: &TextureBinding) {
    w.line(&format!(
        "TextureBinding {{ name: Cow::Borrowed({}), binding: {} }},",
        str_literal(&texture.name),
        texture.binding
    ));
}

fn data_type_path(data_type: DataType) -> &'static str {
    match data_type {
        DataType::Float => "DataType::Float",
        DataType::Int => "DataType::Int",
    }
}

/// Rust string literal for `s`; `Debug` escaping is valid literal syntax.
fn str_literal(s: &str) -> String {
    format!("{s:?}")
}

/// Indentation-aware line buffer.
#[derive(Default)]
struct SourceWriter {
    buf: String,
    depth: usize,
}

impl SourceWriter {
    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.buf.push_str(INDENT);
        }
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    fn blank(&mut self) {
        self.buf.push('\n');
    }

    fn open(&mut self, text: &str) {
        self.line(text);
        self.depth += 1;
    }

    fn close(&mut self, text: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.line(text);
    }

    fn finish(self) -> String {
        self.buf
    }
}
