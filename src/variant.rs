//! Shader Variant Expansion
//!
//! Every shader file is a minijinja template specialised once per [`Variant`]
//! before it is handed to the cross-compiler. The substitution context
//! exposes two keys:
//!
//! | Key              | Meaning                                            |
//! |------------------|----------------------------------------------------|
//! | `FetchColorExpr` | GLSL expression producing the material color       |
//! | `Header`         | Resource declaration backing that expression       |
//!
//! Templates may reference a key either as `{{ FetchColorExpr }}` or in the
//! dotted field form `{{.FetchColorExpr}}`. Referencing any other key is an
//! error.

use std::path::Path;
use std::sync::LazyLock;

use minijinja::syntax::SyntaxConfig;
use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use regex::Regex;
use serde::Serialize;

use crate::errors::{ConvertError, Result};
use crate::scratch::{ScratchDir, ScratchFile};

/// A named set of template substitution values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variant {
    pub name: &'static str,
    pub fetch_color_expr: &'static str,
    pub header: &'static str,
}

impl Variant {
    /// Color taken from a uniform block.
    pub const UNIFORM_COLOR: Variant = Variant {
        name: "uniform_color",
        fetch_color_expr: "_color",
        header: "layout(binding=0) uniform Color { vec4 _color; };",
    };

    /// Color sampled from a texture.
    pub const TEXTURE_COLOR: Variant = Variant {
        name: "texture_color",
        fetch_color_expr: "texture(tex, vUV)",
        header: "layout(binding=0) uniform sampler2D tex;",
    };

    /// All variants, in emission order.
    pub const ALL: [Variant; 2] = [Self::UNIFORM_COLOR, Self::TEXTURE_COLOR];
}

#[derive(Serialize)]
struct VariantContext<'a> {
    #[serde(rename = "FetchColorExpr")]
    fetch_color_expr: &'a str,
    #[serde(rename = "Header")]
    header: &'a str,
}

impl<'a> From<&'a Variant> for VariantContext<'a> {
    fn from(variant: &'a Variant) -> Self {
        Self {
            fetch_color_expr: variant.fetch_color_expr,
            header: variant.header,
        }
    }
}

static DOTTED_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{(-?)\s*\.([A-Za-z_][A-Za-z0-9_]*)\s*(-?)\}\}").expect("valid field pattern")
});

/// Rewrites `{{.Field}}` references into `{{ Field }}`, keeping `-` trim
/// markers on either side.
fn normalize_field_refs(source: &str) -> std::borrow::Cow<'_, str> {
    DOTTED_FIELD.replace_all(source, "{{${1} ${2} ${3}}}")
}

/// Renders shader templates for a variant.
pub struct VariantExpander {
    env: Environment<'static>,
}

impl VariantExpander {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();

        // Same delimiters as the engine's WGSL templates.
        let syntax = SyntaxConfig::builder()
            .block_delimiters("{$", "$}")
            .variable_delimiters("{{", "}}")
            .build()?;

        env.set_syntax(syntax);
        env.set_keep_trailing_newline(true);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_auto_escape_callback(|_| AutoEscape::None);

        Ok(Self { env })
    }

    /// Expands `source` for `variant`. `name` is only used in diagnostics.
    pub fn expand(&self, name: &str, source: &str, variant: &Variant) -> Result<String> {
        let source = normalize_field_refs(source);
        let rendered = self
            .env
            .render_named_str(name, &source, VariantContext::from(variant))?;
        Ok(rendered)
    }

    /// Expands the template at `path` and writes it into `scratch` under the
    /// template's file name.
    ///
    /// The returned guard removes the scratch file when dropped.
    pub fn expand_to(
        &self,
        path: &Path,
        variant: &Variant,
        scratch: &ScratchDir,
    ) -> Result<ScratchFile> {
        let source = std::fs::read_to_string(path).map_err(|e| ConvertError::io(path, e))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("shader"));

        let expanded = self.expand(&name, &source, variant)?;
        scratch.write(&name, expanded.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expander() -> VariantExpander {
        VariantExpander::new().unwrap()
    }

    #[test]
    fn dotted_fields_are_normalized() {
        assert_eq!(
            normalize_field_refs("c = {{.FetchColorExpr}};"),
            "c = {{ FetchColorExpr }};"
        );
        assert_eq!(normalize_field_refs("{{ .Header }}"), "{{ Header }}");
        assert_eq!(normalize_field_refs("{ no template }"), "{ no template }");
        assert_eq!(
            normalize_field_refs("{{- .Header -}} {{-.Header}} {{ .Header -}}"),
            "{{- Header -}} {{- Header }} {{ Header -}}"
        );
    }

    #[test]
    fn trim_markers_strip_surrounding_whitespace() {
        let src = "x = \n  {{- .FetchColorExpr -}}  \n;";
        let out = expander()
            .expand("a.frag", src, &Variant::UNIFORM_COLOR)
            .unwrap();
        assert_eq!(out, "x =_color;");

        let out = expander()
            .expand("a.frag", "a  {{- .FetchColorExpr }}  b", &Variant::UNIFORM_COLOR)
            .unwrap();
        assert_eq!(out, "a_color  b");
    }

    #[test]
    fn substitutes_variant_values() {
        let src = "{{.Header}}\nvoid main() { fragColor = {{.FetchColorExpr}}; }\n";
        let out = expander()
            .expand("blit.frag", src, &Variant::TEXTURE_COLOR)
            .unwrap();
        assert_eq!(
            out,
            "layout(binding=0) uniform sampler2D tex;\nvoid main() { fragColor = texture(tex, vUV); }\n"
        );
    }

    #[test]
    fn jinja_form_is_accepted() {
        let out = expander()
            .expand("x.frag", "{{ FetchColorExpr }}", &Variant::UNIFORM_COLOR)
            .unwrap();
        assert_eq!(out, "_color");
    }

    #[test]
    fn template_without_keys_is_unchanged() {
        let src = "#version 310 es\nvoid main() {\n    gl_Position = vec4(0.0);\n}\n";
        for variant in &Variant::ALL {
            assert_eq!(expander().expand("a.vert", src, variant).unwrap(), src);
        }
    }

    #[test]
    fn undefined_key_is_a_template_error() {
        let err = expander()
            .expand("a.frag", "{{.Missing}}", &Variant::UNIFORM_COLOR)
            .unwrap_err();
        assert!(matches!(err, ConvertError::Template(_)));
    }

    #[test]
    fn malformed_template_is_a_template_error() {
        let err = expander()
            .expand("a.frag", "{{ FetchColorExpr ", &Variant::UNIFORM_COLOR)
            .unwrap_err();
        assert!(matches!(err, ConvertError::Template(_)));
    }

    #[test]
    fn variants_are_declared_in_order() {
        let names: Vec<_> = Variant::ALL.iter().map(|v| v.name).collect();
        assert_eq!(names, ["uniform_color", "texture_color"]);
    }
}
