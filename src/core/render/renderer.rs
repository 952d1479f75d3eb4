//=========================================================================
// Renderers & Shader Catalog
//
// A renderer owns one shader-backed drawing technique and registers
// under a stable static name. Actual pipeline construction happens
// inside the device; the engine core only carries the sources and the
// registration bookkeeping.
//
//=========================================================================

//=== External Crates =====================================================

use log::debug;

//=== Internal Modules ====================================================

use super::queue::RendererKind;

//=== Renderer ============================================================

/// A shader-backed drawing technique.
///
/// Names are static so registration diagnostics never rely on runtime
/// type inspection.
pub trait Renderer {
    fn name(&self) -> &'static str;

    fn kind(&self) -> RendererKind;

    /// Vertex and fragment sources, for the device to compile.
    fn shader_sources(&self) -> (&str, &str);

    /// Releases renderer-side resources. Default implementation does
    /// nothing.
    fn release(&mut self) {}
}

//=== BatchRenderer =======================================================

/// Renderer for batched quads (sprites, text, particles).
pub struct BatchRenderer {
    vertex: String,
    fragment: String,
}

impl BatchRenderer {
    pub fn new(vertex: &str, fragment: &str) -> Self {
        Self {
            vertex: vertex.to_owned(),
            fragment: fragment.to_owned(),
        }
    }
}

impl Renderer for BatchRenderer {
    fn name(&self) -> &'static str {
        "batch"
    }

    fn kind(&self) -> RendererKind {
        RendererKind::Batch
    }

    fn shader_sources(&self) -> (&str, &str) {
        (&self.vertex, &self.fragment)
    }

    fn release(&mut self) {
        debug!(target: "render", "batch renderer released");
    }
}

//=== MeshRenderer ========================================================

/// Renderer for individual mesh instances; also backs the UI pass.
pub struct MeshRenderer {
    vertex: String,
    fragment: String,
}

impl MeshRenderer {
    pub fn new(vertex: &str, fragment: &str) -> Self {
        Self {
            vertex: vertex.to_owned(),
            fragment: fragment.to_owned(),
        }
    }
}

impl Renderer for MeshRenderer {
    fn name(&self) -> &'static str {
        "mesh"
    }

    fn kind(&self) -> RendererKind {
        RendererKind::Mesh
    }

    fn shader_sources(&self) -> (&str, &str) {
        (&self.vertex, &self.fragment)
    }

    fn release(&mut self) {
        debug!(target: "render", "mesh renderer released");
    }
}

//=== ShaderCatalog =======================================================

/// Source lookup for shader-backed renderers.
pub trait ShaderCatalog {
    /// Returns `(vertex, fragment)` sources for `name`, if the catalog
    /// knows it.
    fn shader_source(&self, name: &str) -> Option<(&str, &str)>;
}

//=== BuiltinShaders ======================================================

const BATCH_VERTEX: &str = r#"
#version 330 core
layout(location = 0) in vec2 position;
layout(location = 1) in vec2 uv;
layout(location = 2) in vec4 color;
uniform mat4 projection;
out vec2 v_uv;
out vec4 v_color;
void main() {
    v_uv = uv;
    v_color = color;
    gl_Position = projection * vec4(position, 0.0, 1.0);
}
"#;

const BATCH_FRAGMENT: &str = r#"
#version 330 core
in vec2 v_uv;
in vec4 v_color;
uniform sampler2D atlas;
out vec4 frag;
void main() {
    frag = texture(atlas, v_uv) * v_color;
}
"#;

const MESH_VERTEX: &str = r#"
#version 330 core
layout(location = 0) in vec2 position;
layout(location = 1) in vec4 color;
uniform mat4 projection;
uniform mat4 model;
out vec4 v_color;
void main() {
    v_color = color;
    gl_Position = projection * model * vec4(position, 0.0, 1.0);
}
"#;

const MESH_FRAGMENT: &str = r#"
#version 330 core
in vec4 v_color;
out vec4 frag;
void main() {
    frag = v_color;
}
"#;

/// Embedded default sources for the built-in renderers.
#[derive(Debug, Default)]
pub struct BuiltinShaders;

impl ShaderCatalog for BuiltinShaders {
    fn shader_source(&self, name: &str) -> Option<(&str, &str)> {
        match name {
            "batch" => Some((BATCH_VERTEX, BATCH_FRAGMENT)),
            "mesh" => Some((MESH_VERTEX, MESH_FRAGMENT)),
            _ => None,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_knows_both_techniques() {
        let catalog = BuiltinShaders;
        assert!(catalog.shader_source("batch").is_some());
        assert!(catalog.shader_source("mesh").is_some());
        assert!(catalog.shader_source("bloom").is_none());
    }

    #[test]
    fn renderers_carry_their_sources() {
        let catalog = BuiltinShaders;
        let (vertex, fragment) = catalog.shader_source("batch").unwrap();
        let renderer = BatchRenderer::new(vertex, fragment);

        assert_eq!(renderer.name(), "batch");
        assert_eq!(renderer.kind(), RendererKind::Batch);
        let (v, f) = renderer.shader_sources();
        assert!(v.contains("projection"));
        assert!(f.contains("atlas"));
    }
}
