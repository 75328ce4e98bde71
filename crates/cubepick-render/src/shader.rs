//! Shader management.

use cubepick_core::PrimitiveIndexSource;

/// The WGSL programs used by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderKind {
    /// Identity pass, triangle index from the vertex index.
    Identity,
    /// Identity pass, triangle index from the rasterizer.
    IdentityPrimitiveIndex,
    /// Textured cube strips.
    Textured,
    /// Selected triangle overlay.
    Highlight,
    /// Cursor axis overlay.
    Axis,
}

impl ShaderKind {
    /// Identity shader matching `source`.
    pub fn identity(source: PrimitiveIndexSource) -> Self {
        match source {
            PrimitiveIndexSource::VertexIndex => Self::Identity,
            PrimitiveIndexSource::Rasterizer => Self::IdentityPrimitiveIndex,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Identity => "identity shader",
            Self::IdentityPrimitiveIndex => "identity shader (primitive index)",
            Self::Textured => "textured shader",
            Self::Highlight => "highlight shader",
            Self::Axis => "axis shader",
        }
    }

    /// WGSL source text.
    pub fn source(self) -> &'static str {
        match self {
            Self::Identity => include_str!("shaders/identity.wgsl"),
            Self::IdentityPrimitiveIndex => include_str!("shaders/identity_primitive_index.wgsl"),
            Self::Textured => include_str!("shaders/textured.wgsl"),
            Self::Highlight => include_str!("shaders/highlight.wgsl"),
            Self::Axis => include_str!("shaders/axis.wgsl"),
        }
    }

    /// Device features the shader needs.
    pub fn required_features(self) -> wgpu::Features {
        match self {
            Self::IdentityPrimitiveIndex => wgpu::Features::SHADER_PRIMITIVE_INDEX,
            _ => wgpu::Features::empty(),
        }
    }

    /// Compiles the shader module.
    pub fn create_module(self, device: &wgpu::Device) -> wgpu::ShaderModule {
        log::debug!("compiling {}", self.label());
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(self.label()),
            source: wgpu::ShaderSource::Wgsl(self.source().into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ShaderKind; 5] = [
        ShaderKind::Identity,
        ShaderKind::IdentityPrimitiveIndex,
        ShaderKind::Textured,
        ShaderKind::Highlight,
        ShaderKind::Axis,
    ];

    #[test]
    fn test_every_shader_has_both_entry_points() {
        for kind in ALL {
            let source = kind.source();
            assert!(source.contains("fn vs_main"), "{kind:?}");
            assert!(source.contains("fn fs_main"), "{kind:?}");
        }
    }

    #[test]
    fn test_cube_shaders_remap_depth() {
        for kind in [
            ShaderKind::Identity,
            ShaderKind::IdentityPrimitiveIndex,
            ShaderKind::Textured,
            ShaderKind::Highlight,
        ] {
            assert!(kind.source().contains("(clip.z + clip.w) * 0.5"), "{kind:?}");
        }
    }

    #[test]
    fn test_identity_selection() {
        assert_eq!(
            ShaderKind::identity(PrimitiveIndexSource::VertexIndex),
            ShaderKind::Identity
        );
        assert_eq!(
            ShaderKind::identity(PrimitiveIndexSource::Rasterizer).required_features(),
            wgpu::Features::SHADER_PRIMITIVE_INDEX
        );
        assert!(ShaderKind::Identity.required_features().is_empty());
    }
}
