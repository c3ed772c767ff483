use anyhow::{anyhow, Result};

/// Shader stage identifier used as the catalog lookup key.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn key(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }

    pub fn entry_point(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vs_main",
            ShaderStage::Fragment => "fs_main",
        }
    }
}

// Pre-built stage sources, keyed by stage name. The engine never compiles
// shader source itself; these are consumed as-is.
const CATALOG: &[(&str, &str)] = &[
    ("vertex", include_str!("shaders/viewport.vert.wgsl")),
    ("fragment", include_str!("shaders/viewport.frag.wgsl")),
];

/// Looks up a stage's pre-built source by key.
///
/// A miss is fatal to setup; the renderer must stay not-ready.
pub fn stage_source(key: &str) -> Result<&'static str> {
    CATALOG
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, src)| *src)
        .ok_or_else(|| anyhow!("no shader bytecode for stage '{key}'"))
}

/// Creates the module for one stage.
pub fn create_module(device: &wgpu::Device, stage: ShaderStage) -> Result<wgpu::ShaderModule> {
    let source = stage_source(stage.key())?;
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(stage.key()),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_stages_resolve() {
        assert!(stage_source(ShaderStage::Vertex.key()).is_ok());
        assert!(stage_source(ShaderStage::Fragment.key()).is_ok());
    }

    #[test]
    fn unknown_stage_is_an_error() {
        assert!(stage_source("geometry").is_err());
    }

    #[test]
    fn sources_contain_their_entry_points() {
        for stage in [ShaderStage::Vertex, ShaderStage::Fragment] {
            let src = stage_source(stage.key()).expect("known stage");
            assert!(src.contains(stage.entry_point()));
        }
    }
}
