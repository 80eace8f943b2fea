use crate::core::metadata::Metadata;
use crate::core::model_part::ModelPart;
use crate::core::script::Script;
use crate::core::texture::Texture;

/// One complete, immutable avatar asset: model trees, textures, scripts and metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct Aspect {
    metadata: Metadata,
    entity: ModelPart,
    world: Vec<ModelPart>,
    hud: ModelPart,
    /// position is the global texture index
    textures: Vec<Texture>,
    scripts: Vec<Script>,
}

impl Aspect {
    pub fn new(
        metadata: Metadata,
        entity: ModelPart,
        world: Vec<ModelPart>,
        hud: ModelPart,
        textures: Vec<Texture>,
        scripts: Vec<Script>,
    ) -> Self {
        Self { metadata, entity, world, hud, textures, scripts }
    }

    pub fn get_metadata(&self) -> &Metadata { &self.metadata }
    pub fn get_entity(&self) -> &ModelPart { &self.entity }
    pub fn get_world(&self) -> &[ModelPart] { &self.world }
    pub fn get_hud(&self) -> &ModelPart { &self.hud }
    pub fn get_textures(&self) -> &[Texture] { &self.textures }
    pub fn get_scripts(&self) -> &[Script] { &self.scripts }

    /// Looks up a texture by its global index.
    pub fn get_texture(&self, index: usize) -> Option<&Texture> {
        self.textures.get(index)
    }
}
