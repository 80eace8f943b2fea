use crate::core::aspect::Aspect;
use crate::core::metadata::Metadata;
use crate::core::model_part::{CubeGeometry, FaceDirection, Geometry, MeshGeometry, ModelPart};
use crate::core::script::Script;
use crate::core::shared::Vec3;
use crate::core::tag::{Compound, Tag};
use crate::core::texture::Texture;
use crate::shared::fields;

use super::Config;

/// Converts a value into its container representation.
pub trait ToTag {
    fn to_tag(&self, cfg: &Config) -> Tag;
}

/// Collects the fields of one compound, dropping default values when the
/// configuration asks for it.
struct CompoundBuilder<'c> {
    fields: Compound,
    cfg: &'c Config,
}

impl<'c> CompoundBuilder<'c> {
    fn new(cfg: &'c Config) -> Self {
        Self { fields: Compound::new(), cfg }
    }

    fn keep(&self, is_default: bool) -> bool {
        !is_default || !self.cfg.omit_defaults
    }

    /// Inserts unconditionally.
    fn put(&mut self, key: &str, tag: Tag) {
        self.fields.insert(key.to_string(), tag);
    }

    fn string(&mut self, key: &str, value: &str) {
        if self.keep(value.is_empty()) {
            self.put(key, Tag::from(value));
        }
    }

    fn float(&mut self, key: &str, value: f32) {
        if self.keep(value == 0.0) {
            self.put(key, Tag::Float(value));
        }
    }

    fn vec3_split(&mut self, keys: [&str; 3], v: Vec3) {
        for (key, value) in keys.into_iter().zip(v.to_array()) {
            self.float(key, value);
        }
    }

    fn floats(&mut self, key: &str, values: &[f32], default: &[f32]) {
        if self.keep(values == default) {
            self.put(key, Tag::float_list(values.iter().copied()));
        }
    }

    fn texture(&mut self, texture: Option<u32>) {
        match texture {
            Some(idx) => self.put(fields::TEXTURE, Tag::Int(idx as i32)),
            None if !self.cfg.omit_defaults => self.put(fields::TEXTURE, Tag::Int(-1)),
            None => {}
        }
    }

    fn list(&mut self, key: &str, elems: Vec<Tag>) {
        if self.keep(elems.is_empty()) {
            self.put(key, Tag::List(elems));
        }
    }

    fn build(self) -> Tag {
        Tag::Compound(self.fields)
    }
}


impl ToTag for ModelPart {
    fn to_tag(&self, cfg: &Config) -> Tag {
        let mut c = CompoundBuilder::new(cfg);
        // the name is never omitted, even when empty
        c.put(fields::NAME, Tag::from(self.name.as_str()));
        c.vec3_split(fields::POSITION, self.position);
        c.vec3_split(fields::ROTATION, self.rotation);
        c.vec3_split(fields::PIVOT, self.pivot);
        if c.keep(self.visible) {
            c.put(fields::VISIBLE, Tag::Bool(self.visible));
        }
        c.list(fields::CHILDREN, self.children.iter().map(|child| child.to_tag(cfg)).collect());
        if let Some(geometry) = &self.geometry {
            c.put(fields::GEOMETRY, geometry.to_tag(cfg));
        }
        c.build()
    }
}

impl ToTag for Geometry {
    fn to_tag(&self, cfg: &Config) -> Tag {
        match self {
            Geometry::Cube(cube) => cube.to_tag(cfg),
            Geometry::Mesh(mesh) => mesh.to_tag(cfg),
        }
    }
}

impl ToTag for CubeGeometry {
    fn to_tag(&self, cfg: &Config) -> Tag {
        let mut c = CompoundBuilder::new(cfg);
        c.put(fields::KIND, Tag::from("cube"));
        c.floats(fields::FROM, &self.from.to_array(), &[0.0; 3]);
        c.floats(fields::TO, &self.to.to_array(), &[0.0; 3]);
        c.float(fields::INFLATE, self.inflate);

        let mut faces = Compound::new();
        for dir in FaceDirection::ALL {
            let Some(face) = self.faces.get(dir) else { continue };
            let mut f = CompoundBuilder::new(cfg);
            f.floats(fields::UV, &face.uv, &[0.0; 4]);
            f.texture(face.texture);
            faces.insert(dir.name().to_string(), f.build());
        }
        if c.keep(faces.is_empty()) {
            c.put(fields::FACES, Tag::Compound(faces));
        }
        c.build()
    }
}

impl ToTag for MeshGeometry {
    fn to_tag(&self, cfg: &Config) -> Tag {
        let mut c = CompoundBuilder::new(cfg);
        c.put(fields::KIND, Tag::from("mesh"));
        let vertices = self.vertices.iter()
            .flat_map(|v| v.to_array())
            .map(Tag::Float)
            .collect();
        c.list(fields::VERTICES, vertices);

        let faces = self.faces.iter()
            .map(|face| {
                let mut f = CompoundBuilder::new(cfg);
                f.list(fields::FACE_VERTICES, face.vertices.iter().map(|&v| Tag::Int(v as i32)).collect());
                f.list(fields::FACE_UVS, face.uvs.iter().flatten().copied().map(Tag::Float).collect());
                f.texture(face.texture);
                f.build()
            })
            .collect();
        c.list(fields::FACES, faces);
        c.build()
    }
}

impl ToTag for Texture {
    fn to_tag(&self, cfg: &Config) -> Tag {
        let mut c = CompoundBuilder::new(cfg);
        c.string(fields::NAME, self.get_name());
        if c.keep(self.get_bytes().is_empty()) {
            c.put(fields::SOURCE, Tag::ByteArray(self.get_bytes().to_vec()));
        }
        c.build()
    }
}

impl ToTag for Script {
    fn to_tag(&self, cfg: &Config) -> Tag {
        let mut c = CompoundBuilder::new(cfg);
        c.put(fields::NAME, Tag::from(self.get_name()));
        c.string(fields::SOURCE, self.get_source());
        c.build()
    }
}

impl ToTag for Metadata {
    fn to_tag(&self, cfg: &Config) -> Tag {
        let mut c = CompoundBuilder::new(cfg);
        c.put(fields::NAME, Tag::from(self.name.as_str()));
        c.string(fields::AUTHOR, &self.author);
        c.string(fields::VERSION, &self.version);
        c.floats(fields::COLOR, &self.color.to_array(), &Metadata::DEFAULT_COLOR.to_array());
        c.list(fields::DEPENDENCIES, self.dependencies.iter().map(|d| Tag::from(d.as_str())).collect());
        c.build()
    }
}

impl ToTag for Aspect {
    fn to_tag(&self, cfg: &Config) -> Tag {
        let mut c = CompoundBuilder::new(cfg);
        c.put(fields::ENTITY, self.get_entity().to_tag(cfg));
        c.list(fields::WORLD, self.get_world().iter().map(|p| p.to_tag(cfg)).collect());
        c.put(fields::HUD, self.get_hud().to_tag(cfg));
        c.list(fields::TEXTURES, self.get_textures().iter().map(|t| t.to_tag(cfg)).collect());
        c.list(fields::SCRIPTS, self.get_scripts().iter().map(|s| s.to_tag(cfg)).collect());
        c.put(fields::METADATA, self.get_metadata().to_tag(cfg));
        c.build()
    }
}
