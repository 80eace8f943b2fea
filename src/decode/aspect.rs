use crate::core::aspect::Aspect;
use crate::core::metadata::Metadata;
use crate::core::model_part::{
    CubeFace, CubeFaces, CubeGeometry, FaceDirection, Geometry, MeshFace, MeshGeometry, ModelPart,
};
use crate::core::script::Script;
use crate::core::shared::Vec3;
use crate::core::tag::{Compound, Tag};
use crate::core::texture::Texture;
use crate::shared::fields;

use super::Err;

/// Rebuilds a value from its container representation.
///
/// Absent fields take their default value, so containers written with or
/// without default omission decode to the same value.
pub trait FromTag: Sized {
    fn from_tag(tag: &Tag) -> Result<Self, Err>;
}

/// Typed access to the fields of one compound. Errors carry the field name;
/// callers prefix the enclosing path.
struct Fields<'t> {
    compound: &'t Compound,
}

impl<'t> Fields<'t> {
    fn of(tag: &'t Tag) -> Result<Self, Err> {
        tag.as_compound()
            .map(|compound| Self { compound })
            .ok_or_else(|| Err::corrupt("", format!("compound, found {}", tag.kind())))
    }

    fn get(&self, key: &str) -> Option<&'t Tag> {
        self.compound.get(key)
    }

    fn required(&self, key: &str) -> Result<&'t Tag, Err> {
        self.get(key).ok_or_else(|| Err::corrupt(key, "a required field"))
    }

    fn string(&self, key: &str) -> Result<String, Err> {
        match self.get(key) {
            None => Ok(String::new()),
            Some(tag) => as_string(tag).map_err(|e| e.within(key)),
        }
    }

    fn required_string(&self, key: &str) -> Result<String, Err> {
        as_string(self.required(key)?).map_err(|e| e.within(key))
    }

    fn float(&self, key: &str) -> Result<f32, Err> {
        match self.get(key) {
            None => Ok(0.0),
            Some(tag) => as_float(tag).map_err(|e| e.within(key)),
        }
    }

    fn vec3_split(&self, keys: [&str; 3]) -> Result<Vec3, Err> {
        Ok(Vec3::new(self.float(keys[0])?, self.float(keys[1])?, self.float(keys[2])?))
    }

    fn floats<const N: usize>(&self, key: &str, default: [f32; N]) -> Result<[f32; N], Err> {
        let Some(tag) = self.get(key) else { return Ok(default) };
        let values = float_vec(tag).map_err(|e| e.within(key))?;
        values.try_into()
            .map_err(|_| Err::corrupt(key, format!("a list of {} floats", N)))
    }

    fn bool_or(&self, key: &str, default: bool) -> Result<bool, Err> {
        match self.get(key) {
            None => Ok(default),
            Some(Tag::Bool(b)) => Ok(*b),
            Some(other) => Err(Err::corrupt(key, format!("bool, found {}", other.kind()))),
        }
    }

    fn list(&self, key: &str) -> Result<&'t [Tag], Err> {
        match self.get(key) {
            None => Ok(&[]),
            Some(tag) => tag.as_list()
                .ok_or_else(|| Err::corrupt(key, format!("list, found {}", tag.kind()))),
        }
    }

    /// Decodes every element of the list `key`, keeping the element index in errors.
    fn list_of<T: FromTag>(&self, key: &str) -> Result<Vec<T>, Err> {
        self.list(key)?
            .iter()
            .enumerate()
            .map(|(idx, tag)| T::from_tag(tag).map_err(|e| e.within(&format!("{}[{}]", key, idx))))
            .collect()
    }

    fn nested<T: FromTag>(&self, key: &str) -> Result<T, Err> {
        T::from_tag(self.required(key)?).map_err(|e| e.within(key))
    }

    /// `-1` and absence both mean "no texture".
    fn texture(&self) -> Result<Option<u32>, Err> {
        match self.get(fields::TEXTURE) {
            None | Some(Tag::Int(-1)) => Ok(None),
            Some(Tag::Int(idx)) if *idx >= 0 => Ok(Some(*idx as u32)),
            Some(_) => Err(Err::corrupt(fields::TEXTURE, "texture index or -1")),
        }
    }
}

fn as_string(tag: &Tag) -> Result<String, Err> {
    match tag {
        Tag::String(s) => Ok(s.clone()),
        other => Err(Err::corrupt("", format!("string, found {}", other.kind()))),
    }
}

fn as_float(tag: &Tag) -> Result<f32, Err> {
    match tag {
        Tag::Float(f) => Ok(*f),
        other => Err(Err::corrupt("", format!("float, found {}", other.kind()))),
    }
}

fn float_vec(tag: &Tag) -> Result<Vec<f32>, Err> {
    let list = tag.as_list()
        .ok_or_else(|| Err::corrupt("", format!("list, found {}", tag.kind())))?;
    list.iter()
        .enumerate()
        .map(|(idx, t)| as_float(t).map_err(|e| e.within(&format!("[{}]", idx))))
        .collect()
}

fn index_vec(tag: &[Tag]) -> Result<Vec<u32>, Err> {
    tag.iter()
        .enumerate()
        .map(|(idx, t)| match t {
            Tag::Int(i) if *i >= 0 => Ok(*i as u32),
            _ => Err(Err::corrupt(format!("[{}]", idx), "non-negative int")),
        })
        .collect()
}


impl FromTag for ModelPart {
    fn from_tag(tag: &Tag) -> Result<Self, Err> {
        let f = Fields::of(tag)?;
        let geometry = match f.get(fields::GEOMETRY) {
            None => None,
            Some(g) => Some(Geometry::from_tag(g).map_err(|e| e.within(fields::GEOMETRY))?),
        };
        Ok(ModelPart {
            name: f.required_string(fields::NAME)?,
            position: f.vec3_split(fields::POSITION)?,
            rotation: f.vec3_split(fields::ROTATION)?,
            pivot: f.vec3_split(fields::PIVOT)?,
            visible: f.bool_or(fields::VISIBLE, true)?,
            children: f.list_of(fields::CHILDREN)?,
            geometry,
        })
    }
}

impl FromTag for Geometry {
    fn from_tag(tag: &Tag) -> Result<Self, Err> {
        let f = Fields::of(tag)?;
        let kind = f.required_string(fields::KIND)?;
        match kind.as_str() {
            "cube" => Ok(Geometry::Cube(CubeGeometry::from_tag(tag)?)),
            "mesh" => Ok(Geometry::Mesh(MeshGeometry::from_tag(tag)?)),
            _ => Err(Err::corrupt(fields::KIND, format!("'cube' or 'mesh', found '{}'", kind))),
        }
    }
}

impl FromTag for CubeGeometry {
    fn from_tag(tag: &Tag) -> Result<Self, Err> {
        let f = Fields::of(tag)?;
        let mut faces = CubeFaces::default();
        if let Some(faces_tag) = f.get(fields::FACES) {
            let by_dir = Fields::of(faces_tag).map_err(|e| e.within(fields::FACES))?;
            for dir in FaceDirection::ALL {
                let Some(face_tag) = by_dir.get(dir.name()) else { continue };
                let face = CubeFace::from_tag(face_tag)
                    .map_err(|e| e.within(dir.name()).within(fields::FACES))?;
                faces.set(dir, Some(face));
            }
        }
        Ok(CubeGeometry {
            from: f.floats(fields::FROM, [0.0; 3])?.into(),
            to: f.floats(fields::TO, [0.0; 3])?.into(),
            inflate: f.float(fields::INFLATE)?,
            faces,
        })
    }
}

impl FromTag for CubeFace {
    fn from_tag(tag: &Tag) -> Result<Self, Err> {
        let f = Fields::of(tag)?;
        Ok(CubeFace {
            uv: f.floats(fields::UV, [0.0; 4])?,
            texture: f.texture()?,
        })
    }
}

impl FromTag for MeshGeometry {
    fn from_tag(tag: &Tag) -> Result<Self, Err> {
        let f = Fields::of(tag)?;
        let flat = match f.get(fields::VERTICES) {
            None => Vec::new(),
            Some(t) => float_vec(t).map_err(|e| e.within(fields::VERTICES))?,
        };
        if flat.len() % 3 != 0 {
            return Err(Err::corrupt(fields::VERTICES, "a multiple of 3 floats"));
        }
        let vertices = flat.chunks_exact(3)
            .map(|c| Vec3::new(c[0], c[1], c[2]))
            .collect::<Vec<_>>();
        let faces: Vec<MeshFace> = f.list_of(fields::FACES)?;
        for (idx, face) in faces.iter().enumerate() {
            if face.vertices.iter().any(|&v| v as usize >= vertices.len()) {
                return Err(Err::corrupt(
                    format!("{}[{}].{}", fields::FACES, idx, fields::FACE_VERTICES),
                    format!("vertex indices below {}", vertices.len()),
                ));
            }
        }
        Ok(MeshGeometry { vertices, faces })
    }
}

impl FromTag for MeshFace {
    fn from_tag(tag: &Tag) -> Result<Self, Err> {
        let f = Fields::of(tag)?;
        let vertices = index_vec(f.list(fields::FACE_VERTICES)?)
            .map_err(|e| e.within(fields::FACE_VERTICES))?;
        let flat_uvs = match f.get(fields::FACE_UVS) {
            None => Vec::new(),
            Some(t) => float_vec(t).map_err(|e| e.within(fields::FACE_UVS))?,
        };
        if flat_uvs.len() != vertices.len() * 2 {
            return Err(Err::corrupt(fields::FACE_UVS, "one uv pair per vertex"));
        }
        Ok(MeshFace {
            vertices,
            uvs: flat_uvs.chunks_exact(2).map(|c| [c[0], c[1]]).collect(),
            texture: f.texture()?,
        })
    }
}

impl FromTag for Texture {
    fn from_tag(tag: &Tag) -> Result<Self, Err> {
        let f = Fields::of(tag)?;
        let bytes = match f.get(fields::SOURCE) {
            None => Vec::new(),
            Some(Tag::ByteArray(bytes)) => bytes.clone(),
            Some(other) => return Err(Err::corrupt(
                fields::SOURCE,
                format!("byte array, found {}", other.kind()),
            )),
        };
        Ok(Texture::new(f.string(fields::NAME)?, bytes))
    }
}

impl FromTag for Script {
    fn from_tag(tag: &Tag) -> Result<Self, Err> {
        let f = Fields::of(tag)?;
        Ok(Script::new(f.required_string(fields::NAME)?, f.string(fields::SOURCE)?))
    }
}

impl FromTag for Metadata {
    fn from_tag(tag: &Tag) -> Result<Self, Err> {
        let f = Fields::of(tag)?;
        let dependencies = f.list(fields::DEPENDENCIES)?
            .iter()
            .enumerate()
            .map(|(idx, t)| as_string(t).map_err(|e| e.within(&format!("{}[{}]", fields::DEPENDENCIES, idx))))
            .collect::<Result<Vec<String>, Err>>()?;
        Ok(Metadata {
            name: f.required_string(fields::NAME)?,
            author: f.string(fields::AUTHOR)?,
            version: f.string(fields::VERSION)?,
            color: f.floats(fields::COLOR, Metadata::DEFAULT_COLOR.to_array())?.into(),
            dependencies,
        })
    }
}

impl FromTag for Aspect {
    fn from_tag(tag: &Tag) -> Result<Self, Err> {
        let f = Fields::of(tag)?;
        let textures: Vec<Texture> = f.list_of(fields::TEXTURES)?;
        let entity: ModelPart = f.nested(fields::ENTITY)?;
        let world: Vec<ModelPart> = f.list_of(fields::WORLD)?;
        let hud: ModelPart = f.nested(fields::HUD)?;

        // every face must point into the texture list
        for (key, part) in [(fields::ENTITY, &entity), (fields::HUD, &hud)]
            .into_iter()
            .chain(world.iter().map(|p| (fields::WORLD, p)))
        {
            if let Some(bad) = first_dangling_texture(part, textures.len()) {
                return Err(Err::corrupt(key, format!("texture index below {}, found {}", textures.len(), bad)));
            }
        }

        Ok(Aspect::new(
            f.nested(fields::METADATA)?,
            entity,
            world,
            hud,
            textures,
            f.list_of(fields::SCRIPTS)?,
        ))
    }
}

fn first_dangling_texture(part: &ModelPart, texture_count: usize) -> Option<u32> {
    part.geometry.iter()
        .flat_map(Geometry::textures)
        .find(|&idx| idx as usize >= texture_count)
        .or_else(|| part.children.iter().find_map(|c| first_dangling_texture(c, texture_count)))
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::shared::ConfigType;
    use crate::encode::{Config as EncoderConfig, ToTag};

    fn sample_part() -> ModelPart {
        let mut faces = CubeFaces::default();
        faces.set(FaceDirection::North, Some(CubeFace { uv: [0.0, 0.0, 8.0, 8.0], texture: Some(0) }));
        faces.set(FaceDirection::Down, Some(CubeFace { uv: [1.0, 2.0, 3.0, 4.0], texture: None }));
        let cube = ModelPart {
            position: Vec3::new(1.0, 0.0, -2.5),
            geometry: Some(Geometry::Cube(CubeGeometry {
                from: Vec3::new(-4.0, 0.0, -4.0),
                to: Vec3::new(4.0, 8.0, 4.0),
                inflate: 0.25,
                faces,
            })),
            ..ModelPart::group("head", vec![])
        };
        let mesh = ModelPart {
            visible: false,
            geometry: Some(Geometry::Mesh(MeshGeometry {
                vertices: vec![Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)],
                faces: vec![MeshFace {
                    vertices: vec![0, 1, 2],
                    uvs: vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
                    texture: Some(1),
                }],
            })),
            ..ModelPart::group("tri", vec![])
        };
        let mut root = ModelPart::group("root", vec![cube, ModelPart::group("", vec![mesh])]);
        root.rotation = Vec3::new(0.0, 45.0, 0.0);
        root
    }

    #[test]
    fn part_survives_both_encoder_modes() {
        let part = sample_part();
        for omit_defaults in [true, false] {
            let tag = part.to_tag(&EncoderConfig { omit_defaults });
            assert_eq!(ModelPart::from_tag(&tag).unwrap(), part);
        }
    }

    #[test]
    fn missing_name_is_reported() {
        let err = ModelPart::from_tag(&Tag::Compound(Compound::new())).unwrap_err();
        match err {
            Err::CorruptContainer { field, .. } => assert_eq!(field, fields::NAME),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn unknown_geometry_kind_is_corrupt() {
        let mut geometry = Compound::new();
        geometry.insert(fields::KIND.to_string(), Tag::from("sphere"));
        let mut part = Compound::new();
        part.insert(fields::NAME.to_string(), Tag::from("p"));
        part.insert(fields::GEOMETRY.to_string(), Tag::Compound(geometry));
        let err = ModelPart::from_tag(&Tag::Compound(part)).unwrap_err();
        match err {
            Err::CorruptContainer { field, .. } => assert_eq!(field, "geometry.kind"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn negative_texture_other_than_minus_one_is_corrupt() {
        let mut face = Compound::new();
        face.insert(fields::TEXTURE.to_string(), Tag::Int(-2));
        assert!(CubeFace::from_tag(&Tag::Compound(face.clone())).is_err());
        face.insert(fields::TEXTURE.to_string(), Tag::Int(-1));
        assert_eq!(CubeFace::from_tag(&Tag::Compound(face)).unwrap().texture, None);
    }

    #[test]
    fn dangling_texture_index_is_rejected() {
        let aspect = Aspect::new(
            Metadata::default(),
            sample_part(),
            vec![],
            ModelPart::group("hud", vec![]),
            vec![Texture::new("only".to_string(), vec![1])],
            vec![],
        );
        let tag = aspect.to_tag(&EncoderConfig::default());
        let err = Aspect::from_tag(&tag).unwrap_err();
        match err {
            Err::CorruptContainer { field, .. } => assert_eq!(field, fields::ENTITY),
            other => panic!("unexpected error {:?}", other),
        }
    }
}
