use std::path::{Path, PathBuf};

use crate::core::model_part::{
    CubeFace, CubeFaces, CubeGeometry, FaceDirection, Geometry, MeshFace, MeshGeometry, ModelPart,
};
use crate::core::shared::Vec3;
use crate::core::texture::TextureTable;
use crate::io::texture_io;
use crate::utils::strip_extension;

use super::outliner::{self, OutlinerNode};
use super::{Document, Element, Err, FaceEntry, FaceUv};

/// Where the image bytes of a document texture come from.
#[derive(Debug)]
enum TextureSource {
    Embedded(Vec<u8>),
    File(PathBuf),
    /// Neither embedded nor on disk. Only valid when the table already knows the name.
    Missing,
}

#[derive(Debug)]
struct PendingTexture {
    /// declared name without its extension
    name: String,
    source: TextureSource,
}

/// A parsed and validated document whose face texture indices are still local.
///
/// Building one touches no shared state; [`CompiledDocument::merge`] then
/// commits it against the texture table. Merges must run in document order.
#[derive(Debug)]
pub struct CompiledDocument {
    stem: String,
    root: ModelPart,
    textures: Vec<PendingTexture>,
}

impl CompiledDocument {
    /// Parses `json`, resolves its outliner and builds the local model tree,
    /// rooted at a group named `stem`. Relative texture paths are resolved
    /// against `base_dir` but not read yet.
    pub fn parse(stem: &str, json: &[u8], base_dir: &Path) -> Result<Self, Err> {
        let doc = Document::from_slice(json)?;

        if let Some(res) = doc.resolution {
            if res.width <= 0.0 || res.height <= 0.0 {
                return Err(Err::malformed("resolution", format!("texture resolution {}x{} is empty", res.width, res.height)));
            }
        }

        let textures = doc.textures.iter()
            .map(|entry| {
                let source = match (&entry.source, &entry.relative_path) {
                    (Some(uri), _) if uri.starts_with("data:") => TextureSource::Embedded(
                        texture_io::decode_data_uri(uri)
                            .map_err(|e| Err::InvalidTexture { name: entry.name.clone(), reason: e.to_string() })?,
                    ),
                    (_, Some(path)) if !path.is_empty() => TextureSource::File(base_dir.join(path)),
                    _ => TextureSource::Missing,
                };
                Ok(PendingTexture { name: strip_extension(&entry.name).to_string(), source })
            })
            .collect::<Result<Vec<_>, Err>>()?;

        let nodes = outliner::resolve(&doc.elements, &doc.outliner)?;
        let children = nodes.iter()
            .map(|node| build_part(node, textures.len()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            stem: stem.to_string(),
            root: ModelPart::group(stem, children),
            textures,
        })
    }

    /// Reconciles the document's textures with `table` and rewrites every face
    /// to global texture indices.
    pub fn merge(self, table: &mut TextureTable, validate_textures: bool) -> Result<ModelPart, Err> {
        let CompiledDocument { stem, mut root, mut textures } = self;
        let names = textures.iter().map(|t| t.name.clone()).collect::<Vec<_>>();

        let mapping = table.reconcile(&stem, names.iter().map(String::as_str), |local_idx| {
            let pending = &mut textures[local_idx];
            let source = std::mem::replace(&mut pending.source, TextureSource::Missing);
            let bytes = match source {
                TextureSource::Embedded(bytes) => bytes,
                TextureSource::File(path) => texture_io::read_texture_file(&path)
                    .map_err(|e| Err::InvalidTexture { name: pending.name.clone(), reason: e.to_string() })?,
                TextureSource::Missing => return Err(Err::malformed(
                    pending.name.as_str(),
                    "texture has no embedded source or relative path",
                )),
            };
            if validate_textures {
                texture_io::image_format_from_buffer(&bytes)
                    .map_err(|e| Err::InvalidTexture { name: pending.name.clone(), reason: e.to_string() })?;
            }
            log::debug!("Texture '{}' of '{}' added to the table", pending.name, stem);
            Ok(bytes)
        })?;

        root.remap_textures(&mapping);
        Ok(root)
    }

    pub fn get_stem(&self) -> &str {
        &self.stem
    }
}


fn build_part(node: &OutlinerNode<'_>, texture_count: usize) -> Result<ModelPart, Err> {
    match node {
        OutlinerNode::Group { group, children } => Ok(ModelPart {
            name: group.name.clone(),
            position: Vec3::ZERO,
            rotation: group.rotation.into(),
            pivot: group.origin.into(),
            visible: group.visibility,
            children: children.iter()
                .map(|child| build_part(child, texture_count))
                .collect::<Result<_, _>>()?,
            geometry: None,
        }),
        OutlinerNode::Part(element) => Ok(ModelPart {
            name: element.name.clone(),
            position: Vec3::ZERO,
            rotation: element.rotation.into(),
            pivot: element.origin.into(),
            visible: element.visibility,
            children: Vec::new(),
            geometry: Some(build_geometry(element, texture_count)?),
        }),
    }
}

fn label(element: &Element) -> String {
    if element.name.is_empty() {
        element.uuid.clone()
    } else {
        format!("{} ({})", element.name, element.uuid)
    }
}

fn build_geometry(element: &Element, texture_count: usize) -> Result<Geometry, Err> {
    match element.kind.as_str() {
        "cube" => build_cube(element, texture_count).map(Geometry::Cube),
        "mesh" => build_mesh(element, texture_count).map(Geometry::Mesh),
        other => Err(Err::malformed(label(element), format!("unknown element type '{}'", other))),
    }
}

fn face_texture(element: &Element, face: &FaceEntry, texture_count: usize) -> Result<Option<u32>, Err> {
    match face.texture {
        None => Ok(None),
        Some(idx) if idx >= 0 && (idx as usize) < texture_count => Ok(Some(idx as u32)),
        Some(idx) => Err(Err::malformed(
            label(element),
            format!("face texture index {} is out of range ({} textures)", idx, texture_count),
        )),
    }
}

fn build_cube(element: &Element, texture_count: usize) -> Result<CubeGeometry, Err> {
    let from = element.from.ok_or_else(|| Err::malformed(label(element), "cube has no 'from'"))?;
    let to = element.to.ok_or_else(|| Err::malformed(label(element), "cube has no 'to'"))?;

    let mut faces = CubeFaces::default();
    for (dir_name, face) in &element.faces {
        let dir = FaceDirection::ALL.into_iter()
            .find(|d| d.name() == dir_name.as_str())
            .ok_or_else(|| Err::malformed(label(element), format!("unknown face '{}'", dir_name)))?;
        let uv = match &face.uv {
            None => [0.0; 4],
            Some(FaceUv::Rect(uv)) => *uv,
            Some(FaceUv::PerVertex(_)) => {
                return Err(Err::malformed(label(element), format!("face '{}' has per-vertex uvs", dir_name)));
            }
        };
        faces.set(dir, Some(CubeFace { uv, texture: face_texture(element, face, texture_count)? }));
    }

    Ok(CubeGeometry {
        from: from.into(),
        to: to.into(),
        inflate: element.inflate,
        faces,
    })
}

fn build_mesh(element: &Element, texture_count: usize) -> Result<MeshGeometry, Err> {
    let vertex_map = element.vertices.as_ref()
        .ok_or_else(|| Err::malformed(label(element), "mesh has no vertices"))?;

    let mut faces = Vec::with_capacity(element.faces.len());
    for (face_name, face) in &element.faces {
        let vertices = face.vertices.iter()
            .map(|id| vertex_map.get_index_of(id)
                .map(|idx| idx as u32)
                .ok_or_else(|| Err::malformed(label(element), format!("face '{}' uses unknown vertex '{}'", face_name, id))))
            .collect::<Result<Vec<_>, _>>()?;
        let uvs = match &face.uv {
            Some(FaceUv::PerVertex(uv_map)) => face.vertices.iter()
                .map(|id| uv_map.get(id).copied().unwrap_or_default())
                .collect(),
            Some(FaceUv::Rect(_)) => {
                return Err(Err::malformed(label(element), format!("mesh face '{}' has a cube uv rectangle", face_name)));
            }
            None => vec![[0.0; 2]; vertices.len()],
        };
        faces.push(MeshFace { vertices, uvs, texture: face_texture(element, face, texture_count)? });
    }

    Ok(MeshGeometry {
        vertices: vertex_map.values().map(|&v| Vec3::from(v)).collect(),
        faces,
    })
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model_part::PartKind;
    use crate::io::texture_io::tests::PNG_SIGNATURE;
    use base64::Engine;

    fn data_uri() -> String {
        format!("data:image/png;base64,{}", base64::engine::general_purpose::STANDARD.encode(PNG_SIGNATURE))
    }

    fn document(texture_names: &[&str]) -> String {
        let textures = texture_names.iter()
            .map(|n| format!(r#"{{"name": "{}", "source": "{}"}}"#, n, data_uri()))
            .collect::<Vec<_>>()
            .join(",");
        format!(r#"{{
            "resolution": {{"width": 16, "height": 16}},
            "textures": [{}],
            "elements": [
                {{"uuid": "c1", "name": "head", "from": [-4, 0, -4], "to": [4, 8, 4], "origin": [0, 4, 0],
                  "faces": {{"north": {{"uv": [0, 0, 8, 8], "texture": 0}}, "up": {{"uv": [8, 0, 16, 8], "texture": {}}}, "down": {{"uv": [0, 0, 1, 1], "texture": null}}}}}}
            ],
            "outliner": [{{"name": "body", "origin": [0, 12, 0], "children": ["c1"]}}]
        }}"#, textures, texture_names.len().saturating_sub(1))
    }

    fn north_and_up(root: &ModelPart) -> (Option<u32>, Option<u32>) {
        match root.children[0].children[0].geometry.as_ref().unwrap() {
            Geometry::Cube(cube) => (
                cube.faces.get(FaceDirection::North).unwrap().texture,
                cube.faces.get(FaceDirection::Up).unwrap().texture,
            ),
            _ => unreachable!(),
        }
    }

    #[test]
    fn builds_a_rooted_tree() {
        let doc = CompiledDocument::parse("model", document(&["skin.png"]).as_bytes(), Path::new(".")).unwrap();
        let mut table = TextureTable::new();
        let root = doc.merge(&mut table, true).unwrap();
        assert_eq!(root.name, "model");
        assert_eq!(root.kind(), PartKind::Group);
        let body = &root.children[0];
        assert_eq!(body.pivot, Vec3::new(0.0, 12.0, 0.0));
        assert_eq!(body.children[0].kind(), PartKind::Cube);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0).unwrap().get_name(), "model_0");
    }

    #[test]
    fn second_document_reuses_known_texture() {
        let mut table = TextureTable::new();
        table.insert_shared("shared".to_string(), PNG_SIGNATURE.to_vec());

        let a = CompiledDocument::parse("a", document(&["one.png", "two.png"]).as_bytes(), Path::new(".")).unwrap();
        let a = a.merge(&mut table, true).unwrap();
        assert_eq!(north_and_up(&a), (Some(1), Some(2)));

        let b = CompiledDocument::parse("b", document(&["two.png", "three.png"]).as_bytes(), Path::new(".")).unwrap();
        let b = b.merge(&mut table, true).unwrap();
        assert_eq!(north_and_up(&b), (Some(2), Some(3)));
        assert_eq!(table.offset(), 4);
    }

    #[test]
    fn missing_from_is_malformed() {
        let json = br#"{"elements": [{"uuid": "c", "name": "arm", "to": [1, 1, 1]}], "outliner": ["c"]}"#;
        match CompiledDocument::parse("m", json, Path::new(".")) {
            Err(Err::MalformedDocument { element, .. }) => assert_eq!(element, "arm (c)"),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn out_of_range_face_texture_is_malformed() {
        let json = br#"{"elements": [{"uuid": "c", "from": [0, 0, 0], "to": [1, 1, 1],
            "faces": {"west": {"uv": [0, 0, 1, 1], "texture": 3}}}], "outliner": ["c"]}"#;
        assert!(matches!(
            CompiledDocument::parse("m", json, Path::new(".")),
            Err(Err::MalformedDocument { element, .. }) if element == "c"
        ));
    }

    #[test]
    fn unknown_element_type_and_zero_resolution_are_malformed() {
        let json = br#"{"elements": [{"uuid": "s", "type": "sphere"}], "outliner": ["s"]}"#;
        assert!(matches!(CompiledDocument::parse("m", json, Path::new(".")), Err(Err::MalformedDocument { .. })));
        let json = br#"{"resolution": {"width": 0, "height": 16}}"#;
        assert!(matches!(CompiledDocument::parse("m", json, Path::new(".")), Err(Err::MalformedDocument { .. })));
    }

    #[test]
    fn mesh_faces_index_the_vertex_map() {
        let json = br#"{
            "elements": [{"uuid": "m", "type": "mesh", "name": "tri",
                "vertices": {"a": [0, 0, 0], "b": [1, 0, 0], "c": [0, 1, 0]},
                "faces": {"f0": {"vertices": ["c", "a", "b"], "uv": {"a": [0, 0], "b": [16, 0], "c": [0, 16]}}}}],
            "outliner": ["m"]
        }"#;
        let root = CompiledDocument::parse("m", json, Path::new("."))
            .unwrap()
            .merge(&mut TextureTable::new(), true)
            .unwrap();
        match root.children[0].geometry.as_ref().unwrap() {
            Geometry::Mesh(mesh) => {
                assert_eq!(mesh.vertices.len(), 3);
                assert_eq!(mesh.faces[0].vertices, vec![2, 0, 1]);
                assert_eq!(mesh.faces[0].uvs, vec![[0.0, 16.0], [0.0, 0.0], [16.0, 0.0]]);
                assert_eq!(mesh.faces[0].texture, None);
            }
            _ => panic!("expected a mesh"),
        }
    }

    #[test]
    fn texture_without_source_must_already_be_known() {
        let json = br#"{"textures": [{"name": "skin.png"}]}"#;
        let doc = CompiledDocument::parse("m", json, Path::new(".")).unwrap();
        assert!(matches!(doc.merge(&mut TextureTable::new(), true), Err(Err::MalformedDocument { .. })));

        let mut table = TextureTable::new();
        table.insert_shared("skin".to_string(), PNG_SIGNATURE.to_vec());
        let doc = CompiledDocument::parse("m", json, Path::new(".")).unwrap();
        assert!(doc.merge(&mut table, true).is_ok());
        assert_eq!(table.len(), 1);
    }
}
