use crate::core::shared::Vec3;

/// Discriminates what a [`ModelPart`] is. Derived from the geometry it carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PartKind {
    Group,
    Cube,
    Mesh,
}

impl PartKind {
    pub fn name(&self) -> &'static str {
        match self {
            PartKind::Group => "group",
            PartKind::Cube => "cube",
            PartKind::Mesh => "mesh",
        }
    }
}


/// A node of the normalized model tree.
///
/// All face texture indices inside `geometry` are global indices into the
/// aspect's texture list.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelPart {
    pub name: String,
    pub position: Vec3,
    pub rotation: Vec3,
    pub pivot: Vec3,
    pub visible: bool,
    pub children: Vec<ModelPart>,
    /// `None` for groups.
    pub geometry: Option<Geometry>,
}

impl ModelPart {
    /// A visible group at the origin with the given children.
    pub fn group(name: impl Into<String>, children: Vec<ModelPart>) -> Self {
        Self {
            name: name.into(),
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            pivot: Vec3::ZERO,
            visible: true,
            children,
            geometry: None,
        }
    }

    pub fn kind(&self) -> PartKind {
        match &self.geometry {
            None => PartKind::Group,
            Some(Geometry::Cube(_)) => PartKind::Cube,
            Some(Geometry::Mesh(_)) => PartKind::Mesh,
        }
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn count_nodes(&self) -> usize {
        1 + self.children.iter().map(ModelPart::count_nodes).sum::<usize>()
    }

    /// Rewrites every face texture index of the subtree through `mapping`.
    ///
    /// Every index present must be in bounds of `mapping`.
    pub(crate) fn remap_textures(&mut self, mapping: &[usize]) {
        if let Some(geometry) = &mut self.geometry {
            geometry.for_each_texture_mut(|tex| {
                if let Some(idx) = tex {
                    *idx = mapping[*idx as usize] as u32;
                }
            });
        }
        for child in &mut self.children {
            child.remap_textures(mapping);
        }
    }
}


#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Cube(CubeGeometry),
    Mesh(MeshGeometry),
}

impl Geometry {
    pub(crate) fn for_each_texture_mut<F>(&mut self, mut f: F)
        where F: FnMut(&mut Option<u32>)
    {
        match self {
            Geometry::Cube(cube) => {
                for face in cube.faces.0.iter_mut().flatten() {
                    f(&mut face.texture);
                }
            }
            Geometry::Mesh(mesh) => {
                for face in mesh.faces.iter_mut() {
                    f(&mut face.texture);
                }
            }
        }
    }

    /// Collects the texture indices referenced by the faces, in face order.
    pub fn textures(&self) -> Vec<u32> {
        match self {
            Geometry::Cube(cube) => cube.faces.0.iter().flatten().filter_map(|f| f.texture).collect(),
            Geometry::Mesh(mesh) => mesh.faces.iter().filter_map(|f| f.texture).collect(),
        }
    }
}


#[derive(Clone, Debug, PartialEq, Default)]
pub struct CubeGeometry {
    pub from: Vec3,
    pub to: Vec3,
    pub inflate: f32,
    pub faces: CubeFaces,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaceDirection {
    North,
    East,
    South,
    West,
    Up,
    Down,
}

impl FaceDirection {
    pub const ALL: [FaceDirection; 6] = [
        FaceDirection::North,
        FaceDirection::East,
        FaceDirection::South,
        FaceDirection::West,
        FaceDirection::Up,
        FaceDirection::Down,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FaceDirection::North => "north",
            FaceDirection::East => "east",
            FaceDirection::South => "south",
            FaceDirection::West => "west",
            FaceDirection::Up => "up",
            FaceDirection::Down => "down",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// The six optional faces of a cube, indexed by [`FaceDirection`].
#[derive(Clone, Debug, PartialEq, Default)]
pub struct CubeFaces(pub [Option<CubeFace>; 6]);

impl CubeFaces {
    pub fn get(&self, dir: FaceDirection) -> Option<&CubeFace> {
        self.0[dir.index()].as_ref()
    }

    pub fn set(&mut self, dir: FaceDirection, face: Option<CubeFace>) {
        self.0[dir.index()] = face;
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct CubeFace {
    pub uv: [f32; 4],
    pub texture: Option<u32>,
}


#[derive(Clone, Debug, PartialEq, Default)]
pub struct MeshGeometry {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<MeshFace>,
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct MeshFace {
    /// Indices into the owning mesh's vertex list.
    pub vertices: Vec<u32>,
    /// One uv pair per entry of `vertices`.
    pub uvs: Vec<[f32; 2]>,
    pub texture: Option<u32>,
}
