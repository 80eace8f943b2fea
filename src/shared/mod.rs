/// Field names of the container schema, shared by the encoder and the decoder.
pub(crate) mod fields {
    // aspect root
    pub const ENTITY: &str = "entity";
    pub const WORLD: &str = "world";
    pub const HUD: &str = "hud";
    pub const TEXTURES: &str = "textures";
    pub const SCRIPTS: &str = "scripts";
    pub const METADATA: &str = "metadata";

    // textures and scripts
    pub const NAME: &str = "name";
    pub const SOURCE: &str = "source";

    // metadata
    pub const AUTHOR: &str = "author";
    pub const VERSION: &str = "version";
    pub const COLOR: &str = "color";
    pub const DEPENDENCIES: &str = "deps";

    // model parts
    pub const POSITION: [&str; 3] = ["posX", "posY", "posZ"];
    pub const ROTATION: [&str; 3] = ["rotX", "rotY", "rotZ"];
    pub const PIVOT: [&str; 3] = ["pivX", "pivY", "pivZ"];
    pub const VISIBLE: &str = "vis";
    pub const CHILDREN: &str = "children";
    pub const GEOMETRY: &str = "geometry";

    // geometry
    pub const KIND: &str = "kind";
    pub const FROM: &str = "from";
    pub const TO: &str = "to";
    pub const INFLATE: &str = "inflate";
    pub const FACES: &str = "faces";
    pub const UV: &str = "uv";
    pub const TEXTURE: &str = "tex";
    pub const VERTICES: &str = "vertices";
    pub const FACE_VERTICES: &str = "verts";
    pub const FACE_UVS: &str = "uvs";
}
