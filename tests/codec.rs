use aspect_oxide::core::model_part::{
    CubeFace, CubeFaces, CubeGeometry, FaceDirection, MeshFace, MeshGeometry,
};
use aspect_oxide::core::tag::{Tag, TagKind};
use aspect_oxide::decode::FromTag;
use aspect_oxide::encode::ToTag;
use aspect_oxide::prelude::*;

fn sample_aspect() -> Aspect {
    let mut faces = CubeFaces::default();
    faces.set(FaceDirection::North, Some(CubeFace { uv: [0.0, 0.0, 8.0, 8.0], texture: Some(0) }));
    faces.set(FaceDirection::South, Some(CubeFace { uv: [8.0, 0.0, 16.0, 8.0], texture: Some(1) }));
    let head = ModelPart {
        pivot: Vec3::new(0.0, 24.0, 0.0),
        geometry: Some(Geometry::Cube(CubeGeometry {
            from: Vec3::new(-4.0, 24.0, -4.0),
            to: Vec3::new(4.0, 32.0, 4.0),
            inflate: 0.5,
            faces,
        })),
        ..ModelPart::group("head", vec![])
    };
    let fin = ModelPart {
        rotation: Vec3::new(0.0, 0.0, -12.5),
        visible: false,
        geometry: Some(Geometry::Mesh(MeshGeometry {
            vertices: vec![Vec3::ZERO, Vec3::new(0.0, 4.0, 0.0), Vec3::new(0.0, 0.0, 4.0)],
            faces: vec![MeshFace { vertices: vec![0, 1, 2], uvs: vec![[0.0, 0.0], [0.0, 4.0], [4.0, 0.0]], texture: None }],
        })),
        ..ModelPart::group("fin", vec![])
    };
    let model = ModelPart::group("model", vec![ModelPart::group("body", vec![head, fin])]);

    Aspect::new(
        Metadata {
            name: "Foo".to_string(),
            author: "someone".to_string(),
            version: "0.1.0".to_string(),
            color: Vec3::new(0.2, 0.4, 0.6),
            dependencies: vec!["base".to_string()],
        },
        ModelPart::group("entity", vec![model]),
        vec![ModelPart::group("statue", vec![])],
        ModelPart::group("hud", vec![]),
        vec![
            Texture::new("skin".to_string(), vec![0x89, b'P', b'N', b'G']),
            Texture::new("model_0".to_string(), vec![1, 2, 3]),
        ],
        vec![Script::new("main".to_string(), "print('hi')".to_string())],
    )
}

fn encoded(aspect: &Aspect, cfg: encode::Config) -> Vec<u8> {
    let mut buffer = Vec::new();
    encode(aspect, &mut buffer, cfg).unwrap();
    buffer
}

#[test]
fn round_trip() {
    let aspect = sample_aspect();
    let data = encoded(&aspect, encode::Config::default());
    assert!(data.starts_with(b"ASPECT"));
    let decoded = decode(&mut data.as_slice(), decode::Config::default()).unwrap();
    assert_eq!(decoded, aspect);
}

#[test]
fn compaction_only_shrinks_the_container() {
    let aspect = sample_aspect();
    let compact = encoded(&aspect, encode::Config::default());
    let verbose = encoded(&aspect, encode::Config { omit_defaults: false });
    assert!(compact.len() < verbose.len());
    assert_eq!(decode(&mut verbose.as_slice(), decode::Config::default()).unwrap(), aspect);
}

#[test]
fn default_part_encodes_to_its_name_only() {
    let tag = ModelPart::group("lonely", vec![]).to_tag(&encode::Config::default());
    let fields = tag.as_compound().unwrap();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields["name"], Tag::from("lonely"));
    assert_eq!(ModelPart::from_tag(&tag).unwrap(), ModelPart::group("lonely", vec![]));
}

#[test]
fn part_containers_round_trip() {
    let part = sample_aspect().get_entity().clone();
    let mut buffer = Vec::new();
    encode::encode_part(&part, &mut buffer, encode::Config::default()).unwrap();
    let decoded = decode::decode_part(&mut buffer.as_slice(), decode::Config::default()).unwrap();
    assert_eq!(decoded, part);
}

#[test]
fn truncated_container_is_corrupt() {
    let data = encoded(&sample_aspect(), encode::Config::default());
    for cut in [data.len() - 1, data.len() / 2, 9, 3, 0] {
        let err = decode(&mut &data[..cut], decode::Config::default()).unwrap_err();
        assert!(matches!(err, decode::Err::CorruptContainer { .. }), "cut at {}: {:?}", cut, err);
    }

    match decode(&mut &data[..3], decode::Config::default()).unwrap_err() {
        decode::Err::CorruptContainer { field, .. } => assert_eq!(field, "header"),
        other => panic!("unexpected error {:?}", other),
    }
}

fn nested_parts(levels: usize) -> ModelPart {
    let mut part = ModelPart::group("leaf", vec![]);
    for level in 0..levels {
        part = ModelPart { pivot: Vec3::ONE, ..ModelPart::group(format!("g{}", level), vec![part]) };
    }
    part
}

#[test]
fn whatever_encodes_also_decodes() {
    for omit_defaults in [true, false] {
        for levels in [1, 8, 16, 24, 31, 32, 64, 256] {
            let aspect = Aspect::new(
                Metadata::default(),
                nested_parts(levels),
                vec![],
                ModelPart::group("hud", vec![]),
                vec![],
                vec![],
            );
            let mut data = Vec::new();
            match encode(&aspect, &mut data, encode::Config { omit_defaults }) {
                Ok(()) => {
                    let decoded = decode(&mut data.as_slice(), decode::Config::default());
                    assert_eq!(decoded.unwrap(), aspect, "{} levels", levels);
                }
                Err(err) => assert!(
                    matches!(err, encode::Err::TagError(encode::tag::Err::TooDeep { .. })),
                    "{} levels: {:?}", levels, err
                ),
            }
        }
    }

    let encodes = |levels| encode::encode_part(&nested_parts(levels), &mut Vec::new(), encode::Config::default()).is_ok();
    assert!(encodes(8));
    assert!(!encodes(256));
}

#[test]
fn deeply_nested_lists_are_rejected() {
    let mut data = b"ASPECT\x01\x00".to_vec();
    data.push(6);
    data.extend([6_u8, 1].repeat(500));
    data.extend_from_slice(&[0, 0]);
    match decode(&mut data.as_slice(), decode::Config::default()).unwrap_err() {
        decode::Err::CorruptContainer { expected, .. } => assert!(expected.contains("nesting depth")),
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn trailing_bytes_are_corrupt() {
    let mut data = encoded(&sample_aspect(), encode::Config::default());
    data.push(0);
    assert!(matches!(
        decode(&mut data.as_slice(), decode::Config::default()),
        Err(decode::Err::CorruptContainer { .. })
    ));
}

#[test]
fn header_is_checked() {
    let mut data = encoded(&sample_aspect(), encode::Config::default());
    data[0] = b'X';
    assert!(matches!(
        decode(&mut data.as_slice(), decode::Config::default()),
        Err(decode::Err::HeaderError(_))
    ));

    let mut data = encoded(&sample_aspect(), encode::Config::default());
    data[6] = 2;
    assert!(matches!(
        decode(&mut data.as_slice(), decode::Config::default()),
        Err(decode::Err::HeaderError(_))
    ));
}

#[test]
fn wrong_field_kind_names_the_path() {
    let mut root = sample_aspect().to_tag(&encode::Config::default());
    let Tag::Compound(fields) = &mut root else { unreachable!() };
    let Tag::Compound(metadata) = &mut fields["metadata"] else { unreachable!() };
    metadata.insert("author".to_string(), Tag::Int(3));

    let mut data = b"ASPECT\x01\x00".to_vec();
    aspect_oxide::encode::write_tag(&root, &mut data).unwrap();
    match decode(&mut data.as_slice(), decode::Config::default()).unwrap_err() {
        decode::Err::CorruptContainer { field, expected } => {
            assert_eq!(field, "root.metadata.author");
            assert!(expected.contains(TagKind::String.name()));
        }
        other => panic!("unexpected error {:?}", other),
    }
}
