//! Integration tests for loading assets from disk.
//!
//! Everything is written to a temporary directory first, so these tests
//! don't depend on files shipped with the repo.

use std::fs;
use std::path::PathBuf;

use coffee_smoke::error::{AssetError, ParamsError};
use coffee_smoke::model::{BakedModel, BAKED_ANISOTROPY, DEFAULT_OBJECT_NAME};
use coffee_smoke::noise::NoiseField;
use coffee_smoke::params::SmokeParams;
use tempfile::TempDir;

// One triangle: 3 positions, 3 uvs, 3 u16 indices (+2 bytes padding).
const TRIANGLE_BUFFER: &str =
    "AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAAAAAAAAAAAAAAAIA/AAAAAAAAAAAAAIA/AAABAAIAAAA=";

// 1x1 opaque red PNG.
const RED_PIXEL_PNG: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR4nGP4z8DwHwAFAAH/iZk9HQAAAABJRU5ErkJggg==";

fn write_triangle_gltf(dir: &TempDir, node_name: &str) -> PathBuf {
    let json = format!(
        r#"{{
  "asset": {{ "version": "2.0" }},
  "scene": 0,
  "scenes": [ {{ "nodes": [0] }} ],
  "nodes": [ {{ "name": "{node_name}", "mesh": 0, "translation": [0.0, 2.0, 0.0] }} ],
  "meshes": [ {{
    "primitives": [ {{
      "attributes": {{ "POSITION": 0, "TEXCOORD_0": 1 }},
      "indices": 2,
      "material": 0
    }} ]
  }} ],
  "materials": [ {{
    "pbrMetallicRoughness": {{ "baseColorTexture": {{ "index": 0 }} }}
  }} ],
  "textures": [ {{ "source": 0 }} ],
  "images": [ {{ "uri": "data:image/png;base64,{RED_PIXEL_PNG}" }} ],
  "buffers": [ {{
    "byteLength": 68,
    "uri": "data:application/octet-stream;base64,{TRIANGLE_BUFFER}"
  }} ],
  "bufferViews": [
    {{ "buffer": 0, "byteOffset": 0, "byteLength": 36 }},
    {{ "buffer": 0, "byteOffset": 36, "byteLength": 24 }},
    {{ "buffer": 0, "byteOffset": 60, "byteLength": 6 }}
  ],
  "accessors": [
    {{ "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
       "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] }},
    {{ "bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC2" }},
    {{ "bufferView": 2, "componentType": 5123, "count": 3, "type": "SCALAR" }}
  ]
}}"#
    );
    let path = dir.path().join("scene.gltf");
    fs::write(&path, json).unwrap();
    path
}

#[test]
fn test_load_baked_model() {
    let dir = TempDir::new().unwrap();
    let path = write_triangle_gltf(&dir, DEFAULT_OBJECT_NAME);

    let model = BakedModel::load(&path, DEFAULT_OBJECT_NAME).unwrap();
    assert_eq!(model.primitives.len(), 1);
    assert_eq!(model.textures.len(), 1);

    let primitive = &model.primitives[0];
    assert!(primitive.baked);
    assert_eq!(primitive.indices, vec![0, 1, 2]);
    assert_eq!(primitive.texture, Some(0));
    // Node translation is baked into the vertices.
    assert_eq!(primitive.vertices[0].position, [0.0, 2.0, 0.0]);
    assert_eq!(primitive.vertices[2].position, [0.0, 3.0, 0.0]);
    assert_eq!(primitive.vertices[1].uv, [1.0, 0.0]);

    let texture = &model.textures[0];
    assert_eq!(texture.anisotropy, BAKED_ANISOTROPY);
    assert!(!texture.srgb);
    assert_eq!(texture.data, vec![255, 0, 0, 255]);
}

#[test]
fn test_missing_object_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = write_triangle_gltf(&dir, "saucer");

    let err = BakedModel::load(&path, DEFAULT_OBJECT_NAME).unwrap_err();
    match err {
        AssetError::MissingObject { name, path: reported } => {
            assert_eq!(name, DEFAULT_OBJECT_NAME);
            assert_eq!(reported, path);
        }
        other => panic!("expected MissingObject, got {other:?}"),
    }
}

#[test]
fn test_custom_object_name() {
    let dir = TempDir::new().unwrap();
    let path = write_triangle_gltf(&dir, "cup");
    let model = BakedModel::load(&path, "cup").unwrap();
    assert_eq!(model.object_name(), "cup");
}

#[test]
fn test_noise_from_png_uses_red_channel() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("noise.png");

    let mut img = image::RgbaImage::new(4, 2);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        *pixel = image::Rgba([(x * 60 + y) as u8, 7, 9, 255]);
    }
    img.save(&path).unwrap();

    let noise = NoiseField::from_file(&path).unwrap();
    assert_eq!((noise.width(), noise.height()), (4, 2));
    assert!((noise.texel(3, 1) - 181.0 / 255.0).abs() < 1e-6);
    // Wraps on both axes.
    assert_eq!(noise.texel(4, 2), noise.texel(0, 0));
}

#[test]
fn test_noise_from_garbage_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("noise.png");
    fs::write(&path, b"not an image").unwrap();
    assert!(NoiseField::from_file(&path).is_err());
}

#[test]
fn test_params_file_overrides_some_fields() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("smoke.json");
    fs::write(&path, r#"{ "twist": 4.0, "density_range": [0.35, 0.95] }"#).unwrap();

    let params = SmokeParams::from_json_file(&path).unwrap();
    assert_eq!(params.twist, 4.0);
    assert_eq!(params.density_range, [0.35, 0.95]);
    assert_eq!(params.wind_speed, SmokeParams::default().wind_speed);
}

#[test]
fn test_params_file_missing() {
    let dir = TempDir::new().unwrap();
    let err = SmokeParams::from_json_file(dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, ParamsError::Io(_)));
}
