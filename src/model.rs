//! Baked model loading.
//!
//! The cup, saucer and table come from a single glTF/GLB file with the
//! lighting already baked into a base color texture. Every mesh primitive
//! of the default scene is flattened into world space, keeping only
//! positions, the first UV set and the material's base color texture.
//!
//! One object in the file, `baked` by default, must exist. Its texture is
//! the one the camera looks at from grazing angles, so it gets anisotropic
//! filtering.

use std::path::{Path, PathBuf};

use glam::{Mat4, Vec3};
use tracing::{debug, info};

use crate::error::AssetError;
use crate::mesh::PlumeVertex;
use crate::textures::{AddressMode, FilterMode, TextureConfig};

/// Name of the object that must exist in the model file.
pub const DEFAULT_OBJECT_NAME: &str = "baked";
/// Anisotropy applied to the named object's texture.
pub const BAKED_ANISOTROPY: u16 = 8;

/// Model vertices share the plume's position + uv layout.
pub type ModelVertex = PlumeVertex;

/// One drawable piece of the model, already in world space.
#[derive(Debug, Clone)]
pub struct ModelPrimitive {
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
    /// Index into [`BakedModel::textures`].
    pub texture: Option<usize>,
    /// Whether this primitive belongs to the named object.
    pub baked: bool,
}

#[derive(Debug, Clone)]
pub struct BakedModel {
    pub primitives: Vec<ModelPrimitive>,
    pub textures: Vec<TextureConfig>,
    object_name: String,
}

impl BakedModel {
    /// Import `path` and flatten its default scene.
    pub fn load<P: AsRef<Path>>(path: P, object_name: &str) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let (document, buffers, images) = gltf::import(path)?;
        let model = Self::from_gltf(&document, &buffers, &images, object_name, path)?;
        info!(
            "Loaded model {} ({} primitives, {} textures)",
            path.display(),
            model.primitives.len(),
            model.textures.len()
        );
        Ok(model)
    }

    /// Flatten an already imported document. `path` is only used in errors.
    pub fn from_gltf(
        document: &gltf::Document,
        buffers: &[gltf::buffer::Data],
        images: &[gltf::image::Data],
        object_name: &str,
        path: &Path,
    ) -> Result<Self, AssetError> {
        let scene = document
            .default_scene()
            .or_else(|| document.scenes().next())
            .ok_or_else(|| AssetError::EmptyScene(path.to_path_buf()))?;

        let mut flattener = Flattener {
            buffers,
            object_name,
            found_object: false,
            primitives: Vec::new(),
            used_images: Vec::new(),
        };
        for node in scene.nodes() {
            flattener.visit(&node, Mat4::IDENTITY, false)?;
        }

        if !flattener.found_object {
            return Err(AssetError::MissingObject {
                name: object_name.to_string(),
                path: PathBuf::from(path),
            });
        }
        if flattener.primitives.is_empty() {
            return Err(AssetError::EmptyScene(path.to_path_buf()));
        }

        // Remap gltf image indices to a dense texture list.
        let mut textures = Vec::with_capacity(flattener.used_images.len());
        let mut slots = vec![None; images.len()];
        for &(image_index, baked) in &flattener.used_images {
            let data = images
                .get(image_index)
                .ok_or_else(|| AssetError::UnsupportedImageFormat(format!("missing image {image_index}")))?;
            let slot = match slots[image_index] {
                Some(slot) => slot,
                None => {
                    textures.push(base_color_texture(data)?);
                    slots[image_index] = Some(textures.len() - 1);
                    textures.len() - 1
                }
            };
            if baked {
                textures[slot] = textures[slot].clone().with_anisotropy(BAKED_ANISOTROPY);
            }
        }

        let primitives = flattener
            .primitives
            .into_iter()
            .map(|(mut primitive, image)| {
                primitive.texture = image.and_then(|i| slots.get(i).copied().flatten());
                primitive
            })
            .collect();

        Ok(Self {
            primitives,
            textures,
            object_name: object_name.to_string(),
        })
    }

    pub fn object_name(&self) -> &str {
        &self.object_name
    }

    /// World-space bounding box of every primitive.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for v in self.primitives.iter().flat_map(|p| &p.vertices) {
            min = min.min(v.position());
            max = max.max(v.position());
        }
        (min, max)
    }
}

struct Flattener<'a> {
    buffers: &'a [gltf::buffer::Data],
    object_name: &'a str,
    found_object: bool,
    primitives: Vec<(ModelPrimitive, Option<usize>)>,
    used_images: Vec<(usize, bool)>,
}

impl Flattener<'_> {
    fn visit(&mut self, node: &gltf::Node, parent: Mat4, inside_object: bool) -> Result<(), AssetError> {
        let transform = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
        let named = node.name() == Some(self.object_name)
            || node.mesh().and_then(|m| m.name()) == Some(self.object_name);
        self.found_object |= named;
        let baked = inside_object || named;

        if let Some(mesh) = node.mesh() {
            for primitive in mesh.primitives() {
                self.add_primitive(&primitive, transform, baked)?;
            }
        }
        for child in node.children() {
            self.visit(&child, transform, baked)?;
        }
        Ok(())
    }

    fn add_primitive(&mut self, primitive: &gltf::Primitive, transform: Mat4, baked: bool) -> Result<(), AssetError> {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            debug!("Skipping non-triangle primitive ({:?})", primitive.mode());
            return Ok(());
        }

        let buffers = self.buffers;
        let reader = primitive.reader(|b| buffers.get(b.index()).map(|data| data.0.as_slice()));
        let positions = reader
            .read_positions()
            .ok_or(AssetError::MissingAttribute("POSITION"))?;
        let mut uvs = reader.read_tex_coords(0).map(|tc| tc.into_f32());

        let vertices: Vec<ModelVertex> = positions
            .map(|p| {
                let world = transform.transform_point3(Vec3::from_array(p));
                let uv = uvs.as_mut().and_then(|it| it.next()).unwrap_or([0.0, 0.0]);
                ModelVertex {
                    position: world.to_array(),
                    uv,
                }
            })
            .collect();

        let indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..vertices.len() as u32).collect(),
        };

        // Mirrored transforms flip the winding.
        let indices = if transform.determinant() < 0.0 {
            indices
                .chunks_exact(3)
                .flat_map(|tri| [tri[0], tri[2], tri[1]])
                .collect()
        } else {
            indices
        };

        let image = primitive
            .material()
            .pbr_metallic_roughness()
            .base_color_texture()
            .map(|info| info.texture().source().index());
        if let Some(image) = image {
            self.used_images.push((image, baked));
        }

        self.primitives.push((
            ModelPrimitive {
                vertices,
                indices,
                texture: None,
                baked,
            },
            image,
        ));
        Ok(())
    }
}

/// Convert a decoded glTF image into an RGBA texture.
///
/// The texels stay gamma encoded: the surface is not sRGB, so they are
/// written out as stored.
fn base_color_texture(image: &gltf::image::Data) -> Result<TextureConfig, AssetError> {
    use gltf::image::Format;

    let rgba = match image.format {
        Format::R8G8B8A8 => image.pixels.clone(),
        Format::R8G8B8 => image
            .pixels
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        Format::R8 => image.pixels.iter().flat_map(|&l| [l, l, l, 255]).collect(),
        other => return Err(AssetError::UnsupportedImageFormat(format!("{other:?}"))),
    };

    Ok(TextureConfig::from_rgba(rgba, image.width, image.height)?
        .with_filter(FilterMode::Linear)
        .with_address_mode(AddressMode::Repeat)
        .with_srgb(false))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(format: gltf::image::Format, pixels: Vec<u8>) -> gltf::image::Data {
        gltf::image::Data {
            pixels,
            format,
            width: 1,
            height: 1,
        }
    }

    #[test]
    fn test_rgb_gets_opaque_alpha() {
        let tex = base_color_texture(&image(gltf::image::Format::R8G8B8, vec![1, 2, 3])).unwrap();
        assert_eq!(tex.data, vec![1, 2, 3, 255]);
        assert_eq!(tex.format(), wgpu::TextureFormat::Rgba8Unorm);
    }

    #[test]
    fn test_gray_expands() {
        let tex = base_color_texture(&image(gltf::image::Format::R8, vec![9])).unwrap();
        assert_eq!(tex.data, vec![9, 9, 9, 255]);
    }

    #[test]
    fn test_sixteen_bit_rejected() {
        let err = base_color_texture(&image(gltf::image::Format::R16G16B16A16, vec![0; 8])).unwrap_err();
        assert!(matches!(err, AssetError::UnsupportedImageFormat(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = BakedModel::load("does/not/exist.glb", DEFAULT_OBJECT_NAME).unwrap_err();
        assert!(matches!(err, AssetError::Gltf(_)));
    }
}
