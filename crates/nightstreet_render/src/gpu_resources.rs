//! GPU-side copies of geometry, textures and materials

use wgpu::util::DeviceExt;

use nightstreet_core::{ColorSpace, Geometry, Material, Texture, TextureImage, Wrap};

use crate::pipeline::{MaterialUniforms, MATERIAL_MAP_SLOTS};

/// Tangent-space "straight up" normal
pub const FLAT_NORMAL: [u8; 4] = [127, 127, 255, 255];
pub const WHITE: [u8; 4] = [255, 255, 255, 255];

/// Index of the normal map in [`nightstreet_core::MaterialMaps::slots`]
pub const NORMAL_SLOT: usize = 4;

/// Texel used in place of a missing or unreadable map
pub fn fallback_texel(slot: usize) -> [u8; 4] {
    if slot == NORMAL_SLOT {
        FLAT_NORMAL
    } else {
        WHITE
    }
}

pub fn address_mode(wrap: Wrap) -> wgpu::AddressMode {
    match wrap {
        Wrap::ClampToEdge => wgpu::AddressMode::ClampToEdge,
        Wrap::Repeat => wgpu::AddressMode::Repeat,
    }
}

pub fn texture_format(color_space: ColorSpace) -> wgpu::TextureFormat {
    match color_space {
        ColorSpace::Linear => wgpu::TextureFormat::Rgba8Unorm,
        ColorSpace::Srgb => wgpu::TextureFormat::Rgba8UnormSrgb,
    }
}

/// Vertex and index buffers for one geometry
pub struct GpuGeometry {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl GpuGeometry {
    pub fn upload(device: &wgpu::Device, geometry: &Geometry) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Geometry Vertex Buffer"),
            contents: bytemuck::cast_slice(geometry.vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Geometry Index Buffer"),
            contents: bytemuck::cast_slice(geometry.indices()),
            usage: wgpu::BufferUsages::INDEX,
        });
        log::debug!(
            "Uploaded {:?} geometry: {} vertices, {} triangles",
            geometry.primitive(),
            geometry.vertex_count(),
            geometry.triangle_count()
        );
        Self {
            vertex_buffer,
            index_buffer,
            index_count: geometry.indices().len() as u32,
        }
    }
}

/// Sampled texture with its sampler
pub struct GpuTexture {
    #[allow(dead_code)] // owns the storage behind `view`
    texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl GpuTexture {
    /// Decode and upload; unreadable images become a single `fallback` texel
    pub fn upload(device: &wgpu::Device, queue: &wgpu::Queue, texture: &Texture, fallback: [u8; 4]) -> Self {
        let image = texture.decode().unwrap_or_else(|err| {
            log::warn!("{}; using placeholder", err);
            TextureImage {
                width: 1,
                height: 1,
                pixels: fallback.to_vec(),
            }
        });
        let settings = &texture.settings;
        Self::from_image(
            device,
            queue,
            &image,
            texture_format(settings.color_space),
            address_mode(settings.wrap_s),
            address_mode(settings.wrap_t),
        )
    }

    pub fn solid(device: &wgpu::Device, queue: &wgpu::Queue, texel: [u8; 4]) -> Self {
        let image = TextureImage {
            width: 1,
            height: 1,
            pixels: texel.to_vec(),
        };
        Self::from_image(
            device,
            queue,
            &image,
            wgpu::TextureFormat::Rgba8Unorm,
            wgpu::AddressMode::Repeat,
            wgpu::AddressMode::Repeat,
        )
    }

    fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &TextureImage,
        format: wgpu::TextureFormat,
        wrap_u: wgpu::AddressMode,
        wrap_v: wgpu::AddressMode,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Material Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width),
                rows_per_image: Some(image.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Material Sampler"),
            address_mode_u: wrap_u,
            address_mode_v: wrap_v,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self { texture, view, sampler }
    }
}

/// Material uniform buffer and bind group
pub struct GpuMaterial {
    uniform_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    revision: u64,
}

impl GpuMaterial {
    /// `maps` holds one texture per slot, fallbacks included
    pub fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        material: &Material,
        maps: [&GpuTexture; MATERIAL_MAP_SLOTS],
    ) -> Self {
        let uniforms = MaterialUniforms::new(&material.params(), material.maps());
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Material Uniform Buffer"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let mut entries = vec![wgpu::BindGroupEntry {
            binding: 0,
            resource: uniform_buffer.as_entire_binding(),
        }];
        for (slot, map) in maps.iter().enumerate() {
            let slot = slot as u32;
            entries.push(wgpu::BindGroupEntry {
                binding: 1 + slot * 2,
                resource: wgpu::BindingResource::TextureView(&map.view),
            });
            entries.push(wgpu::BindGroupEntry {
                binding: 2 + slot * 2,
                resource: wgpu::BindingResource::Sampler(&map.sampler),
            });
        }

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Material Bind Group"),
            layout,
            entries: &entries,
        });

        Self {
            uniform_buffer,
            bind_group,
            revision: material.revision(),
        }
    }

    /// Re-upload parameters if the material changed since the last sync
    pub fn sync(&mut self, queue: &wgpu::Queue, material: &Material) -> bool {
        if material.revision() == self.revision {
            return false;
        }
        let uniforms = MaterialUniforms::new(&material.params(), material.maps());
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
        self.revision = material.revision();
        true
    }
}
