//! Scene renderer
//!
//! Turns a [`SceneGraph`] into GPU work each frame. Geometry, textures and
//! materials are uploaded the first time a draw references them and released
//! once the scene no longer holds them.

use nightstreet_core::{DirtyFlags, Geometry, Material, SceneGraph, Texture};

use crate::camera::PerspectiveCamera;
use crate::gpu_cache::ResourceCache;
use crate::gpu_resources::{fallback_texel, GpuGeometry, GpuMaterial, GpuTexture, FLAT_NORMAL, NORMAL_SLOT, WHITE};
use crate::pipeline::{
    DrawCall, InstanceRaw, MeshPipeline, PointLightRaw, SceneUniforms, MATERIAL_MAP_SLOTS, MAX_POINT_LIGHTS,
};
use crate::renderable::{Batch, DrawList};

const INITIAL_INSTANCE_CAPACITY: usize = 256;

/// Counters from the last [`SceneRenderer::prepare`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub instances: usize,
    pub draw_calls: usize,
    pub point_lights: usize,
    /// GPU resources released this frame
    pub released: usize,
}

/// Draws a scene graph with the mesh pipeline
pub struct SceneRenderer {
    pipeline: MeshPipeline,
    geometries: ResourceCache<Geometry, GpuGeometry>,
    textures: ResourceCache<Texture, GpuTexture>,
    materials: ResourceCache<Material, GpuMaterial>,
    white: GpuTexture,
    flat_normal: GpuTexture,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    draw_list: DrawList,
    opaque: Vec<Batch>,
    transparent: Vec<Batch>,
    clear_color: wgpu::Color,
}

impl SceneRenderer {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, surface_format: wgpu::TextureFormat) -> Self {
        Self {
            pipeline: MeshPipeline::new(device, surface_format),
            geometries: ResourceCache::new(),
            textures: ResourceCache::new(),
            materials: ResourceCache::new(),
            white: GpuTexture::solid(device, queue, WHITE),
            flat_normal: GpuTexture::solid(device, queue, FLAT_NORMAL),
            instance_buffer: Self::create_instance_buffer(device, INITIAL_INSTANCE_CAPACITY),
            instance_capacity: INITIAL_INSTANCE_CAPACITY,
            draw_list: DrawList::default(),
            opaque: Vec::new(),
            transparent: Vec::new(),
            clear_color: wgpu::Color::BLACK,
        }
    }

    fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Instance Buffer"),
            size: (capacity * std::mem::size_of::<InstanceRaw>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.pipeline.ensure_depth_texture(device, width, height);
    }

    /// Sync the GPU with the scene and camera
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        graph: &mut SceneGraph,
        camera: &PerspectiveCamera,
    ) -> FrameStats {
        let dirty = graph.dirty();
        let mut stats = FrameStats::default();

        if !dirty.is_empty() || self.draw_list.instance_count() == 0 {
            self.draw_list = DrawList::from_scene(graph);
            self.draw_list.limit_lights(camera.eye, MAX_POINT_LIGHTS);
        }
        self.draw_list.sort_transparent(camera.eye);
        (self.opaque, self.transparent) = self.draw_list.batches();

        if dirty.contains(DirtyFlags::STRUCTURE) {
            stats.released = self.geometries.sweep() + self.materials.sweep() + self.textures.sweep();
            if stats.released > 0 {
                log::debug!("Released {} GPU resources", stats.released);
            }
        }

        let batches: Vec<Batch> = self.opaque.iter().chain(self.transparent.iter()).cloned().collect();
        for batch in &batches {
            self.upload_batch(device, queue, batch);
        }

        self.write_instances(device, queue);
        self.write_scene_uniforms(queue, graph, camera);
        graph.clear_dirty();

        stats.instances = self.draw_list.instance_count();
        stats.draw_calls = batches.len();
        stats.point_lights = self.draw_list.point_lights.len();
        stats
    }

    fn upload_batch(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, batch: &Batch) {
        let geometry = &batch.geometry;
        self.geometries
            .get_or_insert_with(geometry.id(), geometry, || GpuGeometry::upload(device, geometry));

        let material = &batch.material;
        if let Some(gpu) = self.materials.get_mut(material.id()) {
            gpu.sync(queue, material);
            return;
        }

        for (slot, map) in material.maps().slots().into_iter().enumerate() {
            if let Some(texture) = map {
                self.textures.get_or_insert_with(texture.id(), texture, || {
                    GpuTexture::upload(device, queue, texture, fallback_texel(slot))
                });
            }
        }

        let maps = material.maps().slots();
        let views: [&GpuTexture; MATERIAL_MAP_SLOTS] = std::array::from_fn(|slot| {
            maps[slot]
                .and_then(|t| self.textures.get(t.id()))
                .unwrap_or(if slot == NORMAL_SLOT { &self.flat_normal } else { &self.white })
        });
        let gpu = GpuMaterial::new(device, self.pipeline.material_layout(), material, views);
        self.materials.get_or_insert_with(material.id(), material, || gpu);
    }

    fn write_instances(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        let instances: Vec<InstanceRaw> = self
            .draw_list
            .instances()
            .map(|item| InstanceRaw::from_world(&item.world))
            .collect();
        if instances.len() > self.instance_capacity {
            self.instance_capacity = instances.len().next_power_of_two();
            self.instance_buffer = Self::create_instance_buffer(device, self.instance_capacity);
            log::debug!("Instance buffer grown to {}", self.instance_capacity);
        }
        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }
    }

    fn write_scene_uniforms(&mut self, queue: &wgpu::Queue, graph: &SceneGraph, camera: &PerspectiveCamera) {
        let env = graph.environment;
        let mut uniforms = SceneUniforms {
            view_proj: camera.view_projection().to_cols_array_2d(),
            view: camera.view_matrix().to_cols_array_2d(),
            eye: camera.eye.to_array(),
            light_count: self.draw_list.point_lights.len() as u32,
            ambient: self.draw_list.ambient.to_array(),
            ..Default::default()
        };
        if let Some(fog) = env.fog {
            uniforms.fog_enabled = 1;
            uniforms.fog_density = fog.density;
            uniforms.fog_color = fog.color.to_array();
        }
        for (raw, instance) in uniforms.point_lights.iter_mut().zip(&self.draw_list.point_lights) {
            *raw = PointLightRaw {
                position: instance.position.to_array(),
                intensity: instance.light.intensity,
                color: instance.light.color.to_array(),
                distance: instance.light.distance,
                decay: instance.light.decay,
                _padding: [0.0; 3],
            };
        }
        self.pipeline.update_scene(queue, &uniforms);

        let bg = env.background;
        self.clear_color = wgpu::Color {
            r: bg.r as f64,
            g: bg.g as f64,
            b: bg.b as f64,
            a: 1.0,
        };
    }

    fn draw_calls<'a>(&'a self, batches: &[Batch]) -> Vec<DrawCall<'a>> {
        batches
            .iter()
            .filter_map(|batch| {
                let geometry = self.geometries.get(batch.geometry.id())?;
                let material = self.materials.get(batch.material.id())?;
                Some(DrawCall {
                    vertex_buffer: &geometry.vertex_buffer,
                    index_buffer: &geometry.index_buffer,
                    index_count: geometry.index_count,
                    material: &material.bind_group,
                    instances: batch.first_instance..batch.first_instance + batch.instance_count,
                })
            })
            .collect()
    }

    /// Record the frame's render pass
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        let opaque = self.draw_calls(&self.opaque);
        let transparent = self.draw_calls(&self.transparent);
        self.pipeline
            .render(encoder, view, &self.instance_buffer, &opaque, &transparent, self.clear_color);
    }

    /// Number of GPU textures currently resident
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }
}
