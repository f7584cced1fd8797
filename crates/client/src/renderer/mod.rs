//! WebGPU renderer for the desk scene.
//!
//! Uses wgpu for cross-platform GPU rendering (Vulkan/Metal/DX12).
//! The scene is static, so meshes, textures and per-object uniforms are
//! created once; only the globals and the lamp markers change per frame.

mod lamp_pipeline;
mod mesh;
mod phong_pipeline;
pub mod texture;
mod vertex;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use deskscene_core::{
    FlyCamera, Lens, LightRig, PhongParams, Primitive, ProjectionMode, SceneDescription,
};
use glam::{UVec2, Vec3};
use wgpu::{
    Backends, BindGroup, Buffer, Device, DeviceDescriptor, Instance, InstanceDescriptor,
    PowerPreference, Queue, RequestAdapterOptions, Surface, SurfaceConfiguration, TextureUsages,
    TextureView,
};
use winit::{dpi::PhysicalSize, window::Window};

use lamp_pipeline::{LampInstance, LampPipeline};
use mesh::MeshCache;
use phong_pipeline::{GlobalUniforms, InstanceUniforms, PhongPipeline, DEPTH_FORMAT};
use texture::GpuTexture;

pub use vertex::VertexLayout;

/// A scene object ready to draw.
struct DrawObject {
    primitive: Primitive,
    texture: String,
    // Keeps the uniform buffer alive for the bind group.
    _uniforms: Buffer,
    bind_group: BindGroup,
}

/// Everything the renderer needs from the app for one frame.
pub struct FrameParams<'a> {
    pub camera: &'a FlyCamera,
    pub projection: ProjectionMode,
    pub lens: &'a Lens,
    pub lights: &'a LightRig,
    pub phong: &'a PhongParams,
}

/// The main renderer.
pub struct Renderer {
    surface: Surface<'static>,
    device: Device,
    queue: Queue,
    config: SurfaceConfiguration,
    size: PhysicalSize<u32>,
    clear_color: wgpu::Color,
    depth_view: TextureView,
    phong: PhongPipeline,
    lamp: LampPipeline,
    meshes: MeshCache,
    textures: HashMap<String, GpuTexture>,
    objects: Vec<DrawObject>,
    lamps: Vec<LampInstance>,
}

impl Renderer {
    pub async fn new(
        window: Arc<Window>,
        scene: &SceneDescription,
        texture_dir: &Path,
    ) -> anyhow::Result<Self> {
        let size = window.inner_size();

        // Create instance
        let instance = Instance::new(&InstanceDescriptor {
            backends: Backends::all(),
            ..Default::default()
        });

        // Create surface
        let surface = instance.create_surface(window)?;

        // Request adapter
        let adapter = instance
            .request_adapter(&RequestAdapterOptions {
                power_preference: PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No suitable GPU adapter found"))?;

        tracing::info!("Using adapter: {:?}", adapter.get_info());

        let (device, queue) = adapter
            .request_device(
                &DeviceDescriptor {
                    label: Some("deskscene_device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        // Configure surface
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow::anyhow!("Surface reports no supported formats"))?;

        let config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_view = create_depth_view(&device, &config);

        let phong = PhongPipeline::new(&device, surface_format);
        let lamp = LampPipeline::new(
            &device,
            surface_format,
            &phong.global_bind_group_layout,
            &phong.instance_bind_group_layout,
        );

        let mut meshes = MeshCache::new();
        for primitive in scene.unique_primitives() {
            meshes.ensure(&device, &primitive)?;
        }

        let sampler = texture::create_sampler(&device);
        let textures = scene
            .textures
            .iter()
            .map(|(name, file)| {
                let image = texture::load_or_fallback(&texture_dir.join(file));
                let gpu = GpuTexture::upload(
                    &device,
                    &queue,
                    &phong.texture_bind_group_layout,
                    &sampler,
                    name,
                    &image,
                );
                (name.clone(), gpu)
            })
            .collect::<HashMap<_, _>>();

        let objects = scene
            .objects
            .iter()
            .map(|object| {
                let uniforms = InstanceUniforms::new(&object.transform(), object.uv_scale)
                    .create_buffer(&device, &format!("{}_uniforms", object.name));
                let bind_group = phong.create_instance_bind_group(&device, &uniforms);
                DrawObject {
                    primitive: object.primitive,
                    texture: object.texture.clone(),
                    _uniforms: uniforms,
                    bind_group,
                }
            })
            .collect();

        let lamps = scene
            .lights
            .iter()
            .enumerate()
            .map(|(i, light)| {
                lamp.create_instance(&device, &phong.instance_bind_group_layout, light, i)
            })
            .collect();

        tracing::info!(
            "Renderer ready: {} objects, {} meshes, {} textures, format {:?}",
            scene.objects.len(),
            meshes.len(),
            textures.len(),
            surface_format
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            clear_color: clear_color(scene.clear_color(), surface_format.is_srgb()),
            depth_view,
            phong,
            lamp,
            meshes,
            textures,
            objects,
            lamps,
        })
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_view = create_depth_view(&self.device, &self.config);
            tracing::debug!("Resized to {}x{}", new_size.width, new_size.height);
        }
    }

    pub fn render(&mut self, frame: &FrameParams<'_>) -> Result<(), wgpu::SurfaceError> {
        let viewport = UVec2::new(self.config.width, self.config.height);
        let globals = GlobalUniforms::new(
            frame.camera.view_matrix(),
            frame.camera.projection_matrix(frame.projection, viewport, frame.lens),
            frame.camera.position,
            frame.lights,
            frame.phong,
        );
        self.phong.update_global_uniforms(&self.queue, &globals);
        for (lamp, light) in self.lamps.iter().zip(frame.lights.iter()) {
            lamp.update(&self.queue, light);
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.phong.pipeline);
            render_pass.set_bind_group(0, &self.phong.global_bind_group, &[]);
            for object in &self.objects {
                let (Some(mesh), Some(texture)) =
                    (self.meshes.get(&object.primitive), self.textures.get(&object.texture))
                else {
                    continue;
                };
                render_pass.set_bind_group(1, &object.bind_group, &[]);
                render_pass.set_bind_group(2, &texture.bind_group, &[]);
                mesh.draw(&mut render_pass);
            }

            if let Some(marker) = self.meshes.get(&Primitive::lamp_marker()) {
                render_pass.set_pipeline(&self.lamp.pipeline);
                render_pass.set_bind_group(0, &self.phong.global_bind_group, &[]);
                for lamp in &self.lamps {
                    render_pass.set_bind_group(1, &lamp.bind_group, &[]);
                    marker.draw(&mut render_pass);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }
}

fn create_depth_view(device: &Device, config: &SurfaceConfiguration) -> TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d {
            width: config.width.max(1),
            height: config.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

/// Clear colour for the surface. Scene colours are display values, so they
/// are linearized when the surface applies sRGB encoding on write.
fn clear_color(color: Vec3, srgb_surface: bool) -> wgpu::Color {
    let channel = |c: f32| {
        let c = c.clamp(0.0, 1.0) as f64;
        if srgb_surface {
            srgb_to_linear(c)
        } else {
            c
        }
    };
    wgpu::Color {
        r: channel(color.x),
        g: channel(color.y),
        b: channel(color.z),
        a: 1.0,
    }
}

fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
