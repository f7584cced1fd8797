//! Textured Phong render pipeline with uniform buffers.

use bytemuck::{Pod, Zeroable};
use deskscene_core::light::LIGHT_COUNT;
use deskscene_core::{LightRig, MeshVertex, PhongParams, Transform};
use glam::{Mat4, Vec3};
use wgpu::{
    util::DeviceExt, BindGroup, BindGroupLayout, Buffer, Device, Queue, RenderPipeline,
    TextureFormat,
};

use super::vertex::VertexLayout;

/// Shader source embedded at compile time.
const PHONG_SHADER: &str = include_str!("shaders/phong.wgsl");

pub const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;

/// Per-frame uniforms: camera, lights and specular settings.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct GlobalUniforms {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    pub light_positions: [[f32; 4]; LIGHT_COUNT],
    /// Light colour in xyz, ambient strength in w.
    pub light_colors: [[f32; 4]; LIGHT_COUNT],
    /// x = specular intensity, y = shininess.
    pub phong: [f32; 4],
}

impl GlobalUniforms {
    pub fn new(
        view: Mat4,
        projection: Mat4,
        camera_pos: Vec3,
        lights: &LightRig,
        phong: &PhongParams,
    ) -> Self {
        let mut light_positions = [[0.0; 4]; LIGHT_COUNT];
        let mut light_colors = [[0.0; 4]; LIGHT_COUNT];
        for (i, light) in lights.iter().enumerate() {
            light_positions[i] = light.position.extend(1.0).into();
            light_colors[i] = light.color.extend(light.ambient_strength).into();
        }

        Self {
            view: view.to_cols_array_2d(),
            projection: projection.to_cols_array_2d(),
            camera_pos: camera_pos.extend(1.0).into(),
            light_positions,
            light_colors,
            phong: [phong.specular_intensity, phong.shininess, 0.0, 0.0],
        }
    }
}

/// Per-object uniforms (model matrix, normal matrix, uv scale).
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct InstanceUniforms {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 3], // mat3x3 columns are padded to vec4 in WGSL
    pub uv_scale: [f32; 2],
    _padding: [f32; 2],
}

impl InstanceUniforms {
    pub fn new(transform: &Transform, uv_scale: f32) -> Self {
        let normal_mat = transform.normal_matrix();

        Self {
            model: transform.matrix().to_cols_array_2d(),
            normal_matrix: [
                normal_mat.x_axis.extend(0.0).into(),
                normal_mat.y_axis.extend(0.0).into(),
                normal_mat.z_axis.extend(0.0).into(),
            ],
            uv_scale: [uv_scale, uv_scale],
            _padding: [0.0; 2],
        }
    }

    /// Allocate a uniform buffer holding `self`.
    pub fn create_buffer(&self, device: &Device, label: &str) -> Buffer {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&[*self]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        })
    }
}

fn uniform_layout(device: &Device, label: &str) -> BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

/// Primitive state shared by the lit and lamp pipelines. Culling is off
/// because planes are single quads viewed from both sides.
pub(super) fn primitive_state() -> wgpu::PrimitiveState {
    wgpu::PrimitiveState {
        topology: wgpu::PrimitiveTopology::TriangleList,
        strip_index_format: None,
        front_face: wgpu::FrontFace::Ccw,
        cull_mode: None,
        polygon_mode: wgpu::PolygonMode::Fill,
        unclipped_depth: false,
        conservative: false,
    }
}

pub(super) fn depth_state() -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: true,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

/// Phong render pipeline resources.
pub struct PhongPipeline {
    pub pipeline: RenderPipeline,
    pub global_bind_group_layout: BindGroupLayout,
    pub instance_bind_group_layout: BindGroupLayout,
    pub texture_bind_group_layout: BindGroupLayout,
    pub global_uniform_buffer: Buffer,
    pub global_bind_group: BindGroup,
}

impl PhongPipeline {
    /// Create the Phong pipeline.
    pub fn new(device: &Device, format: TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("phong_shader"),
            source: wgpu::ShaderSource::Wgsl(PHONG_SHADER.into()),
        });

        // group 0: globals, group 1: per object
        let global_bind_group_layout = uniform_layout(device, "global_bind_group_layout");
        let instance_bind_group_layout = uniform_layout(device, "instance_bind_group_layout");

        // group 2: diffuse texture and sampler
        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("texture_bind_group_layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("phong_pipeline_layout"),
            bind_group_layouts: &[
                &global_bind_group_layout,
                &instance_bind_group_layout,
                &texture_bind_group_layout,
            ],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("phong_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[MeshVertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: primitive_state(),
            depth_stencil: Some(depth_state()),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        let global_uniforms = GlobalUniforms::new(
            Mat4::IDENTITY,
            Mat4::IDENTITY,
            Vec3::ZERO,
            &LightRig::default(),
            &PhongParams::default(),
        );

        let global_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("global_uniform_buffer"),
            contents: bytemuck::cast_slice(&[global_uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let global_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("global_bind_group"),
            layout: &global_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: global_uniform_buffer.as_entire_binding(),
            }],
        });

        Self {
            pipeline,
            global_bind_group_layout,
            instance_bind_group_layout,
            texture_bind_group_layout,
            global_uniform_buffer,
            global_bind_group,
        }
    }

    /// Update global uniforms.
    pub fn update_global_uniforms(&self, queue: &Queue, uniforms: &GlobalUniforms) {
        queue.write_buffer(&self.global_uniform_buffer, 0, bytemuck::cast_slice(&[*uniforms]));
    }

    /// Create an instance bind group.
    pub fn create_instance_bind_group(&self, device: &Device, buffer: &Buffer) -> BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("instance_bind_group"),
            layout: &self.instance_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        })
    }
}
