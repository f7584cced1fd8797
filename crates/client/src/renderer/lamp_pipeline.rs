//! Unlit pipeline for the light markers.

use deskscene_core::{MeshVertex, PointLight, Transform};
use wgpu::{BindGroup, BindGroupLayout, Buffer, Device, Queue, RenderPipeline, TextureFormat};

use super::phong_pipeline::{depth_state, primitive_state, InstanceUniforms};
use super::vertex::VertexLayout;

const LAMP_SHADER: &str = include_str!("shaders/lamp.wgsl");

/// One marker's uniform buffer and bind group; rewritten every frame.
pub struct LampInstance {
    buffer: Buffer,
    pub bind_group: BindGroup,
}

impl LampInstance {
    fn uniforms(light: &PointLight) -> InstanceUniforms {
        InstanceUniforms::new(&Transform::uniform(light.marker_scale, light.position), 1.0)
    }

    pub fn update(&self, queue: &Queue, light: &PointLight) {
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[Self::uniforms(light)]));
    }
}

pub struct LampPipeline {
    pub pipeline: RenderPipeline,
}

impl LampPipeline {
    /// Shares the global and instance layouts of the lit pipeline.
    pub fn new(
        device: &Device,
        format: TextureFormat,
        global_layout: &BindGroupLayout,
        instance_layout: &BindGroupLayout,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("lamp_shader"),
            source: wgpu::ShaderSource::Wgsl(LAMP_SHADER.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("lamp_pipeline_layout"),
            bind_group_layouts: &[global_layout, instance_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("lamp_pipeline"),
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
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self { pipeline }
    }

    pub fn create_instance(
        &self,
        device: &Device,
        instance_layout: &BindGroupLayout,
        light: &PointLight,
        index: usize,
    ) -> LampInstance {
        let buffer =
            LampInstance::uniforms(light).create_buffer(device, &format!("lamp_{index}_uniforms"));
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("lamp_{index}_bind_group")),
            layout: instance_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        LampInstance { buffer, bind_group }
    }
}
