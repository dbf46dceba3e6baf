//! Frame orchestration: uniforms, simulate-cull dispatches, and the draw pass

use super::buffer::CameraBuffer;
use super::context::GpuContext;
use super::grass_buffers::GrassBuffers;
use super::pipeline::{GrassPipeline, SimulateCullPipeline, TerrainPipeline};
use super::renderable::Renderable;
use super::terrain_mesh::TerrainMesh;
use super::texture::{DepthTexture, GroundTexture};
use crate::core::camera::Camera;
use crate::core::time::SimulationTime;
use crate::core::Result;
use crate::grass::SimulateParams;
use crate::scene::Scene;

const SKY_COLOR: wgpu::Color = wgpu::Color {
    r: 0.53,
    g: 0.73,
    b: 0.92,
    a: 1.0,
};

/// Owns every GPU resource of a scene.
///
/// Every tile gets a terrain mesh. Only interactive fields get grass
/// buffers; the rest stay CPU-side.
pub struct Renderer {
    camera: CameraBuffer,
    params: SimulateParams,
    simulate: SimulateCullPipeline,
    terrain_pipeline: TerrainPipeline,
    grass_pipeline: GrassPipeline,
    depth: DepthTexture,
    meshes: Vec<TerrainMesh>,
    /// `(index into scene.fields(), buffers)`
    grass: Vec<(usize, GrassBuffers)>,
    readback_requested: bool,
    survivors: Option<u64>,
}

impl Renderer {
    pub fn new(gpu: &GpuContext, scene: &Scene, camera: &Camera) -> Result<Self> {
        let device = &gpu.device;
        let queue = &gpu.queue;
        let config = scene.config();

        let camera_buffer = CameraBuffer::new(device, queue, camera)?;
        let params = SimulateParams::new(
            &config.cull,
            camera,
            config.grass.blade_count,
            config.grass.seed as u32,
        );
        let simulate = SimulateCullPipeline::new(device, queue, &params, &SimulationTime::new().to_uniform())?;

        let ground = GroundTexture::load(device, queue, &config.terrain_texture);
        let terrain_pipeline = TerrainPipeline::new(device, gpu.format(), camera_buffer.bind_group_layout(), &ground);
        let grass_pipeline = GrassPipeline::new(device, gpu.format(), camera_buffer.bind_group_layout());

        let meshes = scene
            .terrain()
            .tiles()
            .iter()
            .map(|tile| TerrainMesh::new(device, queue, tile))
            .collect::<Result<Vec<_>>>()?;

        let grass = scene
            .fields()
            .iter()
            .enumerate()
            .filter(|(_, field)| field.is_interactive())
            .map(|(k, field)| Ok((k, GrassBuffers::new(device, queue, simulate.field_layout(), field)?)))
            .collect::<Result<Vec<_>>>()?;

        let (width, height) = gpu.size();
        let depth = DepthTexture::new(device, width, height);

        log::info!(
            "Renderer ready: {} terrain meshes, {} grass fields on GPU",
            meshes.len(),
            grass.len()
        );

        Ok(Self {
            camera: camera_buffer,
            params,
            simulate,
            terrain_pipeline,
            grass_pipeline,
            depth,
            meshes,
            grass,
            readback_requested: false,
            survivors: None,
        })
    }

    /// Number of grass fields simulated and drawn each frame
    pub fn grass_field_count(&self) -> usize {
        self.grass.len()
    }

    /// Blades submitted to the simulate-cull pass each frame
    pub fn simulated_blades(&self) -> u64 {
        self.grass.iter().map(|(_, b)| b.blade_count() as u64).sum()
    }

    /// Read the survivor counts back at the end of the next frame
    pub fn request_survivor_count(&mut self) {
        self.readback_requested = true;
    }

    /// Survivors summed over all grass fields, from the latest readback
    pub fn survivors(&self) -> Option<u64> {
        self.survivors
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth.resize(device, width, height);
    }

    /// Record and submit one frame.
    ///
    /// Uniform and collision uploads are queued before the command buffer,
    /// so the kernel sees this frame's camera, time and pointer.
    pub fn render(
        &mut self,
        gpu: &GpuContext,
        scene: &mut Scene,
        camera: &Camera,
        time: &SimulationTime,
    ) -> Result<()> {
        let queue = &gpu.queue;

        self.camera.update(queue, camera);
        self.params.update_camera(camera);
        self.simulate.update(queue, &self.params, &time.to_uniform());

        let fields = scene.fields_mut();
        for (k, buffers) in &self.grass {
            if let Some(field) = fields.get_mut(*k) {
                buffers.sync_collision(queue, field);
            }
        }

        let output = gpu.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame_encoder"),
        });

        let readback = std::mem::take(&mut self.readback_requested);
        for (_, buffers) in &self.grass {
            self.simulate.encode(&mut encoder, buffers);
            if readback {
                buffers.encode_readback(&mut encoder);
            }
        }

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(SKY_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: self.depth.view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            pass.set_pipeline(self.terrain_pipeline.pipeline());
            pass.set_bind_group(0, self.camera.bind_group(), &[]);
            pass.set_bind_group(1, self.terrain_pipeline.texture_bind_group(), &[]);
            for mesh in &self.meshes {
                mesh.draw(&mut pass);
            }

            pass.set_pipeline(self.grass_pipeline.pipeline());
            pass.set_bind_group(0, self.camera.bind_group(), &[]);
            for (_, buffers) in &self.grass {
                buffers.draw(&mut pass);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
        output.present();

        if readback {
            let mut total = 0u64;
            for (_, buffers) in &self.grass {
                total += buffers.read_survivors(&gpu.device)? as u64;
            }
            self.survivors = Some(total);
        }
        Ok(())
    }
}
