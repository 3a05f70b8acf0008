use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use fuchsia_engine::coords::{ColorRgba, Rect};
use fuchsia_engine::device::GpuError;
use fuchsia_engine::render::{DrawCall, FrameReport, RenderSurface, RenderTarget, SurfaceCtx};

pub const VERTEX_SHADER_SOURCE: &str = include_str!("shaders/triangle.vert.wgsl");
pub const FRAGMENT_SHADER_SOURCE: &str = include_str!("shaders/triangle.frag.wgsl");

const VERTEX_ENTRY: &str = "vs_main";
const FRAGMENT_ENTRY: &str = "fs_main";

pub const CLEAR_COLOR: ColorRgba = ColorRgba::black();

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
}

/// Triangle corners in normalized device coordinates.
pub const TRIANGLE_VERTICES: [Vertex; 3] = [
    Vertex { position: [-1.0, -1.0, 0.0] },
    Vertex { position: [1.0, -1.0, 0.0] },
    Vertex { position: [0.0, 1.0, 0.0] },
];

/// Bytes uploaded into the vertex buffer.
pub fn vertex_bytes() -> &'static [u8] {
    bytemuck::cast_slice(&TRIANGLE_VERTICES)
}

/// Attribute layout of the vertex buffer: location 0, three tightly packed
/// `f32`, not normalized.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct VertexArray {
    pub stride: wgpu::BufferAddress,
    pub attributes: [wgpu::VertexAttribute; 1],
}

impl VertexArray {
    fn describe() -> Self {
        Self {
            stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            attributes: Vertex::ATTRS,
        }
    }

    fn layout(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.attributes,
        }
    }
}

/// Compile and link outcome of the program, as reported by the driver.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct ProgramStatus {
    pub vertex_compiled: bool,
    pub fragment_compiled: bool,
    pub linked: bool,
}

/// Everything `on_init` creates. Dropped field by field in `on_deinit`.
pub(crate) struct TriangleResources {
    pub vertex_shader: wgpu::ShaderModule,
    pub fragment_shader: wgpu::ShaderModule,
    pub program: wgpu::RenderPipeline,
    pub vertex_buffer: wgpu::Buffer,
    pub vertex_array: VertexArray,
    pub status: ProgramStatus,
}

/// Render surface drawing a single magenta triangle over a black background.
pub struct TriangleControl {
    vertex_source: &'static str,
    fragment_source: &'static str,
    resources: Option<TriangleResources>,
    /// Program and vertex array are selected for drawing.
    bound: bool,
}

impl TriangleControl {
    pub fn new() -> Self {
        Self::with_sources(VERTEX_SHADER_SOURCE, FRAGMENT_SHADER_SOURCE)
    }

    fn with_sources(vertex_source: &'static str, fragment_source: &'static str) -> Self {
        Self {
            vertex_source,
            fragment_source,
            resources: None,
            bound: false,
        }
    }

    pub fn vertex_source(&self) -> &'static str {
        self.vertex_source
    }

    pub fn fragment_source(&self) -> &'static str {
        self.fragment_source
    }

    pub fn is_bound(&self) -> bool {
        self.bound
    }

    pub(crate) fn resources(&self) -> Option<&TriangleResources> {
        self.resources.as_ref()
    }

    /// Clear, viewport and draws for a frame with the given bounds.
    pub fn plan_frame(bounds: Rect, scale_factor: f32, target_size: (u32, u32)) -> FrameReport {
        let viewport = bounds.to_physical(scale_factor, target_size);
        let draws = match viewport {
            Some(_) => vec![DrawCall::vertices(TRIANGLE_VERTICES.len() as u32)],
            None => Vec::new(),
        };

        FrameReport {
            clear: CLEAR_COLOR,
            viewport,
            draws,
        }
    }
}

impl Default for TriangleControl {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSurface for TriangleControl {
    fn on_init(&mut self, ctx: &SurfaceCtx<'_>) -> Result<(), GpuError> {
        let vertex_array = VertexArray::describe();

        let (vertex_shader, vertex_compiled) =
            compile_shader(ctx, "triangle vertex shader", self.vertex_source);
        let (fragment_shader, fragment_compiled) =
            compile_shader(ctx, "triangle fragment shader", self.fragment_source);
        let (program, linked) = link_program(ctx, &vertex_shader, &fragment_shader, &vertex_array);

        let vertex_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("triangle vbo"),
            contents: vertex_bytes(),
            usage: wgpu::BufferUsages::VERTEX,
        });

        self.resources = Some(TriangleResources {
            vertex_shader,
            fragment_shader,
            program,
            vertex_buffer,
            vertex_array,
            status: ProgramStatus {
                vertex_compiled,
                fragment_compiled,
                linked,
            },
        });
        self.bound = true;

        ctx.errors.check()
    }

    fn on_render(
        &mut self,
        ctx: &SurfaceCtx<'_>,
        target: &RenderTarget<'_>,
        bounds: Rect,
    ) -> Result<FrameReport, GpuError> {
        let res = match self.resources.as_ref() {
            Some(res) if self.bound => res,
            _ => return Err(GpuError::NotInitialized),
        };

        let report = Self::plan_frame(bounds, ctx.scale_factor, target.size);

        let mut encoder = ctx.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("triangle encoder"),
        });

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("triangle pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(report.clear.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if let Some(vp) = report.viewport {
                rpass.set_viewport(
                    vp.x as f32,
                    vp.y as f32,
                    vp.width as f32,
                    vp.height as f32,
                    0.0,
                    1.0,
                );
                rpass.set_pipeline(&res.program);
                rpass.set_vertex_buffer(0, res.vertex_buffer.slice(..));
                for call in &report.draws {
                    rpass.draw(call.vertex_range(), call.instance_range());
                }
            }
        }

        ctx.queue.submit(std::iter::once(encoder.finish()));
        ctx.errors.check()?;

        Ok(report)
    }

    fn on_deinit(&mut self, ctx: &SurfaceCtx<'_>) {
        // Unbind before deleting anything.
        self.bound = false;

        let Some(res) = self.resources.take() else {
            return;
        };
        let TriangleResources {
            vertex_shader,
            fragment_shader,
            program,
            vertex_buffer,
            vertex_array,
            status: _,
        } = res;

        vertex_buffer.destroy();
        drop(vertex_buffer);
        drop(vertex_array);
        drop(program);
        drop(fragment_shader);
        drop(vertex_shader);

        if let Err(err) = ctx.errors.check() {
            log::warn!("triangle teardown: {err}");
        }
        log::debug!("triangle resources released");
    }
}

/// Runs `create` inside a validation error scope.
///
/// A failure is returned here and never reaches the error sink, so driver
/// errors pending from earlier calls stay there for the next check.
fn scoped<T>(ctx: &SurfaceCtx<'_>, create: impl FnOnce() -> T) -> (T, Option<wgpu::Error>) {
    let scope = ctx.device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = create();
    let err = pollster::block_on(scope.pop());
    (value, err)
}

/// Creates a shader module and writes its compilation log.
///
/// Compile errors are logged, not returned: the module stays invalid and the
/// program linked from it draws nothing. The flag is `true` when it compiled.
fn compile_shader(
    ctx: &SurfaceCtx<'_>,
    label: &str,
    source: &'static str,
) -> (wgpu::ShaderModule, bool) {
    let (module, failure) = scoped(ctx, || {
        ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        })
    });

    let info = pollster::block_on(module.get_compilation_info());
    for msg in &info.messages {
        let (line, col) = msg
            .location
            .map_or((0, 0), |loc| (loc.line_number, loc.line_position));
        match msg.message_type {
            wgpu::CompilationMessageType::Error => {
                log::error!("{label}:{line}:{col}: {}", msg.message)
            }
            wgpu::CompilationMessageType::Warning => {
                log::warn!("{label}:{line}:{col}: {}", msg.message)
            }
            wgpu::CompilationMessageType::Info => {
                log::info!("{label}:{line}:{col}: {}", msg.message)
            }
        }
    }

    let reported = info
        .messages
        .iter()
        .any(|msg| msg.message_type == wgpu::CompilationMessageType::Error);

    match &failure {
        // Already written line by line above.
        Some(err) if reported => log::debug!("{label}: {err}"),
        Some(err) => log::error!("{label}: {err}"),
        None => log::debug!("{label}: compiled"),
    }

    (module, failure.is_none())
}

/// Builds the render pipeline from both stages and the vertex layout.
///
/// Link failures are logged and the invalid pipeline is returned along with
/// `false`.
fn link_program(
    ctx: &SurfaceCtx<'_>,
    vertex_shader: &wgpu::ShaderModule,
    fragment_shader: &wgpu::ShaderModule,
    vertex_array: &VertexArray,
) -> (wgpu::RenderPipeline, bool) {
    let layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("triangle pipeline layout"),
        bind_group_layouts: &[],
        immediate_size: 0,
    });

    let buffers = [vertex_array.layout()];
    let targets = [Some(wgpu::ColorTargetState {
        format: ctx.target_format,
        blend: None,
        write_mask: wgpu::ColorWrites::ALL,
    })];

    let descriptor = wgpu::RenderPipelineDescriptor {
        label: Some("triangle program"),
        layout: Some(&layout),

        vertex: wgpu::VertexState {
            module: vertex_shader,
            entry_point: Some(VERTEX_ENTRY),
            compilation_options: Default::default(),
            buffers: &buffers,
        },

        fragment: Some(wgpu::FragmentState {
            module: fragment_shader,
            entry_point: Some(FRAGMENT_ENTRY),
            compilation_options: Default::default(),
            targets: &targets,
        }),

        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    };
    let (program, failure) = scoped(ctx, || ctx.device.create_render_pipeline(&descriptor));

    match &failure {
        Some(err) => log::error!("triangle program link failed: {err}"),
        None => log::debug!("triangle program linked"),
    }

    (program, failure.is_none())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fuchsia_engine::coords::PixelRect;
    use fuchsia_engine::device::{HeadlessGpu, OffscreenTarget};
    use fuchsia_engine::render::{SurfaceHost, SurfaceState};

    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    fn headless() -> HeadlessGpu {
        HeadlessGpu::noop().expect("no-op backend")
    }

    /// Draws three vertices from `buffer` with `program`, outside the control.
    fn submit_draw(
        ctx: &SurfaceCtx<'_>,
        out: &OffscreenTarget,
        program: &wgpu::RenderPipeline,
        buffer: &wgpu::Buffer,
    ) {
        let mut encoder = ctx.device.create_command_encoder(&Default::default());
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: None,
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &out.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            rpass.set_pipeline(program);
            rpass.set_vertex_buffer(0, buffer.slice(..));
            rpass.draw(0..3, 0..1);
        }
        ctx.queue.submit(std::iter::once(encoder.finish()));
    }

    // ── data ──────────────────────────────────────────────────────────────

    #[test]
    fn vertex_bytes_are_the_three_fixed_points() {
        let floats: &[f32] = bytemuck::cast_slice(vertex_bytes());
        assert_eq!(
            floats,
            &[-1.0, -1.0, 0.0, 1.0, -1.0, 0.0, 0.0, 1.0, 0.0]
        );
    }

    #[test]
    fn vertex_array_is_tightly_packed_float3() {
        let va = VertexArray::describe();
        assert_eq!(va.stride, 12);
        assert_eq!(va.attributes[0].format, wgpu::VertexFormat::Float32x3);
        assert_eq!(va.attributes[0].offset, 0);
        assert_eq!(va.attributes[0].shader_location, 0);
    }

    #[test]
    fn shader_sources_are_constant() {
        let a = TriangleControl::new();
        let b = TriangleControl::default();
        assert!(std::ptr::eq(a.vertex_source(), b.vertex_source()));
        assert!(std::ptr::eq(a.fragment_source(), b.fragment_source()));
        assert!(a.vertex_source().contains(VERTEX_ENTRY));
        assert!(a.fragment_source().contains("vec4<f32>(1.0, 0.0, 1.0, 1.0)"));
    }

    // ── frame plan ────────────────────────────────────────────────────────

    #[test]
    fn positive_bounds_clear_black_and_draw_three_vertices() {
        for (w, h) in [(1.0, 1.0), (320.0, 200.0), (1920.0, 1080.0)] {
            let size = (w as u32, h as u32);
            let plan = TriangleControl::plan_frame(Rect::new(0.0, 0.0, w, h), 1.0, size);

            assert_eq!(plan.clear, ColorRgba::black());
            assert_eq!(plan.viewport, Some(PixelRect::from_size(size)));
            assert_eq!(plan.draws, vec![DrawCall::vertices(3)]);
        }
    }

    #[test]
    fn viewport_follows_scale_factor() {
        let plan = TriangleControl::plan_frame(Rect::new(0.0, 0.0, 400.0, 300.0), 1.5, (600, 450));
        assert_eq!(plan.viewport, Some(PixelRect::new(0, 0, 600, 450)));
    }

    #[test]
    fn empty_bounds_clear_without_drawing() {
        let plan = TriangleControl::plan_frame(Rect::new(0.0, 0.0, 0.0, 0.0), 1.0, (640, 480));
        assert_eq!(plan.clear, ColorRgba::black());
        assert!(plan.viewport.is_none());
        assert!(plan.draws.is_empty());
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn init_creates_one_of_each_resource() {
        let gpu = headless();
        let ctx = gpu.surface_ctx(FORMAT);
        let mut control = TriangleControl::new();

        control.on_init(&ctx).expect("init");

        let res = control.resources().expect("resources after init");
        assert_eq!(
            res.status,
            ProgramStatus {
                vertex_compiled: true,
                fragment_compiled: true,
                linked: true,
            }
        );
        assert_eq!(res.vertex_buffer.size(), vertex_bytes().len() as u64);
        assert_eq!(res.vertex_buffer.usage(), wgpu::BufferUsages::VERTEX);
        assert_eq!(res.vertex_array, VertexArray::describe());
        assert!(control.is_bound());
        assert!(gpu.errors().is_clear());

        // The program and buffer are usable as created.
        let out = gpu.create_target(8, 8, FORMAT);
        submit_draw(&ctx, &out, &res.program, &res.vertex_buffer);
        assert!(gpu.errors().is_clear());
    }

    #[test]
    fn init_check_reports_errors_pending_before_init() {
        let gpu = headless();
        let ctx = gpu.surface_ctx(FORMAT);
        let mut control = TriangleControl::new();

        gpu.errors().record("surface configuration failed");

        let err = control.on_init(&ctx).expect_err("pending error must fail init");
        assert_eq!(
            err,
            GpuError::Driver {
                count: 1,
                first: "surface configuration failed".to_string(),
            }
        );
        assert!(control.resources().is_some());
    }

    #[test]
    fn render_reports_single_draw_for_any_size() {
        let gpu = headless();
        let ctx = gpu.surface_ctx(FORMAT);
        let mut control = TriangleControl::new();
        control.on_init(&ctx).expect("init");

        for (w, h) in [(16, 16), (640, 480), (33, 900)] {
            let out = gpu.create_target(w, h, FORMAT);
            let bounds = Rect::new(0.0, 0.0, w as f32, h as f32);

            let report = control
                .on_render(&ctx, &out.render_target(), bounds)
                .expect("render");

            assert_eq!(report.clear, CLEAR_COLOR);
            assert_eq!(report.draws.len(), 1);
            assert_eq!(report.vertex_count(), 3);
            assert_eq!(report.viewport, Some(PixelRect::from_size((w, h))));
        }

        // Geometry is never touched by rendering.
        let res = control.resources().expect("resources");
        assert_eq!(res.vertex_buffer.size(), 36);
    }

    #[test]
    fn render_before_init_is_an_error() {
        let gpu = headless();
        let ctx = gpu.surface_ctx(FORMAT);
        let out = gpu.create_target(8, 8, FORMAT);
        let mut control = TriangleControl::new();

        let result = control.on_render(&ctx, &out.render_target(), Rect::new(0.0, 0.0, 8.0, 8.0));
        assert_eq!(result, Err(GpuError::NotInitialized));
    }

    #[test]
    fn deinit_releases_every_resource() {
        let gpu = headless();
        let ctx = gpu.surface_ctx(FORMAT);
        let mut control = TriangleControl::new();
        control.on_init(&ctx).expect("init");

        let res = control.resources().expect("resources");
        let program = res.program.clone();
        let buffer = res.vertex_buffer.clone();

        control.on_deinit(&ctx);

        assert!(control.resources().is_none());
        assert!(!control.is_bound());
        assert!(gpu.errors().is_clear());

        // The vertex buffer was destroyed, not just dropped: drawing from the
        // surviving handle is rejected.
        let out = gpu.create_target(8, 8, FORMAT);
        submit_draw(&ctx, &out, &program, &buffer);
        assert!(gpu.errors().check().is_err());

        // A second teardown has nothing left to release.
        control.on_deinit(&ctx);
        assert!(control.resources().is_none());
    }

    #[test]
    fn shader_compile_error_is_logged_and_init_continues() {
        let gpu = headless();
        let ctx = gpu.surface_ctx(FORMAT);
        let mut control =
            TriangleControl::with_sources(VERTEX_SHADER_SOURCE, "@fragment fn fs_main( {");

        assert!(control.on_init(&ctx).is_ok());
        let status = control.resources().expect("resources").status;
        assert!(status.vertex_compiled);
        assert!(!status.fragment_compiled);
        assert!(!status.linked);

        // Drawing with the broken program is what the driver rejects.
        let out = gpu.create_target(8, 8, FORMAT);
        let result = control.on_render(&ctx, &out.render_target(), Rect::new(0.0, 0.0, 8.0, 8.0));
        assert!(matches!(result, Err(GpuError::Driver { .. })));
    }

    #[test]
    fn host_drives_full_lifecycle() {
        let gpu = headless();
        let ctx = gpu.surface_ctx(FORMAT);
        let out = gpu.create_target(64, 64, FORMAT);
        let mut host = SurfaceHost::new(TriangleControl::new());

        let report = host
            .render(&ctx, &out.render_target(), Rect::new(0.0, 0.0, 64.0, 64.0))
            .expect("render")
            .expect("report");
        assert_eq!(report.vertex_count(), 3);
        assert!(host.surface().resources().is_some());

        host.release(&ctx);
        assert_eq!(host.state(), SurfaceState::Released);
        assert!(host.surface().resources().is_none());
    }
}
