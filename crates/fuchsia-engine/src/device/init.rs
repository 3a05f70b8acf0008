/// Platform rendering backend requested at startup.
///
/// Both GL modes resolve to wgpu's GL/GLES backend; which native loader ends up
/// behind it (EGL, or ANGLE's EGL on Windows) is decided by wgpu at adapter
/// enumeration.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RenderingMode {
    /// Let wgpu pick among all compiled-in backends.
    Auto,
    /// OpenGL ES over ANGLE's EGL implementation (Windows).
    AngleEgl,
    /// OpenGL ES over the system EGL (X11/Wayland).
    Egl,
}

impl RenderingMode {
    /// Mode used by desktop builds for the current target.
    pub const fn platform_default() -> Self {
        if cfg!(windows) {
            RenderingMode::AngleEgl
        } else if cfg!(any(
            target_os = "linux",
            target_os = "freebsd",
            target_os = "dragonfly",
            target_os = "netbsd",
            target_os = "openbsd"
        )) {
            RenderingMode::Egl
        } else {
            RenderingMode::Auto
        }
    }

    /// Backends enabled for this mode, ignoring the environment.
    pub fn backends(self) -> wgpu::Backends {
        match self {
            RenderingMode::Auto => wgpu::Backends::all(),
            RenderingMode::AngleEgl | RenderingMode::Egl => wgpu::Backends::GL,
        }
    }

    /// Backends to instantiate; `WGPU_BACKEND` overrides the mode when set.
    pub fn resolve_backends(self) -> wgpu::Backends {
        match wgpu::Backends::from_env() {
            Some(from_env) => {
                log::info!("WGPU_BACKEND overrides rendering mode {self:?}: {from_env:?}");
                from_env
            }
            None => self.backends(),
        }
    }
}

impl Default for RenderingMode {
    fn default() -> Self {
        Self::platform_default()
    }
}

/// Initialization parameters for the GPU layer.
///
/// Keep this structure stable and minimal. Add configuration flags only when a
/// concrete platform or backend requirement exists.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Backend selection.
    pub rendering_mode: RenderingMode,

    /// Minimum GLES 3.x minor version requested from the GL backend.
    ///
    /// `Version0` matches shaders written for GLSL ES 3.00.
    pub gles_minor_version: wgpu::Gles3MinorVersion,

    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior).
    ///
    /// FIFO is the only mode every backend must support.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Required wgpu features.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    ///
    /// Defaults to the WebGL2 downlevel set so GLES 3.0 drivers qualify.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface. A hint only.
    pub desired_maximum_frame_latency: u32,
}

impl GpuInit {
    /// wgpu instance descriptor for this configuration.
    pub(crate) fn instance_descriptor(&self) -> wgpu::InstanceDescriptor {
        wgpu::InstanceDescriptor {
            backends: self.rendering_mode.resolve_backends(),
            backend_options: wgpu::BackendOptions {
                gl: wgpu::GlBackendOptions {
                    gles_minor_version: self.gles_minor_version,
                    ..Default::default()
                },
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            rendering_mode: RenderingMode::platform_default(),
            gles_minor_version: wgpu::Gles3MinorVersion::Version0,
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
            desired_maximum_frame_latency: 2,
        }
    }
}
