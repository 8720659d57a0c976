//! The surface lifecycle manager: owns the surface object, its native window
//! and the GPU target, switches between backends and draws one flat color
//! per request.

use crate::color::{Argb, Palette};
use crate::config::{CanvasSize, SurfaceConfig};
use crate::error::SurfaceError;
use crate::guard::defer;
use crate::logging::{Logger, NullSink};
use crate::platform::{GpuBackend, PixelBuffer, WindowProvider};
use crate::report;

/// Which backend draws into the surface.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Selection {
    /// Nothing selected; no surface is held.
    #[default]
    None,
    /// CPU writes into the native window's buffer.
    Software,
    /// EGL / OpenGL ES.
    Hardware,
}

impl Selection {
    /// Map the host's integer mode: 0 = none, 1 = software, 2 = hardware.
    #[must_use]
    pub fn from_mode(mode: i32) -> Option<Self> {
        match mode {
            0 => Some(Self::None),
            1 => Some(Self::Software),
            2 => Some(Self::Hardware),
            _ => None,
        }
    }
}

/// What a [`SurfaceManager::draw`] call did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Draw {
    /// The color was drawn and presented.
    Drawn(Argb),
    /// No backend is selected; nothing was touched.
    Nothing,
}

/// Owns every per-surface resource and mediates between no backend, the
/// software backend and the hardware backend.
///
/// At most one surface object, one native window and one GPU target exist at
/// a time. The GPU display is opened on the first hardware selection and kept
/// until the manager is dropped.
///
/// # Example
///
/// ```no_run
/// # use surfacing::{GpuBackend, Logger, NullSink, Selection, SurfaceConfig, SurfaceManager, WindowProvider};
/// # fn example<W: WindowProvider, G: GpuBackend<W::Window>>(windows: W, gpu: G, texture: W::Texture) {
/// let sink = NullSink;
/// let log = Logger::new(&sink);
/// let mut manager = SurfaceManager::new(windows, gpu, SurfaceConfig::default());
/// let _ = manager.select(log, Some(&texture), Selection::Hardware);
/// let _ = manager.draw(log);
/// # }
/// ```
pub struct SurfaceManager<W, G>
where
    W: WindowProvider,
    G: GpuBackend<W::Window>,
{
    windows: W,
    gpu: G,
    canvas: CanvasSize,
    palette: Palette,
    selection: Selection,
    surface: Option<W::Surface>,
    window: Option<W::Window>,
    /// Opened on the first hardware selection and never closed.
    display: Option<G::Display>,
    target: Option<G::Target>,
}

impl<W, G> SurfaceManager<W, G>
where
    W: WindowProvider,
    G: GpuBackend<W::Window>,
{
    /// Create an idle manager.
    pub fn new(windows: W, gpu: G, config: SurfaceConfig) -> Self {
        Self {
            windows,
            gpu,
            canvas: config.canvas,
            palette: config.palette,
            selection: Selection::None,
            surface: None,
            window: None,
            display: None,
            target: None,
        }
    }

    /// The active backend.
    #[must_use]
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// The palette and its cursor.
    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Whether a surface object is held.
    #[must_use]
    pub fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    /// Switch to `selection`, drawing into `texture`.
    ///
    /// Whatever was active is torn down first. On failure the attempt's
    /// resources are released and the manager stays idle; select again to
    /// retry.
    ///
    /// # Errors
    ///
    /// Any [`SurfaceError`] raised while creating the surface, window or GPU
    /// target. The error has already been reported through `log`.
    pub fn select(
        &mut self,
        log: Logger<'_>,
        texture: Option<&W::Texture>,
        selection: Selection,
    ) -> Result<(), SurfaceError> {
        if selection == Selection::None && self.is_idle() {
            return Ok(());
        }

        self.teardown(log);

        if selection == Selection::None {
            report!(log, "Deinitialized");
            return Ok(());
        }

        match self.activate(texture, selection) {
            Ok(()) => {
                match selection {
                    Selection::Software => report!(log, "CPU rendering initialized"),
                    Selection::Hardware => report!(log, "OpenGL initialized"),
                    Selection::None => {}
                }
                Ok(())
            }
            Err(err) => {
                report!(log, "{err}");
                Err(err)
            }
        }
    }

    /// Draw the next palette color with the active backend.
    ///
    /// # Errors
    ///
    /// Any [`SurfaceError`] raised while re-deriving the window or drawing.
    /// The palette does not advance on failure.
    pub fn draw(&mut self, log: Logger<'_>) -> Result<Draw, SurfaceError> {
        if self.surface.is_none() {
            report!(log, "No engine initialized");
            return Ok(Draw::Nothing);
        }

        if self.window.is_none() {
            if let Err(err) = self.reattach_window() {
                report!(log, "{err}");
                return Err(err);
            }
        }

        let color = self.palette.current();
        match self.render(log, color) {
            Ok(()) => {
                self.palette.advance();
                Ok(Draw::Drawn(color))
            }
            Err(err) => {
                report!(log, "{err}");
                Err(err)
            }
        }
    }

    /// Drop the native window but keep the surface object, as when the host
    /// destroyed the view. The next [`draw`](Self::draw) derives a new one.
    pub fn detach_window(&mut self) {
        if let Some(window) = self.window.take() {
            self.windows.release_window(window);
        }
    }

    /// Blank the surface and release everything except the GPU display.
    pub fn shutdown(&mut self, log: Logger<'_>) {
        self.teardown(log);
    }

    fn is_idle(&self) -> bool {
        self.surface.is_none() && self.window.is_none() && self.target.is_none()
    }

    fn teardown(&mut self, log: Logger<'_>) {
        // The GPU path does not need the native window, so a detached window
        // still gets its blank frame.
        if self.target.is_some() || self.window.is_some() {
            if let Err(err) = self.render(log, Argb::TRANSPARENT) {
                report!(log, "{err}");
            }
        }

        if let Some(target) = self.target.take() {
            if let Some(display) = &self.display {
                self.gpu.destroy_target(display, target);
            }
        }
        if let Some(window) = self.window.take() {
            self.windows.release_window(window);
        }
        // The next surface for this texture cannot be created until this one
        // is released; CPU and GL access cannot share a surface object.
        if let Some(surface) = self.surface.take() {
            self.windows.release_surface(surface);
        }
        self.selection = Selection::None;
    }

    fn activate(
        &mut self,
        texture: Option<&W::Texture>,
        selection: Selection,
    ) -> Result<(), SurfaceError> {
        let texture = texture.ok_or(SurfaceError::MissingTexture)?;
        let surface = self.windows.create_surface(texture)?;
        let window = match self.windows.acquire_window(&surface) {
            Ok(window) => window,
            Err(err) => {
                self.windows.release_surface(surface);
                return Err(err);
            }
        };

        let target = match self.prepare_backend(selection, &window) {
            Ok(target) => target,
            Err(err) => {
                self.windows.release_window(window);
                self.windows.release_surface(surface);
                return Err(err);
            }
        };

        self.surface = Some(surface);
        self.window = Some(window);
        self.target = target;
        self.selection = selection;
        Ok(())
    }

    fn prepare_backend(
        &mut self,
        selection: Selection,
        window: &W::Window,
    ) -> Result<Option<G::Target>, SurfaceError> {
        match selection {
            Selection::None => Ok(None),
            Selection::Software => {
                self.windows.set_buffers_geometry(window, self.canvas)?;
                Ok(None)
            }
            Selection::Hardware => {
                let display = match self.display.take() {
                    Some(display) => display,
                    None => self.gpu.open_display()?,
                };
                let target = self.gpu.create_target(&display, window);
                self.display = Some(display);
                target.map(Some)
            }
        }
    }

    fn reattach_window(&mut self) -> Result<(), SurfaceError> {
        let Some(surface) = &self.surface else {
            return Err(SurfaceError::WindowUnavailable);
        };
        let window = self.windows.acquire_window(surface)?;
        if self.selection == Selection::Software {
            if let Err(err) = self.windows.set_buffers_geometry(&window, self.canvas) {
                self.windows.release_window(window);
                return Err(err);
            }
        }
        self.window = Some(window);
        Ok(())
    }

    /// Draw one frame of `color` without touching the palette.
    fn render(&self, log: Logger<'_>, color: Argb) -> Result<(), SurfaceError> {
        if let (Some(display), Some(target)) = (&self.display, &self.target) {
            self.gpu.make_current(display, target)?;
            // Only one target exists, but rebinding per draw keeps the thread's
            // current context from leaking between calls.
            let _current = defer(|| self.gpu.release_current(display));

            self.gpu.clear(display, color.to_gl());
            self.gpu.present(display, target)?;
            report!(log, "Drawn {color:08x} using OpenGL");
        } else {
            let Some(window) = &self.window else {
                return Err(SurfaceError::WindowUnavailable);
            };
            let pixel = color.to_rgba8();
            self.windows
                .paint(window, self.canvas, &mut |mut buffer: PixelBuffer<'_>| {
                    buffer.fill(pixel);
                })?;
            report!(log, "Drawn {color:08x} using Native Window");
        }
        Ok(())
    }
}

impl<W, G> Drop for SurfaceManager<W, G>
where
    W: WindowProvider,
    G: GpuBackend<W::Window>,
{
    fn drop(&mut self) {
        self.teardown(Logger::new(&NullSink));
    }
}

impl<W, G> std::fmt::Debug for SurfaceManager<W, G>
where
    W: WindowProvider,
    G: GpuBackend<W::Window>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceManager")
            .field("selection", &self.selection)
            .field("canvas", &self.canvas)
            .field("palette", &self.palette)
            .field("has_surface", &self.surface.is_some())
            .field("has_window", &self.window.is_some())
            .field("has_display", &self.display.is_some())
            .field("has_target", &self.target.is_some())
            .finish()
    }
}
