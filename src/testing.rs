//! Recording fakes of the platform capabilities for unit tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::config::CanvasSize;
use crate::error::SurfaceError;
use crate::platform::{GpuBackend, PixelBuffer, WindowProvider};

/// One observed platform call. Ids are handed out in creation order.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Call {
    CreateSurface { texture: u32, surface: u32 },
    ReleaseSurface(u32),
    AcquireWindow { surface: u32, window: u32 },
    ReleaseWindow(u32),
    SetGeometry(CanvasSize),
    Paint(Vec<u8>),
    OpenDisplay(u32),
    CreateTarget { window: u32, target: u32 },
    MakeCurrent(u32),
    ReleaseCurrent,
    Clear([f32; 4]),
    Present(u32),
    DestroyTarget(u32),
}

/// Which calls should fail next.
#[derive(Default, Debug)]
pub(crate) struct Failures {
    pub(crate) create_surface: bool,
    pub(crate) acquire_window: bool,
    pub(crate) set_geometry: bool,
    pub(crate) open_display: bool,
    pub(crate) create_target: bool,
    pub(crate) make_current: bool,
    pub(crate) present: bool,
}

/// Shared call log for a [`FakeWindows`] / [`FakeGpu`] pair.
#[derive(Default, Debug)]
pub(crate) struct Recorder {
    calls: RefCell<Vec<Call>>,
    next_id: Cell<u32>,
    pub(crate) fail: RefCell<Failures>,
}

/// Resources currently alive according to the call log.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Live {
    pub(crate) surfaces: usize,
    pub(crate) windows: usize,
    pub(crate) targets: usize,
}

impl Recorder {
    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn id(&self) -> u32 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub(crate) fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    pub(crate) fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|call| matches(call)).count()
    }

    pub(crate) fn position(&self, matches: impl Fn(&Call) -> bool) -> Option<usize> {
        self.calls.borrow().iter().position(matches)
    }

    pub(crate) fn live(&self) -> Live {
        let mut live = Live::default();
        for call in self.calls.borrow().iter() {
            match call {
                Call::CreateSurface { .. } => live.surfaces += 1,
                Call::ReleaseSurface(_) => live.surfaces -= 1,
                Call::AcquireWindow { .. } => live.windows += 1,
                Call::ReleaseWindow(_) => live.windows -= 1,
                Call::CreateTarget { .. } => live.targets += 1,
                Call::DestroyTarget(_) => live.targets -= 1,
                _ => {}
            }
        }
        live
    }
}

#[derive(Debug)]
pub(crate) struct FakeSurface(pub(crate) u32);

#[derive(Debug)]
pub(crate) struct FakeWindow(pub(crate) u32);

#[derive(Debug)]
pub(crate) struct FakeDisplay(pub(crate) u32);

#[derive(Debug)]
pub(crate) struct FakeTarget(pub(crate) u32);

#[derive(Debug)]
pub(crate) struct FakeWindows(pub(crate) Rc<Recorder>);

#[derive(Debug)]
pub(crate) struct FakeGpu(pub(crate) Rc<Recorder>);

impl WindowProvider for FakeWindows {
    type Texture = u32;
    type Surface = FakeSurface;
    type Window = FakeWindow;

    fn create_surface(&self, texture: &u32) -> Result<FakeSurface, SurfaceError> {
        if self.0.fail.borrow().create_surface {
            return Err(SurfaceError::SurfaceConstruction("refused".into()));
        }
        let surface = self.0.id();
        self.0.record(Call::CreateSurface {
            texture: *texture,
            surface,
        });
        Ok(FakeSurface(surface))
    }

    fn release_surface(&self, surface: FakeSurface) {
        self.0.record(Call::ReleaseSurface(surface.0));
    }

    fn acquire_window(&self, surface: &FakeSurface) -> Result<FakeWindow, SurfaceError> {
        if self.0.fail.borrow().acquire_window {
            return Err(SurfaceError::WindowUnavailable);
        }
        let window = self.0.id();
        self.0.record(Call::AcquireWindow {
            surface: surface.0,
            window,
        });
        Ok(FakeWindow(window))
    }

    fn release_window(&self, window: FakeWindow) {
        self.0.record(Call::ReleaseWindow(window.0));
    }

    fn set_buffers_geometry(&self, _: &FakeWindow, size: CanvasSize) -> Result<(), SurfaceError> {
        if self.0.fail.borrow().set_geometry {
            return Err(SurfaceError::BufferGeometry(-22));
        }
        self.0.record(Call::SetGeometry(size));
        Ok(())
    }

    fn paint(
        &self,
        _: &FakeWindow,
        bounds: CanvasSize,
        paint: &mut dyn FnMut(PixelBuffer<'_>),
    ) -> Result<(), SurfaceError> {
        let width = bounds.width as usize;
        let height = bounds.height as usize;
        let mut bytes = vec![0_u8; width * height * 4];
        let buffer = PixelBuffer::new(&mut bytes, width, height, width)
            .ok_or_else(|| SurfaceError::Lock("bad bounds".into()))?;
        paint(buffer);
        self.0.record(Call::Paint(bytes));
        Ok(())
    }
}

impl GpuBackend<FakeWindow> for FakeGpu {
    type Display = FakeDisplay;
    type Target = FakeTarget;

    fn open_display(&self) -> Result<FakeDisplay, SurfaceError> {
        if self.0.fail.borrow().open_display {
            return Err(SurfaceError::DisplayInit("no display".into()));
        }
        let display = self.0.id();
        self.0.record(Call::OpenDisplay(display));
        Ok(FakeDisplay(display))
    }

    fn create_target(&self, _: &FakeDisplay, window: &FakeWindow) -> Result<FakeTarget, SurfaceError> {
        if self.0.fail.borrow().create_target {
            return Err(SurfaceError::ContextCreation("no context".into()));
        }
        let target = self.0.id();
        self.0.record(Call::CreateTarget {
            window: window.0,
            target,
        });
        Ok(FakeTarget(target))
    }

    fn make_current(&self, _: &FakeDisplay, target: &FakeTarget) -> Result<(), SurfaceError> {
        if self.0.fail.borrow().make_current {
            return Err(SurfaceError::MakeCurrent("busy".into()));
        }
        self.0.record(Call::MakeCurrent(target.0));
        Ok(())
    }

    fn release_current(&self, _: &FakeDisplay) {
        self.0.record(Call::ReleaseCurrent);
    }

    fn clear(&self, _: &FakeDisplay, rgba: [f32; 4]) {
        self.0.record(Call::Clear(rgba));
    }

    fn present(&self, _: &FakeDisplay, target: &FakeTarget) -> Result<(), SurfaceError> {
        if self.0.fail.borrow().present {
            return Err(SurfaceError::Present("lost".into()));
        }
        self.0.record(Call::Present(target.0));
        Ok(())
    }

    fn destroy_target(&self, _: &FakeDisplay, target: FakeTarget) {
        self.0.record(Call::DestroyTarget(target.0));
    }
}
