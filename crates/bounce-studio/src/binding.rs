use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use anyhow::{Context, Result};
use bounce_control::{ConfigState, EngineBinding, EngineHandle};
use bounce_sim::{SimBinding, SimHandle};
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::window::Window;

use crate::gpu::{Gpu, GpuInit, SurfaceErrorAction};
use crate::redraw::Present;
use crate::render::DiskRenderer;

/// Engine that simulates disks and draws them into the window.
///
/// `load` brings up the GPU. Every `create` builds a fresh simulation and
/// resizes the window to the configured canvas; the GPU objects are shared by
/// all handles.
pub struct GpuBinding {
    window: Arc<Window>,
    init: GpuInit,
    sim: SimBinding,
    gpu: Option<Rc<RefCell<Gpu>>>,
    renderer: Rc<RefCell<DiskRenderer>>,
    lost: Rc<Cell<bool>>,
}

impl GpuBinding {
    pub fn new(window: Arc<Window>, init: GpuInit, seed: Option<u64>) -> Self {
        Self {
            window,
            init,
            sim: seed.map_or_else(SimBinding::new, SimBinding::seeded),
            gpu: None,
            renderer: Rc::new(RefCell::new(DiskRenderer::new())),
            lost: Rc::new(Cell::new(false)),
        }
    }

    pub fn resize(&self, size: PhysicalSize<u32>) {
        if let Some(gpu) = &self.gpu {
            gpu.borrow_mut().resize(size);
        }
    }

    /// The surface hit a fatal error; nothing will render again.
    pub fn is_lost(&self) -> bool {
        self.lost.get()
    }
}

impl EngineBinding for GpuBinding {
    type Handle = GpuHandle;

    async fn load(&mut self) -> Result<()> {
        let gpu = Gpu::new(self.window.clone(), self.init.clone())
            .await
            .context("GPU initialization failed")?;
        self.gpu = Some(Rc::new(RefCell::new(gpu)));
        self.sim.load().await
    }

    fn create(&mut self, config: &ConfigState) -> Result<GpuHandle> {
        let gpu = self.gpu.clone().context("GPU used before load")?;
        let sim = self.sim.create(config)?;

        let canvas = LogicalSize::new(config.width, config.height);
        let window = &self.window;
        let resized = fit_canvas(window.inner_size(), window.scale_factor(), canvas, |c| {
            window.request_inner_size(c)
        });
        if let Some(size) = resized {
            self.resize(size);
        }

        Ok(GpuHandle {
            sim,
            gpu,
            renderer: self.renderer.clone(),
            lost: self.lost.clone(),
        })
    }
}

/// Asks for the window to match `canvas` and returns the size to configure now.
///
/// `request` is `Window::request_inner_size`: `Some` when the platform resized
/// synchronously, `None` when a `Resized` event will follow.
fn fit_canvas(
    current: PhysicalSize<u32>,
    scale: f64,
    canvas: LogicalSize<u32>,
    request: impl FnOnce(LogicalSize<u32>) -> Option<PhysicalSize<u32>>,
) -> Option<PhysicalSize<u32>> {
    if current == canvas.to_physical(scale) {
        return None;
    }
    request(canvas)
}

/// A live simulation drawn every tick.
pub struct GpuHandle {
    sim: SimHandle,
    gpu: Rc<RefCell<Gpu>>,
    renderer: Rc<RefCell<DiskRenderer>>,
    lost: Rc<Cell<bool>>,
}

impl EngineHandle for GpuHandle {
    fn tick(&mut self) {
        if self.sim.is_superseded() || self.lost.get() {
            return;
        }
        self.sim.tick();
        self.present();
    }
}

impl Present for GpuHandle {
    /// Draws the current field without advancing it.
    fn present(&self) {
        if self.sim.is_superseded() || self.lost.get() {
            return;
        }

        let frame = self.gpu.borrow().begin_frame();
        match frame {
            Ok(mut frame) => {
                let gpu = self.gpu.borrow();
                self.renderer
                    .borrow_mut()
                    .render(&gpu, &mut frame, self.sim.field());
                gpu.submit(frame);
            }
            Err(err) => match self.gpu.borrow_mut().recover(&err) {
                SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                    log::debug!("skipped frame: {err}");
                }
                SurfaceErrorAction::Fatal => {
                    log::error!("surface lost: {err}");
                    self.lost.set(true);
                }
            },
        }
    }
}
