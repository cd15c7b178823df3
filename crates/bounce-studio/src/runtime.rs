use std::sync::Arc;

use anyhow::{Context, Result};
use bounce_control::{Action, ControlError, RenderSurface};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use crate::binding::GpuBinding;
use crate::config::StudioConfig;
use crate::controls::{control_for, Control};
use crate::redraw;
use crate::scheduler::RedrawScheduler;

type Surface = RenderSurface<GpuBinding, RedrawScheduler>;

/// Opens the studio window and runs until it is closed.
///
/// `actions` are dispatched before the engine boots and end up in its first
/// configuration.
pub fn run(config: StudioConfig, actions: Vec<Action>) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
    let mut studio = Studio::new(config, actions);

    event_loop
        .run_app(&mut studio)
        .context("winit event loop terminated with error")?;

    Ok(())
}

struct Studio {
    config: StudioConfig,
    pre_boot: Vec<Action>,

    window: Option<Arc<Window>>,
    surface: Option<Surface>,
    shift: bool,
}

impl Studio {
    fn new(config: StudioConfig, pre_boot: Vec<Action>) -> Self {
        Self {
            config,
            pre_boot,
            window: None,
            surface: None,
            shift: false,
        }
    }

    fn open(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let initial = &self.config.initial;
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(initial.width, initial.height));

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let binding = GpuBinding::new(window.clone(), self.config.gpu.clone(), self.config.seed);
        let scheduler = RedrawScheduler::new({
            let window = window.clone();
            move || window.request_redraw()
        });
        let mut surface = Surface::new(initial.clone(), binding, scheduler);

        for action in self.pre_boot.drain(..) {
            // Rejections are logged by the surface.
            let _ = surface.dispatch(&action);
        }

        match pollster::block_on(surface.bootstrap()) {
            Ok(()) => log::info!("ready; space starts and stops the animation"),
            Err(e) => log::error!("{e}"),
        }

        self.window = Some(window);
        self.surface = Some(surface);
        Ok(())
    }

    fn on_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        let PhysicalKey::Code(code) = event.physical_key else { return };
        let Some(surface) = self.surface.as_mut() else { return };
        let Some(control) = control_for(code, self.shift, surface.config()) else { return };

        let result = match control {
            Control::Exit => {
                event_loop.exit();
                return;
            }
            Control::Toggle => surface.toggle().map(|state| log::debug!("loop {state:?}")),
            Control::Dispatch(action) => surface.dispatch(&action).map(drop),
        };

        match result {
            // Already logged at warn.
            Err(ControlError::Rejected(_)) | Ok(()) => {}
            Err(e) => log::error!("{e}"),
        }
    }

    fn on_redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(surface) = self.surface.as_mut() else { return };
        redraw::deliver(surface);

        if surface.coordinator().binding().is_lost() {
            event_loop.exit();
        }
    }
}

impl ApplicationHandler for Studio {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.open(event_loop) {
            log::error!("failed to open studio window: {e:#}");
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if self.window.as_ref().map(|w| w.id()) != Some(window_id) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(surface) = self.surface.as_mut() {
                    surface.binding_mut().resize(size);
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::ModifiersChanged(m) => self.shift = m.state().shift_key(),
            WindowEvent::KeyboardInput { event, .. } => self.on_key(event_loop, &event),
            WindowEvent::RedrawRequested => self.on_redraw(event_loop),
            _ => {}
        }
    }
}
