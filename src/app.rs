//! Application shell: the winit event loop, the frame scheduler, and the
//! debounced resize handling.
//!
//! Simulation stepping and rendering are decoupled: physics advances on a
//! fixed-timestep accumulator every event-loop wakeup, while redraws are
//! throttled to the target frame rate no matter how fast the display's
//! redraw callbacks fire.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use log::{debug, info};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes},
};

use crate::gfx::{paint, RenderEngine};
use crate::playground::Playground;
use crate::ui::{playground_panel, PanelState, UiManager};

/// Target redraw rate.
const TARGET_FPS: f64 = 60.0;

/// Quiet period before a resize takes effect. Intermediate resize events
/// supersede the pending one instead of each reallocating the surface and
/// repositioning the walls.
const RESIZE_DEBOUNCE: Duration = Duration::from_millis(100);

/// Caps redraws to a fixed interval regardless of how often the host's
/// redraw callback fires, absorbing overshoot so the accepted cadence
/// stays at the target rate instead of drifting.
pub struct FrameLimiter {
    interval_ms: f64,
    last_ms: f64,
}

impl FrameLimiter {
    pub fn new(target_fps: f64) -> Self {
        Self {
            interval_ms: 1000.0 / target_fps,
            last_ms: 0.0,
        }
    }

    /// Returns whether a render should happen at `now_ms`. On acceptance
    /// the reference timestamp advances by a whole number of intervals
    /// (the remainder carries over), so overshoot never accumulates.
    pub fn accept(&mut self, now_ms: f64) -> bool {
        let elapsed = now_ms - self.last_ms;
        if elapsed > self.interval_ms {
            self.last_ms = now_ms - (elapsed % self.interval_ms);
            true
        } else {
            false
        }
    }
}

struct PendingResize {
    deadline: Instant,
    physical: PhysicalSize<u32>,
    pixel_ratio: f64,
}

pub struct PlaygroundApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    playground: Option<Playground>,
    panel: PanelState,
    limiter: FrameLimiter,
    pending_resize: Option<PendingResize>,
    last_tick: Option<Instant>,
    start: Instant,
}

impl PlaygroundApp {
    /// Creates a new playground application with default settings.
    pub fn new() -> anyhow::Result<Self> {
        let event_loop = EventLoop::new().context("creating event loop")?;

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                window: None,
                render_engine: None,
                ui_manager: None,
                playground: None,
                panel: PanelState::default(),
                limiter: FrameLimiter::new(TARGET_FPS),
                pending_resize: None,
                last_tick: None,
                start: Instant::now(),
            },
        })
    }

    /// Runs the application (consumes self and starts the event loop).
    pub fn run(mut self) -> anyhow::Result<()> {
        let _ = env_logger::try_init();

        let event_loop = self.event_loop.take().expect("Event loop already consumed");
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop
            .run_app(&mut self.app_state)
            .context("running event loop")
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Ok(window) = event_loop.create_window(
            WindowAttributes::default()
                .with_title("tumble")
                .with_inner_size(winit::dpi::LogicalSize::new(1200, 800)),
        ) {
            let window_handle = Arc::new(window);
            self.window = Some(window_handle.clone());

            let (width, height): (u32, u32) = window_handle.inner_size().into();
            let pixel_ratio = window_handle.scale_factor() as f32;

            let window_clone = window_handle.clone();
            let renderer = pollster::block_on(async move {
                RenderEngine::new(window_clone, width, height, pixel_ratio).await
            });

            let ui_manager = UiManager::new(
                renderer.device(),
                renderer.queue(),
                renderer.surface_format(),
                &window_handle,
            );

            let (logical_w, logical_h) = renderer.logical_size();
            let mut playground = Playground::new(logical_w, logical_h);
            playground.drag.set_pixel_ratio(pixel_ratio);

            info!("window ready: {}x{} @ {}x", width, height, pixel_ratio);

            self.ui_manager = Some(ui_manager);
            self.render_engine = Some(renderer);
            self.playground = Some(playground);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.as_ref() else {
            return;
        };
        let window = window.clone();

        // Offer the event to the UI first; captured events stop here.
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            let ui_event: winit::event::Event<()> = winit::event::Event::WindowEvent {
                window_id,
                event: event.clone(),
            };
            if ui_manager.handle_input(&window, &ui_event) {
                window.request_redraw();
                return;
            }
        }

        let Some(playground) = self.playground.as_mut() else {
            return;
        };

        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key_code),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => match key_code {
                KeyCode::Escape => event_loop.exit(),
                // Reset works from any tool mode.
                KeyCode::KeyR => playground.reset(),
                _ => {}
            },
            WindowEvent::CursorMoved { position, .. } => {
                playground.pointer_moved(position.x, position.y);
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => playground.pointer_pressed(),
                ElementState::Released => playground.pointer_released(),
            },
            WindowEvent::CursorLeft { .. } => {
                playground.pointer_released();
            }
            WindowEvent::Resized(physical) => {
                self.pending_resize = Some(PendingResize {
                    deadline: Instant::now() + RESIZE_DEBOUNCE,
                    physical,
                    pixel_ratio: window.scale_factor(),
                });
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.pending_resize = Some(PendingResize {
                    deadline: Instant::now() + RESIZE_DEBOUNCE,
                    physical: window.inner_size(),
                    pixel_ratio: scale_factor,
                });
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        self.apply_pending_resize();

        // Physics runs continuously, decoupled from the redraw throttle.
        if let Some(playground) = self.playground.as_mut() {
            let now = Instant::now();
            if let Some(last) = self.last_tick {
                playground.step_simulation((now - last).as_secs_f32());
            }
            self.last_tick = Some(now);
        }

        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}

impl AppState {
    /// Applies a debounced resize once its quiet period has passed:
    /// resizes the surface, repositions the walls, and propagates the
    /// pixel ratio to the drag constraint so hit-testing stays aligned.
    fn apply_pending_resize(&mut self) {
        let due = self
            .pending_resize
            .as_ref()
            .is_some_and(|pending| Instant::now() >= pending.deadline);
        if !due {
            return;
        }
        let Some(pending) = self.pending_resize.take() else {
            return;
        };
        let (Some(render_engine), Some(playground)) =
            (self.render_engine.as_mut(), self.playground.as_mut())
        else {
            return;
        };

        let ratio = pending.pixel_ratio as f32;
        render_engine.set_size(pending.physical.width, pending.physical.height, ratio);
        playground.drag.set_pixel_ratio(ratio);
        let (logical_w, logical_h) = render_engine.logical_size();
        playground.resize(logical_w, logical_h);
        debug!(
            "resize applied: {}x{} @ {}x",
            pending.physical.width, pending.physical.height, ratio
        );
    }

    fn redraw(&mut self) {
        let now_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        if !self.limiter.accept(now_ms) {
            return;
        }

        let (Some(render_engine), Some(ui_manager), Some(playground), Some(window)) = (
            self.render_engine.as_mut(),
            self.ui_manager.as_mut(),
            self.playground.as_mut(),
            self.window.as_ref(),
        ) else {
            return;
        };
        let window = window.clone();
        let panel = &mut self.panel;

        let frame = paint::build_frame(
            &playground.world,
            &playground.registry,
            &playground.drag,
            &playground.options,
            playground.viewport(),
        );
        let options = playground.options;

        let result = render_engine.render_frame(
            &frame,
            &options,
            Some(
                |device: &wgpu::Device,
                 queue: &wgpu::Queue,
                 encoder: &mut wgpu::CommandEncoder,
                 view: &wgpu::TextureView| {
                    ui_manager.draw(device, queue, encoder, &window, view, |ui| {
                        playground_panel(ui, playground, panel);
                    });
                },
            ),
        );

        if let Err(err) = result {
            // Transient during resizes; the debounced reconfigure catches up.
            debug!("frame skipped: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drives the limiter with callbacks every `callback_ms` for
    /// `duration_ms` and counts accepted renders.
    fn accepted(callback_ms: f64, duration_ms: f64) -> u32 {
        let mut limiter = FrameLimiter::new(TARGET_FPS);
        let mut count = 0;
        let mut t = 0.0;
        while t <= duration_ms {
            if limiter.accept(t) {
                count += 1;
            }
            t += callback_ms;
        }
        count
    }

    #[test]
    fn test_accepts_target_rate_from_fast_callbacks() {
        // 1000 Hz callbacks for one second settle at ~60 accepted renders.
        let count = accepted(1.0, 1000.0);
        assert!((58..=61).contains(&count), "count = {}", count);
    }

    #[test]
    fn test_accepts_target_rate_from_vsync_callbacks() {
        // 144 Hz display.
        let count = accepted(1000.0 / 144.0, 1000.0);
        assert!((55..=61).contains(&count), "count = {}", count);
    }

    #[test]
    fn test_slow_callbacks_all_accepted() {
        // 20 Hz callbacks are always over the interval; every one renders.
        let count = accepted(50.0, 1000.0);
        assert_eq!(count, 20);
    }

    #[test]
    fn test_back_to_back_callbacks_skip() {
        let mut limiter = FrameLimiter::new(TARGET_FPS);
        assert!(limiter.accept(17.0));
        assert!(!limiter.accept(17.5));
        assert!(!limiter.accept(30.0));
        assert!(limiter.accept(34.0));
    }
}
