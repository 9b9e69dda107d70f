use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    error::{EventLoopError, OsError},
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use crate::input::{map_key, InputState, Key};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("event loop failed: {0}")]
    EventLoop(#[from] EventLoopError),
    #[error("failed to create window: {0}")]
    Window(#[from] OsError),
}

/// What the host loop drives. One call per rendered frame.
pub trait Game {
    /// Advance by `delta_time` seconds. Input edges are cleared after this
    /// returns.
    fn frame(&mut self, delta_time: f32, input: &InputState);

    /// Short status text, shown in the window title.
    fn status_line(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct WindowSettings {
    pub title: String,
    pub width: f64,
    pub height: f64,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Stoop Runner".to_string(),
            width: 960.0,
            height: 540.0,
        }
    }
}

enum State {
    Init,
    Ready {
        window: Arc<Window>,
        last_frame: Option<Instant>,
    },
}

pub struct EngineContext {
    event_loop: Option<EventLoop<()>>,
    app: App,
}

pub struct App {
    state: State,
    settings: WindowSettings,
    game: Box<dyn Game>,
    input: InputState,
    title: String,
    error: Option<EngineError>,
}

impl App {
    pub fn new(settings: WindowSettings, game: Box<dyn Game>) -> Self {
        Self {
            state: State::Init,
            settings,
            game,
            input: InputState::new(),
            title: String::new(),
            error: None,
        }
    }

    fn draw(&mut self) {
        if let State::Ready { window, last_frame } = &mut self.state {
            let now = Instant::now();
            let delta_time = last_frame
                .map(|t| now.duration_since(t).as_secs_f32())
                .unwrap_or(0.0);
            *last_frame = Some(now);

            self.game.frame(delta_time, &self.input);
            self.input.end_frame();

            let status = self.game.status_line();
            if status != self.title {
                window.set_title(&status);
                self.title = status;
            }
        }
    }

    fn key(&mut self, key: Key, state: ElementState) {
        match state {
            ElementState::Pressed => self.input.key_down(key),
            ElementState::Released => self.input.key_up(key),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let State::Init = self.state {
            let win_attr = Window::default_attributes()
                .with_title(self.settings.title.clone())
                .with_inner_size(LogicalSize::new(self.settings.width, self.settings.height));

            match event_loop.create_window(win_attr) {
                Ok(window) => {
                    log::info!(
                        "Window created: {}x{}",
                        self.settings.width,
                        self.settings.height
                    );
                    let window = Arc::new(window);
                    window.request_redraw();
                    self.state = State::Ready {
                        window,
                        last_frame: None,
                    };
                }
                Err(err) => {
                    log::error!("Failed to create window: {err}");
                    self.error = Some(err.into());
                    event_loop.exit();
                }
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let State::Ready { window, .. } = &self.state {
            window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    match map_key(code) {
                        Some(Key::Escape) => {
                            log::info!("Escape pressed, exiting.");
                            event_loop.exit();
                        }
                        Some(key) => self.key(key, event.state),
                        None => {}
                    }
                }
            }
            WindowEvent::Focused(false) => self.input.release_all(),
            WindowEvent::RedrawRequested => self.draw(),
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }
            _ => {}
        }
    }
}

/// Allows the setting of the log level through RUST_LOG env var.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

impl EngineContext {
    pub fn new(settings: WindowSettings, game: Box<dyn Game>) -> Result<Self, EngineError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);
        Ok(Self {
            event_loop: Some(event_loop),
            app: App::new(settings, game),
        })
    }

    /// Runs the game on the current thread until the window closes.
    pub fn run(mut self) -> Result<(), EngineError> {
        if let Some(event_loop) = self.event_loop.take() {
            event_loop.run_app(&mut self.app)?;
        }
        match self.app.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
