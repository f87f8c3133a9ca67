//! The fullscreen display loop.
//!
//! Everything runs on the event loop thread. A refresh (fetch, decode, scale) happens once at
//! start-up and then whenever the refresh deadline passes, blocking the loop while it runs.
//! Any key or mouse button press hides the window and ends the loop.

mod renderable;
mod renderer;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use glium::glutin::event::{ElementState, Event, KeyboardInput, StartCause, WindowEvent};
use glium::glutin::event_loop::ControlFlow;

use crate::downloader::ImageSource;
use crate::error::Result;
use crate::radar;

use self::renderable::Renderable;
pub use self::renderer::Renderer;

pub struct Settings {
    pub fallback: PathBuf,
    pub target: (u32, u32),
    pub interval: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    Closing,
}

// What an event loop event means to the kiosk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Input,
    Timer,
    Redraw,
    Resized,
}

// What the kiosk does in response to a trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Close,
    Refresh,
    Redraw,
    RequestRedraw,
    Nothing,
}

impl Phase {
    pub fn on(self, trigger: Trigger) -> Phase {
        match (self, trigger) {
            (Phase::Running, Trigger::Input) => Phase::Closing,
            (phase, _) => phase,
        }
    }
}

pub fn classify(event: &Event<'_, ()>) -> Option<Trigger> {
    match event {
        Event::NewEvents(StartCause::ResumeTimeReached { .. }) => Some(Trigger::Timer),
        Event::RedrawRequested(_) => Some(Trigger::Redraw),
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => Some(Trigger::Input),
            WindowEvent::Resized(_) => Some(Trigger::Resized),
            WindowEvent::KeyboardInput {
                input: KeyboardInput {
                    state: ElementState::Pressed,
                    ..
                },
                ..
            } => Some(Trigger::Input),
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                ..
            } => Some(Trigger::Input),
            _ => None,
        },
        _ => None,
    }
}

/// Decide what to do about a trigger. Once closing, nothing but the exit happens.
pub fn decide(
    trigger: Option<Trigger>,
    phase: Phase,
    schedule: &Schedule,
    now: Instant,
) -> Action {
    if phase == Phase::Closing {
        return Action::Nothing;
    }

    match trigger {
        Some(Trigger::Input) => Action::Close,
        Some(Trigger::Timer) if schedule.is_due(now) => Action::Refresh,
        Some(Trigger::Redraw) => Action::Redraw,
        Some(Trigger::Resized) => Action::RequestRedraw,
        Some(Trigger::Timer) | None => Action::Nothing,
    }
}

/// How the event loop continues after an action ran.
pub fn control_flow_after(outcome: Result<()>, phase: Phase, schedule: &Schedule) -> ControlFlow {
    match (outcome, phase) {
        (Err(e), _) => {
            log::error!("{}", e);
            ControlFlow::ExitWithCode(1)
        }
        (Ok(()), Phase::Closing) => ControlFlow::Exit,
        (Ok(()), Phase::Running) => ControlFlow::WaitUntil(schedule.next_refresh()),
    }
}

/// Single pending refresh deadline.
///
/// The deadline is always measured from the moment the previous refresh *finished*, so a slow
/// download pushes every later refresh back rather than causing them to bunch up.
#[derive(Debug)]
pub struct Schedule {
    interval: Duration,
    next: Instant,
}

impl Schedule {
    pub fn after(completed: Instant, interval: Duration) -> Self {
        Schedule {
            interval,
            next: completed + interval,
        }
    }

    pub fn next_refresh(&self) -> Instant {
        self.next
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next
    }

    pub fn rearm(&mut self, completed: Instant) {
        self.next = completed + self.interval;
    }
}

// Application state handed every event loop callback
pub struct Kiosk<S: ImageSource> {
    renderer: Renderer,
    source: S,
    settings: Settings,
    current: Renderable,
    schedule: Schedule,
    phase: Phase,
}

impl<S: ImageSource> Kiosk<S> {
    /// Load the first image synchronously and arm the refresh timer.
    pub fn start(renderer: Renderer, mut source: S, settings: Settings) -> Result<Self> {
        let image = radar::refresh(&mut source, &settings.fallback, settings.target)?;
        let current = Renderable::from_image(image);
        let schedule = Schedule::after(Instant::now(), settings.interval);

        renderer.request_redraw();

        Ok(Kiosk {
            renderer,
            source,
            settings,
            current,
            schedule,
            phase: Phase::Running,
        })
    }

    pub fn handle(&mut self, event: Event<'_, ()>, control_flow: &mut ControlFlow) {
        let action = decide(classify(&event), self.phase, &self.schedule, Instant::now());

        let outcome = match action {
            Action::Close => {
                self.close();
                Ok(())
            }
            Action::Refresh => self.refresh(),
            Action::Redraw => self.redraw(),
            Action::RequestRedraw => {
                self.renderer.request_redraw();
                Ok(())
            }
            Action::Nothing => Ok(()),
        };

        *control_flow = control_flow_after(outcome, self.phase, &self.schedule);
    }

    fn close(&mut self) {
        log::info!("Input received, closing");
        self.renderer.hide();
        self.phase = self.phase.on(Trigger::Input);
    }

    fn refresh(&mut self) -> Result<()> {
        let settings = &self.settings;
        let image = radar::refresh(&mut self.source, &settings.fallback, settings.target)?;

        // The previous texture is dropped here
        self.current = Renderable::from_image(image);
        self.schedule.rearm(Instant::now());
        self.renderer.request_redraw();

        Ok(())
    }

    fn redraw(&mut self) -> Result<()> {
        // Always finish the frame, glium panics on dropping an unfinished one
        let mut frame = self.renderer.new_frame();
        let drawn = self.renderer.draw(&mut frame, &mut self.current);
        let finished = self.renderer.finish_frame(frame);

        drawn.and(finished)
    }
}
