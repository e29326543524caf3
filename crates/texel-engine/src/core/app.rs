use anyhow::Result;
use winit::event::WindowEvent;

use super::ctx::FrameCtx;
use crate::render::RenderCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by the demo programs.
///
/// Call order: `on_start` once after the window and GPU exist, then
/// `on_window_event` / `on_frame` until exit, then `on_exit` once while the
/// device is still alive.
pub trait App {
    /// Creates GPU resources. An error stops the runtime before the first frame.
    fn on_start(&mut self, ctx: &RenderCtx<'_>) -> Result<()> {
        let _ = ctx;
        Ok(())
    }

    /// Called for raw window events, after the input state has been updated.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called once per rendered frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Releases GPU resources before the device and window are dropped.
    fn on_exit(&mut self) {}
}
