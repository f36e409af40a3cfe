//! The frame-side half of the scene machinery.

use crate::scene::{SceneContext, SceneResource};
use crate::surface::RenderSurface;
use futures::executor::{LocalPool, LocalSpawner};
use std::rc::Rc;

/// Runs pending transitions and hands the active scene to the renderer.
///
/// Owns the single-threaded executor transitions run on. Every frame first
/// lets spawned tasks make whatever progress they can, then renders the
/// scene that is active at that moment. It never branches on the current
/// state and never keeps the scene past the render call.
pub struct RenderDriver<R> {
    pool: LocalPool,
    context: Rc<SceneContext<R>>,
    frames: u64,
}

impl<R: SceneResource> RenderDriver<R> {
    /// Create a driver rendering the active scene of `context`.
    ///
    /// Hand [`RenderDriver::spawner`] to the transition controller so its
    /// transitions run on this driver's executor.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::rc::Rc;
    /// use stagehand::{GpuScene, RenderDriver, SceneContext};
    ///
    /// let mut driver = RenderDriver::<GpuScene>::new(Rc::new(SceneContext::new()));
    /// // once per frame
    /// let clear = driver.frame(|scene| scene.clear_color());
    /// ```
    pub fn new(context: Rc<SceneContext<R>>) -> Self {
        Self {
            pool: LocalPool::new(),
            context,
            frames: 0,
        }
    }

    /// Spawner for transition tasks.
    pub fn spawner(&self) -> LocalSpawner {
        self.pool.spawner()
    }

    /// The context whose active scene is rendered each frame.
    pub fn context(&self) -> &Rc<SceneContext<R>> {
        &self.context
    }

    /// Number of frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Poll spawned tasks until none can make progress.
    pub fn pump(&mut self) {
        self.pool.run_until_stalled();
    }

    /// Advance transitions, then render the active scene.
    ///
    /// Returns `None` when there is nothing to draw yet.
    pub fn frame<T>(&mut self, render: impl FnOnce(&R) -> T) -> Option<T> {
        self.pump();
        self.frames += 1;
        self.context.with_active(render)
    }

    /// Re-fit `surface` to a new host size.
    ///
    /// Zero-sized hosts (minimized windows) are ignored. Returns true if the
    /// surface was resized.
    pub fn resize<S>(&self, surface: &mut S, width: u32, height: u32) -> bool
    where
        S: RenderSurface + ?Sized,
    {
        if width == 0 || height == 0 {
            log::debug!("ignoring resize to {width}x{height}");
            return false;
        }
        if surface.size() == (width, height) {
            return false;
        }
        surface.resize_to_host(width, height);
        true
    }
}
