//! Cooperative pacing for long searches.
//!
//! The solvers tick a [`Pacer`] once per explored branch. A host that runs the
//! engine inside a frame loop can install a hook that is called every `interval`
//! ticks (to pump events, yield a coroutine, and so on). The hook has no way to
//! influence the search, so results are identical with or without it.

use crate::constants::YIELD_INTERVAL;

/// Node counter with an optional periodic callback.
pub struct Pacer {
    interval: u64,
    nodes: u64,
    hook: Option<Box<dyn FnMut()>>,
}

impl Default for Pacer {
    fn default() -> Self {
        Self::new()
    }
}

impl Pacer {
    /// A pacer that only counts nodes.
    pub fn new() -> Self {
        Self {
            interval: YIELD_INTERVAL,
            nodes: 0,
            hook: None,
        }
    }

    /// A pacer that calls `hook` every `interval` nodes. An interval of 0 disables it.
    pub fn with_hook(interval: u64, hook: impl FnMut() + 'static) -> Self {
        Self {
            interval,
            nodes: 0,
            hook: Some(Box::new(hook)),
        }
    }

    #[inline]
    pub fn tick(&mut self) {
        self.nodes += 1;
        if self.interval > 0 && self.nodes % self.interval == 0 {
            if let Some(hook) = self.hook.as_mut() {
                hook();
            }
        }
    }

    /// Nodes ticked since creation or the last [`Pacer::reset`].
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    pub fn reset(&mut self) {
        self.nodes = 0;
    }
}
