//! The frame-paced redraw scheduler.
//!
//! One background worker decides when a frame is produced: external events
//! (viewport changes, layer content changes) call
//! [`RedrawScheduler::request_redraw`], which sets a pending flag and wakes
//! the worker. Each eligible cycle clears the flag, renders all visible
//! layers into the surface's off-screen bitmap, commits the frame, and then
//! sleeps whatever remains of the target frame interval.

use crate::{
    core::viewport::ViewportSnapshot,
    layers::registry::LayerRegistry,
    render::canvas::{Canvas, Color},
    render::surface::{FrameSurface, ViewportSource},
    worker::{ThreadPriority, WorkCycle, Worker, WorkerHandle, WorkerOptions, WorkerSignals},
    Result,
};
use instant::Instant;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Sleep remainders at or below this are not worth a syscall
const MIN_SLEEP: Duration = Duration::from_millis(1);

/// Configuration for the redraw scheduler
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Target interval between frame starts; 50 ms is ~20 fps
    pub frame_interval: Duration,
    /// Best-effort priority hint for the render thread
    pub thread_priority: ThreadPriority,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(50),
            thread_priority: ThreadPriority::Normal,
        }
    }
}

/// State shared between the scheduler handle and its worker thread
struct Shared {
    redraw_needed: AtomicBool,
    layers: Arc<LayerRegistry>,
}

/// Drives layer rendering on a dedicated background thread.
///
/// Redraw requests are coalesced: any number of calls between two frames
/// produce exactly one subsequent frame. No two frames render concurrently,
/// and layers draw in registration order. On shutdown every registered
/// layer is destroyed exactly once, in order, after which no further frame
/// starts.
pub struct RedrawScheduler {
    shared: Arc<Shared>,
    worker: WorkerHandle,
}

impl RedrawScheduler {
    /// Spawns the render worker. It starts idle; nothing is drawn until the
    /// first [`request_redraw`](Self::request_redraw).
    pub fn spawn(
        viewport: Arc<dyn ViewportSource>,
        surface: Arc<dyn FrameSurface>,
        canvas: Box<dyn Canvas>,
        config: SchedulerConfig,
    ) -> Result<Self> {
        let shared = Arc::new(Shared {
            redraw_needed: AtomicBool::new(false),
            layers: Arc::new(LayerRegistry::new()),
        });

        let cycle = FrameCycle {
            shared: shared.clone(),
            viewport,
            surface,
            canvas,
            frame_interval: config.frame_interval,
        };
        let worker = Worker::spawn(
            WorkerOptions {
                name: "lamina-redraw".to_string(),
                priority: config.thread_priority,
            },
            cycle,
        )?;

        Ok(Self { shared, worker })
    }

    /// Requests an asynchronous redraw of all layers.
    ///
    /// Idempotent and callable from any thread. Multiple calls before the
    /// next frame coalesce into a single frame; a call arriving while a
    /// frame is rendering is honored by the following frame.
    pub fn request_redraw(&self) {
        self.shared.redraw_needed.store(true, Ordering::SeqCst);
        self.worker.notify();
    }

    /// The registry external callers add and remove layers through
    pub fn layers(&self) -> &Arc<LayerRegistry> {
        &self.shared.layers
    }

    /// Requests cooperative shutdown without blocking. A frame already in
    /// progress finishes; no new frame starts afterwards.
    pub fn request_stop(&self) {
        self.worker.request_stop();
    }

    /// Shuts down and waits for the render thread to exit. Layer teardown
    /// has completed when this returns.
    pub fn join(&self) -> Result<()> {
        self.worker.join()
    }
}

/// The per-cycle work the scheduler composes into a [`Worker`]
struct FrameCycle {
    shared: Arc<Shared>,
    viewport: Arc<dyn ViewportSource>,
    surface: Arc<dyn FrameSurface>,
    canvas: Box<dyn Canvas>,
    frame_interval: Duration,
}

impl FrameCycle {
    fn render_frame(&mut self) {
        let Some(bitmap) = self.surface.drawing_bitmap() else {
            // Surface not realized yet; pacing still happens so the worker
            // does not spin while waiting for it.
            log::trace!("no drawing bitmap available, skipping render");
            return;
        };

        if let Err(err) = self.canvas.bind(bitmap) {
            log::warn!("could not bind drawing bitmap: {err}");
            return;
        }
        self.canvas.fill_color(Color::WHITE);

        let dimension = self.canvas.dimension();
        let snapshot = ViewportSnapshot::compute(self.viewport.current_position(), dimension);

        for (index, layer) in self.shared.layers.snapshot().iter().enumerate() {
            if !layer.is_visible() {
                continue;
            }
            if let Err(err) = layer.draw(
                &snapshot.bounds,
                snapshot.position.zoom,
                self.canvas.as_mut(),
                snapshot.top_left,
            ) {
                // One faulty layer must not starve the rest of the frame.
                log::warn!("layer {index} failed to draw: {err}");
            }
        }

        self.surface.frame_finished(&snapshot);
        self.surface.request_repaint();
    }
}

impl WorkCycle for FrameCycle {
    fn has_work(&self) -> bool {
        self.shared.redraw_needed.load(Ordering::SeqCst)
    }

    fn run_cycle(&mut self, signals: &WorkerSignals) -> Result<()> {
        let start = Instant::now();
        // Cleared before rendering so a request arriving mid-render is kept
        // for the next frame instead of being lost.
        self.shared.redraw_needed.store(false, Ordering::SeqCst);

        self.render_frame();

        let elapsed = start.elapsed();
        match self.frame_interval.checked_sub(elapsed) {
            Some(remaining) if remaining > MIN_SLEEP => {
                if !signals.is_cancelled() {
                    log::trace!("sleeping {}ms", remaining.as_millis());
                    signals.sleep(remaining);
                }
            }
            Some(_) => {}
            None => {
                // Best-effort pacing: an overrun frame is not an error.
                log::debug!(
                    "frame took {}ms, over the {}ms budget",
                    elapsed.as_millis(),
                    self.frame_interval.as_millis()
                );
            }
        }
        Ok(())
    }

    fn on_shutdown(&mut self) {
        for layer in self.shared.layers.take_all() {
            layer.on_destroy();
        }
    }
}
