mod render_worker;

use std::sync::{
    atomic::{AtomicBool, Ordering},
    mpsc::{channel, Receiver, RecvError, Sender, TryRecvError},
    Arc, Mutex,
};
use std::thread::JoinHandle;

use serde::{Deserialize, Serialize};

use crate::{
    camera::Camera,
    film::{film_tiles, Film, FilmSettings},
    integrators::IntegratorType,
    math::{Bounds2, Spectrum, Vec2},
    sampling::{create_sampler, SamplerSettings},
    scene::{Result, Scene, SceneLoadSettings},
};

use render_worker::{launch_worker, WorkerMessage, WorkerPayload};

/// Lifecycle of a [`Renderer`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RenderStatus {
    Idle,
    Rendering,
    Done,
    Interrupted,
}

/// Value snapshot of one finished tile, passed to the progress callback on
/// the render thread.
#[derive(Clone)]
pub struct RenderUpdate {
    pub tile_bounds: Bounds2<u16>,
    /// The finished tile's pixels in row-major order.
    pub pixels: Vec<Spectrum>,
    pub tiles_done: usize,
    pub tiles_total: usize,
    pub secs: f32,
}

pub type ProgressUpdater = Arc<dyn Fn(RenderUpdate) + Send + Sync>;

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct RenderSettings {
    pub film: FilmSettings,
    pub sampler: SamplerSettings,
    pub integrator: IntegratorType,
}

/// Tile-based scene renderer driven by a long-lived worker thread.
///
/// `Idle -> Rendering -> {Done | Interrupted} -> Idle`; [`Renderer::reset`]
/// closes the loop. Configuration is only accepted while `Idle`.
pub struct Renderer {
    worker: Option<RenderWorker>,
    status: RenderStatus,
    settings: RenderSettings,
    scene: Option<Arc<Scene>>,
    film: Arc<Mutex<Film>>,
    progress_updater: Option<ProgressUpdater>,
    cancel: Option<Arc<AtomicBool>>,
    render_id: usize,
}

struct RenderWorker {
    tx: Sender<Option<WorkerPayload>>,
    rx: Receiver<WorkerMessage>,
    handle: JoinHandle<()>,
}

impl Renderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            worker: None,
            status: RenderStatus::Idle,
            settings,
            scene: None,
            film: Arc::new(Mutex::new(Film::default())),
            progress_updater: None,
            cancel: None,
            render_id: 0,
        }
    }

    pub fn status(&self) -> RenderStatus {
        self.status
    }

    /// The shared film the host reads finished pixels from.
    pub fn film(&self) -> Arc<Mutex<Film>> {
        Arc::clone(&self.film)
    }

    /// (Re)loads the scene to render. Load and parse failures surface as
    /// `Err` and leave the previous scene in place.
    pub fn initialize_scene(&mut self, settings: &SceneLoadSettings) -> Result<()> {
        if self.status != RenderStatus::Idle {
            vermeer_warn!("initialize_scene: Only valid while idle");
            return Ok(());
        }
        self.scene = Some(Arc::new(Scene::load(settings)?));
        Ok(())
    }

    /// Re-partitions the image. Tiles from earlier renders become stale.
    pub fn set_image_size(&mut self, width: u16, height: u16) {
        if self.status != RenderStatus::Idle {
            vermeer_warn!("set_image_size: Only valid while idle");
            return;
        }
        self.settings.film.res = Vec2::new(width, height);
    }

    pub fn set_sampler(&mut self, sampler: SamplerSettings) {
        if self.status != RenderStatus::Idle {
            vermeer_warn!("set_sampler: Only valid while idle");
            return;
        }
        self.settings.sampler = sampler;
    }

    pub fn set_integrator(&mut self, integrator: IntegratorType) {
        if self.status != RenderStatus::Idle {
            vermeer_warn!("set_integrator: Only valid while idle");
            return;
        }
        self.settings.integrator = integrator;
    }

    /// Registers a callback invoked on the render thread after each
    /// finished tile.
    pub fn set_progress_updater(&mut self, updater: ProgressUpdater) {
        self.progress_updater = Some(updater);
    }

    /// Schedules a render of the loaded scene. A logged no-op while one is
    /// already in flight, so the tile queue is never duplicated.
    pub fn start(&mut self) {
        match self.status {
            RenderStatus::Rendering => {
                vermeer_warn!("start: Render already in progress");
                return;
            }
            RenderStatus::Done | RenderStatus::Interrupted => {
                vermeer_warn!("start: Pending result, reset first");
                return;
            }
            RenderStatus::Idle => (),
        }
        let scene = match &self.scene {
            Some(scene) => Arc::clone(scene),
            None => {
                vermeer_warn!("start: No scene loaded");
                return;
            }
        };

        self.render_id += 1;

        if self.worker.is_none() {
            let (tx, worker_rx) = channel();
            let (worker_tx, rx) = channel();
            let handle = launch_worker(worker_tx, worker_rx);
            self.worker = Some(RenderWorker { tx, rx, handle });
        }
        let worker = self.worker.as_ref().unwrap();

        let tiles = Arc::new(Mutex::new(film_tiles(&self.film, &self.settings.film)));
        let camera = Camera::new(scene.camera_params, self.settings.film.res);
        let cancel = Arc::new(AtomicBool::new(false));
        self.cancel = Some(Arc::clone(&cancel));

        vermeer_debug!("start: Sending payload {}", self.render_id);
        expect!(
            worker.tx.send(Some(WorkerPayload {
                render_id: self.render_id,
                scene,
                camera,
                tiles,
                sampler: create_sampler(self.settings.sampler),
                integrator: self.settings.integrator,
                film: Arc::clone(&self.film),
                cancel,
                progress: self.progress_updater.clone(),
            })),
            "start: Render worker has been terminated"
        );
        self.status = RenderStatus::Rendering;
    }

    /// Cancels an in-flight render and blocks until the worker acknowledges.
    /// In-flight tile results are discarded and no further progress
    /// callbacks fire once this returns. A no-op when nothing is rendering.
    pub fn stop(&mut self) {
        if self.status != RenderStatus::Rendering {
            vermeer_debug!("stop: No render in progress");
            return;
        }

        // Worker polls this between tiles
        self.cancel
            .as_ref()
            .expect("Rendering without a cancel token")
            .store(true, Ordering::Relaxed);

        let worker = self.worker.as_ref().unwrap();
        loop {
            match worker.rx.recv() {
                Ok(WorkerMessage::Finished {
                    render_id,
                    interrupted,
                }) => {
                    if render_id == self.render_id {
                        self.status = if interrupted {
                            RenderStatus::Interrupted
                        } else {
                            // The pass raced cancellation and completed
                            RenderStatus::Done
                        };
                        break;
                    }
                    vermeer_debug!("stop: Stale render {} finished", render_id);
                }
                Err(RecvError {}) => {
                    panic!("stop: Render worker has been terminated");
                }
            }
        }
    }

    /// Pumps worker messages and returns the current status.
    pub fn check_status(&mut self) -> RenderStatus {
        if self.status == RenderStatus::Rendering {
            let worker = self.worker.as_ref().unwrap();
            loop {
                match worker.rx.try_recv() {
                    Ok(WorkerMessage::Finished {
                        render_id,
                        interrupted,
                    }) => {
                        if render_id == self.render_id {
                            self.status = if interrupted {
                                RenderStatus::Interrupted
                            } else {
                                RenderStatus::Done
                            };
                            break;
                        }
                        vermeer_debug!("check_status: Stale render {} finished", render_id);
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        panic!("check_status: Render worker has been terminated");
                    }
                }
            }
        }
        self.status
    }

    /// Returns a finished render to `Idle` and clears its block state.
    pub fn reset(&mut self) {
        match self.status {
            RenderStatus::Done | RenderStatus::Interrupted => {
                self.status = RenderStatus::Idle;
                self.cancel = None;
            }
            RenderStatus::Idle => (),
            RenderStatus::Rendering => {
                vermeer_warn!("reset: Render in progress, stop it first");
            }
        }
    }

    fn kill(&mut self) {
        if let Some(RenderWorker { tx, handle, .. }) = self.worker.take() {
            drop(tx.send(None));
            drop(handle.join());
        }
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        self.kill();
    }
}
