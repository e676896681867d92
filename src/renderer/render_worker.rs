use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{Receiver, Sender},
        Arc, Mutex,
    },
    thread::JoinHandle,
    time::Instant,
};

use super::{ProgressUpdater, RenderUpdate};
use crate::{
    camera::Camera,
    film::{Film, FilmTile},
    integrators::IntegratorType,
    sampling::Sampler,
    scene::Scene,
};

pub(super) struct WorkerPayload {
    pub render_id: usize,
    pub scene: Arc<Scene>,
    pub camera: Camera,
    pub tiles: Arc<Mutex<VecDeque<FilmTile>>>,
    pub sampler: Arc<dyn Sampler>,
    pub integrator: IntegratorType,
    pub film: Arc<Mutex<Film>>,
    pub cancel: Arc<AtomicBool>,
    pub progress: Option<ProgressUpdater>,
}

pub(super) enum WorkerMessage {
    Finished { render_id: usize, interrupted: bool },
}

pub(super) fn launch_worker(
    to_parent: Sender<WorkerMessage>,
    from_parent: Receiver<Option<WorkerPayload>>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        vermeer_debug!("Render worker: Begin");
        loop {
            match from_parent.recv() {
                Ok(Some(payload)) => {
                    let render_id = payload.render_id;
                    vermeer_debug!("Render worker: Received payload {}", render_id);
                    let interrupted = render(&payload);
                    if to_parent
                        .send(WorkerMessage::Finished {
                            render_id,
                            interrupted,
                        })
                        .is_err()
                    {
                        vermeer_debug!("Render worker: Parent disconnected");
                        break;
                    }
                }
                Ok(None) => {
                    vermeer_debug!("Render worker: Killed by parent");
                    break;
                }
                Err(_) => {
                    vermeer_debug!("Render worker: Receive channel disconnected");
                    break;
                }
            }
        }
        vermeer_debug!("Render worker: End");
    })
}

/// Runs the progressive sample passes for one payload. Returns `true` if
/// cancellation cut the render short.
fn render(payload: &WorkerPayload) -> bool {
    let render_start = Instant::now();

    // Blank clones seed the queue for the later passes
    let tile_templates: Vec<FilmTile> = {
        let tiles = payload.tiles.lock().unwrap();
        tiles.iter().cloned().collect()
    };

    let samples_per_pixel = payload.sampler.samples_per_pixel();
    let tiles_total = tile_templates.len() * samples_per_pixel as usize;
    let mut tiles_done = 0;

    let mut integrator = payload.integrator.instantiate();
    integrator.preprocess(&payload.scene);

    for pass in 0..samples_per_pixel {
        if pass > 0 {
            let mut tiles = payload.tiles.lock().unwrap();
            tiles.clear();
            for template in &tile_templates {
                let mut tile = template.clone();
                tile.sample = pass;
                tiles.push_back(tile);
            }
        }

        loop {
            // Cancellation is polled between tiles only
            if payload.cancel.load(Ordering::Relaxed) {
                vermeer_debug!("Render worker: Interrupted");
                return true;
            }

            let tile = {
                let mut tiles = payload.tiles.lock().unwrap();
                tiles.pop_front()
            };
            let mut tile = match tile {
                Some(tile) => tile,
                // Pass complete
                None => break,
            };

            vermeer_trace!("Render worker: Render tile {:?} pass {}", tile.bb, pass);
            let completed = integrator.render(
                &payload.scene,
                &payload.camera,
                &payload.sampler,
                &mut tile,
                &mut || payload.cancel.load(Ordering::Relaxed),
            );
            if !completed {
                // The partial tile is discarded
                vermeer_debug!("Render worker: Interrupted mid-tile");
                return true;
            }

            {
                let mut film = payload.film.lock().unwrap();
                if film.matches(&tile) {
                    film.update_tile(&tile);
                } else {
                    vermeer_trace!("Render worker: Stale tile");
                }
            }
            tiles_done += 1;

            if let Some(updater) = &payload.progress {
                updater(RenderUpdate {
                    tile_bounds: tile.bb,
                    pixels: tile.pixels,
                    tiles_done,
                    tiles_total,
                    secs: (render_start.elapsed().as_micros() as f32) * 1e-6,
                });
            }
        }
    }

    false
}
