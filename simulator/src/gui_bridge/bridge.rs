use crate::gui_bridge::model::VisualizationModel;
use crate::workflow::runner::{now_millis, SharedRunner};
use log::{error, info};
use objectifycore::RawDetection;
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::{http::StatusCode, Filter};

type SharedModel = Arc<RwLock<VisualizationModel>>;

#[derive(Debug)]
struct WarpError;

impl warp::reject::Reject for WarpError {}

/// HTTP endpoint that hands the latest stable detections to the overlay renderer.
pub struct GuiBridge {
    state: SharedModel,
}

impl GuiBridge {
    pub fn new(runner: SharedRunner, bind: SocketAddr) -> Self {
        let state: SharedModel = Arc::new(RwLock::new(VisualizationModel::default()));
        let filter = routes(state.clone(), runner);

        thread::spawn(move || {
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    error!("overlay bridge runtime failed: {}", err);
                    return;
                }
            };
            info!("overlay bridge listening on {}", bind);
            runtime.block_on(async move {
                warp::serve(filter).run(bind).await;
            });
        });

        Self { state }
    }

    pub fn publish_status(&self, message: &str) {
        println!("[GUI] {}", message);
    }

    /// Most recent overlay model handed to the renderer.
    pub fn latest(&self) -> VisualizationModel {
        self.state
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

/// `GET /detections`, `POST /ingest` (raw batch JSON) and `POST /reset`.
fn routes(
    state: SharedModel,
    runner: SharedRunner,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let state_filter = warp::any().map(move || state.clone());
    let runner_filter = warp::any().map(move || runner.clone());

    let get_route = warp::path("detections")
        .and(warp::path::end())
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(|state: SharedModel| async move {
            let model = state
                .read()
                .map(|guard| guard.clone())
                .map_err(|_| warp::reject::custom(WarpError))?;
            Ok::<_, warp::Rejection>(warp::reply::json(&model))
        });

    let ingest_route = warp::path("ingest")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(state_filter.clone())
        .and(runner_filter.clone())
        .and_then(
            |batch: Vec<RawDetection>, state: SharedModel, runner: SharedRunner| async move {
                let result = match runner.lock() {
                    Ok(mut guard) => guard.ingest(&batch, now_millis()),
                    Err(_) => {
                        error!("ingest error: runner lock poisoned");
                        return Err(warp::reject::custom(WarpError));
                    }
                };
                let model = VisualizationModel::from(&result);
                if let Ok(mut guard) = state.write() {
                    *guard = model.clone();
                }
                Ok::<_, warp::Rejection>(warp::reply::with_status(
                    warp::reply::json(&model),
                    StatusCode::OK,
                ))
            },
        );

    let reset_route = warp::path("reset")
        .and(warp::path::end())
        .and(warp::post())
        .and(state_filter)
        .and(runner_filter)
        .and_then(|state: SharedModel, runner: SharedRunner| async move {
            match runner.lock() {
                Ok(mut guard) => guard.reset(),
                Err(_) => {
                    error!("reset error: runner lock poisoned");
                    return Err(warp::reject::custom(WarpError));
                }
            }
            if let Ok(mut guard) = state.write() {
                *guard = VisualizationModel::default();
            }
            Ok::<_, warp::Rejection>(warp::reply::json(&json!({"status": "ok"})))
        });

    get_route.or(ingest_route).or(reset_route)
}
