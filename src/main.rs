mod analysis;
mod audio;
mod cli;
mod controller;
mod error;
mod grid;
mod visual;

use clap::Parser;
use crossbeam_channel::{Receiver, TryRecvError};
use nannou::prelude::*;
use rand::{SeedableRng, rngs::SmallRng};
use tracing::{error, info};

use audio::{AudioPipeline, DecodedTrack, RodioOutput};
use cli::Args;
use controller::{ControlEvent, PlaybackController, Session};
use crate::error::LoadError;
use grid::{Grid, ImagePools};
use visual::{GridView, ImageLibrary, Layout};

const CELL_PX: f32 = 22.0;

struct Model {
    controller: PlaybackController<RodioOutput>,
    view: GridView,
    loader: Option<Receiver<Result<DecodedTrack, LoadError>>>,
}

fn main() {
    init_tracing();
    nannou::app(model).update(update).run();
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn model(app: &App) -> Model {
    let args = Args::parse();

    let rows = args.rows as usize;
    let columns = args.columns as usize;
    let (w, h) = Layout::window_size(rows, columns, CELL_PX);
    app.new_window()
        .title("spectrum grid")
        .size(w, h)
        .view(view)
        .mouse_pressed(mouse_pressed)
        .key_pressed(key_pressed)
        .build()
        .unwrap();

    let pools = ImagePools::new(args.inactive_images.clone(), args.active_images.clone())
        .unwrap_or_else(|e| {
            error!("{e:#}; falling back to the default images");
            ImagePools::default()
        });

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = SmallRng::seed_from_u64(seed);
    let grid = Grid::assign_images(rows, columns, &pools, &mut rng);
    info!(rows, columns, seed, "Grid cells initialized");

    let view = GridView::new(ImageLibrary::load(app, &args.assets, &pools));

    let mut controller = PlaybackController::new(Session::new(grid, AudioPipeline::new()));
    controller.handle(ControlEvent::LoadStarted);

    let loader = match RodioOutput::open() {
        Ok(output) => {
            controller.session_mut().pipeline.attach_output(output);
            Some(audio::track::spawn_loader(args.audio.clone()))
        }
        Err(e) => {
            controller.handle(ControlEvent::Loaded(Err(e)));
            None
        }
    };

    Model {
        controller,
        view,
        loader,
    }
}

fn update(_app: &App, model: &mut Model, _update: Update) {
    let outcome = model.loader.as_ref().and_then(|rx| match rx.try_recv() {
        Ok(result) => Some(result),
        Err(TryRecvError::Empty) => None,
        Err(TryRecvError::Disconnected) => Some(Err(LoadError::Interrupted)),
    });
    if let Some(result) = outcome {
        model.loader = None;
        model.controller.handle(ControlEvent::Loaded(result));
    }

    model.controller.tick();
}

fn layout(app: &App, model: &Model) -> Layout {
    let grid = &model.controller.session().grid;
    Layout::new(app.window_rect(), grid.rows(), grid.columns())
}

fn mouse_pressed(app: &App, model: &mut Model, button: MouseButton) {
    if button == MouseButton::Left && layout(app, model).hits_button(app.mouse.position()) {
        model.controller.handle(ControlEvent::Activate);
    }
}

fn key_pressed(_app: &App, model: &mut Model, key: Key) {
    if key == Key::Space {
        model.controller.handle(ControlEvent::Activate);
    }
}

fn view(app: &App, model: &Model, frame: Frame) {
    let layout = layout(app, model);
    model.view.draw(
        app,
        frame,
        &model.controller.session().grid,
        model.controller.button(),
        &layout,
    );
}
