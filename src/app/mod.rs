use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::thread;

use eframe::egui::{self, Context};
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::engine::{LayoutConfig, RouterConfig};
use crate::live::{DEFAULT_POLL_INTERVAL, StatusPoller};
use crate::model::{AdjacencyIndex, AtlasGraph, SurfaceKind, build_adjacency, load_atlas};
use crate::store::StateStore;

mod render_utils;
mod surface;
mod ui;
mod view;

use surface::SurfaceState;

pub struct AtlasApp {
    graph_path: PathBuf,
    status_path: PathBuf,
    state_path: Option<PathBuf>,
    state: AppState,
}

enum AppState {
    Loading {
        rx: Receiver<Result<AtlasGraph, String>>,
    },
    Ready(Box<AtlasModel>),
    Error(String),
}

struct AtlasModel {
    graph: AtlasGraph,
    adjacency: AdjacencyIndex,
    store: StateStore,
    poller: StatusPoller,
    matcher: SkimMatcherV2,
    surfaces: Vec<SurfaceState>,
    active: usize,
    layout_config: LayoutConfig,
    router_config: RouterConfig,
}

impl AtlasApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        graph_path: PathBuf,
        status_path: PathBuf,
        state_path: Option<PathBuf>,
    ) -> Self {
        let state = Self::start_load(graph_path.clone());
        Self {
            graph_path,
            status_path,
            state_path,
            state,
        }
    }

    fn spawn_load(graph_path: PathBuf) -> Receiver<Result<AtlasGraph, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_atlas(&graph_path).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(graph_path: PathBuf) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(graph_path),
        }
    }

    fn build_model(&self, graph: AtlasGraph) -> AppState {
        let store = match StateStore::open(self.state_path.clone()) {
            Ok(store) => store,
            Err(error) => return AppState::Error(format!("{error:#}")),
        };
        AppState::Ready(Box::new(AtlasModel::new(
            graph,
            store,
            StatusPoller::new(self.status_path.clone(), DEFAULT_POLL_INTERVAL),
        )))
    }
}

impl eframe::App for AtlasApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(graph) => self.build_model(graph),
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading system atlas...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load system atlas");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.graph_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                model.show(ctx);
            }
        }

        if let Some(next_state) = transition {
            self.state = next_state;
        }
    }
}

impl AtlasModel {
    fn new(graph: AtlasGraph, mut store: StateStore, poller: StatusPoller) -> Self {
        let adjacency = build_adjacency(&graph.connections);
        let surfaces = SurfaceKind::all()
            .into_iter()
            .map(|kind| SurfaceState::restore(kind, &mut store))
            .collect();

        Self {
            graph,
            adjacency,
            store,
            poller,
            matcher: SkimMatcherV2::default(),
            surfaces,
            active: 0,
            layout_config: LayoutConfig::default(),
            router_config: RouterConfig::default(),
        }
    }

    fn show(&mut self, ctx: &Context) {
        if let Some(live) = self.poller.tick() {
            for surface in &mut self.surfaces {
                surface.overlay.update_live(live.clone());
            }
        }
        if self.poller.enabled {
            ctx.request_repaint_after(std::time::Duration::from_secs(1));
        }

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("system atlas");
                    ui.separator();
                    for (index, kind) in SurfaceKind::all().into_iter().enumerate() {
                        if ui
                            .selectable_label(self.active == index, kind.title())
                            .clicked()
                        {
                            self.active = index;
                        }
                    }
                    ui.separator();
                    ui.label(format!(
                        "{} nodes, {} connections",
                        self.graph.node_count(),
                        self.graph.connection_count()
                    ));
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(270.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("controls_scroll")
                    .show(ui, |ui| self.controls_panel(ui));
            });

        if self.surfaces[self.active].selected.is_some() {
            egui::SidePanel::right("details")
                .resizable(true)
                .default_width(300.0)
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical()
                        .id_salt("details_scroll")
                        .show(ui, |ui| self.details_panel(ui));
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_surface(ui);
        });
    }
}
