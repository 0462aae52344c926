use donutfield_assets::FontSource;
use donutfield_author::{BuildError, TextParams, create_shape_cloud, create_text_mesh};
use donutfield_common::NodeId;
use donutfield_render::{Clock, Renderer, Viewport};
use donutfield_scene::{Material, Mesh, Scene, SharedMaterial};
use donutfield_tools::PanelState;
use rand::rngs::StdRng;
use std::sync::mpsc::{self, Receiver, TryRecvError};

type TextResult = Result<Mesh, BuildError>;

/// The floating text, the donut cloud and the panel that drives them.
///
/// Content is replaced wholesale on rebuild: the old node is removed from
/// the viewport and a freshly built one registered in its place.
pub struct Content<F> {
    pub panel: PanelState,
    font: F,
    text_material: SharedMaterial,
    donut_material: SharedMaterial,
    text: Option<NodeId>,
    donuts: Option<NodeId>,
    pending_text: Option<Receiver<TextResult>>,
    rng: StdRng,
}

impl<F> Content<F>
where
    F: FontSource + Clone + Send + Sync + 'static,
{
    pub fn new(font: F, rng: StdRng) -> Self {
        let panel = PanelState::default();
        let material = |controls: &donutfield_tools::MaterialControls| {
            let mut m = Material::matcap(controls.matcap).transparent();
            m.opacity = controls.opacity;
            m.visible = controls.visible;
            SharedMaterial::new(m)
        };
        Self {
            text_material: material(&panel.text_material),
            donut_material: material(&panel.donut_material),
            panel,
            font,
            text: None,
            donuts: None,
            pending_text: None,
            rng,
        }
    }

    pub fn set_font(&mut self, font: F) {
        self.font = font;
    }

    /// Build the donuts now and start the text build.
    pub fn populate<R: Renderer>(&mut self, viewport: &mut Viewport<R>) {
        self.rebuild_donuts(viewport);
        self.rebuild_text();
    }

    pub fn rebuild_donuts<R: Renderer>(&mut self, viewport: &mut Viewport<R>) {
        if let Some(old) = self.donuts.take() {
            viewport.remove(old);
        }
        let cloud = create_shape_cloud(
            self.panel.count as usize,
            self.panel.radius,
            &self.donut_material,
            &mut self.rng,
        );
        self.donuts = Some(viewport.add(cloud));
        flush_events(viewport);
        tracing::info!(
            count = self.panel.count,
            radius = self.panel.radius,
            "donuts rebuilt"
        );
    }

    /// Build the text mesh on a worker thread. A newer request supersedes
    /// one still in flight.
    pub fn rebuild_text(&mut self) {
        let (tx, rx) = mpsc::channel();
        let font = self.font.clone();
        let material = self.text_material.clone();
        let text = self.panel.text.clone();
        let spawned = std::thread::Builder::new()
            .name("text-build".into())
            .spawn(move || {
                let result = pollster::block_on(create_text_mesh(
                    &text,
                    &font,
                    material,
                    TextParams::default(),
                ));
                // receiver is gone if a newer build replaced this one
                let _ = tx.send(result);
            });
        match spawned {
            Ok(_) => self.pending_text = Some(rx),
            Err(e) => tracing::error!("failed to start text build: {e}"),
        }
    }

    pub fn text_pending(&self) -> bool {
        self.pending_text.is_some()
    }

    /// Swap in a finished text mesh. Returns whether the scene changed.
    pub fn poll_text<R: Renderer>(&mut self, viewport: &mut Viewport<R>) -> bool {
        let Some(rx) = &self.pending_text else {
            return false;
        };
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => {
                tracing::error!("text build worker exited without a result");
                self.pending_text = None;
                return false;
            }
        };
        self.pending_text = None;

        match result {
            Ok(mesh) => {
                if let Some(old) = self.text.take() {
                    viewport.remove(old);
                }
                self.text = Some(viewport.add(mesh));
                flush_events(viewport);
                tracing::info!("text rebuilt");
                true
            }
            Err(e) => {
                tracing::error!("text rebuild failed, keeping previous text: {e}");
                false
            }
        }
    }

    /// Push panel edits into the shared materials and the camera controls.
    pub fn sync<R: Renderer>(&mut self, viewport: &mut Viewport<R>) {
        self.panel.clamp();
        self.panel.text_material.apply(&self.text_material);
        self.panel.donut_material.apply(&self.donut_material);
        self.panel.apply_navigation(viewport.controls_mut());
    }

    /// Per-frame animation: spin the donut cloud.
    pub fn animate(&self, scene: &mut Scene, clock: &Clock) {
        if let Some(node) = self.donuts.and_then(|id| scene.get_mut(id)) {
            self.panel.apply_spin(node.transform_mut(), clock.elapsed());
        }
    }

    pub fn text_node(&self) -> Option<NodeId> {
        self.text
    }

    pub fn donut_node(&self) -> Option<NodeId> {
        self.donuts
    }
}

/// Log and clear the scene's add/remove history.
fn flush_events<R: Renderer>(viewport: &mut Viewport<R>) {
    for event in viewport.scene_mut().drain_events() {
        tracing::debug!(?event, "scene changed");
    }
}
