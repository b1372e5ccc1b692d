use std::cell::RefCell;
use std::rc::Rc;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlCanvasElement, MouseEvent};

use super::dom::{self, Measure, Responders};
use super::looper::{AnimationLoop, Subscription};
use super::render::WebGlRenderer;
use crate::asset;
use crate::config::SiteConfig;
use crate::effects::droid::pointer_ndc;
use crate::effects::{Analytics, Droid, Effect, Flagship, Hologram, Starfield, Unit};
use crate::error::{FxError, Result};

type Shared<E> = Rc<RefCell<Unit<E, WebGlRenderer>>>;

/// A running effect with its frame loop and listeners.
pub struct MountedUnit<E> {
    unit: Shared<E>,
    frames: AnimationLoop,
    subscriptions: Vec<Subscription>,
}

impl<E: Effect + 'static> MountedUnit<E> {
    fn mount(canvas: HtmlCanvasElement, effect: E, measure: Measure) -> Result<Self> {
        let renderer = WebGlRenderer::new(canvas.clone())?;
        let unit = Rc::new(RefCell::new(Unit::mount(effect, renderer, measure.viewport(&canvas))));

        let frames = {
            let unit = unit.clone();
            AnimationLoop::start(move || unit.borrow_mut().frame())?
        };
        let window = web_sys::window().ok_or_else(|| FxError::Js("no window".into()))?;
        let resize = {
            let unit = unit.clone();
            Subscription::listen(&window, "resize", move |_| {
                unit.borrow_mut().resize(measure.viewport(&canvas));
            })?
        };

        Ok(Self {
            unit,
            frames,
            subscriptions: vec![resize],
        })
    }

    pub fn stop(&mut self) {
        self.frames.stop();
        self.unit.borrow_mut().stop();
        self.subscriptions.clear();
    }
}

/// Every effect found on the page. Dropping it, or calling `stop`,
/// halts all loops and removes all listeners.
#[wasm_bindgen]
pub struct Site {
    hologram: Option<MountedUnit<Hologram>>,
    starfield: Option<MountedUnit<Starfield>>,
    analytics: Option<MountedUnit<Analytics>>,
    flagship: Option<MountedUnit<Flagship>>,
    droid: Option<MountedUnit<Droid>>,
    responders: Option<Responders>,
}

#[wasm_bindgen]
impl Site {
    /// Mounts whatever the current document offers. Never fails: each
    /// missing or broken unit is logged and left out.
    #[wasm_bindgen(constructor)]
    pub fn mount() -> Result<Site, JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        Ok(Self::mount_in(&document))
    }

    pub fn stop(&mut self) {
        if let Some(u) = &mut self.hologram {
            u.stop();
        }
        if let Some(u) = &mut self.starfield {
            u.stop();
        }
        if let Some(u) = &mut self.analytics {
            u.stop();
        }
        if let Some(u) = &mut self.flagship {
            u.stop();
        }
        if let Some(u) = &mut self.droid {
            u.stop();
        }
        if let Some(r) = &mut self.responders {
            r.stop();
        }
    }

    #[wasm_bindgen(getter)]
    pub fn mounted(&self) -> u32 {
        [
            self.hologram.is_some(),
            self.starfield.is_some(),
            self.analytics.is_some(),
            self.flagship.is_some(),
            self.droid.is_some(),
        ]
        .into_iter()
        .filter(|m| *m)
        .count() as u32
    }
}

impl Site {
    fn mount_in(document: &Document) -> Self {
        let config = dom::site_config(document);
        let theme = dom::theme(document);
        let seed = config
            .seed
            .unwrap_or_else(|| (js_sys::Math::random() * u32::MAX as f64) as u64);
        let mut rng = SmallRng::seed_from_u64(seed);
        let ids = &config.canvases;

        let hologram = settle(
            "hologram",
            mount_on(document, &ids.hologram, Measure::Canvas, || Hologram::assemble(theme)),
        );
        let starfield = settle(
            "starfield",
            mount_on(document, &ids.starfield, Measure::Window, || Ok(Starfield::assemble(theme, &mut rng))),
        );
        let analytics = settle(
            "analytics",
            mount_on(document, &ids.analytics, Measure::Canvas, || Analytics::assemble(&mut rng)),
        );
        let flagship = settle(
            "flagship",
            mount_on(document, &ids.flagship, Measure::Canvas, || Flagship::assemble(&mut rng)),
        );
        let droid = settle("droid", mount_droid(document, &config));
        let responders = settle("responders", Responders::install(document, &config)).flatten();

        log::info!("holo_fx mounted (seed {seed})");
        Self {
            hologram,
            starfield,
            analytics,
            flagship,
            droid,
            responders,
        }
    }
}

fn mount_on<E: Effect + 'static>(
    document: &Document,
    id: &str,
    measure: Measure,
    assemble: impl FnOnce() -> Result<E>,
) -> Result<MountedUnit<E>> {
    let canvas = dom::canvas(document, id)?;
    MountedUnit::mount(canvas, assemble()?, measure)
}

fn mount_droid(document: &Document, config: &SiteConfig) -> Result<MountedUnit<Droid>> {
    let canvas = dom::canvas(document, &config.canvases.droid)?;
    let mut mounted = MountedUnit::mount(canvas, Droid::assemble(), Measure::Window)?;

    let window = web_sys::window().ok_or_else(|| FxError::Js("no window".into()))?;
    let follow = {
        let unit = Rc::downgrade(&mounted.unit);
        let view = window.clone();
        Subscription::listen(&window, "mousemove", move |event| {
            let (Some(unit), Ok(event)) = (unit.upgrade(), event.dyn_into::<MouseEvent>()) else {
                return;
            };
            let (w, h) = dom::window_size(&view);
            let (x, y) = pointer_ndc(event.client_x() as f64, event.client_y() as f64, w, h);
            unit.borrow_mut().effect_mut().pointer_moved(x, y);
        })?
    };
    mounted.subscriptions.push(follow);

    let unit = Rc::downgrade(&mounted.unit);
    let path = config.model_path.clone();
    wasm_bindgen_futures::spawn_local(async move {
        let loaded = dom::fetch_bytes(&path).await.and_then(|bytes| asset::load_glb(&bytes));
        let Some(unit) = unit.upgrade() else {
            return;
        };
        match loaded.and_then(|model| unit.borrow_mut().effect_mut().attach_model(model)) {
            Ok(_) => log::debug!("droid model {path} attached"),
            Err(e) => log::warn!("droid model {path}: {e}"),
        }
    });

    Ok(mounted)
}

/// Logs a unit that could not mount. Absent canvases are expected on most pages.
fn settle<T>(name: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(FxError::MissingElement(id)) => {
            log::debug!("{name}: no #{id} on this page");
            None
        }
        Err(e) => {
            log::warn!("{name}: {e}");
            None
        }
    }
}
