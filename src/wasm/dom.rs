//! Page lookups, asset fetching and the CSS tween driver.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, HtmlCanvasElement, HtmlElement, Response, Window};

use super::looper::{AnimationLoop, Subscription};
use crate::color::Theme;
use crate::config::{SiteConfig, CONFIG_ELEMENT_ID};
use crate::error::{FxError, Result};
use crate::interaction::{DroidBadge, ModuleCard, Pointer};
use crate::tween::{ElementId, TweenBoard};
use crate::viewport::Viewport;

pub fn canvas(document: &Document, id: &str) -> Result<HtmlCanvasElement> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| FxError::MissingElement(id.to_string()))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| FxError::WrongElement {
            id: id.to_string(),
            expected: "canvas",
        })
}

pub fn theme(document: &Document) -> Theme {
    let attr = document
        .document_element()
        .and_then(|root| root.get_attribute("data-theme"));
    Theme::from_attr(attr.as_deref())
}

/// Reads the JSON override, falling back to defaults when absent or broken.
pub fn site_config(document: &Document) -> SiteConfig {
    let Some(text) = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content())
    else {
        return SiteConfig::default();
    };
    SiteConfig::from_json(&text).unwrap_or_else(|e| {
        log::warn!("ignoring #{CONFIG_ELEMENT_ID}: {e}");
        SiteConfig::default()
    })
}

/// Where a unit takes its drawing size from.
#[derive(Clone, Copy, Debug)]
pub enum Measure {
    /// The canvas's laid out client box.
    Canvas,
    /// The browser window.
    Window,
}

impl Measure {
    pub fn viewport(self, canvas: &HtmlCanvasElement) -> Viewport {
        match self {
            Measure::Canvas => Viewport::new(canvas.client_width().max(0) as u32, canvas.client_height().max(0) as u32),
            Measure::Window => {
                let (w, h) = web_sys::window().map(|w| window_size(&w)).unwrap_or((0.0, 0.0));
                Viewport::new(w as u32, h as u32)
            }
        }
    }
}

pub fn window_size(window: &Window) -> (f64, f64) {
    let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (w, h)
}

pub async fn fetch_bytes(path: &str) -> Result<Vec<u8>> {
    let window = web_sys::window().ok_or_else(|| FxError::Js("no window".into()))?;
    let response: Response = JsFuture::from(window.fetch_with_str(path)).await?.dyn_into()?;
    if !response.ok() {
        return Err(FxError::Asset(format!("{path}: HTTP {}", response.status())));
    }
    let buffer = JsFuture::from(response.array_buffer()?).await?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

fn html(el: Element) -> Option<HtmlElement> {
    el.dyn_into::<HtmlElement>().ok()
}

/// Runs the page's tween board and writes element state into inline styles.
pub struct Responders {
    frames: AnimationLoop,
    subscriptions: Vec<Subscription>,
}

impl Responders {
    /// Wires the badge and every module card found in `document`.
    /// Returns `None` when the page has neither.
    pub fn install(document: &Document, config: &SiteConfig) -> Result<Option<Self>> {
        let board = Rc::new(RefCell::new(TweenBoard::new()));
        let mut elements: HashMap<ElementId, HtmlElement> = HashMap::new();
        let mut subscriptions = Vec::new();

        if let Some(badge_el) = document.query_selector(&config.badge_selector)?.and_then(html) {
            let badge = DroidBadge::install(&mut board.borrow_mut());
            elements.insert(badge.element, badge_el.clone());
            for (event, pointer) in pointer_events() {
                let board = board.clone();
                subscriptions.push(Subscription::listen(&badge_el, event, move |_| {
                    badge.respond(&mut board.borrow_mut(), pointer)
                })?);
            }
        }

        let cards = document.query_selector_all(&config.card_selector)?;
        for i in 0..cards.length() {
            let Some(card_el) = cards.item(i).and_then(|n| n.dyn_into::<Element>().ok()).and_then(html) else {
                continue;
            };
            let child = |selector: &str| card_el.query_selector(selector).ok().flatten().and_then(html);
            let icon_el = child(&config.card_icon_selector);
            let glow_el = child(&config.card_glow_selector);

            let card = ModuleCard::install(&mut board.borrow_mut(), i as usize, icon_el.is_some(), glow_el.is_some());
            elements.insert(card.card, card_el.clone());
            if let (Some(id), Some(el)) = (card.icon, icon_el) {
                elements.insert(id, el);
            }
            if let (Some(id), Some(el)) = (card.glow, glow_el) {
                elements.insert(id, el);
            }
            for (event, pointer) in pointer_events() {
                let board = board.clone();
                subscriptions.push(Subscription::listen(&card_el, event, move |_| {
                    card.respond(&mut board.borrow_mut(), pointer)
                })?);
            }
        }

        if elements.is_empty() {
            return Ok(None);
        }
        log::debug!("tweening {} page elements", elements.len());
        for (id, el) in &elements {
            paint(el, &board.borrow(), *id);
        }

        let performance = web_sys::window().and_then(|w| w.performance());
        let now = move || performance.as_ref().map(|p| p.now()).unwrap_or(0.0);
        let mut last = now();
        let frames = AnimationLoop::start(move || {
            let t = now();
            let dt = ((t - last) / 1000.0) as f32;
            last = t;
            let mut board = board.borrow_mut();
            for id in board.advance(dt) {
                if let Some(el) = elements.get(&id) {
                    paint(el, &board, id);
                }
            }
            true
        })?;

        Ok(Some(Self {
            frames,
            subscriptions,
        }))
    }

    pub fn stop(&mut self) {
        self.frames.stop();
        self.subscriptions.clear();
    }
}

fn pointer_events() -> [(&'static str, Pointer); 3] {
    [
        ("mouseenter", Pointer::Enter),
        ("mouseleave", Pointer::Leave),
        ("click", Pointer::Click),
    ]
}

fn paint(el: &HtmlElement, board: &TweenBoard, id: ElementId) {
    let state = board.state(id);
    let style = el.style();
    let _ = style.set_property("transform", &state.css_transform());
    let _ = style.set_property("opacity", &format!("{:.3}", state.opacity));
}
