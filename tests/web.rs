#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Document, Element, HtmlCanvasElement, HtmlElement};

use holo_fx::config::CONFIG_ELEMENT_ID;
use holo_fx::Site;

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn append(tag: &str, id: Option<&str>, class: Option<&str>) -> Element {
    let doc = document();
    let el = doc.create_element(tag).unwrap();
    if let Some(id) = id {
        el.set_id(id);
    }
    if let Some(class) = class {
        el.set_class_name(class);
    }
    doc.body().unwrap().append_child(&el).unwrap();
    el
}

#[wasm_bindgen_test]
fn empty_page_mounts_nothing() {
    let mut site = Site::mount().unwrap();
    assert_eq!(site.mounted(), 0);
    site.stop();
    site.stop();
}

fn config_element(json: &str) -> Element {
    let script = append("script", Some(CONFIG_ELEMENT_ID), None);
    script.set_attribute("type", "application/json").unwrap();
    script.set_text_content(Some(json));
    script
}

fn webgl2_available() -> bool {
    let scratch: HtmlCanvasElement = document().create_element("canvas").unwrap().dyn_into().unwrap();
    matches!(scratch.get_context("webgl2"), Ok(Some(_)))
}

fn inline_transform(el: &Element) -> String {
    let el: &HtmlElement = el.dyn_ref().unwrap();
    el.style().get_property_value("transform").unwrap()
}

#[wasm_bindgen_test]
fn config_element_renames_mount_points() {
    let config = config_element(r#"{"canvases": {"hologram": "holo-test"}, "badge_selector": ".holo-badge"}"#);
    let canvas = append("canvas", Some("holo-test"), None);
    let badge = append("div", None, Some("holo-badge"));
    let stock_badge = append("div", None, Some("bb8"));

    let site = Site::mount().unwrap();
    if webgl2_available() {
        assert_eq!(site.mounted(), 1);
    }
    assert!(inline_transform(&badge).contains("translateY"));
    assert!(inline_transform(&stock_badge).is_empty());

    drop(site);
    for el in [config, canvas, badge, stock_badge] {
        el.remove();
    }
}

#[wasm_bindgen_test]
fn malformed_config_falls_back_to_defaults() {
    let config = config_element("{canvases: oops");
    let canvas = append("canvas", Some("hero-canvas"), None);
    let renamed = append("canvas", Some("holo-test"), None);
    let badge = append("div", None, Some("bb8"));

    let site = Site::mount().unwrap();
    if webgl2_available() {
        assert_eq!(site.mounted(), 1);
    }
    assert!(inline_transform(&badge).contains("translateY"));

    drop(site);
    for el in [config, canvas, renamed, badge] {
        el.remove();
    }
}

#[wasm_bindgen_test]
fn canvas_is_sized_to_its_box() {
    let el = append("canvas", Some("hero-canvas"), None);
    let canvas: HtmlCanvasElement = el.clone().dyn_into().unwrap();
    canvas.style().set_property("width", "320px").unwrap();
    canvas.style().set_property("height", "160px").unwrap();

    let mut site = Site::mount().unwrap();
    // Browsers without WebGL2 leave the unit out instead of failing.
    if site.mounted() == 1 {
        assert_eq!((canvas.width(), canvas.height()), (320, 160));
    }
    site.stop();
    el.remove();
}

#[wasm_bindgen_test]
fn badge_gets_an_inline_transform() {
    let el = append("div", None, Some("bb8"));
    let badge: HtmlElement = el.clone().dyn_into().unwrap();

    let site = Site::mount().unwrap();
    let transform = badge.style().get_property_value("transform").unwrap();
    assert!(transform.contains("translateY"), "got {transform:?}");
    drop(site);
    el.remove();
}
