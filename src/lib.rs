//! Decorative WebGL scenes and pointer-driven card animations for a
//! landing page.
//!
//! Everything outside `wasm` is plain Rust and runs under `cargo test` on the
//! host; the browser layer only measures elements, forwards events and turns
//! frames into WebGL calls.

pub mod asset;
pub mod camera;
pub mod clock;
pub mod color;
pub mod config;
pub mod effects;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod interaction;
pub mod material;
pub mod scene;
pub mod tween;
pub mod viewport;

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;

    mod dom;
    mod looper;
    mod render;
    mod site;

    pub use site::Site;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        #[cfg(feature = "console-panic")]
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        // Mounted units live as long as the page.
        std::mem::forget(Site::mount()?);
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::Site;
