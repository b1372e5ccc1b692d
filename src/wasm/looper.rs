//! Cancellable `requestAnimationFrame` loop and scoped event listeners.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget};

struct LoopState {
    handle: Cell<Option<i32>>,
    stopped: Cell<bool>,
    callback: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl LoopState {
    fn schedule(&self) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let callback = self.callback.borrow();
        if let Some(cb) = callback.as_ref() {
            let id = window.request_animation_frame(cb.as_ref().unchecked_ref())?;
            self.handle.set(Some(id));
        }
        Ok(())
    }

    fn stop(&self) {
        self.stopped.set(true);
        if let Some(id) = self.handle.take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
    }
}

/// Calls `tick` once per display frame until it returns false or
/// [`AnimationLoop::stop`] is called. Dropping the loop stops it.
pub struct AnimationLoop {
    state: Rc<LoopState>,
}

impl AnimationLoop {
    pub fn start(mut tick: impl FnMut() -> bool + 'static) -> Result<Self, JsValue> {
        let state = Rc::new(LoopState {
            handle: Cell::new(None),
            stopped: Cell::new(false),
            callback: RefCell::new(None),
        });

        let weak = Rc::downgrade(&state);
        let callback = Closure::wrap(Box::new(move || {
            let Some(state) = weak.upgrade() else {
                return;
            };
            state.handle.set(None);
            if state.stopped.get() {
                return;
            }
            if !tick() {
                state.stop();
                return;
            }
            if let Err(e) = state.schedule() {
                log::warn!("animation loop halted: {e:?}");
            }
        }) as Box<dyn FnMut()>);

        *state.callback.borrow_mut() = Some(callback);
        state.schedule()?;
        Ok(Self { state })
    }

    pub fn stop(&self) {
        self.state.stop();
    }

    pub fn is_stopped(&self) -> bool {
        self.state.stopped.get()
    }
}

impl Drop for AnimationLoop {
    fn drop(&mut self) {
        self.state.stop();
    }
}

/// Event listener that is removed on [`Subscription::dispose`] or drop.
pub struct Subscription {
    target: EventTarget,
    event: &'static str,
    callback: Option<Closure<dyn FnMut(Event)>>,
}

impl Subscription {
    pub fn listen(
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            callback: Some(callback),
        })
    }

    pub fn dispose(&mut self) {
        if let Some(cb) = self.callback.take() {
            let _ = self
                .target
                .remove_event_listener_with_callback(self.event, cb.as_ref().unchecked_ref());
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose();
    }
}
