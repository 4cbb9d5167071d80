#![forbid(unsafe_code)]

//! `wasm-bindgen` exports for the popup page.
//!
//! Wraps [`super::runner_core::PopupCore`] over the live DOM. Only compiled on
//! `wasm32` targets.
//!
//! Both callbacks into the core (animation `onfinish` and queued navigation)
//! are deferred with `spawn_local`, so they never run while a JS-facing method
//! holds the core borrowed.

use std::cell::{OnceCell, RefCell};
use std::fmt::Display;
use std::rc::{Rc, Weak};

use js_sys::{Object, Promise, Reflect};
use slidepanel_core::{Activation, PanelConfig, Settled};
use slidepanel_web::dom::DomHost;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, spawn_local};

use super::nav::NavQueue;
use super::panels::Startup;
use super::runner_core::PopupCore;

type SharedCore = Rc<RefCell<PopupCore<DomHost>>>;
type CoreSlot = Rc<OnceCell<Weak<RefCell<PopupCore<DomHost>>>>>;

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<js_sys::Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

fn set_js(obj: &Object, key: &str, value: JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(key), &value);
}

fn js_error(err: impl Display) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

fn settled_to_js(settled: &Settled) -> JsValue {
    let obj = Object::new();
    set_js(&obj, "from", JsValue::from_str(&settled.from));
    set_js(&obj, "to", JsValue::from_str(&settled.to));
    obj.into()
}

/// Resolves with `{from, to}` once the slide settles, or with `null` when the
/// panel was already displayed.
fn activation_to_promise(activation: Activation) -> Promise {
    match activation {
        Activation::AlreadyActive => Promise::resolve(&JsValue::NULL),
        Activation::Started(transition) => future_to_promise(async move {
            let settled = transition.await;
            Ok(settled_to_js(&settled))
        }),
    }
}

fn upgrade(slot: &CoreSlot) -> Option<SharedCore> {
    slot.get().and_then(Weak::upgrade)
}

#[wasm_bindgen]
pub struct PopupApp {
    core: SharedCore,
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    install_panic_hook();
}

impl PopupApp {
    fn build(config: PanelConfig, startup: Startup) -> Result<Self, JsValue> {
        install_panic_hook();
        let slot: CoreSlot = Rc::new(OnceCell::new());

        let finish_slot = Rc::clone(&slot);
        let host = DomHost::new(move |animation| {
            let Some(core) = upgrade(&finish_slot) else {
                return;
            };
            spawn_local(async move {
                if let Err(err) = core.borrow_mut().finish(animation) {
                    console_error(&format!("slide {animation} did not settle: {err}"));
                }
            });
        })
        .map_err(js_error)?;

        let queue = NavQueue::new();
        let pump_slot = Rc::clone(&slot);
        queue.set_notifier(move || {
            let Some(core) = upgrade(&pump_slot) else {
                return;
            };
            spawn_local(async move {
                let pumped = core.borrow_mut().pump();
                for (request, err) in pumped.rejected {
                    console_error(&format!("navigation to {} rejected: {err}", request.panel));
                }
            });
        });

        let core = PopupCore::with_queue(host, config, startup, queue).map_err(js_error)?;
        let core = Rc::new(RefCell::new(core));
        let _ = slot.set(Rc::downgrade(&core));
        Ok(Self { core })
    }
}

#[wasm_bindgen]
impl PopupApp {
    /// Install the popup with `main_panel` as the initial panel.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<PopupApp, JsValue> {
        Self::build(PanelConfig::default(), Startup::Initial)
    }

    /// Install the popup, adopting the panel the markup already marks active.
    #[wasm_bindgen(js_name = adoptMarked)]
    pub fn adopt_marked() -> Result<PopupApp, JsValue> {
        Self::build(PanelConfig::default(), Startup::AdoptMarked)
    }

    /// Install the popup with a JSON-encoded `PanelConfig`.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(json: &str) -> Result<PopupApp, JsValue> {
        let config = PanelConfig::from_json_str(json)
            .and_then(PanelConfig::validated)
            .map_err(js_error)?;
        Self::build(config, Startup::Initial)
    }

    /// Fire a synthetic event, as if the user had triggered it.
    pub fn dispatch(&self, target: &str, event: &str) -> Result<bool, JsValue> {
        self.core
            .borrow()
            .host()
            .dispatch(target, event)
            .map_err(js_error)
    }

    #[wasm_bindgen(js_name = activePanel)]
    pub fn active_panel(&self) -> Option<String> {
        self.core.borrow().active_panel().map(str::to_string)
    }

    #[wasm_bindgen(js_name = inTransition)]
    pub fn in_transition(&self) -> bool {
        self.core.borrow().in_transition()
    }

    #[wasm_bindgen(js_name = goForward)]
    pub fn go_forward(&self) -> Result<Promise, JsValue> {
        let activation = self.core.borrow_mut().go_forward().map_err(js_error)?;
        Ok(activation_to_promise(activation))
    }

    #[wasm_bindgen(js_name = goBack)]
    pub fn go_back(&self) -> Result<Promise, JsValue> {
        let activation = self.core.borrow_mut().go_back().map_err(js_error)?;
        Ok(activation_to_promise(activation))
    }

    /// JSON snapshot of the panel states.
    pub fn state(&self) -> Result<String, JsValue> {
        self.core.borrow().state_json().map_err(js_error)
    }
}
