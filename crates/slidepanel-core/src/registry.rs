#![forbid(unsafe_code)]

//! Panel registry and transition controller.
//!
//! A panel is a top-level node that fills the popup. The registry keeps, per
//! panel id, an optional constructor and destructor hook plus an ordered list
//! of event [`Binding`]s, and it drives the switch from one panel to another.
//!
//! # Transition contract
//!
//! [`PanelRegistry::activate`] runs synchronously up to the animation:
//!
//! 1. Same panel as the active one: no-op.
//! 2. Unwire every binding of the outgoing panel.
//! 3. Run the incoming panel's constructor.
//! 4. Mark the incoming node active and entering.
//! 5. Start the slide on the incoming node.
//!
//! [`PanelRegistry::finish`] is the completion step, called when the host's
//! animation ends:
//!
//! 6. Wire the incoming panel's bindings, drop the outgoing active marker and
//!    the incoming entering marker, then run the outgoing destructor.
//!
//! Outgoing listeners are detached before anything moves and incoming ones are
//! attached only after the slide has settled, so neither panel reacts to input
//! while half visible.
//!
//! # Invariants
//!
//! 1. Settled: exactly one registered panel bears the active marker.
//! 2. In flight: exactly two do (outgoing and incoming), and the incoming one
//!    also bears the entering marker.
//! 3. A panel's bindings are wired to the host iff the panel is live. Bindings
//!    stay in the registry across deactivation.
//! 4. At most one transition is in flight.
//!
//! # Failure Modes
//!
//! - Unregistered id: [`PanelError::UnknownPanel`].
//! - Target node missing from the document: [`PanelError::NodeNotFound`].
//! - Second `activate` before `finish`: [`PanelError::TransitionInFlight`].
//! - Binding target missing from the document: silently skipped.
//! - Host fails to mark or animate the incoming panel: the activation is
//!   rolled back (markers stripped, incoming destructed, outgoing rewired)
//!   and the error is returned.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, debug_span, trace, warn};

use crate::binding::{Binding, Handler};
use crate::config::PanelConfig;
use crate::direction::SlideDirection;
use crate::error::PanelError;
use crate::host::{AnimationId, PanelHost};
use crate::transition::{Settled, Transition, TransitionSignal};

/// Lifecycle hook run on activation or deactivation.
pub type Hook = Box<dyn FnMut()>;

/// Where a panel is in its display lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelPhase {
    /// Not displayed.
    Inactive,
    /// Sliding in; bindings not yet wired.
    Entering,
    /// Displayed and settled.
    Active,
    /// Still marked active while the next panel slides over it; bindings
    /// already unwired.
    Exiting,
}

impl PanelPhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::Entering => "entering",
            Self::Active => "active",
            Self::Exiting => "exiting",
        }
    }
}

impl fmt::Display for PanelPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for [`PanelRegistry::register`].
#[derive(Default)]
pub struct RegisterOptions {
    /// Run every time the panel becomes active.
    pub constructor: Option<Hook>,
    /// Run every time the panel stops being active, after the slide ends.
    pub destructor: Option<Hook>,
    /// Display this panel immediately. At most one panel may be initial.
    pub initial: bool,
}

impl RegisterOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn constructor(mut self, hook: impl FnMut() + 'static) -> Self {
        self.constructor = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn destructor(mut self, hook: impl FnMut() + 'static) -> Self {
        self.destructor = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn initial(mut self) -> Self {
        self.initial = true;
        self
    }
}

impl fmt::Debug for RegisterOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterOptions")
            .field("constructor", &self.constructor.is_some())
            .field("destructor", &self.destructor.is_some())
            .field("initial", &self.initial)
            .finish()
    }
}

/// Registry record for one panel.
pub struct PanelEntry {
    constructor: Option<Hook>,
    destructor: Option<Hook>,
    bindings: Vec<Binding>,
    live: bool,
}

impl PanelEntry {
    fn new(constructor: Option<Hook>, destructor: Option<Hook>) -> Self {
        Self {
            constructor,
            destructor,
            bindings: Vec::new(),
            live: false,
        }
    }

    /// Bindings in registration order.
    #[must_use]
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Whether the bindings are currently wired to the host.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.live
    }

    #[must_use]
    pub fn has_constructor(&self) -> bool {
        self.constructor.is_some()
    }

    #[must_use]
    pub fn has_destructor(&self) -> bool {
        self.destructor.is_some()
    }

    fn construct(&mut self) {
        if let Some(hook) = self.constructor.as_mut() {
            hook();
        }
    }

    fn destruct(&mut self) {
        if let Some(hook) = self.destructor.as_mut() {
            hook();
        }
    }

    fn wire_all<H: PanelHost + ?Sized>(&mut self, host: &mut H, panel: &str) {
        for binding in &self.bindings {
            wire(host, panel, binding);
        }
        self.live = true;
    }

    fn unwire_all<H: PanelHost + ?Sized>(&mut self, host: &mut H, panel: &str) {
        for binding in &self.bindings {
            unwire(host, panel, binding);
        }
        self.live = false;
    }
}

impl fmt::Debug for PanelEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelEntry")
            .field("constructor", &self.constructor.is_some())
            .field("destructor", &self.destructor.is_some())
            .field("bindings", &self.bindings)
            .field("live", &self.live)
            .finish()
    }
}

fn wire<H: PanelHost + ?Sized>(host: &mut H, panel: &str, binding: &Binding) {
    if host.listen(&binding.target, &binding.event, &binding.handler) {
        trace!(panel, node = %binding.target, event = %binding.event, "binding wired");
    } else {
        debug!(panel, node = %binding.target, "binding target missing, not wired");
    }
}

fn unwire<H: PanelHost + ?Sized>(host: &mut H, panel: &str, binding: &Binding) {
    if host.unlisten(&binding.target, &binding.event, &binding.handler) {
        trace!(panel, node = %binding.target, event = %binding.event, "binding unwired");
    } else {
        debug!(panel, node = %binding.target, "binding target missing, not unwired");
    }
}

/// Result of [`PanelRegistry::activate`].
#[derive(Debug)]
pub enum Activation {
    /// The panel was already active; nothing happened.
    AlreadyActive,
    /// The slide has started.
    Started(Transition),
}

impl Activation {
    #[must_use]
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::AlreadyActive)
    }

    #[must_use]
    pub fn transition(&self) -> Option<&Transition> {
        match self {
            Self::AlreadyActive => None,
            Self::Started(t) => Some(t),
        }
    }

    #[must_use]
    pub fn into_transition(self) -> Option<Transition> {
        match self {
            Self::AlreadyActive => None,
            Self::Started(t) => Some(t),
        }
    }
}

#[derive(Debug)]
struct InFlight {
    from: String,
    to: String,
    animation: AnimationId,
    signal: Rc<TransitionSignal>,
}

/// Owns every panel of one popup and switches between them.
#[derive(Debug, Default)]
pub struct PanelRegistry {
    config: PanelConfig,
    panels: HashMap<String, PanelEntry>,
    active: Option<String>,
    in_flight: Option<InFlight>,
}

impl PanelRegistry {
    /// Create an empty registry with default markers and timing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: PanelConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn len(&self) -> usize {
        self.panels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    #[must_use]
    pub fn is_registered(&self, id: &str) -> bool {
        self.panels.contains_key(id)
    }

    /// Registered panel ids, sorted.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.panels.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    #[must_use]
    pub fn entry(&self, id: &str) -> Option<&PanelEntry> {
        self.panels.get(id)
    }

    /// Bindings of a panel, in registration order.
    pub fn bindings(&self, id: &str) -> Result<&[Binding], PanelError> {
        self.panels
            .get(id)
            .map(PanelEntry::bindings)
            .ok_or_else(|| PanelError::UnknownPanel(id.to_string()))
    }

    /// The settled active panel. While a transition plays this is still the
    /// outgoing panel.
    #[must_use]
    pub fn active_panel(&self) -> Option<&str> {
        self.active.as_deref()
    }

    #[must_use]
    pub fn is_active(&self, id: &str) -> bool {
        self.active.as_deref() == Some(id)
    }

    #[must_use]
    pub fn in_transition(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Animation the registry is waiting on, if any.
    #[must_use]
    pub fn pending_animation(&self) -> Option<AnimationId> {
        self.in_flight.as_ref().map(|f| f.animation)
    }

    /// Lifecycle phase of a registered panel.
    #[must_use]
    pub fn phase(&self, id: &str) -> Option<PanelPhase> {
        if !self.panels.contains_key(id) {
            return None;
        }
        let phase = match &self.in_flight {
            Some(flight) if flight.to == id => PanelPhase::Entering,
            Some(flight) if flight.from == id => PanelPhase::Exiting,
            _ if self.is_active(id) => PanelPhase::Active,
            _ => PanelPhase::Inactive,
        };
        Some(phase)
    }

    // -----------------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------------

    /// Register a panel. Must happen before any other call naming `id`.
    ///
    /// With `options.initial`, the constructor runs immediately and the node
    /// is marked active. The new entry has no bindings yet, so nothing is
    /// wired; it is live, so bindings added afterwards wire at once.
    ///
    /// Registering an id again replaces its entry. Bindings of the replaced
    /// entry are unwired if they were live.
    pub fn register<H: PanelHost + ?Sized>(
        &mut self,
        host: &mut H,
        id: &str,
        options: RegisterOptions,
    ) -> Result<(), PanelError> {
        if let Some(flight) = self.in_flight.as_ref().filter(|f| f.from == id || f.to == id) {
            return Err(PanelError::TransitionInFlight {
                from: flight.from.clone(),
                to: flight.to.clone(),
            });
        }

        let RegisterOptions {
            constructor,
            destructor,
            initial,
        } = options;
        let mut entry = PanelEntry::new(constructor, destructor);

        if initial {
            if let Some(current) = self.active.as_deref().filter(|current| *current != id) {
                return Err(PanelError::DuplicateInitial {
                    current: current.to_string(),
                    requested: id.to_string(),
                });
            }
            if !host.contains_node(id) {
                return Err(PanelError::NodeNotFound(id.to_string()));
            }
            host.add_class(id, &self.config.active_class)?;
            entry.construct();
            entry.live = true;
            self.active = Some(id.to_string());
        }

        if let Some(mut previous) = self.panels.remove(id) {
            if previous.live {
                previous.unwire_all(host, id);
                entry.live = true;
            }
            debug!(panel = id, "panel re-registered");
        }

        debug!(panel = id, initial, "panel registered");
        self.panels.insert(id.to_string(), entry);
        Ok(())
    }

    /// Adopt the panel the document already marks active.
    ///
    /// Used when the markup ships with one panel pre-marked instead of
    /// registering an initial panel. The adopted panel's bindings are wired
    /// and it becomes the settled active panel. Returns `Ok(None)` when no
    /// node bears the active marker, and [`PanelError::DuplicateInitial`] when
    /// a different panel is already active.
    pub fn adopt_active<H: PanelHost + ?Sized>(
        &mut self,
        host: &mut H,
    ) -> Result<Option<String>, PanelError> {
        if let Some(flight) = &self.in_flight {
            return Err(PanelError::TransitionInFlight {
                from: flight.from.clone(),
                to: flight.to.clone(),
            });
        }
        let Some(id) = host.find_marked(&self.config.active_class) else {
            debug!("no pre-marked panel to adopt");
            return Ok(None);
        };
        if let Some(current) = self.active.as_deref().filter(|current| *current != id) {
            return Err(PanelError::DuplicateInitial {
                current: current.to_string(),
                requested: id,
            });
        }
        let entry = self
            .panels
            .get_mut(&id)
            .ok_or_else(|| PanelError::UnknownPanel(id.clone()))?;
        if !entry.live {
            entry.wire_all(host, &id);
        }
        debug!(panel = %id, "adopted pre-marked panel");
        self.active = Some(id.clone());
        Ok(Some(id))
    }

    // -----------------------------------------------------------------------
    // Bindings
    // -----------------------------------------------------------------------

    /// Append a binding to a panel; wire it now if the panel is live.
    ///
    /// Not idempotent: adding the same triple twice wires it twice on a live
    /// panel, and both must be removed separately.
    pub fn add_event<H: PanelHost + ?Sized>(
        &mut self,
        host: &mut H,
        id: &str,
        target: &str,
        event: &str,
        handler: Handler,
    ) -> Result<(), PanelError> {
        let entry = self
            .panels
            .get_mut(id)
            .ok_or_else(|| PanelError::UnknownPanel(id.to_string()))?;
        let binding = Binding::new(target, event, handler);
        if entry.live {
            wire(host, id, &binding);
        }
        entry.bindings.push(binding);
        Ok(())
    }

    /// Remove the first binding matching `(target, event, handler)`.
    ///
    /// Returns `Ok(false)` when nothing matched; the registry is unchanged.
    pub fn remove_event<H: PanelHost + ?Sized>(
        &mut self,
        host: &mut H,
        id: &str,
        target: &str,
        event: &str,
        handler: &Handler,
    ) -> Result<bool, PanelError> {
        let entry = self
            .panels
            .get_mut(id)
            .ok_or_else(|| PanelError::UnknownPanel(id.to_string()))?;
        let Some(index) = entry
            .bindings
            .iter()
            .position(|b| b.matches(target, event, handler))
        else {
            return Ok(false);
        };
        let binding = entry.bindings.remove(index);
        if entry.live {
            unwire(host, id, &binding);
        }
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// Start switching the display to panel `id`.
    ///
    /// Runs steps 1 to 5 of the transition contract and returns the
    /// [`Transition`] to await. The host must call [`finish`](Self::finish)
    /// with the returned animation id when the slide ends.
    pub fn activate<H: PanelHost + ?Sized>(
        &mut self,
        host: &mut H,
        id: &str,
        direction: SlideDirection,
    ) -> Result<Activation, PanelError> {
        let _span = debug_span!("panel.activate", panel = id, direction = direction.as_str())
            .entered();

        if !self.panels.contains_key(id) {
            return Err(PanelError::UnknownPanel(id.to_string()));
        }
        if let Some(flight) = &self.in_flight {
            return Err(PanelError::TransitionInFlight {
                from: flight.from.clone(),
                to: flight.to.clone(),
            });
        }
        if !host.contains_node(id) {
            return Err(PanelError::NodeNotFound(id.to_string()));
        }
        let Some(from) = self.active.clone() else {
            return Err(PanelError::NoActivePanel);
        };
        if from == id {
            debug!(panel = id, "already active");
            return Ok(Activation::AlreadyActive);
        }

        if let Some(outgoing) = self.panels.get_mut(&from) {
            outgoing.unwire_all(host, &from);
        }
        if let Some(incoming) = self.panels.get_mut(id) {
            incoming.construct();
        }

        let animation = match self.start_slide(host, id, direction) {
            Ok(animation) => animation,
            Err(err) => {
                self.roll_back(host, &from, id);
                return Err(err);
            }
        };

        debug!(from = %from, to = id, %animation, "transition started");

        let signal = TransitionSignal::new();
        self.in_flight = Some(InFlight {
            from: from.clone(),
            to: id.to_string(),
            animation,
            signal: Rc::clone(&signal),
        });
        Ok(Activation::Started(Transition::new(
            animation,
            direction,
            from,
            id.to_string(),
            signal,
        )))
    }

    fn start_slide<H: PanelHost + ?Sized>(
        &self,
        host: &mut H,
        id: &str,
        direction: SlideDirection,
    ) -> Result<AnimationId, PanelError> {
        host.add_class(id, &self.config.entering_class)?;
        host.add_class(id, &self.config.active_class)?;
        let keyframes = direction.keyframes(self.config.slide_distance_percent);
        Ok(host.animate(id, &keyframes, self.config.slide_duration())?)
    }

    /// Undo steps 2 to 4 after the slide failed to start: strip the incoming
    /// markers, destruct the incoming panel and rewire the outgoing one.
    fn roll_back<H: PanelHost + ?Sized>(&mut self, host: &mut H, from: &str, to: &str) {
        for class in [&self.config.entering_class, &self.config.active_class] {
            if let Err(err) = host.remove_class(to, class) {
                warn!(panel = to, class = %class, error = %err, "marker not cleared on rollback");
            }
        }
        if let Some(incoming) = self.panels.get_mut(to) {
            incoming.destruct();
        }
        if let Some(outgoing) = self.panels.get_mut(from) {
            outgoing.wire_all(host, from);
        }
        warn!(from, to, "slide did not start, activation rolled back");
    }

    /// Complete the transition driven by `animation`.
    ///
    /// Wires the incoming bindings, clears the transient markers, runs the
    /// outgoing destructor and resolves the [`Transition`].
    pub fn finish<H: PanelHost + ?Sized>(
        &mut self,
        host: &mut H,
        animation: AnimationId,
    ) -> Result<Settled, PanelError> {
        let Some(flight) = self.in_flight.take_if(|f| f.animation == animation) else {
            return Err(PanelError::UnknownAnimation(animation));
        };
        let InFlight {
            from, to, signal, ..
        } = flight;
        let _span = debug_span!("panel.finish", from = %from, to = %to).entered();

        if let Some(incoming) = self.panels.get_mut(&to) {
            incoming.wire_all(host, &to);
        }
        self.active = Some(to.clone());

        let outgoing_cleared = host.remove_class(&from, &self.config.active_class);
        let incoming_cleared = host.remove_class(&to, &self.config.entering_class);

        if let Some(outgoing) = self.panels.get_mut(&from) {
            outgoing.destruct();
        }

        let settled = Settled { from, to };
        debug!(from = %settled.from, to = %settled.to, "transition settled");
        signal.resolve(settled.clone());

        outgoing_cleared?;
        incoming_cleared?;
        Ok(settled)
    }
}
