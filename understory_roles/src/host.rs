// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host that owns role bindings and routes activations to them.

use alloc::{boxed::Box, string::String, vec::Vec};
use core::any::Any;

use kurbo::Point;
use log::{debug, trace, warn};
use understory_dom::{Document, NodeId, locate};
use understory_responder::adapters::dom::dispatch_for;
use understory_responder::click::{ClickResult, ClickState};
use understory_responder::dispatcher;
use understory_responder::listeners::ListenerTable;
use understory_responder::types::{EventKind, Outcome};

use crate::error::BindError;
use crate::options::options_from_markup;
use crate::registry::{BindingId, Command, Ctx, Handler, Role, RoleRegistry, RoleSpec};

#[derive(Debug)]
struct Binding {
    generation: u32,
    element: NodeId,
    name: Box<str>,
    /// `None` while the role is handling a command.
    role: Option<Box<dyn Role>>,
}

/// Owns a [`RoleRegistry`], every live binding and the listeners they
/// registered.
///
/// Controllers never see the host; they receive a [`Ctx`] scoped to their own
/// binding. A command that arrives for a binding that is already handling one
/// is dropped.
#[derive(Debug)]
pub struct Roles {
    registry: RoleRegistry,
    listeners: ListenerTable<NodeId, Handler>,
    bindings: Vec<Option<Binding>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    clicks: ClickState<NodeId>,
}

impl Default for Roles {
    fn default() -> Self {
        Self::new(RoleRegistry::with_builtins())
    }
}

impl Roles {
    /// Create a host resolving role names through `registry`.
    pub fn new(registry: RoleRegistry) -> Self {
        Self {
            registry,
            listeners: ListenerTable::new(),
            bindings: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            clicks: ClickState::new(),
        }
    }

    /// The registry used by [`Roles::add_role`].
    pub fn registry(&self) -> &RoleRegistry {
        &self.registry
    }

    /// Mutable access to the registry, to register host-defined roles.
    pub fn registry_mut(&mut self) -> &mut RoleRegistry {
        &mut self.registry
    }

    /// Bind `R` to `el` with explicit options, or with options discovered in
    /// markup when `options` is `None`.
    pub fn bind<R: RoleSpec>(
        &mut self,
        doc: &mut Document,
        el: NodeId,
        options: Option<R::Options>,
    ) -> Result<BindingId, BindError> {
        if !doc.is_alive(el) {
            return Err(BindError::Stale(el));
        }
        let options = match options {
            Some(options) => options,
            None => options_from_markup(doc, el, R::NAME),
        };
        let binding = self.reserve(el, R::NAME);
        let made = {
            let mut ctx = Ctx::new(doc, &mut self.listeners, binding);
            R::bind(&mut ctx, el, options).map(|role| Box::new(role) as Box<dyn Role>)
        };
        self.finish_bind(doc, binding, made)
    }

    /// Bind the role registered under `name` to `el`, configured from markup.
    pub fn add_role(
        &mut self,
        doc: &mut Document,
        el: NodeId,
        name: &str,
    ) -> Result<BindingId, BindError> {
        if !doc.is_alive(el) {
            return Err(BindError::Stale(el));
        }
        if !self.registry.contains(name) {
            return Err(BindError::UnknownRole(name.into()));
        }
        let binding = self.reserve(el, name);
        let made = match self.registry.factory(name) {
            Some(factory) => {
                let mut ctx = Ctx::new(doc, &mut self.listeners, binding);
                factory(&mut ctx, el)
            }
            None => Err(BindError::UnknownRole(name.into())),
        };
        self.finish_bind(doc, binding, made)
    }

    /// Bind every registered role listed on `el`'s `role` attribute.
    ///
    /// Unregistered tokens are skipped; they may be purely semantic.
    pub fn apply(&mut self, doc: &mut Document, el: NodeId) -> Vec<Result<BindingId, BindError>> {
        let tokens: Vec<String> = doc.roles(el).iter().map(String::from).collect();
        let mut results = Vec::new();
        for token in tokens {
            if self.registry.contains(&token) {
                results.push(self.add_role(doc, el, &token));
            } else {
                debug!("no behavior registered for role `{token}`");
            }
        }
        results
    }

    /// Apply roles to the role-bearing descendants of `root` (all of them when
    /// `deep`, otherwise only the outermost ones), then to `root` itself.
    ///
    /// Failures are logged and skipped; the successful bindings are returned.
    pub fn auto(&mut self, doc: &mut Document, root: NodeId, deep: bool) -> Vec<BindingId> {
        let mut targets = locate::scan_roles(doc, root, deep);
        targets.push(root);
        let mut bound = Vec::new();
        for el in targets {
            for result in self.apply(doc, el) {
                match result {
                    Ok(id) => bound.push(id),
                    Err(err) => warn!("failed to bind role on {el:?}: {err}"),
                }
            }
        }
        bound
    }

    /// Tear down a binding: the role releases its references, then any
    /// listener it left behind is detached. Returns false for stale ids.
    pub fn unbind(&mut self, doc: &mut Document, binding: BindingId) -> bool {
        let Some(mut role) = self.take_role(binding) else {
            return false;
        };
        let mut ctx = Ctx::new(doc, &mut self.listeners, binding);
        role.unbind(&mut ctx);
        self.release(binding);
        true
    }

    /// Returns true if `binding` is live.
    pub fn is_bound(&self, binding: BindingId) -> bool {
        self.slot(binding).is_some()
    }

    /// Element a binding is attached to.
    pub fn element_of(&self, binding: BindingId) -> Option<NodeId> {
        self.slot(binding).map(|b| b.element)
    }

    /// Role name a binding was created for.
    pub fn role_of(&self, binding: BindingId) -> Option<&str> {
        self.slot(binding).map(|b| &*b.name)
    }

    /// Live bindings attached to `el`, oldest first.
    pub fn bindings_on(&self, el: NodeId) -> Vec<BindingId> {
        self.bindings
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| {
                let b = slot.as_ref()?;
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "BindingId uses 32-bit indices by design."
                )]
                let id = BindingId(idx as u32, b.generation);
                (b.element == el).then_some(id)
            })
            .collect()
    }

    /// Number of listeners currently attached by all bindings.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Shared access to a bound controller of type `R`.
    pub fn get<R: Role>(&self, binding: BindingId) -> Option<&R> {
        let role: &dyn Any = self.slot(binding)?.role.as_deref()?;
        role.downcast_ref::<R>()
    }

    /// Run `f` against a bound controller of type `R`.
    ///
    /// Returns `None` if the binding is stale, busy, or not an `R`.
    pub fn with<R: Role, T>(
        &mut self,
        doc: &mut Document,
        binding: BindingId,
        f: impl FnOnce(&mut R, &mut Ctx<'_>) -> T,
    ) -> Option<T> {
        let mut role = self.take_role(binding)?;
        let out = {
            let any: &mut dyn Any = &mut *role;
            any.downcast_mut::<R>().map(|r| {
                let mut ctx = Ctx::new(doc, &mut self.listeners, binding);
                f(r, &mut ctx)
            })
        };
        self.restore_role(binding, role);
        out
    }

    /// Activate `target`, as a click or key press would.
    ///
    /// Returns how many listeners ran.
    pub fn activate(&mut self, doc: &mut Document, target: NodeId) -> usize {
        self.dispatch(doc, target, EventKind::Activate)
    }

    /// Route an event of `kind` from the root to `target` and back.
    pub fn dispatch(&mut self, doc: &mut Document, target: NodeId, kind: EventKind) -> usize {
        let seq = dispatch_for(doc, target);
        let mut invoked = 0;
        dispatcher::run(&seq, &mut invoked, |d, invoked| {
            let mut outcome = Outcome::Continue;
            for id in self.listeners.matching(&d.node, kind, d.phase) {
                // An earlier handler may have detached this one.
                let Some(handler) = self.listeners.get(id).map(|l| l.payload) else {
                    continue;
                };
                *invoked += 1;
                if self.invoke(doc, handler.binding, handler.command) == Outcome::Stop {
                    outcome = Outcome::Stop;
                }
            }
            outcome
        });
        invoked
    }

    /// Primary button pressed over `target`.
    pub fn pointer_down(&mut self, target: NodeId, position: Point, timestamp: u64) {
        self.clicks.on_down(None, None, target, position, timestamp);
    }

    /// Pointer moved while the primary button is held. Once it wanders past
    /// the click tolerance, only a release over the pressed node still clicks.
    pub fn pointer_move(&mut self, position: Point) {
        if let Some(pressed) = self.clicks.on_move(None, position) {
            trace!("press on {pressed:?} left the click tolerance");
        }
    }

    /// Primary button released over `target`; activates the pressed node if
    /// the press and release form a click. Returns how many listeners ran.
    pub fn pointer_up(
        &mut self,
        doc: &mut Document,
        target: NodeId,
        position: Point,
        timestamp: u64,
    ) -> usize {
        match self.clicks.on_up(None, None, &target, position, timestamp) {
            ClickResult::Click(pressed) if doc.is_alive(pressed) => self.activate(doc, pressed),
            ClickResult::Click(_) | ClickResult::Suppressed(_) => 0,
        }
    }

    fn invoke(&mut self, doc: &mut Document, binding: BindingId, command: Command) -> Outcome {
        let Some(mut role) = self.take_role(binding) else {
            debug!("dropping {command:?}: binding {binding:?} is busy or gone");
            return Outcome::Continue;
        };
        let outcome = {
            let mut ctx = Ctx::new(doc, &mut self.listeners, binding);
            role.handle(&mut ctx, command)
        };
        self.restore_role(binding, role);
        outcome
    }

    fn finish_bind(
        &mut self,
        doc: &mut Document,
        binding: BindingId,
        made: Result<Box<dyn Role>, BindError>,
    ) -> Result<BindingId, BindError> {
        match made {
            Ok(role) => {
                if let Some(b) = self.slot(binding) {
                    let (el, name) = (b.element, b.name.clone());
                    doc.remove_role(el, &name);
                    debug!("bound `{name}` to {el:?} as {binding:?}");
                }
                self.restore_role(binding, role);
                Ok(binding)
            }
            Err(err) => {
                self.release(binding);
                Err(err)
            }
        }
    }

    fn reserve(&mut self, element: NodeId, name: &str) -> BindingId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            (idx, generation)
        } else {
            self.bindings.push(None);
            self.generations.push(1);
            (self.bindings.len() - 1, 1)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "BindingId uses 32-bit indices by design."
        )]
        let id = BindingId(idx as u32, generation);
        self.bindings[idx] = Some(Binding {
            generation,
            element,
            name: name.into(),
            role: None,
        });
        id
    }

    fn release(&mut self, binding: BindingId) {
        if self.slot(binding).is_none() {
            return;
        }
        self.bindings[binding.idx()] = None;
        self.free_list.push(binding.idx());
        let leftover = self.listeners.retain(|l| l.payload.binding != binding);
        if leftover > 0 {
            debug!("detached {leftover} listeners left by {binding:?}");
        }
    }

    fn slot(&self, binding: BindingId) -> Option<&Binding> {
        self.bindings
            .get(binding.idx())?
            .as_ref()
            .filter(|b| b.generation == binding.1)
    }

    fn take_role(&mut self, binding: BindingId) -> Option<Box<dyn Role>> {
        self.bindings
            .get_mut(binding.idx())?
            .as_mut()
            .filter(|b| b.generation == binding.1)?
            .role
            .take()
    }

    fn restore_role(&mut self, binding: BindingId, role: Box<dyn Role>) {
        if let Some(b) = self
            .bindings
            .get_mut(binding.idx())
            .and_then(Option::as_mut)
            .filter(|b| b.generation == binding.1)
        {
            b.role = Some(role);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{Configure, parse_flag};
    use crate::tabset::Tabset;
    use understory_dom::Element;
    use understory_responder::types::Listen;

    /// Counts activations passing through its element during capture.
    #[derive(Debug)]
    struct Counter {
        hits: u32,
        stop: bool,
    }

    #[derive(Default)]
    struct CounterOptions {
        stop: bool,
    }

    impl Configure for CounterOptions {
        const KEYS: &'static [&'static str] = &["stop"];

        fn configure(&mut self, key: &str, value: &str) {
            if let Some(stop) = parse_flag(key, value) {
                self.stop = stop;
            }
        }
    }

    impl Role for Counter {
        fn name(&self) -> &'static str {
            "counter"
        }

        fn handle(&mut self, _: &mut Ctx<'_>, command: Command) -> Outcome {
            if let Command::Custom(..) = command {
                self.hits += 1;
            }
            if self.stop {
                Outcome::Stop
            } else {
                Outcome::Continue
            }
        }

        // Leaves its listener behind on purpose; the host cleans up.
        fn unbind(&mut self, _: &mut Ctx<'_>) {}
    }

    impl RoleSpec for Counter {
        const NAME: &'static str = "counter";
        type Options = CounterOptions;

        fn bind(ctx: &mut Ctx<'_>, el: NodeId, options: CounterOptions) -> Result<Self, BindError> {
            ctx.listen_with(el, EventKind::Activate, Listen::Capture, Command::Custom(0, el));
            Ok(Self {
                hits: 0,
                stop: options.stop,
            })
        }
    }

    fn host() -> Roles {
        let mut registry = RoleRegistry::new();
        registry.register::<Counter>();
        Roles::new(registry)
    }

    fn hits(roles: &Roles, binding: BindingId) -> u32 {
        roles.get::<Counter>(binding).map_or(0, |c| c.hits)
    }

    #[test]
    fn capture_listener_can_stop_propagation() {
        let mut doc = Document::new();
        let outer = doc.insert(
            None,
            Element::new("div")
                .with_role("counter")
                .with_attr("data-counter-stop", ""),
        );
        let inner = doc.insert(Some(outer), Element::new("div").with_role("counter"));
        let leaf = doc.insert(Some(inner), Element::new("button"));
        let mut roles = host();
        let bound = roles.auto(&mut doc, outer, true);
        assert_eq!(bound.len(), 2);
        let (inner_b, outer_b) = (bound[0], bound[1]);

        assert_eq!(roles.activate(&mut doc, leaf), 1);
        assert_eq!((hits(&roles, outer_b), hits(&roles, inner_b)), (1, 0));

        assert!(roles.unbind(&mut doc, outer_b));
        assert_eq!(roles.listener_count(), 1);
        assert_eq!(roles.activate(&mut doc, leaf), 1);
        assert_eq!(hits(&roles, inner_b), 1);
    }

    #[test]
    fn apply_binds_registered_tokens_only() {
        let mut doc = Document::new();
        let el = doc.insert(None, Element::new("div").with_role("note counter"));
        let mut roles = host();

        let results = roles.apply(&mut doc, el);
        assert_eq!(results.len(), 1);
        let binding = results[0].clone().unwrap();
        assert_eq!(roles.bindings_on(el), [binding]);
        assert!(!doc.has_role(el, "counter"));
        assert!(doc.has_role(el, "note"));
        // Wrong type, stale or busy bindings give no access.
        assert!(roles.with::<Tabset, _>(&mut doc, binding, |_, _| ()).is_none());
        assert!(roles.with::<Counter, _>(&mut doc, binding, |c, _| c.hits).is_some());
    }

    #[test]
    fn bind_errors() {
        let mut doc = Document::new();
        let el = doc.insert(None, Element::new("div"));
        let mut roles = host();

        assert_eq!(
            roles.add_role(&mut doc, el, "tabset"),
            Err(BindError::UnknownRole("tabset".into()))
        );
        doc.remove(el);
        assert_eq!(
            roles.bind::<Counter>(&mut doc, el, None),
            Err(BindError::Stale(el))
        );
        assert_eq!(roles.listener_count(), 0);
    }
}
