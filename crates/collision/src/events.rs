use tessera_common::EntityId;

/// Transition between the two pair states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionEventKind {
    /// Separated -> touching.
    Enter,
    /// Touching -> separated.
    Exit,
}

/// A pair transition detected during a collision pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionEvent {
    pub kind: CollisionEventKind,
    pub a: EntityId,
    pub b: EntityId,
}

impl CollisionEvent {
    pub fn enter(a: EntityId, b: EntityId) -> Self {
        Self {
            kind: CollisionEventKind::Enter,
            a,
            b,
        }
    }

    pub fn exit(a: EntityId, b: EntityId) -> Self {
        Self {
            kind: CollisionEventKind::Exit,
            a,
            b,
        }
    }

    /// True if `id` is either side of the pair.
    pub fn involves(&self, id: EntityId) -> bool {
        self.a == id || self.b == id
    }
}

/// Handle returned by [`CollisionListeners::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&CollisionEvent)>;

/// Ordered list of collision callbacks.
///
/// Callbacks run synchronously, in registration order, at the moment a
/// transition is detected.
#[derive(Default)]
pub struct CollisionListeners {
    next_id: u64,
    listeners: Vec<(ListenerId, Listener)>,
}

impl CollisionListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for every transition.
    pub fn subscribe(&mut self, listener: impl FnMut(&CollisionEvent) + 'static) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Register a callback for enter transitions only.
    pub fn on_enter(
        &mut self,
        mut listener: impl FnMut(EntityId, EntityId) + 'static,
    ) -> ListenerId {
        self.subscribe(move |event| {
            if event.kind == CollisionEventKind::Enter {
                listener(event.a, event.b);
            }
        })
    }

    /// Register a callback for exit transitions only.
    pub fn on_exit(
        &mut self,
        mut listener: impl FnMut(EntityId, EntityId) + 'static,
    ) -> ListenerId {
        self.subscribe(move |event| {
            if event.kind == CollisionEventKind::Exit {
                listener(event.a, event.b);
            }
        })
    }

    /// Remove a callback. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Deliver `event` to every callback.
    pub fn emit(&mut self, event: &CollisionEvent) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for CollisionListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollisionListeners")
            .field("count", &self.listeners.len())
            .finish()
    }
}
