use std::fmt;

/// Identifies a window created by an [`Environment`](crate::Environment).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowId(pub(crate) u64);

impl WindowId {
    /// Returns the raw value of the identifier.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("WindowId").field(&self.0).finish()
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// An event received from the windowing system or emitted by the application lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Something happened to one of the windows.
    Window {
        /// The window the event is about.
        window: WindowId,
        /// What happened.
        event: WindowEvent,
    },

    /// The application lifecycle moved (or is about to move).
    App(AppEvent),
}

impl Event {
    /// Returns whether a dispatcher may veto this event by stopping its propagation.
    #[inline]
    pub fn is_cancellable(&self) -> bool {
        matches!(self, Self::App(AppEvent::Starting | AppEvent::Stopping))
    }
}

/// An event about a single window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowEvent {
    /// The user requested the window to close itself.
    ///
    /// # Note
    ///
    /// The window won't be closed automatically. It is the responsibility of the application to
    /// close the window (or stop the application) when the event is received.
    Closed,

    /// The window received the keyboard focus.
    FocusReceived,

    /// The window lost the keyboard focus.
    FocusLost,

    /// The window has been moved.
    Moved {
        /// The new X position of the client area, in pixels.
        x: i32,
        /// The new Y position of the client area, in pixels.
        y: i32,
    },

    /// The window has been resized.
    ///
    /// Both dimensions are clamped to zero when the system reports a negative value.
    Resized {
        /// The new width of the client area, in pixels.
        width: u32,
        /// The new height of the client area, in pixels.
        height: u32,
    },

    /// The window has been activated by a plain activation request.
    Shown,

    /// The window has been deactivated, or activated in any other way.
    Hidden,
}

/// An event about the lifecycle of the message loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppEvent {
    /// The message loop is about to start. Stopping the propagation of this hook prevents it.
    Starting,
    /// The message loop started.
    Started,
    /// The message loop is about to stop. Stopping the propagation of this hook prevents it.
    Stopping,
    /// The message loop stopped.
    Stopped,
}

/// Whether an event should keep propagating after a listener saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Propagation {
    /// Let the remaining listeners see the event.
    #[default]
    Continue,
    /// Stop here. On a cancellable hook, this vetoes the transition.
    Stop,
}

impl Propagation {
    /// Returns whether the propagation was stopped.
    #[inline]
    pub fn is_stopped(self) -> bool {
        self == Self::Stop
    }
}

/// Delivers events to the application, synchronously.
pub trait Dispatcher {
    /// Dispatches the event and reports whether its propagation was stopped.
    fn dispatch(&mut self, event: &Event) -> Propagation;
}

impl<F> Dispatcher for F
where
    F: FnMut(&Event) -> Propagation,
{
    #[inline]
    fn dispatch(&mut self, event: &Event) -> Propagation {
        self(event)
    }
}

type Listener = Box<dyn FnMut(&Event) -> Propagation>;

/// A list of listeners called in registration order until one of them stops the propagation.
#[derive(Default)]
pub struct EventDispatcher {
    listeners: Vec<Listener>,
}

impl EventDispatcher {
    /// Creates a new, empty [`EventDispatcher`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a listener that sees every event.
    pub fn listen<F>(&mut self, listener: F) -> &mut Self
    where
        F: FnMut(&Event) -> Propagation + 'static,
    {
        self.listeners.push(Box::new(listener));
        self
    }

    /// Returns the number of registered listeners.
    #[inline]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Returns whether no listener is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl Dispatcher for EventDispatcher {
    fn dispatch(&mut self, event: &Event) -> Propagation {
        for listener in &mut self.listeners {
            if listener(event).is_stopped() {
                return Propagation::Stop;
            }
        }

        Propagation::Continue
    }
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
