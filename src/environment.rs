use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::{
    bridge, AppEvent, Dispatcher, Error, Event, EventDispatcher, Fetch, InstanceHandle,
    NativePlatform, Platform, Window, WindowClassRegistrar, WindowCreateInfo, WindowId,
};

/// Keeps the calling thread initialized for apartment-threaded COM.
///
/// The apartment is uninitialized when the guard is dropped.
struct Apartment<P: Platform> {
    platform: P,
}

impl<P: Platform> Apartment<P> {
    fn initialize(platform: P) -> Result<Self, Error> {
        platform.initialize_apartment()?;
        log::debug!("initialized apartment-threaded COM");
        Ok(Self { platform })
    }
}

impl<P: Platform> Drop for Apartment<P> {
    fn drop(&mut self) {
        log::debug!("uninitializing apartment-threaded COM");
        self.platform.uninitialize_apartment();
    }
}

/// The native resources of an environment, acquired before it takes ownership of a dispatcher.
pub(crate) struct Parts<P: Platform> {
    platform: P,
    instance: InstanceHandle,
    message: P::Message,
    classes: WindowClassRegistrar<P>,
    apartment: Apartment<P>,
}

impl<P: Platform> Parts<P> {
    /// Acquires every native resource, releasing the ones already acquired on failure.
    pub(crate) fn new(platform: P) -> Result<Self, Error> {
        let apartment = Apartment::initialize(platform.clone())?;
        let instance = platform.module_handle()?;
        let message = platform.new_message();
        let classes = WindowClassRegistrar::new(platform.clone());

        Ok(Self {
            platform,
            instance,
            message,
            classes,
            apartment,
        })
    }
}

#[derive(Debug, Default)]
struct LoopState {
    running: Cell<bool>,
    stop_requested: Cell<bool>,
}

/// A handle on the message loop of an [`Environment`].
///
/// Listeners cannot reach the environment while it is pumping messages; they capture a
/// [`LoopControl`] instead and use it to ask the loop to stop.
#[derive(Debug, Clone, Default)]
pub struct LoopControl {
    state: Rc<LoopState>,
}

impl LoopControl {
    /// Returns whether the message loop is running.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.state.running.get()
    }

    /// Asks the message loop to stop once the message being processed is fully handled.
    ///
    /// The request goes through the same `Stopping` hook as [`Environment::stop`] and may be
    /// vetoed. It is ignored when the loop is not running.
    pub fn request_stop(&self) {
        if self.is_running() {
            self.state.stop_requested.set(true);
        }
    }

    /// Returns whether a stop request is waiting to be honoured.
    #[inline]
    pub fn is_stop_requested(&self) -> bool {
        self.state.stop_requested.get()
    }

    fn set_running(&self, yes: bool) {
        self.state.running.set(yes);
    }

    fn take_stop_request(&self) -> bool {
        self.state.stop_requested.replace(false)
    }
}

/// Owns the native resources of the process and drives the message loop.
///
/// Dropping the environment destroys the remaining windows, unregisters their classes and
/// finally uninitializes COM.
pub struct Environment<P: Platform = NativePlatform, D: Dispatcher = EventDispatcher> {
    platform: P,
    dispatcher: D,
    instance: InstanceHandle,
    message: P::Message,
    windows: HashMap<WindowId, Window>,
    next_window: u64,
    control: LoopControl,
    classes: WindowClassRegistrar<P>,
    // Dropped last.
    _apartment: Apartment<P>,
}

impl<D: Dispatcher> Environment<NativePlatform, D> {
    /// Creates a new [`Environment`] on top of the native platform of the current system.
    pub fn native(dispatcher: D) -> Result<Self, Error> {
        Self::new(NativePlatform::default(), dispatcher)
    }
}

impl<P: Platform, D: Dispatcher> Environment<P, D> {
    /// Creates a new [`Environment`].
    ///
    /// Initializes COM for the calling thread and acquires the module handle. Failures are fatal
    /// and leave nothing initialized.
    pub fn new(platform: P, dispatcher: D) -> Result<Self, Error> {
        Ok(Self::from_parts(Parts::new(platform)?, dispatcher))
    }

    pub(crate) fn from_parts(parts: Parts<P>, dispatcher: D) -> Self {
        let Parts {
            platform,
            instance,
            message,
            classes,
            apartment,
        } = parts;

        Self {
            platform,
            dispatcher,
            instance,
            message,
            windows: HashMap::new(),
            next_window: 1,
            control: LoopControl::default(),
            classes,
            _apartment: apartment,
        }
    }

    /// Registers a window class for a new window, then creates the window.
    pub fn create(&mut self, info: &WindowCreateInfo) -> Result<WindowId, Error> {
        let id = WindowId(self.next_window);
        self.next_window += 1;

        let class = self.classes.create(info, self.instance, id)?;

        let platform = &self.platform;
        let instance = self.instance;
        let class_name = class.id();

        // Events sent while the window is being created are delivered right away.
        let handle = bridge::with_dispatcher(&mut self.dispatcher, || {
            bridge::adopting(id, || platform.create_window(class_name, info, instance))
        })
        .map_err(|source| Error::WindowNotCreatable {
            reason: "could not create window",
            source,
        })?;

        bridge::bind(handle, id);

        log::debug!(
            "created window {id} (`{}`, {}x{}, debug: {})",
            info.title,
            info.width,
            info.height,
            info.debug
        );

        self.windows.insert(
            id,
            Window {
                id,
                handle,
                info: info.clone(),
                class,
            },
        );

        Ok(id)
    }

    /// Destroys a window and unregisters its class.
    ///
    /// Events the remaining windows receive meanwhile (activation, focus) are delivered.
    /// Returns `false` if the window does not exist (anymore).
    pub fn close(&mut self, window: WindowId) -> bool {
        match self.windows.remove(&window) {
            Some(window) => {
                let platform = &self.platform;
                bridge::with_dispatcher(&mut self.dispatcher, || {
                    destroy_window(platform, window)
                });
                true
            }
            None => false,
        }
    }

    /// Returns the window identified by `id`.
    #[inline]
    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.windows.get(&id)
    }

    /// Returns an iterator over the live windows, in no particular order.
    pub fn windows(&self) -> impl Iterator<Item = &Window> {
        self.windows.values()
    }

    /// Runs the message loop until [`stop`](Self::stop) is accepted.
    ///
    /// Does nothing if the loop is already running, or if the `Starting` hook is vetoed.
    pub fn run(&mut self) -> Result<(), Error> {
        if self.is_running() {
            return Ok(());
        }

        if !self.dispatch_starting() {
            log::debug!("start vetoed");
            return Ok(());
        }

        self.control.take_stop_request();
        self.control.set_running(true);
        log::debug!("message loop started");

        while self.is_running() {
            self.pump()?;
            self.platform.yield_now();

            if self.control.take_stop_request() {
                self.stop();
            }
        }

        Ok(())
    }

    /// Waits for the next message, then dispatches it to its window procedure.
    fn pump(&mut self) -> Result<(), Error> {
        match self.platform.next_message(&mut self.message) {
            Fetch::Message => {
                let platform = &self.platform;
                let message = &self.message;
                bridge::with_dispatcher(&mut self.dispatcher, || {
                    platform.dispatch_message(message)
                });
            }
            Fetch::Quit => {
                log::debug!("received a quit message");
                self.control.request_stop();
            }
            Fetch::Failed(err) => {
                log::error!("could not retrieve the next message: {err}");
                self.control.set_running(false);
                return Err(err.into());
            }
        }

        Ok(())
    }

    /// Asks the message loop to stop.
    ///
    /// Does nothing if the loop is not running, or if the `Stopping` hook is vetoed. The loop
    /// exits once the message being processed is fully handled.
    pub fn stop(&mut self) {
        if !self.is_running() {
            return;
        }

        if !self.dispatch_stopping() {
            log::debug!("stop vetoed");
            return;
        }

        self.control.set_running(false);
        log::debug!("message loop stopped");
    }

    /// Returns whether the message loop is running.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.control.is_running()
    }

    /// Returns a handle listeners may use to stop the message loop.
    #[inline]
    pub fn control(&self) -> LoopControl {
        self.control.clone()
    }

    /// The handle of the module owning the windows.
    #[inline]
    pub fn instance(&self) -> InstanceHandle {
        self.instance
    }

    /// The platform the environment runs on.
    #[inline]
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// The dispatcher receiving the events.
    #[inline]
    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    /// The dispatcher receiving the events.
    #[inline]
    pub fn dispatcher_mut(&mut self) -> &mut D {
        &mut self.dispatcher
    }

    /// Dispatches the `Starting` hook, then `Started` unless the hook was vetoed.
    ///
    /// Returns whether the loop should start.
    fn dispatch_starting(&mut self) -> bool {
        if self
            .dispatcher
            .dispatch(&Event::App(AppEvent::Starting))
            .is_stopped()
        {
            return false;
        }

        self.dispatcher.dispatch(&Event::App(AppEvent::Started));
        true
    }

    /// Dispatches the `Stopping` hook, then `Stopped` unless the hook was vetoed.
    ///
    /// Returns whether the loop should stop.
    fn dispatch_stopping(&mut self) -> bool {
        if self
            .dispatcher
            .dispatch(&Event::App(AppEvent::Stopping))
            .is_stopped()
        {
            return false;
        }

        self.dispatcher.dispatch(&Event::App(AppEvent::Stopped));
        true
    }
}

impl<P: Platform, D: Dispatcher> Drop for Environment<P, D> {
    fn drop(&mut self) {
        for window in std::mem::take(&mut self.windows).into_values() {
            destroy_window(&self.platform, window);
        }
    }
}

impl<P: Platform, D: Dispatcher> fmt::Debug for Environment<P, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("instance", &self.instance)
            .field("windows", &self.windows.len())
            .field("running", &self.is_running())
            .field("classes", &self.classes)
            .finish_non_exhaustive()
    }
}

/// Destroys the native window, then releases its class.
fn destroy_window<P: Platform>(platform: &P, window: Window) {
    bridge::forget(window.handle);
    platform.destroy_window(window.handle);
    log::debug!("destroyed window {}", window.id);
    drop(window);
}
