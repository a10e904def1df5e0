//! The state shared between the environment and the (stateless) native window procedure.
//!
//! The window procedure can only find its way back to the application through thread-local
//! state: a table mapping native window handles to [`WindowId`]s, and the dispatcher installed
//! for the duration of the native calls that may re-enter it.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};

use crate::{Dispatcher, Event, Message, RawHandle, Reply, WindowId};

thread_local! {
    static WINDOWS: RefCell<HashMap<RawHandle, WindowId>> = RefCell::new(HashMap::new());
    static ADOPTING: Cell<Option<WindowId>> = Cell::new(None);
    static ADOPTED: RefCell<Vec<RawHandle>> = RefCell::new(Vec::new());
    static SINK: Cell<Option<Sink>> = Cell::new(None);
    static PENDING: RefCell<VecDeque<Event>> = RefCell::new(VecDeque::new());
    static DRAINING: Cell<bool> = Cell::new(false);
}

/// A type-erased pointer to the installed dispatcher.
#[derive(Clone, Copy)]
struct Sink {
    /// # Safety
    ///
    /// This function expects the `state` parameter to be a pointer to the associated
    /// `handler_state`.
    handler_fn: unsafe fn(state: *mut (), event: &Event),
    handler_state: *mut (),
}

/// Associates a native window handle with a window.
pub(crate) fn bind(hwnd: RawHandle, window: WindowId) {
    WINDOWS.with(|windows| windows.borrow_mut().insert(hwnd, window));
}

/// Removes a native window handle from the table. Its messages reach the default procedure from
/// now on.
pub(crate) fn forget(hwnd: RawHandle) {
    WINDOWS.with(|windows| windows.borrow_mut().remove(&hwnd));
}

/// Returns the window bound to `hwnd`, if any.
pub(crate) fn lookup(hwnd: RawHandle) -> Option<WindowId> {
    if let Some(window) = WINDOWS.with(|windows| windows.borrow().get(&hwnd).copied()) {
        return Some(window);
    }

    // The system sends a few messages before `CreateWindowExW` returns the handle.
    let window = ADOPTING.with(Cell::get)?;
    bind(hwnd, window);
    ADOPTED.with(|adopted| adopted.borrow_mut().push(hwnd));
    Some(window)
}

/// Attributes messages received by unknown handles to `window` while `f` runs.
///
/// When `f` fails, the handles adopted in the meantime are forgotten again.
pub(crate) fn adopting<T, E>(
    window: WindowId,
    f: impl FnOnce() -> Result<T, E>,
) -> Result<T, E> {
    struct Guard(Option<WindowId>);

    impl Drop for Guard {
        fn drop(&mut self) {
            ADOPTING.with(|adopting| adopting.set(self.0));
        }
    }

    let before = ADOPTED.with(|adopted| adopted.borrow().len());

    let result = {
        let _guard = Guard(ADOPTING.with(|adopting| adopting.replace(Some(window))));
        f()
    };

    let adopted = ADOPTED.with(|adopted| adopted.borrow_mut().split_off(before));
    if result.is_err() {
        for hwnd in adopted {
            forget(hwnd);
        }
    }

    result
}

/// Installs `dispatcher` as the destination of window events while `f` runs.
pub(crate) fn with_dispatcher<D, R>(dispatcher: &mut D, f: impl FnOnce() -> R) -> R
where
    D: Dispatcher,
{
    unsafe fn handler_fn<D: Dispatcher>(state: *mut (), event: &Event) {
        let dispatcher = unsafe { &mut *(state as *mut D) };
        dispatcher.dispatch(event);
    }

    /// Restores the previous sink, even if `f` panics, so that the window procedure never calls
    /// into a dangling dispatcher.
    struct Guard(Option<Sink>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK.with(|sink| sink.set(self.0));
        }
    }

    let sink = Sink {
        handler_fn: handler_fn::<D>,
        handler_state: dispatcher as *mut D as *mut (),
    };

    let _guard = Guard(SINK.with(|current| current.replace(Some(sink))));
    f()
}

/// Queues an event for the installed dispatcher.
///
/// Events raised while the dispatcher is running are delivered after it returns.
pub(crate) fn emit(event: Event) {
    PENDING.with(|pending| pending.borrow_mut().push_back(event));

    if DRAINING.with(|draining| draining.replace(true)) {
        return;
    }

    while let Some(event) = PENDING.with(|pending| pending.borrow_mut().pop_front()) {
        match SINK.with(Cell::get) {
            // SAFETY:
            //  The sink is only installed by `with_dispatcher`, which removes it before the
            //  dispatcher it points to can be used again.
            Some(sink) => unsafe { (sink.handler_fn)(sink.handler_state, &event) },
            None => log::trace!("no dispatcher installed, dropping {event:?}"),
        }
    }

    DRAINING.with(|draining| draining.set(false));
}

/// The platform-independent part of the window procedure.
///
/// Decodes the message, emits the event it produces and tells the caller whether the default
/// window procedure must be called.
pub fn handle_message(hwnd: RawHandle, msg: u32, wparam: usize, lparam: isize) -> Reply {
    let Some(window) = lookup(hwnd) else {
        return Reply::Default;
    };

    let message = Message::decode(msg, wparam, lparam);
    let (event, reply) = message.translate();

    log::trace!("window {window}: {message:?}");

    if let Some(event) = event {
        emit(Event::Window { window, event });
    }

    reply
}
