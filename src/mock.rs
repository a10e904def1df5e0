//! A scripted, in-memory [`Platform`] used by the unit tests.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use crate::{
    bridge, ClassDescriptor, ClassResources, Error, Event, EventDispatcher, Fetch,
    InstanceHandle, OsError, Platform, Propagation, RawHandle, Reply, WindowCreateInfo,
    WindowProcedure,
};

pub const INSTANCE: InstanceHandle = InstanceHandle(0x0040_0000);
pub const CURSOR: RawHandle = 0x1001;
pub const ICON: RawHandle = 0x1002;
pub const BRUSH: RawHandle = 0x1003;

thread_local! {
    static DEFAULT_CALLS: Cell<usize> = Cell::new(0);
}

/// A native call made by the code under test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    InitializeApartment,
    UninitializeApartment,
    RegisterClass(String),
    UnregisterClass(String),
    CreateWindow(String),
    DestroyWindow(RawHandle),
    Dispatch(u32),
}

/// The message record of the mock platform.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MockMessage {
    pub hwnd: RawHandle,
    pub msg: u32,
    pub wparam: usize,
    pub lparam: isize,
}

enum Scripted {
    Message(MockMessage),
    Quit,
    Failure(u32),
}

#[derive(Default)]
struct State {
    calls: Vec<Call>,
    classes: HashMap<String, ClassDescriptor>,
    windows: HashMap<RawHandle, String>,
    queue: VecDeque<Scripted>,
    creation_messages: Vec<(u32, usize, isize)>,
    destruction_messages: Vec<(RawHandle, u32, usize, isize)>,
    next_hwnd: RawHandle,
    fetches: usize,
    fail_apartment: bool,
    fail_module_handle: bool,
    fail_class_resources: bool,
    fail_register_class: bool,
    fail_create_window: bool,
}

#[derive(Clone, Default)]
pub struct MockPlatform {
    state: Rc<RefCell<State>>,
}

impl MockPlatform {
    pub fn new() -> Self {
        let platform = Self::default();
        platform.state.borrow_mut().next_hwnd = 0x100;
        platform
    }

    pub fn fail_apartment(&self, yes: bool) {
        self.state.borrow_mut().fail_apartment = yes;
    }

    pub fn fail_module_handle(&self, yes: bool) {
        self.state.borrow_mut().fail_module_handle = yes;
    }

    pub fn fail_class_resources(&self, yes: bool) {
        self.state.borrow_mut().fail_class_resources = yes;
    }

    pub fn fail_register_class(&self, yes: bool) {
        self.state.borrow_mut().fail_register_class = yes;
    }

    pub fn fail_create_window(&self, yes: bool) {
        self.state.borrow_mut().fail_create_window = yes;
    }

    /// Queues a message for the pump.
    pub fn push_message(&self, hwnd: RawHandle, msg: u32, wparam: usize, lparam: isize) {
        let message = MockMessage {
            hwnd,
            msg,
            wparam,
            lparam,
        };
        self.state
            .borrow_mut()
            .queue
            .push_back(Scripted::Message(message));
    }

    /// Queues a quit message. An empty queue also reads as a quit message.
    pub fn push_quit(&self) {
        self.state.borrow_mut().queue.push_back(Scripted::Quit);
    }

    /// Queues a failed fetch.
    pub fn push_failure(&self, code: u32) {
        self.state
            .borrow_mut()
            .queue
            .push_back(Scripted::Failure(code));
    }

    /// Sends a message to every window while it is being created.
    pub fn on_create(&self, msg: u32, wparam: usize, lparam: isize) {
        self.state
            .borrow_mut()
            .creation_messages
            .push((msg, wparam, lparam));
    }

    /// Sends a message to `target` whenever another window is destroyed.
    pub fn on_destroy(&self, target: RawHandle, msg: u32, wparam: usize, lparam: isize) {
        self.state
            .borrow_mut()
            .destruction_messages
            .push((target, msg, wparam, lparam));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|c| *c == call)
            .count()
    }

    /// The currently registered class named `name`.
    pub fn class(&self, name: &str) -> Option<ClassDescriptor> {
        self.state.borrow().classes.get(name).cloned()
    }

    /// The class of a live window.
    pub fn window_class(&self, hwnd: RawHandle) -> Option<String> {
        self.state.borrow().windows.get(&hwnd).cloned()
    }

    /// How many times the pump waited for a message.
    pub fn fetches(&self) -> usize {
        self.state.borrow().fetches
    }

    /// How many scripted entries the pump did not consume.
    pub fn pending_messages(&self) -> usize {
        self.state.borrow().queue.len()
    }

    /// How many messages reached the default window procedure on this thread.
    pub fn default_procedure_calls() -> usize {
        DEFAULT_CALLS.with(Cell::get)
    }

    fn record(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }

    /// Calls the procedure of the class `hwnd` belongs to, like the system would.
    fn send(&self, hwnd: RawHandle, msg: u32, wparam: usize, lparam: isize) {
        let procedure = {
            let state = self.state.borrow();
            state
                .windows
                .get(&hwnd)
                .and_then(|class| state.classes.get(class))
                .and_then(|class| class.procedure)
        };

        if let Some(procedure) = procedure {
            // SAFETY: the mock procedure has no preconditions.
            unsafe { procedure(hwnd, msg, wparam, lparam) };
        }
    }
}

unsafe extern "system" fn procedure(
    hwnd: RawHandle,
    msg: u32,
    wparam: usize,
    lparam: isize,
) -> isize {
    match bridge::handle_message(hwnd, msg, wparam, lparam) {
        Reply::Handled => 0,
        Reply::Default => {
            DEFAULT_CALLS.with(|calls| calls.set(calls.get() + 1));
            0
        }
    }
}

impl Platform for MockPlatform {
    type Message = MockMessage;

    fn is_supported(&self) -> bool {
        true
    }

    fn initialize_apartment(&self) -> Result<(), Error> {
        self.record(Call::InitializeApartment);
        if self.state.borrow().fail_apartment {
            Err(OsError::new("CoInitializeEx", 0x8001_0106).into())
        } else {
            Ok(())
        }
    }

    fn uninitialize_apartment(&self) {
        self.record(Call::UninitializeApartment);
    }

    fn module_handle(&self) -> Result<InstanceHandle, Error> {
        if self.state.borrow().fail_module_handle {
            Err(OsError::new("GetModuleHandleW", 126).into())
        } else {
            Ok(INSTANCE)
        }
    }

    fn class_resources(&self) -> Result<ClassResources, Error> {
        if self.state.borrow().fail_class_resources {
            return Err(Error::StructureAllocation("could not load the default cursor"));
        }

        Ok(ClassResources {
            cursor: CURSOR,
            icon: ICON,
            background: BRUSH,
        })
    }

    fn window_procedure(&self) -> WindowProcedure {
        procedure
    }

    fn register_class(&self, class: &ClassDescriptor) -> Result<(), OsError> {
        self.record(Call::RegisterClass(class.name.clone()));

        let mut state = self.state.borrow_mut();
        if state.fail_register_class || state.classes.contains_key(&class.name) {
            return Err(OsError::new("RegisterClassW", 1410));
        }

        state.classes.insert(class.name.clone(), class.clone());
        Ok(())
    }

    fn unregister_class(&self, name: &str, _instance: InstanceHandle) {
        self.record(Call::UnregisterClass(name.to_owned()));
        self.state.borrow_mut().classes.remove(name);
    }

    fn create_window(
        &self,
        class: &str,
        _info: &WindowCreateInfo,
        _instance: InstanceHandle,
    ) -> Result<RawHandle, OsError> {
        self.record(Call::CreateWindow(class.to_owned()));

        let (hwnd, messages, fail) = {
            let mut state = self.state.borrow_mut();
            if !state.classes.contains_key(class) {
                return Err(OsError::new("CreateWindowExW", 1407));
            }

            let hwnd = state.next_hwnd;
            state.next_hwnd += 1;
            state.windows.insert(hwnd, class.to_owned());
            (hwnd, state.creation_messages.clone(), state.fail_create_window)
        };

        for (msg, wparam, lparam) in messages {
            self.send(hwnd, msg, wparam, lparam);
        }

        // Like a window procedure refusing the creation: the window received its first
        // messages, then got destroyed.
        if fail {
            self.state.borrow_mut().windows.remove(&hwnd);
            return Err(OsError::new("CreateWindowExW", 1400));
        }

        Ok(hwnd)
    }

    fn destroy_window(&self, window: RawHandle) {
        self.record(Call::DestroyWindow(window));

        let messages = {
            let mut state = self.state.borrow_mut();
            state.windows.remove(&window);
            state.destruction_messages.clone()
        };

        for (target, msg, wparam, lparam) in messages {
            if target != window {
                self.send(target, msg, wparam, lparam);
            }
        }
    }

    fn new_message(&self) -> MockMessage {
        MockMessage::default()
    }

    fn next_message(&self, message: &mut MockMessage) -> Fetch {
        let mut state = self.state.borrow_mut();
        state.fetches += 1;

        match state.queue.pop_front() {
            Some(Scripted::Message(next)) => {
                *message = next;
                Fetch::Message
            }
            Some(Scripted::Failure(code)) => Fetch::Failed(OsError::new("GetMessageW", code)),
            Some(Scripted::Quit) | None => Fetch::Quit,
        }
    }

    fn dispatch_message(&self, message: &MockMessage) {
        self.record(Call::Dispatch(message.msg));
        self.send(message.hwnd, message.msg, message.wparam, message.lparam);
    }

    fn yield_now(&self) {}
}

/// Returns a dispatcher recording every event it sees, and the recorded events.
pub fn recorder() -> (Rc<RefCell<Vec<Event>>>, EventDispatcher) {
    let events = Rc::new(RefCell::new(Vec::new()));
    let inner = events.clone();

    let mut dispatcher = EventDispatcher::new();
    dispatcher.listen(move |event| {
        inner.borrow_mut().push(event.clone());
        Propagation::Continue
    });

    (events, dispatcher)
}
