use crate::{ClassDescriptor, Error, OsError, WindowCreateInfo};

/// A raw handle value, as handed out by the operating system.
pub type RawHandle = isize;

/// The signature of a native window procedure.
pub type WindowProcedure =
    unsafe extern "system" fn(hwnd: RawHandle, msg: u32, wparam: usize, lparam: isize) -> isize;

/// The handle of the module (executable) owning the registered classes and windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceHandle(pub RawHandle);

/// The stock resources every registered class refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassResources {
    /// The default arrow cursor.
    pub cursor: RawHandle,
    /// The default application icon.
    pub icon: RawHandle,
    /// The brush painting the system "window" colour.
    pub background: RawHandle,
}

/// The outcome of waiting for the next message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fetch {
    /// A message was written to the buffer and should be dispatched.
    Message,
    /// The thread received a quit request.
    Quit,
    /// Retrieving the message failed.
    Failed(OsError),
}

/// Every native call the environment, the class registrar and the message pump make.
///
/// [`NativePlatform`](crate::NativePlatform) is the implementation for the current operating
/// system. Implementations are cheap handles: clones share the same native state.
pub trait Platform: Clone + 'static {
    /// The native message record the pump reuses on every iteration.
    type Message;

    /// Returns whether this platform can actually create windows.
    fn is_supported(&self) -> bool;

    /// Initializes the calling thread for apartment-threaded COM.
    fn initialize_apartment(&self) -> Result<(), Error>;

    /// Reverts a successful [`initialize_apartment`](Self::initialize_apartment).
    fn uninitialize_apartment(&self);

    /// Returns the handle of the current executable.
    fn module_handle(&self) -> Result<InstanceHandle, Error>;

    /// Loads the stock cursor, icon and brush used by registered classes.
    fn class_resources(&self) -> Result<ClassResources, Error>;

    /// Returns the procedure to install on registered classes.
    ///
    /// The procedure must forward every message to the message bridge, and call the default
    /// window procedure when the bridge asks for it.
    fn window_procedure(&self) -> WindowProcedure;

    /// Registers a window class.
    fn register_class(&self, class: &ClassDescriptor) -> Result<(), OsError>;

    /// Unregisters the class named `name`.
    fn unregister_class(&self, name: &str, instance: InstanceHandle);

    /// Creates a window of the class named `class`.
    fn create_window(
        &self,
        class: &str,
        info: &WindowCreateInfo,
        instance: InstanceHandle,
    ) -> Result<RawHandle, OsError>;

    /// Destroys a window created by [`create_window`](Self::create_window).
    fn destroy_window(&self, window: RawHandle);

    /// Allocates the message buffer.
    fn new_message(&self) -> Self::Message;

    /// Blocks until a message is available and writes it to `message`.
    fn next_message(&self, message: &mut Self::Message) -> Fetch;

    /// Translates the message, then dispatches it to the procedure of its window.
    fn dispatch_message(&self, message: &Self::Message);

    /// Gives up the rest of the time slice between two pump iterations.
    fn yield_now(&self) {
        std::thread::yield_now();
    }
}
