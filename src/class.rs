use std::fmt;

use bitflags::bitflags;

use crate::{
    Error, HandleRegistry, InstanceHandle, Platform, RawHandle, Registration, WindowCreateInfo,
    WindowId, WindowProcedure,
};

bitflags! {
    /// The styles of a window class.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClassStyle: u32 {
        /// Redraw the whole window when its height changes.
        const VREDRAW = 0x0001;
        /// Redraw the whole window when its width changes.
        const HREDRAW = 0x0002;
        /// Give each window its own device context.
        const OWNDC = 0x0020;
        /// Disable the close entry of the window menu.
        const NOCLOSE = 0x0200;
    }
}

impl ClassStyle {
    /// The style of classes whose windows may be closed.
    pub const DEFAULT: Self = Self::HREDRAW.union(Self::VREDRAW).union(Self::OWNDC);

    /// Returns the class style for the given window parameters.
    ///
    /// Non-closable windows get [`NOCLOSE`](Self::NOCLOSE) *instead of* the default styles.
    pub fn for_window(info: &WindowCreateInfo) -> Self {
        if info.closable {
            Self::DEFAULT
        } else {
            Self::NOCLOSE
        }
    }
}

/// Everything needed to register a window class.
#[derive(Clone)]
pub struct ClassDescriptor {
    /// The name the class is registered (and later unregistered) under.
    pub name: String,
    /// The class styles.
    pub style: ClassStyle,
    /// The module owning the class.
    pub instance: InstanceHandle,
    /// The cursor shown over windows of this class.
    pub cursor: RawHandle,
    /// The icon of windows of this class.
    pub icon: RawHandle,
    /// The brush used to paint the background.
    pub background: RawHandle,
    /// Extra bytes allocated after the class structure.
    pub class_extra: i32,
    /// Extra bytes allocated after each window instance.
    pub window_extra: i32,
    /// The procedure receiving the messages of windows of this class.
    pub procedure: Option<WindowProcedure>,
}

impl fmt::Debug for ClassDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDescriptor")
            .field("name", &self.name)
            .field("style", &self.style)
            .field("instance", &self.instance)
            .field("procedure", &self.procedure.is_some())
            .finish_non_exhaustive()
    }
}

/// A registered window class.
///
/// The class is unregistered when the handle is released or dropped.
pub struct ClassHandle {
    id: String,
    instance: InstanceHandle,
    registration: Registration<String>,
}

impl ClassHandle {
    /// The name of the class.
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The module owning the class.
    #[inline]
    pub fn instance(&self) -> InstanceHandle {
        self.instance
    }

    /// Returns whether the class was already unregistered.
    #[inline]
    pub fn is_released(&self) -> bool {
        self.registration.is_disposed()
    }

    /// Unregisters the class now rather than when the handle is dropped.
    pub fn release(&mut self) -> bool {
        self.registration.dispose()
    }
}

impl fmt::Debug for ClassHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassHandle")
            .field("id", &self.id)
            .field("instance", &self.instance)
            .field("released", &self.is_released())
            .finish()
    }
}

/// Registers the window classes of an environment and makes sure they get unregistered.
pub struct WindowClassRegistrar<P: Platform> {
    platform: P,
    handles: HandleRegistry<String>,
}

impl<P: Platform> WindowClassRegistrar<P> {
    /// Creates a new [`WindowClassRegistrar`].
    pub fn new(platform: P) -> Self {
        Self {
            platform,
            handles: HandleRegistry::new(),
        }
    }

    /// Returns the name of the class registered for `window`.
    pub fn class_name(window: WindowId) -> String {
        format!("{}#{window}", std::any::type_name::<Self>())
    }

    /// Returns the number of classes currently registered through this registrar.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Returns whether no class is currently registered through this registrar.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Builds the descriptor of the class used by `window`, without registering it.
    pub fn describe(
        &self,
        info: &WindowCreateInfo,
        instance: InstanceHandle,
        window: WindowId,
    ) -> Result<ClassDescriptor, Error> {
        let resources = self.platform.class_resources()?;

        Ok(ClassDescriptor {
            name: Self::class_name(window),
            style: ClassStyle::for_window(info),
            instance,
            cursor: resources.cursor,
            icon: resources.icon,
            background: resources.background,
            class_extra: 0,
            window_extra: 0,
            procedure: None,
        })
    }

    /// Registers a class for `window` and returns its handle.
    pub fn create(
        &mut self,
        info: &WindowCreateInfo,
        instance: InstanceHandle,
        window: WindowId,
    ) -> Result<ClassHandle, Error> {
        let mut class = self.describe(info, instance, window)?;
        class.procedure = Some(self.platform.window_procedure());

        self.platform
            .register_class(&class)
            .map_err(|source| Error::WindowNotCreatable {
                reason: "could not initialize window class",
                source,
            })?;

        let platform = self.platform.clone();
        let name = class.name.clone();
        let registration = self.handles.register(class.name.clone(), move || {
            log::debug!("unregistering window class `{name}`");
            platform.unregister_class(&name, instance);
        });

        let registration = match registration {
            Ok(registration) => registration,
            Err(err) => {
                self.platform.unregister_class(&class.name, instance);
                return Err(err);
            }
        };

        log::debug!(
            "registered window class `{}` with style {:?}",
            class.name,
            class.style
        );

        Ok(ClassHandle {
            id: class.name,
            instance,
            registration,
        })
    }
}

impl<P: Platform> fmt::Debug for WindowClassRegistrar<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowClassRegistrar")
            .field("handles", &self.handles)
            .finish_non_exhaustive()
    }
}
