use wndbridge::{
    AppEvent, Driver, Event, EventDispatcher, Propagation, WindowCreateInfo, WindowEvent,
};

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .init();

    let mut dispatcher = EventDispatcher::new();
    dispatcher.listen(|event| {
        match event {
            Event::App(AppEvent::Starting) => println!("starting..."),
            Event::App(AppEvent::Stopped) => println!("stopped."),
            Event::Window { window, event } => println!("{window}: {event:?}"),
            _ => (),
        }
        Propagation::Continue
    });

    let mut driver = Driver::native(dispatcher);

    if !driver.supports() {
        eprintln!("native windows are not supported on this system");
        return;
    }

    let info = WindowCreateInfo {
        resizable: true,
        ..WindowCreateInfo::with_title("wndbridge")
    };

    if let Err(err) = driver.create(&info) {
        eprintln!("failed to create the window: {err}");
        return;
    }

    let Some(control) = driver.get().map(|env| env.control()) else {
        return;
    };

    if let Some(env) = driver.get_mut() {
        env.dispatcher_mut().listen(move |event| {
            if let Event::Window {
                event: WindowEvent::Closed,
                ..
            } = event
            {
                control.request_stop();
            }
            Propagation::Continue
        });
    }

    if let Err(err) = driver.run() {
        eprintln!("the message loop failed: {err}");
    }
}
