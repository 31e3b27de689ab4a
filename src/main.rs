use photoslicer::console::{self, Command};
use photoslicer::{
    init_logging, EventCategory, EventFilter, LocalBackend, Session, SessionEvent,
    SettingsManager, BUILD_DATE, VERSION,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    init_logging()?;
    tracing::info!("PhotoSlicer {} (built {})", VERSION, BUILD_DATE);

    SettingsManager::ensure_config_dir()?;
    let config = SettingsManager::load_session_config(&SettingsManager::config_file_path()?);
    let settings_path = SettingsManager::settings_file_path()?;

    let backend = Arc::new(LocalBackend::new(&settings_path));
    let mut session = Session::new(config, backend.clone());
    backend.attach(session.handle());
    if let Some(snapshot) = SettingsManager::load_snapshot(&settings_path) {
        session.load_settings(&snapshot);
    }

    session.event_bus().subscribe(
        EventFilter::Categories(vec![EventCategory::Job, EventCategory::Notification]),
        |event| println!("[{}] {}", event.category(), event.description()),
    );

    let handle = session.handle();
    let viewport = session.config().viewport.clone();
    handle.send(SessionEvent::Resize {
        width: viewport.design_width,
        height: viewport.design_height,
    });
    handle.send(SessionEvent::BridgeReady);

    println!("{}", console::HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            event = session.next_event() => match event {
                Some(event) => {
                    if !session.handle_event(event) {
                        break;
                    }
                }
                None => break,
            },
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => match console::parse(&line) {
                    Ok(Some(Command::Event(event))) => {
                        handle.send(event);
                    }
                    Ok(Some(Command::ShowView)) => println!("{}", session.view().to_json()?),
                    Ok(Some(Command::Help)) => println!("{}", console::HELP),
                    Ok(None) => {}
                    Err(e) => eprintln!("{}", e),
                },
                Ok(None) => {
                    stdin_open = false;
                    handle.send(SessionEvent::Shutdown);
                }
                Err(e) => {
                    tracing::warn!("Console input failed: {}", e);
                    stdin_open = false;
                    handle.send(SessionEvent::Shutdown);
                }
            },
        }
    }

    session.stop();
    Ok(())
}
