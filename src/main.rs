#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod config;
mod hittest;
mod launch;
mod scripts;
mod toggle;

#[cfg(windows)]
mod platform;
#[cfg(windows)]
mod tray;

#[cfg(windows)]
fn setup_logging() {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let log_dir = config::Config::app_dir();
    let _ = std::fs::create_dir_all(&log_dir);
    let log_path = log_dir.join("debug.log");

    // Truncate to keep log file manageable (overwrite each launch)
    let file = std::fs::File::create(&log_path).ok();

    let stdout_layer = fmt::layer().with_target(false).with_writer(std::io::stdout);

    if let Some(file) = file {
        let file_layer = fmt::layer()
            .with_target(false)
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(file));

        tracing_subscriber::registry()
            .with(tracing_subscriber::filter::LevelFilter::INFO)
            .with(stdout_layer)
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(tracing_subscriber::filter::LevelFilter::INFO)
            .with(stdout_layer)
            .init();
    }
}

#[cfg(windows)]
fn main() {
    use std::time::Duration;

    use crate::platform::InputEvent;
    use crate::tray::TrayAction;

    setup_logging();

    std::panic::set_hook(Box::new(|info| {
        let msg = format!("{}", info);
        tracing::error!("PANIC: {}", msg);
        platform::show_error("QuickLaunch crashed", &msg);
    }));

    platform::init_platform();

    tracing::info!("QuickLaunch starting");

    let config = config::Config::load().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config: {}, using defaults", e);
        config::Config::default()
    });

    let scripts_dir = config.scripts_dir();
    if let Err(e) = scripts::ensure_scripts_dir(&scripts_dir) {
        tracing::warn!("{:#}", e);
    }

    // Create tray icon FIRST so user sees the app is running
    let tray = match tray::Tray::new() {
        Ok(t) => t,
        Err(e) => {
            tracing::error!("Failed to create tray icon: {}", e);
            platform::show_error(
                "QuickLaunch",
                &format!(
                    "Failed to create system tray icon: {}\n\nThe application cannot continue.",
                    e
                ),
            );
            return;
        }
    };

    // A hook failure disables the middle-click toggle but not the process:
    // the tray menu still opens the launcher and can quit.
    let _hook = match platform::install_mouse_hook() {
        Ok(h) => Some(h),
        Err(e) => {
            tracing::error!("{}", e);
            platform::notify_error(
                "QuickLaunch",
                "Failed to install the global mouse hook.\n\
                 The middle-click toggle is disabled until the next start;\n\
                 the launcher is still available from the tray menu.",
            );
            None
        }
    };

    let popup_ctx = platform::PopupContext {
        shell: config.shell.clone(),
        editor: config.editor.clone(),
        scripts_dir: scripts_dir.clone(),
    };
    let popup_width = config.popup_width;
    let list_dir = scripts_dir.clone();
    let mut controller = toggle::ToggleController::new(move || {
        let entries = scripts::list_scripts(&list_dir)?;
        platform::open_popup(entries, popup_width, popup_ctx.clone())
    });

    loop {
        while let Some(event) = platform::poll_input_event() {
            match event {
                InputEvent::Quit => {
                    tracing::info!("QuickLaunch exiting");
                    return;
                }
                InputEvent::ToggleLauncher => match controller.toggle() {
                    Ok(()) => tracing::info!(
                        "Launcher {}",
                        if controller.is_showing() { "shown" } else { "hidden" }
                    ),
                    Err(e) => {
                        tracing::error!("Failed to open launcher: {:#}", e);
                        platform::notify_error("QuickLaunch", &format!("{:#}", e));
                    }
                },
            }
        }

        // fold focus-loss dismissals back into the controller
        controller.sweep();

        match tray.handle_menu_event() {
            TrayAction::Quit => {
                tracing::info!("Quit requested");
                break;
            }
            TrayAction::ToggleLauncher => match controller.toggle() {
                Ok(()) => tracing::info!(
                    "Launcher {}",
                    if controller.is_showing() { "shown" } else { "hidden" }
                ),
                Err(e) => {
                    tracing::error!("Failed to open launcher: {:#}", e);
                    platform::notify_error("QuickLaunch", &format!("{:#}", e));
                }
            },
            TrayAction::OpenScriptsFolder => {
                if let Err(e) = launch::open_folder(&scripts_dir) {
                    tracing::error!("{}", e);
                    platform::notify_error("QuickLaunch", &e.to_string());
                }
            }
            TrayAction::None => {}
        }

        std::thread::sleep(Duration::from_millis(10));
    }

    controller.close();
    tracing::info!("QuickLaunch exiting");
}

#[cfg(not(windows))]
fn main() {
    eprintln!("quicklaunch only runs on Windows.");
    std::process::exit(1);
}
