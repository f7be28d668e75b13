use anyhow::Result;
use tray_icon::menu::{Menu, MenuEvent, MenuId, MenuItem, PredefinedMenuItem};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

pub struct Tray {
    _tray: TrayIcon,
    open_id: MenuId,
    folder_id: MenuId,
    quit_id: MenuId,
}

impl Tray {
    pub fn new() -> Result<Self> {
        let menu = Menu::new();

        let open_item = MenuItem::new("Open Launcher", true, None);
        let open_id = open_item.id().clone();
        menu.append(&open_item)?;

        let folder_item = MenuItem::new("Open Scripts Folder", true, None);
        let folder_id = folder_item.id().clone();
        menu.append(&folder_item)?;

        menu.append(&PredefinedMenuItem::separator())?;

        let quit_item = MenuItem::new("Quit", true, None);
        let quit_id = quit_item.id().clone();
        menu.append(&quit_item)?;

        let icon = load_default_icon()?;

        let tray = TrayIconBuilder::new()
            .with_tooltip("QuickLaunch — middle-click the Start button")
            .with_menu(Box::new(menu))
            .with_icon(icon)
            .build()?;

        Ok(Self {
            _tray: tray,
            open_id,
            folder_id,
            quit_id,
        })
    }

    pub fn handle_menu_event(&self) -> TrayAction {
        if let Ok(event) = MenuEvent::receiver().try_recv() {
            if *event.id() == self.quit_id {
                return TrayAction::Quit;
            }
            if *event.id() == self.open_id {
                return TrayAction::ToggleLauncher;
            }
            if *event.id() == self.folder_id {
                return TrayAction::OpenScriptsFolder;
            }
        }
        TrayAction::None
    }
}

fn load_default_icon() -> Result<Icon> {
    let png_bytes = include_bytes!("../assets/logo.png");
    let img = image::load_from_memory(png_bytes)?
        .resize(32, 32, image::imageops::FilterType::Lanczos3)
        .to_rgba8();
    let (w, h) = img.dimensions();
    Ok(Icon::from_rgba(img.into_raw(), w, h)?)
}

pub enum TrayAction {
    None,
    Quit,
    ToggleLauncher,
    OpenScriptsFolder,
}
