/// Events the main loop drains from the platform layer. The hook callback
/// never touches UI state directly; it queues one of these instead.
pub enum InputEvent {
    /// Middle-button-down landed on the taskbar Start-button region.
    ToggleLauncher,
    Quit,
}

#[cfg(target_os = "windows")]
mod windows;
#[cfg(target_os = "windows")]
pub use self::windows::*;
