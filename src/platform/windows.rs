use std::path::PathBuf;
use std::ptr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

use windows_sys::Win32::Foundation::*;
use windows_sys::Win32::Graphics::Gdi::*;
use windows_sys::Win32::System::LibraryLoader::GetModuleHandleW;
use windows_sys::Win32::UI::HiDpi::*;
use windows_sys::Win32::UI::Input::KeyboardAndMouse::{
    TrackMouseEvent, TME_LEAVE, TRACKMOUSEEVENT,
};
use windows_sys::Win32::UI::WindowsAndMessaging::*;

use crate::hittest::{hit_test, ScreenRect};
use crate::scripts::ScriptEntry;
use super::InputEvent;

// Counter, not a flag: two clicks landing between polls must still toggle
// twice, or a double-fire leaves the popup stuck open.
static TOGGLE_QUEUED: AtomicUsize = AtomicUsize::new(0);

#[repr(C)]
#[allow(clippy::upper_case_acronyms)]
struct MSLLHOOKSTRUCT {
    pt: POINT,
    _mouse_data: u32,
    _flags: u32,
    _time: u32,
    _extra_info: usize,
}

// base sizes at 96 DPI, scaled by dpi_scale
const BASE_PADDING: i32 = 12;
const BASE_MARGIN: i32 = 8;
const BASE_ROW_HEIGHT: i32 = 52;
const BASE_ROW_GAP: i32 = 8;
const BASE_FOOTER_HEIGHT: i32 = 44;
const BASE_CORNER_RADIUS: i32 = 14;
const BASE_ROW_CORNER: i32 = 8;
const BASE_EDIT_WIDTH: i32 = 64;
const BASE_EDIT_HEIGHT: i32 = 28;
const BASE_TEXT_INSET: i32 = 14;
const BASE_FONT_NAME: i32 = -15;
const BASE_FONT_BUTTON: i32 = -13;
const BASE_SLIDE_PX: i32 = 10;
const BASE_MAX_HEIGHT: i32 = 520;
const BASE_SCROLL_LINE: i32 = 40;
const SCROLLBAR_WIDTH: i32 = 4;

const fn rgb(r: u32, g: u32, b: u32) -> u32 {
    r | (g << 8) | (b << 16)
}

const BG_COLOR: u32 = rgb(30, 30, 32);
const BORDER_SHADOW: u32 = rgb(24, 24, 24);
const BORDER_HIGHLIGHT: u32 = rgb(96, 96, 96);
const BORDER_HIGHLIGHT_INNER: u32 = rgb(64, 64, 64);
const ROW_TOP: u32 = rgb(40, 40, 43);
const ROW_BOTTOM: u32 = rgb(35, 35, 38);
const ROW_TOP_HOVER: u32 = rgb(45, 45, 48);
const ROW_BOTTOM_HOVER: u32 = rgb(40, 40, 43);
const ACCENT_TOP: u32 = rgb(82, 37, 110);
const ACCENT_BOTTOM: u32 = rgb(66, 30, 88);
const ACCENT_TOP_HOVER: u32 = rgb(92, 42, 125);
const ACCENT_BOTTOM_HOVER: u32 = rgb(76, 35, 98);
const EDIT_BG: u32 = rgb(45, 45, 48);
const EDIT_BG_HOVER: u32 = rgb(55, 55, 58);
const TEXT_COLOR: u32 = rgb(240, 240, 240);
const TEXT_DIM: u32 = rgb(150, 150, 152);
const SCROLLBAR_COLOR: u32 = rgb(128, 128, 128);

const MAX_ALPHA: u8 = 245;
const FADE_IN_MS: f64 = 180.0;
const FADE_OUT_MS: f64 = 150.0;
const ANIM_TIMER: usize = 100;
const ANIM_FRAME_MS: u32 = 16;

const PHASE_NONE: u8 = 0;
const PHASE_FADE_IN: u8 = 1;
const PHASE_VISIBLE: u8 = 2;
const PHASE_FADE_OUT: u8 = 3;

enum RowKind {
    Script { path: PathBuf },
    Empty,
    AddNew,
    OpenFolder,
}

struct Row {
    kind: RowKind,
    label: Vec<u16>,
    /// Content coordinates; shifted by the scroll offset when drawn/hit.
    rect: RECT,
    edit_rect: Option<RECT>,
}

/// Strings the popup needs when a row is clicked.
#[derive(Clone)]
pub struct PopupContext {
    pub shell: String,
    pub editor: String,
    pub scripts_dir: PathBuf,
}

// popup state (main thread only)
static CLASS_NAME: OnceLock<Vec<u16>> = OnceLock::new();
static TASKBAR_CLASS: OnceLock<Vec<u16>> = OnceLock::new();
static mut POPUP_HWND: HWND = ptr::null_mut();
static mut ROWS: Vec<Row> = Vec::new();
static mut CONTEXT: Option<PopupContext> = None;
static mut GENERATION: u64 = 0;
static mut PHASE: u8 = PHASE_NONE;
static mut ANIM_START: Option<Instant> = None;
static mut TARGET_X: i32 = 0;
static mut TARGET_Y: i32 = 0;
static mut DPI_SCALE: f64 = 1.0;
static mut SCROLL_OFFSET: i32 = 0;
static mut CONTENT_HEIGHT: i32 = 0;
static mut HOVER_ROW: i32 = -1;
static mut HOVER_EDIT: bool = false;
static mut TRACKING_LEAVE: bool = false;

fn s(v: i32) -> i32 {
    unsafe { (v as f64 * DPI_SCALE).round() as i32 }
}

pub fn init_platform() {
    unsafe {
        SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2);
    }

    let class_name = to_wide("QuickLaunchPopup");
    CLASS_NAME.get_or_init(|| class_name.clone());
    TASKBAR_CLASS.get_or_init(|| to_wide("Shell_TrayWnd"));

    unsafe {
        let hdc = GetDC(ptr::null_mut());
        let dpi = GetDeviceCaps(hdc, LOGPIXELSX as i32);
        ReleaseDC(ptr::null_mut(), hdc);
        DPI_SCALE = dpi as f64 / 96.0;
        tracing::info!("DPI: {} (scale: {:.0}%)", dpi, DPI_SCALE * 100.0);

        let hi = GetModuleHandleW(ptr::null());
        let wc = WNDCLASSEXW {
            cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
            style: CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: Some(wnd_proc),
            cbClsExtra: 0,
            cbWndExtra: 0,
            hInstance: hi,
            hIcon: ptr::null_mut(),
            hCursor: LoadCursorW(ptr::null_mut(), IDC_ARROW),
            hbrBackground: ptr::null_mut(),
            lpszMenuName: ptr::null(),
            lpszClassName: class_name.as_ptr(),
            hIconSm: ptr::null_mut(),
        };
        RegisterClassExW(&wc);
    }
}

pub struct HookHandle {
    hook: HHOOK,
}

impl Drop for HookHandle {
    fn drop(&mut self) {
        unsafe {
            UnhookWindowsHookEx(self.hook);
        }
    }
}

pub fn install_mouse_hook() -> anyhow::Result<HookHandle> {
    let hook = unsafe { SetWindowsHookExW(WH_MOUSE_LL, Some(mouse_hook_proc), ptr::null_mut(), 0) };
    if hook.is_null() {
        anyhow::bail!("Failed to install mouse hook");
    }
    tracing::info!("Mouse hook installed — ready!");
    Ok(HookHandle { hook })
}

/// Screen rect of the shell taskbar, re-queried on every qualifying event so
/// auto-hide and monitor changes are picked up. Shell_TrayWnd is the whole
/// bar, not just the Start button; a middle click anywhere on it qualifies.
fn start_button_rect() -> Option<ScreenRect> {
    let class = TASKBAR_CLASS.get()?;
    unsafe {
        let taskbar = FindWindowW(class.as_ptr(), ptr::null());
        if taskbar.is_null() {
            return None;
        }
        let mut r: RECT = std::mem::zeroed();
        if GetWindowRect(taskbar, &mut r) == 0 {
            return None;
        }
        Some(ScreenRect {
            left: r.left,
            top: r.top,
            right: r.right,
            bottom: r.bottom,
        })
    }
}

// Runs inline with global mouse delivery: only flag the event and get out.
// Everything else, pass along unmodified.
unsafe extern "system" fn mouse_hook_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if code >= 0 && wparam as u32 == WM_MBUTTONDOWN {
        let info = &*(lparam as *const MSLLHOOKSTRUCT);
        if hit_test(start_button_rect(), info.pt.x, info.pt.y) {
            TOGGLE_QUEUED.fetch_add(1, Ordering::Relaxed);
        }
    }
    CallNextHookEx(ptr::null_mut(), code, wparam, lparam)
}

pub fn poll_input_event() -> Option<InputEvent> {
    unsafe {
        let mut msg: MSG = std::mem::zeroed();
        while PeekMessageW(&mut msg, ptr::null_mut(), 0, 0, PM_REMOVE) != 0 {
            if msg.message == WM_QUIT {
                return Some(InputEvent::Quit);
            }
            TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }

    let dequeued = TOGGLE_QUEUED
        .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
        .is_ok();
    if dequeued {
        return Some(InputEvent::ToggleLauncher);
    }

    None
}

/// Handle to one popup generation. A stale handle (popup already replaced or
/// self-dismissed) closes nothing.
pub struct ScriptPopup {
    generation: u64,
}

impl crate::toggle::Popup for ScriptPopup {
    fn close(&mut self) {
        unsafe {
            if self.generation == GENERATION && !POPUP_HWND.is_null() {
                begin_fade_out();
            }
        }
    }

    fn is_open(&self) -> bool {
        unsafe {
            self.generation == GENERATION
                && !POPUP_HWND.is_null()
                && matches!(PHASE, PHASE_FADE_IN | PHASE_VISIBLE)
        }
    }
}

pub fn open_popup(
    entries: Vec<ScriptEntry>,
    popup_width: u32,
    ctx: PopupContext,
) -> anyhow::Result<ScriptPopup> {
    unsafe {
        destroy_popup();
        GENERATION += 1;

        let padding = s(BASE_PADDING);
        let row_h = s(BASE_ROW_HEIGHT);
        let gap = s(BASE_ROW_GAP);
        let footer_h = s(BASE_FOOTER_HEIGHT);
        let edit_w = s(BASE_EDIT_WIDTH);
        let edit_h = s(BASE_EDIT_HEIGHT);
        let inset = s(BASE_TEXT_INSET);
        let w = s(popup_width.max(240) as i32);

        let mut rows: Vec<Row> = Vec::new();
        let mut y = padding;

        if entries.is_empty() {
            rows.push(Row {
                kind: RowKind::Empty,
                label: to_wide("No scripts yet"),
                rect: RECT { left: padding, top: y, right: w - padding, bottom: y + row_h },
                edit_rect: None,
            });
            y += row_h + gap;
        } else {
            for entry in entries {
                let rect = RECT { left: padding, top: y, right: w - padding, bottom: y + row_h };
                let edit_rect = RECT {
                    left: rect.right - inset - edit_w,
                    top: rect.top + (row_h - edit_h) / 2,
                    right: rect.right - inset,
                    bottom: rect.top + (row_h - edit_h) / 2 + edit_h,
                };
                rows.push(Row {
                    kind: RowKind::Script { path: entry.path },
                    label: to_wide(&entry.name),
                    rect,
                    edit_rect: Some(edit_rect),
                });
                y += row_h + gap;
            }
        }

        for (kind, label) in [
            (RowKind::AddNew, "Add New Script"),
            (RowKind::OpenFolder, "Open Scripts Folder"),
        ] {
            rows.push(Row {
                kind,
                label: to_wide(label),
                rect: RECT { left: padding, top: y, right: w - padding, bottom: y + footer_h },
                edit_rect: None,
            });
            y += footer_h + gap;
        }

        let content_h = y - gap + padding;

        // Work area of the monitor the cursor is on; the popup sits above the
        // taskbar in its bottom-left corner.
        let mut cursor = POINT { x: 0, y: 0 };
        GetCursorPos(&mut cursor);
        let hmon = MonitorFromPoint(cursor, MONITOR_DEFAULTTONEAREST);
        let mut mi: MONITORINFO = std::mem::zeroed();
        mi.cbSize = std::mem::size_of::<MONITORINFO>() as u32;
        GetMonitorInfoW(hmon, &mut mi);
        let work = mi.rcWork;

        let max_h = s(BASE_MAX_HEIGHT).min((work.bottom - work.top) * 3 / 5);
        let h = content_h.min(max_h);
        let margin = s(BASE_MARGIN);
        let x = work.left + margin;
        let win_y = work.bottom - h - margin;

        CONTENT_HEIGHT = content_h;
        SCROLL_OFFSET = 0;
        HOVER_ROW = -1;
        HOVER_EDIT = false;
        TRACKING_LEAVE = false;
        ROWS = rows;
        CONTEXT = Some(ctx);
        TARGET_X = x;
        TARGET_Y = win_y;

        let hi = GetModuleHandleW(ptr::null());
        let cls = CLASS_NAME.get().unwrap();
        let slide_px = s(BASE_SLIDE_PX);
        let hwnd = CreateWindowExW(
            WS_EX_TOPMOST | WS_EX_TOOLWINDOW | WS_EX_LAYERED,
            cls.as_ptr(),
            ptr::null(),
            WS_POPUP,
            x,
            win_y + slide_px,
            w,
            h,
            ptr::null_mut(),
            ptr::null_mut(),
            hi,
            ptr::null(),
        );
        if hwnd.is_null() {
            ROWS = Vec::new();
            CONTEXT = None;
            anyhow::bail!("Failed to create launcher window");
        }

        let corner_r = s(BASE_CORNER_RADIUS);
        let rgn = CreateRoundRectRgn(0, 0, w, h, corner_r * 2, corner_r * 2);
        SetWindowRgn(hwnd, rgn, 0);

        SetLayeredWindowAttributes(hwnd, 0, 0, LWA_ALPHA);

        POPUP_HWND = hwnd;
        PHASE = PHASE_FADE_IN;
        ANIM_START = Some(Instant::now());

        ShowWindow(hwnd, SW_SHOW);
        // focus so losing it dismisses the popup
        SetForegroundWindow(hwnd);

        SetTimer(hwnd, ANIM_TIMER, ANIM_FRAME_MS, None);

        Ok(ScriptPopup { generation: GENERATION })
    }
}

unsafe fn begin_fade_out() {
    if PHASE == PHASE_FADE_OUT || PHASE == PHASE_NONE {
        return;
    }
    PHASE = PHASE_FADE_OUT;
    ANIM_START = Some(Instant::now());
}

unsafe fn anim_tick(hwnd: HWND) {
    let elapsed = match ANIM_START {
        Some(start) => start.elapsed().as_secs_f64() * 1000.0,
        None => return,
    };

    let slide_px = s(BASE_SLIDE_PX);

    match PHASE {
        PHASE_FADE_IN => {
            let t = (elapsed / FADE_IN_MS).min(1.0);
            let ease = ease_out_cubic(t);

            let alpha = (ease * MAX_ALPHA as f64) as u8;
            SetLayeredWindowAttributes(hwnd, 0, alpha, LWA_ALPHA);

            let offset = ((1.0 - ease) * slide_px as f64) as i32;
            SetWindowPos(
                hwnd,
                ptr::null_mut(),
                TARGET_X,
                TARGET_Y + offset,
                0,
                0,
                SWP_NOSIZE | SWP_NOZORDER | SWP_NOACTIVATE | SWP_NOREDRAW,
            );
            InvalidateRect(hwnd, ptr::null(), 0);

            if t >= 1.0 {
                PHASE = PHASE_VISIBLE;
                SetLayeredWindowAttributes(hwnd, 0, MAX_ALPHA, LWA_ALPHA);
                SetWindowPos(
                    hwnd,
                    ptr::null_mut(),
                    TARGET_X,
                    TARGET_Y,
                    0,
                    0,
                    SWP_NOSIZE | SWP_NOZORDER | SWP_NOACTIVATE,
                );
            }
        }
        PHASE_FADE_OUT => {
            let t = (elapsed / FADE_OUT_MS).min(1.0);
            let ease = ease_in_cubic(t);

            let alpha = ((1.0 - ease) * MAX_ALPHA as f64) as u8;
            SetLayeredWindowAttributes(hwnd, 0, alpha, LWA_ALPHA);

            let offset = (ease * (slide_px / 2) as f64) as i32;
            SetWindowPos(
                hwnd,
                ptr::null_mut(),
                TARGET_X,
                TARGET_Y + offset,
                0,
                0,
                SWP_NOSIZE | SWP_NOZORDER | SWP_NOACTIVATE | SWP_NOREDRAW,
            );

            if t >= 1.0 {
                PHASE = PHASE_NONE;
                KillTimer(hwnd, ANIM_TIMER);
                destroy_popup();
            }
        }
        PHASE_VISIBLE => {}
        _ => {
            KillTimer(hwnd, ANIM_TIMER);
        }
    }
}

fn destroy_popup() {
    unsafe {
        if !POPUP_HWND.is_null() {
            KillTimer(POPUP_HWND, ANIM_TIMER);
            DestroyWindow(POPUP_HWND);
            POPUP_HWND = ptr::null_mut();
            ROWS = Vec::new();
            CONTEXT = None;
            PHASE = PHASE_NONE;
            ANIM_START = None;
            SCROLL_OFFSET = 0;
            CONTENT_HEIGHT = 0;
            HOVER_ROW = -1;
            HOVER_EDIT = false;
            TRACKING_LEAVE = false;
        }
    }
}

/// Row index and whether the point is on the row's Edit chip, in content
/// coordinates (client y + scroll offset).
unsafe fn row_at(x: i32, y: i32) -> (i32, bool) {
    let rows = &*(&raw const ROWS);
    for (i, row) in rows.iter().enumerate() {
        let r = &row.rect;
        if x >= r.left && x < r.right && y >= r.top && y < r.bottom {
            let on_edit = row.edit_rect.as_ref().is_some_and(|e| {
                x >= e.left && x < e.right && y >= e.top && y < e.bottom
            });
            return (i as i32, on_edit);
        }
    }
    (-1, false)
}

unsafe fn handle_click(x: i32, y: i32) {
    if PHASE == PHASE_FADE_OUT {
        return;
    }
    let (idx, on_edit) = row_at(x, y + SCROLL_OFFSET);
    if idx < 0 {
        return;
    }
    let Some(ctx) = (*(&raw const CONTEXT)).clone() else {
        return;
    };

    let rows = &*(&raw const ROWS);
    match &rows[idx as usize].kind {
        RowKind::Script { path } => {
            let path = path.clone();
            let result = if on_edit {
                crate::launch::edit_script(&ctx.editor, &path)
            } else {
                crate::launch::run_script(&ctx.shell, &path)
            };
            match result {
                Ok(()) => begin_fade_out(),
                Err(e) => {
                    tracing::error!("{}", e);
                    notify_error("QuickLaunch", &e.to_string());
                }
            }
        }
        RowKind::AddNew => match crate::scripts::create_new_script(&ctx.scripts_dir) {
            Ok(path) => {
                if let Err(e) = crate::launch::edit_script(&ctx.editor, &path) {
                    tracing::error!("{}", e);
                    notify_error("QuickLaunch", &e.to_string());
                }
                begin_fade_out();
            }
            Err(e) => {
                tracing::error!("{}", e);
                notify_error("QuickLaunch", &format!("{:#}", e));
            }
        },
        RowKind::OpenFolder => {
            // popup dismisses itself when Explorer takes focus
            if let Err(e) = crate::launch::open_folder(&ctx.scripts_dir) {
                tracing::error!("{}", e);
                notify_error("QuickLaunch", &e.to_string());
            }
        }
        RowKind::Empty => {}
    }
}

unsafe fn update_hover(hwnd: HWND, x: i32, y: i32) {
    let (idx, on_edit) = row_at(x, y + SCROLL_OFFSET);
    if idx != HOVER_ROW || on_edit != HOVER_EDIT {
        HOVER_ROW = idx;
        HOVER_EDIT = on_edit;
        InvalidateRect(hwnd, ptr::null(), 0);
    }

    if !TRACKING_LEAVE {
        let mut tme = TRACKMOUSEEVENT {
            cbSize: std::mem::size_of::<TRACKMOUSEEVENT>() as u32,
            dwFlags: TME_LEAVE,
            hwndTrack: hwnd,
            dwHoverTime: 0,
        };
        if TrackMouseEvent(&mut tme) != 0 {
            TRACKING_LEAVE = true;
        }
    }
}

unsafe extern "system" fn wnd_proc(hwnd: HWND, msg: u32, wp: WPARAM, lp: LPARAM) -> LRESULT {
    match msg {
        WM_PAINT => {
            paint(hwnd);
            0
        }
        WM_TIMER => {
            if wp == ANIM_TIMER {
                anim_tick(hwnd);
            }
            0
        }
        WM_ACTIVATE => {
            // clicked away — dismiss
            if (wp as u32 & 0xFFFF) == WA_INACTIVE as u32 {
                begin_fade_out();
            }
            0
        }
        WM_MOUSEMOVE => {
            let x = (lp & 0xFFFF) as u16 as i16 as i32;
            let y = ((lp >> 16) & 0xFFFF) as u16 as i16 as i32;
            update_hover(hwnd, x, y);
            0
        }
        WM_MOUSELEAVE => {
            TRACKING_LEAVE = false;
            if HOVER_ROW != -1 {
                HOVER_ROW = -1;
                HOVER_EDIT = false;
                InvalidateRect(hwnd, ptr::null(), 0);
            }
            0
        }
        WM_SETCURSOR => {
            let hoverable = HOVER_ROW >= 0
                && !matches!(
                    (*(&raw const ROWS)).get(HOVER_ROW as usize).map(|r| &r.kind),
                    Some(RowKind::Empty) | None
                );
            if hoverable {
                SetCursor(LoadCursorW(ptr::null_mut(), IDC_HAND));
                1
            } else {
                DefWindowProcW(hwnd, msg, wp, lp)
            }
        }
        WM_MOUSEWHEEL => {
            let delta = ((wp >> 16) & 0xFFFF) as u16 as i16 as i32;
            let scroll_step = s(BASE_SCROLL_LINE);
            let pixels = -((delta as f64 / 120.0) * scroll_step as f64) as i32;
            let mut rc: RECT = std::mem::zeroed();
            GetClientRect(hwnd, &mut rc);
            let max_scroll = (CONTENT_HEIGHT - rc.bottom).max(0);
            SCROLL_OFFSET = (SCROLL_OFFSET + pixels).clamp(0, max_scroll);
            InvalidateRect(hwnd, ptr::null(), 0);
            0
        }
        WM_LBUTTONDOWN => {
            let x = (lp & 0xFFFF) as u16 as i16 as i32;
            let y = ((lp >> 16) & 0xFFFF) as u16 as i16 as i32;
            handle_click(x, y);
            0
        }
        _ => DefWindowProcW(hwnd, msg, wp, lp),
    }
}

unsafe fn paint(hwnd: HWND) {
    let mut ps: PAINTSTRUCT = std::mem::zeroed();
    let hdc = BeginPaint(hwnd, &mut ps);

    let mut rc = RECT { left: 0, top: 0, right: 0, bottom: 0 };
    GetClientRect(hwnd, &mut rc);
    let w = rc.right;
    let h = rc.bottom;

    let mem_dc = CreateCompatibleDC(hdc);
    let mem_bmp = CreateCompatibleBitmap(hdc, w, h);
    let old_bmp = SelectObject(mem_dc, mem_bmp);

    let bg = CreateSolidBrush(BG_COLOR);
    let fill_rc = RECT { left: 0, top: 0, right: w, bottom: h };
    FillRect(mem_dc, &fill_rc, bg);
    DeleteObject(bg);

    let corner_r = s(BASE_CORNER_RADIUS);
    let null_brush = GetStockObject(NULL_BRUSH);
    let saved_brush = SelectObject(mem_dc, null_brush);

    let pen1 = CreatePen(PS_SOLID, 1, BORDER_SHADOW);
    let saved_pen = SelectObject(mem_dc, pen1);
    RoundRect(mem_dc, 0, 0, w, h, corner_r * 2, corner_r * 2);

    let pen2 = CreatePen(PS_SOLID, 1, BORDER_HIGHLIGHT);
    SelectObject(mem_dc, pen2);
    DeleteObject(pen1);
    RoundRect(mem_dc, 1, 1, w - 1, h - 1, (corner_r - 1) * 2, (corner_r - 1) * 2);

    let pen3 = CreatePen(PS_SOLID, 1, BORDER_HIGHLIGHT_INNER);
    SelectObject(mem_dc, pen3);
    DeleteObject(pen2);
    RoundRect(mem_dc, 2, 2, w - 2, h - 2, (corner_r - 2) * 2, (corner_r - 2) * 2);

    SelectObject(mem_dc, saved_pen);
    DeleteObject(pen3);
    SelectObject(mem_dc, saved_brush);

    SetBkMode(mem_dc, TRANSPARENT as i32);

    let rows = &*(&raw const ROWS);
    for (i, row) in rows.iter().enumerate() {
        let top = row.rect.top - SCROLL_OFFSET;
        let bottom = row.rect.bottom - SCROLL_OFFSET;
        if bottom < 0 || top > h {
            continue;
        }
        let hovered = HOVER_ROW == i as i32;
        draw_row(mem_dc, row, top, bottom, hovered, hovered && HOVER_EDIT);
    }

    if CONTENT_HEIGHT > h {
        let padding = s(BASE_PADDING);
        let track_top = padding;
        let track_h = h - padding * 2;
        let visible_ratio = track_h as f64 / CONTENT_HEIGHT as f64;
        let thumb_h = (visible_ratio * track_h as f64).max(20.0) as i32;
        let max_scroll = CONTENT_HEIGHT - h;
        let scroll_ratio = if max_scroll > 0 {
            SCROLL_OFFSET as f64 / max_scroll as f64
        } else {
            0.0
        };
        let thumb_y = track_top + (scroll_ratio * (track_h - thumb_h) as f64) as i32;

        let bar_w = s(SCROLLBAR_WIDTH);
        let bar_x = w - bar_w - s(3);

        let brush = CreateSolidBrush(SCROLLBAR_COLOR);
        let old_brush = SelectObject(mem_dc, brush);
        let old_pen = SelectObject(mem_dc, GetStockObject(NULL_PEN));
        RoundRect(mem_dc, bar_x, thumb_y, bar_x + bar_w, thumb_y + thumb_h, bar_w, bar_w);
        SelectObject(mem_dc, old_pen);
        SelectObject(mem_dc, old_brush);
        DeleteObject(brush);
    }

    BitBlt(hdc, 0, 0, w, h, mem_dc, 0, 0, SRCCOPY);

    SelectObject(mem_dc, old_bmp);
    DeleteObject(mem_bmp);
    DeleteDC(mem_dc);

    EndPaint(hwnd, &ps);
}

unsafe fn draw_row(hdc: HDC, row: &Row, top: i32, bottom: i32, hovered: bool, edit_hovered: bool) {
    let rect = RECT {
        left: row.rect.left,
        top,
        right: row.rect.right,
        bottom,
    };

    let (grad_top, grad_bottom) = match (&row.kind, hovered) {
        (RowKind::AddNew, false) => (ACCENT_TOP, ACCENT_BOTTOM),
        (RowKind::AddNew, true) => (ACCENT_TOP_HOVER, ACCENT_BOTTOM_HOVER),
        (_, false) => (ROW_TOP, ROW_BOTTOM),
        (_, true) => (ROW_TOP_HOVER, ROW_BOTTOM_HOVER),
    };

    let row_corner = s(BASE_ROW_CORNER);
    let rgn = CreateRoundRectRgn(
        rect.left,
        rect.top,
        rect.right + 1,
        rect.bottom + 1,
        row_corner * 2,
        row_corner * 2,
    );
    SelectClipRgn(hdc, rgn);
    fill_v_gradient(hdc, &rect, grad_top, grad_bottom);
    SelectClipRgn(hdc, ptr::null_mut());
    DeleteObject(rgn);

    let inset = s(BASE_TEXT_INSET);
    match &row.kind {
        RowKind::Script { .. } => {
            let font = create_font(s(BASE_FONT_NAME), FW_MEDIUM as i32);
            let old_font = SelectObject(hdc, font);
            SetTextColor(hdc, TEXT_COLOR);
            let edit_left = row.edit_rect.as_ref().map_or(rect.right, |e| e.left);
            let mut text_rc = RECT {
                left: rect.left + inset,
                top: rect.top,
                right: edit_left - s(8),
                bottom: rect.bottom,
            };
            DrawTextW(
                hdc,
                row.label.as_ptr(),
                -1,
                &mut text_rc,
                DT_SINGLELINE | DT_VCENTER | DT_END_ELLIPSIS | DT_NOPREFIX,
            );
            SelectObject(hdc, old_font);
            DeleteObject(font);

            if let Some(e) = &row.edit_rect {
                let chip = RECT {
                    left: e.left,
                    top: e.top - SCROLL_OFFSET,
                    right: e.right,
                    bottom: e.bottom - SCROLL_OFFSET,
                };
                let chip_bg = CreateSolidBrush(if edit_hovered { EDIT_BG_HOVER } else { EDIT_BG });
                let old_brush = SelectObject(hdc, chip_bg);
                let old_pen = SelectObject(hdc, GetStockObject(NULL_PEN));
                let chip_corner = s(6);
                RoundRect(
                    hdc,
                    chip.left,
                    chip.top,
                    chip.right,
                    chip.bottom,
                    chip_corner * 2,
                    chip_corner * 2,
                );
                SelectObject(hdc, old_pen);
                SelectObject(hdc, old_brush);
                DeleteObject(chip_bg);

                let font = create_font(s(BASE_FONT_BUTTON), FW_NORMAL as i32);
                let old_font = SelectObject(hdc, font);
                SetTextColor(hdc, TEXT_COLOR);
                let label = to_wide("Edit");
                let mut chip_rc = chip;
                DrawTextW(
                    hdc,
                    label.as_ptr(),
                    -1,
                    &mut chip_rc,
                    DT_SINGLELINE | DT_VCENTER | DT_CENTER | DT_NOPREFIX,
                );
                SelectObject(hdc, old_font);
                DeleteObject(font);
            }
        }
        RowKind::Empty => {
            let font = create_font(s(BASE_FONT_NAME), FW_NORMAL as i32);
            let old_font = SelectObject(hdc, font);
            SetTextColor(hdc, TEXT_DIM);
            let mut text_rc = rect;
            DrawTextW(
                hdc,
                row.label.as_ptr(),
                -1,
                &mut text_rc,
                DT_SINGLELINE | DT_VCENTER | DT_CENTER | DT_NOPREFIX,
            );
            SelectObject(hdc, old_font);
            DeleteObject(font);
        }
        RowKind::AddNew | RowKind::OpenFolder => {
            let font = create_font(s(BASE_FONT_BUTTON), FW_MEDIUM as i32);
            let old_font = SelectObject(hdc, font);
            SetTextColor(hdc, TEXT_COLOR);
            let mut text_rc = rect;
            DrawTextW(
                hdc,
                row.label.as_ptr(),
                -1,
                &mut text_rc,
                DT_SINGLELINE | DT_VCENTER | DT_CENTER | DT_NOPREFIX,
            );
            SelectObject(hdc, old_font);
            DeleteObject(font);
        }
    }
}

// GDI has no linear-gradient brush; paint two-pixel bands instead. Rows are
// ~50px tall, so this stays well under the cost of the text drawing.
unsafe fn fill_v_gradient(hdc: HDC, rect: &RECT, top_color: u32, bottom_color: u32) {
    let height = rect.bottom - rect.top;
    if height <= 0 {
        return;
    }
    let (tr, tg, tb) = (top_color & 0xFF, (top_color >> 8) & 0xFF, (top_color >> 16) & 0xFF);
    let (br, bg, bb) = (
        bottom_color & 0xFF,
        (bottom_color >> 8) & 0xFF,
        (bottom_color >> 16) & 0xFF,
    );

    const BAND: i32 = 2;
    let mut y = 0;
    while y < height {
        let t = y as f64 / height as f64;
        let r = (tr as f64 + (br as f64 - tr as f64) * t) as u32;
        let g = (tg as f64 + (bg as f64 - tg as f64) * t) as u32;
        let b = (tb as f64 + (bb as f64 - tb as f64) * t) as u32;
        let brush = CreateSolidBrush(rgb(r, g, b));
        let band = RECT {
            left: rect.left,
            top: rect.top + y,
            right: rect.right,
            bottom: (rect.top + y + BAND).min(rect.bottom),
        };
        FillRect(hdc, &band, brush);
        DeleteObject(brush);
        y += BAND;
    }
}

unsafe fn create_font(size: i32, weight: i32) -> HFONT {
    CreateFontW(
        size,
        0,
        0,
        0,
        weight,
        0,
        0,
        0,
        DEFAULT_CHARSET as u32,
        OUT_DEFAULT_PRECIS as u32,
        CLIP_DEFAULT_PRECIS as u32,
        CLEARTYPE_QUALITY as u32,
        DEFAULT_PITCH as u32,
        to_wide("Segoe UI").as_ptr(),
    )
}

fn ease_out_cubic(t: f64) -> f64 {
    let u = 1.0 - t;
    1.0 - u * u * u
}

fn ease_in_cubic(t: f64) -> f64 {
    t * t * t
}

pub fn show_error(title: &str, msg: &str) {
    let wide_title = to_wide(title);
    let wide_msg = to_wide(msg);
    unsafe {
        MessageBoxW(
            ptr::null_mut(),
            wide_msg.as_ptr(),
            wide_title.as_ptr(),
            MB_OK | MB_ICONERROR | MB_TOPMOST,
        );
    }
}

/// Message box on a detached thread: the main loop keeps pumping and the
/// hook path is never stalled behind a dialog.
pub fn notify_error(title: &str, msg: &str) {
    let wide_title = to_wide(title);
    let wide_msg = to_wide(msg);
    std::thread::spawn(move || unsafe {
        MessageBoxW(
            ptr::null_mut(),
            wide_msg.as_ptr(),
            wide_title.as_ptr(),
            MB_OK | MB_ICONWARNING | MB_TOPMOST,
        );
    });
}

fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}
