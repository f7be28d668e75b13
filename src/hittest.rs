/// Screen-space rectangle of the taskbar Start-button region, captured at
/// hit-test time. Never cached between events: the shell may move or resize
/// the taskbar (auto-hide, DPI change, monitor hotplug) at any point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl ScreenRect {
    /// Containment is inclusive on all four edges, matching the window rect
    /// the shell reports for the taskbar.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }
}

/// The probe half of "is the cursor over the Start button": the rect is
/// whatever the OS lookup produced this event, `None` meaning the lookup or
/// the rect query failed. Failure is a no-op, never an error.
pub fn hit_test(rect: Option<ScreenRect>, x: i32, y: i32) -> bool {
    rect.is_some_and(|r| r.contains(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TASKBAR: ScreenRect = ScreenRect {
        left: 0,
        top: 1040,
        right: 1920,
        bottom: 1080,
    };

    #[test]
    fn boundary_points_are_inside() {
        assert!(TASKBAR.contains(0, 1040));
        assert!(TASKBAR.contains(1920, 1080));
        assert!(TASKBAR.contains(0, 1080));
        assert!(TASKBAR.contains(1920, 1040));
    }

    #[test]
    fn one_unit_outside_any_edge_is_outside() {
        assert!(!TASKBAR.contains(-1, 1060));
        assert!(!TASKBAR.contains(1921, 1060));
        assert!(!TASKBAR.contains(960, 1039));
        assert!(!TASKBAR.contains(960, 1081));
    }

    #[test]
    fn interior_point_is_inside() {
        assert!(TASKBAR.contains(960, 1060));
    }

    #[test]
    fn failed_probe_never_hits() {
        assert!(!hit_test(None, 960, 1060));
        assert!(!hit_test(None, 0, 0));
    }

    #[test]
    fn probe_with_rect_delegates_to_containment() {
        assert!(hit_test(Some(TASKBAR), 960, 1060));
        assert!(!hit_test(Some(TASKBAR), 960, 500));
    }
}
