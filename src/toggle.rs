use anyhow::Result;

/// One visible launcher popup, as seen by the controller. The native window
/// can also die on its own (focus loss, script launched), so the controller
/// checks `is_open` rather than assuming its handle is current.
pub trait Popup {
    /// Dismisses the popup. Safe to call after it already closed itself.
    fn close(&mut self);

    /// False once the popup has been dismissed by any path.
    fn is_open(&self) -> bool;
}

/// At most one popup exists; the tag makes that structural instead of a
/// nullable-field convention.
pub enum PopupState<P> {
    Idle,
    Showing(P),
}

/// Owns the single popup reference and flips it on qualifying trigger events.
/// Must only be touched from the thread that owns the windows; the hook
/// callback hands events over via the platform queue, never calls in here.
pub struct ToggleController<P, F>
where
    P: Popup,
    F: FnMut() -> Result<P>,
{
    open_popup: F,
    state: PopupState<P>,
}

impl<P, F> ToggleController<P, F>
where
    P: Popup,
    F: FnMut() -> Result<P>,
{
    pub fn new(open_popup: F) -> Self {
        Self {
            open_popup,
            state: PopupState::Idle,
        }
    }

    pub fn is_showing(&self) -> bool {
        matches!(self.state, PopupState::Showing(_))
    }

    /// Handles one qualifying trigger event: close the popup if one is up,
    /// otherwise open a fresh one. A popup that already dismissed itself
    /// counts as closed, so the event opens a new instance rather than
    /// toggling a stale handle. On construction failure the state stays
    /// `Idle` and the error goes back to the caller.
    pub fn toggle(&mut self) -> Result<()> {
        self.sweep();
        match std::mem::replace(&mut self.state, PopupState::Idle) {
            PopupState::Showing(mut popup) => {
                popup.close();
            }
            PopupState::Idle => {
                let popup = (self.open_popup)()?;
                self.state = PopupState::Showing(popup);
            }
        }
        Ok(())
    }

    /// Folds an externally dismissed popup back to `Idle`. Called every loop
    /// turn so close notifications don't wait for the next click.
    pub fn sweep(&mut self) {
        if let PopupState::Showing(popup) = &self.state {
            if !popup.is_open() {
                self.state = PopupState::Idle;
            }
        }
    }

    /// Idempotent close, for shutdown and explicit dismissal. Closing twice
    /// (or racing a self-dismissal) is a no-op.
    pub fn close(&mut self) {
        if let PopupState::Showing(mut popup) = std::mem::replace(&mut self.state, PopupState::Idle)
        {
            popup.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Shared spy state so tests can poke popups the controller holds.
    #[derive(Default)]
    struct SpyState {
        opened: usize,
        open_flags: Vec<Rc<RefCell<bool>>>,
        fail_next: bool,
    }

    struct FakePopup {
        open: Rc<RefCell<bool>>,
    }

    impl Popup for FakePopup {
        fn close(&mut self) {
            *self.open.borrow_mut() = false;
        }

        fn is_open(&self) -> bool {
            *self.open.borrow()
        }
    }

    fn controller(
        state: Rc<RefCell<SpyState>>,
    ) -> ToggleController<FakePopup, impl FnMut() -> Result<FakePopup>> {
        ToggleController::new(move || {
            let mut s = state.borrow_mut();
            if s.fail_next {
                s.fail_next = false;
                anyhow::bail!("window creation failed");
            }
            s.opened += 1;
            let open = Rc::new(RefCell::new(true));
            s.open_flags.push(open.clone());
            Ok(FakePopup { open })
        })
    }

    #[test]
    fn strict_alternation_over_event_sequence() {
        let state = Rc::new(RefCell::new(SpyState::default()));
        let mut ctl = controller(state.clone());

        for n in 1..=6 {
            ctl.toggle().unwrap();
            assert_eq!(ctl.is_showing(), n % 2 == 1, "after event {}", n);
        }
        // three opens, each closed by the following event
        assert_eq!(state.borrow().opened, 3);
    }

    #[test]
    fn external_close_drives_idle_and_next_toggle_opens_fresh_instance() {
        let state = Rc::new(RefCell::new(SpyState::default()));
        let mut ctl = controller(state.clone());

        ctl.toggle().unwrap();
        assert!(ctl.is_showing());

        // popup dismisses itself (focus loss)
        *state.borrow().open_flags[0].borrow_mut() = false;
        ctl.sweep();
        assert!(!ctl.is_showing());

        ctl.toggle().unwrap();
        assert!(ctl.is_showing());
        assert_eq!(state.borrow().opened, 2, "stale popup must not be reused");
    }

    #[test]
    fn external_close_without_sweep_still_opens_on_next_toggle() {
        let state = Rc::new(RefCell::new(SpyState::default()));
        let mut ctl = controller(state.clone());

        ctl.toggle().unwrap();
        *state.borrow().open_flags[0].borrow_mut() = false;

        // no sweep in between; the toggle itself notices the dead popup
        ctl.toggle().unwrap();
        assert!(ctl.is_showing());
        assert_eq!(state.borrow().opened, 2);
    }

    #[test]
    fn double_close_is_a_noop() {
        let state = Rc::new(RefCell::new(SpyState::default()));
        let mut ctl = controller(state);

        ctl.toggle().unwrap();
        ctl.close();
        ctl.close();
        assert!(!ctl.is_showing());
    }

    #[test]
    fn close_racing_self_dismissal_is_a_noop() {
        let state = Rc::new(RefCell::new(SpyState::default()));
        let mut ctl = controller(state.clone());

        ctl.toggle().unwrap();
        // popup closed itself just before the controller's explicit close
        *state.borrow().open_flags[0].borrow_mut() = false;
        ctl.close();
        assert!(!ctl.is_showing());
    }

    #[test]
    fn construction_failure_reverts_to_idle_and_recovers() {
        let state = Rc::new(RefCell::new(SpyState::default()));
        let mut ctl = controller(state.clone());

        state.borrow_mut().fail_next = true;
        assert!(ctl.toggle().is_err());
        assert!(!ctl.is_showing(), "no dangling showing-but-no-window state");

        ctl.toggle().unwrap();
        assert!(ctl.is_showing());
        assert_eq!(state.borrow().opened, 1);
    }

    #[test]
    fn close_while_idle_is_a_noop() {
        let state = Rc::new(RefCell::new(SpyState::default()));
        let mut ctl = controller(state);
        ctl.close();
        assert!(!ctl.is_showing());
    }
}
