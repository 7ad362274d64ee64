//! Session lifecycle and foreground dispatcher.
//!
//! A [`Session`] owns everything: the shared state, the contact directory,
//! the input source and the auto-scroll thread. Nothing is global.
//!
//! Threads:
//! - foreground (caller of [`Session::run`]): blocks on input, applies
//!   navigation transitions, runs feature flows
//! - auto-scroll ([`crate::scheduler::AutoScroll`]): ticks navigation on a
//!   timer
//!
//! Lock order is navigation, then display. Settings are locked alone.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::contacts::ContactDirectory;
use crate::display::{DisplayHandle, DisplaySink};
use crate::error::{Error, Result};
use crate::flows::{FlowContext, flow_for};
use crate::input::InputSource;
use crate::menu::{NavigationState, StateDump, Transition, update, view};
use crate::scheduler::AutoScroll;
use crate::types::{Action, MenuItem, SessionConfig, Settings};

/// How often a foreground wait for input rechecks the shutdown flag.
const SHUTDOWN_POLL: Duration = Duration::from_millis(100);

// ============================================================================
// SHARED STATE
// ============================================================================

/// State shared by the foreground loop and the auto-scroll thread.
pub struct Shared {
    nav: Mutex<NavigationState>,
    settings: Mutex<Settings>,
    display: DisplayHandle,
    shutdown: AtomicBool,
    fault: Mutex<Option<Error>>,
}

impl Shared {
    pub fn new(settings: Settings, display: impl DisplaySink + 'static) -> Self {
        Self {
            nav: Mutex::new(NavigationState::new()),
            settings: Mutex::new(settings),
            display: DisplayHandle::new(display),
            shutdown: AtomicBool::new(false),
            fault: Mutex::new(None),
        }
    }

    /// The only way to read or write navigation state.
    ///
    /// `f` runs with the lock held, so anything it does (including drawing)
    /// is atomic with respect to the other thread.
    pub fn with_nav<R>(&self, f: impl FnOnce(&mut NavigationState) -> Result<R>) -> Result<R> {
        let mut nav = self.nav.lock().map_err(|_| Error::LockPoisoned("navigation"))?;
        f(&mut nav)
    }

    /// Copy of the current navigation state.
    pub fn navigation(&self) -> Result<NavigationState> {
        self.with_nav(|nav| Ok(*nav))
    }

    pub fn settings(&self) -> Result<Settings> {
        let settings = self.settings.lock().map_err(|_| Error::LockPoisoned("settings"))?;
        Ok(*settings)
    }

    /// Change settings. The next auto-scroll cycle sees the result.
    pub fn update_settings(&self, f: impl FnOnce(&mut Settings)) -> Result<Settings> {
        let mut settings = self.settings.lock().map_err(|_| Error::LockPoisoned("settings"))?;
        f(&mut settings);
        Ok(*settings)
    }

    pub fn display(&self) -> &DisplayHandle {
        &self.display
    }

    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    pub fn shutdown_requested(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    /// Record an invariant violation seen off the foreground thread.
    ///
    /// Logs the state dump, then asks the foreground to stop. The
    /// foreground picks the error up with [`take_fault`](Self::take_fault)
    /// and aborts.
    pub fn report_fault(&self, err: Error) {
        let dump = self.dump(&err.to_string()).to_json();
        error!(%dump, "invariant violated off the foreground");
        *self.fault.lock().unwrap_or_else(PoisonError::into_inner) = Some(err);
        self.request_shutdown();
    }

    pub fn take_fault(&self) -> Option<Error> {
        self.fault.lock().unwrap_or_else(PoisonError::into_inner).take()
    }

    /// Best-effort snapshot for an error report. Works on poisoned locks.
    pub fn dump(&self, reason: &str) -> StateDump {
        let navigation = *self.nav.lock().unwrap_or_else(PoisonError::into_inner);
        StateDump {
            reason: reason.to_string(),
            navigation,
            settings: self.settings.lock().ok().map(|s| *s),
            menu_len: MenuItem::ALL.len(),
        }
    }
}

impl std::fmt::Debug for Shared {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shared")
            .field("nav", &self.nav)
            .field("settings", &self.settings)
            .field("shutdown", &self.shutdown)
            .field("fault", &self.fault)
            .finish_non_exhaustive()
    }
}

/// Draw the pair window for `nav`. Call with the navigation lock held.
fn redraw_menu(shared: &Shared, nav: &NavigationState) -> Result<()> {
    shared.display().present(&view::main_menu(nav, &MenuItem::ALL))
}

/// Log the state dump and abort.
///
/// Only for invariant violations; the terminal panic hook restores the
/// screen before the message is printed.
fn fatal(shared: &Shared, err: &Error) -> ! {
    let dump = shared.dump(&err.to_string()).to_json();
    error!(%dump, "invariant violated");
    panic!("invariant violated: {dump}");
}

// ============================================================================
// SESSION
// ============================================================================

/// One running menu.
pub struct Session {
    shared: Arc<Shared>,
    input: Box<dyn InputSource>,
    contacts: ContactDirectory,
    config: SessionConfig,
    scroller: Option<AutoScroll>,
}

impl Session {
    pub fn new(
        config: SessionConfig,
        display: impl DisplaySink + 'static,
        input: impl InputSource + 'static,
    ) -> Self {
        Self {
            shared: Arc::new(Shared::new(config.settings(), display)),
            input: Box::new(input),
            contacts: ContactDirectory::seeded(&config.contacts),
            config,
            scroller: None,
        }
    }

    pub fn shared(&self) -> &Arc<Shared> {
        &self.shared
    }

    pub fn contacts(&self) -> &ContactDirectory {
        &self.contacts
    }

    pub fn is_running(&self) -> bool {
        self.scroller.as_ref().is_some_and(AutoScroll::is_running)
    }

    /// Draw the pair window for the current navigation state.
    pub fn draw_menu(&self) -> Result<()> {
        self.shared.with_nav(|nav| redraw_menu(&self.shared, nav))
    }

    /// Draw the menu and start auto-scroll.
    pub fn start(&mut self) -> Result<()> {
        if self.scroller.is_some() {
            return Ok(());
        }
        self.draw_menu()?;
        self.scroller = Some(AutoScroll::spawn(Arc::clone(&self.shared))?);
        info!(
            contacts = self.contacts.len(),
            speed = self.config.scroll_speed.label(),
            "session started"
        );
        Ok(())
    }

    /// Foreground loop. Returns when input closes or shutdown is requested.
    ///
    /// Invariant violations do not return: they log a state dump and panic,
    /// including ones the auto-scroll thread reported while this loop was
    /// waiting for input.
    pub fn run(&mut self) -> Result<()> {
        while !self.shared.shutdown_requested() {
            let action = match self.input.next_action(Some(SHUTDOWN_POLL)) {
                Ok(Some(action)) => action,
                Ok(None) => continue,
                Err(Error::InputClosed) => {
                    info!("input closed");
                    break;
                }
                Err(e) => return Err(e),
            };

            match self.handle(action) {
                Ok(()) => {}
                Err(Error::InputClosed) => {
                    info!("input closed during flow");
                    break;
                }
                Err(e) if e.is_invariant_violation() => fatal(&self.shared, &e),
                Err(e) => return Err(e),
            }
        }

        if let Some(err) = self.shared.take_fault() {
            fatal(&self.shared, &err);
        }
        Ok(())
    }

    /// Apply one top-level action, running a flow if it selects one.
    pub fn handle(&mut self, action: Action) -> Result<()> {
        let transition = self.shared.with_nav(|nav| {
            let transition = update::update(*nav, action, &MenuItem::ALL)?;
            match transition {
                Transition::Screen(next) => {
                    if next != *nav {
                        *nav = next;
                        redraw_menu(&self.shared, nav)?;
                    }
                }
                Transition::Dispatch { state, .. } => *nav = state,
            }
            Ok(transition)
        })?;
        debug!(?action, ?transition, "top-level action");

        if let Transition::Dispatch { item, .. } = transition {
            self.run_flow(item)?;
        }
        Ok(())
    }

    /// Run `item`'s flow with navigation paused, then return to idle scroll.
    fn run_flow(&mut self, item: MenuItem) -> Result<()> {
        info!(%item, "flow started");
        let result = match flow_for(item) {
            Some(flow) => {
                let mut ctx = FlowContext {
                    shared: &self.shared,
                    input: self.input.as_mut(),
                    contacts: &mut self.contacts,
                    config: &self.config,
                };
                flow(&mut ctx)
            }
            None => {
                warn!(%item, "no flow registered");
                Ok(())
            }
        };

        // Recover the menu before reporting anything, so a closed input or a
        // display error still leaves navigation unpaused.
        if matches!(&result, Err(e) if e.is_invariant_violation()) {
            return result;
        }
        let finished = self.shared.with_nav(|nav| {
            *nav = update::finish_flow();
            redraw_menu(&self.shared, nav)
        });

        match result {
            Ok(()) => {
                info!(%item, "flow finished");
                finished
            }
            Err(e) => {
                warn!(%item, error = %e, "flow ended with error");
                Err(e)
            }
        }
    }

    /// Stop and join the auto-scroll thread. Idempotent.
    pub fn stop(&mut self) {
        if let Some(mut scroller) = self.scroller.take() {
            scroller.stop();
            info!("session stopped");
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.stop();
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Instant;

    use crate::display::MemoryDisplay;
    use crate::input::{ScriptedInput, Step};
    use crate::menu::Screen;
    use crate::types::ScrollSpeed;

    use Action::{DoubleTap as D, Tap as S};

    fn quick_config() -> SessionConfig {
        SessionConfig {
            dial_hold_ms: 0,
            notice_hold_ms: 0,
            wheel_step_ms: 1,
            ..Default::default()
        }
    }

    fn session(steps: Vec<Step>) -> (MemoryDisplay, Session) {
        let display = MemoryDisplay::new(16);
        let session = Session::new(quick_config(), display.clone(), ScriptedInput::new(steps));
        (display, session)
    }

    fn press(actions: &[Action]) -> Vec<Step> {
        actions.iter().copied().map(Step::Press).collect()
    }

    /// Input that stays open but never produces a press.
    struct SilentInput;

    impl InputSource for SilentInput {
        fn next_action(&mut self, timeout: Option<Duration>) -> Result<Option<Action>> {
            thread::sleep(timeout.unwrap_or(Duration::from_secs(5)));
            Ok(None)
        }
    }

    fn poison_settings(shared: &Arc<Shared>) {
        let poisoner = Arc::clone(shared);
        let _ = thread::spawn(move || {
            let _ = poisoner.update_settings(|_| panic!("poison"));
        })
        .join();
    }

    /// True for pair-window frames; flow frames never start with a blank
    /// or a highlight marker.
    fn is_menu_frame(frame: &[String; 2]) -> bool {
        frame[0].starts_with([' ', '>'])
    }

    // ===== shared state =====

    #[test]
    fn poisoned_navigation_lock_is_reported() {
        let shared = Arc::new(Shared::new(Settings::default(), MemoryDisplay::new(16)));
        let poisoner = Arc::clone(&shared);
        let _ = thread::spawn(move || {
            let _ = poisoner.with_nav(|_| -> Result<()> { panic!("poison") });
        })
        .join();

        let err = shared.navigation().unwrap_err();
        assert!(matches!(err, Error::LockPoisoned("navigation")));
        assert!(err.is_invariant_violation());
        assert_eq!(shared.dump("after poison").navigation, NavigationState::new());
    }

    #[test]
    fn update_settings_returns_new_value() {
        let shared = Shared::new(Settings::default(), MemoryDisplay::new(16));
        let settings = shared
            .update_settings(|s| s.scroll_speed = ScrollSpeed::Fast)
            .unwrap();
        assert_eq!(settings.scroll_speed, ScrollSpeed::Fast);
        assert_eq!(shared.settings().unwrap(), settings);
    }

    // ===== top-level dispatch =====

    #[test]
    fn first_tap_highlights_and_redraws() {
        let (display, mut session) = session(Vec::new());
        session.handle(S).unwrap();
        assert_eq!(session.shared().navigation().unwrap().screen, Screen::MainHighlight);
        assert_eq!(display.rows(), ["> Dial".to_string(), "  Contacts".to_string()]);
    }

    #[test]
    fn long_press_at_top_level_does_not_redraw() {
        let (display, mut session) = session(Vec::new());
        session.handle(Action::LongPress).unwrap();
        assert_eq!(display.history().len(), 0);
    }

    #[test]
    fn flow_pauses_then_resets_navigation() {
        // Heart Rate lives in the second pair.
        let (display, mut session) = session(Vec::new());
        session
            .shared()
            .with_nav(|nav| {
                nav.pair_offset = 2;
                Ok(())
            })
            .unwrap();
        session.handle(S).unwrap();
        session
            .shared()
            .with_nav(|nav| {
                nav.highlight_index = 1;
                Ok(())
            })
            .unwrap();
        session.handle(S).unwrap();

        let history = display.history();
        assert!(history.iter().any(|[top, _]| top == "No HR Sensor"));
        assert_eq!(session.shared().navigation().unwrap(), NavigationState::new());
        assert_eq!(display.rows(), [" Dial".to_string(), " Contacts".to_string()]);
    }

    #[test]
    fn navigation_is_paused_while_flow_runs() {
        // Emergency selector waits for input; the script ends inside it.
        let (_display, mut session) = session(Vec::new());
        session
            .shared()
            .with_nav(|nav| {
                *nav = NavigationState {
                    screen: Screen::MainHighlight,
                    pair_offset: 2,
                    highlight_index: 0,
                    paused: false,
                };
                Ok(())
            })
            .unwrap();

        let err = session.handle(S).unwrap_err();
        assert!(matches!(err, Error::InputClosed));
        // Even an aborted flow hands navigation back.
        assert!(!session.shared().navigation().unwrap().paused);
    }

    #[test]
    #[should_panic(expected = "invariant violated")]
    fn invalid_selection_is_fatal() {
        let (_display, mut session) = session(press(&[S]));
        session
            .shared()
            .with_nav(|nav| {
                *nav = NavigationState {
                    screen: Screen::MainHighlight,
                    pair_offset: 6,
                    highlight_index: 0,
                    paused: false,
                };
                Ok(())
            })
            .unwrap();
        let _ = session.run();
    }

    // ===== lifecycle =====

    #[test]
    fn run_dials_and_returns_when_input_closes() {
        let mut steps = press(&[S, S]); // Dial
        for digit in "5551234567".chars() {
            let n = digit as usize - '0' as usize;
            steps.extend(std::iter::repeat_n(Step::Idle, n));
            steps.push(Step::Press(S));
        }
        let (display, mut session) = session(steps);

        session.run().unwrap();

        let history = display.history();
        assert!(history.contains(&["Dialing:".to_string(), "5551234567".to_string()]));
        assert_eq!(session.shared().navigation().unwrap(), NavigationState::new());
    }

    #[test]
    fn double_tap_resets_to_first_pair() {
        let (display, mut session) = session(press(&[S, D]));
        session
            .shared()
            .with_nav(|nav| {
                nav.pair_offset = 4;
                Ok(())
            })
            .unwrap();
        session.run().unwrap();
        assert_eq!(session.shared().navigation().unwrap(), NavigationState::new());
        assert_eq!(display.rows(), [" Dial".to_string(), " Contacts".to_string()]);
    }

    #[test]
    fn system_shutdown_ends_run_before_input_closes() {
        let mut steps = press(&[D, S, S]); // Shut Down -> Yes
        steps.push(Step::Press(S)); // never read
        let (_display, mut session) = session(steps);
        session
            .shared()
            .with_nav(|nav| {
                *nav = NavigationState {
                    screen: Screen::MainHighlight,
                    pair_offset: 4,
                    highlight_index: 1,
                    paused: false,
                };
                Ok(())
            })
            .unwrap();

        session.handle(S).unwrap();
        assert!(session.shared().shutdown_requested());

        session.run().unwrap();
        assert_eq!(session.input.next_action(None).unwrap(), Some(S));
    }

    #[test]
    fn start_spawns_scroller_and_stop_joins_it() {
        let display = MemoryDisplay::new(16);
        let config = SessionConfig {
            scroll_speed: ScrollSpeed::Fast,
            ..quick_config()
        };
        let mut session = Session::new(config, display.clone(), ScriptedInput::default());

        session.start().unwrap();
        assert!(session.is_running());
        assert_eq!(display.history()[0], [" Dial".to_string(), " Contacts".to_string()]);

        thread::sleep(Duration::from_millis(1200));
        session.stop();
        assert!(!session.is_running());
        assert!(display.history().len() >= 2);
        assert_eq!(session.shared().navigation().unwrap().pair_offset % 2, 0);
    }

    #[test]
    fn waiting_run_notices_shutdown_without_input() {
        let mut session = Session::new(quick_config(), MemoryDisplay::new(16), SilentInput);
        let shared = Arc::clone(session.shared());
        let stopper = thread::spawn(move || {
            thread::sleep(Duration::from_millis(200));
            shared.request_shutdown();
        });

        let started = Instant::now();
        session.run().unwrap();
        assert!(started.elapsed() < Duration::from_secs(2));
        stopper.join().unwrap();
    }

    #[test]
    #[should_panic(expected = "invariant violated")]
    fn scroller_violation_aborts_the_foreground() {
        let (_display, mut session) = session(press(&[Action::LongPress, Action::LongPress]));
        poison_settings(session.shared());

        session.start().unwrap();
        thread::sleep(Duration::from_millis(100));
        assert!(!session.is_running());
        let _ = session.run();
    }

    #[test]
    fn scroller_violation_aborts_a_waiting_run() {
        let mut session = Session::new(quick_config(), MemoryDisplay::new(16), SilentInput);
        poison_settings(session.shared());
        session.start().unwrap();

        let started = Instant::now();
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| session.run()));
        assert!(outcome.is_err());
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn scroller_leaves_a_running_flow_alone() {
        let display = MemoryDisplay::new(16);
        let config = SessionConfig {
            scroll_speed: ScrollSpeed::Fast,
            ..quick_config()
        };
        // Emergency selector: sit through several scroll periods, move to
        // the second number, wait again, pick it.
        let steps = vec![
            Step::Wait(Duration::from_millis(1600)),
            Step::Press(D),
            Step::Wait(Duration::from_millis(600)),
            Step::Press(S),
        ];
        let mut session = Session::new(config, display.clone(), ScriptedInput::new(steps));
        session
            .shared()
            .with_nav(|nav| {
                *nav = NavigationState {
                    screen: Screen::MainHighlight,
                    pair_offset: 2,
                    highlight_index: 0,
                    paused: false,
                };
                Ok(())
            })
            .unwrap();
        session.start().unwrap();

        let done = Arc::new(AtomicBool::new(false));
        let watcher = {
            let shared = Arc::clone(session.shared());
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut seen = Vec::new();
                while !done.load(Ordering::SeqCst) {
                    seen.push(shared.navigation().unwrap());
                    thread::sleep(Duration::from_millis(50));
                }
                seen
            })
        };

        // The first tick is a full period away, so this dispatches Emergency.
        session.handle(S).unwrap();
        done.store(true, Ordering::SeqCst);
        let seen = watcher.join().unwrap();
        session.stop();

        let paused: Vec<_> = seen.iter().filter(|nav| nav.paused).collect();
        assert!(paused.len() >= 20, "only {} paused samples", paused.len());
        for nav in paused {
            assert_eq!(nav.screen, Screen::InFlow(MenuItem::Emergency));
            assert_eq!(nav.pair_offset, 2);
            assert_eq!(nav.highlight_index, 0);
        }

        let history = display.history();
        let first = history.iter().position(|f| !is_menu_frame(f)).unwrap();
        let last = history.iter().rposition(|f| !is_menu_frame(f)).unwrap();
        let flow_frames = &history[first..=last];
        assert!(flow_frames.iter().all(|f| !is_menu_frame(f)), "{flow_frames:?}");
        assert!(flow_frames.len() >= 3);
        assert_eq!(history[last][0], "Dialing: 000");
        assert!(is_menu_frame(&history[last + 1]));
    }
}
