use super::*;
use crate::foundation::error::SlideError;

fn nav(total: usize) -> DeckNavigator {
    DeckNavigator::new(total, ExportFlag::new())
}

#[test]
fn next_and_previous_clamp_at_the_ends() {
    let mut n = nav(3);
    assert_eq!(n.previous(), NavOutcome::Unchanged);
    assert_eq!(n.current(), 0);
    assert_eq!(n.next(), NavOutcome::Moved(1));
    assert_eq!(n.next(), NavOutcome::Moved(2));
    assert_eq!(n.next(), NavOutcome::Unchanged);
    assert_eq!(n.current(), 2);
    assert_eq!(n.previous(), NavOutcome::Moved(1));
}

#[test]
fn jump_clamps_out_of_range() {
    let mut n = nav(5);
    assert_eq!(n.jump_to(99), NavOutcome::Moved(4));
    assert_eq!(n.jump_to(2), NavOutcome::Moved(2));
    assert_eq!(n.jump_to(2), NavOutcome::Unchanged);
}

#[test]
fn empty_deck_stays_at_zero() {
    let mut n = nav(0);
    assert_eq!(n.next(), NavOutcome::Unchanged);
    assert_eq!(n.jump_to(3), NavOutcome::Unchanged);
    assert_eq!(n.current(), 0);
}

#[test]
fn keyboard_contract() {
    let mut host = WindowedHost::default();
    let mut n = nav(3);
    assert_eq!(n.handle_key(Key::ArrowRight, &mut host), NavOutcome::Moved(1));
    assert_eq!(n.handle_key(Key::Space, &mut host), NavOutcome::Moved(2));
    assert_eq!(n.handle_key(Key::ArrowLeft, &mut host), NavOutcome::Moved(1));
    assert_eq!(n.handle_key(Key::Other, &mut host), NavOutcome::Unchanged);
    assert_eq!(
        n.handle_key(Key::Escape, &mut host),
        NavOutcome::CloseRequested
    );

    n.toggle_fullscreen(&mut host);
    assert_eq!(
        n.handle_key(Key::Escape, &mut host),
        NavOutcome::ExitedFullscreen
    );
    assert!(!host.is_fullscreen());
    assert!(!n.is_fullscreen());
}

#[test]
fn key_names() {
    assert_eq!(Key::from_name("ArrowRight"), Key::ArrowRight);
    assert_eq!(Key::from_name(" "), Key::Space);
    assert_eq!(Key::from_name("Esc"), Key::Escape);
    assert_eq!(Key::from_name("q"), Key::Other);
}

#[test]
fn input_is_ignored_while_exporting() {
    let flag = ExportFlag::new();
    let mut n = DeckNavigator::new(4, flag.clone());
    let mut host = WindowedHost::default();
    let guard = flag.try_acquire().unwrap();
    assert!(n.is_blocked());
    for key in [Key::ArrowRight, Key::ArrowLeft, Key::Space, Key::Escape] {
        assert_eq!(n.handle_key(key, &mut host), NavOutcome::Ignored);
    }
    assert_eq!(n.current(), 0);
    drop(guard);
    assert_eq!(n.handle_key(Key::ArrowRight, &mut host), NavOutcome::Moved(1));
}

/// Host whose platform state changes behind the navigator's back.
struct ExternalHost {
    on: bool,
    fail: bool,
}

impl FullscreenHost for ExternalHost {
    fn is_fullscreen(&self) -> bool {
        self.on
    }

    fn set_fullscreen(&mut self, on: bool) -> SlideResult<()> {
        if self.fail {
            return Err(SlideError::validation("denied"));
        }
        self.on = on;
        Ok(())
    }
}

#[test]
fn toggle_follows_platform_state() {
    let mut n = nav(2);
    let mut host = ExternalHost {
        on: true,
        fail: false,
    };
    // The user entered fullscreen through the OS; toggling must leave it.
    assert!(!n.toggle_fullscreen(&mut host));
    assert!(!host.on);
    assert!(n.toggle_fullscreen(&mut host));
    assert!(host.on);
}

#[test]
fn failed_fullscreen_request_keeps_platform_state() {
    let mut n = nav(2);
    let mut host = ExternalHost {
        on: false,
        fail: true,
    };
    assert!(!n.toggle_fullscreen(&mut host));
    assert!(!n.is_fullscreen());
}
