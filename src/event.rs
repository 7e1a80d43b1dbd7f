use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

#[derive(Debug, Clone)]
pub enum Event {
    Init,
    Tick,
    Render,
    Resize,
    Key(KeyEvent),
    Mouse(MouseEvent),
}

impl Event {
    pub fn is_quit(&self) -> bool {
        matches!(
            self,
            Event::Key(KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            })
        )
    }

    /// Wheel events are the only mouse input we care about.
    pub fn is_wheel(&self) -> bool {
        matches!(
            self,
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::ScrollDown | MouseEventKind::ScrollUp,
                ..
            })
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mouse(kind: MouseEventKind) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn ctrl_c_quits_plain_c_does_not() {
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        let c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE));
        assert!(ctrl_c.is_quit());
        assert!(!c.is_quit());
    }

    #[test]
    fn only_wheel_mouse_events_pass() {
        assert!(mouse(MouseEventKind::ScrollDown).is_wheel());
        assert!(mouse(MouseEventKind::ScrollUp).is_wheel());
        assert!(!mouse(MouseEventKind::Moved).is_wheel());
    }
}
