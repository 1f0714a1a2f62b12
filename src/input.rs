/// Turn a frame's worth of terminal events into gameplay input.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::entities::KeyPresses;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub keys: KeyPresses,
    pub quit: bool,
}

impl FrameInput {
    /// Fold every pending event. Letters (including `q`) are always typing
    /// input, so quitting is bound to Esc and Ctrl-C only.
    pub fn collect<I: IntoIterator<Item = Event>>(events: I) -> Self {
        let mut input = FrameInput::default();
        for ev in events {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else {
                continue;
            };
            // Release events only arrive on keyboard-enhanced terminals.
            if kind == KeyEventKind::Release {
                continue;
            }
            match code {
                KeyCode::Esc => input.quit = true,
                KeyCode::Char('c') | KeyCode::Char('C')
                    if modifiers.contains(KeyModifiers::CONTROL) =>
                {
                    input.quit = true;
                }
                KeyCode::Char(_) if modifiers.contains(KeyModifiers::CONTROL) => {}
                KeyCode::Char(ch) => input.keys.press(ch.to_string()),
                _ => {}
            }
        }
        input
    }
}
