use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyCode, KeyModifiers),
    Resize(u16, u16),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Quit,
    HelpToggle,
    SelectPrev,
    SelectNext,
    /// Step the selected field; categorical fields cycle by the sign.
    Adjust(i32),
    Random,
    Preset(usize),
    PinToggle,
    Export,
    Share,
    ColorToggle,
    MotionToggle,
}

pub fn collect_input_nonblocking(max_wait: Duration) -> anyhow::Result<Vec<InputEvent>> {
    let mut out = Vec::new();

    // poll with a tiny timeout so we stay responsive
    let timeout = std::cmp::min(Duration::from_millis(1), max_wait);
    while event::poll(timeout)? {
        match event::read()? {
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press | KeyEventKind::Repeat,
                ..
            }) => out.push(InputEvent::Key(code, modifiers)),
            Event::Resize(c, r) => out.push(InputEvent::Resize(c, r)),
            _ => {}
        }
        if out.len() >= 32 {
            break;
        }
    }
    Ok(out)
}

pub fn map_key(code: KeyCode, mods: KeyModifiers, help_open: bool) -> Option<Action> {
    if code == KeyCode::Char('c') && mods.contains(KeyModifiers::CONTROL) {
        return Some(Action::Quit);
    }
    if help_open {
        return match code {
            KeyCode::Char('q') | KeyCode::Char('Q') => Some(Action::Quit),
            KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H') => Some(Action::HelpToggle),
            _ => None,
        };
    }
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => Some(Action::HelpToggle),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::SelectPrev),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => Some(Action::SelectNext),
        KeyCode::Left => Some(Action::Adjust(-5)),
        KeyCode::Right | KeyCode::Enter => Some(Action::Adjust(5)),
        KeyCode::Char('[') => Some(Action::Adjust(-1)),
        KeyCode::Char(']') => Some(Action::Adjust(1)),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Action::Random),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Action::PinToggle),
        KeyCode::Char('e') | KeyCode::Char('E') => Some(Action::Export),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(Action::Share),
        KeyCode::Char('c') | KeyCode::Char('C') => Some(Action::ColorToggle),
        KeyCode::Char('m') | KeyCode::Char('M') => Some(Action::MotionToggle),
        KeyCode::Char(d @ '1'..='9') => Some(Action::Preset(d as usize - '1' as usize)),
        _ => None,
    }
}
