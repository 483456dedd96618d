use crate::jupiter::JupiterPreset;
use crate::model::{Page, Scene};
use crate::roemer::RoemerPreset;
use crate::sim::Action;
use crate::venus::VenusPreset;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::time::Duration;

#[derive(Clone, Debug)]
pub(crate) struct InputEvent {
    pub(crate) key: KeyCode,
    pub(crate) mods: KeyModifiers,
}

pub(crate) fn collect_input_nonblocking(max_frame_time: Duration) -> anyhow::Result<Vec<InputEvent>> {
    let mut out = Vec::new();

    let timeout = std::cmp::min(Duration::from_millis(1), max_frame_time);
    while event::poll(timeout)? {
        if let Event::Key(k) = event::read()? {
            if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat {
                out.push(InputEvent {
                    key: k.code,
                    mods: k.modifiers,
                });
                if out.len() >= 32 {
                    break;
                }
            }
        }
    }
    Ok(out)
}

pub(crate) fn map_event_to_action(page: Page, scene: &Scene, ev: InputEvent) -> Option<Action> {
    if matches!(scene, Scene::DateEntry(_)) {
        return match ev.key {
            KeyCode::Enter => Some(Action::EntryCommit),
            KeyCode::Esc => Some(Action::EntryCancel),
            KeyCode::Backspace => Some(Action::EntryBackspace),
            KeyCode::Char(ch) if ch.is_ascii_digit() || ch == '-' || ch == ':' || ch == ' ' => {
                Some(Action::EntryChar(ch))
            }
            _ => None,
        };
    }

    if matches!(ev.key, KeyCode::Char('c')) && ev.mods.contains(KeyModifiers::CONTROL) {
        return Some(Action::Quit);
    }
    match ev.key {
        KeyCode::Char('q') | KeyCode::Char('Q') => return Some(Action::Quit),
        KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => {
            return Some(Action::HelpToggle)
        }
        KeyCode::Esc => return Some(Action::Back),
        KeyCode::Tab => return Some(Action::NextPage),
        KeyCode::Char('1') => return Some(Action::GoTo(Page::Jupiter)),
        KeyCode::Char('2') => return Some(Action::GoTo(Page::Venus)),
        KeyCode::Char('3') => return Some(Action::GoTo(Page::Roemer)),
        KeyCode::Char(' ') => return Some(Action::TogglePlay),
        _ => {}
    }

    if matches!(scene, Scene::Help) {
        return None;
    }

    match page {
        Page::Jupiter => match ev.key {
            KeyCode::Left => Some(Action::ShiftHours(-1)),
            KeyCode::Right => Some(Action::ShiftHours(1)),
            KeyCode::Down => Some(Action::ShiftHours(-24)),
            KeyCode::Up => Some(Action::ShiftHours(24)),
            KeyCode::Char('[') => Some(Action::Rotate(-5.0)),
            KeyCode::Char(']') => Some(Action::Rotate(5.0)),
            KeyCode::Char('g') | KeyCode::Char('G') => Some(Action::Jupiter(JupiterPreset::Galileo)),
            KeyCode::Char('n') | KeyCode::Char('N') => Some(Action::Jupiter(JupiterPreset::Now)),
            KeyCode::Char('l') | KeyCode::Char('L') => Some(Action::ToggleLabels),
            KeyCode::Char('d') | KeyCode::Char('D') => Some(Action::EntryOpen),
            _ => None,
        },
        Page::Venus => match ev.key {
            KeyCode::Left => Some(Action::NudgeVenus(-2.0)),
            KeyCode::Right => Some(Action::NudgeVenus(2.0)),
            KeyCode::Char('i') | KeyCode::Char('I') => Some(Action::Venus(VenusPreset::InferiorConjunction)),
            KeyCode::Char('e') | KeyCode::Char('E') => Some(Action::Venus(VenusPreset::GreatestElongation)),
            KeyCode::Char('s') | KeyCode::Char('S') => Some(Action::Venus(VenusPreset::SuperiorConjunction)),
            _ => None,
        },
        Page::Roemer => match ev.key {
            KeyCode::Left => Some(Action::NudgeMonth(-0.1)),
            KeyCode::Right => Some(Action::NudgeMonth(0.1)),
            KeyCode::Down => Some(Action::NudgeMonth(-1.0)),
            KeyCode::Up => Some(Action::NudgeMonth(1.0)),
            KeyCode::Char('o') | KeyCode::Char('O') => Some(Action::Roemer(RoemerPreset::Opposition)),
            KeyCode::Char('c') | KeyCode::Char('C') => Some(Action::Roemer(RoemerPreset::Conjunction)),
            _ => None,
        },
    }
}
