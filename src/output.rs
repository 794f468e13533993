// output formatting - what the user sees on stdout

use crate::core::{Message, Role, Session, SessionSummary};
use chrono::Local;
use crossterm::style::{Color, Stylize};
use std::io::IsTerminal;

pub struct Output {
    accent: Color,
    styled: bool,
}

impl Output {
    pub fn new() -> Self {
        let styled = std::io::stdout().is_terminal();

        // dark blue disappears on a dark background, cyan on a light one
        let accent = if styled && is_light_terminal() {
            Color::DarkBlue
        } else {
            Color::Cyan
        };

        Self { accent, styled }
    }

    pub fn message(&self, msg: &Message) {
        let header = header(msg);
        if self.styled {
            println!("{}", header.with(self.role_color(msg.role)).bold());
        } else {
            println!("{header}");
        }
        println!("{}\n", msg.content.trim_end());
    }

    pub fn history(&self, session: &Session) {
        if !session.hint.is_empty() {
            println!("hint: {}\n", session.hint);
        }

        if session.messages.is_empty() {
            println!("no messages");
            return;
        }

        for msg in &session.messages {
            self.message(msg);
        }
    }

    pub fn sessions(&self, sessions: &[SessionSummary], current: &str) {
        if sessions.is_empty() {
            println!("no sessions");
            return;
        }

        let width = name_width(sessions);
        for s in sessions {
            let line = session_line(s, width, s.name == current);
            if self.styled && s.name == current {
                println!("{}", line.with(self.accent));
            } else {
                println!("{line}");
            }
        }
    }

    fn role_color(&self, role: Role) -> Color {
        match role {
            Role::User => Color::Green,
            Role::System => Color::Yellow,
            Role::Assistant => self.accent,
        }
    }
}

fn is_light_terminal() -> bool {
    terminal_light::luma().map(|l| l > 0.6).unwrap_or(false)
}

fn header(msg: &Message) -> String {
    format!(
        "{} · {}",
        msg.role,
        msg.date.with_timezone(&Local).format("%Y-%m-%d %H:%M")
    )
}

// padding counts chars, so width must too
fn name_width(sessions: &[SessionSummary]) -> usize {
    sessions
        .iter()
        .map(|s| s.name.chars().count())
        .max()
        .unwrap_or(0)
}

fn session_line(s: &SessionSummary, width: usize, current: bool) -> String {
    let marker = if current { '*' } else { ' ' };
    let count = match s.message_count {
        1 => "1 message".to_string(),
        n => format!("{n} messages"),
    };

    let mut line = format!("{marker} {:width$}  {count}", s.name);
    if !s.hint.is_empty() {
        // keep long hints on one line
        let hint: String = if s.hint.chars().count() > 50 {
            let cut: String = s.hint.chars().take(47).collect();
            format!("{cut}...")
        } else {
            s.hint.clone()
        };
        line.push_str(&format!("  \"{hint}\""));
    }
    line
}
