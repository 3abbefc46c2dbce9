use crate::event::Level;
use console::{Color, Style};
use std::collections::HashMap;

const POOL: [Color; 4] = [Color::Blue, Color::Cyan, Color::Green, Color::Magenta];

/// Hands out colors so the same text is always painted the same way.
///
/// Owned by whoever renders; two formatters never share assignments.
#[derive(Debug, Default)]
pub struct ColorRegistry {
    enabled: bool,
    assigned: HashMap<String, usize>,
    next: usize,
}

impl ColorRegistry {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            assigned: HashMap::new(),
            next: 0,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Color `text` with the pool entry first assigned to it.
    pub fn unique(&mut self, text: &str) -> String {
        let ix = match self.assigned.get(text) {
            Some(ix) => *ix,
            None => {
                let ix = self.next;
                self.assigned.insert(text.to_string(), ix);
                self.next = (self.next + 1) % POOL.len();
                ix
            }
        };
        self.paint(text, POOL[ix])
    }

    /// Red for error severities, yellow for warnings.
    pub fn level(&self, level: Level) -> String {
        match level {
            l if l.is_error() => self.paint(l.as_str(), Color::Red),
            Level::Warn => self.paint(Level::Warn.as_str(), Color::Yellow),
            l => l.as_str().to_string(),
        }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if !self.enabled {
            return text.to_string();
        }
        Style::new()
            .fg(color)
            .force_styling(true)
            .apply_to(text)
            .to_string()
    }
}
