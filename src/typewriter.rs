//! Typewriter text reveal paced by the frame counter.

use crate::paint::{Paint, Painter};

const FONT: &str = "28px \"Dancing Script\", cursive";
const TOP: f64 = 60.0;
const LINE_HEIGHT: f64 = 35.0;

#[derive(Debug, Clone)]
pub struct Typewriter {
    target: Vec<String>,
    shown: Vec<String>,
    line: usize,
    byte: usize, // offset into target[line] of the next char
    cadence: u64,
}

impl Typewriter {
    pub fn new(lines: Vec<String>, cadence: u64) -> Self {
        let mut tw = Self { target: Vec::new(), shown: Vec::new(), line: 0, byte: 0, cadence: cadence.max(1) };
        tw.set_lines(lines);
        tw
    }

    /// Replaces the text and restarts the reveal from an empty screen.
    pub fn set_lines(&mut self, lines: Vec<String>) {
        self.shown = vec![String::new(); lines.len()];
        self.target = lines;
        self.line = 0;
        self.byte = 0;
        self.skip_finished_lines();
    }

    /// Reveals one more character on frames divisible by the cadence.
    pub fn advance(&mut self, frame: u64) {
        if self.is_complete() || frame % self.cadence != 0 {
            return;
        }
        if let Some(c) = self.target[self.line][self.byte..].chars().next() {
            self.shown[self.line].push(c);
            self.byte += c.len_utf8();
        }
        self.skip_finished_lines();
    }

    fn skip_finished_lines(&mut self) {
        while self.line < self.target.len() && self.byte >= self.target[self.line].len() {
            self.line += 1;
            self.byte = 0;
        }
    }

    pub fn is_complete(&self) -> bool {
        self.line >= self.target.len()
    }

    pub fn displayed(&self) -> &[String] {
        &self.shown
    }

    pub fn target(&self) -> &[String] {
        &self.target
    }

    /// (line, character) position of the next character to reveal.
    pub fn cursor(&self) -> (usize, usize) {
        let col = self.shown.get(self.line).map_or(0, |s| s.chars().count());
        (self.line, col)
    }

    pub fn render(&self, p: &mut dyn Painter, width: f64) {
        p.save();
        p.set_font(FONT);
        p.set_fill(&Paint::color("rgba(255, 255, 255, 0.9)"));
        p.set_text_align("center");
        p.set_shadow("rgba(255, 182, 193, 0.8)", 10.0);
        for (i, line) in self.shown.iter().enumerate() {
            p.fill_text(line, width / 2.0, TOP + i as f64 * LINE_HEIGHT);
        }
        p.restore();
    }
}
