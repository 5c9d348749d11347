// SPDX-License-Identifier: MIT
//
// A naive terminal model for tests: understands CUP, the SGR codes the
// renderer emits, and printable text. Replaying a paint's byte stream onto
// it shows what a real terminal would display.

use crate::color::Color;

pub type Shown = (char, Option<Color>, Option<Color>);

pub struct Replay {
    width: u16,
    height: u16,
    cells: Vec<Shown>,
    cx: u16,
    cy: u16,
    bg: Option<Color>,
    fg: Option<Color>,
    /// Every CUP target seen, in order.
    pub moves: Vec<(u16, u16)>,
    /// Number of truecolor background selections seen.
    pub bg_escapes: usize,
}

impl Replay {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![(' ', None, None); usize::from(width) * usize::from(height)],
            cx: 0,
            cy: 0,
            bg: None,
            fg: None,
            moves: Vec::new(),
            bg_escapes: 0,
        }
    }

    pub fn at(&self, x: u16, y: u16) -> Shown {
        self.cells[usize::from(y) * usize::from(self.width) + usize::from(x)]
    }

    pub fn feed(&mut self, bytes: &[u8]) {
        let text = std::str::from_utf8(bytes).unwrap();
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            if c != '\x1b' {
                self.print(c);
                continue;
            }
            assert_eq!(chars.next(), Some('['), "only CSI sequences expected");
            let mut params = String::new();
            let fin = loop {
                let p = chars.next().unwrap();
                if p.is_ascii_alphabetic() {
                    break p;
                }
                params.push(p);
            };
            let nums: Vec<u32> = params
                .split(';')
                .map(|s| if s.is_empty() { 0 } else { s.parse().unwrap() })
                .collect();
            match fin {
                'H' => self.cup(&nums),
                'm' => self.sgr(&nums),
                other => panic!("unexpected CSI final {other:?}"),
            }
        }
    }

    fn print(&mut self, c: char) {
        if self.cx < self.width && self.cy < self.height {
            let idx = usize::from(self.cy) * usize::from(self.width) + usize::from(self.cx);
            self.cells[idx] = (c, self.bg, self.fg);
        }
        self.cx = self.cx.saturating_add(1);
    }

    #[allow(clippy::cast_possible_truncation)]
    fn cup(&mut self, nums: &[u32]) {
        let row = nums.first().copied().unwrap_or(1).max(1) - 1;
        let col = nums.get(1).copied().unwrap_or(1).max(1) - 1;
        self.cy = row as u16;
        self.cx = col as u16;
        self.moves.push((self.cx, self.cy));
    }

    #[allow(clippy::cast_possible_truncation)]
    fn sgr(&mut self, nums: &[u32]) {
        let mut i = 0;
        while i < nums.len() {
            match nums[i] {
                0 => {
                    self.bg = None;
                    self.fg = None;
                }
                39 => self.fg = None,
                49 => self.bg = None,
                sel @ (38 | 48) if nums.get(i + 1) == Some(&2) => {
                    let color = Color::rgb(nums[i + 2] as u8, nums[i + 3] as u8, nums[i + 4] as u8);
                    if sel == 38 {
                        self.fg = Some(color);
                    } else {
                        self.bg = Some(color);
                        self.bg_escapes += 1;
                    }
                    i += 4;
                }
                _ => {}
            }
            i += 1;
        }
    }
}
