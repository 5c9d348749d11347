// SPDX-License-Identifier: MIT
//
// scrim-term key viewer: prints every decoded key and mouse event.
//
// Puts the terminal in raw mode (no alternate screen) and echoes one line
// per event, so unknown or oddly-mapped sequences are easy to spot. Press
// `q` to quit.
//
// Usage:
//   cargo run -p scrim-term --example keys

use std::io::{self, Write};
use std::time::Duration;

use scrim_term::keys::{Event, KeyCode};
use scrim_term::reader::{InputConfig, KeyReader};
use scrim_term::terminal::{Terminal, TerminalConfig};

fn main() -> io::Result<()> {
    let mut term = Terminal::with_config(TerminalConfig {
        mouse: true,
        alt_screen: false,
    });
    term.enter()?;
    let mut keys = KeyReader::stdin(InputConfig::default())?;
    let mut out = io::stdout();

    write!(out, "press keys, q quits\r\n")?;
    out.flush()?;

    loop {
        let Some(event) = keys.read_key_timeout(Duration::from_secs(1)) else {
            if keys.is_closed() {
                break;
            }
            continue;
        };
        match event {
            Event::Key(key) if key.code == KeyCode::Char('q') && key.modifiers.is_empty() => break,
            Event::Key(key) => write!(out, "key   {key}  ({key:?})\r\n")?,
            Event::Mouse(mouse) => write!(out, "mouse {:?} at {},{}\r\n", mouse.kind, mouse.x, mouse.y)?,
        }
        out.flush()?;
    }

    term.leave()
}
