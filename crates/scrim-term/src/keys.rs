// SPDX-License-Identifier: MIT
//
// Key decoder — raw stdin bytes to key and mouse events.
//
// Every multi-byte key the decoder knows is listed once in `KEYS`, with its
// byte sequence, identity, and display name. A byte trie is built from that
// table on first use. Decoding walks the trie one byte at a time:
//
//   - reaching a leaf emits that key;
//   - falling off the trie emits every byte consumed so far as its own
//     key (so `ESC a` becomes Escape, then 'a') and restarts at the root
//     with the byte that did not match;
//   - the mouse prefixes `ESC [ <` and `ESC [ [ <` switch to collecting
//     SGR mouse parameters up to the final `M` (press) or `m` (release).
//
// A lone ESC is ambiguous until more bytes arrive or the caller gives up
// waiting. `flush()` resolves whatever is pending after that timeout.
//
// Bytes outside the trie decode as single keys (control bytes map to
// Ctrl+letter, Tab, Enter, Backspace) or as UTF-8 characters.

use std::fmt;
use std::sync::LazyLock;

use bitflags::bitflags;

// ─── Event types ─────────────────────────────────────────────────────────────

/// A decoded input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
}

/// A key with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

/// Identity of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A Unicode character.
    Char(char),
    // ── Named keys ──────────────────────────────────────────────
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    Insert,
    // ── Navigation ──────────────────────────────────────────────
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    // ── Function keys ───────────────────────────────────────────
    /// F1 through F12.
    F(u8),
}

bitflags! {
    /// Keyboard modifier flags, in xterm's `param = 1 + bitmask` order.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const CTRL  = 0b0000_0100;
    }
}

/// A mouse report with 0-indexed position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub x: u16,
    pub y: u16,
    pub modifiers: Modifiers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventKind {
    Press(MouseButton),
    Release(MouseButton),
    /// A press report for a button already held.
    Drag(MouseButton),
    ScrollUp,
    ScrollDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

impl KeyEvent {
    #[inline]
    #[must_use]
    pub const fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    #[inline]
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, Modifiers::empty())
    }

    #[inline]
    #[must_use]
    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), Modifiers::CTRL)
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(c) => write!(f, "{c}"),
            Self::Enter => f.write_str("Enter"),
            Self::Tab => f.write_str("Tab"),
            Self::Backspace => f.write_str("Backspace"),
            Self::Escape => f.write_str("Esc"),
            Self::Delete => f.write_str("Delete"),
            Self::Insert => f.write_str("Insert"),
            Self::Up => f.write_str("CursorUp"),
            Self::Down => f.write_str("CursorDown"),
            Self::Left => f.write_str("CursorLeft"),
            Self::Right => f.write_str("CursorRight"),
            Self::Home => f.write_str("Home"),
            Self::End => f.write_str("End"),
            Self::PageUp => f.write_str("PageUp"),
            Self::PageDown => f.write_str("PageDown"),
            Self::F(n) => write!(f, "F{n}"),
        }
    }
}

/// `Ctrl+Alt+Shift+<key>`, letters upper-cased under Ctrl.
impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(Modifiers::CTRL) {
            f.write_str("Ctrl+")?;
        }
        if self.modifiers.contains(Modifiers::ALT) {
            f.write_str("Alt+")?;
        }
        if self.modifiers.contains(Modifiers::SHIFT) {
            f.write_str("Shift+")?;
        }
        match self.code {
            KeyCode::Char(c) if self.modifiers.contains(Modifiers::CTRL) => {
                write!(f, "{}", c.to_ascii_uppercase())
            }
            code => write!(f, "{code}"),
        }
    }
}

// ─── Key table ───────────────────────────────────────────────────────────────

/// One known key sequence.
#[derive(Debug, Clone, Copy)]
pub struct KeyDef {
    pub sequence: &'static str,
    pub key: KeyEvent,
    pub name: &'static str,
}

const NONE: Modifiers = Modifiers::empty();
const SHIFT: Modifiers = Modifiers::SHIFT;
const ALT: Modifiers = Modifiers::ALT;
const CTRL: Modifiers = Modifiers::CTRL;
const CTRL_ALT: Modifiers = Modifiers::CTRL.union(Modifiers::ALT);

const fn def(sequence: &'static str, code: KeyCode, modifiers: Modifiers, name: &'static str) -> KeyDef {
    KeyDef {
        sequence,
        key: KeyEvent::new(code, modifiers),
        name,
    }
}

const fn ctrl(sequence: &'static str, c: char, name: &'static str) -> KeyDef {
    def(sequence, KeyCode::Char(c), CTRL, name)
}

/// Every named key, single-byte control keys first.
#[rustfmt::skip]
pub const KEYS: &[KeyDef] = &[
    ctrl("\x01", 'a', "Ctrl+A"),
    ctrl("\x02", 'b', "Ctrl+B"),
    ctrl("\x03", 'c', "Ctrl+C"),
    ctrl("\x04", 'd', "Ctrl+D"),
    ctrl("\x05", 'e', "Ctrl+E"),
    ctrl("\x06", 'f', "Ctrl+F"),
    ctrl("\x07", 'g', "Ctrl+G"),
    ctrl("\x08", 'h', "Ctrl+H"),
    ctrl("\x0b", 'k', "Ctrl+K"),
    ctrl("\x0c", 'l', "Ctrl+L"),
    ctrl("\x0e", 'n', "Ctrl+N"),
    ctrl("\x0f", 'o', "Ctrl+O"),
    ctrl("\x10", 'p', "Ctrl+P"),
    ctrl("\x11", 'q', "Ctrl+Q"),
    ctrl("\x12", 'r', "Ctrl+R"),
    ctrl("\x13", 's', "Ctrl+S"),
    ctrl("\x14", 't', "Ctrl+T"),
    ctrl("\x15", 'u', "Ctrl+U"),
    ctrl("\x16", 'v', "Ctrl+V"),
    ctrl("\x17", 'w', "Ctrl+W"),
    ctrl("\x18", 'x', "Ctrl+X"),
    ctrl("\x19", 'y', "Ctrl+Y"),
    ctrl("\x1a", 'z', "Ctrl+Z"),
    def("\t",       KeyCode::Tab,       NONE,  "Tab"),
    def("\r",       KeyCode::Enter,     NONE,  "Enter"),
    def("\n",       KeyCode::Enter,     CTRL,  "Ctrl+Enter"),
    def("\x7f",     KeyCode::Backspace, NONE,  "Backspace"),
    def("\x1b[Z",   KeyCode::Tab,       SHIFT, "Shift+Tab"),
    def("\x1b\n",   KeyCode::Enter,     ALT,   "Alt+Enter"),
    def("\x1b\x1b", KeyCode::Escape,    NONE,  "ESC,ESC"),
    // ── Cursor ──────────────────────────────────────────────────
    def("\x1b[A",     KeyCode::Up,    NONE,     "CursorUp"),
    def("\x1b[B",     KeyCode::Down,  NONE,     "CursorDown"),
    def("\x1b[C",     KeyCode::Right, NONE,     "CursorRight"),
    def("\x1b[D",     KeyCode::Left,  NONE,     "CursorLeft"),
    def("\x1b[1;5A",  KeyCode::Up,    CTRL,     "Ctrl+CursorUp"),
    def("\x1b[1;5B",  KeyCode::Down,  CTRL,     "Ctrl+CursorDown"),
    def("\x1b[1;5C",  KeyCode::Right, CTRL,     "Ctrl+CursorRight"),
    def("\x1b[1;5D",  KeyCode::Left,  CTRL,     "Ctrl+CursorLeft"),
    def("\x1b[1;3A",  KeyCode::Up,    ALT,      "Alt+CursorUp"),
    def("\x1b[1;3B",  KeyCode::Down,  ALT,      "Alt+CursorDown"),
    def("\x1b[1;3C",  KeyCode::Right, ALT,      "Alt+CursorRight"),
    def("\x1b[1;3D",  KeyCode::Left,  ALT,      "Alt+CursorLeft"),
    def("\x1b[1;7A",  KeyCode::Up,    CTRL_ALT, "Ctrl+Alt+Up"),
    def("\x1b[1;7B",  KeyCode::Down,  CTRL_ALT, "Ctrl+Alt+Down"),
    def("\x1b[1;7C",  KeyCode::Right, CTRL_ALT, "Ctrl+Alt+Right"),
    def("\x1b[1;7D",  KeyCode::Left,  CTRL_ALT, "Ctrl+Alt+Left"),
    // ── Home / End ──────────────────────────────────────────────
    def("\x1bOH",     KeyCode::Home, NONE,     "Home"),
    def("\x1b[H",     KeyCode::Home, NONE,     "Home"),
    def("\x1b[1~",    KeyCode::Home, NONE,     "Home(Numpad)"),
    def("\x1bOF",     KeyCode::End,  NONE,     "End"),
    def("\x1b[F",     KeyCode::End,  NONE,     "End"),
    def("\x1b[4~",    KeyCode::End,  NONE,     "End(Numpad)"),
    def("\x1b[1;5H",  KeyCode::Home, CTRL,     "Ctrl+Home"),
    def("\x1b[1;5F",  KeyCode::End,  CTRL,     "Ctrl+End"),
    def("\x1b[1;3H",  KeyCode::Home, ALT,      "Alt+Home"),
    def("\x1b[1;3F",  KeyCode::End,  ALT,      "Alt+End"),
    def("\x1b[1;7H",  KeyCode::Home, CTRL_ALT, "Ctrl+Alt+Home"),
    def("\x1b[1;7F",  KeyCode::End,  CTRL_ALT, "Ctrl+Alt+End"),
    // ── Paging and editing ──────────────────────────────────────
    def("\x1b[5~",    KeyCode::PageUp,   NONE, "PageUp"),
    def("\x1b[6~",    KeyCode::PageDown, NONE, "PageDown"),
    def("\x1b[5;5~",  KeyCode::PageUp,   CTRL, "Ctrl+PageUp"),
    def("\x1b[6;5~",  KeyCode::PageDown, CTRL, "Ctrl+PageDown"),
    def("\x1b[5;3~",  KeyCode::PageUp,   ALT,  "Alt+PageUp"),
    def("\x1b[6;3~",  KeyCode::PageDown, ALT,  "Alt+PageDown"),
    def("\x1b[2~",    KeyCode::Insert,   NONE, "Insert"),
    def("\x1b[3~",    KeyCode::Delete,   NONE, "Delete"),
    // ── Function keys ───────────────────────────────────────────
    def("\x1bOP",     KeyCode::F(1),  NONE, "F1"),
    def("\x1bOQ",     KeyCode::F(2),  NONE, "F2"),
    def("\x1bOR",     KeyCode::F(3),  NONE, "F3"),
    def("\x1bOS",     KeyCode::F(4),  NONE, "F4"),
    def("\x1b[15~",   KeyCode::F(5),  NONE, "F5"),
    def("\x1b[17~",   KeyCode::F(6),  NONE, "F6"),
    def("\x1b[18~",   KeyCode::F(7),  NONE, "F7"),
    def("\x1b[19~",   KeyCode::F(8),  NONE, "F8"),
    def("\x1b[20~",   KeyCode::F(9),  NONE, "F9"),
    def("\x1b[21~",   KeyCode::F(10), NONE, "F10"),
    def("\x1b[23~",   KeyCode::F(11), NONE, "F11"),
    def("\x1b[24~",   KeyCode::F(12), NONE, "F12"),
    def("\x1b[1;5P",  KeyCode::F(1),  CTRL, "Ctrl+F1"),
    def("\x1b[1;5Q",  KeyCode::F(2),  CTRL, "Ctrl+F2"),
    def("\x1b[1;5R",  KeyCode::F(3),  CTRL, "Ctrl+F3"),
    def("\x1b[1;5S",  KeyCode::F(4),  CTRL, "Ctrl+F4"),
    def("\x1b[15;5~", KeyCode::F(5),  CTRL, "Ctrl+F5"),
    def("\x1b[17;5~", KeyCode::F(6),  CTRL, "Ctrl+F6"),
    def("\x1b[18;5~", KeyCode::F(7),  CTRL, "Ctrl+F7"),
    def("\x1b[19;5~", KeyCode::F(8),  CTRL, "Ctrl+F8"),
    def("\x1b[20;5~", KeyCode::F(9),  CTRL, "Ctrl+F9"),
    def("\x1b[21;5~", KeyCode::F(10), CTRL, "Ctrl+F10"),
    def("\x1b[23;5~", KeyCode::F(11), CTRL, "Ctrl+F11"),
    def("\x1b[24;5~", KeyCode::F(12), CTRL, "Ctrl+F12"),
    def("\x1b[1;2P",  KeyCode::F(1),  SHIFT, "Shift+F1"),
    def("\x1b[1;2Q",  KeyCode::F(2),  SHIFT, "Shift+F2"),
    def("\x1b[1;2R",  KeyCode::F(3),  SHIFT, "Shift+F3"),
    def("\x1b[1;2S",  KeyCode::F(4),  SHIFT, "Shift+F4"),
    def("\x1b[15;2~", KeyCode::F(5),  SHIFT, "Shift+F5"),
    def("\x1b[17;2~", KeyCode::F(6),  SHIFT, "Shift+F6"),
    def("\x1b[18;2~", KeyCode::F(7),  SHIFT, "Shift+F7"),
    def("\x1b[19;2~", KeyCode::F(8),  SHIFT, "Shift+F8"),
    def("\x1b[20;2~", KeyCode::F(9),  SHIFT, "Shift+F9"),
    def("\x1b[21;2~", KeyCode::F(10), SHIFT, "Shift+F10"),
    def("\x1b[23;2~", KeyCode::F(11), SHIFT, "Shift+F11"),
    def("\x1b[24;2~", KeyCode::F(12), SHIFT, "Shift+F12"),
];

/// SGR mouse report prefixes.
pub const MOUSE_PREFIXES: [&str; 2] = ["\x1b[<", "\x1b[[<"];

/// Whether `sequence` is a named key or a mouse prefix.
#[must_use]
pub fn is_special(sequence: &str) -> bool {
    MOUSE_PREFIXES.contains(&sequence) || KEYS.iter().any(|k| k.sequence == sequence)
}

/// The display name of a key sequence, e.g. `"Ctrl+PageUp"`.
#[must_use]
pub fn name_of(sequence: &str) -> Option<&'static str> {
    KEYS.iter().find(|k| k.sequence == sequence).map(|k| k.name)
}

/// The first sequence with display name `name`.
#[must_use]
pub fn sequence_for(name: &str) -> Option<&'static str> {
    KEYS.iter().find(|k| k.name == name).map(|k| k.sequence)
}

/// The key a single byte outside the trie stands for, if it is named.
fn single_byte_key(byte: u8) -> Option<KeyEvent> {
    SINGLE_BYTE[usize::from(byte)]
}

static SINGLE_BYTE: LazyLock<[Option<KeyEvent>; 128]> = LazyLock::new(|| {
    let mut table = [None; 128];
    for k in KEYS {
        if let [b] = k.sequence.as_bytes() {
            table[usize::from(*b)] = Some(k.key);
        }
    }
    table[0x1b] = Some(KeyEvent::plain(KeyCode::Escape));
    table
});

// ─── Trie ────────────────────────────────────────────────────────────────────

const ROOT: usize = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Leaf {
    Key(usize),
    Mouse,
}

#[derive(Debug, Default)]
struct Node {
    children: Vec<(u8, usize)>,
    leaf: Option<Leaf>,
}

struct Trie {
    nodes: Vec<Node>,
}

impl Trie {
    fn build() -> Self {
        let mut trie = Self {
            nodes: vec![Node::default()],
        };
        for (i, k) in KEYS.iter().enumerate() {
            if k.sequence.len() > 1 {
                trie.insert(k.sequence.as_bytes(), Leaf::Key(i));
            }
        }
        for prefix in MOUSE_PREFIXES {
            trie.insert(prefix.as_bytes(), Leaf::Mouse);
        }
        trie
    }

    fn insert(&mut self, seq: &[u8], leaf: Leaf) {
        let mut node = ROOT;
        for &b in seq {
            node = match self.child(node, b) {
                Some(next) => next,
                None => {
                    self.nodes.push(Node::default());
                    let next = self.nodes.len() - 1;
                    self.nodes[node].children.push((b, next));
                    next
                }
            };
        }
        self.nodes[node].leaf = Some(leaf);
    }

    fn child(&self, node: usize, byte: u8) -> Option<usize> {
        self.nodes[node]
            .children
            .iter()
            .find(|&&(b, _)| b == byte)
            .map(|&(_, next)| next)
    }
}

static TRIE: LazyLock<Trie> = LazyLock::new(Trie::build);

// ─── Decoder ─────────────────────────────────────────────────────────────────

/// Longest mouse parameter string accepted before the report is dropped.
const MAX_MOUSE_PARAMS: usize = 32;

/// Incremental byte-to-event decoder.
///
/// ```
/// use scrim_term::keys::{Decoder, Event, KeyCode, KeyEvent, Modifiers};
///
/// let mut decoder = Decoder::new();
/// let events = decoder.feed(b"a\x1b[5;5~");
/// assert_eq!(events, vec![
///     Event::Key(KeyEvent::plain(KeyCode::Char('a'))),
///     Event::Key(KeyEvent::new(KeyCode::PageUp, Modifiers::CTRL)),
/// ]);
/// ```
#[derive(Debug, Default)]
pub struct Decoder {
    node: usize,
    pending: Vec<u8>,
    mouse: Option<Vec<u8>>,
    /// The current mouse report outgrew `MAX_MOUSE_PARAMS`; swallow it
    /// up to its terminator.
    mouse_oversized: bool,
    utf8: Vec<u8>,
    /// Bit per mouse button currently held.
    pressed: u8,
}

impl Decoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `bytes`, keeping incomplete sequences for the next call.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Event> {
        let mut out = Vec::new();
        for &b in bytes {
            self.push(b, &mut out);
        }
        out
    }

    /// Whether bytes are held back waiting for a sequence to complete.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty() || self.mouse.is_some() || !self.utf8.is_empty()
    }

    /// Give up waiting: pending trie bytes become individual keys, a
    /// partial UTF-8 character becomes U+FFFD, a partial mouse report is
    /// dropped.
    pub fn flush(&mut self) -> Vec<Event> {
        let mut out = Vec::new();
        if let Some(params) = self.mouse.take() {
            tracing::trace!(params = ?String::from_utf8_lossy(&params), "incomplete mouse report dropped");
        }
        self.mouse_oversized = false;
        self.fall_off(&mut out);
        if !self.utf8.is_empty() {
            self.utf8.clear();
            out.push(Event::Key(KeyEvent::plain(KeyCode::Char(char::REPLACEMENT_CHARACTER))));
        }
        out
    }

    fn push(&mut self, b: u8, out: &mut Vec<Event>) {
        if let Some(params) = &mut self.mouse {
            if b == b'M' || b == b'm' {
                let params = std::mem::take(params);
                self.mouse = None;
                if std::mem::take(&mut self.mouse_oversized) {
                    tracing::trace!("oversized mouse report dropped");
                } else {
                    self.finish_mouse(&params, b == b'M', out);
                }
            } else if params.len() < MAX_MOUSE_PARAMS {
                params.push(b);
            } else {
                self.mouse_oversized = true;
            }
            return;
        }

        if !self.utf8.is_empty() {
            self.utf8.push(b);
            self.finish_utf8(out);
            return;
        }

        match TRIE.child(self.node, b) {
            Some(next) => {
                self.pending.push(b);
                self.node = next;
                match TRIE.nodes[next].leaf {
                    Some(Leaf::Key(i)) => {
                        out.push(Event::Key(KEYS[i].key));
                        self.reset();
                    }
                    Some(Leaf::Mouse) => {
                        self.mouse = Some(Vec::new());
                        self.reset();
                    }
                    None => {}
                }
            }
            None if self.node == ROOT => self.push_plain(b, out),
            None => {
                tracing::trace!(
                    sequence = ?String::from_utf8_lossy(&self.pending),
                    next = b,
                    "unknown escape sequence"
                );
                self.fall_off(out);
                self.push(b, out);
            }
        }
    }

    fn reset(&mut self) {
        self.node = ROOT;
        self.pending.clear();
    }

    /// Emit every pending trie byte as its own key.
    fn fall_off(&mut self, out: &mut Vec<Event>) {
        for b in std::mem::take(&mut self.pending) {
            self.push_plain(b, out);
        }
        self.node = ROOT;
    }

    fn push_plain(&mut self, b: u8, out: &mut Vec<Event>) {
        if b.is_ascii() {
            let key = single_byte_key(b).unwrap_or_else(|| KeyEvent::plain(KeyCode::Char(char::from(b))));
            out.push(Event::Key(key));
        } else {
            self.utf8.push(b);
            self.finish_utf8(out);
        }
    }

    /// Emit the buffered character once it is complete. An invalid prefix
    /// becomes U+FFFD and the bytes after it are decoded again from the
    /// root, so a key typed after a truncated character survives.
    fn finish_utf8(&mut self, out: &mut Vec<Event>) {
        let decoded = std::str::from_utf8(&self.utf8)
            .map(|s| s.chars().next().unwrap_or(char::REPLACEMENT_CHARACTER));
        let (ch, rest) = match decoded {
            Ok(ch) => (ch, Vec::new()),
            Err(e) => match e.error_len() {
                Some(bad) => {
                    tracing::trace!(bytes = ?self.utf8, "invalid UTF-8 input");
                    let end = (e.valid_up_to() + bad).min(self.utf8.len());
                    (char::REPLACEMENT_CHARACTER, self.utf8.split_off(end))
                }
                None => return, // incomplete
            },
        };
        self.utf8.clear();
        out.push(Event::Key(KeyEvent::plain(KeyCode::Char(ch))));
        for b in rest {
            self.push(b, out);
        }
    }

    fn finish_mouse(&mut self, params: &[u8], press: bool, out: &mut Vec<Event>) {
        let Some([cb, cx, cy]) = parse_mouse_params(params) else {
            tracing::trace!(params = ?String::from_utf8_lossy(params), "malformed mouse report");
            return;
        };

        let mut modifiers = Modifiers::empty();
        if cb & 4 != 0 {
            modifiers |= Modifiers::SHIFT;
        }
        if cb & 8 != 0 {
            modifiers |= Modifiers::ALT;
        }
        if cb & 16 != 0 {
            modifiers |= Modifiers::CTRL;
        }

        let kind = if cb & 64 != 0 {
            if cb & 1 == 0 {
                MouseEventKind::ScrollUp
            } else {
                MouseEventKind::ScrollDown
            }
        } else {
            let (button, bit) = match cb & 3 {
                0 => (MouseButton::Left, 1),
                1 => (MouseButton::Middle, 2),
                2 => (MouseButton::Right, 4),
                _ => {
                    tracing::trace!(cb, "mouse report without a button");
                    return;
                }
            };
            if !press {
                self.pressed &= !bit;
                MouseEventKind::Release(button)
            } else if self.pressed & bit != 0 || cb & 32 != 0 {
                self.pressed |= bit;
                MouseEventKind::Drag(button)
            } else {
                self.pressed |= bit;
                MouseEventKind::Press(button)
            }
        };

        out.push(Event::Mouse(MouseEvent {
            kind,
            x: cx.saturating_sub(1),
            y: cy.saturating_sub(1),
            modifiers,
        }));
    }
}

/// `b;x;y` as three numbers.
fn parse_mouse_params(params: &[u8]) -> Option<[u16; 3]> {
    let text = std::str::from_utf8(params).ok()?;
    let mut parts = text.split(';').map(str::parse::<u16>);
    let cb = parts.next()?.ok()?;
    let cx = parts.next()?.ok()?;
    let cy = parts.next()?.ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some([cb, cx, cy])
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode, modifiers: Modifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    fn ch(c: char) -> Event {
        key(KeyCode::Char(c), Modifiers::empty())
    }

    fn mouse(kind: MouseEventKind, x: u16, y: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            x,
            y,
            modifiers: Modifiers::empty(),
        })
    }

    // ── Table ───────────────────────────────────────────────────────────

    #[test]
    fn table_is_prefix_free() {
        let seqs: Vec<&str> = KEYS.iter().map(|k| k.sequence).chain(MOUSE_PREFIXES).collect();
        for (i, a) in seqs.iter().enumerate() {
            for (j, b) in seqs.iter().enumerate() {
                if i != j {
                    assert!(!b.starts_with(a), "{a:?} is a prefix of {b:?}");
                }
            }
        }
    }

    #[test]
    fn every_multibyte_key_decodes_to_itself() {
        for k in KEYS.iter().filter(|k| k.sequence.len() > 1) {
            let mut decoder = Decoder::new();
            assert_eq!(decoder.feed(k.sequence.as_bytes()), vec![Event::Key(k.key)], "{}", k.name);
            assert!(!decoder.has_pending());
        }
    }

    #[test]
    fn names_and_reverse_lookup() {
        assert_eq!(name_of("\x1b[5;5~"), Some("Ctrl+PageUp"));
        assert_eq!(name_of("\x1b[6;3~"), Some("Alt+PageDown"));
        assert_eq!(name_of("\x1b[15~"), Some("F5"));
        assert_eq!(sequence_for("Home"), Some("\x1bOH"));
        assert_eq!(sequence_for("Home(Numpad)"), Some("\x1b[1~"));
        assert_eq!(sequence_for("Nope"), None);
    }

    #[test]
    fn is_special_covers_keys_and_mouse() {
        assert!(is_special("\x1b[A"));
        assert!(is_special("\x03"));
        assert!(is_special("\x1b[<"));
        assert!(!is_special("a"));
        assert!(!is_special("\x1b[Q"));
    }

    // ── Plain bytes ─────────────────────────────────────────────────────

    #[test]
    fn printable_ascii() {
        assert_eq!(Decoder::new().feed(b"hi"), vec![ch('h'), ch('i')]);
    }

    #[test]
    fn control_bytes() {
        let events = Decoder::new().feed(b"\x03\t\r\x7f");
        assert_eq!(
            events,
            vec![
                key(KeyCode::Char('c'), Modifiers::CTRL),
                key(KeyCode::Tab, Modifiers::empty()),
                key(KeyCode::Enter, Modifiers::empty()),
                key(KeyCode::Backspace, Modifiers::empty()),
            ]
        );
    }

    #[test]
    fn utf8_split_across_feeds() {
        let bytes = "é日".as_bytes();
        let mut decoder = Decoder::new();
        assert!(decoder.feed(&bytes[..1]).is_empty());
        assert!(decoder.has_pending());
        assert_eq!(decoder.feed(&bytes[1..3]), vec![ch('é')]);
        assert_eq!(decoder.feed(&bytes[3..]), vec![ch('日')]);
    }

    #[test]
    fn invalid_utf8_is_replacement() {
        assert_eq!(Decoder::new().feed(&[0xff]), vec![ch('\u{fffd}')]);
    }

    #[test]
    fn truncated_utf8_keeps_the_next_key() {
        assert_eq!(
            Decoder::new().feed(&[0xc3, b'A']),
            vec![ch('\u{fffd}'), ch('A')]
        );
        assert_eq!(
            Decoder::new().feed(&[0xe6, 0x97, 0x1b, b'[', b'A']),
            vec![ch('\u{fffd}'), key(KeyCode::Up, Modifiers::empty())]
        );
        assert_eq!(
            Decoder::new().feed(&[0xe6, 0xc3, 0xa9]),
            vec![ch('\u{fffd}'), ch('é')]
        );
    }

    // ── Escape handling ─────────────────────────────────────────────────

    #[test]
    fn lone_escape_waits_for_flush() {
        let mut decoder = Decoder::new();
        assert!(decoder.feed(b"\x1b").is_empty());
        assert!(decoder.has_pending());
        assert_eq!(decoder.flush(), vec![key(KeyCode::Escape, Modifiers::empty())]);
        assert!(!decoder.has_pending());
    }

    #[test]
    fn sequence_split_across_feeds() {
        let mut decoder = Decoder::new();
        assert!(decoder.feed(b"\x1b[1;").is_empty());
        assert_eq!(decoder.feed(b"5C"), vec![key(KeyCode::Right, Modifiers::CTRL)]);
    }

    #[test]
    fn unknown_sequence_falls_off_byte_by_byte() {
        let events = Decoder::new().feed(b"\x1b[Qx");
        assert_eq!(
            events,
            vec![key(KeyCode::Escape, Modifiers::empty()), ch('['), ch('Q'), ch('x')]
        );
    }

    #[test]
    fn escape_then_sequence_restarts_at_mismatch() {
        // ESC ESC is a key; ESC 'a' is not.
        let events = Decoder::new().feed(b"\x1ba\x1b[A");
        assert_eq!(
            events,
            vec![
                key(KeyCode::Escape, Modifiers::empty()),
                ch('a'),
                key(KeyCode::Up, Modifiers::empty()),
            ]
        );
    }

    #[test]
    fn double_escape_is_one_key() {
        assert_eq!(
            Decoder::new().feed(b"\x1b\x1b"),
            vec![key(KeyCode::Escape, Modifiers::empty())]
        );
    }

    #[test]
    fn three_home_encodings() {
        let events = Decoder::new().feed(b"\x1bOH\x1b[H\x1b[1~");
        assert_eq!(events, vec![key(KeyCode::Home, Modifiers::empty()); 3]);
    }

    // ── Mouse ───────────────────────────────────────────────────────────

    #[test]
    fn press_then_release() {
        let mut decoder = Decoder::new();
        let events = decoder.feed(b"\x1b[<0;10;5M\x1b[<0;10;5m");
        assert_eq!(
            events,
            vec![
                mouse(MouseEventKind::Press(MouseButton::Left), 9, 4),
                mouse(MouseEventKind::Release(MouseButton::Left), 9, 4),
            ]
        );
    }

    #[test]
    fn second_press_is_drag() {
        let events = Decoder::new().feed(b"\x1b[<2;1;1M\x1b[<2;2;1M");
        assert_eq!(
            events,
            vec![
                mouse(MouseEventKind::Press(MouseButton::Right), 0, 0),
                mouse(MouseEventKind::Drag(MouseButton::Right), 1, 0),
            ]
        );
    }

    #[test]
    fn wheel_codes() {
        let events = Decoder::new().feed(b"\x1b[<64;3;3M\x1b[<65;3;3M");
        assert_eq!(
            events,
            vec![
                mouse(MouseEventKind::ScrollUp, 2, 2),
                mouse(MouseEventKind::ScrollDown, 2, 2),
            ]
        );
    }

    #[test]
    fn alternate_prefix_and_modifiers() {
        let events = Decoder::new().feed(b"\x1b[[<16;1;1M");
        assert_eq!(
            events,
            vec![Event::Mouse(MouseEvent {
                kind: MouseEventKind::Press(MouseButton::Left),
                x: 0,
                y: 0,
                modifiers: Modifiers::CTRL,
            })]
        );
    }

    #[test]
    fn oversized_mouse_report_is_swallowed_to_its_terminator() {
        let mut decoder = Decoder::new();
        let mut report = b"\x1b[<0;".to_vec();
        report.extend(std::iter::repeat_n(b'1', MAX_MOUSE_PARAMS + 8));
        report.extend(b";5M");
        assert!(decoder.feed(&report).is_empty());
        assert!(!decoder.has_pending());
        assert_eq!(
            decoder.feed(b"\x1b[<0;3;4M"),
            vec![mouse(MouseEventKind::Press(MouseButton::Left), 2, 3)]
        );
    }

    #[test]
    fn malformed_mouse_report_is_dropped() {
        let mut decoder = Decoder::new();
        assert!(decoder.feed(b"\x1b[<1;xM").is_empty());
        assert_eq!(decoder.feed(b"k"), vec![ch('k')]);
    }

    #[test]
    fn partial_mouse_report_dropped_on_flush() {
        let mut decoder = Decoder::new();
        assert!(decoder.feed(b"\x1b[<0;1").is_empty());
        assert!(decoder.flush().is_empty());
        assert!(!decoder.has_pending());
    }

    // ── Display ─────────────────────────────────────────────────────────

    #[test]
    fn display_names() {
        assert_eq!(KeyEvent::ctrl('c').to_string(), "Ctrl+C");
        assert_eq!(KeyEvent::new(KeyCode::Left, Modifiers::CTRL | Modifiers::ALT).to_string(), "Ctrl+Alt+CursorLeft");
        assert_eq!(KeyEvent::new(KeyCode::F(5), Modifiers::SHIFT).to_string(), "Shift+F5");
        assert_eq!(KeyEvent::plain(KeyCode::Char('x')).to_string(), "x");
    }
}
