//! Terminal byte stream decoding.
//!
//! SSH clients in raw mode send keystrokes as bytes: printable characters
//! (possibly multi-byte UTF-8), control bytes, and ANSI escape sequences
//! for the arrow and tab keys. [`InputParser`] is a small incremental
//! decoder that tolerates sequences split across channel data packets.

use crate::tui::message::Key;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Ground,
    Esc,
    Csi,
}

#[derive(Debug)]
pub struct InputParser {
    state: State,
    utf8: Vec<u8>,
}

impl InputParser {
    pub fn new() -> Self {
        InputParser {
            state: State::Ground,
            utf8: Vec::new(),
        }
    }

    /// Decode a chunk of channel data into zero or more keys.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Key> {
        let mut keys = Vec::new();
        for &b in bytes {
            self.advance(b, &mut keys);
        }
        keys
    }

    /// Decode one channel data packet. A packet ending mid-sequence stays
    /// buffered so an arrow key fragmented across packets still decodes.
    /// The one exception is a packet that is exactly a bare ESC byte:
    /// interactive clients send the Escape key that way, and it is flushed
    /// immediately rather than waiting for a continuation that will not
    /// come. An arrow key a client writes one byte at a time would be
    /// misread as Esc here; real clients write the whole sequence at once.
    pub fn feed_packet(&mut self, bytes: &[u8]) -> Vec<Key> {
        let mut keys = self.feed(bytes);
        if bytes == [0x1b] {
            if let Some(key) = self.flush() {
                keys.push(key);
            }
        }
        keys
    }

    /// Emit a pending lone Escape. Called when a data packet ends and no
    /// continuation arrived, so ESC-then-nothing still registers as Esc.
    pub fn flush(&mut self) -> Option<Key> {
        self.utf8.clear();
        if self.state == State::Esc {
            self.state = State::Ground;
            Some(Key::Esc)
        } else {
            None
        }
    }

    fn advance(&mut self, b: u8, keys: &mut Vec<Key>) {
        match self.state {
            State::Esc => {
                if b == b'[' {
                    self.state = State::Csi;
                } else {
                    // Lone ESC followed by an unrelated byte.
                    self.state = State::Ground;
                    keys.push(Key::Esc);
                    self.ground(b, keys);
                }
            }
            State::Csi => {
                match b {
                    b'A' => keys.push(Key::Up),
                    b'B' => keys.push(Key::Down),
                    b'Z' => keys.push(Key::BackTab),
                    // Parameter and intermediate bytes keep the sequence open.
                    0x20..=0x3f => return,
                    _ => {}
                }
                self.state = State::Ground;
            }
            State::Ground => self.ground(b, keys),
        }
    }

    fn ground(&mut self, b: u8, keys: &mut Vec<Key>) {
        if !self.utf8.is_empty() {
            if b & 0xc0 == 0x80 {
                self.utf8.push(b);
                self.try_complete_utf8(keys);
                return;
            }
            // Broken sequence; drop it and decode this byte normally.
            self.utf8.clear();
        }
        match b {
            0x1b => self.state = State::Esc,
            0x03 => keys.push(Key::CtrlC),
            0x13 => keys.push(Key::CtrlS),
            0x09 => keys.push(Key::Tab),
            0x0d | 0x0a => keys.push(Key::Enter),
            0x7f | 0x08 => keys.push(Key::Backspace),
            0x20..=0x7e => keys.push(Key::Char(b as char)),
            0xc0..=0xff => self.utf8.push(b),
            _ => {}
        }
    }

    fn try_complete_utf8(&mut self, keys: &mut Vec<Key>) {
        let expected = match self.utf8.first() {
            Some(b) if b & 0xe0 == 0xc0 => 2,
            Some(b) if b & 0xf0 == 0xe0 => 3,
            Some(b) if b & 0xf8 == 0xf0 => 4,
            _ => {
                self.utf8.clear();
                return;
            }
        };
        if self.utf8.len() < expected {
            return;
        }
        if let Ok(s) = std::str::from_utf8(&self.utf8) {
            if let Some(c) = s.chars().next() {
                keys.push(Key::Char(c));
            }
        }
        self.utf8.clear();
    }
}

impl Default for InputParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_plain_characters() {
        let mut p = InputParser::new();
        assert_eq!(p.feed(b"ab"), vec![Key::Char('a'), Key::Char('b')]);
    }

    #[test]
    fn decodes_arrow_keys_and_backtab() {
        let mut p = InputParser::new();
        assert_eq!(
            p.feed(b"\x1b[A\x1b[B\x1b[Z"),
            vec![Key::Up, Key::Down, Key::BackTab]
        );
    }

    #[test]
    fn decodes_control_keys() {
        let mut p = InputParser::new();
        assert_eq!(
            p.feed(b"\x03\x13\x09\x0d\x7f"),
            vec![Key::CtrlC, Key::CtrlS, Key::Tab, Key::Enter, Key::Backspace]
        );
    }

    #[test]
    fn escape_sequence_split_across_packets() {
        let mut p = InputParser::new();
        assert_eq!(p.feed(b"\x1b"), vec![]);
        assert_eq!(p.feed(b"[A"), vec![Key::Up]);
    }

    #[test]
    fn packet_ending_in_escape_defers_to_the_next_packet() {
        let mut p = InputParser::new();
        assert_eq!(p.feed_packet(b"k\x1b"), vec![Key::Char('k')]);
        assert_eq!(p.feed_packet(b"[A"), vec![Key::Up]);
    }

    #[test]
    fn deferred_escape_resolves_on_unrelated_byte() {
        let mut p = InputParser::new();
        assert_eq!(p.feed_packet(b"k\x1b"), vec![Key::Char('k')]);
        assert_eq!(p.feed_packet(b"q"), vec![Key::Esc, Key::Char('q')]);
    }

    #[test]
    fn bare_escape_packet_is_an_escape_key() {
        let mut p = InputParser::new();
        assert_eq!(p.feed_packet(b"\x1b"), vec![Key::Esc]);
        assert_eq!(p.feed_packet(b"\x1b["), vec![]);
        assert_eq!(p.feed_packet(b"A"), vec![Key::Up]);
    }

    #[test]
    fn lone_escape_flushes_as_esc() {
        let mut p = InputParser::new();
        assert_eq!(p.feed(b"\x1b"), vec![]);
        assert_eq!(p.flush(), Some(Key::Esc));
        assert_eq!(p.flush(), None);
    }

    #[test]
    fn escape_then_plain_byte_emits_both() {
        let mut p = InputParser::new();
        assert_eq!(p.feed(b"\x1bq"), vec![Key::Esc, Key::Char('q')]);
    }

    #[test]
    fn multibyte_utf8_character() {
        let mut p = InputParser::new();
        assert_eq!(p.feed("é".as_bytes()), vec![Key::Char('é')]);
    }
}
