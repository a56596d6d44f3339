//! Decoration stripping for captured console output.

use vte::{Parser, Perform};

const ESC: u8 = 0x1b;

/// Removes terminal decoration from console output.
pub struct OutputSanitizer;

impl OutputSanitizer {
    /// Strip ANSI CSI sequences from raw bytes.
    ///
    /// Runs a single pass of a VT parser over the input. Printable text and
    /// the `\n`, `\r` and `\t` controls are kept; `ESC [` sequences are
    /// dropped up to their final byte. Any other ESC loses only the ESC byte
    /// itself, so text following a stray escape survives. The output never
    /// contains an ESC byte, so stripping twice yields the same text as
    /// stripping once.
    pub fn strip_ansi(input: &[u8]) -> String {
        let mut collector = TextCollector::default();
        let mut parser = Parser::new();

        parser.advance(&mut collector, &drop_lone_escapes(input));

        collector.text
    }

    /// Strip decoration from already-decoded text.
    pub fn strip_decoration(input: &str) -> String {
        Self::strip_ansi(input.as_bytes())
    }
}

/// Remove every ESC byte that does not open a CSI sequence.
fn drop_lone_escapes(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut bytes = input.iter().copied().peekable();
    while let Some(byte) = bytes.next() {
        if byte != ESC || bytes.peek() == Some(&b'[') {
            out.push(byte);
        }
    }
    out
}

#[derive(Default)]
struct TextCollector {
    text: String,
}

impl Perform for TextCollector {
    fn print(&mut self, c: char) {
        self.text.push(c);
    }

    fn execute(&mut self, byte: u8) {
        if matches!(byte, b'\n' | b'\r' | b'\t') {
            self.text.push(byte as char);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_untouched() {
        let output = OutputSanitizer::strip_decoration("Clearing the cache for the dev environment");
        assert_eq!(output, "Clearing the cache for the dev environment");
    }

    #[test]
    fn test_strip_console_block() {
        // Symfony console success block
        let input = "\x1b[37;42m                  \x1b[39;49m\n\x1b[37;42m [OK] Cache cleared \x1b[39;49m\n";
        let output = OutputSanitizer::strip_decoration(input);
        assert_eq!(output, "                  \n [OK] Cache cleared \n");
    }

    #[test]
    fn test_strip_non_color_csi() {
        // Cursor movement and erase line
        let input = b"\x1b[2K\x1b[1G 3/10 [====>   ]";
        let output = OutputSanitizer::strip_ansi(input);
        assert_eq!(output, " 3/10 [====>   ]");
    }

    #[test]
    fn test_stray_escape_keeps_following_text() {
        let cases = [
            ("\x1bPHP Fatal error: boom\n", "PHP Fatal error: boom\n"),
            ("\x1bXdebug: could not connect\n", "Xdebug: could not connect\n"),
            (
                "progress \x1b]unterminated\nFatal: disk full\n",
                "progress ]unterminated\nFatal: disk full\n",
            ),
            ("\x1b\x1b[31mred\x1b[0m", "red"),
        ];
        for (input, expected) in cases {
            assert_eq!(OutputSanitizer::strip_decoration(input), expected);
        }
    }

    #[test]
    fn test_osc_payload_is_kept() {
        let input = "\x1b]8;;https://symfony.com\x07docs\x1b]8;;\x07";
        let output = OutputSanitizer::strip_decoration(input);
        assert_eq!(output, "]8;;https://symfony.comdocs]8;;");
    }

    #[test]
    fn test_keeps_line_structure() {
        let input = "line1\r\n\tline2\n";
        assert_eq!(OutputSanitizer::strip_decoration(input), "line1\r\n\tline2\n");
    }

    #[test]
    fn test_multibyte_text_survives() {
        let input = "\x1b[33mAvertissement : caché\x1b[0m ✓";
        assert_eq!(
            OutputSanitizer::strip_decoration(input),
            "Avertissement : caché ✓"
        );
    }

    #[test]
    fn test_no_escape_byte_remains() {
        let inputs = [
            "\x1b[31mred\x1b[0m",
            "\x1b[",
            "trailing \x1b",
            "\x1b[1;2;3;4;5mmany\x1b[m",
            "\x1b\x1b[0m",
            "\x1bP1$r\x1b\\",
        ];
        for input in inputs {
            let output = OutputSanitizer::strip_decoration(input);
            assert!(!output.contains('\x1b'), "escape left in {output:?}");
        }
    }

    #[test]
    fn test_stripping_is_idempotent() {
        let inputs = [
            "\x1b[32mgreen\x1b[0m plain \x1b[1;34mbold blue\x1b[22m",
            "\x1b[[31mbroken",
            "no decoration at all\n",
            "",
        ];
        for input in inputs {
            let once = OutputSanitizer::strip_decoration(input);
            let twice = OutputSanitizer::strip_decoration(&once);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_only_escape_codes() {
        let output = OutputSanitizer::strip_ansi(b"\x1b[31m\x1b[0m\x1b[2J");
        assert_eq!(output, "");
    }
}
