//! The boundary to the target subtitle document.

use std::fmt::Write;

use crate::piece::StyledText;

/// Rich text assembled from recognized runs: a sequence of styled spans.
/// Adjacent spans with the same style are merged, so separator characters
/// don't fragment the list.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RichText {
    spans: Vec<StyledText>,
}

impl RichText {
    /// Empty rich text.
    pub fn new() -> RichText {
        RichText::default()
    }

    /// Append a styled span.
    pub(crate) fn push_span(&mut self, span: StyledText) {
        if span.text.is_empty() {
            return;
        }
        if let Some(last) = self.spans.last_mut() {
            if last.style == span.style {
                last.text.push_str(&span.text);
                return;
            }
        }
        self.spans.push(span);
    }

    /// Append unstyled text (separators).
    pub(crate) fn push_plain(&mut self, text: &str) {
        self.push_span(StyledText::plain(text));
    }

    /// The spans making up this text.
    pub fn spans(&self) -> &[StyledText] {
        &self.spans
    }

    /// The text with all styling dropped.
    pub fn plain(&self) -> String {
        let mut out = String::new();
        for span in &self.spans {
            out.push_str(&span.text);
        }
        out
    }

    /// The text with SRT-style `<b>`/`<i>`/`<u>` tags around styled spans.
    pub fn tagged(&self) -> String {
        let mut out = String::new();
        for span in &self.spans {
            if span.style.bold {
                out.push_str("<b>");
            }
            if span.style.italic {
                out.push_str("<i>");
            }
            if span.style.underline {
                out.push_str("<u>");
            }
            out.push_str(&span.text);
            if span.style.underline {
                out.push_str("</u>");
            }
            if span.style.italic {
                out.push_str("</i>");
            }
            if span.style.bold {
                out.push_str("</b>");
            }
        }
        out
    }

    /// Is there nothing but whitespace here?
    pub fn is_blank(&self) -> bool {
        self.plain().trim().is_empty()
    }
}

/// One recognized subtitle with its display timing.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubtitleLine {
    /// When to show, in milliseconds.
    pub show_ms: u64,
    /// When to hide, in milliseconds.
    pub hide_ms: u64,
    /// The recognized text.
    pub text: RichText,
}

/// Where committed subtitle lines go.  Implement this for your subtitle
/// document; the engine appends a line per finished frame and removes the
/// most recent one when the operator steps backward over a frame boundary.
pub trait SubtitleSink {
    /// Append a finished line.
    fn push_line(&mut self, line: SubtitleLine);

    /// Remove and return the most recently appended line.
    fn pop_line(&mut self) -> Option<SubtitleLine>;
}

/// A simple Vec-backed sink, convenient for tests and for batch conversion
/// to SRT.
#[derive(Clone, Debug, Default)]
pub struct SubtitleBuffer {
    lines: Vec<SubtitleLine>,
}

impl SubtitleBuffer {
    /// An empty buffer.
    pub fn new() -> SubtitleBuffer {
        SubtitleBuffer::default()
    }

    /// The collected lines, in commit order.
    pub fn lines(&self) -> &[SubtitleLine] {
        &self.lines
    }

    /// Render the collected lines as an SRT document.
    pub fn to_srt(&self) -> String {
        let mut out = String::new();
        for (i, line) in self.lines.iter().enumerate() {
            write!(
                out,
                "{}\n{} --> {}\n{}\n\n",
                i + 1,
                format_srt_time(line.show_ms),
                format_srt_time(line.hide_ms),
                line.text.tagged()
            )
            .expect("writing to a String never fails");
        }
        out
    }
}

impl SubtitleSink for SubtitleBuffer {
    fn push_line(&mut self, line: SubtitleLine) {
        self.lines.push(line);
    }

    fn pop_line(&mut self) -> Option<SubtitleLine> {
        self.lines.pop()
    }
}

/// Format milliseconds using the standard SRT time format.
pub fn format_srt_time(ms: u64) -> String {
    let (h, rem) = (ms / 3_600_000, ms % 3_600_000);
    let (m, rem) = (rem / 60_000, rem % 60_000);
    let (s, ms) = (rem / 1000, rem % 1000);
    format!("{:02}:{:02}:{:02},{:03}", h, m, s, ms)
}
