//! Line-oriented section reader shared by chipdb and bitstream text.
//!
//! Both formats are sequences of sections. A line starting with `.` opens a
//! section: its first token (without the dot) is the label, the remaining
//! tokens are the header. Following lines up to the next header form the
//! body. Blank lines and `#` comments are dropped.

use crate::addr::parse_decimal;
use crate::error::{DeviceError, DeviceResult};
use frost_common::LineSpan;

/// One labelled section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Label without the leading dot, e.g. `logic_tile_bits`.
    pub label: String,
    /// Whitespace-separated tokens following the label.
    pub header: Vec<String>,
    /// Body lines, trimmed, in order.
    pub lines: Vec<String>,
    /// Line of the section header in its source text.
    pub span: LineSpan,
}

impl Section {
    /// Creates a section with no body.
    pub fn new<S: Into<String>>(label: impl Into<String>, header: impl IntoIterator<Item = S>) -> Self {
        Self {
            label: label.into(),
            header: header.into_iter().map(Into::into).collect(),
            lines: Vec::new(),
            span: LineSpan::DUMMY,
        }
    }

    /// Appends body lines.
    pub fn with_lines<S: Into<String>>(mut self, lines: impl IntoIterator<Item = S>) -> Self {
        self.lines.extend(lines.into_iter().map(Into::into));
        self
    }

    /// Raw body lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Body lines split on whitespace.
    pub fn rows(&self) -> impl Iterator<Item = Vec<&str>> + '_ {
        self.lines.iter().map(|l| l.split_whitespace().collect())
    }

    /// Fails unless the header has exactly `n` tokens.
    pub(crate) fn expect_arity(&self, n: usize) -> DeviceResult<()> {
        if self.header.len() == n {
            Ok(())
        } else {
            Err(self.malformed(format!(
                "expected {n} header tokens, found {}",
                self.header.len()
            )))
        }
    }

    /// Parses header token `index` as a decimal number.
    pub(crate) fn header_number(&self, index: usize) -> DeviceResult<u32> {
        let token = self
            .header
            .get(index)
            .ok_or_else(|| self.malformed(format!("missing header token {index}")))?;
        parse_number(token)
    }

    pub(crate) fn malformed(&self, detail: String) -> DeviceError {
        DeviceError::MalformedSection(format!(".{} (line {}): {detail}", self.label, self.span))
    }
}

/// Parses a decimal token.
pub(crate) fn parse_number(token: &str) -> DeviceResult<u32> {
    parse_decimal(token)
        .ok_or_else(|| DeviceError::MalformedSection(format!("'{token}' is not a decimal number")))
}

/// Splits text into sections.
///
/// # Errors
///
/// Returns [`DeviceError::MalformedSection`] if a body line precedes the
/// first section header.
pub fn read_sections(text: &str) -> DeviceResult<Vec<Section>> {
    let mut sections: Vec<Section> = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let number = u32::try_from(index + 1).unwrap_or(u32::MAX);

        if let Some(rest) = line.strip_prefix('.') {
            let mut tokens = rest.split_whitespace();
            let label = tokens.next().unwrap_or_default();
            let mut section = Section::new(label, tokens);
            section.span = LineSpan::new(number);
            sections.push(section);
            continue;
        }

        match sections.last_mut() {
            Some(section) => section.lines.push(line.to_string()),
            None => {
                return Err(DeviceError::MalformedSection(format!(
                    "line {number}: body text before the first section"
                )))
            }
        }
    }

    Ok(sections)
}
