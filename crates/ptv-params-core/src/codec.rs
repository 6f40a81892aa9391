//! Line codec for the position-encoded `.par` format.
//!
//! A `.par` file has no keys: the n-th line is the n-th field. Each record
//! declares its field order once, as a sequence of calls on a
//! [`FieldCodec`]. Reading runs that declaration against a [`ParReader`],
//! writing runs the very same declaration against a [`ParWriter`], so the
//! two directions cannot drift apart.

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::format::{
    first_token, format_g, parse_count, parse_flag, parse_float, parse_int, ValueError,
};
use crate::resize::{is_placeholder, PLACEHOLDER};

/// Visitor over the ordered fields of one record.
///
/// `name` is the field name used in diagnostics only.
pub trait FieldCodec {
    fn int(&mut self, name: &'static str, value: &mut i32);
    /// A list length declared in the file. Readers bound it by
    /// [`MAX_DECLARED_COUNT`](crate::MAX_DECLARED_COUNT).
    fn count(&mut self, name: &'static str, value: &mut usize);
    fn float(&mut self, name: &'static str, value: &mut f64);
    fn flag(&mut self, name: &'static str, value: &mut bool);
    fn text(&mut self, name: &'static str, value: &mut String);
}

/// Pulls values out of `.par` text, one line per field.
///
/// Decoding never fails: a malformed value keeps the field's current
/// (default) value and a missing line stops further reads. Both are
/// recorded as diagnostics.
pub struct ParReader<'a> {
    source: String,
    lines: std::str::Lines<'a>,
    line_no: usize,
    truncated: bool,
    warnings: Vec<Diagnostic>,
}

impl<'a> ParReader<'a> {
    pub fn new(source: impl Into<String>, text: &'a str) -> Self {
        Self {
            source: source.into(),
            lines: text.lines(),
            line_no: 0,
            truncated: false,
            warnings: Vec::new(),
        }
    }

    fn next_line(&mut self, name: &'static str) -> Option<&'a str> {
        if self.truncated {
            return None;
        }
        match self.lines.next() {
            Some(line) => {
                self.line_no += 1;
                Some(line)
            }
            None => {
                self.truncated = true;
                self.warnings.push(Diagnostic::warn(
                    DiagnosticKind::Truncated,
                    self.source.clone(),
                    format!(
                        "file ends after line {} while reading `{name}`; remaining fields keep defaults",
                        self.line_no
                    ),
                ));
                None
            }
        }
    }

    fn decode<T>(
        &mut self,
        name: &'static str,
        value: &mut T,
        parse: impl FnOnce(&str) -> Result<T, ValueError>,
    ) {
        let Some(line) = self.next_line(name) else {
            return;
        };
        match first_token(line).ok_or(ValueError::Empty).and_then(parse) {
            Ok(v) => *value = v,
            Err(err) => self.warnings.push(Diagnostic::warn(
                DiagnosticKind::Malformed,
                self.source.clone(),
                format!("line {} (`{name}`): {err}; keeping default", self.line_no),
            )),
        }
    }

    /// Finish reading and return the collected warnings.
    pub fn finish(mut self) -> Vec<Diagnostic> {
        let extra = self.lines.by_ref().filter(|l| !l.trim().is_empty()).count();
        if extra > 0 {
            log::debug!("{}: ignoring {extra} trailing line(s)", self.source);
        }
        self.warnings
    }
}

impl FieldCodec for ParReader<'_> {
    fn int(&mut self, name: &'static str, value: &mut i32) {
        self.decode(name, value, parse_int);
    }

    fn count(&mut self, name: &'static str, value: &mut usize) {
        self.decode(name, value, parse_count);
    }

    fn float(&mut self, name: &'static str, value: &mut f64) {
        self.decode(name, value, parse_float);
    }

    fn flag(&mut self, name: &'static str, value: &mut bool) {
        self.decode(name, value, parse_flag);
    }

    fn text(&mut self, name: &'static str, value: &mut String) {
        if let Some(line) = self.next_line(name) {
            *value = line.trim().to_string();
        }
    }
}

/// Pushes values into `.par` text: `%d` ints, `%g` floats, `0/1` flags.
#[derive(Debug, Default)]
pub struct ParWriter {
    out: String,
}

impl ParWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn line(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }
}

impl FieldCodec for ParWriter {
    fn int(&mut self, _name: &'static str, value: &mut i32) {
        self.line(&value.to_string());
    }

    fn count(&mut self, _name: &'static str, value: &mut usize) {
        self.line(&value.to_string());
    }

    fn float(&mut self, _name: &'static str, value: &mut f64) {
        self.line(&format_g(*value));
    }

    fn flag(&mut self, _name: &'static str, value: &mut bool) {
        self.line(if *value { "1" } else { "0" });
    }

    fn text(&mut self, _name: &'static str, value: &mut String) {
        if is_placeholder(value) {
            self.line(PLACEHOLDER);
        } else {
            self.line(value.trim());
        }
    }
}

/// Touches nothing. Running a layout against it only applies the list
/// sizing the layout performs, which is how records are fitted to a camera
/// count without any I/O.
#[derive(Debug, Default, Clone, Copy)]
pub struct SizingCodec;

impl FieldCodec for SizingCodec {
    fn int(&mut self, _name: &'static str, _value: &mut i32) {}
    fn count(&mut self, _name: &'static str, _value: &mut usize) {}
    fn float(&mut self, _name: &'static str, _value: &mut f64) {}
    fn flag(&mut self, _name: &'static str, _value: &mut bool) {}
    fn text(&mut self, _name: &'static str, _value: &mut String) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Pair {
        count: i32,
        scale: f64,
        enabled: bool,
        name: String,
    }

    impl Pair {
        fn layout(&mut self, codec: &mut dyn FieldCodec) {
            codec.int("count", &mut self.count);
            codec.float("scale", &mut self.scale);
            codec.flag("enabled", &mut self.enabled);
            codec.text("name", &mut self.name);
        }
    }

    #[test]
    fn reader_and_writer_share_one_layout() {
        let mut rec = Pair {
            count: 3,
            scale: 0.25,
            enabled: true,
            name: "cam1".into(),
        };
        let mut writer = ParWriter::new();
        rec.layout(&mut writer);
        let text = writer.finish();
        assert_eq!(text, "3\n0.25\n1\ncam1\n");

        let mut back = Pair::default();
        let mut reader = ParReader::new("pair.par", &text);
        back.layout(&mut reader);
        assert!(reader.finish().is_empty());
        assert_eq!(back, rec);
    }

    #[test]
    fn malformed_value_keeps_default_and_continues() {
        let mut rec = Pair {
            count: 7,
            ..Pair::default()
        };
        let mut reader = ParReader::new("pair.par", "seven\n2.5\n0\nx\n");
        rec.layout(&mut reader);
        let warnings = reader.finish();
        assert_eq!(rec.count, 7);
        assert_eq!(rec.scale, 2.5);
        assert_eq!(rec.name, "x");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, DiagnosticKind::Malformed);
    }

    #[test]
    fn short_file_warns_once() {
        let mut rec = Pair::default();
        let mut reader = ParReader::new("pair.par", "1\n");
        rec.layout(&mut reader);
        let warnings = reader.finish();
        assert_eq!(rec.count, 1);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, DiagnosticKind::Truncated);
    }

    #[test]
    fn oversized_count_keeps_default() {
        let mut n = 4usize;
        let mut reader = ParReader::new("ptv.par", "2147483647\n");
        reader.count("n_img", &mut n);
        let warnings = reader.finish();
        assert_eq!(n, 4);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, DiagnosticKind::Malformed);
        assert!(warnings[0].message.contains("n_img"));
    }

    #[test]
    fn empty_text_is_written_as_placeholder() {
        let mut rec = Pair::default();
        let mut writer = ParWriter::new();
        rec.layout(&mut writer);
        assert!(writer.finish().ends_with("---\n"));
    }
}
