//! Model file persistence
//!
//! Models are stored in a small line-oriented text format:
//!
//! ```text
//! %SVM
//! numsv=2;
//! kernel='Linear';
//! b=+1.0000000000000000e+00;
//! alphas=[
//! 	[+5.0000000000000000e-01,7];
//! 	[-2.5000000000000000e-01,3];
//! ];
//! ```
//!
//! Floats are written like C's `%+10.16e`, which carries enough digits to
//! restore every `f64` exactly. Whitespace between tokens is skipped on
//! load; the literal tokens and their order are fixed.

use crate::core::{Result, SVMError};
use crate::svm::Svm;
use log::{error, info};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Formats `f64` like C's `%+10.16e`
struct SciFloat(f64);

impl fmt::Display for SciFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0;

        if v.is_nan() {
            return f.write_str("+nan");
        }
        if v.is_infinite() {
            return f.write_str(if v > 0.0 { "+inf" } else { "-inf" });
        }

        // Rust writes `e-1`; C zero-pads the exponent to two digits and signs it
        let s = format!("{:+.16e}", v);
        match s.split_once('e') {
            Some((mantissa, exponent)) => {
                let exp: i32 = exponent.parse().map_err(|_| fmt::Error)?;
                let sign = if exp < 0 { '-' } else { '+' };
                write!(f, "{}e{}{:02}", mantissa, sign, exp.abs())
            }
            None => f.write_str(&s),
        }
    }
}

/// Cursor over a model file with scanf-like primitives
struct ModelScanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> ModelScanner<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn is_exhausted(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Match `literal` at the cursor without skipping whitespace
    fn expect(&mut self, literal: &str) -> Option<()> {
        if self.rest().starts_with(literal) {
            self.pos += literal.len();
            Some(())
        } else {
            None
        }
    }

    /// Skip whitespace, then take up to `max_chars` non-whitespace characters
    fn word(&mut self, max_chars: usize) -> Option<&'a str> {
        self.skip_whitespace();
        let rest = self.rest();
        let len = rest
            .char_indices()
            .take(max_chars)
            .take_while(|(_, c)| !c.is_whitespace())
            .map(|(i, c)| i + c.len_utf8())
            .last()?;
        self.pos += len;
        Some(&rest[..len])
    }

    /// Take characters up to, not including, `delimiter` on the current line
    fn until(&mut self, delimiter: char) -> Option<&'a str> {
        let rest = self.rest();
        let len = rest.find(|c: char| c == delimiter || c == '\n')?;
        if len == 0 || !rest[len..].starts_with(delimiter) {
            return None;
        }
        self.pos += len;
        Some(&rest[..len])
    }

    fn int(&mut self) -> Option<i32> {
        self.skip_whitespace();
        let rest = self.rest();
        let bytes = rest.as_bytes();
        let mut len = 0;
        if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
            len += 1;
        }
        let digits = bytes[len..].iter().take_while(|b| b.is_ascii_digit()).count();
        if digits == 0 {
            return None;
        }
        len += digits;
        let value = rest[..len].parse().ok()?;
        self.pos += len;
        Some(value)
    }

    fn float(&mut self) -> Option<f64> {
        self.skip_whitespace();
        let rest = self.rest();
        let bytes = rest.as_bytes();
        let mut len = 0;
        if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
            len += 1;
        }

        if bytes.get(len).is_some_and(|b| b.is_ascii_alphabetic()) {
            // inf / nan
            len += bytes[len..]
                .iter()
                .take_while(|b| b.is_ascii_alphabetic())
                .count();
        } else {
            let count_digits = |from: usize| {
                bytes[from..]
                    .iter()
                    .take_while(|b| b.is_ascii_digit())
                    .count()
            };

            let int_digits = count_digits(len);
            len += int_digits;
            let mut frac_digits = 0;
            if bytes.get(len) == Some(&b'.') {
                frac_digits = count_digits(len + 1);
                len += 1 + frac_digits;
            }
            if int_digits + frac_digits == 0 {
                return None;
            }
            if matches!(bytes.get(len), Some(b'e') | Some(b'E')) {
                let mut exp_len = 1;
                if matches!(bytes.get(len + 1), Some(b'+') | Some(b'-')) {
                    exp_len += 1;
                }
                let exp_digits = count_digits(len + exp_len);
                if exp_digits > 0 {
                    len += exp_len + exp_digits;
                }
            }
        }

        let value = rest[..len].parse().ok()?;
        self.pos += len;
        Some(value)
    }

    /// `<key><value>;` surrounded by optional whitespace
    fn assignment<T>(
        &mut self,
        key: &str,
        value: impl FnOnce(&mut Self) -> Option<T>,
    ) -> Option<T> {
        self.skip_whitespace();
        self.expect(key)?;
        let parsed = value(self)?;
        self.expect(";")?;
        self.skip_whitespace();
        Some(parsed)
    }

    /// `[<alpha>,<index>];` surrounded by optional whitespace
    fn alpha_row(&mut self) -> Option<(f64, i32)> {
        self.skip_whitespace();
        self.expect("[")?;
        let alpha = self.float()?;
        self.expect(",")?;
        let index = self.int()?;
        self.expect("];")?;
        self.skip_whitespace();
        Some((alpha, index))
    }
}

/// Line counter for parse diagnostics
///
/// Advances after each parsed field unless the input is already used up, so
/// reported lines never decrease and point at the field that failed.
struct LineCounter(usize);

impl LineCounter {
    fn advance_unless_exhausted(&mut self, scanner: &ModelScanner<'_>) {
        if !scanner.is_exhausted() {
            self.0 += 1;
        }
    }

    fn error(&self) -> SVMError {
        SVMError::FormatError { line: self.0 }
    }
}

impl Svm {
    /// Restore the model from `reader`
    ///
    /// Parse failures are logged and reported as `false`; the model is then
    /// left with [`Svm::is_loaded`] returning `false`.
    pub fn load<R: Read>(&mut self, reader: R) -> bool {
        match self.load_from_reader(reader) {
            Ok(()) => true,
            Err(e) => {
                error!("{}", e);
                false
            }
        }
    }

    /// Restore the model from `reader`, returning the failure
    ///
    /// The support-vector arrays are reallocated as soon as `numsv` has been
    /// read, so a failure further down leaves a fresh zeroed model behind.
    /// Bytes that are not UTF-8 are decoded lossily; in a numeric field they
    /// fail as a `FormatError` on that field's line.
    pub fn load_from_reader<R: Read>(&mut self, mut reader: R) -> Result<()> {
        self.loaded = false;

        let mut input = Vec::new();
        reader.read_to_end(&mut input)?;

        self.parse_model(&String::from_utf8_lossy(&input))?;
        self.loaded = true;
        Ok(())
    }

    /// Restore the model from a file
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let file = File::open(path).map_err(SVMError::IoError)?;
        self.load_from_reader(BufReader::new(file))
    }

    fn parse_model(&mut self, input: &str) -> Result<()> {
        let mut scanner = ModelScanner::new(input);
        let mut line = LineCounter(1);

        if scanner.word(4) != Some("%SVM") {
            return Err(line.error());
        }
        scanner.skip_whitespace();
        line.0 += 1;

        let num_sv = scanner
            .assignment("numsv=", ModelScanner::int)
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| line.error())?;
        line.advance_unless_exhausted(&scanner);

        info!("loading {} support vectors", num_sv);
        self.create_new_model(num_sv)?;

        let kernel_name = scanner
            .assignment("kernel='", |s| {
                let name = s.until('\'')?;
                s.expect("'")?;
                Some(name)
            })
            .ok_or_else(|| line.error())?;
        line.advance_unless_exhausted(&scanner);

        if let Some(kernel) = &self.kernel {
            if kernel.name() != kernel_name {
                info!(
                    "model was saved with kernel '{}', attached kernel is '{}'",
                    kernel_name,
                    kernel.name()
                );
            }
        }

        let bias = scanner
            .assignment("b=", ModelScanner::float)
            .ok_or_else(|| line.error())?;
        line.advance_unless_exhausted(&scanner);
        self.set_bias(bias);

        if scanner.word(8) != Some("alphas=[") {
            return Err(line.error());
        }
        scanner.skip_whitespace();
        line.0 += 1;

        for i in 0..num_sv {
            let (alpha, index) = scanner.alpha_row().ok_or_else(|| line.error())?;
            line.advance_unless_exhausted(&scanner);

            self.set_support_vector(i, index)?;
            self.set_alpha(i, alpha)?;
        }

        if scanner.word(2) != Some("];") {
            return Err(line.error());
        }

        Ok(())
    }

    /// Write the model to `writer`
    ///
    /// Needs an attached kernel, whose name goes into the header.
    pub fn save<W: Write>(&self, mut writer: W) -> Result<()> {
        let kernel = self
            .kernel
            .as_ref()
            .ok_or_else(|| SVMError::PreconditionError("no kernel defined".to_string()))?;

        info!("Writing model file...");
        writeln!(writer, "%SVM")?;
        writeln!(writer, "numsv={};", self.get_num_support_vectors())?;
        writeln!(writer, "kernel='{}';", kernel.name())?;
        writeln!(writer, "b={};", SciFloat(self.get_bias()))?;
        writeln!(writer, "alphas=[")?;

        for (alpha, index) in self.model.iter() {
            writeln!(writer, "\t[{},{}];", SciFloat(alpha), index)?;
        }

        writeln!(writer, "];")?;
        writer.flush()?;
        info!("done.");
        Ok(())
    }

    /// Write the model to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path).map_err(SVMError::IoError)?;
        self.save(BufWriter::new(file))
    }
}
