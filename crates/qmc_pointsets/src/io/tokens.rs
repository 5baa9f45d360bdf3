//! Integer tokenizer shared by the file readers.

use std::path::Path;

use qmc_core::error::{FormatError, FormatErrorKind};

/// Integer tokens with their 1-based line numbers, comments stripped.
pub(crate) struct Tokens<'a> {
    path: &'a Path,
    items: std::vec::IntoIter<(usize, &'a str)>,
    last_line: usize,
}

impl<'a> Tokens<'a> {
    pub(crate) fn new(path: &'a Path, text: &'a str) -> Self {
        let items: Vec<(usize, &str)> = text
            .lines()
            .enumerate()
            .flat_map(|(n, line)| {
                let content = strip_comment(line);
                content.split_whitespace().map(move |t| (n + 1, t))
            })
            .collect();
        Self {
            path,
            items: items.into_iter(),
            last_line: 0,
        }
    }

    /// Next token parsed as an unsigned integer.
    pub(crate) fn next_u64(&mut self, expected: impl FnOnce() -> String) -> Result<u64, FormatError> {
        let Some((line, token)) = self.items.next() else {
            return Err(self.error(
                self.last_line,
                FormatErrorKind::PrematureEof {
                    expected: expected(),
                },
            ));
        };
        self.last_line = line;
        token
            .parse::<u64>()
            .map_err(|_| self.error(line, FormatErrorKind::NonNumeric(token.to_string())))
    }

    /// Fails if any token is left.
    pub(crate) fn finish(mut self) -> Result<(), FormatError> {
        match self.items.next() {
            Some((line, token)) => Err(self.error(
                line,
                FormatErrorKind::OutOfRange(format!("unexpected trailing token '{}'", token)),
            )),
            None => Ok(()),
        }
    }

    /// Line of the last token read.
    pub(crate) fn line(&self) -> usize {
        self.last_line
    }

    pub(crate) fn error(&self, line: usize, kind: FormatErrorKind) -> FormatError {
        FormatError::new(self.path, line, kind)
    }
}

pub(crate) fn strip_comment(line: &str) -> &str {
    match line.find("//") {
        Some(at) => &line[..at],
        None => line,
    }
}

pub(crate) fn read_file(path: &Path) -> Result<String, FormatError> {
    std::fs::read_to_string(path)
        .map_err(|e| FormatError::new(path, 0, FormatErrorKind::Io(e.to_string())))
}
