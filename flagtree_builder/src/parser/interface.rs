use std::cell::RefCell;
use std::io::Write;

use crate::parser::base::ParseError;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

// We'll target 95% of the total width, to ensure the renderer doesn't literally use the full space.
const TARGET_TOTAL_FACTOR: f64 = 0.95;

// Let's assume the average word length is 5.
// Then 17 is a good minimum, because it allows precisely 3 words with a space between them.
pub(crate) const MINIMUM_MIDDLE_WIDTH: usize = 17;

/// Lays out two columns, wrapping the right one when a width is known.
#[derive(Debug)]
pub(crate) struct ColumnRenderer {
    padding: usize,
    left: usize,
    middle: Option<usize>,
}

impl ColumnRenderer {
    /// Produce a renderer whose middle column fills the remainder of `total_width`.
    pub(crate) fn guided(padding: usize, left: usize, middle: usize, total_width: usize) -> Self {
        let non_middle = left + padding;
        let target_total_width = (total_width as f64 * TARGET_TOTAL_FACTOR) as usize;
        let guided_middle = std::cmp::max(middle, MINIMUM_MIDDLE_WIDTH);

        if guided_middle + non_middle <= target_total_width {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Columns {non_middle} and middle fit within the target total {target_total_width}.  Selecting middle: {guided_middle}.");
            }

            Self::new(padding, left, Some(guided_middle))
        } else if non_middle < total_width {
            let calculated_middle = std::cmp::max(total_width - non_middle, MINIMUM_MIDDLE_WIDTH);

            #[cfg(feature = "tracing_debug")]
            {
                debug!("Columns {non_middle} fit within the total {total_width}.  Selecting middle: {calculated_middle}.");
            }

            Self::new(padding, left, Some(calculated_middle))
        } else {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Columns {non_middle} do not fit within the total {total_width}.  Selecting middle: {MINIMUM_MIDDLE_WIDTH}.");
            }

            Self::new(padding, left, Some(MINIMUM_MIDDLE_WIDTH))
        }
    }

    /// Produce a renderer; a `middle` of `None` never wraps.
    pub(crate) fn new(padding: usize, left: usize, middle: Option<usize>) -> Self {
        Self {
            padding,
            left,
            middle,
        }
    }

    pub(crate) fn render(&self, indent: usize, left: &str, middle: &str) -> Vec<String> {
        let padding = format!("{:width$}", "", width = self.padding);
        let left_column_width = self.left;
        let middle_parts = match self.middle {
            Some(width) => chunk(middle, width.saturating_sub(indent)),
            None => chunk(middle, usize::MAX),
        };
        let mut out = Vec::default();

        for (i, part) in middle_parts.iter().enumerate() {
            let left = if i == 0 { left } else { "" };
            out.push(format!("{:indent$}{left:left_column_width$}{padding}{part}", ""));
        }

        if out.is_empty() {
            out.push(format!("{:indent$}{left}", ""));
        }

        out
    }
}

/// Split a paragraph into lines no wider than `width` characters, hyphenating words that cannot fit.
pub(crate) fn chunk(paragraph: &str, width: usize) -> Vec<String> {
    // Hyphenation needs room for at least one character plus the hyphen.
    let width = std::cmp::max(width, 2);
    let mut lines = Vec::default();
    let mut current = String::default();
    let mut current_length = 0;

    for word in paragraph.split(' ').filter(|word| !word.is_empty()) {
        let word_length = word.chars().count();

        if current.is_empty() {
            current_length = hyphenate(width, &mut lines, &mut current, word);
        } else if current_length + word_length + 1 <= width {
            current.push(' ');
            current.push_str(word);
            current_length += word_length + 1;
        } else {
            lines.push(std::mem::take(&mut current));
            current_length = hyphenate(width, &mut lines, &mut current, word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

fn hyphenate(width: usize, lines: &mut Vec<String>, current: &mut String, word: &str) -> usize {
    let characters: Vec<char> = word.chars().collect();
    let increment = width - 1;
    let mut left = 0;

    while characters.len() - left > width {
        let piece: String = characters[left..left + increment].iter().collect();
        lines.push(format!("{piece}-"));
        left += increment;
    }

    current.extend(&characters[left..]);
    characters.len() - left
}

/// Where a command writes its output.
pub(crate) trait UserInterface {
    /// Write one line of normal output (ex: help).
    fn print(&self, message: String);

    /// Write one line of diagnostic output (ex: usage after a failure).
    fn print_diagnostic(&self, message: String);

    /// Report a failure on the diagnostic output.
    fn print_error(&self, error: ParseError) {
        self.print_diagnostic(error.to_string());
    }
}

#[derive(Default)]
pub(crate) struct ConsoleInterface {}

impl UserInterface for ConsoleInterface {
    fn print(&self, message: String) {
        println!("{message}");
    }

    fn print_diagnostic(&self, message: String) {
        eprintln!("{message}");
    }
}

/// Writes to caller supplied sinks.
pub(crate) struct WriterInterface<'a> {
    normal: RefCell<Box<dyn Write + 'a>>,
    diagnostic: RefCell<Box<dyn Write + 'a>>,
}

impl<'a> WriterInterface<'a> {
    pub(crate) fn new(normal: impl Write + 'a, diagnostic: impl Write + 'a) -> Self {
        Self {
            normal: RefCell::new(Box::new(normal)),
            diagnostic: RefCell::new(Box::new(diagnostic)),
        }
    }
}

impl<'a> UserInterface for WriterInterface<'a> {
    fn print(&self, message: String) {
        let _ = writeln!(self.normal.borrow_mut(), "{message}");
    }

    fn print_diagnostic(&self, message: String) {
        let _ = writeln!(self.diagnostic.borrow_mut(), "{message}");
    }
}
