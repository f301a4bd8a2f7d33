use std::io::{self, BufRead, Write};

#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Input ended before an answer was given")]
    Aborted,
}

pub type ConsoleResult<T> = Result<T, ConsoleError>;

/// Line based question/answer console with block styled messages.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn title(&mut self, title: &str) -> ConsoleResult<()> {
        let underline = "=".repeat(title.chars().count());
        writeln!(self.output)?;
        writeln!(self.output, "{}", title)?;
        writeln!(self.output, "{}", underline)?;
        writeln!(self.output)?;
        Ok(())
    }

    pub fn writeln(&mut self, line: &str) -> ConsoleResult<()> {
        writeln!(self.output, "{}", line)?;
        Ok(())
    }

    pub fn text(&mut self, text: &str) -> ConsoleResult<()> {
        writeln!(self.output, " {}", text)?;
        Ok(())
    }

    pub fn success(&mut self, message: &str) -> ConsoleResult<()> {
        self.block("OK", message)
    }

    pub fn warning(&mut self, message: &str) -> ConsoleResult<()> {
        self.block("WARNING", message)
    }

    pub fn error(&mut self, message: &str) -> ConsoleResult<()> {
        self.block("ERROR", message)
    }

    fn block(&mut self, label: &str, message: &str) -> ConsoleResult<()> {
        writeln!(self.output)?;
        writeln!(self.output, " [{}] {}", label, message)?;
        writeln!(self.output)?;
        Ok(())
    }

    /// Ask a free text question. An empty answer yields `default`.
    ///
    /// Returns `None` once the input is exhausted.
    pub fn ask(&mut self, question: &str, default: Option<&str>) -> ConsoleResult<Option<String>> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let Some(line) = self.read_line()? else {
            return Ok(None);
        };
        if line.is_empty() {
            return Ok(Some(default.unwrap_or_default().to_string()));
        }
        Ok(Some(line))
    }

    /// Ask to pick one of `choices`, by index or by label.
    ///
    /// An empty answer selects `default`, an invalid one is reported and asked
    /// again. Once the input is exhausted the default is returned, or
    /// [`ConsoleError::Aborted`] when there is none.
    pub fn choice(
        &mut self,
        question: &str,
        choices: &[String],
        default: Option<&str>,
    ) -> ConsoleResult<String> {
        loop {
            match default {
                Some(default) => writeln!(self.output, " {} [{}]:", question, default)?,
                None => writeln!(self.output, " {}:", question)?,
            }
            for (index, choice) in choices.iter().enumerate() {
                writeln!(self.output, "  [{}] {}", index, choice)?;
            }
            write!(self.output, " > ")?;
            self.output.flush()?;

            let Some(answer) = self.read_line()? else {
                return default.map(str::to_string).ok_or(ConsoleError::Aborted);
            };

            if answer.is_empty() {
                if let Some(default) = default {
                    return Ok(default.to_string());
                }
            } else if let Some(choice) = resolve_choice(&answer, choices) {
                return Ok(choice.to_string());
            }

            self.error(&format!("Choice {} is invalid.", answer))?;
        }
    }

    /// Render rows as a boxed table.
    pub fn table(&mut self, headers: &[&str], rows: &[Vec<String>]) -> ConsoleResult<()> {
        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for row in rows {
            for (index, cell) in row.iter().enumerate() {
                if let Some(width) = widths.get_mut(index) {
                    *width = (*width).max(cell.chars().count());
                }
            }
        }

        let separator = widths
            .iter()
            .map(|width| "-".repeat(width + 2))
            .collect::<Vec<_>>()
            .join("+");
        let separator = format!("+{}+", separator);

        writeln!(self.output, "{}", separator)?;
        let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
        writeln!(self.output, "{}", format_row(&header_cells, &widths))?;
        writeln!(self.output, "{}", separator)?;
        for row in rows {
            writeln!(self.output, "{}", format_row(row, &widths))?;
        }
        writeln!(self.output, "{}", separator)?;
        Ok(())
    }

    fn read_line(&mut self) -> ConsoleResult<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

fn resolve_choice<'a>(answer: &str, choices: &'a [String]) -> Option<&'a str> {
    if let Ok(index) = answer.parse::<usize>() {
        return choices.get(index).map(String::as_str);
    }
    choices
        .iter()
        .find(|choice| choice.as_str() == answer)
        .map(String::as_str)
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    let cells: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(index, width)| {
            let cell = cells.get(index).map(String::as_str).unwrap_or_default();
            let padding = width - cell.chars().count();
            format!(" {}{} ", cell, " ".repeat(padding))
        })
        .collect();
    format!("|{}|", cells.join("|"))
}
