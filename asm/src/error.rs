use color_print::cprintln;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown mnemonic: `{token}`")]
    UnknownMnemonic { line: usize, token: String },

    #[error("Invalid literal operand: `{text}`")]
    InvalidLiteral { line: usize, text: String },

    #[error("Malformed statement: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("Location counter overflow")]
    CounterOverflow { line: usize },

    #[error("Failed to open source file: {0}")]
    MissingSource(String, #[source] std::io::Error),

    #[error("Failed to write file: {0}")]
    Write(String, #[source] std::io::Error),

    #[error("Failed to serialize table map")]
    Map(#[from] serde_yaml::Error),
}

impl Error {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Error::Malformed {
            line,
            reason: reason.into(),
        }
    }

    /// 1-based source line the error points at, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::UnknownMnemonic { line, .. }
            | Error::InvalidLiteral { line, .. }
            | Error::Malformed { line, .. }
            | Error::CounterOverflow { line } => Some(*line),
            _ => None,
        }
    }

    /// Print error with diagnostic information showing file location and line content
    pub fn print_diag(&self, file: &str, lines: &[&str]) {
        cprintln!("<red,bold>error</>: {}", self);

        let Some(line_num) = self.line() else {
            return;
        };
        cprintln!("     <blue>--></> <underline>{}:{}</>", file, line_num);
        cprintln!("      <blue>|</>");

        let line_content = lines.get(line_num - 1).copied().unwrap_or("");

        cprintln!(" <blue>{:>4} |</> {}", line_num, line_content);
        cprintln!("      <blue>|</>");
    }
}
