use color_print::cprintln;

/// Non-fatal diagnostic collected while assembling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    Warn(String),
    Note(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diag {
    pub line: usize,
    pub msg: Msg,
}

impl Diag {
    pub fn warn(line: usize, msg: String) -> Self {
        Diag {
            line,
            msg: Msg::Warn(msg),
        }
    }

    pub fn note(line: usize, msg: String) -> Self {
        Diag {
            line,
            msg: Msg::Note(msg),
        }
    }

    pub fn is_warn(&self) -> bool {
        matches!(self.msg, Msg::Warn(_))
    }

    pub fn print(&self, file: &str, lines: &[&str]) {
        match &self.msg {
            Msg::Warn(msg) => cprintln!("<yellow,bold>warn</>: {}", msg),
            Msg::Note(msg) => cprintln!("<green,bold>note</>: {}", msg),
        }
        let raw = lines
            .get(self.line.wrapping_sub(1))
            .copied()
            .unwrap_or("");
        cprintln!("     <blue>--></> <underline>{}:{}</>", file, self.line);
        cprintln!("      <blue>|</>");
        cprintln!(" <blue>{:>4} |</> {}", self.line, raw);
        cprintln!("      <blue>|</>");
    }
}
