//! Terminal output helpers shared by the commands.

use std::io::Write;

pub fn write_error(err: &mut dyn Write, msg: &str) -> std::io::Result<()> {
    writeln!(err, "Error: {}", msg)
}

/// Display a warning message to stderr with "WARNING:" prefix
pub fn display_warning(err: &mut dyn Write, message: &str) -> std::io::Result<()> {
    writeln!(err, "WARNING: {}", message)
}

/// Write a prompt without a trailing newline and flush it.
pub fn prompt(out: &mut dyn Write, message: &str) -> std::io::Result<()> {
    write!(out, "{}", message)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_and_warnings_are_prefixed() {
        let mut err = Vec::new();
        write_error(&mut err, "bad input").unwrap();
        display_warning(&mut err, "slow").unwrap();
        assert_eq!(
            String::from_utf8(err).unwrap(),
            "Error: bad input\nWARNING: slow\n"
        );
    }

    #[test]
    fn prompt_has_no_newline() {
        let mut out = Vec::new();
        prompt(&mut out, "Choose: ").unwrap();
        assert_eq!(out, b"Choose: ");
    }
}
