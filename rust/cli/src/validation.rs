//! Input parsing and validation for interactive commands.
//!
//! The `play` command lists the legal moves for a roll with 1-based numbers;
//! the player answers with one of those numbers or quits.

/// Result of parsing one line typed at the move prompt.
#[derive(Debug, PartialEq, Eq)]
pub enum ParseResult {
    /// Index into the legal-move list (0-based)
    Choice(usize),
    /// User entered quit command (q or quit)
    Quit,
    /// Invalid input with error message
    Invalid(String),
}

/// Parse a move choice against a list of `available` moves.
///
/// Accepts (case-insensitive):
/// - `1`..=`available` → that move
/// - empty input → the first move, when exactly one move is available
/// - `q` or `quit` → quit
///
/// # Example
///
/// ```rust
/// # use ludo_cli::validation::{parse_move_choice, ParseResult};
/// assert_eq!(parse_move_choice("2", 3), ParseResult::Choice(1));
/// assert_eq!(parse_move_choice("q", 3), ParseResult::Quit);
/// assert!(matches!(parse_move_choice("4", 3), ParseResult::Invalid(_)));
/// ```
pub fn parse_move_choice(input: &str, available: usize) -> ParseResult {
    let input = input.trim().to_lowercase();

    if input == "q" || input == "quit" {
        return ParseResult::Quit;
    }
    if input.is_empty() {
        return if available == 1 {
            ParseResult::Choice(0)
        } else {
            ParseResult::Invalid(format!("Enter a move number between 1 and {}", available))
        };
    }

    match input.parse::<usize>() {
        Ok(n) if (1..=available).contains(&n) => ParseResult::Choice(n - 1),
        Ok(_) => ParseResult::Invalid(format!(
            "Move number must be between 1 and {}",
            available
        )),
        Err(_) => ParseResult::Invalid(format!("Unrecognized input: {}", input)),
    }
}

/// Batch sizes for `sim` and `eval` must be positive.
pub fn validate_games(games: u32) -> Result<(), String> {
    if games == 0 {
        Err("games must be >= 1".to_string())
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_one_based() {
        assert_eq!(parse_move_choice("1", 2), ParseResult::Choice(0));
        assert_eq!(parse_move_choice(" 2 ", 2), ParseResult::Choice(1));
    }

    #[test]
    fn out_of_range_and_garbage_are_invalid() {
        assert!(matches!(parse_move_choice("0", 2), ParseResult::Invalid(_)));
        assert!(matches!(parse_move_choice("3", 2), ParseResult::Invalid(_)));
        match parse_move_choice("left", 2) {
            ParseResult::Invalid(msg) => assert!(msg.contains("Unrecognized")),
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn quit_is_case_insensitive() {
        assert_eq!(parse_move_choice("Q", 4), ParseResult::Quit);
        assert_eq!(parse_move_choice("QUIT", 4), ParseResult::Quit);
    }

    #[test]
    fn empty_input_only_accepts_a_forced_move() {
        assert_eq!(parse_move_choice("", 1), ParseResult::Choice(0));
        assert!(matches!(parse_move_choice("", 2), ParseResult::Invalid(_)));
    }

    #[test]
    fn zero_games_is_rejected() {
        assert!(validate_games(0).is_err());
        assert!(validate_games(1).is_ok());
    }
}
