/// Canonical intent behind an inbound chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Join,
    Leave,
    ListRoster,
    ListWaitlist,
    Help,
    Unknown,
}

impl Command {
    /// Maps raw message text onto a command.
    ///
    /// Input is trimmed and lowercased, and a single leading `!` is dropped so
    /// that `!join` keeps working. Matching is exact after that. The digits
    /// `1` to `4` are only recognized when `numeric_shortcuts` is set.
    pub fn parse(input: &str, numeric_shortcuts: bool) -> Command {
        let normalized = input.trim().to_lowercase();
        let token = normalized.strip_prefix('!').unwrap_or(&normalized);

        match token {
            "join" => Command::Join,
            "leave" => Command::Leave,
            "roster" | "view roster" => Command::ListRoster,
            "waitlist" | "view waitlist" => Command::ListWaitlist,
            "help" | "menu" => Command::Help,
            "1" if numeric_shortcuts => Command::Join,
            "2" if numeric_shortcuts => Command::Leave,
            "3" if numeric_shortcuts => Command::ListRoster,
            "4" if numeric_shortcuts => Command::ListWaitlist,
            _ => Command::Unknown,
        }
    }

    /// Whether applying this command can change the roster or waitlist.
    pub fn is_mutating(self) -> bool {
        matches!(self, Command::Join | Command::Leave)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_and_whitespace_insensitive() {
        for input in ["JOIN", " join ", "join", "Join\n"] {
            assert_eq!(Command::parse(input, true), Command::Join, "input {input:?}");
        }
    }

    #[test]
    fn test_parse_recognized_words() {
        assert_eq!(Command::parse("leave", true), Command::Leave);
        assert_eq!(Command::parse("roster", true), Command::ListRoster);
        assert_eq!(Command::parse("View Roster", true), Command::ListRoster);
        assert_eq!(Command::parse("waitlist", true), Command::ListWaitlist);
        assert_eq!(Command::parse("view waitlist", true), Command::ListWaitlist);
        assert_eq!(Command::parse("help", true), Command::Help);
        assert_eq!(Command::parse("MENU", true), Command::Help);
    }

    #[test]
    fn test_parse_numeric_shortcuts() {
        assert_eq!(Command::parse("1", true), Command::Join);
        assert_eq!(Command::parse("2", true), Command::Leave);
        assert_eq!(Command::parse(" 3 ", true), Command::ListRoster);
        assert_eq!(Command::parse("4", true), Command::ListWaitlist);
        assert_eq!(Command::parse("5", true), Command::Unknown);
    }

    #[test]
    fn test_parse_numeric_shortcuts_disabled() {
        for input in ["1", "2", "3", "4"] {
            assert_eq!(Command::parse(input, false), Command::Unknown);
        }
        assert_eq!(Command::parse("join", false), Command::Join);
    }

    #[test]
    fn test_parse_bang_prefix() {
        assert_eq!(Command::parse("!join", true), Command::Join);
        assert_eq!(Command::parse(" !ROSTER", true), Command::ListRoster);
        assert_eq!(Command::parse("!help", true), Command::Help);
        assert_eq!(Command::parse("!!join", true), Command::Unknown);
    }

    #[test]
    fn test_parse_is_exact_match() {
        assert_eq!(Command::parse("joinx", true), Command::Unknown);
        assert_eq!(Command::parse("join now", true), Command::Unknown);
        assert_eq!(Command::parse("view", true), Command::Unknown);
        assert_eq!(Command::parse("viewroster", true), Command::Unknown);
    }

    #[test]
    fn test_parse_empty_is_unknown() {
        assert_eq!(Command::parse("", true), Command::Unknown);
        assert_eq!(Command::parse("   ", true), Command::Unknown);
        assert_eq!(Command::parse("!", true), Command::Unknown);
    }

    #[test]
    fn test_is_mutating() {
        assert!(Command::Join.is_mutating());
        assert!(Command::Leave.is_mutating());
        assert!(!Command::ListRoster.is_mutating());
        assert!(!Command::ListWaitlist.is_mutating());
        assert!(!Command::Help.is_mutating());
        assert!(!Command::Unknown.is_mutating());
    }
}
