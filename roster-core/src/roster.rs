use crate::command::Command;
use std::collections::{HashSet, VecDeque};
use thiserror::Error;

/// Default roster capacity.
pub const MAX_PLAYERS: usize = 20;

pub const DEFAULT_DISPLAY_NAME: &str = "Unknown Player";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Channel identity, e.g. a phone number. This is the matching key.
    pub address: String,
    pub display_name: String,
}

impl Player {
    pub fn new(address: impl Into<String>, display_name: Option<String>) -> Self {
        let display_name = display_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string());
        Self {
            address: address.into(),
            display_name,
        }
    }
}

/// A text message addressed to a single recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub to: String,
    pub body: String,
}

impl Reply {
    fn new(to: &str, body: impl Into<String>) -> Self {
        Self {
            to: to.to_string(),
            body: body.into(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("roster holds {len} players, capacity is {capacity}")]
    OverCapacity { len: usize, capacity: usize },
    #[error("{0} appears more than once in the roster")]
    DuplicateInRoster(String),
    #[error("{0} appears more than once in the waitlist")]
    DuplicateInWaitlist(String),
    #[error("{0} is in both the roster and the waitlist")]
    InBothLists(String),
}

/// The roster and its waitlist.
///
/// Both lists keep insertion order. An address is held by at most one entry
/// across the two lists, and the roster never grows past its capacity.
#[derive(Debug, Clone)]
pub struct Roster {
    players: Vec<Player>,
    waitlist: VecDeque<Player>,
    capacity: usize,
    game_day: Option<String>,
    numeric_shortcuts: bool,
}

impl Default for Roster {
    fn default() -> Self {
        Self::new(MAX_PLAYERS)
    }
}

impl Roster {
    pub fn new(capacity: usize) -> Self {
        Self {
            players: Vec::new(),
            waitlist: VecDeque::new(),
            capacity,
            game_day: None,
            numeric_shortcuts: true,
        }
    }

    /// Sets the day mentioned in the help text.
    pub fn with_game_day(mut self, day: impl Into<String>) -> Self {
        self.game_day = Some(day.into());
        self
    }

    /// Controls whether the help text advertises the `1`-`4` shortcuts.
    pub fn with_numeric_shortcuts(mut self, enabled: bool) -> Self {
        self.numeric_shortcuts = enabled;
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn waitlist(&self) -> &VecDeque<Player> {
        &self.waitlist
    }

    pub fn contains(&self, address: &str) -> bool {
        self.in_roster(address) || self.in_waitlist(address)
    }

    /// Applies `command` on behalf of `player` and returns the messages to
    /// send, in the order they should go out. The result can be empty.
    pub fn apply(&mut self, command: Command, player: Player) -> Vec<Reply> {
        let replies = match command {
            Command::Join => self.join(player),
            Command::Leave => self.leave(&player.address),
            Command::ListRoster => vec![Reply::new(&player.address, self.roster_listing())],
            Command::ListWaitlist => vec![Reply::new(&player.address, self.waitlist_listing())],
            Command::Help => vec![Reply::new(&player.address, self.help_text())],
            Command::Unknown => vec![Reply::new(
                &player.address,
                "Unknown command. Send help for available commands.",
            )],
        };
        debug_assert_eq!(self.verify_invariants(), Ok(()));
        replies
    }

    fn join(&mut self, player: Player) -> Vec<Reply> {
        if self.in_roster(&player.address) {
            return vec![Reply::new(&player.address, "You're already in the roster!")];
        }

        if self.players.len() < self.capacity {
            let to = player.address.clone();
            self.players.push(player);
            return vec![Reply::new(
                &to,
                format!("Added to roster! ({}/{})", self.players.len(), self.capacity),
            )];
        }

        // A repeat join from someone already waitlisted gets no answer.
        if self.in_waitlist(&player.address) {
            return Vec::new();
        }

        let to = player.address.clone();
        self.waitlist.push_back(player);
        vec![Reply::new(
            &to,
            format!(
                "Roster full! Added to waitlist position: {}",
                self.waitlist.len()
            ),
        )]
    }

    fn leave(&mut self, address: &str) -> Vec<Reply> {
        let Some(index) = self.players.iter().position(|p| p.address == address) else {
            return vec![Reply::new(address, "You're not in the roster!")];
        };

        self.players.remove(index);
        let mut replies = Vec::with_capacity(2);
        if let Some(promoted) = self.waitlist.pop_front() {
            replies.push(Reply::new(
                &promoted.address,
                "You've been moved from waitlist to roster!",
            ));
            self.players.push(promoted);
        }
        replies.push(Reply::new(address, "You've been removed from the roster"));
        replies
    }

    fn roster_listing(&self) -> String {
        if self.players.is_empty() {
            return "Roster is empty!".to_string();
        }
        format!(
            "Current Roster ({}/{}):\n{}",
            self.players.len(),
            self.capacity,
            enumerate(self.players.iter())
        )
    }

    fn waitlist_listing(&self) -> String {
        if self.waitlist.is_empty() {
            return "Waitlist is empty!".to_string();
        }
        format!("Current Waitlist:\n{}", enumerate(self.waitlist.iter()))
    }

    fn help_text(&self) -> String {
        let entry = |word: &str, shortcut: &str, summary: &str| {
            if self.numeric_shortcuts && !shortcut.is_empty() {
                format!("{word} ({shortcut}) - {summary}")
            } else {
                format!("{word} - {summary}")
            }
        };
        let mut lines = vec![
            "Available Commands:".to_string(),
            entry("join", "1", "Join the roster/waitlist"),
            entry("leave", "2", "Leave the roster"),
            entry("roster", "3", "Show current roster"),
            entry("waitlist", "4", "Show current waitlist"),
            entry("help", "", "Show this message"),
            String::new(),
        ];
        if let Some(day) = &self.game_day {
            lines.push(format!("Games are every {day}"));
        }
        lines.push(format!("Maximum players: {}", self.capacity));
        lines.join("\n")
    }

    fn in_roster(&self, address: &str) -> bool {
        self.players.iter().any(|p| p.address == address)
    }

    fn in_waitlist(&self, address: &str) -> bool {
        self.waitlist.iter().any(|p| p.address == address)
    }

    pub fn verify_invariants(&self) -> Result<(), InvariantViolation> {
        if self.players.len() > self.capacity {
            return Err(InvariantViolation::OverCapacity {
                len: self.players.len(),
                capacity: self.capacity,
            });
        }

        let mut seen = HashSet::new();
        for player in &self.players {
            if !seen.insert(player.address.as_str()) {
                return Err(InvariantViolation::DuplicateInRoster(player.address.clone()));
            }
        }

        let mut waiting = HashSet::new();
        for player in &self.waitlist {
            if seen.contains(player.address.as_str()) {
                return Err(InvariantViolation::InBothLists(player.address.clone()));
            }
            if !waiting.insert(player.address.as_str()) {
                return Err(InvariantViolation::DuplicateInWaitlist(player.address.clone()));
            }
        }
        Ok(())
    }
}

fn enumerate<'a>(players: impl Iterator<Item = &'a Player>) -> String {
    players
        .enumerate()
        .map(|(i, p)| format!("{}. {} ({})", i + 1, p.display_name, p.address))
        .collect::<Vec<_>>()
        .join("\n")
}
