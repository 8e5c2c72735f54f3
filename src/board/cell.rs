//! A single board square.
//!
//! The low byte holds the owner token (0 = unowned, `n` = player slot
//! `n - 1`). The high byte holds independent flags. Ownership and flags
//! never overlap, so a cell can be, say, a player's home and carry a bonus
//! at the same time.

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;

/// Packed owner token plus flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cell(u16);

impl Cell {
    /// A player's starting cell. Territory is only kept alive while it
    /// connects back to one of these.
    pub const HOME: u16 = 0x100;
    /// Claiming this cell awards bites.
    pub const BONUS_BITE: u16 = 0x200;
    /// Claiming this cell awards a reroll.
    pub const BONUS_REROLL: u16 = 0x400;

    const OWNER_MASK: u16 = 0x00ff;
    const FLAG_MASK: u16 = 0xff00;

    /// Unowned, unflagged cell.
    pub const EMPTY: Self = Self(0);

    /// Cell owned by `player` with no flags.
    #[must_use]
    pub fn owned_by(player: PlayerId) -> Self {
        Self(u16::from(player.owner_token()))
    }

    /// Raw packed value, as sent on the wire.
    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }

    #[must_use]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Owner token in the low byte; 0 when unowned.
    #[must_use]
    pub const fn owner_token(self) -> u8 {
        (self.0 & Self::OWNER_MASK) as u8
    }

    /// Owning player, if any.
    #[must_use]
    pub fn owner(self) -> Option<PlayerId> {
        PlayerId::from_owner_token(self.owner_token())
    }

    #[must_use]
    pub const fn is_owned(self) -> bool {
        self.owner_token() != 0
    }

    #[must_use]
    pub fn is_owned_by(self, player: PlayerId) -> bool {
        self.owner_token() == player.owner_token()
    }

    /// Owned by someone other than `player`.
    #[must_use]
    pub fn is_opponent_of(self, player: PlayerId) -> bool {
        self.is_owned() && !self.is_owned_by(player)
    }

    /// Replace the owner, keeping flags. `None` clears ownership.
    #[must_use]
    pub fn with_owner(self, owner: Option<PlayerId>) -> Self {
        let token = owner.map_or(0, |p| u16::from(p.owner_token()));
        Self((self.0 & Self::FLAG_MASK) | token)
    }

    #[must_use]
    pub const fn flags(self) -> u16 {
        self.0 & Self::FLAG_MASK
    }

    #[must_use]
    pub const fn has_flag(self, flag: u16) -> bool {
        self.0 & flag != 0
    }

    #[must_use]
    pub const fn with_flag(self, flag: u16) -> Self {
        Self(self.0 | (flag & Self::FLAG_MASK))
    }

    #[must_use]
    pub const fn without_flag(self, flag: u16) -> Self {
        Self(self.0 & !(flag & Self::FLAG_MASK))
    }

    #[must_use]
    pub const fn is_home(self) -> bool {
        self.has_flag(Self::HOME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_and_flags_are_disjoint() {
        let p2 = PlayerId::new(1);
        let cell = Cell::owned_by(p2).with_flag(Cell::HOME).with_flag(Cell::BONUS_REROLL);

        assert_eq!(cell.bits(), 0x502);
        assert_eq!(cell.owner(), Some(p2));
        assert!(cell.is_home());
        assert!(cell.has_flag(Cell::BONUS_REROLL));
        assert!(!cell.has_flag(Cell::BONUS_BITE));

        let cleared = cell.with_owner(None);
        assert!(!cleared.is_owned());
        assert_eq!(cleared.flags(), Cell::HOME | Cell::BONUS_REROLL);

        let retaken = cleared.with_owner(Some(PlayerId::new(0)));
        assert_eq!(retaken.owner_token(), 1);
        assert!(retaken.is_home());
    }

    #[test]
    fn test_opponent() {
        let p1 = PlayerId::new(0);
        let p2 = PlayerId::new(1);
        assert!(Cell::owned_by(p2).is_opponent_of(p1));
        assert!(!Cell::owned_by(p1).is_opponent_of(p1));
        assert!(!Cell::EMPTY.is_opponent_of(p1));
    }

    #[test]
    fn test_flag_only_touches_high_byte() {
        let cell = Cell::EMPTY.with_flag(0x00ff);
        assert_eq!(cell, Cell::EMPTY);
        assert_eq!(Cell::owned_by(PlayerId::new(2)).without_flag(0xffff).owner_token(), 3);
    }

    #[test]
    fn test_serializes_as_number() {
        let cell = Cell::owned_by(PlayerId::new(0)).with_flag(Cell::HOME);
        assert_eq!(serde_json::to_string(&cell).unwrap(), "257");
    }
}
