use core::fmt;

/// The two players in a generalized parity game.
///
/// Player 0 (the system/controller) wins on even priorities; Player 1 (the
/// environment) wins on odd priorities.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Player {
    Zero,
    One,
}

impl Player {
    /// Constructs a player from its index, 0 or 1.
    pub fn from_index(index: u8) -> Self {
        match index {
            0 => Player::Zero,
            1 => Player::One,
            _ => panic!("Invalid player index {index}"),
        }
    }

    /// Constructs the player that a given priority favors: even favors Player 0, odd Player 1.
    pub fn from_priority(priority: usize) -> Self {
        if priority % 2 == 0 { Player::Zero } else { Player::One }
    }

    /// Returns the index of the player, the inverse of [Self::from_index].
    pub fn to_index(self) -> usize {
        match self {
            Player::Zero => 0,
            Player::One => 1,
        }
    }

    /// Returns the opponent of the current player.
    pub fn opponent(self) -> Self {
        match self {
            Player::Zero => Player::One,
            Player::One => Player::Zero,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Zero => write!(f, "player0"),
            Player::One => write!(f, "player1"),
        }
    }
}
