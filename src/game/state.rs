//! The game aggregate and its turn/elimination state machine.
//!
//! A `Game` is either active, with `turn` naming the player to move, or
//! over, with no turn and no offered piece. It becomes over when exactly one
//! player still owns cells; `reset` starts a fresh round with the same
//! roster and configuration.
//!
//! Every action validates completely before touching the board, so a
//! rejected action leaves the game exactly as it was.
//!
//! ## Example
//!
//! ```
//! use fungus_engine::core::{GameConfig, Participant, ParticipantId};
//! use fungus_engine::game::Game;
//!
//! let roster = vec![
//!     Participant::new(ParticipantId(1), "alice"),
//!     Participant::new(ParticipantId(2), "bob"),
//! ];
//! let mut game = Game::new(roster, GameConfig::default().with_seed(7)).unwrap();
//!
//! assert_eq!(game.turn_index(), 0);
//! game.skip_turn(ParticipantId(1)).unwrap();
//! assert_eq!(game.turn_index(), 1);
//! assert!(game.skip_turn(ParticipantId(1)).is_err());
//! ```

use std::time::{Duration, Instant};

use smallvec::SmallVec;

use super::record::{record_draw, record_win, WinLossDraw};
use super::snapshot::GameSnapshot;
use crate::board::{build_board, BonusClaim, GameBoard};
use crate::core::{
    CaptureMode, ConfigError, GameConfig, GameRng, MoveError, Participant, ParticipantId, PlayerId,
    PlayerMap, MAX_PLAYERS,
};
use crate::pieces::{bite_cost_of, Piece, PieceCatalog, PieceMask, BITE_SMALL};
use crate::rules::{
    capture_cells, capture_cells_from_piece, handle_orphaned_cells, is_adjacent_to_player,
    is_bite_adjacent_to_player, is_in_bounds, is_on_free_space, is_on_opponent_space,
};

/// On reset, an unfinished round counts as a draw only if every player had
/// grown past their home cell.
const RESET_DRAW_MIN_SCORE: u32 = 2;

/// One game instance.
#[derive(Clone, Debug)]
pub struct Game {
    config: GameConfig,
    catalog: PieceCatalog,
    rng: GameRng,
    participants: PlayerMap<Participant>,

    board: GameBoard,
    scores: PlayerMap<u32>,
    bites: PlayerMap<u32>,
    rerolls: PlayerMap<u32>,
    bite_progress: PlayerMap<u32>,
    bite_threshold: Option<u32>,

    turn: Option<PlayerId>,
    is_over: bool,
    offered_piece: Option<Piece>,
    last_changed: Vec<usize>,

    created: Instant,
    records: PlayerMap<WinLossDraw>,
}

impl Game {
    /// Create a game from a roster and configuration.
    ///
    /// Inactive roster entries are skipped; the remaining participants take
    /// player slots in roster order.
    pub fn new(participants: Vec<Participant>, config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let catalog = config.piece_catalog()?;

        let active: Vec<Participant> = participants.into_iter().filter(|p| p.active).collect();
        if active.len() < 2 {
            return Err(ConfigError::NotEnoughParticipants { active: active.len() });
        }
        if active.len() > MAX_PLAYERS {
            return Err(ConfigError::TooManyParticipants {
                active: active.len(),
                max: MAX_PLAYERS,
            });
        }

        let player_count = active.len();
        let participants = PlayerMap::new(player_count, |p| active[p.index()].clone());

        let mut rng = config.seed.map_or_else(GameRng::from_entropy, GameRng::new);
        let board = build_board(&config, player_count, &mut rng);

        let mut game = Self {
            bite_threshold: config.bite_threshold(),
            scores: PlayerMap::with_value(player_count, 0),
            bites: PlayerMap::with_value(player_count, config.starting_bites),
            rerolls: PlayerMap::with_value(player_count, config.starting_rerolls),
            bite_progress: PlayerMap::with_value(player_count, 0),
            records: PlayerMap::with_default(player_count),
            turn: Some(PlayerId::new(0)),
            is_over: false,
            offered_piece: None,
            last_changed: Vec::new(),
            created: Instant::now(),
            config,
            catalog,
            rng,
            participants,
            board,
        };
        game.update_scores();
        game.set_next_piece();

        Ok(game)
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn board(&self) -> &GameBoard {
        &self.board
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.participants.player_count()
    }

    #[must_use]
    pub fn participants(&self) -> &PlayerMap<Participant> {
        &self.participants
    }

    /// Slot held by a participant.
    #[must_use]
    pub fn player_of(&self, participant: ParticipantId) -> Option<PlayerId> {
        self.participants
            .iter()
            .find(|(_, p)| p.id == participant)
            .map(|(player, _)| player)
    }

    /// Player to move, or `None` once the game is over.
    #[must_use]
    pub fn turn(&self) -> Option<PlayerId> {
        self.turn
    }

    /// Wire form of [`turn`](Self::turn): the slot index, or -1 when over.
    #[must_use]
    pub fn turn_index(&self) -> i32 {
        self.turn.map_or(-1, |p| i32::from(p.0))
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.is_over
    }

    /// Piece the player to move must place, or `None` once over.
    #[must_use]
    pub fn offered_piece(&self) -> Option<&Piece> {
        self.offered_piece.as_ref()
    }

    /// Cells flipped or released by the most recent action.
    #[must_use]
    pub fn last_changed(&self) -> &[usize] {
        &self.last_changed
    }

    #[must_use]
    pub fn scores(&self) -> &PlayerMap<u32> {
        &self.scores
    }

    #[must_use]
    pub fn bites(&self) -> &PlayerMap<u32> {
        &self.bites
    }

    #[must_use]
    pub fn rerolls(&self) -> &PlayerMap<u32> {
        &self.rerolls
    }

    #[must_use]
    pub fn bite_progress(&self) -> &PlayerMap<u32> {
        &self.bite_progress
    }

    #[must_use]
    pub fn records(&self) -> &PlayerMap<WinLossDraw> {
        &self.records
    }

    /// Time since creation or the last reset.
    #[must_use]
    pub fn age(&self) -> Duration {
        self.created.elapsed()
    }

    #[must_use]
    pub fn created(&self) -> Instant {
        self.created
    }

    /// Observer payload for the current state.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(self)
    }

    // === Actions ===

    /// Place the offered piece in one of its orientations with its bounding
    /// box anchored at `origin`.
    ///
    /// The placement must lie on free cells next to the actor's territory.
    /// Bonus cells under the piece are claimed, captures resolve according
    /// to the configured [`CaptureMode`], and territory gained counts toward
    /// the next bonus bite.
    pub fn place_piece(&mut self, actor: ParticipantId, origin: usize, mask: PieceMask) -> Result<(), MoveError> {
        let player = self.acting_player(actor)?;
        self.check_anchor(origin, mask)?;
        if !is_on_free_space(&self.board, origin, mask) {
            return Err(MoveError::Occupied);
        }
        if !is_adjacent_to_player(&self.board, origin, mask, player) {
            return Err(MoveError::NotAdjacent);
        }
        if !self.offered_piece.is_some_and(|piece| piece.has(mask)) {
            return Err(MoveError::UnexpectedPiece);
        }

        let score_before = self.scores[player];

        let claim = self.board.place_mask(Some(player), origin, mask);
        self.credit_bonus(player, claim);
        self.last_changed.clear();

        // pieces with gaps can land cells that touch nothing
        let released = handle_orphaned_cells(&mut self.board);
        self.last_changed.extend(released);

        match self.config.capture_mode {
            CaptureMode::FromPiece => {
                let flipped = capture_cells_from_piece(&mut self.board, player, origin, mask);
                self.last_changed.extend(flipped);
            }
            CaptureMode::AnywhereCurrentPlayer => {
                let flipped = capture_cells(&mut self.board, player);
                self.last_changed.extend(flipped);
            }
            CaptureMode::AnywhereAllPlayers => {
                // the actor sweeps last
                let n = self.player_count();
                for step in 1..=n {
                    let capturer = PlayerId::new(((player.index() + step) % n) as u8);
                    let flipped = capture_cells(&mut self.board, capturer);
                    self.last_changed.extend(flipped);
                }
            }
        }

        let released = handle_orphaned_cells(&mut self.board);
        self.last_changed.extend(released);

        self.update_scores();
        let gained = self.scores[player].saturating_sub(score_before);
        self.accrue_bite_progress(player, gained);
        self.advance_turn();
        self.set_next_piece();
        Ok(())
    }

    /// Spend bites to clear opponent cells under a bite mask anchored at
    /// `origin`.
    ///
    /// At least one covered opponent cell must touch the actor's territory.
    /// Cleared cells keep their flags; territory cut off from its home is
    /// released.
    pub fn place_bite(&mut self, actor: ParticipantId, origin: usize, mask: PieceMask) -> Result<(), MoveError> {
        let player = self.acting_player(actor)?;
        self.check_anchor(origin, mask)?;
        if !is_on_opponent_space(&self.board, origin, mask, player) {
            return Err(MoveError::NoOpponentSpace);
        }
        if !is_bite_adjacent_to_player(&self.board, origin, mask, player) {
            return Err(MoveError::BiteNotAdjacent);
        }
        let cost = bite_cost_of(mask).ok_or(MoveError::InvalidBite)?;
        let available = self.bites[player];
        if available < cost {
            return Err(MoveError::InsufficientBites { needed: cost, available });
        }

        self.board.place_mask(None, origin, mask);
        self.bites[player] -= cost;
        self.last_changed = handle_orphaned_cells(&mut self.board);

        self.update_scores();
        self.advance_turn();
        self.set_next_piece();
        Ok(())
    }

    /// Pass without placing.
    pub fn skip_turn(&mut self, actor: ParticipantId) -> Result<(), MoveError> {
        self.acting_player(actor)?;

        self.last_changed.clear();
        self.advance_turn();
        self.set_next_piece();
        Ok(())
    }

    /// Spend a reroll to swap the offered piece for a different shape.
    ///
    /// If the catalog has no other shape the offered piece stays, but the
    /// reroll is still spent.
    pub fn reroll(&mut self, actor: ParticipantId) -> Result<(), MoveError> {
        let player = self.acting_player(actor)?;
        if self.rerolls[player] == 0 {
            return Err(MoveError::NoRerolls);
        }

        self.last_changed.clear();
        if let Some(current) = self.offered_piece {
            if let Some(next) = self.catalog.draw_excluding(&current, &mut self.rng) {
                self.offered_piece = Some(next);
            }
        }
        self.rerolls[player] -= 1;
        Ok(())
    }

    /// Give up: the actor's home cells are cleared, which releases all of
    /// their territory.
    ///
    /// May be called out of turn. If it was the actor's turn, or the forfeit
    /// ends the game, play moves on.
    pub fn forfeit(&mut self, actor: ParticipantId) -> Result<(), MoveError> {
        if self.is_over {
            return Err(MoveError::GameOver);
        }
        let player = self.player_of(actor).ok_or(MoveError::NotAParticipant)?;
        let was_their_turn = self.turn == Some(player);

        self.last_changed.clear();
        let homes: SmallVec<[usize; 4]> = self.board.home_cells(player).collect();
        for home in homes {
            self.board.place_mask(None, home, BITE_SMALL);
            let released = handle_orphaned_cells(&mut self.board);
            self.last_changed.extend(released);
        }

        tracing::info!(%player, participant = %actor, "player forfeited");

        self.update_scores();
        if was_their_turn || self.is_over {
            self.advance_turn();
            self.set_next_piece();
        }
        Ok(())
    }

    /// Start a new round with the same roster and configuration.
    ///
    /// An unfinished round counts as a draw for everyone if every player had
    /// grown beyond their home cell. Win/loss/draw records carry over.
    pub fn reset(&mut self) {
        let player_count = self.player_count();
        self.board = build_board(&self.config, player_count, &mut self.rng);
        self.last_changed.clear();
        self.turn = Some(PlayerId::new(0));

        if !self.is_over && record_draw(&mut self.records, &self.scores, RESET_DRAW_MIN_SCORE) {
            tracing::info!("unfinished round recorded as a draw");
        }
        self.is_over = false;
        self.created = Instant::now();

        self.bite_progress = PlayerMap::with_value(player_count, 0);
        self.bites = PlayerMap::with_value(player_count, self.config.starting_bites);
        self.rerolls = PlayerMap::with_value(player_count, self.config.starting_rerolls);

        self.update_scores();
        self.set_next_piece();
    }

    // === State machine ===

    /// Recount territory and settle elimination.
    ///
    /// A player with no cells is eliminated. When exactly one player still
    /// holds cells the game ends and that player's win (and everyone else's
    /// loss) is recorded, once. With no survivors, or two or more, the game
    /// stays active.
    pub fn update_scores(&mut self) {
        self.scores = self.board.owner_counts(self.player_count());

        let survivors: SmallVec<[PlayerId; MAX_PLAYERS]> = self
            .scores
            .iter()
            .filter(|(_, score)| **score > 0)
            .map(|(player, _)| player)
            .collect();

        let now_over = survivors.len() == 1;
        if now_over && !self.is_over {
            let winner = survivors[0];
            record_win(&mut self.records, winner);
            tracing::info!(%winner, "game over");
        }

        self.is_over = now_over;
        if self.is_over {
            self.turn = None;
        }
    }

    /// Pass the turn to the next player who still holds cells.
    ///
    /// Clears the turn once the game is over. Gives up after one full lap,
    /// so a board with no survivors leaves the turn on some player.
    pub fn advance_turn(&mut self) {
        if self.is_over {
            self.turn = None;
            return;
        }

        let n = self.player_count();
        let mut index = self.turn.map_or(n - 1, PlayerId::index);
        for _ in 0..n {
            index = (index + 1) % n;
            if self.scores[PlayerId::new(index as u8)] != 0 {
                break;
            }
        }
        self.turn = Some(PlayerId::new(index as u8));
    }

    // === Helpers ===

    fn acting_player(&self, actor: ParticipantId) -> Result<PlayerId, MoveError> {
        if self.is_over {
            return Err(MoveError::GameOver);
        }
        let player = self.player_of(actor).ok_or(MoveError::NotAParticipant)?;
        if self.turn != Some(player) {
            return Err(MoveError::NotYourTurn);
        }
        Ok(player)
    }

    fn check_anchor(&self, origin: usize, mask: PieceMask) -> Result<(), MoveError> {
        if !self.board.contains_index(origin) {
            return Err(MoveError::IndexOutOfBounds(origin));
        }
        if !is_in_bounds(&self.board, origin, mask) {
            return Err(MoveError::OutOfBounds);
        }
        Ok(())
    }

    fn credit_bonus(&mut self, player: PlayerId, claim: BonusClaim) {
        self.bites[player] += claim.bites;
        self.rerolls[player] += claim.rerolls;
    }

    fn accrue_bite_progress(&mut self, player: PlayerId, gained: u32) {
        let Some(threshold) = self.bite_threshold else {
            return;
        };
        if gained == 0 {
            return;
        }

        let progress = self.bite_progress[player] + gained;
        self.bites[player] += progress / threshold;
        self.bite_progress[player] = progress % threshold;
    }

    fn set_next_piece(&mut self) {
        self.offered_piece = if self.is_over {
            None
        } else {
            self.catalog.draw(&mut self.rng)
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;
    use crate::pieces::{PieceSpec, BITE_LARGE};

    const ALICE: ParticipantId = ParticipantId(10);
    const BOB: ParticipantId = ParticipantId(20);
    const CAROL: ParticipantId = ParticipantId(30);
    const DAVE: ParticipantId = ParticipantId(40);

    const P1: PlayerId = PlayerId::new(0);
    const P2: PlayerId = PlayerId::new(1);
    const P3: PlayerId = PlayerId::new(2);
    const P4: PlayerId = PlayerId::new(3);

    fn roster(n: usize) -> Vec<Participant> {
        [ALICE, BOB, CAROL, DAVE]
            .into_iter()
            .zip(["alice", "bob", "carol", "dave"])
            .take(n)
            .map(|(id, name)| Participant::new(id, name))
            .collect()
    }

    /// Single-cell pieces only, no bonus cells.
    fn plain_config() -> GameConfig {
        GameConfig::default()
            .with_size(10)
            .with_bonus_cells(false, 0)
            .with_pieces(vec![PieceSpec { mask: 0b10000, weight: 1.0 }])
            .with_seed(1)
    }

    fn game(n: usize, config: GameConfig) -> Game {
        Game::new(roster(n), config).unwrap()
    }

    fn set_board(game: &mut Game, board: GameBoard) {
        game.board = board;
        game.update_scores();
    }

    #[test]
    fn test_new_game() {
        let game = game(2, plain_config());

        assert_eq!(game.player_count(), 2);
        assert_eq!(game.turn(), Some(P1));
        assert!(!game.is_over());
        assert_eq!(game.scores()[P1], 1);
        assert_eq!(game.scores()[P2], 1);
        assert_eq!(game.bites()[P1], 4);
        assert_eq!(game.rerolls()[P2], 3);
        assert_eq!(game.offered_piece().map(Piece::canonical), Some(BITE_SMALL));
        assert_eq!(game.player_of(BOB), Some(P2));
        assert_eq!(game.player_of(ParticipantId(99)), None);
    }

    #[test]
    fn test_new_game_rejections() {
        let config = plain_config();

        let lonely = roster(2).into_iter().map(|p| if p.id == BOB { p.inactive() } else { p }).collect();
        assert_eq!(
            Game::new(lonely, config.clone()).unwrap_err(),
            ConfigError::NotEnoughParticipants { active: 1 }
        );

        let mut crowd = roster(4);
        crowd.push(Participant::new(ParticipantId(50), "erin"));
        assert_eq!(
            Game::new(crowd, config.clone()).unwrap_err(),
            ConfigError::TooManyParticipants { active: 5, max: 4 }
        );

        assert!(matches!(
            Game::new(roster(2), config.clone().with_size(3)),
            Err(ConfigError::SizeOutOfBounds { .. })
        ));

        assert_eq!(
            Game::new(roster(2), config.with_pieces(vec![])).unwrap_err(),
            ConfigError::EmptyPieceCatalog
        );
    }

    #[test]
    fn test_inactive_participants_skipped() {
        let mut people = roster(3);
        people[0] = people[0].clone().inactive();
        let game = Game::new(people, plain_config()).unwrap();

        assert_eq!(game.player_count(), 2);
        assert_eq!(game.player_of(ALICE), None);
        assert_eq!(game.player_of(BOB), Some(P1));
        assert_eq!(game.player_of(CAROL), Some(P2));
    }

    #[test]
    fn test_place_piece_validation_order() {
        let mut game = game(2, plain_config());
        // P1 home at (2,2) on a 10x10 board
        let next_to_home = game.board.index_1d(2, 3);
        let far = game.board.index_1d(0, 9);

        assert_eq!(game.place_piece(BOB, next_to_home, BITE_SMALL), Err(MoveError::NotYourTurn));
        assert_eq!(
            game.place_piece(ParticipantId(99), next_to_home, BITE_SMALL),
            Err(MoveError::NotAParticipant)
        );
        assert_eq!(game.place_piece(ALICE, 100, BITE_SMALL), Err(MoveError::IndexOutOfBounds(100)));
        assert_eq!(game.place_piece(ALICE, 99, BITE_LARGE), Err(MoveError::OutOfBounds));
        let home = game.board.index_1d(2, 2);
        assert_eq!(game.place_piece(ALICE, home, BITE_SMALL), Err(MoveError::Occupied));
        assert_eq!(game.place_piece(ALICE, far, BITE_SMALL), Err(MoveError::NotAdjacent));
        assert_eq!(game.place_piece(ALICE, next_to_home, BITE_LARGE), Err(MoveError::UnexpectedPiece));

        // nothing changed
        assert_eq!(game.turn(), Some(P1));
        assert_eq!(game.scores()[P1], 1);

        game.place_piece(ALICE, next_to_home, BITE_SMALL).unwrap();
        assert_eq!(game.scores()[P1], 2);
        assert_eq!(game.turn(), Some(P2));
    }

    #[test]
    fn test_place_piece_claims_bonus() {
        let mut game = game(2, plain_config());
        let target = game.board.index_1d(2, 3);
        let cell = game.board.cell(target);
        game.board.set_cell(target, cell.with_flag(Cell::BONUS_BITE | Cell::BONUS_REROLL));

        game.place_piece(ALICE, target, BITE_SMALL).unwrap();

        assert_eq!(game.bites()[P1], 4 + 3);
        assert_eq!(game.rerolls()[P1], 3 + 1);
        assert_eq!(game.board.cell(target).flags(), 0);
    }

    #[test]
    fn test_bite_progress_grants_bites() {
        // threshold = 10 * 2 / 10 = 2 cells per bite
        let mut game = game(2, plain_config().with_new_bites_freq_factor(10.0));
        assert_eq!(game.bite_threshold, Some(2));

        game.place_piece(ALICE, game.board.index_1d(2, 3), BITE_SMALL).unwrap();
        assert_eq!(game.bite_progress()[P1], 1);
        assert_eq!(game.bites()[P1], 4);

        game.skip_turn(BOB).unwrap();
        game.place_piece(ALICE, game.board.index_1d(2, 4), BITE_SMALL).unwrap();
        assert_eq!(game.bite_progress()[P1], 0);
        assert_eq!(game.bites()[P1], 5);
    }

    #[test]
    fn test_bite_progress_disabled() {
        let mut game = game(2, plain_config().with_new_bites_freq_factor(0.0));
        game.place_piece(ALICE, game.board.index_1d(2, 3), BITE_SMALL).unwrap();
        assert_eq!(game.bite_progress()[P1], 0);
        assert_eq!(game.bites()[P1], 4);
    }

    #[test]
    fn test_capture_scenario_simple_horizontal() {
        let mut game = game(2, plain_config());
        set_board(
            &mut game,
            GameBoard::from_rows(&[
                [0x101, 1, 2, 2, 0, 0],
                [1, 0, 0x102, 0, 1, 0],
                [1, 0, 0, 0, 1, 0],
                [1, 1, 1, 1, 1, 0],
                [0, 0, 0, 0, 0, 0],
                [0, 0, 0, 0, 0, 0],
            ]),
        );
        assert_eq!(game.scores()[P1], 11);

        game.place_piece(ALICE, 4, BITE_SMALL).unwrap();

        assert!(game.board.cell(2).is_owned_by(P1));
        assert!(game.board.cell(3).is_owned_by(P1));
        assert_eq!(game.last_changed(), &[3, 2]);
        assert_eq!(game.scores()[P1], 14);
        assert_eq!(game.scores()[P2], 1);
        assert!(!game.is_over());
    }

    #[test]
    fn test_cascading_capture_from_placement() {
        let mut game = game(2, plain_config());
        set_board(
            &mut game,
            GameBoard::from_rows(&[
                [0x101, 1, 0, 0, 0, 0],
                [1, 2, 2, 1, 1, 0],
                [1, 0, 0x102, 0, 1, 0],
                [1, 0, 0, 0, 1, 0],
                [1, 1, 1, 1, 1, 0],
                [0, 0, 0, 0, 0, 0],
            ]),
        );

        game.place_piece(ALICE, game.board.index_1d(0, 2), BITE_SMALL).unwrap();

        // (0,2) flips (1,1) down-left against (2,0); the flipped (1,1) then
        // brackets (1,2) against (1,3)
        assert_eq!(game.last_changed(), &[7, 8]);
        assert!(game.board.cell(7).is_owned_by(P1));
        assert!(game.board.cell(8).is_owned_by(P1));
        assert!(game.board.cell(14).is_owned_by(P2));
        assert_eq!(game.scores()[P2], 1);
    }

    #[test]
    fn test_elimination_and_win_recording() {
        let mut game = game(3, plain_config());

        // bulk-clear everything P2 and P3 own
        for index in 0..game.board.len() {
            if game.board.cell(index).is_opponent_of(P1) {
                game.board.set_owner(index, None);
            }
        }
        game.update_scores();

        assert_eq!(game.scores()[P2], 0);
        assert_eq!(game.scores()[P3], 0);
        assert!(game.scores()[P1] > 0);
        assert!(game.is_over());
        assert_eq!(game.turn_index(), -1);
        assert_eq!(game.records()[P1], WinLossDraw { wins: 1, losses: 0, draws: 0 });
        assert_eq!(game.records()[P2].losses, 1);
        assert_eq!(game.records()[P3].losses, 1);

        // rescoring a finished game does not count the win again
        game.update_scores();
        assert_eq!(game.records()[P1].wins, 1);

        assert_eq!(game.skip_turn(ALICE), Err(MoveError::GameOver));
        assert_eq!(game.reroll(ALICE), Err(MoveError::GameOver));
        assert_eq!(game.forfeit(BOB), Err(MoveError::GameOver));
    }

    #[test]
    fn test_no_survivors_stays_active() {
        let mut game = game(2, plain_config());
        set_board(&mut game, GameBoard::square(10));
        assert!(!game.is_over());
        assert!(game.turn().is_some());
        assert!(game.records().values().all(|r| r.played() == 0));
    }

    #[test]
    fn test_turn_skips_eliminated_players() {
        let mut game = game(4, plain_config());
        for index in 0..game.board.len() {
            let cell = game.board.cell(index);
            if cell.is_owned_by(P2) || cell.is_owned_by(P4) {
                game.board.set_owner(index, None);
            }
        }
        game.update_scores();
        assert!(!game.is_over());

        let mut order = Vec::new();
        for _ in 0..4 {
            game.advance_turn();
            order.push(game.turn().unwrap());
        }
        assert_eq!(order, vec![P3, P1, P3, P1]);
    }

    #[test]
    fn test_skip_turn() {
        let mut game = game(3, plain_config());
        game.last_changed = vec![1, 2];

        game.skip_turn(ALICE).unwrap();
        assert_eq!(game.turn(), Some(P2));
        assert!(game.last_changed().is_empty());
        assert!(game.offered_piece().is_some());

        game.skip_turn(BOB).unwrap();
        game.skip_turn(CAROL).unwrap();
        assert_eq!(game.turn(), Some(P1));
    }

    #[test]
    fn test_reroll() {
        let config = plain_config().with_pieces(vec![
            PieceSpec { mask: 0b10000, weight: 1.0 },
            PieceSpec { mask: 0b11000_11000, weight: 1.0 },
        ]);
        let mut game = game(2, config.with_starting_resources(4, 1));
        let before = *game.offered_piece().unwrap();

        assert_eq!(game.reroll(BOB), Err(MoveError::NotYourTurn));
        game.reroll(ALICE).unwrap();
        let after = *game.offered_piece().unwrap();
        assert!(!after.same_shape(&before));
        assert_eq!(game.rerolls()[P1], 0);
        assert_eq!(game.turn(), Some(P1));

        assert_eq!(game.reroll(ALICE), Err(MoveError::NoRerolls));
    }

    #[test]
    fn test_reroll_with_single_shape_keeps_piece() {
        let mut game = game(2, plain_config());
        let before = *game.offered_piece().unwrap();
        game.reroll(ALICE).unwrap();
        assert_eq!(*game.offered_piece().unwrap(), before);
        assert_eq!(game.rerolls()[P1], 2);
    }

    #[test]
    fn test_place_bite() {
        let mut game = game(2, plain_config().with_starting_resources(3, 0));
        set_board(
            &mut game,
            GameBoard::from_rows(&[
                [0x101, 1, 2, 2, 2, 0x102],
                [0, 0, 0, 0, 0, 0],
                [0, 0, 0, 0, 0, 0],
                [0, 0, 0, 0, 0, 0],
                [0, 0, 0, 0, 0, 0],
                [0, 0, 0, 0, 0, 0],
            ]),
        );

        assert_eq!(game.place_bite(ALICE, 0, BITE_SMALL), Err(MoveError::NoOpponentSpace));
        assert_eq!(game.place_bite(ALICE, 4, BITE_SMALL), Err(MoveError::BiteNotAdjacent));
        let odd = PieceMask::from_bits(0b11000 << 20).unwrap();
        assert_eq!(game.place_bite(ALICE, 2, odd), Err(MoveError::InvalidBite));

        game.place_bite(ALICE, 1, BITE_LARGE).unwrap();
        assert_eq!(game.bites()[P1], 0);
        // the biter's own cells under the mask are cleared as well
        assert!(!game.board.cell(1).is_owned());
        assert!(!game.board.cell(2).is_owned());
        assert_eq!(game.scores()[P1], 1);
        assert_eq!(game.scores()[P2], 3);
        assert!(game.last_changed().is_empty());
    }

    #[test]
    fn test_place_bite_prunes() {
        let mut game = game(2, plain_config().with_starting_resources(1, 0));
        set_board(
            &mut game,
            GameBoard::from_rows(&[
                [0x101, 1, 2, 0x102, 0, 0],
                [0, 0, 2, 0, 0, 0],
                [0, 0, 2, 0, 0, 0],
                [0, 0, 0, 0, 0, 0],
                [0, 0, 0, 0, 0, 0],
                [0, 0, 0, 0, 0, 0],
            ]),
        );

        game.place_bite(ALICE, 2, BITE_SMALL).unwrap();

        assert!(!game.board.cell(2).is_owned());
        // the column below (0,2) lost its path home
        assert_eq!(game.last_changed(), &[8, 14]);
        assert_eq!(game.scores()[P2], 1);
        assert_eq!(game.bites()[P1], 0);
        assert_eq!(game.turn(), Some(P2));

        game.skip_turn(BOB).unwrap();
        assert_eq!(
            game.place_bite(ALICE, 3, BITE_SMALL),
            Err(MoveError::BiteNotAdjacent)
        );
        assert_eq!(game.bites()[P1], 0);
    }

    #[test]
    fn test_insufficient_bites() {
        let mut game = game(2, plain_config().with_starting_resources(0, 0));
        set_board(
            &mut game,
            GameBoard::from_rows(&[
                [0x101, 2, 0x102, 0, 0, 0],
                [0, 0, 0, 0, 0, 0],
                [0, 0, 0, 0, 0, 0],
                [0, 0, 0, 0, 0, 0],
                [0, 0, 0, 0, 0, 0],
                [0, 0, 0, 0, 0, 0],
            ]),
        );
        assert_eq!(
            game.place_bite(ALICE, 1, BITE_SMALL),
            Err(MoveError::InsufficientBites { needed: 1, available: 0 })
        );
    }

    #[test]
    fn test_forfeit_out_of_turn() {
        let mut game = game(3, plain_config());
        let bob_home = game.board.home_cells(P2).next().unwrap();

        game.forfeit(BOB).unwrap();

        assert_eq!(game.scores()[P2], 0);
        assert!(!game.board.cell(bob_home).is_owned());
        assert!(game.board.cell(bob_home).is_home());
        assert!(!game.is_over());
        // not Bob's turn, so the turn stays put
        assert_eq!(game.turn(), Some(P1));

        game.skip_turn(ALICE).unwrap();
        assert_eq!(game.turn(), Some(P3));
        assert_eq!(game.forfeit(ParticipantId(99)), Err(MoveError::NotAParticipant));
    }

    #[test]
    fn test_forfeit_ends_two_player_game() {
        let mut game = game(2, plain_config());
        game.place_piece(ALICE, game.board.index_1d(2, 3), BITE_SMALL).unwrap();

        game.forfeit(ALICE).unwrap();

        assert!(game.is_over());
        assert_eq!(game.turn(), None);
        assert!(game.offered_piece().is_none());
        assert_eq!(game.scores()[P1], 0);
        assert_eq!(game.records()[P2].wins, 1);
        assert_eq!(game.records()[P1].losses, 1);
        // (2,3) was released once the home cell went
        assert!(game.last_changed().contains(&game.board.index_1d(2, 3)));
    }

    #[test]
    fn test_reset_after_win() {
        let mut game = game(2, plain_config());
        game.forfeit(BOB).unwrap();
        assert!(game.is_over());

        game.reset();

        assert!(!game.is_over());
        assert_eq!(game.turn(), Some(P1));
        assert!(game.offered_piece().is_some());
        assert_eq!(game.scores()[P1], 1);
        assert_eq!(game.scores()[P2], 1);
        assert_eq!(game.records()[P1], WinLossDraw { wins: 1, losses: 0, draws: 0 });
        assert_eq!(game.records()[P2], WinLossDraw { wins: 0, losses: 1, draws: 0 });
    }

    #[test]
    fn test_reset_draw_rule() {
        let mut game = game(2, plain_config());

        // fresh game: nobody has grown, no draw
        game.reset();
        assert!(game.records().values().all(|r| r.draws == 0));

        game.place_piece(ALICE, game.board.index_1d(2, 3), BITE_SMALL).unwrap();
        game.place_piece(BOB, game.board.index_1d(7, 6), BITE_SMALL).unwrap();
        game.bites[P1] = 0;
        game.rerolls[P2] = 0;

        game.reset();

        assert!(game.records().values().all(|r| r.draws == 1));
        assert_eq!(game.bites()[P1], 4);
        assert_eq!(game.rerolls()[P2], 3);
        assert!(game.bite_progress().values().all(|&p| p == 0));
        assert!(game.last_changed().is_empty());
    }

    fn pending_opponent_capture() -> GameBoard {
        // P2 already brackets (5,1) between two of its home cells
        GameBoard::from_rows(&[
            [0x101, 1, 0, 0, 0, 0],
            [0, 1, 0, 0, 0, 0],
            [0, 1, 0, 0, 0, 0],
            [0, 1, 0, 0, 0, 0],
            [0, 1, 0, 0, 0, 0],
            [0x102, 1, 0x102, 0, 0, 0],
        ])
    }

    #[test]
    fn test_capture_all_players_sweeps_opponents() {
        let config = plain_config().with_capture_mode(CaptureMode::AnywhereAllPlayers);
        let mut game = game(2, config);
        set_board(&mut game, pending_opponent_capture());

        game.place_piece(ALICE, 2, BITE_SMALL).unwrap();

        assert!(game.board.cell(31).is_owned_by(P2));
        assert_eq!(game.last_changed(), &[31]);
        assert_eq!(game.scores()[P1], 7);
        assert_eq!(game.scores()[P2], 3);
    }

    #[test]
    fn test_capture_current_player_ignores_opponents() {
        let config = plain_config().with_capture_mode(CaptureMode::AnywhereCurrentPlayer);
        let mut game = game(2, config);
        set_board(&mut game, pending_opponent_capture());

        game.place_piece(ALICE, 2, BITE_SMALL).unwrap();

        assert!(game.board.cell(31).is_owned_by(P1));
        assert!(game.last_changed().is_empty());
        assert_eq!(game.scores()[P1], 8);
    }
}
