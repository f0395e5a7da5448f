//! Iterative deepening search with negamax alpha-beta pruning.
//!
//! One `SearchSession` lives for a whole game. It owns the position, the
//! transposition table and the history table, so everything learned in one
//! search is available to the next one.
//!
//! Heuristics:
//! - Fail-hard alpha-beta with transposition table cutoffs and window narrowing.
//! - Transposition move searched first.
//! - History ordering keyed on (piece kind, destination).
//! - Quiescence over captures, scoring moves and shell threats.
//!
//! Every recursive call returns `None` once the deadline has passed. Callers
//! never treat an aborted child as a score; only the root turns an abort into
//! its best move so far.

use std::time::{Duration, Instant};

use log::debug;

use crate::game_state::game_rules::scores_on_baseline;
use crate::game_state::game_types::*;
use crate::move_generation::legal_move_apply::{make_move_in_place, unmake_move_in_place};
use crate::move_generation::legal_move_generator::generate_legal_moves;
use crate::search::board_scoring::{BoardScorer, WINNING_SCORE};
use crate::search::transposition_table::{Bound, TTEntry, TTStats, TranspositionTable};

/// Default wall-clock budget per move.
pub const DEFAULT_TIME_BUDGET: Duration = Duration::from_millis(1950);

/// Deepest iteration the search runs; larger configured depths are capped.
pub const MAX_DEPTH_LIMIT: u8 = 20;

/// Default deepest iteration.
pub const DEFAULT_MAX_DEPTH: u8 = MAX_DEPTH_LIMIT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub max_depth: u8,
    pub time_budget: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            time_budget: DEFAULT_TIME_BUDGET,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub best_score: i32,
    pub reached_depth: u8,
    pub nodes: u64,
    pub elapsed_ms: u64,
    /// The deadline cut the last iteration short.
    pub timed_out: bool,
    pub tt_stats: TTStats,
}

/// Whether quiescence explores `mv`: captures, scoring baseline landings and
/// shells moving away from an opposing gull right in front of them.
pub fn is_tactical_move(game_state: &GameState, mv: Move) -> bool {
    if game_state.field(mv.to).is_occupied() {
        return true;
    }

    let Some(mover) = game_state.field(mv.from).piece else {
        return false;
    };

    if mv.to.x() == mover.team.opponent_baseline() && scores_on_baseline(mover.kind) {
        return true;
    }

    if mover.kind == PieceKind::Shell && mv.from.x() != mover.team.opponent_baseline() {
        let front = mv.from.offset(mover.team.forward());
        if let Some(piece) = game_state.field(front).piece {
            return piece.kind == PieceKind::Gull && piece.team != mover.team;
        }
    }

    false
}

pub struct SearchSession<S: BoardScorer> {
    game_state: GameState,
    scorer: S,
    tt: TranspositionTable,
    /// Cutoff weights by `[PieceKind::index][destination]`.
    history: [[u64; FIELD_COUNT]; 4],
    config: SearchConfig,
    deadline: Instant,
    timed_out: bool,
    nodes: u64,
}

impl<S: BoardScorer> SearchSession<S> {
    pub fn new(game_state: GameState, scorer: S, config: SearchConfig) -> Self {
        Self {
            game_state,
            scorer,
            tt: TranspositionTable::new(),
            history: [[0; FIELD_COUNT]; 4],
            config,
            deadline: Instant::now(),
            timed_out: false,
            nodes: 0,
        }
    }

    #[inline]
    pub fn game_state(&self) -> &GameState {
        &self.game_state
    }

    #[inline]
    pub fn config(&self) -> SearchConfig {
        self.config
    }

    #[inline]
    pub fn tt_stats(&self) -> TTStats {
        self.tt.stats()
    }

    /// Play a move on the session's position between searches.
    pub fn apply_move(&mut self, mv: Move) {
        make_move_in_place(&mut self.game_state, mv);
    }

    /// Search depth 1, 2, ... until the budget measured from `start` runs out.
    ///
    /// The move of the last completed depth is returned. If depth 1 is cut
    /// short, its best move so far is kept, falling back to the first legal
    /// move, so a move is returned whenever the side to move has one.
    pub fn iterative_deepening(&mut self, start: Instant) -> SearchResult {
        self.deadline = start + self.config.time_budget;
        self.timed_out = false;
        self.nodes = 0;

        let mut result = SearchResult::default();

        if self.game_state.is_over() {
            result.best_score = self.scorer.score(&self.game_state, true);
            result.tt_stats = self.tt.stats();
            return result;
        }

        for depth in 1..=self.config.max_depth.clamp(1, MAX_DEPTH_LIMIT) {
            let Some((best_move, best_score)) = self.alpha_beta_root(depth, -i32::MAX, i32::MAX)
            else {
                break;
            };

            if self.timed_out && depth > 1 {
                break;
            }

            result.best_move = Some(best_move);
            result.best_score = best_score;
            result.reached_depth = depth;

            debug!(
                "depth {depth} score {best_score} nodes {} move {best_move}",
                self.nodes
            );

            if self.timed_out {
                break;
            }
        }

        result.nodes = self.nodes;
        result.timed_out = self.timed_out;
        result.elapsed_ms = start.elapsed().as_millis() as u64;
        result.tt_stats = self.tt.stats();
        result
    }

    #[inline]
    fn deadline_passed(&mut self) -> bool {
        if !self.timed_out && Instant::now() >= self.deadline {
            self.timed_out = true;
        }
        self.timed_out
    }

    #[inline]
    fn history_weight(&self, mv: Move) -> u64 {
        match self.game_state.field(mv.from).piece {
            Some(piece) => self.history[piece.kind.index()][mv.to.index()],
            None => 0,
        }
    }

    /// Searches a child and restores the position, whatever the child returned.
    #[inline]
    fn search_child(&mut self, mv: Move, depth: u8, alpha: i32, beta: i32) -> Option<i32> {
        let undo = make_move_in_place(&mut self.game_state, mv);
        let score = self.alpha_beta(depth, -beta, -alpha);
        unmake_move_in_place(&mut self.game_state, mv, &undo);
        score.map(|s| -s)
    }

    /// Best move and score at the root. Unlike inner nodes, an abort keeps the
    /// best move found so far; the first legal move stands in until a child
    /// finishes. `None` only when the side to move has no moves.
    fn alpha_beta_root(&mut self, depth: u8, mut alpha: i32, beta: i32) -> Option<(Move, i32)> {
        debug_assert!(depth > 0);
        debug_assert!(alpha < beta);

        let moves = generate_legal_moves(&self.game_state);
        let mut best_move = *moves.first()?;

        for mv in moves {
            let Some(score) = self.search_child(mv, depth - 1, alpha, beta) else {
                return Some((best_move, alpha));
            };

            if score >= beta {
                return Some((mv, beta));
            }
            if score > alpha {
                alpha = score;
                best_move = mv;
            }
        }

        Some((best_move, alpha))
    }

    fn alpha_beta(&mut self, depth: u8, mut alpha: i32, mut beta: i32) -> Option<i32> {
        debug_assert!(alpha < beta);

        if self.deadline_passed() {
            return None;
        }
        self.nodes += 1;

        let entry = self.tt.probe(self.game_state.zobrist_key);

        if let Some(entry) = entry.filter(|e| e.depth >= depth) {
            match entry.bound {
                Bound::Exact => return Some(entry.score),
                Bound::Upper => {
                    if entry.score <= alpha {
                        return Some(alpha);
                    }
                    if entry.depth == depth && entry.score < beta {
                        beta = entry.score;
                    }
                }
                Bound::Lower => {
                    if entry.score >= beta {
                        return Some(beta);
                    }
                    if entry.depth == depth && entry.score > alpha {
                        alpha = entry.score;
                    }
                }
            }
        }

        if self.game_state.is_over() {
            return Some(self.scorer.score(&self.game_state, true));
        }
        if depth == 0 {
            return self.quiesce(alpha, beta);
        }

        let mut moves = generate_legal_moves(&self.game_state);
        if moves.is_empty() {
            return Some(-WINNING_SCORE);
        }

        let tt_move = entry
            .filter(|e| matches!(e.bound, Bound::Exact | Bound::Lower))
            .and_then(|e| e.best_move)
            .filter(|mv| moves.contains(mv));

        let mut bound = Bound::Upper;
        let mut best_move = None;

        if let Some(mv) = tt_move {
            let score = self.search_child(mv, depth - 1, alpha, beta)?;

            if score >= beta {
                self.store(Bound::Lower, depth, beta, Some(mv));
                return Some(beta);
            }
            if score > alpha {
                bound = Bound::Exact;
                best_move = Some(mv);
                alpha = score;
            }
        }

        // stable, so equal weights keep board-scan order
        moves.sort_by_cached_key(|&mv| std::cmp::Reverse(self.history_weight(mv)));

        for mv in moves {
            if Some(mv) == tt_move {
                continue;
            }

            let score = self.search_child(mv, depth - 1, alpha, beta)?;

            if score >= beta {
                self.store(Bound::Lower, depth, beta, Some(mv));
                if let Some(piece) = self.game_state.field(mv.from).piece {
                    self.history[piece.kind.index()][mv.to.index()] += 1u64 << depth;
                }
                return Some(beta);
            }
            if score > alpha {
                bound = Bound::Exact;
                best_move = Some(mv);
                alpha = score;
            }
        }

        self.store(bound, depth, alpha, best_move);
        Some(alpha)
    }

    fn quiesce(&mut self, mut alpha: i32, beta: i32) -> Option<i32> {
        debug_assert!(alpha < beta);
        debug_assert!(!self.game_state.is_over());

        if self.deadline_passed() {
            return None;
        }
        self.nodes += 1;

        let stand_pat = self.scorer.score(&self.game_state, false);
        if stand_pat >= beta {
            return Some(beta);
        }
        alpha = alpha.max(stand_pat);

        let moves = generate_legal_moves(&self.game_state);
        if moves.is_empty() {
            return Some(-WINNING_SCORE);
        }

        for mv in moves {
            if !is_tactical_move(&self.game_state, mv) {
                continue;
            }

            let undo = make_move_in_place(&mut self.game_state, mv);
            let score = if self.game_state.is_over() {
                Some(-self.scorer.score(&self.game_state, true))
            } else {
                self.quiesce(-beta, -alpha).map(|s| -s)
            };
            unmake_move_in_place(&mut self.game_state, mv, &undo);
            let score = score?;

            if score >= beta {
                return Some(beta);
            }
            alpha = alpha.max(score);
        }

        Some(alpha)
    }

    #[inline]
    fn store(&mut self, bound: Bound, depth: u8, score: i32, best_move: Option<Move>) {
        self.tt.store(TTEntry {
            key: self.game_state.zobrist_key,
            bound,
            depth,
            score,
            best_move,
            turn: self.game_state.turn,
        });
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::time::{Duration, Instant};

    use super::{is_tactical_move, SearchConfig, SearchSession};
    use crate::game_state::game_types::*;
    use crate::game_state::test_positions::{place, sample_position};
    use crate::move_generation::legal_move_generator::generate_legal_moves;
    use crate::search::board_scoring::{BoardScorer, PieceSquareScorer, WINNING_SCORE};

    const STALL: Duration = Duration::from_millis(1500);
    const SHORT_BUDGET: Duration = Duration::from_millis(750);

    /// Piece-square scores; the `stall_at`-th evaluation sleeps past any
    /// deadline shorter than `STALL`.
    struct StallingScorer {
        calls: Cell<u32>,
        stall_at: u32,
    }

    impl StallingScorer {
        fn new(stall_at: u32) -> Self {
            Self {
                calls: Cell::new(0),
                stall_at,
            }
        }
    }

    impl BoardScorer for StallingScorer {
        fn score(&self, game_state: &GameState, is_over: bool) -> i32 {
            let calls = self.calls.get() + 1;
            self.calls.set(calls);
            if calls == self.stall_at {
                std::thread::sleep(STALL);
            }
            PieceSquareScorer.score(game_state, is_over)
        }
    }

    fn stalling_session(state: GameState, max_depth: u8, stall_at: u32) -> SearchSession<StallingScorer> {
        SearchSession::new(
            state,
            StallingScorer::new(stall_at),
            SearchConfig {
                max_depth,
                time_budget: SHORT_BUDGET,
            },
        )
    }

    /// Team One has gulls and stars in the middle; team Two only a shell
    /// with a single move, so cutoffs below the root touch only the shell's
    /// history row.
    fn gulls_and_stars_against_a_shell() -> GameState {
        let mut state = GameState::empty();
        place(&mut state, 2, 2, Team::One, PieceKind::Gull, false);
        place(&mut state, 3, 5, Team::One, PieceKind::Gull, false);
        place(&mut state, 1, 6, Team::One, PieceKind::Star, false);
        place(&mut state, 4, 1, Team::One, PieceKind::Star, false);
        place(&mut state, 7, 0, Team::Two, PieceKind::Shell, false);
        state
    }

    fn session(state: GameState, max_depth: u8, budget: Duration) -> SearchSession<PieceSquareScorer> {
        SearchSession::new(
            state,
            PieceSquareScorer,
            SearchConfig {
                max_depth,
                time_budget: budget,
            },
        )
    }

    fn mv(from: (u8, u8), to: (u8, u8)) -> Move {
        Move::new(
            Position::from_coords(from.0, from.1),
            Position::from_coords(to.0, to.1),
        )
    }

    #[test]
    fn expired_budget_still_yields_a_legal_move() {
        let state = sample_position();
        let legal = generate_legal_moves(&state);
        let mut search = session(state, 20, Duration::ZERO);

        let result = search.iterative_deepening(Instant::now());
        let best = result.best_move.expect("depth one always yields a move");
        assert!(legal.contains(&best));
        assert_eq!(result.reached_depth, 1);
        assert!(result.timed_out);
    }

    #[test]
    fn search_leaves_the_position_untouched() {
        let state = sample_position();
        let mut search = session(state.clone(), 3, Duration::from_secs(60));
        let result = search.iterative_deepening(Instant::now());
        assert_eq!(result.reached_depth, 3);
        assert!(!result.timed_out);
        assert_eq!(search.game_state(), &state);
    }

    #[test]
    fn takes_the_winning_baseline_point() {
        let mut state = GameState::empty();
        place(&mut state, 6, 3, Team::One, PieceKind::Gull, false);
        place(&mut state, 1, 5, Team::Two, PieceKind::Gull, false);
        state.score = [1, 0];
        state.zobrist_key = crate::search::zobrist::compute_zobrist_key(&state);

        let mut search = session(state, 3, Duration::from_secs(60));
        let result = search.iterative_deepening(Instant::now());
        assert_eq!(result.best_move, Some(mv((6, 3), (7, 3))));
        assert!(result.best_score >= WINNING_SCORE);
    }

    #[test]
    fn configured_depth_is_capped() {
        // four plies before the turn limit keep every iteration small
        let mut state = GameState::empty();
        place(&mut state, 2, 2, Team::One, PieceKind::Gull, false);
        place(&mut state, 5, 5, Team::Two, PieceKind::Gull, false);
        state.turn = 56;
        state.zobrist_key = crate::search::zobrist::compute_zobrist_key(&state);

        let mut search = session(state, 80, Duration::from_secs(60));
        let result = search.iterative_deepening(Instant::now());
        assert!(!result.timed_out);
        assert_eq!(result.reached_depth, super::MAX_DEPTH_LIMIT);
    }

    #[test]
    fn transposition_table_is_reused_across_depths() {
        let mut search = session(sample_position(), 3, Duration::from_secs(60));
        let result = search.iterative_deepening(Instant::now());
        assert!(result.tt_stats.stores > 0);
        assert!(result.tt_stats.hits > 0);
    }

    #[test]
    fn aborted_calls_return_nothing_and_touch_nothing() {
        let mut search = session(sample_position(), 20, Duration::ZERO);
        search.deadline = Instant::now();

        assert_eq!(search.alpha_beta(3, -100, 100), None);
        assert_eq!(search.quiesce(-100, 100), None);
        assert!(search.timed_out);
        assert_eq!(search.tt.stats().stores, 0);
        assert!(search.history.iter().flatten().all(|&w| w == 0));
    }

    #[test]
    fn aborted_depth_does_not_replace_completed_one() {
        let mut search = session(sample_position(), 20, Duration::from_millis(30));
        let result = search.iterative_deepening(Instant::now());
        assert!(result.timed_out);
        assert!(result.reached_depth >= 1);
        let legal = generate_legal_moves(&sample_position());
        assert!(legal.contains(&result.best_move.expect("move")));
    }

    #[test]
    fn abort_inside_a_later_child_leaves_no_trace_of_the_node() {
        let state = gulls_and_stars_against_a_shell();
        let root_key = state.zobrist_key;

        let mut full = stalling_session(state.clone(), 2, u32::MAX);
        full.deadline = Instant::now() + Duration::from_secs(60);
        assert!(full.alpha_beta(2, -i32::MAX, i32::MAX).is_some());
        let evaluations = full.scorer.calls.get();
        assert!(evaluations > 4, "only {evaluations} evaluations");

        let mut search = stalling_session(state.clone(), 2, evaluations / 2);
        search.deadline = Instant::now() + SHORT_BUDGET;
        assert_eq!(search.alpha_beta(2, -i32::MAX, i32::MAX), None);
        assert!(search.timed_out);

        // earlier children finished and stored their own entries
        assert!(search.tt.stats().stores > 0);
        assert_eq!(search.tt.probe(root_key), None);
        for kind in [PieceKind::Gull, PieceKind::Star] {
            assert!(search.history[kind.index()].iter().all(|&w| w == 0));
        }
        assert_eq!(search.game_state(), &state);
    }

    #[test]
    fn deadline_inside_a_deeper_iteration_keeps_the_previous_depth() {
        let evaluations_through = |depth: u8| {
            let mut search = stalling_session(sample_position(), depth, u32::MAX);
            search.config.time_budget = Duration::from_secs(60);
            let result = search.iterative_deepening(Instant::now());
            assert_eq!(result.reached_depth, depth);
            (result, search.scorer.calls.get())
        };
        let (depth_two, through_two) = evaluations_through(2);
        let (_, through_three) = evaluations_through(3);
        assert!(through_three > through_two + 1);

        let stall_at = through_two + (through_three - through_two) / 2;
        let mut search = stalling_session(sample_position(), 3, stall_at);
        let result = search.iterative_deepening(Instant::now());

        assert!(result.timed_out);
        assert_eq!(result.reached_depth, 2);
        assert_eq!(result.best_move, depth_two.best_move);
        assert_eq!(result.best_score, depth_two.best_score);
        assert_eq!(search.game_state(), &sample_position());
    }

    #[test]
    fn no_legal_moves_scores_as_a_loss() {
        let mut state = GameState::empty();
        place(&mut state, 3, 3, Team::Two, PieceKind::Gull, false);
        assert!(!state.is_over());
        assert!(generate_legal_moves(&state).is_empty());

        let mut search = session(state, 20, Duration::from_secs(60));
        search.deadline = Instant::now() + Duration::from_secs(60);
        assert_eq!(search.quiesce(-i32::MAX, i32::MAX), Some(-WINNING_SCORE));
        assert_eq!(search.alpha_beta(2, -i32::MAX, i32::MAX), Some(-WINNING_SCORE));

        let result = search.iterative_deepening(Instant::now());
        assert_eq!(result.best_move, None);
    }

    #[test]
    fn shell_facing_an_opposing_gull_is_tactical() {
        let mut state = GameState::empty();
        place(&mut state, 3, 3, Team::One, PieceKind::Shell, false);
        place(&mut state, 4, 3, Team::Two, PieceKind::Gull, false);
        assert!(is_tactical_move(&state, mv((3, 3), (4, 4))));
        assert!(is_tactical_move(&state, mv((3, 3), (4, 2))));
    }

    #[test]
    fn shell_facing_other_pieces_is_quiet() {
        let mut star = GameState::empty();
        place(&mut star, 3, 3, Team::One, PieceKind::Shell, false);
        place(&mut star, 4, 3, Team::Two, PieceKind::Star, false);
        assert!(!is_tactical_move(&star, mv((3, 3), (4, 4))));

        let mut own_gull = GameState::empty();
        place(&mut own_gull, 3, 3, Team::One, PieceKind::Shell, false);
        place(&mut own_gull, 4, 3, Team::One, PieceKind::Gull, false);
        assert!(!is_tactical_move(&own_gull, mv((3, 3), (4, 4))));

        // the gull must be in front, not beside
        let mut beside = GameState::empty();
        place(&mut beside, 3, 3, Team::One, PieceKind::Shell, false);
        place(&mut beside, 3, 4, Team::Two, PieceKind::Gull, false);
        assert!(!is_tactical_move(&beside, mv((3, 3), (4, 2))));
    }

    #[test]
    fn threat_rule_is_team_relative() {
        let mut state = GameState::empty();
        place(&mut state, 4, 3, Team::Two, PieceKind::Shell, false);
        place(&mut state, 3, 3, Team::One, PieceKind::Gull, false);
        state.turn = 1;
        assert!(is_tactical_move(&state, mv((4, 3), (3, 4))));
    }

    #[test]
    fn captures_and_baseline_landings_are_tactical() {
        let mut state = GameState::empty();
        place(&mut state, 2, 2, Team::One, PieceKind::Gull, false);
        place(&mut state, 3, 2, Team::Two, PieceKind::Crab, false);
        place(&mut state, 6, 6, Team::One, PieceKind::Star, false);
        place(&mut state, 5, 0, Team::One, PieceKind::Crab, false);
        assert!(is_tactical_move(&state, mv((2, 2), (3, 2))));
        assert!(is_tactical_move(&state, mv((6, 6), (7, 6))));
        assert!(!is_tactical_move(&state, mv((5, 0), (7, 1))));
        assert!(!is_tactical_move(&state, mv((2, 2), (1, 2))));
    }
}
