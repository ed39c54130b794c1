use settle_core::{Action, Grid, Piece, Shape};
use settle_engine::{Game, GameConfig, PieceRule, TickOutcome};
use settle_eval::evaluate;
use settle_search::{Playback, PlacementSearch, SearchError, Solver, SolverConfig, Step};

fn grid(rows: &[&str]) -> Grid {
    let mut text = vec![".........."; 20 - rows.len()];
    text.extend_from_slice(rows);
    Grid::from_rows(10, &text).expect("valid rows")
}

fn game_on(grid: Grid, shapes: &[Shape]) -> Game {
    Game::new(GameConfig::classic())
        .expect("valid config")
        .with_grid(grid)
        .with_queue(shapes)
}

/// Play `recording` step by step on `game` until the live piece locks.
fn replay_until_lock(game: &mut Game, recording: &mut settle_search::Recording) -> u32 {
    loop {
        match recording.next_step() {
            Playback::Act(action) => assert!(game.perform_action(action), "{action:?} rejected"),
            Playback::Drop | Playback::Idle => match game.tick() {
                TickOutcome::Fell => {}
                TickOutcome::Locked { rows } => return rows,
                other => panic!("unexpected {other:?}"),
            },
        }
    }
}

mod placements {
    use super::*;

    #[test]
    fn test_o_drops_straight_down() {
        let grid = Grid::default();
        let queue = [Piece::spawn(Shape::O)];
        let outcome = PlacementSearch::run(&grid, &queue).expect("placement");

        let placed = outcome.placement;
        assert_eq!((placed.x(), placed.y(), placed.rotation()), (5, 18, 0));

        let mut recording = outcome.recording();
        assert_eq!(recording.actions(), 0);
        let mut rotations = 0;
        loop {
            match recording.next_step() {
                Playback::Idle => break,
                Playback::Act(Action::Rotate) => rotations += 1,
                _ => {}
            }
        }
        assert_eq!(rotations, 0);
    }

    #[test]
    fn test_i_completes_the_row() {
        let grid = grid(&["###....###"]);
        let queue = [Piece::spawn(Shape::I)];
        let outcome = PlacementSearch::run(&grid, &queue).expect("placement");

        let placed = outcome.placement;
        assert_eq!((placed.x(), placed.y(), placed.rotation()), (4, 19, 0));
        assert_eq!(outcome.terminal.cleared_rows(), 1);
        assert_eq!(outcome.terminal.occupied_count(), 0);
    }

    #[test]
    fn test_line_clear_beats_flat_alternatives() {
        // a vertical I into the right-hand well clears four rows
        let grid = grid(&[
            "#########.",
            "#########.",
            "#########.",
            "#########.",
        ]);
        let queue = [Piece::spawn(Shape::I)];
        let outcome = PlacementSearch::run(&grid, &queue).expect("placement");
        assert_eq!(outcome.terminal.cleared_rows(), 4);
        assert_eq!(outcome.placement.rotation(), 1);
    }

    #[test]
    fn test_lookahead_sees_the_second_piece() {
        let grid = grid(&["##.#######", "##.#######"]);
        let queue = [Piece::spawn(Shape::O), Piece::spawn(Shape::I)];
        let outcome = PlacementSearch::run(&grid, &queue).expect("placement");
        // the O stays clear of the column the I needs
        assert_eq!(outcome.first_ply.column_top(2), None);
        assert_eq!(outcome.terminal.cleared_rows(), 2);
    }
}

mod top_out {
    use super::*;

    fn full_to_top() -> Grid {
        let mut grid = Grid::default();
        for y in 0..20 {
            for x in 0..10 {
                if x != (y * 3) % 10 {
                    grid.set(x, y, true);
                }
            }
        }
        grid
    }

    #[test]
    fn test_search_reports_no_placement() {
        let queue = [Piece::spawn(Shape::T)];
        assert!(matches!(
            PlacementSearch::run(&full_to_top(), &queue),
            Err(SearchError::NoPlacement)
        ));
    }

    #[test]
    fn test_solver_tops_out_cleanly() {
        let mut game = game_on(full_to_top(), &[Shape::T]);
        let mut solver = Solver::new(SolverConfig::greedy());
        let mut last = solver.advance(&mut game);
        for _ in 0..10 {
            if game.is_over() {
                break;
            }
            last = solver.advance(&mut game);
        }
        assert_eq!(last, Step::Ticked(TickOutcome::ToppedOut));
        assert_eq!(solver.stats().searches, 0);
        assert_eq!(solver.stats().failed_searches, 1);
        assert_eq!(
            solver.advance(&mut game),
            Step::Ticked(TickOutcome::GameOver)
        );
    }
}

mod replay {
    use super::*;

    #[test]
    fn test_recording_reproduces_evaluated_grid() {
        let start = grid(&["#.........", "##..#....#", "###.##..##"]);
        for shape in Shape::ALL {
            let queue = [Piece::spawn(shape)];
            let outcome = PlacementSearch::run(&start, &queue).expect("placement");
            let mut game = game_on(start.clone(), &[shape]);
            let mut recording = outcome.recording();
            replay_until_lock(&mut game, &mut recording);
            assert_eq!(game.grid(), &outcome.terminal, "{shape}");
        }
    }

    #[test]
    fn test_first_ply_matches_live_lock() {
        let start = grid(&["##...#####", "###..#####"]);
        let queue = [Piece::spawn(Shape::S), Piece::spawn(Shape::Z)];
        let outcome = PlacementSearch::run(&start, &queue).expect("placement");
        let mut game = game_on(start, &[Shape::S, Shape::Z]);
        let mut recording = outcome.recording();
        replay_until_lock(&mut game, &mut recording);
        assert_eq!(game.grid(), &outcome.first_ply);
    }

    #[test]
    fn test_search_is_deterministic() {
        let start = grid(&["#..#......", "##.##...##", "####.#####"]);
        let queue = [Piece::spawn(Shape::J), Piece::spawn(Shape::T)];
        let a = PlacementSearch::run(&start, &queue).expect("placement");
        let b = PlacementSearch::run(&start, &queue).expect("placement");
        assert_eq!(a.placement, b.placement);
        assert_eq!(a.score, b.score);
        assert_eq!(a.terminal, b.terminal);
        assert_eq!(a.recording(), b.recording());
        assert_eq!(a.states_visited, b.states_visited);
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let start = grid(&["#.#.#.#.#."]);
        let queue = [Piece::spawn(Shape::Z)];
        let outcome = PlacementSearch::run(&start, &queue).expect("placement");
        let first = evaluate(&start, &outcome.terminal, &outcome.line);
        let second = evaluate(&start, &outcome.terminal, &outcome.line);
        assert_eq!(first, second);
        assert_eq!(first, outcome.score);
    }
}

mod games {
    use super::*;

    #[test]
    fn test_solver_survives_a_bag_game() {
        let config = GameConfig {
            piece_rule: PieceRule::SevenBag,
            seed: 11,
            ..GameConfig::classic()
        };
        let mut game = Game::new(config).expect("valid config");
        let mut solver = Solver::new(SolverConfig::default());

        while game.stats().pieces_locked < 100 {
            solver.advance(&mut game);
            assert!(!game.is_over(), "topped out after {:?}", game.stats());
        }
        assert_eq!(solver.stats().failed_actions, 0);
        assert_eq!(solver.stats().flushed, 0);
        assert!(game.stats().lines_cleared >= 20);
    }
}
