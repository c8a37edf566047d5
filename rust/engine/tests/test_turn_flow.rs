use ludo_engine::board::PiecePosition;
use ludo_engine::dice::DieValue;
use ludo_engine::engine::{initialize_game, Engine, RollTurn};
use ludo_engine::errors::GameError;
use ludo_engine::executor::{ExecutionResult, MoveOutcome};
use ludo_engine::game::{GameStatus, TurnPhase};
use ludo_engine::piece::PieceRef;
use ludo_engine::player::PlayerSpec;
use ludo_engine::rules::Move;

fn two_humans() -> Engine {
    initialize_game(&[PlayerSpec::human(), PlayerSpec::human()]).expect("two players")
}

/// Rolls `value` for `player` and moves `piece`, which must have a legal move.
fn play(engine: &mut Engine, player: usize, value: u8, piece: usize) -> ExecutionResult {
    let die = DieValue::new(value).expect("die face");
    let outcome = engine.roll_with(player, die).expect("roll");
    assert_eq!(outcome.turn, RollTurn::AwaitingMove);
    let mv = outcome
        .legal_moves
        .iter()
        .copied()
        .find(|m| m.piece == piece)
        .expect("piece has a legal move");
    engine.choose_move(player, mv).expect("legal move")
}

#[test]
fn six_brings_piece_out_and_grants_another_roll() {
    let mut engine = two_humans();
    let result = play(&mut engine, 0, 6, 0);
    assert_eq!(result.from, PiecePosition::InYard);
    assert_eq!(result.to, PiecePosition::OnTrack(0));
    assert_eq!(result.outcome, MoveOutcome::Moved);
    assert_eq!(result.next_player, Some(0));
    assert_eq!(engine.state().status(), GameStatus::WaitingForRoll);

    let result = play(&mut engine, 0, 3, 0);
    assert_eq!(result.to, PiecePosition::OnTrack(3));
    assert_eq!(result.next_player, Some(1));
}

#[test]
fn second_player_enters_on_opposite_seat() {
    let mut engine = two_humans();
    engine
        .roll_with(0, DieValue::new(2).unwrap())
        .expect("roll");
    let result = play(&mut engine, 1, 6, 2);
    assert_eq!(result.to, PiecePosition::OnTrack(26));
}

#[test]
fn capture_sends_opponent_home_and_grants_bonus_turn() {
    let mut engine = two_humans();
    play(&mut engine, 0, 6, 0); // cell 0
    play(&mut engine, 0, 5, 0); // cell 5
    play(&mut engine, 1, 6, 0); // cell 26
    play(&mut engine, 1, 1, 0); // cell 27
    play(&mut engine, 0, 6, 0); // cell 11
    play(&mut engine, 0, 6, 0); // cell 17
    play(&mut engine, 0, 4, 0); // cell 21, star
    play(&mut engine, 1, 1, 0); // cell 28
    play(&mut engine, 0, 6, 0); // cell 27

    let result = play(&mut engine, 0, 1, 0);
    assert_eq!(result.to, PiecePosition::OnTrack(28));
    assert_eq!(
        result.captured(),
        Some(PieceRef {
            player: 1,
            piece: 0
        })
    );
    assert_eq!(result.next_player, Some(0));

    let victim = engine.state().player(1).unwrap().piece(0).unwrap();
    assert_eq!(victim.position(), PiecePosition::InYard);
    assert_eq!(victim.distance_traveled(), 0);
    let last = engine.state().move_log().last().unwrap();
    assert_eq!(last.captured, result.captured());
}

#[test]
fn opponent_on_star_cell_is_not_captured() {
    let mut engine = two_humans();
    play(&mut engine, 0, 6, 0); // cell 0
    play(&mut engine, 0, 2, 0); // cell 2
    play(&mut engine, 1, 6, 0); // cell 26
    play(&mut engine, 1, 6, 0); // cell 32
    play(&mut engine, 1, 2, 0); // cell 34, star
    play(&mut engine, 0, 6, 0); // cell 8, star
    play(&mut engine, 0, 6, 0); // cell 14
    play(&mut engine, 0, 5, 0); // cell 19
    play(&mut engine, 1, 4, 0); // cell 38
    play(&mut engine, 0, 6, 0); // cell 25
    play(&mut engine, 0, 6, 0); // cell 31
    play(&mut engine, 0, 1, 0); // cell 32
    play(&mut engine, 1, 3, 0); // cell 41
    play(&mut engine, 0, 2, 0); // cell 34, star
    assert_eq!(engine.state().occupants(34).count(), 1);

    play(&mut engine, 1, 6, 1); // opponent cell 26
    let result = play(&mut engine, 1, 6, 1); // onto cell 32, empty
    assert_eq!(result.captured(), None);
    let result = play(&mut engine, 1, 2, 1); // onto cell 34, star, shared
    assert_eq!(result.captured(), None);
    assert_eq!(result.to, PiecePosition::OnTrack(34));
    assert_eq!(engine.state().occupants(34).count(), 2);
}

#[test]
fn illegal_move_is_rejected_and_state_unchanged() {
    let mut engine = two_humans();
    engine.roll_with(0, DieValue::SIX).unwrap();
    let before = engine.snapshot();
    let err = engine
        .choose_move(
            0,
            Move {
                piece: 0,
                resulting_distance: 6,
            },
        )
        .unwrap_err();
    assert_eq!(
        err,
        GameError::IllegalMove {
            piece: 0,
            resulting_distance: 6
        }
    );
    assert_eq!(engine.state().players(), before.players());
    assert_eq!(engine.state().phase(), TurnPhase::AwaitingMoveChoice);
    assert_eq!(engine.state().pending_moves(), before.pending_moves());
}

#[test]
fn wrong_player_cannot_choose() {
    let mut engine = two_humans();
    let outcome = engine.roll_with(0, DieValue::SIX).unwrap();
    let err = engine.choose_move(1, outcome.legal_moves[0]).unwrap_err();
    assert_eq!(
        err,
        GameError::NotYourTurn {
            expected: 0,
            actual: 1
        }
    );
}

#[test]
fn unknown_player_is_reported() {
    let mut engine = two_humans();
    assert_eq!(
        engine.roll_with(3, DieValue::SIX).unwrap_err(),
        GameError::UnknownPlayer(3)
    );
}

#[test]
fn consecutive_sixes_reset_by_other_values() {
    let mut engine = two_humans();
    play(&mut engine, 0, 6, 0);
    play(&mut engine, 0, 6, 0);
    assert_eq!(engine.state().consecutive_sixes(), 2);
    play(&mut engine, 0, 1, 0);
    assert_eq!(engine.state().consecutive_sixes(), 0);
    assert_eq!(engine.state().current_player(), 1);
}

#[test]
fn three_sixes_forfeit_after_two_bonus_moves() {
    let mut engine = two_humans();
    play(&mut engine, 0, 6, 0);
    play(&mut engine, 0, 6, 0);
    let before = engine.snapshot();
    let outcome = engine.roll_with(0, DieValue::SIX).unwrap();
    assert_eq!(outcome.turn, RollTurn::ThreeSixes { next: 1 });
    assert!(outcome.legal_moves.is_empty());
    assert_eq!(engine.state().players(), before.players());
    assert_eq!(engine.state().move_log().len(), 2);
    assert_eq!(engine.state().rolls(), 3);
}
