use holdem_trio::betting::{Action, ActionError};
use holdem_trio::deck::Deck;
use holdem_trio::game::{EngineError, Hand, HistoryVerb, Phase};
use holdem_trio::seat::{SeatId, SeatStatus};

use SeatId::{Claude, OpenAi, User};

fn table(stacks: [u64; 3]) -> Hand {
    Hand::start(stacks, 20, Deck::seeded(21)).expect("deal")
}

fn play(hand: Hand, moves: &[(SeatId, Action)]) -> Hand {
    moves.iter().fold(hand, |h, &(seat, action)| {
        h.apply(seat, action).unwrap_or_else(|e| panic!("{seat} {action}: {e}"))
    })
}

fn rejection(hand: &Hand, seat: SeatId, action: Action) -> ActionError {
    match hand.apply(seat, action) {
        Err(EngineError::Rejected(e)) => e,
        other => panic!("expected a rejection, got {other:?}"),
    }
}

#[test]
fn preflop_owes_the_big_blind_without_posting() {
    let hand = table([1000; 3]);
    assert_eq!(hand.to_act(), Some(User));
    assert_eq!(hand.round().highest_bet(), 20);
    assert_eq!(hand.round().min_raise_to(), 40);
    for seat in hand.seats() {
        assert_eq!(seat.chips(), 1000);
        assert_eq!(seat.current_bet(), 0);
    }
    assert_eq!(hand.to_call(Claude), 20);
}

#[test]
fn three_calls_close_the_round() {
    let hand = play(table([1000; 3]), &[(User, Action::Call), (OpenAi, Action::Call)]);
    assert_eq!(hand.to_act(), Some(Claude));
    let hand = play(hand, &[(Claude, Action::Call)]);
    assert!(hand.can_advance());
    assert_eq!(hand.to_act(), None);
    assert_eq!(hand.pot(), 60);
    assert!(hand.seats().iter().all(|s| s.current_bet() == 0));
}

#[test]
fn out_of_turn_actions_are_rejected() {
    let hand = table([1000; 3]);
    assert_eq!(
        rejection(&hand, OpenAi, Action::Call),
        ActionError::NotYourTurn { expected: User, got: OpenAi }
    );
}

#[test]
fn raise_bounds_are_enforced() {
    let hand = table([1000; 3]);
    assert_eq!(
        rejection(&hand, User, Action::RaiseTo(20)),
        ActionError::BelowCurrentBet { highest: 20, amount: 20 }
    );
    assert_eq!(
        rejection(&hand, User, Action::RaiseTo(30)),
        ActionError::BelowMinimum { min: 40, amount: 30 }
    );
    assert_eq!(
        rejection(&hand, User, Action::RaiseTo(1001)),
        ActionError::ExceedsChips { max: 1000, amount: 1001 }
    );
}

#[test]
fn rejection_leaves_the_hand_untouched() {
    let hand = table([1000; 3]);
    let before = format!("{hand:?}");
    let _ = hand.apply(User, Action::RaiseTo(5));
    assert_eq!(format!("{hand:?}"), before);
    assert_eq!(hand.to_act(), Some(User));
}

#[test]
fn full_raise_grows_the_minimum() {
    let hand = play(table([1000; 3]), &[(User, Action::RaiseTo(60))]);
    assert_eq!(hand.round().highest_bet(), 60);
    assert_eq!(hand.round().min_raise_to(), 100);
    assert_eq!(hand.to_call(OpenAi), 60);
}

#[test]
fn a_raise_reopens_action_for_earlier_seats() {
    let hand = play(
        table([1000; 3]),
        &[(User, Action::Call), (OpenAi, Action::RaiseTo(80)), (Claude, Action::Call)],
    );
    assert_eq!(hand.to_act(), Some(User));
    assert_eq!(hand.to_call(User), 60);
    let hand = play(hand, &[(User, Action::Call)]);
    assert!(hand.can_advance());
    assert_eq!(hand.pot(), 240);
}

#[test]
fn short_all_in_is_allowed_but_does_not_reopen_the_increment() {
    let hand =
        play(table([1000, 30, 1000]), &[(User, Action::Call), (OpenAi, Action::RaiseTo(30))]);
    assert_eq!(hand.seat(OpenAi).status(), SeatStatus::AllIn);
    assert_eq!(hand.round().highest_bet(), 30);
    assert_eq!(hand.round().min_raise_to(), 50);
    let hand = play(hand, &[(Claude, Action::Call), (User, Action::Call)]);
    assert!(hand.can_advance());
    assert_eq!(hand.pot(), 90);
}

#[test]
fn calling_more_than_the_stack_goes_all_in() {
    let hand =
        play(table([1000, 1000, 50]), &[(User, Action::RaiseTo(200)), (OpenAi, Action::Call)]);
    let hand = play(hand, &[(Claude, Action::Call)]);
    assert_eq!(hand.seat(Claude).status(), SeatStatus::AllIn);
    assert_eq!(hand.seat(Claude).chips(), 0);
    let last = hand.history().last().unwrap();
    assert_eq!((last.seat, last.verb, last.amount), (Claude, HistoryVerb::AllIn, Some(50)));
}

#[test]
fn uncalled_excess_goes_back_to_the_raiser() {
    let hand = play(
        table([1000, 1000, 1000]),
        &[(User, Action::Call), (OpenAi, Action::RaiseTo(300)), (Claude, Action::Fold)],
    );
    let hand = play(hand, &[(User, Action::Fold)]);
    assert!(hand.is_over());
    assert_eq!(hand.seat(OpenAi).chips(), 1020);
    assert_eq!(hand.seat(User).chips(), 980);
    let verbs: Vec<HistoryVerb> = hand.history().iter().map(|e| e.verb).collect();
    assert!(verbs.ends_with(&[HistoryVerb::Return, HistoryVerb::Win]));
    assert_eq!(hand.history()[hand.history().len() - 2].amount, Some(280));
}

#[test]
fn postflop_rounds_start_with_nothing_owed() {
    let hand = play(
        table([1000; 3]),
        &[(User, Action::Call), (OpenAi, Action::Call), (Claude, Action::Fold)],
    );
    let hand = hand.advance_phase().unwrap();
    assert_eq!(hand.phase(), Phase::PostflopBetting);
    assert_eq!(hand.round().highest_bet(), 0);
    assert_eq!(hand.round().min_raise_to(), 20);
    assert_eq!(hand.to_act(), Some(User));
    let hand = play(hand, &[(User, Action::Call), (OpenAi, Action::Call)]);
    assert!(hand.can_advance());
    let checks = hand.history().iter().filter(|e| e.verb == HistoryVerb::Check).count();
    assert_eq!(checks, 2);
}

#[test]
fn folded_and_all_in_seats_are_skipped() {
    let hand = play(
        table([1000, 40, 1000]),
        &[(User, Action::Fold), (OpenAi, Action::RaiseTo(40)), (Claude, Action::Call)],
    );
    assert!(hand.can_advance());
    let hand = hand.advance_phase().unwrap();
    assert_eq!(hand.to_act(), None, "only one active seat is left");
    assert!(hand.can_advance());
}

#[test]
fn actions_after_the_round_closes_are_rejected() {
    let hand = play(
        table([1000; 3]),
        &[(User, Action::Call), (OpenAi, Action::Call), (Claude, Action::Call)],
    );
    assert_eq!(rejection(&hand, User, Action::Call), ActionError::BettingClosed);
}
