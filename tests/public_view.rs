use holdem_trio::betting::Action;
use holdem_trio::cards::parse_cards;
use holdem_trio::deck::Deck;
use holdem_trio::evaluator::Category;
use holdem_trio::game::{Hand, Phase, Winner};
use holdem_trio::seat::SeatId;
use holdem_trio::view::{CardView, PublicState};

use SeatId::{Claude, OpenAi, User};

fn stacked_hand() -> Hand {
    let deck = Deck::stacked(&parse_cards("Ah Ad Kh Kd 2c 7d As 9c 5h 3s Jd").unwrap());
    Hand::start([1000; 3], 20, deck).unwrap()
}

fn to_showdown(mut hand: Hand) -> Hand {
    while !hand.is_over() {
        hand = match hand.to_act() {
            Some(seat) => hand.apply(seat, Action::Call).unwrap(),
            None => hand.advance_phase().unwrap(),
        };
    }
    hand
}

#[test]
fn provider_hands_stay_hidden_in_every_betting_phase() {
    let mut hand = stacked_hand();
    let mut phases = Vec::new();
    while !hand.is_over() {
        let view = PublicState::of(&hand, 7);
        phases.push(view.phase);
        assert_eq!(view.hand_id, 7);
        let user = view.seat(User).hole.unwrap();
        assert_eq!(user.map(CardView::card), hand.seat(User).hole().unwrap().map(Some));
        for id in [OpenAi, Claude] {
            assert_eq!(view.seat(id).hole, Some([CardView::FaceDown; 2]));
        }
        hand = match hand.to_act() {
            Some(seat) => hand.apply(seat, Action::Call).unwrap(),
            None => hand.advance_phase().unwrap(),
        };
    }
    phases.dedup();
    assert_eq!(
        phases,
        vec![
            Phase::PreflopBetting,
            Phase::PostflopBetting,
            Phase::PostturnBetting,
            Phase::PostriverBetting
        ]
    );
}

#[test]
fn showdown_reveals_everything() {
    let hand = to_showdown(stacked_hand());
    let view = PublicState::of(&hand, 1);
    assert_eq!(view.phase, Phase::Showdown);
    assert_eq!(view.message, "Showdown! Best hand wins");
    for seat in &view.seats {
        let hole = seat.hole.unwrap();
        assert!(hole.iter().all(|c| c.card().is_some()), "{} still hidden", seat.name);
    }
    assert_eq!(view.winner, Some(Winner::Single(User)));
    assert_eq!(view.payouts, vec![(User, 60)]);
    let shown: Vec<(SeatId, Category)> = view.shown.iter().map(|s| (s.seat, s.category)).collect();
    assert_eq!(
        shown,
        vec![
            (User, Category::ThreeOfAKind),
            (OpenAi, Category::OnePair),
            (Claude, Category::HighCard)
        ]
    );
}

#[test]
fn a_fold_out_keeps_the_losers_hidden() {
    let hand = stacked_hand();
    let hand = hand.apply(User, Action::RaiseTo(100)).unwrap();
    let hand = hand.apply(OpenAi, Action::Fold).unwrap();
    let hand = hand.apply(Claude, Action::Fold).unwrap();
    let view = PublicState::of(&hand, 1);
    assert!(view.winner.is_some());
    assert!(view.shown.is_empty());
    assert_eq!(view.seat(OpenAi).hole, Some([CardView::FaceDown; 2]));
}

#[test]
fn betting_numbers_are_exposed() {
    let hand = stacked_hand().apply(User, Action::RaiseTo(60)).unwrap();
    let view = PublicState::of(&hand, 1);
    assert_eq!(view.to_act, Some(OpenAi));
    assert_eq!(view.highest_bet, 60);
    assert_eq!(view.min_raise_to, 100);
    assert_eq!(view.pot, 0);
    assert_eq!(view.pot_total, 60);
    assert_eq!(view.seat(OpenAi).to_call, 60);
    assert_eq!(view.seat(User).current_bet, 60);
    assert!(!view.can_advance);
    assert_eq!(view.history.len(), 1);
}

#[test]
fn json_view_masks_hidden_cards() {
    let hand = stacked_hand();
    let json: serde_json::Value = serde_json::to_value(PublicState::of(&hand, 3)).unwrap();
    assert_eq!(json["phase"], "PREFLOP_BETTING");
    assert_eq!(json["seats"][1]["hole"], serde_json::json!(["face_down", "face_down"]));
    assert_eq!(json["seats"][0]["hole"][0]["face_up"], "Ah");
    let text = json.to_string();
    for card in ["Kh", "Kd", "2c", "7d"] {
        assert!(!text.contains(card), "{card} leaked");
    }
}
