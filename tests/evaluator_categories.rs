use holdem_trio::cards::{parse_cards, Card, Rank};
use holdem_trio::evaluator::{best_of, evaluate_hand, Category, EvalError, HandRank};

fn five(s: &str) -> HandRank {
    evaluate_hand(&parse_cards(s).unwrap()).unwrap()
}

fn seven(s: &str) -> HandRank {
    best_of(&parse_cards(s).unwrap()).unwrap()
}

fn ranks(s: &str) -> Vec<Rank> {
    s.chars().map(|c| Rank::try_from(c).unwrap()).collect()
}

#[test]
fn every_category_is_recognized() {
    let cases = [
        ("As Ks Qs Js Ts", Category::RoyalFlush),
        ("9h 8h 7h 6h 5h", Category::StraightFlush),
        ("9c 9d 9h 9s Ac", Category::FourOfAKind),
        ("3c 3d 3h Js Jc", Category::FullHouse),
        ("Kh Th 8h 6h 3h", Category::Flush),
        ("6c 5d 4h 3s 2c", Category::Straight),
        ("7c 7d 7h Ks 2c", Category::ThreeOfAKind),
        ("Jc Jd 4h 4s Ac", Category::TwoPair),
        ("Qc Qd 9h 5s 2c", Category::OnePair),
        ("Ac Jd 9h 5s 3c", Category::HighCard),
    ];
    for (cards, expected) in cases {
        assert_eq!(five(cards).category, expected, "{cards}");
    }
}

#[test]
fn tiebreak_keys_follow_category_layout() {
    assert_eq!(five("9c 9d 9h 9s Ac").tiebreak.as_slice(), ranks("9A").as_slice());
    assert_eq!(five("3c 3d 3h Js Jc").tiebreak.as_slice(), ranks("3J").as_slice());
    assert_eq!(five("7c 7d 7h Ks 2c").tiebreak.as_slice(), ranks("7K2").as_slice());
    assert_eq!(five("Jc Jd 4h 4s Ac").tiebreak.as_slice(), ranks("J4A").as_slice());
    assert_eq!(five("Qc Qd 9h 5s 2c").tiebreak.as_slice(), ranks("Q952").as_slice());
    assert_eq!(five("Ac Jd 9h 5s 3c").tiebreak.as_slice(), ranks("AJ953").as_slice());
    assert_eq!(five("Kh Th 8h 6h 3h").tiebreak.as_slice(), ranks("KT863").as_slice());
    assert_eq!(five("6c 5d 4h 3s 2c").tiebreak.as_slice(), ranks("6").as_slice());
}

#[test]
fn wheel_is_a_five_high_straight() {
    let wheel = five("Ac 2d 3h 4s 5c");
    assert_eq!(wheel.category, Category::Straight);
    assert_eq!(wheel.tiebreak.as_slice(), &[Rank::Five]);
    assert!(wheel < five("6c 5d 4h 3s 2c"));

    let steel = five("Ah 2h 3h 4h 5h");
    assert_eq!(steel.category, Category::StraightFlush);
    assert_eq!(steel.tiebreak.as_slice(), &[Rank::Five]);
}

#[test]
fn ace_does_not_wrap_around() {
    assert_eq!(five("Qc Kd Ah 2s 3c").category, Category::HighCard);
}

#[test]
fn better_kicker_wins_within_a_category() {
    assert!(five("Qc Qd 9h 5s 3c") > five("Qh Qs 9c 5d 2c"));
    assert!(five("Jc Jd 4h 4s Ac") > five("Jh Js 4c 4d Kc"));
    assert!(five("Jc Jd 4h 4s 2c") < five("Jh Js 5c 5d 2h"));
    assert_eq!(five("Ac Jd 9h 5s 3c"), five("Ad Jh 9s 5c 3d"));
}

#[test]
fn categories_order_by_ordinal() {
    let ladder = [
        "Ac Jd 9h 5s 3c",
        "2c 2d 4h 5s 7c",
        "2c 2d 3h 3s 4c",
        "2c 2d 2h 3s 4c",
        "Ac 2d 3h 4s 5c",
        "2h 3h 4h 5h 7h",
        "2c 2d 2h 3s 3c",
        "2c 2d 2h 2s 3c",
        "Ah 2h 3h 4h 5h",
        "Td Jd Qd Kd Ad",
    ];
    let ranked: Vec<HandRank> = ladder.iter().map(|s| five(s)).collect();
    for pair in ranked.windows(2) {
        assert!(pair[0] < pair[1], "{} should lose to {}", pair[0], pair[1]);
        assert_eq!(pair[0].category.ordinal() + 1, pair[1].category.ordinal());
    }
}

#[test]
fn best_of_seven_picks_the_strongest_subset() {
    let r = seven("Ah Kh 2h 7h 9c Th 3d");
    assert_eq!(r.category, Category::Flush);
    assert_eq!(r.tiebreak.as_slice(), ranks("AKT72").as_slice());

    let r = seven("8c 8d 8h 4s 4c 4d Ac");
    assert_eq!(r.category, Category::FullHouse);
    assert_eq!(r.tiebreak.as_slice(), ranks("84").as_slice());

    let r = seven("2c 3d 4h 5s 6c 7d 8h");
    assert_eq!(r.category, Category::Straight);
    assert_eq!(r.tiebreak.as_slice(), &[Rank::Eight]);
}

#[test]
fn best_five_holds_the_winning_cards() {
    let r = seven("Ah Kh 2h 7h 9c Th 3d");
    let hearts: Vec<Card> = parse_cards("Ah Kh Th 7h 2h").unwrap();
    assert_eq!(r.best_five.to_vec(), hearts);
}

#[test]
fn wrong_counts_and_duplicates_are_errors() {
    let four = parse_cards("Ac Kd Qh Js").unwrap();
    assert_eq!(evaluate_hand(&four), Err(EvalError::WrongCardCount { expected: 5, got: 4 }));
    let six = parse_cards("Ac Kd Qh Js Tc 9c").unwrap();
    assert_eq!(best_of(&six), Err(EvalError::WrongCardCount { expected: 7, got: 6 }));
    let dup = parse_cards("Ac Ac Qh Js Tc").unwrap();
    assert!(matches!(evaluate_hand(&dup), Err(EvalError::DuplicateCard(_))));
}
