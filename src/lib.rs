//! holdem-trio: three-seat Texas Hold'em with pluggable decision providers
//!
//! One human seat plays two provider seats. The engine is a pure reducer over
//! [`game::Hand`] values; [`session::Session`] adds the asynchronous turn
//! scheduling that asks providers for decisions under a timeout, and
//! [`tui`] puts it in a terminal.
//!
//! ## Quick start: evaluate a hand
//! ```
//! use holdem_trio::cards::parse_cards;
//! use holdem_trio::evaluator::{best_of, Category};
//!
//! let cards = parse_cards("As Ah Kc Qd Jh 3s 2c").unwrap();
//! let rank = best_of(&cards).unwrap();
//! assert_eq!(rank.category, Category::OnePair);
//! ```
//!
//! ## Quick start: play a hand
//! ```
//! use holdem_trio::betting::Action;
//! use holdem_trio::deck::Deck;
//! use holdem_trio::game::{Hand, Phase};
//! use holdem_trio::seat::SeatId;
//!
//! let hand = Hand::start([1000; 3], 20, Deck::seeded(7)).unwrap();
//! let hand = hand.apply(SeatId::User, Action::RaiseTo(60)).unwrap();
//! let hand = hand.apply(SeatId::OpenAi, Action::Call).unwrap();
//! let hand = hand.apply(SeatId::Claude, Action::Fold).unwrap();
//! assert_eq!(hand.pot(), 120);
//! let hand = hand.advance_phase().unwrap();
//! assert_eq!(hand.phase(), Phase::PostflopBetting);
//! assert_eq!(hand.community().len(), 3);
//! ```
//!
//! ## TUI
//! ```sh
//! cargo run --bin holdem-trio -- --config table.toml
//! ```

pub mod betting;
pub mod cards;
pub mod config;
pub mod deck;
pub mod evaluator;
pub mod game;
pub mod logging;
pub mod provider;
pub mod seat;
pub mod session;
pub mod tui;
pub mod view;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
