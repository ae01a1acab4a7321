//! A running table: the current [`Hand`] plus the asynchronous plumbing that
//! asks decision providers for their moves.
//!
//! At most one provider request is outstanding at a time. Each request is
//! stamped with a [`TurnToken`]; any reply whose token no longer matches the
//! table (the hand was restarted, or the seat already acted) is dropped
//! without touching the hand.

use crate::betting::{Action, ActionError};
use crate::config::{ConfigError, ProviderTiming, TableConfig};
use crate::deck::Deck;
use crate::game::{EngineError, FatalError, Hand, InvariantViolation};
use crate::provider::{normalize, Decision, DecisionProvider, DecisionRequest, ProviderError};
use crate::seat::SeatId;
use crate::view::PublicState;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

/// Identifies one turn of one hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TurnToken {
    pub hand_id: u64,
    /// Bumped on every committed state change.
    pub seq: u64,
    pub seat: SeatId,
}

/// A provider move that reached the hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderMove {
    pub seat: SeatId,
    pub action: Action,
    /// True when the provider's answer was replaced by a fold.
    pub substituted: bool,
}

#[derive(Debug)]
struct Reply {
    token: TurnToken,
    request: DecisionRequest,
    outcome: Result<Decision, ProviderError>,
}

struct Outstanding {
    token: TurnToken,
    /// The provider call itself.
    work: AbortHandle,
    /// Waits on `work` and always reports back, even if the provider panics.
    watch: AbortHandle,
}

pub struct Session {
    hand: Hand,
    hand_id: u64,
    seq: u64,
    outstanding: Option<Outstanding>,
    tx: mpsc::UnboundedSender<Reply>,
    rx: mpsc::UnboundedReceiver<Reply>,
    providers: [Option<Arc<dyn DecisionProvider>>; 3],
    timing: ProviderTiming,
    rng: ChaCha8Rng,
}

impl Session {
    /// An idle table with every seat holding `starting_stack` and no providers.
    /// Without a seed the deck order comes from the thread RNG.
    pub fn new(
        starting_stack: u64,
        big_blind: u64,
        timing: ProviderTiming,
        seed: Option<u64>,
    ) -> Self {
        let seed = seed.unwrap_or_else(|| rand::rng().random());
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            hand: Hand::new([starting_stack; 3], big_blind),
            hand_id: 0,
            seq: 0,
            outstanding: None,
            tx,
            rx,
            providers: [None, None, None],
            timing,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Let `provider` act for `seat`. Giving the human seat a provider turns
    /// the table into a self-playing one.
    pub fn with_provider(mut self, seat: SeatId, provider: Arc<dyn DecisionProvider>) -> Self {
        self.providers[seat.index()] = Some(provider);
        self
    }

    pub fn from_config(cfg: &TableConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let mut session = Self::new(cfg.starting_stack, cfg.big_blind, cfg.timing(), cfg.seed);
        for seat in SeatId::ROSTER {
            if let Some(pc) = cfg.provider_for(seat) {
                let provider =
                    pc.build(seat).map_err(|source| ConfigError::Provider { seat, source })?;
                session = session.with_provider(seat, provider);
            }
        }
        Ok(session)
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn hand_id(&self) -> u64 {
        self.hand_id
    }

    pub fn public_state(&self) -> PublicState {
        PublicState::of(&self.hand, self.hand_id)
    }

    pub fn has_provider(&self, seat: SeatId) -> bool {
        self.providers[seat.index()].is_some()
    }

    pub fn provider_name(&self, seat: SeatId) -> Option<&str> {
        self.providers[seat.index()].as_deref().map(|p| p.name())
    }

    /// Token of the request currently in flight, if any.
    pub fn outstanding(&self) -> Option<TurnToken> {
        self.outstanding.as_ref().map(|o| o.token)
    }

    pub fn verify(&self) -> Result<(), InvariantViolation> {
        self.hand.verify()
    }

    /// Deal a fresh hand. A hand still in progress is abandoned and any
    /// request in flight for it is cancelled.
    pub fn start_new_hand(&mut self) -> Result<(), EngineError> {
        let deck = Deck::shuffled(&mut self.rng);
        let next = self.hand.start_new_hand(deck)?;
        self.cancel_outstanding("new hand");
        self.hand_id += 1;
        self.commit(next);
        info!(
            hand_id = self.hand_id,
            stacks = ?self.hand.seats().iter().map(|s| s.chips()).collect::<Vec<_>>(),
            "hand started"
        );
        Ok(())
    }

    /// Apply an action typed at the table. Refused while a provider request
    /// is in flight.
    pub fn submit_action(&mut self, seat: SeatId, action: Action) -> Result<(), EngineError> {
        if let Some(o) = &self.outstanding {
            return Err(ActionError::DecisionPending(o.token.seat).into());
        }
        match self.hand.apply(seat, action) {
            Ok(next) => {
                info!(hand_id = self.hand_id, %seat, %action, "action");
                self.commit(next);
                Ok(())
            }
            Err(e) => {
                warn!(hand_id = self.hand_id, %seat, %action, error = %e, "action rejected");
                Err(e)
            }
        }
    }

    /// Deal the next street, or run the showdown. `Ok(false)` when the
    /// current round is still open or the hand is already decided.
    pub fn advance_phase(&mut self) -> Result<bool, FatalError> {
        if !self.hand.can_advance() {
            return Ok(false);
        }
        let next = self.hand.advance_phase()?;
        self.commit(next);
        info!(
            hand_id = self.hand_id,
            phase = %self.hand.phase(),
            board = ?self.hand.community().iter().map(|c| c.to_string()).collect::<Vec<_>>(),
            "phase advanced"
        );
        if let Some(res) = self.hand.resolution() {
            info!(
                hand_id = self.hand_id,
                winner = ?res.winner,
                payouts = ?res.payouts,
                "hand over"
            );
        }
        Ok(true)
    }

    /// Ask the provider of the seat to act, if it has one. Returns the new
    /// token, or `None` when there is nobody to ask or the same turn is
    /// already being asked about.
    pub fn request_decision(&mut self) -> Option<TurnToken> {
        let seat = self.hand.to_act()?;
        let provider = self.providers[seat.index()].clone()?;
        let token = self.token_for(seat);
        if let Some(o) = &self.outstanding {
            if o.token == token {
                return None;
            }
            self.cancel_outstanding("superseded");
        }

        let request = DecisionRequest::for_seat(&self.hand, seat);
        let tx = self.tx.clone();
        let timing = self.timing;
        debug!(hand_id = token.hand_id, seq = token.seq, %seat, "requesting decision");
        let work_request = request.clone();
        let work = tokio::spawn(async move {
            if !timing.think_delay.is_zero() {
                tokio::time::sleep(timing.think_delay).await;
            }
            ask(provider.as_ref(), &work_request, timing).await
        });
        let work_abort = work.abort_handle();
        let watch = tokio::spawn(async move {
            let outcome = match work.await {
                Ok(outcome) => outcome,
                Err(e) if e.is_panic() => Err(ProviderError::Transport("provider panicked".into())),
                Err(_) => Err(ProviderError::Transport("provider task cancelled".into())),
            };
            // The receiver only goes away with the session.
            let _ = tx.send(Reply { token, request, outcome });
        });
        self.outstanding =
            Some(Outstanding { token, work: work_abort, watch: watch.abort_handle() });
        Some(token)
    }

    /// Apply every provider reply that has already arrived.
    pub fn try_apply_decisions(&mut self) -> Result<Vec<ProviderMove>, FatalError> {
        let mut moves = Vec::new();
        while let Ok(reply) = self.rx.try_recv() {
            if let Some(mv) = self.accept(reply)? {
                moves.push(mv);
            }
        }
        Ok(moves)
    }

    /// Wait for the outstanding request to resolve and apply it.
    pub async fn next_decision(&mut self) -> Result<Option<ProviderMove>, FatalError> {
        while self.outstanding.is_some() {
            let Some(reply) = self.rx.recv().await else {
                return Ok(None);
            };
            if let Some(mv) = self.accept(reply)? {
                return Ok(Some(mv));
            }
        }
        Ok(None)
    }

    /// Drive provider seats and phase changes until the human seat must act
    /// or the hand is over.
    pub async fn play_until_human(&mut self) -> Result<(), FatalError> {
        loop {
            if self.advance_phase()? {
                continue;
            }
            match self.hand.to_act() {
                Some(seat) if self.has_provider(seat) => {
                    self.request_decision();
                    self.next_decision().await?;
                }
                _ => return Ok(()),
            }
        }
    }

    fn accept(&mut self, reply: Reply) -> Result<Option<ProviderMove>, FatalError> {
        let seat = reply.token.seat;
        let live = self.outstanding() == Some(reply.token) && self.token_for(seat) == reply.token;
        if !live {
            debug!(
                hand_id = reply.token.hand_id,
                seq = reply.token.seq,
                %seat,
                "stale decision dropped"
            );
            return Ok(None);
        }
        self.outstanding = None;

        if let Err(e) = &reply.outcome {
            warn!(hand_id = self.hand_id, %seat, error = %e, "provider failed, folding");
        }
        let wanted = normalize(reply.outcome.clone(), &reply.request);
        let (next, action) = match self.hand.apply(seat, wanted) {
            Ok(next) => (next, wanted),
            Err(EngineError::Fatal(f)) => return Err(f),
            Err(EngineError::Rejected(e)) => {
                warn!(
                    hand_id = self.hand_id,
                    %seat,
                    action = %wanted,
                    error = %e,
                    "provider move rejected, folding"
                );
                match self.hand.apply(seat, Action::Fold) {
                    Ok(next) => (next, Action::Fold),
                    Err(EngineError::Fatal(f)) => return Err(f),
                    Err(EngineError::Rejected(e)) => {
                        warn!(hand_id = self.hand_id, %seat, error = %e, "fold refused");
                        return Ok(None);
                    }
                }
            }
        };
        let substituted = action == Action::Fold && reply.outcome != Ok(Decision::Fold);
        info!(hand_id = self.hand_id, %seat, %action, substituted, "provider action");
        self.commit(next);
        Ok(Some(ProviderMove { seat, action, substituted }))
    }

    fn commit(&mut self, next: Hand) {
        self.hand = next;
        self.seq += 1;
    }

    fn token_for(&self, seat: SeatId) -> TurnToken {
        TurnToken { hand_id: self.hand_id, seq: self.seq, seat }
    }

    fn cancel_outstanding(&mut self, reason: &'static str) {
        if let Some(o) = self.outstanding.take() {
            o.watch.abort();
            o.work.abort();
            debug!(
                hand_id = o.token.hand_id,
                seat = %o.token.seat,
                reason,
                "decision request cancelled"
            );
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.cancel_outstanding("session closed");
    }
}

/// One provider request under a single deadline. Transport and spawn
/// failures are retried; malformed answers are final.
async fn ask(
    provider: &dyn DecisionProvider,
    request: &DecisionRequest,
    timing: ProviderTiming,
) -> Result<Decision, ProviderError> {
    let attempts = timing.attempts.max(1);
    let work = async {
        let mut last = ProviderError::Transport("no attempt made".into());
        for attempt in 1..=attempts {
            match provider.decide(request).await {
                Ok(decision) => return Ok(decision),
                Err(e @ ProviderError::Malformed(_)) => return Err(e),
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        attempt,
                        error = %e,
                        "provider attempt failed"
                    );
                    last = e;
                    if attempt < attempts {
                        tokio::time::sleep(timing.backoff).await;
                    }
                }
            }
        }
        Err(last)
    };
    match tokio::time::timeout(timing.timeout, work).await {
        Ok(outcome) => outcome,
        Err(_) => Err(ProviderError::Timeout(timing.timeout.as_millis() as u64)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Phase;
    use crate::provider::{HeuristicProfile, HeuristicProvider};
    use std::time::Duration;

    fn heuristic(seed: u64) -> Arc<dyn DecisionProvider> {
        Arc::new(HeuristicProvider::new("h", HeuristicProfile::default().with_seed(seed)))
    }

    fn self_playing(seed: u64) -> Session {
        let timing = ProviderTiming::immediate(Duration::from_secs(5));
        let mut s = Session::new(1000, 20, timing, Some(seed));
        for seat in SeatId::ROSTER {
            s = s.with_provider(seat, heuristic(seed + seat.index() as u64));
        }
        s
    }

    #[tokio::test]
    async fn self_playing_table_finishes_hands_and_keeps_chips() {
        let mut s = self_playing(3);
        for _ in 0..5 {
            if s.start_new_hand().is_err() {
                break;
            }
            s.play_until_human().await.unwrap();
            assert!(s.hand().is_over());
            s.verify().unwrap();
            let total: u64 = s.hand().seats().iter().map(|x| x.chips()).sum();
            assert_eq!(total, 3000);
        }
    }

    #[tokio::test]
    async fn human_turn_is_left_alone() {
        let timing = ProviderTiming::immediate(Duration::from_secs(5));
        let mut s = Session::new(1000, 20, timing, Some(1))
            .with_provider(SeatId::OpenAi, heuristic(1))
            .with_provider(SeatId::Claude, heuristic(2));
        s.start_new_hand().unwrap();
        assert_eq!(s.hand().to_act(), Some(SeatId::User));
        assert_eq!(s.request_decision(), None);
        s.play_until_human().await.unwrap();
        assert_eq!(s.hand().phase(), Phase::PreflopBetting);
        assert_eq!(s.hand_id(), 1);
    }
}
