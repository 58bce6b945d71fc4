use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::prediction::PredictionResult;
use crate::models::property::PropertyInput;

/// Identifies one form submission. Larger tickets were issued later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Terminal state of a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(PredictionResult),
    Failure(String),
}

/// What the result area should show right now.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionPhase {
    Idle,
    Submitting,
    Settled {
        outcome: Outcome,
        settled_at: DateTime<Utc>,
    },
}

#[derive(Debug, Clone)]
pub struct BoardSnapshot {
    pub phase: SubmissionPhase,
    /// Values of the most recent submission, used to refill the form.
    pub input: Option<PropertyInput>,
}

impl BoardSnapshot {
    /// What a client that never submitted sees.
    pub fn idle() -> Self {
        Self {
            phase: SubmissionPhase::Idle,
            input: None,
        }
    }
}

#[derive(Default)]
struct BoardState {
    issued: u64,
    last_input: Option<PropertyInput>,
    settled: Option<(Ticket, Outcome, DateTime<Utc>)>,
}

/// Holds the last displayed prediction and rejects responses that arrive
/// after a newer submission was started.
#[derive(Default)]
pub struct ResultBoard {
    state: RwLock<BoardState>,
}

impl ResultBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a submission. Any earlier in-flight submission becomes stale.
    pub async fn begin(&self, input: &PropertyInput) -> Ticket {
        let mut state = self.state.write().await;
        state.issued += 1;
        state.last_input = Some(input.clone());
        let ticket = Ticket(state.issued);
        debug!(ticket = ticket.0, "Submission started");
        ticket
    }

    /// Record the outcome for `ticket`. Returns `false` (and drops the
    /// outcome) if a newer submission has been started since.
    pub async fn settle(&self, ticket: Ticket, outcome: Outcome) -> bool {
        let mut state = self.state.write().await;
        if ticket.0 != state.issued {
            info!(
                ticket = ticket.0,
                newest = state.issued,
                "Discarding response from superseded submission"
            );
            metrics::counter!("stale_predictions_discarded").increment(1);
            return false;
        }
        state.settled = Some((ticket, outcome, Utc::now()));
        true
    }

    pub async fn snapshot(&self) -> BoardSnapshot {
        let state = self.state.read().await;
        let phase = match &state.settled {
            _ if state.issued == 0 => SubmissionPhase::Idle,
            Some((ticket, outcome, settled_at)) if ticket.0 == state.issued => {
                SubmissionPhase::Settled {
                    outcome: outcome.clone(),
                    settled_at: *settled_at,
                }
            }
            _ => SubmissionPhase::Submitting,
        };
        BoardSnapshot {
            phase,
            input: state.last_input.clone(),
        }
    }
}

/// Boards untouched for this long are dropped on the next submission.
pub const BOARD_IDLE_TTL: Duration = Duration::from_secs(60 * 60);

struct ClientEntry {
    board: Arc<ResultBoard>,
    last_used: Instant,
}

/// One [`ResultBoard`] per browser, keyed by the client cookie.
pub struct ClientBoards {
    boards: RwLock<HashMap<Uuid, ClientEntry>>,
    idle_ttl: Duration,
}

impl Default for ClientBoards {
    fn default() -> Self {
        Self::with_idle_ttl(BOARD_IDLE_TTL)
    }
}

impl ClientBoards {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
        Self {
            boards: RwLock::new(HashMap::new()),
            idle_ttl,
        }
    }

    /// Board of an existing client, if it has submitted before.
    pub async fn get(&self, client: Uuid) -> Option<Arc<ResultBoard>> {
        let mut boards = self.boards.write().await;
        boards.get_mut(&client).map(|entry| {
            entry.last_used = Instant::now();
            entry.board.clone()
        })
    }

    /// Board for `client`, created on first use. Expired boards of other
    /// clients are evicted here; an in-flight submission keeps its own handle.
    pub async fn get_or_create(&self, client: Uuid) -> Arc<ResultBoard> {
        let mut boards = self.boards.write().await;
        let before = boards.len();
        let ttl = self.idle_ttl;
        boards.retain(|id, entry| *id == client || entry.last_used.elapsed() < ttl);
        if boards.len() < before {
            debug!(evicted = before - boards.len(), "Evicted idle result boards");
        }

        let entry = boards.entry(client).or_insert_with(|| ClientEntry {
            board: Arc::new(ResultBoard::new()),
            last_used: Instant::now(),
        });
        entry.last_used = Instant::now();
        entry.board.clone()
    }

    pub async fn client_count(&self) -> usize {
        self.boards.read().await.len()
    }
}
