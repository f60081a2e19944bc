//! The Assistant: one inbound chat message in, at most one reply out.
//!
//! The Assistant brings together the command interpreter, the per-actor
//! registration sessions, the ledger and the audit log.
//!
//! Every mutation is written first and audited after, so the audit log never
//! holds an entry for a change that did not happen. An audit write that fails
//! does not undo the change or hide it from the user; it is reported as an
//! `error` event instead.

use std::sync::Arc;
use std::time::Duration;

use stockroom_core::{
    format_item, format_search_hit, ActionKind, ActorId, AuditRecord, AuditScope, Category, Item,
    ItemId,
};
use stockroom_store::{AdjustOutcome, AuditLog, LedgerStore};
use tracing::{debug, error, info};

use crate::command::{self, Adjustment, Intent, SearchTerm};
use crate::error::Result;
use crate::messages::{self, Inbound, Reply};
use crate::registration::{now_millis, RegistrationSession, RegistrationState, SessionTable};

/// Configuration for the Assistant.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// How long an unfinished registration survives without activity.
    /// `None` keeps it until it is completed or cancelled.
    pub session_ttl: Option<Duration>,
    /// Whether successful searches are audited.
    pub audit_searches: bool,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            session_ttl: None,
            audit_searches: true,
        }
    }
}

/// The main Assistant struct.
///
/// Safe to share between tasks: messages from one actor are handled one at a
/// time in arrival order, messages from different actors concurrently.
pub struct Assistant<L: LedgerStore, A: AuditLog> {
    ledger: Arc<L>,
    audit: Arc<A>,
    sessions: SessionTable,
    config: AssistantConfig,
}

impl<L: LedgerStore, A: AuditLog> Assistant<L, A> {
    /// Create a new assistant.
    pub fn new(ledger: Arc<L>, audit: Arc<A>, config: AssistantConfig) -> Self {
        Self {
            ledger,
            audit,
            sessions: SessionTable::new(),
            config,
        }
    }

    /// Get the ledger reference.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Get the audit log reference.
    pub fn audit_log(&self) -> &A {
        &self.audit
    }

    /// Registration state of an actor, `None` while one of its messages is
    /// being handled.
    pub fn registration_state(&self, actor: ActorId) -> Option<RegistrationState> {
        self.sessions.peek(actor)
    }

    /// Number of actors with a registration in progress.
    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// Forget idle and expired sessions. Returns how many were dropped.
    pub fn prune_sessions(&self) -> usize {
        let pruned = self.sessions.prune(self.config.session_ttl);
        if pruned > 0 {
            debug!(pruned, "pruned registration sessions");
        }
        pruned
    }

    /// Handle one message.
    ///
    /// `None` means the message warrants no reply. Storage failures become a
    /// generic reply and leave the actor's session as it was.
    pub async fn handle(&self, actor: ActorId, inbound: Inbound) -> Option<Reply> {
        let mut session = self.sessions.lock(actor).await;

        if let Some(ttl) = self.config.session_ttl {
            if session.is_expired(ttl, now_millis()) {
                info!(%actor, state = ?session.state(), "registration session expired");
                session.cancel();
            }
        }

        let reply = match self.dispatch(&mut session, inbound).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(%actor, error = %e, "failed to handle message");
                Some(Reply::text(messages::INTERNAL_ERROR))
            }
        };

        self.sessions.release(session);
        reply
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Dispatch
    // ─────────────────────────────────────────────────────────────────────────

    async fn dispatch(&self, session: &mut RegistrationSession, inbound: Inbound) -> Result<Option<Reply>> {
        let text = match inbound {
            Inbound::Choice(value) => return Ok(self.on_choice(session, &value)),
            Inbound::Text(text) => text,
        };

        match command::interpret(&text) {
            Ok(Intent::Unrecognized) => match session.pending_category() {
                Some(_) => self.on_fields(session, &text).await,
                None => Ok(None),
            },
            Ok(intent) => self.on_intent(session, intent).await,
            Err(e) => {
                debug!(actor = %session.actor(), error = %e, "malformed command");
                Ok(Some(Reply::text(e.usage())))
            }
        }
    }

    async fn on_intent(&self, session: &mut RegistrationSession, intent: Intent) -> Result<Option<Reply>> {
        let actor = session.actor();

        let reply = match intent {
            Intent::Start => Reply::text(messages::HELP),
            Intent::Cancel => {
                session.cancel();
                Reply::text(messages::CANCELLED)
            }
            Intent::Search { category, term } => self.search(actor, category, term).await?,
            Intent::Adjust(adjustment) => self.adjust(actor, adjustment).await?,
            Intent::BeginRegistration => {
                session.begin();
                Reply::category_chooser()
            }
            Intent::Unrecognized => return Ok(None),
        };

        Ok(Some(reply))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries and adjustments
    // ─────────────────────────────────────────────────────────────────────────

    async fn search(&self, actor: ActorId, category: Category, term: SearchTerm) -> Result<Reply> {
        match term {
            SearchTerm::Id(id) => {
                let Some(item) = self.ledger.get_by_id(category, id).await? else {
                    debug!(%actor, %category, item_id = %id, "search miss");
                    return Ok(Reply::text(messages::NOT_FOUND));
                };

                let reply = Reply::text(format_item(&item));
                if self.config.audit_searches {
                    self.record(AuditRecord::new(actor, ActionKind::Search, item.category(), item.id))
                        .await;
                }
                Ok(reply)
            }
            SearchTerm::Name(name) => {
                let hits = self.ledger.search_by_name(&name).await?;
                if hits.is_empty() {
                    debug!(%actor, term = %name, "search found nothing");
                    return Ok(Reply::text(messages::NO_RESULTS));
                }

                let reply = Reply::text(search_results(&hits));
                if self.config.audit_searches {
                    self.record(
                        AuditRecord::new(actor, ActionKind::Search, AuditScope::All, ItemId::NONE)
                            .details(format!("search: {name}")),
                    )
                    .await;
                }
                Ok(reply)
            }
        }
    }

    async fn adjust(&self, actor: ActorId, adjustment: Adjustment) -> Result<Reply> {
        let Adjustment { category, id, .. } = adjustment;
        let delta = adjustment.delta();

        match self.ledger.adjust_quantity(category, id, delta).await? {
            AdjustOutcome::Applied(item) => {
                info!(%actor, %category, item_id = %id, delta, quantity = item.quantity, "quantity adjusted");
                self.record(
                    AuditRecord::new(actor, ActionKind::for_delta(delta), category, id)
                        .details(format!("delta {delta}")),
                )
                .await;
                Ok(Reply::text(format!("{}\n{}", messages::UPDATED, format_item(&item))))
            }
            AdjustOutcome::NotFound => {
                debug!(%actor, %category, item_id = %id, delta, "adjust on missing item");
                Ok(Reply::text(messages::UPDATE_FAILED))
            }
            AdjustOutcome::WouldGoNegative { current } => {
                debug!(%actor, %category, item_id = %id, delta, current, "adjust rejected");
                Ok(Reply::text(messages::UPDATE_FAILED))
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Registration
    // ─────────────────────────────────────────────────────────────────────────

    fn on_choice(&self, session: &mut RegistrationSession, value: &str) -> Option<Reply> {
        let category = Category::from_selector(value)?;

        match session.choose(category) {
            Ok(()) => Some(Reply::text(messages::fields_prompt(category))),
            Err(e) => {
                debug!(actor = %session.actor(), error = %e, "ignoring category choice");
                None
            }
        }
    }

    async fn on_fields(&self, session: &mut RegistrationSession, text: &str) -> Result<Option<Reply>> {
        let actor = session.actor();

        let new_item = match session.submit(text) {
            Ok(item) => item,
            Err(e) => {
                debug!(%actor, error = %e, "registration input rejected");
                return Ok(Some(Reply::text(messages::retry(e))));
            }
        };

        let category = new_item.category();
        let details = serde_json::to_string(&new_item)?;

        let id = self.ledger.insert(&new_item).await?;
        info!(%actor, %category, item_id = %id, "item registered");

        self.record(AuditRecord::new(actor, ActionKind::AddNew, category, id).details(details))
            .await;

        session.complete();
        Ok(Some(Reply::text(messages::registered(category, id))))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Audit
    // ─────────────────────────────────────────────────────────────────────────

    /// Append to the audit log. Failure is logged, never propagated.
    async fn record(&self, record: AuditRecord) {
        if let Err(e) = self.audit.append(&record).await {
            error!(
                actor = %record.actor,
                action = %record.action,
                scope = record.scope.as_str(),
                item_id = %record.item_id,
                error = %e,
                "audit write failed"
            );
        }
    }
}

fn search_results(hits: &[Item]) -> String {
    let mut lines = Vec::with_capacity(hits.len() + 1);
    lines.push(messages::SEARCH_RESULTS.to_string());
    lines.extend(hits.iter().map(format_search_hit));
    lines.join("\n")
}
