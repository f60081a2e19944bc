//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use stockroom::{Assistant, AssistantConfig, Inbound, Reply};
use stockroom_core::{ActorId, AuditEntry, Category, Item, ItemId, NewItem};
use stockroom_store::{AuditLog, LedgerStore, MemoryStore, Result};

/// An assistant over a fresh in-memory store.
pub struct TestFixture {
    pub store: Arc<MemoryStore>,
    pub assistant: Assistant<MemoryStore, MemoryStore>,
}

impl TestFixture {
    /// Create a fixture with the default configuration.
    pub fn new() -> Self {
        Self::with_config(AssistantConfig::default())
    }

    pub fn with_config(config: AssistantConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let assistant = Assistant::new(Arc::clone(&store), Arc::clone(&store), config);
        Self { store, assistant }
    }

    /// Send a text message and return the reply text, if any.
    pub async fn say(&self, actor: ActorId, text: &str) -> Option<String> {
        self.assistant
            .handle(actor, Inbound::text(text))
            .await
            .map(|reply| reply.text)
    }

    /// Press a category-chooser button.
    pub async fn choose(&self, actor: ActorId, category: Category) -> Option<Reply> {
        self.assistant
            .handle(actor, Inbound::choice(category.selector()))
            .await
    }

    /// Run a whole registration conversation and return the final reply.
    pub async fn register(&self, actor: ActorId, category: Category, fields: &str) -> Option<String> {
        self.say(actor, "/add_new").await;
        self.choose(actor, category).await;
        self.say(actor, fields).await
    }

    /// Insert an equipment item directly, bypassing the chat flow.
    pub async fn seed_equipment(&self, name: &str, quantity: i64) -> Result<ItemId> {
        self.store
            .insert(&NewItem::equipment(name, "General", quantity))
            .await
    }

    /// Insert a component item directly, bypassing the chat flow.
    pub async fn seed_component(&self, name: &str, quantity: i64) -> Result<ItemId> {
        self.store
            .insert(&NewItem::component(name, quantity, "Standard", "General"))
            .await
    }

    pub async fn item(&self, category: Category, id: ItemId) -> Result<Option<Item>> {
        self.store.get_by_id(category, id).await
    }

    pub async fn audit(&self) -> Result<Vec<AuditEntry>> {
        self.store.entries().await
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Distinct actor ids for multi-actor tests.
pub fn actors(count: usize) -> Vec<ActorId> {
    (1..=count as i64).map(|i| ActorId(1000 + i)).collect()
}
