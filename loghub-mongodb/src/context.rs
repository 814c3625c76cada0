//! Connection handling, collection provisioning, and the write/query
//! gateway.

use bson::doc;
use mea::rwlock::RwLock;
use mongodb::options::{ClientOptions, CreateCollectionOptions, FindOptions};
use mongodb::{Client, Collection, Cursor, Database};
use serde::Serialize;
use serde::de::DeserializeOwned;

use loghub_core::error::{LogError, LogResult};
use loghub_core::query::{Query, QueryVisitor, SortDirection};

use crate::options::MongoLoggerOptions;
use crate::query::MongoQueryTranslator;

/// The adapter's database context: one long-lived client plus the target
/// collection's provisioning state.
///
/// The client is created once and shared; concurrent use from multiple tasks
/// is delegated to the driver's own guarantees. Provisioning runs at most
/// once per context. The list-then-create sequence is not atomic against
/// concurrent creators in other processes; a lost race surfaces as the
/// server's creation error, unchanged.
#[derive(Debug)]
pub struct MongoLogContext {
    client: Client,
    database: String,
    options: MongoLoggerOptions,
    provisioned: RwLock<bool>,
}

impl MongoLogContext {
    /// Validates the options, connects, and provisions the collection unless
    /// `on_demand` defers that to first use.
    pub async fn connect(options: MongoLoggerOptions) -> LogResult<Self> {
        options.validate()?;

        let database_url = options.database_url.as_deref().ok_or_else(|| {
            LogError::InvalidOptions("`database_url` is required to connect".into())
        })?;
        let client_options = ClientOptions::parse(database_url)
            .await
            .map_err(LogError::backend)?;
        let database = client_options.default_database.clone().ok_or_else(|| {
            LogError::InvalidOptions(format!(
                "`database_url` must name a database, e.g. `mongodb://host:27017/Logging`, got `{database_url}`"
            ))
        })?;
        let client = Client::with_options(client_options).map_err(LogError::backend)?;

        let context = Self {
            client,
            database,
            options,
            provisioned: RwLock::new(false),
        };
        if !context.options.on_demand {
            context.provision().await?;
        }
        Ok(context)
    }

    /// The options this context was built with.
    pub fn options(&self) -> &MongoLoggerOptions {
        &self.options
    }

    fn database(&self) -> Database {
        self.client.database(&self.database)
    }

    /// Ensures the target collection exists, creating it if absent.
    ///
    /// Existence is a case-sensitive exact match against the database's
    /// collection names. Capped sizing options are passed atomically at
    /// creation time, and only when `capped` is set; an uncapped collection
    /// is created plain. Idempotent once this context has observed the
    /// collection.
    async fn provision(&self) -> LogResult<()> {
        if *self.provisioned.read().await {
            return Ok(());
        }
        let mut provisioned = self.provisioned.write().await;
        if *provisioned {
            return Ok(());
        }

        let database = self.database();
        let existing = database
            .list_collection_names()
            .await
            .map_err(LogError::backend)?;
        if !existing
            .iter()
            .any(|name| name == &self.options.collection_name)
        {
            let mut create = database.create_collection(&self.options.collection_name);
            if self.options.capped {
                create = create.with_options(
                    CreateCollectionOptions::builder()
                        .capped(true)
                        .size(self.options.max_size)
                        .max(self.options.max_documents)
                        .build(),
                );
            }
            create.await.map_err(LogError::backend)?;
            tracing::debug!(
                collection = %self.options.collection_name,
                capped = self.options.capped,
                "created log collection"
            );
        }

        *provisioned = true;
        Ok(())
    }

    pub(crate) async fn collection<T: Send + Sync>(&self) -> LogResult<Collection<T>> {
        self.provision().await?;
        Ok(self.database().collection(&self.options.collection_name))
    }

    /// Inserts one document into the provisioned collection.
    ///
    /// One round trip, no batching, no retry; driver failures propagate.
    pub async fn insert_one<T: Serialize + Send + Sync>(&self, document: &T) -> LogResult<()> {
        let collection = self.collection::<T>().await?;
        collection
            .insert_one(document)
            .await
            .map_err(LogError::backend)?;
        Ok(())
    }

    /// Runs a query against the provisioned collection.
    ///
    /// An absent filter matches every document. Returns the driver's cursor,
    /// a lazy stream the caller consumes as a sequence.
    pub async fn find<T>(&self, query: Query) -> LogResult<Cursor<T>>
    where
        T: DeserializeOwned + Send + Sync,
    {
        let collection = self.collection::<T>().await?;

        let filter = match &query.filter {
            Some(expr) => MongoQueryTranslator.visit_expr(expr)?,
            None => doc! {},
        };

        let mut options = FindOptions::default();
        if let Some(limit) = query.limit {
            options.limit = Some(limit as i64);
        }
        if let Some(offset) = query.offset {
            options.skip = Some(offset as u64);
        }
        if let Some(sort) = &query.sort {
            options.sort = Some(doc! {
                sort.field.clone(): match sort.direction {
                    SortDirection::Asc => 1,
                    SortDirection::Desc => -1,
                }
            });
        }

        collection
            .find(filter)
            .with_options(options)
            .await
            .map_err(LogError::backend)
    }

    /// Releases the client and its connection pool.
    pub async fn shutdown(self) {
        self.client.shutdown().await;
    }
}
