//! Service context - dependency container for services

use std::sync::Arc;

use chat_common::{JwtService, PasswordService};
use chat_core::{MessageRepository, Snowflake, SnowflakeGenerator, UserRepository};

use crate::socket::ConnectionManager;
use crate::storage::{MemoryMessageRepository, MemoryUserRepository};

/// Everything a service needs: repositories, token signing, ID generation,
/// and the socket registry used for pushes
#[derive(Clone)]
pub struct ServiceContext {
    user_repo: Arc<dyn UserRepository>,
    message_repo: Arc<dyn MessageRepository>,
    jwt_service: Arc<JwtService>,
    passwords: PasswordService,
    snowflake_generator: Arc<SnowflakeGenerator>,
    connections: Arc<ConnectionManager>,
}

impl ServiceContext {
    /// In-memory repositories and a fresh connection registry
    #[must_use]
    pub fn in_memory(jwt_service: JwtService) -> Self {
        Self {
            user_repo: Arc::new(MemoryUserRepository::new()),
            message_repo: Arc::new(MemoryMessageRepository::new()),
            jwt_service: Arc::new(jwt_service),
            passwords: PasswordService::new(),
            snowflake_generator: Arc::new(SnowflakeGenerator::default()),
            connections: ConnectionManager::new_shared(),
        }
    }

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    pub fn message_repo(&self) -> &dyn MessageRepository {
        self.message_repo.as_ref()
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    pub fn passwords(&self) -> &PasswordService {
        &self.passwords
    }

    pub fn connections(&self) -> &ConnectionManager {
        &self.connections
    }

    /// Shared handle to the connection registry
    pub fn connections_arc(&self) -> Arc<ConnectionManager> {
        Arc::clone(&self.connections)
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("jwt_service", &self.jwt_service)
            .field("connections", &self.connections)
            .finish_non_exhaustive()
    }
}

/// Errors from [`ServiceContextBuilder::build`]
#[derive(Debug, thiserror::Error)]
pub enum ServiceContextError {
    #[error("Missing dependency: {0}")]
    MissingDependency(&'static str),
}

/// Builder for swapping in other repository implementations
#[derive(Default)]
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<dyn UserRepository>>,
    message_repo: Option<Arc<dyn MessageRepository>>,
    jwt_service: Option<Arc<JwtService>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    connections: Option<Arc<ConnectionManager>>,
}

impl ServiceContextBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    #[must_use]
    pub fn message_repo(mut self, repo: Arc<dyn MessageRepository>) -> Self {
        self.message_repo = Some(repo);
        self
    }

    #[must_use]
    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    #[must_use]
    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    #[must_use]
    pub fn connections(mut self, connections: Arc<ConnectionManager>) -> Self {
        self.connections = Some(connections);
        self
    }

    /// # Errors
    /// Returns an error if a repository or the JWT service is missing
    pub fn build(self) -> Result<ServiceContext, ServiceContextError> {
        Ok(ServiceContext {
            user_repo: self
                .user_repo
                .ok_or(ServiceContextError::MissingDependency("user_repo"))?,
            message_repo: self
                .message_repo
                .ok_or(ServiceContextError::MissingDependency("message_repo"))?,
            jwt_service: self
                .jwt_service
                .ok_or(ServiceContextError::MissingDependency("jwt_service"))?,
            passwords: PasswordService::new(),
            snowflake_generator: self.snowflake_generator.unwrap_or_default(),
            connections: self.connections.unwrap_or_default(),
        })
    }
}
