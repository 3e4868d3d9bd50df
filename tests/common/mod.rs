//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::net::TcpListener;

use project_api::config::{DatabaseConfig, ServiceConfig};
use project_api::{HttpServer, Project, ProjectRepository, Shutdown, SqliteProjectRepository, StoreError};

/// A server running on an ephemeral port. Stops when dropped.
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the full HTTP stack over `repository`.
pub async fn start_server(repository: Arc<dyn ProjectRepository>) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(ServiceConfig::default(), repository);
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap();

    TestServer {
        addr,
        client,
        shutdown,
    }
}

/// A fresh, empty in-memory store.
#[allow(dead_code)]
pub async fn memory_repository() -> Arc<SqliteProjectRepository> {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        ..DatabaseConfig::default()
    };
    let repository = SqliteProjectRepository::connect(&config).await.unwrap();
    repository.bootstrap().await.unwrap();
    Arc::new(repository)
}

/// Serves a fixed set of projects but rejects every write.
/// With `fail_reads`, listing fails too.
#[allow(dead_code)]
pub struct BrokenStore {
    pub projects: Vec<Project>,
    pub fail_reads: bool,
}

#[allow(dead_code)]
impl BrokenStore {
    pub fn with_titles(titles: &[&str]) -> Self {
        let projects = titles
            .iter()
            .enumerate()
            .map(|(i, title)| {
                let mut project = Project::new(*title);
                project.id = Some(i as i64 + 1);
                project
            })
            .collect();
        Self {
            projects,
            fail_reads: false,
        }
    }
}

#[async_trait]
impl ProjectRepository for BrokenStore {
    async fn find_all(&self) -> Result<Vec<Project>, StoreError> {
        if self.fail_reads {
            return Err(StoreError::Database(sqlx::Error::PoolClosed));
        }
        Ok(self.projects.clone())
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Project>, StoreError> {
        Ok(self.projects.iter().find(|p| p.title == title).cloned())
    }

    async fn save(&self, _project: Project) -> Result<Project, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn delete(&self, _project: &Project) -> Result<(), StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }
}
