//! Managed database lifecycle — same create/engine-container/status-machine
//! pattern as `InstanceService`, simplified to a single container (no ports
//! parsing, no volumes) since only engine/version/port/credentials vary.

use std::sync::Arc;

use uuid::Uuid;

use crate::db::Repos;
use crate::domain::{Database, DbEngine, ManagedStatus};
use crate::engine::{ContainerEngine, ContainerSpec};
use crate::error::{ApiError, ApiResult};

const DEFAULT_POSTGRES_PORT: i32 = 5432;
const DEFAULT_MYSQL_PORT: i32 = 3306;

pub struct DatabaseService {
    repos: Repos,
    engine: Arc<dyn ContainerEngine>,
}

impl DatabaseService {
    pub fn new(repos: Repos, engine: Arc<dyn ContainerEngine>) -> Self {
        Self { repos, engine }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        name: &str,
        engine: &str,
        version: &str,
        vpc_id: Option<Uuid>,
    ) -> ApiResult<Database> {
        let db_engine = match engine {
            "postgres" => DbEngine::Postgres,
            "mysql" => DbEngine::Mysql,
            other => return Err(ApiError::InvalidInput(format!("unknown database engine '{other}'"))),
        };
        let port = match db_engine {
            DbEngine::Postgres => DEFAULT_POSTGRES_PORT,
            DbEngine::Mysql => DEFAULT_MYSQL_PORT,
        };

        let network = match vpc_id {
            Some(id) => Some(self.repos.vpcs.get_by_id(id).await?.network_id),
            None => None,
        };

        let credentials = generate_credentials();
        let image = format!("{engine}:{version}");
        let container_name = format!("thecloud-db-{name}");
        let container_id = self
            .engine
            .run_container(&ContainerSpec {
                image,
                name: container_name,
                ports: vec![(port as u16, port as u16)],
                env: Default::default(),
                volume_binds: Vec::new(),
                network,
            })
            .await
            .map_err(ApiError::internal)?;

        let now = chrono::Utc::now();
        let db = Database {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            engine: db_engine,
            version: version.to_string(),
            status: ManagedStatus::Running,
            vpc_id,
            container_id: Some(container_id),
            port,
            credentials,
            created_at: now,
            updated_at: now,
        };
        self.repos.databases.create(&db).await?;
        Ok(db)
    }

    pub async fn get(&self, id: Uuid) -> ApiResult<Database> {
        self.repos.databases.get_by_id(id).await
    }

    pub async fn list(&self, user_id: Uuid) -> ApiResult<Vec<Database>> {
        self.repos.databases.list(user_id).await
    }

    pub fn connection_string(&self, db: &Database) -> String {
        db.connection_string()
    }

    pub async fn delete(&self, id: Uuid) -> ApiResult<()> {
        let db = self.repos.databases.get_by_id(id).await?;
        if let Some(container_id) = &db.container_id {
            let _ = self.engine.remove_container(container_id, true).await;
        }
        self.repos.databases.delete(id).await?;
        Ok(())
    }
}

fn generate_credentials() -> String {
    format!("thecloud:{}", crate::auth::crypto::random_token(16))
}
