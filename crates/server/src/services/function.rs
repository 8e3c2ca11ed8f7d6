//! Serverless functions: synchronous invocation over the container engine.
//! `original_source`'s `FunctionService` interface (`ports/function.go`) has
//! no implementation to ground the invoke algorithm on, so this follows the
//! same launch-then-observe shape as `InstanceService::launch`, collapsed to
//! a single run-to-completion call since functions have no persistent
//! container to keep around between invocations.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::db::Repos;
use crate::domain::{Function, FunctionStatus, Invocation, InvocationStatus};
use crate::engine::{ContainerEngine, ContainerSpec, EngineContainerState};
use crate::error::ApiResult;

const INVOCATION_LOG_TAIL: usize = 200;

pub struct FunctionService {
    repos: Repos,
    engine: Arc<dyn ContainerEngine>,
}

impl FunctionService {
    pub fn new(repos: Repos, engine: Arc<dyn ContainerEngine>) -> Self {
        Self { repos, engine }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        user_id: Uuid,
        name: &str,
        runtime: &str,
        handler: &str,
        code_path: &str,
        timeout_sec: i32,
        memory_mb: i32,
    ) -> ApiResult<Function> {
        let now = chrono::Utc::now();
        let function = Function {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            runtime: runtime.to_string(),
            handler: handler.to_string(),
            code_path: code_path.to_string(),
            timeout_sec,
            memory_mb,
            status: FunctionStatus::Active,
            created_at: now,
            updated_at: now,
        };
        self.repos.functions.create(&function).await?;
        Ok(function)
    }

    pub async fn get(&self, id: Uuid) -> ApiResult<Function> {
        self.repos.functions.get_by_id(id).await
    }

    pub async fn list(&self, user_id: Uuid) -> ApiResult<Vec<Function>> {
        self.repos.functions.list(user_id).await
    }

    pub async fn delete(&self, id: Uuid) -> ApiResult<()> {
        self.repos.functions.delete(id).await
    }

    /// Runs the function's image to completion and records the outcome as
    /// an `Invocation`. `payload` is passed as `THECLOUD_EVENT`.
    pub async fn invoke(&self, id: Uuid, payload: &str) -> ApiResult<Invocation> {
        let function = self.repos.functions.get_by_id(id).await?;
        let started_at = chrono::Utc::now();

        let mut env = HashMap::new();
        env.insert("THECLOUD_EVENT".to_string(), payload.to_string());
        env.insert("THECLOUD_HANDLER".to_string(), function.handler.clone());

        let spec = ContainerSpec {
            image: function.runtime.clone(),
            name: format!("thecloud-fn-{}-{}", &function.id.to_string()[..8], started_at.timestamp_millis()),
            ports: Vec::new(),
            env,
            volume_binds: vec![format!("{}:/var/task:ro", function.code_path)],
            network: None,
        };

        let run_result = self.engine.run_container(&spec).await;
        let ended_at = chrono::Utc::now();
        let duration_ms = (ended_at - started_at).num_milliseconds();

        let (status, status_code, logs) = match run_result {
            Ok(container_id) => {
                let state = self
                    .engine
                    .inspect_state(&container_id)
                    .await
                    .unwrap_or(EngineContainerState::Missing);
                let logs = self
                    .engine
                    .fetch_logs(&container_id, INVOCATION_LOG_TAIL)
                    .await
                    .unwrap_or_default();
                let _ = self.engine.remove_container(&container_id, true).await;
                match state {
                    EngineContainerState::Missing => (InvocationStatus::Failed, 1, logs),
                    _ => (InvocationStatus::Succeeded, 0, logs),
                }
            }
            Err(e) => (InvocationStatus::Failed, 1, e.to_string()),
        };

        let invocation = Invocation {
            id: Uuid::new_v4(),
            function_id: id,
            status,
            started_at,
            ended_at: Some(ended_at),
            duration_ms,
            status_code,
            logs,
        };
        self.repos.functions.record_invocation(&invocation).await?;
        Ok(invocation)
    }

    pub async fn logs(&self, function_id: Uuid) -> ApiResult<Vec<Invocation>> {
        self.repos.functions.list_invocations(function_id).await
    }
}
