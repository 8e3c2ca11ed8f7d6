//! Repository capability traits — the Rust equivalent of the teacher's
//! `DockerOps` abstraction (crates/agent/src/client/docker.rs), but over the
//! relational store instead of the container engine. Each domain service
//! depends on a narrow trait rather than a concrete Postgres type, so tests
//! can satisfy it with an in-memory fake (see `db::fake`).

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::*;
use crate::error::ApiResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> ApiResult<()>;
    async fn get_by_id(&self, id: Uuid) -> ApiResult<User>;
    async fn get_by_email(&self, email: &str) -> ApiResult<Option<User>>;
    async fn update(&self, user: &User) -> ApiResult<()>;
}

#[async_trait]
pub trait ApiKeyRepository: Send + Sync {
    async fn create(&self, key: &ApiKey) -> ApiResult<()>;
    async fn get_by_key(&self, key: &str) -> ApiResult<Option<ApiKey>>;
}

#[async_trait]
pub trait VpcRepository: Send + Sync {
    async fn create(&self, vpc: &Vpc) -> ApiResult<()>;
    async fn get_by_id(&self, id: Uuid) -> ApiResult<Vpc>;
    async fn get_by_name(&self, user_id: Uuid, name: &str) -> ApiResult<Vpc>;
    async fn list(&self, user_id: Uuid) -> ApiResult<Vec<Vpc>>;
    async fn delete(&self, id: Uuid) -> ApiResult<()>;
    /// Count of non-deleted resources referencing this VPC (instances, LBs,
    /// scaling groups, databases, caches) — used to block VPC deletion.
    async fn count_dependents(&self, vpc_id: Uuid) -> ApiResult<i64>;
}

#[async_trait]
pub trait InstanceRepository: Send + Sync {
    async fn create(&self, inst: &Instance) -> ApiResult<()>;
    async fn get_by_id(&self, id: Uuid) -> ApiResult<Instance>;
    async fn get_by_name(&self, user_id: Uuid, name: &str) -> ApiResult<Instance>;
    async fn list(&self, user_id: Uuid) -> ApiResult<Vec<Instance>>;
    /// Optimistic update: fails with `Conflict` if `inst.version` is stale.
    async fn update(&self, inst: &mut Instance) -> ApiResult<()>;
    async fn delete(&self, id: Uuid) -> ApiResult<()>;
    async fn attach_volume(&self, attachment: &VolumeAttachment) -> ApiResult<()>;
    async fn detach_volume(&self, instance_id: Uuid, volume_id: Uuid) -> ApiResult<()>;
}

#[async_trait]
pub trait VolumeRepository: Send + Sync {
    async fn create(&self, vol: &Volume) -> ApiResult<()>;
    async fn get_by_id(&self, id: Uuid) -> ApiResult<Volume>;
    async fn list(&self, user_id: Uuid) -> ApiResult<Vec<Volume>>;
    async fn update(&self, vol: &mut Volume) -> ApiResult<()>;
    async fn delete(&self, id: Uuid) -> ApiResult<()>;
}

#[async_trait]
pub trait LbRepository: Send + Sync {
    async fn create(&self, lb: &LoadBalancer) -> ApiResult<()>;
    async fn get_by_id(&self, id: Uuid) -> ApiResult<LoadBalancer>;
    async fn get_by_idempotency_key(&self, key: &str) -> ApiResult<Option<LoadBalancer>>;
    async fn list(&self, user_id: Uuid) -> ApiResult<Vec<LoadBalancer>>;
    async fn list_all(&self) -> ApiResult<Vec<LoadBalancer>>;
    async fn update(&self, lb: &mut LoadBalancer) -> ApiResult<()>;
    async fn delete(&self, id: Uuid) -> ApiResult<()>;

    async fn add_target(&self, target: &LbTarget) -> ApiResult<()>;
    async fn remove_target(&self, lb_id: Uuid, instance_id: Uuid) -> ApiResult<()>;
    async fn list_targets(&self, lb_id: Uuid) -> ApiResult<Vec<LbTarget>>;
    async fn target_exists(&self, lb_id: Uuid, instance_id: Uuid) -> ApiResult<bool>;
}

#[async_trait]
pub trait ScalingRepository: Send + Sync {
    async fn create_group(&self, group: &ScalingGroup) -> ApiResult<()>;
    async fn get_group_by_id(&self, id: Uuid) -> ApiResult<ScalingGroup>;
    async fn get_group_by_idempotency_key(&self, key: &str) -> ApiResult<Option<ScalingGroup>>;
    async fn list_groups(&self, user_id: Uuid) -> ApiResult<Vec<ScalingGroup>>;
    async fn list_active_groups(&self) -> ApiResult<Vec<ScalingGroup>>;
    async fn list_deleting_groups(&self) -> ApiResult<Vec<ScalingGroup>>;
    async fn count_groups_by_vpc(&self, vpc_id: Uuid) -> ApiResult<i64>;
    async fn update_group(&self, group: &mut ScalingGroup) -> ApiResult<()>;
    async fn delete_group(&self, id: Uuid) -> ApiResult<()>;

    async fn add_member(&self, group_id: Uuid, instance_id: Uuid) -> ApiResult<()>;
    async fn remove_member(&self, group_id: Uuid, instance_id: Uuid) -> ApiResult<()>;
    async fn list_members(&self, group_id: Uuid) -> ApiResult<Vec<Uuid>>;

    async fn create_policy(&self, policy: &ScalingPolicy) -> ApiResult<()>;
    async fn get_policy(&self, id: Uuid) -> ApiResult<ScalingPolicy>;
    /// Policies for a group, ordered by creation time ascending (tie-break order).
    async fn list_policies(&self, group_id: Uuid) -> ApiResult<Vec<ScalingPolicy>>;
    async fn update_policy(&self, policy: &ScalingPolicy) -> ApiResult<()>;
    async fn delete_policy(&self, id: Uuid) -> ApiResult<()>;
}

#[async_trait]
pub trait MetricRepository: Send + Sync {
    async fn record(&self, sample: &MetricSample) -> ApiResult<()>;
    /// Average CPU percent across `instance_ids` within the trailing `window_secs`.
    /// Returns `None` when no samples fall in the window.
    async fn average_cpu(&self, instance_ids: &[Uuid], window_secs: i64) -> ApiResult<Option<f64>>;
}

#[async_trait]
pub trait DatabaseRepository: Send + Sync {
    async fn create(&self, db: &Database) -> ApiResult<()>;
    async fn get_by_id(&self, id: Uuid) -> ApiResult<Database>;
    async fn list(&self, user_id: Uuid) -> ApiResult<Vec<Database>>;
    async fn update(&self, db: &Database) -> ApiResult<()>;
    async fn delete(&self, id: Uuid) -> ApiResult<()>;
}

#[async_trait]
pub trait CacheRepository: Send + Sync {
    async fn create(&self, cache: &Cache) -> ApiResult<()>;
    async fn get_by_id(&self, id: Uuid) -> ApiResult<Cache>;
    async fn list(&self, user_id: Uuid) -> ApiResult<Vec<Cache>>;
    async fn update(&self, cache: &Cache) -> ApiResult<()>;
    async fn delete(&self, id: Uuid) -> ApiResult<()>;
}

#[async_trait]
pub trait FunctionRepository: Send + Sync {
    async fn create(&self, f: &Function) -> ApiResult<()>;
    async fn get_by_id(&self, id: Uuid) -> ApiResult<Function>;
    async fn list(&self, user_id: Uuid) -> ApiResult<Vec<Function>>;
    async fn delete(&self, id: Uuid) -> ApiResult<()>;

    async fn record_invocation(&self, inv: &Invocation) -> ApiResult<()>;
    async fn list_invocations(&self, function_id: Uuid) -> ApiResult<Vec<Invocation>>;
}

#[async_trait]
pub trait SecretRepository: Send + Sync {
    async fn create(&self, secret: &Secret) -> ApiResult<()>;
    async fn get_by_id(&self, id: Uuid) -> ApiResult<Secret>;
    async fn get_by_name(&self, user_id: Uuid, name: &str) -> ApiResult<Option<Secret>>;
    async fn list(&self, user_id: Uuid) -> ApiResult<Vec<Secret>>;
    async fn touch_accessed(&self, id: Uuid) -> ApiResult<()>;
    async fn delete(&self, id: Uuid) -> ApiResult<()>;
}

#[async_trait]
pub trait StorageRepository: Send + Sync {
    async fn put(&self, object: &StorageObject) -> ApiResult<()>;
    async fn get(&self, user_id: Uuid, bucket: &str, key: &str) -> ApiResult<StorageObject>;
    async fn list(&self, user_id: Uuid, bucket: &str) -> ApiResult<Vec<StorageObject>>;
    async fn delete(&self, user_id: Uuid, bucket: &str, key: &str) -> ApiResult<()>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn append(&self, event: &Event) -> ApiResult<()>;
    async fn list_recent(&self, limit: i64) -> ApiResult<Vec<Event>>;
}
