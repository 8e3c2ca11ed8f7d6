use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::db::repository::MetricRepository;
use crate::domain::MetricSample;
use crate::error::ApiResult;

#[derive(Default)]
pub struct FakeMetricRepository {
    samples: Mutex<HashMap<Uuid, Vec<MetricSample>>>,
}

impl FakeMetricRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MetricRepository for FakeMetricRepository {
    async fn record(&self, sample: &MetricSample) -> ApiResult<()> {
        self.samples
            .lock()
            .unwrap()
            .entry(sample.instance_id)
            .or_default()
            .push(sample.clone());
        Ok(())
    }

    async fn average_cpu(&self, instance_ids: &[Uuid], window_secs: i64) -> ApiResult<Option<f64>> {
        let cutoff = chrono::Utc::now() - chrono::Duration::seconds(window_secs);
        let samples = self.samples.lock().unwrap();
        let values: Vec<f64> = instance_ids
            .iter()
            .filter_map(|id| samples.get(id))
            .flatten()
            .filter(|s| s.recorded_at >= cutoff)
            .map(|s| s.cpu_percent)
            .collect();
        if values.is_empty() {
            return Ok(None);
        }
        Ok(Some(values.iter().sum::<f64>() / values.len() as f64))
    }
}
