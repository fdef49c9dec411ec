//! Component health aggregation -> {component_status}`).

use std::collections::BTreeMap;

use crate::dto::{ComponentHealth, HealthDto};
use crate::state::AppState;

pub async fn check(state: &AppState) -> HealthDto {
    let mut components = BTreeMap::new();

    components.insert(
        "store".to_string(),
        match state.store.list_recordings(&Default::default(), clinrag_store::Page::default()).await {
            Ok(_) => ComponentHealth { available: true, detail: None },
            Err(e) => ComponentHealth { available: false, detail: Some(e.to_string()) },
        },
    );

    components.insert(
        "vector".to_string(),
        match state.vector.stats().await {
            Ok(_) => ComponentHealth { available: true, detail: None },
            Err(e) => ComponentHealth { available: false, detail: Some(e.to_string()) },
        },
    );

    components.insert("llm".to_string(), ComponentHealth { available: state.llm.is_available().await, detail: None });

    let status = if components.values().all(|c| c.available) { "ok" } else { "degraded" };

    HealthDto { status, components }
}
