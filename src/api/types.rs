//! Shared types for the API layer.

use std::sync::Arc;

use crate::assessment::HealthAssessor;

/// Shared context for all API routes: the assessor behind an `Arc` so
/// every request handles the same (stateless) pipeline.
#[derive(Clone)]
pub struct ApiContext {
    pub assessor: Arc<HealthAssessor>,
}

impl ApiContext {
    pub fn new(assessor: Arc<HealthAssessor>) -> Self {
        Self { assessor }
    }
}
