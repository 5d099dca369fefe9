//! Business wiring keyed by business type
//!
//! [`BusinessWiring`] bundles the roles one record type supports;
//! [`BusinessRegistry`] erases the record type so callers can pick a wiring
//! by its string key at run time.

use crate::core::codec::TabularRecord;
use crate::core::pipeline::{ImportResult, Pipeline, TaskHandle};
use crate::core::provider::{ExportProvider, RowProcessor, TemplateProvider};
use crate::utils::error::{PipelineError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Pipeline operations for one business type, independent of its record type
#[async_trait]
pub trait BusinessHandler: Send + Sync {
    fn business_type(&self) -> &str;

    /// Column headers of the business record
    fn headers(&self) -> Vec<String>;

    async fn export(
        &self,
        pipeline: &Pipeline,
        params: &Value,
        created_by: Option<&str>,
    ) -> Result<String>;

    async fn import(
        &self,
        pipeline: &Pipeline,
        source_file_ref: &str,
        created_by: Option<&str>,
    ) -> Result<ImportResult>;

    async fn generate_template(&self, pipeline: &Pipeline) -> Result<String>;

    async fn generate_template_download_url(
        &self,
        pipeline: &Pipeline,
        ttl: Duration,
    ) -> Result<String>;

    async fn submit_export(
        &self,
        pipeline: &Pipeline,
        params: Value,
        created_by: Option<String>,
    ) -> Result<TaskHandle<String>>;

    async fn submit_import(
        &self,
        pipeline: &Pipeline,
        source_file_ref: String,
        created_by: Option<String>,
    ) -> Result<TaskHandle<ImportResult>>;
}

/// The roles one record type plays; any of them may be absent
pub struct BusinessWiring<R: TabularRecord> {
    business_type: String,
    exporter: Option<Arc<dyn ExportProvider<R>>>,
    processor: Option<Arc<dyn RowProcessor<R>>>,
    template: Option<Arc<dyn TemplateProvider<R>>>,
}

impl<R: TabularRecord> BusinessWiring<R> {
    pub fn new(business_type: impl Into<String>) -> Self {
        Self {
            business_type: business_type.into(),
            exporter: None,
            processor: None,
            template: None,
        }
    }

    pub fn with_exporter(mut self, exporter: Arc<dyn ExportProvider<R>>) -> Self {
        self.exporter = Some(exporter);
        self
    }

    pub fn with_processor(mut self, processor: Arc<dyn RowProcessor<R>>) -> Self {
        self.processor = Some(processor);
        self
    }

    pub fn with_template(mut self, template: Arc<dyn TemplateProvider<R>>) -> Self {
        self.template = Some(template);
        self
    }

    fn exporter(&self) -> Result<&Arc<dyn ExportProvider<R>>> {
        self.exporter.as_ref().ok_or_else(|| self.missing("export provider"))
    }

    fn processor(&self) -> Result<&Arc<dyn RowProcessor<R>>> {
        self.processor.as_ref().ok_or_else(|| self.missing("row processor"))
    }

    fn template(&self) -> Result<&Arc<dyn TemplateProvider<R>>> {
        self.template.as_ref().ok_or_else(|| self.missing("template provider"))
    }

    fn missing(&self, role: &str) -> PipelineError {
        PipelineError::not_found(format!(
            "Business type '{}' has no {}",
            self.business_type, role
        ))
    }
}

#[async_trait]
impl<R: TabularRecord> BusinessHandler for BusinessWiring<R> {
    fn business_type(&self) -> &str {
        &self.business_type
    }

    fn headers(&self) -> Vec<String> {
        R::binding().headers()
    }

    async fn export(
        &self,
        pipeline: &Pipeline,
        params: &Value,
        created_by: Option<&str>,
    ) -> Result<String> {
        pipeline
            .export(self.exporter()?.as_ref(), params, created_by)
            .await
    }

    async fn import(
        &self,
        pipeline: &Pipeline,
        source_file_ref: &str,
        created_by: Option<&str>,
    ) -> Result<ImportResult> {
        pipeline
            .import(source_file_ref, self.processor()?.as_ref(), created_by)
            .await
    }

    async fn generate_template(&self, pipeline: &Pipeline) -> Result<String> {
        pipeline.generate_template(self.template()?.as_ref()).await
    }

    async fn generate_template_download_url(
        &self,
        pipeline: &Pipeline,
        ttl: Duration,
    ) -> Result<String> {
        pipeline
            .generate_template_download_url(self.template()?.as_ref(), ttl)
            .await
    }

    async fn submit_export(
        &self,
        pipeline: &Pipeline,
        params: Value,
        created_by: Option<String>,
    ) -> Result<TaskHandle<String>> {
        pipeline
            .submit_export(self.exporter()?.clone(), params, created_by)
            .await
    }

    async fn submit_import(
        &self,
        pipeline: &Pipeline,
        source_file_ref: String,
        created_by: Option<String>,
    ) -> Result<TaskHandle<ImportResult>> {
        pipeline
            .submit_import(source_file_ref, self.processor()?.clone(), created_by)
            .await
    }
}

/// Registered business types
#[derive(Default, Clone)]
pub struct BusinessRegistry {
    handlers: HashMap<String, Arc<dyn BusinessHandler>>,
}

impl BusinessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler; a business type can be registered once
    pub fn register(&mut self, handler: Arc<dyn BusinessHandler>) -> Result<()> {
        let key = handler.business_type().to_string();
        if self.handlers.contains_key(&key) {
            return Err(PipelineError::conflict(format!(
                "Business type '{}' is already registered",
                key
            )));
        }
        info!(business_type = %key, "Registered business type");
        self.handlers.insert(key, handler);
        Ok(())
    }

    pub fn get(&self, business_type: &str) -> Result<Arc<dyn BusinessHandler>> {
        self.handlers.get(business_type).cloned().ok_or_else(|| {
            PipelineError::not_found(format!("Unknown business type: {}", business_type))
        })
    }

    /// Registered keys, sorted
    pub fn business_types(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.handlers.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl std::fmt::Debug for BusinessRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BusinessRegistry")
            .field("business_types", &self.business_types())
            .finish()
    }
}
