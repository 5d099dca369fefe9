//! Template runs; untracked

use super::{Pipeline, naming};
use crate::core::codec::{TabularRecord, encode_records};
use crate::core::provider::TemplateProvider;
use crate::utils::error::Result;
use std::time::Duration;
use tracing::info;

impl Pipeline {
    /// Store a header-only template and return its reference
    pub async fn generate_template<R: TabularRecord>(
        &self,
        provider: &dyn TemplateProvider<R>,
    ) -> Result<String> {
        let name = naming::template_name(provider.template_file_name(), self.format());
        self.store_template(provider, &name).await
    }

    /// Store a timestamped template and return a download URL valid for `ttl`
    pub async fn generate_template_download_url<R: TabularRecord>(
        &self,
        provider: &dyn TemplateProvider<R>,
        ttl: Duration,
    ) -> Result<String> {
        let name = naming::timestamped_template_name(provider.template_file_name(), self.format());
        let file_ref = self.store_template(provider, &name).await?;
        self.storage.sign(&file_ref, ttl).await
    }

    async fn store_template<R: TabularRecord>(
        &self,
        provider: &dyn TemplateProvider<R>,
        name: &str,
    ) -> Result<String> {
        let bytes = encode_records::<R>(
            self.codec.as_ref(),
            &R::binding(),
            &provider.headers(),
            &[],
        )?;
        let file_ref = self.store_artifact(None, &bytes, name).await?;
        info!(
            business_type = provider.business_type(),
            file_ref = %file_ref,
            "Template generated"
        );
        Ok(file_ref)
    }
}
