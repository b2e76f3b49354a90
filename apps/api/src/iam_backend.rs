use std::sync::Arc;

use iam_graph_application::{AssignmentGateway, EntityCatalog};
use iam_graph_core::AppResult;
use iam_graph_infrastructure::{HttpIamClient, InMemoryIamRepository};
use tracing::info;

use crate::api_config::IamBackendConfig;

const DEV_SEED_ACTOR: &str = "dev-seed";

/// Both ports served by the configured backing store.
pub struct IamBackend {
    pub name: &'static str,
    pub gateway: Arc<dyn AssignmentGateway>,
    pub catalog: Arc<dyn EntityCatalog>,
}

pub async fn build_iam_backend(config: &IamBackendConfig) -> AppResult<IamBackend> {
    match config {
        IamBackendConfig::Memory { seed_demo_data } => {
            let repository = Arc::new(InMemoryIamRepository::new());
            if *seed_demo_data {
                repository.seed_demo_data(DEV_SEED_ACTOR).await?;
            }

            Ok(IamBackend {
                name: "memory",
                gateway: repository.clone(),
                catalog: repository,
            })
        }
        IamBackendConfig::Http {
            base_url,
            timeout,
            max_attempts,
        } => {
            let client = Arc::new(HttpIamClient::new(
                base_url.clone(),
                *timeout,
                *max_attempts,
            )?);
            info!(%base_url, max_attempts, "using remote IAM backend");

            Ok(IamBackend {
                name: "http",
                gateway: client.clone(),
                catalog: client,
            })
        }
    }
}
