//! Typed request dispatch for downloads and Ollama calls.
//!
//! Every integration call a command makes is one [`ServiceRequest`]
//! value answered by the matching [`ServiceResponse`] variant, so all
//! handlers see the same outcome shapes and error surface.

use crate::context::AppContext;
use anyhow::{bail, Result};
use lotlift_core::AppConfig;
use lotlift_harvest::{download_images, DownloadReport};
use lotlift_llm::{ModelInfo, OllamaClient};
use lotlift_store::settings::{get_string, keys};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One request to an outside integration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub(crate) enum ServiceRequest {
    /// Download photos into a folder under the download directory.
    #[serde(rename_all = "camelCase")]
    DownloadImages {
        images: Vec<String>,
        folder_name: String,
    },
    /// List the models installed on the Ollama server.
    ListModels,
    /// Generate text with a model.
    Generate { model: String, prompt: String },
    /// Pull a model onto the Ollama server.
    PullModel { name: String },
}

/// The answer to one [`ServiceRequest`], variant for variant.
#[derive(Debug)]
pub(crate) enum ServiceResponse {
    Downloaded(DownloadReport),
    Models(Vec<ModelInfo>),
    Generated(String),
    Pulled,
}

/// Execute one request against the configured integrations.
pub(crate) async fn dispatch(
    ctx: &AppContext,
    request: ServiceRequest,
) -> Result<ServiceResponse> {
    match request {
        ServiceRequest::DownloadImages {
            images,
            folder_name,
        } => {
            let dir = download_dir(&ctx.config)?.join(folder_name);
            let report = download_images(&images, &dir, ctx.config.download.delay_ms).await?;
            Ok(ServiceResponse::Downloaded(report))
        }
        ServiceRequest::ListModels => {
            let client = ollama_client(ctx).await?;
            Ok(ServiceResponse::Models(client.list_models().await?))
        }
        ServiceRequest::Generate { model, prompt } => {
            let client = ollama_client(ctx).await?;
            Ok(ServiceResponse::Generated(client.generate(&model, &prompt).await?))
        }
        ServiceRequest::PullModel { name } => {
            let client = ollama_client(ctx).await?;
            client.pull_model(&name).await?;
            Ok(ServiceResponse::Pulled)
        }
    }
}

/// Download photos for a listing into `folder_name`.
pub(crate) async fn download_to_folder(
    ctx: &AppContext,
    images: &[String],
    folder_name: &str,
) -> Result<DownloadReport> {
    let request = ServiceRequest::DownloadImages {
        images: images.to_vec(),
        folder_name: folder_name.to_string(),
    };
    match dispatch(ctx, request).await? {
        ServiceResponse::Downloaded(report) => Ok(report),
        response => bail!("mismatched response for downloadImages: {response:?}"),
    }
}

/// List the models installed on the Ollama server.
pub(crate) async fn list_models(ctx: &AppContext) -> Result<Vec<ModelInfo>> {
    match dispatch(ctx, ServiceRequest::ListModels).await? {
        ServiceResponse::Models(models) => Ok(models),
        response => bail!("mismatched response for listModels: {response:?}"),
    }
}

/// Generate text with a model.
pub(crate) async fn generate(ctx: &AppContext, model: &str, prompt: &str) -> Result<String> {
    let request = ServiceRequest::Generate {
        model: model.to_string(),
        prompt: prompt.to_string(),
    };
    match dispatch(ctx, request).await? {
        ServiceResponse::Generated(text) => Ok(text),
        response => bail!("mismatched response for generate: {response:?}"),
    }
}

/// Pull a model onto the Ollama server.
pub(crate) async fn pull_model(ctx: &AppContext, name: &str) -> Result<()> {
    let request = ServiceRequest::PullModel {
        name: name.to_string(),
    };
    match dispatch(ctx, request).await? {
        ServiceResponse::Pulled => Ok(()),
        response => bail!("mismatched response for pullModel: {response:?}"),
    }
}

/// Downloads land under the configured directory, or a `downloads`
/// folder in the data directory when none is set.
pub(crate) fn download_dir(config: &AppConfig) -> Result<PathBuf> {
    match &config.download.dir {
        Some(dir) => Ok(dir.clone()),
        None => Ok(AppConfig::data_dir()?.join("downloads")),
    }
}

/// Build an Ollama client against the stored server URL, or the
/// configured one when none has been saved.
async fn ollama_client(ctx: &AppContext) -> Result<OllamaClient> {
    let mut ollama = ctx.config.ollama.clone();
    if let Some(url) = get_string(ctx.store.pool(), keys::OLLAMA_URL).await? {
        ollama.url = url;
    }
    Ok(OllamaClient::new(&ollama)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_request_wire_shape() {
        let request = ServiceRequest::DownloadImages {
            images: vec!["https://photos.example.com/a.jpg".to_string()],
            folder_name: "2018_Chevrolet_Equinox_Premier".to_string(),
        };

        let value = serde_json::to_value(&request).expect("serialize request");
        assert_eq!(value["action"], "downloadImages");
        assert_eq!(value["folderName"], "2018_Chevrolet_Equinox_Premier");
        assert_eq!(value["images"][0], "https://photos.example.com/a.jpg");
    }

    #[test]
    fn test_ollama_request_wire_shapes() {
        let value = serde_json::to_value(ServiceRequest::ListModels).expect("serialize");
        assert_eq!(value, serde_json::json!({"action": "listModels"}));

        let value = serde_json::to_value(ServiceRequest::Generate {
            model: "llama3.2:3b".to_string(),
            prompt: "Write a description".to_string(),
        })
        .expect("serialize");
        assert_eq!(value["action"], "generate");
        assert_eq!(value["model"], "llama3.2:3b");

        let value = serde_json::to_value(ServiceRequest::PullModel {
            name: "mistral".to_string(),
        })
        .expect("serialize");
        assert_eq!(value, serde_json::json!({"action": "pullModel", "name": "mistral"}));
    }

    #[test]
    fn test_request_round_trip() {
        let request = ServiceRequest::Generate {
            model: "llama3.2:3b".to_string(),
            prompt: "Write a description".to_string(),
        };
        let json = serde_json::to_string(&request).expect("serialize");
        let back: ServiceRequest = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, request);
    }

    #[test]
    fn test_download_dir_prefers_configured() {
        let mut config = AppConfig::default();
        config.download.dir = Some(PathBuf::from("/tmp/lotlift-photos"));
        let dir = download_dir(&config).expect("resolve dir");
        assert_eq!(dir, PathBuf::from("/tmp/lotlift-photos"));
    }
}
