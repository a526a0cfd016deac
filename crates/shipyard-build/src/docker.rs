use crate::context::ContextBuilder;
use crate::engine::{BuildEngine, BuildLogStream, BuildRequest};
use crate::error::{BuildError, Result};
use bollard::Docker;
use bollard::models::BuildInfo;
use bytes::Bytes;
use futures_util::stream::{self, StreamExt};
use http_body_util::{Either, Full};

/// ローカルの Docker デーモンでビルドするエンジン
pub struct DockerEngine {
    docker: Docker,
}

impl DockerEngine {
    pub fn new(docker: Docker) -> Self {
        Self { docker }
    }

    /// ローカルの Docker に接続して疎通を確認
    pub async fn connect() -> Result<Self> {
        let docker = Docker::connect_with_local_defaults()?;
        docker.ping().await?;
        Ok(Self::new(docker))
    }

    #[allow(deprecated)]
    fn start_build(&self, request: BuildRequest) -> Result<BuildLogStream<'_>> {
        tracing::info!("Building image: {}", request.tag);

        let dockerfile = ContextBuilder::dockerfile_in_context(&request.context_dir, &request.dockerfile)?;
        let context_data = ContextBuilder::create_context(&request.context_dir)?;

        let options = bollard::image::BuildImageOptions::<String> {
            dockerfile,
            t: request.tag,
            buildargs: request.build_args,
            rm: true,      // 中間コンテナを削除
            forcerm: true, // ビルド失敗時も中間コンテナを削除
            ..Default::default()
        };

        tracing::debug!("Build options: {:?}", options);

        let body = Full::new(Bytes::from(context_data));
        let stream = self
            .docker
            .build_image(options, None, Some(Either::Left(body)))
            .flat_map(|msg| {
                let lines = match msg {
                    Ok(output) => build_output_lines(output),
                    Err(e) => vec![Err(BuildError::DockerConnection(e))],
                };
                stream::iter(lines)
            });

        Ok(stream.boxed())
    }
}

impl BuildEngine for DockerEngine {
    fn build(&self, request: BuildRequest) -> BuildLogStream<'_> {
        match self.start_build(request) {
            Ok(stream) => stream,
            Err(e) => stream::once(async move { Err(e) }).boxed(),
        }
    }
}

/// ビルド出力をログ行に変換
///
/// エラーを含む出力は最後の要素が `Err` になる。
fn build_output_lines(output: BuildInfo) -> Vec<Result<String>> {
    let mut lines = Vec::new();

    if let Some(text) = output.stream {
        // ビルドステップの出力
        lines.extend(
            text.lines()
                .filter(|line| !line.trim().is_empty())
                .map(|line| Ok(line.to_string())),
        );
    }

    if let Some(status) = output.status {
        // ステータスメッセージ（pull等）
        lines.push(Ok(status));
    }

    if let Some(error) = output.error {
        lines.push(Err(BuildError::BuildFailed(error)));
    } else if let Some(error_detail) = output.error_detail {
        let error_msg = error_detail
            .message
            .unwrap_or_else(|| "Unknown build error".to_string());
        lines.push(Err(BuildError::BuildFailed(error_msg)));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use bollard::models::ErrorDetail;
    use std::collections::HashMap;

    #[test]
    fn test_stream_output_split_into_lines() {
        let output = BuildInfo {
            stream: Some("Step 1/2 : FROM alpine\n ---> 1d34ffeaf190\n\n".to_string()),
            ..Default::default()
        };

        let lines: Vec<String> = build_output_lines(output)
            .into_iter()
            .map(|l| l.unwrap())
            .collect();
        assert_eq!(lines, vec!["Step 1/2 : FROM alpine", " ---> 1d34ffeaf190"]);
    }

    #[test]
    fn test_status_output() {
        let output = BuildInfo {
            status: Some("Pulling from library/alpine".to_string()),
            ..Default::default()
        };

        let lines = build_output_lines(output);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].as_ref().unwrap(), "Pulling from library/alpine");
    }

    #[test]
    fn test_error_detail_becomes_failure() {
        let output = BuildInfo {
            error_detail: Some(ErrorDetail {
                code: Some(1),
                message: Some("The command '/bin/sh -c exit 1' returned a non-zero code: 1".to_string()),
            }),
            ..Default::default()
        };

        let lines = build_output_lines(output);
        assert!(matches!(
            lines.last(),
            Some(Err(BuildError::BuildFailed(msg))) if msg.contains("non-zero code")
        ));
    }

    #[tokio::test]
    #[ignore] // Docker接続が必要なため、通常のテストではスキップ
    async fn test_build_simple_image() {
        use std::fs;
        use tempfile::tempdir;

        let engine = DockerEngine::connect().await.unwrap();

        let temp_dir = tempdir().unwrap();
        let dockerfile = temp_dir.path().join("Dockerfile");
        fs::write(&dockerfile, "FROM alpine:latest\nARG VERSION\nRUN echo $VERSION").unwrap();

        let request = BuildRequest {
            context_dir: temp_dir.path().to_path_buf(),
            dockerfile,
            build_args: HashMap::from([("VERSION".to_string(), "test".to_string())]),
            tag: "shipyard-test:latest".to_string(),
        };

        let results: Vec<Result<String>> = engine.build(request).collect().await;
        assert!(results.iter().all(|r| r.is_ok()));

        // クリーンアップ
        engine
            .docker
            .remove_image(
                "shipyard-test:latest",
                None::<bollard::query_parameters::RemoveImageOptions>,
                None,
            )
            .await
            .ok();
    }
}
