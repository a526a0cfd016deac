use crate::error::{BuildError, Result};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::path::Path;
use tar::Builder;

pub struct ContextBuilder;

impl ContextBuilder {
    /// ビルドコンテキストをtar.gzアーカイブとして作成
    pub fn create_context(context_path: &Path) -> Result<Vec<u8>> {
        if !context_path.is_dir() {
            return Err(BuildError::ContextNotFound(context_path.to_path_buf()));
        }

        tracing::debug!("Creating build context from: {}", context_path.display());

        let mut archive_data = Vec::new();
        {
            let encoder = GzEncoder::new(&mut archive_data, Compression::default());
            let mut tar = Builder::new(encoder);

            // コンテキストディレクトリを再帰的に追加
            tar.append_dir_all(".", context_path)?;
            tar.into_inner()?.finish()?;
        }

        tracing::debug!("Build context created: {} bytes", archive_data.len());

        Self::check_context_size(archive_data.len());

        Ok(archive_data)
    }

    /// コンテキスト内での Dockerfile の相対パス
    ///
    /// Docker API はコンテキストルートからの相対パスで Dockerfile を受け取る。
    pub fn dockerfile_in_context(context_path: &Path, dockerfile_path: &Path) -> Result<String> {
        let relative = dockerfile_path.strip_prefix(context_path).map_err(|_| {
            BuildError::InvalidConfig(format!(
                "Dockerfile {} is outside of build context {}",
                dockerfile_path.display(),
                context_path.display()
            ))
        })?;

        relative
            .to_str()
            .map(|s| s.replace('\\', "/"))
            .ok_or_else(|| {
                BuildError::InvalidConfig(format!(
                    "Dockerfile path is not valid UTF-8: {}",
                    dockerfile_path.display()
                ))
            })
    }

    /// コンテキストサイズのチェックと警告
    fn check_context_size(size: usize) {
        const MAX_CONTEXT_SIZE: usize = 500 * 1024 * 1024; // 500MB

        if size > MAX_CONTEXT_SIZE {
            tracing::warn!(
                "警告: ビルドコンテキストが大きすぎます（{}MB）",
                size / 1024 / 1024
            );
        }
    }
}
