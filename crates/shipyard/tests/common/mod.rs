use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// テスト用の Dockerfile ツリー
pub struct TestTree {
    pub root: TempDir,
    home: TempDir,
}

impl TestTree {
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
            home: tempfile::tempdir().unwrap(),
        }
    }

    /// `rel_dir/Dockerfile` を作成
    pub fn write_dockerfile(&self, rel_dir: &str) -> PathBuf {
        let dir = self.root.path().join(rel_dir);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("Dockerfile");
        fs::write(&path, "FROM alpine\nARG VERSION\n").unwrap();
        path
    }

    #[allow(dead_code)]
    pub fn write_version(&self, rel_dir: &str, content: &str) {
        let dir = self.root.path().join(rel_dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("version"), content).unwrap();
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// ユーザーの設定ファイルや環境変数の影響を受けない shipyard コマンド
    #[allow(deprecated)]
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("shipyard").unwrap();
        cmd.env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.home.path())
            .env("NO_COLOR", "1")
            .env_remove("SHIPYARD_CONFIG_PATH")
            .env_remove("SHIPYARD_ROOT")
            .env_remove("SHIPYARD_AUTH_URL")
            .env_remove("SHIPYARD_QUERY_URL");
        cmd
    }
}
