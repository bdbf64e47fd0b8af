use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use todolink_core::{CredentialStore, StorageKey};
use todolink_file::FileStore;
use wiremock::MockServer;

/// Isolated HOME with a credential file inside it.
pub struct TestEnv {
    pub home: tempfile::TempDir,
    pub api: String,
}

impl TestEnv {
    pub fn new(server: &MockServer) -> Self {
        Self {
            home: tempfile::tempdir().unwrap(),
            api: format!("http://127.0.0.1:{}", server.address().port()),
        }
    }

    /// Credential file path passed via `--store`.
    pub fn store_path(&self) -> PathBuf {
        self.home.path().join("credentials.json")
    }

    pub fn store(&self) -> FileStore {
        FileStore::open(self.store_path()).unwrap()
    }

    /// Seed the credential file with a logged-in session.
    pub fn log_in(&self, access: &str, refresh: &str) {
        let store = self.store();
        store.set(StorageKey::AccessToken, access).unwrap();
        store.set(StorageKey::RefreshToken, refresh).unwrap();
    }

    /// Run the CLI against the mock API and this env's credential file.
    pub async fn run(&self, args: &[&str]) -> Output {
        let mut full = vec![
            "--api".to_string(),
            self.api.clone(),
            "--store".to_string(),
            self.store_path().display().to_string(),
        ];
        full.extend(args.iter().map(|a| a.to_string()));
        let home = self.home.path().to_path_buf();

        tokio::task::spawn_blocking(move || run_cli_with_env(&full, &home))
            .await
            .unwrap()
    }

    /// Run and expect success, returning stdout.
    pub async fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args).await;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    /// Run and expect failure, returning stderr.
    pub async fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args).await;
        if output.status.success() {
            panic!("CLI command should have failed: {:?}", args);
        }
        String::from_utf8_lossy(&output.stderr).to_string()
    }
}

/// Run the CLI with a custom HOME directory for isolated storage.
pub fn run_cli_with_env<S: AsRef<str>>(args: &[S], home: &Path) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_todolink"));
    cmd.args(args.iter().map(AsRef::as_ref));
    cmd.env("HOME", home);
    cmd.env("XDG_DATA_HOME", home.join("data"));
    cmd.env_remove("TODOLINK_API");
    cmd.env_remove("TODOLINK_STORE");
    cmd.env("NO_COLOR", "1");
    cmd.output().expect("Failed to execute CLI")
}
