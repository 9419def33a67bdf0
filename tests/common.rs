#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub fn deosil() -> Command {
    cargo_bin_cmd!("deosil")
}

/// Isolated HOME, config file and database for one test.
pub struct Sandbox {
    pub dir: TempDir,
    pub config: PathBuf,
    pub db: PathBuf,
}

impl Sandbox {
    /// Local-only setup with the anonymous tester identity.
    pub fn new() -> Self {
        Self::with_policy("local")
    }

    /// Tester identity with the given `read_policy`.
    pub fn with_policy(policy: &str) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = dir.path().join("deosil.conf");
        let db = dir.path().join("deosil.sqlite");

        let yaml = format!(
            "database: {}\nidentity: tester\nread_policy: {}\n",
            db.display(),
            policy
        );
        fs::write(&config, yaml).expect("write config");

        Self { dir, config, db }
    }

    pub fn cmd(&self) -> Command {
        let mut c = deosil();
        c.env("HOME", self.dir.path())
            .env_remove("DEOSIL_CONFIG")
            .env_remove("DEOSIL_REMOTE_URL")
            .env_remove("DEOSIL_REMOTE_ANON_KEY")
            .env_remove("DEOSIL_PASSWORD")
            .arg("--config")
            .arg(&self.config);
        c
    }

    /// Sandbox with the schema already created.
    pub fn initialized() -> Self {
        let sb = Self::new();
        sb.cmd().args(["--test", "init"]).assert().success();
        sb
    }
}

pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}
