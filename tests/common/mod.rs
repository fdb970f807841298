use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestEnv {
    _tmp: TempDir,
    pub workdir: PathBuf,
    pub catalog: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let workdir = tmp.path().join("work");
        fs::create_dir_all(&workdir).expect("create isolated workdir");

        let catalog = write_fixture_catalog(tmp.path());

        Self {
            _tmp: tmp,
            workdir,
            catalog,
        }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("guardrails");
        cmd.current_dir(&self.workdir)
            .arg("--catalog")
            .arg(&self.catalog);
        cmd
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let mut cmd = self.cmd();
        let out = cmd
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    pub fn run_json_failure(&self, args: &[&str]) -> Value {
        let mut cmd = self.cmd();
        let out = cmd
            .arg("--json")
            .args(args)
            .assert()
            .failure()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("error json output")
    }

    pub fn summary_path(&self, file: &str) -> PathBuf {
        self.workdir.join(file)
    }
}

fn write_fixture_catalog(base: &Path) -> PathBuf {
    let catalog = serde_json::json!({
        "policies": [
            {
                "display_name": "Allowed locations",
                "service": "General",
                "parameters": [
                    {"name": "listOfAllowedLocations", "kind": "Array"}
                ],
                "compliance": {"NIST SP 800-53 R4": ["AC-4"]}
            },
            {
                "display_name": "Key vaults should have soft delete enabled",
                "service": "Key Vault",
                "compliance": {"CIS Azure 1.3.0": ["8.4"]}
            },
            {
                "display_name": "Secure transfer to storage accounts should be enabled",
                "service": "Storage",
                "compliance": {"CIS Azure 1.3.0": ["3.1"]}
            },
            {
                "display_name": "Storage accounts should restrict network access",
                "service": "Storage",
                "parameters": [
                    {
                        "name": "effect",
                        "kind": "String",
                        "default": "Audit",
                        "allowed": ["Audit", "Deny", "Disabled"]
                    }
                ],
                "compliance": {}
            }
        ]
    });

    let path = base.join("catalog.json");
    fs::write(
        &path,
        serde_json::to_string_pretty(&catalog).expect("serialize catalog"),
    )
    .expect("write fixture catalog");
    path
}
