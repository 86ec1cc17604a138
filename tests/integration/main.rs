//! Integration tests for Rockety

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// Binary isolated from the user's config, always in plain output mode
    fn rockety(config: &Path) -> Command {
        let mut cmd = cargo_bin_cmd!("rockety");
        cmd.arg("--config").arg(config).env("CI", "1");
        cmd
    }

    /// Write a config file that keeps the cache inside `dir`
    fn write_config(dir: &Path, extra: &str) -> std::path::PathBuf {
        let path = dir.join("config.toml");
        let cache = dir.join("cache");
        fs::write(
            &path,
            format!(
                "[cache]\nroot = {:?}\n\n[update]\ncheck = false\n\n{}",
                cache.display().to_string(),
                extra
            ),
        )
        .unwrap();
        path
    }

    #[test]
    fn help_displays() {
        let temp = TempDir::new().unwrap();
        rockety(&temp.path().join("none.toml"))
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Scaffold Rockety front-end projects"))
            .stdout(predicate::str::contains("create"));
    }

    #[test]
    fn version_displays() {
        let temp = TempDir::new().unwrap();
        rockety(&temp.path().join("none.toml"))
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("rockety"));
    }

    #[test]
    fn no_command_prints_help() {
        let temp = TempDir::new().unwrap();
        rockety(&temp.path().join("none.toml"))
            .assert()
            .success()
            .stdout(predicate::str::contains("Usage"));
    }

    #[test]
    fn create_without_name_fails() {
        let temp = TempDir::new().unwrap();
        rockety(&temp.path().join("none.toml"))
            .current_dir(temp.path())
            .arg("create")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Project name is required!"));
    }

    #[test]
    fn create_onto_existing_file_fails() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("site"), "not a directory").unwrap();

        rockety(&temp.path().join("none.toml"))
            .current_dir(temp.path())
            .args(["create", "site", "--noupdate", "--yes"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("not a directory"));
    }

    #[test]
    fn create_onto_existing_directory_fails_without_confirmation() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("site")).unwrap();
        fs::write(temp.path().join("site/keep.txt"), "mine").unwrap();

        rockety(&temp.path().join("none.toml"))
            .current_dir(temp.path())
            .args(["create", "site", "--noupdate"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("already exists"));

        assert!(temp.path().join("site/keep.txt").is_file());
    }

    #[test]
    fn proxy_outside_project_fails() {
        let temp = TempDir::new().unwrap();
        rockety(&temp.path().join("none.toml"))
            .current_dir(temp.path())
            .arg("build")
            .assert()
            .failure()
            .stderr(predicate::str::contains(
                "You are not in Rockety project directory!",
            ));
    }

    #[cfg(unix)]
    #[test]
    fn tasks_runs_outside_project() {
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path(), "[proxy]\nrunner = \"echo\"\n");

        rockety(&config)
            .current_dir(temp.path())
            .arg("tasks")
            .assert()
            .success()
            .stdout(predicate::str::contains("--tasks"));
    }

    #[cfg(unix)]
    #[test]
    fn proxy_forwards_to_runner_and_exit_code() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("gulpfile.js"), "").unwrap();
        fs::write(temp.path().join("rockety.yml"), "").unwrap();
        let config = write_config(temp.path(), "[proxy]\nrunner = \"echo\"\n");

        rockety(&config)
            .current_dir(temp.path())
            .arg("tasks")
            .assert()
            .success()
            .stdout(predicate::str::contains("--tasks"));

        let config = write_config(temp.path(), "[proxy]\nrunner = \"false\"\n");
        rockety(&config)
            .current_dir(temp.path())
            .arg("watch")
            .assert()
            .code(1);
    }

    #[test]
    fn cache_list_empty() {
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path(), "");

        rockety(&config)
            .args(["cache", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No cached releases"));
    }

    #[test]
    fn config_path() {
        let temp = TempDir::new().unwrap();
        rockety(&temp.path().join("config.toml"))
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let temp = TempDir::new().unwrap();
        rockety(&temp.path().join("none.toml"))
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[template]"))
            .stdout(predicate::str::contains("Rockety-cli"));
    }

    #[test]
    fn invalid_config_is_reported() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[create]\non_existing = \"sometimes\"\n").unwrap();

        rockety(&path)
            .args(["config", "show"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"));
    }
}

#[cfg(unix)]
mod create_tests {
    use assert_cmd::cargo::cargo_bin_cmd;
    use mockito::Server;
    use predicates::prelude::*;
    use std::fs;
    use std::io::{Cursor, Write};
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn release_zip() -> Vec<u8> {
        release_zip_with_root("ivandokov-rockety-abcdef1")
    }

    fn release_zip_with_root(root: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().unix_permissions(0o644);
        for (path, contents) in [
            ("package.json", "{}"),
            ("gulpfile.js", "// tasks"),
            ("rockety.yml", "name: rockety"),
            ("LICENSE", "MIT"),
        ] {
            writer
                .start_file(format!("{}/{}", root, path), options)
                .unwrap();
            writer.write_all(contents.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn create_downloads_then_reuses_cache() {
        let mut server = Server::new();
        let tags = format!(
            r#"[{{"name":"v2.1.0","zipball_url":"{}/zipball/v2.1.0","commit":{{"sha":"abcdef1234567"}}}}]"#,
            server.url()
        );
        let _tags = server
            .mock("GET", "/repos/ivandokov/rockety/tags")
            .match_header("user-agent", "Rockety-cli")
            .with_status(200)
            .with_body(tags)
            .create();
        let archive = server
            .mock("GET", "/zipball/v2.1.0")
            .with_status(200)
            .with_body(release_zip())
            .expect(1)
            .create();

        let temp = TempDir::new().unwrap();
        let config = temp.path().join("config.toml");
        fs::write(
            &config,
            format!(
                "[template]\napi_base = {url:?}\nweb_base = {url:?}\n\n\
                 [cache]\nroot = {cache:?}\n\n\
                 [install]\nalternate = \"rockety-no-such-package-manager\"\nfallback = \"true\"\n",
                url = server.url(),
                cache = temp.path().join("cache").display().to_string(),
            ),
        )
        .unwrap();

        cargo_bin_cmd!("rockety")
            .current_dir(temp.path())
            .env("CI", "1")
            .arg("--config")
            .arg(&config)
            .args(["create", "first", "--noupdate"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Downloading Rockety v2.1.0"))
            .stdout(predicate::str::contains("Done!"));

        cargo_bin_cmd!("rockety")
            .current_dir(temp.path())
            .env("CI", "1")
            .arg("--config")
            .arg(&config)
            .args(["install", "second", "--noupdate"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Using cached Rockety v2.1.0"));

        archive.assert();
        assert!(temp.path().join("first/gulpfile.js").is_file());
        assert!(temp.path().join("second/package.json").is_file());
        assert!(!temp.path().join("second/LICENSE").exists());
    }

    #[test]
    fn create_reports_failed_install_and_succeeds() {
        let mut server = Server::new();
        let _archive = server
            .mock("GET", "/ivandokov/rockety/archive/master.zip")
            .with_status(200)
            .with_body(release_zip_with_root("rockety-master"))
            .create();

        let temp = TempDir::new().unwrap();
        let config = temp.path().join("config.toml");
        fs::write(
            &config,
            format!(
                "[template]\napi_base = {url:?}\nweb_base = {url:?}\n\n\
                 [cache]\nroot = {cache:?}\n\n\
                 [install]\nalternate = \"rockety-no-such-package-manager\"\nfallback = \"false\"\n",
                url = server.url(),
                cache = temp.path().join("cache").display().to_string(),
            ),
        )
        .unwrap();

        cargo_bin_cmd!("rockety")
            .current_dir(temp.path())
            .env("CI", "1")
            .arg("--config")
            .arg(&config)
            .args(["create", "site", "--dev", "--noupdate"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Dependencies installed with warnings"))
            .stdout(predicate::str::contains("[WARN]"))
            .stdout(predicate::str::contains("false install"))
            .stdout(predicate::str::contains("Done!"));

        assert!(temp.path().join("site/gulpfile.js").is_file());
    }
}
