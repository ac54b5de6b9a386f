mod common;

use templ_core::AnyEmptyResult;
use templ_core::config::TemplConfig;

#[test]
fn can_init() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::templ_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Created templ.toml"));

	let content = std::fs::read_to_string(tmp.path().join("templ.toml"))?;
	assert!(content.contains("[report]"));

	// The generated config loads and supplies report defaults.
	let config = TemplConfig::parse(&content)?;
	assert_eq!(config.report.application, "fenix");
	assert!(config.data.is_empty());

	Ok(())
}

#[test]
fn init_does_not_overwrite() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::create_dir_all(tmp.path().join(".config"))?;
	let config_path = tmp.path().join(".config/templ.toml");
	std::fs::write(&config_path, "existing config")?;

	common::templ_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("already exists"));

	assert_eq!(std::fs::read_to_string(&config_path)?, "existing config");
	assert!(!tmp.path().join("templ.toml").exists());

	Ok(())
}
