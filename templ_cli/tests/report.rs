mod common;

use predicates::prelude::PredicateBooleanExt;
use templ_core::AnyEmptyResult;

#[test]
fn report_from_flags() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::templ_cmd()
		.arg("report")
		.arg("--application")
		.arg("fenix")
		.arg("--channel")
		.arg("release")
		.arg("--metric")
		.arg("browser.search.in_content")
		.arg("--error")
		.arg("invalid_label")
		.arg("--from")
		.arg("2024-01-01")
		.arg("--to")
		.arg("2024-01-07")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(
			predicates::str::starts_with(
				"We're seeing an increase in invalid_label metric errors for the \
				 [browser.search.in_content](https://dictionary.telemetry.mozilla.org/apps/fenix/metrics/browser_search.in_content) metric.\n",
			)
			.and(predicates::str::contains("Channel: release\n"))
			.and(predicates::str::contains("Date range: 2024-01-01 to 2024-01-07\n"))
			.and(predicates::str::contains("Looker graph: \n")),
		);

	Ok(())
}

#[test]
fn report_flags_override_config_defaults() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join(".templ.toml"),
		"[report]\napplication = \"firefox_ios\"\nchannel = \"nightly\"\nerror = \"invalid_value\"\n",
	)?;

	common::templ_cmd()
		.arg("report")
		.arg("--channel")
		.arg("beta")
		.arg("--metric")
		.arg("a.b")
		.arg("--looker-url")
		.arg("https://mozilla.cloud.looker.com/looks/7")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(
			predicates::str::contains("apps/firefox_ios/metrics/a_b")
				.and(predicates::str::contains("Channel: beta\n"))
				.and(predicates::str::contains("Error: invalid_value\n"))
				.and(predicates::str::contains(
					"Looker graph: https://mozilla.cloud.looker.com/looks/7\n",
				)),
		);

	Ok(())
}

#[test]
fn report_clears_metric_missing_from_index() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let index = tmp.path().join("index.json");
	std::fs::write(&index, r#"{"metrics": [{"name": "a.b"}]}"#)?;

	common::templ_cmd()
		.arg("report")
		.arg("--application")
		.arg("fenix")
		.arg("--metric")
		.arg("c.d")
		.arg("--metrics-index")
		.arg(&index)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"for the [](https://dictionary.telemetry.mozilla.org/apps/fenix/metrics/) metric.",
		))
		.stderr(predicates::str::contains("metric `c.d` is not listed"));

	Ok(())
}

#[test]
fn report_keeps_metric_listed_in_index() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let index = tmp.path().join("index.json");
	std::fs::write(&index, r#"{"metrics": [{"name": "a.b"}]}"#)?;

	common::templ_cmd()
		.arg("report")
		.arg("--application")
		.arg("fenix")
		.arg("--metric")
		.arg("a.b")
		.arg("--metrics-index")
		.arg(&index)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("[a.b]("))
		.stderr(predicates::str::contains("is not listed").not());

	Ok(())
}

#[test]
fn report_rejects_invalid_index() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let index = tmp.path().join("index.json");
	std::fs::write(&index, "not json")?;

	common::templ_cmd()
		.arg("report")
		.arg("--metric")
		.arg("a.b")
		.arg("--metrics-index")
		.arg(&index)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("invalid metrics index"));

	Ok(())
}

#[test]
fn report_uses_configured_template() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("templ.toml"),
		"template = \"short.md\"\n\n[report]\napplication = \"fenix\"\n",
	)?;
	std::fs::write(
		tmp.path().join("short.md"),
		"{{=application_name}}: {{=metric}} ({{%error}})\n",
	)?;

	common::templ_cmd()
		.arg("report")
		.arg("--metric")
		.arg("a.b")
		.arg("--error")
		.arg("<none>")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout("Firefox for Android: a.b (&lt;none&gt;)\n");

	Ok(())
}
