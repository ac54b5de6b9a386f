mod common;

use predicates::prelude::PredicateBooleanExt;
use templ_core::AnyEmptyResult;

#[test]
fn render_with_data_files_and_assignments() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let template = tmp.path().join("page.md");
	let data = tmp.path().join("vars.json");
	std::fs::write(
		&template,
		"Hello {{=name}}! {{@items}}{{=_key}}:{{=_val}},{{/@items}}{{!missing}}.{{/!missing}}",
	)?;
	std::fs::write(&data, r#"{"name": "file", "items": ["a", "b"]}"#)?;

	common::templ_cmd()
		.arg("render")
		.arg(&template)
		.arg("--data")
		.arg(&data)
		.arg("--set")
		.arg("name=Ada")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout("Hello Ada! 0:a,1:b,.");

	Ok(())
}

#[test]
fn render_later_data_files_win() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let template = tmp.path().join("page.txt");
	std::fs::write(&template, "{{=a}}{{=b}}")?;
	std::fs::write(tmp.path().join("one.yaml"), "a: 1\nb: 1\n")?;
	std::fs::write(tmp.path().join("two.toml"), "b = 2\n")?;

	common::templ_cmd()
		.arg("render")
		.arg(&template)
		.arg("-d")
		.arg(tmp.path().join("one.yaml"))
		.arg("-d")
		.arg(tmp.path().join("two.toml"))
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout("12");

	Ok(())
}

#[test]
fn render_uses_config_data_namespaces() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("templ.toml"),
		"[data]\nbuild = \"build.json\"\n",
	)?;
	std::fs::write(tmp.path().join("build.json"), r#"{"version": "1.2.3"}"#)?;
	let template = tmp.path().join("version.txt");
	std::fs::write(&template, "v{{=build.version}}\n")?;

	common::templ_cmd()
		.arg("render")
		.arg(&template)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout("v1.2.3\n");

	Ok(())
}

#[test]
fn render_html_output() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let template = tmp.path().join("doc.md");
	std::fs::write(&template, "# {{%title}}\n\n| a |\n| - |\n| 1 |\n")?;

	common::templ_cmd()
		.arg("render")
		.arg(&template)
		.arg("--set")
		.arg("title=Doc")
		.arg("--format")
		.arg("html")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("<h1>Doc</h1>").and(predicates::str::contains("<table>")));

	Ok(())
}

#[test]
fn render_check_matches_expected_file() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let template = tmp.path().join("page.md");
	let expected = tmp.path().join("expected.md");
	std::fs::write(&template, "{{ok}}yes{{:ok}}no{{/ok}}\n")?;
	std::fs::write(&expected, "yes\n")?;

	common::templ_cmd()
		.arg("render")
		.arg(&template)
		.arg("--set")
		.arg("ok=1")
		.arg("--check")
		.arg(&expected)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("output matches"));

	Ok(())
}

#[test]
fn render_check_reports_differences() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let template = tmp.path().join("page.md");
	let expected = tmp.path().join("expected.md");
	std::fs::write(&template, "{{ok}}yes{{:ok}}no{{/ok}}\n")?;
	std::fs::write(&expected, "yes\n")?;

	common::templ_cmd()
		.arg("render")
		.arg(&template)
		.arg("--check")
		.arg(&expected)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(
			predicates::str::contains("output differs")
				.and(predicates::str::contains("-yes"))
				.and(predicates::str::contains("+no"))
				.and(predicates::str::contains("+yes").not())
				.and(predicates::str::contains("-no").not()),
		);

	Ok(())
}

#[test]
fn render_rejects_invalid_assignment() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let template = tmp.path().join("page.md");
	std::fs::write(&template, "{{=a}}")?;

	common::templ_cmd()
		.arg("render")
		.arg(&template)
		.arg("--set")
		.arg("novalue")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("invalid assignment"));

	Ok(())
}

#[test]
fn render_rejects_non_object_data_file() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let template = tmp.path().join("page.md");
	let data = tmp.path().join("list.json");
	std::fs::write(&template, "{{=a}}")?;
	std::fs::write(&data, "[1, 2]")?;

	common::templ_cmd()
		.arg("render")
		.arg(&template)
		.arg("--data")
		.arg(&data)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("list.json").and(predicates::str::contains("object")));

	Ok(())
}

#[test]
fn no_subcommand_exits_with_usage_hint() {
	common::templ_cmd()
		.assert()
		.code(1)
		.stderr(predicates::str::contains("templ --help"));
}
