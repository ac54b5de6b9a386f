use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub fn templ_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("templ"));
	cmd.env("NO_COLOR", "1").env_remove("TEMPL_LOG");
	cmd
}
