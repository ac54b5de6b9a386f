use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Render metric error reports and small text templates.",
	long_about = "templ renders templates written in a small mustache-like language against \
	              JSON, TOML or YAML data, and produces the standard Glean metric error \
	              report.\n\nQuick start:\n  templ init          Create a templ.toml file\n  \
	              templ render FILE   Render a template\n  templ check FILE    Find unpaired \
	              tags\n  templ report        Write a metric error report"
)]
pub struct TemplCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory, where `templ.toml` is looked up.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Initialize templ in a project by creating a sample `templ.toml`.
	///
	/// If a config file already exists, this command is a no-op and exits
	/// successfully.
	Init,
	/// Render a template file and print the result.
	///
	/// The render context is built from the `[data]` namespaces in
	/// `templ.toml`, then every `--data` file merged at the top level, then
	/// every `--set` assignment.
	Render {
		/// The template file to render.
		template: PathBuf,

		/// A JSON, TOML or YAML file whose top-level object is merged into the
		/// render context. May be repeated; later files win.
		#[arg(long = "data", short = 'd', value_name = "FILE")]
		data: Vec<PathBuf>,

		/// Set a top-level string variable. May be repeated.
		#[arg(long = "set", short = 's', value_name = "KEY=VALUE")]
		set: Vec<String>,

		/// Output format.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,

		/// Compare the output with this file instead of printing it. Exits
		/// with status 1 and prints a diff when they differ.
		#[arg(long, value_name = "EXPECTED")]
		check: Option<PathBuf>,

		/// Watch the project root and render again whenever files change.
		#[arg(long, default_value_t = false)]
		watch: bool,
	},
	/// Render a metric error report.
	///
	/// Values missing from the command line are taken from the `[report]`
	/// table of `templ.toml`. When `template` is set in the config, that file
	/// is used instead of the built-in report.
	Report {
		/// Application id, e.g. `fenix`.
		#[arg(long)]
		application: Option<String>,

		/// Release channel, e.g. `release`.
		#[arg(long)]
		channel: Option<String>,

		/// Full metric name, e.g. `browser.search.in_content`.
		#[arg(long)]
		metric: Option<String>,

		/// Glean error type, e.g. `invalid_value`.
		#[arg(long)]
		error: Option<String>,

		/// First day of the affected range.
		#[arg(long = "from", value_name = "DATE")]
		date_from: Option<String>,

		/// Last day of the affected range.
		#[arg(long = "to", value_name = "DATE")]
		date_to: Option<String>,

		/// Link to a Looker graph showing the errors.
		#[arg(long, value_name = "URL")]
		looker_url: Option<String>,

		/// A saved copy of the application's dictionary `index.json`. The
		/// metric is cleared when the index does not list it.
		#[arg(long, value_name = "FILE")]
		metrics_index: Option<PathBuf>,

		/// Output format.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Report block tags that could not be paired. Exits with status 1 when
	/// any are found.
	Check {
		/// The template file to check.
		template: PathBuf,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// The rendered text, unchanged.
	Text,
	/// The rendered text converted from GitHub flavored markdown to HTML.
	Html,
}
