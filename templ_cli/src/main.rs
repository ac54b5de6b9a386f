use std::path::Path;
use std::path::PathBuf;
use std::process;
use std::sync::mpsc;
use std::sync::mpsc::RecvTimeoutError;
use std::time::Duration;
use std::time::Instant;

use clap::Parser;
use owo_colors::OwoColorize;
use serde_json::Value;
use similar::ChangeTag;
use similar::TextDiff;
use templ_cli::Commands;
use templ_cli::OutputFormat;
use templ_cli::TemplCli;
use templ_core::AnyEmptyResult;
use templ_core::AnyResult;
use templ_core::Debouncer;
use templ_core::ParseDiagnostic;
use templ_core::TemplError;
use templ_core::Template;
use templ_core::config::CONFIG_FILE_CANDIDATES;
use templ_core::config::TemplConfig;
use templ_core::config::load_context_file;
use templ_core::report::MetricsIndex;
use templ_core::report::ReportRequest;
use templ_core::report::reconcile_metric;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

/// Quiet period after the last file change before a watched template is
/// rendered again.
const WATCH_DEBOUNCE: Duration = Duration::from_millis(200);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = TemplCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_logging(args.verbose);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Render {
			template,
			data,
			set,
			format,
			check,
			watch,
		}) => {
			let options = RenderOptions {
				template,
				data,
				set,
				format: *format,
				check: check.as_deref(),
			};
			run_render(&args, &options, *watch)
		}
		Some(Commands::Report {
			application,
			channel,
			metric,
			error,
			date_from,
			date_to,
			looker_url,
			metrics_index,
			format,
		}) => {
			let request = ReportRequest {
				application: application.clone().unwrap_or_default(),
				channel: channel.clone().unwrap_or_default(),
				metric: metric.clone().unwrap_or_default(),
				error: error.clone().unwrap_or_default(),
				date_from: date_from.clone().unwrap_or_default(),
				date_to: date_to.clone().unwrap_or_default(),
				looker_url: looker_url.clone(),
			};
			run_report(&args, request, metrics_index.as_deref(), *format)
		}
		Some(Commands::Check { template }) => run_check(template),
		None => {
			eprintln!("No subcommand specified. Run `templ --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<TemplError>() {
			Ok(templ_err) => {
				let report: miette::Report = (*templ_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Send `tracing` output to stderr. `TEMPL_LOG` takes an `EnvFilter`
/// directive such as `templ_core=trace`.
fn init_logging(verbose: bool) {
	let default_level = if verbose { "debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_env("TEMPL_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.without_time()
		.with_target(false)
		.try_init()
		.ok();
}

fn resolve_root(args: &TemplCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn load_config(root: &Path) -> AnyResult<TemplConfig> {
	Ok(TemplConfig::load(root)?.unwrap_or_default())
}

fn run_init(args: &TemplCli) -> AnyEmptyResult {
	let root = resolve_root(args);

	if let Some(existing) = TemplConfig::resolve_path(&root) {
		println!("Config file already exists: {}", existing.display());
		return Ok(());
	}

	let sample_config = "# templ configuration\n\n# A custom report template, used by `templ \
	                     report` instead of the built-in one.\n# template = \
	                     \"report.md\"\n\n# Map data files to template namespaces.\n# Values \
	                     from these files are available in templates as {{=namespace.key}}.\n# \
	                     [data]\n# build = \"build.json\"\n# release = { path = \"release-info\", \
	                     format = \"yaml\" }\n\n# Defaults for `templ report`. Command line flags \
	                     take precedence.\n[report]\napplication = \"fenix\"\nchannel = \
	                     \"release\"\n";

	let config_name = CONFIG_FILE_CANDIDATES[0];
	let config_path = root.join(config_name);
	std::fs::write(&config_path, sample_config)?;
	println!("Created {config_name}");
	println!();
	println!("Next steps:");
	println!("  1. Fill in the [report] defaults in {}", config_path.display());
	println!("  2. Run `templ report --metric <name> --error <type>`");

	Ok(())
}

struct RenderOptions<'a> {
	template: &'a Path,
	data: &'a [PathBuf],
	set: &'a [String],
	format: OutputFormat,
	check: Option<&'a Path>,
}

fn run_render(args: &TemplCli, options: &RenderOptions<'_>, watch: bool) -> AnyEmptyResult {
	let matches = run_render_once(args, options)?;

	if !watch {
		if !matches {
			process::exit(1);
		}
		return Ok(());
	}

	// Watch mode
	eprintln!("\nWatching for file changes... (press Ctrl+C to stop)");

	let root = resolve_root(args);
	let (tx, rx) = mpsc::channel();

	let mut watcher =
		notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
			if let Ok(event) = res {
				if matches!(
					event.kind,
					notify::EventKind::Modify(_) | notify::EventKind::Create(_)
				) {
					let _ = tx.send(());
				}
			}
		})?;

	use notify::Watcher;
	watcher.watch(&root, notify::RecursiveMode::Recursive)?;
	if !options.template.starts_with(&root) {
		watcher.watch(options.template, notify::RecursiveMode::NonRecursive)?;
	}

	let mut debouncer = Debouncer::new(WATCH_DEBOUNCE);

	loop {
		let changed = match debouncer.deadline() {
			Some(deadline) => {
				match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
					Ok(()) => true,
					Err(RecvTimeoutError::Timeout) => false,
					Err(RecvTimeoutError::Disconnected) => return Err("file watcher stopped".into()),
				}
			}
			None => {
				rx.recv()?;
				true
			}
		};

		let now = Instant::now();
		if changed {
			debouncer.call(now);
		}

		if debouncer.poll(now) {
			eprintln!("\nFile change detected, rendering...");
			if let Err(e) = run_render_once(args, options) {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
	}
}

/// Render once and either print the output or compare it with the expected
/// file. Returns `false` when a comparison found a difference.
fn run_render_once(args: &TemplCli, options: &RenderOptions<'_>) -> AnyResult<bool> {
	let root = resolve_root(args);
	let config = load_config(&root)?;
	let source = std::fs::read_to_string(options.template).map_err(|e| {
		TemplError::DataFile {
			path: options.template.display().to_string(),
			reason: e.to_string(),
		}
	})?;

	let mut context = config.load_data(&root)?;
	for path in options.data {
		context.merge(load_context_file(path)?);
	}
	for assignment in options.set {
		let (key, value) = parse_assignment(assignment)?;
		context.insert(key.to_string(), Value::String(value.to_string()));
	}

	let output = format_output(&Template::new(source).render(&context), options.format)?;

	let Some(expected_path) = options.check else {
		print!("{output}");
		return Ok(true);
	};

	let expected = std::fs::read_to_string(expected_path)?;
	if expected == output {
		println!(
			"{} output matches {}",
			colored!("✓", green),
			expected_path.display()
		);
		return Ok(true);
	}

	eprintln!(
		"{} output differs from {}",
		colored!("✗", red),
		expected_path.display()
	);
	print_diff(&expected, &output);

	Ok(false)
}

/// Split `key=value` at the first `=`.
fn parse_assignment(assignment: &str) -> Result<(&str, &str), TemplError> {
	match assignment.split_once('=') {
		Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value)),
		_ => Err(TemplError::InvalidAssignment(assignment.to_string())),
	}
}

fn format_output(output: &str, format: OutputFormat) -> AnyResult<String> {
	match format {
		OutputFormat::Text => Ok(output.to_string()),
		OutputFormat::Html => {
			let html = markdown::to_html_with_options(output, &markdown::Options::gfm())
				.map_err(|message| message.to_string())?;
			Ok(html)
		}
	}
}

fn run_report(
	args: &TemplCli,
	mut request: ReportRequest,
	metrics_index: Option<&Path>,
	format: OutputFormat,
) -> AnyEmptyResult {
	let root = resolve_root(args);
	let config = load_config(&root)?;
	request.fill_from(&config.report);

	if let Some(index_path) = metrics_index {
		let index = load_metrics_index(index_path)?;
		let requested = request.metric.clone();

		if reconcile_metric(&mut request, &index) {
			eprintln!(
				"{} metric `{requested}` is not listed in {}",
				colored!("warning:", yellow),
				index_path.display()
			);
		}
	}

	let output = match config.load_template(&root)? {
		Some(source) => request.render_with(&Template::new(source)),
		None => request.render(),
	};

	print!("{}", format_output(&output, format)?);

	Ok(())
}

fn load_metrics_index(path: &Path) -> Result<MetricsIndex, TemplError> {
	let source_name = path.display().to_string();
	let content = std::fs::read_to_string(path).map_err(|e| {
		TemplError::MetricsIndex {
			source_name: source_name.clone(),
			reason: e.to_string(),
		}
	})?;

	MetricsIndex::from_json(&content, &source_name)
}

fn run_check(template: &Path) -> AnyEmptyResult {
	let source = std::fs::read_to_string(template)?;
	let diagnostics = Template::new(source).diagnostics();
	let display_path = template.display().to_string();

	if diagnostics.is_empty() {
		println!(
			"{} {} has no unpaired tags",
			colored!("✓", green),
			display_path
		);
		return Ok(());
	}

	for diagnostic in &diagnostics {
		let report = diagnostic_to_report(diagnostic, &display_path);
		eprintln!("{report:?}");
	}

	eprintln!(
		"\n{}",
		colored!(
			format!("Found {} unpaired tag(s).", diagnostics.len()),
			bold
		)
	);
	process::exit(1);
}

/// Print a unified diff between two strings, colorized.
fn print_diff(expected: &str, actual: &str) {
	let diff = TextDiff::from_lines(expected, actual);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("   {change}");
			}
		}
	}
}

/// Convert a `ParseDiagnostic` into a `miette::Report` with an error code and
/// help text for rich terminal display.
fn diagnostic_to_report(diag: &ParseDiagnostic, path: &str) -> miette::Report {
	let message = format!("{path}:{diag}");
	let (code, help) = match diag {
		ParseDiagnostic::UnclosedBlock { tag, .. } => {
			(
				"templ::unclosed_block",
				format!("add `{{{{/{tag}}}}}` to close this block"),
			)
		}
		ParseDiagnostic::UnmatchedClose { .. } => {
			(
				"templ::unmatched_close",
				"a closing tag must repeat its opening tag exactly, sigil included".to_string(),
			)
		}
		ParseDiagnostic::StrayElse { .. } => {
			(
				"templ::stray_else",
				"an else tag belongs directly inside its block and may appear once".to_string(),
			)
		}
		_ => ("templ::diagnostic", diag.to_string()),
	};

	let diag_value = miette::MietteDiagnostic::new(message)
		.with_code(code)
		.with_help(help)
		.with_severity(miette::Severity::Error);
	miette::Report::new(diag_value)
}
