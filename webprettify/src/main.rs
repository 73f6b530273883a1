mod watch;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::time::Instant;
use webprettify_lib::files::{self, FileOptions};
use webprettify_lib::options::DEFAULT_HTML_INDENT;
use webprettify_lib::PrettifyOptions;

const WEBPRETTIFY_INTRO: &str = r#"
     _      __    __   ___            __  __  _ ___
    | | /| / /__ / /  / _ \_______ __/ /_/ /_(_) _/_ __
    | |/ |/ / -_) _ \/ ___/ __/ -_) _/ __/ __/ / _/ // /
    |__/|__/\__/_.__/_/  /_/  \__/\__/\__/\__/_/_/ \_, /
                                                  /___/
    CSS / SCSS property sorter and HTML prettifier.
"#;

#[derive(Parser)]
#[command(name = "webprettify")]
#[command(version)]
#[command(about = "Prettify CSS, SCSS and HTML files")]
struct Args {
    /// File or folder to prettify.
    fullpath: PathBuf,

    /// Write `<prefix><name>` next to each input instead of overwriting it.
    #[arg(long)]
    prefix: Option<String>,

    /// Prepend a timestamp comment to CSS output.
    #[arg(long)]
    timestamp: bool,

    /// Turn logging off.
    #[arg(long, conflicts_with = "verbose")]
    quiet: bool,

    /// Log every pipeline stage.
    #[arg(long)]
    verbose: bool,

    /// Keep running and prettify files again when they change.
    #[arg(long)]
    watch: bool,

    /// Separate property groups with a blank line.
    #[arg(long)]
    group: bool,

    /// Align property values into one column.
    #[arg(long)]
    justify: bool,

    /// Remove empty `selector{}` rules.
    #[arg(long)]
    remove_empty: bool,

    /// Spaces per nesting level in HTML output.
    #[arg(long, default_value_t = DEFAULT_HTML_INDENT)]
    indent: usize,

    /// Worker threads for folders; defaults to one per core.
    #[arg(long)]
    jobs: Option<usize>,

    /// Shell command to run before processing.
    #[arg(long)]
    before: Option<String>,

    /// Shell command to run after processing.
    #[arg(long)]
    after: Option<String>,
}

impl Args {
    fn file_options(&self) -> FileOptions {
        FileOptions {
            prettify: PrettifyOptions::new()
                .justify(self.justify)
                .grouped(self.group)
                .remove_empty_rules(self.remove_empty)
                .html_indent_width(self.indent),
            prefix: self.prefix.clone(),
            timestamp: self.timestamp,
        }
    }
}

fn init_logger(args: &Args) {
    let level = if args.quiet {
        log::LevelFilter::Off
    } else if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    if !args.quiet {
        builder.parse_default_env();
    }
    builder.init();
}

/// Runs `command` through the shell and logs what it printed.
///
/// A non-zero exit status is only logged; failing to start the shell is an
/// error.
fn run_hook(command: &str) -> Result<ExitStatus> {
    log::info!("Running: {}", command);
    let output = if cfg!(windows) {
        Command::new("cmd").args(["/C", command]).output()
    } else {
        Command::new("sh").args(["-c", command]).output()
    }
    .with_context(|| format!("failed to run '{}'", command))?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stdout.trim().is_empty() {
        log::info!("{}", stdout.trim_end());
    }
    if !stderr.trim().is_empty() {
        log::warn!("{}", stderr.trim_end());
    }
    if !output.status.success() {
        log::warn!("'{}' exited with {}", command, output.status);
    }
    Ok(output.status)
}

fn target_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        if files::FileKind::from_path(path).is_none() {
            bail!("not a CSS, SCSS or HTML file: {}", path.display());
        }
        log::info!("Target is a single file");
        Ok(vec![path.to_path_buf()])
    } else if path.is_dir() {
        log::info!("Target is a folder, processing it may take some time...");
        files::collect_files(path)
            .with_context(|| format!("failed to list files under {}", path.display()))
    } else {
        bail!("file or folder not found: {}", path.display());
    }
}

fn run(args: &Args) -> Result<usize> {
    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .context("failed to configure the worker pool")?;
    }

    if let Some(command) = &args.before {
        run_hook(command)?;
    }

    let start = Instant::now();
    let options = args.file_options();
    let targets = target_files(&args.fullpath)?;
    let results = files::process_files(&targets, &options);

    let mut written = watch::WrittenFiles::default();
    let mut failures = 0;
    for (path, result) in targets.iter().zip(results) {
        match result {
            Ok(processed) => written.record(&processed),
            Err(e) => {
                failures += 1;
                log::error!("Failed to prettify {}: {}", path.display(), e);
            }
        }
    }

    if let Some(command) = &args.after {
        run_hook(command)?;
    }

    log::info!("{}", "-".repeat(80));
    log::info!("Number of Files Processed: {}", targets.len());
    if failures > 0 {
        log::warn!("Files failed: {}", failures);
    }
    log::info!("Finished in {:.2?}", start.elapsed());

    if args.watch {
        watch::watch(&args.fullpath, &options, written)?;
    }
    Ok(failures)
}

fn main() -> Result<()> {
    println!("{}", WEBPRETTIFY_INTRO);

    // parse the args given in terminal
    let args: Args = Args::parse();
    init_logger(&args);

    let failures = run(&args)?;
    if failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}
