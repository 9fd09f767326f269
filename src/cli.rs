//! Command line surface of `apply-state`.
//!
//! ```text
//! apply-state <state.json> [index.html] [--dry-run]
//! apply-state -s state.json -h page.html -o baked.html
//! ```

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::errors::PatchError;
use crate::patch::{PatchJob, PatchSummary, Patcher};

pub const DEFAULT_HTML: &str = "index.html";

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

/// Bake a saved page state into a static HTML file.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "apply-state", disable_help_flag = true)]
pub struct Cli {
    /// JSON state file, or the HTML file when `--state` is given
    #[arg(value_name = "STATE")]
    state_arg: Option<PathBuf>,

    /// HTML file to patch
    #[arg(value_name = "HTML")]
    html_arg: Option<PathBuf>,

    /// JSON state file
    #[arg(short = 's', long = "state")]
    state: Option<PathBuf>,

    /// HTML file to patch [default: index.html]
    #[arg(short = 'h', long = "html", conflicts_with = "html_arg")]
    html: Option<PathBuf>,

    /// Output file [default: the HTML file itself]
    #[arg(short = 'o', long = "out")]
    out: Option<PathBuf>,

    /// Only report what would change, write nothing
    #[arg(long)]
    dry_run: bool,

    /// Fail when a key occurs more than once in the HTML
    #[arg(long)]
    strict: bool,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

impl Cli {
    /// Resolves positional and flagged arguments into a job.
    ///
    /// Positionals fill the state slot, then the HTML slot, skipping any slot already
    /// set by its flag.
    pub fn job(&self) -> Result<PatchJob, PatchError> {
        let mut positionals = self.state_arg.iter().chain(self.html_arg.iter()).cloned();

        let state = match &self.state {
            Some(state) => state.clone(),
            None => positionals.next().ok_or(PatchError::MissingStatePath)?,
        };
        let html = match &self.html {
            Some(html) => html.clone(),
            None => positionals.next().unwrap_or_else(|| PathBuf::from(DEFAULT_HTML)),
        };
        if let Some(extra) = positionals.next() {
            return Err(PatchError::UnexpectedArgument(extra));
        }

        Ok(PatchJob {
            state,
            html,
            out: self.out.clone(),
            dry_run: self.dry_run,
            strict: self.strict,
        })
    }
}

/// Parses `args` (program name first), runs the tool and prints its report.
/// Returns the process exit status.
pub fn main_with_args<I, T>(args: I) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() { EXIT_FAILURE } else { EXIT_SUCCESS };
        }
    };

    match run(&cli) {
        Ok(summary) => {
            report(&summary);
            EXIT_SUCCESS
        }
        Err(e) => {
            log::debug!("apply-state failed: {e:?}");
            eprintln!("\n{e}\n");
            if matches!(e, PatchError::MissingStatePath) {
                eprintln!("Usage: apply-state <state.json> [index.html] [--dry-run]\n       (see --help)");
            }
            EXIT_FAILURE
        }
    }
}

pub fn run(cli: &Cli) -> Result<PatchSummary, PatchError> {
    let job = cli.job()?;
    log::debug!("running {job:?}");
    job.execute(&Patcher::default())
}

fn report(summary: &PatchSummary) {
    match &summary.written {
        None => {
            println!("[Dry Run] Texts to update: {}", summary.text_updates);
            println!("[Dry Run] Photos to update: {}", summary.photo_updates);
        }
        Some(path) => {
            println!("Texts updated: {}", summary.text_updates);
            println!("Photos updated: {}", summary.photo_updates);
            println!("Output: {}", path.display());
        }
    }

    if !summary.missing_texts.is_empty() {
        eprintln!("warning: text keys not found: {}", summary.missing_texts.join(", "));
    }
    if !summary.missing_photos.is_empty() {
        eprintln!("warning: photo keys not found: {}", summary.missing_photos.join(", "));
    }
    if !summary.duplicate_keys.is_empty() {
        eprintln!(
            "warning: keys used more than once, only the first was patched: {}",
            summary.duplicate_keys.join(", ")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;
    use std::path::Path;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("apply-state").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn positional_arguments() {
        let job = parse(&["state.json", "page.html", "--dry-run"]).job().unwrap();
        assert_eq!(job.state, Path::new("state.json"));
        assert_eq!(job.html, Path::new("page.html"));
        assert_eq!(job.output_path(), Path::new("page.html"));
        assert!(job.dry_run);
        assert!(!job.strict);
    }

    #[test]
    fn flagged_arguments() {
        let job = parse(&["-s", "s.json", "-h", "p.html", "-o", "out.html", "--strict"])
            .job()
            .unwrap();
        assert_eq!(job.state, Path::new("s.json"));
        assert_eq!(job.html, Path::new("p.html"));
        assert_eq!(job.output_path(), Path::new("out.html"));
        assert!(job.strict);
    }

    #[test]
    fn positional_after_state_flag_is_the_html() {
        let job = parse(&["-s", "s.json", "page.html"]).job().unwrap();
        assert_eq!(job.state, Path::new("s.json"));
        assert_eq!(job.html, Path::new("page.html"));
        assert_eq!(job.output_path(), Path::new("page.html"));

        let job = parse(&["page.html", "--state", "s.json", "--dry-run"]).job().unwrap();
        assert_eq!(job.state, Path::new("s.json"));
        assert_eq!(job.html, Path::new("page.html"));
        assert!(job.dry_run);
    }

    #[test]
    fn leftover_positionals_are_rejected() {
        assert!(matches!(
            parse(&["-s", "s.json", "a.html", "b.html"]).job(),
            Err(PatchError::UnexpectedArgument(p)) if p == Path::new("b.html")
        ));
        assert!(Cli::try_parse_from(["apply-state", "a", "b", "c"]).is_err());
        assert!(Cli::try_parse_from(["apply-state", "-h", "p.html", "s.json", "x.html"]).is_err());
    }

    #[test]
    fn html_defaults_to_index() {
        let job = parse(&["--state", "s.json"]).job().unwrap();
        assert_eq!(job.html, Path::new(DEFAULT_HTML));
    }

    #[test]
    fn missing_state_is_an_error() {
        assert!(matches!(parse(&["--dry-run"]).job(), Err(PatchError::MissingStatePath)));
        assert!(matches!(parse(&["-h", "p.html"]).job(), Err(PatchError::MissingStatePath)));
    }

    #[test]
    fn invalid_invocations_exit_with_failure() {
        assert_eq!(main_with_args(["apply-state"]), EXIT_FAILURE);
        assert_eq!(main_with_args(["apply-state", "a", "b", "c"]), EXIT_FAILURE);
        assert_eq!(main_with_args(["apply-state", "--bogus"]), EXIT_FAILURE);
        assert_eq!(main_with_args(["apply-state", "-s", "s.json", "a", "b"]), EXIT_FAILURE);
        assert_eq!(main_with_args(["apply-state", "--help"]), EXIT_SUCCESS);
    }

    #[test]
    fn exit_codes_follow_the_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("state.json");
        let html = dir.path().join("index.html");
        let out = dir.path().join("out.html");
        std::fs::write(&html, r#"<p data-edit-key="greeting">Old</p>"#).unwrap();

        // partial match still succeeds
        std::fs::write(&state, r#"{"texts":{"greeting":"New","absent":"x"}}"#).unwrap();
        let code = main_with_args([
            OsStr::new("apply-state"),
            state.as_os_str(),
            html.as_os_str(),
            OsStr::new("-o"),
            out.as_os_str(),
        ]);
        assert_eq!(code, EXIT_SUCCESS);
        assert_eq!(
            std::fs::read_to_string(&out).unwrap(),
            r#"<p data-edit-key="greeting">New</p>"#
        );

        // unparseable state fails and leaves no output behind
        std::fs::remove_file(&out).unwrap();
        std::fs::write(&state, "{oops").unwrap();
        let code = main_with_args([
            OsStr::new("apply-state"),
            state.as_os_str(),
            html.as_os_str(),
            OsStr::new("-o"),
            out.as_os_str(),
        ]);
        assert_eq!(code, EXIT_FAILURE);
        assert!(!out.exists());

        // unreadable html
        let code = main_with_args([
            OsStr::new("apply-state"),
            state.as_os_str(),
            dir.path().join("missing.html").as_os_str(),
        ]);
        assert_eq!(code, EXIT_FAILURE);
    }
}
