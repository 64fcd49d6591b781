#[cfg(feature = "bin")]
pub mod bin {
    use std::io::Read;
    use std::path::{Path, PathBuf};

    use clap::Parser;

    use crate::*;

    #[derive(Debug, Parser)]
    #[command(version = env!("FULL_VERSION"), about = env!("CARGO_PKG_DESCRIPTION"))]
    struct Args {
        /// Proof files (`.nd`): the sequent on the first line, one step per line after it
        inputs: Vec<PathBuf>,
        /// Sequent to check, e.g. `P → Q, P ⊢ Q`. Requires `--steps`
        #[clap(long, requires = "steps")]
        sequent: Option<String>,
        /// File holding the steps for `--sequent`, `-` for standard input
        #[clap(long, requires = "sequent")]
        steps: Option<PathBuf>,
        /// Compare formulas as trees instead of parenthesis-free token streams
        #[clap(long)]
        strict_matching: bool,
        /// Reject references into discharged sub-proofs, forward references and undischarged hypotheses
        #[clap(long)]
        lexical_scopes: bool,
        /// Writes the dependency graph of each proof as a dot file
        #[clap(long)]
        to_dot: bool,
        /// Renders the dependency graph of each proof as an SVG (needs the `dot` executable)
        #[clap(long)]
        to_svg: bool,
        /// Writes the dependency graph of each proof as JSON
        #[clap(long)]
        to_json: bool,
        /// Directory for the graph files
        #[clap(long, default_value = "grafos")]
        output_dir: PathBuf,
        /// Prints only the verdict of each proof
        #[clap(long)]
        quiet: bool,
    }

    /// Start the command-line interface.
    #[allow(clippy::disallowed_macros)]
    pub fn cli() {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Info)
            .format_timestamp(None)
            .format_target(false)
            .parse_default_env()
            .init();

        let args = Args::parse();
        let mut checker = Checker::default();
        if args.strict_matching {
            checker = checker.with_strict_matching();
        }
        if args.lexical_scopes {
            checker = checker.with_lexical_scopes();
        }

        let mut all_valid = true;
        match (&args.sequent, &args.steps) {
            (Some(sequent), Some(steps)) => {
                let steps = match read_steps(steps) {
                    Ok(steps) => steps,
                    Err(err) => {
                        log::error!("{err}");
                        std::process::exit(1)
                    }
                };
                all_valid &= run(&args, "grafo_deducao", checker.check(sequent, &steps).map_err(Error::from));
            }
            _ if args.inputs.is_empty() => {
                log::error!("Pass a proof file, or a sequent with --sequent and --steps");
                std::process::exit(1)
            }
            _ => {}
        }
        for input in &args.inputs {
            let stem = input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "grafo_deducao".to_string());
            if args.inputs.len() > 1 && !args.quiet {
                println!("== {}", input.display());
            }
            all_valid &= run(&args, &stem, checker.check_path(input));
        }
        if !all_valid {
            std::process::exit(1)
        }
    }

    fn read_steps(path: &Path) -> Result<String, Error> {
        if path == Path::new("-") {
            let mut steps = String::new();
            std::io::stdin()
                .read_to_string(&mut steps)
                .map_err(|err| Error::Io(path.to_path_buf(), err))?;
            Ok(steps)
        } else {
            std::fs::read_to_string(path).map_err(|err| Error::Io(path.to_path_buf(), err))
        }
    }

    /// Reports one checked proof and writes the requested graph files.
    /// Returns whether the proof is valid.
    #[allow(clippy::disallowed_macros)]
    fn run(args: &Args, stem: &str, outcome: Result<Outcome, Error>) -> bool {
        let mut outcome = match outcome {
            Ok(outcome) => outcome,
            Err(err) => {
                log::error!("{err}");
                return false;
            }
        };

        if args.to_svg {
            outcome.render(&GraphvizRenderer::new(&args.output_dir, stem));
        }
        if args.to_dot {
            write_graph(&args.output_dir, stem, "dot", outcome.graph.to_dot());
        }
        if args.to_json {
            match outcome.graph.to_json() {
                Ok(json) => write_graph(&args.output_dir, stem, "json", json),
                Err(err) => log::error!("Failed to serialize the graph: {err}"),
            }
        }

        if !args.quiet {
            print!("{}", outcome.transcript);
        }
        if outcome.valid {
            println!("Valid deduction!");
        } else {
            println!("Invalid deduction.");
        }
        outcome.valid
    }

    fn write_graph(dir: &Path, stem: &str, extension: &str, contents: String) {
        let path = dir.join(stem).with_extension(extension);
        let written = std::fs::create_dir_all(dir).and_then(|()| std::fs::write(&path, contents));
        match written {
            Ok(()) => log::info!("Wrote {}", path.display()),
            Err(err) => log::error!("Failed to write {}: {err}", path.display()),
        }
    }
}
