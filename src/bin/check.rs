//! hostscope-check: CLI tool for checking targets against a scope definition.

use clap::{Args, Parser, Subcommand};
use hostscope::{RuleSet, RuleType, Scope, ScopeConfig, ScopeOptions};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "hostscope-check")]
#[command(author = "Kaitu.io")]
#[command(version = "0.1.0")]
#[command(about = "Check hosts, IPs and URLs against include/exclude scope rules", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ScopeArgs {
    /// Scope file (.yaml, .yml, .json, or text format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Additional include rule (repeatable)
    #[arg(short, long = "include")]
    includes: Vec<String>,

    /// Additional exclude rule (repeatable)
    #[arg(short, long = "exclude")]
    excludes: Vec<String>,

    /// Disable string-prefix inclusion
    #[arg(long)]
    strict: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print whether each target is in scope
    Check {
        #[command(flatten)]
        scope: ScopeArgs,

        /// Targets to check
        #[arg(required = true)]
        targets: Vec<String>,
    },

    /// Print the rules and targets of a scope
    List {
        #[command(flatten)]
        scope: ScopeArgs,

        /// Only show rules of this kind (host, wildcard, cidr, ip-range)
        #[arg(short, long, value_parser = parse_rule_type)]
        kind: Option<RuleType>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { scope, targets } => build_scope(&scope).map(|s| check_targets(&s, &targets)),
        Commands::List { scope, kind } => build_scope(&scope).map(|s| {
            list_scope(&s, kind);
            true
        }),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

fn build_scope(args: &ScopeArgs) -> hostscope::Result<Scope> {
    let mut config = match &args.config {
        Some(path) => ScopeConfig::from_path(path)?,
        None => ScopeConfig::default(),
    };

    if args.strict {
        config.options = ScopeOptions::strict();
    }

    let mut scope = config.build()?;
    scope.add_includes(&args.includes)?;
    scope.add_excludes(&args.excludes)?;

    log::debug!(
        "Scope ready: {} includes, {} excludes, {} targets",
        scope.include_rules().len(),
        scope.exclude_rules().len(),
        scope.target_registry().len()
    );

    Ok(scope)
}

/// Returns `true` when every target is in scope.
fn check_targets(scope: &Scope, targets: &[String]) -> bool {
    let mut all_in_scope = true;

    for target in targets {
        let in_scope = scope.in_scope(target);
        all_in_scope &= in_scope;

        let verdict = if in_scope { "in-scope" } else { "out-of-scope" };
        println!("{}\t{}", target, verdict);

        if !in_scope {
            log::debug!(
                "{}: included={} excluded={}",
                target,
                scope.is_included(target),
                scope.is_excluded(target)
            );
        }
    }

    all_in_scope
}

fn parse_rule_type(s: &str) -> Result<RuleType, String> {
    RuleType::parse(s).ok_or_else(|| format!("unknown rule kind: {}", s))
}

fn list_scope(scope: &Scope, kind: Option<RuleType>) {
    print_section("Includes", &describe_rules(scope.include_rules(), kind));
    print_section("Excludes", &describe_rules(scope.exclude_rules(), kind));
    print_section("Active includes", &scope.active_includes());

    let mut targets: Vec<String> = scope
        .target_kinds()
        .iter()
        .map(|(target, target_kind)| format!("{}\t{}", target, target_kind))
        .collect();
    targets.sort();
    print_section("Targets", &targets);
}

fn describe_rules(rules: &RuleSet, kind: Option<RuleType>) -> Vec<String> {
    rules
        .sorted(kind)
        .iter()
        .map(|rule| format!("{}\t{}\t{}", rule.key(), rule.rule_type(), rule.describe()))
        .collect()
}

fn print_section(title: &str, entries: &[String]) {
    println!("{} ({}):", title, entries.len());
    for entry in entries {
        println!("  {}", entry);
    }
}
