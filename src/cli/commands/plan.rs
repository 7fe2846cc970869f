//! Plan command implementation

use crate::cli::utils;
use crate::utils::{plan_fingerprint, short_hash};
use crate::{ExecutionPlan, RunContext};
use anyhow::Result;
use clap::{ArgMatches, Command};
use serde::Serialize;
use std::fmt::Write;
use tracing::info;

pub fn command() -> Command {
    Command::new("plan")
        .about("Print the dependency-ordered execution plan")
        .arg(utils::config_arg())
        .arg(
            clap::Arg::new("format")
                .short('f')
                .long("format")
                .help("Output format")
                .value_name("FORMAT")
                .value_parser(["text", "json", "yaml"])
                .default_value("text"),
        )
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let format = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("text");

    let context = utils::load_context(matches).await?;
    info!("Execution plan has {} generators", context.plan.len());

    println!("{}", render(&context, format)?);
    Ok(())
}

#[derive(Serialize)]
struct PlanDocument<'a> {
    fingerprint: String,
    #[serde(flatten)]
    plan: &'a ExecutionPlan,
}

/// Render the plan in one of the supported output formats
pub fn render(context: &RunContext, format: &str) -> Result<String> {
    let plan = &context.plan;
    let fingerprint = plan_fingerprint(plan)?;

    match format {
        "json" => Ok(serde_json::to_string_pretty(&PlanDocument { fingerprint, plan })?),
        "yaml" => Ok(serde_yaml::to_string(&PlanDocument { fingerprint, plan })?),
        _ => Ok(render_text(context, &fingerprint)),
    }
}

fn render_text(context: &RunContext, fingerprint: &str) -> String {
    let plan = &context.plan;
    let mut output = String::new();

    let _ = writeln!(output, "Execution plan ({} generators)", plan.len());
    let _ = writeln!(output, "Input: {} ({})", context.document, plan.input_type);
    let _ = writeln!(output, "Language: {}", plan.language);

    for (position, entry) in plan.iter().enumerate() {
        let _ = writeln!(output);
        let _ = writeln!(output, "{:>3}. {}", position + 1, entry.id);
        let _ = writeln!(
            output,
            "     preset: {}, language: {}",
            entry.preset, entry.language
        );
        let _ = writeln!(output, "     output: {}", entry.output_path.display());
        if !entry.dependencies.is_empty() {
            let _ = writeln!(output, "     after: {}", entry.dependencies.join(", "));
        }
    }

    let _ = writeln!(output);
    let _ = write!(output, "Fingerprint: {}", short_hash(fingerprint));
    output
}
