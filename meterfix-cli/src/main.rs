mod config;
mod explain;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use config::{ConfigMerger, MergedConfig};
use fs_err as fs;
use meterfix_domain::simulate::{self, MeterRow};
use meterfix_domain::{
    CATALOG, Planner, PlannerConfig, expected_zone_summary, lookup_entry, validate_zone_summary,
};
use meterfix_render::{render_plan_md, render_section, render_sql_script, render_zone_summary};
use meterfix_types::plan::{CorrectionPlan, ToolInfo};
use sha2::{Digest, Sha256};
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "meterfix",
    version,
    about = "Print the idempotent correction script for the water_meters table."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the correction script and the expected zone summary (default).
    Generate(GenerateArgs),
    /// Run the plan twice over rows exported from the table and report what changed.
    Simulate(SimulateArgs),
    /// Explain what a correction rule does and show its statement.
    Explain(ExplainArgs),
    /// List all correction rules.
    ListFixes(ListFixesArgs),
}

#[derive(Debug, Default, clap::Args)]
struct SelectionArgs {
    /// Read settings from this meterfix.toml (never read implicitly).
    #[arg(long)]
    config: Option<Utf8PathBuf>,

    /// Allowlist patterns for rule ids (e.g. "parent_meter.*").
    #[arg(long)]
    allow: Vec<String>,

    /// Denylist patterns for rule ids.
    #[arg(long)]
    deny: Vec<String>,
}

#[derive(Debug, Default, Parser)]
struct GenerateArgs {
    #[command(flatten)]
    selection: SelectionArgs,

    /// Table the statements target (default: water_meters).
    #[arg(long)]
    table: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value = "sql")]
    format: GenerateFormat,

    /// Omit the zone summary.
    #[arg(long, default_value_t = false)]
    no_summary: bool,

    /// Also write the script, summary and plan artifacts into this directory.
    #[arg(long)]
    out_dir: Option<Utf8PathBuf>,
}

#[derive(Debug, Parser)]
struct SimulateArgs {
    /// JSON array of rows exported from the table (zone, label, parent_meter, type).
    #[arg(long)]
    rows: Utf8PathBuf,

    #[command(flatten)]
    selection: SelectionArgs,

    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    format: ListFormat,
}

#[derive(Debug, Parser)]
struct ExplainArgs {
    /// Rule id to explain (e.g., "parent_meter.zone_08", "type.main_bulk").
    rule_id: String,
}

#[derive(Debug, Parser)]
struct ListFixesArgs {
    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    format: ListFormat,
}

#[derive(Debug, Default, Clone, Copy, clap::ValueEnum)]
enum GenerateFormat {
    #[default]
    Sql,
    Json,
    Markdown,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ListFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        error!("{:?}", e);
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let Cli { cmd } = Cli::parse();
    match cmd.unwrap_or_else(|| Command::Generate(GenerateArgs::default())) {
        Command::Generate(args) => cmd_generate(args),
        Command::Simulate(args) => cmd_simulate(args),
        Command::Explain(args) => cmd_explain(args),
        Command::ListFixes(args) => cmd_list_fixes(args),
    }
}

fn merged_config(
    selection: &SelectionArgs,
    table: Option<&str>,
    no_summary: bool,
) -> anyhow::Result<MergedConfig> {
    let file_config =
        config::load_or_default(selection.config.as_deref()).context("load meterfix config")?;
    let merged = ConfigMerger::new(file_config).merge_generate_args(
        table,
        &selection.allow,
        &selection.deny,
        no_summary,
    );
    debug!(
        "merged config: table={}, allow={:?}, deny={:?}, include_summary={}",
        merged.table, merged.allow, merged.deny, merged.include_summary
    );
    Ok(merged)
}

fn build_plan(merged: &MergedConfig) -> anyhow::Result<CorrectionPlan> {
    let config = PlannerConfig {
        table: merged.table.clone(),
        allow: merged.allow.clone(),
        deny: merged.deny.clone(),
    };
    Planner::new()
        .plan(&config, tool_info())
        .context("generate correction plan")
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let merged = merged_config(&args.selection, args.table.as_deref(), args.no_summary)?;
    let plan = build_plan(&merged)?;

    let summary = expected_zone_summary();
    validate_zone_summary(&summary).context("validate zone summary")?;

    let script = render_sql_script(&plan);
    let summary_text = render_zone_summary(&summary);

    if let Some(out_dir) = &args.out_dir {
        write_artifacts(out_dir, &plan, &script, &summary_text)?;
    }

    match args.format {
        GenerateFormat::Sql => {
            print!("{script}");
            if merged.include_summary {
                println!();
                print!("{summary_text}");
            }
        }
        GenerateFormat::Json => {
            let mut doc = serde_json::json!({
                "plan": plan,
                "script_sha256": sha256_hex(script.as_bytes()),
            });
            if merged.include_summary {
                doc["summary"] = serde_json::to_value(&summary).context("serialize summary")?;
            }
            println!(
                "{}",
                serde_json::to_string_pretty(&doc).context("serialize json")?
            );
        }
        GenerateFormat::Markdown => print!("{}", render_plan_md(&plan)),
    }
    Ok(())
}

fn write_artifacts(
    out_dir: &Utf8Path,
    plan: &CorrectionPlan,
    script: &str,
    summary_text: &str,
) -> anyhow::Result<()> {
    fs::create_dir_all(out_dir).with_context(|| format!("create {}", out_dir))?;
    fs::write(out_dir.join("fix_water_meters.sql"), script)?;
    fs::write(out_dir.join("zone_summary.txt"), summary_text)?;
    fs::write(out_dir.join("plan.md"), render_plan_md(plan))?;
    write_json(&out_dir.join("plan.json"), plan)?;
    info!("wrote correction artifacts to {}", out_dir);
    Ok(())
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    // Rows are evaluated in memory, so the configured table name is not used.
    let mut merged = merged_config(&args.selection, None, false)?;
    merged.table = meterfix_types::DEFAULT_TABLE.to_string();
    let plan = build_plan(&merged)?;

    let raw = fs::read_to_string(&args.rows).with_context(|| format!("read {}", args.rows))?;
    let mut rows: Vec<MeterRow> =
        serde_json::from_str(&raw).with_context(|| format!("parse rows from {}", args.rows))?;
    info!("loaded {} rows from {}", rows.len(), args.rows);

    let first = simulate::apply_plan(&plan, &mut rows);
    let second = simulate::apply_plan(&plan, &mut rows);
    let verification = simulate::verification_rows(&plan.verification, &rows);

    match args.format {
        ListFormat::Text => {
            println!("Rows loaded: {}\n", rows.len());
            for (name, pass) in [("Pass 1", &first), ("Pass 2", &second)] {
                println!("{name}");
                for s in &pass.sections {
                    println!("  {:>5}  {}", s.rows_affected, s.title);
                }
                println!("  Total: {}\n", pass.rows_affected());
            }
            println!("Verification ({})", plan.verification.zones.join(", "));
            println!(
                "  {:<14} {:<6} {:<32} COUNT",
                "ZONE", "LABEL", "PARENT_METER"
            );
            for r in &verification {
                println!(
                    "  {:<14} {:<6} {:<32} {}",
                    r.zone,
                    r.label.as_deref().unwrap_or("NULL"),
                    r.parent_meter.as_deref().unwrap_or("NULL"),
                    r.count
                );
            }
        }
        ListFormat::Json => {
            let doc = serde_json::json!({
                "rows": rows.len(),
                "first_pass": first,
                "second_pass": second,
                "verification": verification,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&doc).context("serialize json")?
            );
        }
    }

    if second.rows_affected() > 0 {
        anyhow::bail!(
            "second pass changed {} rows; the plan is not idempotent",
            second.rows_affected()
        );
    }
    Ok(())
}

fn cmd_explain(args: ExplainArgs) -> anyhow::Result<()> {
    let Some(entry) = lookup_entry(&args.rule_id) else {
        let available = explain::list_rule_ids().join(", ");
        anyhow::bail!(
            "Unknown rule id: '{}'\n\nAvailable rules: {}",
            args.rule_id,
            available
        );
    };

    let plan = build_plan(&merged_config(&SelectionArgs::default(), None, false)?)?;
    let statement = plan
        .section_of(entry.id)
        .map(|section| render_section(&plan.table, section))
        .with_context(|| format!("rule '{}' is not part of the plan", entry.id))?;

    print!("{}", explain::explain_entry(entry, &statement));
    Ok(())
}

fn cmd_list_fixes(args: ListFixesArgs) -> anyhow::Result<()> {
    match args.format {
        ListFormat::Text => {
            println!("Available fixes:\n");
            println!("  {:<28} {:<14} OLD -> NEW", "ID", "FIELD");
            println!("  {:<28} {:<14} ----------", "--", "-----");
            for entry in CATALOG {
                println!(
                    "  {:<28} {:<14} {} -> {}",
                    entry.id,
                    explain::format_field(entry.field),
                    entry.old_value,
                    entry.new_value
                );
            }
            println!();
            println!("Use 'meterfix explain <id>' for details.");
        }
        ListFormat::Json => {
            let fixes: Vec<_> = CATALOG
                .iter()
                .map(|e| {
                    serde_json::json!({
                        "id": e.id,
                        "field": e.field,
                        "zone": e.zone,
                        "labels": e.labels,
                        "old_value": e.old_value,
                        "new_value": e.new_value,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&fixes)?);
        }
    }
    Ok(())
}

fn write_json<T: serde::Serialize>(path: &Utf8Path, v: &T) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(v).context("serialize json")?;
    fs::write(path, s).with_context(|| format!("write {}", path))?;
    Ok(())
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

fn tool_info() -> ToolInfo {
    ToolInfo {
        name: "meterfix".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    }
}
