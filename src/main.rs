use clap::{Args, Parser, Subcommand};
use mentor_match::config::{AppConfig, RosterSourceConfig};
use mentor_match::error::AppError;
use mentor_match::telemetry;
use mentor_match::workflows::mentorship::{export_csv, run_pipeline, PipelineSummary};
use mentor_match::workflows::roster::{RandomUserClient, RosterImport, RosterImporter};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "mentor-match",
    about = "Pair community mentors with mentorees and report on the resulting roster",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build mentorships for a roster and print the analytics report (default command)
    Match(MatchArgs),
    /// Download a roster from the provider and save it as JSON
    Fetch(FetchArgs),
}

#[derive(Args, Debug, Default)]
struct SourceArgs {
    /// Number of members to request from the provider
    #[arg(long)]
    results: Option<usize>,
    /// Provider nationality filter (e.g. ca, gb)
    #[arg(long)]
    nationality: Option<String>,
    /// Provider seed, fixing the generated roster
    #[arg(long)]
    seed: Option<String>,
}

impl SourceArgs {
    fn apply(self, source: &mut RosterSourceConfig) {
        if let Some(results) = self.results {
            source.results = results;
        }
        if let Some(nationality) = self.nationality {
            source.nationality = nationality;
        }
        if let Some(seed) = self.seed {
            source.seed = seed;
        }
    }
}

#[derive(Args, Debug, Default)]
struct MatchArgs {
    /// Roster JSON file; fetched from the provider when omitted
    #[arg(long)]
    roster: Option<PathBuf>,
    #[command(flatten)]
    source: SourceArgs,
    /// Write members.csv and mentorships.csv into this directory
    #[arg(long)]
    export_dir: Option<PathBuf>,
    /// Print the summary as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct FetchArgs {
    /// Destination file for the raw roster document
    #[arg(long)]
    output: PathBuf,
    #[command(flatten)]
    source: SourceArgs,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Match(MatchArgs::default()));

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    info!(environment = ?config.environment, "mentor-match starting");

    match command {
        Command::Match(args) => run_match(config, args).await,
        Command::Fetch(args) => run_fetch(config, args).await,
    }
}

async fn run_match(mut config: AppConfig, args: MatchArgs) -> Result<(), AppError> {
    let MatchArgs {
        roster,
        source,
        export_dir,
        json,
    } = args;

    let import = match roster {
        Some(path) => {
            info!(path = %path.display(), "loading roster from file");
            RosterImporter::from_path(path)?
        }
        None => {
            source.apply(&mut config.roster);
            RandomUserClient::new(config.roster)?.fetch().await?
        }
    };

    let outcome = run_pipeline(import)?;

    if let Some(dir) = export_dir {
        export_csv(&dir, &outcome.members, &outcome.mentorships)?;
    }

    let summary = outcome.summary();
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        render_summary(&summary);
    }

    Ok(())
}

async fn run_fetch(mut config: AppConfig, args: FetchArgs) -> Result<(), AppError> {
    let FetchArgs { output, source } = args;
    source.apply(&mut config.roster);

    let client = RandomUserClient::new(config.roster)?;
    let document = client.fetch_document().await?;
    std::fs::write(&output, serde_json::to_vec_pretty(&document)?)?;

    let RosterImport { members, rejected } = RosterImporter::from_path(&output)?;
    info!(
        path = %output.display(),
        members = members.len(),
        rejected = rejected.len(),
        "saved roster"
    );
    Ok(())
}

fn render_summary(summary: &PipelineSummary) {
    println!("Mentorship report");
    println!(
        "Members: {} ({} records rejected)",
        summary.members,
        summary.rejected_records.len()
    );
    println!(
        "Mentors: {}, mentorees: {}, neither: {}",
        summary.mentors, summary.mentorees, summary.unassigned
    );
    println!("Mentorships created: {}", summary.mentorships);

    if !summary.rejected_records.is_empty() {
        println!("\nRejected records");
        for rejection in &summary.rejected_records {
            let id = rejection
                .member_id
                .as_ref()
                .map(|id| id.to_string())
                .unwrap_or_else(|| "<no id>".to_string());
            println!("- #{} {}: {}", rejection.index, id, rejection.error);
        }
    }

    println!("\nMentor load");
    for entry in &summary.mentor_load {
        println!("- {} ({}): {} mentorees", entry.mentor_name, entry.mentor_id, entry.mentorees);
    }

    match summary.median_age_of_recent_male_mentorees {
        Some(median) => println!(
            "\nMedian age of male mentorees registered since 2010-01-01: {median}"
        ),
        None => println!("\nMedian age of male mentorees registered since 2010-01-01: no data"),
    }

    if summary.senior_mentor_gender_counts.is_empty() {
        println!("\nMentorees of mentors aged 60+: none");
    } else {
        println!("\nMentorees of mentors aged 60+ by gender");
        for entry in &summary.senior_mentor_gender_counts {
            println!("- {}: {}", entry.gender_label, entry.count);
        }
    }

    if summary.discrepancies.is_empty() {
        println!("\nDiscrepancies: none");
    } else {
        println!("\nDiscrepancies");
        for view in &summary.discrepancies {
            let members = view
                .discrepancy
                .member_ids
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            let mentorship = view
                .discrepancy
                .mentorship_id
                .map(|id| format!(" mentorship {id}"))
                .unwrap_or_default();
            println!(
                "- [{}] {}:{} {}",
                view.category_label, view.kind_label, mentorship, members
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_is_the_default_command() {
        let cli = Cli::try_parse_from(["mentor-match"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn source_overrides_replace_configured_values() {
        let cli = Cli::try_parse_from([
            "mentor-match",
            "match",
            "--results",
            "25",
            "--seed",
            "demo",
            "--json",
        ])
        .expect("parses");

        let Some(Command::Match(args)) = cli.command else {
            panic!("expected match command");
        };
        assert!(args.json);

        let mut source = RosterSourceConfig {
            base_url: "http://localhost/api".to_string(),
            results: 500,
            nationality: "ca".to_string(),
            seed: "vendease".to_string(),
            timeout_secs: 30,
        };
        args.source.apply(&mut source);
        assert_eq!(source.results, 25);
        assert_eq!(source.seed, "demo");
        assert_eq!(source.nationality, "ca");
    }
}
