use crate::infra::loaded_service;
use clap::Args;
use empathia::assessment::{
    AssessmentRunner, AssessmentService, CaseAssessment, CaseQuery, Dimension, DimensionScores,
    ProfileAssessment, ProfileRegistry, Selection, SyntheticAssessment, SyntheticProfile,
    SyntheticScorer, Ticket,
};
use empathia::config::AppConfig;
use empathia::error::AppError;
use empathia::telemetry;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// Age bracket, e.g. 26-35
    #[arg(long)]
    pub(crate) age_group: String,
    #[arg(long)]
    pub(crate) gender: String,
    /// Country of origin
    #[arg(long)]
    pub(crate) origin: String,
    #[arg(long)]
    pub(crate) education: String,
    /// English proficiency (Yes/No)
    #[arg(long)]
    pub(crate) english: String,
    /// Case dataset (JSON or CSV). Defaults to EMPATHIA_CASES_PATH or the bundled sample.
    #[arg(long)]
    pub(crate) cases: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct SyntheticArgs {
    /// Age in years; a bracket such as "26-35" reads its lower bound
    #[arg(long)]
    pub(crate) age: String,
    #[arg(long)]
    pub(crate) gender: String,
    #[arg(long)]
    pub(crate) origin: String,
    #[arg(long)]
    pub(crate) education: String,
    #[arg(long)]
    pub(crate) english: String,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Case dataset (JSON or CSV). Defaults to EMPATHIA_CASES_PATH or the bundled sample.
    #[arg(long)]
    pub(crate) cases: Option<PathBuf>,
    /// Simulated assessment delay in milliseconds. Defaults to EMPATHIA_ASSESSMENT_DELAY_MS.
    #[arg(long, value_parser = crate::infra::parse_delay_ms)]
    pub(crate) delay_ms: Option<Duration>,
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let AssessArgs {
        age_group,
        gender,
        origin,
        education,
        english,
        cases,
    } = args;

    let config = AppConfig::load()?;
    let cases = cases.or(config.data.cases_path);
    let service = loaded_service(cases.as_deref())?;

    let query = CaseQuery {
        age_group,
        gender,
        origin,
        education,
        english,
    };
    let assessment = service.assess(&query)?;
    print!("{}", render_case_assessment(&query, &assessment));
    Ok(())
}

pub(crate) fn run_synthetic(args: SyntheticArgs) -> Result<(), AppError> {
    let profile = SyntheticProfile {
        age: args.age,
        gender: args.gender,
        origin: args.origin,
        education: args.education,
        english: args.english,
    };
    let assessment = SyntheticScorer.assess(&profile);
    print!("{}", render_synthetic_assessment(&profile, &assessment));
    Ok(())
}

pub(crate) fn run_profile_list() -> Result<(), AppError> {
    let registry = ProfileRegistry::embedded()?;
    println!("Refugee profiles ({})", registry.len());
    for summary in registry.list() {
        println!("- {}", summary.label);
    }
    Ok(())
}

pub(crate) fn run_profile_show(refugee_code: &str) -> Result<(), AppError> {
    let registry = ProfileRegistry::embedded()?;
    let profile = registry.get(refugee_code)?;
    println!("{}", profile.label());
    print!("{}", render_profile_assessment(&profile.assessment()));
    Ok(())
}

/// Interactive loop over stdin. Each line is a refugee code or a comma-separated
/// `age_group,gender,origin,education,english` query; a blank line clears the selection.
pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let cases = args.cases.or(config.data.cases_path);
    let delay = args.delay_ms.unwrap_or(config.data.assessment_delay);
    let service = Arc::new(loaded_service(cases.as_deref())?);
    let runner = AssessmentRunner::new(delay);
    let mut selection = Selection::default();

    println!(
        "EMPATHIA multi-perspective assessment demo ({} ms per assessment)",
        runner.delay().as_millis()
    );
    println!("Enter a refugee code (e.g. REF-0003) or age_group,gender,origin,education,english");

    let mut pending: Option<tokio::task::JoinHandle<()>> = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            selection.clear();
            runner.cancel_pending();
            println!("Selection cleared");
            continue;
        }

        let request = match parse_demo_request(line) {
            Ok(request) => request,
            Err(message) => {
                warn!(input = line, "{message}");
                continue;
            }
        };
        if let DemoRequest::Profile(code) = &request {
            selection.select(code.clone());
        }

        println!("Running multi-perspective assessment...");
        let ticket = runner.begin();
        pending = Some(spawn_assessment(Arc::clone(&service), ticket, request));
    }

    if let Some(handle) = pending {
        if let Err(join_err) = handle.await {
            warn!(error = %join_err, "assessment task failed");
        }
    }

    if let Some(code) = selection.current() {
        info!(refugee_code = code, "demo finished with profile selected");
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
enum DemoRequest {
    Profile(String),
    Case(CaseQuery),
}

enum DemoOutcome {
    Profile(ProfileAssessment),
    Case(CaseQuery, Box<CaseAssessment>),
}

fn parse_demo_request(line: &str) -> Result<DemoRequest, String> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    match fields.as_slice() {
        [code] => Ok(DemoRequest::Profile(code.to_string())),
        [age_group, gender, origin, education, english] => Ok(DemoRequest::Case(CaseQuery {
            age_group: age_group.to_string(),
            gender: gender.to_string(),
            origin: origin.to_string(),
            education: education.to_string(),
            english: english.to_string(),
        })),
        _ => Err(format!(
            "expected a refugee code or 5 comma-separated attributes, got {} fields",
            fields.len()
        )),
    }
}

/// Detached once superseded; a dropped handle leaves the task to resolve on its own.
fn spawn_assessment(
    service: Arc<AssessmentService>,
    ticket: Ticket,
    request: DemoRequest,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let outcome = ticket.run(move || evaluate(&service, request)).await;

        match outcome {
            Ok(Ok(DemoOutcome::Profile(assessment))) => {
                print!("{}", render_profile_assessment(&assessment));
            }
            Ok(Ok(DemoOutcome::Case(query, assessment))) => {
                print!("{}", render_case_assessment(&query, &assessment));
            }
            Ok(Err(err)) => println!("Assessment failed: {err}"),
            Err(superseded) => {
                debug!(
                    generation = superseded.generation,
                    latest = superseded.latest,
                    "discarding superseded assessment"
                );
            }
        }
    })
}

fn evaluate(service: &AssessmentService, request: DemoRequest) -> Result<DemoOutcome, AppError> {
    match request {
        DemoRequest::Profile(code) => Ok(DemoOutcome::Profile(service.profile_assessment(&code)?)),
        DemoRequest::Case(query) => {
            let assessment = service.assess(&query)?;
            Ok(DemoOutcome::Case(query, Box::new(assessment)))
        }
    }
}

pub(crate) fn render_case_assessment(query: &CaseQuery, assessment: &CaseAssessment) -> String {
    let mut out = String::new();
    writeln!(&mut out, "Case assessment for {query}").expect("write heading");
    writeln!(
        &mut out,
        "- matched case {} ({}) | {}",
        assessment.case_id_short, assessment.profile_summary, assessment.match_label
    )
    .expect("write matched case");
    if !assessment.exact_match {
        writeln!(
            &mut out,
            "- note: no exact match; showing the closest available case"
        )
        .expect("write fallback note");
    }
    writeln!(
        &mut out,
        "- averages: {}",
        dimension_line(&assessment.average_scores)
    )
    .expect("write averages");
    out.push_str("Country rankings:\n");
    for (position, ranking) in assessment.rankings.iter().enumerate() {
        writeln!(
            &mut out,
            "  {}. {}: {:.2} (emotional {:.1}, cultural {:.1}, ethical {:.1})",
            position + 1,
            ranking.name,
            ranking.weighted,
            ranking.emotional,
            ranking.cultural,
            ranking.ethical
        )
        .expect("write ranking");
    }
    writeln!(
        &mut out,
        "Recommendation: {} ({:.2})",
        assessment.recommended_country, assessment.recommended_score
    )
    .expect("write recommendation");
    writeln!(&mut out, "{}", assessment.rationale()).expect("write rationale");
    out
}

pub(crate) fn render_synthetic_assessment(
    profile: &SyntheticProfile,
    assessment: &SyntheticAssessment,
) -> String {
    let mut out = String::new();
    writeln!(
        &mut out,
        "Legacy assessment for {} / {} / {} / {} / english {}",
        profile.age, profile.gender, profile.origin, profile.education, profile.english
    )
    .expect("write heading");
    writeln!(
        &mut out,
        "- {} | weighted {:.1}",
        dimension_line(&assessment.scores),
        assessment.weighted
    )
    .expect("write scores");
    out.push_str("Country scores:\n");
    for entry in &assessment.rankings {
        writeln!(&mut out, "  - {}: {:.1}", entry.country, entry.score)
            .expect("write country score");
    }
    writeln!(
        &mut out,
        "Recommendation: {} ({:.1})",
        assessment.recommended_country, assessment.recommended_score
    )
    .expect("write recommendation");
    out
}

pub(crate) fn render_profile_assessment(assessment: &ProfileAssessment) -> String {
    let mut out = String::new();
    writeln!(
        &mut out,
        "{} recommended for {} (overall {:.1}/10)",
        assessment.recommended_country, assessment.refugee_code, assessment.overall_score
    )
    .expect("write heading");
    for agent in &assessment.agents {
        writeln!(
            &mut out,
            "[{} | {} {:.1}/10] {}",
            agent.agent,
            agent.dimension.label(),
            agent.score,
            agent.reasoning
        )
        .expect("write agent");
    }
    writeln!(
        &mut out,
        "Validator consensus: {}",
        assessment.validator_consensus
    )
    .expect("write consensus");
    out
}

fn dimension_line(scores: &DimensionScores) -> String {
    Dimension::ordered()
        .into_iter()
        .map(|dimension| format!("{} {:.1}", dimension.label(), scores.get(dimension)))
        .collect::<Vec<_>>()
        .join(" | ")
}
