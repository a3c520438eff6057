use clap::Args;
use lead_assessment::error::AppError;
use lead_assessment::workflows::assessment::report::render::{
    render_report_html, render_report_text,
};
use lead_assessment::workflows::assessment::{
    AgeGroup, AssessmentReport, AssessmentService, QuestionBank, ReportRequest,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct QuestionsArgs {
    /// Age group key or form label, e.g. "Age (3-6)" or "3-6 years"
    #[arg(long)]
    pub(crate) age_group: String,
    /// Question bank JSON to use instead of the bundled one
    #[arg(long)]
    pub(crate) bank: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// JSON file with `age_group`, `answers` (step -> option text) and optional `child_name`
    #[arg(long)]
    pub(crate) responses: PathBuf,
    /// Child name to show in the report; overrides the one in the responses file
    #[arg(long)]
    pub(crate) child_name: Option<String>,
    /// Write the HTML rendering to this path instead of printing text
    #[arg(long)]
    pub(crate) html: Option<PathBuf>,
    /// Question bank JSON to use instead of the bundled one
    #[arg(long)]
    pub(crate) bank: Option<PathBuf>,
}

pub(crate) fn load_bank(path: Option<&Path>) -> Result<QuestionBank, AppError> {
    let bank = match path {
        Some(path) => QuestionBank::from_path(path)?,
        None => QuestionBank::bundled()?,
    };
    Ok(bank)
}

pub(crate) fn run_questions(args: QuestionsArgs) -> Result<(), AppError> {
    let bank = load_bank(args.bank.as_deref())?;
    let group = AgeGroup::from_key(&args.age_group).ok_or_else(|| {
        AppError::Usage(format!(
            "unknown age group '{}'; expected one of: {}",
            args.age_group,
            AgeGroup::ordered()
                .iter()
                .map(|group| group.key())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    })?;

    println!("{} ({} questions, bank {})", group, bank.question_count(group), bank.version());
    for question in bank.questions_for(group) {
        println!("\n{}. {}", question.ordinal, question.prompt);
        for option in question.option_texts() {
            println!("   - {option}");
        }
    }
    Ok(())
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let bank = load_bank(args.bank.as_deref())?;
    let raw = fs::read_to_string(&args.responses)?;
    let report = build_report(bank, &raw, args.child_name)?;

    match args.html {
        Some(path) => {
            fs::write(&path, render_report_html(&report))?;
            println!(
                "Wrote {} ({}/{} questions answered) to {}",
                report.title(),
                report.resolved_count(),
                report.sections.len(),
                path.display()
            );
        }
        None => print!("{}", render_report_text(&report)),
    }
    Ok(())
}

fn build_report(
    bank: QuestionBank,
    raw: &str,
    child_name: Option<String>,
) -> Result<AssessmentReport, AppError> {
    let mut request: ReportRequest = serde_json::from_str(raw)
        .map_err(|err| AppError::Usage(format!("responses file is not valid JSON: {err}")))?;
    if child_name.is_some() {
        request.child_name = child_name;
    }

    AssessmentService::new(Arc::new(bank))
        .report(&request)
        .map_err(|err| AppError::Usage(err.to_string()))
}
