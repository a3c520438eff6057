use lead_assessment::workflows::assessment::report::render::{render_report_html, render_report_text};
use lead_assessment::workflows::assessment::report::{child_display_name, NO_DATA_LABEL};
use lead_assessment::workflows::assessment::{
    AgeGroup, QuestionBank, ReportAssembler, ResponseSet, Unresolved,
};

fn completed_early_years(bank: &QuestionBank) -> ResponseSet {
    let mut responses = ResponseSet::for_age_group(AgeGroup::EarlyYears);
    responses.set_child_name("Sam");
    for question in bank.questions_for(AgeGroup::EarlyYears) {
        responses.record_answer(question.ordinal, question.options[0].text.clone());
    }
    responses
}

#[test]
fn fully_answered_group_yields_matched_sections_in_order() {
    let bank = QuestionBank::bundled().expect("bundled bank loads");
    let responses = completed_early_years(&bank);

    let sections = ReportAssembler::new(&bank).assemble(AgeGroup::EarlyYears, &responses, "Sam");

    assert_eq!(sections.len(), 9);
    assert!(sections.iter().all(|section| section.is_resolved()));
    assert_eq!(
        sections.iter().map(|section| section.ordinal).collect::<Vec<_>>(),
        (1..=9).collect::<Vec<_>>()
    );
    assert_eq!(
        sections[0].message,
        "Sam is showing real confidence with counting objects to ten!"
    );
    assert!(sections.iter().all(|section| !section.message.contains("[Child")));
}

#[test]
fn unsetting_a_step_turns_its_section_into_a_placeholder() {
    let bank = QuestionBank::bundled().expect("bundled bank loads");
    let mut responses = completed_early_years(&bank);
    responses.clear_answer(5);

    let sections = ReportAssembler::new(&bank).assemble(AgeGroup::EarlyYears, &responses, "Sam");

    assert_eq!(sections.len(), 9);
    let fifth = &sections[4];
    assert_eq!(fifth.ordinal, 5);
    assert_eq!(fifth.identified_issue, NO_DATA_LABEL);
    assert_eq!(fifth.strength, "-");
    assert_eq!(fifth.improve, "-");
    assert_eq!(fifth.message, "");
    assert_eq!(fifth.display_message(), "");
    assert_eq!(fifth.resolution, Some(Unresolved::Unanswered));
    assert_eq!(sections.iter().filter(|section| section.is_resolved()).count(), 8);
}

#[test]
fn assembly_is_idempotent() {
    let bank = QuestionBank::bundled().expect("bundled bank loads");
    let responses = completed_early_years(&bank);
    let assembler = ReportAssembler::new(&bank);

    let first = assembler.report(AgeGroup::EarlyYears, &responses, "Sam");
    let second = assembler.report(AgeGroup::EarlyYears, &responses, "Sam");

    assert_eq!(first, second);
    assert_eq!(render_report_html(&first), render_report_html(&second));
}

#[test]
fn empty_response_set_still_covers_every_question() {
    let bank = QuestionBank::bundled().expect("bundled bank loads");
    let responses = ResponseSet::new();

    for group in AgeGroup::ordered() {
        let sections = ReportAssembler::new(&bank).assemble(group, &responses, "your child");
        assert_eq!(sections.len(), bank.question_count(group));
        assert!(sections.iter().all(|section| !section.is_resolved()));
    }
}

#[test]
fn custom_bank_substitutes_name_and_quotes_messages() {
    let bank = QuestionBank::from_json_str(
        r#"{
            "Age (6-9)": [
                {
                    "question": "Does your child enjoy puzzles?",
                    "options": [
                        {
                            "text": "Yes",
                            "feedback": {
                                "identified_issue": "Puzzle lover",
                                "strength": "Persistence",
                                "improve": "Harder puzzles",
                                "message": "[Child's Name] is great",
                                "why_this_matters": "Puzzles help [Child’s Name] reason."
                            }
                        },
                        {
                            "text": "No",
                            "feedback": {
                                "identified_issue": "Not yet keen",
                                "strength": "Curiosity",
                                "improve": "Short puzzles",
                                "message": "\"Every step counts\""
                            }
                        }
                    ]
                }
            ]
        }"#,
    )
    .expect("plain mapping loads");

    let mut responses = ResponseSet::for_age_group(AgeGroup::LowerPrimary);
    responses.record_answer(1, "Yes");
    let name = child_display_name(Some("  Sam "));
    let report = ReportAssembler::new(&bank).report(AgeGroup::LowerPrimary, &responses, &name);

    let section = &report.sections[0];
    assert_eq!(section.message, "Sam is great");
    assert_eq!(section.display_message(), "\"Sam is great\"");
    assert_eq!(section.why_this_matters, "Puzzles help Sam reason.");

    responses.record_answer(1, "No");
    let report = ReportAssembler::new(&bank).report(AgeGroup::LowerPrimary, &responses, &name);
    assert_eq!(report.sections[0].display_message(), "\"Every step counts\"");

    let text = render_report_text(&report);
    assert!(text.contains("Math Assessment Result!"));
    assert!(text.contains("\"Every step counts\""));
}

#[test]
fn unmatched_answer_text_is_case_sensitive() {
    let bank = QuestionBank::bundled().expect("bundled bank loads");
    let mut responses = ResponseSet::for_age_group(AgeGroup::EarlyYears);
    responses.record_answer(1, "not yet");

    let sections = ReportAssembler::new(&bank).assemble(AgeGroup::EarlyYears, &responses, "your child");

    assert_eq!(sections[0].resolution, Some(Unresolved::UnmatchedAnswer));
    assert_eq!(sections[0].answer.as_deref(), Some("not yet"));
    assert_eq!(sections[0].identified_issue, NO_DATA_LABEL);
}
