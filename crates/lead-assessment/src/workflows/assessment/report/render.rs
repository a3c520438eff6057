//! Screen and document renderings of an [`AssessmentReport`].

use std::fmt::Write as _;

use super::assembler::AssessmentReport;

/// Standalone HTML document, suitable for download or Google Docs upload.
pub fn render_report_html(report: &AssessmentReport) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\">");
    writeln!(html, "<title>{}</title></head><body>", escape_html(report.title()))
        .expect("write head");
    writeln!(html, "<h1>{}</h1>", escape_html(report.title())).expect("write title");
    writeln!(html, "<h2>{}</h2>", escape_html(report.subtitle())).expect("write subtitle");

    for section in &report.sections {
        html.push_str("<section>");
        writeln!(
            html,
            "<h3>Q{} Result: {}</h3>",
            section.ordinal,
            escape_html(&section.identified_issue)
        )
        .expect("write section heading");
        writeln!(html, "<p><small>{}</small></p>", escape_html(&section.question))
            .expect("write question");
        writeln!(
            html,
            "<h4>Strengths</h4><p>{}</p>",
            escape_html(&section.strength)
        )
        .expect("write strengths");
        writeln!(
            html,
            "<h4>Areas to Improve</h4><p>{}</p>",
            escape_html(&section.improve)
        )
        .expect("write improvements");

        let message = section.display_message();
        if !message.is_empty() {
            writeln!(html, "<p><em>{}</em></p>", escape_html(&message)).expect("write message");
        }
        if !section.why_this_matters.is_empty() {
            writeln!(html, "<p>{}</p>", escape_html(&section.why_this_matters))
                .expect("write why this matters");
        }
        html.push_str("</section>\n");
    }

    html.push_str("</body></html>\n");
    html
}

/// Plain-text rendering used by the CLI.
pub fn render_report_text(report: &AssessmentReport) -> String {
    let mut text = String::new();
    writeln!(text, "{}", report.title()).expect("write title");
    writeln!(text, "{}", report.subtitle()).expect("write subtitle");
    writeln!(
        text,
        "Age group: {} | Answered: {}/{}",
        report.age_group,
        report.resolved_count(),
        report.sections.len()
    )
    .expect("write overview");

    for section in &report.sections {
        text.push('\n');
        writeln!(
            text,
            "Q{} Result: {}",
            section.ordinal, section.identified_issue
        )
        .expect("write section heading");
        writeln!(text, "  Question: {}", section.question).expect("write question");
        if let Some(answer) = &section.answer {
            writeln!(text, "  Answer: {answer}").expect("write answer");
        }
        writeln!(text, "  Strengths: {}", section.strength).expect("write strengths");
        writeln!(text, "  Areas to Improve: {}", section.improve).expect("write improvements");

        let message = section.display_message();
        if !message.is_empty() {
            writeln!(text, "  {message}").expect("write message");
        }
        if !section.why_this_matters.is_empty() {
            writeln!(text, "  Why this matters: {}", section.why_this_matters)
                .expect("write why this matters");
        }
    }

    text
}

pub(crate) fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::assessment::{AgeGroup, QuestionBank, ReportAssembler, ResponseSet};

    fn report(responses: &ResponseSet) -> AssessmentReport {
        let bank = QuestionBank::bundled().expect("bundled bank loads");
        ReportAssembler::new(&bank).report(AgeGroup::EarlyYears, responses, "Sam")
    }

    #[test]
    fn html_escapes_and_lists_every_question() {
        let mut responses = ResponseSet::for_age_group(AgeGroup::EarlyYears);
        responses.record_answer(1, "Yes, accurately every time");
        let html = render_report_html(&report(&responses));

        assert_eq!(html.matches("<section>").count(), 9);
        assert!(html.contains("<h3>Q1 Result: Strong counting to ten</h3>"));
        assert!(html.contains("<h3>Q2 Result: No data</h3>"));
        assert!(html.contains("Here&#39;s what we discovered"));
        assert!(html.contains("<em>&quot;Sam is showing real confidence"));
    }

    #[test]
    fn text_omits_empty_message_lines() {
        let text = render_report_text(&report(&ResponseSet::new()));
        assert!(text.contains("Answered: 0/9"));
        assert!(text.contains("Q9 Result: No data"));
        assert!(!text.contains("Why this matters"));
        assert!(!text.contains("\"\""));
    }

    #[test]
    fn escape_html_covers_markup_characters() {
        assert_eq!(escape_html("<a href='x'>&</a>"), "&lt;a href=&#39;x&#39;&gt;&amp;&lt;/a&gt;");
    }
}
