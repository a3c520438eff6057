//! Age-banded math assessment: question bank, feedback resolution and results report.

pub mod bank;
pub mod domain;
pub mod export;
pub mod report;
pub mod resolver;
pub mod responses;
pub mod router;
pub mod service;

pub use bank::{QuestionBank, QuestionBankError};
pub use domain::{AgeGroup, AnswerOption, Feedback, Gender, Question};
pub use export::{export_report, DocumentExporter, ExportError, ExportedDocument, GoogleDocsExporter};
pub use report::{AssessmentReport, ReportAssembler, ReportSection};
pub use resolver::{Resolution, ResponseResolver, Unresolved};
pub use responses::{ChildProfile, ContactDetails, FinalizedResponses, ResponseError, ResponseSet};
pub use router::assessment_router;
pub use service::{AssessmentService, AssessmentServiceError, FeedbackRequest, ReportRequest};
