mod assembler;
pub mod render;
pub mod views;

pub use assembler::{
    child_display_name, quote_message, substitute_child_name, AssessmentReport, ReportAssembler,
    ReportSection, DEFAULT_DISPLAY_NAME, EMPTY_FIELD, NO_DATA_LABEL, REPORT_SUBTITLE,
    REPORT_TITLE,
};
