//! Server-rendered pages and the report chart

pub mod chart;
pub mod format;
pub mod page;

pub use chart::render_chart;
pub use page::{
    login_page, not_found_page, register_page, report_page, LoginFormState, Notice, NoticeKind,
    ReportPage,
};
