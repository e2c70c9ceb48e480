//! HTML pages
//!
//! Every page shares one layout. Forms disable their submit button while a
//! request is in flight so a second submit cannot race the first.

use super::chart::render_chart;
use super::format::{percent, similarity, status_label, timestamp, xml_escape};
use crate::report::threshold::{MAX_THRESHOLD, MIN_THRESHOLD};
use crate::report::{DisplayThreshold, ReportSummary, ReportView};

const THRESHOLD_STEP: f64 = 0.01;

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;margin:0;background:#f5f6f8;color:#222}\
header{background:#2c3e50;color:#fff;padding:12px 24px;display:flex;gap:24px;align-items:center}\
header h1{font-size:20px;margin:0}\
nav a{color:#cfd8dc;margin-right:16px;text-decoration:none}\
nav a.active{color:#fff;font-weight:bold}\
main{max-width:960px;margin:24px auto;background:#fff;padding:24px;border-radius:6px}\
footer{text-align:center;color:#888;font-size:12px;padding:16px}\
.notice{padding:10px 14px;border-radius:4px;margin-bottom:16px}\
.notice--success{background:#e0f4ea;color:#1b5e20}\
.notice--error{background:#fdecea;color:#b71c1c}\
.warning{background:#fff8e1;padding:10px 14px;border-radius:4px}\
table{border-collapse:collapse;width:100%;font-size:13px}\
th,td{border-bottom:1px solid #eee;padding:6px 8px;text-align:left}\
.status--success{color:#00796b}.status--failure{color:#c62828}\
.summary{display:flex;gap:24px;flex-wrap:wrap}";

const DISABLE_ON_SUBMIT: &str =
    "<script>document.querySelectorAll('form').forEach(function(f){f.addEventListener('submit',function(){var b=f.querySelector('button[type=submit]');if(b){b.disabled=true;b.textContent=b.dataset.busy||b.textContent;}});});</script>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// The terminal message of a user action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }

    fn render(&self) -> String {
        let class = match self.kind {
            NoticeKind::Success => "notice notice--success",
            NoticeKind::Error => "notice notice--error",
        };
        format!(
            "<div class=\"{class}\" role=\"status\">{}</div>",
            xml_escape(&self.text)
        )
    }
}

/// Which nav entry is highlighted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Login,
    Register,
    Report,
    None,
}

pub fn layout(title: &str, active: Nav, body: &str) -> String {
    let link = |href: &str, label: &str, nav: Nav| {
        let class = if nav == active { " class=\"active\"" } else { "" };
        format!("<a href=\"{href}\"{class}>{label}</a>")
    };

    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
<title>{} | Semantic Authentication</title><style>{STYLE}</style></head><body>\
<header><h1>Semantic Authentication</h1><nav>{}{}{}</nav></header>\
<main>{body}</main>\
<footer>Semantic Authentication demo v{}</footer>{DISABLE_ON_SUBMIT}</body></html>",
        xml_escape(title),
        link("/login", "Login", Nav::Login),
        link("/register", "Register", Nav::Register),
        link("/report", "Report", Nav::Report),
        env!("CARGO_PKG_VERSION"),
    )
}

fn notice_html(notice: Option<&Notice>) -> String {
    notice.map(Notice::render).unwrap_or_default()
}

fn threshold_slider(id: &str, value: f64) -> String {
    format!(
        "<input type=\"range\" id=\"{id}\" name=\"threshold\" min=\"{MIN_THRESHOLD}\" max=\"{MAX_THRESHOLD}\" step=\"{THRESHOLD_STEP}\" value=\"{value:.2}\" \
oninput=\"this.nextElementSibling.textContent=Number(this.value).toFixed(2)\"><output>{value:.2}</output>"
    )
}

// ============================================================================
// LOGIN / REGISTER
// ============================================================================

/// What the login form shows after a round trip
#[derive(Debug, Clone, Default)]
pub struct LoginFormState {
    pub username: String,
    pub custom_threshold: bool,
    pub threshold: DisplayThreshold,
}

pub fn login_page(form: &LoginFormState, notice: Option<&Notice>) -> String {
    let checked = if form.custom_threshold { " checked" } else { "" };
    let body = format!(
        "<h2>Login</h2>{}\
<form method=\"post\" action=\"/login\">\
<p><label for=\"username\">Username</label><br><input id=\"username\" name=\"username\" value=\"{}\" autocomplete=\"username\"></p>\
<p><label for=\"password\">Password</label><br><input id=\"password\" name=\"password\" type=\"password\" autocomplete=\"current-password\"></p>\
<details{}><summary>Advanced</summary>\
<p><label><input type=\"checkbox\" name=\"custom_threshold\" value=\"on\"{checked}> Use custom similarity threshold</label></p>\
<p><label for=\"threshold\">Threshold</label> {}</p>\
</details>\
<p><button type=\"submit\" data-busy=\"Logging in...\">Login</button></p>\
</form>\
<p>No account yet? <a href=\"/register\">Register</a></p>",
        notice_html(notice),
        xml_escape(&form.username),
        if form.custom_threshold { " open" } else { "" },
        threshold_slider("threshold", form.threshold.get()),
    );
    layout("Login", Nav::Login, &body)
}

pub fn register_page(username: &str, notice: Option<&Notice>) -> String {
    let body = format!(
        "<h2>Register</h2>{}\
<p class=\"warning\">This is a demonstration system. Do not use a real password: login attempts, including the password typed, are shown on the report page.</p>\
<form method=\"post\" action=\"/register\">\
<p><label for=\"username\">Username</label><br><input id=\"username\" name=\"username\" value=\"{}\" autocomplete=\"username\"></p>\
<p><label for=\"password\">Password</label><br><input id=\"password\" name=\"password\" type=\"password\" autocomplete=\"new-password\"></p>\
<p><button type=\"submit\" data-busy=\"Registering...\">Register</button></p>\
</form>\
<p>Already registered? <a href=\"/login\">Login</a></p>",
        notice_html(notice),
        xml_escape(username),
    );
    layout("Register", Nav::Register, &body)
}

// ============================================================================
// REPORT
// ============================================================================

pub struct ReportPage<'a> {
    pub subject: &'a str,
    pub threshold: DisplayThreshold,
    pub view: Option<&'a ReportView>,
    /// Cache number of the shown report, carried by the redraw form
    pub report: Option<u64>,
    pub notice: Option<&'a Notice>,
}

pub fn report_page(page: &ReportPage<'_>) -> String {
    let mut body = format!(
        "<h2>Login Attempt Report</h2>{}\
<form method=\"get\" action=\"/report\">\
<p><label for=\"username\">Username</label> <input id=\"username\" name=\"username\" value=\"{}\" placeholder=\"all users\"> \
<label for=\"threshold\">Threshold</label> {} \
<button type=\"submit\" data-busy=\"Loading...\">Fetch report</button></p>\
</form>",
        notice_html(page.notice),
        xml_escape(page.subject),
        threshold_slider("threshold", page.threshold.get()),
    );

    if let Some(view) = page.view {
        body.push_str(&summary_html(&view.summary, view.threshold));
        body.push_str(&render_chart(&view.dataset, view.threshold));
        if let Some(report) = page.report {
            body.push_str(&format!(
                "<form method=\"get\" action=\"/report/view\">\
<input type=\"hidden\" name=\"report\" value=\"{report}\">\
<p><label for=\"redraw\">Redraw at threshold</label> {} <button type=\"submit\">Redraw</button></p>\
</form>",
                threshold_slider("redraw", view.threshold.get()),
            ));
        }
        body.push_str(&attempts_table(view));
        body.push_str(EXPLANATION);
    }

    layout("Report", Nav::Report, &body)
}

fn summary_html(summary: &ReportSummary, threshold: DisplayThreshold) -> String {
    let rate = summary.pass_rate.map(percent).unwrap_or_else(|| "n/a".to_string());
    let mean = summary
        .mean_similarity
        .map(similarity)
        .unwrap_or_else(|| "n/a".to_string());

    let mut html = format!(
        "<div class=\"summary\">\
<div><strong>Attempts</strong><br>{}</div>\
<div><strong>Successful</strong><br>{}</div>\
<div><strong>Failed</strong><br>{}</div>\
<div><strong>Pass rate</strong><br>{rate}</div>\
<div><strong>Average similarity</strong><br>{mean}</div>\
<div><strong>At or above {threshold}</strong><br>{}</div>\
</div>",
        summary.total, summary.successes, summary.failures, summary.at_or_above_threshold,
    );

    if summary.invalid_similarity > 0 {
        html.push_str(&format!(
            "<p class=\"warning\">{} attempt(s) had no valid similarity and are plotted at 0.</p>",
            summary.invalid_similarity
        ));
    }
    html
}

fn attempts_table(view: &ReportView) -> String {
    let mut html = String::from(
        "<h3>Attempts</h3><table><thead><tr><th>#</th><th>Username</th><th>Password Attempt</th><th>Similarity</th><th>Timestamp</th><th>Status</th></tr></thead><tbody>",
    );

    for attempt in &view.window {
        let status_class = if attempt.passed {
            "status--success"
        } else {
            "status--failure"
        };
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td class=\"{status_class}\">{}</td></tr>",
            attempt.position,
            xml_escape(attempt.subject.as_deref().unwrap_or("-")),
            xml_escape(&attempt.input),
            similarity(attempt.similarity),
            xml_escape(&timestamp(&attempt.timestamp)),
            status_label(attempt.passed),
        ));
    }

    html.push_str("</tbody></table>");
    html
}

const EXPLANATION: &str = "<h3>Reading the chart</h3><ul>\
<li>Each mark is one login attempt, oldest on the left.</li>\
<li>Circles passed and triangles failed, as decided at login time.</li>\
<li>The dashed line is the threshold chosen above. Moving it does not change past outcomes.</li>\
</ul>";

pub fn not_found_page() -> String {
    layout(
        "Not found",
        Nav::None,
        "<h2>Page not found</h2><p><a href=\"/login\">Back to login</a></p>",
    )
}
