//! Login and registration pages

use axum::{extract::State, response::Html, Form};
use serde::Deserialize;
use validator::Validate;

use super::{default_threshold, validation_message};
use crate::render::format::login_confirmation;
use crate::render::{login_page, register_page, LoginFormState, Notice};
use crate::report::{DisplayThreshold, ThresholdError};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    /// Present ("on") when the advanced threshold box is ticked
    pub custom_threshold: Option<String>,
    pub threshold: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Validate)]
pub struct LoginInput {
    #[validate(length(min = 1, message = "Missing username or password"))]
    pub username: String,
    #[validate(length(min = 1, message = "Missing username or password"))]
    pub password: String,
    #[validate(range(min = 0.5, max = 1.0, message = "Threshold must be between 0.50 and 1.00"))]
    pub threshold: Option<f64>,
}

#[derive(Debug, Validate)]
pub struct RegisterInput {
    #[validate(length(min = 1, message = "Missing username or password"))]
    pub username: String,
    #[validate(length(min = 1, message = "Missing username or password"))]
    pub password: String,
}

impl LoginForm {
    fn wants_custom_threshold(&self) -> bool {
        self.custom_threshold.is_some()
    }

    /// Checked input, or the message to show
    pub fn into_input(self) -> Result<LoginInput, String> {
        let threshold = if self.wants_custom_threshold() {
            let raw = self.threshold.as_deref().unwrap_or_default().trim();
            let value = raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| ThresholdError::NotANumber.to_string())?;
            Some(value)
        } else {
            None
        };

        let input = LoginInput {
            username: self.username.trim().to_string(),
            password: self.password,
            threshold,
        };
        input.validate().map_err(|e| validation_message(&e))?;
        Ok(input)
    }
}

impl RegisterForm {
    pub fn into_input(self) -> Result<RegisterInput, String> {
        let input = RegisterInput {
            username: self.username.trim().to_string(),
            password: self.password,
        };
        input.validate().map_err(|e| validation_message(&e))?;
        Ok(input)
    }
}

pub async fn login_form(State(state): State<AppState>) -> Html<String> {
    let form = LoginFormState {
        threshold: default_threshold(&state.config),
        ..Default::default()
    };
    Html(login_page(&form, None))
}

pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Html<String> {
    let mut page = LoginFormState {
        username: form.username.trim().to_string(),
        custom_threshold: form.wants_custom_threshold(),
        threshold: form
            .threshold
            .as_deref()
            .and_then(|t| DisplayThreshold::parse(t).ok())
            .unwrap_or_else(|| default_threshold(&state.config)),
    };

    let input = match form.into_input() {
        Ok(input) => input,
        Err(message) => {
            tracing::debug!(username = %page.username, "Login rejected locally: {}", message);
            return Html(login_page(&page, Some(&Notice::error(message))));
        }
    };

    let notice = match state
        .client
        .login(&input.username, &input.password, input.threshold)
        .await
    {
        Ok(ok) => {
            tracing::info!(username = %ok.data.username, similarity = ok.data.similarity, "Login accepted");
            Notice::success(login_confirmation(&ok.data))
        }
        Err(failure) => Notice::error(failure.message),
    };

    // Keep the username for a retry, never the password
    page.username = input.username;
    Html(login_page(&page, Some(&notice)))
}

pub async fn register_form() -> Html<String> {
    Html(register_page("", None))
}

pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Html<String> {
    let username = form.username.trim().to_string();

    let input = match form.into_input() {
        Ok(input) => input,
        Err(message) => return Html(register_page(&username, Some(&Notice::error(message)))),
    };

    match state.client.register(&input.username, &input.password).await {
        Ok(ok) => {
            tracing::info!(username = %ok.data.username, "Registered");
            let text = format!(
                "{} You can now log in as {}.",
                ok.message.unwrap_or_else(|| "Registration successful!".to_string()),
                ok.data.username
            );
            Html(register_page("", Some(&Notice::success(text))))
        }
        Err(failure) => Html(register_page(&username, Some(&Notice::error(failure.message)))),
    }
}
