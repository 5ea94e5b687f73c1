//! HTML pages.
//!
//! Handlers drive the views and render the result through embedded
//! templates. Catalog and validation failures become inline page state;
//! only rendering and storage failures surface as error responses.

mod detail;
mod login;
mod search;
mod signup;

pub use detail::*;
pub use login::*;
pub use search::*;
pub use signup::*;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use minijinja::Environment;
use serde::Serialize;

use crate::errors::AppError;
use crate::AppState;

/// Seconds before a page showing an unfinished request reloads itself.
const LOADING_REFRESH_SECS: u64 = 1;

/// Compiled page templates. HTML auto-escaping applies to every `.html` template.
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn load() -> Result<Self, AppError> {
        let mut env = Environment::new();
        env.add_template("base.html", include_str!("../../templates/base.html"))?;
        env.add_template("login.html", include_str!("../../templates/login.html"))?;
        env.add_template("signup.html", include_str!("../../templates/signup.html"))?;
        env.add_template("search.html", include_str!("../../templates/search.html"))?;
        env.add_template("detail.html", include_str!("../../templates/detail.html"))?;
        Ok(Self { env })
    }

    pub fn render<S: Serialize>(&self, name: &str, context: S) -> Result<String, AppError> {
        let template = self.env.get_template(name)?;
        Ok(template.render(context)?)
    }
}

/// Render `template` with `context` into an HTML response.
fn render_page<S: Serialize>(
    state: &AppState,
    status: StatusCode,
    template: &str,
    context: S,
) -> Result<Response, AppError> {
    let html = state.templates.render(template, context)?;
    Ok((status, Html(html)).into_response())
}
