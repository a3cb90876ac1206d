use color_eyre::eyre::Context;
use serde::Serialize;

use crate::forms::FormErrors;

/// Every page the presentation layer knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Home,
    Venues,
    SearchVenues,
    ShowVenue,
    NewVenue,
    EditVenue,
    Artists,
    SearchArtists,
    ShowArtist,
    NewArtist,
    EditArtist,
    Shows,
    NewShow,
    NotFound,
    ServerError,
}

/// Everything a page needs, with no request-scoped globals.
#[derive(Debug, Clone, Serialize)]
pub struct View {
    pub page: Page,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub flashes: Vec<String>,
    #[serde(skip_serializing_if = "FormErrors::is_empty")]
    pub form_errors: FormErrors,
    pub data: serde_json::Value,
}

impl View {
    pub fn new(page: Page) -> Self {
        Self {
            page,
            flashes: Vec::new(),
            form_errors: FormErrors::default(),
            data: serde_json::Value::Null,
        }
    }

    pub fn with_data<T: Serialize>(mut self, data: &T) -> color_eyre::Result<Self> {
        self.data = serde_json::to_value(data)
            .wrap_err_with(|| format!("Failed to build view model for {:?}", self.page))?;
        Ok(self)
    }

    pub fn with_flashes(mut self, flashes: impl IntoIterator<Item = String>) -> Self {
        self.flashes.extend(flashes);
        self
    }

    pub fn with_flash(mut self, flash: impl Into<String>) -> Self {
        self.flashes.push(flash.into());
        self
    }

    pub fn with_form_errors(mut self, form_errors: FormErrors) -> Self {
        self.form_errors = form_errors;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub content_type: &'static str,
    pub body: String,
}

/// Turns a view into markup (or any other wire format).
pub trait Renderer: Send + Sync {
    fn render(&self, view: &View) -> color_eyre::Result<Rendered>;
}

/// Serializes the whole view as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, view: &View) -> color_eyre::Result<Rendered> {
        let body = serde_json::to_string(view).wrap_err("Failed to serialize view")?;
        Ok(Rendered {
            content_type: "application/json",
            body,
        })
    }
}
