//! Handlebars registry for the admin pages

use handlebars::{Handlebars, TemplateError};
use serde::Serialize;

use crate::error::AppResult;

/// Partials, registered under their short name
const PARTIALS: &[(&str, &str)] = &[
    ("layout", include_str!("../../templates/layout.hbs")),
    ("pagination", include_str!("../../templates/common/pagination.hbs")),
    ("form_errors", include_str!("../../templates/common/form_errors.hbs")),
];

const TEMPLATES: &[(&str, &str)] = &[
    ("admin/author/index", include_str!("../../templates/admin/author/index.hbs")),
    ("admin/author/create", include_str!("../../templates/admin/author/create.hbs")),
    ("admin/author/show", include_str!("../../templates/admin/author/show.hbs")),
    ("admin/author/edit", include_str!("../../templates/admin/author/edit.hbs")),
    ("admin/author/add_book", include_str!("../../templates/admin/author/add_book.hbs")),
    ("admin/book/index", include_str!("../../templates/admin/book/index.hbs")),
    ("common/error", include_str!("../../templates/common/error.hbs")),
];

pub struct Views {
    registry: Handlebars<'static>,
}

impl Views {
    pub fn new() -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(false);

        for (name, source) in PARTIALS {
            registry.register_partial(name, *source)?;
        }
        for (name, source) in TEMPLATES {
            registry.register_template_string(name, *source)?;
        }

        Ok(Self { registry })
    }

    pub fn render(&self, name: &str, data: &impl Serialize) -> AppResult<String> {
        Ok(self.registry.render(name, data)?)
    }
}
