//! Tera engine with built-in templates and on-disk overrides.

use std::path::Path;

use anyhow::{Context, Result};
use tera::Tera;
use tracing::{debug, info};

use super::helpers::{format_date_filter, osses_filter};

/// Templates compiled into the binary.
const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../../templates/base.html")),
    ("home.html", include_str!("../../templates/home.html")),
    ("entry.html", include_str!("../../templates/entry.html")),
    ("entry_list.html", include_str!("../../templates/entry_list.html")),
    ("developer.html", include_str!("../../templates/developer.html")),
    (
        "developer_list.html",
        include_str!("../../templates/developer_list.html"),
    ),
    ("search.html", include_str!("../../templates/search.html")),
    ("stats.html", include_str!("../../templates/stats.html")),
];

/// Theme engine for rendering pages.
pub struct ThemeEngine {
    tera: Tera,
}

impl ThemeEngine {
    /// Create a theme engine from the built-in templates, letting any
    /// `*.html` file under `template_dir` replace the built-in of the same
    /// name. A missing directory is not an error.
    pub fn new(template_dir: &Path) -> Result<Self> {
        let builtin = Self::builtin_tera()?;

        let mut tera = if template_dir.is_dir() {
            let pattern = template_dir.join("**/*.html");
            let pattern_str = pattern
                .to_str()
                .context("invalid template directory path")?;

            // Parse only: overrides may extend built-ins not yet loaded
            let mut overrides =
                Tera::parse(pattern_str).context("failed to parse template overrides")?;
            let count = overrides.get_template_names().count();
            info!(dir = %template_dir.display(), count, "loaded template overrides");

            // Templates already in `overrides` win
            overrides
                .extend(&builtin)
                .context("failed to merge built-in templates")?;
            overrides
        } else {
            debug!(dir = %template_dir.display(), "template directory missing, using built-ins");
            builtin
        };

        Self::register_filters(&mut tera);

        let template_names: Vec<_> = tera.get_template_names().collect();
        debug!(count = template_names.len(), "templates ready");

        Ok(Self { tera })
    }

    /// Create a theme engine with only the built-in templates.
    pub fn builtin() -> Result<Self> {
        let mut tera = Self::builtin_tera()?;
        Self::register_filters(&mut tera);
        Ok(Self { tera })
    }

    /// Create a theme engine with no templates (for testing).
    pub fn empty() -> Self {
        let mut tera = Tera::default();
        Self::register_filters(&mut tera);
        Self { tera }
    }

    fn builtin_tera() -> Result<Tera> {
        let mut tera = Tera::default();
        tera.add_raw_templates(BUILTIN_TEMPLATES.iter().copied())
            .context("failed to compile built-in templates")?;
        Ok(tera)
    }

    /// Register custom Tera filters.
    fn register_filters(tera: &mut Tera) {
        tera.register_filter("format_date", format_date_filter);
        tera.register_filter("osses", osses_filter);
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|t| t == name)
    }

    /// Render a template by name.
    pub fn render(&self, template: &str, context: &tera::Context) -> tera::Result<String> {
        self.tera.render(template, context)
    }
}
