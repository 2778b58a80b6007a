use std::collections::BTreeMap;

use pingstat_types::Result;

use crate::report_error;

/// Page source with `{{name}}` placeholders.
#[derive(Debug, Clone, Copy)]
pub struct Template {
    name: &'static str,
    source: &'static str,
}

pub const DAY: Template = Template::new("day", include_str!("../templates/day.html"));
pub const OVERVIEW: Template = Template::new("overview", include_str!("../templates/overview.html"));
pub const MENU: Template = Template::new("menu", include_str!("../templates/menu.html"));
pub const INDEX: Template = Template::new("index", include_str!("../templates/index.html"));

impl Template {
    pub const fn new(name: &'static str, source: &'static str) -> Self {
        Self { name, source }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Substitutes every placeholder. A placeholder without a value, or an
    /// unterminated `{{`, is an error.
    pub fn render(&self, values: &BTreeMap<&str, String>) -> Result<String> {
        let mut out = String::with_capacity(self.source.len());
        let mut rest = self.source;
        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after.find("}}").ok_or_else(|| {
                report_error(format!("template {}: unterminated placeholder", self.name))
            })?;
            let key = after[..end].trim();
            let value = values.get(key).ok_or_else(|| {
                report_error(format!("template {}: no value for {{{{{key}}}}}", self.name))
            })?;
            out.push_str(value);
            rest = &after[end + 2..];
        }
        out.push_str(rest);
        Ok(out)
    }
}
