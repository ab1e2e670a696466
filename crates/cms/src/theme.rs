//! Projection of the theme palette onto CSS custom properties.
//!
//! The site's stylesheet reads its colours from these variables, so
//! re-projecting after every content change restyles pages live.

use soft_stories_core::Theme;

pub const BEIGE_VAR: &str = "--color-soft-beige";
pub const BROWN_VAR: &str = "--color-soft-brown";
pub const TEXT_VAR: &str = "--color-soft-text";
pub const ACCENT_VAR: &str = "--color-soft-accent";

/// CSS variable assignments derived from a [`Theme`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ThemeVariables {
    vars: Vec<(&'static str, String)>,
}

impl ThemeVariables {
    /// Map each palette colour to its variable.
    ///
    /// Values that could break out of a declaration (`;`, braces, angle
    /// brackets) are dropped so the stylesheet keeps its previous colour.
    #[must_use]
    pub fn project(theme: &Theme) -> Self {
        let vars = [
            (BEIGE_VAR, &theme.beige),
            (BROWN_VAR, &theme.brown),
            (TEXT_VAR, &theme.text),
            (ACCENT_VAR, &theme.accent),
        ]
        .into_iter()
        .filter_map(|(name, value)| {
            let value = value.trim();
            if is_safe_value(value) {
                Some((name, value.to_owned()))
            } else {
                tracing::warn!(variable = name, value, "Ignoring unsafe theme colour");
                None
            }
        })
        .collect();

        Self { vars }
    }

    /// Value assigned to `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Assignments in palette order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.vars.iter().map(|(n, v)| (*n, v.as_str()))
    }

    /// Render as a `:root` rule.
    #[must_use]
    pub fn to_css(&self) -> String {
        let mut css = String::from(":root {\n");
        for (name, value) in self.iter() {
            css.push_str("  ");
            css.push_str(name);
            css.push_str(": ");
            css.push_str(value);
            css.push_str(";\n");
        }
        css.push_str("}\n");
        css
    }
}

fn is_safe_value(value: &str) -> bool {
    !value.is_empty() && !value.contains([';', '{', '}', '<', '>'])
}
