use emporium_types::StoreTheme;

/// CSS custom properties applied to the document root when a store is shown.
#[must_use]
pub fn theme_variables(theme: &StoreTheme) -> Vec<(&'static str, String)> {
    vec![
        ("--primary-color", theme.primary_color.clone()),
        ("--bg-color", theme.background_color.clone()),
        ("--card-color", theme.card_color.clone()),
        ("--parchment-color", theme.parchment_color.clone()),
        ("--ink-color", theme.ink_color.clone()),
        ("--border-radius", theme.border_radius.clone()),
        ("--store-font", theme.font_family.css_value().to_string()),
    ]
}

/// `:root { ... }` block for the given theme.
#[must_use]
pub fn theme_stylesheet(theme: &StoreTheme) -> String {
    let mut css = String::from(":root {\n");
    for (name, value) in theme_variables(theme) {
        css.push_str(&format!("  {name}: {value};\n"));
    }
    css.push_str("}\n");
    css
}

#[cfg(test)]
mod tests {
    use emporium_types::{FontFamily, StoreTheme};

    use super::{theme_stylesheet, theme_variables};

    #[test]
    fn monospace_maps_to_css_keyword() {
        let theme = StoreTheme {
            font_family: FontFamily::Monospace,
            ..StoreTheme::default()
        };
        let vars = theme_variables(&theme);
        assert!(vars.contains(&("--store-font", "monospace".to_string())));
    }

    #[test]
    fn stylesheet_lists_every_variable() {
        let css = theme_stylesheet(&StoreTheme::default());
        assert!(css.starts_with(":root {"));
        assert!(css.contains("--primary-color: #d4af37;"));
        assert!(css.contains("--store-font: Cinzel;"));
        assert_eq!(css.matches(';').count(), 7);
    }
}
