//! User-facing messages, keyed by message id.

use std::collections::HashMap;

pub const TEMPLATE_UNIQ: &str = "template_uniq";
pub const NOT_PRODUCT_VARIANT: &str = "not_product_variant";

const FALLBACK_LANGUAGE: &str = "en";

/// Renders a message id with named arguments.
pub trait MessageCatalog {
    fn render(&self, message_id: &str, args: &[(&str, &str)]) -> String;
}

impl<M: MessageCatalog + ?Sized> MessageCatalog for &M {
    fn render(&self, message_id: &str, args: &[(&str, &str)]) -> String {
        (**self).render(message_id, args)
    }
}

/// Per-language message templates with `{name}` placeholders.
///
/// Lookups fall back to English, then to the bare message id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translations {
    language: String,
    messages: HashMap<String, HashMap<String, String>>,
}

impl Default for Translations {
    fn default() -> Self {
        let english = HashMap::from([
            (
                TEMPLATE_UNIQ.to_string(),
                "The Template of the Product Variant must be unique.".to_string(),
            ),
            (
                NOT_PRODUCT_VARIANT.to_string(),
                "The template \"{template}\" has no product variant.".to_string(),
            ),
        ]);
        Self {
            language: FALLBACK_LANGUAGE.to_string(),
            messages: HashMap::from([(FALLBACK_LANGUAGE.to_string(), english)]),
        }
    }
}

impl Translations {
    /// Switch the rendering language. Unknown languages render in English.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Merge a `{"message_id": "template"}` JSON document for `language`.
    pub fn load_json(&mut self, language: &str, document: &str) -> Result<(), serde_json::Error> {
        let entries: HashMap<String, String> = serde_json::from_str(document)?;
        self.messages
            .entry(language.to_string())
            .or_default()
            .extend(entries);
        Ok(())
    }

    fn template(&self, message_id: &str) -> Option<&str> {
        [self.language.as_str(), FALLBACK_LANGUAGE]
            .into_iter()
            .find_map(|lang| self.messages.get(lang)?.get(message_id))
            .map(String::as_str)
    }
}

impl MessageCatalog for Translations {
    fn render(&self, message_id: &str, args: &[(&str, &str)]) -> String {
        let Some(template) = self.template(message_id) else {
            tracing::warn!(message_id, language = %self.language, "missing translation");
            return message_id.to_string();
        };
        args.iter().fold(template.to_string(), |text, (name, value)| {
            text.replace(&format!("{{{name}}}"), value)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_english_defaults() {
        let t = Translations::default();
        assert_eq!(
            t.render(TEMPLATE_UNIQ, &[]),
            "The Template of the Product Variant must be unique."
        );
        assert_eq!(
            t.render(NOT_PRODUCT_VARIANT, &[("template", "Desk")]),
            "The template \"Desk\" has no product variant."
        );
    }

    #[test]
    fn loaded_language_overrides_and_falls_back() {
        let mut t = Translations::default().with_language("es");
        t.load_json(
            "es",
            r#"{"template_uniq": "La plantilla de la variante debe ser única."}"#,
        )
        .unwrap();

        assert_eq!(
            t.render(TEMPLATE_UNIQ, &[]),
            "La plantilla de la variante debe ser única."
        );
        assert!(t.render(NOT_PRODUCT_VARIANT, &[("template", "X")]).contains("\"X\""));
    }

    #[test]
    fn unknown_ids_render_as_themselves() {
        assert_eq!(Translations::default().render("nope", &[]), "nope");
    }

    #[test]
    fn rejects_malformed_documents() {
        let mut t = Translations::default();
        assert!(t.load_json("fr", "[1, 2]").is_err());
    }
}
