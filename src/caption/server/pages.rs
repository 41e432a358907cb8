// SPDX-License-Identifier: MIT

//! Handlebars pages for the web form

use handlebars::Handlebars;
use serde_json::json;

use crate::adk::error::Result;

const TITLE: &str = "LinkedIn Caption Generator";

pub struct Pages {
    registry: Handlebars<'static>,
}

impl Pages {
    pub fn new() -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_template_string("home", include_str!("../../../templates/home.html"))?;
        registry.register_template_string("index", include_str!("../../../templates/index.html"))?;
        Ok(Self { registry })
    }

    pub fn home(&self) -> Result<String> {
        Ok(self.registry.render("home", &json!({ "title": TITLE }))?)
    }

    /// Result page: `content1` holds the post (or a message), `content2`
    /// the review (or error details)
    pub fn result(&self, content1: &str, content2: &str) -> Result<String> {
        Ok(self.registry.render(
            "index",
            &json!({ "title": TITLE, "content1": content1, "content2": content2 }),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_has_topic_form() {
        let html = Pages::new().unwrap().home().unwrap();
        assert!(html.contains(r#"action="/generate""#));
        assert!(html.contains(r#"name="topic""#));
    }

    #[test]
    fn test_result_escapes_content() {
        let html = Pages::new()
            .unwrap()
            .result("<b>bold</b> post", "comments & notes")
            .unwrap();
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt; post"));
        assert!(html.contains("comments &amp; notes"));
        assert!(!html.contains("<b>bold</b>"));
    }

    #[test]
    fn test_result_allows_empty_review() {
        let html = Pages::new()
            .unwrap()
            .result("Please enter a topic.", "")
            .unwrap();
        assert!(html.contains("Please enter a topic."));
    }
}
