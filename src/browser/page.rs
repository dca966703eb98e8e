use async_trait::async_trait;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::agent::{PageDriver, PageError, RawItem, Selectors};

/// A browser tab driven through small JavaScript snippets.
pub struct ChromePage {
    page: Page,
    selectors: Selectors,
}

#[derive(Deserialize)]
struct JsItem {
    text: Option<String>,
    likes: Option<String>,
}

impl ChromePage {
    pub fn new(page: Page, selectors: Selectors) -> Self {
        Self { page, selectors }
    }

    async fn eval<T: DeserializeOwned>(&self, script: String) -> Result<T, PageError> {
        self.page
            .evaluate(script)
            .await
            .map_err(|e| PageError(format!("Script execution failed: {}", e)))?
            .into_value()
            .map_err(|e| PageError(format!("Failed to parse result: {:?}", e)))
    }

    fn reveal_script(&self) -> String {
        format!(
            r#"
            (() => {{
                const section = document.querySelector({container});
                if (!section) return false;
                section.scrollIntoView();
                return true;
            }})()
            "#,
            container = js_string(&self.selectors.container)
        )
    }

    fn count_script(&self) -> String {
        format!(
            "document.querySelectorAll({}).length",
            js_string(&self.selectors.item)
        )
    }

    fn read_script(&self) -> String {
        format!(
            r#"
            Array.from(document.querySelectorAll({item})).map(el => {{
                const text = el.querySelector({text});
                const likes = el.querySelector({likes});
                return {{
                    text: text ? text.textContent : null,
                    likes: likes ? likes.textContent : null
                }};
            }})
            "#,
            item = js_string(&self.selectors.item),
            text = js_string(&self.selectors.text),
            likes = js_string(&self.selectors.likes)
        )
    }
}

/// Quote `s` as a JavaScript string literal.
fn js_string(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

#[async_trait]
impl PageDriver for ChromePage {
    async fn reveal_container(&self) -> Result<bool, PageError> {
        self.eval(self.reveal_script()).await
    }

    async fn count_items(&self) -> Result<usize, PageError> {
        self.eval(self.count_script()).await
    }

    async fn scroll_by(&self, px: u32) -> Result<(), PageError> {
        let script = format!("window.scrollTo(0, window.scrollY + {px}); true");
        self.eval::<bool>(script).await.map(|_| ())
    }

    async fn read_items(&self) -> Result<Vec<RawItem>, PageError> {
        let items: Vec<JsItem> = self.eval(self.read_script()).await?;
        Ok(items
            .into_iter()
            .map(|item| RawItem {
                text: item.text,
                likes_label: item.likes,
            })
            .collect())
    }
}

/// Script returning the video title, falling back to the document title.
pub(crate) fn title_script() -> &'static str {
    r#"
    (() => {
        const heading =
            document.querySelector('h1.ytd-video-primary-info-renderer') ||
            document.querySelector('h1.title.ytd-video-primary-info-renderer') ||
            document.querySelector('h1 yt-formatted-string');
        return heading ? heading.textContent : document.title.replace(' - YouTube', '');
    })()
    "#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_string_escapes_quotes() {
        assert_eq!(js_string("#content-text"), "\"#content-text\"");
        assert_eq!(js_string("a[title=\"x\"]"), r#""a[title=\"x\"]""#);
    }

    #[test]
    fn test_title_script_has_fallback() {
        assert!(title_script().contains("document.title.replace(' - YouTube', '')"));
    }
}
