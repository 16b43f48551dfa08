use crate::actions::{BrowserActions, ComboOption, ControlKind};
use crate::error::{BrowserError, Result};
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use std::time::Duration;

// In-page scripts. `__ARG_*__` markers are replaced with JSON-encoded
// values, which keeps quoting and escaping on the serde side.

const ADVANCE_GALLERY: &str = r#"
(() => {
  const containers = __ARG_SELECTORS__;
  const isVisible = (el) => !!(el.offsetParent || el.getClientRects().length);
  let root = null;
  for (const sel of containers) {
    try {
      const found = document.querySelector(sel);
      if (found && isVisible(found)) { root = found; break; }
    } catch (e) {}
  }
  if (!root) return false;
  for (const el of root.querySelectorAll('button, a, [role="button"]')) {
    if (!isVisible(el)) continue;
    const text = (el.textContent || '').toLowerCase();
    const aria = (el.getAttribute('aria-label') || '').toLowerCase();
    const cls = (typeof el.className === 'string' ? el.className : '').toLowerCase();
    if (text.includes('next') || aria.includes('next') || cls.includes('next') || cls.includes('arrow')) {
      el.click();
      return true;
    }
  }
  return false;
})()
"#;

const SCROLL_GALLERY: &str = r#"
(() => {
  const containers = __ARG_SELECTORS__;
  const isVisible = (el) => !!(el.offsetParent || el.getClientRects().length);
  for (const sel of containers) {
    try {
      const found = document.querySelector(sel);
      if (found && isVisible(found)) {
        found.scrollBy(0, __ARG_DELTA__);
        return;
      }
    } catch (e) {}
  }
})()
"#;

const RESOLVE_CONTROL: &str = r#"
(() => {
  const pattern = new RegExp(__ARG_PATTERN__, 'i');
  const kind = __ARG_KIND__;
  const kinds = {
    text: 'input, textarea, [contenteditable="true"], [role="textbox"]',
    combo: '[role="combobox"], div[role="button"], [role="textbox"], input',
    checkbox: 'input[type="checkbox"]'
  };
  const controls = kinds[kind] || kinds.text;
  const root = document.querySelector('[role="main"]') || document.body;
  const clean = (s) => String(s || '').replace(/\s+/g, ' ').trim();
  const tag = (el) => {
    if (!el.hasAttribute('data-lotlift-id')) {
      window.__lotliftSeq = (window.__lotliftSeq || 0) + 1;
      el.setAttribute('data-lotlift-id', String(window.__lotliftSeq));
    }
    return '[data-lotlift-id="' + el.getAttribute('data-lotlift-id') + '"]';
  };
  const refine = (host) => {
    if (!host) return null;
    if (host.matches(controls)) return host;
    const inner = host.querySelector(controls);
    if (inner) return inner;
    if (kind === 'checkbox') {
      const wrapper = host.closest('label');
      if (wrapper) {
        const near = wrapper.querySelector(controls);
        if (near) return near;
      }
      if (host.parentElement) {
        const near = host.parentElement.querySelector(controls);
        if (near) return near;
      }
      return null;
    }
    return host;
  };

  for (const el of root.querySelectorAll('[aria-label]')) {
    if (!pattern.test(el.getAttribute('aria-label') || '')) continue;
    const found = refine(el);
    if (found) return tag(found);
  }

  for (const label of root.querySelectorAll('label')) {
    if (!pattern.test(clean(label.textContent))) continue;
    const forId = label.getAttribute('for');
    if (forId) {
      const found = refine(document.getElementById(forId));
      if (found) return tag(found);
    }
    const found = refine(label);
    if (found && found !== label) return tag(found);
  }

  for (const leaf of root.querySelectorAll('*')) {
    if (leaf.children.length) continue;
    if (!pattern.test(clean(leaf.textContent))) continue;
    let cur = leaf;
    for (let i = 0; i < 5 && cur; i++) {
      const ctrl = cur.querySelector(controls);
      if (ctrl) return tag(ctrl);
      cur = cur.parentElement;
    }
    let sib = leaf.nextElementSibling;
    while (sib && !sib.querySelector(controls)) {
      sib = sib.nextElementSibling;
    }
    if (sib) {
      const ctrl = sib.querySelector(controls);
      if (ctrl) return tag(ctrl);
    }
  }

  return null;
})()
"#;

const SET_TEXT: &str = r#"
(() => {
  const host = document.querySelector(__ARG_SELECTOR__);
  if (!host) return false;
  const fields = 'input, textarea, [contenteditable="true"], [role="textbox"]';
  const el = host.matches(fields) ? host : host.querySelector(fields);
  if (!el) return false;
  el.scrollIntoView({ block: 'center', behavior: 'instant' });
  el.focus();
  const value = __ARG_VALUE__;
  if (el.isContentEditable || el.getAttribute('role') === 'textbox') {
    const selection = window.getSelection();
    const range = document.createRange();
    range.selectNodeContents(el);
    selection.removeAllRanges();
    selection.addRange(range);
    document.execCommand('insertText', false, value);
    return true;
  }
  const proto = el instanceof HTMLTextAreaElement
    ? HTMLTextAreaElement.prototype
    : HTMLInputElement.prototype;
  const descriptor = Object.getOwnPropertyDescriptor(proto, 'value');
  if (descriptor && descriptor.set) {
    descriptor.set.call(el, value);
  } else {
    el.value = value;
  }
  el.dispatchEvent(new InputEvent('input', { bubbles: true }));
  el.dispatchEvent(new Event('change', { bubbles: true }));
  return true;
})()
"#;

const FIND_POPUP: &str = r#"
  const isVisible = (el) => !!(el.offsetParent || el.getClientRects().length);
  const tag = (el) => {
    if (!el.hasAttribute('data-lotlift-id')) {
      window.__lotliftSeq = (window.__lotliftSeq || 0) + 1;
      el.setAttribute('data-lotlift-id', String(window.__lotliftSeq));
    }
    return '[data-lotlift-id="' + el.getAttribute('data-lotlift-id') + '"]';
  };
  let menu = null;
  for (const m of document.querySelectorAll('[role="listbox"], [role="menu"], [role="dialog"]')) {
    if (!isVisible(m)) continue;
    if (m.closest('[aria-live], [role="alert"], [role="status"], [class*="toast"], [class*="notification"], [class*="snackbar"]')) continue;
    menu = m;
    break;
  }
"#;

const VISIBLE_OPTIONS: &str = r#"
(() => {
  __FIND_POPUP__
  if (!menu) return [];
  const out = [];
  for (const el of menu.querySelectorAll('[role="option"], [role="menuitem"], span, div')) {
    if (!isVisible(el)) continue;
    const text = (el.textContent || '').replace(/\s+/g, ' ').trim();
    if (!text) continue;
    out.push({ selector: tag(el), text });
  }
  return out;
})()
"#;

const POPUP_SEARCH: &str = r#"
(() => {
  __FIND_POPUP__
  if (!menu) return null;
  const search = menu.querySelector('input[aria-label="Search"], input[type="search"]');
  return search ? tag(search) : null;
})()
"#;

fn arg(value: &impl serde::Serialize) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

/// One open browser tab, driving a live page over CDP.
pub struct BrowserPage {
    page: Page,
    nav_timeout: Duration,
}

impl BrowserPage {
    pub(crate) fn new(page: Page, nav_timeout: Duration) -> Self {
        Self { page, nav_timeout }
    }

    /// Close the tab.
    pub async fn close(self) -> Result<()> {
        self.page
            .close()
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))
    }

    async fn eval(&self, script: String) -> Result<()> {
        self.page
            .evaluate(script)
            .await
            .map_err(|e| BrowserError::EvaluationError(e.to_string()))?;
        Ok(())
    }

    async fn eval_into<T: DeserializeOwned>(&self, script: String) -> Result<T> {
        self.page
            .evaluate(script)
            .await
            .map_err(|e| BrowserError::EvaluationError(e.to_string()))?
            .into_value()
            .map_err(|e| BrowserError::EvaluationError(e.to_string()))
    }
}

#[async_trait::async_trait]
impl BrowserActions for BrowserPage {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| BrowserError::NavigationError(e.to_string()))?;
        tokio::time::timeout(self.nav_timeout, self.page.wait_for_navigation())
            .await
            .map_err(|_| {
                BrowserError::Timeout(format!(
                    "navigation to {url} after {}s",
                    self.nav_timeout.as_secs()
                ))
            })?
            .map_err(|e| BrowserError::NavigationError(e.to_string()))?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        self.page
            .url()
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?
            .ok_or_else(|| BrowserError::NavigationError("page has no URL".to_string()))
    }

    async fn html(&self) -> Result<String> {
        self.page
            .content()
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))
    }

    async fn scroll_by(&self, delta_y: i32) -> Result<()> {
        self.eval(format!("window.scrollBy(0, {delta_y})")).await
    }

    async fn scroll_viewport_fraction(&self, fraction: f64) -> Result<()> {
        self.eval(format!(
            "window.scrollBy(0, Math.round(window.innerHeight * {fraction}))"
        ))
        .await
    }

    async fn scroll_to_top(&self) -> Result<()> {
        self.eval("window.scrollTo(0, 0)".to_string()).await
    }

    async fn click(&self, selector: &str) -> Result<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| BrowserError::SelectorNotFound(selector.to_string()))?;
        element
            .click()
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;
        Ok(())
    }

    async fn advance_gallery(&self, container_selectors: &[String]) -> Result<bool> {
        let script = ADVANCE_GALLERY.replace("__ARG_SELECTORS__", &arg(&container_selectors));
        self.eval_into(script).await
    }

    async fn scroll_gallery(&self, container_selectors: &[String], delta_y: i32) -> Result<()> {
        let script = SCROLL_GALLERY
            .replace("__ARG_SELECTORS__", &arg(&container_selectors))
            .replace("__ARG_DELTA__", &delta_y.to_string());
        self.eval(script).await
    }

    async fn resolve_labeled_control(
        &self,
        label_pattern: &str,
        kind: ControlKind,
    ) -> Result<Option<String>> {
        let script = RESOLVE_CONTROL
            .replace("__ARG_PATTERN__", &arg(&label_pattern))
            .replace("__ARG_KIND__", &arg(&kind.as_js()));
        self.eval_into(script).await
    }

    async fn set_text(&self, selector: &str, value: &str) -> Result<()> {
        let script = SET_TEXT
            .replace("__ARG_SELECTOR__", &arg(&selector))
            .replace("__ARG_VALUE__", &arg(&value));
        let updated: bool = self.eval_into(script).await?;
        if updated {
            Ok(())
        } else {
            Err(BrowserError::SelectorNotFound(selector.to_string()))
        }
    }

    async fn type_text(&self, selector: &str, value: &str) -> Result<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| BrowserError::SelectorNotFound(selector.to_string()))?;
        element
            .click()
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;
        element
            .type_str(value)
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;
        Ok(())
    }

    async fn press_enter(&self, selector: &str) -> Result<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| BrowserError::SelectorNotFound(selector.to_string()))?;
        element
            .press_key("Enter")
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;
        Ok(())
    }

    async fn is_checked(&self, selector: &str) -> Result<bool> {
        let script = format!(
            "(() => {{ const el = document.querySelector({}); return el ? !!el.checked : null; }})()",
            arg(&selector)
        );
        let state: Option<bool> = self.eval_into(script).await?;
        state.ok_or_else(|| BrowserError::SelectorNotFound(selector.to_string()))
    }

    async fn set_checkbox(&self, selector: &str, checked: bool) -> Result<()> {
        if self.is_checked(selector).await? == checked {
            return Ok(());
        }
        self.click(selector).await
    }

    async fn exists(&self, selector: &str) -> Result<bool> {
        let script = format!(
            "!!document.querySelector({})",
            arg(&selector)
        );
        self.eval_into(script).await
    }

    async fn element_text(&self, selector: &str) -> Result<String> {
        let script = format!(
            "(() => {{ const el = document.querySelector({}); return el ? (el.innerText || el.textContent || '') : null; }})()",
            arg(&selector)
        );
        let text: Option<String> = self.eval_into(script).await?;
        text.ok_or_else(|| BrowserError::SelectorNotFound(selector.to_string()))
    }

    async fn visible_options(&self) -> Result<Vec<ComboOption>> {
        let script = VISIBLE_OPTIONS.replace("__FIND_POPUP__", FIND_POPUP);
        self.eval_into(script).await
    }

    async fn popup_search_box(&self) -> Result<Option<String>> {
        let script = POPUP_SEARCH.replace("__FIND_POPUP__", FIND_POPUP);
        self.eval_into(script).await
    }
}
