use nixvis_dashboard::{DashboardConfig, Result};

/// Id of the `<script type="application/json">` element holding page settings.
pub const CONFIG_ELEMENT_ID: &str = "nixvis-config";

/// Reads the embedded configuration document, `None` when the page has none.
pub fn read_page_config() -> Result<Option<DashboardConfig>> {
    let Some(element) = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(CONFIG_ELEMENT_ID))
    else {
        return Ok(None);
    };

    let raw = element.inner_html();
    if raw.trim().is_empty() {
        return Ok(None);
    }
    DashboardConfig::from_json(&raw).map(Some)
}
