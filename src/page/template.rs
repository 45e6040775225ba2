//! The blocked-request HTML document.

use crate::page::markup::{HtmlBuilder, Markup};

/// Values shown on the block page. Every field is rendered escaped.
#[derive(Debug, Clone, Default)]
pub struct BlockPageView<'a> {
    pub title: &'a str,
    pub rule_name: &'a str,
    pub rule_id: Option<&'a str>,
    pub blocked_url: Option<&'a str>,
    pub category: Option<&'a str>,
    pub timestamp: &'a str,
    pub user_email: Option<&'a str>,
    pub admin_email: Option<&'a str>,
}

const STYLE: &str = "
    :root { color-scheme: light dark; }
    body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #f4f5f7; color: #1f2328; margin: 0; padding: 2em 1em; }
    .block-container { background: #fff; padding: 2em; border-radius: 8px; box-shadow: 0 2px 8px rgba(0,0,0,.12); max-width: 560px; margin: auto; }
    h1 { color: #c00; margin-top: 0; font-size: 1.6em; }
    .rule { font-size: 1.1em; font-weight: 600; }
    dl { display: grid; grid-template-columns: max-content 1fr; gap: .4em 1em; margin: 1.5em 0; }
    dt { color: #59636e; }
    dd { margin: 0; word-break: break-all; }
    .contact { color: #59636e; font-size: .95em; }
    button { margin-top: 1em; padding: .5em 1.2em; border: 1px solid #d0d7de; border-radius: 6px; background: #f6f8fa; cursor: pointer; }
    @media (prefers-color-scheme: dark) {
      body { background: #0d1117; color: #e6edf3; }
      .block-container { background: #161b22; box-shadow: none; }
      dt, .contact { color: #9198a1; }
      button { background: #21262d; color: #e6edf3; border-color: #30363d; }
    }
";

const SCRIPT: &str = "document.getElementById('go-back').addEventListener('click', function () { history.back(); });";

fn detail_row(b: &mut HtmlBuilder, label: &'static str, value: Option<&str>) {
    if let Some(value) = value {
        b.raw("      <dt>").raw(label).raw("</dt><dd>").text(value).raw("</dd>\n");
    }
}

/// Render the full document. `nonce` must match the one in the response's
/// Content-Security-Policy header.
pub fn render_block_page(view: &BlockPageView<'_>, nonce: &str) -> Markup {
    let mut b = HtmlBuilder::with_capacity(4096);

    b.raw("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n")
        .raw("  <meta charset=\"UTF-8\">\n")
        .raw("  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n")
        .raw("  <meta name=\"robots\" content=\"noindex\">\n")
        .raw("  <title>")
        .text(view.title)
        .raw("</title>\n")
        .raw("  <style nonce=\"")
        .text(nonce)
        .raw("\">")
        .raw(STYLE)
        .raw("  </style>\n</head>\n<body>\n")
        .raw("  <main class=\"block-container\">\n")
        .raw("    <h1>")
        .text(view.title)
        .raw("</h1>\n")
        .raw("    <p>Your request was blocked by your organization's security policy.</p>\n")
        .raw("    <p class=\"rule\">")
        .text(view.rule_name)
        .raw("</p>\n")
        .raw("    <dl>\n");

    detail_row(&mut b, "Blocked URL", view.blocked_url);
    detail_row(&mut b, "Category", view.category);
    detail_row(&mut b, "Rule ID", view.rule_id);
    detail_row(&mut b, "User", view.user_email);
    detail_row(&mut b, "Time", Some(view.timestamp));

    b.raw("    </dl>\n");

    match view.admin_email {
        Some(admin) => {
            b.raw("    <p class=\"contact\">If you believe this is an error, contact <a href=\"mailto:")
                .text(admin)
                .raw("\">")
                .text(admin)
                .raw("</a>.</p>\n");
        }
        None => {
            b.raw("    <p class=\"contact\">If you believe this is an error, contact your administrator.</p>\n");
        }
    }

    b.raw("    <button type=\"button\" id=\"go-back\">Go back</button>\n")
        .raw("  </main>\n")
        .raw("  <script nonce=\"")
        .text(nonce)
        .raw("\">")
        .raw(SCRIPT)
        .raw("</script>\n</body>\n</html>\n");

    b.finish()
}
