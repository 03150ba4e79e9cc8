//! HTML body for hosted email notifications.

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
    <head></head>
    <body style='margin: 0; padding: 24px; padding-bottom: 150px; background-color: #222222;'>
        <div style='border-radius: 12px; max-width: 600px; margin: 0 auto; background-color: #eeeeee; color: #000000;'>
            <a href='stello://responses'>
                <div style='border-radius: 12px 12px 0 0; height: 12px; border-bottom: 1px solid #cccccc; background-color: #ddeeff;'></div>
            </a>
            <div style='padding: 24px;'>
                <p><strong>{heading}</strong></p>
                <p><br><br>{body}</p>
            </div>

            <hr style='margin: 0; border-style: solid; border-color: #cccccc; border-width: 1px 0 0 0;'>

            <div style='padding: 12px; border-radius: 0 0 12px 12px; text-align: center;
                    background-color: #ddeeff; color: #000000; font-family: Roboto, sans-serif;'>
                <p style='margin: 36px 0;'>
                    <a href='stello://responses' style='background-color: #224477; color: #ffffff;
                            padding: 12px 18px; border-radius: 12px; text-decoration: none;'>
                        <strong>View in Stello</strong>
                    </a>
                </p>
            </div>
        </div>

        <hr style='border-style: none;'>
        <p>&nbsp;</p>

        <p style='text-align: center; color: #aaaaaa; max-width: 600px; margin: 0 auto;'>
            <small style="font-size: 0.8em;">
                Open Stello to identify who responded and to reply to them
                (not possible via email for security reasons).
                <br>
                <br>
                Open <a href="https://stello.news/" style="color: #aaaaaa;">Stello</a> to customise your notification settings. If you've lost access to your account, or shouldn't be receiving these, <a href="https://gracious.tech/support/stello/" style="color: #aaaaaa;">let us know</a>.
            </small>
        </p>
    </body>
</html>
"#;

/// Escape text for inclusion in HTML element content or quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the email with an escaped heading and body; body newlines become
/// `<br>`.
pub fn render_email(heading: &str, body: &str) -> String {
    let heading = escape_html(heading);
    let body = escape_html(body).replace('\n', "<br>");
    // Placeholder-like text in the input must never be expanded
    let (head, rest) = TEMPLATE.split_once("{heading}").unwrap_or((TEMPLATE, ""));
    let (middle, tail) = rest.split_once("{body}").unwrap_or((rest, ""));
    format!("{}{}{}{}{}", head, heading, middle, body, tail)
}
