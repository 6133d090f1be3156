//! Server-rendered kiosk pages.

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="/static/style.css">
</head>
<body>
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
    )
}

/// Scan page: camera preview plus a text field for typed or USB-scanned ids.
pub fn index() -> String {
    layout(
        "Volunteer Timeclock",
        r#"<h1>Scan your badge</h1>
<video id="scanner" playsinline muted></video>
<form id="member-form" method="post" action="/action">
<input type="text" id="member_id" name="member_id" autocomplete="off" placeholder="Member ID">
<button type="submit">Continue</button>
</form>
<p id="error" class="error"></p>
<script src="/static/scanner.js"></script>"#,
    )
}

/// Event selection for the scanned member. Each event is a GET to `/sent`.
pub fn action(name: &str, events: &[String]) -> String {
    let mut body = format!("<h1>Hello, {}</h1>\n", escape(name));
    if events.is_empty() {
        body.push_str("<p class=\"hint\">You have no open signups today.</p>\n");
    } else {
        body.push_str("<p class=\"hint\">Choose the event to clock in or out of.</p>\n");
        body.push_str("<form method=\"get\" action=\"/sent\">\n");
        for event in events {
            let event = escape(event);
            body.push_str(&format!(
                "<button type=\"submit\" name=\"event\" value=\"{event}\">{event}</button>\n"
            ));
        }
        body.push_str("</form>\n");
    }
    body.push_str("<a class=\"home\" href=\"/\">Not you? Start over</a>");
    layout("Choose an event", &body)
}

/// Result of a clock-in or clock-out attempt.
pub fn sent(message: &str) -> String {
    let body = format!(
        "<h1>{}</h1>\n<a class=\"home\" href=\"/\">Done</a>",
        escape(message)
    );
    layout("Timeclock", &body)
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
