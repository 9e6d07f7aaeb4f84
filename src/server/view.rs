//! Minimal HTML pages.

use crate::server::model::auth::AuthenticatedUser;

const LAYOUT_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Sheetform</title>
</head>
<body>
"#;

const LAYOUT_TAIL: &str = "</body>\n</html>\n";

fn layout(body: &str) -> String {
    format!("{}{}{}", LAYOUT_HEAD, body, LAYOUT_TAIL)
}

/// Landing page with the sign-in link.
pub fn login_page() -> String {
    layout(
        r#"<h1>Sheetform</h1>
<p>Sign in to submit the form.</p>
<p><a href="/login">Sign in with Google</a></p>
"#,
    )
}

/// Form page for a signed-in user.
///
/// The user's name and email are HTML-escaped.
pub fn home_page(user: &AuthenticatedUser) -> String {
    layout(&format!(
        r#"<h1>Welcome, {name}</h1>
<p>Signed in as {email}. <a href="/logout">Log out</a></p>
<form method="post" action="/submit">
<label>Name <input type="text" name="name" required></label>
<label>Pincode <input type="text" name="pincode" required></label>
<button type="submit">Submit</button>
</form>
"#,
        name = escape_html(user.display_name()),
        email = escape_html(&user.email),
    ))
}

/// Confirmation shown after a row was appended.
pub fn success_page() -> String {
    layout(
        r#"<h1>Thank you</h1>
<p>Your submission was recorded.</p>
<p><a href="/home">Submit another</a> or <a href="/logout">log out</a>.</p>
"#,
    )
}

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
