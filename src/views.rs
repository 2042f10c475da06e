//! Server-rendered HTML pages.
//!
//! Every value that came from a user goes through [`escape`].

use axum::http::StatusCode;

use crate::middleware::Flash;
use crate::service::ManagedRecord;

pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

fn base_style() -> &'static str {
    r#"
    * { box-sizing: border-box; }
    body { font-family: -apple-system, 'Segoe UI', Roboto, sans-serif; background: #f5f5f5; color: #333; margin: 0; padding: 24px; }
    .card { background: #fff; border-radius: 12px; padding: 24px; max-width: 420px; margin: 40px auto; box-shadow: 0 4px 24px rgba(0,0,0,0.08); }
    .wide { max-width: 960px; }
    label { display: block; font-size: 14px; margin: 10px 0 4px; }
    input { width: 100%; padding: 10px; border: 1px solid #ccc; border-radius: 8px; }
    table input { width: auto; }
    button { padding: 10px 16px; border: none; border-radius: 8px; background: #4a6cf7; color: #fff; cursor: pointer; margin-top: 12px; }
    button.danger { background: #d32f2f; }
    table { width: 100%; border-collapse: collapse; margin-top: 16px; }
    td, th { text-align: left; padding: 8px; border-bottom: 1px solid #eee; vertical-align: middle; }
    .error { background: #fff0f0; color: #d32f2f; padding: 10px; border-radius: 8px; margin-bottom: 12px; }
    .success { background: #f0fff4; color: #2e7d32; padding: 10px; border-radius: 8px; margin-bottom: 12px; }
    .topbar { display: flex; justify-content: space-between; align-items: center; }
    "#
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en"><head>
<meta charset="utf-8"><meta name="viewport" content="width=device-width,initial-scale=1">
<title>{title}</title>
<style>{style}</style>
</head><body>
{body}
</body></html>"#,
        style = base_style(),
    )
}

fn error_block(error: Option<&str>) -> String {
    error
        .map(|e| format!(r#"<div class="error">{}</div>"#, escape(e)))
        .unwrap_or_default()
}

/// Landing page with the login form.
pub fn render_index(error: Option<&str>) -> String {
    let error_html = error_block(error);
    page(
        "Sign in",
        &format!(
            r#"<div class="card">
  <h1>Sign in</h1>
  {error_html}
  <form method="POST" action="/login">
    <label for="username">Username</label>
    <input id="username" type="text" name="username" required autocomplete="username">
    <label for="password">Password</label>
    <input id="password" type="password" name="password" required autocomplete="current-password">
    <button type="submit">Sign in</button>
  </form>
  <p>No account? <a href="/register">Register</a></p>
</div>"#
        ),
    )
}

pub fn render_register(error: Option<&str>) -> String {
    let error_html = error_block(error);
    page(
        "Register",
        &format!(
            r#"<div class="card">
  <h1>Register</h1>
  {error_html}
  <form method="POST" action="/register">
    <label for="email">Email</label>
    <input id="email" type="email" name="email" required autocomplete="email">
    <label for="username">Username</label>
    <input id="username" type="text" name="username" required autocomplete="username">
    <label for="password">Password</label>
    <input id="password" type="password" name="password" required autocomplete="new-password">
    <label for="confirm_password">Confirm password</label>
    <input id="confirm_password" type="password" name="confirm_password" required autocomplete="new-password">
    <button type="submit">Create account</button>
  </form>
  <p>Already registered? <a href="/">Sign in</a></p>
</div>"#
        ),
    )
}

fn render_record_row(record: &ManagedRecord) -> String {
    let id = record.id;
    let username = escape(&record.username);
    let email = escape(&record.email);
    let created = record.created_at.format("%Y-%m-%d %H:%M UTC");
    format!(
        r#"<tr>
  <td>{id}</td>
  <td colspan="2">
    <form method="POST" action="/edit_user/{id}">
      <input type="text" name="username" value="{username}" required>
      <input type="email" name="email" value="{email}" required>
      <input type="password" name="password" placeholder="New password (optional)">
      <button type="submit">Save</button>
    </form>
  </td>
  <td>{created}</td>
  <td>
    <form method="POST" action="/delete_user/{id}">
      <button type="submit" class="danger">Delete</button>
    </form>
  </td>
</tr>"#
    )
}

pub fn render_dashboard(username: &str, records: &[ManagedRecord], flashes: &[Flash]) -> String {
    let flash_html: String = flashes
        .iter()
        .map(|f| {
            format!(
                r#"<div class="{}">{}</div>"#,
                f.kind.as_str(),
                escape(&f.message)
            )
        })
        .collect();
    let rows: String = if records.is_empty() {
        r#"<tr><td colspan="5">No users yet.</td></tr>"#.to_string()
    } else {
        records.iter().map(render_record_row).collect()
    };
    let username = escape(username);
    page(
        "Dashboard",
        &format!(
            r#"<div class="card wide">
  <div class="topbar"><h1>Dashboard</h1><span>Signed in as <strong>{username}</strong> · <a href="/logout">Log out</a></span></div>
  {flash_html}
  <h2>Create user</h2>
  <form method="POST" action="/create_user">
    <label for="new-username">Username</label>
    <input id="new-username" type="text" name="username" required>
    <label for="new-email">Email</label>
    <input id="new-email" type="email" name="email" required>
    <label for="new-password">Password</label>
    <input id="new-password" type="password" name="password" required>
    <button type="submit">Create</button>
  </form>
  <h2>Users</h2>
  <table>
    <thead><tr><th>ID</th><th colspan="2">Username / Email / Password</th><th>Created</th><th></th></tr></thead>
    <tbody>
{rows}
    </tbody>
  </table>
</div>"#
        ),
    )
}

pub fn render_error_page(status: StatusCode, message: &str) -> String {
    let title = status.canonical_reason().unwrap_or("Error");
    let message = escape(message);
    page(
        title,
        &format!(
            r#"<div class="card">
  <h1>{code} {title}</h1>
  <p>{message}</p>
  <p><a href="/dashboard">Back to dashboard</a></p>
</div>"#,
            code = status.as_u16(),
        ),
    )
}
