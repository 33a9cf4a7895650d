use crate::flash::{Flash, Kind};

fn base_style() -> &'static str {
    r#"
    * { margin: 0; padding: 0; box-sizing: border-box; }
    body {
        font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
        background: #f5f5f5; color: #333;
        display: flex; justify-content: center; align-items: center;
        min-height: 100vh; padding: 20px;
    }
    .card {
        background: #fff; border-radius: 12px; padding: 32px;
        max-width: 400px; width: 100%; box-shadow: 0 4px 24px rgba(0,0,0,0.08);
    }
    .logo { text-align: center; margin-bottom: 24px; }
    .logo h1 { font-size: 26px; color: #1a1a2e; }
    .logo p { font-size: 14px; color: #666; margin-top: 4px; }
    .form-group { margin-bottom: 16px; }
    .form-group label { display: block; font-size: 14px; margin-bottom: 6px; color: #444; }
    .form-group input {
        width: 100%; padding: 11px 13px; border: 1.5px solid #ddd;
        border-radius: 8px; font-size: 16px; outline: none;
    }
    .form-group input:focus { border-color: #4a6cf7; }
    .btn {
        width: 100%; padding: 13px; border: none; border-radius: 8px;
        background: #4a6cf7; color: #fff;
        font-size: 16px; font-weight: 600; cursor: pointer;
    }
    .btn:hover { background: #3b5de7; }
    .flash { padding: 10px 14px; border-radius: 8px; font-size: 14px; margin-bottom: 16px; }
    .flash.success { background: #eefbf0; color: #1e7d36; }
    .flash.danger { background: #fff0f0; color: #d32f2f; }
    .link { text-align: center; margin-top: 16px; font-size: 14px; color: #666; }
    .link a { color: #4a6cf7; text-decoration: none; }
    .link a:hover { text-decoration: underline; }
    "#
}

/// Minimal entity escaping for anything user-supplied that lands in a page.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());

    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }

    out
}

fn flash_html(flash: Option<&Flash>) -> String {
    flash
        .map(|flash| {
            let class = match flash.kind {
                Kind::Success => "flash success",
                Kind::Danger => "flash danger",
            };

            format!(r#"<div class="{class}">{}</div>"#, escape(&flash.message))
        })
        .unwrap_or_default()
}

pub fn login(flash: Option<&Flash>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en"><head>
<meta charset="utf-8"><meta name="viewport" content="width=device-width,initial-scale=1">
<title>Log In</title>
<style>{style}</style>
</head><body>
<div class="card">
  <div class="logo"><h1>Vestibule</h1><p>Log in to continue</p></div>
  {flash_html}
  <form method="POST" action="/login">
    <div class="form-group">
      <label for="username">Username</label>
      <input type="text" id="username" name="username" required autocomplete="username">
    </div>
    <div class="form-group">
      <label for="password">Password</label>
      <input type="password" id="password" name="password" required autocomplete="current-password">
    </div>
    <button type="submit" class="btn">Log In</button>
  </form>
  <div class="link">No account? <a href="/register">Register</a></div>
</div>
</body></html>"#,
        style = base_style(),
        flash_html = flash_html(flash),
    )
}

pub fn register(flash: Option<&Flash>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en"><head>
<meta charset="utf-8"><meta name="viewport" content="width=device-width,initial-scale=1">
<title>Register</title>
<style>{style}</style>
</head><body>
<div class="card">
  <div class="logo"><h1>Vestibule</h1><p>Create an account</p></div>
  {flash_html}
  <form method="POST" action="/register">
    <div class="form-group">
      <label for="username">Username</label>
      <input type="text" id="username" name="username" required autocomplete="username">
    </div>
    <div class="form-group">
      <label for="email">Email</label>
      <input type="email" id="email" name="email" required autocomplete="email">
    </div>
    <div class="form-group">
      <label for="password">Password</label>
      <input type="password" id="password" name="password" required autocomplete="new-password">
    </div>
    <div class="form-group">
      <label for="confirm_password">Confirm password</label>
      <input type="password" id="confirm_password" name="confirm_password" required autocomplete="new-password">
    </div>
    <button type="submit" class="btn">Register</button>
  </form>
  <div class="link">Already registered? <a href="/login">Log in</a></div>
</div>
</body></html>"#,
        style = base_style(),
        flash_html = flash_html(flash),
    )
}

pub fn dashboard(username: &str, flash: Option<&Flash>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en"><head>
<meta charset="utf-8"><meta name="viewport" content="width=device-width,initial-scale=1">
<title>Dashboard</title>
<style>{style}</style>
</head><body>
<div class="card">
  <div class="logo"><h1>Dashboard</h1><p>Logged in as <strong>{username}</strong></p></div>
  {flash_html}
  <div class="link"><a href="/logout">Log out</a></div>
</div>
</body></html>"#,
        style = base_style(),
        flash_html = flash_html(flash),
        username = escape(username),
    )
}
