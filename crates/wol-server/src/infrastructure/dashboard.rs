//! HTML dashboard served at `GET /`.
//!
//! The page is a single self-contained document: a login form, a status
//! panel with a wake button, and a config form.  The script logs in with
//! `POST /login`, keeps the returned token in memory, and sends it as a
//! bearer token on every later call.
//!
//! The password and API token are never rendered into the HTML.  The page is
//! served without authentication, so the script fetches them from
//! `GET /config` after a successful login.  Every other config value is
//! HTML-escaped before substitution.

use chrono::Local;
use wol_core::WolConfig;

/// Renders the dashboard for `config`.
///
/// `server_address` is the `host:port` shown in the header.
pub fn render_dashboard(config: &WolConfig, server_address: &str) -> String {
    let target_display = if config.has_target() {
        config.target_mac_address.as_str()
    } else {
        "Not configured"
    };
    let checked = |flag: bool| if flag { "checked" } else { "" };

    let substitutions = [
        ("SERVER_ADDRESS", escape_html(server_address)),
        ("TARGET_DISPLAY", escape_html(target_display)),
        ("TARGET_MAC", escape_html(&config.target_mac_address)),
        ("BROADCAST", escape_html(&config.broadcast_address)),
        ("WOL_PORT", config.wol_port.to_string()),
        ("HTTP_PORT", config.http_port.to_string()),
        ("ALLOWLIST", escape_html(&config.ip_allowlist.join(", "))),
        ("AUTO_START", checked(config.auto_start_enabled).to_string()),
        ("HTTPS", checked(config.https_enabled).to_string()),
        ("REQUIRE_AUTH", checked(config.require_authentication).to_string()),
        (
            "RENDERED_AT",
            Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        ),
    ];

    fill_template(TEMPLATE, |name| {
        substitutions
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    })
}

/// Replaces each `{{NAME}}` in `template` with `lookup(NAME)` in one pass.
///
/// Substituted text is copied to the output and never scanned again.
/// Placeholders with no value are left as they are.
fn fill_template<'a>(template: &str, lookup: impl Fn(&str) -> Option<&'a str>) -> String {
    let mut page = String::with_capacity(template.len() + 512);
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        page.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        match after_open.find("}}") {
            Some(end) => {
                let name = &after_open[..end];
                match lookup(name) {
                    Some(value) => page.push_str(value),
                    None => {
                        page.push_str("{{");
                        page.push_str(name);
                        page.push_str("}}");
                    }
                }
                rest = &after_open[end + 2..];
            }
            None => {
                page.push_str("{{");
                rest = after_open;
            }
        }
    }
    page.push_str(rest);
    page
}

/// Escapes the five characters that matter inside HTML text and attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>WOL Server - Control Panel</title>
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <style>
    body { font-family: Arial, sans-serif; margin: 20px; background: #1a1a1a; color: #fff; }
    .container { max-width: 800px; margin: 0 auto; }
    .header, .status, .config-section, .login-form { background: #2d2d2d; padding: 20px; border-radius: 8px; margin-bottom: 20px; }
    .header { text-align: center; }
    .login-form { max-width: 400px; margin: 50px auto; text-align: center; }
    .button { background: #007acc; color: #fff; border: none; padding: 10px 20px; border-radius: 4px; cursor: pointer; margin: 5px; }
    .button:hover { background: #005a9e; }
    .button.success { background: #28a745; }
    .row { margin: 10px 0; }
    label { display: inline-block; width: 170px; }
    input[type=text], input[type=password], input[type=number] { padding: 8px; background: #3d3d3d; color: #fff; border: 1px solid #555; border-radius: 4px; width: 300px; }
    .result { margin-top: 10px; padding: 10px; border-radius: 4px; }
    .result.ok { background: #155724; border: 1px solid #c3e6cb; }
    .result.err { background: #721c24; border: 1px solid #f5c6cb; }
    .hint { font-size: 12px; color: #ccc; margin-left: 10px; }
    .hidden { display: none; }
  </style>
</head>
<body>
  <div class="container">
    <div id="loginForm" class="login-form">
      <h2>WOL Server Login</h2>
      <div class="row">
        <label for="loginPassword">Password:</label>
        <input type="password" id="loginPassword" placeholder="Enter password" style="width: 200px;">
      </div>
      <button onclick="login()" class="button">Login</button>
      <div id="loginResult"></div>
    </div>

    <div id="mainInterface" class="hidden">
      <div class="header">
        <h1>WOL Server Control Panel</h1>
        <p>Server running on <strong>{{SERVER_ADDRESS}}</strong></p>
      </div>

      <div class="status">
        <h2>Status &amp; Quick Actions</h2>
        <p><strong>Target MAC:</strong> {{TARGET_DISPLAY}}</p>
        <p><strong>Broadcast:</strong> {{BROADCAST}}:{{WOL_PORT}}</p>
        <p><strong>Last Updated:</strong> {{RENDERED_AT}}</p>
        <button onclick="sendWake()" class="button success">Wake Target Computer</button>
        <button onclick="location.reload()" class="button">Refresh</button>
        <div id="wakeResult"></div>
      </div>

      <div class="config-section">
        <h2>Configuration</h2>
        <div class="row">
          <label for="webPassword">Web Password:</label>
          <input type="password" id="webPassword">
        </div>
        <div class="row">
          <label for="authToken">API Token:</label>
          <input type="password" id="authToken">
          <button id="tokenToggle" onclick="toggleTokenVisibility()" class="button">Show</button>
          <button onclick="generateToken()" class="button">Generate</button>
        </div>
        <div class="row">
          <label for="macAddress">Target MAC:</label>
          <input type="text" id="macAddress" value="{{TARGET_MAC}}" placeholder="AA:BB:CC:DD:EE:FF">
        </div>
        <div class="row">
          <label for="broadcastAddress">Broadcast Address:</label>
          <input type="text" id="broadcastAddress" value="{{BROADCAST}}">
        </div>
        <div class="row">
          <label for="wolPort">WOL Port:</label>
          <input type="number" id="wolPort" value="{{WOL_PORT}}" style="width: 100px;">
          <label for="httpPort" style="margin-left: 20px;">HTTP Port:</label>
          <input type="number" id="httpPort" value="{{HTTP_PORT}}" style="width: 100px;">
        </div>
        <div class="row">
          <label for="ipAllowlist">IP Allowlist:</label>
          <input type="text" id="ipAllowlist" value="{{ALLOWLIST}}" placeholder="192.168.1.0/24, 10.0.0.0/8">
        </div>
        <div class="row">
          <label for="autoStart">Auto-start:</label>
          <input type="checkbox" id="autoStart" {{AUTO_START}}>
          <label for="httpsEnabled" style="margin-left: 20px;">HTTPS Enabled:</label>
          <input type="checkbox" id="httpsEnabled" {{HTTPS}}>
        </div>
        <div class="row">
          <label for="requireAuth">Require API Authentication:</label>
          <input type="checkbox" id="requireAuth" {{REQUIRE_AUTH}}>
          <span class="hint">Unchecked: /wake and /config accept requests without a token</span>
        </div>
        <button onclick="saveConfig()" class="button success">Save Configuration</button>
        <div id="configResult"></div>
      </div>
    </div>
  </div>

  <script>
    let authToken = '';

    function showResult(id, ok, message) {
      const box = document.createElement('p');
      box.className = 'result ' + (ok ? 'ok' : 'err');
      box.textContent = message;
      const target = document.getElementById(id);
      target.replaceChildren(box);
    }

    function authHeaders() {
      const headers = { 'Content-Type': 'application/json' };
      if (authToken) {
        headers['Authorization'] = 'Bearer ' + authToken;
      }
      return headers;
    }

    function login() {
      const password = document.getElementById('loginPassword').value;
      fetch('/login', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({ password: password })
      })
        .then(r => r.json())
        .then(data => {
          if (data.success) {
            authToken = data.authToken || '';
            document.getElementById('loginForm').classList.add('hidden');
            document.getElementById('mainInterface').classList.remove('hidden');
            loadSecrets();
          } else {
            showResult('loginResult', false, data.message);
          }
        })
        .catch(error => showResult('loginResult', false, 'Error: ' + error.message));
    }

    function loadSecrets() {
      fetch('/config', { headers: authHeaders() })
        .then(r => r.json())
        .then(config => {
          document.getElementById('webPassword').value = config.webPassword || '';
          document.getElementById('authToken').value = config.authToken || '';
        })
        .catch(error => showResult('configResult', false, 'Error: ' + error.message));
    }

    function sendWake() {
      showResult('wakeResult', true, 'Sending wake packet...');
      fetch('/wake', { method: 'POST', headers: authHeaders(), body: '{}' })
        .then(r => r.json())
        .then(data => showResult('wakeResult', data.success, data.message))
        .catch(error => showResult('wakeResult', false, 'Error: ' + error.message));
    }

    function toggleTokenVisibility() {
      const input = document.getElementById('authToken');
      const button = document.getElementById('tokenToggle');
      const hidden = input.type === 'password';
      input.type = hidden ? 'text' : 'password';
      button.textContent = hidden ? 'Hide' : 'Show';
    }

    function generateToken() {
      const chars = 'ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789';
      const bytes = new Uint8Array(32);
      crypto.getRandomValues(bytes);
      let token = '';
      bytes.forEach(b => { token += chars[b % chars.length]; });
      document.getElementById('authToken').value = token;
    }

    function saveConfig() {
      const allowlist = document.getElementById('ipAllowlist').value
        .split(',')
        .map(entry => entry.trim())
        .filter(entry => entry.length > 0);
      const newToken = document.getElementById('authToken').value;
      const update = {
        webPassword: document.getElementById('webPassword').value,
        authToken: newToken,
        targetMacAddress: document.getElementById('macAddress').value,
        broadcastAddress: document.getElementById('broadcastAddress').value,
        wolPort: Number(document.getElementById('wolPort').value),
        httpPort: Number(document.getElementById('httpPort').value),
        ipAllowlist: allowlist,
        autoStartEnabled: document.getElementById('autoStart').checked,
        httpsEnabled: document.getElementById('httpsEnabled').checked,
        requireAuthentication: document.getElementById('requireAuth').checked
      };
      fetch('/config', { method: 'POST', headers: authHeaders(), body: JSON.stringify(update) })
        .then(r => r.json())
        .then(data => {
          showResult('configResult', data.success, data.message);
          if (data.success) {
            authToken = newToken;
          }
        })
        .catch(error => showResult('configResult', false, 'Error: ' + error.message));
    }

    document.getElementById('loginPassword').addEventListener('keypress', e => {
      if (e.key === 'Enter') {
        login();
      }
    });
  </script>
</body>
</html>
"#;

// ── Tests ─────────────────────────────────────────────────────────────────────
