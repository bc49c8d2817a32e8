use crate::models::{Article, Client};

pub fn render_index(articles: &[Article], clients: &[Client]) -> String {
    let article_options = options(articles.iter().map(|a| (a.id, a.name.as_str())));
    let client_options = options(clients.iter().map(|c| (c.id, c.name.as_str())));
    INDEX_HTML
        .replace("{{STYLE}}", STYLE)
        .replace("{{ARTICLE_OPTIONS}}", &article_options)
        .replace("{{CLIENT_OPTIONS}}", &client_options)
}

pub fn render_login(error: Option<&str>) -> String {
    AUTH_HTML
        .replace("{{STYLE}}", STYLE)
        .replace("{{TITLE}}", "Log in")
        .replace("{{ERROR}}", &error_banner(error))
        .replace("{{ACTION}}", "/login")
        .replace("{{FIELDS}}", LOGIN_FIELDS)
        .replace("{{SWITCH}}", r#"No account yet? <a href="/register">Register</a>"#)
}

pub fn render_register(error: Option<&str>) -> String {
    AUTH_HTML
        .replace("{{STYLE}}", STYLE)
        .replace("{{TITLE}}", "Register")
        .replace("{{ERROR}}", &error_banner(error))
        .replace("{{ACTION}}", "/register")
        .replace("{{FIELDS}}", REGISTER_FIELDS)
        .replace("{{SWITCH}}", r#"Already registered? <a href="/login">Log in</a>"#)
}

fn options<'a>(items: impl Iterator<Item = (u64, &'a str)>) -> String {
    items
        .map(|(id, name)| format!(r#"<option value="{id}">{}</option>"#, escape_html(name)))
        .collect::<Vec<_>>()
        .join("")
}

fn error_banner(error: Option<&str>) -> String {
    match error {
        Some(message) => format!(r#"<p class="error">{}</p>"#, escape_html(message)),
        None => String::new(),
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const STYLE: &str = r#"
    :root {
      --bg: #eef1f4;
      --ink: #1f2a33;
      --muted: #6b7782;
      --entries: rgba(75, 192, 192, 0.75);
      --exits: rgba(255, 99, 132, 0.75);
      --card: #ffffff;
    }

    * { box-sizing: border-box; }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Segoe UI", "Helvetica Neue", sans-serif;
    }

    header {
      display: flex;
      justify-content: space-between;
      align-items: center;
      padding: 16px 28px;
      background: #24323d;
      color: white;
    }

    header h1 { margin: 0; font-size: 1.4rem; }

    main {
      width: min(980px, 100%);
      margin: 0 auto;
      padding: 24px 16px 48px;
      display: grid;
      gap: 24px;
    }

    section, .card {
      background: var(--card);
      border-radius: 12px;
      padding: 20px 24px;
      box-shadow: 0 8px 24px rgba(36, 50, 61, 0.08);
    }

    h2 { margin-top: 0; }

    .row {
      display: flex;
      flex-wrap: wrap;
      gap: 12px;
      align-items: end;
      margin-bottom: 12px;
    }

    label { display: grid; gap: 4px; font-size: 0.85rem; color: var(--muted); }

    input, select, button {
      font: inherit;
      padding: 8px 10px;
      border-radius: 8px;
      border: 1px solid #c9d1d8;
    }

    button { background: #24323d; color: white; cursor: pointer; border: none; }
    button.secondary { background: #8a96a1; }

    table { width: 100%; border-collapse: collapse; }
    th, td { text-align: left; padding: 6px 8px; border-bottom: 1px solid #e3e8ec; }

    .status { min-height: 1.2em; color: #2e7d32; }
    .error { color: #c62828; }

    .chart-bar-entries { fill: var(--entries); }
    .chart-bar-exits { fill: var(--exits); }
    .chart-label { font-size: 11px; fill: var(--muted); }
    .chart-grid { stroke: #e3e8ec; }
"#;

const LOGIN_FIELDS: &str = r#"
      <label>Username <input name="username" required /></label>
      <label>Password <input name="password" type="password" required /></label>
"#;

const REGISTER_FIELDS: &str = r#"
      <label>Username <input name="username" required /></label>
      <label>Email <input name="email" type="email" /></label>
      <label>Password <input name="password1" type="password" required /></label>
      <label>Confirm password <input name="password2" type="password" required /></label>
"#;

const AUTH_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Warehouse - {{TITLE}}</title>
  <style>{{STYLE}}</style>
</head>
<body>
  <header><h1>Warehouse</h1></header>
  <main>
    <form class="card" method="post" action="{{ACTION}}">
      <h2>{{TITLE}}</h2>
      {{ERROR}}
      <div class="row">{{FIELDS}}</div>
      <button type="submit">{{TITLE}}</button>
      <p>{{SWITCH}}</p>
    </form>
  </main>
</body>
</html>
"#;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Warehouse</title>
  <style>{{STYLE}}</style>
</head>
<body>
  <header>
    <h1>Warehouse</h1>
    <form method="post" action="/logout"><button class="secondary" type="submit">Log out</button></form>
  </header>
  <main>
    <section id="entries">
      <h2>Entries</h2>
      <div class="row">
        <label>Article <select id="entry-filter-article"><option value="">All articles</option>{{ARTICLE_OPTIONS}}</select></label>
        <label>From <input id="entry-filter-start" type="date" /></label>
        <label>To <input id="entry-filter-end" type="date" /></label>
        <button id="entry-search" type="button">Search</button>
      </div>
      <table><thead><tr><th>Date</th><th>Article</th><th>Quantity</th></tr></thead><tbody id="entry-rows"></tbody></table>

      <h3>New entry</h3>
      <form id="entry-form">
        <div class="row"><label>Date <input name="date" type="date" required /></label></div>
        <div class="lines"></div>
        <div class="row">
          <button class="secondary add-line" type="button">Add line</button>
          <button type="submit">Save</button>
        </div>
        <p class="status"></p>
      </form>
    </section>

    <section id="exits">
      <h2>Exits</h2>
      <div class="row">
        <label>Client <select id="exit-filter-client"><option value="">All clients</option>{{CLIENT_OPTIONS}}</select></label>
        <label>From <input id="exit-filter-start" type="date" /></label>
        <label>To <input id="exit-filter-end" type="date" /></label>
        <button id="exit-search" type="button">Search</button>
      </div>
      <table><thead><tr><th>Date</th><th>Client</th><th>Article</th><th>Quantity</th></tr></thead><tbody id="exit-rows"></tbody></table>

      <h3>New exit</h3>
      <form id="exit-form">
        <div class="row">
          <label>Client <select name="client" required><option value="">Select client</option>{{CLIENT_OPTIONS}}</select></label>
          <label>Date <input name="date" type="date" required /></label>
        </div>
        <div class="lines"></div>
        <div class="row">
          <button class="secondary add-line" type="button">Add line</button>
          <button type="submit">Save</button>
        </div>
        <p class="status"></p>
      </form>
    </section>

    <section id="chart">
      <h2>Stock chart</h2>
      <div class="row">
        <label>Article <select id="chart-article"><option value="">All articles</option>{{ARTICLE_OPTIONS}}</select></label>
        <label>Client <select id="chart-client"><option value="">All clients</option>{{CLIENT_OPTIONS}}</select></label>
        <label>From <input id="chart-start" type="date" /></label>
        <label>To <input id="chart-end" type="date" /></label>
      </div>
      <div class="row">
        <label>Series
          <select id="chart-series">
            <option value="entries">Entries</option>
            <option value="exits">Exits</option>
            <option value="both">Both</option>
          </select>
        </label>
        <label>Group by
          <select id="chart-group">
            <option value="articles">Articles</option>
            <option value="clients">Clients</option>
            <option value="dates">Dates</option>
          </select>
        </label>
        <label>Period
          <select id="chart-bucket">
            <option value="daily">Daily</option>
            <option value="biweekly">Biweekly</option>
            <option value="monthly">Monthly</option>
            <option value="yearly">Yearly</option>
          </select>
        </label>
        <button id="chart-refresh" type="button">Update chart</button>
      </div>
      <svg id="chart-svg" viewBox="0 0 900 320" width="100%"></svg>
    </section>
  </main>

  <template id="line-template">
    <div class="row line">
      <label>Article <select name="article" required><option value="">Select article</option>{{ARTICLE_OPTIONS}}</select></label>
      <label>Quantity <input name="quantity" type="number" min="1" required /></label>
      <button class="secondary remove-line" type="button">Remove</button>
    </div>
  </template>

  <script>
    const $ = (id) => document.getElementById(id);
    const esc = (value) => String(value).replace(/[&<>"']/g, (c) => `&#${c.charCodeAt(0)};`);

    const getJson = async (url) => {
      const res = await fetch(url);
      if (res.status === 401) {
        window.location = '/login';
        return [];
      }
      if (!res.ok) {
        throw new Error(await res.text() || 'Request failed');
      }
      return res.json();
    };

    const query = (pairs) => new URLSearchParams(
      Object.entries(pairs).filter(([, value]) => value !== '')
    ).toString();

    const renderEntries = (rows) => {
      $('entry-rows').innerHTML = rows
        .map((row) => `<tr><td>${esc(row.date)}</td><td>${esc(row.article)}</td><td>${row.quantity}</td></tr>`)
        .join('');
    };

    const renderExits = (rows) => {
      $('exit-rows').innerHTML = rows
        .map((row) => `<tr><td>${esc(row.date)}</td><td>${esc(row.client)}</td><td>${esc(row.article)}</td><td>${row.quantity}</td></tr>`)
        .join('');
    };

    const loadEntries = async () => {
      renderEntries(await getJson('/api/entries?' + query({
        article: $('entry-filter-article').value,
        start: $('entry-filter-start').value,
        end: $('entry-filter-end').value
      })));
    };

    const loadExits = async () => {
      renderExits(await getJson('/api/exits?' + query({
        client: $('exit-filter-client').value,
        start: $('exit-filter-start').value,
        end: $('exit-filter-end').value
      })));
    };

    const renderBarChart = (data) => {
      const svg = $('chart-svg');
      if (!data.labels.length) {
        svg.innerHTML = '<text class="chart-label" x="50%" y="50%" text-anchor="middle">No data</text>';
        return;
      }

      const width = 900;
      const height = 320;
      const paddingX = 48;
      const paddingY = 48;
      const top = 16;
      const max = Math.max(1, ...data.datasets.flatMap((set) => set.values));
      const slot = (width - paddingX * 2) / data.labels.length;
      const barWidth = (slot * 0.8) / data.datasets.length;
      const scaleY = (height - top - paddingY) / max;

      let grid = '';
      for (let i = 0; i <= 4; i += 1) {
        const value = Math.round((max * i) / 4);
        const y = height - paddingY - value * scaleY;
        grid += `<line class="chart-grid" x1="${paddingX}" y1="${y}" x2="${width - paddingX}" y2="${y}" />`;
        grid += `<text class="chart-label" x="${paddingX - 8}" y="${y + 4}" text-anchor="end">${value}</text>`;
      }

      const bars = data.datasets.map((set, setIndex) => set.values.map((value, index) => {
        const x = paddingX + index * slot + slot * 0.1 + setIndex * barWidth;
        const h = value * scaleY;
        return `<rect class="chart-bar-${set.name}" x="${x}" y="${height - paddingY - h}" width="${barWidth}" height="${h}"><title>${set.name}: ${value}</title></rect>`;
      }).join('')).join('');

      const labels = data.labels.map((label, index) =>
        `<text class="chart-label" x="${paddingX + index * slot + slot / 2}" y="${height - paddingY + 16}" text-anchor="middle">${esc(label)}</text>`
      ).join('');

      svg.innerHTML = grid + bars + labels;
    };

    const loadChart = async () => {
      renderBarChart(await getJson('/api/chart?' + query({
        article: $('chart-article').value,
        client: $('chart-client').value,
        start: $('chart-start').value,
        end: $('chart-end').value,
        series: $('chart-series').value,
        group_by: $('chart-group').value,
        bucket: $('chart-bucket').value
      })));
    };

    const setupForm = (form, url, toPayload, onSaved) => {
      const lines = form.querySelector('.lines');
      const status = form.querySelector('.status');
      const addLine = () => {
        const line = $('line-template').content.firstElementChild.cloneNode(true);
        line.querySelector('.remove-line').addEventListener('click', () => {
          if (lines.children.length > 1) {
            line.remove();
          }
        });
        lines.appendChild(line);
      };

      form.querySelector('.add-line').addEventListener('click', addLine);
      addLine();

      form.addEventListener('submit', async (event) => {
        event.preventDefault();
        const payload = toPayload(form);
        payload.lines = Array.from(lines.children).map((line) => ({
          article: Number(line.querySelector('[name=article]').value) || null,
          quantity: Number(line.querySelector('[name=quantity]').value) || null
        }));

        const res = await fetch(url, {
          method: 'POST',
          headers: { 'content-type': 'application/json' },
          body: JSON.stringify(payload)
        });
        if (!res.ok) {
          status.className = 'status error';
          status.textContent = await res.text() || 'Request failed';
          return;
        }

        const saved = await res.json();
        status.className = 'status';
        status.textContent = saved.message;
        form.reset();
        lines.innerHTML = '';
        addLine();
        onSaved(saved.rows);
        setTimeout(() => { status.textContent = ''; }, 3000);
      });
    };

    setupForm($('entry-form'), '/api/entries', (form) => ({ date: form.date.value }), renderEntries);
    setupForm($('exit-form'), '/api/exits', (form) => ({
      client: Number(form.client.value) || null,
      date: form.date.value
    }), renderExits);

    const report = (err) => console.error(err);
    $('entry-search').addEventListener('click', () => loadEntries().catch(report));
    $('exit-search').addEventListener('click', () => loadExits().catch(report));
    $('chart-refresh').addEventListener('click', () => loadChart().catch(report));

    Promise.all([loadEntries(), loadExits(), loadChart()]).catch(report);
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_lists_reference_options_escaped() {
        let articles = [Article {
            id: 3,
            name: "Tubo <PVC>".into(),
            description: None,
        }];
        let clients = [Client {
            id: 4,
            name: "O'Brien".into(),
        }];
        let html = render_index(&articles, &clients);
        assert!(html.contains(r#"<option value="3">Tubo &lt;PVC&gt;</option>"#));
        assert!(html.contains(r#"<option value="4">O&#39;Brien</option>"#));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn auth_pages_show_error() {
        let html = render_register(Some("Passwords do not match"));
        assert!(html.contains(r#"<p class="error">Passwords do not match</p>"#));
        assert!(html.contains(r#"name="password2""#));
        assert!(!render_login(None).contains("class=\"error\">"));
    }
}
